use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::SchoolScopeQuery;
use crate::models::fees::requests::{
    CreateFeeStructureRequest, CreateInvoiceRequest, FeeStructureListQuery, InvoiceListQuery,
    PaymentListQuery, RecordPaymentRequest, UpdateFeeStructureRequest, UpdateInvoiceRequest,
};
use crate::services::FeeService;
use crate::utils::SafeIDI64;

static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

pub async fn list_structures(
    req: HttpRequest,
    query: web::Query<FeeStructureListQuery>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_structures(&req, query.into_inner()).await
}

pub async fn create_structure(
    req: HttpRequest,
    structure_data: web::Json<CreateFeeStructureRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .create_structure(&req, structure_data.into_inner())
        .await
}

pub async fn update_structure(
    req: HttpRequest,
    structure_id: SafeIDI64,
    update_data: web::Json<UpdateFeeStructureRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .update_structure(&req, structure_id.0, update_data.into_inner())
        .await
}

pub async fn delete_structure(
    req: HttpRequest,
    structure_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .delete_structure(&req, structure_id.0, scope.into_inner())
        .await
}

pub async fn list_invoices(
    req: HttpRequest,
    query: web::Query<InvoiceListQuery>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_invoices(&req, query.into_inner()).await
}

pub async fn create_invoice(
    req: HttpRequest,
    invoice_data: web::Json<CreateInvoiceRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .create_invoice(&req, invoice_data.into_inner())
        .await
}

pub async fn get_invoice(
    req: HttpRequest,
    invoice_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .get_invoice(&req, invoice_id.0, scope.into_inner())
        .await
}

pub async fn update_invoice(
    req: HttpRequest,
    invoice_id: SafeIDI64,
    update_data: web::Json<UpdateInvoiceRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .update_invoice(&req, invoice_id.0, update_data.into_inner())
        .await
}

pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<PaymentListQuery>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_payments(&req, query.into_inner()).await
}

pub async fn record_payment(
    req: HttpRequest,
    payment_data: web::Json<RecordPaymentRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .record_payment(&req, payment_data.into_inner())
        .await
}

pub fn configure_fee_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/fees")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/structures")
                    .route(web::get().to(list_structures))
                    .route(web::post().to(create_structure)),
            )
            .service(
                web::resource("/structures/{id}")
                    .route(web::put().to(update_structure))
                    .route(web::delete().to(delete_structure)),
            )
            .service(
                web::resource("/invoices")
                    .route(web::get().to(list_invoices))
                    .route(web::post().to(create_invoice)),
            )
            .service(
                web::resource("/invoices/{id}")
                    .route(web::get().to(get_invoice))
                    .route(web::put().to(update_invoice)),
            )
            .service(
                web::resource("/payments")
                    .route(web::get().to(list_payments))
                    .route(web::post().to(record_payment)),
            ),
    );
}
