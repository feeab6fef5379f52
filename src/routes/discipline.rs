use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::SchoolScopeQuery;
use crate::models::discipline::requests::{
    CreateDisciplineRecordRequest, DisciplineListQuery, UpdateDisciplineRecordRequest,
};
use crate::services::DisciplineService;
use crate::utils::SafeIDI64;

static DISCIPLINE_SERVICE: Lazy<DisciplineService> = Lazy::new(DisciplineService::new_lazy);

pub async fn list_records(
    req: HttpRequest,
    query: web::Query<DisciplineListQuery>,
) -> ActixResult<HttpResponse> {
    DISCIPLINE_SERVICE.list_records(&req, query.into_inner()).await
}

pub async fn create_record(
    req: HttpRequest,
    record_data: web::Json<CreateDisciplineRecordRequest>,
) -> ActixResult<HttpResponse> {
    DISCIPLINE_SERVICE
        .create_record(&req, record_data.into_inner())
        .await
}

pub async fn get_record(
    req: HttpRequest,
    record_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    DISCIPLINE_SERVICE
        .get_record(&req, record_id.0, scope.into_inner())
        .await
}

pub async fn update_record(
    req: HttpRequest,
    record_id: SafeIDI64,
    update_data: web::Json<UpdateDisciplineRecordRequest>,
) -> ActixResult<HttpResponse> {
    DISCIPLINE_SERVICE
        .update_record(&req, record_id.0, update_data.into_inner())
        .await
}

pub async fn delete_record(
    req: HttpRequest,
    record_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    DISCIPLINE_SERVICE
        .delete_record(&req, record_id.0, scope.into_inner())
        .await
}

pub fn configure_discipline_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/discipline")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_records))
                    .route(web::post().to(create_record)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_record))
                    .route(web::put().to(update_record))
                    .route(web::delete().to(delete_record)),
            ),
    );
}
