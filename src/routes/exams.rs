use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::SchoolScopeQuery;
use crate::models::exams::requests::{
    CreateExamRequest, ExamListQuery, SaveMarksRequest, UpdateExamRequest,
};
use crate::models::report_cards::requests::{GenerateReportCardsRequest, ReportCardQuery};
use crate::services::{ExamService, ReportCardService};
use crate::utils::{SafeExamIdI64, SafeIDI64};

static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);
static REPORT_CARD_SERVICE: Lazy<ReportCardService> = Lazy::new(ReportCardService::new_lazy);

pub async fn list_exams(
    req: HttpRequest,
    query: web::Query<ExamListQuery>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(&req, query.into_inner()).await
}

pub async fn create_exam(
    req: HttpRequest,
    exam_data: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_exam(&req, exam_data.into_inner()).await
}

pub async fn get_exam(
    req: HttpRequest,
    exam_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .get_exam(&req, exam_id.0, scope.into_inner())
        .await
}

pub async fn update_exam(
    req: HttpRequest,
    exam_id: SafeIDI64,
    update_data: web::Json<UpdateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .update_exam(&req, exam_id.0, update_data.into_inner())
        .await
}

pub async fn delete_exam(
    req: HttpRequest,
    exam_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .delete_exam(&req, exam_id.0, scope.into_inner())
        .await
}

pub async fn list_marks(
    req: HttpRequest,
    exam_id: SafeExamIdI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .list_marks(&req, exam_id.0, scope.into_inner())
        .await
}

pub async fn save_marks(
    req: HttpRequest,
    exam_id: SafeExamIdI64,
    marks: web::Json<SaveMarksRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .save_marks(&req, exam_id.0, marks.into_inner())
        .await
}

pub async fn generate_report_cards(
    req: HttpRequest,
    generate: web::Json<GenerateReportCardsRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_CARD_SERVICE
        .generate(&req, generate.into_inner())
        .await
}

pub async fn list_report_cards(
    req: HttpRequest,
    query: web::Query<ReportCardQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_CARD_SERVICE.list(&req, query.into_inner()).await
}

pub fn configure_exam_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_exams))
                    .route(web::post().to(create_exam)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_exam))
                    .route(web::put().to(update_exam))
                    .route(web::delete().to(delete_exam)),
            )
            .service(
                web::resource("/{exam_id}/marks")
                    .route(web::get().to(list_marks))
                    .route(web::put().to(save_marks)),
            ),
    )
    .service(
        web::scope("/api/v1/report-cards")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_report_cards))
            .route("/generate", web::post().to(generate_report_cards)),
    );
}
