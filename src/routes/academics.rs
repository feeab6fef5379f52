use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::SchoolScopeQuery;
use crate::models::academic_years::requests::{
    CreateAcademicYearRequest, CreateTermRequest, TermListQuery, UpdateAcademicYearRequest,
    UpdateTermRequest,
};
use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest,
};
use crate::services::{AcademicService, SubjectService};
use crate::utils::SafeIDI64;

static ACADEMIC_SERVICE: Lazy<AcademicService> = Lazy::new(AcademicService::new_lazy);
static SUBJECT_SERVICE: Lazy<SubjectService> = Lazy::new(SubjectService::new_lazy);

pub async fn list_years(
    req: HttpRequest,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_years(&req, scope.into_inner()).await
}

pub async fn create_year(
    req: HttpRequest,
    year_data: web::Json<CreateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .create_year(&req, year_data.into_inner())
        .await
}

pub async fn update_year(
    req: HttpRequest,
    year_id: SafeIDI64,
    update_data: web::Json<UpdateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_year(&req, year_id.0, update_data.into_inner())
        .await
}

pub async fn set_current_year(
    req: HttpRequest,
    year_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .set_current_year(&req, year_id.0, scope.into_inner())
        .await
}

pub async fn delete_year(
    req: HttpRequest,
    year_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .delete_year(&req, year_id.0, scope.into_inner())
        .await
}

pub async fn list_terms(
    req: HttpRequest,
    query: web::Query<TermListQuery>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_terms(&req, query.into_inner()).await
}

pub async fn create_term(
    req: HttpRequest,
    term_data: web::Json<CreateTermRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .create_term(&req, term_data.into_inner())
        .await
}

pub async fn update_term(
    req: HttpRequest,
    term_id: SafeIDI64,
    update_data: web::Json<UpdateTermRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_term(&req, term_id.0, update_data.into_inner())
        .await
}

pub async fn set_current_term(
    req: HttpRequest,
    term_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .set_current_term(&req, term_id.0, scope.into_inner())
        .await
}

pub async fn delete_term(
    req: HttpRequest,
    term_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .delete_term(&req, term_id.0, scope.into_inner())
        .await
}

pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<SubjectListQuery>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_subjects(&req, query.into_inner()).await
}

pub async fn create_subject(
    req: HttpRequest,
    subject_data: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .create_subject(&req, subject_data.into_inner())
        .await
}

pub async fn update_subject(
    req: HttpRequest,
    subject_id: SafeIDI64,
    update_data: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .update_subject(&req, subject_id.0, update_data.into_inner())
        .await
}

pub async fn delete_subject(
    req: HttpRequest,
    subject_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .delete_subject(&req, subject_id.0, scope.into_inner())
        .await
}

pub fn configure_academic_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/academic-years")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_years))
                    .route(web::post().to(create_year)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_year))
                    .route(web::delete().to(delete_year)),
            )
            .route("/{id}/current", web::post().to(set_current_year)),
    )
    .service(
        web::scope("/api/v1/terms")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_terms))
                    .route(web::post().to(create_term)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_term))
                    .route(web::delete().to(delete_term)),
            )
            .route("/{id}/current", web::post().to(set_current_term)),
    )
    .service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_subjects))
                    .route(web::post().to(create_subject)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_subject))
                    .route(web::delete().to(delete_subject)),
            ),
    );
}
