use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::SchoolScopeQuery;
use crate::models::students::requests::{
    CreateGuardianRequest, CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
};
use crate::services::StudentService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn create_student(
    req: HttpRequest,
    student_data: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_student(&req, student_data.into_inner())
        .await
}

pub async fn import_students(
    req: HttpRequest,
    scope: web::Query<SchoolScopeQuery>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .import_students(&req, scope.into_inner(), payload)
        .await
}

pub async fn get_student(
    req: HttpRequest,
    student_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .get_student(&req, student_id.0, scope.into_inner())
        .await
}

pub async fn update_student(
    req: HttpRequest,
    student_id: SafeIDI64,
    update_data: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(&req, student_id.0, update_data.into_inner())
        .await
}

pub async fn delete_student(
    req: HttpRequest,
    student_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .delete_student(&req, student_id.0, scope.into_inner())
        .await
}

pub async fn list_guardians(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .list_guardians(&req, student_id.0, scope.into_inner())
        .await
}

pub async fn create_guardian(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    guardian_data: web::Json<CreateGuardianRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_guardian(&req, student_id.0, guardian_data.into_inner())
        .await
}

pub async fn delete_guardian(
    req: HttpRequest,
    guardian_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .delete_guardian(&req, guardian_id.0, scope.into_inner())
        .await
}

pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_students))
                    .route(web::post().to(create_student)),
            )
            // 注册在 `/{id}` 之前，确保字面路径优先匹配
            .service(
                web::resource("/import")
                    .wrap(middlewares::RateLimit::import())
                    .route(web::post().to(import_students)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_student))
                    .route(web::put().to(update_student))
                    .route(web::delete().to(delete_student)),
            )
            .service(
                web::resource("/{student_id}/guardians")
                    .route(web::get().to(list_guardians))
                    .route(web::post().to(create_guardian)),
            ),
    )
    .service(
        web::scope("/api/v1/guardians")
            .wrap(middlewares::RequireJWT)
            .route("/{id}", web::delete().to(delete_guardian)),
    );
}
