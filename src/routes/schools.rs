use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::SchoolScopeQuery;
use crate::models::members::requests::{AddStaffRequest, StaffListQuery, UpdateStaffRequest};
use crate::models::schools::requests::{
    CreateSchoolRequest, SchoolListQuery, UpdateSchoolRequest,
};
use crate::services::{SchoolService, StaffService};
use crate::utils::{SafeIDI64, SafeSchoolSlug};

static SCHOOL_SERVICE: Lazy<SchoolService> = Lazy::new(SchoolService::new_lazy);
static STAFF_SERVICE: Lazy<StaffService> = Lazy::new(StaffService::new_lazy);

pub async fn list_schools(
    req: HttpRequest,
    query: web::Query<SchoolListQuery>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.list_schools(&req, query.into_inner()).await
}

pub async fn create_school(
    req: HttpRequest,
    school_data: web::Json<CreateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE
        .create_school(&req, school_data.into_inner())
        .await
}

pub async fn get_school_by_slug(
    req: HttpRequest,
    slug: SafeSchoolSlug,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.get_school_by_slug(&req, slug.0).await
}

pub async fn update_school(
    req: HttpRequest,
    school_id: SafeIDI64,
    update_data: web::Json<UpdateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE
        .update_school(&req, school_id.0, update_data.into_inner())
        .await
}

pub async fn list_staff(
    req: HttpRequest,
    query: web::Query<StaffListQuery>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.list_staff(&req, query.into_inner()).await
}

pub async fn add_staff(
    req: HttpRequest,
    staff_data: web::Json<AddStaffRequest>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.add_staff(&req, staff_data.into_inner()).await
}

pub async fn update_staff(
    req: HttpRequest,
    member_id: SafeIDI64,
    update_data: web::Json<UpdateStaffRequest>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE
        .update_staff(&req, member_id.0, update_data.into_inner())
        .await
}

pub async fn remove_staff(
    req: HttpRequest,
    member_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE
        .remove_staff(&req, member_id.0, scope.into_inner())
        .await
}

pub fn configure_school_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schools")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_schools))
                    .route(web::post().to(create_school)),
            )
            .route("/slug/{slug}", web::get().to(get_school_by_slug))
            .route("/{id}", web::put().to(update_school)),
    )
    .service(
        web::scope("/api/v1/staff")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_staff))
                    .route(web::post().to(add_staff)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_staff))
                    .route(web::delete().to(remove_staff)),
            ),
    );
}
