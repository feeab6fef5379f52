use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::SchoolScopeQuery;
use crate::models::timetable::requests::{
    CreateTimetableEntryRequest, TimetableQuery, UpdateTimetableEntryRequest,
};
use crate::services::TimetableService;
use crate::utils::SafeIDI64;

static TIMETABLE_SERVICE: Lazy<TimetableService> = Lazy::new(TimetableService::new_lazy);

pub async fn list_entries(
    req: HttpRequest,
    query: web::Query<TimetableQuery>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.list_entries(&req, query.into_inner()).await
}

pub async fn create_entry(
    req: HttpRequest,
    entry_data: web::Json<CreateTimetableEntryRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .create_entry(&req, entry_data.into_inner())
        .await
}

pub async fn update_entry(
    req: HttpRequest,
    entry_id: SafeIDI64,
    update_data: web::Json<UpdateTimetableEntryRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .update_entry(&req, entry_id.0, update_data.into_inner())
        .await
}

pub async fn delete_entry(
    req: HttpRequest,
    entry_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .delete_entry(&req, entry_id.0, scope.into_inner())
        .await
}

pub fn configure_timetable_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/timetable")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_entries))
                    .route(web::post().to(create_entry)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_entry))
                    .route(web::delete().to(delete_entry)),
            ),
    );
}
