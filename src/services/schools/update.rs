use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SchoolService;
use crate::models::members::permissions::Permission;
use crate::models::schools::requests::UpdateSchoolRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found, tenant};
use crate::utils::validate::{validate_email, validate_required_text};

pub async fn update_school(
    service: &SchoolService,
    request: &HttpRequest,
    school_id: i64,
    mut update: UpdateSchoolRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx =
        match tenant::authorize(request, &storage, Some(school_id), Permission::ManageSchool).await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

    if let Some(name) = update.name.as_mut() {
        *name = name.trim().to_string();
        if let Err(msg) = validate_required_text("name", name, 200) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }
    if let Some(email) = update.email.as_mut() {
        *email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(email) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }

    match storage.update_school(school_id, update).await {
        Ok(Some(school)) => {
            info!("School {} updated by user {}", school.slug, ctx.user_id());
            Ok(HttpResponse::Ok().json(ApiResponse::success(school, "School updated successfully")))
        }
        Ok(None) => Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => Ok(error_response("Failed to update school", &e)),
    }
}
