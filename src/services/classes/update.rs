use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, check_capacity, check_class_teacher};
use crate::models::classes::requests::UpdateClassRequest;
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, error_response, not_found, tenant};
use crate::utils::validate::validate_required_text;

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    mut update: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx =
        match tenant::authorize(request, &storage, update.school_id, Permission::ManageClasses)
            .await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

    if let Some(name) = update.name.as_mut() {
        *name = name.trim().to_string();
        if let Err(msg) = validate_required_text("name", name, 100) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }
    if let Err(resp) = check_capacity(update.capacity) {
        return Ok(resp);
    }
    if let Err(resp) =
        check_class_teacher(&storage, ctx.school_id(), update.class_teacher_id).await
    {
        return Ok(resp);
    }

    match storage.update_class(ctx.school_id(), class_id, update).await {
        Ok(Some(class)) => {
            info!("Class {} updated by user {}", class.id, ctx.user_id());
            Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class updated successfully")))
        }
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) if e.is_unique_violation() => Ok(conflict(
            ErrorCode::ClassAlreadyExists,
            "Class name already exists",
        )),
        Err(e) => Ok(error_response("Failed to update class", &e)),
    }
}
