use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, check_capacity, check_class_teacher};
use crate::models::classes::requests::CreateClassRequest;
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, error_response, not_found, tenant};
use crate::utils::validate::validate_required_text;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    mut class: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, class.school_id, Permission::ManageClasses)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    class.name = class.name.trim().to_string();
    if let Err(msg) = validate_required_text("name", &class.name, 100) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(resp) = check_capacity(class.capacity) {
        return Ok(resp);
    }
    if let Err(resp) = check_class_teacher(&storage, ctx.school_id(), class.class_teacher_id).await
    {
        return Ok(resp);
    }
    if let Some(year_id) = class.academic_year_id {
        match storage.get_academic_year(ctx.school_id(), year_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(not_found(
                    ErrorCode::AcademicYearNotFound,
                    "Academic year not found",
                ));
            }
            Err(e) => return Ok(error_response("Failed to create class", &e)),
        }
    }

    match storage.create_class(ctx.school_id(), class).await {
        Ok(class) => {
            info!(
                "Class {} created in school {} by user {}",
                class.name,
                ctx.school_id(),
                ctx.user_id()
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(class, "Class created successfully")))
        }
        Err(e) if e.is_unique_violation() => Ok(conflict(
            ErrorCode::ClassAlreadyExists,
            "Class name already exists",
        )),
        Err(e) => Ok(error_response("Failed to create class", &e)),
    }
}
