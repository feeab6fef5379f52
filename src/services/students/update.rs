use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, check_class, clean, clean_email};
use crate::models::members::permissions::Permission;
use crate::models::students::requests::UpdateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found, tenant};
use crate::utils::validate::validate_required_text;

fn normalize_update(mut update: UpdateStudentRequest) -> Result<UpdateStudentRequest, String> {
    if let Some(first_name) = update.first_name.as_mut() {
        *first_name = first_name.trim().to_string();
        validate_required_text("first_name", first_name, 100)?;
    }
    if let Some(last_name) = update.last_name.as_mut() {
        *last_name = last_name.trim().to_string();
        validate_required_text("last_name", last_name, 100)?;
    }
    update.address = clean(update.address);
    update.phone = clean(update.phone);
    update.email = clean_email(update.email)?;
    Ok(update)
}

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    update: UpdateStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        update.school_id,
        Permission::ManageStudents,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    let update = match normalize_update(update) {
        Ok(update) => update,
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    };
    if let Err(resp) = check_class(&storage, ctx.school_id(), update.class_id).await {
        return Ok(resp);
    }

    match storage
        .update_student(ctx.school_id(), student_id, update)
        .await
    {
        Ok(Some(student)) => {
            info!("Student {} updated by user {}", student.id, ctx.user_id());
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(student, "Student updated successfully")))
        }
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(error_response("Failed to update student", &e)),
    }
}
