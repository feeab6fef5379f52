use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::models::members::permissions::Permission;
use crate::models::subjects::requests::{CreateSubjectRequest, UpdateSubjectRequest};
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::{bad_request, conflict, error_response, not_found, tenant};
use crate::utils::validate::validate_required_text;

/// 代码统一存为大写，唯一性不区分大小写
fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn code_conflict() -> HttpResponse {
    conflict(
        ErrorCode::SubjectCodeAlreadyExists,
        "Subject code already exists",
    )
}

pub async fn create_subject(
    service: &SubjectService,
    request: &HttpRequest,
    mut subject: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        subject.school_id,
        Permission::ManageAcademics,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    subject.name = subject.name.trim().to_string();
    subject.code = normalize_code(&subject.code);
    if let Err(msg) = validate_required_text("name", &subject.name, 100) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_required_text("code", &subject.code, 20) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    match storage.create_subject(ctx.school_id(), subject).await {
        Ok(subject) => {
            info!(
                "Subject {} created in school {}",
                subject.code,
                ctx.school_id()
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(subject, "Subject created successfully")))
        }
        Err(e) if e.is_unique_violation() => Ok(code_conflict()),
        Err(e) => Ok(error_response("Failed to create subject", &e)),
    }
}

pub async fn update_subject(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
    mut update: UpdateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        update.school_id,
        Permission::ManageAcademics,
    )
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
    if let Some(code) = update.code.as_mut() {
        *code = normalize_code(code);
        if let Err(msg) = validate_required_text("code", code, 20) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }

    match storage
        .update_subject(ctx.school_id(), subject_id, update)
        .await
    {
        Ok(Some(subject)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(subject, "Subject updated successfully"))),
        Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) if e.is_unique_violation() => Ok(code_conflict()),
        Err(e) => Ok(error_response("Failed to update subject", &e)),
    }
}

pub async fn delete_subject(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        scope.school_id,
        Permission::ManageAcademics,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.deactivate_subject(ctx.school_id(), subject_id).await {
        Ok(true) => Ok(HttpResponse::Ok()
            .json(ApiResponse::<()>::success_empty("Subject deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(error_response("Failed to delete subject", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" math101 "), "MATH101");
        assert_eq!(normalize_code("Eng"), "ENG");
    }
}
