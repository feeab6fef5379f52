use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, clean, clean_email};
use crate::models::members::permissions::Permission;
use crate::models::students::requests::CreateGuardianRequest;
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::{bad_request, error_response, not_found, tenant};
use crate::storage::Storage;
use crate::utils::validate::validate_required_text;

async fn ensure_student(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    student_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_student(school_id, student_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Err(error_response("Failed to load student", &e)),
    }
}

pub async fn list_guardians(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, scope.school_id, Permission::ViewStudents)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = ensure_student(&storage, ctx.school_id(), student_id).await {
        return Ok(resp);
    }

    match storage.list_guardians(ctx.school_id(), student_id).await {
        Ok(guardians) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            guardians,
            "Guardians retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to list guardians", &e)),
    }
}

pub async fn create_guardian(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    mut guardian: CreateGuardianRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        guardian.school_id,
        Permission::ManageStudents,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    guardian.name = guardian.name.trim().to_string();
    guardian.relationship = guardian.relationship.trim().to_string();
    if let Err(msg) = validate_required_text("name", &guardian.name, 200)
        .and_then(|_| validate_required_text("relationship", &guardian.relationship, 50))
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    guardian.phone = clean(guardian.phone);
    guardian.email = match clean_email(guardian.email) {
        Ok(email) => email,
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    };

    if let Err(resp) = ensure_student(&storage, ctx.school_id(), student_id).await {
        return Ok(resp);
    }

    match storage
        .create_guardian(ctx.school_id(), student_id, guardian)
        .await
    {
        Ok(guardian) => {
            info!(
                "Guardian {} added to student {} by user {}",
                guardian.id,
                student_id,
                ctx.user_id()
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(guardian, "Guardian created successfully")))
        }
        Err(e) => Ok(error_response("Failed to create guardian", &e)),
    }
}

pub async fn delete_guardian(
    service: &StudentService,
    request: &HttpRequest,
    guardian_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        scope.school_id,
        Permission::ManageStudents,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.delete_guardian(ctx.school_id(), guardian_id).await {
        Ok(true) => Ok(HttpResponse::Ok()
            .json(ApiResponse::<()>::success_empty("Guardian deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::GuardianNotFound, "Guardian not found")),
        Err(e) => Ok(error_response("Failed to delete guardian", &e)),
    }
}
