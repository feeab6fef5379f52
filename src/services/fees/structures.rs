use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeeService;
use crate::models::fees::requests::{
    CreateFeeStructureRequest, FeeStructureListQuery, UpdateFeeStructureRequest,
};
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::{bad_request, error_response, not_found, tenant};
use crate::utils::validate::validate_required_text;

fn positive_amount() -> HttpResponse {
    bad_request(ErrorCode::BadRequest, "amount must be greater than zero")
}

pub async fn list_structures(
    service: &FeeService,
    request: &HttpRequest,
    query: FeeStructureListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, query.school_id, Permission::ViewFees)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.list_fee_structures(ctx.school_id(), query).await {
        Ok(structures) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            structures,
            "Fee structures retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to list fee structures", &e)),
    }
}

pub async fn create_structure(
    service: &FeeService,
    request: &HttpRequest,
    mut structure: CreateFeeStructureRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        structure.school_id,
        Permission::ManageFees,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    structure.name = structure.name.trim().to_string();
    if let Err(msg) = validate_required_text("name", &structure.name, 200) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if structure.amount <= 0 {
        return Ok(positive_amount());
    }
    if let Some(class_id) = structure.class_id {
        match storage.get_class(ctx.school_id(), class_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(bad_request(ErrorCode::ClassNotFound, "Class not found")),
            Err(e) => return Ok(error_response("Failed to create fee structure", &e)),
        }
    }
    if let Some(year_id) = structure.academic_year_id {
        match storage.get_academic_year(ctx.school_id(), year_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(bad_request(
                    ErrorCode::AcademicYearNotFound,
                    "Academic year not found",
                ));
            }
            Err(e) => return Ok(error_response("Failed to create fee structure", &e)),
        }
    }

    match storage
        .create_fee_structure(ctx.school_id(), structure)
        .await
    {
        Ok(structure) => {
            info!(
                "Fee structure {} created in school {}",
                structure.name,
                ctx.school_id()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                structure,
                "Fee structure created successfully",
            )))
        }
        Err(e) => Ok(error_response("Failed to create fee structure", &e)),
    }
}

pub async fn update_structure(
    service: &FeeService,
    request: &HttpRequest,
    structure_id: i64,
    mut update: UpdateFeeStructureRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, update.school_id, Permission::ManageFees)
        .await
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
    if update.amount.is_some_and(|amount| amount <= 0) {
        return Ok(positive_amount());
    }

    match storage
        .update_fee_structure(ctx.school_id(), structure_id, update)
        .await
    {
        Ok(Some(structure)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            structure,
            "Fee structure updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::FeeStructureNotFound,
            "Fee structure not found",
        )),
        Err(e) => Ok(error_response("Failed to update fee structure", &e)),
    }
}

pub async fn delete_structure(
    service: &FeeService,
    request: &HttpRequest,
    structure_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, scope.school_id, Permission::ManageFees)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage
        .deactivate_fee_structure(ctx.school_id(), structure_id)
        .await
    {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Fee structure deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::FeeStructureNotFound,
            "Fee structure not found",
        )),
        Err(e) => Ok(error_response("Failed to delete fee structure", &e)),
    }
}
