use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AcademicService, valid_range};
use crate::models::SchoolScopeQuery;
use crate::models::academic_years::requests::{
    CreateAcademicYearRequest, UpdateAcademicYearRequest,
};
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found, tenant};
use crate::utils::validate::validate_required_text;

pub async fn list_years(
    service: &AcademicService,
    request: &HttpRequest,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::require_member(request, &storage, scope.school_id).await {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.list_academic_years(ctx.school_id()).await {
        Ok(years) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            years,
            "Academic years retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to list academic years", &e)),
    }
}

pub async fn create_year(
    service: &AcademicService,
    request: &HttpRequest,
    mut year: CreateAcademicYearRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx =
        match tenant::authorize(request, &storage, year.school_id, Permission::ManageAcademics)
            .await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

    year.name = year.name.trim().to_string();
    if let Err(msg) = validate_required_text("name", &year.name, 100) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if !valid_range(year.start_date, year.end_date) {
        return Ok(bad_request(
            ErrorCode::InvalidDateRange,
            "start_date must be before end_date",
        ));
    }

    match storage.create_academic_year(ctx.school_id(), year).await {
        Ok(year) => {
            info!(
                "Academic year {} created in school {}",
                year.name,
                ctx.school_id()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                year,
                "Academic year created successfully",
            )))
        }
        Err(e) => Ok(error_response("Failed to create academic year", &e)),
    }
}

pub async fn update_year(
    service: &AcademicService,
    request: &HttpRequest,
    year_id: i64,
    mut update: UpdateAcademicYearRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx =
        match tenant::authorize(request, &storage, update.school_id, Permission::ManageAcademics)
            .await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

    let existing = match storage.get_academic_year(ctx.school_id(), year_id).await {
        Ok(Some(year)) => year,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::AcademicYearNotFound,
                "Academic year not found",
            ));
        }
        Err(e) => return Ok(error_response("Failed to update academic year", &e)),
    };

    if let Some(name) = update.name.as_mut() {
        *name = name.trim().to_string();
        if let Err(msg) = validate_required_text("name", name, 100) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }

    let start = update.start_date.unwrap_or(existing.start_date);
    let end = update.end_date.unwrap_or(existing.end_date);
    if !valid_range(start, end) {
        return Ok(bad_request(
            ErrorCode::InvalidDateRange,
            "start_date must be before end_date",
        ));
    }

    match storage
        .update_academic_year(ctx.school_id(), year_id, update)
        .await
    {
        Ok(Some(year)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            year,
            "Academic year updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        )),
        Err(e) => Ok(error_response("Failed to update academic year", &e)),
    }
}

pub async fn set_current_year(
    service: &AcademicService,
    request: &HttpRequest,
    year_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx =
        match tenant::authorize(request, &storage, scope.school_id, Permission::ManageAcademics)
            .await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

    match storage
        .set_current_academic_year(ctx.school_id(), year_id)
        .await
    {
        Ok(Some(year)) => {
            info!(
                "Academic year {} is now current in school {}",
                year.id,
                ctx.school_id()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                year,
                "Current academic year updated",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        )),
        Err(e) => Ok(error_response("Failed to set current academic year", &e)),
    }
}

pub async fn delete_year(
    service: &AcademicService,
    request: &HttpRequest,
    year_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx =
        match tenant::authorize(request, &storage, scope.school_id, Permission::ManageAcademics)
            .await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

    match storage.delete_academic_year(ctx.school_id(), year_id).await {
        Ok(true) => {
            info!(
                "Academic year {} deleted from school {}",
                year_id,
                ctx.school_id()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Academic year deleted successfully",
            )))
        }
        Ok(false) => Ok(not_found(
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        )),
        Err(e) => Ok(error_response("Failed to delete academic year", &e)),
    }
}
