use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AcademicService, valid_range};
use crate::models::SchoolScopeQuery;
use crate::models::academic_years::entities::AcademicYear;
use crate::models::academic_years::requests::{
    CreateTermRequest, TermListQuery, UpdateTermRequest,
};
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found, tenant};
use crate::storage::Storage;
use crate::utils::validate::validate_required_text;

async fn load_year(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    year_id: i64,
) -> Result<AcademicYear, HttpResponse> {
    match storage.get_academic_year(school_id, year_id).await {
        Ok(Some(year)) => Ok(year),
        Ok(None) => Err(not_found(
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        )),
        Err(e) => Err(error_response("Failed to load academic year", &e)),
    }
}

fn check_term_dates(
    year: &AcademicYear,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> Result<(), HttpResponse> {
    if !valid_range(start, end) {
        return Err(bad_request(
            ErrorCode::InvalidDateRange,
            "start_date must be before end_date",
        ));
    }
    if !year.contains_range(start, end) {
        return Err(bad_request(
            ErrorCode::InvalidDateRange,
            "Term dates must lie within the academic year",
        ));
    }
    Ok(())
}

pub async fn list_terms(
    service: &AcademicService,
    request: &HttpRequest,
    query: TermListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::require_member(request, &storage, query.school_id).await {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage
        .list_terms(ctx.school_id(), query.academic_year_id)
        .await
    {
        Ok(terms) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            terms,
            "Terms retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to list terms", &e)),
    }
}

pub async fn create_term(
    service: &AcademicService,
    request: &HttpRequest,
    mut term: CreateTermRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx =
        match tenant::authorize(request, &storage, term.school_id, Permission::ManageAcademics)
            .await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

    term.name = term.name.trim().to_string();
    if let Err(msg) = validate_required_text("name", &term.name, 100) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let year = match load_year(&storage, ctx.school_id(), term.academic_year_id).await {
        Ok(year) => year,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = check_term_dates(&year, term.start_date, term.end_date) {
        return Ok(resp);
    }

    match storage.create_term(ctx.school_id(), term).await {
        Ok(term) => {
            info!(
                "Term {} created in academic year {} of school {}",
                term.name,
                term.academic_year_id,
                ctx.school_id()
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(term, "Term created successfully")))
        }
        Err(e) => Ok(error_response("Failed to create term", &e)),
    }
}

pub async fn update_term(
    service: &AcademicService,
    request: &HttpRequest,
    term_id: i64,
    mut update: UpdateTermRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx =
        match tenant::authorize(request, &storage, update.school_id, Permission::ManageAcademics)
            .await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

    let existing = match storage.get_term(ctx.school_id(), term_id).await {
        Ok(Some(term)) => term,
        Ok(None) => return Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
        Err(e) => return Ok(error_response("Failed to update term", &e)),
    };

    if let Some(name) = update.name.as_mut() {
        *name = name.trim().to_string();
        if let Err(msg) = validate_required_text("name", name, 100) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }

    let year = match load_year(&storage, ctx.school_id(), existing.academic_year_id).await {
        Ok(year) => year,
        Err(resp) => return Ok(resp),
    };
    let start = update.start_date.unwrap_or(existing.start_date);
    let end = update.end_date.unwrap_or(existing.end_date);
    if let Err(resp) = check_term_dates(&year, start, end) {
        return Ok(resp);
    }

    match storage.update_term(ctx.school_id(), term_id, update).await {
        Ok(Some(term)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(term, "Term updated successfully"))),
        Ok(None) => Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
        Err(e) => Ok(error_response("Failed to update term", &e)),
    }
}

pub async fn set_current_term(
    service: &AcademicService,
    request: &HttpRequest,
    term_id: i64,
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

    match storage.set_current_term(ctx.school_id(), term_id).await {
        Ok(Some(term)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(term, "Current term updated"))),
        Ok(None) => Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
        Err(e) => Ok(error_response("Failed to set current term", &e)),
    }
}

pub async fn delete_term(
    service: &AcademicService,
    request: &HttpRequest,
    term_id: i64,
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

    match storage.delete_term(ctx.school_id(), term_id).await {
        Ok(true) => {
            info!("Term {} deleted from school {}", term_id, ctx.school_id());
            Ok(HttpResponse::Ok()
                .json(ApiResponse::<()>::success_empty("Term deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
        Err(e) => Ok(error_response("Failed to delete term", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use chrono::NaiveDate;

    fn year() -> AcademicYear {
        AcademicYear {
            id: 1,
            school_id: 1,
            name: "2025/2026".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
            is_current: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_term_dates_checked_against_year() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert!(check_term_dates(&year(), d(2025, 9, 1), d(2025, 12, 19)).is_ok());
        assert_eq!(
            check_term_dates(&year(), d(2025, 12, 19), d(2025, 9, 1))
                .unwrap_err()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert!(check_term_dates(&year(), d(2026, 5, 1), d(2026, 8, 15)).is_err());
    }
}
