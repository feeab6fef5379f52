use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::DisciplineService;
use crate::models::discipline::requests::{
    CreateDisciplineRecordRequest, DisciplineListQuery, UpdateDisciplineRecordRequest,
};
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::students::clean;
use crate::services::{bad_request, error_response, not_found, tenant};
use crate::utils::validate::validate_required_text;

const MAX_CATEGORY_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 2000;

fn record_not_found() -> HttpResponse {
    not_found(
        ErrorCode::DisciplineRecordNotFound,
        "Discipline record not found",
    )
}

fn normalize_record(
    mut record: CreateDisciplineRecordRequest,
) -> Result<CreateDisciplineRecordRequest, String> {
    record.category = record.category.trim().to_string();
    record.description = record.description.trim().to_string();
    record.action_taken = clean(record.action_taken);
    validate_required_text("category", &record.category, MAX_CATEGORY_LEN)?;
    validate_required_text("description", &record.description, MAX_DESCRIPTION_LEN)?;
    if record.incident_date > chrono::Utc::now().date_naive() {
        return Err("incident_date cannot be in the future".to_string());
    }
    Ok(record)
}

fn normalize_update(
    mut update: UpdateDisciplineRecordRequest,
) -> Result<UpdateDisciplineRecordRequest, String> {
    if let Some(category) = update.category.as_mut() {
        *category = category.trim().to_string();
        validate_required_text("category", category, MAX_CATEGORY_LEN)?;
    }
    if let Some(description) = update.description.as_mut() {
        *description = description.trim().to_string();
        validate_required_text("description", description, MAX_DESCRIPTION_LEN)?;
    }
    update.action_taken = clean(update.action_taken);
    Ok(update)
}

pub async fn list_records(
    service: &DisciplineService,
    request: &HttpRequest,
    query: DisciplineListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        query.school_id,
        Permission::ViewDiscipline,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage
        .list_discipline_records(ctx.school_id(), query)
        .await
    {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            records,
            "Discipline records retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to list discipline records", &e)),
    }
}

pub async fn get_record(
    service: &DisciplineService,
    request: &HttpRequest,
    record_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        scope.school_id,
        Permission::ViewDiscipline,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage
        .get_discipline_record(ctx.school_id(), record_id)
        .await
    {
        Ok(Some(record)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            record,
            "Discipline record retrieved successfully",
        ))),
        Ok(None) => Ok(record_not_found()),
        Err(e) => Ok(error_response("Failed to get discipline record", &e)),
    }
}

pub async fn create_record(
    service: &DisciplineService,
    request: &HttpRequest,
    record: CreateDisciplineRecordRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        record.school_id,
        Permission::ManageDiscipline,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    let record = match normalize_record(record) {
        Ok(record) => record,
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    };

    match storage.get_student(ctx.school_id(), record.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(bad_request(
                ErrorCode::StudentNotFound,
                "Student does not belong to this school",
            ));
        }
        Err(e) => return Ok(error_response("Failed to load student", &e)),
    }

    match storage
        .create_discipline_record(ctx.school_id(), ctx.user_id(), record)
        .await
    {
        Ok(record) => {
            info!(
                "Discipline record {} created for student {} in school {}",
                record.id,
                record.student_id,
                ctx.school_id()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                record,
                "Discipline record created successfully",
            )))
        }
        Err(e) => Ok(error_response("Failed to create discipline record", &e)),
    }
}

pub async fn update_record(
    service: &DisciplineService,
    request: &HttpRequest,
    record_id: i64,
    update: UpdateDisciplineRecordRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        update.school_id,
        Permission::ManageDiscipline,
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

    match storage
        .update_discipline_record(ctx.school_id(), record_id, update)
        .await
    {
        Ok(Some(record)) => {
            info!(
                "Discipline record {} updated in school {} (status {:?})",
                record.id,
                ctx.school_id(),
                record.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                record,
                "Discipline record updated successfully",
            )))
        }
        Ok(None) => Ok(record_not_found()),
        Err(e) => Ok(error_response("Failed to update discipline record", &e)),
    }
}

pub async fn delete_record(
    service: &DisciplineService,
    request: &HttpRequest,
    record_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        scope.school_id,
        Permission::ManageDiscipline,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage
        .delete_discipline_record(ctx.school_id(), record_id)
        .await
    {
        Ok(true) => {
            info!(
                "Discipline record {} deleted in school {}",
                record_id,
                ctx.school_id()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Discipline record deleted successfully",
            )))
        }
        Ok(false) => Ok(record_not_found()),
        Err(e) => Ok(error_response("Failed to delete discipline record", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::discipline::entities::DisciplineSeverity;
    use chrono::{Duration, Utc};

    fn record() -> CreateDisciplineRecordRequest {
        CreateDisciplineRecordRequest {
            school_id: Some(1),
            student_id: 4,
            incident_date: Utc::now().date_naive(),
            category: "  Late arrival ".into(),
            severity: DisciplineSeverity::Low,
            description: " Arrived after assembly ".into(),
            action_taken: Some("  ".into()),
        }
    }

    #[test]
    fn test_normalize_record_trims() {
        let record = normalize_record(record()).unwrap();
        assert_eq!(record.category, "Late arrival");
        assert_eq!(record.description, "Arrived after assembly");
        assert_eq!(record.action_taken, None);
    }

    #[test]
    fn test_normalize_record_rejects_blank_and_future() {
        let mut blank = record();
        blank.description = "   ".into();
        assert!(normalize_record(blank).is_err());

        let mut future = record();
        future.incident_date = Utc::now().date_naive() + Duration::days(2);
        assert!(normalize_record(future).is_err());
    }

    #[test]
    fn test_normalize_update() {
        let update = UpdateDisciplineRecordRequest {
            category: Some(" Bullying ".into()),
            action_taken: Some(" Parent meeting ".into()),
            ..Default::default()
        };
        let update = normalize_update(update).unwrap();
        assert_eq!(update.category.as_deref(), Some("Bullying"));
        assert_eq!(update.action_taken.as_deref(), Some("Parent meeting"));

        let blank = UpdateDisciplineRecordRequest {
            category: Some(" ".into()),
            ..Default::default()
        };
        assert!(normalize_update(blank).is_err());
    }
}
