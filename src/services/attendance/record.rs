use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use tracing::info;

use super::AttendanceService;
use crate::models::attendance::requests::{
    AttendanceEntry, AttendanceQuery, SaveAttendanceRequest,
};
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found, tenant};
use crate::storage::Storage;

async fn ensure_class(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    class_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_class(school_id, class_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Err(error_response("Failed to load class", &e)),
    }
}

/// 不允许未来日期，同一学生不能出现两次
fn validate_register(
    date: NaiveDate,
    today: NaiveDate,
    entries: &[AttendanceEntry],
) -> Result<(), String> {
    if date > today {
        return Err("Attendance cannot be recorded for a future date".to_string());
    }
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.student_id) {
            return Err(format!(
                "Student {} appears more than once",
                entry.student_id
            ));
        }
    }
    Ok(())
}

pub async fn list_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    query: AttendanceQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        query.school_id,
        Permission::ViewAttendance,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = ensure_class(&storage, ctx.school_id(), query.class_id).await {
        return Ok(resp);
    }

    match storage
        .list_attendance(ctx.school_id(), query.class_id, query.date)
        .await
    {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            records,
            "Attendance retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to list attendance", &e)),
    }
}

pub async fn save_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    register: SaveAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        register.school_id,
        Permission::RecordAttendance,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    let today = chrono::Utc::now().date_naive();
    if let Err(msg) = validate_register(register.date, today, &register.records) {
        return Ok(bad_request(ErrorCode::AttendanceInvalid, msg));
    }
    if let Err(resp) = ensure_class(&storage, ctx.school_id(), register.class_id).await {
        return Ok(resp);
    }

    let ids: Vec<i64> = register.records.iter().map(|r| r.student_id).collect();
    let known: HashSet<i64> = match storage.existing_student_ids(ctx.school_id(), &ids).await {
        Ok(known) => known.into_iter().collect(),
        Err(e) => return Ok(error_response("Failed to save attendance", &e)),
    };
    if let Some(missing) = ids.iter().find(|id| !known.contains(id)) {
        return Ok(bad_request(
            ErrorCode::AttendanceInvalid,
            format!("Student {missing} does not belong to this school"),
        ));
    }

    match storage
        .save_attendance(
            ctx.school_id(),
            register.class_id,
            register.date,
            ctx.user_id(),
            register.records,
        )
        .await
    {
        Ok(records) => {
            info!(
                "Attendance for class {} on {} saved by user {} ({} records)",
                register.class_id,
                register.date,
                ctx.user_id(),
                records.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                records,
                "Attendance saved successfully",
            )))
        }
        Err(e) => Ok(error_response("Failed to save attendance", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceStatus;

    fn entry(student_id: i64) -> AttendanceEntry {
        AttendanceEntry {
            student_id,
            status: AttendanceStatus::Present,
            remarks: None,
        }
    }

    #[test]
    fn test_register_rejects_future_date() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tomorrow = today.succ_opt().unwrap();
        assert!(validate_register(today, today, &[entry(1)]).is_ok());
        assert!(validate_register(tomorrow, today, &[entry(1)]).is_err());
    }

    #[test]
    fn test_register_rejects_duplicate_students() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let err = validate_register(today, today, &[entry(1), entry(2), entry(1)]).unwrap_err();
        assert!(err.contains("Student 1"));
    }

    #[test]
    fn test_empty_register_clears_the_day() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert!(validate_register(today, today, &[]).is_ok());
    }
}
