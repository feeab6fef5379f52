use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;

use super::DashboardService;
use crate::models::attendance::requests::AttendanceSummaryQuery;
use crate::models::dashboard::responses::DashboardResponse;
use crate::models::{ApiResponse, SchoolScopeQuery};
use crate::services::{error_response, tenant};

/// 全校某一天的考勤
fn day_query(school_id: i64, day: NaiveDate) -> AttendanceSummaryQuery {
    AttendanceSummaryQuery {
        school_id: Some(school_id),
        student_id: None,
        class_id: None,
        from: Some(day),
        to: Some(day),
    }
}

fn count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub async fn get_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::require_member(request, &storage, scope.school_id).await {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let school_id = ctx.school_id();
    let today = day_query(school_id, chrono::Utc::now().date_naive());

    let totals = tokio::try_join!(
        storage.count_active_students(school_id),
        storage.count_active_staff(school_id),
        storage.count_active_classes(school_id),
        storage.attendance_summary(school_id, &today),
        storage.outstanding_balance(school_id),
        storage.count_open_discipline_records(school_id),
    );

    match totals {
        Ok((students, staff, classes, attendance, balance, discipline)) => {
            let response = DashboardResponse {
                school_id,
                active_students: count(students),
                active_staff: count(staff),
                active_classes: count(classes),
                attendance_today: attendance,
                outstanding_balance: balance,
                open_discipline_records: count(discipline),
                generated_at: chrono::Utc::now(),
            };
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(response, "Dashboard retrieved successfully")))
        }
        Err(e) => Ok(error_response("Failed to load dashboard", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_query_covers_one_day() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let query = day_query(9, day);
        assert_eq!(query.school_id, Some(9));
        assert_eq!(query.from, Some(day));
        assert_eq!(query.to, Some(day));
        assert!(query.class_id.is_none() && query.student_id.is_none());
    }

    #[test]
    fn test_count_saturates() {
        assert_eq!(count(12), 12);
        assert_eq!(count(u64::MAX), i64::MAX);
    }
}
