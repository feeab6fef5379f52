use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::attendance::requests::AttendanceSummaryQuery;
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, tenant};

/// 各状态计数与出勤率。未指定学生或班级时
/// 统计全校。
pub async fn attendance_summary(
    service: &AttendanceService,
    request: &HttpRequest,
    query: AttendanceSummaryQuery,
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

    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Ok(bad_request(
            ErrorCode::InvalidDateRange,
            "from must not be after to",
        ));
    }

    match storage.attendance_summary(ctx.school_id(), &query).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            summary,
            "Attendance summary retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to summarise attendance", &e)),
    }
}
