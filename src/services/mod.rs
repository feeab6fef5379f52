pub mod academics;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod discipline;
pub mod exams;
pub mod fees;
pub mod notifications;
pub mod report_cards;
pub mod schools;
pub mod staff;
pub mod students;
pub mod subjects;
pub mod system;
pub mod tenant;
pub mod timetable;

pub use academics::AcademicService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use dashboard::DashboardService;
pub use discipline::DisciplineService;
pub use exams::ExamService;
pub use fees::FeeService;
pub use notifications::NotificationService;
pub use report_cards::ReportCardService;
pub use schools::SchoolService;
pub use staff::StaffService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use system::SystemService;
pub use timetable::TimetableService;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use crate::errors::SchoolHubError;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 启动时注册为 app data 的存储句柄
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            actix_web::error::ErrorInternalServerError("Storage not configured")
        })
}

/// 将存储错误映射为响应信封。非客户端错误会记录日志，
/// 并以只包含 `context` 的 500 返回。
pub(crate) fn error_response(context: &str, err: &SchoolHubError) -> HttpResponse {
    match err {
        SchoolHubError::Validation(msg)
        | SchoolHubError::DateParse(msg)
        | SchoolHubError::Import(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg.as_str())),
        SchoolHubError::NotFound(msg) => HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::NotFound, msg.as_str())),
        SchoolHubError::Conflict(_) => HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            format!("{context}: resource already exists"),
        )),
        SchoolHubError::Authentication(msg) => HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, msg.as_str())),
        SchoolHubError::Authorization(msg) => HttpResponse::Forbidden()
            .json(ApiResponse::error_empty(ErrorCode::Forbidden, msg.as_str())),
        _ => {
            error!("{}: {}", context, err);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::InternalServerError, context))
        }
    }
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn forbidden(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_statuses() {
        let cases = [
            (SchoolHubError::validation("bad"), StatusCode::BAD_REQUEST),
            (SchoolHubError::date_parse("bad"), StatusCode::BAD_REQUEST),
            (SchoolHubError::not_found("gone"), StatusCode::NOT_FOUND),
            (SchoolHubError::conflict("dup"), StatusCode::CONFLICT),
            (SchoolHubError::authentication("who"), StatusCode::UNAUTHORIZED),
            (SchoolHubError::authorization("no"), StatusCode::FORBIDDEN),
            (
                SchoolHubError::database_operation("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(error_response("ctx", &err).status(), status, "{err}");
        }
    }
}
