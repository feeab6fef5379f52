use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::{error_response, not_found, tenant};

/// 将学生标记为停用；考勤、成绩和发票保持不变
pub async fn delete_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
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

    match storage.deactivate_student(ctx.school_id(), student_id).await {
        Ok(true) => {
            info!(
                "Student {} deactivated in school {} by user {}",
                student_id,
                ctx.school_id(),
                ctx.user_id()
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::<()>::success_empty("Student deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(error_response("Failed to delete student", &e)),
    }
}
