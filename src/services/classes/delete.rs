use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::{error_response, not_found, tenant};

/// 软删除：班级标记为停用，历史数据保留
pub async fn delete_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx =
        match tenant::authorize(request, &storage, scope.school_id, Permission::ManageClasses)
            .await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

    match storage.deactivate_class(ctx.school_id(), class_id).await {
        Ok(true) => {
            info!(
                "Class {} deactivated in school {} by user {}",
                class_id,
                ctx.school_id(),
                ctx.user_id()
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::<()>::success_empty("Class deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(error_response("Failed to delete class", &e)),
    }
}
