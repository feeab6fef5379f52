use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::{error_response, not_found, tenant};

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, scope.school_id, Permission::ViewStudents)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.get_class(ctx.school_id(), class_id).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(class, "Class retrieved successfully"))),
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(error_response("Failed to get class", &e)),
    }
}
