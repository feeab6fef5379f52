use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found, tenant};

pub async fn get_school_by_slug(
    service: &SchoolService,
    request: &HttpRequest,
    slug: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let school = match storage.get_school_by_slug(&slug).await {
        Ok(Some(school)) => school,
        Ok(None) => return Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => return Ok(error_response("Failed to get school", &e)),
    };

    // 成员校验与其他租户请求走同一路径
    let ctx = match tenant::require_member(request, &storage, Some(school.id)).await {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ctx.school,
        "School retrieved successfully",
    )))
}
