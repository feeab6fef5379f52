use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::middlewares::RequireJWT;
use crate::models::schools::requests::SchoolListQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn list_schools(
    service: &SchoolService,
    request: &HttpRequest,
    query: SchoolListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    let member_filter = if user.is_platform_admin() {
        None
    } else {
        Some(user.id)
    };

    match storage.list_schools(member_filter, query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            page,
            "Schools retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to list schools", &e)),
    }
}
