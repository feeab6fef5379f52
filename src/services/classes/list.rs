use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::ApiResponse;
use crate::models::classes::requests::ClassListQuery;
use crate::services::{error_response, tenant};

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::require_member(request, &storage, query.school_id).await {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.list_classes(ctx.school_id(), query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            page,
            "Classes retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to list classes", &e)),
    }
}
