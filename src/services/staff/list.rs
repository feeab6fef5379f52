use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StaffService;
use crate::models::ApiResponse;
use crate::models::members::permissions::Permission;
use crate::models::members::requests::StaffListQuery;
use crate::services::{error_response, tenant};

pub async fn list_staff(
    service: &StaffService,
    request: &HttpRequest,
    query: StaffListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx =
        match tenant::authorize(request, &storage, query.school_id, Permission::ManageStaff).await
        {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

    match storage.list_staff(ctx.school_id(), query).await {
        Ok(staff) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            staff,
            "Staff retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to list staff", &e)),
    }
}
