use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::ApiResponse;
use crate::models::members::permissions::Permission;
use crate::models::students::requests::StudentListQuery;
use crate::services::{error_response, tenant};

pub async fn list_students(
    service: &StudentService,
    request: &HttpRequest,
    query: StudentListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, query.school_id, Permission::ViewStudents)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.list_students(ctx.school_id(), query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            page,
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to list students", &e)),
    }
}
