//! 当前用户自己的通知，学校的任何有效成员都可以查看。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::NotificationService;
use crate::models::notifications::requests::NotificationListQuery;
use crate::models::notifications::responses::{MarkAllReadResponse, UnreadCountResponse};
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::{error_response, not_found, tenant};

pub async fn list_notifications(
    service: &NotificationService,
    request: &HttpRequest,
    query: NotificationListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::require_member(request, &storage, query.school_id).await {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage
        .list_notifications(ctx.school_id(), ctx.user_id(), query)
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(page, "Notifications retrieved successfully"))),
        Err(e) => Ok(error_response("Failed to list notifications", &e)),
    }
}

pub async fn unread_count(
    service: &NotificationService,
    request: &HttpRequest,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::require_member(request, &storage, scope.school_id).await {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage
        .count_unread_notifications(ctx.school_id(), ctx.user_id())
        .await
    {
        Ok(unread_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse { unread_count },
            "Unread count retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to count notifications", &e)),
    }
}

pub async fn mark_read(
    service: &NotificationService,
    request: &HttpRequest,
    notification_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::require_member(request, &storage, scope.school_id).await {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    // 他人的通知按不存在处理
    match storage
        .mark_notification_read(ctx.school_id(), ctx.user_id(), notification_id)
        .await
    {
        Ok(true) => {
            debug!(
                "Notification {} marked read by user {}",
                notification_id,
                ctx.user_id()
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::<()>::success_empty("Notification marked as read")))
        }
        Ok(false) => Ok(not_found(
            ErrorCode::NotificationNotFound,
            "Notification not found",
        )),
        Err(e) => Ok(error_response("Failed to update notification", &e)),
    }
}

pub async fn mark_all_read(
    service: &NotificationService,
    request: &HttpRequest,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::require_member(request, &storage, scope.school_id).await {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage
        .mark_all_notifications_read(ctx.school_id(), ctx.user_id())
        .await
    {
        Ok(updated) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MarkAllReadResponse { updated },
            "All notifications marked as read",
        ))),
        Err(e) => Ok(error_response("Failed to update notifications", &e)),
    }
}
