use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::SchoolScopeQuery;
use crate::models::notifications::requests::{NotificationListQuery, SendNotificationRequest};
use crate::services::NotificationService;
use crate::utils::SafeIDI64;

static NOTIFICATION_SERVICE: Lazy<NotificationService> =
    Lazy::new(NotificationService::new_lazy);

pub async fn list_notifications(
    req: HttpRequest,
    query: web::Query<NotificationListQuery>,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE
        .list_notifications(&req, query.into_inner())
        .await
}

pub async fn unread_count(
    req: HttpRequest,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE
        .unread_count(&req, scope.into_inner())
        .await
}

pub async fn send_notification(
    req: HttpRequest,
    notification: web::Json<SendNotificationRequest>,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE
        .send_notification(&req, notification.into_inner())
        .await
}

pub async fn mark_read(
    req: HttpRequest,
    notification_id: SafeIDI64,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE
        .mark_read(&req, notification_id.0, scope.into_inner())
        .await
}

pub async fn mark_all_read(
    req: HttpRequest,
    scope: web::Query<SchoolScopeQuery>,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE
        .mark_all_read(&req, scope.into_inner())
        .await
}

pub fn configure_notification_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notifications")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_notifications))
                    .route(
                        web::post()
                            .to(send_notification)
                            .wrap(middlewares::RateLimit::api()),
                    ),
            )
            .route("/unread-count", web::get().to(unread_count))
            .route("/read-all", web::put().to(mark_all_read))
            .route("/{id}/read", web::put().to(mark_read)),
    );
}
