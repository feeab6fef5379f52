pub mod inbox;
pub mod send;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::SchoolScopeQuery;
use crate::models::notifications::requests::{NotificationListQuery, SendNotificationRequest};
use crate::storage::Storage;

pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_notifications(
        &self,
        request: &HttpRequest,
        query: NotificationListQuery,
    ) -> ActixResult<HttpResponse> {
        inbox::list_notifications(self, request, query).await
    }

    pub async fn unread_count(
        &self,
        request: &HttpRequest,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        inbox::unread_count(self, request, scope).await
    }

    pub async fn mark_read(
        &self,
        request: &HttpRequest,
        notification_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        inbox::mark_read(self, request, notification_id, scope).await
    }

    pub async fn mark_all_read(
        &self,
        request: &HttpRequest,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        inbox::mark_all_read(self, request, scope).await
    }

    pub async fn send_notification(
        &self,
        request: &HttpRequest,
        notification: SendNotificationRequest,
    ) -> ActixResult<HttpResponse> {
        send::send_notification(self, request, notification).await
    }
}
