use super::entities::NotificationKind;
use crate::models::common::PaginationQuery;
use crate::models::members::entities::SchoolRole;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct NotificationListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub school_id: Option<i64>,
    #[serde(default)]
    pub unread_only: bool,
}

/// 接收者为 `user_ids` 与持有 `roles` 中任一角色的有效成员的并集
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct SendNotificationRequest {
    pub school_id: Option<i64>,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub user_ids: Vec<i64>,
    #[serde(default)]
    pub roles: Vec<SchoolRole>,
}
