//! 学校内的个人通知

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub read_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notification(self) -> crate::models::notifications::entities::Notification {
        use crate::models::from_unix;
        use crate::models::notifications::entities::{Notification, NotificationKind};

        Notification {
            id: self.id,
            school_id: self.school_id,
            user_id: self.user_id,
            title: self.title,
            message: self.message,
            kind: self.kind.parse::<NotificationKind>().unwrap_or_default(),
            is_read: self.is_read,
            read_at: self.read_at.map(from_unix),
            created_at: from_unix(self.created_at),
        }
    }
}
