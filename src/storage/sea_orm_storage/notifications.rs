use super::{SeaOrmStorage, db_error, now};
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    notifications::{
        entities::{Notification, NotificationKind},
        requests::NotificationListQuery,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn list_notifications_impl(
        &self,
        school_id: i64,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<PaginatedResponse<Notification>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Notifications::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::UserId.eq(user_id));
        if query.unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("Failed to count notifications"))?;
        let notifications = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("Failed to list notifications"))?;

        Ok(PaginatedResponse {
            items: notifications
                .into_iter()
                .map(|m| m.into_notification())
                .collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn count_unread_notifications_impl(
        &self,
        school_id: i64,
        user_id: i64,
    ) -> Result<i64> {
        let count = Notifications::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(db_error("Failed to count unread notifications"))?;

        Ok(count as i64)
    }

    pub async fn create_notifications_impl(
        &self,
        school_id: i64,
        user_ids: &[i64],
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Result<usize> {
        let now = now();
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        for &user_id in user_ids {
            ActiveModel {
                school_id: Set(school_id),
                user_id: Set(user_id),
                title: Set(title.to_string()),
                message: Set(message.to_string()),
                kind: Set(kind.to_string()),
                is_read: Set(false),
                read_at: Set(None),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_error("Failed to create notification"))?;
        }

        txn.commit()
            .await
            .map_err(db_error("Failed to commit notifications"))?;

        Ok(user_ids.len())
    }

    pub async fn mark_notification_read_impl(
        &self,
        school_id: i64,
        user_id: i64,
        id: i64,
    ) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .col_expr(Column::ReadAt, Expr::value(now()))
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to mark notification read"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn mark_all_notifications_read_impl(
        &self,
        school_id: i64,
        user_id: i64,
    ) -> Result<u64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .col_expr(Column::ReadAt, Expr::value(now()))
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to mark notifications read"))?;

        Ok(result.rows_affected)
    }
}
