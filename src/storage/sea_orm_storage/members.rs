use super::{SeaOrmStorage, db_error, now};
use crate::entity::school_members::{ActiveModel, Column, Entity as SchoolMembers, Model};
use crate::entity::schools::Entity as Schools;
use crate::entity::users::Entity as Users;
use crate::errors::{Result, SchoolHubError};
use crate::models::members::{
    entities::{MembershipSummary, SchoolMember, SchoolRole, StaffMember},
    requests::StaffListQuery,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashSet;

impl SeaOrmStorage {
    pub async fn get_membership_impl(
        &self,
        school_id: i64,
        user_id: i64,
    ) -> Result<Option<SchoolMember>> {
        let result = SchoolMembers::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load membership"))?;

        Ok(result.map(|m| m.into_member()))
    }

    pub async fn list_user_memberships_impl(
        &self,
        user_id: i64,
    ) -> Result<Vec<MembershipSummary>> {
        let rows = SchoolMembers::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsActive.eq(true))
            .find_also_related(Schools)
            .order_by_asc(Column::JoinedAt)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to load memberships"))?;

        Ok(rows
            .into_iter()
            .filter_map(|(member, school)| {
                let school = school.filter(|s| s.is_active)?;
                Some(MembershipSummary {
                    school_id: school.id,
                    school_name: school.name,
                    school_slug: school.slug,
                    role: member.into_member().role,
                })
            })
            .collect())
    }

    pub async fn list_staff_impl(
        &self,
        school_id: i64,
        query: StaffListQuery,
    ) -> Result<Vec<StaffMember>> {
        let mut select = SchoolMembers::find().filter(Column::SchoolId.eq(school_id));
        if !query.include_inactive {
            select = select.filter(Column::IsActive.eq(true));
        }
        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        let rows = select
            .find_also_related(Users)
            .order_by_asc(Column::JoinedAt)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list staff"))?;

        Ok(rows
            .into_iter()
            .filter_map(|(member, user)| {
                let user = user?;
                Some(StaffMember {
                    member: member.into_member(),
                    username: user.username,
                    email: user.email,
                    display_name: user.display_name,
                })
            })
            .collect())
    }

    async fn find_member_model<C: ConnectionTrait>(
        conn: &C,
        school_id: i64,
        member_id: i64,
    ) -> Result<Option<Model>> {
        SchoolMembers::find_by_id(member_id)
            .filter(Column::SchoolId.eq(school_id))
            .one(conn)
            .await
            .map_err(db_error("Failed to load staff member"))
    }

    pub async fn get_staff_member_impl(
        &self,
        school_id: i64,
        member_id: i64,
    ) -> Result<Option<SchoolMember>> {
        Ok(Self::find_member_model(&self.db, school_id, member_id)
            .await?
            .map(|m| m.into_member()))
    }

    pub async fn add_staff_impl(
        &self,
        school_id: i64,
        user_id: i64,
        role: SchoolRole,
    ) -> Result<SchoolMember> {
        let now = now();
        let existing = SchoolMembers::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load membership"))?;

        let saved = match existing {
            Some(member) if member.is_active => {
                return Err(SchoolHubError::conflict(
                    "User is already an active member of this school",
                ));
            }
            Some(member) => {
                let mut model: ActiveModel = member.into();
                model.role = Set(role.to_string());
                model.is_active = Set(true);
                model.updated_at = Set(now);
                model
                    .update(&self.db)
                    .await
                    .map_err(db_error("Failed to reactivate staff member"))?
            }
            None => ActiveModel {
                school_id: Set(school_id),
                user_id: Set(user_id),
                role: Set(role.to_string()),
                is_active: Set(true),
                joined_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(db_error("Failed to add staff member"))?,
        };

        Ok(saved.into_member())
    }

    pub async fn update_staff_impl(
        &self,
        school_id: i64,
        member_id: i64,
        role: Option<SchoolRole>,
        is_active: Option<bool>,
    ) -> Result<Option<SchoolMember>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let Some(member) = Self::find_member_model(&txn, school_id, member_id).await? else {
            return Ok(None);
        };

        let admin = SchoolRole::Admin.to_string();
        let was_active_admin = member.is_active && member.role == admin;
        let next_role = role.map(|r| r.to_string()).unwrap_or_else(|| member.role.clone());
        let next_active = is_active.unwrap_or(member.is_active);

        if was_active_admin && !(next_active && next_role == admin) {
            let other_admins = SchoolMembers::find()
                .filter(Column::SchoolId.eq(school_id))
                .filter(Column::Role.eq(admin.as_str()))
                .filter(Column::IsActive.eq(true))
                .filter(Column::Id.ne(member_id))
                .count(&txn)
                .await
                .map_err(db_error("Failed to count school admins"))?;
            if other_admins == 0 {
                return Err(SchoolHubError::validation(
                    "A school must keep at least one active admin",
                ));
            }
        }

        let mut model: ActiveModel = member.into();
        model.role = Set(next_role);
        model.is_active = Set(next_active);
        model.updated_at = Set(now());
        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("Failed to update staff member"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit staff update"))?;

        Ok(Some(updated.into_member()))
    }

    pub async fn count_active_staff_impl(&self, school_id: i64) -> Result<u64> {
        SchoolMembers::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(db_error("Failed to count staff"))
    }

    pub async fn resolve_member_user_ids_impl(
        &self,
        school_id: i64,
        user_ids: &[i64],
        roles: &[SchoolRole],
    ) -> Result<Vec<i64>> {
        if user_ids.is_empty() && roles.is_empty() {
            return Ok(Vec::new());
        }

        let mut audience = Condition::any();
        if !user_ids.is_empty() {
            audience = audience.add(Column::UserId.is_in(user_ids.to_vec()));
        }
        if !roles.is_empty() {
            audience = audience.add(Column::Role.is_in(roles.iter().map(|r| r.to_string())));
        }

        let members = SchoolMembers::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::IsActive.eq(true))
            .filter(audience)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to resolve recipients"))?;

        // 每个用户一条，按成员顺序
        let mut seen = HashSet::new();
        Ok(members
            .into_iter()
            .filter(|m| seen.insert(m.user_id))
            .map(|m| m.user_id)
            .collect())
    }
}
