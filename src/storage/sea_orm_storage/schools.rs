use super::{SeaOrmStorage, db_error, now};
use crate::entity::school_members::{self, Entity as SchoolMembers};
use crate::entity::schools::{ActiveModel, Column, Entity as Schools};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    members::entities::SchoolRole,
    schools::{
        entities::School,
        requests::{CreateSchoolRequest, SchoolListQuery, UpdateSchoolRequest},
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_school_impl(
        &self,
        creator_id: i64,
        req: CreateSchoolRequest,
    ) -> Result<School> {
        let now = now();
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let school = ActiveModel {
            name: Set(req.name),
            slug: Set(req.slug),
            address: Set(req.address),
            phone: Set(req.phone),
            email: Set(req.email),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_error("Failed to create school"))?;

        school_members::ActiveModel {
            school_id: Set(school.id),
            user_id: Set(creator_id),
            role: Set(SchoolRole::Admin.to_string()),
            is_active: Set(true),
            joined_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_error("Failed to create school admin membership"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit school creation"))?;

        Ok(school.into_school())
    }

    pub async fn get_school_by_id_impl(&self, id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load school"))?;

        Ok(result.map(|m| m.into_school()))
    }

    pub async fn get_school_by_slug_impl(&self, slug: &str) -> Result<Option<School>> {
        let result = Schools::find()
            .filter(Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load school"))?;

        Ok(result.map(|m| m.into_school()))
    }

    pub async fn list_schools_impl(
        &self,
        member_user_id: Option<i64>,
        query: SchoolListQuery,
    ) -> Result<PaginatedResponse<School>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Schools::find();

        if let Some(user_id) = member_user_id {
            let school_ids: Vec<i64> = SchoolMembers::find()
                .select_only()
                .column(school_members::Column::SchoolId)
                .filter(school_members::Column::UserId.eq(user_id))
                .filter(school_members::Column::IsActive.eq(true))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(db_error("Failed to load memberships"))?;
            select = select.filter(Column::Id.is_in(school_ids));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(pattern)))
                    .add(Column::Slug.like(contains_pattern(pattern))),
            );
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("Failed to count schools"))?;
        let schools = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("Failed to list schools"))?;

        Ok(PaginatedResponse {
            items: schools.into_iter().map(|m| m.into_school()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_school_impl(
        &self,
        id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        let Some(existing) = Schools::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load school"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now());
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("Failed to update school"))?;

        Ok(Some(updated.into_school()))
    }
}
