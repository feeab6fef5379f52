use super::{SeaOrmStorage, db_error, now};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::Result;
use crate::models::subjects::{
    entities::Subject,
    requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn list_subjects_impl(
        &self,
        school_id: i64,
        query: SubjectListQuery,
    ) -> Result<Vec<Subject>> {
        let mut select = Subjects::find().filter(Column::SchoolId.eq(school_id));

        if !query.include_inactive {
            select = select.filter(Column::IsActive.eq(true));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(pattern)))
                    .add(Column::Code.like(contains_pattern(pattern))),
            );
        }

        let subjects = select
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list subjects"))?;

        Ok(subjects.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn get_subject_impl(&self, school_id: i64, id: i64) -> Result<Option<Subject>> {
        let subject = Subjects::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load subject"))?;

        Ok(subject.map(|m| m.into_subject()))
    }

    pub async fn create_subject_impl(
        &self,
        school_id: i64,
        req: CreateSubjectRequest,
    ) -> Result<Subject> {
        let now = now();

        let subject = ActiveModel {
            school_id: Set(school_id),
            name: Set(req.name),
            code: Set(req.code),
            description: Set(req.description),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error("Failed to create subject"))?;

        Ok(subject.into_subject())
    }

    pub async fn update_subject_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        let Some(existing) = Subjects::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load subject"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now());
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("Failed to update subject"))?;

        Ok(Some(updated.into_subject()))
    }

    pub async fn deactivate_subject_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Subjects::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(now()))
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to deactivate subject"))?;

        Ok(result.rows_affected > 0)
    }
}
