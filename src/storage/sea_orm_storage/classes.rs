use super::{SeaOrmStorage, db_error, now};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn list_classes_impl(
        &self,
        school_id: i64,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Classes::find().filter(Column::SchoolId.eq(school_id));

        if let Some(year_id) = query.academic_year_id {
            select = select.filter(Column::AcademicYearId.eq(year_id));
        }
        if !query.include_inactive {
            select = select.filter(Column::IsActive.eq(true));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.like(contains_pattern(search.trim())));
        }

        let paginator = select
            .order_by_asc(Column::GradeLevel)
            .order_by_asc(Column::Name)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("Failed to count classes"))?;
        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("Failed to list classes"))?;

        Ok(PaginatedResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn get_class_impl(&self, school_id: i64, id: i64) -> Result<Option<Class>> {
        let class = Classes::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load class"))?;

        Ok(class.map(|m| m.into_class()))
    }

    pub async fn get_class_by_name_impl(&self, school_id: i64, name: &str) -> Result<Option<Class>> {
        let class = Classes::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load class"))?;

        Ok(class.map(|m| m.into_class()))
    }

    pub async fn create_class_impl(&self, school_id: i64, req: CreateClassRequest) -> Result<Class> {
        let now = now();

        let class = ActiveModel {
            school_id: Set(school_id),
            academic_year_id: Set(req.academic_year_id),
            name: Set(req.name),
            grade_level: Set(req.grade_level),
            section: Set(req.section),
            class_teacher_id: Set(req.class_teacher_id),
            capacity: Set(req.capacity),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error("Failed to create class"))?;

        Ok(class.into_class())
    }

    pub async fn update_class_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        let Some(existing) = Classes::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load class"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now());
        if let Some(year_id) = update.academic_year_id {
            model.academic_year_id = Set(Some(year_id));
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(Some(grade_level));
        }
        if let Some(section) = update.section {
            model.section = Set(Some(section));
        }
        if let Some(teacher_id) = update.class_teacher_id {
            model.class_teacher_id = Set(Some(teacher_id));
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(Some(capacity));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("Failed to update class"))?;

        Ok(Some(updated.into_class()))
    }

    pub async fn deactivate_class_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Classes::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(now()))
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to deactivate class"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_active_classes_impl(&self, school_id: i64) -> Result<u64> {
        Classes::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(db_error("Failed to count classes"))
    }
}
