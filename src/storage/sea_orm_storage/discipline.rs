use super::{SeaOrmStorage, db_error, now};
use crate::entity::discipline_records::{ActiveModel, Column, Entity as DisciplineRecords};
use crate::errors::Result;
use crate::models::discipline::{
    entities::{DisciplineRecord, DisciplineStatus},
    requests::{CreateDisciplineRecordRequest, DisciplineListQuery, UpdateDisciplineRecordRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn list_discipline_records_impl(
        &self,
        school_id: i64,
        query: DisciplineListQuery,
    ) -> Result<Vec<DisciplineRecord>> {
        let mut select = DisciplineRecords::find().filter(Column::SchoolId.eq(school_id));

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let records = select
            .order_by_desc(Column::IncidentDate)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list discipline records"))?;

        Ok(records
            .into_iter()
            .map(|m| m.into_discipline_record())
            .collect())
    }

    pub async fn get_discipline_record_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<DisciplineRecord>> {
        let record = DisciplineRecords::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load discipline record"))?;

        Ok(record.map(|m| m.into_discipline_record()))
    }

    pub async fn create_discipline_record_impl(
        &self,
        school_id: i64,
        reported_by: i64,
        req: CreateDisciplineRecordRequest,
    ) -> Result<DisciplineRecord> {
        let now = now();

        let record = ActiveModel {
            school_id: Set(school_id),
            student_id: Set(req.student_id),
            reported_by: Set(reported_by),
            incident_date: Set(req.incident_date),
            category: Set(req.category),
            severity: Set(req.severity.to_string()),
            description: Set(req.description),
            action_taken: Set(req.action_taken),
            status: Set(DisciplineStatus::Open.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error("Failed to create discipline record"))?;

        Ok(record.into_discipline_record())
    }

    pub async fn update_discipline_record_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateDisciplineRecordRequest,
    ) -> Result<Option<DisciplineRecord>> {
        let Some(existing) = DisciplineRecords::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load discipline record"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now());
        if let Some(category) = update.category {
            model.category = Set(category);
        }
        if let Some(severity) = update.severity {
            model.severity = Set(severity.to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(action_taken) = update.action_taken {
            model.action_taken = Set(Some(action_taken));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("Failed to update discipline record"))?;

        Ok(Some(updated.into_discipline_record()))
    }

    pub async fn delete_discipline_record_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = DisciplineRecords::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to delete discipline record"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_open_discipline_records_impl(&self, school_id: i64) -> Result<u64> {
        DisciplineRecords::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Status.ne(DisciplineStatus::Resolved.to_string()))
            .count(&self.db)
            .await
            .map_err(db_error("Failed to count discipline records"))
    }
}
