use super::{SeaOrmStorage, db_error, now};
use crate::entity::timetable_entries::{ActiveModel, Column, Entity as TimetableEntries};
use crate::errors::Result;
use crate::models::timetable::{
    entities::TimetableEntry,
    requests::{CreateTimetableEntryRequest, TimetableQuery, UpdateTimetableEntryRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn list_timetable_impl(
        &self,
        school_id: i64,
        query: TimetableQuery,
    ) -> Result<Vec<TimetableEntry>> {
        let mut select = TimetableEntries::find().filter(Column::SchoolId.eq(school_id));

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        let entries = select
            .order_by_asc(Column::DayOfWeek)
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to load timetable"))?;

        Ok(entries
            .into_iter()
            .map(|m| m.into_timetable_entry())
            .collect())
    }

    pub async fn get_timetable_entry_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<TimetableEntry>> {
        let entry = TimetableEntries::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load timetable entry"))?;

        Ok(entry.map(|m| m.into_timetable_entry()))
    }

    pub async fn list_timetable_day_impl(
        &self,
        school_id: i64,
        day_of_week: i32,
        class_id: i64,
        teacher_id: Option<i64>,
    ) -> Result<Vec<TimetableEntry>> {
        let mut owners = Condition::any().add(Column::ClassId.eq(class_id));
        if let Some(teacher_id) = teacher_id {
            owners = owners.add(Column::TeacherId.eq(teacher_id));
        }

        let entries = TimetableEntries::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::DayOfWeek.eq(day_of_week))
            .filter(owners)
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to load timetable"))?;

        Ok(entries
            .into_iter()
            .map(|m| m.into_timetable_entry())
            .collect())
    }

    pub async fn create_timetable_entry_impl(
        &self,
        school_id: i64,
        req: CreateTimetableEntryRequest,
    ) -> Result<TimetableEntry> {
        let now = now();

        let entry = ActiveModel {
            school_id: Set(school_id),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            teacher_id: Set(req.teacher_id),
            day_of_week: Set(req.day_of_week),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            room: Set(req.room),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error("Failed to create timetable entry"))?;

        Ok(entry.into_timetable_entry())
    }

    pub async fn update_timetable_entry_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateTimetableEntryRequest,
    ) -> Result<Option<TimetableEntry>> {
        let Some(existing) = TimetableEntries::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load timetable entry"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now());
        if let Some(subject_id) = update.subject_id {
            model.subject_id = Set(subject_id);
        }
        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(Some(teacher_id));
        }
        if let Some(day) = update.day_of_week {
            model.day_of_week = Set(day);
        }
        if let Some(start_time) = update.start_time {
            model.start_time = Set(start_time);
        }
        if let Some(end_time) = update.end_time {
            model.end_time = Set(end_time);
        }
        if let Some(room) = update.room {
            model.room = Set(Some(room));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("Failed to update timetable entry"))?;

        Ok(Some(updated.into_timetable_entry()))
    }

    pub async fn delete_timetable_entry_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = TimetableEntries::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to delete timetable entry"))?;

        Ok(result.rows_affected > 0)
    }
}
