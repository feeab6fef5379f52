use super::{SeaOrmStorage, db_error, now};
use crate::entity::attendance_records::{ActiveModel, Column, Entity as AttendanceRecords};
use crate::errors::Result;
use crate::models::attendance::{
    entities::{AttendanceRecord, AttendanceSummary},
    requests::{AttendanceEntry, AttendanceSummaryQuery},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn list_attendance_impl(
        &self,
        school_id: i64,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        let records = AttendanceRecords::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Date.eq(date))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to load attendance"))?;

        Ok(records
            .into_iter()
            .map(|m| m.into_attendance_record())
            .collect())
    }

    pub async fn save_attendance_impl(
        &self,
        school_id: i64,
        class_id: i64,
        date: NaiveDate,
        recorded_by: i64,
        entries: Vec<AttendanceEntry>,
    ) -> Result<Vec<AttendanceRecord>> {
        let now = now();
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        AttendanceRecords::delete_many()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Date.eq(date))
            .exec(&txn)
            .await
            .map_err(db_error("Failed to clear attendance"))?;

        let mut saved = Vec::with_capacity(entries.len());
        for entry in entries {
            let record = ActiveModel {
                school_id: Set(school_id),
                class_id: Set(class_id),
                student_id: Set(entry.student_id),
                date: Set(date),
                status: Set(entry.status.to_string()),
                remarks: Set(entry.remarks),
                recorded_by: Set(recorded_by),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_error("Failed to save attendance"))?;
            saved.push(record.into_attendance_record());
        }

        txn.commit()
            .await
            .map_err(db_error("Failed to commit attendance"))?;

        Ok(saved)
    }

    pub async fn attendance_summary_impl(
        &self,
        school_id: i64,
        query: &AttendanceSummaryQuery,
    ) -> Result<AttendanceSummary> {
        let mut select = AttendanceRecords::find().filter(Column::SchoolId.eq(school_id));

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(from) = query.from {
            select = select.filter(Column::Date.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::Date.lte(to));
        }

        let records = select
            .all(&self.db)
            .await
            .map_err(db_error("Failed to load attendance"))?;

        Ok(AttendanceSummary::from_statuses(
            records.iter().map(|r| r.attendance_status()),
        ))
    }
}
