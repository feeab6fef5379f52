//! 学生每日班级考勤

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub student_id: i64,
    pub date: Date,
    pub status: String,
    pub remarks: Option<String>,
    pub recorded_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn attendance_status(&self) -> crate::models::attendance::entities::AttendanceStatus {
        use crate::models::attendance::entities::AttendanceStatus;
        self.status
            .parse::<AttendanceStatus>()
            .unwrap_or(AttendanceStatus::Absent)
    }

    pub fn into_attendance_record(self) -> crate::models::attendance::entities::AttendanceRecord {
        use crate::models::attendance::entities::AttendanceRecord;
        use crate::models::from_unix;

        AttendanceRecord {
            status: self.attendance_status(),
            id: self.id,
            school_id: self.school_id,
            class_id: self.class_id,
            student_id: self.student_id,
            date: self.date,
            remarks: self.remarks,
            recorded_by: self.recorded_by,
            created_at: from_unix(self.created_at),
        }
    }
}
