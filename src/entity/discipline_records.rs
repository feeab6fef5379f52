//! 纪律事件

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "discipline_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub reported_by: i64,
    pub incident_date: Date,
    pub category: String,
    pub severity: String,
    pub description: String,
    pub action_taken: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
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
    pub fn into_discipline_record(self) -> crate::models::discipline::entities::DisciplineRecord {
        use crate::models::discipline::entities::{
            DisciplineRecord, DisciplineSeverity, DisciplineStatus,
        };
        use crate::models::from_unix;

        DisciplineRecord {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            reported_by: self.reported_by,
            incident_date: self.incident_date,
            category: self.category,
            severity: self
                .severity
                .parse::<DisciplineSeverity>()
                .unwrap_or(DisciplineSeverity::Low),
            description: self.description,
            action_taken: self.action_taken,
            status: self
                .status
                .parse::<DisciplineStatus>()
                .unwrap_or(DisciplineStatus::Open),
            created_at: from_unix(self.created_at),
            updated_at: from_unix(self.updated_at),
        }
    }
}
