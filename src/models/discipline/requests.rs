use super::entities::{DisciplineSeverity, DisciplineStatus};
use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/discipline.ts")]
pub struct DisciplineListQuery {
    pub school_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<DisciplineStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/discipline.ts")]
pub struct CreateDisciplineRecordRequest {
    pub school_id: Option<i64>,
    pub student_id: i64,
    pub incident_date: NaiveDate,
    pub category: String,
    pub severity: DisciplineSeverity,
    pub description: String,
    pub action_taken: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/discipline.ts")]
pub struct UpdateDisciplineRecordRequest {
    pub school_id: Option<i64>,
    pub category: Option<String>,
    pub severity: Option<DisciplineSeverity>,
    pub description: Option<String>,
    pub action_taken: Option<String>,
    pub status: Option<DisciplineStatus>,
}
