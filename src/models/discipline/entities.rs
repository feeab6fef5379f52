use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/discipline.ts")]
pub enum DisciplineSeverity {
    Low,
    Medium,
    High,
}

string_enum!(DisciplineSeverity {
    Low => "low",
    Medium => "medium",
    High => "high",
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/discipline.ts")]
pub enum DisciplineStatus {
    Open,
    UnderReview,
    Resolved,
}

string_enum!(DisciplineStatus {
    Open => "open",
    UnderReview => "under_review",
    Resolved => "resolved",
});

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/discipline.ts")]
pub struct DisciplineRecord {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub reported_by: i64,
    pub incident_date: NaiveDate,
    pub category: String,
    pub severity: DisciplineSeverity,
    pub description: String,
    pub action_taken: Option<String>,
    pub status: DisciplineStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
