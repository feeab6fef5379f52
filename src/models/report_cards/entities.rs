use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report_card.ts")]
pub struct ReportCard {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub term_id: i64,
    pub class_id: i64,
    pub total_obtained: f64,
    pub total_max: f64,
    pub percentage: f64,
    pub grade: String,
    pub rank: Option<i32>,
    pub remarks: Option<String>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
