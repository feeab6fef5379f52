use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report_card.ts")]
pub struct GenerateReportCardsRequest {
    pub school_id: Option<i64>,
    pub term_id: i64,
    pub class_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report_card.ts")]
pub struct ReportCardQuery {
    pub school_id: Option<i64>,
    pub term_id: Option<i64>,
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
}
