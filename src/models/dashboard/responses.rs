use crate::models::attendance::entities::AttendanceSummary;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardResponse {
    pub school_id: i64,
    pub active_students: i64,
    pub active_staff: i64,
    pub active_classes: i64,
    pub attendance_today: AttendanceSummary,
    /// 未付与部分付款发票的余额合计
    pub outstanding_balance: i64,
    pub open_discipline_records: i64,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
