use super::entities::SchoolRole;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/member.ts")]
pub struct StaffListQuery {
    pub school_id: Option<i64>,
    pub role: Option<SchoolRole>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/member.ts")]
pub struct AddStaffRequest {
    pub school_id: Option<i64>,
    /// 已有账号的用户名或邮箱
    pub identifier: String,
    pub role: SchoolRole,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/member.ts")]
pub struct UpdateStaffRequest {
    pub school_id: Option<i64>,
    pub role: Option<SchoolRole>,
    pub is_active: Option<bool>,
}
