use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

/// 教职工在某个学校内的角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/member.ts")]
pub enum SchoolRole {
    Admin,
    Principal,
    Teacher,
    Accountant,
    Staff,
}

string_enum!(SchoolRole {
    Admin => "admin",
    Principal => "principal",
    Teacher => "teacher",
    Accountant => "accountant",
    Staff => "staff",
});

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/member.ts")]
pub struct SchoolMember {
    pub id: i64,
    pub school_id: i64,
    pub user_id: i64,
    pub role: SchoolRole,
    pub is_active: bool,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 成员身份及其对应的账号
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/member.ts")]
pub struct StaffMember {
    #[serde(flatten)]
    #[ts(flatten)]
    pub member: SchoolMember,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/member.ts")]
pub struct MembershipSummary {
    pub school_id: i64,
    pub school_name: String,
    pub school_slug: String,
    pub role: SchoolRole,
}
