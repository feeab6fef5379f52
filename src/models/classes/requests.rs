use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub school_id: Option<i64>,
    pub academic_year_id: Option<i64>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub school_id: Option<i64>,
    pub academic_year_id: Option<i64>,
    pub name: String,
    pub grade_level: Option<i32>,
    pub section: Option<String>,
    pub class_teacher_id: Option<i64>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub school_id: Option<i64>,
    pub academic_year_id: Option<i64>,
    pub name: Option<String>,
    pub grade_level: Option<i32>,
    pub section: Option<String>,
    pub class_teacher_id: Option<i64>,
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}
