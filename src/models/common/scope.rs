use serde::Deserialize;
use ts_rs::TS;

/// 只需要 `?school_id=` 的路由使用
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct SchoolScopeQuery {
    pub school_id: Option<i64>,
}
