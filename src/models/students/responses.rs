use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct ImportRowError {
    /// 数据行号，从 1 开始，不含表头
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentImportResponse {
    pub created: usize,
    pub skipped: usize,
    pub errors: Vec<ImportRowError>,
}
