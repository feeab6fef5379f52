use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamListQuery {
    pub school_id: Option<i64>,
    pub term_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct CreateExamRequest {
    pub school_id: Option<i64>,
    pub term_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub name: String,
    pub exam_date: Option<NaiveDate>,
    pub max_marks: f64,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct UpdateExamRequest {
    pub school_id: Option<i64>,
    pub name: Option<String>,
    pub exam_date: Option<NaiveDate>,
    pub max_marks: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct MarkEntry {
    pub student_id: i64,
    pub marks_obtained: f64,
    pub remarks: Option<String>,
}

/// 替换某次考试的全部成绩
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct SaveMarksRequest {
    pub school_id: Option<i64>,
    pub marks: Vec<MarkEntry>,
}
