use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ExamService;
use crate::models::exams::requests::{MarkEntry, SaveMarksRequest};
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::{bad_request, error_response, not_found, tenant};

/// 每个成绩都在 `0..=max_marks` 之内，每个学生最多出现一次
fn validate_marks(max_marks: f64, entries: &[MarkEntry]) -> Result<(), (ErrorCode, String)> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.student_id) {
            return Err((
                ErrorCode::BadRequest,
                format!("Student {} appears more than once", entry.student_id),
            ));
        }
        let marks = entry.marks_obtained;
        if !marks.is_finite() || marks < 0.0 || marks > max_marks {
            return Err((
                ErrorCode::MarksOutOfRange,
                format!(
                    "Marks for student {} must be between 0 and {}",
                    entry.student_id, max_marks
                ),
            ));
        }
    }
    Ok(())
}

pub async fn list_marks(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, scope.school_id, Permission::ViewMarks)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.get_exam(ctx.school_id(), exam_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => return Ok(error_response("Failed to list marks", &e)),
    }

    match storage.list_marks(ctx.school_id(), exam_id).await {
        Ok(marks) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(marks, "Marks retrieved successfully"))),
        Err(e) => Ok(error_response("Failed to list marks", &e)),
    }
}

pub async fn save_marks(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
    marks: SaveMarksRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, marks.school_id, Permission::EnterMarks)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    let exam = match storage.get_exam(ctx.school_id(), exam_id).await {
        Ok(Some(exam)) => exam,
        Ok(None) => return Ok(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => return Ok(error_response("Failed to save marks", &e)),
    };

    if let Err((code, msg)) = validate_marks(exam.max_marks, &marks.marks) {
        return Ok(bad_request(code, msg));
    }

    let ids: Vec<i64> = marks.marks.iter().map(|m| m.student_id).collect();
    let known: HashSet<i64> = match storage.existing_student_ids(ctx.school_id(), &ids).await {
        Ok(known) => known.into_iter().collect(),
        Err(e) => return Ok(error_response("Failed to save marks", &e)),
    };
    if let Some(missing) = ids.iter().find(|id| !known.contains(id)) {
        return Ok(bad_request(
            ErrorCode::StudentNotFound,
            format!("Student {missing} does not belong to this school"),
        ));
    }

    match storage
        .replace_marks(ctx.school_id(), exam_id, ctx.user_id(), marks.marks)
        .await
    {
        Ok(saved) => {
            info!(
                "{} marks saved for exam {} by user {}",
                saved.len(),
                exam_id,
                ctx.user_id()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(saved, "Marks saved successfully")))
        }
        Err(e) => Ok(error_response("Failed to save marks", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(student_id: i64, marks_obtained: f64) -> MarkEntry {
        MarkEntry {
            student_id,
            marks_obtained,
            remarks: None,
        }
    }

    #[test]
    fn test_marks_within_range() {
        assert!(validate_marks(50.0, &[entry(1, 0.0), entry(2, 50.0), entry(3, 31.5)]).is_ok());
    }

    #[test]
    fn test_marks_out_of_range() {
        let (code, _) = validate_marks(50.0, &[entry(1, 50.5)]).unwrap_err();
        assert_eq!(code, ErrorCode::MarksOutOfRange);
        let (code, _) = validate_marks(50.0, &[entry(1, -1.0)]).unwrap_err();
        assert_eq!(code, ErrorCode::MarksOutOfRange);
    }

    #[test]
    fn test_duplicate_student_rejected() {
        let (code, msg) = validate_marks(50.0, &[entry(4, 10.0), entry(4, 12.0)]).unwrap_err();
        assert_eq!(code, ErrorCode::BadRequest);
        assert!(msg.contains("Student 4"));
    }
}
