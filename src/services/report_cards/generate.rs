use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ReportCardService;
use crate::models::exams::requests::ExamListQuery;
use crate::models::members::permissions::Permission;
use crate::models::report_cards::grading::build_report_cards;
use crate::models::report_cards::requests::GenerateReportCardsRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found, tenant};

const CONTEXT: &str = "Failed to generate report cards";

pub async fn generate_report_cards(
    service: &ReportCardService,
    request: &HttpRequest,
    generate: GenerateReportCardsRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        generate.school_id,
        Permission::GenerateReports,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let school_id = ctx.school_id();

    match storage.get_term(school_id, generate.term_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
        Err(e) => return Ok(error_response(CONTEXT, &e)),
    }
    match storage.get_class(school_id, generate.class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(error_response(CONTEXT, &e)),
    }

    let exams = match storage
        .list_exams(
            school_id,
            ExamListQuery {
                school_id: Some(school_id),
                term_id: Some(generate.term_id),
                class_id: Some(generate.class_id),
                subject_id: None,
            },
        )
        .await
    {
        Ok(exams) => exams,
        Err(e) => return Ok(error_response(CONTEXT, &e)),
    };
    if exams.is_empty() {
        return Ok(bad_request(
            ErrorCode::ExamNotFound,
            "No exams found for this term and class",
        ));
    }

    let students = match storage
        .list_class_students(school_id, generate.class_id, true)
        .await
    {
        Ok(students) => students,
        Err(e) => return Ok(error_response(CONTEXT, &e)),
    };

    let exam_ids: Vec<i64> = exams.iter().map(|e| e.id).collect();
    let marks = match storage.list_marks_for_exams(school_id, &exam_ids).await {
        Ok(marks) => marks,
        Err(e) => return Ok(error_response(CONTEXT, &e)),
    };

    let student_ids: Vec<i64> = students.iter().map(|s| s.id).collect();
    let exam_max: Vec<(i64, f64)> = exams.iter().map(|e| (e.id, e.max_marks)).collect();
    let obtained: Vec<(i64, i64, f64)> = marks
        .iter()
        .map(|m| (m.exam_id, m.student_id, m.marks_obtained))
        .collect();
    let drafts = build_report_cards(&student_ids, &exam_max, &obtained);

    match storage
        .replace_report_cards(school_id, generate.term_id, generate.class_id, drafts)
        .await
    {
        Ok(cards) => {
            info!(
                "{} report cards generated for class {} term {} by user {}",
                cards.len(),
                generate.class_id,
                generate.term_id,
                ctx.user_id()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                cards,
                "Report cards generated successfully",
            )))
        }
        Err(e) => Ok(error_response(CONTEXT, &e)),
    }
}
