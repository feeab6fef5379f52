use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ExamService, valid_max_marks};
use crate::models::exams::requests::{CreateExamRequest, ExamListQuery, UpdateExamRequest};
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::{bad_request, error_response, not_found, tenant};
use crate::storage::Storage;
use crate::utils::validate::validate_required_text;

/// 学期、班级和科目都必须属于该学校
async fn check_references(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    exam: &CreateExamRequest,
) -> Result<(), HttpResponse> {
    let context = "Failed to create exam";
    match storage.get_term(school_id, exam.term_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(bad_request(ErrorCode::TermNotFound, "Term not found")),
        Err(e) => return Err(error_response(context, &e)),
    }
    match storage.get_class(school_id, exam.class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(bad_request(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Err(error_response(context, &e)),
    }
    match storage.get_subject(school_id, exam.subject_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(bad_request(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Err(error_response(context, &e)),
    }
}

pub async fn list_exams(
    service: &ExamService,
    request: &HttpRequest,
    query: ExamListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, query.school_id, Permission::ViewMarks)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.list_exams(ctx.school_id(), query).await {
        Ok(exams) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(exams, "Exams retrieved successfully"))),
        Err(e) => Ok(error_response("Failed to list exams", &e)),
    }
}

pub async fn create_exam(
    service: &ExamService,
    request: &HttpRequest,
    mut exam: CreateExamRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        exam.school_id,
        Permission::ManageAcademics,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    exam.name = exam.name.trim().to_string();
    if let Err(msg) = validate_required_text("name", &exam.name, 100) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if !valid_max_marks(exam.max_marks) {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "max_marks must be greater than zero",
        ));
    }
    if let Err(resp) = check_references(&storage, ctx.school_id(), &exam).await {
        return Ok(resp);
    }

    match storage.create_exam(ctx.school_id(), exam).await {
        Ok(exam) => {
            info!(
                "Exam {} created for class {} in school {}",
                exam.name,
                exam.class_id,
                ctx.school_id()
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(exam, "Exam created successfully")))
        }
        Err(e) => Ok(error_response("Failed to create exam", &e)),
    }
}

pub async fn get_exam(
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
        Ok(Some(exam)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(exam, "Exam retrieved successfully"))),
        Ok(None) => Ok(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => Ok(error_response("Failed to get exam", &e)),
    }
}

pub async fn update_exam(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
    mut update: UpdateExamRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        update.school_id,
        Permission::ManageAcademics,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    if let Some(name) = update.name.as_mut() {
        *name = name.trim().to_string();
        if let Err(msg) = validate_required_text("name", name, 100) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }

    if let Some(max_marks) = update.max_marks {
        if !valid_max_marks(max_marks) {
            return Ok(bad_request(
                ErrorCode::BadRequest,
                "max_marks must be greater than zero",
            ));
        }
        // 已录入的成绩不能超过新的满分
        match storage.list_marks(ctx.school_id(), exam_id).await {
            Ok(marks) if marks.iter().any(|m| m.marks_obtained > max_marks) => {
                return Ok(bad_request(
                    ErrorCode::MarksOutOfRange,
                    "Existing marks exceed the new max_marks",
                ));
            }
            Ok(_) => {}
            Err(e) => return Ok(error_response("Failed to update exam", &e)),
        }
    }

    match storage.update_exam(ctx.school_id(), exam_id, update).await {
        Ok(Some(exam)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(exam, "Exam updated successfully"))),
        Ok(None) => Ok(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => Ok(error_response("Failed to update exam", &e)),
    }
}

pub async fn delete_exam(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        scope.school_id,
        Permission::ManageAcademics,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.delete_exam(ctx.school_id(), exam_id).await {
        Ok(true) => {
            info!(
                "Exam {} deleted from school {} by user {}",
                exam_id,
                ctx.school_id(),
                ctx.user_id()
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::<()>::success_empty("Exam deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => Ok(error_response("Failed to delete exam", &e)),
    }
}
