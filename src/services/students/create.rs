use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, check_class, clean, clean_email};
use crate::models::members::permissions::Permission;
use crate::models::students::requests::CreateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, error_response, tenant};
use crate::utils::validate::validate_required_text;

pub(crate) fn normalize_student(
    mut student: CreateStudentRequest,
) -> Result<CreateStudentRequest, String> {
    student.admission_number = student.admission_number.trim().to_string();
    student.first_name = student.first_name.trim().to_string();
    student.last_name = student.last_name.trim().to_string();
    validate_required_text("admission_number", &student.admission_number, 50)?;
    validate_required_text("first_name", &student.first_name, 100)?;
    validate_required_text("last_name", &student.last_name, 100)?;
    student.address = clean(student.address);
    student.phone = clean(student.phone);
    student.email = clean_email(student.email)?;
    Ok(student)
}

pub(crate) fn admission_conflict() -> HttpResponse {
    conflict(
        ErrorCode::AdmissionNumberAlreadyExists,
        "Admission number already exists",
    )
}

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    student: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        student.school_id,
        Permission::ManageStudents,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    let student = match normalize_student(student) {
        Ok(student) => student,
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    };
    if let Err(resp) = check_class(&storage, ctx.school_id(), student.class_id).await {
        return Ok(resp);
    }

    match storage.create_student(ctx.school_id(), student).await {
        Ok(student) => {
            info!(
                "Student {} admitted to school {} by user {}",
                student.admission_number,
                ctx.school_id(),
                ctx.user_id()
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(student, "Student created successfully")))
        }
        Err(e) if e.is_unique_violation() => Ok(admission_conflict()),
        Err(e) => Ok(error_response("Failed to create student", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateStudentRequest {
        CreateStudentRequest {
            school_id: Some(1),
            admission_number: " ADM-001 ".into(),
            first_name: " Ada ".into(),
            last_name: "Obi".into(),
            gender: None,
            date_of_birth: None,
            class_id: None,
            admission_date: None,
            address: Some("   ".into()),
            phone: None,
            email: Some("ADA@HOME.ORG".into()),
        }
    }

    #[test]
    fn test_normalize_student() {
        let student = normalize_student(request()).unwrap();
        assert_eq!(student.admission_number, "ADM-001");
        assert_eq!(student.first_name, "Ada");
        assert_eq!(student.address, None);
        assert_eq!(student.email.as_deref(), Some("ada@home.org"));
    }

    #[test]
    fn test_normalize_student_requires_names() {
        let mut req = request();
        req.last_name = "  ".into();
        assert_eq!(normalize_student(req).unwrap_err(), "last_name is required");
    }
}
