use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SchoolService;
use crate::middlewares::RequireJWT;
use crate::models::schools::requests::CreateSchoolRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, error_response};
use crate::utils::validate::{validate_email, validate_required_text, validate_slug};

pub async fn create_school(
    service: &SchoolService,
    request: &HttpRequest,
    school: CreateSchoolRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    let school = match normalize(school) {
        Ok(school) => school,
        Err(resp) => return Ok(resp),
    };

    match storage.get_school_by_slug(&school.slug).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::SchoolSlugAlreadyExists,
                "School slug already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response("Failed to create school", &e)),
    }

    match storage.create_school(user_id, school).await {
        Ok(school) => {
            info!("School {} created by user {}", school.slug, user_id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(school, "School created successfully")))
        }
        Err(e) if e.is_unique_violation() => Ok(conflict(
            ErrorCode::SchoolSlugAlreadyExists,
            "School slug already exists",
        )),
        Err(e) => Ok(error_response("Failed to create school", &e)),
    }
}

fn normalize(mut school: CreateSchoolRequest) -> Result<CreateSchoolRequest, HttpResponse> {
    school.name = school.name.trim().to_string();
    school.slug = school.slug.trim().to_string();
    school.email = school
        .email
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty());

    if let Err(msg) = validate_required_text("name", &school.name, 200) {
        return Err(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_slug(&school.slug) {
        return Err(bad_request(ErrorCode::SchoolSlugInvalid, msg));
    }
    if let Some(email) = &school.email
        && let Err(msg) = validate_email(email)
    {
        return Err(bad_request(ErrorCode::BadRequest, msg));
    }
    Ok(school)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    fn request(name: &str, slug: &str) -> CreateSchoolRequest {
        CreateSchoolRequest {
            name: name.into(),
            slug: slug.into(),
            address: None,
            phone: None,
            email: Some("  Office@Hillside.EDU ".into()),
        }
    }

    #[test]
    fn test_normalize_trims_and_lowercases_email() {
        let school = normalize(request("  Hillside High ", " hillside ")).unwrap();
        assert_eq!(school.name, "Hillside High");
        assert_eq!(school.slug, "hillside");
        assert_eq!(school.email.as_deref(), Some("office@hillside.edu"));
    }

    #[test]
    fn test_normalize_rejects_bad_slug() {
        let resp = normalize(request("Hillside", "Hill Side")).unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_normalize_rejects_blank_name() {
        let resp = normalize(request("   ", "hillside")).unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
