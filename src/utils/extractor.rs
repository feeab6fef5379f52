//! 路径参数提取器：对格式错误的 id 返回标准 JSON 信封，
//! 而不是 actix 默认的纯文本 404。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.parse::<i64>().ok()).filter(|id| *id > 0)
}

fn invalid_param(name: &str) -> actix_web::Error {
    InternalError::from_response(
        format!("invalid path parameter `{name}`"),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Invalid path parameter: {name}"),
        )),
    )
    .into()
}

macro_rules! define_safe_id_extractor {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(
                        parse_positive_id(req.match_info().get($param))
                            .map($name)
                            .ok_or_else(|| invalid_param($param)),
                    )
                }
            }
        )*
    };
}

define_safe_id_extractor! {
    SafeIDI64 => "id",
    SafeStudentIdI64 => "student_id",
    SafeExamIdI64 => "exam_id",
}

/// `{slug}` 路径段，仅允许学校 slug 的字符集
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeSchoolSlug(pub String);

impl FromRequest for SafeSchoolSlug {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let slug = req
            .match_info()
            .get("slug")
            .filter(|s| crate::utils::validate::validate_slug(s).is_ok())
            .map(|s| SafeSchoolSlug(s.to_string()));
        ready(slug.ok_or_else(|| invalid_param("slug")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id(Some("42")), Some(42));
        assert_eq!(parse_positive_id(Some("0")), None);
        assert_eq!(parse_positive_id(Some("-3")), None);
        assert_eq!(parse_positive_id(Some("1; DROP")), None);
        assert_eq!(parse_positive_id(None), None);
    }

    #[actix_web::test]
    async fn test_extractor_reads_named_segment() {
        let req = actix_web::test::TestRequest::default()
            .param("id", "7")
            .to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeIDI64(7));

        let bad = actix_web::test::TestRequest::default()
            .param("id", "abc")
            .to_http_request();
        assert!(SafeIDI64::extract(&bad).await.is_err());
    }

    #[actix_web::test]
    async fn test_slug_extractor() {
        let req = actix_web::test::TestRequest::default()
            .param("slug", "green-valley")
            .to_http_request();
        assert_eq!(
            SafeSchoolSlug::extract(&req).await.unwrap().0,
            "green-valley"
        );

        let bad = actix_web::test::TestRequest::default()
            .param("slug", "Green Valley")
            .to_http_request();
        assert!(SafeSchoolSlug::extract(&bad).await.is_err());
    }
}
