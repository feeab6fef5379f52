pub mod create;
pub mod delete;
pub mod get;
pub mod guardians;
pub mod import;
pub mod list;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::SchoolScopeQuery;
use crate::models::students::requests::{
    CreateGuardianRequest, CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::storage::Storage;
use crate::utils::validate::validate_email;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, request, query).await
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        student: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, request, student).await
    }

    pub async fn get_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, request, student_id, scope).await
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
        update: UpdateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, request, student_id, update).await
    }

    pub async fn delete_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, request, student_id, scope).await
    }

    /// 从上传的 CSV 文件批量创建
    pub async fn import_students(
        &self,
        request: &HttpRequest,
        scope: SchoolScopeQuery,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        import::import_students(self, request, scope, payload).await
    }

    pub async fn list_guardians(
        &self,
        request: &HttpRequest,
        student_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        guardians::list_guardians(self, request, student_id, scope).await
    }

    pub async fn create_guardian(
        &self,
        request: &HttpRequest,
        student_id: i64,
        guardian: CreateGuardianRequest,
    ) -> ActixResult<HttpResponse> {
        guardians::create_guardian(self, request, student_id, guardian).await
    }

    pub async fn delete_guardian(
        &self,
        request: &HttpRequest,
        guardian_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        guardians::delete_guardian(self, request, guardian_id, scope).await
    }
}

/// 去除可选文本字段两端空白，为空时丢弃
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 可选的联系邮箱，转为小写
pub(crate) fn clean_email(value: Option<String>) -> Result<Option<String>, String> {
    match clean(value).map(|email| email.to_lowercase()) {
        Some(email) => {
            validate_email(&email).map_err(str::to_string)?;
            Ok(Some(email))
        }
        None => Ok(None),
    }
}

/// 若指定班级，必须属于该学校
pub(crate) async fn check_class(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    class_id: Option<i64>,
) -> Result<(), HttpResponse> {
    let Some(class_id) = class_id else {
        return Ok(());
    };
    match storage.get_class(school_id, class_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class does not belong to this school",
        ))),
        Err(e) => Err(error_response("Failed to load class", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean(Some("  12 Oak Road ".into())).as_deref(), Some("12 Oak Road"));
        assert_eq!(clean(Some("   ".into())), None);
        assert_eq!(clean(None), None);
    }

    #[test]
    fn test_clean_email() {
        assert_eq!(
            clean_email(Some(" Parent@Mail.COM ".into())).unwrap().as_deref(),
            Some("parent@mail.com")
        );
        assert_eq!(clean_email(Some(String::new())).unwrap(), None);
        assert!(clean_email(Some("not-an-email".into())).is_err());
    }
}
