pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::SchoolScopeQuery;
use crate::models::classes::requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::bad_request;
use crate::services::tenant;
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, request, query).await
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        class: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, request, class).await
    }

    pub async fn get_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        get::get_class(self, request, class_id, scope).await
    }

    pub async fn update_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, request, class_id, update).await
    }

    pub async fn delete_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(self, request, class_id, scope).await
    }
}

/// 若指定容量，必须为正数
pub(crate) fn check_capacity(capacity: Option<i32>) -> Result<(), HttpResponse> {
    match capacity {
        Some(capacity) if capacity <= 0 => Err(bad_request(
            ErrorCode::BadRequest,
            "capacity must be a positive number",
        )),
        _ => Ok(()),
    }
}

/// 班主任必须是该校的有效成员
pub(crate) async fn check_class_teacher(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    teacher_id: Option<i64>,
) -> Result<(), HttpResponse> {
    let Some(teacher_id) = teacher_id else {
        return Ok(());
    };
    if tenant::is_active_member(storage, school_id, teacher_id).await? {
        Ok(())
    } else {
        Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::NotSchoolMember,
            "Class teacher must be an active member of the school",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_capacity() {
        assert!(check_capacity(None).is_ok());
        assert!(check_capacity(Some(35)).is_ok());
        assert!(check_capacity(Some(0)).is_err());
        assert!(check_capacity(Some(-4)).is_err());
    }
}
