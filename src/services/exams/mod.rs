pub mod manage;
pub mod marks;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::SchoolScopeQuery;
use crate::models::exams::requests::{
    CreateExamRequest, ExamListQuery, SaveMarksRequest, UpdateExamRequest,
};
use crate::storage::Storage;

pub struct ExamService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExamService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_exams(
        &self,
        request: &HttpRequest,
        query: ExamListQuery,
    ) -> ActixResult<HttpResponse> {
        manage::list_exams(self, request, query).await
    }

    pub async fn create_exam(
        &self,
        request: &HttpRequest,
        exam: CreateExamRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_exam(self, request, exam).await
    }

    pub async fn get_exam(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        manage::get_exam(self, request, exam_id, scope).await
    }

    pub async fn update_exam(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        update: UpdateExamRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_exam(self, request, exam_id, update).await
    }

    pub async fn delete_exam(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        manage::delete_exam(self, request, exam_id, scope).await
    }

    pub async fn list_marks(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        marks::list_marks(self, request, exam_id, scope).await
    }

    pub async fn save_marks(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        marks: SaveMarksRequest,
    ) -> ActixResult<HttpResponse> {
        marks::save_marks(self, request, exam_id, marks).await
    }
}

pub(crate) fn valid_max_marks(max_marks: f64) -> bool {
    max_marks.is_finite() && max_marks > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_max_marks() {
        assert!(valid_max_marks(100.0));
        assert!(valid_max_marks(0.5));
        assert!(!valid_max_marks(0.0));
        assert!(!valid_max_marks(-10.0));
        assert!(!valid_max_marks(f64::NAN));
    }
}
