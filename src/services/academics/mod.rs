//! 学年及其学期

pub mod terms;
pub mod years;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::models::SchoolScopeQuery;
use crate::models::academic_years::requests::{
    CreateAcademicYearRequest, CreateTermRequest, TermListQuery, UpdateAcademicYearRequest,
    UpdateTermRequest,
};
use crate::storage::Storage;

pub struct AcademicService {
    storage: Option<Arc<dyn Storage>>,
}

impl AcademicService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_years(
        &self,
        request: &HttpRequest,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        years::list_years(self, request, scope).await
    }

    pub async fn create_year(
        &self,
        request: &HttpRequest,
        year: CreateAcademicYearRequest,
    ) -> ActixResult<HttpResponse> {
        years::create_year(self, request, year).await
    }

    pub async fn update_year(
        &self,
        request: &HttpRequest,
        year_id: i64,
        update: UpdateAcademicYearRequest,
    ) -> ActixResult<HttpResponse> {
        years::update_year(self, request, year_id, update).await
    }

    pub async fn set_current_year(
        &self,
        request: &HttpRequest,
        year_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        years::set_current_year(self, request, year_id, scope).await
    }

    pub async fn delete_year(
        &self,
        request: &HttpRequest,
        year_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        years::delete_year(self, request, year_id, scope).await
    }

    pub async fn list_terms(
        &self,
        request: &HttpRequest,
        query: TermListQuery,
    ) -> ActixResult<HttpResponse> {
        terms::list_terms(self, request, query).await
    }

    pub async fn create_term(
        &self,
        request: &HttpRequest,
        term: CreateTermRequest,
    ) -> ActixResult<HttpResponse> {
        terms::create_term(self, request, term).await
    }

    pub async fn update_term(
        &self,
        request: &HttpRequest,
        term_id: i64,
        update: UpdateTermRequest,
    ) -> ActixResult<HttpResponse> {
        terms::update_term(self, request, term_id, update).await
    }

    pub async fn set_current_term(
        &self,
        request: &HttpRequest,
        term_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        terms::set_current_term(self, request, term_id, scope).await
    }

    pub async fn delete_term(
        &self,
        request: &HttpRequest,
        term_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        terms::delete_term(self, request, term_id, scope).await
    }
}

/// 开始日期必须早于结束日期
pub(crate) fn valid_range(start: NaiveDate, end: NaiveDate) -> bool {
    start < end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
        assert!(valid_range(d(1, 1), d(6, 30)));
        assert!(!valid_range(d(6, 30), d(1, 1)));
        assert!(!valid_range(d(3, 3), d(3, 3)));
    }
}
