pub mod records;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::SchoolScopeQuery;
use crate::models::discipline::requests::{
    CreateDisciplineRecordRequest, DisciplineListQuery, UpdateDisciplineRecordRequest,
};
use crate::storage::Storage;

pub struct DisciplineService {
    storage: Option<Arc<dyn Storage>>,
}

impl DisciplineService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_records(
        &self,
        request: &HttpRequest,
        query: DisciplineListQuery,
    ) -> ActixResult<HttpResponse> {
        records::list_records(self, request, query).await
    }

    pub async fn get_record(
        &self,
        request: &HttpRequest,
        record_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        records::get_record(self, request, record_id, scope).await
    }

    pub async fn create_record(
        &self,
        request: &HttpRequest,
        record: CreateDisciplineRecordRequest,
    ) -> ActixResult<HttpResponse> {
        records::create_record(self, request, record).await
    }

    pub async fn update_record(
        &self,
        request: &HttpRequest,
        record_id: i64,
        update: UpdateDisciplineRecordRequest,
    ) -> ActixResult<HttpResponse> {
        records::update_record(self, request, record_id, update).await
    }

    pub async fn delete_record(
        &self,
        request: &HttpRequest,
        record_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        records::delete_record(self, request, record_id, scope).await
    }
}
