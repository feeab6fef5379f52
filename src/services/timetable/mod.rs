pub mod entries;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::SchoolScopeQuery;
use crate::models::timetable::requests::{
    CreateTimetableEntryRequest, TimetableQuery, UpdateTimetableEntryRequest,
};
use crate::storage::Storage;

pub struct TimetableService {
    storage: Option<Arc<dyn Storage>>,
}

impl TimetableService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_entries(
        &self,
        request: &HttpRequest,
        query: TimetableQuery,
    ) -> ActixResult<HttpResponse> {
        entries::list_entries(self, request, query).await
    }

    pub async fn create_entry(
        &self,
        request: &HttpRequest,
        entry: CreateTimetableEntryRequest,
    ) -> ActixResult<HttpResponse> {
        entries::create_entry(self, request, entry).await
    }

    pub async fn update_entry(
        &self,
        request: &HttpRequest,
        entry_id: i64,
        update: UpdateTimetableEntryRequest,
    ) -> ActixResult<HttpResponse> {
        entries::update_entry(self, request, entry_id, update).await
    }

    pub async fn delete_entry(
        &self,
        request: &HttpRequest,
        entry_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        entries::delete_entry(self, request, entry_id, scope).await
    }
}
