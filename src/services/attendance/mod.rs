pub mod record;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::attendance::requests::{
    AttendanceQuery, AttendanceSummaryQuery, SaveAttendanceRequest,
};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_attendance(
        &self,
        request: &HttpRequest,
        query: AttendanceQuery,
    ) -> ActixResult<HttpResponse> {
        record::list_attendance(self, request, query).await
    }

    /// 替换某班级某一天的考勤记录
    pub async fn save_attendance(
        &self,
        request: &HttpRequest,
        register: SaveAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        record::save_attendance(self, request, register).await
    }

    pub async fn attendance_summary(
        &self,
        request: &HttpRequest,
        query: AttendanceSummaryQuery,
    ) -> ActixResult<HttpResponse> {
        summary::attendance_summary(self, request, query).await
    }
}
