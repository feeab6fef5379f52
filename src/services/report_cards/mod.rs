pub mod generate;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ApiResponse;
use crate::models::members::permissions::Permission;
use crate::models::report_cards::requests::{GenerateReportCardsRequest, ReportCardQuery};
use crate::services::{error_response, tenant};
use crate::storage::Storage;

pub struct ReportCardService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportCardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 重新计算该班级所有在读学生本学期的成绩单，
    /// 覆盖之前生成的结果。
    pub async fn generate(
        &self,
        request: &HttpRequest,
        generate: GenerateReportCardsRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_report_cards(self, request, generate).await
    }

    pub async fn list(
        &self,
        request: &HttpRequest,
        query: ReportCardQuery,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        let ctx =
            match tenant::authorize(request, &storage, query.school_id, Permission::ViewMarks)
                .await
            {
                Ok(ctx) => ctx,
                Err(resp) => return Ok(resp),
            };

        match storage.list_report_cards(ctx.school_id(), query).await {
            Ok(cards) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                cards,
                "Report cards retrieved successfully",
            ))),
            Err(e) => Ok(error_response("Failed to list report cards", &e)),
        }
    }
}
