//! 收费项目、发票与付款。金额均为最小货币单位的整数。

pub mod invoices;
pub mod payments;
pub mod structures;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::SchoolScopeQuery;
use crate::models::fees::requests::{
    CreateFeeStructureRequest, CreateInvoiceRequest, FeeStructureListQuery, InvoiceListQuery,
    PaymentListQuery, RecordPaymentRequest, UpdateFeeStructureRequest, UpdateInvoiceRequest,
};
use crate::storage::Storage;

pub struct FeeService {
    storage: Option<Arc<dyn Storage>>,
}

impl FeeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_structures(
        &self,
        request: &HttpRequest,
        query: FeeStructureListQuery,
    ) -> ActixResult<HttpResponse> {
        structures::list_structures(self, request, query).await
    }

    pub async fn create_structure(
        &self,
        request: &HttpRequest,
        structure: CreateFeeStructureRequest,
    ) -> ActixResult<HttpResponse> {
        structures::create_structure(self, request, structure).await
    }

    pub async fn update_structure(
        &self,
        request: &HttpRequest,
        structure_id: i64,
        update: UpdateFeeStructureRequest,
    ) -> ActixResult<HttpResponse> {
        structures::update_structure(self, request, structure_id, update).await
    }

    pub async fn delete_structure(
        &self,
        request: &HttpRequest,
        structure_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        structures::delete_structure(self, request, structure_id, scope).await
    }

    pub async fn create_invoice(
        &self,
        request: &HttpRequest,
        invoice: CreateInvoiceRequest,
    ) -> ActixResult<HttpResponse> {
        invoices::create_invoice(self, request, invoice).await
    }

    pub async fn list_invoices(
        &self,
        request: &HttpRequest,
        query: InvoiceListQuery,
    ) -> ActixResult<HttpResponse> {
        invoices::list_invoices(self, request, query).await
    }

    /// 发票及其明细与付款记录
    pub async fn get_invoice(
        &self,
        request: &HttpRequest,
        invoice_id: i64,
        scope: SchoolScopeQuery,
    ) -> ActixResult<HttpResponse> {
        invoices::get_invoice(self, request, invoice_id, scope).await
    }

    pub async fn update_invoice(
        &self,
        request: &HttpRequest,
        invoice_id: i64,
        update: UpdateInvoiceRequest,
    ) -> ActixResult<HttpResponse> {
        invoices::update_invoice(self, request, invoice_id, update).await
    }

    pub async fn record_payment(
        &self,
        request: &HttpRequest,
        payment: RecordPaymentRequest,
    ) -> ActixResult<HttpResponse> {
        payments::record_payment(self, request, payment).await
    }

    pub async fn list_payments(
        &self,
        request: &HttpRequest,
        query: PaymentListQuery,
    ) -> ActixResult<HttpResponse> {
        payments::list_payments(self, request, query).await
    }
}
