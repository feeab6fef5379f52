use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use tracing::info;

use super::FeeService;
use crate::config::AppConfig;
use crate::errors::SchoolHubError;
use crate::models::fees::entities::{FeeInvoice, InvoiceStatus};
use crate::models::fees::requests::{
    CreateInvoiceRequest, InvoiceItemInput, InvoiceListQuery, UpdateInvoiceRequest,
};
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::{bad_request, error_response, not_found, tenant};
use crate::storage::Storage;
use crate::utils::NumberFormat;
use crate::utils::validate::validate_required_text;

/// 明细不能为空，每项需有描述且金额为正，合计不能溢出 `i64`。
/// 返回合计金额。
fn validate_items(items: &mut [InvoiceItemInput]) -> Result<i64, String> {
    if items.is_empty() {
        return Err("An invoice needs at least one item".to_string());
    }
    let mut total: i64 = 0;
    for (i, item) in items.iter_mut().enumerate() {
        item.description = item.description.trim().to_string();
        validate_required_text(&format!("items[{i}].description"), &item.description, 200)?;
        if item.amount <= 0 {
            return Err(format!("items[{i}].amount must be greater than zero"));
        }
        total = total
            .checked_add(item.amount)
            .ok_or_else(|| "Invoice total is too large".to_string())?;
    }
    Ok(total)
}

async fn check_fee_structures(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    items: &[InvoiceItemInput],
) -> Result<(), HttpResponse> {
    for id in items.iter().filter_map(|item| item.fee_structure_id) {
        match storage.get_fee_structure(school_id, id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(bad_request(
                    ErrorCode::FeeStructureNotFound,
                    format!("Fee structure {id} not found"),
                ));
            }
            Err(e) => return Err(error_response("Failed to create invoice", &e)),
        }
    }
    Ok(())
}

pub async fn create_invoice(
    service: &FeeService,
    request: &HttpRequest,
    mut invoice: CreateInvoiceRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, invoice.school_id, Permission::ManageFees)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = validate_items(&mut invoice.items) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let issue_date: NaiveDate = invoice
        .issue_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    if invoice.due_date < issue_date {
        return Ok(bad_request(
            ErrorCode::InvalidDateRange,
            "due_date must not be before issue_date",
        ));
    }

    match storage.get_student(ctx.school_id(), invoice.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(error_response("Failed to create invoice", &e)),
    }
    if let Err(resp) = check_fee_structures(&storage, ctx.school_id(), &invoice.items).await {
        return Ok(resp);
    }

    let numbering = NumberFormat::invoices(&AppConfig::get().finance);
    match storage
        .create_invoice(
            ctx.school_id(),
            ctx.user_id(),
            issue_date,
            &numbering,
            invoice,
        )
        .await
    {
        Ok(detail) => {
            info!(
                "Invoice {} issued in school {} by user {}",
                detail.invoice.invoice_number,
                ctx.school_id(),
                ctx.user_id()
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(detail, "Invoice created successfully")))
        }
        Err(e) => Ok(error_response("Failed to create invoice", &e)),
    }
}

pub async fn list_invoices(
    service: &FeeService,
    request: &HttpRequest,
    query: InvoiceListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, query.school_id, Permission::ViewFees)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.list_invoices(ctx.school_id(), query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            page,
            "Invoices retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to list invoices", &e)),
    }
}

pub async fn get_invoice(
    service: &FeeService,
    request: &HttpRequest,
    invoice_id: i64,
    scope: SchoolScopeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, scope.school_id, Permission::ViewFees)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.get_invoice_detail(ctx.school_id(), invoice_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Invoice retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::InvoiceNotFound, "Invoice not found")),
        Err(e) => Ok(error_response("Failed to get invoice", &e)),
    }
}

/// 已作废的发票不可再修改，到期日不能早于开票日
fn check_invoice_update(
    current: &FeeInvoice,
    update: &UpdateInvoiceRequest,
) -> Result<(), (ErrorCode, &'static str)> {
    if current.status == InvoiceStatus::Cancelled {
        return Err((ErrorCode::InvoiceCancelled, "Cancelled invoices cannot be edited"));
    }
    if update.due_date.is_some_and(|due| due < current.issue_date) {
        return Err((
            ErrorCode::InvalidDateRange,
            "due_date must not be before issue_date",
        ));
    }
    Ok(())
}

pub async fn update_invoice(
    service: &FeeService,
    request: &HttpRequest,
    invoice_id: i64,
    update: UpdateInvoiceRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, update.school_id, Permission::ManageFees)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    if update
        .status
        .is_some_and(|status| status != InvoiceStatus::Cancelled)
    {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Invoice status can only be changed to cancelled",
        ));
    }

    let current = match storage.get_invoice(ctx.school_id(), invoice_id).await {
        Ok(Some(invoice)) => invoice,
        Ok(None) => return Ok(not_found(ErrorCode::InvoiceNotFound, "Invoice not found")),
        Err(e) => return Ok(error_response("Failed to update invoice", &e)),
    };
    if let Err((code, msg)) = check_invoice_update(&current, &update) {
        return Ok(bad_request(code, msg));
    }

    match storage
        .update_invoice(ctx.school_id(), invoice_id, update)
        .await
    {
        Ok(Some(invoice)) => {
            info!(
                "Invoice {} updated by user {}",
                invoice.invoice_number,
                ctx.user_id()
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(invoice, "Invoice updated successfully")))
        }
        Ok(None) => Ok(not_found(ErrorCode::InvoiceNotFound, "Invoice not found")),
        Err(SchoolHubError::Validation(msg)) => {
            Ok(bad_request(ErrorCode::InvoiceHasPayments, msg))
        }
        Err(e) => Ok(error_response("Failed to update invoice", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str, amount: i64) -> InvoiceItemInput {
        InvoiceItemInput {
            description: description.into(),
            amount,
            fee_structure_id: None,
        }
    }

    #[test]
    fn test_total_is_sum_of_items() {
        let mut items = vec![item(" Tuition ", 45_000), item("Library", 2_500)];
        assert_eq!(validate_items(&mut items), Ok(47_500));
        assert_eq!(items[0].description, "Tuition");
    }

    #[test]
    fn test_items_required_and_positive() {
        assert!(validate_items(&mut []).is_err());
        assert!(validate_items(&mut [item("Tuition", 0)]).is_err());
        assert!(validate_items(&mut [item("  ", 100)]).is_err());
    }

    #[test]
    fn test_total_overflow_rejected() {
        let mut items = vec![item("a", i64::MAX), item("b", 1)];
        assert!(validate_items(&mut items).is_err());
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoice(status: InvoiceStatus) -> FeeInvoice {
        FeeInvoice {
            id: 1,
            school_id: 1,
            student_id: 1,
            invoice_number: "INV-2026-00001".into(),
            issue_date: date(2026, 3, 1),
            due_date: date(2026, 3, 31),
            total_amount: 10_000,
            amount_paid: 0,
            balance: 10_000,
            status,
            notes: None,
            created_by: 1,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn update(due_date: Option<NaiveDate>) -> UpdateInvoiceRequest {
        UpdateInvoiceRequest {
            school_id: Some(1),
            due_date,
            notes: None,
            status: None,
        }
    }

    #[test]
    fn test_due_date_cannot_move_before_issue_date() {
        let current = invoice(InvoiceStatus::Unpaid);
        let err = check_invoice_update(&current, &update(Some(date(2026, 2, 28)))).unwrap_err();
        assert_eq!(err.0, ErrorCode::InvalidDateRange);

        assert!(check_invoice_update(&current, &update(Some(date(2026, 3, 1)))).is_ok());
        assert!(check_invoice_update(&current, &update(None)).is_ok());
    }

    #[test]
    fn test_cancelled_invoice_is_frozen() {
        let current = invoice(InvoiceStatus::Cancelled);
        let err = check_invoice_update(&current, &update(Some(date(2026, 4, 30)))).unwrap_err();
        assert_eq!(err.0, ErrorCode::InvoiceCancelled);

        let mut notes_only = update(None);
        notes_only.notes = Some("resend".into());
        assert!(check_invoice_update(&current, &notes_only).is_err());
    }
}
