use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeeService;
use crate::config::AppConfig;
use crate::errors::SchoolHubError;
use crate::models::fees::entities::{FeeInvoice, apply_payment};
use crate::models::fees::requests::{PaymentListQuery, RecordPaymentRequest};
use crate::models::members::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found, tenant};
use crate::services::students::clean;
use crate::utils::NumberFormat;

/// 将被拒绝的付款映射为对应的业务错误码
fn payment_rejection(invoice: &FeeInvoice, amount: i64) -> Option<(ErrorCode, String)> {
    match apply_payment(invoice.status, invoice.total_amount, invoice.amount_paid, amount) {
        Ok(_) => None,
        Err(msg) if amount <= 0 => Some((ErrorCode::BadRequest, msg)),
        Err(msg) if !invoice.status.accepts_payments() => {
            Some((ErrorCode::InvoiceNotPayable, msg))
        }
        Err(msg) => Some((ErrorCode::PaymentExceedsBalance, msg)),
    }
}

pub async fn record_payment(
    service: &FeeService,
    request: &HttpRequest,
    mut payment: RecordPaymentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        payment.school_id,
        Permission::RecordPayments,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    let invoice = match storage.get_invoice(ctx.school_id(), payment.invoice_id).await {
        Ok(Some(invoice)) => invoice,
        Ok(None) => return Ok(not_found(ErrorCode::InvoiceNotFound, "Invoice not found")),
        Err(e) => return Ok(error_response("Failed to record payment", &e)),
    };
    if let Some((code, msg)) = payment_rejection(&invoice, payment.amount) {
        return Ok(bad_request(code, msg));
    }
    payment.reference = clean(payment.reference);

    let numbering = NumberFormat::receipts(&AppConfig::get().finance);
    match storage
        .record_payment(ctx.school_id(), ctx.user_id(), &numbering, payment)
        .await
    {
        Ok(receipt) => {
            info!(
                "Payment {} of {} recorded against invoice {} by user {}",
                receipt.payment.receipt_number,
                receipt.payment.amount,
                receipt.invoice.invoice_number,
                ctx.user_id()
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(receipt, "Payment recorded successfully")))
        }
        // 上面的检查之后、事务之前发票已被修改
        Err(SchoolHubError::Validation(msg)) => {
            Ok(bad_request(ErrorCode::InvoiceNotPayable, msg))
        }
        Err(e) => Ok(error_response("Failed to record payment", &e)),
    }
}

pub async fn list_payments(
    service: &FeeService,
    request: &HttpRequest,
    query: PaymentListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(request, &storage, query.school_id, Permission::ViewFees)
        .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match storage.list_payments(ctx.school_id(), query).await {
        Ok(payments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            payments,
            "Payments retrieved successfully",
        ))),
        Err(e) => Ok(error_response("Failed to list payments", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::entities::InvoiceStatus;

    fn invoice(status: InvoiceStatus, total: i64, paid: i64) -> FeeInvoice {
        FeeInvoice {
            id: 1,
            school_id: 1,
            student_id: 2,
            invoice_number: "INV-2026-00001".into(),
            issue_date: chrono::NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            due_date: chrono::NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            total_amount: total,
            amount_paid: paid,
            balance: total - paid,
            status,
            notes: None,
            created_by: 1,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_payment_rejection_codes() {
        let open = invoice(InvoiceStatus::Partial, 1_000, 400);
        assert_eq!(payment_rejection(&open, 600), None);
        assert_eq!(
            payment_rejection(&open, 601).map(|(c, _)| c),
            Some(ErrorCode::PaymentExceedsBalance)
        );
        assert_eq!(
            payment_rejection(&open, 0).map(|(c, _)| c),
            Some(ErrorCode::BadRequest)
        );

        let paid = invoice(InvoiceStatus::Paid, 1_000, 1_000);
        assert_eq!(
            payment_rejection(&paid, 10).map(|(c, _)| c),
            Some(ErrorCode::InvoiceNotPayable)
        );
        let cancelled = invoice(InvoiceStatus::Cancelled, 1_000, 0);
        assert_eq!(
            payment_rejection(&cancelled, 10).map(|(c, _)| c),
            Some(ErrorCode::InvoiceNotPayable)
        );
    }
}
