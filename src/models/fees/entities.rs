use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub enum FeeFrequency {
    OneTime,
    Monthly,
    Termly,
    Yearly,
}

string_enum!(FeeFrequency {
    OneTime => "one_time",
    Monthly => "monthly",
    Termly => "termly",
    Yearly => "yearly",
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub enum InvoiceStatus {
    Unpaid,
    Partial,
    Paid,
    Cancelled,
}

string_enum!(InvoiceStatus {
    Unpaid => "unpaid",
    Partial => "partial",
    Paid => "paid",
    Cancelled => "cancelled",
});

impl InvoiceStatus {
    /// 根据金额推导出的有效（未作废）发票状态
    pub fn from_amounts(total_amount: i64, amount_paid: i64) -> Self {
        if amount_paid >= total_amount {
            InvoiceStatus::Paid
        } else if amount_paid > 0 {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Unpaid
        }
    }

    pub fn accepts_payments(&self) -> bool {
        matches!(self, InvoiceStatus::Unpaid | InvoiceStatus::Partial)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    MobileMoney,
    Card,
    Cheque,
}

string_enum!(PaymentMethod {
    Cash => "cash",
    BankTransfer => "bank_transfer",
    MobileMoney => "mobile_money",
    Card => "card",
    Cheque => "cheque",
});

/// 金额单位为最小货币单位
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeStructure {
    pub id: i64,
    pub school_id: i64,
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    pub name: String,
    pub amount: i64,
    pub frequency: FeeFrequency,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeInvoice {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: i64,
    pub amount_paid: i64,
    pub balance: i64,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeInvoiceItem {
    pub id: i64,
    pub invoice_id: i64,
    pub fee_structure_id: Option<i64>,
    pub description: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeePayment {
    pub id: i64,
    pub school_id: i64,
    pub invoice_id: i64,
    pub student_id: i64,
    pub receipt_number: String,
    pub amount: i64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub paid_at: chrono::DateTime<chrono::Utc>,
    pub received_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 付款入账后的发票金额
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledAmounts {
    pub amount_paid: i64,
    pub balance: i64,
    pub status: InvoiceStatus,
}

/// 按发票状态校验 `amount` 并返回新的金额
pub fn apply_payment(
    status: InvoiceStatus,
    total_amount: i64,
    amount_paid: i64,
    amount: i64,
) -> Result<SettledAmounts, String> {
    if amount <= 0 {
        return Err("Payment amount must be positive".to_string());
    }
    if !status.accepts_payments() {
        return Err(format!("Invoice is {status} and cannot accept payments"));
    }
    let balance = total_amount - amount_paid;
    if amount > balance {
        return Err(format!(
            "Payment amount {amount} exceeds outstanding balance {balance}"
        ));
    }
    let amount_paid = amount_paid + amount;
    Ok(SettledAmounts {
        amount_paid,
        balance: total_amount - amount_paid,
        status: InvoiceStatus::from_amounts(total_amount, amount_paid),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_amounts() {
        assert_eq!(InvoiceStatus::from_amounts(1000, 0), InvoiceStatus::Unpaid);
        assert_eq!(InvoiceStatus::from_amounts(1000, 1), InvoiceStatus::Partial);
        assert_eq!(InvoiceStatus::from_amounts(1000, 1000), InvoiceStatus::Paid);
    }

    #[test]
    fn test_partial_then_full_payment() {
        let first = apply_payment(InvoiceStatus::Unpaid, 50_000, 0, 20_000).unwrap();
        assert_eq!(first.amount_paid, 20_000);
        assert_eq!(first.balance, 30_000);
        assert_eq!(first.status, InvoiceStatus::Partial);

        let second =
            apply_payment(first.status, 50_000, first.amount_paid, first.balance).unwrap();
        assert_eq!(second.balance, 0);
        assert_eq!(second.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_overpayment_rejected() {
        assert!(apply_payment(InvoiceStatus::Partial, 100, 60, 41).is_err());
        assert!(apply_payment(InvoiceStatus::Partial, 100, 60, 40).is_ok());
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        assert!(apply_payment(InvoiceStatus::Unpaid, 100, 0, 0).is_err());
        assert!(apply_payment(InvoiceStatus::Unpaid, 100, 0, -5).is_err());
    }

    #[test]
    fn test_closed_invoices_reject_payments() {
        assert!(apply_payment(InvoiceStatus::Paid, 100, 100, 1).is_err());
        assert!(apply_payment(InvoiceStatus::Cancelled, 100, 0, 10).is_err());
    }

    #[test]
    fn test_frequency_strings() {
        assert_eq!(FeeFrequency::OneTime.as_str(), "one_time");
        assert_eq!(
            "bank_transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
    }
}
