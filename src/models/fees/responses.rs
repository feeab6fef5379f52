use super::entities::{FeeInvoice, FeeInvoiceItem, FeePayment};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct InvoiceDetail {
    pub invoice: FeeInvoice,
    pub items: Vec<FeeInvoiceItem>,
    pub payments: Vec<FeePayment>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct PaymentReceipt {
    pub payment: FeePayment,
    pub invoice: FeeInvoice,
}
