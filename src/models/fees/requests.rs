use super::entities::{FeeFrequency, InvoiceStatus, PaymentMethod};
use crate::models::common::PaginationQuery;
use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeStructureListQuery {
    pub school_id: Option<i64>,
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct CreateFeeStructureRequest {
    pub school_id: Option<i64>,
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    pub name: String,
    pub amount: i64,
    pub frequency: FeeFrequency,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct UpdateFeeStructureRequest {
    pub school_id: Option<i64>,
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub frequency: Option<FeeFrequency>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct InvoiceItemInput {
    pub description: String,
    pub amount: i64,
    pub fee_structure_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct CreateInvoiceRequest {
    pub school_id: Option<i64>,
    pub student_id: i64,
    /// 默认为今天
    pub issue_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub items: Vec<InvoiceItemInput>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct UpdateInvoiceRequest {
    pub school_id: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// 这里只接受 `cancelled`
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct InvoiceListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub school_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct RecordPaymentRequest {
    pub school_id: Option<i64>,
    pub invoice_id: i64,
    pub amount: i64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    /// Unix 秒；默认为当前时间
    pub paid_at: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct PaymentListQuery {
    pub school_id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub student_id: Option<i64>,
}
