//! 发票付款记录

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub invoice_id: i64,
    pub student_id: i64,
    pub receipt_number: String,
    pub amount: i64,
    pub method: String,
    pub reference: Option<String>,
    pub paid_at: i64,
    pub received_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fee_invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::fee_invoices::Column::Id"
    )]
    Invoice,
}

impl Related<super::fee_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::fees::entities::FeePayment {
        use crate::models::fees::entities::{FeePayment, PaymentMethod};
        use crate::models::from_unix;

        FeePayment {
            id: self.id,
            school_id: self.school_id,
            invoice_id: self.invoice_id,
            student_id: self.student_id,
            receipt_number: self.receipt_number,
            amount: self.amount,
            method: self
                .method
                .parse::<PaymentMethod>()
                .unwrap_or(PaymentMethod::Cash),
            reference: self.reference,
            paid_at: from_unix(self.paid_at),
            received_by: self.received_by,
            created_at: from_unix(self.created_at),
        }
    }
}
