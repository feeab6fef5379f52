//! 收费发票

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub invoice_number: String,
    pub issue_date: Date,
    pub due_date: Date,
    pub total_amount: i64,
    pub amount_paid: i64,
    pub balance: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fee_invoice_items::Entity")]
    Items,
    #[sea_orm(has_many = "super::fee_payments::Entity")]
    Payments,
}

impl Related<super::fee_invoice_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::fee_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn invoice_status(&self) -> crate::models::fees::entities::InvoiceStatus {
        use crate::models::fees::entities::InvoiceStatus;
        self.status
            .parse::<InvoiceStatus>()
            .unwrap_or_else(|_| InvoiceStatus::from_amounts(self.total_amount, self.amount_paid))
    }

    pub fn into_invoice(self) -> crate::models::fees::entities::FeeInvoice {
        use crate::models::fees::entities::FeeInvoice;
        use crate::models::from_unix;

        FeeInvoice {
            status: self.invoice_status(),
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            invoice_number: self.invoice_number,
            issue_date: self.issue_date,
            due_date: self.due_date,
            total_amount: self.total_amount,
            amount_paid: self.amount_paid,
            balance: self.balance,
            notes: self.notes,
            created_by: self.created_by,
            created_at: from_unix(self.created_at),
            updated_at: from_unix(self.updated_at),
        }
    }
}
