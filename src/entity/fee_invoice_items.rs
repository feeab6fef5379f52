//! 发票明细

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_invoice_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub invoice_id: i64,
    pub fee_structure_id: Option<i64>,
    pub description: String,
    pub amount: i64,
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
    pub fn into_invoice_item(self) -> crate::models::fees::entities::FeeInvoiceItem {
        crate::models::fees::entities::FeeInvoiceItem {
            id: self.id,
            invoice_id: self.invoice_id,
            fee_structure_id: self.fee_structure_id,
            description: self.description,
            amount: self.amount,
        }
    }
}
