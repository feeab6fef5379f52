//! 收费项目、发票与付款

use super::{SeaOrmStorage, db_error, now};
use crate::entity::fee_invoice_items::{
    ActiveModel as ItemActiveModel, Column as ItemColumn, Entity as FeeInvoiceItems,
};
use crate::entity::fee_invoices::{
    self, ActiveModel as InvoiceActiveModel, Column as InvoiceColumn, Entity as FeeInvoices,
};
use crate::entity::fee_payments::{
    ActiveModel as PaymentActiveModel, Column as PaymentColumn, Entity as FeePayments,
};
use crate::entity::fee_structures::{ActiveModel, Column, Entity as FeeStructures};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    fees::{
        entities::{FeeInvoice, FeePayment, FeeStructure, InvoiceStatus, apply_payment},
        requests::{
            CreateFeeStructureRequest, CreateInvoiceRequest, FeeStructureListQuery,
            InvoiceListQuery, PaymentListQuery, RecordPaymentRequest, UpdateFeeStructureRequest,
            UpdateInvoiceRequest,
        },
        responses::{InvoiceDetail, PaymentReceipt},
    },
};
use crate::utils::NumberFormat;
use chrono::{Datelike, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn list_fee_structures_impl(
        &self,
        school_id: i64,
        query: FeeStructureListQuery,
    ) -> Result<Vec<FeeStructure>> {
        let mut select = FeeStructures::find().filter(Column::SchoolId.eq(school_id));

        if let Some(year_id) = query.academic_year_id {
            select = select.filter(Column::AcademicYearId.eq(year_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if !query.include_inactive {
            select = select.filter(Column::IsActive.eq(true));
        }

        let structures = select
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list fee structures"))?;

        Ok(structures
            .into_iter()
            .map(|m| m.into_fee_structure())
            .collect())
    }

    pub async fn get_fee_structure_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<FeeStructure>> {
        let structure = FeeStructures::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load fee structure"))?;

        Ok(structure.map(|m| m.into_fee_structure()))
    }

    pub async fn create_fee_structure_impl(
        &self,
        school_id: i64,
        req: CreateFeeStructureRequest,
    ) -> Result<FeeStructure> {
        let now = now();

        let structure = ActiveModel {
            school_id: Set(school_id),
            academic_year_id: Set(req.academic_year_id),
            class_id: Set(req.class_id),
            name: Set(req.name),
            amount: Set(req.amount),
            frequency: Set(req.frequency.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error("Failed to create fee structure"))?;

        Ok(structure.into_fee_structure())
    }

    pub async fn update_fee_structure_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateFeeStructureRequest,
    ) -> Result<Option<FeeStructure>> {
        let Some(existing) = FeeStructures::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load fee structure"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now());
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(amount) = update.amount {
            model.amount = Set(amount);
        }
        if let Some(frequency) = update.frequency {
            model.frequency = Set(frequency.to_string());
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("Failed to update fee structure"))?;

        Ok(Some(updated.into_fee_structure()))
    }

    pub async fn deactivate_fee_structure_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = FeeStructures::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(now()))
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to deactivate fee structure"))?;

        Ok(result.rows_affected > 0)
    }

    /// 第一个空闲的 `<prefix>-<year>-<n>`，`n` 从该校发票数量加一
    /// 开始。
    async fn next_invoice_number<C: ConnectionTrait>(
        conn: &C,
        school_id: i64,
        year: i32,
        numbering: &NumberFormat,
    ) -> Result<String> {
        let count = FeeInvoices::find()
            .filter(InvoiceColumn::SchoolId.eq(school_id))
            .count(conn)
            .await
            .map_err(db_error("Failed to count invoices"))?;

        let mut sequence = count + 1;
        loop {
            let candidate = numbering.format(year, sequence);
            let taken = FeeInvoices::find()
                .filter(InvoiceColumn::SchoolId.eq(school_id))
                .filter(InvoiceColumn::InvoiceNumber.eq(candidate.as_str()))
                .count(conn)
                .await
                .map_err(db_error("Failed to check invoice number"))?;
            if taken == 0 {
                return Ok(candidate);
            }
            sequence += 1;
        }
    }

    async fn next_receipt_number<C: ConnectionTrait>(
        conn: &C,
        school_id: i64,
        year: i32,
        numbering: &NumberFormat,
    ) -> Result<String> {
        let count = FeePayments::find()
            .filter(PaymentColumn::SchoolId.eq(school_id))
            .count(conn)
            .await
            .map_err(db_error("Failed to count payments"))?;

        let mut sequence = count + 1;
        loop {
            let candidate = numbering.format(year, sequence);
            let taken = FeePayments::find()
                .filter(PaymentColumn::SchoolId.eq(school_id))
                .filter(PaymentColumn::ReceiptNumber.eq(candidate.as_str()))
                .count(conn)
                .await
                .map_err(db_error("Failed to check receipt number"))?;
            if taken == 0 {
                return Ok(candidate);
            }
            sequence += 1;
        }
    }

    pub async fn create_invoice_impl(
        &self,
        school_id: i64,
        created_by: i64,
        issue_date: NaiveDate,
        numbering: &NumberFormat,
        req: CreateInvoiceRequest,
    ) -> Result<InvoiceDetail> {
        let now = now();
        let total: i64 = req.items.iter().map(|item| item.amount).sum();
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let invoice_number =
            Self::next_invoice_number(&txn, school_id, issue_date.year(), numbering).await?;

        let invoice = InvoiceActiveModel {
            school_id: Set(school_id),
            student_id: Set(req.student_id),
            invoice_number: Set(invoice_number),
            issue_date: Set(issue_date),
            due_date: Set(req.due_date),
            total_amount: Set(total),
            amount_paid: Set(0),
            balance: Set(total),
            status: Set(InvoiceStatus::Unpaid.to_string()),
            notes: Set(req.notes),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_error("Failed to create invoice"))?;

        let mut items = Vec::with_capacity(req.items.len());
        for item in req.items {
            let saved = ItemActiveModel {
                invoice_id: Set(invoice.id),
                fee_structure_id: Set(item.fee_structure_id),
                description: Set(item.description),
                amount: Set(item.amount),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_error("Failed to create invoice item"))?;
            items.push(saved.into_invoice_item());
        }

        txn.commit()
            .await
            .map_err(db_error("Failed to commit invoice"))?;

        Ok(InvoiceDetail {
            invoice: invoice.into_invoice(),
            items,
            payments: Vec::new(),
        })
    }

    async fn find_invoice_model<C: ConnectionTrait>(
        conn: &C,
        school_id: i64,
        id: i64,
    ) -> Result<Option<fee_invoices::Model>> {
        FeeInvoices::find_by_id(id)
            .filter(InvoiceColumn::SchoolId.eq(school_id))
            .one(conn)
            .await
            .map_err(db_error("Failed to load invoice"))
    }

    pub async fn get_invoice_impl(&self, school_id: i64, id: i64) -> Result<Option<FeeInvoice>> {
        Ok(Self::find_invoice_model(&self.db, school_id, id)
            .await?
            .map(|m| m.into_invoice()))
    }

    pub async fn get_invoice_detail_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<InvoiceDetail>> {
        let Some(invoice) = Self::find_invoice_model(&self.db, school_id, id).await? else {
            return Ok(None);
        };

        let items = FeeInvoiceItems::find()
            .filter(ItemColumn::InvoiceId.eq(invoice.id))
            .order_by_asc(ItemColumn::Id)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to load invoice items"))?;

        let payments = FeePayments::find()
            .filter(PaymentColumn::SchoolId.eq(school_id))
            .filter(PaymentColumn::InvoiceId.eq(invoice.id))
            .order_by_asc(PaymentColumn::PaidAt)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to load payments"))?;

        Ok(Some(InvoiceDetail {
            invoice: invoice.into_invoice(),
            items: items.into_iter().map(|m| m.into_invoice_item()).collect(),
            payments: payments.into_iter().map(|m| m.into_payment()).collect(),
        }))
    }

    pub async fn list_invoices_impl(
        &self,
        school_id: i64,
        query: InvoiceListQuery,
    ) -> Result<PaginatedResponse<FeeInvoice>> {
        let (page, size) = query.pagination.normalized();

        let mut select = FeeInvoices::find().filter(InvoiceColumn::SchoolId.eq(school_id));
        if let Some(student_id) = query.student_id {
            select = select.filter(InvoiceColumn::StudentId.eq(student_id));
        }
        if let Some(status) = query.status {
            select = select.filter(InvoiceColumn::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(InvoiceColumn::IssueDate)
            .order_by_desc(InvoiceColumn::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("Failed to count invoices"))?;
        let invoices = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("Failed to list invoices"))?;

        Ok(PaginatedResponse {
            items: invoices.into_iter().map(|m| m.into_invoice()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_invoice_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateInvoiceRequest,
    ) -> Result<Option<FeeInvoice>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let Some(existing) = Self::find_invoice_model(&txn, school_id, id).await? else {
            return Ok(None);
        };

        if update.status == Some(InvoiceStatus::Cancelled) {
            let payments = FeePayments::find()
                .filter(PaymentColumn::SchoolId.eq(school_id))
                .filter(PaymentColumn::InvoiceId.eq(id))
                .count(&txn)
                .await
                .map_err(db_error("Failed to count payments"))?;
            if payments > 0 || existing.amount_paid > 0 {
                return Err(SchoolHubError::validation(
                    "Invoices with payments cannot be cancelled",
                ));
            }
        }

        let mut model: InvoiceActiveModel = existing.into();
        model.updated_at = Set(now());
        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date);
        }
        if let Some(notes) = update.notes {
            model.notes = Set(Some(notes));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("Failed to update invoice"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit invoice"))?;

        Ok(Some(updated.into_invoice()))
    }

    pub async fn record_payment_impl(
        &self,
        school_id: i64,
        received_by: i64,
        numbering: &NumberFormat,
        req: RecordPaymentRequest,
    ) -> Result<PaymentReceipt> {
        let now = now();
        let paid_at = req.paid_at.unwrap_or(now);
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let invoice = Self::find_invoice_model(&txn, school_id, req.invoice_id)
            .await?
            .ok_or_else(|| SchoolHubError::not_found("Invoice not found"))?;

        let settled = apply_payment(
            invoice.invoice_status(),
            invoice.total_amount,
            invoice.amount_paid,
            req.amount,
        )
        .map_err(SchoolHubError::validation)?;

        let year = crate::models::from_unix(paid_at).year();
        let receipt_number = Self::next_receipt_number(&txn, school_id, year, numbering).await?;

        let payment = PaymentActiveModel {
            school_id: Set(school_id),
            invoice_id: Set(invoice.id),
            student_id: Set(invoice.student_id),
            receipt_number: Set(receipt_number),
            amount: Set(req.amount),
            method: Set(req.method.to_string()),
            reference: Set(req.reference),
            paid_at: Set(paid_at),
            received_by: Set(received_by),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_error("Failed to record payment"))?;

        let mut model: InvoiceActiveModel = invoice.into();
        model.amount_paid = Set(settled.amount_paid);
        model.balance = Set(settled.balance);
        model.status = Set(settled.status.to_string());
        model.updated_at = Set(now);
        let invoice = model
            .update(&txn)
            .await
            .map_err(db_error("Failed to settle invoice"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit payment"))?;

        Ok(PaymentReceipt {
            payment: payment.into_payment(),
            invoice: invoice.into_invoice(),
        })
    }

    pub async fn list_payments_impl(
        &self,
        school_id: i64,
        query: PaymentListQuery,
    ) -> Result<Vec<FeePayment>> {
        let mut select = FeePayments::find().filter(PaymentColumn::SchoolId.eq(school_id));
        if let Some(invoice_id) = query.invoice_id {
            select = select.filter(PaymentColumn::InvoiceId.eq(invoice_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(PaymentColumn::StudentId.eq(student_id));
        }

        let payments = select
            .order_by_desc(PaymentColumn::PaidAt)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list payments"))?;

        Ok(payments.into_iter().map(|m| m.into_payment()).collect())
    }

    pub async fn outstanding_balance_impl(&self, school_id: i64) -> Result<i64> {
        let balances: Vec<i64> = FeeInvoices::find()
            .select_only()
            .column(InvoiceColumn::Balance)
            .filter(InvoiceColumn::SchoolId.eq(school_id))
            .filter(InvoiceColumn::Status.ne(InvoiceStatus::Cancelled.to_string()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_error("Failed to load balances"))?;

        Ok(balances.into_iter().sum())
    }
}
