use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 收费项目（金额为最小货币单位）
        manager
            .create_table(
                Table::create()
                    .table(FeeStructures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeeStructures::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FeeStructures::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeStructures::AcademicYearId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(FeeStructures::ClassId).big_integer().null())
                    .col(ColumnDef::new(FeeStructures::Name).string().not_null())
                    .col(ColumnDef::new(FeeStructures::Amount).big_integer().not_null())
                    .col(ColumnDef::new(FeeStructures::Frequency).string().not_null())
                    .col(
                        ColumnDef::new(FeeStructures::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(FeeStructures::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeStructures::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeeStructures::Table, FeeStructures::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 发票
        manager
            .create_table(
                Table::create()
                    .table(FeeInvoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeeInvoices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeeInvoices::SchoolId).big_integer().not_null())
                    .col(
                        ColumnDef::new(FeeInvoices::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeInvoices::InvoiceNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeeInvoices::IssueDate).date().not_null())
                    .col(ColumnDef::new(FeeInvoices::DueDate).date().not_null())
                    .col(
                        ColumnDef::new(FeeInvoices::TotalAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeInvoices::AmountPaid)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(FeeInvoices::Balance).big_integer().not_null())
                    .col(ColumnDef::new(FeeInvoices::Status).string().not_null())
                    .col(ColumnDef::new(FeeInvoices::Notes).text().null())
                    .col(ColumnDef::new(FeeInvoices::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(FeeInvoices::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(FeeInvoices::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeeInvoices::Table, FeeInvoices::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeeInvoices::Table, FeeInvoices::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fee_invoices_school_number")
                    .table(FeeInvoices::Table)
                    .col(FeeInvoices::SchoolId)
                    .col(FeeInvoices::InvoiceNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 发票明细
        manager
            .create_table(
                Table::create()
                    .table(FeeInvoiceItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeeInvoiceItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FeeInvoiceItems::InvoiceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeInvoiceItems::FeeStructureId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FeeInvoiceItems::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeInvoiceItems::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeeInvoiceItems::Table, FeeInvoiceItems::InvoiceId)
                            .to(FeeInvoices::Table, FeeInvoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 付款
        manager
            .create_table(
                Table::create()
                    .table(FeePayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeePayments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeePayments::SchoolId).big_integer().not_null())
                    .col(
                        ColumnDef::new(FeePayments::InvoiceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeePayments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeePayments::ReceiptNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeePayments::Amount).big_integer().not_null())
                    .col(ColumnDef::new(FeePayments::Method).string().not_null())
                    .col(ColumnDef::new(FeePayments::Reference).string().null())
                    .col(ColumnDef::new(FeePayments::PaidAt).big_integer().not_null())
                    .col(
                        ColumnDef::new(FeePayments::ReceivedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeePayments::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeePayments::Table, FeePayments::InvoiceId)
                            .to(FeeInvoices::Table, FeeInvoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fee_payments_school_receipt")
                    .table(FeePayments::Table)
                    .col(FeePayments::SchoolId)
                    .col(FeePayments::ReceiptNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeePayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeInvoiceItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeInvoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeStructures::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Schools {
    #[sea_orm(iden = "schools")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum FeeStructures {
    #[sea_orm(iden = "fee_structures")]
    Table,
    Id,
    SchoolId,
    AcademicYearId,
    ClassId,
    Name,
    Amount,
    Frequency,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FeeInvoices {
    #[sea_orm(iden = "fee_invoices")]
    Table,
    Id,
    SchoolId,
    StudentId,
    InvoiceNumber,
    IssueDate,
    DueDate,
    TotalAmount,
    AmountPaid,
    Balance,
    Status,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FeeInvoiceItems {
    #[sea_orm(iden = "fee_invoice_items")]
    Table,
    Id,
    InvoiceId,
    FeeStructureId,
    Description,
    Amount,
}

#[derive(DeriveIden)]
enum FeePayments {
    #[sea_orm(iden = "fee_payments")]
    Table,
    Id,
    SchoolId,
    InvoiceId,
    StudentId,
    ReceiptNumber,
    Amount,
    Method,
    Reference,
    PaidAt,
    ReceivedBy,
    CreatedAt,
}
