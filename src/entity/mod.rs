//! SeaORM 实体
//!
//! 与 `models` 中的业务类型分开：存储层读写这些实体，
//! 再通过 `into_*` 方法转换。

pub mod prelude;

pub mod academic_years;
pub mod attendance_records;
pub mod classes;
pub mod discipline_records;
pub mod exams;
pub mod fee_invoice_items;
pub mod fee_invoices;
pub mod fee_payments;
pub mod fee_structures;
pub mod guardians;
pub mod marks;
pub mod notifications;
pub mod report_cards;
pub mod school_members;
pub mod schools;
pub mod students;
pub mod subjects;
pub mod terms;
pub mod timetable_entries;
pub mod users;
