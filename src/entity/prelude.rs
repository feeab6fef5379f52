pub use super::academic_years::Entity as AcademicYears;
pub use super::attendance_records::Entity as AttendanceRecords;
pub use super::classes::Entity as Classes;
pub use super::discipline_records::Entity as DisciplineRecords;
pub use super::exams::Entity as Exams;
pub use super::fee_invoice_items::Entity as FeeInvoiceItems;
pub use super::fee_invoices::Entity as FeeInvoices;
pub use super::fee_payments::Entity as FeePayments;
pub use super::fee_structures::Entity as FeeStructures;
pub use super::guardians::Entity as Guardians;
pub use super::marks::Entity as Marks;
pub use super::notifications::Entity as Notifications;
pub use super::report_cards::Entity as ReportCards;
pub use super::school_members::Entity as SchoolMembers;
pub use super::schools::Entity as Schools;
pub use super::students::Entity as Students;
pub use super::subjects::Entity as Subjects;
pub use super::terms::Entity as Terms;
pub use super::timetable_entries::Entity as TimetableEntries;
pub use super::users::Entity as Users;
