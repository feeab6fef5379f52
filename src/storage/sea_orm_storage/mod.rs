//! SeaORM 存储实现
//!
//! 同一实现支持 SQLite、PostgreSQL 和 MySQL，
//! 后端类型由连接 URL 推断。

mod academics;
mod attendance;
mod classes;
mod discipline;
mod exams;
mod fees;
mod members;
mod notifications;
mod schools;
mod students;
mod subjects;
mod timetable;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolHubError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用全局配置连接并执行待运行的迁移
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接 `url` 并执行待运行的迁移
    pub async fn connect(url: &str, pool_size: u32, timeout_secs: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout_secs).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout_secs).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("Migration failed: {e}")))?;

        info!("SeaORM storage ready, database: {}", db_url);

        Ok(Self { db })
    }

    /// WAL 及相关 pragma。内存数据库只存在于单个连接中，
    /// 因此连接池固定为 1。
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolHubError::database_config(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let max_connections = if in_memory { 1 } else { pool_size.max(1) };

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout_secs));
        pool_options = if in_memory {
            pool_options.idle_timeout(None).max_lifetime(None)
        } else {
            pool_options.idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options.connect_with(opt).await.map_err(|e| {
            SchoolHubError::database_connection(format!("SQLite connection failed: {e}"))
        })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// PostgreSQL、MySQL 与 MariaDB
    async fn connect_generic(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt).await.map_err(|e| {
            SchoolHubError::database_connection(format!("Unable to connect to database: {e}"))
        })
    }

    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolHubError::database_config(format!(
                "Cannot infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite path"
            )))
        }
    }
}

use crate::models::{
    PaginatedResponse,
    academic_years::{
        entities::{AcademicYear, Term},
        requests::{
            CreateAcademicYearRequest, CreateTermRequest, UpdateAcademicYearRequest,
            UpdateTermRequest,
        },
    },
    attendance::{
        entities::{AttendanceRecord, AttendanceSummary},
        requests::{AttendanceEntry, AttendanceSummaryQuery},
    },
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
    },
    discipline::{
        entities::DisciplineRecord,
        requests::{
            CreateDisciplineRecordRequest, DisciplineListQuery, UpdateDisciplineRecordRequest,
        },
    },
    exams::{
        entities::{Exam, Mark},
        requests::{CreateExamRequest, ExamListQuery, MarkEntry, UpdateExamRequest},
    },
    fees::{
        entities::{FeeInvoice, FeePayment, FeeStructure},
        requests::{
            CreateFeeStructureRequest, CreateInvoiceRequest, FeeStructureListQuery,
            InvoiceListQuery, PaymentListQuery, RecordPaymentRequest, UpdateFeeStructureRequest,
            UpdateInvoiceRequest,
        },
        responses::{InvoiceDetail, PaymentReceipt},
    },
    members::{
        entities::{MembershipSummary, SchoolMember, SchoolRole, StaffMember},
        requests::StaffListQuery,
    },
    notifications::{
        entities::{Notification, NotificationKind},
        requests::NotificationListQuery,
    },
    report_cards::{
        entities::ReportCard, grading::ReportCardDraft, requests::ReportCardQuery,
    },
    schools::{
        entities::School,
        requests::{CreateSchoolRequest, SchoolListQuery, UpdateSchoolRequest},
    },
    students::{
        entities::{Guardian, Student},
        requests::{
            CreateGuardianRequest, CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
        },
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
    },
    timetable::{
        entities::TimetableEntry,
        requests::{CreateTimetableEntryRequest, TimetableQuery, UpdateTimetableEntryRequest},
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::Storage;
use crate::utils::NumberFormat;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 学校
    async fn create_school(&self, creator_id: i64, school: CreateSchoolRequest) -> Result<School> {
        self.create_school_impl(creator_id, school).await
    }

    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>> {
        self.get_school_by_id_impl(id).await
    }

    async fn get_school_by_slug(&self, slug: &str) -> Result<Option<School>> {
        self.get_school_by_slug_impl(slug).await
    }

    async fn list_schools(
        &self,
        member_user_id: Option<i64>,
        query: SchoolListQuery,
    ) -> Result<PaginatedResponse<School>> {
        self.list_schools_impl(member_user_id, query).await
    }

    async fn update_school(&self, id: i64, update: UpdateSchoolRequest) -> Result<Option<School>> {
        self.update_school_impl(id, update).await
    }

    // 成员
    async fn get_membership(&self, school_id: i64, user_id: i64) -> Result<Option<SchoolMember>> {
        self.get_membership_impl(school_id, user_id).await
    }

    async fn list_user_memberships(&self, user_id: i64) -> Result<Vec<MembershipSummary>> {
        self.list_user_memberships_impl(user_id).await
    }

    async fn list_staff(&self, school_id: i64, query: StaffListQuery) -> Result<Vec<StaffMember>> {
        self.list_staff_impl(school_id, query).await
    }

    async fn get_staff_member(
        &self,
        school_id: i64,
        member_id: i64,
    ) -> Result<Option<SchoolMember>> {
        self.get_staff_member_impl(school_id, member_id).await
    }

    async fn add_staff(
        &self,
        school_id: i64,
        user_id: i64,
        role: SchoolRole,
    ) -> Result<SchoolMember> {
        self.add_staff_impl(school_id, user_id, role).await
    }

    async fn update_staff(
        &self,
        school_id: i64,
        member_id: i64,
        role: Option<SchoolRole>,
        is_active: Option<bool>,
    ) -> Result<Option<SchoolMember>> {
        self.update_staff_impl(school_id, member_id, role, is_active).await
    }

    async fn count_active_staff(&self, school_id: i64) -> Result<u64> {
        self.count_active_staff_impl(school_id).await
    }

    async fn resolve_member_user_ids(
        &self,
        school_id: i64,
        user_ids: &[i64],
        roles: &[SchoolRole],
    ) -> Result<Vec<i64>> {
        self.resolve_member_user_ids_impl(school_id, user_ids, roles).await
    }

    // 学年
    async fn list_academic_years(&self, school_id: i64) -> Result<Vec<AcademicYear>> {
        self.list_academic_years_impl(school_id).await
    }

    async fn get_academic_year(&self, school_id: i64, id: i64) -> Result<Option<AcademicYear>> {
        self.get_academic_year_impl(school_id, id).await
    }

    async fn create_academic_year(
        &self,
        school_id: i64,
        year: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        self.create_academic_year_impl(school_id, year).await
    }

    async fn update_academic_year(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>> {
        self.update_academic_year_impl(school_id, id, update).await
    }

    async fn set_current_academic_year(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<AcademicYear>> {
        self.set_current_academic_year_impl(school_id, id).await
    }

    async fn delete_academic_year(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_academic_year_impl(school_id, id).await
    }

    // 学期
    async fn list_terms(&self, school_id: i64, academic_year_id: Option<i64>) -> Result<Vec<Term>> {
        self.list_terms_impl(school_id, academic_year_id).await
    }

    async fn get_term(&self, school_id: i64, id: i64) -> Result<Option<Term>> {
        self.get_term_impl(school_id, id).await
    }

    async fn create_term(&self, school_id: i64, term: CreateTermRequest) -> Result<Term> {
        self.create_term_impl(school_id, term).await
    }

    async fn update_term(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateTermRequest,
    ) -> Result<Option<Term>> {
        self.update_term_impl(school_id, id, update).await
    }

    async fn set_current_term(&self, school_id: i64, id: i64) -> Result<Option<Term>> {
        self.set_current_term_impl(school_id, id).await
    }

    async fn delete_term(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_term_impl(school_id, id).await
    }

    // 班级
    async fn list_classes(
        &self,
        school_id: i64,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>> {
        self.list_classes_impl(school_id, query).await
    }

    async fn get_class(&self, school_id: i64, id: i64) -> Result<Option<Class>> {
        self.get_class_impl(school_id, id).await
    }

    async fn get_class_by_name(&self, school_id: i64, name: &str) -> Result<Option<Class>> {
        self.get_class_by_name_impl(school_id, name).await
    }

    async fn create_class(&self, school_id: i64, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(school_id, class).await
    }

    async fn update_class(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(school_id, id, update).await
    }

    async fn deactivate_class(&self, school_id: i64, id: i64) -> Result<bool> {
        self.deactivate_class_impl(school_id, id).await
    }

    async fn count_active_classes(&self, school_id: i64) -> Result<u64> {
        self.count_active_classes_impl(school_id).await
    }

    // 科目
    async fn list_subjects(&self, school_id: i64, query: SubjectListQuery) -> Result<Vec<Subject>> {
        self.list_subjects_impl(school_id, query).await
    }

    async fn get_subject(&self, school_id: i64, id: i64) -> Result<Option<Subject>> {
        self.get_subject_impl(school_id, id).await
    }

    async fn create_subject(
        &self,
        school_id: i64,
        subject: CreateSubjectRequest,
    ) -> Result<Subject> {
        self.create_subject_impl(school_id, subject).await
    }

    async fn update_subject(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(school_id, id, update).await
    }

    async fn deactivate_subject(&self, school_id: i64, id: i64) -> Result<bool> {
        self.deactivate_subject_impl(school_id, id).await
    }

    // 学生
    async fn list_students(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        self.list_students_impl(school_id, query).await
    }

    async fn get_student(&self, school_id: i64, id: i64) -> Result<Option<Student>> {
        self.get_student_impl(school_id, id).await
    }

    async fn create_student(
        &self,
        school_id: i64,
        student: CreateStudentRequest,
    ) -> Result<Student> {
        self.create_student_impl(school_id, student).await
    }

    async fn update_student(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(school_id, id, update).await
    }

    async fn deactivate_student(&self, school_id: i64, id: i64) -> Result<bool> {
        self.deactivate_student_impl(school_id, id).await
    }

    async fn list_class_students(
        &self,
        school_id: i64,
        class_id: i64,
        active_only: bool,
    ) -> Result<Vec<Student>> {
        self.list_class_students_impl(school_id, class_id, active_only).await
    }

    async fn existing_student_ids(&self, school_id: i64, ids: &[i64]) -> Result<Vec<i64>> {
        self.existing_student_ids_impl(school_id, ids).await
    }

    async fn count_active_students(&self, school_id: i64) -> Result<u64> {
        self.count_active_students_impl(school_id).await
    }

    // 监护人
    async fn list_guardians(&self, school_id: i64, student_id: i64) -> Result<Vec<Guardian>> {
        self.list_guardians_impl(school_id, student_id).await
    }

    async fn create_guardian(
        &self,
        school_id: i64,
        student_id: i64,
        guardian: CreateGuardianRequest,
    ) -> Result<Guardian> {
        self.create_guardian_impl(school_id, student_id, guardian).await
    }

    async fn delete_guardian(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_guardian_impl(school_id, id).await
    }

    // 考勤
    async fn list_attendance(
        &self,
        school_id: i64,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_impl(school_id, class_id, date).await
    }

    async fn save_attendance(
        &self,
        school_id: i64,
        class_id: i64,
        date: NaiveDate,
        recorded_by: i64,
        entries: Vec<AttendanceEntry>,
    ) -> Result<Vec<AttendanceRecord>> {
        self.save_attendance_impl(school_id, class_id, date, recorded_by, entries).await
    }

    async fn attendance_summary(
        &self,
        school_id: i64,
        query: &AttendanceSummaryQuery,
    ) -> Result<AttendanceSummary> {
        self.attendance_summary_impl(school_id, query).await
    }

    // 考试与成绩
    async fn list_exams(&self, school_id: i64, query: ExamListQuery) -> Result<Vec<Exam>> {
        self.list_exams_impl(school_id, query).await
    }

    async fn get_exam(&self, school_id: i64, id: i64) -> Result<Option<Exam>> {
        self.get_exam_impl(school_id, id).await
    }

    async fn create_exam(&self, school_id: i64, exam: CreateExamRequest) -> Result<Exam> {
        self.create_exam_impl(school_id, exam).await
    }

    async fn update_exam(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateExamRequest,
    ) -> Result<Option<Exam>> {
        self.update_exam_impl(school_id, id, update).await
    }

    async fn delete_exam(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_exam_impl(school_id, id).await
    }

    async fn list_marks(&self, school_id: i64, exam_id: i64) -> Result<Vec<Mark>> {
        self.list_marks_impl(school_id, exam_id).await
    }

    async fn list_marks_for_exams(&self, school_id: i64, exam_ids: &[i64]) -> Result<Vec<Mark>> {
        self.list_marks_for_exams_impl(school_id, exam_ids).await
    }

    async fn replace_marks(
        &self,
        school_id: i64,
        exam_id: i64,
        recorded_by: i64,
        entries: Vec<MarkEntry>,
    ) -> Result<Vec<Mark>> {
        self.replace_marks_impl(school_id, exam_id, recorded_by, entries).await
    }

    // 成绩单
    async fn replace_report_cards(
        &self,
        school_id: i64,
        term_id: i64,
        class_id: i64,
        drafts: Vec<ReportCardDraft>,
    ) -> Result<Vec<ReportCard>> {
        self.replace_report_cards_impl(school_id, term_id, class_id, drafts).await
    }

    async fn list_report_cards(
        &self,
        school_id: i64,
        query: ReportCardQuery,
    ) -> Result<Vec<ReportCard>> {
        self.list_report_cards_impl(school_id, query).await
    }

    // 收费项目
    async fn list_fee_structures(
        &self,
        school_id: i64,
        query: FeeStructureListQuery,
    ) -> Result<Vec<FeeStructure>> {
        self.list_fee_structures_impl(school_id, query).await
    }

    async fn get_fee_structure(&self, school_id: i64, id: i64) -> Result<Option<FeeStructure>> {
        self.get_fee_structure_impl(school_id, id).await
    }

    async fn create_fee_structure(
        &self,
        school_id: i64,
        structure: CreateFeeStructureRequest,
    ) -> Result<FeeStructure> {
        self.create_fee_structure_impl(school_id, structure).await
    }

    async fn update_fee_structure(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateFeeStructureRequest,
    ) -> Result<Option<FeeStructure>> {
        self.update_fee_structure_impl(school_id, id, update).await
    }

    async fn deactivate_fee_structure(&self, school_id: i64, id: i64) -> Result<bool> {
        self.deactivate_fee_structure_impl(school_id, id).await
    }

    // 发票与付款
    async fn create_invoice(
        &self,
        school_id: i64,
        created_by: i64,
        issue_date: NaiveDate,
        numbering: &NumberFormat,
        invoice: CreateInvoiceRequest,
    ) -> Result<InvoiceDetail> {
        self.create_invoice_impl(school_id, created_by, issue_date, numbering, invoice).await
    }

    async fn get_invoice(&self, school_id: i64, id: i64) -> Result<Option<FeeInvoice>> {
        self.get_invoice_impl(school_id, id).await
    }

    async fn get_invoice_detail(&self, school_id: i64, id: i64) -> Result<Option<InvoiceDetail>> {
        self.get_invoice_detail_impl(school_id, id).await
    }

    async fn list_invoices(
        &self,
        school_id: i64,
        query: InvoiceListQuery,
    ) -> Result<PaginatedResponse<FeeInvoice>> {
        self.list_invoices_impl(school_id, query).await
    }

    async fn update_invoice(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateInvoiceRequest,
    ) -> Result<Option<FeeInvoice>> {
        self.update_invoice_impl(school_id, id, update).await
    }

    async fn record_payment(
        &self,
        school_id: i64,
        received_by: i64,
        numbering: &NumberFormat,
        payment: RecordPaymentRequest,
    ) -> Result<PaymentReceipt> {
        self.record_payment_impl(school_id, received_by, numbering, payment).await
    }

    async fn list_payments(
        &self,
        school_id: i64,
        query: PaymentListQuery,
    ) -> Result<Vec<FeePayment>> {
        self.list_payments_impl(school_id, query).await
    }

    async fn outstanding_balance(&self, school_id: i64) -> Result<i64> {
        self.outstanding_balance_impl(school_id).await
    }

    // 课表
    async fn list_timetable(
        &self,
        school_id: i64,
        query: TimetableQuery,
    ) -> Result<Vec<TimetableEntry>> {
        self.list_timetable_impl(school_id, query).await
    }

    async fn get_timetable_entry(&self, school_id: i64, id: i64) -> Result<Option<TimetableEntry>> {
        self.get_timetable_entry_impl(school_id, id).await
    }

    async fn list_timetable_day(
        &self,
        school_id: i64,
        day_of_week: i32,
        class_id: i64,
        teacher_id: Option<i64>,
    ) -> Result<Vec<TimetableEntry>> {
        self.list_timetable_day_impl(school_id, day_of_week, class_id, teacher_id).await
    }

    async fn create_timetable_entry(
        &self,
        school_id: i64,
        entry: CreateTimetableEntryRequest,
    ) -> Result<TimetableEntry> {
        self.create_timetable_entry_impl(school_id, entry).await
    }

    async fn update_timetable_entry(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateTimetableEntryRequest,
    ) -> Result<Option<TimetableEntry>> {
        self.update_timetable_entry_impl(school_id, id, update).await
    }

    async fn delete_timetable_entry(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_timetable_entry_impl(school_id, id).await
    }

    // 纪律
    async fn list_discipline_records(
        &self,
        school_id: i64,
        query: DisciplineListQuery,
    ) -> Result<Vec<DisciplineRecord>> {
        self.list_discipline_records_impl(school_id, query).await
    }

    async fn get_discipline_record(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<DisciplineRecord>> {
        self.get_discipline_record_impl(school_id, id).await
    }

    async fn create_discipline_record(
        &self,
        school_id: i64,
        reported_by: i64,
        record: CreateDisciplineRecordRequest,
    ) -> Result<DisciplineRecord> {
        self.create_discipline_record_impl(school_id, reported_by, record).await
    }

    async fn update_discipline_record(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateDisciplineRecordRequest,
    ) -> Result<Option<DisciplineRecord>> {
        self.update_discipline_record_impl(school_id, id, update).await
    }

    async fn delete_discipline_record(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_discipline_record_impl(school_id, id).await
    }

    async fn count_open_discipline_records(&self, school_id: i64) -> Result<u64> {
        self.count_open_discipline_records_impl(school_id).await
    }

    // 通知
    async fn list_notifications(
        &self,
        school_id: i64,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<PaginatedResponse<Notification>> {
        self.list_notifications_impl(school_id, user_id, query).await
    }

    async fn count_unread_notifications(&self, school_id: i64, user_id: i64) -> Result<i64> {
        self.count_unread_notifications_impl(school_id, user_id).await
    }

    async fn create_notifications(
        &self,
        school_id: i64,
        user_ids: &[i64],
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Result<usize> {
        self.create_notifications_impl(school_id, user_ids, title, message, kind).await
    }

    async fn mark_notification_read(&self, school_id: i64, user_id: i64, id: i64) -> Result<bool> {
        self.mark_notification_read_impl(school_id, user_id, id).await
    }

    async fn mark_all_notifications_read(&self, school_id: i64, user_id: i64) -> Result<u64> {
        self.mark_all_notifications_read_impl(school_id, user_id).await
    }
}

/// `map_err` 适配器：给错误加上 `context` 前缀，唯一索引冲突
/// 保留为 conflict。
pub(crate) fn db_error(context: &'static str) -> impl Fn(DbErr) -> SchoolHubError {
    move |err| match SchoolHubError::from(err) {
        SchoolHubError::Conflict(detail) => {
            SchoolHubError::conflict(format!("{context}: {detail}"))
        }
        other => SchoolHubError::database_operation(format!("{context}: {}", other.message())),
    }
}

pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("schoolhub.db").unwrap(),
            "sqlite://schoolhub.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/schoolhub").unwrap(),
            "postgres://u:p@localhost/schoolhub"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }

    #[test]
    fn test_db_error_keeps_generic_errors_as_database_errors() {
        let err = db_error("Failed to load school")(DbErr::Custom("boom".into()));
        assert_eq!(err.code(), "E005");
        assert!(err.message().starts_with("Failed to load school"));
    }
}
