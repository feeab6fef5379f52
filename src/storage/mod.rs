//! 持久化边界
//!
//! 所有租户数据的读取、更新和删除都带上所属的 `school_id`；
//! 属于其他学校的记录与不存在的记录表现完全一致。

use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::Result;
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
use crate::utils::NumberFormat;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    // 用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;

    // 学校
    /// 在同一事务中插入学校并为 `creator_id` 创建 `admin` 成员身份
    async fn create_school(&self, creator_id: i64, school: CreateSchoolRequest) -> Result<School>;
    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>>;
    async fn get_school_by_slug(&self, slug: &str) -> Result<Option<School>>;
    /// `member_user_id = None` 时列出全部学校
    async fn list_schools(
        &self,
        member_user_id: Option<i64>,
        query: SchoolListQuery,
    ) -> Result<PaginatedResponse<School>>;
    async fn update_school(&self, id: i64, update: UpdateSchoolRequest) -> Result<Option<School>>;

    // 成员
    async fn get_membership(&self, school_id: i64, user_id: i64) -> Result<Option<SchoolMember>>;
    async fn list_user_memberships(&self, user_id: i64) -> Result<Vec<MembershipSummary>>;
    async fn list_staff(&self, school_id: i64, query: StaffListQuery) -> Result<Vec<StaffMember>>;
    async fn get_staff_member(&self, school_id: i64, member_id: i64)
    -> Result<Option<SchoolMember>>;
    /// 重新激活已停用的成员身份；有效成员则视为冲突
    async fn add_staff(&self, school_id: i64, user_id: i64, role: SchoolRole)
    -> Result<SchoolMember>;
    /// 拒绝让学校失去最后一个有效管理员
    async fn update_staff(
        &self,
        school_id: i64,
        member_id: i64,
        role: Option<SchoolRole>,
        is_active: Option<bool>,
    ) -> Result<Option<SchoolMember>>;
    async fn count_active_staff(&self, school_id: i64) -> Result<u64>;
    /// 用户 id 在 `user_ids` 中或角色在 `roles` 中的有效成员
    async fn resolve_member_user_ids(
        &self,
        school_id: i64,
        user_ids: &[i64],
        roles: &[SchoolRole],
    ) -> Result<Vec<i64>>;

    // 学年
    async fn list_academic_years(&self, school_id: i64) -> Result<Vec<AcademicYear>>;
    async fn get_academic_year(&self, school_id: i64, id: i64) -> Result<Option<AcademicYear>>;
    async fn create_academic_year(
        &self,
        school_id: i64,
        year: CreateAcademicYearRequest,
    ) -> Result<AcademicYear>;
    async fn update_academic_year(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>>;
    async fn set_current_academic_year(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<AcademicYear>>;
    async fn delete_academic_year(&self, school_id: i64, id: i64) -> Result<bool>;

    // 学期
    async fn list_terms(&self, school_id: i64, academic_year_id: Option<i64>) -> Result<Vec<Term>>;
    async fn get_term(&self, school_id: i64, id: i64) -> Result<Option<Term>>;
    async fn create_term(&self, school_id: i64, term: CreateTermRequest) -> Result<Term>;
    async fn update_term(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateTermRequest,
    ) -> Result<Option<Term>>;
    async fn set_current_term(&self, school_id: i64, id: i64) -> Result<Option<Term>>;
    async fn delete_term(&self, school_id: i64, id: i64) -> Result<bool>;

    // 班级
    async fn list_classes(
        &self,
        school_id: i64,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>>;
    async fn get_class(&self, school_id: i64, id: i64) -> Result<Option<Class>>;
    async fn get_class_by_name(&self, school_id: i64, name: &str) -> Result<Option<Class>>;
    async fn create_class(&self, school_id: i64, class: CreateClassRequest) -> Result<Class>;
    async fn update_class(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    async fn deactivate_class(&self, school_id: i64, id: i64) -> Result<bool>;
    async fn count_active_classes(&self, school_id: i64) -> Result<u64>;

    // 科目
    async fn list_subjects(&self, school_id: i64, query: SubjectListQuery) -> Result<Vec<Subject>>;
    async fn get_subject(&self, school_id: i64, id: i64) -> Result<Option<Subject>>;
    async fn create_subject(&self, school_id: i64, subject: CreateSubjectRequest)
    -> Result<Subject>;
    async fn update_subject(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>>;
    async fn deactivate_subject(&self, school_id: i64, id: i64) -> Result<bool>;

    // 学生
    async fn list_students(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>>;
    async fn get_student(&self, school_id: i64, id: i64) -> Result<Option<Student>>;
    async fn create_student(&self, school_id: i64, student: CreateStudentRequest)
    -> Result<Student>;
    async fn update_student(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn deactivate_student(&self, school_id: i64, id: i64) -> Result<bool>;
    async fn list_class_students(
        &self,
        school_id: i64,
        class_id: i64,
        active_only: bool,
    ) -> Result<Vec<Student>>;
    /// `ids` 中属于该校学生的子集
    async fn existing_student_ids(&self, school_id: i64, ids: &[i64]) -> Result<Vec<i64>>;
    async fn count_active_students(&self, school_id: i64) -> Result<u64>;

    // 监护人
    async fn list_guardians(&self, school_id: i64, student_id: i64) -> Result<Vec<Guardian>>;
    /// 设置主监护人时在同一事务中清除该学生其他监护人的标记
    async fn create_guardian(
        &self,
        school_id: i64,
        student_id: i64,
        guardian: CreateGuardianRequest,
    ) -> Result<Guardian>;
    async fn delete_guardian(&self, school_id: i64, id: i64) -> Result<bool>;

    // 考勤
    async fn list_attendance(
        &self,
        school_id: i64,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>>;
    /// 在同一事务中替换班级在 `date` 的考勤记录
    async fn save_attendance(
        &self,
        school_id: i64,
        class_id: i64,
        date: NaiveDate,
        recorded_by: i64,
        entries: Vec<AttendanceEntry>,
    ) -> Result<Vec<AttendanceRecord>>;
    async fn attendance_summary(
        &self,
        school_id: i64,
        query: &AttendanceSummaryQuery,
    ) -> Result<AttendanceSummary>;

    // 考试与成绩
    async fn list_exams(&self, school_id: i64, query: ExamListQuery) -> Result<Vec<Exam>>;
    async fn get_exam(&self, school_id: i64, id: i64) -> Result<Option<Exam>>;
    async fn create_exam(&self, school_id: i64, exam: CreateExamRequest) -> Result<Exam>;
    async fn update_exam(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateExamRequest,
    ) -> Result<Option<Exam>>;
    /// 删除考试及其成绩
    async fn delete_exam(&self, school_id: i64, id: i64) -> Result<bool>;
    async fn list_marks(&self, school_id: i64, exam_id: i64) -> Result<Vec<Mark>>;
    async fn list_marks_for_exams(&self, school_id: i64, exam_ids: &[i64]) -> Result<Vec<Mark>>;
    /// 在同一事务中替换该考试的全部成绩
    async fn replace_marks(
        &self,
        school_id: i64,
        exam_id: i64,
        recorded_by: i64,
        entries: Vec<MarkEntry>,
    ) -> Result<Vec<Mark>>;

    // 成绩单
    /// 删除每个草稿对应学生与学期的已有成绩单，再插入草稿，
    /// 全部在同一事务中完成。
    async fn replace_report_cards(
        &self,
        school_id: i64,
        term_id: i64,
        class_id: i64,
        drafts: Vec<ReportCardDraft>,
    ) -> Result<Vec<ReportCard>>;
    async fn list_report_cards(
        &self,
        school_id: i64,
        query: ReportCardQuery,
    ) -> Result<Vec<ReportCard>>;

    // 收费项目
    async fn list_fee_structures(
        &self,
        school_id: i64,
        query: FeeStructureListQuery,
    ) -> Result<Vec<FeeStructure>>;
    async fn get_fee_structure(&self, school_id: i64, id: i64) -> Result<Option<FeeStructure>>;
    async fn create_fee_structure(
        &self,
        school_id: i64,
        structure: CreateFeeStructureRequest,
    ) -> Result<FeeStructure>;
    async fn update_fee_structure(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateFeeStructureRequest,
    ) -> Result<Option<FeeStructure>>;
    async fn deactivate_fee_structure(&self, school_id: i64, id: i64) -> Result<bool>;

    // 发票与付款
    /// 在同一事务中为发票编号并插入发票及其明细
    async fn create_invoice(
        &self,
        school_id: i64,
        created_by: i64,
        issue_date: NaiveDate,
        numbering: &NumberFormat,
        invoice: CreateInvoiceRequest,
    ) -> Result<InvoiceDetail>;
    async fn get_invoice(&self, school_id: i64, id: i64) -> Result<Option<FeeInvoice>>;
    async fn get_invoice_detail(&self, school_id: i64, id: i64) -> Result<Option<InvoiceDetail>>;
    async fn list_invoices(
        &self,
        school_id: i64,
        query: InvoiceListQuery,
    ) -> Result<PaginatedResponse<FeeInvoice>>;
    /// 已有付款的发票不能作废
    async fn update_invoice(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateInvoiceRequest,
    ) -> Result<Option<FeeInvoice>>;
    /// 在同一事务中插入付款并结算发票金额
    async fn record_payment(
        &self,
        school_id: i64,
        received_by: i64,
        numbering: &NumberFormat,
        payment: RecordPaymentRequest,
    ) -> Result<PaymentReceipt>;
    async fn list_payments(&self, school_id: i64, query: PaymentListQuery)
    -> Result<Vec<FeePayment>>;
    /// 未作废发票的余额合计
    async fn outstanding_balance(&self, school_id: i64) -> Result<i64>;

    // 课表
    async fn list_timetable(
        &self,
        school_id: i64,
        query: TimetableQuery,
    ) -> Result<Vec<TimetableEntry>>;
    async fn get_timetable_entry(&self, school_id: i64, id: i64)
    -> Result<Option<TimetableEntry>>;
    /// `day_of_week` 当天该班级的条目；指定教师时也包括该教师的条目
    async fn list_timetable_day(
        &self,
        school_id: i64,
        day_of_week: i32,
        class_id: i64,
        teacher_id: Option<i64>,
    ) -> Result<Vec<TimetableEntry>>;
    async fn create_timetable_entry(
        &self,
        school_id: i64,
        entry: CreateTimetableEntryRequest,
    ) -> Result<TimetableEntry>;
    async fn update_timetable_entry(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateTimetableEntryRequest,
    ) -> Result<Option<TimetableEntry>>;
    async fn delete_timetable_entry(&self, school_id: i64, id: i64) -> Result<bool>;

    // 纪律
    async fn list_discipline_records(
        &self,
        school_id: i64,
        query: DisciplineListQuery,
    ) -> Result<Vec<DisciplineRecord>>;
    async fn get_discipline_record(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<DisciplineRecord>>;
    async fn create_discipline_record(
        &self,
        school_id: i64,
        reported_by: i64,
        record: CreateDisciplineRecordRequest,
    ) -> Result<DisciplineRecord>;
    async fn update_discipline_record(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateDisciplineRecordRequest,
    ) -> Result<Option<DisciplineRecord>>;
    async fn delete_discipline_record(&self, school_id: i64, id: i64) -> Result<bool>;
    async fn count_open_discipline_records(&self, school_id: i64) -> Result<u64>;

    // 通知
    async fn list_notifications(
        &self,
        school_id: i64,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<PaginatedResponse<Notification>>;
    async fn count_unread_notifications(&self, school_id: i64, user_id: i64) -> Result<i64>;
    /// 每个接收者一行，在同一事务中插入
    async fn create_notifications(
        &self,
        school_id: i64,
        user_ids: &[i64],
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Result<usize>;
    async fn mark_notification_read(&self, school_id: i64, user_id: i64, id: i64)
    -> Result<bool>;
    async fn mark_all_notifications_read(&self, school_id: i64, user_id: i64) -> Result<u64>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
