//! 存储层行为测试，使用执行了正式迁移的内存 SQLite 数据库

use chrono::{NaiveDate, NaiveTime};

use schoolhub::models::PaginationQuery;
use schoolhub::models::academic_years::requests::CreateAcademicYearRequest;
use schoolhub::models::attendance::entities::AttendanceStatus;
use schoolhub::models::attendance::requests::{AttendanceEntry, AttendanceSummaryQuery};
use schoolhub::models::classes::requests::CreateClassRequest;
use schoolhub::models::fees::entities::{InvoiceStatus, PaymentMethod};
use schoolhub::models::fees::requests::{
    CreateInvoiceRequest, InvoiceItemInput, RecordPaymentRequest,
};
use schoolhub::models::members::entities::SchoolRole;
use schoolhub::models::notifications::entities::NotificationKind;
use schoolhub::models::notifications::requests::NotificationListQuery;
use schoolhub::models::schools::requests::CreateSchoolRequest;
use schoolhub::models::students::requests::{CreateStudentRequest, StudentListQuery};
use schoolhub::models::subjects::requests::CreateSubjectRequest;
use schoolhub::models::timetable::requests::CreateTimetableEntryRequest;
use schoolhub::models::users::entities::{User, UserRole, UserStatus};
use schoolhub::models::users::requests::CreateUserRequest;
use schoolhub::storage::Storage;
use schoolhub::storage::sea_orm_storage::SeaOrmStorage;
use schoolhub::utils::NumberFormat;

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::connect(":memory:", 1, 5)
        .await
        .expect("in-memory database")
}

async fn user(storage: &SeaOrmStorage, username: &str) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            role: UserRole::User,
            status: UserStatus::Active,
            display_name: None,
        })
        .await
        .unwrap()
}

async fn school(storage: &SeaOrmStorage, creator: &User, slug: &str) -> i64 {
    storage
        .create_school(
            creator.id,
            CreateSchoolRequest {
                name: format!("School {slug}"),
                slug: slug.to_string(),
                address: None,
                phone: None,
                email: None,
            },
        )
        .await
        .unwrap()
        .id
}

fn student_request(admission_number: &str, class_id: Option<i64>) -> CreateStudentRequest {
    CreateStudentRequest {
        school_id: None,
        admission_number: admission_number.to_string(),
        first_name: "Ada".to_string(),
        last_name: format!("Student {admission_number}"),
        gender: None,
        date_of_birth: None,
        class_id,
        admission_date: None,
        address: None,
        phone: None,
        email: None,
    }
}

fn class_request(name: &str) -> CreateClassRequest {
    CreateClassRequest {
        school_id: None,
        academic_year_id: None,
        name: name.to_string(),
        grade_level: Some(5),
        section: None,
        class_teacher_id: None,
        capacity: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_school_creation_makes_creator_admin() {
    let storage = storage().await;
    let owner = user(&storage, "owner").await;
    let school_id = school(&storage, &owner, "hillside").await;

    let member = storage
        .get_membership(school_id, owner.id)
        .await
        .unwrap()
        .expect("creator membership");
    assert_eq!(member.role, SchoolRole::Admin);
    assert!(member.is_active);

    let duplicate = storage
        .create_school(
            owner.id,
            CreateSchoolRequest {
                name: "Another".to_string(),
                slug: "hillside".to_string(),
                address: None,
                phone: None,
                email: None,
            },
        )
        .await
        .unwrap_err();
    assert!(duplicate.is_unique_violation());
}

#[tokio::test]
async fn test_last_admin_cannot_be_removed() {
    let storage = storage().await;
    let owner = user(&storage, "owner").await;
    let school_id = school(&storage, &owner, "hillside").await;
    let member = storage
        .get_membership(school_id, owner.id)
        .await
        .unwrap()
        .unwrap();

    assert!(
        storage
            .update_staff(school_id, member.id, Some(SchoolRole::Teacher), None)
            .await
            .is_err()
    );

    let second = user(&storage, "deputy").await;
    storage
        .add_staff(school_id, second.id, SchoolRole::Admin)
        .await
        .unwrap();
    let demoted = storage
        .update_staff(school_id, member.id, Some(SchoolRole::Teacher), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(demoted.role, SchoolRole::Teacher);
}

#[tokio::test]
async fn test_rows_are_scoped_to_their_school() {
    let storage = storage().await;
    let owner = user(&storage, "owner").await;
    let first = school(&storage, &owner, "first").await;
    let second = school(&storage, &owner, "second").await;

    let student = storage
        .create_student(first, student_request("A-001", None))
        .await
        .unwrap();

    assert!(storage.get_student(first, student.id).await.unwrap().is_some());
    assert!(storage.get_student(second, student.id).await.unwrap().is_none());
    assert!(!storage.deactivate_student(second, student.id).await.unwrap());

    // 同一学号在其他学校可以使用
    storage
        .create_student(second, student_request("A-001", None))
        .await
        .unwrap();
    let duplicate = storage
        .create_student(first, student_request("A-001", None))
        .await
        .unwrap_err();
    assert!(duplicate.is_unique_violation());

    let page = storage
        .list_students(
            first,
            StudentListQuery {
                pagination: PaginationQuery::default(),
                school_id: Some(first),
                class_id: None,
                status: None,
                search: Some("a-00".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.pagination.total, 1);
}

#[tokio::test]
async fn test_only_one_current_academic_year() {
    let storage = storage().await;
    let owner = user(&storage, "owner").await;
    let school_id = school(&storage, &owner, "hillside").await;

    let year = |name: &str, start: i32| CreateAcademicYearRequest {
        school_id: Some(school_id),
        name: name.to_string(),
        start_date: date(start, 9, 1),
        end_date: date(start + 1, 7, 31),
        is_current: true,
    };
    let old = storage
        .create_academic_year(school_id, year("2025/26", 2025))
        .await
        .unwrap();
    let new = storage
        .create_academic_year(school_id, year("2026/27", 2026))
        .await
        .unwrap();

    let years = storage.list_academic_years(school_id).await.unwrap();
    let current: Vec<i64> = years.iter().filter(|y| y.is_current).map(|y| y.id).collect();
    assert_eq!(current, vec![new.id]);

    storage
        .set_current_academic_year(school_id, old.id)
        .await
        .unwrap()
        .unwrap();
    let years = storage.list_academic_years(school_id).await.unwrap();
    let current: Vec<i64> = years.iter().filter(|y| y.is_current).map(|y| y.id).collect();
    assert_eq!(current, vec![old.id]);
}

#[tokio::test]
async fn test_attendance_save_replaces_register() {
    let storage = storage().await;
    let owner = user(&storage, "owner").await;
    let school_id = school(&storage, &owner, "hillside").await;
    let class = storage
        .create_class(school_id, class_request("5A"))
        .await
        .unwrap();
    let ada = storage
        .create_student(school_id, student_request("A-1", Some(class.id)))
        .await
        .unwrap();
    let bob = storage
        .create_student(school_id, student_request("A-2", Some(class.id)))
        .await
        .unwrap();
    let day = date(2026, 3, 2);

    let entry = |student_id, status| AttendanceEntry {
        student_id,
        status,
        remarks: None,
    };
    storage
        .save_attendance(
            school_id,
            class.id,
            day,
            owner.id,
            vec![
                entry(ada.id, AttendanceStatus::Absent),
                entry(bob.id, AttendanceStatus::Absent),
            ],
        )
        .await
        .unwrap();
    let saved = storage
        .save_attendance(
            school_id,
            class.id,
            day,
            owner.id,
            vec![
                entry(ada.id, AttendanceStatus::Present),
                entry(bob.id, AttendanceStatus::Late),
            ],
        )
        .await
        .unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(
        storage
            .list_attendance(school_id, class.id, day)
            .await
            .unwrap()
            .len(),
        2
    );

    let summary = storage
        .attendance_summary(
            school_id,
            &AttendanceSummaryQuery {
                school_id: Some(school_id),
                student_id: None,
                class_id: Some(class.id),
                from: Some(day),
                to: Some(day),
            },
        )
        .await
        .unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.present, 1);
    assert_eq!(summary.late, 1);
    assert_eq!(summary.absent, 0);
    assert!((summary.attendance_rate - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_invoice_numbering_and_payments() {
    let storage = storage().await;
    let owner = user(&storage, "owner").await;
    let school_id = school(&storage, &owner, "hillside").await;
    let student = storage
        .create_student(school_id, student_request("A-1", None))
        .await
        .unwrap();
    let invoices = NumberFormat::new("INV", 5);
    let receipts = NumberFormat::new("RCP", 5);

    let invoice_request = || CreateInvoiceRequest {
        school_id: Some(school_id),
        student_id: student.id,
        issue_date: Some(date(2026, 1, 10)),
        due_date: date(2026, 2, 10),
        items: vec![
            InvoiceItemInput {
                description: "Tuition".to_string(),
                amount: 40_000,
                fee_structure_id: None,
            },
            InvoiceItemInput {
                description: "Books".to_string(),
                amount: 10_000,
                fee_structure_id: None,
            },
        ],
        notes: None,
    };

    let first = storage
        .create_invoice(school_id, owner.id, date(2026, 1, 10), &invoices, invoice_request())
        .await
        .unwrap();
    let second = storage
        .create_invoice(school_id, owner.id, date(2026, 1, 10), &invoices, invoice_request())
        .await
        .unwrap();
    assert_eq!(first.invoice.invoice_number, "INV-2026-00001");
    assert_eq!(second.invoice.invoice_number, "INV-2026-00002");
    assert_eq!(first.invoice.total_amount, 50_000);
    assert_eq!(first.invoice.balance, 50_000);
    assert_eq!(first.invoice.status, InvoiceStatus::Unpaid);
    assert_eq!(first.items.len(), 2);

    let paid_at = date(2026, 1, 15)
        .and_hms_opt(9, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp();
    let payment = |amount| RecordPaymentRequest {
        school_id: Some(school_id),
        invoice_id: first.invoice.id,
        amount,
        method: PaymentMethod::Cash,
        reference: None,
        paid_at: Some(paid_at),
    };

    let receipt = storage
        .record_payment(school_id, owner.id, &receipts, payment(20_000))
        .await
        .unwrap();
    assert_eq!(receipt.payment.receipt_number, "RCP-2026-00001");
    assert_eq!(receipt.invoice.amount_paid, 20_000);
    assert_eq!(receipt.invoice.balance, 30_000);
    assert_eq!(receipt.invoice.status, InvoiceStatus::Partial);

    assert!(
        storage
            .record_payment(school_id, owner.id, &receipts, payment(30_001))
            .await
            .is_err()
    );

    let receipt = storage
        .record_payment(school_id, owner.id, &receipts, payment(30_000))
        .await
        .unwrap();
    assert_eq!(receipt.invoice.balance, 0);
    assert_eq!(receipt.invoice.status, InvoiceStatus::Paid);

    assert_eq!(storage.outstanding_balance(school_id).await.unwrap(), 50_000);
}

#[tokio::test]
async fn test_timetable_day_lookup() {
    let storage = storage().await;
    let owner = user(&storage, "owner").await;
    let school_id = school(&storage, &owner, "hillside").await;
    let class_a = storage
        .create_class(school_id, class_request("5A"))
        .await
        .unwrap();
    let class_b = storage
        .create_class(school_id, class_request("5B"))
        .await
        .unwrap();
    let subject = storage
        .create_subject(
            school_id,
            CreateSubjectRequest {
                school_id: None,
                name: "Mathematics".to_string(),
                code: "MATH".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

    let time = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
    storage
        .create_timetable_entry(
            school_id,
            CreateTimetableEntryRequest {
                school_id: None,
                class_id: class_a.id,
                subject_id: subject.id,
                teacher_id: Some(owner.id),
                day_of_week: 1,
                start_time: time(8),
                end_time: time(9),
                room: None,
            },
        )
        .await
        .unwrap();

    // B 班与该课共用教师，因此查询 B 班周一课表时也能看到这节课
    let by_teacher = storage
        .list_timetable_day(school_id, 1, class_b.id, Some(owner.id))
        .await
        .unwrap();
    assert_eq!(by_teacher.len(), 1);

    let by_class = storage
        .list_timetable_day(school_id, 1, class_b.id, None)
        .await
        .unwrap();
    assert!(by_class.is_empty());

    let tuesday = storage
        .list_timetable_day(school_id, 2, class_a.id, Some(owner.id))
        .await
        .unwrap();
    assert!(tuesday.is_empty());
}

#[tokio::test]
async fn test_notification_fan_out_and_read_state() {
    let storage = storage().await;
    let owner = user(&storage, "owner").await;
    let school_id = school(&storage, &owner, "hillside").await;
    let teacher = user(&storage, "teacher").await;
    let outsider = user(&storage, "outsider").await;
    storage
        .add_staff(school_id, teacher.id, SchoolRole::Teacher)
        .await
        .unwrap();

    let recipients = storage
        .resolve_member_user_ids(school_id, &[outsider.id], &[SchoolRole::Teacher])
        .await
        .unwrap();
    assert_eq!(recipients, vec![teacher.id]);

    let created = storage
        .create_notifications(
            school_id,
            &[teacher.id, owner.id],
            "Staff meeting",
            "Friday 3pm",
            NotificationKind::Announcement,
        )
        .await
        .unwrap();
    assert_eq!(created, 2);
    assert_eq!(
        storage
            .count_unread_notifications(school_id, teacher.id)
            .await
            .unwrap(),
        1
    );

    let inbox = storage
        .list_notifications(
            school_id,
            teacher.id,
            NotificationListQuery {
                pagination: PaginationQuery::default(),
                school_id: Some(school_id),
                unread_only: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(inbox.items.len(), 1);
    let id = inbox.items[0].id;

    // 不能标记其他用户的通知
    assert!(
        !storage
            .mark_notification_read(school_id, owner.id, id)
            .await
            .unwrap()
    );
    assert!(
        storage
            .mark_notification_read(school_id, teacher.id, id)
            .await
            .unwrap()
    );
    assert_eq!(
        storage
            .count_unread_notifications(school_id, teacher.id)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        storage
            .mark_all_notifications_read(school_id, owner.id)
            .await
            .unwrap(),
        1
    );
}
