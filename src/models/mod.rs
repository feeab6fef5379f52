pub mod academic_years;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod dashboard;
pub mod discipline;
pub mod exams;
pub mod fees;
pub mod members;
pub mod notifications;
pub mod report_cards;
pub mod schools;
pub mod students;
pub mod subjects;
pub mod system;
pub mod timetable;
pub mod users;

pub use common::{
    ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery, SchoolScopeQuery,
};

/// 响应信封中携带的稳定业务码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    PayloadTooLarge = 1013,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证与用户
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNameInvalid = 2002,
    UserEmailInvalid = 2003,
    UserPasswordInvalid = 2004,
    UserNameAlreadyExists = 2005,
    UserEmailAlreadyExists = 2006,
    UserNotFound = 2007,

    // 租户
    SchoolNotFound = 3000,
    SchoolSlugInvalid = 3001,
    SchoolSlugAlreadyExists = 3002,
    SchoolIdRequired = 3003,
    NotSchoolMember = 3004,
    PermissionDenied = 3005,
    LastAdminRequired = 3006,
    MemberAlreadyExists = 3007,
    MemberNotFound = 3008,

    // 教务
    AcademicYearNotFound = 4000,
    TermNotFound = 4001,
    InvalidDateRange = 4002,
    ClassNotFound = 4003,
    ClassAlreadyExists = 4004,
    SubjectNotFound = 4005,
    SubjectCodeAlreadyExists = 4006,

    // 学生
    StudentNotFound = 5000,
    AdmissionNumberAlreadyExists = 5001,
    GuardianNotFound = 5002,
    ImportFileParseFailed = 5003,
    ImportFileMissingColumn = 5004,
    ImportFileTooLarge = 5005,

    // 考勤
    AttendanceInvalid = 6000,

    // 考试
    ExamNotFound = 7000,
    MarksOutOfRange = 7001,

    // 财务
    FeeStructureNotFound = 8000,
    InvoiceNotFound = 8001,
    InvoiceNotPayable = 8002,
    PaymentExceedsBalance = 8003,
    InvoiceHasPayments = 8004,
    InvoiceCancelled = 8005,

    // 课表、纪律、通知
    TimetableEntryNotFound = 9000,
    TimetableConflict = 9001,
    DisciplineRecordNotFound = 9100,
    NotificationNotFound = 9200,
}

/// 进程启动时间，供健康检查使用
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 为以小写字符串列存储的单元枚举实现 `as_str`、`ALL`、`Display`
/// 和 `FromStr`。
#[macro_export]
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!(
                        "Invalid {} '{}'. Expected one of: {}",
                        stringify!($name),
                        s,
                        [$($value),+].join(", ")
                    )),
                }
            }
        }
    };
}

/// Unix 秒转 UTC，非法值归为纪元时间
pub(crate) fn from_unix(ts: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
