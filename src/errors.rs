//! 全局错误类型
//!
//! 变体由宏生成，每个错误都带有稳定的错误码和可读的类型名，
//! 以及具体的错误信息。

use std::fmt;

/// 生成错误枚举以及：
/// - `code()` 返回稳定错误码
/// - `error_type()` 返回类型名
/// - `message()` 返回错误详情
/// - 每个变体对应的 snake_case 构造函数
macro_rules! define_schoolhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolHubError {
            $($variant(String),)*
        }

        impl SchoolHubError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolHubError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolHubError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(SchoolHubError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl SchoolHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_schoolhub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Import("E014", "Import Error"),
}

impl SchoolHubError {
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 数据库是否因唯一索引冲突拒绝了写入
    pub fn is_unique_violation(&self) -> bool {
        match self {
            SchoolHubError::Conflict(_) => true,
            SchoolHubError::DatabaseOperation(msg) => {
                let msg = msg.to_ascii_lowercase();
                msg.contains("unique constraint")
                    || msg.contains("duplicate key")
                    || msg.contains("duplicate entry")
            }
            _ => false,
        }
    }
}

impl fmt::Display for SchoolHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolHubError {}

impl From<sea_orm::DbErr> for SchoolHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                SchoolHubError::Conflict(detail)
            }
            _ => SchoolHubError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for SchoolHubError {
    fn from(err: std::io::Error) -> Self {
        SchoolHubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolHubError {
    fn from(err: serde_json::Error) -> Self {
        SchoolHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SchoolHubError {
    fn from(err: chrono::ParseError) -> Self {
        SchoolHubError::DateParse(err.to_string())
    }
}

impl From<csv::Error> for SchoolHubError {
    fn from(err: csv::Error) -> Self {
        SchoolHubError::Import(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolHubError::cache_connection("test").code(), "E001");
        assert_eq!(SchoolHubError::database_config("test").code(), "E003");
        assert_eq!(SchoolHubError::validation("test").code(), "E007");
        assert_eq!(SchoolHubError::conflict("test").code(), "E010");
        assert_eq!(SchoolHubError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolHubError::not_found("test").error_type(),
            "Resource Not Found"
        );
        assert_eq!(
            SchoolHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolHubError::validation("school_id is required");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("school_id is required"));
    }

    #[test]
    fn test_unique_violation_detection() {
        assert!(SchoolHubError::conflict("dup").is_unique_violation());
        assert!(
            SchoolHubError::database_operation(
                "UNIQUE constraint failed: students.school_id, students.admission_number"
            )
            .is_unique_violation()
        );
        assert!(
            SchoolHubError::database_operation(
                "duplicate key value violates unique constraint \"idx_subjects_school_code\""
            )
            .is_unique_violation()
        );
        assert!(!SchoolHubError::database_operation("connection reset").is_unique_violation());
        assert!(!SchoolHubError::validation("UNIQUE constraint").is_unique_violation());
    }
}
