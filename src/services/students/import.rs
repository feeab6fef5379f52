//! CSV 学生导入
//!
//! 必需列：`admission_number`、`first_name`、`last_name`。
//! 可选列：`gender`、`date_of_birth`（YYYY-MM-DD）、`class_name`、`phone`、
//! `email`、`address`。列名不区分大小写。无效行逐条报告，
//! 已存在的学号跳过。

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use futures_util::StreamExt;
use tracing::{info, warn};

use super::StudentService;
use super::create::normalize_student;
use crate::config::AppConfig;
use crate::models::members::permissions::Permission;
use crate::models::students::entities::Gender;
use crate::models::students::requests::CreateStudentRequest;
use crate::models::students::responses::{ImportRowError, StudentImportResponse};
use crate::models::{ApiResponse, ErrorCode, SchoolScopeQuery};
use crate::services::{bad_request, error_response, tenant};
use crate::storage::Storage;

pub const MAX_IMPORT_ROWS: usize = 1000;

const REQUIRED_COLUMNS: [&str; 3] = ["admission_number", "first_name", "last_name"];

#[derive(Debug, PartialEq)]
enum ImportParseError {
    MissingColumn(String),
    ParseFailed(String),
}

impl ImportParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn(_) => ErrorCode::ImportFileMissingColumn,
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingColumn(col) => format!("Missing required column: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
        }
    }
}

enum UploadError {
    TooLarge,
    Read(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ImportRow {
    row: usize,
    admission_number: String,
    first_name: String,
    last_name: String,
    gender: Option<String>,
    date_of_birth: Option<String>,
    class_name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
}

pub async fn import_students(
    service: &StudentService,
    request: &HttpRequest,
    scope: SchoolScopeQuery,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let ctx = match tenant::authorize(
        request,
        &storage,
        scope.school_id,
        Permission::ManageStudents,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    let limit = AppConfig::get().server.limits.max_import_size;
    let bytes = match read_file_from_multipart(&mut payload, limit).await {
        Ok(bytes) => bytes,
        Err(UploadError::TooLarge) => {
            return Ok(HttpResponse::PayloadTooLarge().json(ApiResponse::error_empty(
                ErrorCode::ImportFileTooLarge,
                format!("Import file exceeds {limit} bytes"),
            )));
        }
        Err(UploadError::Read(msg)) => {
            return Ok(bad_request(ErrorCode::ImportFileParseFailed, msg));
        }
    };

    let rows = match parse_csv(&bytes) {
        Ok(rows) => rows,
        Err(e) => return Ok(bad_request(e.error_code(), e.message())),
    };
    if rows.is_empty() {
        return Ok(bad_request(
            ErrorCode::ImportFileParseFailed,
            "The file contains no data rows",
        ));
    }
    if rows.len() > MAX_IMPORT_ROWS {
        return Ok(bad_request(
            ErrorCode::ImportFileParseFailed,
            format!("At most {MAX_IMPORT_ROWS} rows can be imported at once"),
        ));
    }

    let mut response = StudentImportResponse::default();
    let mut class_ids: HashMap<String, Option<i64>> = HashMap::new();
    let mut seen: HashSet<String> = HashSet::new();

    for row in rows {
        let row_num = row.row;

        let class_id = match &row.class_name {
            Some(name) => match resolve_class(&storage, ctx.school_id(), name, &mut class_ids)
                .await
            {
                Ok(Some(id)) => Some(id),
                Ok(None) => {
                    response.errors.push(ImportRowError {
                        row: row_num,
                        message: format!("Unknown class: {name}"),
                    });
                    continue;
                }
                Err(resp) => return Ok(resp),
            },
            None => None,
        };

        let student = match build_request(row, class_id) {
            Ok(student) => student,
            Err(message) => {
                response.errors.push(ImportRowError {
                    row: row_num,
                    message,
                });
                continue;
            }
        };

        if !seen.insert(student.admission_number.clone()) {
            response.skipped += 1;
            response.errors.push(ImportRowError {
                row: row_num,
                message: format!(
                    "Duplicate admission number in file: {}",
                    student.admission_number
                ),
            });
            continue;
        }

        let admission_number = student.admission_number.clone();
        match storage.create_student(ctx.school_id(), student).await {
            Ok(_) => response.created += 1,
            Err(e) if e.is_unique_violation() => {
                response.skipped += 1;
                response.errors.push(ImportRowError {
                    row: row_num,
                    message: format!("Admission number already exists: {admission_number}"),
                });
            }
            Err(e) => {
                warn!("Import row {} failed: {}", row_num, e);
                response.errors.push(ImportRowError {
                    row: row_num,
                    message: "Failed to create student".to_string(),
                });
            }
        }
    }

    info!(
        "Student import into school {} by user {}: {} created, {} skipped, {} errors",
        ctx.school_id(),
        ctx.user_id(),
        response.created,
        response.skipped,
        response.errors.len()
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Import completed")))
}

async fn resolve_class(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    name: &str,
    cache: &mut HashMap<String, Option<i64>>,
) -> Result<Option<i64>, HttpResponse> {
    if let Some(id) = cache.get(name) {
        return Ok(*id);
    }
    let id = match storage.get_class_by_name(school_id, name).await {
        Ok(class) => class.map(|c| c.id),
        Err(e) => return Err(error_response("Failed to resolve class", &e)),
    };
    cache.insert(name.to_string(), id);
    Ok(id)
}

fn build_request(row: ImportRow, class_id: Option<i64>) -> Result<CreateStudentRequest, String> {
    let gender = row
        .gender
        .map(|g| g.to_lowercase().parse::<Gender>())
        .transpose()?;
    let date_of_birth = row
        .date_of_birth
        .map(|d| {
            NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                .map_err(|_| format!("Invalid date_of_birth '{d}', expected YYYY-MM-DD"))
        })
        .transpose()?;

    normalize_student(CreateStudentRequest {
        school_id: None,
        admission_number: row.admission_number,
        first_name: row.first_name,
        last_name: row.last_name,
        gender,
        date_of_birth,
        class_id,
        admission_date: None,
        address: row.address,
        phone: row.phone,
        email: row.email,
    })
}

async fn read_file_from_multipart(
    payload: &mut Multipart,
    limit: usize,
) -> Result<Vec<u8>, UploadError> {
    let mut file_bytes = Vec::new();
    let mut found = false;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| UploadError::Read(format!("Failed to read field: {e}")))?;

        if field.name() != Some("file") {
            continue;
        }
        found = true;

        while let Some(chunk) = field.next().await {
            let data =
                chunk.map_err(|e| UploadError::Read(format!("Failed to read upload: {e}")))?;
            if file_bytes.len() + data.len() > limit {
                return Err(UploadError::TooLarge);
            }
            file_bytes.extend_from_slice(&data);
        }
    }

    if !found {
        return Err(UploadError::Read("Missing `file` field".to_string()));
    }
    Ok(file_bytes)
}

fn parse_csv(data: &[u8]) -> Result<Vec<ImportRow>, ImportParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(data));

    let headers = rdr
        .headers()
        .map_err(|e| ImportParseError::ParseFailed(format!("Failed to read header: {e}")))?;
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').to_lowercase(), i))
        .collect();

    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(ImportParseError::MissingColumn(column.to_string()));
        }
    }
    let index = |name: &str| header_map.get(name).copied();

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| {
            ImportParseError::ParseFailed(format!("Row {} could not be parsed: {e}", i + 1))
        })?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let cell = |name: &str| -> Option<String> {
            index(name)
                .and_then(|idx| record.get(idx))
                .map(str::to_string)
                .filter(|s| !s.is_empty())
        };

        rows.push(ImportRow {
            row: i + 1,
            admission_number: cell("admission_number").unwrap_or_default(),
            first_name: cell("first_name").unwrap_or_default(),
            last_name: cell("last_name").unwrap_or_default(),
            gender: cell("gender"),
            date_of_birth: cell("date_of_birth"),
            class_name: cell("class_name"),
            phone: cell("phone"),
            email: cell("email"),
            address: cell("address"),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_reads_required_and_optional_columns() {
        let data = b"Admission_Number,First_Name,Last_Name,Gender,Class_Name\n\
            ADM-1, Ada ,Obi,female,Grade 7A\n\
            ADM-2,Ben,Ode,,\n";
        let rows = parse_csv(data).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 1);
        assert_eq!(rows[0].first_name, "Ada");
        assert_eq!(rows[0].gender.as_deref(), Some("female"));
        assert_eq!(rows[0].class_name.as_deref(), Some("Grade 7A"));
        assert_eq!(rows[1].gender, None);
        assert_eq!(rows[1].class_name, None);
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let err = parse_csv(b"admission_number,first_name\nADM-1,Ada\n").unwrap_err();
        assert_eq!(err, ImportParseError::MissingColumn("last_name".into()));
        assert_eq!(err.error_code(), ErrorCode::ImportFileMissingColumn);
    }

    #[test]
    fn test_parse_csv_skips_blank_lines_and_bom() {
        let data = "\u{feff}admission_number,first_name,last_name\nADM-1,Ada,Obi\n,,\n";
        let rows = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_build_request_validates_fields() {
        let row = ImportRow {
            row: 3,
            admission_number: "ADM-3".into(),
            first_name: "Chi".into(),
            last_name: "Eze".into(),
            gender: Some("Male".into()),
            date_of_birth: Some("2012-04-30".into()),
            ..Default::default()
        };
        let student = build_request(row.clone(), Some(9)).unwrap();
        assert_eq!(student.gender, Some(Gender::Male));
        assert_eq!(student.class_id, Some(9));
        assert_eq!(
            student.date_of_birth,
            NaiveDate::from_ymd_opt(2012, 4, 30)
        );

        let bad_date = ImportRow {
            date_of_birth: Some("30/04/2012".into()),
            ..row.clone()
        };
        assert!(build_request(bad_date, None).unwrap_err().contains("date_of_birth"));

        let bad_gender = ImportRow {
            gender: Some("x".into()),
            ..row.clone()
        };
        assert!(build_request(bad_gender, None).is_err());

        let missing_name = ImportRow {
            first_name: String::new(),
            ..row
        };
        assert_eq!(
            build_request(missing_name, None).unwrap_err(),
            "first_name is required"
        );
    }
}
