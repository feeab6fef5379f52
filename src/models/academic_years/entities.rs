use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct AcademicYear {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academic.ts")]
pub struct Term {
    pub id: i64,
    pub school_id: i64,
    pub academic_year_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl AcademicYear {
    /// `[start, end]` 是否落在本学年内
    pub fn contains_range(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start >= self.start_date && end <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year() -> AcademicYear {
        AcademicYear {
            id: 1,
            school_id: 1,
            name: "2025/2026".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
            is_current: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_term_inside_year() {
        let y = year();
        let d = |m, day, yr| NaiveDate::from_ymd_opt(yr, m, day).unwrap();
        assert!(y.contains_range(d(9, 1, 2025), d(12, 20, 2025)));
        assert!(y.contains_range(d(4, 1, 2026), d(7, 31, 2026)));
        assert!(!y.contains_range(d(8, 15, 2025), d(12, 20, 2025)));
        assert!(!y.contains_range(d(6, 1, 2026), d(8, 1, 2026)));
    }
}
