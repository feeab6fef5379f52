use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TimetableEntry {
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: Option<i64>,
    /// ISO 星期，周一为 1
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 半开区间：10:00 结束的课与 10:00 开始的课不冲突
pub fn slots_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_back_to_back_slots_do_not_overlap() {
        assert!(!slots_overlap(t(8, 0), t(9, 0), t(9, 0), t(10, 0)));
        assert!(!slots_overlap(t(9, 0), t(10, 0), t(8, 0), t(9, 0)));
    }

    #[test]
    fn test_overlapping_slots() {
        assert!(slots_overlap(t(8, 0), t(9, 0), t(8, 30), t(9, 30)));
        assert!(slots_overlap(t(8, 0), t(12, 0), t(9, 0), t(10, 0)));
        assert!(slots_overlap(t(9, 0), t(10, 0), t(9, 0), t(10, 0)));
    }
}
