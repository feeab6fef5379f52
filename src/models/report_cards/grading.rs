//! 成绩单的百分比、等级与班级排名

/// 各等级下限，从高到低
const GRADE_BANDS: &[(f64, &str)] = &[
    (90.0, "A+"),
    (80.0, "A"),
    (70.0, "B"),
    (60.0, "C"),
    (50.0, "D"),
    (40.0, "E"),
];

/// 保留两位小数；没有任何考试时为 0
pub fn percentage(total_obtained: f64, total_max: f64) -> f64 {
    if total_max <= 0.0 {
        return 0.0;
    }
    (total_obtained / total_max * 100.0 * 100.0).round() / 100.0
}

pub fn grade_for_percentage(percentage: f64) -> &'static str {
    GRADE_BANDS
        .iter()
        .find(|(floor, _)| percentage >= *floor)
        .map(|(_, grade)| *grade)
        .unwrap_or("F")
}

/// 密集排名，百分比高者在前。分数相同名次相同，
/// 下一个不同分数取紧接着的名次。输出与输入按下标
/// 一一对应。
pub fn dense_rank(percentages: &[f64]) -> Vec<i32> {
    let mut distinct: Vec<f64> = percentages.to_vec();
    distinct.sort_by(|a, b| b.total_cmp(a));
    distinct.dedup();

    percentages
        .iter()
        .map(|p| {
            distinct
                .iter()
                .position(|d| d == p)
                .map(|i| i as i32 + 1)
                .unwrap_or(0)
        })
        .collect()
}

/// 已计算但尚未保存的成绩单
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCardDraft {
    pub student_id: i64,
    pub total_obtained: f64,
    pub total_max: f64,
    pub percentage: f64,
    pub grade: String,
    pub rank: i32,
}

/// 汇总每个学生本学期的全部考试。`exams` 为
/// `(exam_id, max_marks)`，`marks` 为 `(exam_id, student_id,
/// marks_obtained)`。缺失的成绩按 0 分计，满分仍计入该考试的
/// 总分。
pub fn build_report_cards(
    student_ids: &[i64],
    exams: &[(i64, f64)],
    marks: &[(i64, i64, f64)],
) -> Vec<ReportCardDraft> {
    let total_max: f64 = exams.iter().map(|(_, max)| max).sum();

    let mut drafts: Vec<ReportCardDraft> = student_ids
        .iter()
        .map(|&student_id| {
            let total_obtained: f64 = marks
                .iter()
                .filter(|(exam_id, sid, _)| {
                    *sid == student_id && exams.iter().any(|(id, _)| id == exam_id)
                })
                .map(|(_, _, obtained)| obtained)
                .sum();
            let pct = percentage(total_obtained, total_max);
            ReportCardDraft {
                student_id,
                total_obtained,
                total_max,
                percentage: pct,
                grade: grade_for_percentage(pct).to_string(),
                rank: 0,
            }
        })
        .collect();

    let percentages: Vec<f64> = drafts.iter().map(|d| d.percentage).collect();
    for (draft, rank) in drafts.iter_mut().zip(dense_rank(&percentages)) {
        draft.rank = rank;
    }
    drafts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(45.0, 50.0), 90.0);
        assert_eq!(percentage(1.0, 3.0), 33.33);
        assert_eq!(percentage(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(grade_for_percentage(100.0), "A+");
        assert_eq!(grade_for_percentage(90.0), "A+");
        assert_eq!(grade_for_percentage(89.99), "A");
        assert_eq!(grade_for_percentage(80.0), "A");
        assert_eq!(grade_for_percentage(70.0), "B");
        assert_eq!(grade_for_percentage(60.0), "C");
        assert_eq!(grade_for_percentage(50.0), "D");
        assert_eq!(grade_for_percentage(40.0), "E");
        assert_eq!(grade_for_percentage(39.99), "F");
        assert_eq!(grade_for_percentage(0.0), "F");
    }

    #[test]
    fn test_dense_rank_ties() {
        let ranks = dense_rank(&[72.5, 91.0, 72.5, 60.0, 91.0]);
        assert_eq!(ranks, vec![2, 1, 2, 3, 1]);
    }

    #[test]
    fn test_dense_rank_empty() {
        assert!(dense_rank(&[]).is_empty());
    }

    #[test]
    fn test_build_report_cards_totals_and_ranks() {
        let exams = [(1, 50.0), (2, 50.0)];
        let marks = [
            (1, 10, 45.0),
            (2, 10, 45.0),
            (1, 11, 40.0),
            (2, 11, 30.0),
            (1, 12, 45.0),
            (2, 12, 45.0),
            // 其他学期的考试被忽略
            (9, 11, 100.0),
        ];
        let cards = build_report_cards(&[10, 11, 12, 13], &exams, &marks);

        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].total_obtained, 90.0);
        assert_eq!(cards[0].total_max, 100.0);
        assert_eq!(cards[0].grade, "A+");
        assert_eq!(cards[0].rank, 1);
        assert_eq!(cards[2].rank, 1);
        assert_eq!(cards[1].percentage, 70.0);
        assert_eq!(cards[1].grade, "B");
        assert_eq!(cards[1].rank, 2);
        // 没有任何成绩
        assert_eq!(cards[3].total_obtained, 0.0);
        assert_eq!(cards[3].grade, "F");
        assert_eq!(cards[3].rank, 3);
    }

    #[test]
    fn test_build_report_cards_without_exams() {
        let cards = build_report_cards(&[1], &[], &[]);
        assert_eq!(cards[0].percentage, 0.0);
        assert_eq!(cards[0].total_max, 0.0);
    }
}
