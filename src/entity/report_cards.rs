//! 学期成绩单

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "report_cards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub term_id: i64,
    pub class_id: i64,
    pub total_obtained: f64,
    pub total_max: f64,
    pub percentage: f64,
    pub grade: String,
    pub rank: Option<i32>,
    pub remarks: Option<String>,
    pub generated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_report_card(self) -> crate::models::report_cards::entities::ReportCard {
        use crate::models::from_unix;
        use crate::models::report_cards::entities::ReportCard;

        ReportCard {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            term_id: self.term_id,
            class_id: self.class_id,
            total_obtained: self.total_obtained,
            total_max: self.total_max,
            percentage: self.percentage,
            grade: self.grade,
            rank: self.rank,
            remarks: self.remarks,
            generated_at: from_unix(self.generated_at),
        }
    }
}
