//! 考试、成绩与成绩单

use super::{SeaOrmStorage, db_error, now};
use crate::entity::exams::{ActiveModel, Column, Entity as Exams};
use crate::entity::marks::{
    ActiveModel as MarkActiveModel, Column as MarkColumn, Entity as Marks,
};
use crate::entity::report_cards::{
    ActiveModel as ReportCardActiveModel, Column as ReportCardColumn, Entity as ReportCards,
};
use crate::errors::Result;
use crate::models::{
    exams::{
        entities::{Exam, Mark},
        requests::{CreateExamRequest, ExamListQuery, MarkEntry, UpdateExamRequest},
    },
    report_cards::{entities::ReportCard, grading::ReportCardDraft, requests::ReportCardQuery},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn list_exams_impl(&self, school_id: i64, query: ExamListQuery) -> Result<Vec<Exam>> {
        let mut select = Exams::find().filter(Column::SchoolId.eq(school_id));

        if let Some(term_id) = query.term_id {
            select = select.filter(Column::TermId.eq(term_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        let exams = select
            .order_by_desc(Column::ExamDate)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list exams"))?;

        Ok(exams.into_iter().map(|m| m.into_exam()).collect())
    }

    pub async fn get_exam_impl(&self, school_id: i64, id: i64) -> Result<Option<Exam>> {
        let exam = Exams::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load exam"))?;

        Ok(exam.map(|m| m.into_exam()))
    }

    pub async fn create_exam_impl(&self, school_id: i64, req: CreateExamRequest) -> Result<Exam> {
        let now = now();

        let exam = ActiveModel {
            school_id: Set(school_id),
            term_id: Set(req.term_id),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            name: Set(req.name),
            exam_date: Set(req.exam_date),
            max_marks: Set(req.max_marks),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error("Failed to create exam"))?;

        Ok(exam.into_exam())
    }

    pub async fn update_exam_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateExamRequest,
    ) -> Result<Option<Exam>> {
        let Some(existing) = Exams::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load exam"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now());
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(exam_date) = update.exam_date {
            model.exam_date = Set(Some(exam_date));
        }
        if let Some(max_marks) = update.max_marks {
            model.max_marks = Set(max_marks);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("Failed to update exam"))?;

        Ok(Some(updated.into_exam()))
    }

    pub async fn delete_exam_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        Marks::delete_many()
            .filter(MarkColumn::SchoolId.eq(school_id))
            .filter(MarkColumn::ExamId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete marks"))?;

        let result = Exams::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete exam"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit exam deletion"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_marks_impl(&self, school_id: i64, exam_id: i64) -> Result<Vec<Mark>> {
        let marks = Marks::find()
            .filter(MarkColumn::SchoolId.eq(school_id))
            .filter(MarkColumn::ExamId.eq(exam_id))
            .order_by_asc(MarkColumn::StudentId)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list marks"))?;

        Ok(marks.into_iter().map(|m| m.into_mark()).collect())
    }

    pub async fn list_marks_for_exams_impl(
        &self,
        school_id: i64,
        exam_ids: &[i64],
    ) -> Result<Vec<Mark>> {
        if exam_ids.is_empty() {
            return Ok(Vec::new());
        }

        let marks = Marks::find()
            .filter(MarkColumn::SchoolId.eq(school_id))
            .filter(MarkColumn::ExamId.is_in(exam_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list marks"))?;

        Ok(marks.into_iter().map(|m| m.into_mark()).collect())
    }

    pub async fn replace_marks_impl(
        &self,
        school_id: i64,
        exam_id: i64,
        recorded_by: i64,
        entries: Vec<MarkEntry>,
    ) -> Result<Vec<Mark>> {
        let now = now();
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        Marks::delete_many()
            .filter(MarkColumn::SchoolId.eq(school_id))
            .filter(MarkColumn::ExamId.eq(exam_id))
            .exec(&txn)
            .await
            .map_err(db_error("Failed to clear marks"))?;

        let mut saved = Vec::with_capacity(entries.len());
        for entry in entries {
            let mark = MarkActiveModel {
                school_id: Set(school_id),
                exam_id: Set(exam_id),
                student_id: Set(entry.student_id),
                marks_obtained: Set(entry.marks_obtained),
                remarks: Set(entry.remarks),
                recorded_by: Set(recorded_by),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_error("Failed to save marks"))?;
            saved.push(mark.into_mark());
        }

        txn.commit()
            .await
            .map_err(db_error("Failed to commit marks"))?;

        Ok(saved)
    }

    pub async fn replace_report_cards_impl(
        &self,
        school_id: i64,
        term_id: i64,
        class_id: i64,
        drafts: Vec<ReportCardDraft>,
    ) -> Result<Vec<ReportCard>> {
        let now = now();
        let student_ids: Vec<i64> = drafts.iter().map(|d| d.student_id).collect();
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        ReportCards::delete_many()
            .filter(ReportCardColumn::SchoolId.eq(school_id))
            .filter(ReportCardColumn::TermId.eq(term_id))
            .filter(ReportCardColumn::StudentId.is_in(student_ids))
            .exec(&txn)
            .await
            .map_err(db_error("Failed to clear report cards"))?;

        let mut saved = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let card = ReportCardActiveModel {
                school_id: Set(school_id),
                student_id: Set(draft.student_id),
                term_id: Set(term_id),
                class_id: Set(class_id),
                total_obtained: Set(draft.total_obtained),
                total_max: Set(draft.total_max),
                percentage: Set(draft.percentage),
                grade: Set(draft.grade),
                rank: Set(Some(draft.rank)),
                remarks: Set(None),
                generated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_error("Failed to save report card"))?;
            saved.push(card.into_report_card());
        }

        txn.commit()
            .await
            .map_err(db_error("Failed to commit report cards"))?;

        Ok(saved)
    }

    pub async fn list_report_cards_impl(
        &self,
        school_id: i64,
        query: ReportCardQuery,
    ) -> Result<Vec<ReportCard>> {
        let mut select = ReportCards::find().filter(ReportCardColumn::SchoolId.eq(school_id));

        if let Some(term_id) = query.term_id {
            select = select.filter(ReportCardColumn::TermId.eq(term_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(ReportCardColumn::ClassId.eq(class_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(ReportCardColumn::StudentId.eq(student_id));
        }

        let cards = select
            .order_by_asc(ReportCardColumn::TermId)
            .order_by_asc(ReportCardColumn::Rank)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list report cards"))?;

        Ok(cards.into_iter().map(|m| m.into_report_card()).collect())
    }
}
