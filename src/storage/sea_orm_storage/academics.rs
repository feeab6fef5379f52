//! 学年与学期
//!
//! 设置当前学年或学期时先清除同级记录上的标记，
//! 两步在同一事务中完成。

use super::{SeaOrmStorage, db_error, now};
use crate::entity::academic_years::{
    ActiveModel as YearActiveModel, Column as YearColumn, Entity as AcademicYears,
};
use crate::entity::terms::{ActiveModel as TermActiveModel, Column as TermColumn, Entity as Terms};
use crate::errors::Result;
use crate::models::academic_years::{
    entities::{AcademicYear, Term},
    requests::{
        CreateAcademicYearRequest, CreateTermRequest, UpdateAcademicYearRequest, UpdateTermRequest,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    async fn clear_current_years<C: ConnectionTrait>(
        conn: &C,
        school_id: i64,
        except_id: Option<i64>,
    ) -> Result<()> {
        let mut update = AcademicYears::update_many()
            .col_expr(YearColumn::IsCurrent, Expr::value(false))
            .col_expr(YearColumn::UpdatedAt, Expr::value(now()))
            .filter(YearColumn::SchoolId.eq(school_id))
            .filter(YearColumn::IsCurrent.eq(true));
        if let Some(id) = except_id {
            update = update.filter(YearColumn::Id.ne(id));
        }
        update
            .exec(conn)
            .await
            .map_err(db_error("Failed to clear current academic year"))?;
        Ok(())
    }

    async fn clear_current_terms<C: ConnectionTrait>(
        conn: &C,
        academic_year_id: i64,
        except_id: Option<i64>,
    ) -> Result<()> {
        let mut update = Terms::update_many()
            .col_expr(TermColumn::IsCurrent, Expr::value(false))
            .col_expr(TermColumn::UpdatedAt, Expr::value(now()))
            .filter(TermColumn::AcademicYearId.eq(academic_year_id))
            .filter(TermColumn::IsCurrent.eq(true));
        if let Some(id) = except_id {
            update = update.filter(TermColumn::Id.ne(id));
        }
        update
            .exec(conn)
            .await
            .map_err(db_error("Failed to clear current term"))?;
        Ok(())
    }

    pub async fn list_academic_years_impl(&self, school_id: i64) -> Result<Vec<AcademicYear>> {
        let years = AcademicYears::find()
            .filter(YearColumn::SchoolId.eq(school_id))
            .order_by_desc(YearColumn::StartDate)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list academic years"))?;

        Ok(years.into_iter().map(|m| m.into_academic_year()).collect())
    }

    pub async fn get_academic_year_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<AcademicYear>> {
        let year = AcademicYears::find_by_id(id)
            .filter(YearColumn::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load academic year"))?;

        Ok(year.map(|m| m.into_academic_year()))
    }

    pub async fn create_academic_year_impl(
        &self,
        school_id: i64,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        let now = now();
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        if req.is_current {
            Self::clear_current_years(&txn, school_id, None).await?;
        }

        let year = YearActiveModel {
            school_id: Set(school_id),
            name: Set(req.name),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_current: Set(req.is_current),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_error("Failed to create academic year"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit academic year"))?;

        Ok(year.into_academic_year())
    }

    pub async fn update_academic_year_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let Some(existing) = AcademicYears::find_by_id(id)
            .filter(YearColumn::SchoolId.eq(school_id))
            .one(&txn)
            .await
            .map_err(db_error("Failed to load academic year"))?
        else {
            return Ok(None);
        };

        if update.is_current == Some(true) {
            Self::clear_current_years(&txn, school_id, Some(id)).await?;
        }

        let mut model: YearActiveModel = existing.into();
        model.updated_at = Set(now());
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(start_date);
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(end_date);
        }
        if let Some(is_current) = update.is_current {
            model.is_current = Set(is_current);
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("Failed to update academic year"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit academic year"))?;

        Ok(Some(updated.into_academic_year()))
    }

    pub async fn set_current_academic_year_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<AcademicYear>> {
        self.update_academic_year_impl(
            school_id,
            id,
            UpdateAcademicYearRequest {
                is_current: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete_academic_year_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = AcademicYears::delete_many()
            .filter(YearColumn::Id.eq(id))
            .filter(YearColumn::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to delete academic year"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_terms_impl(
        &self,
        school_id: i64,
        academic_year_id: Option<i64>,
    ) -> Result<Vec<Term>> {
        let mut select = Terms::find().filter(TermColumn::SchoolId.eq(school_id));
        if let Some(year_id) = academic_year_id {
            select = select.filter(TermColumn::AcademicYearId.eq(year_id));
        }

        let terms = select
            .order_by_desc(TermColumn::StartDate)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list terms"))?;

        Ok(terms.into_iter().map(|m| m.into_term()).collect())
    }

    pub async fn get_term_impl(&self, school_id: i64, id: i64) -> Result<Option<Term>> {
        let term = Terms::find_by_id(id)
            .filter(TermColumn::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load term"))?;

        Ok(term.map(|m| m.into_term()))
    }

    pub async fn create_term_impl(&self, school_id: i64, req: CreateTermRequest) -> Result<Term> {
        let now = now();
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        if req.is_current {
            Self::clear_current_terms(&txn, req.academic_year_id, None).await?;
        }

        let term = TermActiveModel {
            school_id: Set(school_id),
            academic_year_id: Set(req.academic_year_id),
            name: Set(req.name),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_current: Set(req.is_current),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_error("Failed to create term"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit term"))?;

        Ok(term.into_term())
    }

    pub async fn update_term_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateTermRequest,
    ) -> Result<Option<Term>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let Some(existing) = Terms::find_by_id(id)
            .filter(TermColumn::SchoolId.eq(school_id))
            .one(&txn)
            .await
            .map_err(db_error("Failed to load term"))?
        else {
            return Ok(None);
        };

        if update.is_current == Some(true) {
            Self::clear_current_terms(&txn, existing.academic_year_id, Some(id)).await?;
        }

        let mut model: TermActiveModel = existing.into();
        model.updated_at = Set(now());
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(start_date);
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(end_date);
        }
        if let Some(is_current) = update.is_current {
            model.is_current = Set(is_current);
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("Failed to update term"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit term"))?;

        Ok(Some(updated.into_term()))
    }

    pub async fn set_current_term_impl(&self, school_id: i64, id: i64) -> Result<Option<Term>> {
        self.update_term_impl(
            school_id,
            id,
            UpdateTermRequest {
                is_current: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete_term_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Terms::delete_many()
            .filter(TermColumn::Id.eq(id))
            .filter(TermColumn::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to delete term"))?;

        Ok(result.rows_affected > 0)
    }
}
