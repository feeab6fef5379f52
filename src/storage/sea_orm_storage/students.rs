use super::{SeaOrmStorage, db_error, now};
use crate::entity::guardians::{
    ActiveModel as GuardianActiveModel, Column as GuardianColumn, Entity as Guardians,
};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    students::{
        entities::{Guardian, Student, StudentStatus},
        requests::{
            CreateGuardianRequest, CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
        },
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn list_students_impl(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Students::find().filter(Column::SchoolId.eq(school_id));

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::FirstName.like(contains_pattern(pattern)))
                    .add(Column::LastName.like(contains_pattern(pattern)))
                    .add(Column::AdmissionNumber.like(contains_pattern(pattern))),
            );
        }

        let paginator = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("Failed to count students"))?;
        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("Failed to list students"))?;

        Ok(PaginatedResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn get_student_impl(&self, school_id: i64, id: i64) -> Result<Option<Student>> {
        let student = Students::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load student"))?;

        Ok(student.map(|m| m.into_student()))
    }

    pub async fn create_student_impl(
        &self,
        school_id: i64,
        req: CreateStudentRequest,
    ) -> Result<Student> {
        let now = now();

        let student = ActiveModel {
            school_id: Set(school_id),
            admission_number: Set(req.admission_number),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            gender: Set(req.gender.map(|g| g.to_string())),
            date_of_birth: Set(req.date_of_birth),
            class_id: Set(req.class_id),
            admission_date: Set(req.admission_date),
            address: Set(req.address),
            phone: Set(req.phone),
            email: Set(req.email),
            status: Set(StudentStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error("Failed to create student"))?;

        Ok(student.into_student())
    }

    pub async fn update_student_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        let Some(existing) = Students::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to load student"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now());
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(gender) = update.gender {
            model.gender = Set(Some(gender.to_string()));
        }
        if let Some(date_of_birth) = update.date_of_birth {
            model.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(class_id) = update.class_id {
            model.class_id = Set(Some(class_id));
        }
        if let Some(admission_date) = update.admission_date {
            model.admission_date = Set(Some(admission_date));
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("Failed to update student"))?;

        Ok(Some(updated.into_student()))
    }

    pub async fn deactivate_student_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Students::update_many()
            .col_expr(Column::Status, Expr::value(StudentStatus::Inactive.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(now()))
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to deactivate student"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_class_students_impl(
        &self,
        school_id: i64,
        class_id: i64,
        active_only: bool,
    ) -> Result<Vec<Student>> {
        let mut select = Students::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::ClassId.eq(class_id));
        if active_only {
            select = select.filter(Column::Status.eq(StudentStatus::Active.to_string()));
        }

        let students = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list class students"))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn existing_student_ids_impl(&self, school_id: i64, ids: &[i64]) -> Result<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Students::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Id.is_in(ids.to_vec()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_error("Failed to check students"))
    }

    pub async fn count_active_students_impl(&self, school_id: i64) -> Result<u64> {
        Students::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Status.eq(StudentStatus::Active.to_string()))
            .count(&self.db)
            .await
            .map_err(db_error("Failed to count students"))
    }

    pub async fn list_guardians_impl(
        &self,
        school_id: i64,
        student_id: i64,
    ) -> Result<Vec<Guardian>> {
        let guardians = Guardians::find()
            .filter(GuardianColumn::SchoolId.eq(school_id))
            .filter(GuardianColumn::StudentId.eq(student_id))
            .order_by_desc(GuardianColumn::IsPrimary)
            .order_by_asc(GuardianColumn::Name)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list guardians"))?;

        Ok(guardians.into_iter().map(|m| m.into_guardian()).collect())
    }

    pub async fn create_guardian_impl(
        &self,
        school_id: i64,
        student_id: i64,
        req: CreateGuardianRequest,
    ) -> Result<Guardian> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        if req.is_primary {
            Guardians::update_many()
                .col_expr(GuardianColumn::IsPrimary, Expr::value(false))
                .filter(GuardianColumn::SchoolId.eq(school_id))
                .filter(GuardianColumn::StudentId.eq(student_id))
                .exec(&txn)
                .await
                .map_err(db_error("Failed to clear primary guardian"))?;
        }

        let guardian = GuardianActiveModel {
            school_id: Set(school_id),
            student_id: Set(student_id),
            name: Set(req.name),
            relationship: Set(req.relationship),
            phone: Set(req.phone),
            email: Set(req.email),
            is_primary: Set(req.is_primary),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_error("Failed to create guardian"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit guardian"))?;

        Ok(guardian.into_guardian())
    }

    pub async fn delete_guardian_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Guardians::delete_many()
            .filter(GuardianColumn::Id.eq(id))
            .filter(GuardianColumn::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to delete guardian"))?;

        Ok(result.rows_affected > 0)
    }
}
