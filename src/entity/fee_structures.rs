//! 收费项目

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_structures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    pub name: String,
    pub amount: i64,
    pub frequency: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee_structure(self) -> crate::models::fees::entities::FeeStructure {
        use crate::models::fees::entities::{FeeFrequency, FeeStructure};
        use crate::models::from_unix;

        FeeStructure {
            id: self.id,
            school_id: self.school_id,
            academic_year_id: self.academic_year_id,
            class_id: self.class_id,
            name: self.name,
            amount: self.amount,
            frequency: self
                .frequency
                .parse::<FeeFrequency>()
                .unwrap_or(FeeFrequency::OneTime),
            is_active: self.is_active,
            created_at: from_unix(self.created_at),
            updated_at: from_unix(self.updated_at),
        }
    }
}
