//! 用户在学校中的教职工身份

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "school_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub user_id: i64,
    pub role: String,
    pub is_active: bool,
    pub joined_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_member(self) -> crate::models::members::entities::SchoolMember {
        use crate::models::from_unix;
        use crate::models::members::entities::{SchoolMember, SchoolRole};

        SchoolMember {
            id: self.id,
            school_id: self.school_id,
            user_id: self.user_id,
            role: self.role.parse::<SchoolRole>().unwrap_or(SchoolRole::Staff),
            is_active: self.is_active,
            joined_at: from_unix(self.joined_at),
            updated_at: from_unix(self.updated_at),
        }
    }
}
