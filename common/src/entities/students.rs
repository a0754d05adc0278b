use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A student. `student_id` is the school-issued identifier
/// (`YYYY-D-NNNN`), distinct from the surrogate `id` key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique, column_type = "String(StringLen::N(32))")]
    pub student_id: String,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub lastname: String,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub firstname: String,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub middlename: Option<String>,
    #[sea_orm(nullable)]
    pub program_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::programs::Entity",
        from = "Column::ProgramId",
        to = "super::programs::Column::Id",
        on_delete = "SetNull"
    )]
    Program,
    #[sea_orm(has_many = "super::org_members::Entity")]
    Memberships,
}

impl Related<super::programs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Program.def()
    }
}

impl Related<super::org_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}, {}", self.student_id, self.lastname, self.firstname)
    }
}
