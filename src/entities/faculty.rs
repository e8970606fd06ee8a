//! Faculty entity - An academic faculty, the top level of the organizational hierarchy.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Faculty database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faculties")]
pub struct Model {
    /// Unique identifier for the faculty
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Engineering")
    pub name: String,
}

/// Defines relationships between Faculty and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One faculty has many research groups
    #[sea_orm(has_many = "super::group::Entity")]
    Groups,
    /// One faculty has many projects
    #[sea_orm(has_many = "super::project::Entity")]
    Projects,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
