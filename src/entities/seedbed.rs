//! Seedbed entity - A seedbed ("semillero") program that projects can be enrolled in.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Seedbed database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "seedbeds")]
pub struct Model {
    /// Unique identifier for the seedbed
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the seedbed program
    pub name: String,
}

/// `Seedbed` is only referenced by projects
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One seedbed has many projects
    #[sea_orm(has_many = "super::project::Entity")]
    Projects,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
