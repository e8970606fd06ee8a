//! Project entity - A research project, the unit budgets are tracked against.
//!
//! Each project belongs to a faculty and a research group, and may be enrolled in a seedbed
//! program. The `project_number` is the natural key used to reference projects from CSV imports.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Unique identifier for the project
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Institutional project number (e.g., "2024-INV-017")
    #[sea_orm(unique)]
    pub project_number: String,
    /// Project title
    pub name: String,
    /// Start date; the year report groups by its year
    pub start_date: Date,
    /// End date, if already known
    pub end_date: Option<Date>,
    /// Faculty running the project
    pub faculty_id: i64,
    /// Research group running the project
    pub group_id: i64,
    /// Seedbed program, for projects that belong to one
    pub seedbed_id: Option<i64>,
}

/// Defines relationships between Project and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each project belongs to one faculty
    #[sea_orm(
        belongs_to = "super::faculty::Entity",
        from = "Column::FacultyId",
        to = "super::faculty::Column::Id"
    )]
    Faculty,
    /// Each project belongs to one research group
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id"
    )]
    Group,
    /// A project may belong to a seedbed program
    #[sea_orm(
        belongs_to = "super::seedbed::Entity",
        from = "Column::SeedbedId",
        to = "super::seedbed::Column::Id"
    )]
    Seedbed,
    /// One project has many budget entries
    #[sea_orm(has_many = "super::budget_entry::Entity")]
    BudgetEntries,
    /// One project has many initial budget allocations
    #[sea_orm(has_many = "super::initial_budget_project::Entity")]
    InitialBudgets,
}

impl Related<super::faculty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faculty.def()
    }
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::seedbed::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seedbed.def()
    }
}

impl Related<super::budget_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetEntries.def()
    }
}

impl Related<super::initial_budget_project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InitialBudgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
