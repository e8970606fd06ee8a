//! Initial budget entity - The initial allocation recorded for a project.
//!
//! These rows are kept apart from the running budget entries and are aggregated independently
//! by the reports, which merge the result next to the entry totals.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Initial budget allocation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "initial_budget_projects")]
pub struct Model {
    /// Unique identifier for the allocation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Project receiving the allocation
    pub project_id: i64,
    /// Line item the allocation is earmarked for, if any
    pub line_item_id: Option<i64>,
    /// Allocated amount
    pub initial_value: f64,
}

/// Defines relationships between `InitialBudgetProject` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each allocation belongs to one project
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    /// An allocation may be earmarked for a line item
    #[sea_orm(
        belongs_to = "super::line_item::Entity",
        from = "Column::LineItemId",
        to = "super::line_item::Column::Id"
    )]
    LineItem,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
