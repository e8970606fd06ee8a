//! Line item entity - A budget category ("rubro") budget entries are classified under.
//!
//! Names are unique ignoring case. `name_key` holds the lowercased name so lookups do not depend
//! on the database's `LOWER()`, which only folds ASCII on `SQLite`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Line item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "line_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Category name (e.g., "Equipment", "Travel")
    #[sea_orm(unique)]
    pub name: String,
    /// Lowercased name, used for case-insensitive lookups
    #[sea_orm(unique)]
    pub name_key: String,
}

/// Defines relationships between `LineItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One line item classifies many budget entries
    #[sea_orm(has_many = "super::budget_entry::Entity")]
    BudgetEntries,
    /// One line item classifies many initial budget allocations
    #[sea_orm(has_many = "super::initial_budget_project::Entity")]
    InitialBudgets,
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
