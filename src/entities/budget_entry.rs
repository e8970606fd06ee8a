//! Budget entry entity - One line-item budget record ("presupuesto") of a project.
//!
//! Each entry carries the available, spent and reserved amounts for a `project_id` /
//! `line_item_id` pair along with its initial value. Amounts are validated as finite numbers
//! before they are written (see `core::budget_entry`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Project this entry budgets for
    pub project_id: i64,
    /// Line item the entry is classified under
    pub line_item_id: i64,
    /// Amount still available ("disponibilidad")
    pub available: f64,
    /// Amount already spent ("egreso")
    pub expenditure: f64,
    /// Amount reserved but not yet spent ("reserva")
    pub reserve: f64,
    /// Initial value of the entry ("valor_inicial")
    pub initial_value: f64,
    /// Free-form description
    pub description: Option<String>,
}

/// Defines relationships between `BudgetEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one project
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    /// Each entry belongs to one line item
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
