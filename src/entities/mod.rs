//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the budget tables and the dimension tables reports group by.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget_entry;
pub mod faculty;
pub mod group;
pub mod initial_budget_project;
pub mod line_item;
pub mod project;
pub mod seedbed;

// Re-export specific types to avoid conflicts
pub use budget_entry::{
    Column as BudgetEntryColumn, Entity as BudgetEntry, Model as BudgetEntryModel,
};
pub use faculty::{Column as FacultyColumn, Entity as Faculty, Model as FacultyModel};
pub use group::{Column as GroupColumn, Entity as Group, Model as GroupModel};
pub use initial_budget_project::{
    Column as InitialBudgetProjectColumn, Entity as InitialBudgetProject,
    Model as InitialBudgetProjectModel,
};
pub use line_item::{Column as LineItemColumn, Entity as LineItem, Model as LineItemModel};
pub use project::{Column as ProjectColumn, Entity as Project, Model as ProjectModel};
pub use seedbed::{Column as SeedbedColumn, Entity as Seedbed, Model as SeedbedModel};
