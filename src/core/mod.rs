/// Budget entry creation, validation and queries
pub mod budget_entry;
/// Faculties, groups, seedbeds, line items and projects
pub mod catalog;
/// Report dimensions and their filter options
pub mod dimension;
/// Atomic CSV import of budget entries
pub mod import;
/// Grouped aggregation, initial budget merge and report dispatch
pub mod report;
