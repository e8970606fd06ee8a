//! Shared test utilities for `ResearchBudget`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test catalog rows and budget entries with sensible defaults.

use crate::{
    core::{
        budget_entry::{self, NewBudgetEntry},
        catalog::{self, NewProject},
    },
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date in tests.
///
/// # Panics
/// Panics if the date does not exist.
#[allow(clippy::expect_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Creates a test line item.
pub async fn create_test_line_item(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::line_item::Model> {
    catalog::create_line_item(db, name).await
}

/// Creates a test project starting on the first of March of `start_year`.
///
/// # Defaults
/// * `name`: "Project {number}"
/// * `end_date`: None
pub async fn create_test_project(
    db: &DatabaseConnection,
    project_number: &str,
    faculty_id: i64,
    group_id: i64,
    seedbed_id: Option<i64>,
    start_year: i32,
) -> Result<entities::project::Model> {
    catalog::create_project(
        db,
        NewProject {
            project_number: project_number.to_string(),
            name: format!("Project {project_number}"),
            start_date: date(start_year, 3, 1),
            end_date: None,
            faculty_id,
            group_id,
            seedbed_id,
        },
    )
    .await
}

/// Creates a test budget entry with only an available amount.
///
/// # Defaults
/// * `expenditure`, `reserve`: 0.0
/// * `initial_value`: same as `available`
/// * `description`: None
pub async fn create_test_entry(
    db: &DatabaseConnection,
    project_id: i64,
    line_item_id: i64,
    available: f64,
) -> Result<entities::budget_entry::Model> {
    create_custom_entry(db, project_id, line_item_id, [available, 0.0, 0.0, available]).await
}

/// Creates a test budget entry with explicit amounts.
///
/// `amounts` is `[available, expenditure, reserve, initial_value]`.
pub async fn create_custom_entry(
    db: &DatabaseConnection,
    project_id: i64,
    line_item_id: i64,
    amounts: [f64; 4],
) -> Result<entities::budget_entry::Model> {
    let [available, expenditure, reserve, initial_value] = amounts;
    budget_entry::create_budget_entry(
        db,
        NewBudgetEntry {
            project_id,
            line_item_id,
            available,
            expenditure,
            reserve,
            initial_value,
            description: None,
        },
    )
    .await
}

/// Creates a test initial budget allocation.
pub async fn create_test_initial_budget(
    db: &DatabaseConnection,
    project_id: i64,
    line_item_id: Option<i64>,
    initial_value: f64,
) -> Result<entities::initial_budget_project::Model> {
    catalog::create_initial_budget(db, project_id, line_item_id, initial_value).await
}

/// A small, fully linked catalog shared by most tests.
pub struct CatalogFixture {
    /// Database holding the catalog
    pub db: DatabaseConnection,
    /// "Ingeniería"
    pub engineering: entities::faculty::Model,
    /// "Ciencias"
    pub sciences: entities::faculty::Model,
    /// "Automática", under engineering
    pub automation: entities::group::Model,
    /// "Biología Molecular", under sciences
    pub biology: entities::group::Model,
    /// "Semillero Robótica"
    pub robotics_seedbed: entities::seedbed::Model,
    /// "Equipos"
    pub equipment: entities::line_item::Model,
    /// "Personal"
    pub staff: entities::line_item::Model,
    /// P-001: engineering, automation, robotics seedbed, started 2022
    pub robotics: entities::project::Model,
    /// P-002: engineering, automation, no seedbed, started 2023
    pub drones: entities::project::Model,
    /// P-003: sciences, biology, no seedbed, started 2023
    pub genomics: entities::project::Model,
}

/// Creates a test database with a catalog but no budget entries.
pub async fn setup_with_catalog() -> Result<CatalogFixture> {
    let db = setup_test_db().await?;

    let engineering = catalog::create_faculty(&db, "Ingeniería").await?;
    let sciences = catalog::create_faculty(&db, "Ciencias").await?;
    let automation = catalog::create_group(&db, "Automática", engineering.id).await?;
    let biology = catalog::create_group(&db, "Biología Molecular", sciences.id).await?;
    let robotics_seedbed = catalog::create_seedbed(&db, "Semillero Robótica").await?;
    let equipment = create_test_line_item(&db, "Equipos").await?;
    let staff = create_test_line_item(&db, "Personal").await?;

    let robotics = create_test_project(
        &db,
        "P-001",
        engineering.id,
        automation.id,
        Some(robotics_seedbed.id),
        2022,
    )
    .await?;
    let drones =
        create_test_project(&db, "P-002", engineering.id, automation.id, None, 2023).await?;
    let genomics = create_test_project(&db, "P-003", sciences.id, biology.id, None, 2023).await?;

    Ok(CatalogFixture {
        db,
        engineering,
        sciences,
        automation,
        biology,
        robotics_seedbed,
        equipment,
        staff,
        robotics,
        drones,
        genomics,
    })
}
