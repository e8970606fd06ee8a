//! Catalog business logic - faculties, groups, seedbeds, line items and projects.
//!
//! These are the dimension rows budget entries hang off and reports group by. This module
//! provides validated creation, the natural-key lookups the CSV importer relies on, and
//! idempotent seeding from the catalog configuration.

use crate::{
    config::catalog::CatalogConfig,
    entities::{
        Faculty, Group, LineItem, Project, Seedbed, faculty, group, initial_budget_project,
        line_item, project, seedbed,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Set, prelude::*};
use tracing::{debug, info, instrument};

/// Values needed to create a project.
#[derive(Debug, Clone)]
pub struct NewProject {
    /// Institutional project number, unique
    pub project_number: String,
    /// Project title
    pub name: String,
    /// Start date
    pub start_date: NaiveDate,
    /// End date, if known
    pub end_date: Option<NaiveDate>,
    /// Owning faculty
    pub faculty_id: i64,
    /// Owning research group
    pub group_id: i64,
    /// Seedbed program, if any
    pub seedbed_id: Option<i64>,
}

/// Counts of rows created by [`seed_catalog`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Faculties created
    pub faculties: usize,
    /// Research groups created
    pub groups: usize,
    /// Seedbeds created
    pub seedbeds: usize,
    /// Line items created
    pub line_items: usize,
}

fn require_name(field: &str, name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            field: field.to_string(),
            message: "cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Creates a faculty.
pub async fn create_faculty(db: &DatabaseConnection, name: &str) -> Result<faculty::Model> {
    let faculty = faculty::ActiveModel {
        name: Set(require_name("name", name)?),
        ..Default::default()
    };
    faculty.insert(db).await.map_err(Into::into)
}

/// Creates a research group under a faculty.
pub async fn create_group(
    db: &DatabaseConnection,
    name: &str,
    faculty_id: i64,
) -> Result<group::Model> {
    let group = group::ActiveModel {
        name: Set(require_name("name", name)?),
        faculty_id: Set(faculty_id),
        ..Default::default()
    };
    group.insert(db).await.map_err(Into::into)
}

/// Creates a seedbed program.
pub async fn create_seedbed(db: &DatabaseConnection, name: &str) -> Result<seedbed::Model> {
    let seedbed = seedbed::ActiveModel {
        name: Set(require_name("name", name)?),
        ..Default::default()
    };
    seedbed.insert(db).await.map_err(Into::into)
}

/// Lookup key for a line item name: trimmed and lowercased with Unicode case folding.
fn line_item_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Creates a budget line item.
///
/// # Errors
/// Returns a validation error if the name is empty or a line item with the same name,
/// ignoring case, already exists.
pub async fn create_line_item(db: &DatabaseConnection, name: &str) -> Result<line_item::Model> {
    let name = require_name("name", name)?;
    if find_line_item_by_name(db, &name).await?.is_some() {
        return Err(Error::Validation {
            field: "name".to_string(),
            message: format!("line item {name} already exists"),
        });
    }

    let line_item = line_item::ActiveModel {
        name_key: Set(line_item_key(&name)),
        name: Set(name),
        ..Default::default()
    };
    line_item.insert(db).await.map_err(Into::into)
}

/// Creates a project. The project number is trimmed and must not be empty.
pub async fn create_project(db: &DatabaseConnection, new: NewProject) -> Result<project::Model> {
    if let Some(end_date) = new.end_date {
        if end_date < new.start_date {
            return Err(Error::Validation {
                field: "end_date".to_string(),
                message: format!("{end_date} is before the start date {}", new.start_date),
            });
        }
    }

    let project = project::ActiveModel {
        project_number: Set(require_name("project_number", &new.project_number)?),
        name: Set(new.name.trim().to_string()),
        start_date: Set(new.start_date),
        end_date: Set(new.end_date),
        faculty_id: Set(new.faculty_id),
        group_id: Set(new.group_id),
        seedbed_id: Set(new.seedbed_id),
        ..Default::default()
    };
    project.insert(db).await.map_err(Into::into)
}

/// Records an initial budget allocation for a project.
pub async fn create_initial_budget(
    db: &DatabaseConnection,
    project_id: i64,
    line_item_id: Option<i64>,
    initial_value: f64,
) -> Result<initial_budget_project::Model> {
    crate::core::budget_entry::validate_amount("initial_value", initial_value)?;

    let allocation = initial_budget_project::ActiveModel {
        project_id: Set(project_id),
        line_item_id: Set(line_item_id),
        initial_value: Set(initial_value),
        ..Default::default()
    };
    allocation.insert(db).await.map_err(Into::into)
}

/// Finds a line item by name, ignoring case and surrounding whitespace.
pub async fn find_line_item_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<line_item::Model>> {
    LineItem::find()
        .filter(line_item::Column::NameKey.eq(line_item_key(name)))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a project by its exact project number.
pub async fn find_project_by_number<C: ConnectionTrait>(
    db: &C,
    project_number: &str,
) -> Result<Option<project::Model>> {
    Project::find()
        .filter(project::Column::ProjectNumber.eq(project_number))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates every faculty, group, seedbed and line item in `config` that does not exist yet.
///
/// Rows are matched by name, so running the seed twice creates nothing the second time.
#[instrument(skip(db, config))]
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for faculty_config in &config.faculties {
        let existing = Faculty::find()
            .filter(faculty::Column::Name.eq(faculty_config.name.trim()))
            .one(db)
            .await?;
        let faculty = match existing {
            Some(faculty) => faculty,
            None => {
                summary.faculties += 1;
                create_faculty(db, &faculty_config.name).await?
            }
        };

        for group_name in &faculty_config.groups {
            let exists = Group::find()
                .filter(group::Column::Name.eq(group_name.trim()))
                .filter(group::Column::FacultyId.eq(faculty.id))
                .one(db)
                .await?
                .is_some();
            if !exists {
                create_group(db, group_name, faculty.id).await?;
                summary.groups += 1;
            }
        }
    }

    for seedbed_name in &config.seedbeds {
        let exists = Seedbed::find()
            .filter(seedbed::Column::Name.eq(seedbed_name.trim()))
            .one(db)
            .await?
            .is_some();
        if !exists {
            create_seedbed(db, seedbed_name).await?;
            summary.seedbeds += 1;
        }
    }

    for line_item_name in &config.line_items {
        if find_line_item_by_name(db, line_item_name).await?.is_none() {
            create_line_item(db, line_item_name).await?;
            summary.line_items += 1;
        } else {
            debug!("Line item {line_item_name} already present");
        }
    }

    info!(
        faculties = summary.faculties,
        groups = summary.groups,
        seedbeds = summary.seedbeds,
        line_items = summary.line_items,
        "Catalog seeded"
    );
    Ok(summary)
}
