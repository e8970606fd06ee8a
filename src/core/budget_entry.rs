//! Budget entry business logic - creating and reading budget entries.
//!
//! Every amount is checked before it reaches the database: NaN and infinite values are
//! rejected with a field-level validation error, mirroring the numericality checks the
//! entries have always had on write.

use crate::{
    entities::{BudgetEntry, LineItem, Project, budget_entry},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Values needed to create a budget entry.
#[derive(Debug, Clone, Default)]
pub struct NewBudgetEntry {
    /// Project the entry belongs to
    pub project_id: i64,
    /// Line item the entry is classified under
    pub line_item_id: i64,
    /// Available amount
    pub available: f64,
    /// Spent amount
    pub expenditure: f64,
    /// Reserved amount
    pub reserve: f64,
    /// Initial value
    pub initial_value: f64,
    /// Optional description
    pub description: Option<String>,
}

impl NewBudgetEntry {
    /// Validates every amount, naming the first field that is not a finite number.
    pub fn validate(&self) -> Result<()> {
        validate_amount("available", self.available)?;
        validate_amount("expenditure", self.expenditure)?;
        validate_amount("reserve", self.reserve)?;
        validate_amount("initial_value", self.initial_value)
    }

    /// Converts the validated values into an active model ready for insertion.
    pub(crate) fn into_active_model(self) -> budget_entry::ActiveModel {
        budget_entry::ActiveModel {
            project_id: Set(self.project_id),
            line_item_id: Set(self.line_item_id),
            available: Set(self.available),
            expenditure: Set(self.expenditure),
            reserve: Set(self.reserve),
            initial_value: Set(self.initial_value),
            description: Set(self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())),
            ..Default::default()
        }
    }
}

/// Rejects amounts that are not finite numbers.
pub fn validate_amount(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::Validation {
            field: field.to_string(),
            message: format!("{value} is not a number"),
        })
    }
}

/// Creates a single budget entry after validating its amounts and references.
///
/// # Errors
/// Returns an error if:
/// - Any amount is NaN or infinite
/// - The project or line item does not exist
/// - The database insert fails
pub async fn create_budget_entry(
    db: &DatabaseConnection,
    new: NewBudgetEntry,
) -> Result<budget_entry::Model> {
    new.validate()?;

    if Project::find_by_id(new.project_id).one(db).await?.is_none() {
        return Err(Error::ProjectNotFound {
            number: new.project_id.to_string(),
        });
    }
    if LineItem::find_by_id(new.line_item_id).one(db).await?.is_none() {
        return Err(Error::LineItemNotFound {
            name: new.line_item_id.to_string(),
        });
    }

    let entry = new.into_active_model().insert(db).await?;
    debug!(entry_id = entry.id, project_id = entry.project_id, "Budget entry created");
    Ok(entry)
}

/// Retrieves every budget entry, ordered by id.
pub async fn get_all_budget_entries<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<budget_entry::Model>> {
    BudgetEntry::find()
        .order_by_asc(budget_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the budget entries of one project, ordered by id.
pub async fn get_budget_entries_for_project(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Vec<budget_entry::Model>> {
    BudgetEntry::find()
        .filter(budget_entry::Column::ProjectId.eq(project_id))
        .order_by_asc(budget_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("available", 12.5).is_ok());
        assert!(validate_amount("available", -3.0).is_ok());
        assert!(validate_amount("available", f64::NAN).is_err());
        assert!(validate_amount("available", f64::INFINITY).is_err());
    }

    #[tokio::test]
    async fn test_create_budget_entry() -> Result<()> {
        let fixture = setup_with_catalog().await?;

        let entry = create_budget_entry(
            &fixture.db,
            NewBudgetEntry {
                project_id: fixture.robotics.id,
                line_item_id: fixture.equipment.id,
                available: 100.5,
                expenditure: 20.0,
                reserve: 5.0,
                initial_value: 125.5,
                description: Some("  Osciloscopio ".to_string()),
            },
        )
        .await?;

        assert_eq!(entry.available, 100.5);
        assert_eq!(entry.description.as_deref(), Some("Osciloscopio"));

        let entries = get_budget_entries_for_project(&fixture.db, fixture.robotics.id).await?;
        assert_eq!(entries.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_budget_entry_rejects_non_numeric_amount() -> Result<()> {
        let fixture = setup_with_catalog().await?;

        let result = create_budget_entry(
            &fixture.db,
            NewBudgetEntry {
                project_id: fixture.robotics.id,
                line_item_id: fixture.equipment.id,
                reserve: f64::NAN,
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(result, Err(Error::Validation { field, .. }) if field == "reserve"));
        assert!(get_all_budget_entries(&fixture.db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_budget_entry_requires_existing_project() -> Result<()> {
        let fixture = setup_with_catalog().await?;

        let result = create_budget_entry(
            &fixture.db,
            NewBudgetEntry {
                project_id: 9999,
                line_item_id: fixture.equipment.id,
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(result, Err(Error::ProjectNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_budget_entry_requires_existing_line_item() -> Result<()> {
        let fixture = setup_with_catalog().await?;

        let result = create_budget_entry(
            &fixture.db,
            NewBudgetEntry {
                project_id: fixture.robotics.id,
                line_item_id: 9999,
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(result, Err(Error::LineItemNotFound { .. })));
        Ok(())
    }
}
