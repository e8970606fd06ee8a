//! Budget report generation.
//!
//! Reports either return a single slice of budget entries (when a filter value is given) or
//! group every entry by one [`ReportDimension`] and sum its amounts. Grouped reports run two
//! independent aggregations, one over `budget_entries` and one over `initial_budget_projects`,
//! joined to the dimension the same way, and merge the second into the first on the grouping
//! key. The sums are then coerced to the types the presentation layer expects: totals as
//! floats, initial budgets and years as truncated integers.

use crate::{
    core::dimension::{ReportDimension, filter_options},
    entities::{BudgetEntry, Project, budget_entry, project},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Statement,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

/// One group of a grouped budget report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Id of the group (faculty id, project id, ...); the year itself for year reports
    pub group_id: i64,
    /// Display value of the group (name, project number or year)
    pub group_label: String,
    /// Start year, present on year reports only
    pub year: Option<i32>,
    /// Sum of the available amounts
    pub available_total: f64,
    /// Sum of the spent amounts
    pub expenditure_total: f64,
    /// Sum of the reserved amounts
    pub reserve_total: f64,
    /// Sum of the entries' initial values, truncated
    pub initial_budget: i64,
    /// Sum of the group's initial budget allocations, truncated; `None` if it has none
    pub initial_budget_secondary: Option<i64>,
}

/// A typed scalar in a report record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportValue {
    /// Text value (names, project numbers)
    Text(String),
    /// Integer value (ids, years, initial budgets)
    Integer(i64),
    /// Floating point value (totals)
    Float(f64),
    /// Missing value
    Null,
}

impl ReportRow {
    /// Converts the row into a column name to value mapping.
    ///
    /// Year reports carry a `year` column instead of `id` and a label column.
    #[must_use]
    pub fn to_record(&self, dimension: ReportDimension) -> BTreeMap<String, ReportValue> {
        let mut record = BTreeMap::new();
        match self.year {
            Some(year) => {
                record.insert("year".to_string(), ReportValue::Integer(i64::from(year)));
            }
            None => {
                record.insert("id".to_string(), ReportValue::Integer(self.group_id));
                record.insert(
                    dimension.label_column().to_string(),
                    ReportValue::Text(self.group_label.clone()),
                );
            }
        }
        record.insert(
            "available_total".to_string(),
            ReportValue::Float(self.available_total),
        );
        record.insert(
            "expenditure_total".to_string(),
            ReportValue::Float(self.expenditure_total),
        );
        record.insert(
            "reserve_total".to_string(),
            ReportValue::Float(self.reserve_total),
        );
        record.insert(
            "initial_budget".to_string(),
            ReportValue::Integer(self.initial_budget),
        );
        record.insert(
            "initial_budget_secondary".to_string(),
            self.initial_budget_secondary
                .map_or(ReportValue::Null, ReportValue::Integer),
        );
        record
    }
}

/// Result of a report request.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutput {
    /// Budget entries matching a filter, ungrouped
    Entries(Vec<budget_entry::Model>),
    /// One row per group
    Grouped(Vec<ReportRow>),
}

/// Which table a grouped aggregation reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AggregateSource {
    BudgetEntries,
    InitialBudgets,
}

impl AggregateSource {
    const fn table(self) -> &'static str {
        match self {
            Self::BudgetEntries => "budget_entries",
            Self::InitialBudgets => "initial_budget_projects",
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct EntryTotalsRow {
    group_id: i64,
    group_label: Option<String>,
    available_total: f64,
    expenditure_total: f64,
    reserve_total: f64,
    initial_budget: f64,
}

#[derive(Debug, FromQueryResult)]
struct InitialBudgetRow {
    group_id: i64,
    initial_budget: f64,
}

/// Builds a report for `dimension`.
///
/// With a filter value, returns the budget entries whose project (or line item, or project id
/// directly) matches it. Without one, returns the grouped totals for every group present.
#[instrument(skip(db))]
pub async fn aggregate<C: ConnectionTrait>(
    db: &C,
    dimension: ReportDimension,
    filter: Option<i64>,
) -> Result<ReportOutput> {
    match filter {
        Some(value) => {
            let entries = entries_for(db, dimension, value).await?;
            info!(count = entries.len(), "Filtered budget entries");
            Ok(ReportOutput::Entries(entries))
        }
        None => {
            let rows = grouped_totals(db, dimension).await?;
            info!(count = rows.len(), "Grouped budget report");
            Ok(ReportOutput::Grouped(rows))
        }
    }
}

/// Parses a report type and optional filter from user input and builds the report.
///
/// The report type is matched case-insensitively. A blank filter counts as absent and yields
/// the grouped report. A present filter must be an integer listed by [`filter_options`].
///
/// # Errors
/// Returns `UnknownReportType` for report types that name no dimension and
/// `InvalidFilterOption` for filters that are not valid for the dimension.
pub async fn dispatch_report<C: ConnectionTrait>(
    db: &C,
    report_type: &str,
    filter_option: Option<&str>,
) -> Result<ReportOutput> {
    let dimension: ReportDimension = report_type.parse()?;
    dispatch_dimension_report(db, dimension, filter_option).await
}

/// Builds the report for an already parsed dimension, validating the raw filter value.
///
/// # Errors
/// Returns `InvalidFilterOption` for filters that are not valid for the dimension.
pub async fn dispatch_dimension_report<C: ConnectionTrait>(
    db: &C,
    dimension: ReportDimension,
    filter_option: Option<&str>,
) -> Result<ReportOutput> {
    let filter = match filter_option.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => None,
        Some(raw) => {
            let invalid = || Error::InvalidFilterOption {
                report_type: dimension.to_string(),
                value: raw.to_string(),
            };
            let value: i64 = raw.parse().map_err(|_| invalid())?;
            if !filter_options(db, dimension).await?.contains(&value) {
                return Err(invalid());
            }
            Some(value)
        }
    };

    aggregate(db, dimension, filter).await
}

/// Returns the budget entries belonging to one value of `dimension`, ordered by id.
pub async fn entries_for<C: ConnectionTrait>(
    db: &C,
    dimension: ReportDimension,
    value: i64,
) -> Result<Vec<budget_entry::Model>> {
    let query = BudgetEntry::find();
    let query = match dimension {
        ReportDimension::Faculty => query
            .inner_join(Project)
            .filter(project::Column::FacultyId.eq(value)),
        ReportDimension::Group => query
            .inner_join(Project)
            .filter(project::Column::GroupId.eq(value)),
        ReportDimension::Seedbed => query
            .inner_join(Project)
            .filter(project::Column::SeedbedId.eq(value)),
        ReportDimension::Year => {
            let (from, until) = year_bounds(value)?;
            query
                .inner_join(Project)
                .filter(project::Column::StartDate.gte(from))
                .filter(project::Column::StartDate.lt(until))
        }
        ReportDimension::LineItem => query.filter(budget_entry::Column::LineItemId.eq(value)),
        ReportDimension::Project => query.filter(budget_entry::Column::ProjectId.eq(value)),
    };

    query
        .order_by_asc(budget_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

fn year_bounds(value: i64) -> Result<(NaiveDate, NaiveDate)> {
    i32::try_from(value)
        .ok()
        .and_then(|year| {
            let from = NaiveDate::from_ymd_opt(year, 1, 1)?;
            let until = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?;
            Some((from, until))
        })
        .ok_or_else(|| Error::InvalidFilterOption {
            report_type: ReportDimension::Year.to_string(),
            value: value.to_string(),
        })
}

/// Computes the grouped totals for `dimension`, merged with the initial budget allocations.
///
/// Rows come back in the order the database produced them.
pub async fn grouped_totals<C: ConnectionTrait>(
    db: &C,
    dimension: ReportDimension,
) -> Result<Vec<ReportRow>> {
    let backend = db.get_database_backend();

    let totals_sql = grouped_sql(dimension, backend, AggregateSource::BudgetEntries);
    debug!(sql = %totals_sql, "Aggregating budget entries");
    let totals = EntryTotalsRow::find_by_statement(Statement::from_string(backend, totals_sql))
        .all(db)
        .await?;

    let initial_sql = grouped_sql(dimension, backend, AggregateSource::InitialBudgets);
    debug!(sql = %initial_sql, "Aggregating initial budgets");
    let initial = InitialBudgetRow::find_by_statement(Statement::from_string(backend, initial_sql))
        .all(db)
        .await?;

    Ok(merge_initial_budgets(dimension, totals, initial))
}

fn merge_initial_budgets(
    dimension: ReportDimension,
    totals: Vec<EntryTotalsRow>,
    initial: Vec<InitialBudgetRow>,
) -> Vec<ReportRow> {
    let initial_by_group: HashMap<i64, f64> = initial
        .into_iter()
        .map(|row| (row.group_id, row.initial_budget))
        .collect();

    totals
        .into_iter()
        .map(|row| ReportRow {
            year: match dimension {
                ReportDimension::Year => i32::try_from(row.group_id).ok(),
                _ => None,
            },
            group_label: row
                .group_label
                .unwrap_or_else(|| row.group_id.to_string()),
            available_total: row.available_total,
            expenditure_total: row.expenditure_total,
            reserve_total: row.reserve_total,
            initial_budget: truncate_to_integer(row.initial_budget),
            initial_budget_secondary: initial_by_group
                .get(&row.group_id)
                .copied()
                .map(truncate_to_integer),
            group_id: row.group_id,
        })
        .collect()
}

/// Truncates toward zero; out-of-range values saturate.
#[allow(clippy::cast_possible_truncation)]
fn truncate_to_integer(value: f64) -> i64 {
    value.trunc() as i64
}

/// Expression for the start year of the project aliased `pr`.
const fn start_year_expr(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::Sqlite => "CAST(strftime('%Y', pr.start_date) AS INTEGER)",
        DbBackend::Postgres => "CAST(EXTRACT(YEAR FROM pr.start_date) AS BIGINT)",
        DbBackend::MySql => "YEAR(pr.start_date)",
    }
}

const fn float_type(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::Sqlite => "REAL",
        DbBackend::Postgres => "DOUBLE PRECISION",
        DbBackend::MySql => "DOUBLE",
    }
}

/// Builds the grouped aggregation over `source`, which is aliased `src`.
fn grouped_sql(dimension: ReportDimension, backend: DbBackend, source: AggregateSource) -> String {
    const THROUGH_PROJECT: &str = "INNER JOIN projects pr ON pr.id = src.project_id";

    let (key, label, joins) = match dimension {
        ReportDimension::Faculty => (
            "fa.id",
            Some("fa.name"),
            format!("{THROUGH_PROJECT} INNER JOIN faculties fa ON fa.id = pr.faculty_id"),
        ),
        ReportDimension::Group => (
            "gr.id",
            Some("gr.name"),
            format!("{THROUGH_PROJECT} INNER JOIN \"groups\" gr ON gr.id = pr.group_id"),
        ),
        ReportDimension::Seedbed => (
            "se.id",
            Some("se.name"),
            format!("{THROUGH_PROJECT} INNER JOIN seedbeds se ON se.id = pr.seedbed_id"),
        ),
        ReportDimension::Year => (start_year_expr(backend), None, THROUGH_PROJECT.to_string()),
        ReportDimension::LineItem => (
            "li.id",
            Some("li.name"),
            "INNER JOIN line_items li ON li.id = src.line_item_id".to_string(),
        ),
        ReportDimension::Project => (
            "pr.id",
            Some("pr.project_number"),
            THROUGH_PROJECT.to_string(),
        ),
    };

    let float = float_type(backend);
    let sum = |column: &str, alias: &str| {
        format!("CAST(COALESCE(SUM(src.{column}), 0) AS {float}) AS {alias}")
    };

    let columns = match source {
        AggregateSource::BudgetEntries => [
            format!("{} AS group_label", label.unwrap_or("NULL")),
            sum("available", "available_total"),
            sum("expenditure", "expenditure_total"),
            sum("reserve", "reserve_total"),
            sum("initial_value", "initial_budget"),
        ]
        .join(", "),
        AggregateSource::InitialBudgets => sum("initial_value", "initial_budget"),
    };

    let group_by = match (source, label) {
        (AggregateSource::BudgetEntries, Some(_)) => "1, 2",
        _ => "1",
    };

    format!(
        "SELECT {key} AS group_id, {columns} FROM {table} src {joins} GROUP BY {group_by}",
        table = source.table(),
    )
}

/// Formats grouped rows as a plain-text table.
#[must_use]
pub fn format_report_table(dimension: ReportDimension, rows: &[ReportRow]) -> String {
    let mut table = format!(
        "{:<32} {:>16} {:>16} {:>16} {:>16} {:>16}\n",
        dimension.label_column(),
        "available",
        "expenditure",
        "reserve",
        "initial_budget",
        "initial_alloc"
    );
    for row in rows {
        let secondary = row
            .initial_budget_secondary
            .map_or_else(|| "-".to_string(), |value| value.to_string());
        table.push_str(&format!(
            "{:<32} {:>16.2} {:>16.2} {:>16.2} {:>16} {:>16}\n",
            row.group_label,
            row.available_total,
            row.expenditure_total,
            row.reserve_total,
            row.initial_budget,
            secondary
        ));
    }
    table.push_str(&format!("{} group(s)", rows.len()));
    table
}

/// Formats budget entries as a plain-text table.
#[must_use]
pub fn format_entries_table(entries: &[budget_entry::Model]) -> String {
    let mut table = format!(
        "{:>6} {:>8} {:>9} {:>14} {:>14} {:>14} {:>14}  {}\n",
        "id",
        "project",
        "line_item",
        "available",
        "expenditure",
        "reserve",
        "initial",
        "description"
    );
    for entry in entries {
        table.push_str(&format!(
            "{:>6} {:>8} {:>9} {:>14.2} {:>14.2} {:>14.2} {:>14.2}  {}\n",
            entry.id,
            entry.project_id,
            entry.line_item_id,
            entry.available,
            entry.expenditure,
            entry.reserve,
            entry.initial_value,
            entry.description.as_deref().unwrap_or("")
        ));
    }
    table.push_str(&format!("{} entry(ies)", entries.len()));
    table
}
