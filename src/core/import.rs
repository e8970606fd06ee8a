//! CSV bulk import of budget entries.
//!
//! Import files come out of spreadsheet exports encoded in Latin-1. Each row names a line item
//! (first column) and a project number (second column); the amounts are matched by header name.
//! All rows are resolved and validated before anything is written, and the whole file is
//! inserted inside one database transaction: either every row lands or none does.

use crate::{
    core::{
        budget_entry::NewBudgetEntry,
        catalog::{find_line_item_by_name, find_project_by_number},
    },
    entities::{BudgetEntry, budget_entry},
    errors::{Error, Result},
};
use csv::StringRecord;
use sea_orm::{DatabaseConnection, DatabaseTransaction, EntityTrait, TransactionTrait};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};

const LINE_ITEM_COLUMN: usize = 0;
const PROJECT_COLUMN: usize = 1;

/// Rows per INSERT statement, well under `SQLite`'s bound-parameter limit.
const INSERT_CHUNK_SIZE: usize = 500;

/// Positions of the named amount columns in the header row.
#[derive(Debug, Default, PartialEq, Eq)]
struct FieldColumns {
    initial_value: Option<usize>,
    available: Option<usize>,
    description: Option<usize>,
    expenditure: Option<usize>,
    reserve: Option<usize>,
}

impl FieldColumns {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut columns = Self::default();
        for (index, header) in headers.iter().enumerate() {
            let slot = match header.trim().to_lowercase().as_str() {
                "valor_inicial" => &mut columns.initial_value,
                "disponibilidad" => &mut columns.available,
                "descripcion" => &mut columns.description,
                "egreso" => &mut columns.expenditure,
                "reserva" => &mut columns.reserve,
                _ => continue,
            };
            slot.get_or_insert(index);
        }
        columns
    }
}

/// Transcodes Latin-1 (ISO-8859-1) bytes to a UTF-8 string.
///
/// Every Latin-1 byte is the Unicode code point of the same value, so this cannot fail.
#[must_use]
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Imports the Latin-1 encoded CSV file at `path`, returning the number of entries created.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read or is not valid CSV
/// - A row names a line item or project that does not exist
/// - A row has a missing or non-numeric amount
/// - The bulk insert fails
///
/// Nothing is persisted when an error is returned.
#[instrument(skip(db))]
pub async fn import_csv(db: &DatabaseConnection, path: &Path) -> Result<usize> {
    let bytes = std::fs::read(path)?;
    import_csv_bytes(db, &bytes).await
}

/// Imports Latin-1 encoded CSV content, returning the number of entries created.
///
/// See [`import_csv`] for the failure modes.
pub async fn import_csv_bytes(db: &DatabaseConnection, bytes: &[u8]) -> Result<usize> {
    let text = decode_latin1(bytes);
    let txn = db.begin().await?;

    match stage_rows(&txn, &text).await {
        Ok(staged) => insert_staged(txn, staged).await,
        Err(e) => {
            warn!("CSV import aborted: {e}");
            txn.rollback().await?;
            Err(e)
        }
    }
}

/// Parses, resolves and validates every row without writing anything.
async fn stage_rows(txn: &DatabaseTransaction, text: &str) -> Result<Vec<NewBudgetEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let columns = FieldColumns::from_headers(reader.headers()?);
    debug!(?columns, "CSV header resolved");

    let mut line_item_ids: HashMap<String, i64> = HashMap::new();
    let mut project_ids: HashMap<String, i64> = HashMap::new();
    let mut staged = Vec::new();

    for record in reader.records() {
        let record = record?;
        // Physical line where the record starts; quoted cells may span lines
        let line = record.position().map(csv::Position::line).unwrap_or_default();

        let line_item_name = required_cell(&record, LINE_ITEM_COLUMN, "rubro", line)?;
        let line_item_id = match line_item_ids.get(&line_item_name.to_lowercase()) {
            Some(id) => *id,
            None => {
                let line_item = find_line_item_by_name(txn, line_item_name)
                    .await?
                    .ok_or_else(|| Error::LineItemNotFound {
                        name: line_item_name.to_string(),
                    })?;
                line_item_ids.insert(line_item_name.to_lowercase(), line_item.id);
                line_item.id
            }
        };

        let project_number = required_cell(&record, PROJECT_COLUMN, "numero_proyecto", line)?;
        let project_id = match project_ids.get(project_number) {
            Some(id) => *id,
            None => {
                let project = find_project_by_number(txn, project_number)
                    .await?
                    .ok_or_else(|| Error::ProjectNotFound {
                        number: project_number.to_string(),
                    })?;
                project_ids.insert(project_number.to_string(), project.id);
                project.id
            }
        };

        let entry = NewBudgetEntry {
            project_id,
            line_item_id,
            available: amount(&record, columns.available, "disponibilidad", line)?
                .unwrap_or(0.0),
            expenditure: amount(&record, columns.expenditure, "egreso", line)?.unwrap_or(0.0),
            reserve: amount(&record, columns.reserve, "reserva", line)?.unwrap_or(0.0),
            initial_value: amount(&record, columns.initial_value, "valor_inicial", line)?
                .ok_or_else(|| Error::Validation {
                    field: "valor_inicial".to_string(),
                    message: format!("missing on line {line}"),
                })?,
            description: columns
                .description
                .and_then(|index| record.get(index))
                .map(str::to_string),
        };
        entry.validate()?;
        staged.push(entry);
    }

    Ok(staged)
}

/// Writes the staged entries and commits, or rolls back if any insert fails.
async fn insert_staged(txn: DatabaseTransaction, staged: Vec<NewBudgetEntry>) -> Result<usize> {
    let count = staged.len();
    let models: Vec<budget_entry::ActiveModel> = staged
        .into_iter()
        .map(NewBudgetEntry::into_active_model)
        .collect();

    for chunk in models.chunks(INSERT_CHUNK_SIZE) {
        if let Err(e) = BudgetEntry::insert_many(chunk.iter().cloned())
            .exec_without_returning(&txn)
            .await
        {
            error!("Bulk insert of {count} budget entries failed: {e}");
            txn.rollback().await?;
            return Err(Error::ImportFailed {
                message: e.to_string(),
            });
        }
    }

    txn.commit().await.map_err(|e| {
        error!("Committing CSV import failed: {e}");
        Error::ImportFailed {
            message: e.to_string(),
        }
    })?;

    info!(count, "Budget entries imported");
    Ok(count)
}

fn required_cell<'r>(
    record: &'r StringRecord,
    index: usize,
    field: &str,
    line: u64,
) -> Result<&'r str> {
    record
        .get(index)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::Validation {
            field: field.to_string(),
            message: format!("missing on line {line}"),
        })
}

/// Reads an optional numeric cell; blank or absent cells yield `None`.
fn amount(
    record: &StringRecord,
    index: Option<usize>,
    field: &str,
    line: u64,
) -> Result<Option<f64>> {
    let Some(raw) = index.and_then(|index| record.get(index)) else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| Error::Validation {
            field: field.to_string(),
            message: format!("{raw:?} on line {line} is not a number"),
        })
}
