//! Command handlers. Each returns the text to print.

use super::{Args, Command};
use crate::{
    config::catalog::load_config,
    core::{
        catalog::seed_catalog,
        dimension::{ReportDimension, filter_options},
        import::import_csv,
        report::{
            ReportOutput, dispatch_dimension_report, format_entries_table, format_report_table,
        },
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Runs the parsed command against `db`.
///
/// # Errors
/// Propagates the error of the underlying operation.
pub async fn run(db: &DatabaseConnection, args: &Args) -> Result<String> {
    debug!(?args, "Running command");
    match args.command() {
        Command::Report {
            report_type,
            filter,
            json,
        } => report(db, report_type, filter.as_deref(), *json).await,
        Command::Options { report_type } => options(db, report_type).await,
        Command::Import { file } => import(db, file).await,
        Command::Seed { config } => seed(db, config).await,
    }
}

async fn report(
    db: &DatabaseConnection,
    report_type: &str,
    filter: Option<&str>,
    json: bool,
) -> Result<String> {
    let dimension: ReportDimension = report_type.parse()?;
    let output = dispatch_dimension_report(db, dimension, filter).await?;

    if json {
        let text = match output {
            ReportOutput::Grouped(rows) => {
                let records: Vec<BTreeMap<_, _>> =
                    rows.iter().map(|row| row.to_record(dimension)).collect();
                serde_json::to_string_pretty(&records)?
            }
            ReportOutput::Entries(entries) => serde_json::to_string_pretty(&entries)?,
        };
        return Ok(text);
    }

    Ok(match output {
        ReportOutput::Grouped(rows) => format_report_table(dimension, &rows),
        ReportOutput::Entries(entries) => format_entries_table(&entries),
    })
}

async fn options(db: &DatabaseConnection, report_type: &str) -> Result<String> {
    let dimension: ReportDimension = report_type.parse()?;
    let values = filter_options(db, dimension).await?;

    if values.is_empty() {
        return Ok(format!("No filter options for {dimension}"));
    }

    let mut text = format!("Filter options for {dimension}:\n");
    for value in values {
        text.push_str(&format!("  {value}\n"));
    }
    Ok(text)
}

async fn import(db: &DatabaseConnection, file: &Path) -> Result<String> {
    let count = import_csv(db, file).await?;
    Ok(format!("Imported {count} budget entries from {}", file.display()))
}

async fn seed(db: &DatabaseConnection, config_path: &Path) -> Result<String> {
    let config = load_config(config_path)?;
    let summary = seed_catalog(db, &config).await?;
    info!(path = %config_path.display(), "Catalog file applied");
    Ok(format!(
        "Created {} faculties, {} groups, {} seedbeds and {} line items",
        summary.faculties, summary.groups, summary.seedbeds, summary.line_items
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::*;
    use std::io::Write;

    fn report_args(report_type: &str, filter: Option<&str>, json: bool) -> Args {
        Args::new(Command::Report {
            report_type: report_type.to_string(),
            filter: filter.map(str::to_string),
            json,
        })
    }

    #[test]
    fn test_args_parse() {
        use clap::Parser;
        let args = Args::parse_from(["research-budget", "report", "por_facultad", "--filter", "2"]);
        assert!(matches!(
            args.command(),
            Command::Report { report_type, filter: Some(filter), json: false }
                if report_type == "por_facultad" && filter == "2"
        ));

        let args = Args::parse_from(["research-budget", "seed"]);
        assert!(matches!(
            args.command(),
            Command::Seed { config } if config == Path::new("config.toml")
        ));
    }

    #[tokio::test]
    async fn test_report_table() -> Result<()> {
        let fixture = setup_with_catalog().await?;
        create_test_entry(&fixture.db, fixture.robotics.id, fixture.equipment.id, 100.5).await?;
        create_test_entry(&fixture.db, fixture.drones.id, fixture.staff.id, 49.5).await?;

        let text = run(&fixture.db, &report_args("by_faculty", None, false)).await?;
        assert!(text.contains("Ingeniería"));
        assert!(text.contains("150.00"));
        assert!(text.contains("1 group(s)"));
        Ok(())
    }

    #[tokio::test]
    async fn test_report_json() -> Result<()> {
        let fixture = setup_with_catalog().await?;
        create_test_entry(&fixture.db, fixture.genomics.id, fixture.staff.id, 7.0).await?;

        let text = run(&fixture.db, &report_args("by_group", None, true)).await?;
        let records: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(records[0]["group_name"], "Biología Molecular");
        assert_eq!(records[0]["available_total"], 7.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_filtered_report_json_lists_entries() -> Result<()> {
        let fixture = setup_with_catalog().await?;
        create_test_entry(&fixture.db, fixture.robotics.id, fixture.equipment.id, 1.0).await?;
        create_test_entry(&fixture.db, fixture.genomics.id, fixture.staff.id, 2.0).await?;

        let filter = fixture.genomics.id.to_string();
        let text = run(&fixture.db, &report_args("by_project", Some(&filter), true)).await?;
        let entries: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(entries.as_array().map(Vec::len), Some(1));
        assert_eq!(entries[0]["project_id"], fixture.genomics.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_report_rejects_unknown_type() -> Result<()> {
        let fixture = setup_with_catalog().await?;
        let result = run(&fixture.db, &report_args("by_color", None, false)).await;
        assert!(matches!(result, Err(Error::UnknownReportType { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_report_rejects_filter_outside_options() -> Result<()> {
        let fixture = setup_with_catalog().await?;
        let result = run(&fixture.db, &report_args("por_anio", Some("1999"), false)).await;
        assert!(matches!(
            result,
            Err(Error::InvalidFilterOption { report_type, value })
                if report_type == "by_year" && value == "1999"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_options_lists_years() -> Result<()> {
        let fixture = setup_with_catalog().await?;
        let args = Args::new(Command::Options {
            report_type: "por_anio".to_string(),
        });
        let text = run(&fixture.db, &args).await?;
        assert_eq!(text, "Filter options for by_year:\n  2022\n  2023\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_import_command() -> Result<()> {
        let fixture = setup_with_catalog().await?;
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"rubro,proyecto,valor_inicial,disponibilidad\nEquipos,P-001,10,8\n")?;

        let args = Args::new(Command::Import {
            file: file.path().to_path_buf(),
        });
        let text = run(&fixture.db, &args).await?;
        assert!(text.starts_with("Imported 1 budget entries"));
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_command() -> Result<()> {
        let db = setup_test_db().await?;
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(
            "line_items = [\"Equipos\"]\n\n[[faculties]]\nname = \"Ingeniería\"\ngroups = [\"GIDIA\"]\n"
                .as_bytes(),
        )?;

        let args = Args::new(Command::Seed {
            config: file.path().to_path_buf(),
        });
        let text = run(&db, &args).await?;
        assert_eq!(
            text,
            "Created 1 faculties, 1 groups, 0 seedbeds and 1 line items"
        );
        Ok(())
    }
}
