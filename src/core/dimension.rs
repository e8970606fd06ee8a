//! Report dimensions - the fixed set of ways budget reports can be grouped.
//!
//! Report types arrive as strings from the outside (command line, stored links). They are
//! parsed once into [`ReportDimension`] so the rest of the crate matches exhaustively on an
//! enum. Both the English names (`by_faculty`) and the historical Spanish ones
//! (`por_facultad`) are accepted, case-insensitively.

use crate::{
    entities::{
        Faculty, Group, LineItem, Project, Seedbed, faculty, group, line_item, project, seedbed,
    },
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate};
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder, QuerySelect};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A grouping dimension for budget reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportDimension {
    /// Group by the project's faculty
    Faculty,
    /// Group by the project's research group
    Group,
    /// Group by the project's seedbed program
    Seedbed,
    /// Group by the year the project started
    Year,
    /// Group by the entry's line item
    LineItem,
    /// Group by project
    Project,
}

impl ReportDimension {
    /// Every dimension, in presentation order.
    pub const ALL: [Self; 6] = [
        Self::Faculty,
        Self::Group,
        Self::Seedbed,
        Self::Year,
        Self::LineItem,
        Self::Project,
    ];

    /// Canonical name of the dimension.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Faculty => "by_faculty",
            Self::Group => "by_group",
            Self::Seedbed => "by_seedbed",
            Self::Year => "by_year",
            Self::LineItem => "by_line_item",
            Self::Project => "by_project",
        }
    }

    /// Name of the report column holding the group's display value.
    #[must_use]
    pub const fn label_column(self) -> &'static str {
        match self {
            Self::Faculty => "faculty_name",
            Self::Group => "group_name",
            Self::Seedbed => "seedbed_name",
            Self::Year => "year",
            Self::LineItem => "line_item_name",
            Self::Project => "project_number",
        }
    }
}

impl fmt::Display for ReportDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportDimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "by_faculty" | "por_facultad" | "faculty" => Ok(Self::Faculty),
            "by_group" | "por_grupo" | "group" => Ok(Self::Group),
            "by_seedbed" | "por_semillero" | "seedbed" => Ok(Self::Seedbed),
            "by_year" | "por_anio" | "year" => Ok(Self::Year),
            "by_line_item" | "por_rubro" | "line_item" => Ok(Self::LineItem),
            "by_project" | "por_proyecto" | "project" => Ok(Self::Project),
            _ => Err(Error::UnknownReportType {
                report_type: s.to_string(),
            }),
        }
    }
}

/// Lists the values a report of the given dimension can be filtered by.
///
/// This is a live query: ids of every faculty, group, seedbed, line item or project currently
/// stored, or the distinct start years of the stored projects.
pub async fn filter_options<C: ConnectionTrait>(
    db: &C,
    dimension: ReportDimension,
) -> Result<Vec<i64>> {
    let options = match dimension {
        ReportDimension::Faculty => ids_of::<_, Faculty>(db, faculty::Column::Id).await?,
        ReportDimension::Group => ids_of::<_, Group>(db, group::Column::Id).await?,
        ReportDimension::Seedbed => ids_of::<_, Seedbed>(db, seedbed::Column::Id).await?,
        ReportDimension::LineItem => ids_of::<_, LineItem>(db, line_item::Column::Id).await?,
        ReportDimension::Project => ids_of::<_, Project>(db, project::Column::Id).await?,
        ReportDimension::Year => {
            let dates: Vec<NaiveDate> = Project::find()
                .select_only()
                .column(project::Column::StartDate)
                .into_tuple::<NaiveDate>()
                .all(db)
                .await?;
            dates
                .into_iter()
                .map(|date| i64::from(date.year()))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }
    };
    Ok(options)
}

async fn ids_of<C, E>(db: &C, id_column: E::Column) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    E::find()
        .select_only()
        .column(id_column)
        .order_by_asc(id_column)
        .into_tuple::<i64>()
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "POR_FACULTAD".parse::<ReportDimension>().ok(),
            Some(ReportDimension::Faculty)
        );
        assert_eq!(
            " By_Line_Item ".parse::<ReportDimension>().ok(),
            Some(ReportDimension::LineItem)
        );
    }

    #[test]
    fn test_parse_accepts_legacy_names() {
        let pairs = [
            ("por_facultad", ReportDimension::Faculty),
            ("por_grupo", ReportDimension::Group),
            ("por_semillero", ReportDimension::Seedbed),
            ("por_anio", ReportDimension::Year),
            ("por_rubro", ReportDimension::LineItem),
            ("por_proyecto", ReportDimension::Project),
        ];
        for (name, expected) in pairs {
            assert_eq!(name.parse::<ReportDimension>().ok(), Some(expected), "{name}");
        }
    }

    #[test]
    fn test_parse_roundtrips_canonical_names() {
        for dimension in ReportDimension::ALL {
            assert_eq!(
                dimension.to_string().parse::<ReportDimension>().ok(),
                Some(dimension)
            );
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let result = "por_investigador".parse::<ReportDimension>();
        assert!(matches!(
            result,
            Err(Error::UnknownReportType { report_type }) if report_type == "por_investigador"
        ));
    }

    #[tokio::test]
    async fn test_filter_options_lists_ids() -> Result<()> {
        let fixture = setup_with_catalog().await?;

        let faculties = filter_options(&fixture.db, ReportDimension::Faculty).await?;
        assert_eq!(faculties, vec![fixture.engineering.id, fixture.sciences.id]);

        let projects = filter_options(&fixture.db, ReportDimension::Project).await?;
        assert_eq!(projects.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_filter_options_for_year_are_distinct_start_years() -> Result<()> {
        let fixture = setup_with_catalog().await?;

        let years = filter_options(&fixture.db, ReportDimension::Year).await?;
        assert_eq!(years, vec![2022, 2023]);

        Ok(())
    }

    #[tokio::test]
    async fn test_filter_options_reflect_new_rows() -> Result<()> {
        let fixture = setup_with_catalog().await?;
        let before = filter_options(&fixture.db, ReportDimension::LineItem).await?;

        let travel = create_test_line_item(&fixture.db, "Viajes").await?;
        let after = filter_options(&fixture.db, ReportDimension::LineItem).await?;

        assert_eq!(after.len(), before.len() + 1);
        assert!(after.contains(&travel.id));
        Ok(())
    }
}
