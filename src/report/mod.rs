// Styled-table renderers.
// Build the per-state and per-tribal-area reports shown by the browser and the CLI.

pub mod style;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::data::{CensusSource, Dataset, WicTable};
use crate::error::Result;

pub use style::{StyledTable, format_percentage_frame, format_wic_table};

/// One titled block of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Stable identifier for jumping between sections.
    pub anchor: &'static str,
    pub heading: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Table(StyledTable),
    /// The section's data could not be loaded; the message says why.
    Unavailable(String),
}

/// A rendered report for one selected key.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Key the report was rendered for.
    pub key: String,
    pub title: String,
    pub sections: Vec<Section>,
}

/// Renders reports from census data and the WIC coverage sheet.
pub struct Reports<S> {
    dataset: Dataset<S>,
    wic_path: PathBuf,
    threshold: f64,
}

impl<S: CensusSource> Reports<S> {
    pub fn new(dataset: Dataset<S>, wic_path: PathBuf, threshold: f64) -> Self {
        Self {
            dataset,
            wic_path,
            threshold,
        }
    }

    pub fn dataset(&self) -> &Dataset<S> {
        &self.dataset
    }

    /// WIC utilization, detailed language shares, and county breakdowns for a state.
    pub async fn state_report(&self, fips: &str) -> Result<Report> {
        let (state_name, languages) = self.dataset.detailed_language_for_state(fips).await?;
        let counties = self.dataset.county_census_data().await?.for_state(fips)?;

        let sections = vec![
            Section {
                anchor: "utilization",
                heading: format!("WIC Utilization data for {}", state_name),
                body: self.wic_section(&state_name),
            },
            Section {
                anchor: "state-lang",
                heading: format!("Detailed language breakdowns for {}", state_name),
                body: SectionBody::Table(format_percentage_frame(
                    &languages,
                    "language",
                    self.threshold,
                )?),
            },
            Section {
                anchor: "county-lang",
                heading: format!(
                    "County-level language and poverty data for {}",
                    state_name
                ),
                body: SectionBody::Table(format_percentage_frame(
                    &counties,
                    "place name",
                    self.threshold,
                )?),
            },
        ];

        info!(fips, state = %state_name, counties = counties.len(), "rendered state report");
        Ok(Report {
            key: fips.to_string(),
            title: state_name,
            sections,
        })
    }

    /// Population and language shares for one tribal area.
    /// A name without census data renders an empty table.
    pub async fn tribal_report(&self, name: &str) -> Result<Report> {
        let rows = self.dataset.tribal_language_data().await?.for_name(name)?;
        if rows.is_empty() {
            warn!(tribal_area = name, "no census rows for tribal area");
        }

        let table = format_percentage_frame(&rows, "place name", self.threshold)?;
        info!(tribal_area = name, rows = rows.len(), "rendered tribal report");

        Ok(Report {
            key: name.to_string(),
            title: name.to_string(),
            sections: vec![Section {
                anchor: "tribal",
                heading: format!("Tribal language Data for {}", name),
                body: SectionBody::Table(table),
            }],
        })
    }

    /// The WIC sheet is read fresh for every render; a missing or unreadable
    /// file only blanks this section.
    fn wic_section(&self, state_name: &str) -> SectionBody {
        match WicTable::load(&self.wic_path) {
            Ok(table) => SectionBody::Table(format_wic_table(&table.for_state(state_name))),
            Err(e) => {
                warn!(path = %self.wic_path.display(), error = %e, "WIC coverage unavailable");
                SectionBody::Unavailable(format!(
                    "WIC coverage data unavailable ({}): {}",
                    self.wic_path.display(),
                    e
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use crate::census::{COUNTY_GROUPS, Geography, RawTable, TableRequest, VariableGroup};
    use crate::data::dataset::fake::{FakeSource, raw_table};
    use crate::error::CensusError;

    fn repeat(value: &str, n: usize) -> Vec<String> {
        vec![value.to_string(); n]
    }

    fn refs(values: &[String]) -> Vec<&str> {
        values.iter().map(String::as_str).collect()
    }

    fn source() -> FakeSource {
        let county_codes = TableRequest::new(Geography::State, &COUNTY_GROUPS).codes();
        let county_row = repeat("100", county_codes.len());

        let detailed_codes = VariableGroup::DetailedLanguage.codes();
        let mut detailed_row = vec!["200".to_string(), "50".to_string()];
        detailed_row.extend(repeat("1", detailed_codes.len() - 2));

        let tribal_lang_codes = VariableGroup::Language.codes();
        let mut tribal_lang_row = vec!["1000".to_string(), "5".to_string()];
        tribal_lang_row.extend(repeat("20", tribal_lang_codes.len() - 2));

        let tribal_column = Geography::TribalArea.api_name();

        FakeSource::default()
            .with(
                TableRequest::new(Geography::State, &COUNTY_GROUPS),
                raw_table(
                    &county_codes,
                    &["state"],
                    &[("Vermont", refs(&county_row), vec!["50"])],
                ),
            )
            .with(
                TableRequest::new(Geography::County, &COUNTY_GROUPS),
                raw_table(
                    &county_codes,
                    &["state", "county"],
                    &[
                        ("Addison County, Vermont", refs(&county_row), vec!["50", "001"]),
                        ("Coos County, New Hampshire", refs(&county_row), vec!["33", "007"]),
                    ],
                ),
            )
            .with(
                TableRequest::new(Geography::State, &[VariableGroup::DetailedLanguage]),
                raw_table(
                    &detailed_codes,
                    &["state"],
                    &[("Vermont", refs(&detailed_row), vec!["50"])],
                ),
            )
            .with(
                TableRequest::new(Geography::TribalArea, &[VariableGroup::TotalPopulation]),
                raw_table(
                    &VariableGroup::TotalPopulation.codes(),
                    &[tribal_column],
                    &[("Zuni Reservation, NM--AZ", vec!["7500"], vec!["4700"])],
                ),
            )
            .with(
                TableRequest::new(Geography::TribalArea, &[VariableGroup::Language]),
                raw_table(
                    &tribal_lang_codes,
                    &[tribal_column],
                    &[("Zuni Reservation, NM--AZ", refs(&tribal_lang_row), vec!["4700"])],
                ),
            )
    }

    fn reports(wic_path: PathBuf) -> Reports<FakeSource> {
        Reports::new(Dataset::new(source(), "acs5", 2019), wic_path, 0.01)
    }

    fn table(section: &Section) -> &StyledTable {
        match &section.body {
            SectionBody::Table(table) => table,
            SectionBody::Unavailable(msg) => panic!("section unavailable: {}", msg),
        }
    }

    #[tokio::test]
    async fn test_state_report_sections() {
        let dir = TempDir::new().unwrap();
        let wic_path = dir.path().join("wic.csv");
        fs::write(
            &wic_path,
            "State,Number Eligible,Coverage Rate\nVermont,\"18,500\",0.62\nOhio,1,0.5\n",
        )
        .unwrap();

        let report = reports(wic_path).state_report("50").await.unwrap();
        assert_eq!(report.title, "Vermont");
        assert_eq!(report.key, "50");

        let anchors: Vec<&str> = report.sections.iter().map(|s| s.anchor).collect();
        assert_eq!(anchors, vec!["utilization", "state-lang", "county-lang"]);
        assert_eq!(report.sections[0].heading, "WIC Utilization data for Vermont");

        let wic = table(&report.sections[0]);
        assert_eq!(wic.rows.len(), 1);
        assert_eq!(wic.rows[0].cells[0].text, "18,500");
        assert_eq!(wic.rows[0].cells[1].text, "62%");

        let languages = table(&report.sections[1]);
        assert_eq!(languages.columns, vec!["percentage of speakers"]);
        assert_eq!(languages.rows[0].label, "spanish speakers");
        assert_eq!(languages.rows[0].cells[0].text, "25.00%");
        assert!(languages.rows[0].cells[0].highlight);
        // 1 of 200 speakers is 0.5%, below the threshold.
        assert!(!languages.rows[1].cells[0].highlight);

        let counties = table(&report.sections[2]);
        let labels: Vec<&str> = counties.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Vermont", "Addison County, Vermont"]);
        assert_eq!(counties.rows[0].cells[0].text, "100");
    }

    #[tokio::test]
    async fn test_state_report_without_wic_file() {
        let dir = TempDir::new().unwrap();
        let report = reports(dir.path().join("missing.csv"))
            .state_report("50")
            .await
            .unwrap();

        assert!(matches!(
            report.sections[0].body,
            SectionBody::Unavailable(_)
        ));
        assert!(matches!(report.sections[1].body, SectionBody::Table(_)));
    }

    #[tokio::test]
    async fn test_state_report_unknown_fips() {
        let dir = TempDir::new().unwrap();
        let err = reports(dir.path().join("wic.csv"))
            .state_report("99")
            .await
            .unwrap_err();
        assert!(matches!(err, CensusError::UnknownGeography(_)));
    }

    #[tokio::test]
    async fn test_tribal_report() {
        let dir = TempDir::new().unwrap();
        let reports = reports(dir.path().join("wic.csv"));

        let report = reports.tribal_report("Zuni Reservation, NM--AZ").await.unwrap();
        assert_eq!(report.sections.len(), 1);
        assert_eq!(
            report.sections[0].heading,
            "Tribal language Data for Zuni Reservation, NM--AZ"
        );

        let zuni = table(&report.sections[0]);
        assert_eq!(zuni.columns[0], "total population");
        assert_eq!(zuni.columns[1], "spanish speakers");
        assert_eq!(zuni.rows[0].cells[0].text, "7,500");
        assert_eq!(zuni.rows[0].cells[1].text, "0.50%");
        assert!(!zuni.rows[0].cells[1].highlight);
        assert_eq!(zuni.rows[0].cells[2].text, "2.00%");
        assert!(zuni.rows[0].cells[2].highlight);

        let empty = reports.tribal_report("Nowhere").await.unwrap();
        assert!(table(&empty.sections[0]).is_empty());
    }

    #[tokio::test]
    async fn test_tribal_report_with_empty_census_response() {
        let source = FakeSource::default()
            .with(
                TableRequest::new(Geography::TribalArea, &[VariableGroup::TotalPopulation]),
                RawTable::default(),
            )
            .with(
                TableRequest::new(Geography::TribalArea, &[VariableGroup::Language]),
                RawTable::default(),
            );
        let dir = TempDir::new().unwrap();
        let reports = Reports::new(
            Dataset::new(source, "acs5", 2019),
            dir.path().join("wic.csv"),
            0.01,
        );

        let report = reports
            .tribal_report("Zuni Reservation and Off-Reservation Trust Land, NM--AZ")
            .await
            .unwrap();
        let zuni = table(&report.sections[0]);
        assert!(zuni.is_empty());
        assert_eq!(zuni.columns[0], "total population");
        assert_eq!(zuni.columns[1], "spanish speakers");
    }
}
