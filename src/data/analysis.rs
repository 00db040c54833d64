// Derived census tables.
// Percent breakdowns of language use, public assistance, and poverty by area.

use crate::census::VariableGroup;
use crate::error::{CensusError, Result};

use super::dataset::{CensusSource, Dataset};
use super::frame::Frame;

/// Column holding the summed share of people below 185% of the poverty level.
pub const UNDER_185_COLUMN: &str = "under 185%";

/// Column of the transposed per-state language table.
pub const SPEAKER_SHARE_COLUMN: &str = "percentage of speakers";

impl<S: CensusSource> Dataset<S> {
    pub async fn total_population(&self) -> Result<Frame> {
        self.frame_for_county_vars(VariableGroup::TotalPopulation)
            .await
    }

    pub async fn county_language_data(&self) -> Result<Frame> {
        self.frame_for_county_vars(VariableGroup::Language)
            .await?
            .percentages()
    }

    pub async fn public_assistance_data(&self) -> Result<Frame> {
        self.frame_for_county_vars(VariableGroup::PublicAssistance)
            .await?
            .percentages()
    }

    /// Sum the population under 185% of the poverty level and convert to a share.
    pub async fn poverty_level_data(&self) -> Result<Frame> {
        let poverty = self
            .frame_for_county_vars(VariableGroup::PovertyLevel)
            .await?;
        let columns = poverty.columns();
        let brackets: Vec<&str> = columns
            .iter()
            .filter(|c| !c.starts_with("total"))
            .map(String::as_str)
            .collect();
        poverty
            .sum_columns(&brackets, UNDER_185_COLUMN)?
            .percentages()
    }

    /// Population, assistance, poverty, and language shares for every state and county.
    pub async fn county_census_data(&self) -> Result<Frame> {
        let population = self.total_population().await?;
        let assistance = self.public_assistance_data().await?;
        let poverty = self.poverty_level_data().await?;
        let language = self.county_language_data().await?;

        population
            .join(&assistance)?
            .join(&poverty)?
            .join(&language)
    }

    /// Share of speakers per detailed language for one state, one row per language.
    /// Returns the state's display name with the table.
    pub async fn detailed_language_for_state(&self, fips: &str) -> Result<(String, Frame)> {
        let state = self
            .frame_for_state_vars(VariableGroup::DetailedLanguage)
            .await?
            .for_state(fips)?;

        let name = state
            .keys()?
            .into_iter()
            .next()
            .map(|key| key.name)
            .ok_or_else(|| CensusError::UnknownGeography(format!("state FIPS {}", fips)))?;

        Ok((
            name,
            state.percentages()?.transpose_first_row(SPEAKER_SHARE_COLUMN)?,
        ))
    }

    /// Population and language shares for every tribal area.
    pub async fn tribal_language_data(&self) -> Result<Frame> {
        let population = self
            .frame_for_tribal_areas(VariableGroup::TotalPopulation)
            .await?;
        let language = self
            .frame_for_tribal_areas(VariableGroup::Language)
            .await?
            .percentages()?;
        population.join(&language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::census::{COUNTY_GROUPS, Geography, TableRequest};
    use crate::data::dataset::fake::{FakeSource, raw_table};

    /// Values for the 24 county-level variables: language (13), assistance (2),
    /// poverty (8), population (1).
    fn county_values(population: u32, spanish: u32) -> Vec<String> {
        let mut values = vec!["1000".to_string(), spanish.to_string()];
        values.extend(std::iter::repeat_n("5".to_string(), 11));
        values.extend(["400".to_string(), "40".to_string()]);
        values.extend(["400".to_string(), "10".to_string(), "10".to_string()]);
        values.extend(std::iter::repeat_n("0".to_string(), 5));
        values.push(population.to_string());
        values
    }

    fn refs(values: &[String]) -> Vec<&str> {
        values.iter().map(String::as_str).collect()
    }

    fn county_source() -> FakeSource {
        let codes: Vec<&str> = TableRequest::new(Geography::State, &COUNTY_GROUPS).codes();

        let al = county_values(5000, 100);
        let small = county_values(100, 20);
        let big = county_values(900, 300);
        let ak = county_values(700, 0);

        FakeSource::default()
            .with(
                TableRequest::new(Geography::State, &COUNTY_GROUPS),
                raw_table(
                    &codes,
                    &["state"],
                    &[
                        ("Alaska", refs(&ak), vec!["02"]),
                        ("Alabama", refs(&al), vec!["01"]),
                    ],
                ),
            )
            .with(
                TableRequest::new(Geography::County, &COUNTY_GROUPS),
                raw_table(
                    &codes,
                    &["state", "county"],
                    &[
                        ("Small County, Alabama", refs(&small), vec!["01", "003"]),
                        ("Big County, Alabama", refs(&big), vec!["01", "001"]),
                    ],
                ),
            )
    }

    #[tokio::test]
    async fn test_county_census_data() {
        let dataset = Dataset::new(county_source(), "acs5", 2019);
        let frame = dataset.county_census_data().await.unwrap();

        let columns = frame.columns();
        assert_eq!(columns[0], "total population");
        assert_eq!(columns[1], "received public assistance");
        assert_eq!(columns[2], UNDER_185_COLUMN);
        assert_eq!(columns[3], "spanish speakers");
        assert_eq!(columns.len(), 3 + 12);

        let alabama = frame.for_state("01").unwrap();
        let keys = alabama.keys().unwrap();
        let names: Vec<&str> = keys.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["Alabama", "Big County, Alabama", "Small County, Alabama"]);

        assert_eq!(alabama.value(0, "received public assistance"), Some(0.1));
        assert_eq!(alabama.value(0, UNDER_185_COLUMN), Some(0.05));
        assert_eq!(alabama.value(1, "spanish speakers"), Some(0.3));

        // Two downloads serve all four groups.
        assert_eq!(dataset.source().request_count(), 2);
    }

    #[tokio::test]
    async fn test_detailed_language_for_state() {
        let codes = VariableGroup::DetailedLanguage.codes();
        let mut values = vec!["1000", "250"];
        values.extend(std::iter::repeat_n("5", codes.len() - 2));

        let source = FakeSource::default().with(
            TableRequest::new(Geography::State, &[VariableGroup::DetailedLanguage]),
            raw_table(&codes, &["state"], &[("California", values, vec!["06"])]),
        );
        let dataset = Dataset::new(source, "acs5", 2019);

        let (name, frame) = dataset.detailed_language_for_state("06").await.unwrap();
        assert_eq!(name, "California");
        assert_eq!(frame.columns(), vec![SPEAKER_SHARE_COLUMN]);
        assert_eq!(frame.len(), codes.len() - 1);
        assert_eq!(frame.keys().unwrap()[0].name, "spanish speakers");
        assert_eq!(frame.rows().unwrap()[0], vec![Some(0.25)]);

        let err = dataset.detailed_language_for_state("99").await.unwrap_err();
        assert!(matches!(err, CensusError::UnknownGeography(_)));
    }
}
