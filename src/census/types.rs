// Census API request and response types.
// Defines geographies, table requests, and the raw tabular response.

use serde::{Deserialize, Serialize};

use crate::error::{CensusError, Result};

use super::variables::VariableGroup;

/// Census summary level a table is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geography {
    State,
    County,
    TribalArea,
}

impl Geography {
    /// Name of the geography in the census `for=` clause.
    pub fn api_name(&self) -> &'static str {
        match self {
            Geography::State => "state",
            Geography::County => "county",
            Geography::TribalArea => "american indian area/alaska native area/hawaiian home land",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Geography::State => "state",
            Geography::County => "county",
            Geography::TribalArea => "tribal_area",
        }
    }

    /// Whether response rows carry a `state` FIPS column.
    pub fn has_state_column(&self) -> bool {
        matches!(self, Geography::State | Geography::County)
    }
}

/// A request for one or more variable groups at a geography.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRequest {
    pub geography: Geography,
    pub groups: Vec<VariableGroup>,
}

impl TableRequest {
    pub fn new(geography: Geography, groups: &[VariableGroup]) -> Self {
        Self {
            geography,
            groups: groups.to_vec(),
        }
    }

    /// All variable codes in request order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.groups.iter().flat_map(|g| g.codes()).collect()
    }

    /// Stable key used for cache file names.
    pub fn cache_key(&self) -> String {
        let groups: Vec<&str> = self.groups.iter().map(|g| g.slug()).collect();
        format!("{}-{}", self.geography.slug(), groups.join("+"))
    }
}

/// Raw census response: a header row and string cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Build a table from the census JSON layout (array of arrays, first row is the header).
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Array(mut rows) = value else {
            return Err(CensusError::MalformedResponse(
                "expected a JSON array".to_string(),
            ));
        };

        if rows.is_empty() {
            return Ok(Self::default());
        }

        let header = match rows.remove(0) {
            serde_json::Value::Array(cells) => cells
                .into_iter()
                .map(|cell| cell_text(cell).unwrap_or_default())
                .collect::<Vec<_>>(),
            _ => {
                return Err(CensusError::MalformedResponse(
                    "header row is not an array".to_string(),
                ));
            }
        };

        let mut parsed = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            let serde_json::Value::Array(cells) = row else {
                return Err(CensusError::MalformedResponse(format!(
                    "row {} is not an array",
                    i + 1
                )));
            };
            if cells.len() != header.len() {
                return Err(CensusError::MalformedResponse(format!(
                    "row {} has {} cells, header has {}",
                    i + 1,
                    cells.len(),
                    header.len()
                )));
            }
            parsed.push(cells.into_iter().map(cell_text).collect());
        }

        Ok(Self {
            header,
            rows: parsed,
        })
    }

    /// Index of a header column.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CensusError::MissingColumn(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell_text(cell: serde_json::Value) -> Option<String> {
    match cell {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Parse an estimate cell. Negative values are census annotation sentinels
/// (e.g. -666666666 for "estimate not available") and count as missing.
pub fn parse_estimate(cell: Option<&str>) -> Option<f64> {
    let value: f64 = cell?.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}
