// Indexed numeric tables backed by polars.
// Every frame carries `state fips` and `name` key columns followed by Float64 value columns.

use polars::prelude::*;

use crate::census::{Geography, RawTable, VariableGroup, parse_estimate};
use crate::error::{CensusError, Result};

const STATE_COLUMN: &str = "state fips";
const NAME_COLUMN: &str = "name";
const ORDER_COLUMN: &str = "row order";

/// Number of key columns in front of the values.
const KEY_COLUMNS: usize = 2;

/// Row identity: state FIPS (for state and county rows) and place name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub state_fips: Option<String>,
    pub name: String,
}

impl RowKey {
    pub fn new(state_fips: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            state_fips: state_fips.map(str::to_string),
            name: name.into(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            state_fips: None,
            name: name.into(),
        }
    }
}

/// A table of optional numbers with labeled columns, keyed by [`RowKey`].
///
/// Rows without a state are stored with an empty `state fips` so that joins on
/// the key columns never compare nulls.
#[derive(Debug, Clone)]
pub struct Frame {
    data: DataFrame,
}

impl Frame {
    /// Build a frame from keyed rows. Short rows are padded with missing values.
    pub fn from_rows(columns: Vec<String>, rows: Vec<(RowKey, Vec<Option<f64>>)>) -> Result<Self> {
        let states: Vec<&str> = rows
            .iter()
            .map(|(key, _)| key.state_fips.as_deref().unwrap_or(""))
            .collect();
        let names: Vec<&str> = rows.iter().map(|(key, _)| key.name.as_str()).collect();

        let mut data = vec![
            Column::new(STATE_COLUMN.into(), states),
            Column::new(NAME_COLUMN.into(), names),
        ];
        for (i, label) in columns.iter().enumerate() {
            let values: Vec<Option<f64>> = rows
                .iter()
                .map(|(_, values)| values.get(i).copied().flatten())
                .collect();
            data.push(Column::new(label.as_str().into(), values));
        }

        Ok(Self {
            data: DataFrame::new(data)?,
        })
    }

    /// An empty frame with the given value columns.
    pub fn empty(columns: Vec<String>) -> Result<Self> {
        Self::from_rows(columns, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.data.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Value column labels, in order.
    pub fn columns(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .skip(KEY_COLUMNS)
            .map(|name| name.to_string())
            .collect()
    }

    pub fn keys(&self) -> Result<Vec<RowKey>> {
        let states = self.data.column(STATE_COLUMN)?.as_materialized_series().str()?;
        let names = self.data.column(NAME_COLUMN)?.as_materialized_series().str()?;
        Ok(states
            .into_iter()
            .zip(names)
            .map(|(state, name)| {
                RowKey::new(state.filter(|s| !s.is_empty()), name.unwrap_or_default())
            })
            .collect())
    }

    /// Value cells row by row.
    pub fn rows(&self) -> Result<Vec<Vec<Option<f64>>>> {
        let columns = self.data.get_columns()[KEY_COLUMNS..]
            .iter()
            .map(|column| {
                Ok(column
                    .as_materialized_series()
                    .f64()?
                    .into_iter()
                    .collect::<Vec<_>>())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((0..self.len())
            .map(|row| columns.iter().map(|values| values[row]).collect())
            .collect())
    }

    /// Value at a row and named column.
    #[cfg(test)]
    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        self.data
            .column(column)
            .ok()?
            .as_materialized_series()
            .f64()
            .ok()?
            .get(row)
    }

    /// Build a frame from a raw census table, renaming the group's codes to labels.
    /// A table without a header (an empty response) gives an empty frame.
    pub fn from_raw(raw: &RawTable, geography: Geography, group: VariableGroup) -> Result<Self> {
        let labels: Vec<String> = group.labels().iter().map(|l| l.to_string()).collect();
        if raw.header.is_empty() {
            return Self::empty(labels);
        }

        let name_col = raw.column("NAME")?;
        let state_col = if geography.has_state_column() {
            Some(raw.column("state")?)
        } else {
            None
        };
        let value_cols = group
            .codes()
            .iter()
            .map(|code| raw.column(code))
            .collect::<Result<Vec<_>>>()?;

        let width = raw.header.len();
        let mut rows = Vec::with_capacity(raw.rows.len());
        for (i, row) in raw.rows.iter().enumerate() {
            if row.len() != width {
                return Err(CensusError::MalformedResponse(format!(
                    "row {} has {} cells, header has {}",
                    i + 1,
                    row.len(),
                    width
                )));
            }
            let name = row[name_col].clone().unwrap_or_default();
            let state = state_col.and_then(|c| row[c].as_deref());
            let values = value_cols
                .iter()
                .map(|&c| parse_estimate(row[c].as_deref()))
                .collect();
            rows.push((RowKey::new(state, name), values));
        }
        Self::from_rows(labels, rows)
    }

    /// Append the rows of another frame with identical columns.
    pub fn concat(self, other: Frame) -> Result<Frame> {
        let mut data = self.data;
        data.vstack_mut(&other.data)?;
        Ok(Self { data })
    }

    /// Divide every column by the first column and drop it.
    /// A missing or zero divisor yields a missing value.
    pub fn percentages(&self) -> Result<Frame> {
        let columns = self.columns();
        let Some((divisor, rest)) = columns.split_first() else {
            return Ok(self.clone());
        };

        let mut exprs = vec![col(STATE_COLUMN), col(NAME_COLUMN)];
        exprs.extend(rest.iter().map(|column| {
            when(col(divisor.as_str()).neq(lit(0.0)))
                .then(col(column.as_str()) / col(divisor.as_str()))
                .otherwise(lit(NULL))
                .alias(column.as_str())
        }));
        self.select(exprs)
    }

    /// Replace the named columns with a single column holding their sum.
    /// Missing cells count as zero.
    pub fn sum_columns(&self, summed: &[&str], new_column: &str) -> Result<Frame> {
        let total = summed
            .iter()
            .fold(lit(0.0), |acc, column| acc + col(*column).fill_null(lit(0.0)));

        let mut exprs: Vec<Expr> = self
            .data
            .get_column_names()
            .iter()
            .filter(|name| !summed.contains(&name.as_str()))
            .map(|name| col(name.as_str()))
            .collect();
        exprs.push(total.alias(new_column));
        self.select(exprs)
    }

    /// Left join on row key, keeping this frame's row order.
    pub fn join(&self, other: &Frame) -> Result<Frame> {
        let keys = [col(STATE_COLUMN), col(NAME_COLUMN)];
        let data = self
            .data
            .clone()
            .lazy()
            .with_row_index(ORDER_COLUMN, None)
            .join(
                other.data.clone().lazy(),
                keys.clone(),
                keys,
                JoinArgs::new(JoinType::Left),
            )
            .sort([ORDER_COLUMN], SortMultipleOptions::default())
            .collect()?
            .drop(ORDER_COLUMN)?;
        Ok(Self { data })
    }

    /// Rows belonging to one state FIPS code.
    pub fn for_state(&self, fips: &str) -> Result<Frame> {
        self.filter(col(STATE_COLUMN).eq(lit(fips)))
    }

    /// Rows whose place name equals `name`.
    pub fn for_name(&self, name: &str) -> Result<Frame> {
        self.filter(col(NAME_COLUMN).eq(lit(name)))
    }

    /// Turn the first row into a single column: one row per value column.
    pub fn transpose_first_row(&self, column: &str) -> Result<Frame> {
        let rows = match self.rows()?.into_iter().next() {
            Some(values) => self
                .columns()
                .into_iter()
                .zip(values)
                .map(|(label, value)| (RowKey::named(label), vec![value]))
                .collect(),
            None => Vec::new(),
        };
        Self::from_rows(vec![column.to_string()], rows)
    }

    /// Sort rows by a column, largest first, missing values last. Ties keep their order.
    pub fn sort_desc_by(&self, column: &str) -> Result<Frame> {
        self.sorted(
            column,
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
    }

    /// Group rows by state FIPS, preserving relative order within each state.
    pub fn group_by_state(&self) -> Result<Frame> {
        self.sorted(
            STATE_COLUMN,
            SortMultipleOptions::default().with_maintain_order(true),
        )
    }

    /// Sort rows by place name.
    pub fn sort_by_name(&self) -> Result<Frame> {
        self.sorted(
            NAME_COLUMN,
            SortMultipleOptions::default().with_maintain_order(true),
        )
    }

    fn sorted(&self, column: &str, options: SortMultipleOptions) -> Result<Frame> {
        let data = self.data.clone().lazy().sort([column], options).collect()?;
        Ok(Self { data })
    }

    fn filter(&self, predicate: Expr) -> Result<Frame> {
        let data = self.data.clone().lazy().filter(predicate).collect()?;
        Ok(Self { data })
    }

    fn select(&self, exprs: Vec<Expr>) -> Result<Frame> {
        let data = self.data.clone().lazy().select(exprs).collect()?;
        Ok(Self { data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(columns: &[&str], rows: &[(&str, Vec<Option<f64>>)]) -> Frame {
        Frame::from_rows(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|(name, values)| (RowKey::named(*name), values.clone()))
                .collect(),
        )
        .unwrap()
    }

    fn names(frame: &Frame) -> Vec<String> {
        frame.keys().unwrap().into_iter().map(|k| k.name).collect()
    }

    #[test]
    fn test_percentages_divides_by_first_column() {
        let f = frame(
            &["total speakers", "spanish speakers", "korean speakers"],
            &[
                ("A", vec![Some(200.0), Some(50.0), Some(2.0)]),
                ("B", vec![Some(0.0), Some(1.0), None]),
                ("C", vec![None, Some(1.0), Some(1.0)]),
            ],
        );
        let p = f.percentages().unwrap();
        assert_eq!(p.columns(), vec!["spanish speakers", "korean speakers"]);

        let rows = p.rows().unwrap();
        assert_eq!(rows[0], vec![Some(0.25), Some(0.01)]);
        assert_eq!(rows[1], vec![None, None]);
        assert_eq!(rows[2], vec![None, None]);
        assert_eq!(names(&p), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sum_columns_treats_missing_as_zero() {
        let f = frame(
            &["total poverty", "under 0.5", "0.5 to 0.74"],
            &[
                ("A", vec![Some(100.0), Some(10.0), None]),
                ("B", vec![Some(100.0), None, None]),
            ],
        );
        let s = f.sum_columns(&["under 0.5", "0.5 to 0.74"], "under 185%").unwrap();
        assert_eq!(s.columns(), vec!["total poverty", "under 185%"]);

        let rows = s.rows().unwrap();
        assert_eq!(rows[0], vec![Some(100.0), Some(10.0)]);
        assert_eq!(rows[1], vec![Some(100.0), Some(0.0)]);

        // An area with no bracket counts shows 0%, not a missing share.
        let shares = s.percentages().unwrap().rows().unwrap();
        assert_eq!(shares[1], vec![Some(0.0)]);
    }

    #[test]
    fn test_join_keeps_left_order_and_fills_missing() {
        let left = frame(&["total population"], &[("B", vec![Some(2.0)]), ("A", vec![Some(1.0)])]);
        let right = frame(&["x", "y"], &[("A", vec![Some(0.1), Some(0.2)])]);
        let joined = left.join(&right).unwrap();

        assert_eq!(joined.columns(), vec!["total population", "x", "y"]);
        assert_eq!(names(&joined), vec!["B", "A"]);

        let rows = joined.rows().unwrap();
        assert_eq!(rows[0], vec![Some(2.0), None, None]);
        assert_eq!(rows[1], vec![Some(1.0), Some(0.1), Some(0.2)]);
    }

    #[test]
    fn test_join_matches_on_state_and_name() {
        let mut rows = vec![
            (RowKey::new(Some("01"), "Washington County"), vec![Some(10.0)]),
            (RowKey::new(Some("05"), "Washington County"), vec![Some(20.0)]),
        ];
        let left = Frame::from_rows(vec!["total".to_string()], rows.clone()).unwrap();
        rows.reverse();
        rows[0].1 = vec![Some(0.5)];
        rows[1].1 = vec![Some(0.25)];
        let right = Frame::from_rows(vec!["share".to_string()], rows).unwrap();

        let joined = left.join(&right).unwrap().rows().unwrap();
        assert_eq!(joined[0], vec![Some(10.0), Some(0.25)]);
        assert_eq!(joined[1], vec![Some(20.0), Some(0.5)]);
    }

    #[test]
    fn test_transpose_first_row() {
        let f = frame(&["a", "b"], &[("Ohio", vec![Some(0.5), None])]);
        let t = f.transpose_first_row("percentage of speakers").unwrap();
        assert_eq!(t.columns(), vec!["percentage of speakers"]);
        assert_eq!(names(&t), vec!["a", "b"]);
        assert_eq!(t.rows().unwrap()[1], vec![None]);

        let empty = frame(&["a"], &[]).transpose_first_row("x").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_sort_then_group_by_state() {
        let f = Frame::from_rows(
            vec!["total".to_string()],
            vec![
                (RowKey::new(Some("02"), "Small AK"), vec![Some(5.0)]),
                (RowKey::new(Some("01"), "Small AL"), vec![Some(10.0)]),
                (RowKey::new(Some("01"), "Alabama"), vec![Some(100.0)]),
                (RowKey::new(Some("02"), "Alaska"), vec![Some(50.0)]),
                (RowKey::new(Some("01"), "Unknown AL"), vec![None]),
            ],
        )
        .unwrap();

        let grouped = f.sort_desc_by("total").unwrap().group_by_state().unwrap();
        assert_eq!(
            names(&grouped),
            vec!["Alabama", "Small AL", "Unknown AL", "Alaska", "Small AK"]
        );
    }

    #[test]
    fn test_for_state_and_for_name() {
        let f = Frame::from_rows(
            vec!["total".to_string()],
            vec![
                (RowKey::new(Some("01"), "Alabama"), vec![Some(1.0)]),
                (RowKey::new(Some("02"), "Alaska"), vec![Some(2.0)]),
            ],
        )
        .unwrap();

        assert_eq!(names(&f.for_state("02").unwrap()), vec!["Alaska"]);
        assert!(f.for_state("99").unwrap().is_empty());
        assert_eq!(f.for_name("Alabama").unwrap().len(), 1);
        assert_eq!(f.value(1, "total"), Some(2.0));
        assert_eq!(f.value(1, "missing"), None);
    }

    #[test]
    fn test_keys_without_state() {
        let f = frame(&["total"], &[("Acoma Pueblo, NM", vec![Some(1.0)])]);
        assert_eq!(f.keys().unwrap(), vec![RowKey::named("Acoma Pueblo, NM")]);
    }

    fn alabama_raw() -> RawTable {
        RawTable {
            header: vec![
                "NAME".to_string(),
                "B01003_001E".to_string(),
                "state".to_string(),
            ],
            rows: vec![
                vec![
                    Some("Alabama".to_string()),
                    Some("4876250".to_string()),
                    Some("01".to_string()),
                ],
                vec![
                    Some("Alaska".to_string()),
                    Some("-666666666".to_string()),
                    Some("02".to_string()),
                ],
            ],
        }
    }

    #[test]
    fn test_from_raw() {
        let raw = alabama_raw();
        let f = Frame::from_raw(&raw, Geography::State, VariableGroup::TotalPopulation).unwrap();
        assert_eq!(f.columns(), vec!["total population"]);
        assert_eq!(f.keys().unwrap()[0], RowKey::new(Some("01"), "Alabama"));
        assert_eq!(f.rows().unwrap(), vec![vec![Some(4876250.0)], vec![None]]);

        assert!(Frame::from_raw(&raw, Geography::State, VariableGroup::Language).is_err());
    }

    #[test]
    fn test_from_raw_without_header_is_empty() {
        let f = Frame::from_raw(
            &RawTable::default(),
            Geography::TribalArea,
            VariableGroup::Language,
        )
        .unwrap();
        assert!(f.is_empty());
        assert_eq!(f.columns().len(), VariableGroup::Language.codes().len());
        assert_eq!(f.columns()[0], "total speakers");
    }

    #[test]
    fn test_from_raw_rejects_ragged_rows() {
        let mut raw = alabama_raw();
        raw.rows[1].pop();
        let err = Frame::from_raw(&raw, Geography::State, VariableGroup::TotalPopulation)
            .unwrap_err();
        assert!(matches!(err, CensusError::MalformedResponse(_)));
    }
}
