//! Column-oriented tabular frame for sensor readings
//!
//! A small frame type covering exactly what the pipeline needs: CSV read and
//! write with a missing-value token, the ingestion cleaning operations, a
//! seeded train/test split, and conversion to an `ndarray` feature matrix.
//! Numeric missing values are carried as NaN; categorical missing values as
//! the literal `na` token or an empty string.

use std::collections::HashSet;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::constants::MISSING_TOKEN;
use crate::error::{Error, Result};

/// A single named column of values
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    fn is_missing(&self, row: usize) -> bool {
        match self {
            Column::Numeric(v) => v[row].is_nan(),
            Column::Categorical(v) => v[row].is_empty() || v[row] == MISSING_TOKEN,
        }
    }

    fn take_rows(&self, rows: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(rows.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(rows.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

/// Hashable row cell used for exact-duplicate detection
#[derive(PartialEq, Eq, Hash)]
enum CellKey {
    Numeric(u64),
    Categorical(String),
}

/// Ordered named columns of equal length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl DataFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column; all columns must have the same length
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(Error::BadInput(format!(
                "column length {} does not match frame length {}",
                column.len(),
                self.n_rows()
            )));
        }
        self.names.push(name.into());
        self.columns.push(column);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Values of a numeric column, if present and numeric
    pub fn numeric_column(&self, name: &str) -> Option<&[f64]> {
        match self.column(name) {
            Some(Column::Numeric(v)) => Some(v),
            _ => None,
        }
    }

    /// Values of a categorical column, if present and categorical
    pub fn categorical_column(&self, name: &str) -> Option<&[String]> {
        match self.column(name) {
            Some(Column::Categorical(v)) => Some(v),
            _ => None,
        }
    }

    /// Read a frame from CSV. Every column whose non-missing cells all parse
    /// as numbers becomes numeric; anything else stays categorical.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;

        let names: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        for record in reader.records() {
            let record = record?;
            if record.len() != names.len() {
                return Err(Error::BadInput(format!(
                    "csv row has {} fields, expected {}",
                    record.len(),
                    names.len()
                )));
            }
            for (i, field) in record.iter().enumerate() {
                cells[i].push(field.to_string());
            }
        }

        let mut frame = DataFrame::new();
        for (name, raw) in names.into_iter().zip(cells) {
            frame.push_column(name, build_column(raw))?;
        }
        Ok(frame)
    }

    /// Write the frame as CSV, creating parent directories. Missing numeric
    /// values are written as the `na` token.
    pub fn to_csv_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = WriterBuilder::new().from_path(path)?;
        writer.write_record(&self.names)?;
        for row in 0..self.n_rows() {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|c| match c {
                    Column::Numeric(v) if v[row].is_nan() => MISSING_TOKEN.to_string(),
                    Column::Numeric(v) => format!("{}", v[row]),
                    Column::Categorical(v) => v[row].clone(),
                })
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// New frame keeping only the given row indices, in order
    pub fn take_rows(&self, rows: &[usize]) -> DataFrame {
        DataFrame {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take_rows(rows)).collect(),
        }
    }

    /// Drop every row containing a missing value
    pub fn drop_nulls(&self) -> DataFrame {
        let keep: Vec<usize> = (0..self.n_rows())
            .filter(|&row| !self.columns.iter().any(|c| c.is_missing(row)))
            .collect();
        self.take_rows(&keep)
    }

    /// Drop exact duplicate rows, keeping the first occurrence
    pub fn dedup_rows(&self) -> DataFrame {
        let mut seen: HashSet<Vec<CellKey>> = HashSet::new();
        let keep: Vec<usize> = (0..self.n_rows())
            .filter(|&row| {
                let key: Vec<CellKey> = self
                    .columns
                    .iter()
                    .map(|c| match c {
                        Column::Numeric(v) => CellKey::Numeric(v[row].to_bits()),
                        Column::Categorical(v) => CellKey::Categorical(v[row].clone()),
                    })
                    .collect();
                seen.insert(key)
            })
            .collect();
        self.take_rows(&keep)
    }

    /// Deterministically shuffle rows with the given seed
    pub fn shuffled(&self, seed: u64) -> DataFrame {
        let mut indices: Vec<usize> = (0..self.n_rows()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
        self.take_rows(&indices)
    }

    /// New frame without the named columns; absent names are ignored
    pub fn without_columns(&self, names: &[String]) -> DataFrame {
        let mut frame = DataFrame::new();
        for (name, column) in self.names.iter().zip(&self.columns) {
            if !names.contains(name) {
                frame.names.push(name.clone());
                frame.columns.push(column.clone());
            }
        }
        frame
    }

    /// Seeded split into (train, test) with `test_ratio` of rows in the test set
    pub fn split(&self, test_ratio: f64, seed: u64) -> Result<(DataFrame, DataFrame)> {
        if !(0.0..1.0).contains(&test_ratio) {
            return Err(Error::Config(format!(
                "test ratio {test_ratio} must be in [0, 1)"
            )));
        }
        let n = self.n_rows();
        let test_len = ((n as f64) * test_ratio).ceil() as usize;
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
        let test = self.take_rows(&indices[..test_len]);
        let train = self.take_rows(&indices[test_len..]);
        Ok((train, test))
    }

    /// Stack another frame with identical column layout below this one
    pub fn concat(&self, other: &DataFrame) -> Result<DataFrame> {
        if self.names != other.names {
            return Err(Error::BadInput(
                "cannot concat frames with different columns".into(),
            ));
        }
        let mut result = self.clone();
        for (mine, theirs) in result.columns.iter_mut().zip(&other.columns) {
            match (mine, theirs) {
                (Column::Numeric(a), Column::Numeric(b)) => a.extend_from_slice(b),
                (Column::Categorical(a), Column::Categorical(b)) => a.extend_from_slice(b),
                _ => {
                    return Err(Error::BadInput(
                        "cannot concat frames with mismatched column types".into(),
                    ))
                }
            }
        }
        Ok(result)
    }

    /// Row-major matrix of the named numeric columns, in the given order
    pub fn feature_matrix(&self, feature_columns: &[&str]) -> Result<Array2<f64>> {
        let mut columns = Vec::with_capacity(feature_columns.len());
        for name in feature_columns {
            let values = self.numeric_column(name).ok_or_else(|| {
                Error::BadInput(format!("missing or non-numeric feature column `{name}`"))
            })?;
            columns.push(values);
        }
        let n_rows = self.n_rows();
        let mut data = Vec::with_capacity(n_rows * columns.len());
        for row in 0..n_rows {
            for col in &columns {
                data.push(col[row]);
            }
        }
        Array2::from_shape_vec((n_rows, feature_columns.len()), data)
            .map_err(|e| Error::Model(format!("feature matrix shape: {e}")))
    }
}

fn build_column(raw: Vec<String>) -> Column {
    let mut numeric = Vec::with_capacity(raw.len());
    let mut all_numeric = true;
    for cell in &raw {
        if cell.is_empty() || cell == MISSING_TOKEN {
            numeric.push(f64::NAN);
        } else if let Ok(v) = cell.parse::<f64>() {
            numeric.push(v);
        } else {
            all_numeric = false;
            break;
        }
    }
    if all_numeric {
        Column::Numeric(numeric)
    } else {
        Column::Categorical(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_frame() -> DataFrame {
        let mut frame = DataFrame::new();
        frame
            .push_column(
                "class",
                Column::Categorical(vec!["neg".into(), "pos".into(), "neg".into(), "neg".into()]),
            )
            .unwrap();
        frame
            .push_column("sensor_01", Column::Numeric(vec![1.0, 2.5, 1.0, f64::NAN]))
            .unwrap();
        frame
            .push_column("sensor_02", Column::Numeric(vec![0.5, 0.1, 0.5, 0.2]))
            .unwrap();
        frame
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sample.csv");

        let frame = sample_frame();
        frame.to_csv_path(&path).unwrap();
        let back = DataFrame::from_csv_path(&path).unwrap();

        assert_eq!(back.column_names(), vec!["class", "sensor_01", "sensor_02"]);
        assert_eq!(back.n_rows(), 4);
        // NaN survives as the `na` token
        assert!(back.numeric_column("sensor_01").unwrap()[3].is_nan());
        assert_eq!(back.categorical_column("class").unwrap()[1], "pos");
    }

    #[test]
    fn test_drop_nulls() {
        let cleaned = sample_frame().drop_nulls();
        assert_eq!(cleaned.n_rows(), 3);
        assert!(cleaned
            .numeric_column("sensor_01")
            .unwrap()
            .iter()
            .all(|v| !v.is_nan()));
    }

    #[test]
    fn test_dedup_rows_keeps_first() {
        // rows 0 and 2 are identical
        let deduped = sample_frame().dedup_rows();
        assert_eq!(deduped.n_rows(), 3);
        assert_eq!(deduped.numeric_column("sensor_01").unwrap()[0], 1.0);
    }

    #[test]
    fn test_without_columns_ignores_absent() {
        let frame = sample_frame().without_columns(&["sensor_02".into(), "ghost".into()]);
        assert_eq!(frame.column_names(), vec!["class", "sensor_01"]);
    }

    #[test]
    fn test_split_sizes_and_determinism() {
        let frame = sample_frame();
        let (train_a, test_a) = frame.split(0.25, 7).unwrap();
        let (train_b, test_b) = frame.split(0.25, 7).unwrap();
        assert_eq!(test_a.n_rows(), 1);
        assert_eq!(train_a.n_rows(), 3);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
    }

    #[test]
    fn test_split_rejects_bad_ratio() {
        assert!(sample_frame().split(1.0, 0).is_err());
    }

    #[test]
    fn test_concat_matching_layout() {
        let frame = sample_frame();
        let stacked = frame.concat(&frame).unwrap();
        assert_eq!(stacked.n_rows(), 8);
        assert_eq!(stacked.n_columns(), 3);
    }

    #[test]
    fn test_concat_rejects_mismatch() {
        let frame = sample_frame();
        let other = frame.without_columns(&["sensor_02".into()]);
        assert!(frame.concat(&other).is_err());
    }

    #[test]
    fn test_feature_matrix_order_and_shape() {
        let frame = sample_frame().drop_nulls();
        let matrix = frame.feature_matrix(&["sensor_02", "sensor_01"]).unwrap();
        assert_eq!(matrix.dim(), (3, 2));
        assert_eq!(matrix[[0, 0]], 0.5);
        assert_eq!(matrix[[0, 1]], 1.0);
    }

    #[test]
    fn test_feature_matrix_rejects_categorical() {
        let frame = sample_frame();
        assert!(frame.feature_matrix(&["class"]).is_err());
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let frame = sample_frame();
        let shuffled = frame.shuffled(3);
        assert_eq!(shuffled.n_rows(), frame.n_rows());
        let mut a: Vec<u64> = frame
            .numeric_column("sensor_02")
            .unwrap()
            .iter()
            .map(|v| v.to_bits())
            .collect();
        let mut b: Vec<u64> = shuffled
            .numeric_column("sensor_02")
            .unwrap()
            .iter()
            .map(|v| v.to_bits())
            .collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }
}
