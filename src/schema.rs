//! Dataset schema configuration
//!
//! The schema file declares the expected shape of the sensor readings: an
//! ordered column list with declared types, the numerical columns that must
//! be present, the raw columns dropped during ingestion cleaning, and the
//! target column. It is read once per stage that needs it.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Declared type of a schema column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[serde(alias = "int64")]
    Int,
    #[serde(alias = "float64")]
    Float,
    #[serde(alias = "object")]
    Category,
}

/// One entry of the ordered column list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: String,
    pub dtype: ColumnType,
}

/// Accept either the explicit `{name, dtype}` form or the single-key mapping
/// form (`- sensor_01: float`) still found in older schema files.
impl<'de> Deserialize<'de> for ColumnSpec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum SpecOrPair {
            Spec { name: String, dtype: ColumnType },
            Pair(HashMap<String, ColumnType>),
        }

        match SpecOrPair::deserialize(deserializer)? {
            SpecOrPair::Spec { name, dtype } => Ok(ColumnSpec { name, dtype }),
            SpecOrPair::Pair(map) => {
                let mut entries = map.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((name, dtype)), None) => Ok(ColumnSpec { name, dtype }),
                    _ => Err(serde::de::Error::custom(
                        "expected a single `column: dtype` pair",
                    )),
                }
            }
        }
    }
}

fn default_target_column() -> String {
    "class".to_string()
}

/// Parsed schema config with a typed accessor API
///
/// `columns` lists the columns expected after ingestion cleaning, in order.
/// `drop_columns` names raw source columns removed during cleaning and must
/// not appear in `columns`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSchema {
    columns: Vec<ColumnSpec>,
    #[serde(default)]
    numerical_columns: Vec<String>,
    #[serde(default)]
    drop_columns: Vec<String>,
    #[serde(default = "default_target_column")]
    target_column: String,
}

impl DataSchema {
    /// Read and validate a schema from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read schema file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Parse and validate a schema from YAML text
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let schema: DataSchema = serde_yaml::from_str(raw)
            .map_err(|e| Error::Config(format!("malformed schema: {e}")))?;
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::Config("schema declares no columns".into()));
        }
        if !self.columns.iter().any(|c| c.name == self.target_column) {
            return Err(Error::Config(format!(
                "target column `{}` is not declared in the schema",
                self.target_column
            )));
        }
        for dropped in &self.drop_columns {
            if self.columns.iter().any(|c| &c.name == dropped) {
                return Err(Error::Config(format!(
                    "drop column `{dropped}` must not appear in the declared column list"
                )));
            }
        }
        Ok(())
    }

    /// Ordered declared columns
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Ordered declared column names
    pub fn required_columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of declared columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns that must be present with numeric values
    pub fn numerical_columns(&self) -> &[String] {
        &self.numerical_columns
    }

    /// Raw source columns removed during ingestion cleaning
    pub fn drop_columns(&self) -> &[String] {
        &self.drop_columns
    }

    /// Name of the label column
    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    /// Model input columns: declared non-category columns, target excluded
    pub fn feature_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.dtype != ColumnType::Category && c.name != self.target_column)
            .map(|c| c.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA_YAML: &str = "\
columns:
  - name: class
    dtype: category
  - name: sensor_01
    dtype: float
  - name: sensor_02
    dtype: float
  - name: cycle_count
    dtype: int
numerical_columns:
  - sensor_01
  - sensor_02
  - cycle_count
drop_columns:
  - batch_id
target_column: class
";

    #[test]
    fn test_parse_explicit_form() {
        let schema = DataSchema::from_yaml_str(SCHEMA_YAML).unwrap();
        assert_eq!(schema.column_count(), 4);
        assert_eq!(schema.target_column(), "class");
        assert_eq!(schema.drop_columns(), ["batch_id".to_string()]);
        assert_eq!(
            schema.required_columns(),
            vec!["class", "sensor_01", "sensor_02", "cycle_count"]
        );
    }

    #[test]
    fn test_parse_legacy_pair_form() {
        let yaml = "\
columns:
  - class: category
  - sensor_01: float64
  - cycle_count: int64
numerical_columns:
  - sensor_01
  - cycle_count
";
        let schema = DataSchema::from_yaml_str(yaml).unwrap();
        assert_eq!(schema.column_count(), 3);
        assert_eq!(schema.columns()[1].dtype, ColumnType::Float);
        assert_eq!(schema.columns()[2].dtype, ColumnType::Int);
        // target_column defaults to `class`
        assert_eq!(schema.target_column(), "class");
    }

    #[test]
    fn test_feature_columns_exclude_target_and_category() {
        let schema = DataSchema::from_yaml_str(SCHEMA_YAML).unwrap();
        assert_eq!(
            schema.feature_columns(),
            vec!["sensor_01", "sensor_02", "cycle_count"]
        );
    }

    #[test]
    fn test_missing_target_column_rejected() {
        let yaml = "\
columns:
  - sensor_01: float
target_column: class
";
        let err = DataSchema::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("target column"));
    }

    #[test]
    fn test_drop_column_overlap_rejected() {
        let yaml = "\
columns:
  - class: category
  - sensor_01: float
drop_columns:
  - sensor_01
";
        let err = DataSchema::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("drop column"));
    }

    #[test]
    fn test_empty_schema_rejected() {
        let err = DataSchema::from_yaml_str("columns: []").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
