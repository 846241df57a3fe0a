//! Record store seam
//!
//! The pipeline ingests sensor readings from a document store. The store
//! client itself is an external collaborator, so ingestion only depends on
//! this trait. `CsvStore` reads collections from a directory of CSV files and
//! `InMemoryStore` backs tests and demos.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::frame::DataFrame;

/// Read access to named record collections
pub trait RecordStore {
    /// Fetch every record of a collection as a frame
    fn fetch_all(&self, collection: &str) -> Result<DataFrame>;
}

/// Store backed by a directory containing one `<collection>.csv` per collection
#[derive(Debug, Clone)]
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RecordStore for CsvStore {
    fn fetch_all(&self, collection: &str) -> Result<DataFrame> {
        let path = self.root.join(format!("{collection}.csv"));
        if !path.exists() {
            return Err(Error::Store(format!(
                "collection `{collection}` not found at {}",
                path.display()
            )));
        }
        DataFrame::from_csv_path(&path)
            .map_err(|e| Error::Store(format!("cannot read collection `{collection}`: {e}")))
    }
}

/// In-memory store for tests and demos
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    collections: HashMap<String, DataFrame>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collection: impl Into<String>, frame: DataFrame) {
        self.collections.insert(collection.into(), frame);
    }
}

impl RecordStore for InMemoryStore {
    fn fetch_all(&self, collection: &str) -> Result<DataFrame> {
        self.collections
            .get(collection)
            .cloned()
            .ok_or_else(|| Error::Store(format!("collection `{collection}` not found")))
    }
}
