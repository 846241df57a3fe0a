//! Data ingestion stage
//!
//! Pulls the raw collection from the record store into the run's feature
//! store, cleans it (drop missing rows, drop exact duplicates, shuffle, drop
//! schema-declared raw columns), and writes the seeded train/test split.

use tracing::info;

use crate::artifact::DataIngestionArtifact;
use crate::config::DataIngestionConfig;
use crate::error::{Error, Result};
use crate::frame::DataFrame;
use crate::schema::DataSchema;
use crate::store::RecordStore;

pub struct DataIngestion<'a, S: RecordStore> {
    config: DataIngestionConfig,
    store: &'a S,
    schema: DataSchema,
}

impl<'a, S: RecordStore> DataIngestion<'a, S> {
    /// Reads the schema config up front; a missing or malformed schema fails
    /// construction, not the middle of a run
    pub fn new(config: DataIngestionConfig, store: &'a S) -> Result<Self> {
        let schema = DataSchema::from_yaml_file(&config.schema_file)?;
        Ok(Self {
            config,
            store,
            schema,
        })
    }

    /// Export the raw collection and persist it in the run's feature store
    fn export_to_feature_store(&self) -> Result<DataFrame> {
        let frame = self.store.fetch_all(&self.config.collection)?;
        info!(
            collection = %self.config.collection,
            rows = frame.n_rows(),
            "exported collection into feature store"
        );
        frame.to_csv_path(&self.config.feature_store_file)?;
        Ok(frame)
    }

    fn clean(&self, frame: &DataFrame) -> DataFrame {
        frame
            .drop_nulls()
            .dedup_rows()
            .shuffled(self.config.split_seed)
            .without_columns(self.schema.drop_columns())
    }

    pub fn run(self) -> Result<DataIngestionArtifact> {
        info!("starting data ingestion");
        let raw = self.export_to_feature_store()?;
        let cleaned = self.clean(&raw);
        if cleaned.is_empty() {
            return Err(Error::BadInput(
                "no rows left after cleaning the ingested collection".into(),
            ));
        }

        let (train, test) = cleaned.split(self.config.split_ratio, self.config.split_seed)?;
        info!(
            train_rows = train.n_rows(),
            test_rows = test.n_rows(),
            ratio = self.config.split_ratio,
            "split cleaned data into train and test sets"
        );
        train.to_csv_path(&self.config.training_file)?;
        test.to_csv_path(&self.config.testing_file)?;

        Ok(DataIngestionArtifact {
            training_file: self.config.training_file,
            testing_file: self.config.testing_file,
        })
    }
}
