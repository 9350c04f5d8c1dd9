use crate::error::{AnalyzerError, Result};
use schemalink_graph::Schema;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Source of schema snapshots.
pub trait SchemaProvider {
    fn load_schema(&self) -> Result<Schema>;
}

impl<T: SchemaProvider + ?Sized> SchemaProvider for Box<T> {
    fn load_schema(&self) -> Result<Schema> {
        (**self).load_schema()
    }
}

/// Serves a snapshot already held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaProvider {
    schema: Schema,
}

impl StaticSchemaProvider {
    #[must_use]
    pub const fn new(schema: Schema) -> Self {
        Self { schema }
    }
}

impl SchemaProvider for StaticSchemaProvider {
    fn load_schema(&self) -> Result<Schema> {
        Ok(self.schema.clone())
    }
}

/// Reads a snapshot from a `.json` or `.toml` file on every load.
#[derive(Debug, Clone)]
pub struct FileSchemaProvider {
    path: PathBuf,
}

impl FileSchemaProvider {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SchemaProvider for FileSchemaProvider {
    fn load_schema(&self) -> Result<Schema> {
        let schema: Schema = read_document(&self.path)?;
        log::info!(
            "Loaded schema from {}: {} tables",
            self.path.display(),
            schema.tables().len()
        );
        Ok(schema)
    }
}

/// Deserialize a JSON or TOML document, picking the format from the extension.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(serde_json::from_str(&raw)?),
        Some("toml") => Ok(toml::from_str(&raw)?),
        other => Err(AnalyzerError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}
