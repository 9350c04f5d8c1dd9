use schemalink_graph::GraphError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Several routes tie on cost; `paths` holds one rendering per route.
    #[error("{message}")]
    AmbiguousPath {
        from: String,
        to: String,
        paths: Vec<String>,
        message: String,
    },

    #[error("You must provide a schema cache key when caching is enabled")]
    MissingCacheKey,

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

impl AnalyzerError {
    /// True for [`GraphError::TableNotFound`].
    #[must_use]
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, Self::Graph(GraphError::TableNotFound { .. }))
    }
}
