//! # Schemalink Analyzer
//!
//! High-level entry point over [`schemalink_graph`]: loads a schema snapshot
//! from a [`SchemaProvider`], classifies junction tables and answers
//! shortest-join queries, memoizing every answer in a shared [`MemoCache`].
//!
//! ```
//! use schemalink_analyzer::{SchemaAnalyzer, StaticSchemaProvider};
//! use schemalink_graph::{Schema, Table};
//!
//! let schema = Schema::new(vec![
//!     Table::new("role").with_column("id"),
//!     Table::new("right").with_column("id"),
//!     Table::new("role_right")
//!         .with_column("role_id")
//!         .with_column("right_id")
//!         .with_primary_key(["role_id", "right_id"])
//!         .with_foreign_key(["role_id"], "role", ["id"])
//!         .with_foreign_key(["right_id"], "right", ["id"]),
//! ]);
//!
//! let analyzer = SchemaAnalyzer::new(StaticSchemaProvider::new(schema));
//! let fks = analyzer.shortest_path("role", "right")?;
//! assert_eq!(fks.len(), 2);
//! assert_eq!(fks[0].local_table, "role_right");
//! # Ok::<(), schemalink_analyzer::AnalyzerError>(())
//! ```

mod analyzer;
mod cache;
mod config;
mod error;
mod provider;

pub use analyzer::SchemaAnalyzer;
pub use cache::{CacheConfig, MemoCache};
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use provider::{read_document, FileSchemaProvider, SchemaProvider, StaticSchemaProvider};
