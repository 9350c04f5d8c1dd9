//! # Schemalink Graph
//!
//! Relationship inference over relational schema metadata: which chain of
//! joins connects two tables, and whether that chain is unique.
//!
//! ## Architecture
//!
//! ```text
//! Schema (tables, columns, foreign keys)
//!     │
//!     ├──> Junction classifier
//!     │      └─ pure many-to-many tables
//!     │
//!     ├──> Graph Builder (+ cost overrides)
//!     │      ├─ Nodes: tables
//!     │      └─ Edges: foreign keys, junction links (weighted)
//!     │
//!     ├──> Multi-path Dijkstra
//!     │      └─ predecessor map keeping every tied edge
//!     │
//!     └──> Path reconstruction
//!            ├─ unique route → foreign key chain
//!            └─ tied routes → ambiguity report
//! ```
//!
//! ## Example
//!
//! ```
//! use schemalink_graph::{
//!     find_shortest_paths, foreign_key_chain, reconstruct, CostOverrides, GraphBuilder, Schema,
//!     Table,
//! };
//!
//! let schema = Schema::new(vec![
//!     Table::new("role").with_column("id"),
//!     Table::new("user")
//!         .with_column("id")
//!         .with_column("role_id")
//!         .with_foreign_key(["role_id"], "role", ["id"]),
//! ]);
//!
//! let graph = GraphBuilder::new(CostOverrides::new())?.build(schema.tables(), &[])?;
//! let user = graph.find_table("user").unwrap();
//! let role = graph.find_table("role").unwrap();
//!
//! let predecessors = find_shortest_paths(&graph, user, role)?;
//! let path = reconstruct(&graph, &predecessors)?;
//! let fks = foreign_key_chain(&graph, user, &path);
//! assert_eq!(fks[0].foreign_table, "role");
//! # Ok::<(), schemalink_graph::GraphError>(())
//! ```

mod builder;
mod cost;
mod dijkstra;
mod error;
mod junction;
mod path;
mod report;
mod schema;
mod types;

pub use builder::GraphBuilder;
pub use cost::{
    CostOverrides, WEIGHT_FK, WEIGHT_IGNORE, WEIGHT_IMPORTANT, WEIGHT_INHERITANCE_FK,
    WEIGHT_IRRELEVANT, WEIGHT_JUNCTION,
};
pub use dijkstra::{find_shortest_paths, PredecessorMap};
pub use error::{GraphError, Result};
pub use junction::{detect_junction_tables, is_junction_table, JunctionTable};
pub use path::{enumerate_all, foreign_key_chain, path_cost, reconstruct};
pub use report::{ambiguity_message, describe_path};
pub use schema::{dedup_foreign_keys, Column, ForeignKey, Schema, Table};
pub use types::{EdgeKind, RelationEdge, SchemaGraph, TableNode};

pub use petgraph::graph::{EdgeIndex, NodeIndex};
