use crate::cost::CostOverrides;
use crate::error::{GraphError, Result};
use crate::junction::JunctionTable;
use crate::schema::{closest_name, Table};
use crate::types::{EdgeKind, SchemaGraph};
use petgraph::graph::NodeIndex;

/// Build the relationship graph from schema metadata
pub struct GraphBuilder {
    costs: CostOverrides,
}

impl GraphBuilder {
    /// Fails with [`GraphError::NegativeCost`] if an override is negative or NaN.
    pub fn new(costs: CostOverrides) -> Result<Self> {
        costs.validate()?;
        Ok(Self { costs })
    }

    #[must_use]
    pub fn costs(&self) -> &CostOverrides {
        &self.costs
    }

    /// Build graph from tables and the junction tables detected among them
    pub fn build(&self, tables: &[Table], junctions: &[JunctionTable]) -> Result<SchemaGraph> {
        let mut graph = SchemaGraph::new();

        // Phase 1: one vertex per table, connected or not
        for table in tables {
            graph.add_table(table.name.as_str());
        }

        // Phase 2: one edge per distinct foreign key
        for table in tables {
            let from = lookup(&graph, tables, &table.name)?;
            for fk in table.unique_foreign_keys() {
                let to = lookup(&graph, tables, &fk.foreign_table)?;
                let weight = self.costs.foreign_key_weight(table, fk);
                graph.add_edge(from, to, weight, EdgeKind::ForeignKey(fk.clone()));
            }
        }

        // Phase 3: junction tables become a direct link between the tables they associate
        for junction in junctions {
            let a = lookup(&graph, tables, &junction.first.foreign_table)?;
            let b = lookup(&graph, tables, &junction.second.foreign_table)?;
            let weight = self.costs.junction_weight(junction);
            graph.add_edge(a, b, weight, EdgeKind::Junction(junction.clone()));
        }

        log::info!(
            "Built schema graph: {} tables, {} relationships ({} junctions)",
            graph.node_count(),
            graph.edge_count(),
            junctions.len()
        );

        Ok(graph)
    }
}

fn lookup(graph: &SchemaGraph, tables: &[Table], name: &str) -> Result<NodeIndex> {
    graph.find_table(name).ok_or_else(|| GraphError::TableNotFound {
        name: name.to_string(),
        suggestion: closest_name(tables.iter().map(|t| t.name.as_str()), name)
            .map(str::to_string),
    })
}
