use crate::junction::JunctionTable;
use crate::schema::ForeignKey;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Vertex payload: the table name is the vertex identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNode {
    pub name: String,
}

/// Where an edge of the relationship graph comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeKind {
    /// A declared foreign key, linking its owner to the referenced table.
    ForeignKey(ForeignKey),
    /// A synthetic link between the two tables a junction table associates.
    Junction(JunctionTable),
}

impl EdgeKind {
    /// Table whose cost modifier applies to this edge.
    #[must_use]
    pub fn owner_table(&self) -> &str {
        match self {
            Self::ForeignKey(fk) => &fk.local_table,
            Self::Junction(junction) => &junction.table,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationEdge {
    pub weight: f64,
    pub kind: EdgeKind,
}

/// Undirected weighted graph of tables and their relationships.
///
/// Read-only once built; any number of searches may share it.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    graph: UnGraph<TableNode, RelationEdge>,
    index: HashMap<String, NodeIndex>,
}

impl SchemaGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex for `name`, returning the existing one if already present.
    pub fn add_table(&mut self, name: impl Into<String>) -> NodeIndex {
        let name = name.into();
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.graph.add_node(TableNode { name: name.clone() });
        self.index.insert(name, idx);
        idx
    }

    /// Add an undirected edge. Weights are not checked here; the finder
    /// rejects a graph holding any negative weight before it searches.
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, weight: f64, kind: EdgeKind) -> EdgeIndex {
        self.graph.add_edge(a, b, RelationEdge { weight, kind })
    }

    #[must_use]
    pub fn find_table(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    /// Name of a vertex. Panics if `idx` does not belong to this graph.
    #[must_use]
    pub fn table_name(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].name
    }

    #[must_use]
    pub fn edge(&self, idx: EdgeIndex) -> Option<&RelationEdge> {
        self.graph.edge_weight(idx)
    }

    #[must_use]
    pub fn endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// The endpoint of `edge` opposite to `from`.
    #[must_use]
    pub fn opposite(&self, edge: EdgeIndex, from: NodeIndex) -> Option<NodeIndex> {
        let (a, b) = self.endpoints(edge)?;
        Some(if a == from { b } else { a })
    }

    /// Edges touching `node`, in the order they were added to the graph.
    #[must_use]
    pub fn incident_edges(&self, node: NodeIndex) -> Vec<(EdgeIndex, NodeIndex, &RelationEdge)> {
        let mut edges: Vec<_> = self
            .graph
            .edges(node)
            .map(|e| {
                let neighbor = if e.source() == node { e.target() } else { e.source() };
                (e.id(), neighbor, e.weight())
            })
            .collect();
        edges.sort_by_key(|(id, _, _)| id.index());
        edges.dedup_by_key(|(id, _, _)| *id);
        edges
    }

    pub fn tables(&self) -> impl Iterator<Item = (NodeIndex, &str)> {
        self.graph
            .node_indices()
            .map(move |idx| (idx, self.graph[idx].name.as_str()))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, &RelationEdge)> {
        self.graph
            .edge_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
