use crate::dijkstra::PredecessorMap;
use crate::error::{GraphError, Result};
use crate::schema::ForeignKey;
use crate::types::{EdgeKind, SchemaGraph};
use petgraph::graph::{EdgeIndex, NodeIndex};
use std::collections::HashSet;

/// Walk the predecessor map back from the destination and return the unique
/// cheapest route in source → destination order.
///
/// Fails with [`GraphError::AmbiguousPath`] when two cheapest routes exist,
/// naming the vertex nearest the destination where they part; use
/// [`enumerate_all`] to list the tied routes.
pub fn reconstruct(graph: &SchemaGraph, predecessors: &PredecessorMap) -> Result<Vec<EdgeIndex>> {
    let mut routes = collect_routes(graph, predecessors, 2);
    match routes.len() {
        0 => Err(no_path(graph, predecessors)),
        1 => Ok(routes.pop().unwrap_or_default()),
        _ => Err(GraphError::AmbiguousPath {
            from: graph.table_name(predecessors.source()).to_string(),
            to: graph.table_name(predecessors.destination()).to_string(),
            at: graph
                .table_name(divergence(graph, predecessors.destination(), &routes[0], &routes[1]))
                .to_string(),
        }),
    }
}

/// Every cheapest route from source to destination, each in source →
/// destination order. Exponential in the number of tied vertices; meant for
/// diagnostics after [`reconstruct`] reported an ambiguity.
#[must_use]
pub fn enumerate_all(graph: &SchemaGraph, predecessors: &PredecessorMap) -> Vec<Vec<EdgeIndex>> {
    collect_routes(graph, predecessors, usize::MAX)
}

/// Depth-first walk over predecessor edges from the destination. A vertex is
/// never entered twice on one route, since zero-weight edges can make the
/// predecessor edges cyclic.
struct RouteWalk<'a> {
    graph: &'a SchemaGraph,
    predecessors: &'a PredecessorMap,
    limit: usize,
    on_route: HashSet<NodeIndex>,
    suffix: Vec<EdgeIndex>,
    routes: Vec<Vec<EdgeIndex>>,
}

impl RouteWalk<'_> {
    fn visit(&mut self, vertex: NodeIndex) {
        if self.routes.len() >= self.limit {
            return;
        }
        if vertex == self.predecessors.source() {
            let mut route = self.suffix.clone();
            route.reverse();
            self.routes.push(route);
            return;
        }

        self.on_route.insert(vertex);
        for &edge in self.predecessors.predecessors(vertex) {
            let Some(previous) = self.graph.opposite(edge, vertex) else {
                continue;
            };
            if self.on_route.contains(&previous) {
                continue;
            }
            self.suffix.push(edge);
            self.visit(previous);
            self.suffix.pop();
        }
        self.on_route.remove(&vertex);
    }
}

fn collect_routes(
    graph: &SchemaGraph,
    predecessors: &PredecessorMap,
    limit: usize,
) -> Vec<Vec<EdgeIndex>> {
    let mut walk = RouteWalk {
        graph,
        predecessors,
        limit,
        on_route: HashSet::new(),
        suffix: Vec::new(),
        routes: Vec::new(),
    };
    walk.visit(predecessors.destination());
    walk.routes
}

/// Last vertex two routes share when both are read from `destination` back.
fn divergence(
    graph: &SchemaGraph,
    destination: NodeIndex,
    first: &[EdgeIndex],
    second: &[EdgeIndex],
) -> NodeIndex {
    let mut current = destination;
    for (a, b) in first.iter().rev().zip(second.iter().rev()) {
        if a != b {
            break;
        }
        match graph.opposite(*a, current) {
            Some(previous) => current = previous,
            None => break,
        }
    }
    current
}

/// Sum of the edge weights along `path`.
#[must_use]
pub fn path_cost(graph: &SchemaGraph, path: &[EdgeIndex]) -> f64 {
    path.iter()
        .filter_map(|&idx| graph.edge(idx))
        .map(|edge| edge.weight)
        .sum()
}

/// Translate a route into the foreign keys to join, in traversal order.
///
/// A junction edge contributes both of its keys, the one touching the table
/// the walk is currently on first.
#[must_use]
pub fn foreign_key_chain(
    graph: &SchemaGraph,
    source: NodeIndex,
    path: &[EdgeIndex],
) -> Vec<ForeignKey> {
    let mut foreign_keys = Vec::new();
    let mut current = graph.table_name(source);

    for edge in path.iter().filter_map(|&idx| graph.edge(idx)) {
        match &edge.kind {
            EdgeKind::ForeignKey(fk) => {
                foreign_keys.push(fk.clone());
                current = if fk.foreign_table == current {
                    &fk.local_table
                } else {
                    &fk.foreign_table
                };
            }
            EdgeKind::Junction(junction) => {
                let [first, second] = junction.ordered_from(current);
                foreign_keys.push(first.clone());
                foreign_keys.push(second.clone());
                current = junction.other_side(current);
            }
        }
    }

    foreign_keys
}

fn no_path(graph: &SchemaGraph, predecessors: &PredecessorMap) -> GraphError {
    GraphError::NoPath {
        from: graph.table_name(predecessors.source()).to_string(),
        to: graph.table_name(predecessors.destination()).to_string(),
    }
}
