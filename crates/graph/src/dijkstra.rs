//! Dijkstra's shortest path algorithm modified to keep every equally cheap
//! predecessor of a vertex, so ties surface as ambiguities instead of being
//! resolved by traversal order.

use crate::error::{GraphError, Result};
use crate::types::SchemaGraph;
use petgraph::graph::{EdgeIndex, NodeIndex};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Result of one search: for every reached vertex, the cheapest known cost from
/// the source and all edges achieving it.
#[derive(Debug, Clone)]
pub struct PredecessorMap {
    source: NodeIndex,
    destination: NodeIndex,
    costs: HashMap<NodeIndex, f64>,
    predecessors: HashMap<NodeIndex, Vec<EdgeIndex>>,
}

impl PredecessorMap {
    #[must_use]
    pub const fn source(&self) -> NodeIndex {
        self.source
    }

    #[must_use]
    pub const fn destination(&self) -> NodeIndex {
        self.destination
    }

    /// Minimum cost from source to destination.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.costs.get(&self.destination).copied().unwrap_or(f64::INFINITY)
    }

    #[must_use]
    pub fn cost_to(&self, vertex: NodeIndex) -> Option<f64> {
        self.costs.get(&vertex).copied()
    }

    /// Edges arriving at `vertex` on a cheapest route; empty for the source and
    /// for vertices never reached.
    #[must_use]
    pub fn predecessors(&self, vertex: NodeIndex) -> &[EdgeIndex] {
        self.predecessors.get(&vertex).map_or(&[], Vec::as_slice)
    }

    /// True if some reached vertex has more than one cheapest incoming edge.
    /// A zero-weight edge can set this without giving two distinct routes;
    /// [`crate::reconstruct`] is what decides ambiguity.
    #[must_use]
    pub fn has_ties(&self) -> bool {
        self.predecessors.values().any(|edges| edges.len() > 1)
    }
}

#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    cost: f64,
    seq: u64,
    node: NodeIndex,
}

// Ordering is reversed so `BinaryHeap` pops the cheapest entry, oldest first.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Find every cheapest route from `source` to `destination`.
///
/// Every edge is checked before the search starts: an edge with a negative (or
/// NaN) weight anywhere in the graph fails with [`GraphError::NegativeWeight`],
/// even when it lies beyond the destination. Fails with [`GraphError::NoPath`]
/// when the destination is never reached. Edges with infinite weight are never
/// traversed.
///
/// The search keeps finalizing vertices whose cost equals the destination's, so
/// zero-weight edges between equally cheap vertices are recorded in both
/// directions.
pub fn find_shortest_paths(
    graph: &SchemaGraph,
    source: NodeIndex,
    destination: NodeIndex,
) -> Result<PredecessorMap> {
    check_weights(graph)?;

    let mut costs: HashMap<NodeIndex, f64> = HashMap::new();
    let mut predecessors: HashMap<NodeIndex, Vec<EdgeIndex>> = HashMap::new();
    let mut finalized: HashSet<NodeIndex> = HashSet::new();
    let mut frontier = BinaryHeap::new();
    let mut seq = 0u64;

    costs.insert(source, 0.0);
    frontier.push(FrontierEntry {
        cost: 0.0,
        seq,
        node: source,
    });

    while let Some(entry) = frontier.pop() {
        let current = entry.node;
        if finalized.contains(&current) {
            continue;
        }

        // Nothing left in the frontier can improve or tie the destination.
        if finalized.contains(&destination) {
            let destination_cost = costs.get(&destination).copied().unwrap_or(f64::INFINITY);
            if entry.cost > destination_cost {
                break;
            }
        }

        finalized.insert(current);
        let current_cost = entry.cost;

        for (edge, neighbor, relation) in graph.incident_edges(current) {
            let weight = relation.weight;
            if weight.is_infinite() {
                continue;
            }

            let candidate = current_cost + weight;
            if finalized.contains(&neighbor) {
                // A finalized neighbor can only tie across a zero-weight edge.
                let tied = costs.get(&neighbor).is_some_and(|&known| candidate == known);
                if tied && neighbor != source && neighbor != current {
                    predecessors.entry(neighbor).or_default().push(edge);
                }
                continue;
            }

            match costs.get(&neighbor).copied() {
                Some(known) if candidate > known => {}
                Some(known) if candidate == known => {
                    predecessors.entry(neighbor).or_default().push(edge);
                }
                _ => {
                    costs.insert(neighbor, candidate);
                    predecessors.insert(neighbor, vec![edge]);
                    seq += 1;
                    frontier.push(FrontierEntry {
                        cost: candidate,
                        seq,
                        node: neighbor,
                    });
                }
            }
        }
    }

    if !finalized.contains(&destination) {
        return Err(GraphError::NoPath {
            from: graph.table_name(source).to_string(),
            to: graph.table_name(destination).to_string(),
        });
    }

    log::debug!(
        "Shortest path '{}' -> '{}': cost {}, {} vertices finalized",
        graph.table_name(source),
        graph.table_name(destination),
        costs.get(&destination).copied().unwrap_or_default(),
        finalized.len()
    );

    Ok(PredecessorMap {
        source,
        destination,
        costs,
        predecessors,
    })
}

fn check_weights(graph: &SchemaGraph) -> Result<()> {
    for (edge, relation) in graph.edges() {
        let weight = relation.weight;
        if weight.is_nan() || weight < 0.0 {
            let (from, to) = graph
                .endpoints(edge)
                .map(|(a, b)| (graph.table_name(a), graph.table_name(b)))
                .unwrap_or_default();
            return Err(GraphError::NegativeWeight {
                from: from.to_string(),
                to: to.to_string(),
                weight,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ForeignKey;
    use crate::types::EdgeKind;

    fn link(graph: &mut SchemaGraph, a: &str, b: &str, weight: f64) -> EdgeIndex {
        let from = graph.add_table(a);
        let to = graph.add_table(b);
        let fk = ForeignKey::new(a, [format!("{b}_id")], b, ["id"]);
        graph.add_edge(from, to, weight, EdgeKind::ForeignKey(fk))
    }

    #[test]
    fn frontier_pops_cheapest_then_oldest() {
        let mut heap = BinaryHeap::new();
        let node = NodeIndex::new(0);
        heap.push(FrontierEntry { cost: 2.0, seq: 0, node });
        heap.push(FrontierEntry { cost: 1.0, seq: 2, node });
        heap.push(FrontierEntry { cost: 1.0, seq: 1, node });

        let order: Vec<(f64, u64)> = std::iter::from_fn(|| heap.pop())
            .map(|e| (e.cost, e.seq))
            .collect();
        assert_eq!(order, vec![(1.0, 1), (1.0, 2), (2.0, 0)]);
    }

    #[test]
    fn records_every_tied_predecessor() {
        let mut graph = SchemaGraph::new();
        let ab = link(&mut graph, "a", "b", 12.0);
        link(&mut graph, "a", "c", 42.0);
        let bd = link(&mut graph, "b", "d", 42.0);
        let cd = link(&mut graph, "c", "d", 12.0);

        let a = graph.find_table("a").unwrap();
        let b = graph.find_table("b").unwrap();
        let d = graph.find_table("d").unwrap();
        let map = find_shortest_paths(&graph, a, d).unwrap();

        assert_eq!(map.cost(), 54.0);
        assert_eq!(map.predecessors(d), &[bd, cd]);
        assert_eq!(map.predecessors(b), &[ab]);
        assert!(map.predecessors(a).is_empty());
        assert!(map.has_ties());
    }

    #[test]
    fn source_equals_destination() {
        let mut graph = SchemaGraph::new();
        link(&mut graph, "a", "b", 1.0);
        let a = graph.find_table("a").unwrap();

        let map = find_shortest_paths(&graph, a, a).unwrap();
        assert_eq!(map.cost(), 0.0);
        assert!(map.predecessors(a).is_empty());
    }

    #[test]
    fn infinite_weight_edges_are_not_traversed() {
        let mut graph = SchemaGraph::new();
        link(&mut graph, "a", "b", f64::INFINITY);
        let a = graph.find_table("a").unwrap();
        let b = graph.find_table("b").unwrap();

        assert!(matches!(
            find_shortest_paths(&graph, a, b),
            Err(GraphError::NoPath { .. })
        ));
    }

    #[test]
    fn zero_weight_edge_between_equal_costs_is_tight_both_ways() {
        let mut graph = SchemaGraph::new();
        let su = link(&mut graph, "s", "u", 1.0);
        let sv = link(&mut graph, "s", "v", 1.0);
        let uv = link(&mut graph, "u", "v", 0.0);
        link(&mut graph, "u", "t", 1.0);
        link(&mut graph, "v", "t", 1.0);

        let s = graph.find_table("s").unwrap();
        let u = graph.find_table("u").unwrap();
        let v = graph.find_table("v").unwrap();
        let t = graph.find_table("t").unwrap();
        let map = find_shortest_paths(&graph, s, t).unwrap();

        assert_eq!(map.cost(), 2.0);
        assert_eq!(map.predecessors(u), &[su, uv]);
        assert_eq!(map.predecessors(v), &[sv, uv]);
        assert!(map.predecessors(s).is_empty());
    }

    #[test]
    fn keeps_finalizing_at_the_destination_cost() {
        let mut graph = SchemaGraph::new();
        let sd = link(&mut graph, "s", "d", 1.0);
        link(&mut graph, "s", "x", 1.0);
        let xd = link(&mut graph, "x", "d", 0.0);

        let s = graph.find_table("s").unwrap();
        let d = graph.find_table("d").unwrap();
        let map = find_shortest_paths(&graph, s, d).unwrap();

        assert_eq!(map.predecessors(d), &[sd, xd]);
    }

    #[test]
    fn zero_weight_source_loop_is_ignored() {
        let mut graph = SchemaGraph::new();
        link(&mut graph, "s", "s", 0.0);
        let sx = link(&mut graph, "s", "x", 0.0);
        let s = graph.find_table("s").unwrap();
        let x = graph.find_table("x").unwrap();

        let map = find_shortest_paths(&graph, s, x).unwrap();
        assert_eq!(map.cost(), 0.0);
        assert!(map.predecessors(s).is_empty());
        assert_eq!(map.predecessors(x), &[sx]);
    }

    #[test]
    fn negative_weight_beyond_destination_is_rejected() {
        let mut graph = SchemaGraph::new();
        link(&mut graph, "a", "b", 1.0);
        link(&mut graph, "a", "c", 5.0);
        link(&mut graph, "c", "d", -1.0);
        let a = graph.find_table("a").unwrap();
        let b = graph.find_table("b").unwrap();

        assert_eq!(
            find_shortest_paths(&graph, a, b).unwrap_err(),
            GraphError::NegativeWeight {
                from: "c".to_string(),
                to: "d".to_string(),
                weight: -1.0,
            }
        );
    }

    #[test]
    fn nan_weight_is_rejected() {
        let mut graph = SchemaGraph::new();
        link(&mut graph, "a", "b", f64::NAN);
        let a = graph.find_table("a").unwrap();
        let b = graph.find_table("b").unwrap();

        assert!(matches!(
            find_shortest_paths(&graph, a, b),
            Err(GraphError::NegativeWeight { .. })
        ));
    }
}
