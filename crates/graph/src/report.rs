use crate::types::{EdgeKind, SchemaGraph};
use petgraph::graph::{EdgeIndex, NodeIndex};

/// Render a route starting at `source`, e.g.
/// `user --(role_id)--> role <=(role_right)=> right`.
///
/// Foreign key arrows point at the referenced table; junction edges show the
/// junction table between double arrows.
#[must_use]
pub fn describe_path(graph: &SchemaGraph, source: NodeIndex, path: &[EdgeIndex]) -> String {
    let mut current = graph.table_name(source);
    let mut out = current.to_string();

    for edge in path.iter().filter_map(|&idx| graph.edge(idx)) {
        match &edge.kind {
            EdgeKind::ForeignKey(fk) => {
                let columns = fk.column_key();
                if fk.foreign_table == current {
                    current = &fk.local_table;
                    out.push_str(&format!(" <--({columns})-- {current}"));
                } else {
                    current = &fk.foreign_table;
                    out.push_str(&format!(" --({columns})--> {current}"));
                }
            }
            EdgeKind::Junction(junction) => {
                current = junction.other_side(current);
                out.push_str(&format!(" <=({})=> {current}", junction.table));
            }
        }
    }

    out
}

/// Full diagnostic listing every tied route between two tables.
#[must_use]
pub fn ambiguity_message(
    graph: &SchemaGraph,
    source: NodeIndex,
    destination: NodeIndex,
    paths: &[Vec<EdgeIndex>],
) -> String {
    let rendered: Vec<String> = paths
        .iter()
        .enumerate()
        .map(|(i, path)| format!("Path {}: {}", i + 1, describe_path(graph, source, path)))
        .collect();

    format!(
        "There are many possible shortest paths between table '{}' and table '{}'\n\n{}",
        graph.table_name(source),
        graph.table_name(destination),
        rendered.join("\n\n")
    )
}
