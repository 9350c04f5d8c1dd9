use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("{}", table_not_found_message(.name, .suggestion.as_deref()))]
    TableNotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error(
        "Negative weight {weight} on edge '{from}' - '{to}': shortest path search requires non-negative weights"
    )]
    NegativeWeight {
        from: String,
        to: String,
        weight: f64,
    },

    #[error("Invalid cost {cost} for '{target}': costs must be non-negative numbers")]
    NegativeCost { target: String, cost: f64 },

    #[error("No path found between table '{from}' and table '{to}'")]
    NoPath { from: String, to: String },

    #[error(
        "There are many possible shortest paths to link table '{from}' to '{to}' (routes tie at '{at}')"
    )]
    AmbiguousPath { from: String, to: String, at: String },
}

fn table_not_found_message(name: &str, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(closest) => format!("Could not find table '{name}'. Did you mean '{closest}'?"),
        None => format!("Could not find table '{name}'."),
    }
}
