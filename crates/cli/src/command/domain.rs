use schemalink_analyzer::AnalyzerError;
use schemalink_graph::{ForeignKey, GraphError};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    Path { from: String, to: String },
    Junctions { ignore_referenced: bool },
    Parent { table: String },
    Children { table: String },
}

#[derive(Debug, Serialize, Clone)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    pub data: Value,
    /// Human-readable rendering, printed when JSON output is off.
    #[serde(skip)]
    pub text: String,
}

impl CommandResponse {
    pub fn ok(data: Value, text: String) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: None,
            hints: Vec::new(),
            data,
            text,
        }
    }

    pub fn error(err: &AnalyzerError) -> Self {
        let data = match err {
            AnalyzerError::AmbiguousPath { paths, .. } => serde_json::json!({ "paths": paths }),
            _ => Value::Null,
        };
        Self {
            status: CommandStatus::Error,
            message: Some(err.to_string()),
            hints: classify_error(err),
            data,
            text: String::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Clone)]
pub struct Hint {
    #[serde(rename = "type")]
    pub kind: HintKind,
    pub text: String,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    Action,
    Warn,
}

pub fn classify_error(err: &AnalyzerError) -> Vec<Hint> {
    let mut hints = Vec::new();
    match err {
        AnalyzerError::AmbiguousPath { .. } => hints.push(Hint {
            kind: HintKind::Action,
            text: "Break the tie with [costs.foreign_key_costs] or [costs.table_modifiers] in the --config file.".to_string(),
        }),
        AnalyzerError::Graph(GraphError::TableNotFound {
            suggestion: Some(suggestion),
            ..
        }) => hints.push(Hint {
            kind: HintKind::Action,
            text: format!("Retry with table '{suggestion}'."),
        }),
        AnalyzerError::Graph(GraphError::NoPath { .. }) => hints.push(Hint {
            kind: HintKind::Warn,
            text: "The tables sit in disconnected parts of the schema, or every link between them is ignored.".to_string(),
        }),
        AnalyzerError::Io { .. } | AnalyzerError::UnsupportedFormat(_) => hints.push(Hint {
            kind: HintKind::Warn,
            text: "Schema and config files must be readable .json or .toml documents.".to_string(),
        }),
        _ => {}
    }
    hints
}

/// `user(role_id) -> role(id)`
pub fn render_foreign_key(fk: &ForeignKey) -> String {
    format!(
        "{}({}) -> {}({})",
        fk.local_table,
        fk.local_columns.join(", "),
        fk.foreign_table,
        fk.foreign_columns.join(", ")
    )
}
