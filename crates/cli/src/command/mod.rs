pub mod domain;

pub use domain::{CommandAction, CommandResponse};

use domain::render_foreign_key;
use schemalink_analyzer::{Result, SchemaAnalyzer, SchemaProvider};
use serde_json::json;

pub struct CommandHandler<P> {
    analyzer: SchemaAnalyzer<P>,
}

impl<P: SchemaProvider> CommandHandler<P> {
    pub fn new(analyzer: SchemaAnalyzer<P>) -> Self {
        Self { analyzer }
    }

    /// Run `action`, folding analyzer failures into an error response.
    pub fn execute(&self, action: &CommandAction) -> CommandResponse {
        match self.route(action) {
            Ok(response) => response,
            Err(err) => {
                log::debug!("{action:?} failed: {err}");
                CommandResponse::error(&err)
            }
        }
    }

    fn route(&self, action: &CommandAction) -> Result<CommandResponse> {
        match action {
            CommandAction::Path { from, to } => {
                let fks = self.analyzer.shortest_path(from, to)?;
                let text = fks
                    .iter()
                    .map(render_foreign_key)
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(CommandResponse::ok(json!({ "foreign_keys": fks }), text))
            }
            CommandAction::Junctions { ignore_referenced } => {
                let names: Vec<String> = self
                    .analyzer
                    .detect_junction_tables(*ignore_referenced)?
                    .into_iter()
                    .map(|table| table.name)
                    .collect();
                let text = names.join("\n");
                Ok(CommandResponse::ok(json!({ "junction_tables": names }), text))
            }
            CommandAction::Parent { table } => {
                let parent = self.analyzer.parent_relationship(table)?;
                let text = parent.as_ref().map(render_foreign_key).unwrap_or_default();
                Ok(CommandResponse::ok(json!({ "parent": parent }), text))
            }
            CommandAction::Children { table } => {
                let children = self.analyzer.children_relationships(table)?;
                let text = children
                    .iter()
                    .map(render_foreign_key)
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(CommandResponse::ok(json!({ "children": children }), text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::CommandStatus;
    use schemalink_analyzer::StaticSchemaProvider;
    use schemalink_graph::{Schema, Table};

    fn handler() -> CommandHandler<StaticSchemaProvider> {
        let schema = Schema::new(vec![
            Table::new("contact").with_column("id").with_primary_key(["id"]),
            Table::new("user")
                .with_column("id")
                .with_primary_key(["id"])
                .with_foreign_key(["id"], "contact", ["id"]),
        ]);
        CommandHandler::new(SchemaAnalyzer::new(StaticSchemaProvider::new(schema)))
    }

    #[test]
    fn path_renders_one_line_per_key() {
        let response = handler().execute(&CommandAction::Path {
            from: "user".to_string(),
            to: "contact".to_string(),
        });

        assert_eq!(response.status, CommandStatus::Ok);
        assert_eq!(response.text, "user(id) -> contact(id)");
        assert_eq!(response.data["foreign_keys"][0]["foreign_table"], "contact");
    }

    #[test]
    fn unknown_table_becomes_error_response() {
        let response = handler().execute(&CommandAction::Children {
            table: "contacts".to_string(),
        });

        assert!(response.is_error());
        assert_eq!(
            response.message.as_deref(),
            Some("Could not find table 'contacts'. Did you mean 'contact'?")
        );
        assert_eq!(response.hints[0].text, "Retry with table 'contact'.");
    }

    #[test]
    fn parent_is_null_without_inheritance() {
        let response = handler().execute(&CommandAction::Parent {
            table: "contact".to_string(),
        });

        assert_eq!(response.status, CommandStatus::Ok);
        assert!(response.data["parent"].is_null());
        assert!(response.text.is_empty());
    }
}
