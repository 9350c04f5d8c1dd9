//! Relational schema metadata consumed by the graph builder.
//!
//! Snapshots are immutable once loaded; they are usually produced by a
//! metadata provider and deserialized from JSON or TOML.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Column of a table. Only the properties the analyzer reasons about are kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default)]
    pub autoincrement: bool,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            autoincrement: false,
        }
    }

    #[must_use]
    pub fn autoincrement(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            autoincrement: true,
        }
    }
}

/// Foreign key constraint declared on `local_table`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Owning table. Filled from the enclosing table when a snapshot is loaded.
    #[serde(default)]
    pub local_table: String,
    pub local_columns: Vec<String>,
    pub foreign_table: String,
    #[serde(default)]
    pub foreign_columns: Vec<String>,
}

impl ForeignKey {
    #[must_use]
    pub fn new<L, F>(
        local_table: impl Into<String>,
        local_columns: L,
        foreign_table: impl Into<String>,
        foreign_columns: F,
    ) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            local_table: local_table.into(),
            local_columns: local_columns.into_iter().map(Into::into).collect(),
            foreign_table: foreign_table.into(),
            foreign_columns: foreign_columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Local columns joined by `,`, the key used by per-column cost overrides.
    #[must_use]
    pub fn column_key(&self) -> String {
        self.local_columns.join(",")
    }

    /// Whether this key leads from `table` (its owner) to the other side.
    #[must_use]
    pub fn is_owned_by(&self, table: &str) -> bool {
        self.local_table == table
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub primary_key: Option<Vec<String>>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(Column::new(name));
        self
    }

    #[must_use]
    pub fn with_autoincrement_column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(Column::autoincrement(name));
        self
    }

    #[must_use]
    pub fn with_primary_key<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.primary_key = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_foreign_key<L, F>(
        mut self,
        local_columns: L,
        foreign_table: impl Into<String>,
        foreign_columns: F,
    ) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        let fk = ForeignKey::new(
            self.name.clone(),
            local_columns,
            foreign_table,
            foreign_columns,
        );
        self.foreign_keys.push(fk);
        self
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn has_primary_key(&self) -> bool {
        self.primary_key.as_ref().is_some_and(|pk| !pk.is_empty())
    }

    #[must_use]
    pub fn primary_key_columns(&self) -> &[String] {
        self.primary_key.as_deref().unwrap_or(&[])
    }

    /// True if `fk` is an inheritance relationship: its local columns are
    /// exactly this table's primary key, so the row shares the parent's identity.
    #[must_use]
    pub fn is_inheritance_relationship(&self, fk: &ForeignKey) -> bool {
        if !self.has_primary_key() {
            return false;
        }
        let mut fk_columns: Vec<&str> = fk.local_columns.iter().map(String::as_str).collect();
        let mut pk_columns: Vec<&str> = self
            .primary_key_columns()
            .iter()
            .map(String::as_str)
            .collect();
        fk_columns.sort_unstable();
        pk_columns.sort_unstable();
        fk_columns == pk_columns
    }

    /// Foreign keys with duplicates collapsed, see [`dedup_foreign_keys`].
    #[must_use]
    pub fn unique_foreign_keys(&self) -> Vec<&ForeignKey> {
        dedup_foreign_keys(&self.foreign_keys)
    }
}

/// Collapse foreign keys that point to the same table through the same local
/// columns. The first occurrence wins and declaration order is preserved.
#[must_use]
pub fn dedup_foreign_keys(foreign_keys: &[ForeignKey]) -> Vec<&ForeignKey> {
    let mut seen: HashSet<(&str, &[String])> = HashSet::new();
    foreign_keys
        .iter()
        .filter(|fk| seen.insert((fk.foreign_table.as_str(), fk.local_columns.as_slice())))
        .collect()
}

/// Candidate with the smallest Levenshtein distance to `name`; the first one
/// wins on equal distance.
pub(crate) fn closest_name<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    name: &str,
) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for candidate in candidates {
        let distance = strsim::levenshtein(candidate, name);
        if best.map_or(true, |(_, score)| distance < score) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(candidate, _)| candidate)
}

#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(default)]
    tables: Vec<Table>,
}

impl From<RawSchema> for Schema {
    fn from(raw: RawSchema) -> Self {
        Self::new(raw.tables)
    }
}

/// Ordered snapshot of every table in a database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSchema")]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    /// Build a snapshot, stamping each foreign key with its owning table.
    #[must_use]
    pub fn new(mut tables: Vec<Table>) -> Self {
        for table in &mut tables {
            for fk in &mut table.foreign_keys {
                fk.local_table.clone_from(&table.name);
            }
        }
        Self { tables }
    }

    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Existing table name with the smallest edit distance to `name`.
    #[must_use]
    pub fn closest_table_name(&self, name: &str) -> Option<&str> {
        closest_name(self.table_names(), name)
    }

    /// True if any foreign key in the schema references `name`.
    #[must_use]
    pub fn is_table_referenced(&self, name: &str) -> bool {
        self.tables
            .iter()
            .flat_map(|t| t.foreign_keys.iter())
            .any(|fk| fk.foreign_table == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_stamps_local_table() {
        let json = r#"{
            "tables": [
                { "name": "role", "columns": [{ "name": "id" }] },
                {
                    "name": "user",
                    "columns": [{ "name": "id", "autoincrement": true }, { "name": "role_id" }],
                    "primary_key": ["id"],
                    "foreign_keys": [
                        { "local_columns": ["role_id"], "foreign_table": "role", "foreign_columns": ["id"] }
                    ]
                }
            ]
        }"#;

        let schema: Schema = serde_json::from_str(json).unwrap();
        let user = schema.table("user").expect("user table");
        assert_eq!(user.foreign_keys[0].local_table, "user");
        assert!(user.column("id").unwrap().autoincrement);
        assert!(!user.column("role_id").unwrap().autoincrement);
    }

    #[test]
    fn inheritance_ignores_column_order() {
        let table = Table::new("child")
            .with_column("a")
            .with_column("b")
            .with_primary_key(["a", "b"])
            .with_foreign_key(["b", "a"], "parent", ["b", "a"])
            .with_foreign_key(["a"], "other", ["id"]);

        assert!(table.is_inheritance_relationship(&table.foreign_keys[0]));
        assert!(!table.is_inheritance_relationship(&table.foreign_keys[1]));
        assert!(!Table::new("t").is_inheritance_relationship(&table.foreign_keys[0]));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let table = Table::new("t")
            .with_foreign_key(["a"], "x", ["id"])
            .with_foreign_key(["b"], "x", ["id"])
            .with_foreign_key(["a"], "x", ["other"])
            .with_foreign_key(["a"], "y", ["id"]);

        let unique = table.unique_foreign_keys();
        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0].foreign_columns, vec!["id".to_string()]);
        assert_eq!(unique[2].foreign_table, "y");
    }

    #[test]
    fn closest_table_name_uses_edit_distance() {
        let schema = Schema::new(vec![
            Table::new("role"),
            Table::new("right"),
            Table::new("role_right"),
        ]);
        assert_eq!(schema.closest_table_name("rol"), Some("role"));
        assert_eq!(schema.closest_table_name("rigth"), Some("right"));
        assert_eq!(Schema::default().closest_table_name("x"), None);
    }
}
