use crate::schema::{ForeignKey, Schema, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A pure many-to-many association table and its two foreign keys, in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunctionTable {
    pub table: String,
    pub first: ForeignKey,
    pub second: ForeignKey,
}

impl JunctionTable {
    /// Classify `table`, returning `None` when it is not a junction table.
    #[must_use]
    pub fn from_table(table: &Table) -> Option<Self> {
        if !is_junction_table(table) {
            return None;
        }
        Some(Self {
            table: table.name.clone(),
            first: table.foreign_keys[0].clone(),
            second: table.foreign_keys[1].clone(),
        })
    }

    /// The table reached when crossing the junction from `current`.
    #[must_use]
    pub fn other_side(&self, current: &str) -> &str {
        if self.first.foreign_table == current {
            &self.second.foreign_table
        } else {
            &self.first.foreign_table
        }
    }

    /// The two foreign keys ordered so that the one touching `current` comes first.
    #[must_use]
    pub fn ordered_from(&self, current: &str) -> [&ForeignKey; 2] {
        if self.first.foreign_table == current {
            [&self.first, &self.second]
        } else {
            [&self.second, &self.first]
        }
    }
}

/// Returns true if `table` is a junction table:
///
/// - it has exactly 2 foreign keys, each on a single column
/// - it has only 2 columns, or 3 columns where the third one is an
///   autoincremented primary key that is not part of a foreign key
#[must_use]
pub fn is_junction_table(table: &Table) -> bool {
    let foreign_keys = &table.foreign_keys;
    if foreign_keys.len() != 2 {
        return false;
    }

    let column_count = table.columns.len();
    if !(2..=3).contains(&column_count) {
        return false;
    }

    let pk_columns = table.primary_key_columns();
    if pk_columns.len() == 1 && column_count == 2 {
        return false;
    }
    if pk_columns.len() != 1 && column_count == 3 {
        return false;
    }

    let mut fk_columns: HashSet<&str> = HashSet::new();
    for fk in foreign_keys {
        let [column] = fk.local_columns.as_slice() else {
            return false;
        };
        fk_columns.insert(column.as_str());
    }

    if column_count == 3 {
        let pk = pk_columns[0].as_str();
        if fk_columns.contains(pk) {
            return false;
        }
        if !table.column(pk).is_some_and(|c| c.autoincrement) {
            return false;
        }
    }

    true
}

/// Every junction table of `schema`, in schema order.
///
/// With `ignore_referenced`, junction tables that are themselves the target of
/// another foreign key are left out.
#[must_use]
pub fn detect_junction_tables(schema: &Schema, ignore_referenced: bool) -> Vec<&Table> {
    schema
        .tables()
        .iter()
        .filter(|table| is_junction_table(table))
        .filter(|table| !ignore_referenced || !schema.is_table_referenced(&table.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Vec<Table> {
        vec![
            Table::new("role").with_column("id").with_column("label"),
            Table::new("right").with_column("id").with_column("label"),
        ]
    }

    fn junction_names(tables: Vec<Table>) -> Vec<String> {
        let schema = Schema::new(tables);
        detect_junction_tables(&schema, false)
            .into_iter()
            .map(|t| t.name.clone())
            .collect()
    }

    fn role_right() -> Table {
        Table::new("role_right")
            .with_column("role_id")
            .with_column("right_id")
            .with_foreign_key(["role_id"], "role", ["id"])
            .with_foreign_key(["right_id"], "right", ["id"])
    }

    #[test]
    fn two_columns_with_composite_key() {
        let mut tables = base();
        tables.push(role_right().with_primary_key(["role_id", "right_id"]));
        assert_eq!(junction_names(tables), vec!["role_right"]);
    }

    #[test]
    fn two_columns_without_primary_key() {
        let mut tables = base();
        tables.push(role_right());
        assert_eq!(junction_names(tables), vec!["role_right"]);
    }

    #[test]
    fn two_columns_with_single_primary_key_is_rejected() {
        let mut tables = base();
        tables.push(role_right().with_primary_key(["role_id"]));
        assert!(junction_names(tables).is_empty());
    }

    #[test]
    fn extra_non_key_column_is_rejected() {
        let mut tables = base();
        tables.push(
            role_right()
                .with_column("label")
                .with_primary_key(["role_id", "right_id"]),
        );
        assert!(junction_names(tables).is_empty());
    }

    #[test]
    fn three_columns_with_autoincrement_id() {
        let mut tables = base();
        tables.push(
            Table::new("role_right")
                .with_autoincrement_column("id")
                .with_column("role_id")
                .with_column("right_id")
                .with_primary_key(["id"])
                .with_foreign_key(["role_id"], "role", ["id"])
                .with_foreign_key(["right_id"], "right", ["id"]),
        );
        assert_eq!(junction_names(tables), vec!["role_right"]);
    }

    #[test]
    fn three_columns_without_autoincrement_is_rejected() {
        let mut tables = base();
        tables.push(
            Table::new("role_right")
                .with_column("id")
                .with_column("role_id")
                .with_column("right_id")
                .with_primary_key(["id"])
                .with_foreign_key(["role_id"], "role", ["id"])
                .with_foreign_key(["right_id"], "right", ["id"]),
        );
        assert!(junction_names(tables).is_empty());
    }

    #[test]
    fn three_columns_where_primary_key_is_foreign_key_is_rejected() {
        let mut tables = base();
        tables.push(
            Table::new("role_right")
                .with_autoincrement_column("id")
                .with_column("role_id")
                .with_column("right_id")
                .with_primary_key(["id"])
                .with_foreign_key(["id"], "role", ["id"])
                .with_foreign_key(["right_id"], "right", ["id"]),
        );
        assert!(junction_names(tables).is_empty());
    }

    #[test]
    fn four_columns_is_rejected() {
        let mut tables = base();
        tables.push(
            Table::new("role_right")
                .with_autoincrement_column("id")
                .with_column("role_id")
                .with_column("right_id")
                .with_column("label")
                .with_primary_key(["id"])
                .with_foreign_key(["role_id"], "role", ["id"])
                .with_foreign_key(["right_id"], "right", ["id"]),
        );
        assert!(junction_names(tables).is_empty());
    }

    #[test]
    fn multi_column_foreign_key_is_rejected() {
        let mut tables = base();
        tables.push(
            Table::new("role_right")
                .with_column("role_id")
                .with_column("right_id")
                .with_primary_key(["role_id", "right_id"])
                .with_foreign_key(["role_id", "right_id"], "role", ["id", "right_id"])
                .with_foreign_key(["right_id"], "right", ["id"]),
        );
        assert!(junction_names(tables).is_empty());
    }

    #[test]
    fn referenced_junction_can_be_ignored() {
        let mut tables = base();
        tables.push(role_right());
        tables.push(
            Table::new("audit")
                .with_column("id")
                .with_column("role_right_id")
                .with_foreign_key(["role_right_id"], "role_right", ["id"]),
        );
        let schema = Schema::new(tables);

        assert_eq!(detect_junction_tables(&schema, false).len(), 1);
        assert!(detect_junction_tables(&schema, true).is_empty());
    }

    #[test]
    fn orders_keys_from_current_side() {
        let junction = JunctionTable::from_table(&Schema::new(vec![role_right()]).tables()[0])
            .expect("junction");

        assert_eq!(junction.other_side("role"), "right");
        assert_eq!(junction.other_side("right"), "role");
        let [first, second] = junction.ordered_from("right");
        assert_eq!(first.foreign_table, "right");
        assert_eq!(second.foreign_table, "role");
    }
}
