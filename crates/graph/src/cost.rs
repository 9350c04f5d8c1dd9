//! Edge weights and caller supplied cost overrides.

use crate::error::{GraphError, Result};
use crate::junction::JunctionTable;
use crate::schema::{ForeignKey, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default weight of a plain foreign key edge.
pub const WEIGHT_FK: f64 = 1.0;
/// Weight of a foreign key whose local columns are the owner's primary key.
pub const WEIGHT_INHERITANCE_FK: f64 = 0.1;
/// Weight of the synthetic edge crossing a junction table (two real joins).
pub const WEIGHT_JUNCTION: f64 = 1.5;

/// Modifier discounting a relationship so searches prefer it.
pub const WEIGHT_IMPORTANT: f64 = 0.75;
/// Modifier inflating a relationship so alternate routes win.
pub const WEIGHT_IRRELEVANT: f64 = 2.0;
/// Weight that removes a relationship from every search.
pub const WEIGHT_IGNORE: f64 = f64::INFINITY;

/// Cost overrides applied when the relationship graph is built.
///
/// `foreign_key_costs` maps table name, then local column key (columns joined
/// by `,`), to an absolute weight. `table_modifiers` multiplies the weight of
/// every edge owned by a table, including the absolute overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostOverrides {
    #[serde(default)]
    pub foreign_key_costs: HashMap<String, HashMap<String, f64>>,
    #[serde(default)]
    pub table_modifiers: HashMap<String, f64>,
}

impl CostOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_foreign_key_cost(
        &mut self,
        table: impl Into<String>,
        column_key: impl Into<String>,
        cost: f64,
    ) -> &mut Self {
        self.foreign_key_costs
            .entry(table.into())
            .or_default()
            .insert(column_key.into(), cost);
        self
    }

    pub fn set_foreign_key_costs(
        &mut self,
        costs: HashMap<String, HashMap<String, f64>>,
    ) -> &mut Self {
        self.foreign_key_costs = costs;
        self
    }

    pub fn set_table_cost_modifier(&mut self, table: impl Into<String>, modifier: f64) -> &mut Self {
        self.table_modifiers.insert(table.into(), modifier);
        self
    }

    pub fn set_table_cost_modifiers(&mut self, modifiers: HashMap<String, f64>) -> &mut Self {
        self.table_modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foreign_key_costs.values().all(HashMap::is_empty) && self.table_modifiers.is_empty()
    }

    /// Reject negative and NaN values before they can reach a graph.
    pub fn validate(&self) -> Result<()> {
        for (table, columns) in &self.foreign_key_costs {
            for (column_key, &cost) in columns {
                ensure_non_negative(&format!("{table}({column_key})"), cost)?;
            }
        }
        for (table, &modifier) in &self.table_modifiers {
            ensure_non_negative(table, modifier)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn foreign_key_cost(&self, table: &str, column_key: &str) -> Option<f64> {
        self.foreign_key_costs
            .get(table)
            .and_then(|columns| columns.get(column_key))
            .copied()
    }

    #[must_use]
    pub fn table_modifier(&self, table: &str) -> Option<f64> {
        self.table_modifiers.get(table).copied()
    }

    /// Resolve the weight of `fk`, declared on `owner`:
    /// absolute override, else inheritance discount, else the default,
    /// then scaled by the owner's modifier.
    #[must_use]
    pub fn foreign_key_weight(&self, owner: &Table, fk: &ForeignKey) -> f64 {
        let base = if let Some(cost) = self.foreign_key_cost(&owner.name, &fk.column_key()) {
            cost
        } else if owner.is_inheritance_relationship(fk) {
            WEIGHT_INHERITANCE_FK
        } else {
            WEIGHT_FK
        };
        self.scale(&owner.name, base)
    }

    #[must_use]
    pub fn junction_weight(&self, junction: &JunctionTable) -> f64 {
        self.scale(&junction.table, WEIGHT_JUNCTION)
    }

    /// An ignored edge or an ignored table stays ignored whatever the other
    /// factor is, so `0 * WEIGHT_IGNORE` never becomes NaN.
    fn scale(&self, table: &str, weight: f64) -> f64 {
        match self.table_modifier(table) {
            Some(modifier) if weight.is_infinite() || modifier.is_infinite() => WEIGHT_IGNORE,
            Some(modifier) => weight * modifier,
            None => weight,
        }
    }
}

fn ensure_non_negative(target: &str, cost: f64) -> Result<()> {
    if cost >= 0.0 {
        Ok(())
    } else {
        Err(GraphError::NegativeCost {
            target: target.to_string(),
            cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Table {
        Table::new("user")
            .with_column("id")
            .with_column("contact_id")
            .with_primary_key(["id"])
            .with_foreign_key(["id"], "contact", ["id"])
            .with_foreign_key(["contact_id"], "contact", ["id"])
    }

    #[test]
    fn resolves_default_and_inheritance_weights() {
        let table = user();
        let costs = CostOverrides::new();
        assert_eq!(
            costs.foreign_key_weight(&table, &table.foreign_keys[0]),
            WEIGHT_INHERITANCE_FK
        );
        assert_eq!(costs.foreign_key_weight(&table, &table.foreign_keys[1]), WEIGHT_FK);
    }

    #[test]
    fn modifier_applies_on_top_of_absolute_override() {
        let table = user();
        let mut costs = CostOverrides::new();
        costs
            .set_foreign_key_cost("user", "contact_id", 4.0)
            .set_table_cost_modifier("user", WEIGHT_IRRELEVANT);

        assert_eq!(costs.foreign_key_weight(&table, &table.foreign_keys[1]), 8.0);
        assert_eq!(
            costs.foreign_key_weight(&table, &table.foreign_keys[0]),
            WEIGHT_INHERITANCE_FK * WEIGHT_IRRELEVANT
        );
    }

    #[test]
    fn ignored_weight_survives_any_modifier() {
        let table = user();
        let mut costs = CostOverrides::new();
        costs
            .set_foreign_key_cost("user", "contact_id", WEIGHT_IGNORE)
            .set_table_cost_modifier("user", 0.0);
        assert_eq!(costs.foreign_key_weight(&table, &table.foreign_keys[1]), WEIGHT_IGNORE);
        assert_eq!(costs.foreign_key_weight(&table, &table.foreign_keys[0]), 0.0);

        let mut costs = CostOverrides::new();
        costs
            .set_foreign_key_cost("user", "contact_id", 0.0)
            .set_table_cost_modifier("user", WEIGHT_IGNORE);
        assert_eq!(costs.foreign_key_weight(&table, &table.foreign_keys[1]), WEIGHT_IGNORE);

        let junction = JunctionTable {
            table: "user".to_string(),
            first: ForeignKey::new("user", ["id"], "contact", ["id"]),
            second: ForeignKey::new("user", ["contact_id"], "contact", ["id"]),
        };
        assert_eq!(costs.junction_weight(&junction), WEIGHT_IGNORE);
    }

    #[test]
    fn rejects_negative_and_nan_values() {
        let mut costs = CostOverrides::new();
        costs.set_foreign_key_cost("user", "contact_id", -1.0);
        assert!(matches!(
            costs.validate(),
            Err(GraphError::NegativeCost { ref target, .. }) if target == "user(contact_id)"
        ));

        let mut costs = CostOverrides::new();
        costs.set_table_cost_modifier("user", f64::NAN);
        assert!(costs.validate().is_err());

        let mut costs = CostOverrides::new();
        costs.set_table_cost_modifier("user", WEIGHT_IGNORE);
        assert!(costs.validate().is_ok());
    }
}
