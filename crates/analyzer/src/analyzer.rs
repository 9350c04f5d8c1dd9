use crate::cache::MemoCache;
use crate::error::{AnalyzerError, Result};
use crate::provider::SchemaProvider;
use schemalink_graph::{
    ambiguity_message, describe_path, detect_junction_tables, enumerate_all, find_shortest_paths,
    foreign_key_chain, reconstruct, CostOverrides, ForeignKey, GraphBuilder, GraphError,
    JunctionTable, Schema, SchemaGraph, Table,
};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Analyzes a database model:
///
/// - detects junction tables
/// - computes the cheapest chain of foreign keys linking two tables
/// - resolves inheritance (parent/children) relationships
///
/// Results are memoized in a [`MemoCache`]; the schema snapshot is loaded
/// once per analyzer, from the cache when another analyzer already put it there.
pub struct SchemaAnalyzer<P> {
    provider: P,
    cache: Arc<MemoCache>,
    schema: OnceLock<Arc<Schema>>,
    costs: CostOverrides,
}

impl<P: SchemaProvider> SchemaAnalyzer<P> {
    /// Analyzer without caching.
    pub fn new(provider: P) -> Self {
        Self::with_cache(provider, Arc::new(MemoCache::disabled()))
    }

    pub fn with_cache(provider: P, cache: Arc<MemoCache>) -> Self {
        Self {
            provider,
            cache,
            schema: OnceLock::new(),
            costs: CostOverrides::new(),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &MemoCache {
        &self.cache
    }

    #[must_use]
    pub fn costs(&self) -> &CostOverrides {
        &self.costs
    }

    /// Replace every cost override at once.
    pub fn set_costs(&mut self, costs: CostOverrides) -> Result<()> {
        costs.validate()?;
        self.costs = costs;
        Ok(())
    }

    /// Set the absolute weight of the foreign key on `table` spanning
    /// `column_key` (local columns joined by `,`).
    pub fn set_foreign_key_cost(&mut self, table: &str, column_key: &str, cost: f64) -> Result<()> {
        let mut costs = self.costs.clone();
        costs.set_foreign_key_cost(table, column_key, cost);
        self.set_costs(costs)
    }

    pub fn set_foreign_key_costs(&mut self, costs: HashMap<String, HashMap<String, f64>>) -> Result<()> {
        let mut updated = self.costs.clone();
        updated.set_foreign_key_costs(costs);
        self.set_costs(updated)
    }

    /// Scale the weight of every edge owned by `table` (its foreign keys, or
    /// the junction link if `table` is a junction table).
    pub fn set_table_cost_modifier(&mut self, table: &str, modifier: f64) -> Result<()> {
        let mut costs = self.costs.clone();
        costs.set_table_cost_modifier(table, modifier);
        self.set_costs(costs)
    }

    pub fn set_table_cost_modifiers(&mut self, modifiers: HashMap<String, f64>) -> Result<()> {
        let mut costs = self.costs.clone();
        costs.set_table_cost_modifiers(modifiers);
        self.set_costs(costs)
    }

    /// The schema snapshot (from the cache or the provider if needed).
    pub fn schema(&self) -> Result<Arc<Schema>> {
        if let Some(schema) = self.schema.get() {
            return Ok(Arc::clone(schema));
        }
        let schema = self
            .cache
            .get_or_try_insert(&self.cache.key("schema"), || self.provider.load_schema())?;
        Ok(Arc::clone(self.schema.get_or_init(|| schema)))
    }

    /// Detect all junction tables in the schema.
    ///
    /// With `ignore_referenced`, junction tables pointed to by a foreign key of
    /// another table are left out.
    pub fn detect_junction_tables(&self, ignore_referenced: bool) -> Result<Vec<Table>> {
        let key = self
            .cache
            .key(&format!("junctiontables_{ignore_referenced}"));
        let tables = self.cache.get_or_try_insert(&key, || {
            let schema = self.schema()?;
            Ok(detect_junction_tables(&schema, ignore_referenced)
                .into_iter()
                .cloned()
                .collect::<Vec<Table>>())
        })?;
        Ok(tables.as_ref().clone())
    }

    pub fn is_junction_table(&self, table: &str, ignore_referenced: bool) -> Result<bool> {
        self.check_table_exists(table)?;
        Ok(self
            .detect_junction_tables(ignore_referenced)?
            .iter()
            .any(|t| t.name == table))
    }

    /// The cheapest chain of foreign keys joining `from` to `to`, in traversal order.
    ///
    /// Fails with [`AnalyzerError::AmbiguousPath`] when several chains tie;
    /// the error lists every one of them so costs can be adjusted.
    pub fn shortest_path(&self, from: &str, to: &str) -> Result<Vec<ForeignKey>> {
        let key = self
            .cache
            .key(&format!("shortest_{from}```{to}{}", self.costs_suffix()));
        let path = self
            .cache
            .get_or_try_insert(&key, || self.shortest_path_uncached(from, to))?;
        Ok(path.as_ref().clone())
    }

    fn shortest_path_uncached(&self, from: &str, to: &str) -> Result<Vec<ForeignKey>> {
        self.check_table_exists(from)?;
        self.check_table_exists(to)?;

        let graph = self.graph()?;
        let source = self.vertex(&graph, from)?;
        let destination = self.vertex(&graph, to)?;

        let predecessors = find_shortest_paths(&graph, source, destination)?;
        match reconstruct(&graph, &predecessors) {
            Ok(path) => Ok(foreign_key_chain(&graph, source, &path)),
            Err(GraphError::AmbiguousPath { .. }) => {
                let paths = enumerate_all(&graph, &predecessors);
                log::debug!("{} tied paths between '{from}' and '{to}'", paths.len());
                Err(AnalyzerError::AmbiguousPath {
                    from: from.to_string(),
                    to: to.to_string(),
                    paths: paths
                        .iter()
                        .map(|path| describe_path(&graph, source, path))
                        .collect(),
                    message: ambiguity_message(&graph, source, destination, &paths),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// The inheritance foreign key of `table` (its primary key also pointing
    /// at a parent table), if any.
    pub fn parent_relationship(&self, table: &str) -> Result<Option<ForeignKey>> {
        let key = self.cache.key(&format!("parent_{table}"));
        let parent = self.cache.get_or_try_insert(&key, || {
            let schema = self.schema()?;
            let owner = self.require_table(&schema, table)?;
            Ok(owner
                .foreign_keys
                .iter()
                .find(|fk| owner.is_inheritance_relationship(fk))
                .cloned())
        })?;
        Ok(parent.as_ref().clone())
    }

    /// Inheritance foreign keys of other tables pointing at `table`.
    pub fn children_relationships(&self, table: &str) -> Result<Vec<ForeignKey>> {
        let key = self.cache.key(&format!("children_{table}"));
        let children = self.cache.get_or_try_insert(&key, || {
            let schema = self.schema()?;
            self.require_table(&schema, table)?;
            Ok(schema
                .tables()
                .iter()
                .filter(|child| child.name != table)
                .flat_map(|child| {
                    child
                        .unique_foreign_keys()
                        .into_iter()
                        .filter(move |fk| {
                            fk.foreign_table == table && child.is_inheritance_relationship(fk)
                        })
                        .cloned()
                })
                .collect::<Vec<ForeignKey>>())
        })?;
        Ok(children.as_ref().clone())
    }

    /// The relationship graph for the current costs, built once per cost set.
    pub fn graph(&self) -> Result<Arc<SchemaGraph>> {
        let key = self.cache.key(&format!("graph{}", self.costs_suffix()));
        self.cache.get_or_try_insert(&key, || {
            let schema = self.schema()?;
            let junctions: Vec<JunctionTable> = self
                .detect_junction_tables(false)?
                .iter()
                .filter_map(JunctionTable::from_table)
                .collect();
            let builder = GraphBuilder::new(self.costs.clone())?;
            Ok(builder.build(schema.tables(), &junctions)?)
        })
    }

    fn check_table_exists(&self, name: &str) -> Result<()> {
        let schema = self.schema()?;
        self.require_table(&schema, name).map(|_| ())
    }

    fn require_table<'s>(&self, schema: &'s Schema, name: &str) -> Result<&'s Table> {
        schema.table(name).ok_or_else(|| {
            GraphError::TableNotFound {
                name: name.to_string(),
                suggestion: schema.closest_table_name(name).map(str::to_string),
            }
            .into()
        })
    }

    fn vertex(&self, graph: &SchemaGraph, name: &str) -> Result<schemalink_graph::NodeIndex> {
        graph.find_table(name).ok_or_else(|| {
            GraphError::TableNotFound {
                name: name.to_string(),
                suggestion: None,
            }
            .into()
        })
    }

    /// Cost-dependent cache keys carry a fingerprint of the overrides so
    /// analyzers sharing a cache with different costs never collide.
    fn costs_suffix(&self) -> String {
        if self.costs.is_empty() {
            return String::new();
        }
        let mut entries: Vec<String> = self
            .costs
            .foreign_key_costs
            .iter()
            .flat_map(|(table, columns)| {
                columns
                    .iter()
                    .map(move |(cols, cost)| format!("fk:{table}:{cols}={cost}"))
            })
            .chain(
                self.costs
                    .table_modifiers
                    .iter()
                    .map(|(table, modifier)| format!("table:{table}={modifier}")),
            )
            .collect();
        entries.sort();

        let mut hasher = DefaultHasher::new();
        entries.hash(&mut hasher);
        format!("_costs{:016x}", hasher.finish())
    }
}
