use crate::cache::CacheConfig;
use crate::error::Result;
use crate::provider::read_document;
use schemalink_graph::CostOverrides;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Analyzer settings, usually read from a TOML file:
///
/// ```toml
/// [cache]
/// key = "crm"
/// capacity = 512
///
/// [costs.foreign_key_costs.user]
/// role_id = 0.75
///
/// [costs.table_modifiers]
/// audit_log = 2.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub cache: Option<CacheConfig>,
    #[serde(default)]
    pub costs: CostOverrides,
}

impl AnalyzerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = read_document(path)?;
        config.costs.validate()?;
        Ok(config)
    }
}
