//! Pool resolution — expand the default pool template with
//! per-environment overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::pool::PoolConfig;
use crate::types::Environment;

/// The `pools` section of a service config, as delivered by the
/// upstream validator: a default template plus one section per
/// environment mapping instance ids to partial overrides. A null
/// override section means "defaults as-is".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolsConfig {
    #[serde(default)]
    pub default: Map<String, Value>,
    #[serde(flatten)]
    pub environments: BTreeMap<Environment, BTreeMap<String, Option<Map<String, Value>>>>,
}

/// Expand every pool declared for `environment` into a fully resolved,
/// typed config, keyed and iterated in sorted instance-id order.
///
/// Resolution is deterministic: the default template is cloned per
/// instance id and recursively merged with that instance's override.
/// Mapping values merge key-by-key; any other value, lists included,
/// replaces the default wholesale.
pub fn resolve_pools(
    pools: &PoolsConfig,
    environment: Environment,
) -> ConfigResult<BTreeMap<String, PoolConfig>> {
    let env_pools = pools
        .environments
        .get(&environment)
        .ok_or(ConfigError::NoPoolsForEnvironment(environment))?;

    let mut resolved = BTreeMap::new();
    for (instance_id, overrides) in env_pools {
        let mut merged = pools.default.clone();
        if let Some(overrides) = overrides {
            merge_into(&mut merged, overrides);
        }
        let pool: PoolConfig =
            serde_json::from_value(Value::Object(merged)).map_err(|e| ConfigError::InvalidPool {
                instance_id: instance_id.clone(),
                reason: e.to_string(),
            })?;
        pool.validate(instance_id)?;
        resolved.insert(instance_id.clone(), pool);
    }
    Ok(resolved)
}

/// `base.update(overrides)`, recursing only where both sides hold a
/// mapping under the same key.
fn merge_into(base: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (key, value) in overrides {
        let merged_in_place = match (base.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_into(existing, incoming);
                true
            }
            _ => false,
        };
        if !merged_in_place {
            base.insert(key.clone(), value.clone());
        }
    }
}
