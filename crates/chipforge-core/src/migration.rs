//! Save-format version migration.
//!
//! Provides a registry of migration functions that rewrite the JSON `state`
//! object of a save from one schema version to the next, so old saves keep
//! loading when the format changes.

use std::collections::BTreeMap;

use serde_json::Value;

/// Errors that can occur during migration.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("no migration path from version {from} to version {to}")]
    NoMigrationPath { from: u32, to: u32 },
    #[error("migration from version {from} to version {to} failed: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },
}

/// A function that transforms a save's state object from one version to the
/// next.
pub type MigrationFn = fn(Value) -> Result<Value, MigrationError>;

/// Registry of migration functions keyed by source version.
///
/// Each registered function migrates data from `version N` to `version N+1`.
/// The registry chains these steps to migrate across multiple versions.
pub struct MigrationRegistry {
    migrations: BTreeMap<u32, MigrationFn>,
}

impl MigrationRegistry {
    /// Create an empty migration registry.
    pub fn new() -> Self {
        Self {
            migrations: BTreeMap::new(),
        }
    }

    /// Every migration the shipped save format needs.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(1, migrate_v1_to_v2);
        registry
    }

    /// Register a migration function from `from_version` to `from_version + 1`.
    pub fn register(&mut self, from_version: u32, migrate: MigrationFn) {
        self.migrations.insert(from_version, migrate);
    }

    /// Check whether a complete migration path exists from `from` to `to`.
    pub fn can_migrate(&self, from: u32, to: u32) -> bool {
        if from >= to {
            return from == to;
        }
        (from..to).all(|v| self.migrations.contains_key(&v))
    }

    /// Migrate a state object from version `from` to version `to`.
    ///
    /// Returns the value unchanged if `from == to`.
    pub fn migrate(&self, state: Value, from: u32, to: u32) -> Result<Value, MigrationError> {
        if from > to {
            return Err(MigrationError::NoMigrationPath { from, to });
        }
        let mut current = state;
        for version in from..to {
            let migrate_fn = self
                .migrations
                .get(&version)
                .ok_or(MigrationError::NoMigrationPath { from, to })?;
            current = migrate_fn(current)?;
        }
        Ok(current)
    }

    /// Number of registered migration steps.
    pub fn step_count(&self) -> usize {
        self.migrations.len()
    }
}

impl Default for MigrationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// v1 flags and the v2 feature each one became.
const V1_FEATURE_FLAGS: [(&str, &str); 3] = [
    ("auto_mining_unlocked", "auto_miner"),
    ("auto_fab_unlocked", "auto_fab"),
    ("singularity_reached", "singularity"),
];

/// v1 stored feature flags as separate booleans; v2 keeps one `features`
/// list.
fn migrate_v1_to_v2(state: Value) -> Result<Value, MigrationError> {
    let Value::Object(mut map) = state else {
        return Err(MigrationError::MigrationFailed {
            from: 1,
            to: 2,
            reason: "state is not an object".to_string(),
        });
    };

    let mut features: Vec<Value> = match map.remove("features") {
        Some(Value::Array(existing)) => existing,
        _ => Vec::new(),
    };
    for (flag, feature) in V1_FEATURE_FLAGS {
        let set = matches!(map.remove(flag), Some(Value::Bool(true)));
        let name = Value::String(feature.to_string());
        if set && !features.contains(&name) {
            features.push(name);
        }
    }
    map.insert("features".to_string(), Value::Array(features));
    Ok(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add_marker(v: Value) -> Result<Value, MigrationError> {
        let Value::Object(mut map) = v else {
            return Err(MigrationError::MigrationFailed {
                from: 0,
                to: 1,
                reason: "not an object".into(),
            });
        };
        map.insert("marker".into(), json!(true));
        Ok(Value::Object(map))
    }

    fn fail(_: Value) -> Result<Value, MigrationError> {
        Err(MigrationError::MigrationFailed {
            from: 5,
            to: 6,
            reason: "always fails".into(),
        })
    }

    // -----------------------------------------------------------------------
    // Test 1: same version is identity
    // -----------------------------------------------------------------------
    #[test]
    fn same_version_is_identity() {
        let registry = MigrationRegistry::new();
        let data = json!({ "a": 1 });
        assert_eq!(registry.migrate(data.clone(), 2, 2).unwrap(), data);
        assert!(registry.can_migrate(2, 2));
    }

    // -----------------------------------------------------------------------
    // Test 2: missing step reports no path
    // -----------------------------------------------------------------------
    #[test]
    fn missing_step_reports_no_path() {
        let registry = MigrationRegistry::new();
        let err = registry.migrate(json!({}), 0, 1).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::NoMigrationPath { from: 0, to: 1 }
        ));
        assert!(!registry.can_migrate(0, 1));
    }

    // -----------------------------------------------------------------------
    // Test 3: steps chain
    // -----------------------------------------------------------------------
    #[test]
    fn steps_chain() {
        let mut registry = MigrationRegistry::standard();
        registry.register(0, add_marker);
        assert_eq!(registry.step_count(), 2);
        assert!(registry.can_migrate(0, 2));
        let out = registry
            .migrate(json!({ "auto_fab_unlocked": true }), 0, 2)
            .unwrap();
        assert_eq!(out["marker"], json!(true));
        assert_eq!(out["features"], json!(["auto_fab"]));
    }

    // -----------------------------------------------------------------------
    // Test 4: failing step propagates
    // -----------------------------------------------------------------------
    #[test]
    fn failing_step_propagates() {
        let mut registry = MigrationRegistry::new();
        registry.register(5, fail);
        let err = registry.migrate(json!({}), 5, 6).unwrap_err();
        assert!(matches!(err, MigrationError::MigrationFailed { .. }));
    }

    #[test]
    fn downgrade_is_refused() {
        let registry = MigrationRegistry::standard();
        assert!(registry.migrate(json!({}), 2, 1).is_err());
        assert!(!registry.can_migrate(2, 1));
    }

    #[test]
    fn v1_flags_become_features() {
        let v1 = json!({
            "auto_mining_unlocked": true,
            "auto_fab_unlocked": false,
            "singularity_reached": true,
            "total_flops": "__D__5e20",
        });
        let v2 = migrate_v1_to_v2(v1).unwrap();
        assert_eq!(v2["features"], json!(["auto_miner", "singularity"]));
        assert!(v2.get("auto_mining_unlocked").is_none());
        assert_eq!(v2["total_flops"], json!("__D__5e20"));
    }

    #[test]
    fn v1_rejects_non_object() {
        assert!(migrate_v1_to_v2(json!([1, 2])).is_err());
    }
}
