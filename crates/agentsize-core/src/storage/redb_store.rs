//! redb-backed config and scenario store.
//!
//! Two tables:
//!
//! | Table       | Key              | Value                          |
//! |-------------|------------------|--------------------------------|
//! | `config`    | `"rules"`        | config snapshot (`AGSZCFG1`)   |
//! | `scenarios` | scenario name    | score set snapshot (`AGSZSCR1`)|
//!
//! Values are the same binary snapshots produced by [`crate::formats`], so a
//! stored config passes full validation every time it is loaded.

use crate::config::RulesConfig;
use crate::dimension::ScoreSet;
use crate::error::{AgentSizeError, Result};
use crate::formats::{decode_config, decode_scores, encode_config, encode_scores};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;

const CONFIG_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("config");
const SCENARIOS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("scenarios");

const RULES_KEY: &str = "rules";

/// Persistent store for the rules configuration and saved scenarios.
pub struct ConfigStore {
    db: Database,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore").finish_non_exhaustive()
    }
}

impl ConfigStore {
    /// Open or create a store at `path`. Both tables exist after this returns.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = Database::create(path).map_err(AgentSizeError::storage)?;

        let txn = db.begin_write().map_err(AgentSizeError::storage)?;
        {
            txn.open_table(CONFIG_TABLE).map_err(AgentSizeError::storage)?;
            txn.open_table(SCENARIOS_TABLE)
                .map_err(AgentSizeError::storage)?;
        }
        txn.commit().map_err(AgentSizeError::storage)?;

        tracing::debug!(path = %path.display(), "opened config store");
        Ok(Self { db })
    }

    // =========================================================================
    // CONFIG
    // =========================================================================

    /// Stored config, or `None` if nothing was saved yet.
    pub fn load_config(&self) -> Result<Option<RulesConfig>> {
        let txn = self.db.begin_read().map_err(AgentSizeError::storage)?;
        let table = txn
            .open_table(CONFIG_TABLE)
            .map_err(AgentSizeError::storage)?;

        match table.get(RULES_KEY).map_err(AgentSizeError::storage)? {
            Some(bytes) => Ok(Some(decode_config(bytes.value())?)),
            None => Ok(None),
        }
    }

    /// Stored config, falling back to the built-in defaults.
    pub fn load_or_default(&self) -> Result<RulesConfig> {
        Ok(self.load_config()?.unwrap_or_default())
    }

    /// Validate and persist a config, replacing whatever was stored.
    pub fn save_config(&self, config: &RulesConfig) -> Result<()> {
        config.validate()?;
        let bytes = encode_config(config)?;

        let txn = self.db.begin_write().map_err(AgentSizeError::storage)?;
        {
            let mut table = txn
                .open_table(CONFIG_TABLE)
                .map_err(AgentSizeError::storage)?;
            table
                .insert(RULES_KEY, bytes.as_slice())
                .map_err(AgentSizeError::storage)?;
        }
        txn.commit().map_err(AgentSizeError::storage)?;

        tracing::debug!(bytes = bytes.len(), "saved rules config");
        Ok(())
    }

    /// Drop the stored config so the defaults apply again.
    ///
    /// Returns `true` if a config was stored.
    pub fn reset_config(&self) -> Result<bool> {
        let txn = self.db.begin_write().map_err(AgentSizeError::storage)?;
        let removed = {
            let mut table = txn
                .open_table(CONFIG_TABLE)
                .map_err(AgentSizeError::storage)?;
            table
                .remove(RULES_KEY)
                .map_err(AgentSizeError::storage)?
                .is_some()
        };
        txn.commit().map_err(AgentSizeError::storage)?;
        Ok(removed)
    }

    // =========================================================================
    // SCENARIOS
    // =========================================================================

    /// Save a named score set, overwriting an existing one.
    pub fn save_scenario(&self, name: &str, scores: &ScoreSet) -> Result<()> {
        if name.trim().is_empty() {
            return Err(AgentSizeError::Storage(
                "scenario name must not be empty".to_string(),
            ));
        }
        let bytes = encode_scores(scores)?;

        let txn = self.db.begin_write().map_err(AgentSizeError::storage)?;
        {
            let mut table = txn
                .open_table(SCENARIOS_TABLE)
                .map_err(AgentSizeError::storage)?;
            table
                .insert(name, bytes.as_slice())
                .map_err(AgentSizeError::storage)?;
        }
        txn.commit().map_err(AgentSizeError::storage)?;

        tracing::debug!(scenario = name, scored = scores.len(), "saved scenario");
        Ok(())
    }

    pub fn load_scenario(&self, name: &str) -> Result<Option<ScoreSet>> {
        let txn = self.db.begin_read().map_err(AgentSizeError::storage)?;
        let table = txn
            .open_table(SCENARIOS_TABLE)
            .map_err(AgentSizeError::storage)?;

        match table.get(name).map_err(AgentSizeError::storage)? {
            Some(bytes) => Ok(Some(decode_scores(bytes.value())?)),
            None => Ok(None),
        }
    }

    /// Scenario names in key order.
    pub fn list_scenarios(&self) -> Result<Vec<String>> {
        let txn = self.db.begin_read().map_err(AgentSizeError::storage)?;
        let table = txn
            .open_table(SCENARIOS_TABLE)
            .map_err(AgentSizeError::storage)?;

        let mut names = Vec::new();
        for entry in table.iter().map_err(AgentSizeError::storage)? {
            let (key, _) = entry.map_err(AgentSizeError::storage)?;
            names.push(key.value().to_string());
        }
        Ok(names)
    }

    /// Returns `true` if the scenario existed.
    pub fn delete_scenario(&self, name: &str) -> Result<bool> {
        let txn = self.db.begin_write().map_err(AgentSizeError::storage)?;
        let removed = {
            let mut table = txn
                .open_table(SCENARIOS_TABLE)
                .map_err(AgentSizeError::storage)?;
            table
                .remove(name)
                .map_err(AgentSizeError::storage)?
                .is_some()
        };
        txn.commit().map_err(AgentSizeError::storage)?;
        Ok(removed)
    }
}

// =============================================================================
// TESTS
// =============================================================================
