//! CLI configuration defaults

use anyhow::{Context, Result};
use sqlite_dump_core::DumpConfig;

/// Option defaults read from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvDefaults {
    /// SQLITE3DUMP_MIGRATION
    pub migration: bool,
    /// SQLITE3DUMP_DROP_IF_EXISTS
    pub drop_if_exists: bool,
    /// SQLITE3DUMP_NO_TRANSACTION
    pub no_transaction: bool,
    /// SQLITE3DUMP_DATA
    pub data: bool,
}

impl EnvDefaults {
    /// Load defaults from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| -> Result<bool> {
            match lookup(key) {
                Some(value) => parse_flag(&value).with_context(|| format!("Invalid {}", key)),
                None => Ok(false),
            }
        };

        Ok(Self {
            migration: flag("SQLITE3DUMP_MIGRATION")?,
            drop_if_exists: flag("SQLITE3DUMP_DROP_IF_EXISTS")?,
            no_transaction: flag("SQLITE3DUMP_NO_TRANSACTION")?,
            data: flag("SQLITE3DUMP_DATA")?,
        })
    }

    /// Merge with command-line flags; a flag given on the command line always wins
    pub fn dump_config(
        &self,
        migration: bool,
        drop_if_exists: bool,
        no_transaction: bool,
        data: bool,
    ) -> DumpConfig {
        let mut config = DumpConfig::new();
        if self.migration || migration {
            config = config.migration();
        }
        if self.drop_if_exists || drop_if_exists {
            config = config.drop_if_exists();
        }
        if self.no_transaction || no_transaction {
            config = config.without_transaction();
        }
        if self.data || data {
            config = config.with_rows();
        }
        config
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {:?}", other),
    }
}
