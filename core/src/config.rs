//! Dump configuration

use serde::{Deserialize, Serialize};

/// A single dump option, for callers that collect options before building a config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpOption {
    /// Skip CREATE TABLE statements and name columns in row inserts
    Migration,
    /// Emit DROP ... IF EXISTS for indexes and tables first
    DropIfExists,
    /// Omit the BEGIN TRANSACTION / COMMIT envelope
    WithoutTransaction,
    /// Emit one INSERT statement per table row
    WithRows,
}

/// Configuration resolved once per dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpConfig {
    pub migration: bool,
    pub drop_if_exists: bool,
    pub wrap_in_transaction: bool,
    pub include_rows: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            migration: false,
            drop_if_exists: false,
            wrap_in_transaction: true,
            include_rows: false,
        }
    }
}

impl DumpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from a list of options; repeated options are harmless
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = DumpOption>,
    {
        options
            .into_iter()
            .fold(Self::default(), |config, option| config.apply(option))
    }

    pub fn apply(self, option: DumpOption) -> Self {
        match option {
            DumpOption::Migration => self.migration(),
            DumpOption::DropIfExists => self.drop_if_exists(),
            DumpOption::WithoutTransaction => self.without_transaction(),
            DumpOption::WithRows => self.with_rows(),
        }
    }

    pub fn migration(mut self) -> Self {
        self.migration = true;
        self
    }

    pub fn drop_if_exists(mut self) -> Self {
        self.drop_if_exists = true;
        self
    }

    pub fn without_transaction(mut self) -> Self {
        self.wrap_in_transaction = false;
        self
    }

    pub fn with_rows(mut self) -> Self {
        self.include_rows = true;
        self
    }
}
