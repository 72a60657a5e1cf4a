//! Configuration for the masternode payment voting subsystem.
//!
//! Follows the host daemon's config conventions: a `serde`-derived struct
//! with `#[serde(default = ..)]` fallbacks, loaded from TOML by the host and
//! handed to `PaymentsCore::new` already parsed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    /// Whether this node casts its own payment votes when it is a masternode.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Never vote even if `enabled` and this node holds a masternode identity.
    #[serde(default = "default_false")]
    pub lite_mode: bool,

    /// Floor for the retention window before the registry-size-scaled term.
    #[serde(default = "default_min_blocks_to_store")]
    pub min_blocks_to_store: i64,

    /// Height at which superblocks replace the masternode-payment check.
    pub superblock_start_height: i64,

    /// Last height of the legacy (pre-superblock) budget tolerance window.
    #[serde(default)]
    pub old_budget_window_end_height: i64,

    /// Minimum protocol version required before the "pay updated nodes" spork is active.
    pub legacy_min_protocol_version: u32,

    /// Minimum protocol version required once "pay updated nodes" is active.
    pub upgraded_min_protocol_version: u32,

    pub logging: LoggingConfig,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lite_mode: false,
            min_blocks_to_store: default_min_blocks_to_store(),
            superblock_start_height: i64::MAX,
            old_budget_window_end_height: 0,
            legacy_min_protocol_version: 70000,
            upgraded_min_protocol_version: 70015,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_min_blocks_to_store() -> i64 {
    crate::constants::payments::MIN_BLOCKS_TO_STORE
}
