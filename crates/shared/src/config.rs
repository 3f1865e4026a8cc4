//! Core configuration management.
//!
//! The 0.01 tolerance that gates entry balance, balance-sheet equality,
//! and discrepancy detection lives here as a single value; modules take it
//! as a parameter instead of repeating the literal.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Configuration for the ledger consistency core.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Absolute tolerance for all balance comparisons.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
    /// Well-known account codes used by automated postings.
    #[serde(default)]
    pub accounts: AccountCodes,
    /// Unattended health check behaviour.
    #[serde(default)]
    pub health: HealthConfig,
}

/// Well-known chart-of-accounts codes.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountCodes {
    /// Cost of goods sold expense account.
    #[serde(default = "default_cogs_code")]
    pub cogs_code: String,
    /// Inventory asset account.
    #[serde(default = "default_inventory_code")]
    pub inventory_code: String,
}

/// Scheduled health check configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// Minutes between unattended synchronization checks.
    #[serde(default = "default_check_interval")]
    pub check_interval_minutes: u64,
    /// Whether the scheduled pass heals discrepancies it finds.
    #[serde(default = "default_auto_fix")]
    pub auto_fix: bool,
}

fn default_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_cogs_code() -> String {
    "5101".to_string()
}

fn default_inventory_code() -> String {
    "1301".to_string()
}

fn default_check_interval() -> u64 {
    15
}

fn default_auto_fix() -> bool {
    true
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            accounts: AccountCodes::default(),
            health: HealthConfig::default(),
        }
    }
}

impl Default for AccountCodes {
    fn default() -> Self {
        Self {
            cogs_code: default_cogs_code(),
            inventory_code: default_inventory_code(),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_interval_minutes: default_check_interval(),
            auto_fix: default_auto_fix(),
        }
    }
}

impl CoreConfig {
    /// Loads configuration from config files and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KASIRA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_tolerance() {
        let config = CoreConfig::default();
        assert_eq!(config.tolerance, dec!(0.01));
    }

    #[test]
    fn test_default_account_codes() {
        let config = CoreConfig::default();
        assert_eq!(config.accounts.cogs_code, "5101");
        assert_eq!(config.accounts.inventory_code, "1301");
    }

    #[test]
    fn test_default_health() {
        let config = CoreConfig::default();
        assert_eq!(config.health.check_interval_minutes, 15);
        assert!(config.health.auto_fix);
    }
}
