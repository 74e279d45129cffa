//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `lie-theory-config.yaml` next to the
//! engine binary. Every field has a default matching the shipped theory, so
//! an empty file (or no file at all) reproduces the stock balance.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::cost::CostCurve;
use crate::publication::PublicationFormula;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an unusable setup.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `lie-theory-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TheoryConfig {
    /// Balance of the theory itself.
    #[serde(default)]
    pub theory: BalanceConfig,

    /// Headless simulation settings.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where results are written.
    #[serde(default)]
    pub output: OutputConfig,
}

impl TheoryConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `LIE_THEORY_MAX_TICKS` overrides `simulation.max_ticks`
    /// - `LIE_THEORY_SNAPSHOT_PATH` overrides `output.snapshot_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Some(max_ticks) = std::env::var("LIE_THEORY_MAX_TICKS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.simulation.max_ticks = max_ticks;
        }
        if let Ok(path) = std::env::var("LIE_THEORY_SNAPSHOT_PATH") {
            self.output.snapshot_path = Some(PathBuf::from(path));
        }
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.tick_seconds <= Decimal::ZERO {
            return Err(ConfigError::Invalid {
                reason: "simulation.tick_seconds must be positive".to_owned(),
            });
        }
        if self.simulation.speed_multiplier.is_sign_negative() {
            return Err(ConfigError::Invalid {
                reason: "simulation.speed_multiplier must not be negative".to_owned(),
            });
        }
        if self.simulation.publish_ratio < Decimal::ONE {
            return Err(ConfigError::Invalid {
                reason: "simulation.publish_ratio must be at least 1".to_owned(),
            });
        }
        if self.theory.publication.divisor.is_zero() {
            return Err(ConfigError::Invalid {
                reason: "theory.publication.divisor must not be zero".to_owned(),
            });
        }
        self.theory.validate_prices()
    }
}

impl BalanceConfig {
    /// Reject curves or permanent prices that go below zero.
    fn validate_prices(&self) -> Result<(), ConfigError> {
        for (name, curve) in [
            ("c1_cost", &self.c1_cost),
            ("c2_cost", &self.c2_cost),
            ("milestone_thresholds", &self.milestone_thresholds),
        ] {
            if !curve.is_non_negative() {
                return Err(ConfigError::Invalid {
                    reason: format!("theory.{name} must not have negative parameters"),
                });
            }
        }
        let costs = &self.permanent_costs;
        for (name, price) in [
            ("publication", costs.publication),
            ("buy_all", costs.buy_all),
            ("auto_buyer", costs.auto_buyer),
        ] {
            if price < Decimal::ZERO {
                return Err(ConfigError::Invalid {
                    reason: format!("theory.permanent_costs.{name} must not be negative"),
                });
            }
        }
        Ok(())
    }
}

/// Prices and formulas of the theory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BalanceConfig {
    /// Cost curve of `c1`.
    #[serde(default = "default_c1_cost")]
    pub c1_cost: CostCurve,

    /// Cost curve of `c2`.
    #[serde(default = "default_c2_cost")]
    pub c2_cost: CostCurve,

    /// Tau needed for each milestone point.
    #[serde(default = "default_milestone_thresholds")]
    pub milestone_thresholds: CostCurve,

    /// Publication multiplier formula.
    #[serde(default)]
    pub publication: PublicationFormula,

    /// Prices of the permanent upgrades.
    #[serde(default)]
    pub permanent_costs: PermanentCosts,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            c1_cost: default_c1_cost(),
            c2_cost: default_c2_cost(),
            milestone_thresholds: default_milestone_thresholds(),
            publication: PublicationFormula::default(),
            permanent_costs: PermanentCosts::default(),
        }
    }
}

/// Prices of the permanent upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PermanentCosts {
    /// Price of unlocking publications.
    #[serde(default = "default_publication_cost")]
    pub publication: Decimal,

    /// Price of the buy-all upgrade.
    #[serde(default = "default_buy_all_cost")]
    pub buy_all: Decimal,

    /// Price of the autobuyer.
    #[serde(default = "default_auto_buyer_cost")]
    pub auto_buyer: Decimal,
}

impl Default for PermanentCosts {
    fn default() -> Self {
        Self {
            publication: default_publication_cost(),
            buy_all: default_buy_all_cost(),
            auto_buyer: default_auto_buyer_cost(),
        }
    }
}

/// Which purchase strategy drives the headless simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Buy whatever is affordable, cheapest first.
    #[default]
    Greedy,
    /// Never buy anything.
    Idle,
}

/// Headless simulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Game seconds elapsed per tick.
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: Decimal,

    /// Host speed multiplier applied to every tick.
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: Decimal,

    /// Stop after this many ticks (0 = unlimited).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Stop once tau reaches this value.
    #[serde(default)]
    pub target_tau: Option<Decimal>,

    /// Real-time milliseconds to wait between ticks (0 = no wait).
    #[serde(default)]
    pub tick_interval_ms: u64,

    /// Purchase strategy.
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Publish whenever it improves the multiplier.
    #[serde(default = "default_true")]
    pub publish_automatically: bool,

    /// Greedy strategy publishes once the new multiplier is at least this
    /// many times the current one.
    #[serde(default = "default_publish_ratio")]
    pub publish_ratio: Decimal,

    /// Switch the autobuyer on once it is bought.
    #[serde(default = "default_true")]
    pub autobuyer_enabled: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_seconds: default_tick_seconds(),
            speed_multiplier: default_speed_multiplier(),
            max_ticks: default_max_ticks(),
            target_tau: None,
            tick_interval_ms: 0,
            strategy: StrategyKind::default(),
            publish_automatically: true,
            publish_ratio: default_publish_ratio(),
            autobuyer_enabled: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log a progress summary every this many ticks (0 = never).
    #[serde(default = "default_summary_interval_ticks")]
    pub summary_interval_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            summary_interval_ticks: default_summary_interval_ticks(),
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Write the final [`TheorySnapshot`] as JSON here.
    ///
    /// [`TheorySnapshot`]: lie_theory_types::TheorySnapshot
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

fn default_c1_cost() -> CostCurve {
    CostCurve::first_free(CostCurve::exponential(Decimal::from(5), Decimal::TWO))
}

fn default_c2_cost() -> CostCurve {
    CostCurve::exponential(Decimal::from(5), Decimal::TEN)
}

fn default_milestone_thresholds() -> CostCurve {
    CostCurve::exponential(Decimal::from(150), Decimal::TEN)
}

fn default_publication_cost() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_buy_all_cost() -> Decimal {
    Decimal::from(10_000_000_000_u64)
}

fn default_auto_buyer_cost() -> Decimal {
    Decimal::from(1_000_000_000_000_000_u64)
}

const fn default_tick_seconds() -> Decimal {
    Decimal::from_parts(1, 0, 0, false, 1)
}

const fn default_publish_ratio() -> Decimal {
    Decimal::TWO
}

const fn default_speed_multiplier() -> Decimal {
    Decimal::ONE
}

const fn default_max_ticks() -> u64 {
    36_000
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_summary_interval_ticks() -> u64 {
    600
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_config_matches_shipped_theory() {
        let config = TheoryConfig::default();
        assert_eq!(config.theory.c1_cost.cost(0), Some(Decimal::ZERO));
        assert_eq!(config.theory.c1_cost.cost(1), Some(dec!(5)));
        assert_eq!(config.theory.c2_cost.cost(2), Some(dec!(500)));
        assert_eq!(config.theory.milestone_thresholds.cost(1), Some(dec!(1500)));
        assert_eq!(config.theory.permanent_costs.publication, dec!(100));
        assert_eq!(config.theory.permanent_costs.buy_all, dec!(10000000000));
        assert_eq!(config.simulation.tick_seconds, dec!(0.1));
        assert_eq!(config.simulation.strategy, StrategyKind::Greedy);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
theory:
  c1_cost:
    kind: exponential
    base: 3
    growth: 2
  c2_cost:
    kind: free
  milestone_thresholds:
    kind: exponential
    base: 10
    growth: 10
  publication:
    exponent: "0.2"
    divisor: 2
  permanent_costs:
    publication: 50
    buy_all: 1000
    auto_buyer: 2000

simulation:
  tick_seconds: "0.5"
  speed_multiplier: 2
  max_ticks: 100
  target_tau: 1000000
  tick_interval_ms: 5
  strategy: idle
  publish_automatically: false
  autobuyer_enabled: false

logging:
  level: "debug"
  summary_interval_ticks: 10

output:
  snapshot_path: "out/snapshot.json"
"#;

        let config = TheoryConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.theory.c1_cost.cost(2), Some(dec!(12)));
        assert_eq!(config.theory.c2_cost, CostCurve::Free);
        assert_eq!(config.theory.publication.exponent, dec!(0.2));
        assert_eq!(config.theory.permanent_costs.auto_buyer, dec!(2000));
        assert_eq!(config.simulation.tick_seconds, dec!(0.5));
        assert_eq!(config.simulation.target_tau, Some(dec!(1000000)));
        assert_eq!(config.simulation.strategy, StrategyKind::Idle);
        assert!(!config.simulation.publish_automatically);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.output.snapshot_path,
            Some(PathBuf::from("out/snapshot.json"))
        );
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "simulation:\n  max_ticks: 7\n";
        let config = TheoryConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.simulation.max_ticks, 7);
        assert_eq!(config.simulation.tick_seconds, dec!(0.1));
        assert_eq!(config.theory, BalanceConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        let config = TheoryConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn rejects_non_positive_tick() {
        let result = TheoryConfig::parse("simulation:\n  tick_seconds: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_negative_prices() {
        let curve = "theory:\n  c1_cost:\n    kind: exponential\n    base: -5\n    growth: 2\n";
        let result = TheoryConfig::parse(curve);
        assert!(
            matches!(&result, Err(ConfigError::Invalid { reason }) if reason.contains("c1_cost")),
            "{result:?}"
        );

        let nested = "theory:\n  c2_cost:\n    kind: first_free\n    inner:\n      kind: linear\n      base: 1\n      progress: -1\n";
        assert!(matches!(
            TheoryConfig::parse(nested),
            Err(ConfigError::Invalid { .. })
        ));

        let permanent = "theory:\n  permanent_costs:\n    auto_buyer: -1\n";
        let result = TheoryConfig::parse(permanent);
        assert!(
            matches!(&result, Err(ConfigError::Invalid { reason }) if reason.contains("auto_buyer")),
            "{result:?}"
        );
    }

    #[test]
    fn rejects_unknown_strategy() {
        let result = TheoryConfig::parse("simulation:\n  strategy: frantic\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("lie-theory-config.yaml");
        if path.exists() {
            let config = TheoryConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
            let config = config.ok().unwrap_or_default();
            assert_eq!(config.theory, BalanceConfig::default());
        }
    }
}
