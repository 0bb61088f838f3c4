// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the Battlesnake bot

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::simulation::Rules;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub evaluation: EvaluationWeights,
    pub game_rules: GameRulesConfig,
    pub decision: DecisionConfig,
    pub debug: DebugConfig,
}

/// Timing and performance constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
    pub polling_interval_ms: u64,
    pub min_time_remaining_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Look-ahead search limits. Depth counts plies: one own move plus one
/// opponent reply is two plies.
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub enabled: bool,
    pub initial_depth: u8,
    pub max_depth: u8,
}

/// Weights for the terminal evaluation of a simulated board
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EvaluationWeights {
    pub survival_bonus: f64,
    pub weight_health: f64,
    pub weight_length: f64,
    pub weight_space: f64,
    /// Flood fill stops counting after this many cells
    pub space_cap: usize,
}

/// Game rules constants
#[derive(Debug, Deserialize, Clone)]
pub struct GameRulesConfig {
    pub max_health: i32,
}

impl GameRulesConfig {
    pub fn rules(&self) -> Rules {
        Rules {
            max_health: self.max_health,
        }
    }
}

/// Random source configuration for the decision pipeline
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DecisionConfig {
    /// Fixed seed for reproducible games; omitted means seed from the OS
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
                polling_interval_ms: 10,
                min_time_remaining_ms: 20,
            },
            search: SearchConfig {
                enabled: true,
                initial_depth: 2,
                max_depth: 8,
            },
            evaluation: EvaluationWeights {
                survival_bonus: 1000.0,
                weight_health: 50.0,
                weight_length: 10.0,
                weight_space: 2.0,
                space_cap: 121,
            },
            game_rules: GameRulesConfig { max_health: 100 },
            decision: DecisionConfig { seed: None },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_budget_calculation() {
        let config = Config::default_hardcoded();
        assert_eq!(config.timing.effective_budget_ms(), 350);
    }

    #[test]
    fn test_rules_come_from_game_rules_section() {
        let config = Config::default_hardcoded();
        assert_eq!(config.game_rules.rules(), Rules::default());
    }

    #[test]
    fn test_snake_toml_can_be_parsed() {
        // This test ensures Snake.toml is valid and can be parsed
        let result = Config::from_file("Snake.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Snake.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Snake.toml").expect("Snake.toml should be parseable");
        let hardcoded_config = Config::default_hardcoded();

        // Timing
        assert_eq!(
            file_config.timing.response_time_budget_ms,
            hardcoded_config.timing.response_time_budget_ms
        );
        assert_eq!(
            file_config.timing.network_overhead_ms,
            hardcoded_config.timing.network_overhead_ms
        );
        assert_eq!(
            file_config.timing.polling_interval_ms,
            hardcoded_config.timing.polling_interval_ms
        );
        assert_eq!(
            file_config.timing.min_time_remaining_ms,
            hardcoded_config.timing.min_time_remaining_ms
        );

        // Search
        assert_eq!(file_config.search.enabled, hardcoded_config.search.enabled);
        assert_eq!(
            file_config.search.initial_depth,
            hardcoded_config.search.initial_depth
        );
        assert_eq!(file_config.search.max_depth, hardcoded_config.search.max_depth);

        // Evaluation
        assert_eq!(file_config.evaluation, hardcoded_config.evaluation);

        // Game Rules
        assert_eq!(
            file_config.game_rules.max_health,
            hardcoded_config.game_rules.max_health
        );

        // Decision
        assert_eq!(file_config.decision.seed, hardcoded_config.decision.seed);

        // Debug
        assert_eq!(file_config.debug.enabled, hardcoded_config.debug.enabled);
        assert_eq!(
            file_config.debug.log_file_path,
            hardcoded_config.debug.log_file_path
        );
    }

    #[test]
    fn test_seed_is_optional() {
        let toml = r#"
            [timing]
            response_time_budget_ms = 500
            network_overhead_ms = 100
            polling_interval_ms = 5
            min_time_remaining_ms = 10

            [search]
            enabled = false
            initial_depth = 2
            max_depth = 4

            [evaluation]
            survival_bonus = 1.0
            weight_health = 1.0
            weight_length = 1.0
            weight_space = 1.0
            space_cap = 10

            [game_rules]
            max_health = 42

            [decision]
            seed = 1234

            [debug]
            enabled = false
            log_file_path = "x.jsonl"
        "#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.decision.seed, Some(1234));
        assert_eq!(config.game_rules.rules().max_health, 42);

        let without_seed = toml.replace("seed = 1234", "");
        let config = Config::from_toml_str(&without_seed).unwrap();
        assert_eq!(config.decision.seed, None);
    }

    #[test]
    fn test_load_or_default_works() {
        let config = Config::load_or_default();
        assert_eq!(config.game_rules.max_health, 100);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        // Test with a non-existent file
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());

        assert!(Config::from_toml_str("[timing]\nresponse_time_budget_ms = \"soon\"").is_err());
    }
}
