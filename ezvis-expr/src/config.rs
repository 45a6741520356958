//! TOML configuration for the expression engine.

use serde::Deserialize;
use thiserror::Error;

/// Default bound on the number of clauses a normal form may contain.
pub const DEFAULT_MAX_CLAUSES: usize = 10_000;

/// Default bound on the total number of terms across all clauses.
pub const DEFAULT_MAX_TERMS: usize = 1_000_000;

/// Default bound on parenthesis nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Errors from engine configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read engine config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse engine config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid engine config: {0}")]
    Invalid(String),
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Resource bounds applied to every parse and normalization.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Resource bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LimitsConfig {
    /// Maximum clauses in a normal form before `TooComplex` is returned.
    #[serde(default = "default_max_clauses")]
    pub max_clauses: usize,

    /// Maximum terms summed over every clause of a normal form.
    #[serde(default = "default_max_terms")]
    pub max_terms: usize,

    /// Maximum parenthesis nesting accepted by the parser.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_clauses() -> usize {
    DEFAULT_MAX_CLAUSES
}

fn default_max_terms() -> usize {
    DEFAULT_MAX_TERMS
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_clauses: DEFAULT_MAX_CLAUSES,
            max_terms: DEFAULT_MAX_TERMS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file path.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_clauses(mut self, max_clauses: usize) -> Self {
        self.limits.max_clauses = max_clauses;
        self
    }

    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.limits.max_terms = max_terms;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.limits.max_depth = max_depth;
        self
    }

    /// Reject bounds that would make every marking fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_clauses == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_clauses must be at least 1".to_string(),
            ));
        }
        if self.limits.max_terms == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_terms must be at least 1".to_string(),
            ));
        }
        if self.limits.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::parse("").expect("empty config");
        assert_eq!(config.limits, LimitsConfig::default());
        assert_eq!(config.limits.max_clauses, 10_000);
    }

    #[test]
    fn test_partial_limits() {
        let config = EngineConfig::parse(
            r#"
[limits]
max_clauses = 256
            "#,
        )
        .expect("valid config");
        assert_eq!(config.limits.max_clauses, 256);
        assert_eq!(config.limits.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_zero_bound_rejected() {
        let err = EngineConfig::parse("[limits]\nmax_clauses = 0\n").expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::parse("[limits]\nmax_depth = 0\n").expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::parse("[limits]\nmax_terms = 0\n").expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::parse("[limits\n").expect_err("malformed");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file(std::path::Path::new("/nonexistent/ezvis.toml"))
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
