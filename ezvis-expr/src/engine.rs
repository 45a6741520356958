//! The expression engine: parses, evaluates and normalizes visibility markings.

use tracing::{debug, warn};

use crate::config::{ConfigError, EngineConfig};
use crate::error::ExpressionError;
use crate::normalize;
use crate::parse;
use crate::types::{Expression, HeldTerms, NormalForm};

/// The ExpressionEngine.
///
/// Holds only its configured bounds. Every call allocates its own tree or
/// normal form and shares nothing with other calls, so one engine can serve
/// any number of threads.
#[derive(Debug, Clone, Default)]
pub struct ExpressionEngine {
    config: EngineConfig,
}

impl ExpressionEngine {
    /// Create an engine with the given configuration, rejecting zero bounds.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an engine from a TOML configuration string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::new(EngineConfig::parse(content)?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Parse marking text into an expression tree.
    ///
    /// Empty text yields `Ok(None)`, an absent marking that every requester
    /// satisfies. Malformed text is an error and is never repaired.
    pub fn parse(&self, text: &str) -> Result<Option<Expression>, ExpressionError> {
        parse::parse(text, self.config.limits.max_depth).map_err(|e| {
            debug!(marking = text, error = %e, "rejected visibility marking");
            e
        })
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Decide whether `held` satisfies an expression. An absent expression
    /// is always satisfied.
    pub fn evaluate<H: HeldTerms + ?Sized>(&self, expr: Option<&Expression>, held: &H) -> bool {
        expr.map_or(true, |e| e.evaluate(held))
    }

    /// Parse and evaluate in one step.
    pub fn check<H: HeldTerms + ?Sized>(
        &self,
        text: &str,
        held: &H,
    ) -> Result<bool, ExpressionError> {
        let expr = self.parse(text)?;
        Ok(self.evaluate(expr.as_ref(), held))
    }

    // =========================================================================
    // Normalization
    // =========================================================================

    /// Convert an expression to disjunctive normal form.
    ///
    /// An absent expression yields a form with zero clauses. Fails with
    /// `TooComplex` when the expansion would exceed `limits.max_clauses`
    /// clauses or `limits.max_terms` terms in total.
    pub fn normalize(&self, expr: Option<&Expression>) -> Result<NormalForm, ExpressionError> {
        let Some(expr) = expr else {
            return Ok(NormalForm::default());
        };

        normalize::normalize(expr, &self.config.limits).map_err(|e| {
            warn!(expression = %expr, error = %e, "normal form exceeds configured bound");
            e
        })
    }

    /// Parse and normalize in one step.
    pub fn normalize_text(&self, text: &str) -> Result<NormalForm, ExpressionError> {
        let expr = self.parse(text)?;
        self.normalize(expr.as_ref())
    }
}
