//! Error types for rulechain.
//!
//! Errors only arise while *building* a rule base (validating facts and
//! rules, reading rule files). The chaining engines are total functions and
//! never fail: an unknown goal or fact is an ordinary negative outcome that
//! shows up in the trace.

use std::path::PathBuf;

use thiserror::Error;

/// Validation errors raised while constructing facts and rules.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Fact cannot be empty")]
    EmptyFact,

    #[error("Invalid fact token '{token}': {reason}")]
    InvalidFact {
        token: String,
        reason: String,
    },

    #[error("Rule must have at least one condition")]
    EmptyConditions,

    #[error("Rule explanation cannot be empty")]
    EmptyExplanation,

    #[error("Rule concluding '{conclusion}' lists its own conclusion as a condition")]
    SelfConcludingRule {
        conclusion: String,
    },
}

/// Errors raised while loading a rule base from its JSON definition.
#[derive(Debug, Error)]
pub enum RuleBaseError {
    #[error("Failed to read rule base {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rule base: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rule {index} is invalid: {source}")]
    InvalidRule {
        index: usize,
        #[source]
        source: ValidationError,
    },
}

impl RuleBaseError {
    /// Returns true if the rule base could be read but not understood.
    #[must_use]
    pub const fn is_definition_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::InvalidRule { .. })
    }
}

/// Result type alias for rule-base construction.
pub type RuleBaseResult<T> = Result<T, RuleBaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_concluding_message_names_fact() {
        let err = ValidationError::SelfConcludingRule {
            conclusion: "fever".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("'fever'"));
        assert!(msg.contains("own conclusion"));
    }

    #[test]
    fn test_invalid_rule_carries_index() {
        let err = RuleBaseError::InvalidRule {
            index: 3,
            source: ValidationError::EmptyConditions,
        };
        let msg = format!("{err}");
        assert!(msg.contains("Rule 3"));
        assert!(msg.contains("at least one condition"));
        assert!(err.is_definition_error());
    }

    #[test]
    fn test_io_error_is_not_definition_error() {
        let err = RuleBaseError::Io {
            path: PathBuf::from("/missing/rules.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(!err.is_definition_error());
        assert!(format!("{err}").contains("/missing/rules.json"));
    }
}
