//! Facts: opaque symbolic propositions.
//!
//! A fact is either known or not yet known; there are no partial truth
//! values. The engines treat every token as an ordinary atom, including
//! tokens that no rule mentions. Token-shape validation only applies to rule
//! definitions (see [`Fact::parse`]).

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Accepted shape for tokens that appear in rule definitions.
const FACT_TOKEN_PATTERN: &str = r"^[A-Za-z0-9_][A-Za-z0-9_\-]*$";

static FACT_TOKEN: OnceLock<Regex> = OnceLock::new();

fn fact_token_regex() -> &'static Regex {
    FACT_TOKEN
        .get_or_init(|| Regex::new(FACT_TOKEN_PATTERN).expect("fact token pattern is a valid regex"))
}

/// A boolean proposition identified by a symbolic token, e.g. `fever`.
///
/// # Examples
///
/// ```
/// use rulechain::Fact;
///
/// let fever = Fact::parse("fever").unwrap();
/// assert_eq!(fever.as_str(), "fever");
/// assert!(Fact::parse("two words").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fact(String);

impl Fact {
    /// Creates a fact from any token without validation.
    ///
    /// Used for caller-supplied facts and goals, which the engines accept
    /// verbatim.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Parses a rule-definition token.
    ///
    /// # Validation
    /// - Surrounding whitespace is trimmed.
    /// - The token must be non-empty.
    /// - The token may only contain ASCII letters, digits, `_` and `-`, and
    ///   must not start with `-`.
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyFact);
        }
        if !fact_token_regex().is_match(trimmed) {
            return Err(ValidationError::InvalidFact {
                token: trimmed.to_string(),
                reason: format!("expected a token matching {FACT_TOKEN_PATTERN}"),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the fact and returns the token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Fact {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Fact {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Fact {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Fact {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// A set of known facts.
///
/// Ordered so that iteration, rendering and serialization are identical on
/// every platform.
pub type FactSet = BTreeSet<Fact>;

/// Builds a [`FactSet`] from tokens.
///
/// ```
/// use rulechain::fact_set;
///
/// let known = fact_set(["fever", "cough"]);
/// assert!(known.contains("fever"));
/// ```
pub fn fact_set<I, T>(tokens: I) -> FactSet
where
    I: IntoIterator<Item = T>,
    T: Into<Fact>,
{
    tokens.into_iter().map(Into::into).collect()
}
