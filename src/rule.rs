//! Rules: condition sets licensing a single conclusion.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::fact::{Fact, FactSet};

/// A non-empty, order-preserving, deduplicated list of condition facts.
///
/// - Empty lists are rejected.
/// - Duplicate facts are ignored (first occurrence wins).
///
/// Order carries no meaning for satisfaction, but it is the order in which
/// backward chaining attempts sub-goals, so it is kept stable to make proof
/// traces reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConditionSet(Vec<Fact>);

impl ConditionSet {
    /// Construct a validated condition set.
    pub fn new(conditions: Vec<Fact>) -> Result<Self, ValidationError> {
        let mut seen: HashSet<Fact> = HashSet::with_capacity(conditions.len());
        let mut deduped: Vec<Fact> = Vec::with_capacity(conditions.len());
        for fact in conditions {
            if seen.insert(fact.clone()) {
                deduped.push(fact);
            }
        }

        if deduped.is_empty() {
            return Err(ValidationError::EmptyConditions);
        }
        Ok(Self(deduped))
    }

    /// Parse rule-definition tokens into a condition set.
    pub fn parse<I, S>(tokens: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let facts = tokens
            .into_iter()
            .map(|t| Fact::parse(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(facts)
    }

    /// Returns the conditions in declaration order.
    #[must_use]
    pub fn as_slice(&self) -> &[Fact] {
        &self.0
    }

    /// Iterates the conditions in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Fact> {
        self.0.iter()
    }

    /// Number of distinct conditions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a validated set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `fact` is one of the conditions.
    #[must_use]
    pub fn contains(&self, fact: &str) -> bool {
        self.0.iter().any(|c| c.as_str() == fact)
    }

    /// Returns true if every condition is in `known`.
    #[must_use]
    pub fn is_subset_of(&self, known: &FactSet) -> bool {
        self.0.iter().all(|c| known.contains(c))
    }
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a Fact;
    type IntoIter = std::slice::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for ConditionSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        ConditionSet::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// An immutable inference rule: `conditions ⇒ conclusion`.
///
/// Fields are public so a rule base can be inspected freely. Constructing a
/// rule through a struct literal skips validation; the engines tolerate such
/// rules (a rule whose conclusion is among its own conditions simply never
/// fires).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Rule {
    /// Facts that must all be known for the rule to apply.
    pub conditions: ConditionSet,

    /// The single fact the rule licenses.
    pub conclusion: Fact,

    /// Human-readable explanation used in traces.
    pub explanation: String,
}

impl Rule {
    /// Construct a validated rule.
    ///
    /// # Validation
    /// - `explanation` must not be blank (it is trimmed).
    /// - `conclusion` must not appear among `conditions`.
    pub fn new(
        conditions: ConditionSet,
        conclusion: Fact,
        explanation: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let explanation = explanation.into();
        let trimmed = explanation.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyExplanation);
        }
        if conditions.contains(conclusion.as_str()) {
            return Err(ValidationError::SelfConcludingRule {
                conclusion: conclusion.into_inner(),
            });
        }

        Ok(Self {
            conditions,
            conclusion,
            explanation: trimmed.to_string(),
        })
    }

    /// Construct a validated rule from rule-definition tokens.
    pub fn from_tokens<I, S>(
        conditions: I,
        conclusion: &str,
        explanation: impl Into<String>,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let conditions = ConditionSet::parse(conditions)?;
        let conclusion = Fact::parse(conclusion)?;
        Self::new(conditions, conclusion, explanation)
    }

    /// Returns true if every condition is in `known`.
    #[must_use]
    pub fn is_satisfied_by(&self, known: &FactSet) -> bool {
        self.conditions.is_subset_of(known)
    }

    /// Returns true if this rule concludes `goal`.
    #[must_use]
    pub fn concludes(&self, goal: &str) -> bool {
        self.conclusion.as_str() == goal
    }
}

/// Rules in `rules` concluding `goal`, with their slice index, in slice order.
pub fn rules_concluding<'a>(
    rules: &'a [Rule],
    goal: &'a str,
) -> impl Iterator<Item = (usize, &'a Rule)> + 'a {
    rules
        .iter()
        .enumerate()
        .filter(move |(_, rule)| rule.concludes(goal))
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, " ⇒ {}", self.conclusion)
    }
}

#[derive(Deserialize)]
struct RawRule {
    conditions: ConditionSet,
    conclusion: String,
    explanation: String,
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawRule::deserialize(deserializer)?;
        let conclusion = Fact::parse(&raw.conclusion).map_err(serde::de::Error::custom)?;
        Rule::new(raw.conditions, conclusion, raw.explanation).map_err(serde::de::Error::custom)
    }
}
