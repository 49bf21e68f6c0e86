//! The rule store: an ordered, read-only sequence of rules.
//!
//! A store is built once (from the built-in rule base or a JSON definition)
//! and never mutated afterwards. It is `Send + Sync` and can be shared across
//! threads by reference or `Arc` without locking; every chaining run owns its
//! own working fact set.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RuleBaseError, RuleBaseResult, ValidationError};
use crate::fact::{Fact, FactSet};
use crate::inference::{self, ForwardChainResult, ProofResult};
use crate::knowledge_base;
use crate::rule::{self, Rule};

/// External definition shape of one rule: a condition list, a conclusion and
/// an explanation. A rule base file is a JSON array of these, in store order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Condition tokens (duplicates are ignored).
    pub conditions: Vec<String>,

    /// Conclusion token.
    pub conclusion: String,

    /// Human-readable explanation.
    pub explanation: String,
}

impl RuleDefinition {
    /// Validate this definition into a [`Rule`].
    pub fn into_rule(self) -> Result<Rule, ValidationError> {
        Rule::from_tokens(self.conditions, &self.conclusion, self.explanation)
    }
}

impl From<&Rule> for RuleDefinition {
    fn from(rule: &Rule) -> Self {
        Self {
            conditions: rule.conditions.iter().map(|c| c.as_str().to_string()).collect(),
            conclusion: rule.conclusion.as_str().to_string(),
            explanation: rule.explanation.clone(),
        }
    }
}

/// Ordered, immutable rule sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleStore {
    rules: Vec<Rule>,
}

impl RuleStore {
    /// Wraps an already-built rule sequence, keeping its order.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Validates definitions in order. The first invalid definition aborts
    /// the load and is reported by index.
    pub fn from_definitions(definitions: Vec<RuleDefinition>) -> RuleBaseResult<Self> {
        let mut rules = Vec::with_capacity(definitions.len());
        for (index, def) in definitions.into_iter().enumerate() {
            let rule = def
                .into_rule()
                .map_err(|source| RuleBaseError::InvalidRule { index, source })?;
            rules.push(rule);
        }
        Ok(Self::new(rules))
    }

    /// The built-in health-assistant rule base.
    #[must_use]
    pub fn health_assistant() -> Self {
        Self::from_definitions(knowledge_base::health_assistant_definitions())
            .expect("built-in rule base is valid")
    }

    /// Parses a JSON array of rule definitions.
    pub fn from_json_str(json: &str) -> RuleBaseResult<Self> {
        let definitions: Vec<RuleDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
    }

    /// Parses a JSON array of rule definitions from a reader.
    pub fn from_json_reader<R: Read>(reader: R) -> RuleBaseResult<Self> {
        let definitions: Vec<RuleDefinition> = serde_json::from_reader(reader)?;
        Self::from_definitions(definitions)
    }

    /// Loads a rule base file.
    pub fn load(path: impl AsRef<Path>) -> RuleBaseResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RuleBaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json_reader(BufReader::new(file))?;
        debug!(path = %path.display(), rules = store.len(), "loaded rule base");
        Ok(store)
    }

    /// Encodes the store back into its JSON definition shape.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.definitions())
    }

    /// Returns the store as external definitions, in order.
    #[must_use]
    pub fn definitions(&self) -> Vec<RuleDefinition> {
        self.rules.iter().map(RuleDefinition::from).collect()
    }

    /// Rules in store order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Alias of [`RuleStore::rules`], for passing to the engines directly.
    #[must_use]
    pub fn as_slice(&self) -> &[Rule] {
        &self.rules
    }

    /// Iterates rules in store order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the store holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every fact appearing in some rule's conditions (selectable symptoms).
    #[must_use]
    pub fn condition_facts(&self) -> BTreeSet<&Fact> {
        self.rules
            .iter()
            .flat_map(|r| r.conditions.iter())
            .collect()
    }

    /// Every fact appearing as some rule's conclusion (valid goals).
    #[must_use]
    pub fn conclusion_facts(&self) -> BTreeSet<&Fact> {
        self.rules.iter().map(|r| &r.conclusion).collect()
    }

    /// The full vocabulary: condition and conclusion facts together.
    #[must_use]
    pub fn all_facts(&self) -> BTreeSet<&Fact> {
        let mut all = self.condition_facts();
        all.extend(self.rules.iter().map(|r| &r.conclusion));
        all
    }

    /// Rules concluding `goal`, in store order.
    pub fn rules_concluding<'a>(&'a self, goal: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        rule::rules_concluding(&self.rules, goal).map(|(_, r)| r)
    }

    /// Content hash of the store (blake3, hex).
    ///
    /// Two stores with the same rules in the same order hash identically.
    /// Every field is length-prefixed, so no field content can be mistaken
    /// for a boundary between fields or rules.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.rules.len() as u64).to_le_bytes());
        for rule in &self.rules {
            hasher.update(&(rule.conditions.len() as u64).to_le_bytes());
            for c in &rule.conditions {
                hash_field(&mut hasher, c.as_str());
            }
            hash_field(&mut hasher, rule.conclusion.as_str());
            hash_field(&mut hasher, &rule.explanation);
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Forward-chains `initial` against this store.
    #[must_use]
    pub fn forward_chain(&self, initial: &FactSet) -> ForwardChainResult {
        inference::forward_chain(initial, &self.rules)
    }

    /// Tries to prove `goal` from `known` against this store.
    #[must_use]
    pub fn prove_goal(&self, goal: &Fact, known: &FactSet) -> ProofResult {
        inference::prove_goal(goal, known, &self.rules)
    }
}

fn hash_field(hasher: &mut blake3::Hasher, field: &str) {
    hasher.update(&(field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

impl<'a> IntoIterator for &'a RuleStore {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl Serialize for RuleStore {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.rules.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleStore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let definitions = Vec::<RuleDefinition>::deserialize(deserializer)?;
        RuleStore::from_definitions(definitions).map_err(serde::de::Error::custom)
    }
}
