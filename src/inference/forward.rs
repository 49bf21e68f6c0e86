use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::fact::{Fact, FactSet};
use crate::rule::Rule;
use crate::trace::FiredRule;

/// Outcome of a forward-chaining run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardChainResult {
    /// Closure of the initial facts under the rules.
    pub facts: FactSet,

    /// One step per firing, in firing order.
    pub trace: Vec<FiredRule>,

    /// Number of full scans over the rules, including the final scan that
    /// produced no change.
    pub passes: usize,
}

impl ForwardChainResult {
    /// Facts added by the run (`facts \ initial`), sorted.
    ///
    /// Every firing adds exactly one fact that was not yet known, so this is
    /// the set of trace conclusions.
    #[must_use]
    pub fn inferred(&self) -> BTreeSet<&Fact> {
        self.trace.iter().map(|step| &step.conclusion).collect()
    }

    /// Returns true if no rule fired.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.trace.is_empty()
    }
}

/// Saturates `initial` under `rules` until no rule adds a new fact.
///
/// Rules are scanned in slice order. A rule fires when all of its conditions
/// are known and its conclusion is not; firing records a trace step and adds
/// the conclusion immediately, so later rules in the same scan can use it.
/// Scanning repeats until a full scan fires nothing.
///
/// Each non-final scan adds at least one fact and a fact is added at most
/// once, so the run performs at most `|facts| + 1` scans.
///
/// `initial` is copied; the caller's set is left untouched.
#[must_use]
pub fn forward_chain(initial: &FactSet, rules: &[Rule]) -> ForwardChainResult {
    let mut known = initial.clone();
    let mut trace = Vec::new();
    let mut passes = 0usize;

    loop {
        passes += 1;
        let mut changed = false;

        for (rule_index, rule) in rules.iter().enumerate() {
            if known.contains(&rule.conclusion) || !rule.is_satisfied_by(&known) {
                continue;
            }

            debug!(
                rule_index,
                pass = passes,
                conclusion = %rule.conclusion,
                "rule fired"
            );
            trace.push(FiredRule::from_rule(rule_index, passes, rule));
            known.insert(rule.conclusion.clone());
            changed = true;
        }

        if !changed {
            break;
        }
    }

    debug!(
        passes,
        initial = initial.len(),
        inferred = trace.len(),
        "forward chaining reached fixpoint"
    );

    ForwardChainResult {
        facts: known,
        trace,
        passes,
    }
}
