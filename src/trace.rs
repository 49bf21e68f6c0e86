//! Inference traces and their human-readable rendering.
//!
//! Traces are purely observational: the engines append to them but never
//! read them back while reasoning.

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::fact::{Fact, FactSet};
use crate::inference::{ForwardChainResult, ProofResult};
use crate::rule::{ConditionSet, Rule};

/// One forward-chaining firing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FiredRule {
    /// Position of the rule in the store.
    pub rule_index: usize,

    /// Scan (1-based) during which the rule fired.
    pub pass: usize,

    /// The rule's conditions, all known at firing time.
    pub conditions: ConditionSet,

    /// The newly added fact.
    pub conclusion: Fact,

    /// The rule's explanation.
    pub explanation: String,
}

impl FiredRule {
    pub(crate) fn from_rule(rule_index: usize, pass: usize, rule: &Rule) -> Self {
        Self {
            rule_index,
            pass,
            conditions: rule.conditions.clone(),
            conclusion: rule.conclusion.clone(),
            explanation: rule.explanation.clone(),
        }
    }
}

impl fmt::Display for FiredRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → add `{}`", self.explanation, self.conclusion)
    }
}

/// Something that happened during backward proof search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProofEvent {
    /// The goal was among the known facts.
    AlreadyKnown {
        /// Goal.
        goal: Fact,
    },

    /// The goal was already entered in this search and was refused.
    CycleAvoided {
        /// Goal.
        goal: Fact,
    },

    /// No rule has the goal as its conclusion.
    NoRuleConcludes {
        /// Goal.
        goal: Fact,
    },

    /// A rule concluding the goal is being attempted.
    TryingRule {
        /// Goal.
        goal: Fact,
        /// Store index of the rule.
        rule_index: usize,
        /// The rule's explanation.
        explanation: String,
    },

    /// A condition of the current rule could not be proved; the rule is
    /// abandoned.
    ConditionFailed {
        /// Goal of the abandoned rule.
        goal: Fact,
        /// The failing condition.
        condition: Fact,
    },

    /// The goal was proved by a rule.
    Proved {
        /// Goal.
        goal: Fact,
        /// Store index of the proving rule.
        rule_index: usize,
    },

    /// Every rule concluding the goal failed.
    CouldNotProve {
        /// Goal.
        goal: Fact,
    },
}

impl ProofEvent {
    /// Returns true for events that end an attempt on a goal negatively.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::CycleAvoided { .. }
                | Self::NoRuleConcludes { .. }
                | Self::ConditionFailed { .. }
                | Self::CouldNotProve { .. }
        )
    }
}

impl fmt::Display for ProofEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyKnown { goal } => write!(f, "'{goal}' is already known."),
            Self::CycleAvoided { goal } => write!(f, "Cycle on '{goal}' avoided."),
            Self::NoRuleConcludes { goal } => write!(f, "No rules conclude '{goal}'."),
            Self::TryingRule { explanation, .. } => write!(f, "Trying rule: {explanation}"),
            Self::ConditionFailed { condition, .. } => write!(f, "Failed to prove '{condition}'."),
            Self::Proved { goal, .. } => write!(f, "Proved goal '{goal}'."),
            Self::CouldNotProve { goal } => write!(f, "Could not prove '{goal}'."),
        }
    }
}

/// A proof event with the recursion depth at which it happened.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofStep {
    /// 0 for the top-level goal, +1 per sub-goal level.
    pub depth: usize,

    /// What happened.
    #[serde(flatten)]
    pub event: ProofEvent,
}

impl ProofStep {
    /// Creates a step.
    #[must_use]
    pub const fn new(depth: usize, event: ProofEvent) -> Self {
        Self { depth, event }
    }
}

impl fmt::Display for ProofStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.event, f)
    }
}

/// Numbered forward step line, e.g. ``Step 1: ... → add `flu_suspected` ``.
#[must_use]
pub fn forward_step_line(number: usize, step: &FiredRule) -> String {
    format!("Step {number}: {step}")
}

/// Renders the forward trace followed by the inferred facts.
#[must_use]
pub fn render_forward_report(result: &ForwardChainResult) -> String {
    let mut out = String::from("Forward Chaining Trace\n");
    for (i, step) in result.trace.iter().enumerate() {
        let _ = writeln!(out, "{}", forward_step_line(i + 1, step));
    }

    out.push_str("\nFinal Inferred Facts\n");
    let inferred = result.inferred();
    if inferred.is_empty() {
        out.push_str("No new facts inferred.\n");
    } else {
        for fact in inferred {
            let _ = writeln!(out, "- {fact}");
        }
    }
    out
}

/// Renders the proof narration as a bullet list and the verdict.
///
/// With `indent`, each line is indented two spaces per recursion level.
#[must_use]
pub fn render_proof_report(result: &ProofResult, indent: bool) -> String {
    let mut out = String::new();
    for step in &result.trace {
        let pad = if indent { step.depth * 2 } else { 0 };
        let _ = writeln!(out, "{:pad$}- {step}", "");
    }
    out.push_str(if result.proved {
        "Goal PROVED\n"
    } else {
        "Goal NOT proved\n"
    });
    out
}

/// Renders a fact list, one bullet per fact, or `(none)`.
#[must_use]
pub fn render_fact_list<'a, I>(facts: I) -> String
where
    I: IntoIterator<Item = &'a Fact>,
{
    let mut out = String::new();
    for fact in facts {
        let _ = writeln!(out, "- {fact}");
    }
    if out.is_empty() {
        out.push_str("(none)\n");
    }
    out
}

/// Replays a forward trace against `initial`, returning the index of the
/// first step whose conditions were not all known when it fired, or whose
/// conclusion was already known.
///
/// `None` means the trace is a sound firing sequence.
#[must_use]
pub fn first_unsound_step(initial: &FactSet, trace: &[FiredRule]) -> Option<usize> {
    let mut known = initial.clone();
    for (i, step) in trace.iter().enumerate() {
        if !step.conditions.is_subset_of(&known) || !known.insert(step.conclusion.clone()) {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::fact_set;
    use crate::inference::{forward_chain, prove_goal};

    fn rules() -> Vec<Rule> {
        vec![
            Rule::from_tokens(["a"], "b", "A gives B").unwrap(),
            Rule::from_tokens(["b"], "c", "B gives C").unwrap(),
        ]
    }

    #[test]
    fn forward_report_numbers_steps_and_lists_inferred() {
        let result = forward_chain(&fact_set(["a"]), &rules());
        let report = render_forward_report(&result);
        assert!(report.contains("Step 1: A gives B → add `b`\n"));
        assert!(report.contains("Step 2: B gives C → add `c`\n"));
        assert!(report.ends_with("- b\n- c\n"));
    }

    #[test]
    fn forward_report_without_inference() {
        let result = forward_chain(&FactSet::new(), &rules());
        assert!(render_forward_report(&result).ends_with("No new facts inferred.\n"));
    }

    #[test]
    fn proof_report_indents_by_depth() {
        let result = prove_goal(&Fact::new("c"), &fact_set(["a"]), &rules());
        let flat = render_proof_report(&result, false);
        assert!(flat.starts_with("- Trying rule: B gives C\n- Trying rule: A gives B\n"));
        assert!(flat.ends_with("Goal PROVED\n"));

        let nested = render_proof_report(&result, true);
        assert!(nested.contains("\n    - 'a' is already known.\n"));
    }

    #[test]
    fn failed_proof_verdict() {
        let result = prove_goal(&Fact::new("z"), &FactSet::new(), &rules());
        assert_eq!(
            render_proof_report(&result, false),
            "- No rules conclude 'z'.\nGoal NOT proved\n"
        );
    }

    #[test]
    fn replay_detects_out_of_order_steps() {
        let initial = fact_set(["a"]);
        let mut trace = forward_chain(&initial, &rules()).trace;
        assert_eq!(first_unsound_step(&initial, &trace), None);
        trace.swap(0, 1);
        assert_eq!(first_unsound_step(&initial, &trace), Some(0));
    }

    #[test]
    fn proof_event_serializes_with_tag() {
        let step = ProofStep::new(1, ProofEvent::CycleAvoided { goal: Fact::new("a") });
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["event"], "cycle_avoided");
        assert_eq!(json["goal"], "a");
        assert_eq!(json["depth"], 1);
    }

    #[test]
    fn failure_events_are_classified() {
        assert!(ProofEvent::CouldNotProve { goal: Fact::new("g") }.is_failure());
        assert!(!ProofEvent::AlreadyKnown { goal: Fact::new("g") }.is_failure());
    }
}
