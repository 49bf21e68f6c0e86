//! Serializable summaries of a chaining run, for machine-readable output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fact::{Fact, FactSet};
use crate::inference::{ForwardChainResult, ProofResult};
use crate::store::RuleStore;
use crate::trace::forward_step_line;

/// Which engine produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainingMode {
    /// Forward chaining (saturation).
    Forward,
    /// Backward chaining (goal proof).
    Backward,
}

/// Self-contained record of one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceReport {
    /// Engine used.
    pub mode: ChainingMode,

    /// Fingerprint of the rule base the run used.
    pub rule_base: String,

    /// When the run was evaluated.
    pub evaluated_at: DateTime<Utc>,

    /// Facts supplied by the caller.
    pub initial_facts: FactSet,

    /// Goal (backward chaining only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Fact>,

    /// Whether the goal was proved (backward chaining only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proved: Option<bool>,

    /// Facts added by saturation (forward chaining only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inferred: Vec<Fact>,

    /// Trace narration in order.
    pub trace: Vec<String>,
}

impl InferenceReport {
    /// Summarizes a forward-chaining run.
    #[must_use]
    pub fn forward(store: &RuleStore, initial: &FactSet, result: &ForwardChainResult) -> Self {
        Self {
            mode: ChainingMode::Forward,
            rule_base: store.fingerprint(),
            evaluated_at: Utc::now(),
            initial_facts: initial.clone(),
            goal: None,
            proved: None,
            inferred: result.inferred().into_iter().cloned().collect(),
            trace: result
                .trace
                .iter()
                .enumerate()
                .map(|(i, step)| forward_step_line(i + 1, step))
                .collect(),
        }
    }

    /// Summarizes a backward-chaining run.
    #[must_use]
    pub fn backward(store: &RuleStore, known: &FactSet, result: &ProofResult) -> Self {
        Self {
            mode: ChainingMode::Backward,
            rule_base: store.fingerprint(),
            evaluated_at: Utc::now(),
            initial_facts: known.clone(),
            goal: Some(result.goal.clone()),
            proved: Some(result.proved),
            inferred: Vec::new(),
            trace: result.lines(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::fact_set;

    #[test]
    fn forward_report_lists_numbered_steps() {
        let store = RuleStore::health_assistant();
        let initial = fact_set(["sore_throat", "mild_fever"]);
        let result = store.forward_chain(&initial);
        let report = InferenceReport::forward(&store, &initial, &result);

        assert_eq!(report.mode, ChainingMode::Forward);
        assert_eq!(report.rule_base, store.fingerprint());
        assert_eq!(
            report.inferred,
            vec![Fact::new("recommend_warm_salts_gargle"), Fact::new("throat_infection")]
        );
        assert!(report.trace[0].starts_with("Step 1: Sore throat + mild fever"));
        assert!(report.goal.is_none());
    }

    #[test]
    fn backward_report_serializes_goal_and_verdict() {
        let store = RuleStore::health_assistant();
        let known = FactSet::new();
        let result = store.prove_goal(&Fact::new("allergy"), &known);
        let report = InferenceReport::backward(&store, &known, &result);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "backward");
        assert_eq!(json["goal"], "allergy");
        assert_eq!(json["proved"], false);
        assert!(json.get("inferred").is_none());

        let back: InferenceReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
