use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::fact::{Fact, FactSet};
use crate::rule::{rules_concluding, Rule};
use crate::trace::{ProofEvent, ProofStep};

/// Goals already entered during one top-level proof search.
///
/// One instance serves the whole search of a single [`prove_goal`]
/// invocation and is never reset between sibling branches. A goal entered once is therefore refused everywhere else in the
/// same search, including in sibling branches where it would not form a
/// cycle. Some goals that are derivable through more than one path may be
/// reported unprovable as a result.
#[derive(Debug, Clone, Default)]
pub struct VisitedGoals {
    goals: HashSet<Fact>,
}

impl VisitedGoals {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `goal` was already entered.
    #[must_use]
    pub fn contains(&self, goal: &Fact) -> bool {
        self.goals.contains(goal)
    }

    /// Marks `goal` as entered. Returns false if it already was.
    pub fn mark(&mut self, goal: &Fact) -> bool {
        self.goals.insert(goal.clone())
    }

    /// Number of goals entered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    /// Returns true if no goal was entered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

/// Outcome of a backward-chaining proof attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofResult {
    /// The goal that was attempted.
    pub goal: Fact,

    /// Whether the goal was proved.
    pub proved: bool,

    /// Every step of the search, pre-order depth-first.
    pub trace: Vec<ProofStep>,
}

impl ProofResult {
    /// The trace as narration lines, in search order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.trace.iter().map(ToString::to_string).collect()
    }

    /// Store index of the rule that proved the top-level goal, if a rule did.
    ///
    /// `None` when the goal failed or was already known.
    #[must_use]
    pub fn proving_rule(&self) -> Option<usize> {
        self.trace.iter().rev().find_map(|step| match &step.event {
            ProofEvent::Proved { rule_index, .. } if step.depth == 0 => Some(*rule_index),
            _ => None,
        })
    }
}

/// Tries to justify `goal` from `known` using `rules`.
///
/// 1. A known goal succeeds immediately.
/// 2. A goal already entered in this search fails (cycle guard).
/// 3. Otherwise the goal is marked entered and every rule concluding it is
///    tried in slice order. A rule's conditions are proved as sub-goals in
///    declaration order; the first failing condition abandons the rule.
/// 4. The first rule whose conditions all prove proves the goal. If no rule
///    concludes the goal, or all of them fail, the goal fails.
///
/// Neither `known` nor `rules` is modified.
#[must_use]
pub fn prove_goal(goal: &Fact, known: &FactSet, rules: &[Rule]) -> ProofResult {
    let mut visited = VisitedGoals::new();
    let mut steps = Vec::new();
    let proved = prove(goal, known, rules, &mut visited, &mut steps);

    debug!(
        goal = %goal,
        proved,
        steps = steps.len(),
        explored = visited.len(),
        "backward chaining finished"
    );

    ProofResult {
        goal: goal.clone(),
        proved,
        trace: steps,
    }
}

/// A goal whose rules are being tried.
struct Frame<'a> {
    goal: &'a Fact,
    depth: usize,
    /// Store indices of the rules concluding `goal`, in slice order.
    candidates: Vec<usize>,
    /// Position in `candidates` of the rule being tried.
    candidate: usize,
    /// Position of the next condition of that rule to prove.
    condition: usize,
    /// Whether the attempt line for the current rule was emitted.
    announced: bool,
}

/// Result of entering a goal: settled at once, or opened for rule search.
enum Entry<'a> {
    Settled(bool),
    Open(Frame<'a>),
}

fn enter<'a>(
    goal: &'a Fact,
    depth: usize,
    known: &FactSet,
    rules: &[Rule],
    visited: &mut VisitedGoals,
    steps: &mut Vec<ProofStep>,
) -> Entry<'a> {
    if known.contains(goal) {
        steps.push(ProofStep::new(depth, ProofEvent::AlreadyKnown { goal: goal.clone() }));
        return Entry::Settled(true);
    }

    if !visited.mark(goal) {
        steps.push(ProofStep::new(depth, ProofEvent::CycleAvoided { goal: goal.clone() }));
        return Entry::Settled(false);
    }

    let candidates: Vec<usize> = rules_concluding(rules, goal.as_str())
        .map(|(index, _)| index)
        .collect();
    if candidates.is_empty() {
        steps.push(ProofStep::new(depth, ProofEvent::NoRuleConcludes { goal: goal.clone() }));
        return Entry::Settled(false);
    }

    Entry::Open(Frame {
        goal,
        depth,
        candidates,
        candidate: 0,
        condition: 0,
        announced: false,
    })
}

/// Depth-first search driven by an explicit stack of open goals, so the
/// length of a rule chain never touches the call stack. Steps come out in
/// the same pre-order as a recursive descent would emit them.
fn prove<'a>(
    goal: &'a Fact,
    known: &FactSet,
    rules: &'a [Rule],
    visited: &mut VisitedGoals,
    steps: &mut Vec<ProofStep>,
) -> bool {
    let mut stack: Vec<Frame<'a>> = Vec::new();
    // Outcome of the goal that settled last, not yet reported to its parent.
    let mut settled = match enter(goal, 0, known, rules, visited, steps) {
        Entry::Settled(outcome) => Some(outcome),
        Entry::Open(frame) => {
            stack.push(frame);
            None
        }
    };

    while let Some(frame) = stack.last_mut() {
        match settled.take() {
            Some(true) => frame.condition += 1,
            Some(false) => {
                let rule = &rules[frame.candidates[frame.candidate]];
                steps.push(ProofStep::new(
                    frame.depth,
                    ProofEvent::ConditionFailed {
                        goal: frame.goal.clone(),
                        condition: rule.conditions.as_slice()[frame.condition].clone(),
                    },
                ));
                frame.candidate += 1;
                frame.condition = 0;
                frame.announced = false;
            }
            None => {}
        }

        let Some(&rule_index) = frame.candidates.get(frame.candidate) else {
            steps.push(ProofStep::new(
                frame.depth,
                ProofEvent::CouldNotProve { goal: frame.goal.clone() },
            ));
            stack.pop();
            settled = Some(false);
            continue;
        };
        let rule = &rules[rule_index];

        if !frame.announced {
            steps.push(ProofStep::new(
                frame.depth,
                ProofEvent::TryingRule {
                    goal: frame.goal.clone(),
                    rule_index,
                    explanation: rule.explanation.clone(),
                },
            ));
            frame.announced = true;
        }

        let Some(condition) = rule.conditions.as_slice().get(frame.condition) else {
            steps.push(ProofStep::new(
                frame.depth,
                ProofEvent::Proved {
                    goal: frame.goal.clone(),
                    rule_index,
                },
            ));
            stack.pop();
            settled = Some(true);
            continue;
        };

        let depth = frame.depth + 1;
        match enter(condition, depth, known, rules, visited, steps) {
            Entry::Settled(outcome) => settled = Some(outcome),
            Entry::Open(child) => stack.push(child),
        }
    }

    settled.unwrap_or(false)
}
