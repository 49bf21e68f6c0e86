//! # rulechain - Propositional Rule Engine
//!
//! rulechain reasons over a fixed, ordered base of propositional rules in two
//! modes:
//!
//! - **Forward chaining**: saturate a set of known facts until no rule adds
//!   anything new, recording each firing.
//! - **Backward chaining**: try to justify one goal by recursively proving the
//!   conditions of rules that conclude it, narrating every attempt.
//!
//! ## Core Concepts
//!
//! - **Fact**: a symbolic boolean proposition, known or not yet known
//! - **Rule**: `conditions ⇒ conclusion` with a human-readable explanation
//! - **RuleStore**: the ordered, read-only rule base shared by both engines
//! - **Trace**: the ordered explanation of what an engine did
//!
//! ## Usage
//!
//! ```rust
//! use rulechain::{fact_set, Fact, RuleStore};
//!
//! let store = RuleStore::health_assistant();
//!
//! let known = fact_set(["fever", "cough", "body_ache"]);
//! let saturated = store.forward_chain(&known);
//! assert!(saturated.facts.contains("recommend_paracetamol"));
//!
//! let proof = store.prove_goal(&Fact::new("flu_suspected"), &known);
//! assert!(proof.proved);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod fact;
pub mod inference;
pub mod knowledge_base;
pub mod report;
pub mod rule;
pub mod store;
pub mod trace;

// Re-export primary types at crate root for convenience
pub use config::{OutputFormat, RuleSource, ShellConfig};
pub use error::{RuleBaseError, RuleBaseResult, ValidationError};
pub use fact::{fact_set, Fact, FactSet};
pub use inference::{forward_chain, prove_goal, ForwardChainResult, ProofResult, VisitedGoals};
pub use report::{ChainingMode, InferenceReport};
pub use rule::{ConditionSet, Rule};
pub use store::{RuleDefinition, RuleStore};
pub use trace::{FiredRule, ProofEvent, ProofStep};
