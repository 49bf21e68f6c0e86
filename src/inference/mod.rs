//! Inference engines.
//!
//! Two reasoning modes over a fixed, ordered rule sequence:
//!
//! - [`forward_chain`]: data-driven saturation of a fact set to a fixpoint.
//! - [`prove_goal`]: goal-driven depth-first proof search with a cycle guard.
//!
//! Both are pure, synchronous and total: they never fail, never mutate their
//! inputs, and always terminate because the fact universe is bounded by the
//! rule vocabulary plus the caller's facts.

mod backward;
mod forward;

pub use backward::{prove_goal, ProofResult, VisitedGoals};
pub use forward::{forward_chain, ForwardChainResult};
