//! The priority scoring engine: time decay, cross-label rules, advanced
//! boosts, the scorer itself, and action-rule matching.

pub mod actions;
pub mod boosts;
pub mod decay;
pub mod engine;
pub mod rules;

pub use actions::ActionRuleMatcher;
pub use engine::{sort_ranked, PriorityScorer};
