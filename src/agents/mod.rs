//! Decision sources for driving games without a learned policy.
//!
//! ## Key Types
//!
//! - `DecisionSource`: Maps (snapshot, mask) to one masked action
//! - `PassAgent`, `RandomAgent`, `GreedyAgent`: Scripted sources

pub mod policy;

pub use policy::{DecisionSource, GreedyAgent, PassAgent, RandomAgent};
