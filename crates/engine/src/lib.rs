//! Orchestration on top of the rules engine
//!
//! - [`place`]: placement requests from an input layer, gated by phase, with
//!   stable error codes
//! - [`policy`]: automated players (`first-fit`, `random`, `greedy`)
//! - [`sim`]: run a whole game with a policy and summarize it

pub mod place;
pub mod policy;
pub mod sim;

pub use place::{apply_place, try_place, PlaceError};
pub use policy::{FirstFit, Greedy, Move, PlacementPolicy, PolicyKind, RandomPolicy};
pub use sim::{run_game, GameSummary, StopReason};
