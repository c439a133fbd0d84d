//! Grid block puzzle (workspace facade crate).
//!
//! This package exposes `gridblocks::{core,engine,types}` as one public API while the
//! implementation lives in dedicated crates under `crates/`.

pub use gridblocks_core as core;
pub use gridblocks_engine as engine;
pub use gridblocks_types as types;
