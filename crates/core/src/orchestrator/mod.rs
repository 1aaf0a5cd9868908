//! Rank resolution orchestrator.
//!
//! Sequences identifier lookups, candidate harvesting and name lookups into
//! a single cascade per publication, and turns the outcome into a badge.
//! Each publication's cascade is sequential; separate publications resolve
//! concurrently and independently.

mod badger;
mod cascade;
mod config;
mod types;

pub use badger::RankBadger;
pub use cascade::RankOrchestrator;
pub use config::RankOptions;
pub use types::{CascadeState, Publication, Resolution};
