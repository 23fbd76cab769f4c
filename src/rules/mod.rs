//! The rules of beer baseball.
//!
//! - `outcome`: outcome codes per event kind and their parsing
//! - `bases`: the pure base-advancement function
//! - `engine`: `GameEngine`, which applies one event to a game
//!
//! The engine is synchronous and does no I/O. Callers serialize access
//! per game and persist its results as one unit.

pub mod bases;
pub mod engine;
pub mod outcome;

pub use bases::{Advance, AdvanceResult, GRAND_SLAM_RUNS};
pub use engine::{GameEngine, TransitionRecords, MAX_STRIKES, OUTS_PER_HALF};
pub use outcome::{
    BuntOutcome, KnockBase, KnockCounts, ShotOutcome, StealOutcome, MAX_KNOCK_UNITS,
};
