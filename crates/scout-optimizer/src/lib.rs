//! Strategy parameter optimization.
//!
//! Sweeps a cartesian grid of strategy parameters, backtesting each
//! combination over a reduced sample, then re-validates the winner and
//! the current baseline over the full sample before recommending a
//! change. Ranking is win rate first, net wins as the tiebreaker.

mod grid;
mod search;

pub use grid::{ParamGrid, ParamPoint};
pub use search::{OptimizationOutcome, OptimizationPoint, Optimizer, Progress};
