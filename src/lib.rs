//! # Fifteen Engine
//!
//! This library provides the core engine for the generalized NxN
//! sliding-tile puzzle (the classic "15-puzzle"): the board state model,
//! move legality and application, a solvability-preserving shuffle, win
//! detection, and a greedy move-suggestion (hint) heuristic.
//!
//! The engine does not render anything and owns no timers; a surrounding
//! UI layer drives it through [`engine::Game`] and reacts to the
//! [`engine::GameEvent`]s it queues.
//!
//! It is used by two binaries:
//! - `human_player`: interactive gameplay via the command line.
//! - `hint_evaluator`: plays the hint heuristic greedily over a batch of
//!   seeded shuffles and reports how well it does.
//!
//! ## Modules
//! - `engine`: the board representation ([`engine::Board`]), session state
//!   machine ([`engine::Game`]), error and event types.
//! - `shuffle`: the random-walk shuffle generator, a cancellable stepper
//!   the caller can pace for animation.
//! - `hint`: the priority-scored hint heuristic and its request throttle.
//! - `utils`: board parsing helpers for tests and binaries.

pub mod engine;
pub mod hint;
pub mod shuffle;
pub mod utils;
