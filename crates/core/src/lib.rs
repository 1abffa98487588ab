//! Core board logic - pure, deterministic, and testable
//!
//! This crate holds the match-3 board rules with no notion of time, rendering
//! or input. Given the same [`RandomSource`] it always produces the same boards.
//!
//! # Module Structure
//!
//! - [`grid`]: the W x H tile grid, swaps, destroy marks, drops and refills
//! - [`matcher`]: runs of three or more, merged into a [`MatchSet`]
//! - [`moves`]: possible-move analysis used for deadlock detection
//! - [`drop`]: per-tile fall distances after a clear ([`DropPlan`])
//! - [`generate`]: rejection-sampled playable boards
//! - [`rng`]: injectable tile draws
//! - [`scoring`]: pass scores, [`ScoreSink`] and [`ScoreAccumulator`]
//! - [`snapshot`]: plain copies of the board for comparison and output
//!
//! # Example
//!
//! ```
//! use tile_cascade_core::{find_all_matches, exists_possible_move, generate_board, SimpleRng};
//!
//! let mut rng = SimpleRng::new(12345);
//! let grid = generate_board(8, 8, 6, &mut rng, 10_000).unwrap();
//!
//! // Fresh boards never start with a match and always have a move.
//! assert!(find_all_matches(&grid).is_empty());
//! assert!(exists_possible_move(&grid));
//! ```

pub mod drop;
pub mod error;
pub mod generate;
pub mod grid;
pub mod matcher;
pub mod moves;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tile_cascade_types as types;

// Re-export commonly used types for convenience
pub use drop::{DropEntry, DropPlan};
pub use error::{GenerateError, GridError};
pub use generate::{generate_board, is_playable};
pub use grid::{Cell, Tile, TileGrid, TileMove};
pub use matcher::{find_all_matches, has_match_at, MatchSet};
pub use moves::{all_possible_moves, exists_possible_move, find_possible_move, swap_creates_match};
pub use rng::{RandomSource, ScriptedSource, SimpleRng};
pub use scoring::{calculate_pass_score, RecordingSink, ScoreAccumulator, ScoreSink};
pub use snapshot::BoardSnapshot;
