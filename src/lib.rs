//! A time-bounded decision engine for checkers agents.
//!
//! The engine picks the next state of a game by iterative deepening over an alpha-beta pruned
//! minimax search. Leaves are scored by a linear material, mobility and draw-proximity
//! heuristic. Successor lists and static values are memoized per decision, keyed by a packed
//! board signature so transposed positions share work.
//!
//! Board representation, move generation and win/draw detection are not part of this crate:
//! the engine consumes them through the [`Board`](board::Board) trait.
//!
//! # Example
//!
//! ```rust
//! use checkers_search::boards::game_tree::{GameTreeBuilder, NodeSpec, TreeValue};
//! use checkers_search::controller::SearchController;
//! use std::time::{Duration, Instant};
//!
//! // Red to move, white replies with the worst answer for red.
//! let mut builder = GameTreeBuilder::new(NodeSpec::open());
//! let root = builder.root_id();
//! for replies in [[3.0, 5.0], [4.0, 6.0]] {
//!     let choice = builder.add_leaf(root, 0.0);
//!     for value in replies {
//!         builder.add_leaf(choice, value);
//!     }
//! }
//! let tree = builder.build();
//!
//! let controller = SearchController::builder()
//!     .with_evaluator(TreeValue)
//!     .build()
//!     .unwrap();
//!
//! let decision = controller.decide(&tree.root(), Instant::now() + Duration::from_secs(1));
//! assert_eq!(decision.chosen, Some(1));
//! ```

/// The `Board` trait and the types the engine reads through it.
pub mod board;
/// Ready-made implementations of the `Board` trait.
pub mod boards;
/// Time sources for deadline checks.
pub mod clock;
/// Search and evaluation settings.
pub mod config;
/// The per-decision transposition cache and search counters.
pub mod context;
/// Iterative deepening under a deadline; the entry point of the crate.
pub mod controller;
/// Static evaluation of positions.
pub mod eval;
/// The recursive alpha-beta search.
pub mod search;
/// The positional weight of each playable cell.
pub mod weights;

pub use board::{Board, CELL_COUNT, Cell, Color, PieceKind, Signature};
pub use config::{Coefficients, ConfigError, SearchConfig};
pub use controller::{Decision, SearchController, StopReason};
pub use eval::{Evaluate, Heuristic};
