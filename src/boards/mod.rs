//! Contains ready-made implementations of the `Board` trait.

/// An explicit game tree, for hand-made or random positions with known values.
pub mod game_tree;
