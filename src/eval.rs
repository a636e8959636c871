use crate::board::{Board, CELL_COUNT, Cell, Color, PieceKind};
use crate::config::{Coefficients, ConfigError};
use crate::weights::weight;

/// Static evaluation of a non-terminal position.
///
/// Scores are seen from `color`, the side the engine is searching for; higher is better for it.
/// `mobility` is the number of legal successors of `state`, already expanded by the caller.
pub trait Evaluate<B: Board> {
    fn evaluate(&self, state: &B, mobility: usize, color: Color) -> f64;
}

/// Individual terms of the [`Heuristic`], before weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Terms {
    /// Positional material of regular pieces, own minus opponent's.
    pub regular: f64,
    /// Positional material of kings, own minus opponent's.
    pub king: f64,
    /// Legal moves of the side to move; positive when that side is `color`.
    pub mobility: f64,
    /// Moves left before the forced draw, signed by who leads on material.
    pub draw_proximity: f64,
}

/// The linear material, mobility and draw-proximity evaluation.
///
/// Material and draw proximity are zero-sum: scoring a position for the other color
/// negates them. Mobility only counts the moves of the side to move and ignores the
/// opponent's, so it is not a symmetric measure of both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Heuristic {
    coefficients: Coefficients,
}

impl Heuristic {
    /// Creates a heuristic with the given weights, rejecting non-finite ones.
    pub fn new(coefficients: Coefficients) -> Result<Self, ConfigError> {
        coefficients.validate()?;
        Ok(Self { coefficients })
    }

    /// The weights applied to the terms.
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// Computes the unweighted terms of `state` from `color`'s side.
    pub fn terms<B: Board>(&self, state: &B, mobility: usize, color: Color) -> Terms {
        let (regular, king) = material(state, color);

        let mobility = match state.side_to_move() == color {
            true => mobility as f64,
            false => -(mobility as f64),
        };

        // The leading side wants the game to go on, the trailing side wants the draw.
        let lead = (regular + king).signum();
        let draw_proximity = lead as f64 * state.moves_until_draw() as f64;

        Terms {
            regular: regular as f64,
            king: king as f64,
            mobility,
            draw_proximity,
        }
    }
}

impl<B: Board> Evaluate<B> for Heuristic {
    fn evaluate(&self, state: &B, mobility: usize, color: Color) -> f64 {
        let terms = self.terms(state, mobility, color);
        let c = &self.coefficients;
        c.regular * terms.regular
            + c.king * terms.king
            + c.mobility * terms.mobility
            + c.draw_proximity * terms.draw_proximity
    }
}

/// Positional material of regular pieces and of kings, own minus opponent's.
fn material<B: Board>(state: &B, color: Color) -> (i32, i32) {
    let mut regular = 0;
    let mut king = 0;
    for index in 0..CELL_COUNT {
        if let Cell::Piece(owner, kind) = state.cell(index) {
            let points = weight(index) * owner.sign() * color.sign();
            match kind {
                PieceKind::Regular => regular += points,
                PieceKind::King => king += points,
            }
        }
    }
    (regular, king)
}
