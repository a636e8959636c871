//! Positional value of each playable cell.

use crate::board::CELL_COUNT;

/// Weight of each playable cell, indexed like [`crate::board::Board::cell`].
///
/// Back ranks and the side edges score highest, the centre lowest.
pub const POSITION_WEIGHTS: [i32; CELL_COUNT] = [
    4, 4, 4, 4, //
    4, 3, 3, 3, //
    3, 2, 2, 4, //
    4, 2, 1, 3, //
    3, 1, 2, 4, //
    4, 2, 2, 3, //
    3, 3, 3, 4, //
    4, 4, 4, 4, //
];

/// Returns the weight of the cell at `index`.
#[inline]
pub fn weight(index: usize) -> i32 {
    POSITION_WEIGHTS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_positive() {
        assert!(POSITION_WEIGHTS.iter().all(|&w| w > 0));
    }

    #[test]
    fn back_ranks_outweigh_centre() {
        let back_ranks = (0..4).chain(28..32);
        let centre = [14, 17];
        let min_back = back_ranks.map(weight).min().unwrap();
        let max_centre = centre.into_iter().map(weight).max().unwrap();
        assert!(min_back > max_centre);
    }

    #[test]
    fn table_is_symmetric_under_board_rotation() {
        for index in 0..CELL_COUNT {
            assert_eq!(weight(index), weight(CELL_COUNT - 1 - index), "cell {index}");
        }
    }
}
