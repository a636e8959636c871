/// Number of playable (dark) cells on a checkers board.
pub const CELL_COUNT: usize = 32;

/// The interface the engine consumes from the board-state collaborator.
///
/// Legality rules, move generation and win/draw detection live behind this trait; the engine
/// never reimplements them. Implementations are immutable values: producing a successor never
/// modifies `self`.
pub trait Board: Clone {
    /// Returns the color whose turn it is in this state.
    fn side_to_move(&self) -> Color;

    /// Returns every legal successor state in a stable enumeration order. Empty if there is none.
    fn successors(&self) -> Vec<Self>;

    /// Returns `true` if the game is over and `color` has won.
    fn is_win(&self, color: Color) -> bool;

    /// Returns `true` if the game is over and drawn.
    fn is_draw(&self) -> bool;

    /// Returns the content of the playable cell at `index` (`0..CELL_COUNT`).
    fn cell(&self, index: usize) -> Cell;

    /// Returns the number of moves left until the game is declared a draw.
    fn moves_until_draw(&self) -> u32;

    /// Returns the cache key of this state.
    ///
    /// Transposed states must map to the same key. The default packs the whole position,
    /// which is collision free.
    fn signature(&self) -> Signature {
        Signature::pack(self)
    }
}

/// The two sides of a checkers game.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Color {
    Red,
    White,
}

impl Color {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Color::Red => Color::White,
            Color::White => Color::Red,
        }
    }

    /// Returns `+1` for red and `-1` for white.
    pub fn sign(self) -> i32 {
        match self {
            Color::Red => 1,
            Color::White => -1,
        }
    }
}

/// Kind of a piece standing on a cell.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum PieceKind {
    Regular,
    King,
}

/// Content of a playable cell.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Default)]
pub enum Cell {
    #[default]
    Empty,
    Piece(Color, PieceKind),
}

impl Cell {
    fn code(self) -> u128 {
        match self {
            Cell::Empty => 0,
            Cell::Piece(Color::Red, PieceKind::Regular) => 1,
            Cell::Piece(Color::Red, PieceKind::King) => 2,
            Cell::Piece(Color::White, PieceKind::Regular) => 3,
            Cell::Piece(Color::White, PieceKind::King) => 4,
        }
    }
}

const CELL_BITS: u32 = 3;
const SIDE_OFFSET: u32 = CELL_BITS * CELL_COUNT as u32;
const COUNTER_OFFSET: u32 = SIDE_OFFSET + 1;
const COUNTER_MASK: u128 = (1u128 << (128 - COUNTER_OFFSET)) - 1;

/// Packed cache key of a board state.
///
/// Bit layout of [`Signature::pack`]:
/// cells:        96 bit (3 bit per cell)
/// side to move:  1 bit
/// draw counter: 31 bit
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, PartialOrd, Ord)]
pub struct Signature(u128);

impl Signature {
    /// Encodes the full position of `board`.
    pub fn pack<B: Board>(board: &B) -> Self {
        let mut packed = 0u128;
        for index in 0..CELL_COUNT {
            packed |= board.cell(index).code() << (index as u32 * CELL_BITS);
        }
        if board.side_to_move() == Color::White {
            packed |= 1 << SIDE_OFFSET;
        }
        packed |= (board.moves_until_draw() as u128 & COUNTER_MASK) << COUNTER_OFFSET;
        Signature(packed)
    }

    /// Wraps a key computed by the collaborator.
    pub const fn from_raw(raw: u128) -> Self {
        Signature(raw)
    }

    pub const fn raw(self) -> u128 {
        self.0
    }
}
