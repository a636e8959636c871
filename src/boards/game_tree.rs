use crate::board::{Board, CELL_COUNT, Cell, Color, Signature};
use crate::eval::Evaluate;
use ego_tree::{NodeId, NodeRef, Tree};
use rand::Rng;
use std::fmt::{self, Debug};
use std::rc::Rc;

const DEFAULT_MOVES_UNTIL_DRAW: u32 = 50;
/// Keys handed out by the builder carry this bit, so they never clash with keys set through
/// [`NodeSpec::with_key`].
const GENERATED_KEY_BIT: u128 = 1 << 127;

/// Terminal state of a node.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Outcome {
    /// The game goes on.
    Open,
    /// The game is over and the color has won.
    Win(Color),
    /// The game is over and drawn.
    Draw,
}

/// Everything a node of a [`GameTree`] reports through the [`Board`] trait.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    side: Color,
    outcome: Outcome,
    cells: [Cell; CELL_COUNT],
    moves_until_draw: u32,
    value: f64,
    key: Option<u128>,
}

impl Default for NodeSpec {
    fn default() -> Self {
        NodeSpec::open()
    }
}

impl NodeSpec {
    /// A non-terminal node on an empty board with red to move.
    pub fn open() -> Self {
        Self {
            side: Color::Red,
            outcome: Outcome::Open,
            cells: [Cell::Empty; CELL_COUNT],
            moves_until_draw: DEFAULT_MOVES_UNTIL_DRAW,
            value: 0.0,
            key: None,
        }
    }

    /// A non-terminal node whose static value, seen from red, is `value`.
    pub fn leaf(value: f64) -> Self {
        NodeSpec::open().with_value(value)
    }

    /// A finished game won by `color`.
    pub fn won_by(color: Color) -> Self {
        Self {
            outcome: Outcome::Win(color),
            ..NodeSpec::open()
        }
    }

    /// A finished, drawn game.
    pub fn drawn() -> Self {
        Self {
            outcome: Outcome::Draw,
            ..NodeSpec::open()
        }
    }

    /// Sets the side to move. Only meaningful for the root: children always get the
    /// opponent of their parent.
    pub fn with_side(mut self, side: Color) -> Self {
        self.side = side;
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_cell(mut self, index: usize, cell: Cell) -> Self {
        self.cells[index] = cell;
        self
    }

    pub fn with_moves_until_draw(mut self, moves: u32) -> Self {
        self.moves_until_draw = moves;
        self
    }

    /// Uses `key` as signature. Nodes sharing a key are transpositions of each other.
    pub fn with_key(mut self, key: u128) -> Self {
        self.key = Some(key);
        self
    }

    pub fn side(&self) -> Color {
        self.side
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Static value of the node, seen from red.
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Incrementally builds a [`GameTree`].
pub struct GameTreeBuilder {
    tree: Tree<NodeSpec>,
    next_key: u128,
}

impl GameTreeBuilder {
    /// Starts a tree whose root is `root`.
    pub fn new(mut root: NodeSpec) -> Self {
        let mut next_key = 0;
        if root.key.is_none() {
            root.key = Some(GENERATED_KEY_BIT);
            next_key = 1;
        }
        Self {
            tree: Tree::new(root),
            next_key,
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.root().id()
    }

    /// Appends `spec` as the last child of `parent` and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not created by this builder.
    pub fn add_child(&mut self, parent: NodeId, mut spec: NodeSpec) -> NodeId {
        if spec.key.is_none() {
            spec.key = Some(GENERATED_KEY_BIT | self.next_key);
            self.next_key += 1;
        }
        let mut parent = self
            .tree
            .get_mut(parent)
            .expect("parent node belongs to this tree");
        spec.side = parent.value().side.opponent();
        parent.append(spec).id()
    }

    /// Appends a non-terminal child with the given static value.
    pub fn add_leaf(&mut self, parent: NodeId, value: f64) -> NodeId {
        self.add_child(parent, NodeSpec::leaf(value))
    }

    /// Builds a reproducible random tree of the given depth.
    ///
    /// Every inner node gets between 1 and `max_branching` children, so single-successor
    /// nodes show up regularly. Static values are whole numbers in `-100..=100`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, depth: u32, max_branching: usize) -> GameTree {
        let root = NodeSpec::leaf(rng.random_range(-100..=100) as f64);
        let mut builder = GameTreeBuilder::new(root);
        let root = builder.root_id();
        builder.grow(rng, root, depth, max_branching.max(1));
        builder.build()
    }

    fn grow<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        parent: NodeId,
        depth: u32,
        max_branching: usize,
    ) {
        if depth == 0 {
            return;
        }
        let count = rng.random_range(1..=max_branching);
        for _ in 0..count {
            let value = rng.random_range(-100..=100) as f64;
            let child = self.add_leaf(parent, value);
            self.grow(rng, child, depth - 1, max_branching);
        }
    }

    pub fn build(self) -> GameTree {
        GameTree {
            tree: Rc::new(self.tree),
        }
    }
}

/// An explicit, immutable game tree whose nodes are [`Board`] states.
///
/// Useful to drive the engine through hand-made or random positions with known values.
#[derive(Clone)]
pub struct GameTree {
    tree: Rc<Tree<NodeSpec>>,
}

impl GameTree {
    /// Returns the state at the root of the tree.
    pub fn root(&self) -> TreeBoard {
        self.board(self.tree.root().id())
    }

    /// Returns the state of node `id`.
    pub fn board(&self, id: NodeId) -> TreeBoard {
        TreeBoard {
            tree: Rc::clone(&self.tree),
            id,
        }
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.tree.nodes().count()
    }

    /// Always `false`: a tree is built from its root, which it can never lose.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// A state of a [`GameTree`].
#[derive(Clone)]
pub struct TreeBoard {
    tree: Rc<Tree<NodeSpec>>,
    id: NodeId,
}

impl TreeBoard {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn spec(&self) -> &NodeSpec {
        self.node().value()
    }

    fn node(&self) -> NodeRef<'_, NodeSpec> {
        // Ids are only ever taken from the same tree, so the node always exists.
        self.tree
            .get(self.id)
            .expect("tree board points into its own tree")
    }
}

impl PartialEq for TreeBoard {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }
}

impl Debug for TreeBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeBoard")
            .field("id", &self.id)
            .field("side", &self.spec().side)
            .field("outcome", &self.spec().outcome)
            .field("value", &self.spec().value)
            .finish()
    }
}

impl Board for TreeBoard {
    fn side_to_move(&self) -> Color {
        self.spec().side
    }

    fn successors(&self) -> Vec<Self> {
        self.node()
            .children()
            .map(|child| TreeBoard {
                tree: Rc::clone(&self.tree),
                id: child.id(),
            })
            .collect()
    }

    fn is_win(&self, color: Color) -> bool {
        self.spec().outcome == Outcome::Win(color)
    }

    fn is_draw(&self) -> bool {
        self.spec().outcome == Outcome::Draw
    }

    fn cell(&self, index: usize) -> Cell {
        self.spec().cells[index]
    }

    fn moves_until_draw(&self) -> u32 {
        self.spec().moves_until_draw
    }

    fn signature(&self) -> Signature {
        // Keys are assigned on insertion, before the tree is frozen.
        Signature::from_raw(self.spec().key.unwrap_or_default())
    }
}

/// Scores a [`TreeBoard`] with the static value stored in its node.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeValue;

impl Evaluate<TreeBoard> for TreeValue {
    fn evaluate(&self, state: &TreeBoard, _mobility: usize, color: Color) -> f64 {
        state.spec().value * color.sign() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn children_alternate_side_to_move() {
        let mut builder = GameTreeBuilder::new(NodeSpec::open().with_side(Color::White));
        let root = builder.root_id();
        let child = builder.add_child(root, NodeSpec::open().with_side(Color::White));
        let grandchild = builder.add_leaf(child, 1.0);
        let tree = builder.build();

        assert_eq!(tree.root().side_to_move(), Color::White);
        assert_eq!(tree.board(child).side_to_move(), Color::Red);
        assert_eq!(tree.board(grandchild).side_to_move(), Color::White);
    }

    #[test]
    fn successors_keep_insertion_order() {
        let mut builder = GameTreeBuilder::new(NodeSpec::open());
        let root = builder.root_id();
        let ids: Vec<_> = (0..4).map(|i| builder.add_leaf(root, i as f64)).collect();
        let tree = builder.build();

        let successors = tree.root().successors();
        assert_eq!(successors.iter().map(TreeBoard::id).collect::<Vec<_>>(), ids);
        assert!(tree.board(ids[0]).successors().is_empty());
    }

    #[test]
    fn terminal_nodes() {
        let mut builder = GameTreeBuilder::new(NodeSpec::open());
        let root = builder.root_id();
        let won = builder.add_child(root, NodeSpec::won_by(Color::Red));
        let drawn = builder.add_child(root, NodeSpec::drawn());
        let tree = builder.build();

        assert!(tree.board(won).is_win(Color::Red));
        assert!(!tree.board(won).is_win(Color::White));
        assert!(tree.board(drawn).is_draw());
        assert!(!tree.root().is_draw());
    }

    #[test]
    fn signatures_are_unique_unless_shared_on_purpose() {
        let mut builder = GameTreeBuilder::new(NodeSpec::open());
        let root = builder.root_id();
        let a = builder.add_leaf(root, 0.0);
        let b = builder.add_leaf(root, 0.0);
        let c = builder.add_child(root, NodeSpec::leaf(0.0).with_key(7));
        let d = builder.add_child(a, NodeSpec::leaf(0.0).with_key(7));
        let tree = builder.build();

        assert_ne!(tree.board(a).signature(), tree.board(b).signature());
        assert_ne!(tree.root().signature(), tree.board(a).signature());
        assert_eq!(tree.board(c).signature(), tree.board(d).signature());
    }

    #[test]
    fn tree_value_is_signed_for_the_searching_color() {
        let tree = GameTreeBuilder::new(NodeSpec::leaf(12.0)).build();
        assert_eq!(TreeValue.evaluate(&tree.root(), 0, Color::Red), 12.0);
        assert_eq!(TreeValue.evaluate(&tree.root(), 0, Color::White), -12.0);
    }

    #[test]
    fn random_trees_are_reproducible() {
        let first = GameTreeBuilder::random(&mut StdRng::seed_from_u64(7), 4, 3);
        let second = GameTreeBuilder::random(&mut StdRng::seed_from_u64(7), 4, 3);
        assert_eq!(first.len(), second.len());
        assert!(first.len() > 4);
        assert!(!first.is_empty());

        let values = |tree: &GameTree| {
            tree.tree
                .nodes()
                .map(|node| node.value().value)
                .collect::<Vec<_>>()
        };
        assert_eq!(values(&first), values(&second));
    }
}
