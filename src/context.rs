use crate::board::{Board, Color, Signature};
use crate::eval::Evaluate;
use std::collections::HashMap;
use std::rc::Rc;

/// Counters collected while a decision is being made.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered by the recursive search.
    pub nodes: u64,
    /// Static evaluations actually computed.
    pub evaluations: u64,
    /// Static evaluations served from the cache.
    pub evaluation_hits: u64,
    /// Successor lists actually generated.
    pub expansions: u64,
    /// Successor lists served from the cache.
    pub expansion_hits: u64,
    /// Siblings skipped by alpha-beta cutoffs.
    pub cutoffs: u64,
    /// Nodes that stopped searching siblings because time ran out.
    pub truncations: u64,
    /// Non-terminal nodes scored statically because the depth budget was spent.
    pub horizon_leaves: u64,
    /// Deepest ply entered, counting the root successors as ply 1.
    pub max_ply: u32,
}

/// The per-decision transposition cache.
///
/// Maps a state signature to its successor list and to its static evaluation. One context
/// is created for every decision and dropped at its end, so nothing leaks between
/// decisions, root positions or searching colors.
pub struct DecisionContext<B: Board> {
    successors: HashMap<Signature, Rc<[B]>>,
    scores: HashMap<Signature, f64>,
    stats: SearchStats,
}

impl<B: Board> Default for DecisionContext<B> {
    fn default() -> Self {
        DecisionContext::new()
    }
}

impl<B: Board> DecisionContext<B> {
    /// Creates a context with both caches empty.
    pub fn new() -> Self {
        Self {
            successors: HashMap::new(),
            scores: HashMap::new(),
            stats: SearchStats::default(),
        }
    }

    /// Returns the successors of `state`, generating them on the first request for `signature`.
    pub fn expand(&mut self, signature: Signature, state: &B) -> Rc<[B]> {
        if let Some(successors) = self.successors.get(&signature) {
            self.stats.expansion_hits += 1;
            return Rc::clone(successors);
        }
        self.stats.expansions += 1;
        let successors: Rc<[B]> = state.successors().into();
        self.successors.insert(signature, Rc::clone(&successors));
        successors
    }

    /// Returns the static value of `state` for `color`, evaluating it on the first request
    /// for `signature`.
    ///
    /// The cached value is not keyed by color: a context serves a single searching color.
    pub fn evaluate<E: Evaluate<B>>(
        &mut self,
        signature: Signature,
        state: &B,
        evaluator: &E,
        color: Color,
    ) -> f64 {
        if let Some(&score) = self.scores.get(&signature) {
            self.stats.evaluation_hits += 1;
            return score;
        }
        let mobility = self.expand(signature, state).len();
        self.stats.evaluations += 1;
        let score = evaluator.evaluate(state, mobility, color);
        self.scores.insert(signature, score);
        score
    }

    /// Counters collected so far in this decision.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut SearchStats {
        &mut self.stats
    }

    /// Number of cached successor lists.
    pub fn expanded_len(&self) -> usize {
        self.successors.len()
    }

    /// Number of cached static evaluations.
    pub fn evaluated_len(&self) -> usize {
        self.scores.len()
    }

    /// `true` while neither cache holds an entry.
    pub fn is_empty(&self) -> bool {
        self.successors.is_empty() && self.scores.is_empty()
    }
}
