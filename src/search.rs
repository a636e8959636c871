use crate::board::{Board, Color};
use crate::clock::Clock;
use crate::config::SearchConfig;
use crate::context::DecisionContext;
use crate::eval::Evaluate;
use std::time::{Duration, Instant};

/// The state of one level of the recursion. Each call owns its frame; siblings never share one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Plies left before static evaluation.
    pub depth: u32,
    /// Best value the maximizing side is already assured of.
    pub alpha: f64,
    /// Best value the minimizing side is already assured of.
    pub beta: f64,
    /// Whether the searching color chooses at this node.
    pub maximizing: bool,
    ply: u32,
    extensions: u32,
}

impl Frame {
    /// A frame for a successor of the root, i.e. at ply 1.
    pub fn new(depth: u32, alpha: f64, beta: f64, maximizing: bool) -> Self {
        Self {
            depth,
            alpha,
            beta,
            maximizing,
            ply: 1,
            extensions: 0,
        }
    }

    /// A frame with the widest window.
    pub fn full_window(depth: u32, maximizing: bool) -> Self {
        Frame::new(depth, f64::NEG_INFINITY, f64::INFINITY, maximizing)
    }

    /// The frame of a child. A forced move keeps the depth unless the path has used up
    /// its extensions.
    fn child(&self, alpha: f64, beta: f64, forced: bool, max_extensions: u32) -> Frame {
        let extend = forced && self.extensions < max_extensions;
        Frame {
            depth: if extend { self.depth } else { self.depth - 1 },
            alpha,
            beta,
            maximizing: !self.maximizing,
            ply: self.ply + 1,
            extensions: self.extensions + extend as u32,
        }
    }
}

/// Depth-limited minimax with alpha-beta pruning and forced-move extension.
///
/// Values are seen from the searching color. Successor lists and static values go through the
/// decision's [`DecisionContext`].
pub struct AlphaBeta<'a, E, C> {
    evaluator: &'a E,
    clock: &'a C,
    color: Color,
    deadline: Instant,
    safety_margin: Duration,
    max_extensions: u32,
    win_score: f64,
}

impl<'a, E, C: Clock> AlphaBeta<'a, E, C> {
    /// Creates a search for `color` that stops expanding once `deadline`, less the configured
    /// safety margin, is reached.
    pub fn new(
        evaluator: &'a E,
        clock: &'a C,
        config: &SearchConfig,
        color: Color,
        deadline: Instant,
    ) -> Self {
        Self {
            evaluator,
            clock,
            color,
            deadline,
            safety_margin: config.safety_margin,
            max_extensions: config.max_extensions,
            win_score: config.win_score,
        }
    }

    /// Replaces the headroom kept before the deadline.
    pub fn with_safety_margin(mut self, safety_margin: Duration) -> Self {
        self.safety_margin = safety_margin;
        self
    }

    /// `true` once less than the safety margin is left before the deadline.
    pub fn out_of_time(&self) -> bool {
        self.clock
            .now()
            .checked_add(self.safety_margin)
            .is_none_or(|now| now >= self.deadline)
    }

    /// Score of a finished game, `None` while it goes on.
    pub fn terminal_score<B: Board>(&self, state: &B) -> Option<f64> {
        if state.is_draw() {
            Some(0.0)
        } else if state.is_win(self.color) {
            Some(self.win_score)
        } else if state.is_win(self.color.opponent()) {
            Some(-self.win_score)
        } else {
            None
        }
    }

    /// Values `state` with the given frame.
    ///
    /// If time runs out, the remaining siblings of a node are skipped and the best value found
    /// so far is returned. A node that had no time for any child falls back to its static value.
    pub fn value<B: Board>(&self, context: &mut DecisionContext<B>, state: &B, frame: Frame) -> f64
    where
        E: Evaluate<B>,
    {
        let stats = context.stats_mut();
        stats.nodes += 1;
        stats.max_ply = stats.max_ply.max(frame.ply);

        if let Some(score) = self.terminal_score(state) {
            return score;
        }

        let signature = state.signature();
        if frame.depth == 0 {
            context.stats_mut().horizon_leaves += 1;
            return context.evaluate(signature, state, self.evaluator, self.color);
        }

        let successors = context.expand(signature, state);
        if successors.is_empty() {
            return context.evaluate(signature, state, self.evaluator, self.color);
        }
        let forced = successors.len() == 1;

        let mut alpha = frame.alpha;
        let mut beta = frame.beta;
        let mut best = match frame.maximizing {
            true => f64::NEG_INFINITY,
            false => f64::INFINITY,
        };

        for (index, child) in successors.iter().enumerate() {
            if self.out_of_time() {
                context.stats_mut().truncations += 1;
                log::trace!(
                    "out of time at ply {} after {} of {} children",
                    frame.ply,
                    index,
                    successors.len()
                );
                if index == 0 {
                    return context.evaluate(signature, state, self.evaluator, self.color);
                }
                break;
            }

            let child_frame = frame.child(alpha, beta, forced, self.max_extensions);
            let value = self.value(context, child, child_frame);

            if frame.maximizing {
                best = best.max(value);
                alpha = alpha.max(best);
            } else {
                best = best.min(value);
                beta = beta.min(best);
            }

            if beta <= alpha {
                context.stats_mut().cutoffs += (successors.len() - index - 1) as u64;
                break;
            }
        }

        best
    }
}
