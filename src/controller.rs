use crate::board::Board;
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, SearchConfig};
use crate::context::{DecisionContext, SearchStats};
use crate::eval::{Evaluate, Heuristic};
use crate::search::{AlphaBeta, Frame};
use std::time::{Duration, Instant};

/// Why a decision stopped searching.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum StopReason {
    /// The state has no legal successor; the decision is a pass.
    NoMoves,
    /// There was a single legal successor, nothing to choose.
    OnlyMove,
    /// A successor wins the game on the spot.
    ImmediateWin,
    /// The best successor leads to a won game whatever the opponent does.
    ProvenWin,
    /// The last iteration never reached its depth limit, so deeper ones would not change it.
    Exhausted,
    /// The next iteration was not expected to finish before the deadline.
    Budget,
    /// The deadline interrupted an iteration.
    Deadline,
    /// The last configured depth was completed.
    DepthCap,
}

/// The outcome of [`SearchController::decide`].
#[derive(Debug, Clone)]
pub struct Decision<B> {
    /// The chosen successor, or the unchanged input state for a pass.
    pub state: B,
    /// Index of the chosen successor in enumeration order. `None` marks a pass (null move).
    pub chosen: Option<usize>,
    /// Value of the chosen successor from the deciding side, when a search produced one.
    pub score: Option<f64>,
    /// Deepest fully completed iteration.
    pub depth: u32,
    /// Why the deepening stopped.
    pub reason: StopReason,
    /// Counters of the whole decision.
    pub stats: SearchStats,
}

impl<B> Decision<B> {
    /// `true` if there was no legal move to play.
    pub fn is_pass(&self) -> bool {
        self.chosen.is_none()
    }
}

/// A builder for creating instances of [`SearchController`].
pub struct SearchControllerBuilder<E, C> {
    config: SearchConfig,
    evaluator: E,
    clock: C,
}

impl Default for SearchControllerBuilder<Heuristic, SystemClock> {
    fn default() -> Self {
        Self {
            config: SearchConfig::default(),
            evaluator: Heuristic::default(),
            clock: SystemClock,
        }
    }
}

impl<E, C: Clock> SearchControllerBuilder<E, C> {
    /// Replaces the search settings. They are validated by [`build`](Self::build).
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the static evaluation.
    pub fn with_evaluator<E2>(self, evaluator: E2) -> SearchControllerBuilder<E2, C> {
        SearchControllerBuilder {
            config: self.config,
            evaluator,
            clock: self.clock,
        }
    }

    /// Replaces the time source used for every deadline check.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> SearchControllerBuilder<E, C2> {
        SearchControllerBuilder {
            config: self.config,
            evaluator: self.evaluator,
            clock,
        }
    }

    /// Validates the configuration and builds the controller.
    pub fn build(self) -> Result<SearchController<E, C>, ConfigError> {
        self.config.validate()?;
        Ok(SearchController {
            config: self.config,
            evaluator: self.evaluator,
            clock: self.clock,
        })
    }
}

/// Picks the next state of a game within a deadline, by iterative deepening over [`AlphaBeta`].
///
/// The controller holds no state between decisions: every call to [`decide`](Self::decide)
/// works with its own, freshly created [`DecisionContext`].
pub struct SearchController<E = Heuristic, C = SystemClock> {
    config: SearchConfig,
    evaluator: E,
    clock: C,
}

impl SearchController {
    /// Returns a builder starting from the default configuration, heuristic and wall clock.
    pub fn builder() -> SearchControllerBuilder<Heuristic, SystemClock> {
        SearchControllerBuilder::default()
    }
}

impl Default for SearchController {
    fn default() -> Self {
        Self {
            config: SearchConfig::default(),
            evaluator: Heuristic::default(),
            clock: SystemClock,
        }
    }
}

/// Result of valuing every root successor at one depth.
enum Sweep {
    Complete { index: usize, score: f64, horizon: bool },
    Interrupted { best: Option<(usize, f64)> },
}

impl<E, C: Clock> SearchController<E, C> {
    /// The validated search settings.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The static evaluation applied at the search horizon.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// The time source of every deadline check.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Chooses the successor of `state` to play, returning no later than `deadline`
    /// (or the configured hard limit, whichever comes first).
    ///
    /// A state without successors yields a pass: the unchanged state and no chosen index.
    /// The safety margin never exceeds half of the time available, so a short deadline still
    /// leaves room to search.
    pub fn decide<B: Board>(&self, state: &B, deadline: Instant) -> Decision<B>
    where
        E: Evaluate<B>,
    {
        let started = self.clock.now();
        let deadline = started
            .checked_add(self.config.hard_limit)
            .map_or(deadline, |limit| deadline.min(limit));
        let margin = self
            .config
            .safety_margin
            .min(deadline.saturating_duration_since(started) / 2);
        let color = state.side_to_move();
        let mut context = DecisionContext::new();

        let successors = context.expand(state.signature(), state);
        let decision = |index: Option<usize>,
                        score: Option<f64>,
                        depth: u32,
                        reason: StopReason,
                        context: &DecisionContext<B>| {
            let state = match index {
                Some(index) => successors[index].clone(),
                None => state.clone(),
            };
            log::debug!(
                "{:?} decided {:?} (score {:?}, depth {}, reason {:?}, {} nodes)",
                color,
                index,
                score,
                depth,
                reason,
                context.stats().nodes
            );
            Decision {
                state,
                chosen: index,
                score,
                depth,
                reason,
                stats: *context.stats(),
            }
        };

        if successors.is_empty() {
            return decision(None, None, 0, StopReason::NoMoves, &context);
        }
        if successors.len() == 1 {
            return decision(Some(0), None, 0, StopReason::OnlyMove, &context);
        }
        if let Some(index) = successors.iter().position(|next| next.is_win(color)) {
            let score = Some(self.config.win_score);
            return decision(Some(index), score, 0, StopReason::ImmediateWin, &context);
        }

        let search = AlphaBeta::new(&self.evaluator, &self.clock, &self.config, color, deadline)
            .with_safety_margin(margin);

        // Until a depth completes, the first successor stands in.
        let mut best_index = 0;
        let mut best_score = None;
        let mut completed = 0;
        let mut reason = StopReason::DepthCap;

        for depth in self.config.min_depth..=self.config.max_depth {
            let iteration_started = self.clock.now();

            match self.sweep(&search, &mut context, &successors, depth) {
                Sweep::Complete {
                    index,
                    score,
                    horizon,
                } => {
                    best_index = index;
                    best_score = Some(score);
                    completed = depth;
                    log::debug!(
                        "depth {} complete: successor {} scores {} ({} nodes)",
                        depth,
                        index,
                        score,
                        context.stats().nodes
                    );

                    if score >= self.config.win_score {
                        reason = StopReason::ProvenWin;
                        break;
                    }
                    if !horizon {
                        reason = StopReason::Exhausted;
                        break;
                    }
                }
                Sweep::Interrupted { best } => {
                    if completed == 0 {
                        if let Some((index, score)) = best {
                            best_index = index;
                            best_score = Some(score);
                        }
                    }
                    log::debug!("depth {} interrupted by the deadline", depth);
                    reason = StopReason::Deadline;
                    break;
                }
            }

            if depth == self.config.max_depth {
                break;
            }

            let now = self.clock.now();
            let spent = now.saturating_duration_since(iteration_started);
            let usable = deadline
                .saturating_duration_since(now)
                .saturating_sub(margin);
            let projected = Duration::try_from_secs_f64(
                spent.as_secs_f64() * self.config.growth_factor,
            )
            .unwrap_or(Duration::MAX);
            if projected > usable {
                log::debug!(
                    "depth {} took {:?}, {:?} usable left; not starting depth {}",
                    depth,
                    spent,
                    usable,
                    depth + 1
                );
                reason = StopReason::Budget;
                break;
            }
        }

        let finished = self.clock.now();
        if finished > deadline {
            log::warn!(
                "decision overran its deadline by {:?}",
                finished.duration_since(deadline)
            );
        }

        decision(Some(best_index), best_score, completed, reason, &context)
    }

    /// Values every root successor at `depth`. The opponent moves first after our move.
    ///
    /// Ties keep the first successor in enumeration order.
    fn sweep<B: Board>(
        &self,
        search: &AlphaBeta<'_, E, C>,
        context: &mut DecisionContext<B>,
        successors: &[B],
        depth: u32,
    ) -> Sweep
    where
        E: Evaluate<B>,
    {
        let truncations = context.stats().truncations;
        let horizon_leaves = context.stats().horizon_leaves;
        let mut best: Option<(usize, f64)> = None;

        for (index, next) in successors.iter().enumerate() {
            if search.out_of_time() {
                return Sweep::Interrupted { best };
            }
            let score = search.value(context, next, Frame::full_window(depth, false));
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }

        if context.stats().truncations > truncations {
            return Sweep::Interrupted { best };
        }
        match best {
            Some((index, score)) => Sweep::Complete {
                index,
                score,
                horizon: context.stats().horizon_leaves > horizon_leaves,
            },
            None => Sweep::Interrupted { best },
        }
    }
}
