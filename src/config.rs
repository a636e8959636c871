use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Depth at which iterative deepening starts.
pub const DEFAULT_MIN_DEPTH: u32 = 1;
/// Depth cap of iterative deepening. Not expected to be reached within the time budget.
pub const DEFAULT_MAX_DEPTH: u32 = 20;
/// Score of a won game for the searching side.
pub const DEFAULT_WIN_SCORE: f64 = 10000.0;

/// Tuning of the search controller and of the recursive search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// First depth of iterative deepening.
    pub min_depth: u32,
    /// Last depth of iterative deepening.
    pub max_depth: u32,
    /// Upper bound on a decision, counted from the start of the call.
    /// The effective deadline is the earlier of this and the caller's deadline.
    pub hard_limit: Duration,
    /// Headroom kept before the deadline. Once less than this is left, no further
    /// siblings are searched.
    pub safety_margin: Duration,
    /// The next iteration is assumed to take this many times as long as the last one.
    pub growth_factor: f64,
    /// Forced-move extensions allowed along a single path. Beyond it forced moves
    /// consume depth like any other move.
    pub max_extensions: u32,
    /// Score of a won game; its negation is the score of a lost one.
    pub win_score: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_depth: DEFAULT_MIN_DEPTH,
            max_depth: DEFAULT_MAX_DEPTH,
            hard_limit: Duration::from_secs(1),
            safety_margin: Duration::from_millis(500),
            growth_factor: 4.0,
            max_extensions: 16,
            win_score: DEFAULT_WIN_SCORE,
        }
    }
}

impl SearchConfig {
    /// Checks that the depths, timing and scores describe a usable search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_depth == 0 {
            return Err(ConfigError::ZeroMinDepth);
        }
        if self.min_depth > self.max_depth {
            return Err(ConfigError::DepthRange {
                min: self.min_depth,
                max: self.max_depth,
            });
        }
        if !self.growth_factor.is_finite() || self.growth_factor < 1.0 {
            return Err(ConfigError::GrowthFactor(self.growth_factor));
        }
        if !self.win_score.is_finite() || self.win_score <= 0.0 {
            return Err(ConfigError::WinScore(self.win_score));
        }
        if self.safety_margin >= self.hard_limit {
            return Err(ConfigError::MarginExceedsLimit {
                margin: self.safety_margin,
                limit: self.hard_limit,
            });
        }
        Ok(())
    }
}

/// Weights of the linear evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coefficients {
    /// Weight of the positional material of regular pieces.
    pub regular: f64,
    /// Weight of the positional material of kings.
    pub king: f64,
    /// Weight of each legal move of the side to move.
    pub mobility: f64,
    /// Weight of each move left before the forced draw.
    pub draw_proximity: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            regular: 1.0,
            king: 2.0,
            mobility: 0.1,
            draw_proximity: 0.02,
        }
    }
}

impl Coefficients {
    /// Rejects NaN and infinite weights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("regular", self.regular),
            ("king", self.king),
            ("mobility", self.mobility),
            ("draw_proximity", self.draw_proximity),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteCoefficient(name));
            }
        }
        Ok(())
    }
}

/// A [`SearchConfig`] or [`Coefficients`] that cannot drive a search.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("search depth must start at 1 or more")]
    ZeroMinDepth,
    #[error("min depth {min} exceeds max depth {max}")]
    DepthRange { min: u32, max: u32 },
    #[error("growth factor must be finite and at least 1, got {0}")]
    GrowthFactor(f64),
    #[error("win score must be finite and positive, got {0}")]
    WinScore(f64),
    #[error("safety margin {margin:?} leaves no time within the hard limit {limit:?}")]
    MarginExceedsLimit { margin: Duration, limit: Duration },
    #[error("coefficient `{0}` is not finite")]
    NonFiniteCoefficient(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SearchConfig::default().validate(), Ok(()));
        assert_eq!(Coefficients::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_depths() {
        let config = SearchConfig {
            min_depth: 0,
            ..SearchConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroMinDepth));

        let config = SearchConfig {
            min_depth: 5,
            max_depth: 3,
            ..SearchConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DepthRange { min: 5, max: 3 })
        );
    }

    #[test]
    fn rejects_bad_timing() {
        let config = SearchConfig {
            safety_margin: Duration::from_secs(2),
            ..SearchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MarginExceedsLimit { .. })
        ));

        let config = SearchConfig {
            growth_factor: f64::NAN,
            ..SearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::GrowthFactor(_))));
    }

    #[test]
    fn rejects_non_finite_coefficient() {
        let coefficients = Coefficients {
            mobility: f64::INFINITY,
            ..Coefficients::default()
        };
        assert_eq!(
            coefficients.validate(),
            Err(ConfigError::NonFiniteCoefficient("mobility"))
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{ "max_depth": 8, "growth_factor": 3.0 }"#).unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.growth_factor, 3.0);
        assert_eq!(config.min_depth, DEFAULT_MIN_DEPTH);
        assert_eq!(config.hard_limit, Duration::from_secs(1));

        let coefficients: Coefficients = serde_json::from_str(r#"{ "king": 3.0 }"#).unwrap();
        assert_eq!(coefficients.king, 3.0);
        assert_eq!(coefficients.regular, 1.0);
    }
}
