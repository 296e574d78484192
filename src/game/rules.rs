use crate::consts;
use serde::Deserialize;
use thiserror::Error;

/// Pacing of a game: how fast the snake starts out and how it speeds up as
/// the score grows.  All intervals are in milliseconds.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "RawRules")]
pub(crate) struct Rules {
    /// Time between moves at the start of a game
    pub(crate) initial_interval: u64,

    /// Amount taken off the interval at each speed-up
    pub(crate) interval_step: u64,

    /// The interval never drops below this
    pub(crate) min_interval: u64,

    /// A speed-up happens whenever the score reaches a multiple of this
    pub(crate) speedup_every: u32,
}

impl Rules {
    /// Return the tick interval to use after the score has just become
    /// `score`, given the interval in effect before.
    pub(crate) fn interval_after(&self, score: u32, interval: u64) -> u64 {
        if score > 0 && score.checked_rem(self.speedup_every) == Some(0) {
            interval
                .saturating_sub(self.interval_step)
                .max(self.min_interval)
                .min(interval)
        } else {
            interval
        }
    }
}

impl Default for Rules {
    fn default() -> Rules {
        Rules {
            initial_interval: consts::INITIAL_TICK_INTERVAL,
            interval_step: consts::TICK_INTERVAL_STEP,
            min_interval: consts::MIN_TICK_INTERVAL,
            speedup_every: consts::SPEEDUP_EVERY,
        }
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawRules {
    initial_interval: u64,
    interval_step: u64,
    min_interval: u64,
    speedup_every: u32,
}

impl Default for RawRules {
    fn default() -> RawRules {
        let rules = Rules::default();
        RawRules {
            initial_interval: rules.initial_interval,
            interval_step: rules.interval_step,
            min_interval: rules.min_interval,
            speedup_every: rules.speedup_every,
        }
    }
}

impl TryFrom<RawRules> for Rules {
    type Error = RulesError;

    fn try_from(value: RawRules) -> Result<Rules, RulesError> {
        if value.speedup_every == 0 {
            return Err(RulesError::ZeroSpeedup);
        }
        if value.min_interval == 0 {
            return Err(RulesError::ZeroMinInterval);
        }
        if value.initial_interval < value.min_interval {
            return Err(RulesError::InitialBelowMin {
                initial: value.initial_interval,
                min: value.min_interval,
            });
        }
        Ok(Rules {
            initial_interval: value.initial_interval,
            interval_step: value.interval_step,
            min_interval: value.min_interval,
            speedup_every: value.speedup_every,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum RulesError {
    #[error("speedup-every must be at least 1")]
    ZeroSpeedup,
    #[error("min-interval must be at least 1 ms")]
    ZeroMinInterval,
    #[error("initial-interval ({initial} ms) is less than min-interval ({min} ms)")]
    InitialBelowMin { initial: u64, min: u64 },
}
