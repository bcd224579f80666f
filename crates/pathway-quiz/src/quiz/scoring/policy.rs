use super::RankedOutcome;
use serde::{Deserialize, Serialize};

/// Inclusive score margin within which the runner-up is shown next to the top outcome.
pub const CLOSENESS_THRESHOLD: u32 = 2;

/// Notice shown instead of a confident ranking when the answers carry too little signal.
pub const LOW_SIGNAL_NOTICE: &str =
    "Not enough answers to prioritise one route. Read all your options below.";

/// Whether the results page falls back to a "browse everything" notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "minimum", rename_all = "snake_case")]
pub enum LowSignalPolicy {
    /// Always present the ranking without a notice.
    Disabled,
    /// Attach the notice when fewer than `n` questions received a real choice
    /// or when no outcome scored above zero.
    MinimumAnswers(usize),
}

impl LowSignalPolicy {
    pub fn from_minimum(minimum: usize) -> Self {
        if minimum == 0 {
            Self::Disabled
        } else {
            Self::MinimumAnswers(minimum)
        }
    }

    pub fn is_low_signal(&self, answered_count: usize, top: Option<&RankedOutcome>) -> bool {
        match self {
            Self::Disabled => false,
            Self::MinimumAnswers(minimum) => {
                answered_count < *minimum || top.map_or(true, |top| top.score == 0)
            }
        }
    }
}

impl Default for LowSignalPolicy {
    fn default() -> Self {
        Self::MinimumAnswers(2)
    }
}

pub(crate) fn within_closeness(top: &RankedOutcome, second: &RankedOutcome) -> bool {
    top.score.saturating_sub(second.score) <= CLOSENESS_THRESHOLD
}
