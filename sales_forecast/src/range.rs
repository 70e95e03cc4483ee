//! Date-range resolution for forecast requests
//!
//! User input arrives as a prediction mode, a pair of dates, and an optional
//! extend-direction with a day count. [`resolve`] reconciles those into the
//! effective `(start, end)` pair handed to the forecasting stage.

use crate::utils::offset_days;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether the user asked for one prediction or a range of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionMode {
    Single,
    Multiple,
}

/// Direction to extend a degenerate range (start equal to end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtendDirection {
    #[default]
    Forward,
    Backward,
}

/// Raw user inputs for one render pass
///
/// `direction` and `step_days` only matter when `mode` is `Multiple` and the
/// two dates coincide. `step_days` defaults to 0, producing a zero-length
/// extension; no upper bound is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeRequest {
    pub mode: PredictionMode,
    pub user_start: NaiveDate,
    pub user_end: NaiveDate,
    pub direction: ExtendDirection,
    pub step_days: u32,
}

impl DateRangeRequest {
    /// Request a single prediction for one date
    pub fn single(date: NaiveDate) -> Self {
        Self {
            mode: PredictionMode::Single,
            user_start: date,
            user_end: date,
            direction: ExtendDirection::default(),
            step_days: 0,
        }
    }

    /// Request predictions over an explicit start/end span
    pub fn span(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            mode: PredictionMode::Multiple,
            user_start: start,
            user_end: end,
            direction: ExtendDirection::default(),
            step_days: 0,
        }
    }

    /// Request predictions extending from one date in the given direction
    pub fn extend(date: NaiveDate, direction: ExtendDirection, step_days: u32) -> Self {
        Self {
            mode: PredictionMode::Multiple,
            user_start: date,
            user_end: date,
            direction,
            step_days,
        }
    }
}

/// The effective date pair actually passed to the forecaster
///
/// `effective_start <= effective_end` is NOT guaranteed here: an explicit
/// reversed span passes through untouched and is reordered by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRange {
    pub effective_start: NaiveDate,
    pub effective_end: NaiveDate,
}

impl ResolvedRange {
    /// True when the range collapsed to one date
    pub fn is_degenerate(&self) -> bool {
        self.effective_start == self.effective_end
    }
}

/// Resolve raw user inputs into an effective date pair
pub fn resolve(request: &DateRangeRequest) -> ResolvedRange {
    match request.mode {
        PredictionMode::Single => ResolvedRange {
            effective_start: request.user_start,
            effective_end: request.user_start,
        },
        PredictionMode::Multiple => {
            if request.user_end != request.user_start {
                ResolvedRange {
                    effective_start: request.user_start,
                    effective_end: request.user_end,
                }
            } else {
                match request.direction {
                    ExtendDirection::Forward => ResolvedRange {
                        effective_start: request.user_start,
                        effective_end: offset_days(request.user_start, request.step_days as i64),
                    },
                    ExtendDirection::Backward => ResolvedRange {
                        effective_start: offset_days(
                            request.user_start,
                            -(request.step_days as i64),
                        ),
                        effective_end: request.user_end,
                    },
                }
            }
        }
    }
}
