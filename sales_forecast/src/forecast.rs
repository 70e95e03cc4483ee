//! Forecast invocation and reshaping

use crate::error::Result;
use crate::models::TrainedForecastModel;
use crate::range::ResolvedRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One forecasted period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub sales: f64,
}

/// Invokes a trained model over a resolved range and reshapes the output
///
/// Reversed ranges (an explicit span entered backwards) are reordered here,
/// not in the resolver; this is the only place the swap happens.
#[derive(Debug)]
pub struct ForecastRunner;

impl ForecastRunner {
    /// Produce one forecast row per monthly period covering the range
    ///
    /// A degenerate range yields exactly one row carrying the requested
    /// date itself. Pure and side-effect-free, so repeated calls with the
    /// same model and range return the same table.
    pub fn run<M: TrainedForecastModel + ?Sized>(
        model: &M,
        range: &ResolvedRange,
    ) -> Result<Vec<ForecastRow>> {
        let (start, end) = if range.effective_start > range.effective_end {
            (range.effective_end, range.effective_start)
        } else {
            (range.effective_start, range.effective_end)
        };

        let predictions = model.predict_range(start, end)?;

        if start == end {
            // a single-date request keeps the user's own date, not the
            // period label
            return Ok(predictions
                .into_iter()
                .take(1)
                .map(|(_, sales)| ForecastRow { date: start, sales })
                .collect());
        }

        Ok(predictions
            .into_iter()
            .map(|(date, sales)| ForecastRow { date, sales })
            .collect())
    }
}
