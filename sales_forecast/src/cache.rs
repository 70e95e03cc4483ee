//! Memoization of forecast tables at the orchestration boundary
//!
//! The runner is pure, so a table is fully determined by the model identity
//! and the resolved range. The cache lives outside the pure computation and
//! is invalidated only by dropping it (process restart in the original
//! application).

use crate::error::Result;
use crate::forecast::{ForecastRow, ForecastRunner};
use crate::models::TrainedForecastModel;
use crate::range::ResolvedRange;
use chrono::NaiveDate;
use std::collections::HashMap;

type CacheKey = (String, NaiveDate, NaiveDate);

/// Forecast table cache keyed by (model name, effective_start, effective_end)
#[derive(Debug, Default)]
pub struct ForecastCache {
    tables: HashMap<CacheKey, Vec<ForecastRow>>,
    hits: u64,
    misses: u64,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memoized table for this model and range, running the
    /// forecast on a miss
    pub fn fetch<M: TrainedForecastModel + ?Sized>(
        &mut self,
        model: &M,
        range: &ResolvedRange,
    ) -> Result<Vec<ForecastRow>> {
        let key = (
            model.name().to_string(),
            range.effective_start,
            range.effective_end,
        );

        if let Some(table) = self.tables.get(&key) {
            self.hits += 1;
            return Ok(table.clone());
        }

        let table = ForecastRunner::run(model, range)?;
        self.misses += 1;
        self.tables.insert(key, table.clone());
        Ok(table)
    }

    /// Number of lookups served from memory
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of lookups that ran the forecast
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Number of distinct tables held
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Drop every memoized table
    pub fn clear(&mut self) {
        self.tables.clear();
    }
}
