use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sales_forecast::cache::ForecastCache;
use sales_forecast::error::Result;
use sales_forecast::models::TrainedForecastModel;
use sales_forecast::range::ResolvedRange;
use sales_forecast::utils::month_starts_in;
use std::cell::Cell;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn range(start: NaiveDate, end: NaiveDate) -> ResolvedRange {
    ResolvedRange {
        effective_start: start,
        effective_end: end,
    }
}

/// Model that counts how often it is actually invoked
#[derive(Debug, Default)]
struct CountingModel {
    calls: Cell<u32>,
}

impl TrainedForecastModel for CountingModel {
    fn predict_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<(NaiveDate, f64)>> {
        self.calls.set(self.calls.get() + 1);
        Ok(month_starts_in(start, end)
            .into_iter()
            .map(|month| (month, 42.0))
            .collect())
    }

    fn monthly_forecast(&self, _horizon: usize) -> Result<Vec<(NaiveDate, f64)>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "counting"
    }
}

#[test]
fn test_second_fetch_is_served_from_memory() {
    let model = CountingModel::default();
    let mut cache = ForecastCache::new();
    let window = range(date(2023, 1, 1), date(2023, 3, 1));

    let first = cache.fetch(&model, &window).unwrap();
    let second = cache.fetch(&model, &window).unwrap();

    assert_eq!(first, second);
    assert_eq!(model.calls.get(), 1);
    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.hits(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_distinct_ranges_are_distinct_entries() {
    let model = CountingModel::default();
    let mut cache = ForecastCache::new();

    cache
        .fetch(&model, &range(date(2023, 1, 1), date(2023, 3, 1)))
        .unwrap();
    cache
        .fetch(&model, &range(date(2023, 1, 1), date(2023, 4, 1)))
        .unwrap();

    assert_eq!(model.calls.get(), 2);
    assert_eq!(cache.misses(), 2);
    assert_eq!(cache.hits(), 0);
    assert_eq!(cache.len(), 2);
}

/// Model that rejects every range, counting the attempts
#[derive(Debug, Default)]
struct RejectingModel {
    calls: Cell<u32>,
}

impl TrainedForecastModel for RejectingModel {
    fn predict_range(&self, start: NaiveDate, _end: NaiveDate) -> Result<Vec<(NaiveDate, f64)>> {
        self.calls.set(self.calls.get() + 1);
        Err(sales_forecast::SalesForecastError::InvalidRange(format!(
            "{} is out of reach",
            start
        )))
    }

    fn monthly_forecast(&self, _horizon: usize) -> Result<Vec<(NaiveDate, f64)>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "rejecting"
    }
}

#[test]
fn test_failed_runs_are_not_memoized() {
    let model = RejectingModel::default();
    let mut cache = ForecastCache::new();
    let window = range(date(2010, 1, 1), date(2010, 3, 1));

    assert!(cache.fetch(&model, &window).is_err());
    assert!(cache.is_empty());
    assert_eq!(cache.misses(), 0);
    assert_eq!(cache.hits(), 0);

    // the error is not cached either, a retry reaches the model again
    assert!(cache.fetch(&model, &window).is_err());
    assert_eq!(model.calls.get(), 2);
    assert_eq!(cache.misses(), 0);
}

#[test]
fn test_clear_forgets_every_table() {
    let model = CountingModel::default();
    let mut cache = ForecastCache::new();
    let window = range(date(2023, 1, 1), date(2023, 2, 1));

    cache.fetch(&model, &window).unwrap();
    cache.clear();
    assert!(cache.is_empty());

    cache.fetch(&model, &window).unwrap();
    assert_eq!(model.calls.get(), 2);
}
