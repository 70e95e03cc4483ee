//! End-to-end flow: ledger CSV -> monthly series -> fitted model ->
//! resolved range -> forecast table -> CSV export

use chrono::{Datelike, NaiveDate};
use pretty_assertions::assert_eq;
use sales_forecast::data::SalesHistory;
use sales_forecast::forecast::ForecastRunner;
use sales_forecast::models::seasonal_arima::SeasonalArima;
use sales_forecast::models::ForecastModel;
use sales_forecast::range::{resolve, DateRangeRequest, ExtendDirection};
use sales_forecast::{report, ForecastCache};
use std::f64::consts::PI;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Four years of daily rows with a yearly cycle, 2019 through 2022
fn ledger_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Sales").unwrap();
    let mut day = date(2019, 1, 1);
    let end = date(2022, 12, 31);
    let mut t = 0_usize;
    while day <= end {
        let season = (2.0 * PI * day.ordinal() as f64 / 365.0).sin();
        let jitter = ((t * 7919) % 17) as f64;
        let sales = 1000.0 + 0.3 * t as f64 + 150.0 * season + jitter;
        writeln!(file, "{},{:.2}", day.format("%Y-%m-%d"), sales).unwrap();
        day = day + chrono::Duration::days(1);
        t += 1;
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_full_pipeline_single_and_multiple() {
    let file = ledger_csv();
    let history = SalesHistory::from_csv(file.path()).unwrap();
    let monthly = history.resample_monthly().unwrap();
    assert_eq!(monthly.first_month(), Some(date(2019, 1, 1)));
    assert_eq!(monthly.last_month(), Some(date(2022, 12, 1)));

    let model = SeasonalArima::monthly_default().train(&monthly).unwrap();

    // single prediction keeps the requested date
    let resolved = resolve(&DateRangeRequest::single(date(2023, 6, 15)));
    let table = ForecastRunner::run(&model, &resolved).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[0].date, date(2023, 6, 15));
    assert!(table[0].sales.is_finite());

    let summary = report::single_summary(&table[0]);
    assert!(summary.contains("2023-06-15"));

    // reversed span is served ascending
    let resolved = resolve(&DateRangeRequest::span(date(2023, 3, 1), date(2023, 1, 1)));
    let table = ForecastRunner::run(&model, &resolved).unwrap();
    let dates: Vec<NaiveDate> = table.iter().map(|row| row.date).collect();
    assert_eq!(
        dates,
        vec![date(2023, 1, 1), date(2023, 2, 1), date(2023, 3, 1)]
    );

    // export carries the header and one line per row
    let bytes = report::to_csv(&table).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("Date,Sales (Naira)\n"));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn test_forward_extension_through_the_cache() {
    let file = ledger_csv();
    let history = SalesHistory::from_csv(file.path()).unwrap();
    let monthly = history.resample_monthly().unwrap();
    let model = SeasonalArima::monthly_default().train(&monthly).unwrap();

    let request = DateRangeRequest::extend(date(2023, 1, 1), ExtendDirection::Forward, 30);
    let resolved = resolve(&request);
    assert_eq!(resolved.effective_end, date(2023, 1, 31));

    let mut cache = ForecastCache::new();
    let first = cache.fetch(&model, &resolved).unwrap();
    let second = cache.fetch(&model, &resolved).unwrap();
    assert_eq!(first, second);
    assert_eq!(cache.hits(), 1);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].date, date(2023, 1, 1));
}
