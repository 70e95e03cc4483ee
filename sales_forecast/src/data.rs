//! Sales history loading and monthly resampling
//!
//! The raw ledger is a CSV with a `Date` column and a `Sales` column. The
//! sales figures are booked seven rows ahead of their effective date, so the
//! column is shifted down by seven rows before anything else happens, and the
//! leading rows without a value are dropped. Duplicate dates are summed, and
//! the daily totals are averaged into one value per calendar month.

use crate::error::{Result, SalesForecastError};
use crate::utils::{add_months, month_start, months_between};
use chrono::NaiveDate;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Rows the sales column is shifted down before aggregation
const SALES_SHIFT_ROWS: usize = 7;

/// Date formats accepted in the `Date` column
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

/// One observation from the raw ledger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub sales: f64,
}

/// Daily sales history, shifted and sorted, ready for resampling
#[derive(Debug, Clone)]
pub struct SalesHistory {
    records: Vec<SalesRecord>,
}

/// Contiguous month-start series of average sales, the model's training input
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    months: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl SalesHistory {
    /// Load the sales ledger from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        // Use polars DataFrame reader directly
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(&df)
    }

    /// Build the history from an existing DataFrame with `Date` and `Sales` columns
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let date_column = Self::find_column(df, "date")?;
        let sales_column = Self::find_column(df, "sales")?;

        let dates = Self::column_as_dates(df, &date_column)?;
        let sales = Self::column_as_f64(df, &sales_column)?;

        if dates.len() != sales.len() {
            return Err(SalesForecastError::DataError(format!(
                "Date column has {} rows but sales column has {}",
                dates.len(),
                sales.len()
            )));
        }
        if dates.len() <= SALES_SHIFT_ROWS {
            return Err(SalesForecastError::DataError(format!(
                "Ledger has {} rows, need more than {} after the sales shift",
                dates.len(),
                SALES_SHIFT_ROWS
            )));
        }

        // Shift sales down; the first SALES_SHIFT_ROWS dates lose their value
        // and are dropped, mirroring shift-then-dropna on the raw frame.
        let mut records: Vec<SalesRecord> = dates[SALES_SHIFT_ROWS..]
            .iter()
            .zip(sales[..sales.len() - SALES_SHIFT_ROWS].iter())
            .map(|(&date, &sales)| SalesRecord { date, sales })
            .collect();

        records.sort_by_key(|r| r.date);

        Ok(Self { records })
    }

    /// Number of daily records after the shift
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The shifted, sorted daily records
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Sum duplicate dates, then average the daily totals per calendar month
    pub fn resample_monthly(&self) -> Result<MonthlySeries> {
        if self.records.is_empty() {
            return Err(SalesForecastError::DataError(
                "No sales records to resample".to_string(),
            ));
        }

        // records are sorted, so daily totals come out in order
        let mut daily: Vec<SalesRecord> = Vec::new();
        for record in &self.records {
            match daily.last_mut() {
                Some(last) if last.date == record.date => last.sales += record.sales,
                _ => daily.push(*record),
            }
        }

        let first = month_start(daily[0].date);
        let last = month_start(daily[daily.len() - 1].date);
        let span = months_between(first, last) + 1;

        let mut sums = vec![0.0_f64; span as usize];
        let mut counts = vec![0_usize; span as usize];
        for record in &daily {
            let idx = months_between(first, month_start(record.date)) as usize;
            sums[idx] += record.sales;
            counts[idx] += 1;
        }

        let mut months = Vec::with_capacity(span as usize);
        let mut values = Vec::with_capacity(span as usize);
        for idx in 0..span as usize {
            let month = add_months(first, idx as i32);
            if counts[idx] == 0 {
                return Err(SalesForecastError::DataError(format!(
                    "No sales observations in {}, monthly history must be contiguous",
                    month.format("%Y-%m")
                )));
            }
            months.push(month);
            values.push(sums[idx] / counts[idx] as f64);
        }

        MonthlySeries::new(months, values)
    }

    /// Find a column whose lowercased name contains `needle`
    fn find_column(df: &DataFrame, needle: &str) -> Result<String> {
        let column_names = df.get_column_names();
        for name in &column_names {
            if name.to_lowercase().contains(needle) {
                return Ok(name.to_string());
            }
        }
        Err(SalesForecastError::DataError(format!(
            "No '{}' column found in data",
            needle
        )))
    }

    /// Read a column as parsed dates
    fn column_as_dates(df: &DataFrame, column_name: &str) -> Result<Vec<NaiveDate>> {
        let col = df.column(column_name).map_err(|e| {
            SalesForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
        })?;

        match col.dtype() {
            DataType::Utf8 => col
                .utf8()
                .unwrap()
                .into_iter()
                .map(|opt| {
                    let raw = opt.ok_or_else(|| {
                        SalesForecastError::DataError(format!(
                            "Null date in column '{}'",
                            column_name
                        ))
                    })?;
                    parse_date(raw)
                })
                .collect(),
            DataType::Date => col
                .date()
                .unwrap()
                .into_iter()
                .map(|opt| {
                    // signed offset from the epoch, dates before 1970 included
                    let days = opt.ok_or_else(|| {
                        SalesForecastError::DataError(format!(
                            "Null date in column '{}'",
                            column_name
                        ))
                    })?;
                    Ok(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
                        + chrono::Duration::days(days as i64))
                })
                .collect(),
            other => Err(SalesForecastError::DataError(format!(
                "Column '{}' has dtype {:?}, expected dates",
                column_name, other
            ))),
        }
    }

    /// Read a column as f64 values
    fn column_as_f64(df: &DataFrame, column_name: &str) -> Result<Vec<f64>> {
        let col = df.column(column_name).map_err(|e| {
            SalesForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
        })?;

        match col.dtype() {
            DataType::Float64 => Ok(col.f64().unwrap().into_iter().flatten().collect()),
            DataType::Float32 => Ok(col
                .f32()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            DataType::Int64 => Ok(col
                .i64()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            DataType::Int32 => Ok(col
                .i32()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            _ => Err(SalesForecastError::DataError(format!(
                "Column '{}' cannot be converted to f64",
                column_name
            ))),
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), format) {
            return Ok(date);
        }
    }
    Err(SalesForecastError::DataError(format!(
        "Unparseable date '{}'",
        raw
    )))
}

impl MonthlySeries {
    /// Create a series from month starts and values
    pub fn new(months: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if months.len() != values.len() {
            return Err(SalesForecastError::ValidationError(format!(
                "Months length ({}) doesn't match values length ({})",
                months.len(),
                values.len()
            )));
        }
        for (idx, &month) in months.iter().enumerate() {
            if month != month_start(month) {
                return Err(SalesForecastError::ValidationError(format!(
                    "{} is not a month start",
                    month
                )));
            }
            if idx > 0 && months_between(months[idx - 1], month) != 1 {
                return Err(SalesForecastError::ValidationError(format!(
                    "Months are not contiguous around {}",
                    month
                )));
            }
        }
        Ok(Self { months, values })
    }

    /// The month-start dates
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    /// The average monthly sales values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of months in the series
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// First month of the series
    pub fn first_month(&self) -> Option<NaiveDate> {
        self.months.first().copied()
    }

    /// Last month of the series
    pub fn last_month(&self) -> Option<NaiveDate> {
        self.months.last().copied()
    }

    /// Calculate the mean of the monthly values
    pub fn mean(&self) -> Result<f64> {
        if self.values.is_empty() {
            return Err(SalesForecastError::DataError(
                "No monthly values available".to_string(),
            ));
        }
        let sum: f64 = self.values.iter().sum();
        Ok(sum / self.values.len() as f64)
    }

    /// Calculate the standard deviation of the monthly values
    pub fn std_dev(&self) -> Result<f64> {
        let mean = self.mean()?;
        let variance: f64 = self
            .values
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / self.values.len() as f64;
        Ok(variance.sqrt())
    }
}
