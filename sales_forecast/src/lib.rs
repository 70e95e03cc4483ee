//! # Sales Forecast
//!
//! A Rust library for monthly sales forecasting behind a small dashboard.
//!
//! ## Features
//!
//! - Sales ledger loading and month-start resampling
//! - A seasonal ARIMA model fitted once per process
//! - Date-range resolution from raw user inputs (single date, explicit
//!   span, or forward/backward extension of one date)
//! - Forecast tables with CSV export and a single-prediction summary
//! - Memoization of forecast tables keyed by model and range
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_forecast::data::SalesHistory;
//! use sales_forecast::models::seasonal_arima::SeasonalArima;
//! use sales_forecast::models::ForecastModel;
//! use sales_forecast::range::{self, DateRangeRequest};
//! use sales_forecast::forecast::ForecastRunner;
//! use chrono::NaiveDate;
//!
//! # fn main() -> sales_forecast::error::Result<()> {
//! // Load and resample the ledger
//! let history = SalesHistory::from_csv("Sales_data.csv")?;
//! let monthly = history.resample_monthly()?;
//!
//! // Fit the model once
//! let model = SeasonalArima::monthly_default().train(&monthly)?;
//!
//! // Resolve the user's inputs and run the forecast
//! let request = DateRangeRequest::single(NaiveDate::from_ymd_opt(2023, 6, 15).unwrap());
//! let resolved = range::resolve(&request);
//! let table = ForecastRunner::run(&model, &resolved)?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod data;
pub mod error;
pub mod forecast;
pub mod models;
pub mod range;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use crate::cache::ForecastCache;
pub use crate::data::{MonthlySeries, SalesHistory};
pub use crate::error::SalesForecastError;
pub use crate::forecast::{ForecastRow, ForecastRunner};
pub use crate::models::{ForecastModel, TrainedForecastModel};
pub use crate::range::{
    resolve, DateRangeRequest, ExtendDirection, PredictionMode, ResolvedRange,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
