//! Forecasting models for monthly sales data

use crate::data::MonthlySeries;
use crate::error::Result;
use chrono::NaiveDate;
use std::fmt::Debug;

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Predicted mean per monthly period covering `[start, end]`
    ///
    /// Callers pass an ordered pair; months inside the training history
    /// return in-sample one-step-ahead means, months past it return
    /// iterated forecasts, months before it are rejected.
    fn predict_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<(NaiveDate, f64)>>;

    /// Forecast `horizon` months past the end of the training history
    fn monthly_forecast(&self, horizon: usize) -> Result<Vec<(NaiveDate, f64)>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a monthly series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a monthly series
    fn train(&self, data: &MonthlySeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod seasonal_arima;
