//! Seasonal ARIMA model for monthly series

use crate::data::MonthlySeries;
use crate::error::{Result, SalesForecastError};
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::utils::{add_months, month_starts_in, months_between};
use chrono::NaiveDate;

/// Seasonal ARIMA model specification
///
/// `order` is the regular (p, d, q) triple, `seasonal` the (P, D, Q) triple
/// at period `s`. Coefficients are estimated at training time with a
/// two-stage least-squares fit (a long autoregression supplies residual
/// estimates for the moving-average terms).
#[derive(Debug, Clone)]
pub struct SeasonalArima {
    name: String,
    p: usize,
    d: usize,
    q: usize,
    sp: usize,
    sd: usize,
    sq: usize,
    s: usize,
}

/// Trained seasonal ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedSeasonalArima {
    name: String,
    /// Regular AR coefficients
    phi: Vec<f64>,
    /// Seasonal AR coefficients
    sphi: Vec<f64>,
    /// Regular MA coefficients
    theta: Vec<f64>,
    /// Seasonal MA coefficients
    stheta: Vec<f64>,
    /// Seasonal period
    s: usize,
    /// Differencing chain: levels first, then each successive difference
    stack: Vec<Vec<f64>>,
    /// Lag used to produce stack[i + 1] from stack[i]
    lags: Vec<usize>,
    /// Residuals on the fully differenced scale
    residuals: Vec<f64>,
    /// In-sample one-step-ahead means on the level scale
    fitted: Vec<f64>,
    /// First month of the training history
    first_month: NaiveDate,
}

impl SeasonalArima {
    /// Create a new seasonal ARIMA model
    pub fn new(order: (usize, usize, usize), seasonal: (usize, usize, usize, usize)) -> Result<Self> {
        let (p, d, q) = order;
        let (sp, sd, sq) = (seasonal.0, seasonal.1, seasonal.2);
        let s = seasonal.3;

        if (sp > 0 || sd > 0 || sq > 0) && s < 2 {
            return Err(SalesForecastError::ValidationError(format!(
                "Seasonal period must be at least 2, got {}",
                s
            )));
        }

        Ok(Self {
            name: format!(
                "SARIMA({},{},{})({},{},{})[{}]",
                p, d, q, sp, sd, sq, s
            ),
            p,
            d,
            q,
            sp,
            sd,
            sq,
            s,
        })
    }

    /// The specification used for the pretrained monthly sales model
    pub fn monthly_default() -> Self {
        // new() only rejects a degenerate seasonal period
        Self::new((1, 1, 1), (1, 1, 0, 12)).unwrap()
    }

    fn warmup(&self) -> usize {
        [self.p, self.sp * self.s, self.q, self.sq * self.s]
            .into_iter()
            .max()
            .unwrap_or(0)
    }
}

impl ForecastModel for SeasonalArima {
    type Trained = TrainedSeasonalArima;

    fn train(&self, data: &MonthlySeries) -> Result<TrainedSeasonalArima> {
        let values = data.values();
        let offset = self.d + self.sd * self.s;
        let coeff_count = self.p + self.sp + self.q + self.sq;
        let warmup = self.warmup();

        if values.len() <= offset + warmup + coeff_count + 1 {
            return Err(SalesForecastError::ValidationError(format!(
                "Insufficient data for {}. Need at least {} observations, got {}.",
                self.name,
                offset + warmup + coeff_count + 2,
                values.len()
            )));
        }

        // Differencing chain, regular first, then seasonal
        let mut stack: Vec<Vec<f64>> = vec![values.to_vec()];
        let mut lags: Vec<usize> = Vec::new();
        for _ in 0..self.d {
            let next = difference(stack.last().unwrap(), 1);
            stack.push(next);
            lags.push(1);
        }
        for _ in 0..self.sd {
            let next = difference(stack.last().unwrap(), self.s);
            stack.push(next);
            lags.push(self.s);
        }

        let w = stack.last().unwrap().clone();
        let n_w = w.len();

        // Stage one: long autoregression, residuals stand in for the
        // unobserved innovations of the MA terms
        let innovations = if self.q + self.sq > 0 {
            long_ar_residuals(&w, (self.p + self.sp * self.s + self.q + self.sq * self.s).max(1))?
        } else {
            vec![0.0; n_w]
        };

        // Stage two: regress on AR lags, seasonal AR lags and lagged innovations
        let ar_lags: Vec<usize> = (1..=self.p).collect();
        let sar_lags: Vec<usize> = (1..=self.sp).map(|j| j * self.s).collect();
        let ma_lags: Vec<usize> = (1..=self.q).collect();
        let sma_lags: Vec<usize> = (1..=self.sq).map(|j| j * self.s).collect();

        let (phi, sphi, theta, stheta) = if coeff_count > 0 {
            let mut rows = Vec::with_capacity(n_w - warmup);
            let mut targets = Vec::with_capacity(n_w - warmup);
            for t in warmup..n_w {
                let mut row = Vec::with_capacity(coeff_count);
                for &lag in ar_lags.iter().chain(sar_lags.iter()) {
                    row.push(w[t - lag]);
                }
                for &lag in ma_lags.iter().chain(sma_lags.iter()) {
                    row.push(innovations[t - lag]);
                }
                rows.push(row);
                targets.push(w[t]);
            }
            let coeffs = least_squares(&rows, &targets)?;
            let (ar_part, rest) = coeffs.split_at(self.p);
            let (sar_part, rest) = rest.split_at(self.sp);
            let (ma_part, sma_part) = rest.split_at(self.q);
            (
                ar_part.to_vec(),
                sar_part.to_vec(),
                ma_part.to_vec(),
                sma_part.to_vec(),
            )
        } else {
            (Vec::new(), Vec::new(), Vec::new(), Vec::new())
        };

        // Recursive residual pass with the final coefficients
        let mut residuals = vec![0.0; n_w];
        let mut predicted_w = vec![0.0; n_w];
        for t in 0..n_w {
            if t < warmup {
                // not enough lags yet, fall back on the observed value
                predicted_w[t] = w[t];
                continue;
            }
            let mut pred = 0.0;
            for (i, &lag) in ar_lags.iter().enumerate() {
                pred += phi[i] * w[t - lag];
            }
            for (i, &lag) in sar_lags.iter().enumerate() {
                pred += sphi[i] * w[t - lag];
            }
            for (i, &lag) in ma_lags.iter().enumerate() {
                pred += theta[i] * residuals[t - lag];
            }
            for (i, &lag) in sma_lags.iter().enumerate() {
                pred += stheta[i] * residuals[t - lag];
            }
            predicted_w[t] = pred;
            residuals[t] = w[t] - pred;
        }

        // Back to the level scale: the differencing terms are deterministic
        // functions of past observed levels
        let mut fitted = Vec::with_capacity(values.len());
        for t in 0..values.len() {
            if t < offset {
                fitted.push(values[t]);
            } else {
                fitted.push(predicted_w[t - offset] + (values[t] - w[t - offset]));
            }
        }

        let first_month = data.first_month().ok_or_else(|| {
            SalesForecastError::DataError("Empty monthly series".to_string())
        })?;

        Ok(TrainedSeasonalArima {
            name: self.name.clone(),
            phi,
            sphi,
            theta,
            stheta,
            s: self.s,
            stack,
            lags,
            residuals,
            fitted,
            first_month,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSeasonalArima {
    /// Number of months in the training history
    pub fn history_len(&self) -> usize {
        self.stack[0].len()
    }

    /// First month the model can predict
    pub fn first_month(&self) -> NaiveDate {
        self.first_month
    }

    /// Last month of the training history
    pub fn last_month(&self) -> NaiveDate {
        add_months(self.first_month, self.history_len() as i32 - 1)
    }

    /// In-sample one-step-ahead means on the level scale
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    /// Iterated level-scale forecasts for `horizon` months past the history
    fn forecast_levels(&self, horizon: usize) -> Vec<f64> {
        if horizon == 0 {
            return Vec::new();
        }

        let mut work = self.stack.clone();
        let mut innovations = self.residuals.clone();
        let mut levels = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let deepest = work.len() - 1;
            let t = work[deepest].len();
            let mut pred = 0.0;
            for (i, coeff) in self.phi.iter().enumerate() {
                pred += coeff * work[deepest][t - (i + 1)];
            }
            for (i, coeff) in self.sphi.iter().enumerate() {
                pred += coeff * work[deepest][t - (i + 1) * self.s];
            }
            for (i, coeff) in self.theta.iter().enumerate() {
                let idx = t - (i + 1);
                if idx < innovations.len() {
                    pred += coeff * innovations[idx];
                }
            }
            for (i, coeff) in self.stheta.iter().enumerate() {
                let idx = t - (i + 1) * self.s;
                if idx < innovations.len() {
                    pred += coeff * innovations[idx];
                }
            }
            work[deepest].push(pred);
            // future innovations are zero by construction, the push keeps
            // the MA lag indices aligned with the differenced series
            innovations.push(0.0);

            // undifference back up the chain
            for level in (0..deepest).rev() {
                let lag = self.lags[level];
                let child_value = *work[level + 1].last().unwrap();
                let parent_len = work[level].len();
                let next = child_value + work[level][parent_len - lag];
                work[level].push(next);
            }
            levels.push(*work[0].last().unwrap());
        }

        levels
    }
}

impl TrainedForecastModel for TrainedSeasonalArima {
    fn predict_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<(NaiveDate, f64)>> {
        if start > end {
            return Err(SalesForecastError::InvalidRange(format!(
                "Start {} is after end {}",
                start, end
            )));
        }

        let months = month_starts_in(start, end);
        let n = self.history_len();

        let first_idx = months_between(self.first_month, months[0]);
        if first_idx < 0 {
            return Err(SalesForecastError::InvalidRange(format!(
                "{} is before the first trained month {}",
                months[0], self.first_month
            )));
        }

        let last_idx = months_between(self.first_month, *months.last().unwrap()) as usize;
        let horizon = (last_idx + 1).saturating_sub(n);
        let extrapolated = self.forecast_levels(horizon);

        Ok(months
            .into_iter()
            .map(|month| {
                let idx = months_between(self.first_month, month) as usize;
                let value = if idx < n {
                    self.fitted[idx]
                } else {
                    extrapolated[idx - n]
                };
                (month, value)
            })
            .collect())
    }

    fn monthly_forecast(&self, horizon: usize) -> Result<Vec<(NaiveDate, f64)>> {
        let last = self.last_month();
        let levels = self.forecast_levels(horizon);
        Ok(levels
            .into_iter()
            .enumerate()
            .map(|(step, value)| (add_months(last, step as i32 + 1), value))
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Apply one differencing pass at the given lag
fn difference(series: &[f64], lag: usize) -> Vec<f64> {
    series
        .iter()
        .skip(lag)
        .zip(series.iter())
        .map(|(current, lagged)| current - lagged)
        .collect()
}

/// Residuals of a long autoregression, zero over the warmup prefix
fn long_ar_residuals(w: &[f64], order: usize) -> Result<Vec<f64>> {
    let order = order.min(w.len() / 2).max(1);
    let mut rows = Vec::with_capacity(w.len() - order);
    let mut targets = Vec::with_capacity(w.len() - order);
    for t in order..w.len() {
        rows.push((1..=order).map(|lag| w[t - lag]).collect::<Vec<f64>>());
        targets.push(w[t]);
    }
    let coeffs = least_squares(&rows, &targets)?;

    let mut residuals = vec![0.0; w.len()];
    for t in order..w.len() {
        let pred: f64 = coeffs
            .iter()
            .enumerate()
            .map(|(i, c)| c * w[t - (i + 1)])
            .sum();
        residuals[t] = w[t] - pred;
    }
    Ok(residuals)
}

/// Ridge-stabilized least squares via the normal equations
///
/// A smooth series leaves near-zero innovation columns in the design
/// matrix, so plain X'X can be singular for perfectly valid training
/// input; the ridge term keeps the solve well-posed and shrinks the
/// coefficients of degenerate regressors to zero.
fn least_squares(rows: &[Vec<f64>], targets: &[f64]) -> Result<Vec<f64>> {
    let k = rows.first().map(|r| r.len()).unwrap_or(0);
    if k == 0 || rows.len() < k {
        return Err(SalesForecastError::ForecastingError(format!(
            "Least squares needs at least {} rows, got {}",
            k,
            rows.len()
        )));
    }

    let mut xtx = vec![vec![0.0_f64; k]; k];
    let mut xty = vec![0.0_f64; k];
    for (row, &target) in rows.iter().zip(targets.iter()) {
        for i in 0..k {
            xty[i] += row[i] * target;
            for j in 0..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    let trace: f64 = (0..k).map(|i| xtx[i][i]).sum();
    let ridge = trace / k as f64 * 1e-8 + 1e-12;
    for i in 0..k {
        xtx[i][i] += ridge;
    }

    // Gaussian elimination with partial pivoting
    for col in 0..k {
        let pivot_row = (col..k)
            .max_by(|&a, &b| xtx[a][col].abs().total_cmp(&xtx[b][col].abs()))
            .unwrap();
        xtx.swap(col, pivot_row);
        xty.swap(col, pivot_row);

        for row in col + 1..k {
            let factor = xtx[row][col] / xtx[col][col];
            for j in col..k {
                xtx[row][j] -= factor * xtx[col][j];
            }
            xty[row] -= factor * xty[col];
        }
    }

    let mut coeffs = vec![0.0_f64; k];
    for col in (0..k).rev() {
        let mut value = xty[col];
        for j in col + 1..k {
            value -= xtx[col][j] * coeffs[j];
        }
        coeffs[col] = value / xtx[col][col];
    }

    Ok(coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference() {
        let series = [1.0, 3.0, 6.0, 10.0];
        assert_eq!(difference(&series, 1), vec![2.0, 3.0, 4.0]);
        assert_eq!(difference(&series, 2), vec![5.0, 7.0]);
    }

    #[test]
    fn test_least_squares_recovers_exact_fit() {
        // y = 2*x1 + 3*x2
        let rows = vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![2.0, 1.0],
        ];
        let targets = vec![2.0, 3.0, 5.0, 7.0];
        let coeffs = least_squares(&rows, &targets).unwrap();
        assert!((coeffs[0] - 2.0).abs() < 1e-6);
        assert!((coeffs[1] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_least_squares_rejects_underdetermined() {
        let rows = vec![vec![1.0, 2.0]];
        let targets = vec![1.0];
        assert!(least_squares(&rows, &targets).is_err());
    }

    #[test]
    fn test_least_squares_shrinks_a_degenerate_column() {
        // second regressor is identically zero; its coefficient must come
        // back (near) zero instead of the solve failing
        let rows = vec![
            vec![1.0, 0.0],
            vec![2.0, 0.0],
            vec![3.0, 0.0],
            vec![4.0, 0.0],
        ];
        let targets = vec![2.0, 4.0, 6.0, 8.0];
        let coeffs = least_squares(&rows, &targets).unwrap();
        assert!((coeffs[0] - 2.0).abs() < 1e-6);
        assert!(coeffs[1].abs() < 1e-6);
    }

    #[test]
    fn test_least_squares_handles_an_all_zero_design() {
        let rows = vec![vec![0.0], vec![0.0], vec![0.0]];
        let targets = vec![0.0, 0.0, 0.0];
        let coeffs = least_squares(&rows, &targets).unwrap();
        assert!(coeffs[0].abs() < 1e-6);
    }
}
