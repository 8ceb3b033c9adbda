//! ARIMA (AutoRegressive Integrated Moving Average) implementation
//!
//! The model combines three components:
//!
//! - **AR (AutoRegressive)**: regression on the last `p` values
//! - **I (Integrated)**: `d` rounds of differencing to reach stationarity
//! - **MA (Moving Average)**: regression on the last `q` innovations
//!
//! ## Estimation
//!
//! Coefficients are estimated with the Hannan–Rissanen procedure: a long
//! autoregression (solved with Levinson–Durbin) supplies innovation
//! estimates, then the AR and MA coefficients come from a least-squares
//! regression on lagged values and lagged innovations. The regression is
//! repeated with innovations recomputed from the current estimate until the
//! coefficients settle, keeping the estimate with the lowest conditional sum
//! of squares. Estimation is fully deterministic.
//!
//! A constant (the series mean) is only included when `d == 0`; differenced
//! models carry no drift term.
//!
//! ## Example
//!
//! ```rust
//! use airquality_core::arima::Arima;
//! use airquality_core::Predictor;
//!
//! let data: Vec<f64> = (0..60).map(|x| 10.0 + (x as f64 * 0.7).sin()).collect();
//! let mut model = Arima::new(2, 0, 1).unwrap();
//! model.fit(&data).unwrap();
//! let forecast = model.predict(3).unwrap();
//! assert_eq!(forecast.len(), 3);
//! ```

use serde::{Deserialize, Serialize};

use airquality_spi::{ModelError, ModelOrder, ModelResult, Predictor};

const MAX_AR_ORDER: usize = 10;
const MAX_DIFF_ORDER: usize = 2;
const MAX_MA_ORDER: usize = 10;
const DEFAULT_MAX_ITERATIONS: usize = 25;
const DEFAULT_TOLERANCE: f64 = 1e-6;
const VARIANCE_EPSILON: f64 = 1e-12;
const PIVOT_EPSILON: f64 = 1e-12;
const RIDGE: f64 = 1e-8;
const MA_BOUND: f64 = 0.99;

/// ARIMA model for time series forecasting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arima {
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
    /// AR coefficients
    ar_coeffs: Vec<f64>,
    /// MA coefficients
    ma_coeffs: Vec<f64>,
    /// Mean of the differenced series (zero when d > 0)
    constant: f64,
    /// Last value of each differencing level, original scale first
    tails: Vec<f64>,
    /// Differenced data
    differenced_data: Vec<f64>,
    /// Innovations from the final estimate
    residuals: Vec<f64>,
    /// Innovation variance
    sigma2: f64,
    /// Refinement passes performed while fitting
    iterations: usize,
    max_iterations: usize,
    tolerance: f64,
    /// Whether the model has been fitted
    fitted: bool,
}

impl Arima {
    /// Create a new ARIMA model with specified orders
    ///
    /// # Arguments
    ///
    /// * `p` - Order of autoregressive component (0-10)
    /// * `d` - Degree of differencing (0-2)
    /// * `q` - Order of moving average component (0-10)
    pub fn new(p: usize, d: usize, q: usize) -> ModelResult<Self> {
        if p > MAX_AR_ORDER {
            return Err(ModelError::InvalidParameter {
                name: "p".to_string(),
                reason: format!("AR order must be <= {}", MAX_AR_ORDER),
            });
        }
        if d > MAX_DIFF_ORDER {
            return Err(ModelError::InvalidParameter {
                name: "d".to_string(),
                reason: format!("Differencing order must be <= {}", MAX_DIFF_ORDER),
            });
        }
        if q > MAX_MA_ORDER {
            return Err(ModelError::InvalidParameter {
                name: "q".to_string(),
                reason: format!("MA order must be <= {}", MAX_MA_ORDER),
            });
        }

        Ok(Self {
            p,
            d,
            q,
            ar_coeffs: vec![0.0; p],
            ma_coeffs: vec![0.0; q],
            constant: 0.0,
            tails: Vec::new(),
            differenced_data: Vec::new(),
            residuals: Vec::new(),
            sigma2: 0.0,
            iterations: 0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            fitted: false,
        })
    }

    /// Create a model from an order triple
    pub fn from_order(order: ModelOrder) -> ModelResult<Self> {
        Self::new(order.p, order.d, order.q)
    }

    /// Cap on refinement passes (at least 1)
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Minimum number of observations needed to fit this order
    pub fn min_observations(&self) -> usize {
        self.d + 2 * self.p + 3 * self.q + 10
    }

    /// Get model parameters
    pub fn params(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    /// Get the order triple
    pub fn order(&self) -> ModelOrder {
        ModelOrder::new(self.p, self.d, self.q)
    }

    /// Get AR coefficients
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coeffs
    }

    /// Get MA coefficients
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coeffs
    }

    /// Constant of the differenced model
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Innovation variance of the fitted model
    pub fn residual_variance(&self) -> f64 {
        self.sigma2
    }

    /// Refinement passes used by the last fit
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Apply differencing `order` times, recording the last value of each level
    fn difference(data: &[f64], order: usize) -> (Vec<f64>, Vec<f64>) {
        let mut tails = Vec::with_capacity(order);
        let mut result = data.to_vec();
        for _ in 0..order {
            tails.push(result[result.len() - 1]);
            result = result.windows(2).map(|w| w[1] - w[0]).collect();
        }
        (result, tails)
    }

    /// Reverse differencing level by level
    fn integrate(&self, forecasts: &[f64]) -> Vec<f64> {
        let mut result = forecasts.to_vec();
        for tail in self.tails.iter().rev() {
            let mut running = *tail;
            for value in result.iter_mut() {
                running += *value;
                *value = running;
            }
        }
        result
    }

    /// Innovations implied by `ar`/`ma` over the centered series
    fn innovations(z: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
        let p = ar.len();
        let mut residuals = vec![0.0; z.len()];
        for t in p..z.len() {
            let mut prediction = 0.0;
            for (j, phi) in ar.iter().enumerate() {
                prediction += phi * z[t - j - 1];
            }
            for (j, theta) in ma.iter().enumerate() {
                if t > j {
                    prediction += theta * residuals[t - j - 1];
                }
            }
            residuals[t] = z[t] - prediction;
        }
        residuals
    }

    /// Conditional sum of squares over the usable span
    fn css(residuals: &[f64], start: usize) -> f64 {
        residuals[start..].iter().map(|e| e * e).sum()
    }

    /// Least-squares AR/MA coefficients given innovation estimates
    fn regress(&self, z: &[f64], innovations: &[f64], start: usize) -> ModelResult<Vec<f64>> {
        let rows: Vec<Vec<f64>> = (start..z.len())
            .map(|t| {
                (1..=self.p)
                    .map(|j| z[t - j])
                    .chain((1..=self.q).map(|j| innovations[t - j]))
                    .collect()
            })
            .collect();
        let mut params = least_squares(&rows, &z[start..])?;
        stabilize_ma(&mut params[self.p..]);
        Ok(params)
    }

    /// Order of the long autoregression used to seed innovations
    fn long_ar_order(&self, n: usize) -> usize {
        let target = ((n as f64).log10() * 10.0).ceil() as usize;
        let cap = n.saturating_sub(self.p + 2 * self.q + 10);
        target.max(self.p + self.q).max(1).min(cap.max(1))
    }

    fn estimate(&mut self, z: &[f64]) -> ModelResult<()> {
        let (p, q) = (self.p, self.q);
        let n = z.len();

        if p == 0 && q == 0 {
            self.residuals = z.to_vec();
            self.iterations = 0;
            return Ok(());
        }

        let (seed, start) = if q == 0 {
            (vec![0.0; n], p)
        } else {
            let m = self.long_ar_order(n);
            let long_ar = levinson_durbin(z, m);
            (Self::innovations(z, &long_ar, &[]), (m + q).max(p))
        };

        let mut params = self.regress(z, &seed, start)?;
        let mut best: Option<(f64, Vec<f64>, Vec<f64>)> = None;
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            let (ar, ma) = params.split_at(p);
            let residuals = Self::innovations(z, ar, ma);
            let css = Self::css(&residuals, p);
            if !css.is_finite() {
                break;
            }
            if best.as_ref().map_or(true, |(b, _, _)| css < *b) {
                best = Some((css, params.clone(), residuals.clone()));
            }
            if q == 0 {
                break;
            }

            let next = self.regress(z, &residuals, p.max(q))?;
            let change = next
                .iter()
                .zip(&params)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            params = next;
            if change < self.tolerance {
                break;
            }
        }

        let (_, params, residuals) =
            best.ok_or(ModelError::ConvergenceFailure { iterations })?;
        self.ar_coeffs = params[..p].to_vec();
        self.ma_coeffs = params[p..].to_vec();
        self.residuals = residuals;
        self.iterations = iterations;
        Ok(())
    }
}

impl Predictor for Arima {
    fn fit(&mut self, data: &[f64]) -> ModelResult<()> {
        self.fitted = false;

        let min_required = self.min_observations();
        if data.len() < min_required {
            return Err(ModelError::InsufficientData {
                required: min_required,
                actual: data.len(),
            });
        }

        // Check for invalid values
        if data.iter().any(|x| x.is_nan() || x.is_infinite()) {
            return Err(ModelError::InvalidData(
                "Data contains NaN or infinite values".to_string(),
            ));
        }

        let (differenced, tails) = Self::difference(data, self.d);
        let n = differenced.len();
        let mean = differenced.iter().sum::<f64>() / n as f64;
        let variance = differenced.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        self.tails = tails;
        self.ar_coeffs = vec![0.0; self.p];
        self.ma_coeffs = vec![0.0; self.q];

        if variance < VARIANCE_EPSILON {
            // Constant differenced series: carry the constant step forward
            self.constant = mean;
            self.residuals = vec![0.0; n];
            self.iterations = 0;
        } else {
            self.constant = if self.d == 0 { mean } else { 0.0 };
            let centered: Vec<f64> = differenced.iter().map(|x| x - self.constant).collect();
            self.estimate(&centered)?;
        }

        let usable = n.saturating_sub(self.p).max(1);
        self.sigma2 = Self::css(&self.residuals, self.p.min(n)) / usable as f64;
        self.differenced_data = differenced;
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, steps: usize) -> ModelResult<Vec<f64>> {
        if !self.fitted {
            return Err(ModelError::NotFitted);
        }

        if steps == 0 {
            return Ok(Vec::new());
        }

        let n = self.differenced_data.len();
        let mut extended: Vec<f64> = self
            .differenced_data
            .iter()
            .map(|x| x - self.constant)
            .collect();
        let mut extended_residuals = self.residuals.clone();

        // Generate forecasts on the centered, differenced scale
        for _ in 0..steps {
            let mut forecast = 0.0;

            // AR component
            for (j, phi) in self.ar_coeffs.iter().enumerate() {
                forecast += phi * extended[extended.len() - j - 1];
            }

            // MA component
            for (j, theta) in self.ma_coeffs.iter().enumerate() {
                if extended_residuals.len() > j {
                    forecast += theta * extended_residuals[extended_residuals.len() - j - 1];
                }
            }

            extended.push(forecast);
            extended_residuals.push(0.0); // Future innovations are 0
        }

        let forecasts: Vec<f64> = extended[n..].iter().map(|x| x + self.constant).collect();
        Ok(self.integrate(&forecasts))
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

/// Shrink MA coefficients so their absolute sum stays below one, which keeps
/// the innovation recursion invertible
fn stabilize_ma(ma: &mut [f64]) {
    let total: f64 = ma.iter().map(|t| t.abs()).sum();
    if total >= MA_BOUND {
        let scale = MA_BOUND / total;
        ma.iter_mut().for_each(|t| *t *= scale);
    }
}

/// Yule-Walker AR coefficients of order `order` via Levinson-Durbin
fn levinson_durbin(z: &[f64], order: usize) -> Vec<f64> {
    let n = z.len();
    let autocov: Vec<f64> = (0..=order)
        .map(|k| (k..n).map(|i| z[i] * z[i - k]).sum::<f64>() / n as f64)
        .collect();

    let mut coeffs = vec![0.0; order];
    let mut error = autocov[0];
    for k in 0..order {
        if error.abs() < VARIANCE_EPSILON {
            break;
        }
        let mut acc = autocov[k + 1];
        for j in 0..k {
            acc -= coeffs[j] * autocov[k - j];
        }
        let reflection = acc / error;

        let previous = coeffs.clone();
        coeffs[k] = reflection;
        for j in 0..k {
            coeffs[j] = previous[j] - reflection * previous[k - 1 - j];
        }
        error *= 1.0 - reflection * reflection;
    }
    coeffs
}

/// Solve the (lightly ridged) normal equations `X'X b = X'y`
fn least_squares(rows: &[Vec<f64>], y: &[f64]) -> ModelResult<Vec<f64>> {
    let k = rows.first().map_or(0, Vec::len);
    if k == 0 {
        return Ok(Vec::new());
    }
    if rows.len() < k {
        return Err(ModelError::InsufficientData {
            required: k,
            actual: rows.len(),
        });
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, target) in rows.iter().zip(y) {
        for i in 0..k {
            xty[i] += row[i] * target;
            for j in 0..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    let trace: f64 = (0..k).map(|i| xtx[i][i]).sum();
    let ridge = RIDGE * trace / k as f64;
    for (i, row) in xtx.iter_mut().enumerate() {
        row[i] += ridge;
    }

    solve(xtx, xty)
}

/// Gaussian elimination with partial pivoting
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> ModelResult<Vec<f64>> {
    let k = b.len();
    for col in 0..k {
        let pivot = (col..k)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if !a[pivot][col].is_finite() || a[pivot][col].abs() < PIVOT_EPSILON {
            return Err(ModelError::NumericalError(
                "singular design matrix".to_string(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..k {
            let factor = a[row][col] / a[col][col];
            for c in col..k {
                a[row][c] -= factor * a[col][c];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; k];
    for row in (0..k).rev() {
        let mut acc = b[row];
        for c in (row + 1)..k {
            acc -= a[row][c] * x[c];
        }
        x[row] = acc / a[row][row];
    }
    Ok(x)
}
