//! Model bank
//!
//! One fitted ARIMA model per pollutant, trained once from the full dataset
//! and read-only afterwards. A pollutant whose model cannot be fitted fails
//! the whole training run; there is no fallback model.
//!
//! Missing readings (NaN cells) are interpolated before fitting, so a few
//! empty cells do not stop training. A series with no observed value at all
//! is passed through unchanged and fails the fit.

use std::num::NonZeroUsize;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use airquality_spi::{
    AirQualityError, Forecaster, ModelOrder, ModelOrders, Pollutant, Predictor, Result,
};

use crate::arima::Arima;
use crate::dataset::Dataset;

/// A fitted model together with the order it was fitted with
#[derive(Debug, Clone)]
pub struct FittedModel {
    pollutant: Pollutant,
    order: ModelOrder,
    model: Arima,
}

impl FittedModel {
    pub fn pollutant(&self) -> Pollutant {
        self.pollutant
    }

    pub fn order(&self) -> ModelOrder {
        self.order
    }

    pub fn model(&self) -> &Arima {
        &self.model
    }
}

/// Fitted models for all eight pollutants
#[derive(Debug, Clone)]
pub struct ModelBank {
    /// Indexed by [`Pollutant::index`]; always holds eight entries
    models: Vec<FittedModel>,
}

impl ModelBank {
    /// Fit one model per pollutant against its full history
    ///
    /// The eight fits run in parallel.
    pub fn train(dataset: &Dataset, orders: &ModelOrders) -> Result<Self> {
        let started = Instant::now();

        let models = Pollutant::ALL
            .par_iter()
            .map(|&pollutant| fit_pollutant(dataset, pollutant, orders.get(pollutant)))
            .collect::<Result<Vec<_>>>()?;

        info!(
            models = models.len(),
            observations = dataset.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model bank trained"
        );
        Ok(Self { models })
    }

    /// Fitted entry for `pollutant`
    pub fn entry(&self, pollutant: Pollutant) -> &FittedModel {
        &self.models[pollutant.index()]
    }

    /// Order triple used for `pollutant`
    pub fn order(&self, pollutant: Pollutant) -> ModelOrder {
        self.entry(pollutant).order
    }

    /// Effective order table
    pub fn orders(&self) -> ModelOrders {
        self.models
            .iter()
            .fold(ModelOrders::default(), |orders, m| orders.with(m.pollutant, m.order))
    }

    /// Forecast `horizon` values for `pollutant` from the end of the training data
    pub fn forecast(&self, pollutant: Pollutant, horizon: NonZeroUsize) -> Result<Vec<f64>> {
        self.entry(pollutant)
            .model
            .predict(horizon.get())
            .map_err(|source| AirQualityError::Forecast { pollutant, source })
    }
}

impl Forecaster for ModelBank {
    fn forecast(&self, pollutant: Pollutant, horizon: NonZeroUsize) -> Result<Vec<f64>> {
        ModelBank::forecast(self, pollutant, horizon)
    }
}

fn fit_pollutant(dataset: &Dataset, pollutant: Pollutant, order: ModelOrder) -> Result<FittedModel> {
    let fit_error = |source| AirQualityError::ModelFit {
        pollutant,
        order,
        source,
    };

    let mut values = dataset.series_for(pollutant).values().to_vec();
    let filled = fill_missing(&mut values);
    if filled > 0 {
        warn!(%pollutant, filled, "interpolated missing values before fitting");
    }

    let mut model = Arima::from_order(order).map_err(fit_error)?;
    model.fit(&values).map_err(fit_error)?;

    debug!(
        %pollutant,
        %order,
        iterations = model.iterations(),
        sigma2 = model.residual_variance(),
        "fitted pollutant model"
    );
    Ok(FittedModel {
        pollutant,
        order,
        model,
    })
}

/// Fill NaN gaps in place and return how many values were filled
///
/// Interior gaps are interpolated linearly between the nearest observed
/// neighbours; leading and trailing gaps take the nearest observed value.
/// A series without any observed value is left as is.
fn fill_missing(values: &mut [f64]) -> usize {
    let observed: Vec<usize> = (0..values.len()).filter(|&i| !values[i].is_nan()).collect();
    let (Some(&first), Some(&last)) = (observed.first(), observed.last()) else {
        return 0;
    };

    let mut filled = first + (values.len() - 1 - last);
    let head = values[first];
    values[..first].fill(head);
    let tail = values[last];
    values[last + 1..].fill(tail);

    for pair in observed.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (from, to) = (values[a], values[b]);
        let span = (b - a) as f64;
        for (step, value) in values[a + 1..b].iter_mut().enumerate() {
            *value = from + (to - from) * (step + 1) as f64 / span;
        }
        filled += b - a - 1;
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use airquality_spi::{Concentrations, ModelError, RawRecord};

    fn hourly_dataset(hours: usize) -> Dataset {
        let rows = (0..hours).map(|h| {
            let t = h as f64;
            let date = format!("2024-01-{:02} {:02}:00", 1 + h / 24, h % 24);
            let values = Concentrations::from_fn(|p| {
                let k = p.index() as f64 + 1.0;
                20.0 * k + 5.0 * (t * 0.26 + k).sin() + ((t * k * 1.7).cos() * 0.8)
            });
            RawRecord::reading(&date, &values)
        });
        Dataset::load(rows).unwrap()
    }

    fn horizon(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_train_all_pollutants() {
        let dataset = hourly_dataset(240);
        let bank = ModelBank::train(&dataset, &ModelOrders::default()).unwrap();

        for pollutant in Pollutant::ALL {
            assert_eq!(bank.entry(pollutant).pollutant(), pollutant);
            assert_eq!(bank.order(pollutant), ModelOrders::default().get(pollutant));
            assert!(bank.entry(pollutant).model().is_fitted());
        }
        assert_eq!(bank.orders(), ModelOrders::default());
    }

    #[test]
    fn test_forecast_length_and_determinism() {
        let dataset = hourly_dataset(240);
        let bank = ModelBank::train(&dataset, &ModelOrders::default()).unwrap();

        let first = bank.forecast(Pollutant::Pm2_5, horizon(24)).unwrap();
        let second = bank.forecast(Pollutant::Pm2_5, horizon(24)).unwrap();
        assert_eq!(first.len(), 24);
        assert_eq!(first, second);
        assert!(first.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_fit_failure_names_pollutant_and_order() {
        let dataset = hourly_dataset(20);
        let orders = ModelOrders::uniform(ModelOrder::new(1, 0, 0))
            .with(Pollutant::Nh3, ModelOrder::new(2, 1, 6));

        let err = ModelBank::train(&dataset, &orders).unwrap_err();
        assert_eq!(
            err,
            AirQualityError::ModelFit {
                pollutant: Pollutant::Nh3,
                order: ModelOrder::new(2, 1, 6),
                source: ModelError::InsufficientData {
                    required: 33,
                    actual: 20
                },
            }
        );
    }

    #[test]
    fn test_invalid_order_is_fit_error() {
        let dataset = hourly_dataset(100);
        let orders = ModelOrders::default().with(Pollutant::Co, ModelOrder::new(12, 1, 0));

        let err = ModelBank::train(&dataset, &orders).unwrap_err();
        assert!(matches!(
            err,
            AirQualityError::ModelFit {
                pollutant: Pollutant::Co,
                source: ModelError::InvalidParameter { .. },
                ..
            }
        ));
    }

    /// `hourly_dataset(hours)` rows with `column` emptied at each of `gaps`
    fn gappy_dataset(hours: usize, column: &str, gaps: &[usize]) -> Dataset {
        let mut rows: Vec<RawRecord> = hourly_dataset(hours)
            .readings()
            .iter()
            .map(|r| {
                RawRecord::reading(
                    &crate::timestamp::format_timestamp(&r.timestamp()),
                    r.concentrations(),
                )
            })
            .collect();
        for &gap in gaps {
            rows[gap] = rows[gap].clone().with(column, "");
        }
        Dataset::load(rows).unwrap()
    }

    #[test]
    fn test_fill_missing_interpolates_and_carries_edges() {
        let mut values = [f64::NAN, 1.0, f64::NAN, 3.0, f64::NAN, f64::NAN, 9.0, f64::NAN];
        assert_eq!(fill_missing(&mut values), 5);
        assert_eq!(values, [1.0, 1.0, 2.0, 3.0, 5.0, 7.0, 9.0, 9.0]);

        let mut complete = [4.0, 5.0];
        assert_eq!(fill_missing(&mut complete), 0);
        assert_eq!(complete, [4.0, 5.0]);

        let mut empty = [f64::NAN, f64::NAN];
        assert_eq!(fill_missing(&mut empty), 0);
        assert!(empty.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_gappy_series_still_trains() {
        let dataset = gappy_dataset(500, "pm10", &[0, 250, 251, 499]);
        assert!(dataset.series_for(Pollutant::Pm10).values()[250].is_nan());

        let bank = ModelBank::train(&dataset, &ModelOrders::default()).unwrap();
        assert_eq!(bank.order(Pollutant::Pm10), ModelOrder::new(2, 1, 2));

        let forecast = bank.forecast(Pollutant::Pm10, horizon(24)).unwrap();
        assert_eq!(forecast.len(), 24);
        assert!(forecast.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_all_missing_series_fails_training() {
        let gaps: Vec<usize> = (0..100).collect();
        let dataset = gappy_dataset(100, "o3", &gaps);

        let err = ModelBank::train(&dataset, &ModelOrders::default()).unwrap_err();
        assert!(matches!(
            err,
            AirQualityError::ModelFit {
                pollutant: Pollutant::O3,
                source: ModelError::InvalidData(_),
                ..
            }
        ));
    }

    #[test]
    fn test_bank_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ModelBank>();
    }
}
