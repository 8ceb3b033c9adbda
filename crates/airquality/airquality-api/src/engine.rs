//! Startup orchestration
//!
//! Loading and training happen strictly before a context exists: the engine
//! either hands back a fully trained [`AirQualityContext`] or an error.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use airquality_core::{AirQualityContext, CsvRecordSource, Dataset, ModelBank};
use airquality_spi::{AirQualityError, RecordSource, Result};

use crate::config::EngineConfig;

/// Builds ready-to-query contexts from record sources
#[derive(Debug, Clone, Default)]
pub struct AirQualityEngine {
    config: EngineConfig,
}

impl AirQualityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine with the default order table and horizon
    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load a dataset from `source`
    pub fn load(&self, source: &dyn RecordSource) -> Result<Dataset> {
        Dataset::from_source(source)
    }

    /// Fit the model bank and package it with `dataset`
    ///
    /// The fit budget is checked once training has returned; fitting itself
    /// is never interrupted. Fails with [`AirQualityError::FitBudgetExceeded`]
    /// when a budget is configured and the completed fit took at least that
    /// long. A budget of zero can never be met.
    pub fn train(&self, dataset: Dataset) -> Result<AirQualityContext> {
        let started = Instant::now();
        let bank = ModelBank::train(&dataset, &self.config.orders)?;
        let elapsed = started.elapsed();

        if let Some(budget_ms) = self.config.fit_budget_ms {
            if elapsed >= Duration::from_millis(budget_ms) {
                warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms, "model fitting exceeded its budget"
                );
                return Err(AirQualityError::FitBudgetExceeded {
                    elapsed_ms: elapsed.as_millis(),
                    budget_ms,
                });
            }
        }

        Ok(AirQualityContext::new(dataset, bank).with_horizon(self.config.horizon))
    }

    /// Load from `source`, then train
    pub fn start(&self, source: &dyn RecordSource) -> Result<AirQualityContext> {
        let dataset = self.load(source)?;
        let context = self.train(dataset)?;
        info!(
            source = source.name(),
            readings = context.dataset().len(),
            horizon = context.horizon().get(),
            "engine ready"
        );
        Ok(context)
    }

    /// Load a CSV file, then train
    pub fn start_from_csv(&self, path: impl AsRef<Path>) -> Result<AirQualityContext> {
        self.start(&CsvRecordSource::from_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airquality_spi::{ModelOrder, ModelOrders, Pollutant};

    fn csv(hours: usize) -> String {
        let mut text = String::from("date,co,no,no2,o3,so2,pm2_5,pm10,nh3\n");
        for h in 0..hours {
            let t = h as f64;
            let row: Vec<String> = (0..8)
                .map(|k| {
                    let k = k as f64 + 1.0;
                    format!("{:.3}", 25.0 * k + 6.0 * (t * 0.3 + k).sin() + (t * 1.3 * k).cos())
                })
                .collect();
            text.push_str(&format!(
                "2024-03-{:02} {:02}:00,{}\n",
                1 + h / 24,
                h % 24,
                row.join(",")
            ));
        }
        text
    }

    fn small_orders() -> EngineConfig {
        EngineConfig::builder()
            .orders(ModelOrders::uniform(ModelOrder::new(1, 1, 1)))
            .horizon(4)
            .build()
            .unwrap()
    }

    #[test]
    fn test_start_from_text() {
        let engine = AirQualityEngine::new(small_orders());
        let context = engine.start(&CsvRecordSource::from_text(csv(96))).unwrap();

        assert_eq!(context.dataset().len(), 96);
        assert_eq!(context.horizon().get(), 4);
        assert_eq!(context.bank().order(Pollutant::Pm10), ModelOrder::new(1, 1, 1));
        assert!(context.resolve("2024-03-10 00:00").unwrap().is_forecast());
    }

    #[test]
    fn test_default_engine_trains_default_orders() {
        let engine = AirQualityEngine::with_defaults();
        let context = engine.start(&CsvRecordSource::from_text(csv(120))).unwrap();
        assert_eq!(context.bank().orders(), ModelOrders::default());
    }

    #[test]
    fn test_zero_budget_fails() {
        let config = EngineConfig::builder()
            .orders(ModelOrders::uniform(ModelOrder::new(1, 0, 0)))
            .fit_budget_ms(0)
            .build()
            .unwrap();
        let engine = AirQualityEngine::new(config);

        let err = engine.start(&CsvRecordSource::from_text(csv(48))).unwrap_err();
        assert!(matches!(
            err,
            AirQualityError::FitBudgetExceeded { budget_ms: 0, .. }
        ));
    }

    #[test]
    fn test_generous_budget_passes() {
        let config = EngineConfig::builder()
            .orders(ModelOrders::uniform(ModelOrder::new(1, 0, 0)))
            .fit_budget_ms(600_000)
            .build()
            .unwrap();
        assert!(AirQualityEngine::new(config)
            .start(&CsvRecordSource::from_text(csv(48)))
            .is_ok());
    }

    #[test]
    fn test_empty_cell_does_not_block_startup() {
        let mut lines: Vec<String> = csv(96).lines().map(String::from).collect();
        let row = &mut lines[41];
        let cut = row.rfind(',').unwrap();
        row.truncate(cut + 1);
        let text = lines.join("\n");

        let context = AirQualityEngine::new(small_orders())
            .start(&CsvRecordSource::from_text(text))
            .unwrap();
        assert_eq!(context.dataset().len(), 96);
        assert!(context.dataset().series_for(Pollutant::Nh3).values()[40].is_nan());
        assert!(context.resolve("2024-03-10 00:00").unwrap().is_forecast());
    }

    #[test]
    fn test_short_history_fails_startup() {
        let err = AirQualityEngine::with_defaults()
            .start(&CsvRecordSource::from_text(csv(12)))
            .unwrap_err();
        assert!(matches!(err, AirQualityError::ModelFit { .. }));
    }

    #[test]
    fn test_missing_csv_file() {
        let err = AirQualityEngine::with_defaults()
            .start_from_csv("/nonexistent/delhi.csv")
            .unwrap_err();
        assert!(matches!(err, AirQualityError::Source(_)));
    }
}
