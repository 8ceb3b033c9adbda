//! Engine configuration types.
//!
//! Configuration is plain data: the per-pollutant order table, the default
//! forecast horizon and an optional wall-clock budget for model fitting.
//! It can be built in code with [`EngineConfigBuilder`] or read from TOML:
//!
//! ```toml
//! horizon = 24
//! fit_budget_ms = 30000
//!
//! [orders]
//! o3 = [1, 1, 1]
//! ```
//!
//! Keys that are left out keep their defaults, and an `[orders]` table only
//! overrides the pollutants it names.

use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

use airquality_core::arima::Arima;
use airquality_core::DEFAULT_HORIZON;
use airquality_spi::{AirQualityError, ModelOrder, ModelOrders, Pollutant, Result};
use serde::{Deserialize, Serialize};

/// Configuration for building an [`AirQualityContext`](airquality_core::AirQualityContext).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Default forecast horizon for queries past the latest reading
    pub horizon: NonZeroUsize,
    /// Abort startup when fitting takes longer than this
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_budget_ms: Option<u64>,
    /// ARIMA order per pollutant
    pub orders: ModelOrders,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            fit_budget_ms: None,
            orders: ModelOrders::default(),
        }
    }
}

impl EngineConfig {
    /// Start a builder from the defaults.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| AirQualityError::Config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            AirQualityError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| AirQualityError::Config(e.to_string()))
    }

    /// Check every order against the model limits.
    pub fn validate(&self) -> Result<()> {
        for (pollutant, order) in self.orders.iter() {
            Arima::from_order(order).map_err(|e| {
                AirQualityError::Config(format!("order {} for '{}': {}", order, pollutant, e))
            })?;
        }
        Ok(())
    }
}

/// Builder for EngineConfig.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    horizon: Option<usize>,
    fit_budget_ms: Option<u64>,
    orders: Option<ModelOrders>,
    overrides: Vec<(Pollutant, ModelOrder)>,
}

impl EngineConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default horizon. Must be positive.
    pub fn horizon(mut self, horizon: usize) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Set the fit budget in milliseconds.
    pub fn fit_budget_ms(mut self, budget_ms: u64) -> Self {
        self.fit_budget_ms = Some(budget_ms);
        self
    }

    /// Replace the whole order table.
    pub fn orders(mut self, orders: ModelOrders) -> Self {
        self.orders = Some(orders);
        self
    }

    /// Override the order of a single pollutant.
    pub fn order(mut self, pollutant: Pollutant, order: ModelOrder) -> Self {
        self.overrides.push((pollutant, order));
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<EngineConfig> {
        let horizon = match self.horizon {
            Some(h) => NonZeroUsize::new(h)
                .ok_or_else(|| AirQualityError::Config("horizon must be positive".to_string()))?,
            None => DEFAULT_HORIZON,
        };
        let orders = self
            .overrides
            .into_iter()
            .fold(self.orders.unwrap_or_default(), |orders, (p, order)| {
                orders.with(p, order)
            });

        let config = EngineConfig {
            horizon,
            fit_budget_ms: self.fit_budget_ms,
            orders,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.horizon.get(), 24);
        assert_eq!(config.fit_budget_ms, None);
        assert_eq!(config.orders, ModelOrders::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_orders_table() {
        let config = EngineConfig::from_toml_str(
            r#"
horizon = 6
fit_budget_ms = 5000

[orders]
o3 = [1, 1, 1]
pm2_5 = [3, 0, 2]
"#,
        )
        .unwrap();

        assert_eq!(config.horizon.get(), 6);
        assert_eq!(config.fit_budget_ms, Some(5000));
        assert_eq!(config.orders.get(Pollutant::O3), ModelOrder::new(1, 1, 1));
        assert_eq!(config.orders.get(Pollutant::Pm2_5), ModelOrder::new(3, 0, 2));
        assert_eq!(config.orders.get(Pollutant::Nh3), ModelOrder::new(2, 1, 6));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let err = EngineConfig::from_toml_str("horizon = 0").unwrap_err();
        assert!(matches!(err, AirQualityError::Config(_)));
    }

    #[test]
    fn test_unknown_pollutant_rejected() {
        let err = EngineConfig::from_toml_str("[orders]\nbenzene = [1, 0, 0]").unwrap_err();
        assert!(matches!(err, AirQualityError::Config(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(EngineConfig::from_toml_str("horizn = 3").is_err());
    }

    #[test]
    fn test_order_out_of_range_rejected() {
        let err = EngineConfig::from_toml_str("[orders]\nco = [2, 3, 1]").unwrap_err();
        match err {
            AirQualityError::Config(msg) => assert!(msg.contains("'co'"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_toml_output_reads_back() {
        let config = EngineConfig::builder()
            .horizon(12)
            .order(Pollutant::So2, ModelOrder::new(1, 0, 1))
            .build()
            .unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/nonexistent/airq.toml").unwrap_err();
        assert!(matches!(err, AirQualityError::Config(_)));
    }

    // ========== Builder ==========

    #[test]
    fn test_builder_overrides_apply_after_table() {
        let config = EngineConfig::builder()
            .order(Pollutant::Co, ModelOrder::new(1, 0, 0))
            .orders(ModelOrders::uniform(ModelOrder::new(2, 0, 2)))
            .fit_budget_ms(100)
            .build()
            .unwrap();

        assert_eq!(config.orders.get(Pollutant::Co), ModelOrder::new(1, 0, 0));
        assert_eq!(config.orders.get(Pollutant::No), ModelOrder::new(2, 0, 2));
        assert_eq!(config.fit_budget_ms, Some(100));
        assert_eq!(config.horizon, DEFAULT_HORIZON);
    }

    #[test]
    fn test_builder_rejects_zero_horizon() {
        assert!(EngineConfig::builder().horizon(0).build().is_err());
    }

    #[test]
    fn test_builder_rejects_large_order() {
        let result = EngineConfig::builder()
            .order(Pollutant::No2, ModelOrder::new(11, 1, 0))
            .build();
        assert!(matches!(result, Err(AirQualityError::Config(_))));
    }
}
