//! Tests for the public airquality facade surface

use std::collections::BTreeMap;

use airquality_facade::prelude::*;
use airquality_facade::{aqi, aqi_from_map, aqi_of, Concentrations, Predictor, RawRecord};

// ============================================================================
// AQI calculator
// ============================================================================

#[test]
fn test_aqi_all_zero() {
    assert_eq!(aqi(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), 0.0);
}

#[test]
fn test_aqi_weights_over_eight() {
    let weights = [0.25, 0.10, 0.20, 0.10, 0.15, 0.10, 0.10, 0.10];
    for (i, weight) in weights.iter().enumerate() {
        let values = Concentrations::from_fn(|p| if p.index() == i { 100.0 } else { 0.0 });
        let expected = 100.0 * weight / 8.0;
        assert!((aqi_of(&values) - expected).abs() < 1e-9);
    }
}

#[test]
fn test_aqi_nan_propagates() {
    assert!(aqi(1.0, f64::NAN, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0).is_nan());
    assert!(aqi_from_map(&BTreeMap::new()).is_nan());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_from_toml() {
    let config = EngineConfig::from_toml_str("horizon = 3\n[orders]\nnh3 = [1, 0, 1]\n").unwrap();
    assert_eq!(config.horizon.get(), 3);
    assert_eq!(config.orders.get(Pollutant::Nh3), ModelOrder::new(1, 0, 1));
    assert_eq!(config.orders.get(Pollutant::Co), ModelOrder::new(2, 1, 3));
}

#[test]
fn test_pollutant_names() {
    let names: Vec<&str> = Pollutant::ALL.iter().map(|p| p.as_str()).collect();
    assert_eq!(names, ["co", "no", "no2", "o3", "so2", "pm2_5", "pm10", "nh3"]);
    assert_eq!("PM2_5".parse::<Pollutant>().unwrap(), Pollutant::Pm2_5);
    assert!("benzene".parse::<Pollutant>().is_err());
}

// ============================================================================
// ARIMA through the facade
// ============================================================================

#[test]
fn test_arima_linear_trend() {
    let data: Vec<f64> = (0..60).map(|i| 10.0 + 2.0 * i as f64).collect();
    let mut model = Arima::new(1, 1, 0).unwrap();
    model.fit(&data).unwrap();

    let forecast = model.predict(2).unwrap();
    assert!((forecast[0] - 130.0).abs() < 1e-6, "got {}", forecast[0]);
    assert!((forecast[1] - 132.0).abs() < 1e-6, "got {}", forecast[1]);
}

#[test]
fn test_arima_unfitted() {
    let model = Arima::new(1, 0, 0).unwrap();
    assert!(!model.is_fitted());
    assert!(model.predict(1).is_err());
}

// ============================================================================
// Dataset
// ============================================================================

#[test]
fn test_dataset_ignores_aqi_column() {
    let values = Concentrations::from_fn(|p| 10.0 + p.index() as f64);
    let row = RawRecord::reading("2024-05-01 10:00", &values).with("AQI", "999");
    let dataset = Dataset::load(vec![row]).unwrap();

    let reading = &dataset.readings()[0];
    assert!((reading.aqi() - aqi_of(&values)).abs() < 1e-12);
}
