//! Predictor trait for univariate time series models
//!
//! Every per-pollutant model in the bank implements this fit-predict contract.

use crate::error::ModelResult;

/// Common trait for univariate time series predictors
///
/// A predictor is fitted once against a pollutant's full history and then
/// queried for future values. `predict` must be deterministic: the same
/// fitted model asked for the same number of steps always returns the same
/// values.
///
/// # Example
///
/// ```rust,ignore
/// use airquality_spi::Predictor;
///
/// fn one_step<P: Predictor>(model: &mut P, history: &[f64]) -> airquality_spi::ModelResult<f64> {
///     model.fit(history)?;
///     Ok(model.predict(1)?[0])
/// }
/// ```
pub trait Predictor {
    /// Fit the model to historical data
    ///
    /// # Arguments
    ///
    /// * `data` - Historical observations in time order
    ///
    /// # Returns
    ///
    /// `Ok(())` if fitting succeeds, `Err(ModelError)` otherwise
    fn fit(&mut self, data: &[f64]) -> ModelResult<()>;

    /// Predict `steps` future values from the end of the training data
    fn predict(&self, steps: usize) -> ModelResult<Vec<f64>>;

    /// Check if the model has been fitted
    fn is_fitted(&self) -> bool;
}
