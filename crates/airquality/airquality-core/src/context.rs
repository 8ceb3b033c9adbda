//! Immutable engine context
//!
//! Packages the dataset and the model bank trained from it. A context is
//! built once, never mutated, and can be shared across threads behind an
//! `Arc`. Several contexts (one per city, say) can live in one process.

use std::num::NonZeroUsize;

use airquality_spi::{ModelOrders, Result};

use crate::dataset::Dataset;
use crate::model_bank::ModelBank;
use crate::router::{QueryOutcome, QueryRouter, DEFAULT_HORIZON};

/// Dataset plus trained models, ready to answer queries
#[derive(Debug, Clone)]
pub struct AirQualityContext {
    dataset: Dataset,
    bank: ModelBank,
    horizon: NonZeroUsize,
}

impl AirQualityContext {
    /// Assemble a context from an already trained bank
    pub fn new(dataset: Dataset, bank: ModelBank) -> Self {
        Self {
            dataset,
            bank,
            horizon: DEFAULT_HORIZON,
        }
    }

    /// Train a bank from `dataset` and wrap both
    pub fn train(dataset: Dataset, orders: &ModelOrders) -> Result<Self> {
        let bank = ModelBank::train(&dataset, orders)?;
        Ok(Self::new(dataset, bank))
    }

    /// Default horizon for [`AirQualityContext::resolve`]
    pub fn with_horizon(mut self, horizon: NonZeroUsize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn bank(&self) -> &ModelBank {
        &self.bank
    }

    pub fn horizon(&self) -> NonZeroUsize {
        self.horizon
    }

    /// Router over this context
    pub fn router(&self) -> QueryRouter<'_> {
        QueryRouter::new(&self.dataset, &self.bank).with_horizon(self.horizon)
    }

    /// Resolve a query with the default horizon
    pub fn resolve(&self, input: &str) -> Result<QueryOutcome> {
        self.router().resolve(input)
    }

    /// Resolve a query with an explicit horizon
    pub fn resolve_with_horizon(&self, input: &str, horizon: NonZeroUsize) -> Result<QueryOutcome> {
        self.router().resolve_with_horizon(input, horizon)
    }
}
