//! ARIMA order triples and the per-pollutant order table.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::pollutant::Pollutant;

/// ARIMA order triple `(p, d, q)`
///
/// Serialized as a three-element array, e.g. `co = [2, 1, 3]` in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize, usize)", into = "(usize, usize, usize)")]
pub struct ModelOrder {
    /// Autoregressive order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// Moving-average order
    pub q: usize,
}

impl ModelOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl From<(usize, usize, usize)> for ModelOrder {
    fn from((p, d, q): (usize, usize, usize)) -> Self {
        Self::new(p, d, q)
    }
}

impl From<ModelOrder> for (usize, usize, usize) {
    fn from(order: ModelOrder) -> Self {
        (order.p, order.d, order.q)
    }
}

impl fmt::Display for ModelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.d, self.q)
    }
}

/// Fixed model order for every pollutant
///
/// Deserializes from a partial map: pollutants that are not named keep
/// their default order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<Pollutant, ModelOrder>",
    into = "BTreeMap<Pollutant, ModelOrder>"
)]
pub struct ModelOrders {
    orders: [ModelOrder; 8],
}

impl ModelOrders {
    /// Order used for `pollutant`
    pub fn get(&self, pollutant: Pollutant) -> ModelOrder {
        self.orders[pollutant.index()]
    }

    /// Replace the order for `pollutant`
    pub fn set(&mut self, pollutant: Pollutant, order: ModelOrder) {
        self.orders[pollutant.index()] = order;
    }

    /// Builder-style variant of [`ModelOrders::set`]
    pub fn with(mut self, pollutant: Pollutant, order: ModelOrder) -> Self {
        self.set(pollutant, order);
        self
    }

    /// Same order for every pollutant
    pub fn uniform(order: ModelOrder) -> Self {
        Self { orders: [order; 8] }
    }

    /// Iterate `(pollutant, order)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, ModelOrder)> + '_ {
        Pollutant::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

impl Default for ModelOrders {
    fn default() -> Self {
        Self {
            orders: [
                ModelOrder::new(2, 1, 3), // co
                ModelOrder::new(2, 1, 3), // no
                ModelOrder::new(3, 1, 3), // no2
                ModelOrder::new(2, 1, 5), // o3
                ModelOrder::new(2, 1, 5), // so2
                ModelOrder::new(2, 1, 2), // pm2_5
                ModelOrder::new(2, 1, 2), // pm10
                ModelOrder::new(2, 1, 6), // nh3
            ],
        }
    }
}

impl From<BTreeMap<Pollutant, ModelOrder>> for ModelOrders {
    fn from(overrides: BTreeMap<Pollutant, ModelOrder>) -> Self {
        overrides
            .into_iter()
            .fold(Self::default(), |orders, (p, order)| orders.with(p, order))
    }
}

impl From<ModelOrders> for BTreeMap<Pollutant, ModelOrder> {
    fn from(orders: ModelOrders) -> Self {
        orders.iter().collect()
    }
}
