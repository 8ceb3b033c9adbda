//! Tracked pollutants and their per-reading concentrations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the eight tracked pollutants
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    /// Carbon monoxide
    #[serde(rename = "co")]
    Co,
    /// Nitric oxide
    #[serde(rename = "no")]
    No,
    /// Nitrogen dioxide
    #[serde(rename = "no2")]
    No2,
    /// Ozone
    #[serde(rename = "o3")]
    O3,
    /// Sulphur dioxide
    #[serde(rename = "so2")]
    So2,
    /// Fine particulate matter
    #[serde(rename = "pm2_5")]
    Pm2_5,
    /// Coarse particulate matter
    #[serde(rename = "pm10")]
    Pm10,
    /// Ammonia
    #[serde(rename = "nh3")]
    Nh3,
}

impl Pollutant {
    /// All pollutants in canonical column order
    pub const ALL: [Pollutant; 8] = [
        Pollutant::Co,
        Pollutant::No,
        Pollutant::No2,
        Pollutant::O3,
        Pollutant::So2,
        Pollutant::Pm2_5,
        Pollutant::Pm10,
        Pollutant::Nh3,
    ];

    /// Column name used in raw input and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Pollutant::Co => "co",
            Pollutant::No => "no",
            Pollutant::No2 => "no2",
            Pollutant::O3 => "o3",
            Pollutant::So2 => "so2",
            Pollutant::Pm2_5 => "pm2_5",
            Pollutant::Pm10 => "pm10",
            Pollutant::Nh3 => "nh3",
        }
    }

    /// Position in [`Pollutant::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pollutant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Pollutant::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| format!("unknown pollutant '{}'", s))
    }
}

/// Concentrations of all eight pollutants at one instant
///
/// Missing measurements are carried as NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Concentrations {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

impl Concentrations {
    /// Build from a per-pollutant function, called in canonical order
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Pollutant) -> f64,
    {
        Self {
            co: f(Pollutant::Co),
            no: f(Pollutant::No),
            no2: f(Pollutant::No2),
            o3: f(Pollutant::O3),
            so2: f(Pollutant::So2),
            pm2_5: f(Pollutant::Pm2_5),
            pm10: f(Pollutant::Pm10),
            nh3: f(Pollutant::Nh3),
        }
    }

    /// Concentration of a single pollutant
    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Co => self.co,
            Pollutant::No => self.no,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
            Pollutant::So2 => self.so2,
            Pollutant::Pm2_5 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
            Pollutant::Nh3 => self.nh3,
        }
    }

    /// Iterate `(pollutant, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        Pollutant::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// True if any concentration is NaN
    pub fn has_missing(&self) -> bool {
        self.iter().any(|(_, v)| v.is_nan())
    }
}
