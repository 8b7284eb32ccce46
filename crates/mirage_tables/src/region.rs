//! Region fleet and latency bias model.

use serde::{Deserialize, Serialize};

/// A deployment region with a multiplicative latency bias.
///
/// The bias scales every latency percentile synthesized for the region;
/// `1.0` is the unbiased baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Region name as it appears in the `region` column.
    pub name: String,
    /// Multiplicative latency bias.
    pub bias: f64,
}

impl Region {
    /// Creates a region with the fleet bias for its name.
    ///
    /// Names outside the built-in fleet run unbiased.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let bias = fleet_bias(&name);
        Self { name, bias }
    }

    /// Creates a region with an explicit latency bias.
    #[must_use]
    pub fn with_bias(name: impl Into<String>, bias: f64) -> Self {
        Self {
            name: name.into(),
            bias,
        }
    }
}

/// Latency bias for the built-in fleet.
///
/// `us-east` is the 1.0 baseline; unknown names also run unbiased.
#[must_use]
pub fn fleet_bias(name: &str) -> f64 {
    match name {
        "us-west" => 1.10,
        "eu-west" => 1.18,
        _ => 1.0,
    }
}

/// The default three-region fleet.
#[must_use]
pub fn default_fleet() -> Vec<Region> {
    ["us-east", "us-west", "eu-west"]
        .into_iter()
        .map(Region::named)
        .collect()
}
