//! Dialogue engine configuration

use serde::Deserialize;

use crate::domain::coaching::HeuristicThresholds;

/// Dialogue engine configuration.
///
/// The heuristic thresholds default to the reference tuning; individual
/// values can be overridden through the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Heuristic tuning constants
    #[serde(default)]
    pub thresholds: HeuristicThresholds,

    /// Fixed RNG seed for reproducible phrasing (unset = seed from OS)
    pub rng_seed: Option<u64>,
}
