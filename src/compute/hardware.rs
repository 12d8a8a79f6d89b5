//! Hardware definitions: the performance profile behind a compute node's
//! service-time calculation.

use serde::{Deserialize, Serialize};

/// The calibration constant every workflow step's baseline service time is
/// expressed against: `baseline_per_core / per_core_score` scales a step's
/// baseline up or down for the node actually running it.
pub const BASELINE_PER_CORE: f64 = 10.0;

/// A named hardware platform: a processor, its physical core count, and its
/// aggregate SPECintRate2017 score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareDef {
    pub processor: String,
    pub cores: u32,
    pub specint_rate2017: f64,
}

impl HardwareDef {
    pub fn new(processor: impl Into<String>, cores: u32, specint_rate2017: f64) -> Self {
        Self {
            processor: processor.into(),
            cores,
            specint_rate2017,
        }
    }

    pub fn specint_rate2017_per_core(&self) -> f64 {
        self.specint_rate2017 / self.cores as f64
    }
}
