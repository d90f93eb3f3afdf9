//! Configuration for window search

use super::metric::Metric;
use serde::{Deserialize, Serialize};

/// What to do when NCC meets a constant (zero-variance) patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Give the candidate the worst score for the metric
    #[default]
    Disqualify,
    /// Abort the step with `TrackError::DegenerateVariance`
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    /// Similarity metric used to score candidates
    pub metric: Metric,
    /// Maximum absolute shift searched in each axis
    pub search_radius: u32,
    /// Handling of constant patches under NCC
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for TrackConfig {
    fn default() -> Self {
        create_ncc_config()
    }
}

impl TrackConfig {
    /// Config for `metric` with its default radius
    pub fn for_metric(metric: Metric) -> Self {
        Self {
            metric,
            search_radius: metric.default_radius(),
            degenerate_policy: DegeneratePolicy::default(),
        }
    }

    pub fn with_radius(mut self, search_radius: u32) -> Self {
        self.search_radius = search_radius;
        self
    }

    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }
}

/// SSD with a wide window for faster motion
pub fn create_ssd_config() -> TrackConfig {
    TrackConfig::for_metric(Metric::Ssd)
}

/// Plain cross-correlation, kept as a brightness-sensitive baseline
pub fn create_cross_correlation_config() -> TrackConfig {
    TrackConfig::for_metric(Metric::CrossCorrelation)
}

pub fn create_ncc_config() -> TrackConfig {
    TrackConfig::for_metric(Metric::NormalizedCrossCorrelation)
}
