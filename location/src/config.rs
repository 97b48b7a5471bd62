//! Tunables of the two-phase position fetch.

use serde::{Deserialize, Serialize};

use crate::{AccuracyTier, CachedQuery, CurrentQuery};

/// Configuration of [`PositionFetcher`](crate::PositionFetcher).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Oldest last-known fix accepted by the cached read, in milliseconds.
    pub cached_max_age_ms: u64,
    /// Worst accuracy accepted by the cached read, in meters.
    pub cached_required_accuracy_m: f64,
    /// Accuracy requested from the refined read.
    pub refined_accuracy: AccuracyTier,
    /// Age of a platform-cached fix the refined read may return, in milliseconds.
    pub refined_max_age_ms: u64,
    /// Timeout of the refined read, in milliseconds.
    pub refined_timeout_ms: u64,
}

impl FetchConfig {
    /// Query for the cached read.
    #[must_use]
    pub const fn cached_query(&self) -> CachedQuery {
        CachedQuery {
            max_age_ms: self.cached_max_age_ms,
            required_accuracy_m: self.cached_required_accuracy_m,
        }
    }

    /// Query for the refined read.
    #[must_use]
    pub const fn current_query(&self) -> CurrentQuery {
        CurrentQuery {
            accuracy: self.refined_accuracy,
            max_age_ms: self.refined_max_age_ms,
            timeout_ms: self.refined_timeout_ms,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cached_max_age_ms: 60_000,
            cached_required_accuracy_m: 500.0,
            refined_accuracy: AccuracyTier::Balanced,
            refined_max_age_ms: 10_000,
            refined_timeout_ms: 5_000,
        }
    }
}
