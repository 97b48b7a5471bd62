//! Controller configuration.

use geotracker_location::{FetchConfig, RegionConfig};
use serde::{Deserialize, Serialize};

/// Configuration of [`AcquisitionController`](crate::AcquisitionController).
///
/// Every field has a default, so a partial document deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Two-phase fetch tunables.
    pub fetch: FetchConfig,
    /// Region derivation.
    pub region: RegionConfig,
    /// Re-probe the location service after permission was granted by a
    /// prompt during the same attempt, instead of trusting the probe taken
    /// before the prompt. Some Android versions only report the service
    /// correctly after the grant.
    pub recheck_services_after_grant: bool,
}
