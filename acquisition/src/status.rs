//! The observable outcome of acquisition attempts.

use geotracker_location::{Coordinates, MapRegion};
use serde::{Deserialize, Serialize};

/// Outcome of the last acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AcquisitionStatus {
    /// No outcome yet, or an attempt is past its checks and fetching.
    #[default]
    Idle,
    /// The user or the platform refused the location permission.
    PermissionDenied,
    /// The device location service is off.
    ServicesDisabled,
    /// Fetching failed, or something unexpected went wrong.
    Error,
    /// At least one fix was obtained.
    Success,
}

/// What a presentation shell should offer for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affordance {
    /// Nothing to offer.
    None,
    /// Open the system settings for this app (see [`SettingsLink`](crate::SettingsLink)).
    OpenSettings,
    /// Run the acquisition again.
    Retry,
    /// Show the snapshot's message.
    ShowMessage,
}

impl AcquisitionStatus {
    /// The follow-up action available to the user.
    #[must_use]
    pub const fn affordance(self) -> Affordance {
        match self {
            Self::Idle | Self::Success => Affordance::None,
            Self::PermissionDenied => Affordance::OpenSettings,
            Self::ServicesDisabled => Affordance::Retry,
            Self::Error => Affordance::ShowMessage,
        }
    }

    /// Label of the control that triggers an acquisition.
    #[must_use]
    pub const fn action_label(self) -> &'static str {
        match self {
            Self::Success => "Update Location",
            _ => "Find My Location",
        }
    }
}

/// Everything a presentation shell renders, published as one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Outcome of the last attempt.
    pub status: AcquisitionStatus,
    /// Most recent valid fix, if any.
    pub coordinates: Option<Coordinates>,
    /// Map region derived from `coordinates`.
    pub region: MapRegion,
    /// Human-readable message for non-success outcomes.
    pub message: Option<String>,
    /// Whether an attempt is in flight.
    pub busy: bool,
}

impl Snapshot {
    /// The state before any attempt.
    #[must_use]
    pub const fn initial(region: MapRegion) -> Self {
        Self {
            status: AcquisitionStatus::Idle,
            coordinates: None,
            region,
            message: None,
            busy: false,
        }
    }
}
