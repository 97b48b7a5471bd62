//! Failures that end an acquisition attempt.

use geotracker_location::LocationError;
use geotracker_permission::PermissionError;
use thiserror::Error;

use crate::AcquisitionStatus;

/// Why an acquisition attempt ended without a fix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    /// Permission was refused for this attempt.
    #[error("location permission denied")]
    PermissionDenied,

    /// The location service is off and could not be turned on.
    #[error("location services disabled")]
    ServicesDisabled,

    /// Neither position read produced a fix.
    #[error("failed to fetch location: {0}")]
    Fetch(#[source] LocationError),

    /// The permission provider failed.
    #[error("permission query failed: {0}")]
    Permission(#[from] PermissionError),

    /// The service availability provider failed.
    #[error("service query failed: {0}")]
    Service(#[source] LocationError),
}

impl AcquisitionError {
    /// Status published for this failure.
    #[must_use]
    pub const fn status(&self) -> AcquisitionStatus {
        match self {
            Self::PermissionDenied => AcquisitionStatus::PermissionDenied,
            Self::ServicesDisabled => AcquisitionStatus::ServicesDisabled,
            Self::Fetch(_) | Self::Permission(_) | Self::Service(_) => AcquisitionStatus::Error,
        }
    }

    /// User-facing message published for this failure.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Location permission denied",
            Self::ServicesDisabled => "Location services disabled",
            Self::Fetch(_) | Self::Permission(_) | Self::Service(_) => "Error fetching location",
        }
    }

    /// Whether this failure came from a provider misbehaving rather than
    /// from the user or the device state.
    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        matches!(self, Self::Permission(_) | Self::Service(_))
    }
}
