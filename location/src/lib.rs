//! Location service availability and position fetching.
//!
//! This crate holds the data types shared by the acquisition state machine
//! ([`Coordinates`], [`MapRegion`]), the provider traits a platform backend
//! implements, and the two gates built on top of them: [`ServiceGate`] and
//! [`PositionFetcher`].

#![warn(missing_docs)]

pub mod config;
pub mod fetch;
pub mod region;
pub mod service;

/// Platform-specific implementations.
mod sys;

use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

pub use config::FetchConfig;
pub use fetch::{Fix, FixSource, PositionFetcher};
pub use region::{MapRegion, RegionConfig};
pub use service::{ServiceGate, ServiceProvider};

/// A single location reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
    /// Horizontal accuracy in meters, if available.
    pub accuracy_meters: Option<f64>,
    /// Timestamp as Unix epoch milliseconds.
    pub timestamp_ms: u64,
}

impl Coordinates {
    /// A reading taken now, without accuracy information.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: None,
            timestamp_ms: now_ms(),
        }
    }

    /// Attach a horizontal accuracy.
    #[must_use]
    pub const fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy_meters = Some(meters);
        self
    }

    /// Override the timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Whether latitude and longitude are finite and inside their ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Age of the reading relative to `now_ms`, saturating at zero for
    /// readings stamped in the future.
    #[must_use]
    pub const fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp_ms)
    }
}

/// Errors that can occur when accessing location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// Location request timed out.
    #[error("location request timed out")]
    Timeout,
    /// Location is not available.
    #[error("location not available")]
    NotAvailable,
    /// The provider returned coordinates outside the valid range.
    #[error("location reading out of range")]
    InvalidFix,
    /// An unknown error occurred.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Desired accuracy of a fresh fix, from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyTier {
    /// Accurate to about three kilometers.
    Lowest,
    /// Accurate to about one kilometer.
    Low,
    /// Accurate to about one hundred meters.
    #[default]
    Balanced,
    /// Accurate to about ten meters.
    High,
    /// The best the device can do.
    Highest,
}

/// Parameters for reading a previously recorded fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedQuery {
    /// Oldest acceptable fix, in milliseconds.
    pub max_age_ms: u64,
    /// Worst acceptable horizontal accuracy, in meters.
    pub required_accuracy_m: f64,
}

/// Parameters for acquiring a fresh fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentQuery {
    /// Requested accuracy.
    pub accuracy: AccuracyTier,
    /// Age of an internally cached fix the platform may return instead.
    pub max_age_ms: u64,
    /// Upper bound on the acquisition.
    pub timeout_ms: u64,
}

/// Access to the platform's position readings.
pub trait PositionProvider {
    /// Return a previously recorded fix matching `query`, if one exists.
    ///
    /// # Errors
    /// Returns a [`LocationError`] if the platform query fails.
    fn last_known(
        &self,
        query: &CachedQuery,
    ) -> impl Future<Output = Result<Option<Coordinates>, LocationError>>;

    /// Acquire a fresh fix.
    ///
    /// # Errors
    /// Returns a [`LocationError`] if no fix could be obtained.
    fn current(&self, query: &CurrentQuery)
    -> impl Future<Output = Result<Coordinates, LocationError>>;
}

/// The location backend of the platform this crate was built for.
///
/// Implements both [`PositionProvider`] and [`ServiceProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocation;

impl PositionProvider for SystemLocation {
    async fn last_known(&self, query: &CachedQuery) -> Result<Option<Coordinates>, LocationError> {
        sys::last_known(query).await
    }

    async fn current(&self, query: &CurrentQuery) -> Result<Coordinates, LocationError> {
        sys::current(query).await
    }
}

impl ServiceProvider for SystemLocation {
    async fn is_enabled(&self) -> Result<bool, LocationError> {
        sys::is_enabled().await
    }

    async fn try_enable(&self) -> Result<(), LocationError> {
        Err(LocationError::NotAvailable)
    }
}

/// Current time as Unix epoch milliseconds.
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
