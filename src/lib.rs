//! # GeoTracker
//!
//! Client-side location acquisition for the GeoTracker app.
//!
//! The heavy lifting lives in the member crates; this facade re-exports them
//! behind features so a presentation shell depends on a single crate.
//!
//! ## Features
//!
//! - `permission`: Foreground location permission queries and requests.
//! - `location`: Coordinates, map regions, service availability and the
//!   two-phase position fetch.
//! - `acquisition`: The acquisition state machine and the app lifecycle
//!   observer (enabled by default, pulls in the other two).
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```rust,ignore
//! use geotracker::acquisition::{AcquisitionContext, AcquisitionController};
//! use geotracker::location::SystemLocation;
//! use geotracker::permission::SystemPermission;
//!
//! async fn locate() {
//!     let controller =
//!         AcquisitionController::new(SystemPermission, SystemLocation, SystemLocation);
//!     controller.acquire(AcquisitionContext::startup()).await;
//!     if let Some(fix) = controller.coordinates() {
//!         println!("Latitude: {}, Longitude: {}", fix.latitude, fix.longitude);
//!     }
//! }
//! ```

#[cfg(feature = "permission")]
pub use geotracker_permission as permission;

#[cfg(feature = "location")]
pub use geotracker_location as location;

#[cfg(feature = "acquisition")]
pub use geotracker_acquisition as acquisition;
