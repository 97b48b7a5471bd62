//! Location acquisition state machine.
//!
//! [`AcquisitionController`] coordinates the permission gate, the service
//! availability gate and the two-phase position fetch into a single
//! `acquire` operation, and exposes the outcome as an observable
//! [`Snapshot`]. [`LifecycleObserver`] re-runs it whenever the app comes
//! back to the foreground.
//!
//! Everything here runs on one logical thread: futures are not `Send`,
//! shared state lives in `Cell`/`RefCell`, and the controller is shared
//! through `Rc`.
//!
//! # Usage
//!
//! ```ignore
//! use std::rc::Rc;
//! use geotracker_acquisition::{AcquisitionContext, AcquisitionController, LifecycleObserver};
//!
//! let controller = Rc::new(AcquisitionController::new(permission, service, positions));
//! let (observer, pump) = LifecycleObserver::attach(&lifecycle, Rc::clone(&controller));
//!
//! let updates = controller.subscribe();
//! controller.acquire(AcquisitionContext::startup()).await;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod platform;
mod shutdown;
mod signal;
pub mod status;

pub use config::AcquisitionConfig;
pub use controller::{AcquisitionContext, AcquisitionController};
pub use error::AcquisitionError;
pub use lifecycle::{AppLifecycle, AppState, LifecycleObserver};
pub use platform::SettingsLink;
pub use status::{AcquisitionStatus, Affordance, Snapshot};

pub use geotracker_location::{Coordinates, MapRegion};
pub use geotracker_permission::PermissionState;
