//! Foreground location permission handling.
//!
//! This crate wraps a platform permission provider behind [`PermissionGate`],
//! which owns the "ask again or give up" policy used by the acquisition
//! state machine.

#![warn(missing_docs)]

/// Platform-specific implementations.
mod sys;

use std::future::Future;

use log::{debug, info};

/// The state of the foreground location permission as reported by the platform.
///
/// Read fresh on every acquisition attempt; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PermissionState {
    /// Whether the permission is currently granted.
    pub granted: bool,
    /// Whether the platform will still show a prompt if we ask.
    pub can_ask_again: bool,
}

impl PermissionState {
    /// A granted permission.
    pub const GRANTED: Self = Self {
        granted: true,
        can_ask_again: true,
    };

    /// Not granted yet, but the user can still be asked.
    pub const ASKABLE: Self = Self {
        granted: false,
        can_ask_again: true,
    };

    /// Not granted, and the platform will not prompt again.
    pub const BLOCKED: Self = Self {
        granted: false,
        can_ask_again: false,
    };
}

/// Errors that can occur when querying or requesting permissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// Location permission is not supported on this platform.
    #[error("permission not supported on this platform")]
    NotSupported,
    /// An unknown error occurred.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Access to the platform's foreground location permission.
pub trait PermissionProvider {
    /// Query the current permission state without prompting.
    ///
    /// # Errors
    /// Returns a [`PermissionError`] if the platform query fails.
    fn status(&self) -> impl Future<Output = Result<PermissionState, PermissionError>>;

    /// Ask the user for permission. May suspend while a system dialog is shown.
    ///
    /// # Errors
    /// Returns a [`PermissionError`] if the request cannot be issued.
    fn request(&self) -> impl Future<Output = Result<PermissionState, PermissionError>>;
}

/// Outcome of applying the permission policy for one acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Authorization {
    /// Permission was already granted.
    Granted,
    /// Permission was granted by a prompt issued during this attempt.
    NewlyGranted,
    /// Permission is refused for this attempt.
    Denied,
}

impl Authorization {
    /// Whether the caller may proceed.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted | Self::NewlyGranted)
    }
}

/// Applies the permission policy on top of a [`PermissionProvider`].
#[derive(Debug, Clone, Default)]
pub struct PermissionGate<P> {
    provider: P,
}

impl<P: PermissionProvider> PermissionGate<P> {
    /// Wrap a permission provider.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Borrow the underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Check the current permission state without prompting.
    ///
    /// # Errors
    /// Propagates the provider's error.
    pub async fn check(&self) -> Result<PermissionState, PermissionError> {
        self.provider.status().await
    }

    /// Request the permission from the user.
    ///
    /// # Errors
    /// Propagates the provider's error.
    pub async fn request(&self) -> Result<PermissionState, PermissionError> {
        self.provider.request().await
    }

    /// Decide whether an attempt may proceed given the state read at its start.
    ///
    /// A prompt is issued only when the permission is missing and either the
    /// platform allows asking again or this is the startup attempt. A refusal
    /// is reported as [`Authorization::Denied`], not as an error.
    ///
    /// # Errors
    /// Propagates the provider's error if the prompt cannot be issued.
    pub async fn authorize(
        &self,
        current: PermissionState,
        is_startup: bool,
    ) -> Result<Authorization, PermissionError> {
        if current.granted {
            return Ok(Authorization::Granted);
        }

        if !current.can_ask_again && !is_startup {
            debug!("location permission blocked, not prompting");
            return Ok(Authorization::Denied);
        }

        let answer = self.request().await?;
        if answer.granted {
            info!("location permission granted by prompt");
            Ok(Authorization::NewlyGranted)
        } else {
            info!("location permission refused by prompt");
            Ok(Authorization::Denied)
        }
    }
}

/// The permission provider of the platform this crate was built for.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPermission;

impl PermissionProvider for SystemPermission {
    async fn status(&self) -> Result<PermissionState, PermissionError> {
        Ok(sys::status().await)
    }

    async fn request(&self) -> Result<PermissionState, PermissionError> {
        sys::request().await
    }
}
