//! Device location service availability.

use std::future::Future;

use log::{debug, info};

use crate::LocationError;

/// Access to the device's location-producing service (GPS, network positioning).
pub trait ServiceProvider {
    /// Whether the location service is currently on.
    ///
    /// # Errors
    /// Returns a [`LocationError`] if the platform query fails.
    fn is_enabled(&self) -> impl Future<Output = Result<bool, LocationError>>;

    /// Ask the user to turn the location service on. May suspend on a system dialog.
    ///
    /// # Errors
    /// Returns a [`LocationError`] if the prompt was cancelled or could not be shown.
    fn try_enable(&self) -> impl Future<Output = Result<(), LocationError>>;

    /// Whether this platform can prompt the user to enable the service.
    fn supports_enable_prompt(&self) -> bool {
        false
    }
}

/// Applies the service availability policy on top of a [`ServiceProvider`].
#[derive(Debug, Clone, Default)]
pub struct ServiceGate<S> {
    provider: S,
}

impl<S: ServiceProvider> ServiceGate<S> {
    /// Wrap a service provider.
    pub const fn new(provider: S) -> Self {
        Self { provider }
    }

    /// Borrow the underlying provider.
    pub const fn provider(&self) -> &S {
        &self.provider
    }

    /// Whether the location service is currently on.
    ///
    /// # Errors
    /// Propagates the provider's error.
    pub async fn is_enabled(&self) -> Result<bool, LocationError> {
        self.provider.is_enabled().await
    }

    /// Prompt the user to enable the service and report the resulting state.
    ///
    /// A cancelled or failed prompt reads as "still disabled".
    pub async fn prompt_enable(&self) -> bool {
        if let Err(err) = self.provider.try_enable().await {
            debug!("location service prompt not accepted: {err}");
            return false;
        }

        match self.provider.is_enabled().await {
            Ok(enabled) => enabled,
            Err(err) => {
                debug!("location service state unreadable after prompt: {err}");
                false
            }
        }
    }

    /// Resolve availability for one attempt, starting from a probe taken
    /// at its beginning.
    ///
    /// Only a disabled service on a non-startup attempt, on a platform that
    /// can prompt, leads to a prompt. Everything else is settled without
    /// further provider calls.
    pub async fn ensure(&self, initially_enabled: bool, is_startup: bool) -> bool {
        if initially_enabled {
            return true;
        }

        if is_startup || !self.provider.supports_enable_prompt() {
            debug!("location service disabled, no prompt (startup: {is_startup})");
            return false;
        }

        let enabled = self.prompt_enable().await;
        info!("location service prompt finished, enabled: {enabled}");
        enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Switch {
        prompt: bool,
        accept: bool,
        on: Cell<bool>,
        prompts: Cell<usize>,
    }

    impl ServiceProvider for Switch {
        async fn is_enabled(&self) -> Result<bool, LocationError> {
            Ok(self.on.get())
        }

        async fn try_enable(&self) -> Result<(), LocationError> {
            self.prompts.set(self.prompts.get() + 1);
            if self.accept {
                self.on.set(true);
                Ok(())
            } else {
                Err(LocationError::Unknown("user cancelled".into()))
            }
        }

        fn supports_enable_prompt(&self) -> bool {
            self.prompt
        }
    }

    #[tokio::test]
    async fn enabled_needs_no_prompt() {
        let gate = ServiceGate::new(Switch {
            prompt: true,
            ..Switch::default()
        });
        assert!(gate.ensure(true, false).await);
        assert_eq!(gate.provider().prompts.get(), 0);
    }

    #[tokio::test]
    async fn startup_never_prompts() {
        let gate = ServiceGate::new(Switch {
            prompt: true,
            accept: true,
            ..Switch::default()
        });
        assert!(!gate.ensure(false, true).await);
        assert_eq!(gate.provider().prompts.get(), 0);
    }

    #[tokio::test]
    async fn no_capability_never_prompts() {
        let gate = ServiceGate::new(Switch {
            accept: true,
            ..Switch::default()
        });
        assert!(!gate.ensure(false, false).await);
        assert_eq!(gate.provider().prompts.get(), 0);
    }

    #[tokio::test]
    async fn accepted_prompt_enables() {
        let gate = ServiceGate::new(Switch {
            prompt: true,
            accept: true,
            ..Switch::default()
        });
        assert!(gate.ensure(false, false).await);
        assert_eq!(gate.provider().prompts.get(), 1);
    }

    #[tokio::test]
    async fn cancelled_prompt_reads_as_disabled() {
        let gate = ServiceGate::new(Switch {
            prompt: true,
            ..Switch::default()
        });
        assert!(!gate.ensure(false, false).await);
        assert_eq!(gate.provider().prompts.get(), 1);
    }
}
