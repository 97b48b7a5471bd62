//! The acquisition state machine.

use std::cell::Cell;

use async_channel::Receiver;
use geotracker_location::{
    Coordinates, Fix, MapRegion, PositionFetcher, PositionProvider, ServiceGate, ServiceProvider,
};
use geotracker_permission::{Authorization, PermissionGate, PermissionProvider};
use log::{debug, error, info, warn};

use crate::signal::Observable;
use crate::{AcquisitionConfig, AcquisitionError, AcquisitionStatus, Snapshot};

/// Per-call context of [`AcquisitionController::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AcquisitionContext {
    /// The attempt made when the app starts. Startup attempts may prompt
    /// for permission even when the platform says it won't ask again, and
    /// never prompt to enable the location service.
    pub is_startup: bool,
}

impl AcquisitionContext {
    /// The attempt made when the app starts.
    #[must_use]
    pub const fn startup() -> Self {
        Self { is_startup: true }
    }

    /// An attempt triggered by the user or by the app returning to the foreground.
    #[must_use]
    pub const fn interactive() -> Self {
        Self { is_startup: false }
    }
}

/// Orchestrates permission, service availability and position fetching,
/// and owns the published [`Snapshot`].
///
/// At most one attempt runs at a time; `acquire` called during an attempt
/// returns immediately without touching providers or state.
#[derive(Debug)]
pub struct AcquisitionController<P, S, F> {
    permission: PermissionGate<P>,
    service: ServiceGate<S>,
    fetcher: PositionFetcher<F>,
    config: AcquisitionConfig,
    in_flight: Cell<bool>,
    snapshot: Observable<Snapshot>,
}

impl<P, S, F> AcquisitionController<P, S, F>
where
    P: PermissionProvider,
    S: ServiceProvider,
    F: PositionProvider,
{
    /// Create a controller with the default configuration.
    pub fn new(permission: P, service: S, positions: F) -> Self {
        Self::with_config(permission, service, positions, AcquisitionConfig::default())
    }

    /// Create a controller with an explicit configuration.
    pub fn with_config(permission: P, service: S, positions: F, config: AcquisitionConfig) -> Self {
        Self {
            permission: PermissionGate::new(permission),
            service: ServiceGate::new(service),
            fetcher: PositionFetcher::new(positions, config.fetch),
            config,
            in_flight: Cell::new(false),
            snapshot: Observable::new(Snapshot::initial(config.region.initial)),
        }
    }

    /// The permission gate.
    pub const fn permission(&self) -> &PermissionGate<P> {
        &self.permission
    }

    /// The service availability gate.
    pub const fn service(&self) -> &ServiceGate<S> {
        &self.service
    }

    /// The position fetcher.
    pub const fn fetcher(&self) -> &PositionFetcher<F> {
        &self.fetcher
    }

    /// The active configuration.
    pub const fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Everything currently published.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.get()
    }

    /// Outcome of the last attempt.
    pub fn status(&self) -> AcquisitionStatus {
        self.snapshot.with(|s| s.status)
    }

    /// Most recent valid fix.
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.snapshot.with(|s| s.coordinates)
    }

    /// Map region derived from the most recent fix.
    pub fn region(&self) -> MapRegion {
        self.snapshot.with(|s| s.region)
    }

    /// Message describing the last failure, if the last attempt failed.
    pub fn message(&self) -> Option<String> {
        self.snapshot.with(|s| s.message.clone())
    }

    /// Whether an attempt is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// Receive every published snapshot, starting with the current one.
    pub fn subscribe(&self) -> Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    /// Run one acquisition attempt.
    ///
    /// Never fails: every outcome is published as a status. A call made
    /// while another attempt is in flight is ignored.
    pub async fn acquire(&self, context: AcquisitionContext) {
        let Some(_guard) = InFlight::enter(self) else {
            debug!("location acquisition already in flight, ignoring");
            return;
        };

        self.snapshot.update(|s| {
            s.busy = true;
            s.message = None;
            if s.coordinates.is_none() {
                s.status = AcquisitionStatus::Idle;
            }
        });

        if let Err(err) = self.run(context).await {
            self.fail(&err);
        }
    }

    async fn run(&self, context: AcquisitionContext) -> Result<(), AcquisitionError> {
        let (permission, service) =
            futures::join!(self.permission.check(), self.service.is_enabled());
        let permission = permission?;
        let mut service_enabled = service.map_err(AcquisitionError::Service)?;

        let authorization = self
            .permission
            .authorize(permission, context.is_startup)
            .await?;
        if !authorization.is_granted() {
            return Err(AcquisitionError::PermissionDenied);
        }

        // Service state comes from the probe taken alongside the permission
        // check, even when the permission was granted in between.
        if authorization == Authorization::NewlyGranted
            && self.config.recheck_services_after_grant
            && !service_enabled
        {
            service_enabled = self
                .service
                .is_enabled()
                .await
                .map_err(AcquisitionError::Service)?;
        }

        if !self.service.ensure(service_enabled, context.is_startup).await {
            return Err(AcquisitionError::ServicesDisabled);
        }

        self.snapshot.update(|s| s.status = AcquisitionStatus::Idle);
        self.fetch().await
    }

    async fn fetch(&self) -> Result<(), AcquisitionError> {
        let (sender, receiver) = async_channel::unbounded();

        // The sender lives in the fetch future, so the apply loop ends once
        // the fetch is over and every fix has been applied.
        let fetch = async move { self.fetcher.fetch_best(&sender).await };
        let apply = async {
            while let Ok(fix) = receiver.recv().await {
                self.apply(fix);
            }
        };

        let (source, ()) = futures::join!(fetch, apply);
        let source = source.map_err(AcquisitionError::Fetch)?;
        info!("location acquired from {source:?} read");
        Ok(())
    }

    fn apply(&self, fix: Fix) {
        let coordinates = *fix.coordinates();
        if !coordinates.is_valid() {
            warn!("ignoring out of range {:?} fix", fix.source());
            return;
        }

        let region = self.config.region.region_for(Some(&coordinates));
        self.snapshot.update(|s| {
            s.coordinates = Some(coordinates);
            s.region = region;
            s.status = AcquisitionStatus::Success;
        });
    }

    fn fail(&self, err: &AcquisitionError) {
        if err.is_unexpected() {
            error!("location acquisition failed unexpectedly: {err}");
        } else if matches!(err, AcquisitionError::Fetch(_)) {
            warn!("location acquisition failed: {err}");
        } else {
            info!("location acquisition stopped: {err}");
        }

        self.snapshot.update(|s| {
            s.status = err.status();
            s.message = Some(err.message().to_owned());
        });
    }
}

/// Holds the in-flight flag for the duration of one attempt, including
/// when the attempt's future is dropped before completion.
struct InFlight<'a> {
    flag: &'a Cell<bool>,
    snapshot: &'a Observable<Snapshot>,
}

impl<'a> InFlight<'a> {
    fn enter<P, S, F>(controller: &'a AcquisitionController<P, S, F>) -> Option<Self> {
        if controller.in_flight.replace(true) {
            return None;
        }
        Some(Self {
            flag: &controller.in_flight,
            snapshot: &controller.snapshot,
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
        self.snapshot.update(|s| s.busy = false);
    }
}
