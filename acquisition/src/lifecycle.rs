//! Re-acquisition when the app returns to the foreground.

use std::future::Future;
use std::pin::pin;
use std::rc::Rc;

use async_channel::Receiver;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use geotracker_location::{PositionProvider, ServiceProvider};
use geotracker_permission::PermissionProvider;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::shutdown::{ShutdownHandle, ShutdownReceiver};
use crate::{AcquisitionContext, AcquisitionController};

/// Visibility state of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    /// In the foreground and receiving input.
    Active,
    /// Visible but not receiving input (e.g. during a system dialog).
    Inactive,
    /// Not visible.
    Background,
}

impl AppState {
    /// Whether moving from `self` to `next` brings the app back to the foreground.
    #[must_use]
    pub const fn is_resume(self, next: Self) -> bool {
        matches!(self, Self::Inactive | Self::Background) && matches!(next, Self::Active)
    }
}

/// Source of application state transitions.
pub trait AppLifecycle {
    /// The state at the moment of the call.
    fn current(&self) -> AppState;

    /// Receive every subsequent state. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> Receiver<AppState>;
}

/// Triggers [`AcquisitionController::acquire`] on every return to the foreground.
///
/// Created together with the future that does the work; run that future on
/// the same local executor as the controller. Dropping the observer (or
/// calling [`detach`](Self::detach)) releases the lifecycle subscription;
/// the future completes once any attempt it started has finished.
#[derive(Debug)]
pub struct LifecycleObserver {
    shutdown: ShutdownHandle,
}

impl LifecycleObserver {
    /// Subscribe to `lifecycle` on behalf of `controller`.
    pub fn attach<L, P, S, F>(
        lifecycle: &L,
        controller: Rc<AcquisitionController<P, S, F>>,
    ) -> (Self, impl Future<Output = ()> + use<L, P, S, F>)
    where
        L: AppLifecycle,
        P: PermissionProvider,
        S: ServiceProvider,
        F: PositionProvider,
    {
        let (shutdown, signal) = ShutdownHandle::new();
        let events = lifecycle.subscribe();
        let initial = lifecycle.current();
        (Self { shutdown }, observe(events, initial, controller, signal))
    }

    /// Stop observing.
    pub fn detach(self) {
        self.shutdown.shutdown();
    }
}

async fn observe<P, S, F>(
    events: Receiver<AppState>,
    mut previous: AppState,
    controller: Rc<AcquisitionController<P, S, F>>,
    shutdown: ShutdownReceiver,
) where
    P: PermissionProvider,
    S: ServiceProvider,
    F: PositionProvider,
{
    if shutdown.is_shutdown() {
        return;
    }

    // Attempts run alongside the event loop so later transitions are still
    // seen; the controller ignores the ones arriving mid-attempt. Pending
    // events are drained before attempts are polled.
    let mut attempts = FuturesUnordered::new();

    {
        let mut events = pin!(events.fuse());
        let mut stopped = pin!(shutdown.wait().fuse());

        loop {
            futures::select_biased! {
                () = stopped => break,
                next = events.next() => {
                    let Some(next) = next else { break };
                    if previous.is_resume(next) {
                        info!("app returned to foreground, acquiring location");
                        let controller = Rc::clone(&controller);
                        attempts.push(async move {
                            controller.acquire(AcquisitionContext::interactive()).await;
                        });
                    }
                    previous = next;
                }
                () = attempts.select_next_some() => {}
            }
        }
    }

    // The subscription is released above; attempts already started still
    // run to a terminal status.
    if !attempts.is_empty() {
        debug!("waiting for {} acquisition attempt(s) to finish", attempts.len());
        while attempts.next().await.is_some() {}
    }

    debug!("lifecycle observer stopped");
}
