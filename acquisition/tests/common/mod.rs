//! Scripted in-memory providers for driving the controller in tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use async_channel::{Receiver, Sender, unbounded};
use geotracker_acquisition::{AcquisitionController, AppLifecycle, AppState};
use geotracker_location::{
    CachedQuery, Coordinates, CurrentQuery, LocationError, PositionProvider, ServiceProvider,
    now_ms,
};
use geotracker_permission::{PermissionError, PermissionProvider, PermissionState};

pub type Controller = AcquisitionController<FakePermission, FakeService, FakePositions>;

/// Let every other future in the same `join!` make progress.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// A fix taken `age_ms` ago.
pub fn aged(latitude: f64, longitude: f64, age_ms: u64) -> Coordinates {
    Coordinates::new(latitude, longitude).with_timestamp(now_ms() - age_ms)
}

pub struct FakePermission {
    pub state: PermissionState,
    pub answer: PermissionState,
    pub fail: bool,
    /// Yield once inside `status`, so an attempt is observably in flight.
    pub suspend: bool,
    pub status_calls: Cell<usize>,
    pub requests: Cell<usize>,
}

impl FakePermission {
    pub fn new(state: PermissionState, answer: PermissionState) -> Self {
        Self {
            state,
            answer,
            fail: false,
            suspend: false,
            status_calls: Cell::new(0),
            requests: Cell::new(0),
        }
    }

    pub fn granted() -> Self {
        Self::new(PermissionState::GRANTED, PermissionState::GRANTED)
    }

    pub fn suspending(mut self) -> Self {
        self.suspend = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl PermissionProvider for FakePermission {
    async fn status(&self) -> Result<PermissionState, PermissionError> {
        self.status_calls.set(self.status_calls.get() + 1);
        if self.suspend {
            tokio::task::yield_now().await;
        }
        if self.fail {
            return Err(PermissionError::Unknown("permission bridge unavailable".into()));
        }
        Ok(self.state)
    }

    async fn request(&self) -> Result<PermissionState, PermissionError> {
        self.requests.set(self.requests.get() + 1);
        Ok(self.answer)
    }
}

pub struct FakeService {
    pub enabled: Cell<bool>,
    /// Whether the platform can prompt to enable the service.
    pub prompt: bool,
    /// Whether the user accepts the prompt.
    pub accept: bool,
    /// Turn the service on after this many probes, if set.
    pub enable_after_probes: Option<usize>,
    pub fail: bool,
    pub probes: Cell<usize>,
    pub prompts: Cell<usize>,
}

impl FakeService {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Cell::new(enabled),
            prompt: false,
            accept: false,
            enable_after_probes: None,
            fail: false,
            probes: Cell::new(0),
            prompts: Cell::new(0),
        }
    }

    pub fn enabled() -> Self {
        Self::new(true)
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn with_prompt(mut self, accept: bool) -> Self {
        self.prompt = true;
        self.accept = accept;
        self
    }
}

impl ServiceProvider for FakeService {
    async fn is_enabled(&self) -> Result<bool, LocationError> {
        let probes = self.probes.get() + 1;
        self.probes.set(probes);
        if self.fail {
            return Err(LocationError::Unknown("service probe crashed".into()));
        }
        if self.enable_after_probes.is_some_and(|after| probes > after) {
            self.enabled.set(true);
        }
        Ok(self.enabled.get())
    }

    async fn try_enable(&self) -> Result<(), LocationError> {
        self.prompts.set(self.prompts.get() + 1);
        if self.accept {
            self.enabled.set(true);
            Ok(())
        } else {
            Err(LocationError::Unknown("user cancelled".into()))
        }
    }

    fn supports_enable_prompt(&self) -> bool {
        self.prompt
    }
}

pub enum Refined {
    Fix(Coordinates),
    Fail(LocationError),
    Hang,
}

pub struct FakePositions {
    pub cached: RefCell<Result<Option<Coordinates>, LocationError>>,
    pub refined: RefCell<Refined>,
    pub cached_calls: Cell<usize>,
    pub current_calls: Cell<usize>,
}

impl FakePositions {
    pub fn new(cached: Result<Option<Coordinates>, LocationError>, refined: Refined) -> Self {
        Self {
            cached: RefCell::new(cached),
            refined: RefCell::new(refined),
            cached_calls: Cell::new(0),
            current_calls: Cell::new(0),
        }
    }

    /// No cached fix; the refined read returns `fix`.
    pub fn refined(fix: Coordinates) -> Self {
        Self::new(Ok(None), Refined::Fix(fix))
    }

    pub fn reads(&self) -> usize {
        self.cached_calls.get() + self.current_calls.get()
    }
}

impl PositionProvider for FakePositions {
    async fn last_known(&self, _query: &CachedQuery) -> Result<Option<Coordinates>, LocationError> {
        self.cached_calls.set(self.cached_calls.get() + 1);
        self.cached.borrow().clone()
    }

    async fn current(&self, _query: &CurrentQuery) -> Result<Coordinates, LocationError> {
        self.current_calls.set(self.current_calls.get() + 1);
        let outcome = match &*self.refined.borrow() {
            Refined::Fix(fix) => Some(Ok(*fix)),
            Refined::Fail(err) => Some(Err(err.clone())),
            Refined::Hang => None,
        };
        match outcome {
            Some(result) => result,
            None => futures::future::pending().await,
        }
    }
}

/// App lifecycle whose transitions are pushed by the test.
pub struct FakeLifecycle {
    current: AppState,
    sender: RefCell<Option<Sender<AppState>>>,
}

impl FakeLifecycle {
    pub fn new(current: AppState) -> Self {
        Self {
            current,
            sender: RefCell::new(None),
        }
    }

    pub fn emit(&self, state: AppState) {
        if let Some(sender) = &*self.sender.borrow() {
            let _ = sender.try_send(state);
        }
    }

    /// Whether the observer released its subscription.
    pub fn is_unsubscribed(&self) -> bool {
        self.sender
            .borrow()
            .as_ref()
            .is_none_or(Sender::is_closed)
    }
}

impl AppLifecycle for FakeLifecycle {
    fn current(&self) -> AppState {
        self.current
    }

    fn subscribe(&self) -> Receiver<AppState> {
        let (sender, receiver) = unbounded();
        *self.sender.borrow_mut() = Some(sender);
        receiver
    }
}
