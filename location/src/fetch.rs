//! Two-phase position fetch: last-known fix first, fresh fix second.

use std::pin::pin;
use std::time::Duration;

use async_channel::Sender;
use futures::future::{Either, select};
use futures_timer::Delay;
use log::{debug, warn};

use crate::{CachedQuery, Coordinates, FetchConfig, LocationError, PositionProvider, now_ms};

/// A reading delivered by [`PositionFetcher::fetch_best`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fix {
    /// A previously recorded fix, returned without a new acquisition.
    Cached(Coordinates),
    /// A freshly acquired fix. Supersedes any earlier cached one.
    Refined(Coordinates),
}

impl Fix {
    /// The coordinates carried by this fix.
    #[must_use]
    pub const fn coordinates(&self) -> &Coordinates {
        match self {
            Self::Cached(fix) | Self::Refined(fix) => fix,
        }
    }

    /// Which read produced this fix.
    #[must_use]
    pub const fn source(&self) -> FixSource {
        match self {
            Self::Cached(_) => FixSource::Cached,
            Self::Refined(_) => FixSource::Refined,
        }
    }
}

/// Which read a fetch ended up standing on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixSource {
    /// The cached read; the refined read failed afterwards.
    Cached,
    /// The refined read.
    Refined,
}

/// Runs the cached-then-refined acquisition against a [`PositionProvider`].
#[derive(Debug, Clone, Default)]
pub struct PositionFetcher<P> {
    provider: P,
    config: FetchConfig,
}

impl<P: PositionProvider> PositionFetcher<P> {
    /// Create a fetcher with the given provider and configuration.
    pub const fn new(provider: P, config: FetchConfig) -> Self {
        Self { provider, config }
    }

    /// Borrow the underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The active configuration.
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch the best available fix, sending every usable reading to `sink`
    /// as soon as it is known.
    ///
    /// The cached read never fails the fetch. A refined-read failure is
    /// swallowed when the cached read already delivered a fix.
    ///
    /// # Errors
    /// Returns the refined read's error when neither read produced a fix.
    pub async fn fetch_best(&self, sink: &Sender<Fix>) -> Result<FixSource, LocationError> {
        let cached = self.read_cached().await;
        if let Some(fix) = cached {
            deliver(sink, Fix::Cached(fix));
        }

        match self.read_refined().await {
            Ok(fix) => {
                deliver(sink, Fix::Refined(fix));
                Ok(FixSource::Refined)
            }
            Err(err) if cached.is_some() => {
                debug!("refined read failed, keeping cached fix: {err}");
                Ok(FixSource::Cached)
            }
            Err(err) => Err(err),
        }
    }

    async fn read_cached(&self) -> Option<Coordinates> {
        let query = self.config.cached_query();
        match self.provider.last_known(&query).await {
            Ok(Some(fix)) => accept_cached(fix, &query, now_ms()),
            Ok(None) => {
                debug!("no last known fix");
                None
            }
            Err(err) => {
                debug!("last known fix unavailable: {err}");
                None
            }
        }
    }

    async fn read_refined(&self) -> Result<Coordinates, LocationError> {
        let query = self.config.current_query();
        let read = pin!(self.provider.current(&query));
        let deadline = Delay::new(Duration::from_millis(query.timeout_ms));

        let fix = match select(read, deadline).await {
            Either::Left((result, _)) => result?,
            Either::Right(((), _)) => return Err(LocationError::Timeout),
        };

        if fix.is_valid() {
            Ok(fix)
        } else {
            warn!(
                "discarding out of range fix ({}, {})",
                fix.latitude, fix.longitude
            );
            Err(LocationError::InvalidFix)
        }
    }
}

fn accept_cached(fix: Coordinates, query: &CachedQuery, now_ms: u64) -> Option<Coordinates> {
    if !fix.is_valid() {
        warn!(
            "discarding out of range last known fix ({}, {})",
            fix.latitude, fix.longitude
        );
        return None;
    }

    let age = fix.age_ms(now_ms);
    if age > query.max_age_ms {
        debug!("last known fix too old ({age} ms)");
        return None;
    }

    if let Some(accuracy) = fix.accuracy_meters
        && (accuracy.is_nan() || accuracy > query.required_accuracy_m)
    {
        debug!("last known fix too coarse ({accuracy} m)");
        return None;
    }

    Some(fix)
}

fn deliver(sink: &Sender<Fix>, fix: Fix) {
    if let Err(err) = sink.try_send(fix) {
        warn!("dropping {:?} fix: {err}", fix.source());
    }
}
