//! Cancelable location-watch subscription.
//!
//! A `LocationSource` wraps a platform's continuous position watch. Starting a
//! watch returns a `WatchHandle`; cancelling (or dropping) the handle stops
//! delivery. Callbacks run on the source's own thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use mapfix_core::config::WatchOptions;
use mapfix_core::error::LocationError;
use mapfix_core::types::GeoPoint;

pub type FixCallback = Box<dyn FnMut(GeoPoint) + Send>;
pub type ErrorCallback = Box<dyn FnMut(LocationError) + Send>;

/// Shared stop flag between a watch and its handle.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Owner of a running watch. Dropping it cancels the watch.
#[derive(Debug)]
pub struct WatchHandle {
    token: CancelToken,
    thread: Option<JoinHandle<()>>,
}

impl WatchHandle {
    pub fn new(token: CancelToken, thread: Option<JoinHandle<()>>) -> Self {
        Self { token, thread }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the delivery thread to finish (after a cancel or end of source).
    pub fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// One item delivered by a watch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationUpdate {
    Fix(GeoPoint),
    Error(LocationError),
}

/// A platform location API offering a continuous watch.
pub trait LocationSource {
    /// Begin delivering fixes and errors until the returned handle is cancelled.
    ///
    /// Fails immediately when the platform has no location capability.
    fn start_watch(
        &mut self,
        options: &WatchOptions,
        on_fix: FixCallback,
        on_error: ErrorCallback,
    ) -> Result<WatchHandle, LocationError>;
}

/// Replays a fixed sequence of updates from a background thread.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: Vec<LocationUpdate>,
    interval: Duration,
    available: bool,
}

impl ScriptedSource {
    pub fn new(script: Vec<LocationUpdate>) -> Self {
        Self {
            script,
            interval: Duration::ZERO,
            available: true,
        }
    }

    /// Delay between consecutive updates.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// A source on a platform without geolocation.
    pub fn unavailable() -> Self {
        Self {
            script: Vec::new(),
            interval: Duration::ZERO,
            available: false,
        }
    }
}

impl LocationSource for ScriptedSource {
    fn start_watch(
        &mut self,
        _options: &WatchOptions,
        mut on_fix: FixCallback,
        mut on_error: ErrorCallback,
    ) -> Result<WatchHandle, LocationError> {
        if !self.available {
            return Err(LocationError::Unavailable);
        }

        let token = CancelToken::new();
        let thread_token = token.clone();
        let script = self.script.clone();
        let interval = self.interval;

        let thread = std::thread::Builder::new()
            .name("mapfix-location-watch".into())
            .spawn(move || {
                for update in script {
                    if thread_token.is_cancelled() {
                        return;
                    }
                    match update {
                        LocationUpdate::Fix(fix) => on_fix(fix),
                        LocationUpdate::Error(err) => on_error(err),
                    }
                    if !interval.is_zero() {
                        std::thread::sleep(interval);
                    }
                }
            })
            .map_err(|_| LocationError::Unavailable)?;

        Ok(WatchHandle::new(token, Some(thread)))
    }
}
