//! Drives a `TrackingSession` from a `LocationSource`.
//!
//! The watch callbacks run on the source's thread and only forward updates
//! over an `mpsc` channel. `pump()` applies queued commands, opens or closes
//! the watch to match what the session needs, then drains the channel in
//! arrival order.

use std::sync::mpsc;

use tracing::{debug, warn};

use mapfix_core::commands::SessionCommand;
use mapfix_core::error::LocationError;
use mapfix_core::events::SessionEvent;

use crate::engine::TrackingSession;
use crate::error::SessionError;
use crate::location::{LocationSource, LocationUpdate, WatchHandle};

pub struct TrackingRunner<S: LocationSource> {
    session: TrackingSession,
    source: S,
    watch: Option<WatchHandle>,
    update_rx: Option<mpsc::Receiver<LocationUpdate>>,
    /// `fix_demand` seen at the last fatal error. The watch stays closed
    /// until tracking or calibration is started again.
    halted_at: Option<u64>,
}

impl<S: LocationSource> TrackingRunner<S> {
    pub fn new(session: TrackingSession, source: S) -> Self {
        Self {
            session,
            source,
            watch: None,
            update_rx: None,
            halted_at: None,
        }
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TrackingSession {
        &mut self.session
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Start tracking and open the watch.
    ///
    /// When the platform cannot watch, the failure is reported to the session
    /// (which stops tracking) and returned.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.session.apply(SessionCommand::StartTracking)?;
        if let Err(err) = self.open_watch() {
            self.fail(err);
            return Err(err.into());
        }
        Ok(())
    }

    /// Stop tracking and cancel the watch.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        self.close_watch();
        self.session.apply(SessionCommand::StopTracking)
    }

    pub fn queue_command(&mut self, command: SessionCommand) {
        self.session.queue_command(command);
    }

    /// Apply queued commands and every update received so far.
    ///
    /// Returns the events emitted during this pump.
    pub fn pump(&mut self) -> Vec<SessionEvent> {
        self.session.process_commands();
        self.reconcile_watch();

        let updates: Vec<LocationUpdate> = match &self.update_rx {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for update in updates {
            match update {
                LocationUpdate::Fix(fix) => {
                    self.session.handle_fix(fix);
                }
                LocationUpdate::Error(err) => {
                    self.fail(err);
                    if err.is_fatal() {
                        break;
                    }
                }
            }
        }

        self.reconcile_watch();
        self.session.drain_events()
    }

    /// Open or close the watch to match `TrackingSession::wants_fixes`.
    fn reconcile_watch(&mut self) {
        let wanted = self.session.wants_fixes() && !self.is_halted();
        if wanted && self.watch.is_none() {
            if let Err(err) = self.open_watch() {
                self.fail(err);
            }
        } else if !wanted && self.watch.is_some() {
            self.close_watch();
        }
    }

    fn open_watch(&mut self) -> Result<(), LocationError> {
        if self.watch.is_some() {
            return Ok(());
        }
        let (tx, rx) = mpsc::channel::<LocationUpdate>();
        let err_tx = tx.clone();
        let options = self.session.config().watch;

        let handle = self.source.start_watch(
            &options,
            Box::new(move |fix| {
                let _ = tx.send(LocationUpdate::Fix(fix));
            }),
            Box::new(move |err| {
                let _ = err_tx.send(LocationUpdate::Error(err));
            }),
        )?;

        debug!("location watch opened");
        self.watch = Some(handle);
        self.update_rx = Some(rx);
        Ok(())
    }

    /// A fatal error closed the watch and nothing has restarted demand since.
    pub fn is_halted(&self) -> bool {
        self.halted_at == Some(self.session.fix_demand())
    }

    fn fail(&mut self, err: LocationError) {
        self.session.handle_location_error(err);
        if err.is_fatal() {
            self.halted_at = Some(self.session.fix_demand());
            self.close_watch();
        }
    }

    fn close_watch(&mut self) {
        if let Some(handle) = self.watch.take() {
            handle.cancel();
            debug!("location watch closed");
        }
        if let Some(rx) = self.update_rx.take() {
            let dropped = rx.try_iter().count();
            if dropped > 0 {
                warn!(dropped, "discarded updates after the watch closed");
            }
        }
    }

    /// Block until the current watch's source has delivered everything.
    pub fn wait_for_source(&mut self) {
        if let Some(handle) = self.watch.as_mut() {
            handle.join();
        }
    }
}

impl<S: LocationSource> Drop for TrackingRunner<S> {
    fn drop(&mut self) {
        self.close_watch();
    }
}
