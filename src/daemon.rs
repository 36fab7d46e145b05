//! Command-file daemon loop.
//!
//! The daemon polls a drop file for control commands and drives the
//! engine in response. Between commands it periodically re-publishes the
//! current fix so sink consumers keep seeing a fresh timestamp.
//!
//! Commands are single lines:
//! - `LOCATION,<lat>,<lng>[,<accuracy>]` publishes a fix
//! - `STOP` ends the loop without tearing injection down
//!
//! The file is removed as soon as it is read; malformed payloads are
//! logged and ignored.

use std::fs;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{InjectorError, Result};
use crate::injector::LocationInjector;
use crate::properties::PropertyStore;
use crate::shell::ElevatedShell;
use crate::types::GeoFix;

/// Seconds between command-file polls
pub const DEFAULT_POLL_SECS: u64 = 1;
/// Seconds between re-publishes of the current fix
pub const DEFAULT_REFRESH_SECS: u64 = 6;
/// Accuracy applied when a LOCATION command omits the fourth field
pub const DEFAULT_COMMAND_ACCURACY: f64 = 10.0;

/// A parsed control command
#[derive(Debug, Clone, PartialEq)]
pub enum DaemonCommand {
    Location {
        latitude: f64,
        longitude: f64,
        accuracy: f64,
    },
    Stop,
}

/// Parse one command-file payload.
pub fn parse_command(input: &str) -> Result<DaemonCommand> {
    let trimmed = input.trim();
    if trimmed == "STOP" {
        return Ok(DaemonCommand::Stop);
    }

    let parts: Vec<&str> = trimmed.split(',').collect();
    if parts.len() >= 3 && parts[0] == "LOCATION" {
        let latitude = parts[1].trim().parse::<f64>()?;
        let longitude = parts[2].trim().parse::<f64>()?;
        let accuracy = match parts.get(3) {
            Some(raw) => raw.trim().parse::<f64>()?,
            None => DEFAULT_COMMAND_ACCURACY,
        };
        return Ok(DaemonCommand::Location {
            latitude,
            longitude,
            accuracy,
        });
    }

    Err(InjectorError::Parse(format!(
        "unrecognized command: {}",
        trimmed
    )))
}

/// What a single poll pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No command present, no refresh due
    Idle,
    /// A LOCATION command was applied
    Injected,
    /// The current fix was re-published
    Refreshed,
    /// A STOP command was received
    Stopped,
}

/// Poll loop that drives a [`LocationInjector`] from the command file
pub struct CommandDaemon<P: PropertyStore, S: ElevatedShell> {
    injector: LocationInjector<P, S>,
    poll_interval: Duration,
    refresh_ticks: u64,
    ticks_since_refresh: u64,
    current: Option<(f64, f64, f64)>,
}

impl<P: PropertyStore, S: ElevatedShell> CommandDaemon<P, S> {
    /// Build a daemon polling every `poll_secs` (minimum one second) and
    /// re-publishing every `refresh_secs`. A refresh of zero disables
    /// re-publishing.
    pub fn new(injector: LocationInjector<P, S>, poll_secs: u64, refresh_secs: u64) -> Self {
        let poll_secs = poll_secs.max(1);
        let refresh_ticks = if refresh_secs == 0 {
            0
        } else {
            (refresh_secs + poll_secs - 1) / poll_secs
        };
        Self {
            injector,
            poll_interval: Duration::from_secs(poll_secs),
            refresh_ticks,
            ticks_since_refresh: 0,
            current: None,
        }
    }

    pub fn injector(&self) -> &LocationInjector<P, S> {
        &self.injector
    }

    /// One poll pass: consume a pending command if present, otherwise
    /// re-publish the current fix when the refresh interval has elapsed.
    pub fn tick(&mut self) -> TickOutcome {
        let command_path = self.injector.config().command_path.clone();

        if command_path.exists() {
            let raw = match fs::read_to_string(&command_path) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(
                        "failed to read command file {}: {}",
                        command_path.display(),
                        err
                    );
                    String::new()
                }
            };
            if let Err(err) = fs::remove_file(&command_path) {
                warn!(
                    "failed to remove command file {}: {}",
                    command_path.display(),
                    err
                );
            }

            match parse_command(&raw) {
                Ok(DaemonCommand::Location {
                    latitude,
                    longitude,
                    accuracy,
                }) => match GeoFix::new(latitude, longitude, accuracy) {
                    Ok(fix) => {
                        self.injector.inject(&fix);
                        info!(
                            "location updated: {}, {}, {}",
                            latitude, longitude, accuracy
                        );
                        self.current = Some((latitude, longitude, accuracy));
                        self.ticks_since_refresh = 0;
                        return TickOutcome::Injected;
                    }
                    Err(err) => warn!("ignoring location command: {}", err),
                },
                Ok(DaemonCommand::Stop) => {
                    info!("received stop command, exiting");
                    return TickOutcome::Stopped;
                }
                Err(err) => warn!("ignoring command: {}", err),
            }
        }

        if let Some((latitude, longitude, accuracy)) = self.current {
            if self.refresh_ticks > 0 {
                self.ticks_since_refresh += 1;
                if self.ticks_since_refresh >= self.refresh_ticks {
                    self.ticks_since_refresh = 0;
                    match GeoFix::new(latitude, longitude, accuracy) {
                        Ok(fix) => {
                            self.injector.inject(&fix);
                            debug!("re-published current fix");
                            return TickOutcome::Refreshed;
                        }
                        Err(err) => {
                            warn!("dropping current fix: {}", err);
                            self.current = None;
                        }
                    }
                }
            }
        }

        TickOutcome::Idle
    }

    /// Run until a STOP command arrives.
    pub fn run(&mut self) {
        info!(
            "daemon loop started, watching {}",
            self.injector.config().command_path.display()
        );
        loop {
            if self.tick() == TickOutcome::Stopped {
                break;
            }
            thread::sleep(self.poll_interval);
        }
    }
}
