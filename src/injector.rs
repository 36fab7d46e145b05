//! The injection engine.
//!
//! [`LocationInjector`] drives the four sinks (mock-allowed flag, mirror
//! property, record file, sentence file) and also owns verification,
//! teardown, and launching the helper daemon.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{InjectorConfig, APP_PROCESS_BIN, APP_PROCESS_DIR};
use crate::error::{InjectorError, Result};
use crate::nmea;
use crate::persistence::{format_decimal, LocationStore};
use crate::properties::PropertyStore;
use crate::shell::ElevatedShell;
use crate::types::{GeoFix, InjectionReport, SinkOutcome};

#[cfg(unix)]
const DAEMON_MODE: u32 = 0o755;

/// Whether a fabricated position is currently published
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionState {
    Idle,
    Injected,
}

/// Orchestrates the property, record, and sentence sinks
pub struct LocationInjector<P: PropertyStore, S: ElevatedShell> {
    config: InjectorConfig,
    properties: P,
    shell: S,
    store: LocationStore,
    state: InjectionState,
}

impl<P: PropertyStore, S: ElevatedShell> LocationInjector<P, S> {
    pub fn new(config: InjectorConfig, properties: P, shell: S) -> Self {
        let store = LocationStore::new(config.record_path.clone(), config.sentence_path.clone());
        Self {
            config,
            properties,
            shell,
            store,
            state: InjectionState::Idle,
        }
    }

    pub fn state(&self) -> InjectionState {
        self.state
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    pub fn properties(&self) -> &P {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut P {
        &mut self.properties
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Publish a fix through every sink.
    ///
    /// Sinks are independent: a failed sink is logged and recorded in the
    /// report while the remaining sinks still run. The engine is left in
    /// the injected state regardless of individual sink outcomes.
    pub fn inject(&mut self, fix: &GeoFix) -> InjectionReport {
        info!(
            "injecting location lat={} lng={} acc={}",
            format_decimal(fix.latitude),
            format_decimal(fix.longitude),
            format_decimal(fix.accuracy)
        );

        let mock_flag =
            SinkOutcome::from_result(self.properties.set(&self.config.mock_flag_property, "1"));
        if let SinkOutcome::Failed(reason) = &mock_flag {
            warn!("failed to enable mock location: {}", reason);
        }

        let mirror_value = format!(
            "{},{},{}",
            format_decimal(fix.latitude),
            format_decimal(fix.longitude),
            format_decimal(fix.accuracy)
        );
        let location_mirror = SinkOutcome::from_result(
            self.properties
                .set(&self.config.mock_mirror_property, &mirror_value),
        );
        if let SinkOutcome::Failed(reason) = &location_mirror {
            warn!("failed to set mock location value: {}", reason);
        }

        let record_file = SinkOutcome::from_result(self.store.write_record(fix));
        if let SinkOutcome::Failed(reason) = &record_file {
            warn!(
                "failed to write record {}: {}",
                self.store.record_path().display(),
                reason
            );
        }

        let sentence = nmea::format_sentence(fix);
        let sentence_file = SinkOutcome::from_result(self.store.write_sentence(&sentence));
        if let SinkOutcome::Failed(reason) = &sentence_file {
            warn!(
                "failed to write sentence {}: {}",
                self.store.sentence_path().display(),
                reason
            );
        }

        self.state = InjectionState::Injected;
        InjectionReport {
            mock_flag,
            location_mirror,
            record_file,
            sentence_file,
        }
    }

    /// Check whether an injected position for these coordinates is
    /// currently visible.
    ///
    /// True only when the mock-allowed flag is set and the record file
    /// contains both coordinates rendered at six decimal places.
    pub fn verify(&self, latitude: f64, longitude: f64) -> bool {
        let flag = self.properties.get(&self.config.mock_flag_property);
        if flag.is_empty() || flag == "0" {
            debug!("mock location flag is not enabled");
            return false;
        }

        let record = self.store.read_record();
        let latitude_needle = format!("latitude={}", format_decimal(latitude));
        let longitude_needle = format!("longitude={}", format_decimal(longitude));

        if record.contains(&latitude_needle) && record.contains(&longitude_needle) {
            debug!(
                "injection verified via {}",
                self.store.record_path().display()
            );
            return true;
        }

        debug!("could not verify injection");
        false
    }

    /// Tear injection down: clear the mock-allowed flag and kill the
    /// helper daemon.
    ///
    /// Teardown is best effort; failures are logged and the engine still
    /// returns to idle. Always reports success.
    pub fn stop(&mut self) -> bool {
        info!("stopping location injection");

        if let Err(err) = self.properties.set(&self.config.mock_flag_property, "0") {
            warn!("failed to clear mock location flag: {}", err);
        }

        let kill = format!("pkill -f {}", self.config.daemon_process_name);
        if let Err(err) = self.shell.run(&kill) {
            warn!("failed to kill injector daemon: {}", err);
        }

        self.state = InjectionState::Idle;
        true
    }

    /// Launch the helper daemon through the elevated shell.
    ///
    /// The executable at `daemon_path` is marked executable, then started
    /// under `app_process` with the owning package's classpath.
    pub fn start_daemon(&self, daemon_path: &Path, package_name: &str) -> Result<()> {
        info!("starting injector daemon: {}", daemon_path.display());

        if !daemon_path.exists() {
            return Err(InjectorError::NotFound(format!(
                "daemon executable {}",
                daemon_path.display()
            )));
        }
        mark_executable(daemon_path)?;

        let command = format!(
            "CLASSPATH=/data/app/{}-*/base.apk {} {} {} {}",
            package_name,
            APP_PROCESS_BIN,
            APP_PROCESS_DIR,
            self.config.daemon_process_name,
            package_name
        );
        self.shell.run(&command)?;

        info!("daemon started");
        Ok(())
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(DAEMON_MODE)).map_err(|err| {
        InjectorError::PermissionDenied(format!(
            "cannot mark {} executable: {}",
            path.display(),
            err
        ))
    })
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}
