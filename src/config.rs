//! Well-known device paths and property keys.
//!
//! Defaults target a stock Android layout; every location is overridable so
//! tests and the CLI can point the engine at scratch directories.

use std::path::PathBuf;

/// Property consulted by location services to allow mock providers
pub const MOCK_FLAG_PROPERTY: &str = "persist.sys.mock_location";
/// Property mirroring the injected position as `lat,lng,accuracy`
pub const MOCK_MIRROR_PROPERTY: &str = "persist.sys.mock.location";
/// Key=value record consumed by the GPS HAL configuration reader
pub const RECORD_FILE: &str = "/data/misc/location/gps.conf";
/// NMEA sentence file consumed by replay-capable GPS stacks
pub const SENTENCE_FILE: &str = "/data/misc/location/nmea.txt";
/// Drop file polled by the command daemon
pub const COMMAND_FILE: &str = "/data/local/tmp/location_command";
/// Process name the daemon runs under, also the pkill target
pub const DAEMON_PROCESS_NAME: &str = "location_injector";
/// Runtime launcher used to start the daemon from a packaged apk
pub const APP_PROCESS_BIN: &str = "/system/bin/app_process";
/// Working directory handed to the launcher
pub const APP_PROCESS_DIR: &str = "/system/bin";

/// Engine configuration: property keys, sink paths, daemon identity
#[derive(Debug, Clone)]
pub struct InjectorConfig {
    pub mock_flag_property: String,
    pub mock_mirror_property: String,
    pub record_path: PathBuf,
    pub sentence_path: PathBuf,
    pub command_path: PathBuf,
    pub daemon_process_name: String,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            mock_flag_property: MOCK_FLAG_PROPERTY.to_string(),
            mock_mirror_property: MOCK_MIRROR_PROPERTY.to_string(),
            record_path: PathBuf::from(RECORD_FILE),
            sentence_path: PathBuf::from(SENTENCE_FILE),
            command_path: PathBuf::from(COMMAND_FILE),
            daemon_process_name: DAEMON_PROCESS_NAME.to_string(),
        }
    }
}
