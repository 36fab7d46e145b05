//! Location Injection Library
//!
//! A Rust library for publishing fabricated GPS positions on rooted
//! Android devices. The engine forces the system into mock-location
//! mode, then publishes the position through a mirror property and
//! through the record and NMEA sentence files that location stacks
//! read back.
//!
//! # Features
//!
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Print injection reports as JSON from the CLI
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Publish a fix through the real device sinks:
//! ```rust,no_run
//! use location_injector::{
//!     GeoFix, InjectorConfig, LocationInjector, SuShell, SystemPropertyStore,
//! };
//!
//! let config = InjectorConfig::default();
//! let mut injector = LocationInjector::new(config, SystemPropertyStore::new(), SuShell::new());
//!
//! let fix = GeoFix::new(37.422, -122.084, 10.0).unwrap();
//! let report = injector.inject(&fix);
//! println!("all sinks written: {}", report.all_written());
//! assert!(injector.verify(37.422, -122.084));
//! injector.stop();
//! ```
//!
//! Drive the engine against in-memory capabilities instead, the way the
//! integration tests do:
//! ```rust,no_run
//! use location_injector::{
//!     GeoFix, InMemoryPropertyStore, InjectorConfig, LocationInjector, RecordingShell,
//! };
//! use std::env;
//!
//! let config = InjectorConfig {
//!     record_path: env::temp_dir().join("gps.conf"),
//!     sentence_path: env::temp_dir().join("nmea.txt"),
//!     ..InjectorConfig::default()
//! };
//!
//! let mut injector =
//!     LocationInjector::new(config, InMemoryPropertyStore::new(), RecordingShell::new());
//! let fix = GeoFix::new(-33.8688, 151.2093, 5.0).unwrap();
//! injector.inject(&fix);
//! ```
//!
//! # Public API
//!
//! ## Engine
//! - [`LocationInjector`] - Drives every sink; verify, stop, daemon launch
//! - [`InjectionState`] - Idle/Injected engine state
//! - [`CommandDaemon`] - Command-file poll loop around the engine
//! - [`parse_command`] - Parse one command-file payload
//!
//! ## Data Types
//! - [`GeoFix`] - Range-validated position fix
//! - [`InjectionReport`] - Per-sink outcomes of one injection pass
//! - [`SinkOutcome`] - Written/Failed result for a single sink
//! - [`InjectorConfig`] - Property keys, sink paths, daemon identity
//!
//! ## Capabilities
//! - [`PropertyStore`] / [`SystemPropertyStore`] / [`InMemoryPropertyStore`]
//! - [`ElevatedShell`] / [`SuShell`] / [`RecordingShell`]
//!
//! ## Sinks and Formats
//! - [`format_sentence`] - Render a fix as a `$GPGGA,...*HH` sentence
//! - [`checksum`] - XOR-fold sentence checksum
//! - [`LocationStore`] - Record and sentence file sinks
//! - [`format_decimal`] - The six-decimal rendering every sink shares

// Module declarations
pub mod config;
pub mod daemon;
pub mod error;
pub mod injector;
pub mod nmea;
pub mod persistence;
pub mod properties;
pub mod shell;
pub mod types;

// Re-export everything from modules for convenience
pub use config::*;
pub use daemon::*;
pub use error::*;
pub use injector::*;
pub use nmea::*;
pub use persistence::*;
pub use properties::*;
pub use shell::*;
pub use types::*;
