//! System property access behind an injectable interface.
//!
//! The device-backed store shells out to `getprop`/`setprop` the way the
//! platform tools do. Reads never fail: a missing key, a failed spawn, or
//! a non-zero exit all read as the empty string. Writes report failure so
//! the caller decides whether the pass continues.

use std::collections::HashMap;
use std::process::Command;

use tracing::warn;

use crate::error::{InjectorError, Result};

const GETPROP_BIN: &str = "getprop";
const SETPROP_BIN: &str = "setprop";

/// Read/write access to system properties
pub trait PropertyStore {
    /// Read a property; unset keys and read failures yield `""`.
    fn get(&self, key: &str) -> String;
    /// Write a property.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Property store backed by the device `getprop`/`setprop` binaries
#[derive(Debug, Default)]
pub struct SystemPropertyStore;

impl SystemPropertyStore {
    pub fn new() -> Self {
        Self
    }
}

impl PropertyStore for SystemPropertyStore {
    fn get(&self, key: &str) -> String {
        match Command::new(GETPROP_BIN).arg(key).output() {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            Ok(output) => {
                warn!("getprop {} exited with {}", key, output.status);
                String::new()
            }
            Err(err) => {
                warn!("failed to run getprop for {}: {}", key, err);
                String::new()
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let status = Command::new(SETPROP_BIN)
            .arg(key)
            .arg(value)
            .status()
            .map_err(|err| {
                InjectorError::PropertyWrite(format!("failed to run setprop for {}: {}", key, err))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InjectorError::PropertyWrite(format!(
                "setprop {} exited with {}",
                key, status
            )))
        }
    }
}

/// In-memory property store for tests and dry runs
#[derive(Debug, Default)]
pub struct InMemoryPropertyStore {
    values: HashMap<String, String>,
    fail_writes: bool,
}

impl InMemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail, simulating a read-only property
    /// service.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Seed a property directly, bypassing the failure switch.
    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

impl PropertyStore for InMemoryPropertyStore {
    fn get(&self, key: &str) -> String {
        self.values.get(key).cloned().unwrap_or_default()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(InjectorError::PropertyWrite(format!(
                "writes disabled for {}",
                key
            )));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
