//! On-disk sinks: the key=value record file and the sentence file.
//!
//! Both sinks are rewritten whole on every injection (create-or-truncate)
//! and relaxed to mode 0644 so the unprivileged location stack can read
//! them back.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::types::GeoFix;

/// Upper bound on how much of the record is read back during verification
pub const MAX_RECORD_BYTES: u64 = 1024;

#[cfg(unix)]
const SINK_MODE: u32 = 0o644;

/// Render a coordinate or accuracy value exactly as every sink and the
/// verifier expect it: six decimal places.
pub fn format_decimal(value: f64) -> String {
    format!("{:.6}", value)
}

/// File-backed location sinks
#[derive(Debug, Clone)]
pub struct LocationStore {
    record_path: PathBuf,
    sentence_path: PathBuf,
}

impl LocationStore {
    pub fn new(record_path: PathBuf, sentence_path: PathBuf) -> Self {
        Self {
            record_path,
            sentence_path,
        }
    }

    pub fn record_path(&self) -> &Path {
        &self.record_path
    }

    pub fn sentence_path(&self) -> &Path {
        &self.sentence_path
    }

    /// Write the key=value record consumed by the GPS configuration reader.
    pub fn write_record(&self, fix: &GeoFix) -> Result<()> {
        let mut file = create_sink(&self.record_path)?;
        writeln!(file, "latitude={}", format_decimal(fix.latitude))?;
        writeln!(file, "longitude={}", format_decimal(fix.longitude))?;
        writeln!(file, "accuracy={}", format_decimal(fix.accuracy))?;
        writeln!(file, "provider=gps")?;
        writeln!(file, "time={}", fix.timestamp)?;
        apply_sink_mode(&self.record_path)?;
        Ok(())
    }

    /// Write the NMEA sentence file. The sentence carries its own CRLF.
    pub fn write_sentence(&self, sentence: &str) -> Result<()> {
        let mut file = create_sink(&self.sentence_path)?;
        file.write_all(sentence.as_bytes())?;
        apply_sink_mode(&self.sentence_path)?;
        Ok(())
    }

    /// Read back at most [`MAX_RECORD_BYTES`] of the record.
    ///
    /// A missing or unreadable record reads as empty, which verification
    /// treats as "nothing injected".
    pub fn read_record(&self) -> String {
        let file = match File::open(&self.record_path) {
            Ok(file) => file,
            Err(err) => {
                debug!("record {} not readable: {}", self.record_path.display(), err);
                return String::new();
            }
        };

        let mut raw = Vec::new();
        if let Err(err) = file.take(MAX_RECORD_BYTES).read_to_end(&mut raw) {
            debug!("record {} read failed: {}", self.record_path.display(), err);
            return String::new();
        }
        String::from_utf8_lossy(&raw).into_owned()
    }
}

fn create_sink(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(File::create(path)?)
}

#[cfg(unix)]
fn apply_sink_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(SINK_MODE))?;
    Ok(())
}

#[cfg(not(unix))]
fn apply_sink_mode(_path: &Path) -> Result<()> {
    Ok(())
}
