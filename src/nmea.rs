//! GGA sentence generation for the NMEA replay sink.
//!
//! Produces the fixed-shape `$GPGGA,...*HH\r\n` sentence the replay stack
//! expects: UTC time of day, ddmm.mmmmmm coordinates, and a constant
//! quality/satellite/altitude trailer.

use crate::types::GeoFix;

const SECONDS_PER_DAY: i64 = 86_400;

/// XOR-fold checksum over every character between `$` and `*`.
pub fn checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, byte| acc ^ byte)
}

/// Render a fix as a complete GGA sentence, CRLF terminated.
///
/// Coordinates are rendered as zero-padded degrees (two digits for
/// latitude, three for longitude) followed by decimal minutes in
/// `mm.mmmmmm` form. Minutes that round to `60.000000` are emitted as-is
/// rather than carried into the degree field, matching the replay
/// consumers this feeds.
pub fn format_sentence(fix: &GeoFix) -> String {
    let body = sentence_body(fix);
    let sum = checksum(&body);
    format!("${}*{:02X}\r\n", body, sum)
}

fn sentence_body(fix: &GeoFix) -> String {
    let time = time_of_day(fix.timestamp);

    let lat_abs = fix.latitude.abs();
    let lat_degrees = lat_abs as u32;
    let lat_minutes = (lat_abs - f64::from(lat_degrees)) * 60.0;
    let lat_hemisphere = if fix.latitude >= 0.0 { 'N' } else { 'S' };

    let lng_abs = fix.longitude.abs();
    let lng_degrees = lng_abs as u32;
    let lng_minutes = (lng_abs - f64::from(lng_degrees)) * 60.0;
    let lng_hemisphere = if fix.longitude >= 0.0 { 'E' } else { 'W' };

    format!(
        "GPGGA,{},{:02}{:09.6},{},{:03}{:09.6},{},1,08,1.0,0.0,M,0.0,M,,",
        time,
        lat_degrees,
        lat_minutes,
        lat_hemisphere,
        lng_degrees,
        lng_minutes,
        lng_hemisphere
    )
}

/// `HHMMSS` UTC time of day for an epoch-seconds timestamp.
fn time_of_day(timestamp: i64) -> String {
    let second_of_day = timestamp.rem_euclid(SECONDS_PER_DAY);
    let hours = second_of_day / 3600;
    let minutes = (second_of_day % 3600) / 60;
    let seconds = second_of_day % 60;
    format!("{:02}{:02}{:02}", hours, minutes, seconds)
}
