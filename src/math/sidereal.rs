//! GPS time and Greenwich mean sidereal time.
//!
//! GMST is propagated linearly from its value at 2000-01-01 00:00:00 UTC using the
//! sidereal rotation rate of the Earth. This is accurate to well below a second of
//! arc over the span of ground-based detector observations.

use std::f64::consts::{PI, TAU};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// GPS time of 2000-01-01 00:00:00 UTC (13 leap seconds after the GPS epoch).
pub const GPS_2000: f64 = 630_720_013.0;

/// Sidereal rotation rate of the Earth in rad/s.
pub const OMEGA_EARTH: f64 = 2.0 * PI * (1.0 / 365.2422 + 1.0) / 86400.0;

/// GMST at `GPS_2000`, in radians.
pub const GMST_2000: f64 = (6.0 + 39.0 / 60.0 + 51.251406103947375 / 3600.0) * PI / 12.0;

/// Dates on which GPS − UTC increased by one second.
const LEAP_SECONDS: [(i32, u32, u32); 18] = [
    (1981, 7, 1),
    (1982, 7, 1),
    (1983, 7, 1),
    (1985, 7, 1),
    (1988, 1, 1),
    (1990, 1, 1),
    (1991, 1, 1),
    (1992, 7, 1),
    (1993, 7, 1),
    (1994, 7, 1),
    (1996, 1, 1),
    (1997, 7, 1),
    (1999, 1, 1),
    (2006, 1, 1),
    (2009, 1, 1),
    (2012, 7, 1),
    (2015, 7, 1),
    (2017, 1, 1),
];

/// Greenwich mean sidereal time at a GPS time, in `[0, 2π)`.
pub fn gps_time_to_gmst(gps_time: f64) -> f64 {
    (GMST_2000 + (gps_time - GPS_2000) * OMEGA_EARTH).rem_euclid(TAU)
}

/// Convert a UTC timestamp to GPS seconds.
pub fn gps_time_from_utc(utc: NaiveDateTime) -> f64 {
    let epoch = gps_epoch();
    let elapsed = utc.signed_duration_since(epoch);
    let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
    seconds + leap_seconds_before(utc) as f64
}

/// Convert GPS seconds back to a UTC timestamp (millisecond precision).
///
/// `None` when the time falls outside the range `NaiveDateTime` can represent.
pub fn utc_from_gps_time(gps_time: f64) -> Option<NaiveDateTime> {
    let elapsed = TimeDelta::try_milliseconds((gps_time * 1000.0).round() as i64)?;
    let naive = gps_epoch().checked_add_signed(elapsed)?;
    // Leap seconds are counted at their UTC dates, so step back until consistent.
    let mut utc = naive;
    for _ in 0..2 {
        utc = naive.checked_sub_signed(TimeDelta::seconds(leap_seconds_before(utc)))?;
    }
    Some(utc)
}

fn gps_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1980, 1, 6)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn leap_seconds_before(utc: NaiveDateTime) -> i64 {
    LEAP_SECONDS
        .iter()
        .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .filter(|date| utc.date() >= *date)
        .count() as i64
}
