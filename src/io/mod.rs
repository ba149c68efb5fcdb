//! Input/output helpers.
//!
//! - numeric curve tables and the reference-curve library (`curve`)
//! - detector JSON read/write (`detector`)
//! - CSV exports of data and sky maps (`export`)

pub mod curve;
pub mod detector;
pub mod export;

pub use curve::*;
pub use detector::*;
pub use export::*;
