//! Interferometric gravitational-wave detectors.
//!
//! - Earth-fixed geometry helpers (`geometry`)
//! - polarization tensors and light-travel delays (`response`)
//! - invalidation-driven caching of derived geometry (`cache`)
//! - the `Interferometer` itself (`interferometer`)
//! - built-in H1, L1, V1 and GEO600 (`known`)

pub mod cache;
pub mod geometry;
pub mod interferometer;
pub mod known;
pub mod response;

pub use cache::{Derived, GeometryInput};
pub use interferometer::*;
pub use known::*;
