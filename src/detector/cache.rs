//! Lazily recomputed geometry with table-driven invalidation.
//!
//! Each derived quantity declares what it depends on in `DEPENDENCIES`. Writing a
//! geometry input clears every derived quantity that depends on it, directly or
//! through another derived quantity. A cleared slot is recomputed on its next read
//! and only then marked clean again.

use std::cell::Cell;

use nalgebra::{Matrix3, Vector3};

use crate::domain::Arm;

/// Stored geometry attributes of an interferometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryInput {
    Latitude,
    Longitude,
    Elevation,
    XarmAzimuth,
    YarmAzimuth,
    XarmTilt,
    YarmTilt,
}

/// Quantities derived from the geometry and cached between reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Derived {
    Vertex,
    X,
    Y,
    DetectorTensor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dependency {
    Input(GeometryInput),
    Derived(Derived),
}

use Dependency::{Derived as D, Input as I};
use GeometryInput::*;

const DEPENDENCIES: &[(Derived, &[Dependency])] = &[
    (Derived::Vertex, &[I(Latitude), I(Longitude), I(Elevation)]),
    (Derived::X, &[I(Latitude), I(Longitude), I(XarmAzimuth), I(XarmTilt)]),
    (Derived::Y, &[I(Latitude), I(Longitude), I(YarmAzimuth), I(YarmTilt)]),
    (Derived::DetectorTensor, &[D(Derived::X), D(Derived::Y)]),
];

/// Cached derived geometry. `None` means dirty.
#[derive(Debug, Clone, Default)]
pub struct GeometryCache {
    vertex: Cell<Option<Vector3<f64>>>,
    x: Cell<Option<Vector3<f64>>>,
    y: Cell<Option<Vector3<f64>>>,
    detector_tensor: Cell<Option<Matrix3<f64>>>,
}

impl GeometryCache {
    /// Mark everything that depends on `input` as dirty.
    pub fn invalidate(&self, input: GeometryInput) {
        self.invalidate_dependents(I(input));
    }

    pub fn is_clean(&self, derived: Derived) -> bool {
        match derived {
            Derived::Vertex => self.vertex.get().is_some(),
            Derived::X => self.x.get().is_some(),
            Derived::Y => self.y.get().is_some(),
            Derived::DetectorTensor => self.detector_tensor.get().is_some(),
        }
    }

    pub fn vertex(&self, compute: impl FnOnce() -> Vector3<f64>) -> Vector3<f64> {
        self.cached_vector(Derived::Vertex, &self.vertex, compute)
    }

    /// Return the cached arm vector, computing it first if dirty.
    ///
    /// Recomputing an arm vector also dirties everything built from it.
    pub fn arm(&self, arm: Arm, compute: impl FnOnce() -> Vector3<f64>) -> Vector3<f64> {
        match arm {
            Arm::X => self.cached_vector(Derived::X, &self.x, compute),
            Arm::Y => self.cached_vector(Derived::Y, &self.y, compute),
        }
    }

    pub fn tensor(&self, compute: impl FnOnce() -> Matrix3<f64>) -> Matrix3<f64> {
        if let Some(value) = self.detector_tensor.get() {
            return value;
        }
        log::debug!("recomputing {:?}", Derived::DetectorTensor);
        let value = compute();
        self.detector_tensor.set(Some(value));
        value
    }

    fn cached_vector(
        &self,
        derived: Derived,
        slot: &Cell<Option<Vector3<f64>>>,
        compute: impl FnOnce() -> Vector3<f64>,
    ) -> Vector3<f64> {
        if let Some(value) = slot.get() {
            return value;
        }
        log::debug!("recomputing {derived:?}");
        let value = compute();
        slot.set(Some(value));
        self.invalidate_dependents(D(derived));
        value
    }

    fn clear(&self, derived: Derived) {
        match derived {
            Derived::Vertex => self.vertex.set(None),
            Derived::X => self.x.set(None),
            Derived::Y => self.y.set(None),
            Derived::DetectorTensor => self.detector_tensor.set(None),
        }
    }

    fn invalidate_dependents(&self, changed: Dependency) {
        for &(derived, deps) in DEPENDENCIES {
            if deps.contains(&changed) {
                self.clear(derived);
                self.invalidate_dependents(D(derived));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warm() -> GeometryCache {
        let cache = GeometryCache::default();
        cache.vertex(|| Vector3::zeros());
        cache.arm(Arm::X, || Vector3::x());
        cache.arm(Arm::Y, || Vector3::y());
        cache.tensor(|| Matrix3::identity());
        cache
    }

    fn clean_set(cache: &GeometryCache) -> [bool; 4] {
        [
            cache.is_clean(Derived::Vertex),
            cache.is_clean(Derived::X),
            cache.is_clean(Derived::Y),
            cache.is_clean(Derived::DetectorTensor),
        ]
    }

    #[test]
    fn starts_dirty() {
        assert_eq!(clean_set(&GeometryCache::default()), [false; 4]);
    }

    #[test]
    fn recomputing_an_arm_dirties_the_tensor() {
        let cache = warm();
        assert_eq!(clean_set(&cache), [true; 4]);
        cache.clear(Derived::X);
        cache.arm(Arm::X, || Vector3::x());
        assert_eq!(clean_set(&cache), [true, true, true, false]);
    }

    #[test]
    fn invalidation_follows_the_table() {
        let cases = [
            (Latitude, [false, false, false, false]),
            (Longitude, [false, false, false, false]),
            (Elevation, [false, true, true, true]),
            (XarmAzimuth, [true, false, true, false]),
            (XarmTilt, [true, false, true, false]),
            (YarmAzimuth, [true, true, false, false]),
            (YarmTilt, [true, true, false, false]),
        ];
        for (input, expected) in cases {
            let cache = warm();
            cache.invalidate(input);
            assert_eq!(clean_set(&cache), expected, "after writing {input:?}");
        }
    }

    #[test]
    fn clean_reads_do_not_recompute() {
        let cache = warm();
        let mut calls = 0;
        let v = cache.vertex(|| {
            calls += 1;
            Vector3::repeat(1.0)
        });
        assert_eq!(calls, 0);
        assert_eq!(v, Vector3::zeros());
    }
}
