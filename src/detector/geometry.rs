//! Earth-fixed detector geometry.
//!
//! Conventions follow gr-qc/0008066 (Appendix B) for the local frame and arm
//! directions, and LIGO-T980044-10 (Section 2.1) for the ellipsoidal radius of
//! curvature. Note that Eq. B11 of gr-qc/0008066 misprints the local radius; the
//! expression below is the correct prime-vertical radius.
//!
//! All angles here are in radians.

use nalgebra::{Matrix3, Vector3};

use crate::math::outer;

/// WGS84 semi-major axis in metres.
pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 semi-minor axis in metres.
pub const SEMI_MINOR_AXIS: f64 = 6_356_752.314;

/// Local East / North / Up basis at a geodetic latitude and longitude.
#[derive(Debug, Clone, Copy)]
pub struct LocalFrame {
    pub east: Vector3<f64>,
    pub north: Vector3<f64>,
    pub up: Vector3<f64>,
}

impl LocalFrame {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let (sin_lon, cos_lon) = longitude.sin_cos();
        Self {
            east: Vector3::new(-sin_lon, cos_lon, 0.0),
            north: Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat),
            up: Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat),
        }
    }

    /// Unit vector at `azimuth` (North of East), tilted `tilt` above the horizontal.
    pub fn direction(&self, azimuth: f64, tilt: f64) -> Vector3<f64> {
        let (sin_az, cos_az) = azimuth.sin_cos();
        let (sin_tilt, cos_tilt) = tilt.sin_cos();
        cos_tilt * (cos_az * self.east + sin_az * self.north) + sin_tilt * self.up
    }
}

/// Geocentric Cartesian position of a point on the WGS84 ellipsoid.
pub fn vertex_position_geocentric(latitude: f64, longitude: f64, elevation: f64) -> Vector3<f64> {
    let a2 = SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS;
    let b2 = SEMI_MINOR_AXIS * SEMI_MINOR_AXIS;
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();

    let radius = a2 / (a2 * cos_lat * cos_lat + b2 * sin_lat * sin_lat).sqrt();

    Vector3::new(
        (radius + elevation) * cos_lat * cos_lon,
        (radius + elevation) * cos_lat * sin_lon,
        ((b2 / a2) * radius + elevation) * sin_lat,
    )
}

/// Quadrupolar detector response tensor `D = ½(x⊗x − y⊗y)`.
pub fn detector_tensor(x: &Vector3<f64>, y: &Vector3<f64>) -> Matrix3<f64> {
    0.5 * (outer(x, x) - outer(y, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn local_frame_is_orthonormal() {
        for &(lat, lon) in &[(0.0, 0.0), (0.8, -2.1), (-1.2, 3.0), (FRAC_PI_2, 0.4)] {
            let f = LocalFrame::at(lat, lon);
            assert_relative_eq!(f.east.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(f.north.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(f.up.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(f.east.dot(&f.north), 0.0, epsilon = 1e-12);
            assert_relative_eq!(f.east.dot(&f.up), 0.0, epsilon = 1e-12);
            // Right-handed: east × north = up.
            assert_relative_eq!(f.east.cross(&f.north), f.up, epsilon = 1e-12);
        }
    }

    #[test]
    fn vertex_on_equator_and_pole() {
        let equator = vertex_position_geocentric(0.0, 0.0, 0.0);
        assert_relative_eq!(equator, Vector3::new(SEMI_MAJOR_AXIS, 0.0, 0.0), epsilon = 1e-6);

        let pole = vertex_position_geocentric(FRAC_PI_2, 0.0, 100.0);
        assert_relative_eq!(pole.z, SEMI_MINOR_AXIS + 100.0, epsilon = 1e-6);
        assert!(pole.x.abs() < 1e-6);
    }

    #[test]
    fn vertex_lies_on_ellipsoid() {
        let lat: f64 = 0.81;
        let v = vertex_position_geocentric(lat, -2.08, 0.0);
        let rho2 = v.x * v.x + v.y * v.y;
        let lhs = rho2 / (SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS) + v.z * v.z / (SEMI_MINOR_AXIS * SEMI_MINOR_AXIS);
        assert_relative_eq!(lhs, 1.0, epsilon = 1e-12);
    }
}
