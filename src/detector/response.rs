//! Polarization tensors, antenna patterns and light-travel delays.
//!
//! See Nishizawa et al. (2009), arXiv:0903.0528, for the polarization tensors.
//! `[u, v, w]` is the Earth-fixed frame at the source direction and `[m, n, ω]`
//! the wave frame rotated by the polarization angle. The wave-frame definition in
//! that paper carries a sign typo; the vectors below are the corrected ones.

use nalgebra::{Matrix3, Vector3};

use crate::domain::PolarizationMode;
use crate::math::{contract, gps_time_to_gmst, outer, symmetric_outer};

/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Wave-frame polarization tensor for a source at `(ra, dec)` seen at GPS `time`.
pub fn polarization_tensor(ra: f64, dec: f64, time: f64, psi: f64, mode: PolarizationMode) -> Matrix3<f64> {
    let gmst = gps_time_to_gmst(time);
    let phi = ra - gmst;
    let theta = std::f64::consts::FRAC_PI_2 - dec;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_psi, cos_psi) = psi.sin_cos();

    let u = Vector3::new(cos_phi * cos_theta, cos_theta * sin_phi, -sin_theta);
    let v = Vector3::new(-sin_phi, cos_phi, 0.0);
    let m = -u * sin_psi - v * cos_psi;
    let n = -u * cos_psi + v * sin_psi;

    match mode {
        PolarizationMode::Plus => outer(&m, &m) - outer(&n, &n),
        PolarizationMode::Cross => symmetric_outer(&m, &n),
        PolarizationMode::Breathing => outer(&m, &m) + outer(&n, &n),
        PolarizationMode::Longitudinal => {
            let omega = m.cross(&n);
            outer(&omega, &omega)
        }
        PolarizationMode::X => symmetric_outer(&m, &m.cross(&n)),
        PolarizationMode::Y => symmetric_outer(&n, &m.cross(&n)),
    }
}

/// Antenna pattern `D : e_mode` for a given detector tensor.
///
/// This is a pure function of the tensor, so it can be evaluated in parallel once
/// the tensor has been read from an `Interferometer`.
pub fn antenna_response_for_tensor(
    detector_tensor: &Matrix3<f64>,
    ra: f64,
    dec: f64,
    time: f64,
    psi: f64,
    mode: PolarizationMode,
) -> f64 {
    contract(detector_tensor, &polarization_tensor(ra, dec, time, psi, mode))
}

/// Unit vector from the geocenter towards a source at `(ra, dec)` at GPS `time`.
pub fn source_direction(ra: f64, dec: f64, time: f64) -> Vector3<f64> {
    let phi = ra - gps_time_to_gmst(time);
    let theta = std::f64::consts::FRAC_PI_2 - dec;
    Vector3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos())
}

/// Plane-wave arrival time at `detector2` minus arrival time at `detector1`.
pub fn time_delay_geocentric(
    detector1: &Vector3<f64>,
    detector2: &Vector3<f64>,
    ra: f64,
    dec: f64,
    time: f64,
) -> f64 {
    let omega = source_direction(ra, dec, time);
    omega.dot(&(detector2 - detector1)) / SPEED_OF_LIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const T0: f64 = 1_126_259_462.0;

    #[test]
    fn plus_and_cross_are_traceless_and_orthogonal() {
        for &(ra, dec, psi) in &[(0.3, -0.4, 0.2), (4.0, 1.1, 2.5), (1.0, 0.0, 0.0)] {
            let plus = polarization_tensor(ra, dec, T0, psi, PolarizationMode::Plus);
            let cross = polarization_tensor(ra, dec, T0, psi, PolarizationMode::Cross);
            assert_relative_eq!(plus.trace(), 0.0, epsilon = 1e-12);
            assert_relative_eq!(cross.trace(), 0.0, epsilon = 1e-12);
            assert_relative_eq!(contract(&plus, &cross), 0.0, epsilon = 1e-12);
            assert_relative_eq!(contract(&plus, &plus), 2.0, epsilon = 1e-12);
            assert_relative_eq!(plus, plus.transpose(), epsilon = 1e-15);
        }
    }

    #[test]
    fn polarization_tensors_are_transverse() {
        let (ra, dec, psi) = (2.2, 0.7, 1.3);
        let k = source_direction(ra, dec, T0);
        for mode in [
            PolarizationMode::Plus,
            PolarizationMode::Cross,
            PolarizationMode::Breathing,
        ] {
            let e = polarization_tensor(ra, dec, T0, psi, mode);
            assert_relative_eq!((e * k).norm(), 0.0, epsilon = 1e-12);
        }
        let longitudinal = polarization_tensor(ra, dec, T0, psi, PolarizationMode::Longitudinal);
        assert_relative_eq!((longitudinal * k).norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn delay_between_identical_points_is_zero() {
        let p = Vector3::new(1.0e6, -2.0e6, 3.0e6);
        assert_eq!(time_delay_geocentric(&p, &p, 1.0, 0.2, T0), 0.0);
    }

    #[test]
    fn delay_is_antisymmetric() {
        let a = Vector3::new(-2.16e6, -3.83e6, 4.60e6);
        let b = Vector3::new(-7.4e4, -5.50e6, 3.21e6);
        let ab = time_delay_geocentric(&a, &b, 0.9, -0.3, T0);
        let ba = time_delay_geocentric(&b, &a, 0.9, -0.3, T0);
        assert_relative_eq!(ab, -ba, epsilon = 1e-18);
        assert!(ab.abs() <= (b - a).norm() / SPEED_OF_LIGHT + 1e-15);
    }
}
