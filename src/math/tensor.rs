//! Small rank-2 tensor helpers on top of `nalgebra`.

use nalgebra::{Matrix3, Vector3};

/// Outer product `a ⊗ b`.
pub fn outer(a: &Vector3<f64>, b: &Vector3<f64>) -> Matrix3<f64> {
    a * b.transpose()
}

/// Symmetrized outer product `a ⊗ b + b ⊗ a`.
pub fn symmetric_outer(a: &Vector3<f64>, b: &Vector3<f64>) -> Matrix3<f64> {
    outer(a, b) + outer(b, a)
}

/// Full contraction `Σ_ij A_ij B_ij`.
pub fn contract(a: &Matrix3<f64>, b: &Matrix3<f64>) -> f64 {
    a.component_mul(b).sum()
}
