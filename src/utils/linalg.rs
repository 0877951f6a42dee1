// src/utils/linalg.rs

use crate::error::{CrystalError, Result};
use nalgebra::Matrix3;

pub type Mat3 = [[f64; 3]; 3];

/// Lattices with |det| below this are treated as singular
pub const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Lattice rows [[ax, ay, az], [bx, by, bz], [cx, cy, cz]] as a row-major `Matrix3`
pub fn to_matrix(m: &Mat3) -> Matrix3<f64> {
  Matrix3::from_row_slice(&[
    m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
  ])
}

pub fn from_matrix(m: &Matrix3<f64>) -> Mat3 {
  [
    [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
    [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
    [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
  ]
}

pub fn determinant(m: &Mat3) -> f64 {
  to_matrix(m).determinant()
}

/// Inverse of a 3x3 matrix, failing on a (near-)singular input
pub fn checked_inverse(m: &Mat3) -> Result<Mat3> {
  let mat = to_matrix(m);
  let det = mat.determinant();
  if !det.is_finite() || det.abs() < SINGULAR_TOLERANCE {
    return Err(CrystalError::SingularLattice { det });
  }
  let inv = mat.try_inverse().ok_or(CrystalError::SingularLattice { det })?;
  Ok(from_matrix(&inv))
}

pub fn transpose(m: &Mat3) -> Mat3 {
  from_matrix(&to_matrix(m).transpose())
}

/// Row vector times matrix: `v · M`
///
/// With `M` the lattice this maps fractional to Cartesian coordinates,
/// with `M` the inverse lattice it maps Cartesian to fractional.
pub fn row_times(v: [f64; 3], m: &Mat3) -> [f64; 3] {
  [
    v[0] * m[0][0] + v[1] * m[1][0] + v[2] * m[2][0],
    v[0] * m[0][1] + v[1] * m[1][1] + v[2] * m[2][1],
    v[0] * m[0][2] + v[1] * m[1][2] + v[2] * m[2][2],
  ]
}

/// Convert fractional coordinates to Cartesian using lattice matrix
///
/// # Formula
/// ```text
/// Cartesian = Fractional × Lattice
/// ```
pub fn frac_to_cart(frac: [f64; 3], lattice: &Mat3) -> [f64; 3] {
  row_times(frac, lattice)
}

pub fn norm(v: [f64; 3]) -> f64 {
  (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
