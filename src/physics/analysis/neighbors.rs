// src/physics/analysis/neighbors.rs

use crate::error::{CrystalError, Result};
use crate::model::structure::Structure;
use crate::utils::geometry;
use crate::utils::linalg::{self, Mat3};
use log::debug;
use serde::Serialize;

/// Default search radius (Å)
pub const DEFAULT_CUTOFF: f64 = 8.0;

/// Default distance tolerance for grouping neighbors into one shell (Å)
pub const DEFAULT_SHELL_TOLERANCE: f64 = 0.1;

/// A periodic image of some atom found near the query atom
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Neighbor {
    /// Global index of the atom this image belongs to
    pub index: usize,
    /// Fractional coordinate of the image
    pub image: [f64; 3],
    /// Cartesian distance to the query atom (Å)
    pub distance: f64,
}

/// Neighbor and coordination-shell search under periodic boundary conditions.
///
/// Construction wraps every atom into the unit cell once; the stored
/// structure keeps its original coordinate system.
#[derive(Clone, Debug)]
pub struct PeriodicNeighborFinder {
    structure: Structure,
    /// Wrapped fractional coordinates in global atom order
    fractional: Vec<[f64; 3]>,
    lattice: Mat3,
    /// Norms of the reciprocal lattice rows
    reciprocal_norms: [f64; 3],
}

impl PeriodicNeighborFinder {
    pub fn new(mut structure: Structure) -> Result<Self> {
        let original = structure.coord_system;

        // e.g. [-0.1, 0.3, 1.5] -> [0.9, 0.3, 0.5]
        structure.cart_to_direct()?;
        for group in &mut structure.groups {
            for row in &mut group.coords {
                *row = row.map(wrap_unit);
            }
        }
        let fractional = structure.direct_coords()?;
        structure.convert_to(original)?;

        let reciprocal_norms = structure.reciprocal_lattice()?.map(linalg::norm);
        let lattice = structure.lattice;

        debug!("Normalized {} atoms into the unit cell", fractional.len());

        Ok(Self {
            structure,
            fractional,
            lattice,
            reciprocal_norms,
        })
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn into_structure(self) -> Structure {
        self.structure
    }

    fn fractional_of(&self, atom: usize) -> Result<[f64; 3]> {
        self.fractional
            .get(atom)
            .copied()
            .ok_or(CrystalError::AtomIndex {
                index: atom,
                count: self.fractional.len(),
            })
    }

    /// Periodic images of `atom` (itself included) whose fractional
    /// coordinates fall inside `[xmin, xmax, ymin, ymax, zmin, zmax]`,
    /// widened to whole translations.
    ///
    /// Order is x outermost, z innermost.
    pub fn periodic_sites(&self, atom: usize, axis_range: [f64; 6]) -> Result<Vec<[f64; 3]>> {
        let x = self.fractional_of(atom)?;
        Ok(images_in_range(x, &axis_range))
    }

    /// Every periodic image closer than `cutoff` to `atom`, the atom itself
    /// included at distance zero.
    ///
    /// Results come in enumeration order (atom index, then image), not
    /// sorted by distance.
    pub fn neighbors(&self, atom: usize, cutoff: f64) -> Result<Vec<Neighbor>> {
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(CrystalError::Validation(format!(
                "cutoff must be a positive distance, got {}",
                cutoff
            )));
        }
        let x = self.fractional_of(atom)?;

        // Fractional reach of a sphere of radius `cutoff` along each axis
        let reach = self.reciprocal_norms.map(|n| n * cutoff);
        let axis_range = [
            x[0] - reach[0],
            x[0] + reach[0],
            x[1] - reach[1],
            x[1] + reach[1],
            x[2] - reach[2],
            x[2] + reach[2],
        ];

        let mut found = Vec::new();
        for (index, &site) in self.fractional.iter().enumerate() {
            for image in images_in_range(site, &axis_range) {
                let displacement = linalg::frac_to_cart(geometry::sub(image, x), &self.lattice);
                let distance = linalg::norm(displacement);
                if distance < cutoff {
                    found.push(Neighbor {
                        index,
                        image,
                        distance,
                    });
                }
            }
        }

        debug!(
            "Atom {}: {} periodic neighbors within {:.3} Å",
            atom,
            found.len(),
            cutoff
        );
        Ok(found)
    }

    /// The `shell`-th neighbor shell (1-based) of `atom`.
    ///
    /// Neighbors are sorted by distance and the first entry, the atom itself
    /// at zero distance, is skipped. A shell then starts at the first
    /// unconsumed neighbor and absorbs every following neighbor closer than
    /// its starting distance plus `tol`.
    ///
    /// A shell that is not followed by at least one farther neighbor inside
    /// `cutoff` cannot be told complete, so it fails with
    /// [`CrystalError::ShellOutOfRange`]; call again with a larger cutoff.
    pub fn neighbors_shell(
        &self,
        atom: usize,
        shell: usize,
        cutoff: f64,
        tol: f64,
    ) -> Result<Vec<Neighbor>> {
        if !tol.is_finite() || tol < 0.0 {
            return Err(CrystalError::Validation(format!(
                "shell tolerance must be non-negative, got {}",
                tol
            )));
        }
        let out_of_range = || CrystalError::ShellOutOfRange { shell, cutoff };
        if shell == 0 {
            return Err(out_of_range());
        }

        let mut sorted = self.neighbors(atom, cutoff)?;
        sorted.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        let mut start = 1;
        for _ in 1..shell {
            start = shell_end(&sorted, start, tol).ok_or_else(out_of_range)?;
        }
        let end = shell_end(&sorted, start, tol).ok_or_else(out_of_range)?;

        Ok(sorted[start..end].to_vec())
    }
}

/// One past the last neighbor of the shell starting at `start`, or `None`
/// if the sorted list runs out first.
fn shell_end(sorted: &[Neighbor], start: usize, tol: f64) -> Option<usize> {
    let bound = sorted.get(start)?.distance + tol;
    let mut cur = start + 1;
    while sorted.get(cur)?.distance < bound {
        cur += 1;
    }
    Some(cur)
}

fn images_in_range(x: [f64; 3], axis_range: &[f64; 6]) -> Vec<[f64; 3]> {
    let bounds: [(i64, i64); 3] = std::array::from_fn(|a| {
        let lo = (axis_range[2 * a] - x[a]).floor() as i64;
        let hi = (axis_range[2 * a + 1] - x[a]).floor() as i64 + 1;
        (lo, hi)
    });

    let mut sites = Vec::new();
    for i in bounds[0].0..bounds[0].1 {
        for j in bounds[1].0..bounds[1].1 {
            for k in bounds[2].0..bounds[2].1 {
                sites.push([x[0] + i as f64, x[1] + j as f64, x[2] + k as f64]);
            }
        }
    }
    sites
}

/// Reduces into [0, 1); tiny negatives would otherwise round up to 1.0
fn wrap_unit(v: f64) -> f64 {
    let w = v.rem_euclid(1.0);
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structure::{AtomGroup, CoordSystem};
    use crate::test_fixtures::{mgb2_cartesian, mgb2_direct, MGB2_LATTICE};
    use approx::assert_abs_diff_eq;

    const MG_B: f64 = 2.504411228536212;

    fn finder() -> PeriodicNeighborFinder {
        PeriodicNeighborFinder::new(mgb2_direct()).unwrap()
    }

    #[test]
    fn test_normalization() {
        let s = Structure::new(
            "wrap",
            MGB2_LATTICE,
            vec![AtomGroup::new(Some("Mg".into()), 2, vec![[-0.1, 0.3, 1.5], [-1e-17, 0.0, 2.0]])
                .unwrap()],
            CoordSystem::Direct,
        )
        .unwrap();
        let f = PeriodicNeighborFinder::new(s).unwrap();
        let c = &f.structure().groups[0].coords;
        assert_abs_diff_eq!(c[0][0], 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(c[0][1], 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(c[0][2], 0.5, epsilon = 1e-12);
        assert!(c[1].iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_normalization_keeps_coord_system() {
        let mut s = mgb2_cartesian();
        // 1.5 a along x wraps back to 0.5 a
        s.permute_atom_in_place(0, [1.5 * 3.07368015, 0.0, 0.0]).unwrap();
        let f = PeriodicNeighborFinder::new(s).unwrap();
        let s = f.into_structure();
        assert_eq!(s.coord_system, CoordSystem::Cartesian);
        assert_abs_diff_eq!(s.groups[0].coords[0][0], 1.536840075, epsilon = 1e-9);
        assert_abs_diff_eq!(s.groups[0].coords[0][1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_periodic_sites() {
        let sites = finder().periodic_sites(1, [-1.5, 1.0, -0.8, 1.0, 0.0, 1.6]).unwrap();
        // x: -3..=0, y: -2..=0, z: -1..=1
        assert_eq!(sites.len(), 36);

        let first = sites[0];
        assert_abs_diff_eq!(first[0], -7.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(first[1], -5.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(first[2], -0.5, epsilon = 1e-12);

        let s = sites[17];
        assert_abs_diff_eq!(s[0], -4.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s[1], 1.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s[2], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_neighbors_enumeration_order() {
        let neis = finder().neighbors(2, 3.0).unwrap();
        assert_eq!(neis.len(), 10);
        assert!(neis[..6].iter().all(|n| n.index == 0));
        assert!(neis[6..9].iter().all(|n| n.index == 1));
        assert_abs_diff_eq!(neis[5].distance, 2.504412, epsilon = 1e-5);

        let own = &neis[9];
        assert_eq!(own.index, 2);
        assert_eq!(own.distance, 0.0);
    }

    #[test]
    fn test_neighbors_within_cutoff() {
        let neis = finder().neighbors(0, 8.0).unwrap();
        assert!(neis.iter().all(|n| n.distance < 8.0));
        assert_eq!(neis.iter().filter(|n| n.distance == 0.0).count(), 1);
    }

    #[test]
    fn test_shells() {
        let f = finder();

        let first = f.neighbors_shell(2, 1, 8.0, 0.1).unwrap();
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|n| n.index == 1));
        assert_abs_diff_eq!(first[0].distance, 1.7745900620053092, epsilon = 1e-9);

        let second = f.neighbors_shell(2, 2, 8.0, 0.1).unwrap();
        assert_eq!(second.len(), 6);
        assert_abs_diff_eq!(second[0].distance, 2.50441, epsilon = 1e-5);
        assert!(second.iter().all(|n| n.index == 0));

        let third = f.neighbors_shell(2, 3, 8.0, 0.1).unwrap();
        assert_eq!(third.len(), 6);
        assert_abs_diff_eq!(third[0].distance, 3.07368015, epsilon = 1e-9);
    }

    #[test]
    fn test_equidistant_shell_order() {
        // Six in-plane B images at |a|; ties keep their enumeration order
        // unless the last bit of the distance separates them.
        let f = finder();
        let x = f.fractional_of(1).unwrap();
        let shell = f.neighbors_shell(1, 3, 8.0, 0.1).unwrap();
        let offsets: Vec<[i64; 3]> = shell
            .iter()
            .map(|n| std::array::from_fn(|a| (n.image[a] - x[a]).round() as i64))
            .collect();
        assert_eq!(
            offsets,
            vec![[1, 0, 0], [1, 1, 0], [-1, -1, 0], [-1, 0, 0], [0, -1, 0], [0, 1, 0]]
        );
        assert!(shell.iter().all(|n| n.index == 1));
        assert_eq!(shell[0].distance, shell[1].distance);
        assert!(shell[1].distance < shell[2].distance);
    }

    #[test]
    fn test_singular_lattice() {
        let s = Structure::new(
            "flat",
            [[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            vec![AtomGroup::new(Some("Mg".into()), 1, vec![[0.2, 0.2, 0.2]]).unwrap()],
            CoordSystem::Direct,
        )
        .unwrap();
        assert!(matches!(
            PeriodicNeighborFinder::new(s),
            Err(CrystalError::SingularLattice { .. })
        ));
    }

    #[test]
    fn test_mg_first_shell() {
        let shell = finder().neighbors_shell(0, 1, 8.0, 0.1).unwrap();
        assert_eq!(shell.len(), 12);
        for n in &shell {
            assert_ne!(n.index, 0);
            assert_abs_diff_eq!(n.distance, MG_B, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cartesian_input_gives_same_shells() {
        let f = PeriodicNeighborFinder::new(mgb2_cartesian()).unwrap();
        let shell = f.neighbors_shell(2, 2, 8.0, 0.1).unwrap();
        assert_eq!(shell.len(), 6);
        assert_abs_diff_eq!(shell[0].distance, MG_B, epsilon = 1e-9);
    }

    #[test]
    fn test_shell_determinism() {
        let f = finder();
        let a = f.neighbors_shell(1, 2, 6.0, 0.1).unwrap();
        let b = f.neighbors_shell(1, 2, 6.0, 0.1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cutoff_too_small() {
        let f = finder();
        // the Mg shell sits right at the end of the list
        let err = f.neighbors_shell(2, 2, 2.6, 0.1).unwrap_err();
        assert!(matches!(err, CrystalError::ShellOutOfRange { shell: 2, .. }));
        assert!(f.neighbors_shell(2, 3, 2.6, 0.1).is_err());
        assert_eq!(f.neighbors_shell(2, 1, 2.6, 0.1).unwrap().len(), 3);
    }

    #[test]
    fn test_bad_arguments() {
        let f = finder();
        assert!(matches!(
            f.neighbors(3, 8.0),
            Err(CrystalError::AtomIndex { index: 3, count: 3 })
        ));
        assert!(matches!(f.neighbors(0, 0.0), Err(CrystalError::Validation(_))));
        assert!(matches!(
            f.neighbors_shell(0, 0, 8.0, 0.1),
            Err(CrystalError::ShellOutOfRange { shell: 0, .. })
        ));
        assert!(f.periodic_sites(5, [0.0; 6]).is_err());
    }

    #[test]
    fn test_wrap_unit() {
        assert_eq!(wrap_unit(-1e-17), 0.0);
        assert_abs_diff_eq!(wrap_unit(-0.25), 0.75);
        assert_abs_diff_eq!(wrap_unit(2.5), 0.5);
    }
}
