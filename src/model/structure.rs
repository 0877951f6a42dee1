// src/model/structure.rs

use crate::error::{CrystalError, Result};
use crate::model::elements::ElementLookup;
use crate::utils::geometry;
use crate::utils::linalg::{self, Mat3};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Avogadro constant (1/mol)
pub const AVOGADRO: f64 = 6.02214076e23;

/// Å³ -> cm³
const ANGSTROM3_TO_CM3: f64 = 1e-24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordSystem {
    /// Fractional coordinates along the lattice vectors
    Direct,
    Cartesian,
}

impl fmt::Display for CoordSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoordSystem::Direct => write!(f, "Direct"),
            CoordSystem::Cartesian => write!(f, "Cartesian"),
        }
    }
}

/// One species block: every atom of a given element, in file order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtomGroup {
    /// Element symbol; `None` when the source did not name the species
    pub element: Option<String>,
    /// Rows in the coordinate system of the owning `Structure`
    pub coords: Vec<[f64; 3]>,
}

impl AtomGroup {
    /// Builds a group, checking that the declared count matches the rows.
    pub fn new(element: Option<String>, count: usize, coords: Vec<[f64; 3]>) -> Result<Self> {
        if coords.len() != count {
            return Err(CrystalError::Validation(format!(
                "atom group {} declares {} atoms but has {} coordinate rows",
                element.as_deref().unwrap_or("<unset>"),
                count,
                coords.len()
            )));
        }
        Ok(Self { element, coords })
    }

    pub fn count(&self) -> usize {
        self.coords.len()
    }
}

/// Flat per-atom view, see [`Structure::atoms_flat`]
#[derive(Clone, Debug, PartialEq)]
pub struct SiteView<'a> {
    pub element: Option<&'a str>,
    pub coord: [f64; 3],
}

/// Lattice parameters; angles in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatticeConstants {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl fmt::Display for LatticeConstants {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "a = {:.6} Å, b = {:.6} Å, c = {:.6} Å, α = {:.4}°, β = {:.4}°, γ = {:.4}°",
            self.a, self.b, self.c, self.alpha, self.beta, self.gamma
        )
    }
}

/// A periodic structure: lattice rows plus ordered species groups that all
/// share one coordinate system.
///
/// Global atom indices run over the groups in order: group 0's atoms first,
/// then group 1's, and so on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub comment: String,
    // Lattice vectors: [a_vec, b_vec, c_vec]
    pub lattice: Mat3,
    pub coord_system: CoordSystem,
    pub groups: Vec<AtomGroup>,
}

impl Structure {
    pub fn new(
        comment: impl Into<String>,
        lattice: Mat3,
        groups: Vec<AtomGroup>,
        coord_system: CoordSystem,
    ) -> Result<Self> {
        if lattice.iter().flatten().any(|v| !v.is_finite()) {
            return Err(CrystalError::Validation("lattice contains non-finite values".into()));
        }
        for (i, group) in groups.iter().enumerate() {
            if group.coords.iter().flatten().any(|v| !v.is_finite()) {
                return Err(CrystalError::Validation(format!(
                    "atom group {} contains non-finite coordinates",
                    i
                )));
            }
        }
        Ok(Self {
            comment: comment.into(),
            lattice,
            coord_system,
            groups,
        })
    }

    // --- Views ---

    /// Element symbols per group, in group order
    pub fn elements(&self) -> Vec<Option<&str>> {
        self.groups.iter().map(|g| g.element.as_deref()).collect()
    }

    pub fn atom_count(&self) -> usize {
        self.groups.iter().map(AtomGroup::count).sum()
    }

    /// One entry per atom in global index order, coordinates as stored
    pub fn atoms_flat(&self) -> Vec<SiteView<'_>> {
        self.groups
            .iter()
            .flat_map(|g| {
                g.coords.iter().map(move |&coord| SiteView {
                    element: g.element.as_deref(),
                    coord,
                })
            })
            .collect()
    }

    /// Resolves a global atom index into (group, index within group)
    pub fn locate_atom(&self, index: usize) -> Result<(usize, usize)> {
        let mut remaining = index;
        for (g, group) in self.groups.iter().enumerate() {
            if remaining < group.count() {
                return Ok((g, remaining));
            }
            remaining -= group.count();
        }
        Err(CrystalError::AtomIndex {
            index,
            count: self.atom_count(),
        })
    }

    // --- Coordinate systems ---

    pub fn direct_to_cart(&mut self) -> Result<()> {
        if self.coord_system == CoordSystem::Cartesian {
            return Ok(());
        }
        linalg::checked_inverse(&self.lattice)?;
        let lattice = self.lattice;
        for group in &mut self.groups {
            for row in &mut group.coords {
                *row = linalg::frac_to_cart(*row, &lattice);
            }
        }
        self.coord_system = CoordSystem::Cartesian;
        debug!("Converted {} atoms to Cartesian", self.atom_count());
        Ok(())
    }

    pub fn cart_to_direct(&mut self) -> Result<()> {
        if self.coord_system == CoordSystem::Direct {
            return Ok(());
        }
        let inv = linalg::checked_inverse(&self.lattice)?;
        for group in &mut self.groups {
            for row in &mut group.coords {
                *row = linalg::row_times(*row, &inv);
            }
        }
        self.coord_system = CoordSystem::Direct;
        debug!("Converted {} atoms to Direct", self.atom_count());
        Ok(())
    }

    /// Switches to `target`, a no-op when already there
    pub fn convert_to(&mut self, target: CoordSystem) -> Result<()> {
        match target {
            CoordSystem::Direct => self.cart_to_direct(),
            CoordSystem::Cartesian => self.direct_to_cart(),
        }
    }

    fn stacked_coords(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.groups.iter().flat_map(|g| g.coords.iter().copied())
    }

    /// All atoms in Cartesian coordinates, without touching stored state
    pub fn cartesian_coords(&self) -> Result<Vec<[f64; 3]>> {
        match self.coord_system {
            CoordSystem::Cartesian => Ok(self.stacked_coords().collect()),
            CoordSystem::Direct => {
                linalg::checked_inverse(&self.lattice)?;
                Ok(self
                    .stacked_coords()
                    .map(|f| linalg::frac_to_cart(f, &self.lattice))
                    .collect())
            }
        }
    }

    /// All atoms in fractional coordinates, without touching stored state
    pub fn direct_coords(&self) -> Result<Vec<[f64; 3]>> {
        match self.coord_system {
            CoordSystem::Direct => Ok(self.stacked_coords().collect()),
            CoordSystem::Cartesian => {
                let inv = linalg::checked_inverse(&self.lattice)?;
                Ok(self.stacked_coords().map(|c| linalg::row_times(c, &inv)).collect())
            }
        }
    }

    // --- Lattice quantities ---

    /// Transpose of the inverse lattice (no 2π factor)
    pub fn reciprocal_lattice(&self) -> Result<Mat3> {
        let inv = linalg::checked_inverse(&self.lattice)?;
        Ok(linalg::transpose(&inv))
    }

    pub fn lattice_constants(&self) -> LatticeConstants {
        let [a_vec, b_vec, c_vec] = self.lattice;
        LatticeConstants {
            a: linalg::norm(a_vec),
            b: linalg::norm(b_vec),
            c: linalg::norm(c_vec),
            alpha: geometry::vector_angle(b_vec, c_vec),
            beta: geometry::vector_angle(c_vec, a_vec),
            gamma: geometry::vector_angle(a_vec, b_vec),
        }
    }

    /// Cell volume in Å³
    pub fn volume(&self) -> f64 {
        linalg::determinant(&self.lattice).abs()
    }

    // --- Mass-weighted quantities ---

    fn group_masses(&self, elements: &impl ElementLookup) -> Result<Vec<f64>> {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| match g.element.as_deref() {
                Some(symbol) => elements.atomic_mass(symbol),
                None => Err(CrystalError::UnsetElement { group: i }),
            })
            .collect()
    }

    /// Molar mass of one cell (g/mol)
    pub fn molar_mass(&self, elements: &impl ElementLookup) -> Result<f64> {
        let masses = self.group_masses(elements)?;
        Ok(self
            .groups
            .iter()
            .zip(&masses)
            .map(|(g, m)| m * g.count() as f64)
            .sum())
    }

    /// Mass density (g/cm³)
    pub fn density(&self, elements: &impl ElementLookup) -> Result<f64> {
        linalg::checked_inverse(&self.lattice)?;
        let grams = self.molar_mass(elements)? / AVOGADRO;
        Ok(grams / (self.volume() * ANGSTROM3_TO_CM3))
    }

    /// Mass-weighted centroid, in the stored coordinate system
    pub fn mass_center(&self, elements: &impl ElementLookup) -> Result<[f64; 3]> {
        let masses = self.group_masses(elements)?;
        let total: f64 = self
            .groups
            .iter()
            .zip(&masses)
            .map(|(g, m)| m * g.count() as f64)
            .sum();
        if total == 0.0 {
            return Err(CrystalError::Validation("structure contains no atoms".into()));
        }

        let mut weighted = [0.0; 3];
        for (group, &mass) in self.groups.iter().zip(&masses) {
            let sum = group.coords.iter().fold([0.0; 3], |acc, &c| geometry::add(acc, c));
            weighted = geometry::add(weighted, geometry::scale(sum, mass));
        }
        Ok(geometry::scale(weighted, 1.0 / total))
    }
}
