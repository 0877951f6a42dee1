// src/physics/operations/supercell.rs

use crate::error::{CrystalError, Result};
use crate::model::structure::{CoordSystem, Structure};
use crate::utils::geometry;
use log::{debug, info};

impl Structure {
    /// Replicates the cell `p·q·r` times along a, b and c.
    ///
    /// Each group is expanded on its own: replicas are appended in nested
    /// order `i ∈ [0, p)` outermost, then `j`, then `k` innermost, so the
    /// original atoms stay first within their group. In direct mode the
    /// coordinates are rescaled into the enlarged cell.
    pub fn supercell_in_place(&mut self, multipliers: [usize; 3]) -> Result<()> {
        let [p, q, r] = multipliers;
        if p == 0 || q == 0 || r == 0 {
            return Err(CrystalError::Validation(format!(
                "supercell multipliers must be positive, got {}x{}x{}",
                p, q, r
            )));
        }

        let [vec_a, vec_b, vec_c] = self.lattice;
        let scale = [p as f64, q as f64, r as f64];
        let system = self.coord_system;

        for group in &mut self.groups {
            let original = std::mem::take(&mut group.coords);
            let mut replicated = Vec::with_capacity(original.len() * p * q * r);

            for i in 0..p {
                for j in 0..q {
                    for k in 0..r {
                        match system {
                            CoordSystem::Cartesian => {
                                let translation = geometry::add(
                                    geometry::add(
                                        geometry::scale(vec_a, i as f64),
                                        geometry::scale(vec_b, j as f64),
                                    ),
                                    geometry::scale(vec_c, k as f64),
                                );
                                replicated.extend(
                                    original.iter().map(|&c| geometry::add(c, translation)),
                                );
                            }
                            CoordSystem::Direct => {
                                let offset = [
                                    i as f64 / scale[0],
                                    j as f64 / scale[1],
                                    k as f64 / scale[2],
                                ];
                                replicated.extend(original.iter().map(|c| {
                                    [
                                        c[0] / scale[0] + offset[0],
                                        c[1] / scale[1] + offset[1],
                                        c[2] / scale[2] + offset[2],
                                    ]
                                }));
                            }
                        }
                    }
                }
            }
            group.coords = replicated;
        }

        self.lattice = [
            geometry::scale(vec_a, scale[0]),
            geometry::scale(vec_b, scale[1]),
            geometry::scale(vec_c, scale[2]),
        ];

        info!(
            "Built {}x{}x{} supercell with {} atoms",
            p,
            q,
            r,
            self.atom_count()
        );
        Ok(())
    }

    /// Copy-producing counterpart of [`Structure::supercell_in_place`]
    pub fn supercell(&self, multipliers: [usize; 3]) -> Result<Structure> {
        let mut s = self.clone();
        s.supercell_in_place(multipliers)?;
        Ok(s)
    }

    /// Adds `displacement` to the atom at global index `index`.
    pub fn permute_atom_in_place(&mut self, index: usize, displacement: [f64; 3]) -> Result<()> {
        let (g, local) = self.locate_atom(index)?;
        let row = &mut self.groups[g].coords[local];
        *row = geometry::add(*row, displacement);
        debug!("Displaced atom {} (group {}, #{}) by {:?}", index, g, local, displacement);
        Ok(())
    }

    /// Copy-producing counterpart of [`Structure::permute_atom_in_place`]
    pub fn permute_atom(&self, index: usize, displacement: [f64; 3]) -> Result<Structure> {
        let mut s = self.clone();
        s.permute_atom_in_place(index, displacement)?;
        Ok(s)
    }
}
