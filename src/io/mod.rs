// src/io/mod.rs
pub mod poscar;

use crate::error::Result;
use crate::model::Structure;
use log::info;
use std::path::Path;

/// Reads a structure file (POSCAR/CONTCAR layout)
pub fn load_structure(path: impl AsRef<Path>) -> Result<Structure> {
    let path = path.as_ref();
    let structure = poscar::parse(path)?;
    info!(
        "Loaded {} atoms in {} groups from {}",
        structure.atom_count(),
        structure.groups.len(),
        path.display()
    );
    Ok(structure)
}

pub fn save_structure(path: impl AsRef<Path>, structure: &Structure) -> Result<()> {
    let path = path.as_ref();
    poscar::write(path, structure)?;
    info!("Wrote {} atoms to {}", structure.atom_count(), path.display());
    Ok(())
}
