// src/utils/report.rs

use crate::model::{ElementLookup, Structure};
use crate::physics::analysis::neighbors::Neighbor;

/// Formula in group order, e.g. "Mg1 B2"
pub fn formula(structure: &Structure) -> String {
    structure
        .groups
        .iter()
        .map(|g| format!("{}{}", g.element.as_deref().unwrap_or("X"), g.count()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text summary printed by `crystgeom info`
pub fn structure_summary(
    structure: &Structure,
    filename: &str,
    elements: &impl ElementLookup,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("File: {}\n", filename));
    out.push_str(&format!("Comment: {}\n", structure.comment));
    out.push_str(&format!("Formula: {}\n", formula(structure)));
    out.push_str(&format!("Lattice: {}\n", structure.lattice_constants()));
    out.push_str(&format!("Volume: {:.6} Å³\n", structure.volume()));

    match structure.molar_mass(elements) {
        Ok(m) => out.push_str(&format!("Molar mass: {:.4} g/mol\n", m)),
        Err(e) => out.push_str(&format!("Molar mass: n/a ({})\n", e)),
    }
    if let Ok(d) = structure.density(elements) {
        out.push_str(&format!("Density: {:.6} g/cm³\n", d));
    }
    if let Ok(c) = structure.mass_center(elements) {
        out.push_str(&format!(
            "Mass center ({}): {:.6} {:.6} {:.6}\n",
            structure.coord_system, c[0], c[1], c[2]
        ));
    }

    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!(
        "{:<8} {:<8} {:<10} {:<10} {:<10}\n",
        "Index", "Element", "X", "Y", "Z"
    ));
    out.push_str("--------------------------------------------------\n");

    let atoms = structure.atoms_flat();
    for (i, atom) in atoms.iter().take(20).enumerate() {
        out.push_str(&format!(
            "{:<8} {:<8} {:<10.4} {:<10.4} {:<10.4}\n",
            i,
            atom.element.unwrap_or("X"),
            atom.coord[0],
            atom.coord[1],
            atom.coord[2]
        ));
    }

    if atoms.len() > 20 {
        out.push_str(&format!("... and {} more atoms.\n", atoms.len() - 20));
    }

    out
}

/// Tabulates neighbors as returned by the neighbor finder
pub fn neighbor_table(structure: &Structure, neighbors: &[Neighbor]) -> String {
    let atoms = structure.atoms_flat();
    let mut out = format!(
        "{:<6} {:<8} {:>12} {:>12} {:>12} {:>12}\n",
        "Atom", "Element", "a", "b", "c", "Dist (Å)"
    );
    for n in neighbors {
        let element = atoms.get(n.index).and_then(|a| a.element).unwrap_or("X");
        out.push_str(&format!(
            "{:<6} {:<8} {:>12.6} {:>12.6} {:>12.6} {:>12.6}\n",
            n.index, element, n.image[0], n.image[1], n.image[2], n.distance
        ));
    }
    out
}
