// src/test_fixtures.rs
//
// MgB2 (AlB2 type, P6/mmm): Mg at the origin, B at (2/3, 1/3, 1/2) and (1/3, 2/3, 1/2).

use crate::model::structure::{AtomGroup, CoordSystem, Structure};

pub const MGB2_LATTICE: [[f64; 3]; 3] = [
    [3.07368015, 0.0, 0.0],
    [-1.536840075, 2.661885093007964, 0.0],
    [0.0, 0.0, 3.534349],
];

pub const MGB2_POSCAR: &str = "\
MgB2 # hexagonal
1.0
   3.07368015   0.0000000000   0.0000000000
  -1.536840075  2.661885093007964   0.0000000000
   0.0000000000   0.0000000000   3.534349
Mg B
1 2
Cartesian
   0.0   0.0   0.0
   1.5368400749999998   0.8872950310026546   1.7671745
   0.0   1.7745900620053092   1.7671745
";

pub fn mgb2_cartesian() -> Structure {
    Structure::new(
        "MgB2",
        MGB2_LATTICE,
        vec![
            AtomGroup::new(Some("Mg".into()), 1, vec![[0.0, 0.0, 0.0]]).unwrap(),
            AtomGroup::new(
                Some("B".into()),
                2,
                vec![
                    [1.5368400749999998, 0.8872950310026546, 1.7671745],
                    [0.0, 1.7745900620053092, 1.7671745],
                ],
            )
            .unwrap(),
        ],
        CoordSystem::Cartesian,
    )
    .unwrap()
}

pub fn mgb2_direct() -> Structure {
    Structure::new(
        "MgB2",
        MGB2_LATTICE,
        vec![
            AtomGroup::new(Some("Mg".into()), 1, vec![[0.0, 0.0, 0.0]]).unwrap(),
            AtomGroup::new(
                Some("B".into()),
                2,
                vec![[2.0 / 3.0, 1.0 / 3.0, 0.5], [1.0 / 3.0, 2.0 / 3.0, 0.5]],
            )
            .unwrap(),
        ],
        CoordSystem::Direct,
    )
    .unwrap()
}
