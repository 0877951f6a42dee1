// src/physics/operations/mod.rs
//
// Structure-editing operations, implemented as inherent methods on `Structure`.
pub mod supercell;
