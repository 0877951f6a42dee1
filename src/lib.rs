//! Periodic crystal structure geometry.
//!
//! A [`Structure`] holds a lattice (rows are the translation vectors), ordered
//! species groups and the coordinate system their rows are written in. On top
//! of it the crate provides coordinate conversion, supercell replication,
//! single-atom displacement and periodic neighbor-shell search via
//! [`PeriodicNeighborFinder`].

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod physics;
pub mod utils;

#[cfg(test)]
mod test_fixtures;

pub use error::{CrystalError, ErrorKind, Result};
pub use model::{AtomGroup, CoordSystem, ElementLookup, LatticeConstants, PeriodicTable, Structure};
pub use physics::analysis::{Neighbor, PeriodicNeighborFinder};
