// src/physics/analysis/mod.rs
pub mod neighbors;

pub use neighbors::{Neighbor, PeriodicNeighborFinder};
