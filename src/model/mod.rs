//src/model/mod.rs
pub mod elements;
pub mod structure;

// Re-exports for cleaner imports
pub use elements::{Element, ElementLookup, PeriodicTable};
pub use structure::{AtomGroup, CoordSystem, LatticeConstants, SiteView, Structure};
