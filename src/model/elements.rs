// src/model/elements.rs

use crate::error::{CrystalError, Result};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Static properties of one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub number: u32,
    pub symbol: &'static str,
    pub name: &'static str,
    /// Standard atomic weight (g/mol)
    pub atomic_mass: f64,
}

/// Anything that can resolve an element symbol to an atomic mass.
///
/// Mass-weighted structure quantities take this instead of reaching for a
/// global table, so callers can substitute isotope-specific masses.
pub trait ElementLookup {
    fn atomic_mass(&self, symbol: &str) -> Result<f64>;
}

/// Immutable periodic table (Z = 1..=103), built once per process.
pub struct PeriodicTable {
    by_symbol: HashMap<&'static str, usize>,
}

static TABLE: OnceLock<PeriodicTable> = OnceLock::new();

impl PeriodicTable {
    /// Shared instance, initialized on first access
    pub fn global() -> &'static PeriodicTable {
        TABLE.get_or_init(|| {
            let by_symbol = ELEMENTS
                .iter()
                .enumerate()
                .map(|(i, e)| (e.symbol, i))
                .collect();
            PeriodicTable { by_symbol }
        })
    }

    pub fn element(&self, symbol: &str) -> Result<&'static Element> {
        self.by_symbol
            .get(symbol.trim())
            .map(|&i| &ELEMENTS[i])
            .ok_or_else(|| CrystalError::UnknownElement(symbol.to_string()))
    }

    pub fn by_number(&self, z: u32) -> Result<&'static Element> {
        if z == 0 {
            return Err(CrystalError::UnknownElement(format!("Z={}", z)));
        }
        ELEMENTS
            .get(z as usize - 1)
            .ok_or_else(|| CrystalError::UnknownElement(format!("Z={}", z)))
    }

    pub fn atomic_number(&self, symbol: &str) -> Result<u32> {
        Ok(self.element(symbol)?.number)
    }

    pub fn len(&self) -> usize {
        ELEMENTS.len()
    }

    pub fn is_empty(&self) -> bool {
        ELEMENTS.is_empty()
    }
}

impl ElementLookup for PeriodicTable {
    fn atomic_mass(&self, symbol: &str) -> Result<f64> {
        Ok(self.element(symbol)?.atomic_mass)
    }
}

macro_rules! el {
    ($z:expr, $sym:expr, $name:expr, $mass:expr) => {
        Element { number: $z, symbol: $sym, name: $name, atomic_mass: $mass }
    };
}

static ELEMENTS: [Element; 103] = [
    // --- Period 1 ---
    el!(1, "H", "Hydrogen", 1.00794),
    el!(2, "He", "Helium", 4.002602),
    // --- Period 2 ---
    el!(3, "Li", "Lithium", 6.941),
    el!(4, "Be", "Beryllium", 9.012182),
    el!(5, "B", "Boron", 10.811),
    el!(6, "C", "Carbon", 12.0107),
    el!(7, "N", "Nitrogen", 14.0067),
    el!(8, "O", "Oxygen", 15.9994),
    el!(9, "F", "Fluorine", 18.9984032),
    el!(10, "Ne", "Neon", 20.1797),
    // --- Period 3 ---
    el!(11, "Na", "Sodium", 22.98976928),
    el!(12, "Mg", "Magnesium", 24.305),
    el!(13, "Al", "Aluminum", 26.9815386),
    el!(14, "Si", "Silicon", 28.0855),
    el!(15, "P", "Phosphorus", 30.973762),
    el!(16, "S", "Sulfur", 32.065),
    el!(17, "Cl", "Chlorine", 35.453),
    el!(18, "Ar", "Argon", 39.948),
    // --- Period 4 ---
    el!(19, "K", "Potassium", 39.0983),
    el!(20, "Ca", "Calcium", 40.078),
    el!(21, "Sc", "Scandium", 44.955912),
    el!(22, "Ti", "Titanium", 47.867),
    el!(23, "V", "Vanadium", 50.9415),
    el!(24, "Cr", "Chromium", 51.9961),
    el!(25, "Mn", "Manganese", 54.938045),
    el!(26, "Fe", "Iron", 55.845),
    el!(27, "Co", "Cobalt", 58.933195),
    el!(28, "Ni", "Nickel", 58.6934),
    el!(29, "Cu", "Copper", 63.546),
    el!(30, "Zn", "Zinc", 65.409),
    el!(31, "Ga", "Gallium", 69.723),
    el!(32, "Ge", "Germanium", 72.64),
    el!(33, "As", "Arsenic", 74.9216),
    el!(34, "Se", "Selenium", 78.96),
    el!(35, "Br", "Bromine", 79.904),
    el!(36, "Kr", "Krypton", 83.798),
    // --- Period 5 ---
    el!(37, "Rb", "Rubidium", 85.4678),
    el!(38, "Sr", "Strontium", 87.62),
    el!(39, "Y", "Yttrium", 88.90585),
    el!(40, "Zr", "Zirconium", 91.224),
    el!(41, "Nb", "Niobium", 92.90638),
    el!(42, "Mo", "Molybdenum", 95.94),
    el!(43, "Tc", "Technetium", 98.0),
    el!(44, "Ru", "Ruthenium", 101.07),
    el!(45, "Rh", "Rhodium", 102.9055),
    el!(46, "Pd", "Palladium", 106.42),
    el!(47, "Ag", "Silver", 107.8682),
    el!(48, "Cd", "Cadmium", 112.411),
    el!(49, "In", "Indium", 114.818),
    el!(50, "Sn", "Tin", 118.71),
    el!(51, "Sb", "Antimony", 121.76),
    el!(52, "Te", "Tellurium", 127.6),
    el!(53, "I", "Iodine", 126.90447),
    el!(54, "Xe", "Xenon", 131.293),
    // --- Period 6 ---
    el!(55, "Cs", "Cesium", 132.9054519),
    el!(56, "Ba", "Barium", 137.327),
    el!(57, "La", "Lanthanum", 138.90547),
    el!(58, "Ce", "Cerium", 140.116),
    el!(59, "Pr", "Praseodymium", 140.90765),
    el!(60, "Nd", "Neodymium", 144.242),
    el!(61, "Pm", "Promethium", 145.0),
    el!(62, "Sm", "Samarium", 150.36),
    el!(63, "Eu", "Europium", 151.964),
    el!(64, "Gd", "Gadolinium", 157.25),
    el!(65, "Tb", "Terbium", 158.92535),
    el!(66, "Dy", "Dysprosium", 162.5),
    el!(67, "Ho", "Holmium", 164.93032),
    el!(68, "Er", "Erbium", 167.259),
    el!(69, "Tm", "Thulium", 168.93421),
    el!(70, "Yb", "Ytterbium", 173.04),
    el!(71, "Lu", "Lutetium", 174.967),
    el!(72, "Hf", "Hafnium", 178.49),
    el!(73, "Ta", "Tantalum", 180.94788),
    el!(74, "W", "Tungsten", 183.84),
    el!(75, "Re", "Rhenium", 186.207),
    el!(76, "Os", "Osmium", 190.23),
    el!(77, "Ir", "Iridium", 192.217),
    el!(78, "Pt", "Platinum", 195.084),
    el!(79, "Au", "Gold", 196.966569),
    el!(80, "Hg", "Mercury", 200.59),
    el!(81, "Tl", "Thallium", 204.3833),
    el!(82, "Pb", "Lead", 207.2),
    el!(83, "Bi", "Bismuth", 208.9804),
    el!(84, "Po", "Polonium", 209.0),
    el!(85, "At", "Astatine", 210.0),
    el!(86, "Rn", "Radon", 222.0),
    // --- Period 7 ---
    el!(87, "Fr", "Francium", 223.0),
    el!(88, "Ra", "Radium", 226.0),
    el!(89, "Ac", "Actinium", 227.0),
    el!(90, "Th", "Thorium", 232.03806),
    el!(91, "Pa", "Protactinium", 231.03588),
    el!(92, "U", "Uranium", 238.02891),
    el!(93, "Np", "Neptunium", 237.0),
    el!(94, "Pu", "Plutonium", 244.0),
    el!(95, "Am", "Americium", 243.0),
    el!(96, "Cm", "Curium", 247.0),
    el!(97, "Bk", "Berkelium", 247.0),
    el!(98, "Cf", "Californium", 251.0),
    el!(99, "Es", "Einsteinium", 252.0),
    el!(100, "Fm", "Fermium", 257.0),
    el!(101, "Md", "Mendelevium", 258.0),
    el!(102, "No", "Nobelium", 259.0),
    el!(103, "Lr", "Lawrencium", 262.0),
];
