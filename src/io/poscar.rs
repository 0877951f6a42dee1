// src/io/poscar.rs

use crate::error::{CrystalError, Result};
use crate::model::{AtomGroup, CoordSystem, Structure};
use crate::utils::linalg;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub fn parse(path: impl AsRef<Path>) -> Result<Structure> {
    let text = fs::read_to_string(path)?;
    parse_str(&text)
}

/// Cursor over the meaningful lines of a POSCAR, keeping 1-based line numbers
struct Lines<'a> {
    lines: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        let mut lines = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            // The first line is free text and keeps its '#' / '!'
            let content = if i == 0 { raw.trim() } else { strip_comment(raw) };
            if !content.is_empty() || i == 0 {
                lines.push((i + 1, content));
            }
        }
        Self { lines, pos: 0 }
    }

    fn next(&mut self, what: &str) -> Result<(usize, &'a str)> {
        let line = self.lines.get(self.pos).copied().ok_or_else(|| CrystalError::Parse {
            line: self.lines.last().map_or(1, |l| l.0 + 1),
            message: format!("unexpected end of file, expected {}", what),
        })?;
        self.pos += 1;
        Ok(line)
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(|l| l.1)
    }
}

fn strip_comment(raw: &str) -> &str {
    let end = raw.find(['!', '#']).unwrap_or(raw.len());
    raw[..end].trim()
}

fn parse_floats<const N: usize>(line: usize, content: &str, what: &str) -> Result<[f64; N]> {
    let mut out = [0.0; N];
    let mut parts = content.split_whitespace();
    for v in out.iter_mut() {
        let token = parts.next().ok_or_else(|| CrystalError::Parse {
            line,
            message: format!("expected {} values for {}", N, what),
        })?;
        *v = token.parse().map_err(|_| CrystalError::Parse {
            line,
            message: format!("invalid number '{}' in {}", token, what),
        })?;
    }
    Ok(out)
}

pub fn parse_str(text: &str) -> Result<Structure> {
    let mut lines = Lines::new(text);

    let (_, comment) = lines.next("comment")?;

    // Scale; negative means the target cell volume
    let (scale_no, scale_line) = lines.next("scaling factor")?;
    let [scale] = parse_floats::<1>(scale_no, scale_line, "scaling factor")?;

    // Lattice
    let mut lattice = [[0.0; 3]; 3];
    for row in lattice.iter_mut() {
        let (no, content) = lines.next("lattice vector")?;
        *row = parse_floats::<3>(no, content, "lattice vector")?;
    }

    let factor = if scale < 0.0 {
        let volume = linalg::determinant(&lattice).abs();
        if volume == 0.0 {
            return Err(CrystalError::Parse {
                line: scale_no,
                message: "volume scaling on a degenerate lattice".into(),
            });
        }
        (-scale / volume).cbrt()
    } else {
        scale
    };
    for row in lattice.iter_mut() {
        *row = row.map(|v| v * factor);
    }

    // Elements & Counts
    let (mut no, mut content) = lines.next("atom counts")?;
    let first = content.chars().next().unwrap_or(' ');
    let species: Option<Vec<String>> = if first.is_alphabetic() {
        let names = content.split_whitespace().map(str::to_string).collect();
        (no, content) = lines.next("atom counts")?;
        Some(names)
    } else {
        None
    };

    let counts = content
        .split_whitespace()
        .map(|t| {
            t.parse::<usize>().map_err(|_| CrystalError::Parse {
                line: no,
                message: format!("invalid atom count '{}'", t),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(names) = &species {
        if names.len() != counts.len() {
            return Err(CrystalError::Parse {
                line: no,
                message: format!("{} species but {} counts", names.len(), counts.len()),
            });
        }
    }

    // Selective dynamics flags are read past and dropped
    if lines.peek().is_some_and(|l| l.starts_with(['s', 'S'])) {
        lines.next("selective dynamics")?;
    }

    // Mode
    let (mode_no, mode_line) = lines.next("coordinate mode")?;
    let coord_system = match mode_line.chars().next() {
        Some('d' | 'D') => CoordSystem::Direct,
        Some('c' | 'C' | 'k' | 'K') => CoordSystem::Cartesian,
        _ => {
            return Err(CrystalError::Parse {
                line: mode_no,
                message: format!("undefined coordinate mode '{}'", mode_line),
            })
        }
    };

    // Atoms
    let mut groups = Vec::with_capacity(counts.len());
    for (i, &count) in counts.iter().enumerate() {
        let mut coords = Vec::with_capacity(count);
        for _ in 0..count {
            let (no, content) = lines.next("atom position")?;
            let mut pos = parse_floats::<3>(no, content, "atom position")?;
            if coord_system == CoordSystem::Cartesian {
                pos = pos.map(|v| v * factor);
            }
            coords.push(pos);
        }
        let element = species.as_ref().map(|names| names[i].clone());
        groups.push(AtomGroup::new(element, count, coords)?);
    }

    Structure::new(comment, lattice, groups, coord_system)
}

pub fn to_string(structure: &Structure) -> String {
    let mut out = String::new();

    // 1. Header
    let _ = writeln!(out, "{}", structure.comment);
    let _ = writeln!(out, "1.0");

    // 2. Lattice Vectors
    for vec in &structure.lattice {
        let _ = writeln!(out, " {:>22} {:>22} {:>22}", vec[0], vec[1], vec[2]);
    }

    // 3. Species (only when every group is named) and counts
    let names: Option<Vec<&str>> = structure.groups.iter().map(|g| g.element.as_deref()).collect();
    if let Some(names) = names {
        for name in names {
            let _ = write!(out, " {:<4}", name);
        }
        let _ = writeln!(out);
    }
    for group in &structure.groups {
        let _ = write!(out, " {:<4}", group.count());
    }
    let _ = writeln!(out);

    // 4. Atomic Positions (shortest round-trip form, so rewrites are lossless)
    let _ = writeln!(out, "{}", structure.coord_system);
    for group in &structure.groups {
        for p in &group.coords {
            let _ = writeln!(out, " {:>22} {:>22} {:>22}", p[0], p[1], p[2]);
        }
    }

    out
}

pub fn write(path: impl AsRef<Path>, structure: &Structure) -> Result<()> {
    fs::write(path, to_string(structure))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_fixtures::{mgb2_cartesian, mgb2_direct, MGB2_POSCAR};
    use approx::assert_abs_diff_eq;

    fn assert_same_geometry(a: &Structure, b: &Structure) {
        assert_eq!(a.coord_system, b.coord_system);
        assert_eq!(a.elements(), b.elements());
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(a.lattice[i][j], b.lattice[i][j], epsilon = 1e-10);
            }
        }
        for (x, y) in a.atoms_flat().iter().zip(b.atoms_flat()) {
            for k in 0..3 {
                assert_abs_diff_eq!(x.coord[k], y.coord[k], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_parse_cartesian() {
        let s = parse_str(MGB2_POSCAR).unwrap();
        assert_eq!(s.comment, "MgB2 # hexagonal");
        assert_eq!(s.groups[1].count(), 2);
        assert_same_geometry(&s, &mgb2_cartesian());
    }

    #[test]
    fn test_parse_direct_scaled() {
        let text = "\
Si diamond
2.0
 0.0 1.0 1.0
 1.0 0.0 1.0
 1.0 1.0 0.0
Si
2
Direct
 0.00 0.00 0.00
 0.25 0.25 0.25   ! second site
";
        let s = parse_str(text).unwrap();
        assert_eq!(s.coord_system, CoordSystem::Direct);
        assert_eq!(s.lattice[0], [0.0, 2.0, 2.0]);
        // fractional rows are not scaled
        assert_eq!(s.groups[0].coords[1], [0.25, 0.25, 0.25]);
    }

    #[test]
    fn test_parse_cartesian_scaled() {
        let text = "c\n2.0\n1 0 0\n0 1 0\n0 0 1\nH\n1\nCart\n0.5 0.5 0.5\n";
        let s = parse_str(text).unwrap();
        assert_eq!(s.groups[0].coords[0], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_negative_scale_is_volume() {
        let text = "c\n-27.0\n1 0 0\n0 1 0\n0 0 1\nH\n1\nDirect\n0 0 0\n";
        let s = parse_str(text).unwrap();
        assert_abs_diff_eq!(s.volume(), 27.0, epsilon = 1e-10);
    }

    #[test]
    fn test_parse_without_species_and_selective() {
        let text = "\
no names

1.0
 4 0 0
 0 4 0
 0 0 4
1 1
Selective dynamics
Direct
 0.0 0.0 0.0 T T F
 0.5 0.5 0.5 F F F
";
        let s = parse_str(text).unwrap();
        assert_eq!(s.elements(), vec![None, None]);
        assert_eq!(s.atom_count(), 2);
        assert_eq!(s.groups[1].coords[0], [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_bad_mode() {
        let text = "c\n1.0\n1 0 0\n0 1 0\n0 0 1\nH\n1\nXyz\n0 0 0\n";
        let err = parse_str(text).unwrap_err();
        assert!(matches!(err, CrystalError::Parse { line: 8, .. }));
    }

    #[test]
    fn test_missing_position() {
        let text = "c\n1.0\n1 0 0\n0 1 0\n0 0 1\nH O\n1 2\nDirect\n0 0 0\n0.5 0.5 0.5\n";
        let err = parse_str(text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_bad_number() {
        let text = "c\n1.0\n1 0 0\n0 x 0\n0 0 1\nH\n1\nDirect\n0 0 0\n";
        assert!(matches!(
            parse_str(text),
            Err(CrystalError::Parse { line: 4, .. })
        ));
    }

    #[test]
    fn test_write_then_parse() {
        for s in [mgb2_cartesian(), mgb2_direct()] {
            let back = parse_str(&to_string(&s)).unwrap();
            assert_eq!(back.comment, s.comment);
            assert_same_geometry(&back, &s);
        }
    }

    #[test]
    fn test_rewrite_is_lossless() {
        let mut s = mgb2_cartesian().supercell([2, 1, 1]).unwrap();
        s.permute_atom_in_place(4, [1e-13, -0.1, 1.0 / 3.0]).unwrap();
        let once = parse_str(&to_string(&s)).unwrap();
        assert_eq!(once, s);
        let mut direct = once.clone();
        direct.cart_to_direct().unwrap();
        assert_eq!(parse_str(&to_string(&direct)).unwrap(), direct);
    }

    #[test]
    fn test_write_skips_species_when_unset() {
        let mut s = mgb2_direct();
        s.groups[0].element = None;
        let text = to_string(&s);
        let back = parse_str(&text).unwrap();
        assert_eq!(back.elements(), vec![None, None]);
    }
}
