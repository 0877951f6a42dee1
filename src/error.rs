// src/error.rs

use thiserror::Error;

/// Broad category of a [`CrystalError`], used by callers that only care
/// about what went wrong and not the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input arrays, shape/count mismatch, bad parameters
    Validation,
    /// Unknown or unset element symbol
    Lookup,
    /// Atom index or shell number out of range
    Index,
    /// Singular lattice
    Arithmetic,
    Io,
    Parse,
}

#[derive(Error, Debug)]
pub enum CrystalError {
    #[error("invalid structure data: {0}")]
    Validation(String),

    #[error("unknown element symbol '{0}'")]
    UnknownElement(String),

    #[error("atom group {group} has no element symbol")]
    UnsetElement { group: usize },

    #[error("atom index {index} exceeds the number of atoms ({count})")]
    AtomIndex { index: usize, count: usize },

    #[error("shell {shell} cannot be resolved within cutoff {cutoff} Å; retry with a larger cutoff")]
    ShellOutOfRange { shell: usize, cutoff: f64 },

    #[error("lattice matrix is singular (det = {det:e})")]
    SingularLattice { det: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("POSCAR line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("config error: {0}")]
    Config(String),
}

impl CrystalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CrystalError::Validation(_) | CrystalError::Config(_) => ErrorKind::Validation,
            CrystalError::UnknownElement(_) | CrystalError::UnsetElement { .. } => ErrorKind::Lookup,
            CrystalError::AtomIndex { .. } | CrystalError::ShellOutOfRange { .. } => ErrorKind::Index,
            CrystalError::SingularLattice { .. } => ErrorKind::Arithmetic,
            CrystalError::Io(_) => ErrorKind::Io,
            CrystalError::Parse { .. } => ErrorKind::Parse,
        }
    }
}

pub type Result<T> = std::result::Result<T, CrystalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(CrystalError::UnknownElement("Xx".into()).kind(), ErrorKind::Lookup);
        assert_eq!(CrystalError::AtomIndex { index: 3, count: 3 }.kind(), ErrorKind::Index);
        assert_eq!(CrystalError::SingularLattice { det: 0.0 }.kind(), ErrorKind::Arithmetic);
        assert_eq!(
            CrystalError::ShellOutOfRange { shell: 4, cutoff: 2.0 }.kind(),
            ErrorKind::Index
        );
    }

    #[test]
    fn test_shell_message_suggests_retry() {
        let msg = CrystalError::ShellOutOfRange { shell: 2, cutoff: 2.6 }.to_string();
        assert!(msg.contains("larger cutoff"));
    }
}
