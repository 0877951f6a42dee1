// src/config.rs

use crate::error::{CrystalError, Result};
use crate::physics::analysis::neighbors::{DEFAULT_CUTOFF, DEFAULT_SHELL_TOLERANCE};
use directories::ProjectDirs;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

// --- NeighborDefaults ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighborDefaults {
  /// Search radius in Angstroms
  pub cutoff: f64,
  /// Shell grouping tolerance in Angstroms
  pub tol: f64,
}

impl Default for NeighborDefaults {
  fn default() -> Self {
    Self {
      cutoff: DEFAULT_CUTOFF,
      tol: DEFAULT_SHELL_TOLERANCE,
    }
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  #[serde(default)]
  pub neighbors: NeighborDefaults,

  /// env_logger filter used when no RUST_LOG is set
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      neighbors: NeighborDefaults::default(),
      log_level: default_log_level(),
    }
  }
}

impl Config {
  /// Loads config from the standard OS location (e.g. ~/.config/crystgeom/settings.json),
  /// falling back to defaults when it is missing or unreadable.
  ///
  /// Runs before the logger exists, so the outcome is returned as a message.
  pub fn load() -> (Self, String) {
    let path = Self::get_path();
    if !path.exists() {
      return (Self::default(), "No config found. Using defaults.".to_string());
    }
    match Self::load_from(&path) {
      Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
      Err(e) => (Self::default(), format!("{}; using defaults", e)),
    }
  }

  pub fn load_from(path: &Path) -> Result<Self> {
    let reader = BufReader::new(File::open(path)?);
    let cfg: Self = serde_json::from_reader(reader)
      .map_err(|e| CrystalError::Config(format!("parsing {:?}: {}", path, e)))?;
    cfg.validate()?;
    Ok(cfg)
  }

  /// Saves config to the standard OS location
  pub fn save(&self) -> Result<PathBuf> {
    let path = Self::get_path();
    self.save_to(&path)?;
    Ok(path)
  }

  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, self)
      .map_err(|e| CrystalError::Config(format!("writing {:?}: {}", path, e)))?;
    info!("Config saved to {:?}", path);
    Ok(())
  }

  fn validate(&self) -> Result<()> {
    let n = &self.neighbors;
    if !(n.cutoff.is_finite() && n.cutoff > 0.0) {
      return Err(CrystalError::Config(format!("cutoff must be positive, got {}", n.cutoff)));
    }
    if !(n.tol.is_finite() && n.tol >= 0.0) {
      return Err(CrystalError::Config(format!("tol must be non-negative, got {}", n.tol)));
    }
    Ok(())
  }

  pub fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "crystgeom", "crystgeom") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
