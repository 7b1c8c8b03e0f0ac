//! World configuration knobs.
//!
//! A plain struct with a `Default` impl and `with_*` builder methods, plus
//! `serde`-backed TOML load/save for an on-disk sidecar config file.
//! Reading these from a CLI or config file is the embedding application's
//! job; this struct is the piece it would populate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default storage root directory name.
pub const DEFAULT_STORAGE_ROOT: &str = "world_data";

/// Default cap on simultaneously loaded chunks.
pub const DEFAULT_MAX_LOADED_CHUNKS: usize = 12;

/// Default cache time-to-live, in ticks.
pub const DEFAULT_CACHE_TTL: u64 = 600;

/// Default interval (in ticks) between cache-eviction sweeps.
pub const DEFAULT_CACHE_SWEEP_INTERVAL: u64 = 300;

/// Default maximum horizontal liquid flow distance per tick.
pub const DEFAULT_MAX_FLOW_DISTANCE: u32 = 3;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
  /// Root directory chunk files are stored under, as `<root>/<cx>/<cy>.chunk`.
  pub storage_root: PathBuf,
  /// Maximum number of simultaneously loaded chunks in the active set.
  pub max_loaded_chunks: usize,
  /// Ticks an evicted chunk may sit in the cache before being purged.
  pub cache_ttl: u64,
  /// How often (in ticks) the manager sweeps the cache for expired entries.
  pub cache_sweep_interval: u64,
  /// Maximum horizontal distance a liquid may flow in a single tick.
  pub max_flow_distance: u32,
  /// Procedural generation seed.
  pub seed: u64,
}

impl Default for WorldConfig {
  fn default() -> Self {
    Self {
      storage_root: PathBuf::from(DEFAULT_STORAGE_ROOT),
      max_loaded_chunks: DEFAULT_MAX_LOADED_CHUNKS,
      cache_ttl: DEFAULT_CACHE_TTL,
      cache_sweep_interval: DEFAULT_CACHE_SWEEP_INTERVAL,
      max_flow_distance: DEFAULT_MAX_FLOW_DISTANCE,
      seed: 0,
    }
  }
}

impl WorldConfig {
  pub fn new(seed: u64) -> Self {
    Self {
      seed,
      ..Default::default()
    }
  }

  pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.storage_root = root.into();
    self
  }

  pub fn with_max_loaded_chunks(mut self, n: usize) -> Self {
    self.max_loaded_chunks = n;
    self
  }

  pub fn with_cache_ttl(mut self, ttl: u64) -> Self {
    self.cache_ttl = ttl;
    self
  }

  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = seed;
    self
  }

  /// Path a given chunk would be stored at: `<root>/<cx>/<cy>.chunk`.
  pub fn chunk_path(&self, cx: i32, cy: i32) -> PathBuf {
    self.storage_root.join(cx.to_string()).join(format!("{cy}.chunk"))
  }

  /// Serializes this config to a TOML string, for writing out a sidecar
  /// config file alongside the storage root.
  pub fn to_toml(&self) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(self)?)
  }

  /// Parses a `WorldConfig` from a TOML string. Any field missing from
  /// the source falls back to `Default`, so a sidecar file only needs to
  /// mention the knobs it overrides.
  pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(s)?)
  }

  /// Writes this config out as a TOML sidecar file, creating parent
  /// directories as needed.
  pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, self.to_toml()?)?;
    Ok(())
  }

  /// Reads a TOML sidecar config file.
  pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
    let s = std::fs::read_to_string(path)?;
    Self::from_toml(&s)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn chunk_path_layout() {
    let cfg = WorldConfig::default().with_storage_root("save");
    let p = cfg.chunk_path(-2, 5);
    assert_eq!(p, PathBuf::from("save/-2/5.chunk"));
  }

  #[test]
  fn toml_round_trip() {
    let cfg = WorldConfig::new(42).with_storage_root("save").with_max_loaded_chunks(20);
    let s = cfg.to_toml().unwrap();
    let back = WorldConfig::from_toml(&s).unwrap();
    assert_eq!(back.seed, cfg.seed);
    assert_eq!(back.storage_root, cfg.storage_root);
    assert_eq!(back.max_loaded_chunks, cfg.max_loaded_chunks);
  }

  #[test]
  fn partial_toml_falls_back_to_defaults() {
    let cfg = WorldConfig::from_toml("seed = 7\n").unwrap();
    assert_eq!(cfg.seed, 7);
    assert_eq!(cfg.max_loaded_chunks, DEFAULT_MAX_LOADED_CHUNKS);
  }

  #[test]
  fn save_and_load_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world.toml");
    let cfg = WorldConfig::new(9).with_cache_ttl(1234);
    cfg.save_to_file(&path).unwrap();
    let loaded = WorldConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.seed, 9);
    assert_eq!(loaded.cache_ttl, 1234);
  }
}
