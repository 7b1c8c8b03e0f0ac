//! Error types for chunk persistence.
//!
//! Plain enums with hand-written `Display` + `std::error::Error` impls and
//! `From` conversions, rather than a `thiserror` derive — matching the
//! error style of the persistence layer this crate's format is modeled on.

use std::fmt;
use std::io;

/// Chunk file header failed validation against this build's constants.
#[derive(Debug)]
pub enum HeaderError {
  InvalidMagic(u32),
  UnsupportedVersion(u32),
  DimensionMismatch { file_w: u32, file_h: u32, expected_w: u32, expected_h: u32 },
  Truncated { expected: usize, got: usize },
}

impl fmt::Display for HeaderError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InvalidMagic(got) => write!(f, "invalid chunk file magic: 0x{got:08X}"),
      Self::UnsupportedVersion(v) => write!(f, "unsupported chunk file version: {v}"),
      Self::DimensionMismatch {
        file_w,
        file_h,
        expected_w,
        expected_h,
      } => write!(
        f,
        "chunk dimensions {file_w}x{file_h} do not match build's {expected_w}x{expected_h}"
      ),
      Self::Truncated { expected, got } => {
        write!(f, "chunk file truncated: expected {expected} bytes, got {got}")
      }
    }
  }
}

impl std::error::Error for HeaderError {}

/// Chunk file is present but could not be parsed.
#[derive(Debug)]
pub enum DeserializeError {
  Io(io::Error),
  Header(HeaderError),
}

impl From<io::Error> for DeserializeError {
  fn from(e: io::Error) -> Self {
    Self::Io(e)
  }
}

impl From<HeaderError> for DeserializeError {
  fn from(e: HeaderError) -> Self {
    Self::Header(e)
  }
}

impl fmt::Display for DeserializeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Io(e) => write!(f, "I/O error: {e}"),
      Self::Header(e) => write!(f, "header error: {e}"),
    }
  }
}

impl std::error::Error for DeserializeError {}

/// A save/load operation failed at the storage layer.
#[derive(Debug)]
pub enum StorageError {
  Io(io::Error),
  Deserialize(DeserializeError),
}

impl From<io::Error> for StorageError {
  fn from(e: io::Error) -> Self {
    Self::Io(e)
  }
}

impl From<DeserializeError> for StorageError {
  fn from(e: DeserializeError) -> Self {
    Self::Deserialize(e)
  }
}

impl fmt::Display for StorageError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Io(e) => write!(f, "storage I/O error: {e}"),
      Self::Deserialize(e) => write!(f, "storage deserialize error: {e}"),
    }
  }
}

impl std::error::Error for StorageError {}

/// A sidecar TOML config file failed to load or save.
#[derive(Debug)]
pub enum ConfigError {
  Io(io::Error),
  Parse(toml::de::Error),
  Serialize(toml::ser::Error),
}

impl From<io::Error> for ConfigError {
  fn from(e: io::Error) -> Self {
    Self::Io(e)
  }
}

impl From<toml::de::Error> for ConfigError {
  fn from(e: toml::de::Error) -> Self {
    Self::Parse(e)
  }
}

impl From<toml::ser::Error> for ConfigError {
  fn from(e: toml::ser::Error) -> Self {
    Self::Serialize(e)
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Io(e) => write!(f, "config I/O error: {e}"),
      Self::Parse(e) => write!(f, "config parse error: {e}"),
      Self::Serialize(e) => write!(f, "config serialize error: {e}"),
    }
  }
}

impl std::error::Error for ConfigError {}
