//! Chunk file binary format and save/load helpers.
//!
//! Explicit little-endian byte layout via `to_le_bytes`/`from_le_bytes`,
//! no serialization crate, matching how a header-then-body chunk file gets
//! written elsewhere in this style of engine. Uncompressed and
//! self-describing rather than page-tabled/compressed, favoring a flat
//! layout over a compression crate.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::chunk::{CHUNK_H, CHUNK_W};
use crate::error::{DeserializeError, HeaderError, StorageError};
use crate::material::Material;

/// "SAND" in ASCII, little-endian as a u32.
pub const MAGIC: u32 = 0x444E_4153;
pub const VERSION: u32 = 1;

/// Reads a chunk file's material grid. Returns the materials in row-major
/// order (`y=0` at the top), matching `Chunk::fill_materials`.
pub fn load(path: &Path) -> Result<Box<[Material]>, DeserializeError> {
  let mut file = fs::File::open(path)?;
  let mut header = [0u8; 16];
  file.read_exact(&mut header)?;

  let magic = u32::from_le_bytes(header[0..4].try_into().unwrap());
  if magic != MAGIC {
    return Err(HeaderError::InvalidMagic(magic).into());
  }
  let version = u32::from_le_bytes(header[4..8].try_into().unwrap());
  if version != VERSION {
    return Err(HeaderError::UnsupportedVersion(version).into());
  }
  let file_w = u32::from_le_bytes(header[8..12].try_into().unwrap());
  let file_h = u32::from_le_bytes(header[12..16].try_into().unwrap());
  if file_w != CHUNK_W || file_h != CHUNK_H {
    return Err(HeaderError::DimensionMismatch {
      file_w,
      file_h,
      expected_w: CHUNK_W,
      expected_h: CHUNK_H,
    }
    .into());
  }

  let expected = (file_w * file_h) as usize;
  let mut bytes = Vec::with_capacity(expected);
  file.read_to_end(&mut bytes)?;
  if bytes.len() < expected {
    return Err(
      HeaderError::Truncated {
        expected,
        got: bytes.len(),
      }
      .into(),
    );
  }

  Ok(bytes[..expected].iter().map(|&b| Material::from_id(b)).collect())
}

/// Writes a chunk's material grid to `path`, creating parent directories
/// as needed.
pub fn save(path: &Path, materials: &[Material]) -> Result<(), StorageError> {
  debug_assert_eq!(materials.len(), (CHUNK_W * CHUNK_H) as usize);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  let mut file = fs::File::create(path)?;
  write_header(&mut file, CHUNK_W, CHUNK_H)?;
  let raw: Vec<u8> = materials.iter().map(|m| m.id()).collect();
  file.write_all(&raw)?;
  Ok(())
}

fn write_header<W: Write>(w: &mut W, width: u32, height: u32) -> io::Result<()> {
  w.write_all(&MAGIC.to_le_bytes())?;
  w.write_all(&VERSION.to_le_bytes())?;
  w.write_all(&width.to_le_bytes())?;
  w.write_all(&height.to_le_bytes())?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_grid() -> Vec<Material> {
    let mut v = vec![Material::Empty; (CHUNK_W * CHUNK_H) as usize];
    v[0] = Material::Stone;
    v[1] = Material::Sand;
    v[(CHUNK_W * CHUNK_H - 1) as usize] = Material::Bedrock;
    v
  }

  #[test]
  fn round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("0").join("0.chunk");
    let grid = sample_grid();
    save(&path, &grid).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(&*loaded, grid.as_slice());
  }

  #[test]
  fn rejects_bad_magic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.chunk");
    fs::write(&path, [0u8; 16]).unwrap();
    let err = load(&path).unwrap_err();
    assert!(matches!(err, DeserializeError::Header(HeaderError::InvalidMagic(_))));
  }

  #[test]
  fn rejects_unsupported_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stale.chunk");
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&MAGIC.to_le_bytes());
    bytes.extend_from_slice(&(VERSION + 1).to_le_bytes());
    bytes.extend_from_slice(&CHUNK_W.to_le_bytes());
    bytes.extend_from_slice(&CHUNK_H.to_le_bytes());
    fs::write(&path, bytes).unwrap();
    let err = load(&path).unwrap_err();
    assert!(matches!(
      err,
      DeserializeError::Header(HeaderError::UnsupportedVersion(_))
    ));
  }

  #[test]
  fn rejects_dimension_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mismatch.chunk");
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&MAGIC.to_le_bytes());
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.push(0);
    fs::write(&path, bytes).unwrap();
    let err = load(&path).unwrap_err();
    assert!(matches!(
      err,
      DeserializeError::Header(HeaderError::DimensionMismatch { .. })
    ));
  }
}
