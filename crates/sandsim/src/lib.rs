//! Chunked falling-sand cellular automaton core: a material table, a
//! per-chunk physics step, procedural world generation, and a chunk
//! manager that streams a bounded active set of chunks across
//! loaded/cache/disk.
//!
//! The core never touches a GPU or an input device; [`World`] is the
//! single entry point an embedding simulation loop and renderer drive
//! through [`render::Renderer`].

pub mod chunk;
pub mod chunk_manager;
pub mod config;
pub mod coords;
pub mod error;
pub mod hash;
pub mod material;
pub mod persistence;
pub mod render;
pub mod world;
pub mod worldgen;

pub use chunk::Chunk;
pub use config::WorldConfig;
pub use coords::{ChunkCoord, LocalPos, WorldPos};
pub use material::Material;
pub use world::World;
