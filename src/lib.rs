//! Procedural geometry generators, and re-exports of the [lattice] geometry model and file format.
//!
//! A [Generator] fills a [DataBuilder] with vertices, indices, meshes and a bounding box; the
//! resulting [GeometryData] can then be written with [ser::write] and read back with [de::read].
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod error;
pub mod generator;

pub use error::Error;
pub use generator::*;

pub use lattice::*;
