use std::{io, path::PathBuf};

use crate::BoundingBox;

/// Inconsistencies between a vertex layout, its buffers, and the meshes indexing into them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("component {index} ends at byte {end}, past the vertex size of {vertex_size} bytes")]
    ComponentOverflow {
        index: usize,
        end: u64,
        vertex_size: u32,
    },
    #[error("component {index} starts at byte {offset}, before its predecessor at {previous}")]
    ComponentOrder {
        index: usize,
        offset: u32,
        previous: u32,
    },
    #[error("vertex buffer of {len} bytes is not a whole number of {vertex_size}-byte vertices")]
    PartialVertex { len: usize, vertex_size: u32 },
    #[error("vertex buffer holds {len} bytes, but the layout declares a vertex size of 0")]
    ZeroSizedVertex { len: usize },
    #[error("mesh {mesh} indexes {offset}..{end}, past the end of an index buffer of length {len}")]
    MeshOutOfRange {
        mesh: usize,
        offset: u32,
        end: u64,
        len: usize,
    },
    #[error("bounding box is inverted: {0:?}")]
    InvertedBounds(BoundingBox),
    #[error("no component at index {0}")]
    NoComponent(usize),
    #[error("vertex {vertex} is out of range: 0..{count} ∌ {vertex}")]
    VertexOutOfRange { vertex: usize, count: usize },
    #[error("cannot access a {size}-byte component as a {type_size}-byte value")]
    SizeMismatch { size: u32, type_size: usize },
}

/// Failures of a generator to produce geometry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors encountered while writing or reading the binary geometry format.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("expected magic number {expected:#010x}, found {found:#010x}")]
    BadMagic { expected: u32, found: u32 },
    #[error("unexpected end of data while reading {0}")]
    Truncated(&'static str),
    #[error("{0} does not fit in the format's integer fields")]
    TooLarge(&'static str),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("index buffer length of {0} bytes is not a whole number of u32 indices")]
    PartialIndex(usize),
    #[error("material sidecar {path:?}: {source}")]
    Sidecar {
        path: PathBuf,
        #[source]
        source: Box<FormatError>,
    },
    #[error("material sidecar path {0:?} is the geometry file itself")]
    SidecarCollision(PathBuf),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
