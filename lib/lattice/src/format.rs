//! Definitions shared by the geometry format's writer and reader.
//!
//! # Layout
//!
//! Fields are stored in this order, with no padding. `size` fields are `u64` under
//! [ByteLayout::Portable] and host pointer width under [ByteLayout::HostNative].
//!
//! ```text
//! u32      magic (0x12345002)
//! f32[3]   bounding box mins (x, y, z)
//! f32[3]   bounding box maxs (x, y, z)
//! size     vertex component count
//! size     additional uv count
//! size     vertex size, in bytes
//! repeat(vertex component count):
//!   size   component size, in bytes
//!   size   component offset, in bytes
//! size     mesh count
//! repeat(mesh count):
//!   u32    mesh index offset, in elements
//!   u32    mesh index count
//! size     vertex buffer length, in bytes
//! u8[]     vertex buffer
//! size     index buffer length, in bytes (index count * 4)
//! u32[]    index buffer
//! ```
//!
//! The vertex buffer is stored verbatim; its contents are whatever the generator put there.
//!
//! # Sidecar
//!
//! If any mesh references a texture, a JSON array with one `{diffuseMap, normalMap, specularMap}`
//! record per mesh is stored next to the geometry file; see [sidecar_path].

use std::path::{Path, PathBuf};

/// The first four bytes of every geometry file.
pub const MAGIC: u32 = 0x1234_5002;

/// Extension given to material sidecar files.
pub const SIDECAR_EXTENSION: &str = "json";

/// Byte order and width of integer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteLayout {
    /// Little-endian, with `size` fields stored as `u64`.
    #[default]
    Portable,
    /// Host byte order, with `size` fields stored at host pointer width. Only for exchanging files
    /// with legacy tools built for the same kind of host.
    HostNative,
}

impl ByteLayout {
    /// Width of `size` fields, in bytes.
    #[inline]
    pub const fn size_width(self) -> usize {
        match self {
            ByteLayout::Portable => std::mem::size_of::<u64>(),
            ByteLayout::HostNative => std::mem::size_of::<usize>(),
        }
    }
}

/// What to do about the material sidecar file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sidecar {
    /// Write (or read) the sidecar when there are materials; failures are logged and ignored.
    #[default]
    BestEffort,
    /// Write (or read) the sidecar when there are materials; failures are returned.
    Strict,
    /// Never touch the sidecar.
    Disabled,
}

/// The path of the material sidecar belonging to a geometry file.
///
/// For a geometry path that already has the sidecar extension this is the path itself; such files
/// get no sidecar.
pub fn sidecar_path(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref().with_extension(SIDECAR_EXTENSION)
}
