//! Reading [GeometryData] from the binary geometry format.
//!
//! See [format](crate::format) for the layout.

use std::{
    fs::File,
    io::{self, BufReader, Read},
    marker::PhantomData,
    path::Path,
};

use byteorder::{ByteOrder, LittleEndian, NativeEndian, ReadBytesExt};
use nalgebra::Point3;

use crate::{
    format::{sidecar_path, ByteLayout, Sidecar, MAGIC},
    BoundingBox, FormatError, GeometryData, MaterialRef, Mesh, MeshRange, VertexLayout,
};

/// Options controlling how geometry is read.
///
/// Must match the [WriteOptions](crate::ser::WriteOptions) the file was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ReadOptions {
    pub layout: ByteLayout,
    pub sidecar: Sidecar,
}

/// Reads individual format fields in byte order `B`, with `size` fields `size_width` bytes wide.
struct FieldReader<R, B> {
    inner: R,
    size_width: usize,
    _order: PhantomData<B>,
}

impl<R: Read, B: ByteOrder> FieldReader<R, B> {
    fn new(inner: R, layout: ByteLayout) -> Self {
        Self {
            inner,
            size_width: layout.size_width(),
            _order: PhantomData,
        }
    }

    #[inline]
    fn u32(&mut self, what: &'static str) -> Result<u32, FormatError> {
        self.inner.read_u32::<B>().map_err(|e| truncated(e, what))
    }

    fn point(&mut self, what: &'static str) -> Result<Point3<f32>, FormatError> {
        let mut p = Point3::origin();
        for c in p.iter_mut() {
            *c = self.inner.read_f32::<B>().map_err(|e| truncated(e, what))?;
        }
        Ok(p)
    }

    fn size(&mut self, what: &'static str) -> Result<usize, FormatError> {
        let v = match self.size_width {
            8 => self.inner.read_u64::<B>(),
            4 => self.inner.read_u32::<B>().map(u64::from),
            _ => self.inner.read_u16::<B>().map(u64::from),
        }
        .map_err(|e| truncated(e, what))?;
        usize::try_from(v).map_err(|_| FormatError::TooLarge(what))
    }

    /// A `size` field holding a value the in-memory model stores as `u32`.
    fn size_u32(&mut self, what: &'static str) -> Result<u32, FormatError> {
        u32::try_from(self.size(what)?).map_err(|_| FormatError::TooLarge(what))
    }

    /// Read exactly `len` bytes. Memory is only allocated as data actually arrives, so a corrupt
    /// length can't trigger a huge allocation.
    fn blob(&mut self, len: usize, what: &'static str) -> Result<Vec<u8>, FormatError> {
        let mut buf = Vec::new();
        (&mut self.inner).take(len as u64).read_to_end(&mut buf)?;
        if buf.len() != len {
            return Err(FormatError::Truncated(what));
        }
        Ok(buf)
    }

    fn indices(&mut self, len: usize) -> Result<Vec<u32>, FormatError> {
        if len % std::mem::size_of::<u32>() != 0 {
            return Err(FormatError::PartialIndex(len));
        }
        let bytes = self.blob(len, "index buffer")?;
        let mut indices = vec![0; len / std::mem::size_of::<u32>()];
        B::read_u32_into(&bytes, &mut indices);
        Ok(indices)
    }
}

fn truncated(e: io::Error, what: &'static str) -> FormatError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => FormatError::Truncated(what),
        _ => FormatError::Io(e),
    }
}

/// Read geometry from `reader`. Materials are left empty; see [read] and [read_materials].
///
/// # Errors
///
/// * [`BadMagic`](FormatError::BadMagic) if the data doesn't start with [MAGIC]
/// * [`Truncated`](FormatError::Truncated) if the data ends early
/// * [`TooLarge`](FormatError::TooLarge) if a field doesn't fit in memory
/// * [`PartialIndex`](FormatError::PartialIndex) if the index buffer length isn't a multiple of 4
/// * [`Layout`](FormatError::Layout) if the geometry fails [validation](GeometryData::validate)
/// * [`Io`](FormatError::Io) if `reader` fails
pub fn decode(reader: impl Read, options: &ReadOptions) -> Result<GeometryData, FormatError> {
    match options.layout {
        ByteLayout::Portable => {
            decode_fields(FieldReader::<_, LittleEndian>::new(reader, options.layout))
        }
        ByteLayout::HostNative => {
            decode_fields(FieldReader::<_, NativeEndian>::new(reader, options.layout))
        }
    }
}

fn decode_fields<R: Read, B: ByteOrder>(
    mut r: FieldReader<R, B>,
) -> Result<GeometryData, FormatError> {
    let magic = r.u32("magic number")?;
    if magic != MAGIC {
        return Err(FormatError::BadMagic {
            expected: MAGIC,
            found: magic,
        });
    }
    let bounds = BoundingBox::new(r.point("bounding box")?, r.point("bounding box")?);

    let mut layout = VertexLayout::new();
    let components = r.size("vertex component count")?;
    layout
        .set_additional_uv_count(r.size_u32("additional uv count")?)
        .set_vertex_size_bytes(r.size_u32("vertex size")?);
    for _ in 0..components {
        let size = r.size_u32("component size")?;
        let offset = r.size_u32("component offset")?;
        layout.add_component(size, offset);
    }
    tracing::trace!(components, "read vertex layout");

    let mesh_count = r.size("mesh count")?;
    let mut meshes = Vec::new();
    for _ in 0..mesh_count {
        let offset = r.u32("mesh range")?;
        let count = r.u32("mesh range")?;
        meshes.push(Mesh::new(MeshRange::new(offset, count)));
    }

    let vertex_len = r.size("vertex buffer length")?;
    let vertices = r.blob(vertex_len, "vertex buffer")?;

    let index_len = r.size("index buffer length")?;
    let indices = r.indices(index_len)?;
    tracing::trace!(vertex_len, index_len, "read buffers");

    let data = GeometryData {
        bounds,
        layout,
        meshes,
        vertices,
        indices,
    };
    data.validate()?;
    Ok(data)
}

/// Read geometry from a byte slice.
///
/// # Errors
///
/// Same as [decode].
pub fn from_bytes(bytes: &[u8], options: &ReadOptions) -> Result<GeometryData, FormatError> {
    decode(bytes, options)
}

/// Read geometry from the file at `path`, along with its material sidecar if there is one.
///
/// Sidecar entries are matched to meshes by position. Under [Sidecar::BestEffort], an unreadable
/// sidecar is logged and the meshes are left without materials. A file whose sidecar path is
/// itself (i.e. one ending in `.json`) has no sidecar.
///
/// # Errors
///
/// * any error from [decode]
/// * [`Io`](FormatError::Io) if the file can't be opened
/// * [`Sidecar`](FormatError::Sidecar) if the sidecar exists but can't be read under
///   [Sidecar::Strict]
#[tracing::instrument(skip_all, fields(path = ?path.as_ref()))]
pub fn read(path: impl AsRef<Path>, options: &ReadOptions) -> Result<GeometryData, FormatError> {
    let path = path.as_ref();
    let mut data = decode(BufReader::new(File::open(path)?), options)?;
    tracing::debug!(
        vertices = data.vertex_count(),
        indices = data.index_count(),
        meshes = data.meshes().len(),
        "read geometry"
    );

    let sidecar = sidecar_path(path);
    if options.sidecar == Sidecar::Disabled || sidecar == path || !sidecar.is_file() {
        return Ok(data);
    }
    let materials = match read_materials(&sidecar) {
        Ok(m) => m,
        Err(e) if options.sidecar == Sidecar::BestEffort => {
            tracing::warn!(sidecar = ?sidecar, error = %e, "couldn't read material sidecar");
            return Ok(data);
        }
        Err(e) => {
            return Err(FormatError::Sidecar {
                path: sidecar,
                source: Box::new(e),
            })
        }
    };
    if materials.len() != data.meshes.len() {
        tracing::warn!(
            materials = materials.len(),
            meshes = data.meshes.len(),
            "material sidecar doesn't match mesh count"
        );
    }
    for (mesh, material) in data.meshes.iter_mut().zip(materials) {
        mesh.material = material;
    }
    Ok(data)
}

/// Read a material sidecar written by [write_materials](crate::ser::write_materials).
pub fn read_materials(path: impl AsRef<Path>) -> Result<Vec<MaterialRef>, FormatError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::{from_bytes, ReadOptions};
    use crate::{format::MAGIC, FormatError};

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = vec![0u8; 64];
        bytes[..4].copy_from_slice(&0x12345001u32.to_le_bytes());
        assert!(matches!(
            from_bytes(&bytes, &ReadOptions::default()),
            Err(FormatError::BadMagic {
                expected: MAGIC,
                found: 0x12345001
            })
        ));
    }

    #[test]
    fn rejects_truncated() {
        let mut bytes = MAGIC.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0; 10]);
        assert!(matches!(
            from_bytes(&bytes, &ReadOptions::default()),
            Err(FormatError::Truncated("bounding box"))
        ));
        assert!(matches!(
            from_bytes(&[0x02, 0x50], &ReadOptions::default()),
            Err(FormatError::Truncated("magic number"))
        ));
    }

    #[test]
    fn empty_geometry() {
        let mut bytes = MAGIC.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0; 24]);
        // components, uvs, vertex size, meshes, vertex bytes, index bytes
        bytes.extend_from_slice(&[0; 6 * 8]);
        let data = from_bytes(&bytes, &ReadOptions::default()).unwrap();
        assert!(data.is_empty());
        assert!(data.meshes().is_empty());
    }
}
