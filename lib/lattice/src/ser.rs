//! Writing [GeometryData] to the binary geometry format.
//!
//! See [format](crate::format) for the layout.

mod sidecar;
pub use sidecar::*;

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    marker::PhantomData,
    path::Path,
};

use byteorder::{ByteOrder, LittleEndian, NativeEndian, WriteBytesExt};
use nalgebra::Point3;

use crate::{
    format::{sidecar_path, ByteLayout, Sidecar, MAGIC},
    FormatError, GeometryData,
};

/// Options controlling how geometry is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WriteOptions {
    pub layout: ByteLayout,
    pub sidecar: Sidecar,
}

/// Writes individual format fields in byte order `B`, with `size` fields `size_width` bytes wide.
struct FieldWriter<W, B> {
    inner: W,
    size_width: usize,
    _order: PhantomData<B>,
}

impl<W: Write, B: ByteOrder> FieldWriter<W, B> {
    fn new(inner: W, layout: ByteLayout) -> Self {
        Self {
            inner,
            size_width: layout.size_width(),
            _order: PhantomData,
        }
    }

    #[inline]
    fn u32(&mut self, v: u32) -> Result<(), FormatError> {
        Ok(self.inner.write_u32::<B>(v)?)
    }

    #[inline]
    fn point(&mut self, p: &Point3<f32>) -> Result<(), FormatError> {
        for c in p.iter() {
            self.inner.write_f32::<B>(*c)?;
        }
        Ok(())
    }

    fn size(&mut self, v: usize, what: &'static str) -> Result<(), FormatError> {
        let too_large = |_| FormatError::TooLarge(what);
        match self.size_width {
            8 => self.inner.write_u64::<B>(u64::try_from(v).map_err(too_large)?)?,
            4 => self.inner.write_u32::<B>(u32::try_from(v).map_err(too_large)?)?,
            _ => self.inner.write_u16::<B>(u16::try_from(v).map_err(too_large)?)?,
        }
        Ok(())
    }

    fn indices(&mut self, indices: &[u32]) -> Result<(), FormatError> {
        for i in indices {
            self.u32(*i)?;
        }
        Ok(())
    }
}

/// Write `data` to `writer`.
///
/// # Errors
///
/// * [`Layout`](FormatError::Layout) if `data` fails [validation](GeometryData::validate); nothing
///   is written in this case
/// * [`TooLarge`](FormatError::TooLarge) if a count doesn't fit the layout's `size` fields
/// * [`Io`](FormatError::Io) if `writer` fails
pub fn encode(
    data: &GeometryData,
    writer: impl Write,
    options: &WriteOptions,
) -> Result<(), FormatError> {
    data.validate()?;
    encode_unchecked(data, writer, options.layout)
}

/// Write `data` to a new byte vector.
///
/// # Errors
///
/// Same as [encode].
pub fn to_bytes(data: &GeometryData, options: &WriteOptions) -> Result<Vec<u8>, FormatError> {
    let mut res = Vec::with_capacity(encoded_len(data, options.layout));
    encode(data, &mut res, options)?;
    Ok(res)
}

/// The number of bytes [encode] produces for `data`.
pub fn encoded_len(data: &GeometryData, layout: ByteLayout) -> usize {
    let size = layout.size_width();
    let layout_fields = 3 + 2 * data.layout().components().len();
    4 + 6 * 4
        + layout_fields * size
        + size
        + data.meshes().len() * 8
        + size
        + data.vertex_buffer().len()
        + size
        + data.index_buffer().len() * 4
}

fn encode_unchecked(
    data: &GeometryData,
    writer: impl Write,
    layout: ByteLayout,
) -> Result<(), FormatError> {
    match layout {
        ByteLayout::Portable => {
            encode_fields(data, FieldWriter::<_, LittleEndian>::new(writer, layout))
        }
        ByteLayout::HostNative => {
            encode_fields(data, FieldWriter::<_, NativeEndian>::new(writer, layout))
        }
    }
}

fn encode_fields<W: Write, B: ByteOrder>(
    data: &GeometryData,
    mut w: FieldWriter<W, B>,
) -> Result<(), FormatError> {
    w.u32(MAGIC)?;
    w.point(&data.bounds().mins)?;
    w.point(&data.bounds().maxs)?;

    let vl = data.layout();
    w.size(vl.components().len(), "vertex component count")?;
    w.size(vl.additional_uv_count() as usize, "additional uv count")?;
    w.size(vl.vertex_size_bytes() as usize, "vertex size")?;
    for comp in vl.components() {
        w.size(comp.size_bytes as usize, "component size")?;
        w.size(comp.offset_bytes as usize, "component offset")?;
    }
    tracing::trace!(components = vl.components().len(), "wrote vertex layout");

    w.size(data.meshes().len(), "mesh count")?;
    for mesh in data.meshes() {
        w.u32(mesh.range.index_offset)?;
        w.u32(mesh.range.index_count)?;
    }

    w.size(data.vertex_buffer().len(), "vertex buffer length")?;
    w.inner.write_all(data.vertex_buffer())?;

    let index_bytes = data
        .index_buffer()
        .len()
        .checked_mul(std::mem::size_of::<u32>())
        .ok_or(FormatError::TooLarge("index buffer length"))?;
    w.size(index_bytes, "index buffer length")?;
    w.indices(data.index_buffer())?;
    tracing::trace!(
        vertex_bytes = data.vertex_buffer().len(),
        index_bytes,
        "wrote buffers"
    );
    Ok(())
}

/// Write `data` to a file at `path`, then, if any mesh references a texture, write the material
/// sidecar next to it according to `options.sidecar`.
///
/// `data` is validated before the file is created, and the file is removed again if writing it
/// fails, so a failed call leaves no partial geometry file behind. Under [Sidecar::BestEffort], a
/// failure to write the sidecar is logged and otherwise ignored. The sidecar is never written over
/// the geometry file itself, as would happen for a path already ending in `.json`.
///
/// # Errors
///
/// * any error from [encode]
/// * [`Io`](FormatError::Io) if the file can't be created or written
/// * [`Sidecar`](FormatError::Sidecar) if the sidecar can't be written under [Sidecar::Strict]
/// * [`SidecarCollision`](FormatError::SidecarCollision) if the sidecar path is `path` itself,
///   under [Sidecar::Strict]; the geometry file is still written
#[tracing::instrument(skip_all, fields(path = ?path.as_ref()))]
pub fn write(
    data: &GeometryData,
    path: impl AsRef<Path>,
    options: &WriteOptions,
) -> Result<(), FormatError> {
    let path = path.as_ref();
    data.validate()?;
    tracing::debug!(
        vertices = data.vertex_count(),
        indices = data.index_count(),
        meshes = data.meshes().len(),
        "writing geometry"
    );

    let mut file = BufWriter::new(File::create(path)?);
    let res = encode_unchecked(data, &mut file, options.layout)
        .and_then(|_| file.flush().map_err(FormatError::from));
    if let Err(e) = res {
        drop(file);
        if let Err(rm) = fs::remove_file(path) {
            tracing::warn!(?rm, "couldn't remove partially written geometry file");
        }
        return Err(e);
    }

    if !data.has_materials() {
        return Ok(());
    }
    let sidecar = sidecar_path(path);
    match options.sidecar {
        Sidecar::Disabled => Ok(()),
        _ if sidecar == path => {
            if options.sidecar == Sidecar::Strict {
                return Err(FormatError::SidecarCollision(sidecar));
            }
            tracing::warn!(
                sidecar = ?sidecar,
                "material sidecar would replace the geometry file; not writing it"
            );
            Ok(())
        }
        Sidecar::BestEffort => {
            if let Err(e) = write_materials(data, &sidecar) {
                tracing::warn!(sidecar = ?sidecar, error = %e, "couldn't write material sidecar");
            }
            Ok(())
        }
        Sidecar::Strict => write_materials(data, &sidecar).map_err(|e| FormatError::Sidecar {
            path: sidecar,
            source: Box::new(e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::point;

    use super::{encoded_len, to_bytes, WriteOptions};
    use crate::{format::ByteLayout, DataBuilder, FormatError, LayoutError, MeshRange};

    fn triangle() -> crate::GeometryData {
        let mut builder = DataBuilder::new();
        builder
            .layout_mut()
            .push::<[f32; 3]>()
            .set_vertex_size_bytes(12)
            .set_additional_uv_count(1);
        builder.set_vertex_count(3);
        for (i, p) in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]
            .iter()
            .enumerate()
        {
            builder.write_component(i, 0, p).unwrap();
        }
        builder.resize_index_buffer(3);
        builder.index_buffer_mut().copy_from_slice(&[0, 2, 1]);
        builder.resize_meshes(1);
        builder.set_mesh_range(0, MeshRange::new(0, 3));
        builder.set_bounding_box(point![0.0, 0.0, 0.0], point![1.0, 0.0, 1.0]);
        builder.build().unwrap()
    }

    #[test]
    fn portable_field_order() {
        let data = triangle();
        let bytes = to_bytes(&data, &WriteOptions::default()).unwrap();
        assert_eq!(bytes.len(), encoded_len(&data, ByteLayout::Portable));

        assert_eq!(&bytes[0..4], &[0x02, 0x50, 0x34, 0x12]);
        assert_eq!(&bytes[4..8], &0f32.to_le_bytes());
        assert_eq!(&bytes[16..20], &1f32.to_le_bytes());
        assert_eq!(&bytes[20..24], &0f32.to_le_bytes());
        // component count, additional uvs, vertex size
        assert_eq!(&bytes[28..36], &1u64.to_le_bytes());
        assert_eq!(&bytes[36..44], &1u64.to_le_bytes());
        assert_eq!(&bytes[44..52], &12u64.to_le_bytes());
        // component 0
        assert_eq!(&bytes[52..60], &12u64.to_le_bytes());
        assert_eq!(&bytes[60..68], &0u64.to_le_bytes());
        // meshes
        assert_eq!(&bytes[68..76], &1u64.to_le_bytes());
        assert_eq!(&bytes[76..80], &0u32.to_le_bytes());
        assert_eq!(&bytes[80..84], &3u32.to_le_bytes());
        // vertex buffer
        assert_eq!(&bytes[84..92], &36u64.to_le_bytes());
        assert_eq!(&bytes[92..128], data.vertex_buffer());
        // index buffer
        assert_eq!(&bytes[128..136], &12u64.to_le_bytes());
        assert_eq!(&bytes[136..140], &0u32.to_le_bytes());
        assert_eq!(&bytes[140..144], &2u32.to_le_bytes());
        assert_eq!(&bytes[144..148], &1u32.to_le_bytes());
        assert_eq!(bytes.len(), 148);
    }

    #[test]
    fn host_native_size_width() {
        let data = triangle();
        let options = WriteOptions {
            layout: ByteLayout::HostNative,
            ..Default::default()
        };
        let bytes = to_bytes(&data, &options).unwrap();
        assert_eq!(bytes.len(), encoded_len(&data, ByteLayout::HostNative));
        let size = std::mem::size_of::<usize>();
        assert_eq!(&bytes[0..4], &0x12345002u32.to_ne_bytes());
        assert_eq!(&bytes[28..28 + size], &1usize.to_ne_bytes());
    }

    #[test]
    fn invalid_data_writes_nothing() {
        let mut builder = DataBuilder::new();
        builder.resize_index_buffer(3).resize_meshes(1);
        builder.set_mesh_range(0, MeshRange::new(2, 3));
        let data = builder.build().unwrap();
        let mut out = Vec::new();
        let res = super::encode(&data, &mut out, &WriteOptions::default());
        assert!(matches!(
            res,
            Err(FormatError::Layout(LayoutError::MeshOutOfRange { mesh: 0, .. }))
        ));
        assert!(out.is_empty());
    }
}
