use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{FormatError, GeometryData, MaterialRef};

/// Write the material of every mesh in `data` to `path` as a JSON array, in mesh order. Meshes
/// without textures are written with empty paths.
///
/// Unlike [write](super::write), this always writes the file and always reports failure.
pub fn write_materials(data: &GeometryData, path: impl AsRef<Path>) -> Result<(), FormatError> {
    let materials: Vec<&MaterialRef> = data.meshes().iter().map(|m| &m.material).collect();
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut out, &materials)?;
    out.write_all(b"\n")?;
    out.flush()?;
    tracing::trace!(path = ?path.as_ref(), meshes = materials.len(), "wrote material sidecar");
    Ok(())
}
