//! The in-memory geometry model.

mod bounds;
mod builder;
mod layout;
mod mesh;

pub use bounds::*;
pub use builder::*;
pub use layout::*;
pub use mesh::*;

use std::ops::Range;

use crate::LayoutError;

/// Geometry ready to be written: a bounding box, a vertex layout, a set of meshes indexing a
/// shared index buffer, and the raw vertex and index buffers.
///
/// Constructed through a [DataBuilder] (or read from a file) and immutable thereafter.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GeometryData {
    pub(crate) bounds: BoundingBox,
    pub(crate) layout: VertexLayout,
    pub(crate) meshes: Vec<Mesh>,
    pub(crate) vertices: Vec<u8>,
    pub(crate) indices: Vec<u32>,
}

impl GeometryData {
    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    #[inline]
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    #[inline]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Raw vertex data; `vertex_count() * layout().vertex_size_bytes()` bytes.
    #[inline]
    pub fn vertex_buffer(&self) -> &[u8] {
        &self.vertices
    }

    #[inline]
    pub fn index_buffer(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        vertex_count(&self.layout, &self.vertices)
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Whether both buffers are empty; i.e. nothing was generated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Whether any mesh references at least one texture.
    pub fn has_materials(&self) -> bool {
        self.meshes.iter().any(|m| !m.material.is_empty())
    }

    /// The indices belonging to a mesh, or `None` if `mesh` is out of range or its range
    /// overruns the index buffer.
    pub fn mesh_indices(&self, mesh: usize) -> Option<&[u32]> {
        let range = self.meshes.get(mesh)?.range;
        self.indices
            .get(range.index_offset as usize..range.end() as usize)
    }

    /// Read one component of one vertex as a `T`, through the component's declared offset.
    ///
    /// # Errors
    ///
    /// * [`NoComponent`](LayoutError::NoComponent) if `component` isn't in the layout
    /// * [`SizeMismatch`](LayoutError::SizeMismatch) if `T` isn't the component's size
    /// * [`VertexOutOfRange`](LayoutError::VertexOutOfRange) if `vertex >= self.vertex_count()`
    pub fn component<T: bytemuck::Pod>(
        &self,
        vertex: usize,
        component: usize,
    ) -> Result<T, LayoutError> {
        let range = component_range::<T>(&self.layout, &self.vertices, vertex, component)?;
        Ok(bytemuck::pod_read_unaligned(&self.vertices[range]))
    }

    /// Check every structural invariant the binary format depends on.
    ///
    /// # Errors
    ///
    /// * any error from [VertexLayout::validate]
    /// * [`ZeroSizedVertex`](LayoutError::ZeroSizedVertex) if there's vertex data but no vertex
    ///   size
    /// * [`PartialVertex`](LayoutError::PartialVertex) if the vertex buffer isn't a whole number of
    ///   vertices
    /// * [`MeshOutOfRange`](LayoutError::MeshOutOfRange) if a mesh indexes past the index buffer
    /// * [`InvertedBounds`](LayoutError::InvertedBounds) if the bounding box isn't ordered
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.layout.validate()?;
        let vertex_size = self.layout.vertex_size_bytes();
        if vertex_size == 0 {
            if !self.vertices.is_empty() {
                return Err(LayoutError::ZeroSizedVertex {
                    len: self.vertices.len(),
                });
            }
        } else if self.vertices.len() % vertex_size as usize != 0 {
            return Err(LayoutError::PartialVertex {
                len: self.vertices.len(),
                vertex_size,
            });
        }
        for (mesh, Mesh { range, .. }) in self.meshes.iter().enumerate() {
            if range.end() > self.indices.len() as u64 {
                return Err(LayoutError::MeshOutOfRange {
                    mesh,
                    offset: range.index_offset,
                    end: range.end(),
                    len: self.indices.len(),
                });
            }
        }
        if !self.bounds.is_valid() {
            return Err(LayoutError::InvertedBounds(self.bounds));
        }
        Ok(())
    }
}

#[inline]
pub(crate) fn vertex_count(layout: &VertexLayout, vertices: &[u8]) -> usize {
    match layout.vertex_size_bytes() {
        0 => 0,
        size => vertices.len() / size as usize,
    }
}

/// The byte range of one component of one vertex within a vertex buffer.
pub(crate) fn component_range<T>(
    layout: &VertexLayout,
    vertices: &[u8],
    vertex: usize,
    component: usize,
) -> Result<Range<usize>, LayoutError> {
    let comp = layout
        .component(component)
        .ok_or(LayoutError::NoComponent(component))?;
    if comp.size_bytes as usize != std::mem::size_of::<T>() {
        return Err(LayoutError::SizeMismatch {
            size: comp.size_bytes,
            type_size: std::mem::size_of::<T>(),
        });
    }
    let count = vertex_count(layout, vertices);
    if vertex >= count {
        return Err(LayoutError::VertexOutOfRange { vertex, count });
    }
    let start = vertex * layout.vertex_size_bytes() as usize + comp.offset_bytes as usize;
    let end = start + comp.size_bytes as usize;
    if comp.end() > layout.vertex_size_bytes() as u64 {
        return Err(LayoutError::ComponentOverflow {
            index: component,
            end: comp.end(),
            vertex_size: layout.vertex_size_bytes(),
        });
    }
    Ok(start..end)
}
