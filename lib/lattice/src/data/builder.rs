use nalgebra::Point3;

use super::{component_range, vertex_count};
use crate::{
    BoundingBox, BuildError, GeometryData, LayoutError, MaterialRef, Mesh, MeshRange,
    VertexLayout,
};

/// Mutable staging area for a [GeometryData].
///
/// A generator fills in whichever fields it needs, then the builder is finalized with
/// [build](Self::build). If a generator rejects its input it records the reason with
/// [set_error](Self::set_error) and stops; `build` then yields the error instead of geometry.
#[derive(Debug, Default)]
pub struct DataBuilder {
    data: GeometryData,
    error: String,
}

impl DataBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a validation failure. Later calls overwrite earlier ones.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = message.into();
    }

    /// The recorded validation failure, if any.
    #[inline]
    pub fn error(&self) -> Option<&str> {
        (!self.error.is_empty()).then_some(self.error.as_str())
    }

    pub fn set_bounding_box(&mut self, mins: Point3<f32>, maxs: Point3<f32>) -> &mut Self {
        self.data.bounds = BoundingBox::new(mins, maxs);
        self
    }

    #[inline]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.data.bounds
    }

    #[inline]
    pub fn layout(&self) -> &VertexLayout {
        &self.data.layout
    }

    #[inline]
    pub fn layout_mut(&mut self) -> &mut VertexLayout {
        &mut self.data.layout
    }

    #[inline]
    pub fn set_vertex_size_bytes(&mut self, size: u32) -> &mut Self {
        self.data.layout.set_vertex_size_bytes(size);
        self
    }

    #[inline]
    pub fn set_additional_uv_count(&mut self, count: u32) -> &mut Self {
        self.data.layout.set_additional_uv_count(count);
        self
    }

    /// Resize the vertex buffer to hold `count` vertices of the current vertex size. New bytes are
    /// zeroed.
    pub fn set_vertex_count(&mut self, count: usize) -> &mut Self {
        let len = count * self.data.layout.vertex_size_bytes() as usize;
        self.resize_vertex_buffer(len)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        vertex_count(&self.data.layout, &self.data.vertices)
    }

    /// Resize the vertex buffer to `len` bytes. New bytes are zeroed.
    #[inline]
    pub fn resize_vertex_buffer(&mut self, len: usize) -> &mut Self {
        self.data.vertices.resize(len, 0);
        self
    }

    #[inline]
    pub fn vertex_buffer_mut(&mut self) -> &mut [u8] {
        &mut self.data.vertices
    }

    /// Resize the index buffer to `count` elements. New indices are zeroed.
    #[inline]
    pub fn resize_index_buffer(&mut self, count: usize) -> &mut Self {
        self.data.indices.resize(count, 0);
        self
    }

    #[inline]
    pub fn index_buffer_mut(&mut self) -> &mut [u32] {
        &mut self.data.indices
    }

    /// Resize the mesh list to `count` meshes. New meshes have empty ranges and no material.
    #[inline]
    pub fn resize_meshes(&mut self, count: usize) -> &mut Self {
        self.data.meshes.resize_with(count, Mesh::default);
        self
    }

    #[inline]
    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.data.meshes
    }

    /// Set the index range of an existing mesh. Returns `false` if there's no such mesh.
    pub fn set_mesh_range(&mut self, mesh: usize, range: MeshRange) -> bool {
        match self.data.meshes.get_mut(mesh) {
            Some(m) => {
                m.range = range;
                true
            }
            None => false,
        }
    }

    /// Set the material of an existing mesh. Returns `false` if there's no such mesh.
    pub fn set_material(&mut self, mesh: usize, material: MaterialRef) -> bool {
        match self.data.meshes.get_mut(mesh) {
            Some(m) => {
                m.material = material;
                true
            }
            None => false,
        }
    }

    /// Write one component of one vertex, through the component's declared offset.
    ///
    /// # Errors
    ///
    /// Same as [GeometryData::component].
    pub fn write_component<T: bytemuck::Pod>(
        &mut self,
        vertex: usize,
        component: usize,
        value: &T,
    ) -> Result<(), LayoutError> {
        let range =
            component_range::<T>(&self.data.layout, &self.data.vertices, vertex, component)?;
        self.data.vertices[range].copy_from_slice(bytemuck::bytes_of(value));
        Ok(())
    }

    /// Write a whole vertex record. `V` must be exactly the vertex size.
    ///
    /// # Errors
    ///
    /// * [`SizeMismatch`](LayoutError::SizeMismatch) if `V` isn't the vertex size
    /// * [`VertexOutOfRange`](LayoutError::VertexOutOfRange) if `vertex >= self.vertex_count()`
    pub fn write_vertex<V: bytemuck::Pod>(
        &mut self,
        vertex: usize,
        value: &V,
    ) -> Result<(), LayoutError> {
        let size = self.data.layout.vertex_size_bytes();
        if size as usize != std::mem::size_of::<V>() {
            return Err(LayoutError::SizeMismatch {
                size,
                type_size: std::mem::size_of::<V>(),
            });
        }
        let count = self.vertex_count();
        if vertex >= count {
            return Err(LayoutError::VertexOutOfRange { vertex, count });
        }
        let start = vertex * size as usize;
        let end = start + size as usize;
        self.data.vertices[start..end].copy_from_slice(bytemuck::bytes_of(value));
        Ok(())
    }

    /// Finalize the staged geometry.
    ///
    /// Whatever fields were set are what the result contains; nothing is validated here beyond
    /// the error slot. Use [GeometryData::validate] to check structure.
    ///
    /// # Errors
    ///
    /// * [`InvalidParameter`](BuildError::InvalidParameter) if an error was recorded with
    ///   [set_error](Self::set_error). Staged buffers are discarded.
    pub fn build(self) -> Result<GeometryData, BuildError> {
        if self.error.is_empty() {
            Ok(self.data)
        } else {
            Err(BuildError::InvalidParameter(self.error))
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::point;

    use super::DataBuilder;
    use crate::{BuildError, LayoutError, MeshRange};

    fn staged() -> DataBuilder {
        let mut builder = DataBuilder::new();
        builder
            .layout_mut()
            .push::<[f32; 3]>()
            .push::<[f32; 2]>()
            .set_vertex_size_bytes(20);
        builder.set_vertex_count(3);
        builder
    }

    #[test]
    fn components_land_at_offsets() {
        let mut builder = staged();
        builder.write_component(1, 1, &[0.25f32, 0.75]).unwrap();
        builder.write_component(2, 0, &[1.0f32, 2.0, 3.0]).unwrap();
        let data = builder.build().unwrap();
        assert_eq!(data.vertex_count(), 3);
        assert_eq!(data.component::<[f32; 2]>(1, 1).unwrap(), [0.25, 0.75]);
        assert_eq!(data.component::<[f32; 3]>(2, 0).unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(data.component::<[f32; 3]>(0, 0).unwrap(), [0.0; 3]);
        assert_eq!(&data.vertex_buffer()[32..40], bytemuck::bytes_of(&[0.25f32, 0.75]));
    }

    #[test]
    fn component_errors() {
        let mut builder = staged();
        assert_eq!(
            builder.write_component(0, 1, &[0.0f32; 3]),
            Err(LayoutError::SizeMismatch {
                size: 8,
                type_size: 12
            })
        );
        assert_eq!(
            builder.write_component(3, 0, &[0.0f32; 3]),
            Err(LayoutError::VertexOutOfRange {
                vertex: 3,
                count: 3
            })
        );
        assert_eq!(
            builder.write_component(0, 2, &0u8),
            Err(LayoutError::NoComponent(2))
        );
        assert!(builder.write_vertex(0, &[0u8; 16]).is_err());
        assert!(builder.write_vertex(2, &[7u8; 20]).is_ok());
    }

    #[test]
    fn error_discards_geometry() {
        let mut builder = staged();
        builder.resize_index_buffer(3);
        builder.set_error("first");
        builder.set_error("second");
        assert_eq!(builder.error(), Some("second"));
        assert_eq!(
            builder.build(),
            Err(BuildError::InvalidParameter("second".into()))
        );
    }

    #[test]
    fn meshes_and_bounds() {
        let mut builder = DataBuilder::new();
        assert_eq!(builder.error(), None);
        builder.resize_index_buffer(6).resize_meshes(2);
        assert!(builder.set_mesh_range(1, MeshRange::new(3, 3)));
        assert!(!builder.set_mesh_range(2, MeshRange::new(0, 3)));
        builder.set_bounding_box(point![-1.0, -1.0, -1.0], point![1.0, 1.0, 1.0]);
        let data = builder.build().unwrap();
        assert_eq!(data.meshes().len(), 2);
        assert_eq!(data.mesh_indices(1), Some(&[0u32, 0, 0][..]));
        assert!(data.validate().is_ok());
        assert!(!data.has_materials());
    }
}
