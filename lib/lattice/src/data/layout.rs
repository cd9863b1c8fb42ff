//! Vertex declarations: how one vertex record is carved into typed regions.

mod attribute;
pub use attribute::*;

use crate::LayoutError;

/// One region of a vertex record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexComponent {
    pub size_bytes: u32,
    pub offset_bytes: u32,
}

impl VertexComponent {
    #[inline]
    pub const fn new(size_bytes: u32, offset_bytes: u32) -> Self {
        Self {
            size_bytes,
            offset_bytes,
        }
    }

    /// The first byte past the end of this component, relative to the start of its vertex.
    #[inline]
    pub const fn end(&self) -> u64 {
        self.offset_bytes as u64 + self.size_bytes as u64
    }
}

/// An ordered list of [VertexComponents](VertexComponent) describing one vertex record.
///
/// No invariants are checked while a layout is being built, so that generators may assemble one
/// piece by piece. Call [validate](Self::validate) (or hand the layout to a writer, which does)
/// once it's complete.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    components: Vec<VertexComponent>,
    vertex_size_bytes: u32,
    additional_uv_count: u32,
}

impl VertexLayout {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component. Components can't be reordered or removed.
    pub fn add_component(&mut self, size_bytes: u32, offset_bytes: u32) -> &mut Self {
        self.components
            .push(VertexComponent::new(size_bytes, offset_bytes));
        self
    }

    /// Append a component of type `T` directly after the last byte of any existing component.
    pub fn push<T: Attribute>(&mut self) -> &mut Self {
        self.push_attribute(T::TYPE, T::COMPONENT)
    }

    /// Append a component of the given shape directly after the last byte of any existing
    /// component.
    pub fn push_attribute(&mut self, ty: AttributeType, comp: AttributeComponent) -> &mut Self {
        let offset = self.packed_size() as u32;
        self.add_component(ty.size_bytes(comp), offset)
    }

    #[inline]
    pub fn set_vertex_size_bytes(&mut self, size: u32) -> &mut Self {
        self.vertex_size_bytes = size;
        self
    }

    #[inline]
    pub fn set_additional_uv_count(&mut self, count: u32) -> &mut Self {
        self.additional_uv_count = count;
        self
    }

    #[inline]
    pub fn components(&self) -> &[VertexComponent] {
        &self.components
    }

    #[inline]
    pub fn component(&self, index: usize) -> Option<&VertexComponent> {
        self.components.get(index)
    }

    #[inline]
    pub fn vertex_size_bytes(&self) -> u32 {
        self.vertex_size_bytes
    }

    /// The number of texture coordinate sets beyond the first.
    #[inline]
    pub fn additional_uv_count(&self) -> u32 {
        self.additional_uv_count
    }

    /// The end of the furthest-reaching component; i.e. the smallest vertex size that fits every
    /// component.
    pub fn packed_size(&self) -> u64 {
        self.components
            .iter()
            .map(VertexComponent::end)
            .max()
            .unwrap_or(0)
    }

    /// Check that component offsets never decrease and that every component fits within
    /// [vertex_size_bytes](Self::vertex_size_bytes).
    ///
    /// # Errors
    ///
    /// * [`ComponentOrder`](LayoutError::ComponentOrder) if a component starts before its
    ///   predecessor
    /// * [`ComponentOverflow`](LayoutError::ComponentOverflow) if a component extends past the end
    ///   of the vertex
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut previous = 0;
        for (index, comp) in self.components.iter().enumerate() {
            if comp.offset_bytes < previous {
                return Err(LayoutError::ComponentOrder {
                    index,
                    offset: comp.offset_bytes,
                    previous,
                });
            }
            if comp.end() > self.vertex_size_bytes as u64 {
                return Err(LayoutError::ComponentOverflow {
                    index,
                    end: comp.end(),
                    vertex_size: self.vertex_size_bytes,
                });
            }
            previous = comp.offset_bytes;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{VertexComponent, VertexLayout};
    use crate::LayoutError;

    #[test]
    fn push_packs_components() {
        let mut layout = VertexLayout::new();
        layout.push::<[f32; 3]>().push::<[u8; 4]>().push::<[f32; 2]>();
        assert_eq!(
            layout.components(),
            &[
                VertexComponent::new(12, 0),
                VertexComponent::new(4, 12),
                VertexComponent::new(8, 16)
            ]
        );
        assert_eq!(layout.packed_size(), 24);
    }

    #[test]
    fn validate_needs_vertex_size() {
        let mut layout = VertexLayout::new();
        layout.push::<[f32; 3]>();
        assert_eq!(
            layout.validate(),
            Err(LayoutError::ComponentOverflow {
                index: 0,
                end: 12,
                vertex_size: 0
            })
        );
        layout.set_vertex_size_bytes(12);
        assert_eq!(layout.validate(), Ok(()));
    }

    #[test]
    fn gaps_and_overlap_allowed() {
        let mut layout = VertexLayout::new();
        layout
            .add_component(8, 0)
            .add_component(4, 4)
            .add_component(4, 28)
            .set_vertex_size_bytes(32);
        assert_eq!(layout.validate(), Ok(()));
    }

    #[test]
    fn decreasing_offsets() {
        let mut layout = VertexLayout::new();
        layout
            .add_component(4, 8)
            .add_component(4, 4)
            .set_vertex_size_bytes(16);
        assert_eq!(
            layout.validate(),
            Err(LayoutError::ComponentOrder {
                index: 1,
                offset: 4,
                previous: 8
            })
        );
    }
}
