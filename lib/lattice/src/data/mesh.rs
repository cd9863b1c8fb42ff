use serde::{Deserialize, Serialize};

/// A slice of the shared index buffer identifying one drawable sub-mesh.
///
/// `index_offset` counts elements, not bytes. Ranges of different meshes may overlap; only
/// `index_offset + index_count <= index buffer length` is enforced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshRange {
    pub index_offset: u32,
    pub index_count: u32,
}

impl MeshRange {
    #[inline]
    pub const fn new(index_offset: u32, index_count: u32) -> Self {
        Self {
            index_offset,
            index_count,
        }
    }

    /// One past the last index element covered by this range.
    #[inline]
    pub const fn end(&self) -> u64 {
        self.index_offset as u64 + self.index_count as u64
    }
}

/// Texture paths used to render a mesh. An empty path means the map isn't present.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRef {
    #[serde(default)]
    pub diffuse_map: String,
    #[serde(default)]
    pub normal_map: String,
    #[serde(default)]
    pub specular_map: String,
}

impl MaterialRef {
    /// Whether no texture path is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diffuse_map.is_empty() && self.normal_map.is_empty() && self.specular_map.is_empty()
    }
}

/// A [MeshRange] and the material it's rendered with.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Mesh {
    pub range: MeshRange,
    pub material: MaterialRef,
}

impl Mesh {
    #[inline]
    pub fn new(range: MeshRange) -> Self {
        Self {
            range,
            material: MaterialRef::default(),
        }
    }

    #[inline]
    pub fn with_material(mut self, material: MaterialRef) -> Self {
        self.material = material;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::MaterialRef;

    #[test]
    fn material_json_fields() {
        let mat = MaterialRef {
            diffuse_map: "brick.png".into(),
            ..Default::default()
        };
        assert!(!mat.is_empty());
        let json = serde_json::to_value(&mat).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "diffuseMap": "brick.png",
                "normalMap": "",
                "specularMap": ""
            })
        );
    }
}
