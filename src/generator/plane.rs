use bytemuck::{Pod, Zeroable};
use nalgebra::{point, vector, Point3, Vector2, Vector3};

use lattice::{DataBuilder, MaterialRef, MeshRange};

use super::Generator;

/// Half the height of a plane's bounding box.
pub const PLANE_HALF_THICKNESS: f32 = 0.1;

/// One vertex of a [PlaneGenerator] mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PlaneVertex {
    /// Position on the XZ plane; `y` is always 0.
    pub position: [f32; 3],
    /// Always [NORMAL](Self::NORMAL).
    pub normal: [f32; 3],
    /// Always [TANGENT](Self::TANGENT).
    pub tangent: [f32; 3],
    /// Always [BINORMAL](Self::BINORMAL).
    pub binormal: [f32; 3],
    /// Grid position scaled by [PlaneGenerator::uv_size].
    pub texcoord: [f32; 2],
}

static_assertions::const_assert_eq!(std::mem::size_of::<PlaneVertex>(), 56);

impl PlaneVertex {
    /// +Y; planes face up.
    pub const NORMAL: Vector3<f32> = vector![0.0, 1.0, 0.0];
    /// +Z
    pub const TANGENT: Vector3<f32> = vector![0.0, 0.0, 1.0];
    /// +X
    pub const BINORMAL: Vector3<f32> = vector![1.0, 0.0, 0.0];

    /// Index of the position component within the vertex layout.
    pub const POSITION_COMPONENT: usize = 0;
    /// Index of the texture coordinate component within the vertex layout.
    pub const TEXCOORD_COMPONENT: usize = 4;

    fn new(position: Point3<f32>, texcoord: Vector2<f32>) -> Self {
        Self {
            position: position.coords.into(),
            normal: Self::NORMAL.into(),
            tangent: Self::TANGENT.into(),
            binormal: Self::BINORMAL.into(),
            texcoord: texcoord.into(),
        }
    }
}

/// A flat, subdivided rectangle on the XZ plane, centered at the origin and facing +Y.
///
/// Vertices form a `(segments.x + 1) × (segments.y + 1)` grid in row-major order; `x` runs along
/// the X axis and `y` along the Z axis. All vertices share the same normal/tangent/binormal frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneGenerator {
    /// Number of subdivisions along X and Z. Each must be at least 1.
    pub segments: Vector2<i32>,
    /// Width (X) and depth (Z). Each must be positive.
    pub size: Vector2<f32>,
    /// Texture coordinate scale across the whole plane.
    pub uv_size: Vector2<f32>,
    /// Material of the plane's single mesh.
    pub material: MaterialRef,
}

impl Default for PlaneGenerator {
    fn default() -> Self {
        Self::new(vector![1, 1], vector![1.0, 1.0], vector![1.0, 1.0])
    }
}

impl PlaneGenerator {
    /// A plane with no material. Parameters are checked when generating, not here.
    pub fn new(segments: Vector2<i32>, size: Vector2<f32>, uv_size: Vector2<f32>) -> Self {
        Self {
            segments,
            size,
            uv_size,
            material: MaterialRef::default(),
        }
    }

    /// Set the material of the generated mesh.
    pub fn with_material(mut self, material: MaterialRef) -> Self {
        self.material = material;
        self
    }

    /// Check parameters in order, returning the first problem found.
    fn validate(&self) -> Result<(), String> {
        if self.segments.x <= 0 || self.segments.y <= 0 {
            return Err(format!(
                "segments must be >= 1, found {}x{}",
                self.segments.x, self.segments.y
            ));
        }
        // written so that NaN fails too
        if !(self.size.x > 0.0 && self.size.y > 0.0) {
            return Err(format!(
                "size must be > 0, found {}x{}",
                self.size.x, self.size.y
            ));
        }
        let (sx, sy) = (self.segments.x as u64, self.segments.y as u64);
        if (sx + 1) * (sy + 1) > u32::MAX as u64 || sx * sy * 6 > u32::MAX as u64 {
            return Err(format!(
                "{sx}x{sy} segments produce more vertices or indices than u32 can address"
            ));
        }
        Ok(())
    }
}

impl Generator for PlaneGenerator {
    #[tracing::instrument(level = "debug", skip(builder))]
    fn populate(&self, builder: &mut DataBuilder) {
        if let Err(msg) = self.validate() {
            tracing::debug!(reason = msg.as_str(), "rejected plane parameters");
            builder.set_error(msg);
            return;
        }
        // validated above to be positive and small enough for u32 indices
        let (sx, sy) = (self.segments.x as u32, self.segments.y as u32);
        let stride = sx + 1;
        let half = self.size / 2.0;

        builder
            .layout_mut()
            .push::<[f32; 3]>() // position
            .push::<[f32; 3]>() // normal
            .push::<[f32; 3]>() // tangent
            .push::<[f32; 3]>() // binormal
            .push::<[f32; 2]>() // texcoord
            .set_vertex_size_bytes(std::mem::size_of::<PlaneVertex>() as u32)
            .set_additional_uv_count(0);
        builder.set_bounding_box(
            point![-half.x, -PLANE_HALF_THICKNESS, -half.y],
            point![half.x, PLANE_HALF_THICKNESS, half.y],
        );

        let vertices: Vec<PlaneVertex> = (0..=sy)
            .flat_map(|y| {
                (0..=sx).map(move |x| {
                    let t = vector![x as f32 / sx as f32, y as f32 / sy as f32];
                    let position = point![
                        -half.x + t.x * self.size.x,
                        0.0,
                        -half.y + t.y * self.size.y
                    ];
                    PlaneVertex::new(position, t.component_mul(&self.uv_size))
                })
            })
            .collect();
        builder.set_vertex_count(vertices.len());
        builder
            .vertex_buffer_mut()
            .copy_from_slice(bytemuck::cast_slice(&vertices));

        let index_count = (sx * sy * 6) as usize;
        builder.resize_index_buffer(index_count);
        let indices = builder.index_buffer_mut();
        let mut i = 0;
        for y in 0..sy {
            for x in 0..sx {
                let base = y * stride + x;
                indices[i..i + 6].copy_from_slice(&[
                    base,
                    base + stride,
                    base + stride + 1,
                    base + stride + 1,
                    base + 1,
                    base,
                ]);
                i += 6;
            }
        }

        builder.resize_meshes(1);
        builder.set_mesh_range(0, MeshRange::new(0, index_count as u32));
        builder.set_material(0, self.material.clone());
    }
}
