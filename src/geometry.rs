//! Primitive solids: unit-cube and unit-cylinder geometry with per-face shading.
//!
//! Both shapes are generated once as plain triangle lists in local space. Each
//! shape's triangles are split into [`FaceGroup`]s, and every group carries a fixed
//! brightness multiplier. Drawing an instance issues one backend draw per group with
//! the instance color tinted by that multiplier, which gives the flat, faceted look
//! without any lighting model.
//!
//! | Shape      | Extent                                  | Groups                      |
//! |------------|-----------------------------------------|-----------------------------|
//! | `Cube`     | `[0,1]³`, corner at the local origin    | front, back, top, bottom, left, right |
//! | `Cylinder` | radius 0.5 around local Y, `y ∈ [0,1]`  | top cap, bottom cap, sides  |

use std::ops::Range;

use glam::{Mat4, Vec3};

use crate::color::Color;
use crate::raster::Rasterizer;

/// Brightness multipliers for the cube faces, in face order.
pub const CUBE_FACE_SHADES: [f32; 6] = [1.0, 0.85, 0.7, 0.55, 0.4, 0.25];

/// Brightness multiplier for both cylinder caps.
pub const CYLINDER_CAP_SHADE: f32 = 1.0;

/// Brightness multiplier for the cylinder's side quads.
pub const CYLINDER_SIDE_SHADE: f32 = 0.8;

/// Segment count used when none is configured.
pub const DEFAULT_CYLINDER_SEGMENTS: u32 = 12;

/// Fewest sides a cylinder can be built with.
pub const MIN_CYLINDER_SEGMENTS: u32 = 3;

/// A position-only vertex. Shading comes from the per-draw color, so nothing else
/// is needed per vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    /// Vertex buffer layout: one `Float32x3` position at shader location 0.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
        }
    }
}

/// The kinds of solid a body part can be built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Cube,
    Cylinder,
}

impl Shape {
    pub const ALL: [Shape; 2] = [Shape::Cube, Shape::Cylinder];
}

/// A contiguous run of triangles sharing one brightness multiplier.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceGroup {
    pub name: &'static str,
    /// Vertex range within the owning geometry (three vertices per triangle).
    pub vertices: Range<u32>,
    pub shade: f32,
}

/// Triangle-list geometry in local space, grouped by face.
#[derive(Clone, Debug)]
pub struct RawGeometry {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<FaceGroup>,
}

impl RawGeometry {
    fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Appends a group of triangles (flattened, three vertices each).
    fn push_group(&mut self, name: &'static str, shade: f32, triangles: &[Vertex]) {
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(triangles);
        let end = self.vertices.len() as u32;
        self.faces.push(FaceGroup {
            name,
            vertices: start..end,
            shade,
        });
    }

    /// The unit cube spanning `[0,1]³`, two triangles per face.
    pub fn cube() -> Self {
        const fn v(x: f32, y: f32, z: f32) -> Vertex {
            Vertex::new(x, y, z)
        }

        #[rustfmt::skip]
        let faces: [(&'static str, [Vertex; 6]); 6] = [
            ("front", [
                v(0.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(1.0, 0.0, 0.0),
                v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(1.0, 1.0, 0.0),
            ]),
            ("back", [
                v(0.0, 0.0, 1.0), v(1.0, 1.0, 1.0), v(1.0, 0.0, 1.0),
                v(0.0, 0.0, 1.0), v(0.0, 1.0, 1.0), v(1.0, 1.0, 1.0),
            ]),
            ("top", [
                v(0.0, 1.0, 0.0), v(1.0, 1.0, 0.0), v(1.0, 1.0, 1.0),
                v(0.0, 1.0, 0.0), v(1.0, 1.0, 1.0), v(0.0, 1.0, 1.0),
            ]),
            ("bottom", [
                v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 0.0, 1.0),
                v(0.0, 0.0, 0.0), v(1.0, 0.0, 1.0), v(0.0, 0.0, 1.0),
            ]),
            ("left", [
                v(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0), v(0.0, 1.0, 1.0),
                v(0.0, 0.0, 0.0), v(0.0, 1.0, 1.0), v(0.0, 1.0, 0.0),
            ]),
            ("right", [
                v(1.0, 0.0, 0.0), v(1.0, 0.0, 1.0), v(1.0, 1.0, 1.0),
                v(1.0, 0.0, 0.0), v(1.0, 1.0, 1.0), v(1.0, 1.0, 0.0),
            ]),
        ];

        let mut geometry = Self::new();
        for ((name, triangles), shade) in faces.iter().zip(CUBE_FACE_SHADES) {
            geometry.push_group(*name, shade, triangles);
        }
        geometry
    }

    /// An N-sided prism of radius 0.5 around the Y axis, from `y = 0` to `y = 1`.
    ///
    /// `segments` below [`MIN_CYLINDER_SEGMENTS`] is raised to the minimum.
    pub fn cylinder(segments: u32) -> Self {
        let segments = segments.max(MIN_CYLINDER_SEGMENTS);
        let rim: Vec<(f32, f32)> = (0..segments)
            .map(|i| {
                let theta = std::f32::consts::TAU * i as f32 / segments as f32;
                (0.5 * theta.cos(), 0.5 * theta.sin())
            })
            .collect();
        let next = |i: usize| rim[(i + 1) % rim.len()];

        let mut top = Vec::with_capacity(rim.len() * 3);
        let mut bottom = Vec::with_capacity(rim.len() * 3);
        let mut sides = Vec::with_capacity(rim.len() * 6);

        for (i, &(x0, z0)) in rim.iter().enumerate() {
            let (x1, z1) = next(i);

            top.extend([
                Vertex::new(0.0, 1.0, 0.0),
                Vertex::new(x1, 1.0, z1),
                Vertex::new(x0, 1.0, z0),
            ]);
            bottom.extend([
                Vertex::new(0.0, 0.0, 0.0),
                Vertex::new(x0, 0.0, z0),
                Vertex::new(x1, 0.0, z1),
            ]);
            sides.extend([
                Vertex::new(x0, 0.0, z0),
                Vertex::new(x0, 1.0, z0),
                Vertex::new(x1, 1.0, z1),
                Vertex::new(x0, 0.0, z0),
                Vertex::new(x1, 1.0, z1),
                Vertex::new(x1, 0.0, z1),
            ]);
        }

        let mut geometry = Self::new();
        geometry.push_group("top", CYLINDER_CAP_SHADE, &top);
        geometry.push_group("bottom", CYLINDER_CAP_SHADE, &bottom);
        geometry.push_group("sides", CYLINDER_SIDE_SHADE, &sides);
        geometry
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns `(min, max)` corners of the bounding box.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for v in &self.vertices {
            let p = Vec3::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }

        (min, max)
    }
}

/// One shape's geometry, ready to be instanced.
#[derive(Clone, Debug)]
pub struct Solid {
    pub shape: Shape,
    pub geometry: RawGeometry,
}

impl Solid {
    /// Issues one draw per face group, tinting `color` by the group's multiplier.
    ///
    /// Nothing is retained between calls; instances are independent.
    pub fn render(&self, model: Mat4, color: Color, backend: &mut impl Rasterizer) {
        for face in &self.geometry.faces {
            backend.draw(
                self.shape,
                face.vertices.clone(),
                model,
                color.shaded(face.shade),
            );
        }
    }
}

/// The generated geometry for every [`Shape`].
#[derive(Clone, Debug)]
pub struct Solids {
    cube: Solid,
    cylinder: Solid,
}

impl Solids {
    pub fn new(cylinder_segments: u32) -> Self {
        Self {
            cube: Solid {
                shape: Shape::Cube,
                geometry: RawGeometry::cube(),
            },
            cylinder: Solid {
                shape: Shape::Cylinder,
                geometry: RawGeometry::cylinder(cylinder_segments),
            },
        }
    }

    pub fn get(&self, shape: Shape) -> &Solid {
        match shape {
            Shape::Cube => &self.cube,
            Shape::Cylinder => &self.cylinder,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Solid> {
        Shape::ALL.into_iter().map(|shape| self.get(shape))
    }
}

impl Default for Solids {
    fn default() -> Self {
        Self::new(DEFAULT_CYLINDER_SEGMENTS)
    }
}
