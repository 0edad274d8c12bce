//! The rasterization contract the scene renders through.
//!
//! The composer never talks to the GPU directly. It sets one global camera matrix
//! per frame and issues draws that reference a triangle range of a shape's local
//! geometry, a model matrix, and a flat color. [`SolidPass`](crate::SolidPass)
//! implements this on wgpu; [`DrawRecorder`] implements it in memory so poses can
//! be inspected without a device.

use std::ops::Range;

use glam::Mat4;

use crate::color::Color;
use crate::geometry::Shape;

/// A backend that accepts flat-colored triangle draws.
///
/// Depth-tested compositing is assumed, so the order of draws within a frame only
/// matters for reproducibility.
pub trait Rasterizer {
    /// Starts a frame: clears color and depth and sets the global camera matrix
    /// applied before every model matrix.
    fn begin_frame(&mut self, global_rotation: Mat4);

    /// Draws `vertices` (a range into `shape`'s triangle list, three per triangle)
    /// with the given model matrix and color.
    fn draw(&mut self, shape: Shape, vertices: Range<u32>, model: Mat4, color: Color);
}

/// One draw as seen by a [`Rasterizer`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub shape: Shape,
    pub vertices: Range<u32>,
    pub model: Mat4,
    pub color: Color,
}

/// A rasterizer that records frames instead of drawing them.
#[derive(Debug, Default)]
pub struct DrawRecorder {
    pub global_rotation: Mat4,
    pub commands: Vec<DrawCommand>,
    pub frames: usize,
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rasterizer for DrawRecorder {
    fn begin_frame(&mut self, global_rotation: Mat4) {
        self.global_rotation = global_rotation;
        self.commands.clear();
        self.frames += 1;
    }

    fn draw(&mut self, shape: Shape, vertices: Range<u32>, model: Mat4, color: Color) {
        self.commands.push(DrawCommand {
            shape,
            vertices,
            model,
            color,
        });
    }
}
