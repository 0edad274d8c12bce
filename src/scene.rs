//! Per-frame composition of the figure.
//!
//! [`compose`] is a pure function of the rig, a [`Pose`] snapshot and the camera's
//! global rotation. It walks the rig table once, parents before children, starting
//! each part from its parent's joint-origin frame (or the identity for roots) and
//! applying the part's steps. Nothing survives between frames; the result is a flat
//! list of draw-ready [`PartInstance`]s.

use crate::animation::Pose;
use crate::color::Color;
use crate::geometry::{Shape, Solids};
use crate::matrix::Matrix4;
use crate::raster::Rasterizer;
use crate::rig::{BodyPart, Rig, Step};

/// One resolved body part for this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PartInstance {
    pub part: BodyPart,
    pub shape: Shape,
    pub color: Color,
    /// Local-to-world matrix, including the part's own scale.
    pub model: Matrix4,
    /// Frame captured before the part's scale, for parts that have one.
    pub joint: Option<Matrix4>,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneFrame {
    pub global_rotation: Matrix4,
    /// Instances in rig order.
    pub parts: Vec<PartInstance>,
}

impl SceneFrame {
    pub fn part(&self, part: BodyPart) -> Option<&PartInstance> {
        self.parts.iter().find(|p| p.part == part)
    }

    /// Starts a backend frame and draws every part in order.
    pub fn render(&self, solids: &Solids, backend: &mut impl Rasterizer) {
        backend.begin_frame(self.global_rotation.as_mat4());
        for instance in &self.parts {
            solids
                .get(instance.shape)
                .render(instance.model.as_mat4(), instance.color, backend);
        }
    }
}

/// Resolves every part's matrix for `pose`.
pub fn compose(rig: &Rig, pose: &Pose, global_rotation: Matrix4) -> SceneFrame {
    let mut parts: Vec<PartInstance> = Vec::with_capacity(rig.len());

    for (index, def) in rig.parts().iter().enumerate() {
        let mut matrix = rig
            .parent_index(index)
            .and_then(|parent| parts[parent].joint)
            .unwrap_or_default();
        let mut joint = None;

        for step in def.steps {
            if matches!(step, Step::Joint) {
                joint = Some(matrix);
            }
            step.apply(&mut matrix, pose);
        }

        parts.push(PartInstance {
            part: def.part,
            shape: def.shape,
            color: def.color,
            model: matrix,
            joint,
        });
    }

    SceneFrame {
        global_rotation,
        parts,
    }
}
