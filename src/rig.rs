//! The body-part hierarchy as data.
//!
//! A [`Rig`] is an ordered table of [`PartDef`]s. Each part names its parent, its
//! shape and color, and a list of [`Step`]s that build its matrix from the parent's
//! joint-origin frame. Step parameters are [`Term`]s, constants optionally driven by
//! one pose [`Channel`], so the tree shape and every hand-tuned offset live in one
//! place while only the pose varies per frame.
//!
//! A [`Step::Joint`] marks where the part's joint-origin frame is captured. Children
//! start from that frame, which is taken before the part's final scale so they never
//! inherit its squash or stretch.

use thiserror::Error;

use crate::animation::Pose;
use crate::color::Color;
use crate::geometry::Shape;
use crate::matrix::Matrix4;

/// Every rigid piece of the figure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Body,
    Neck,
    Head,
    Hat,
    LeftUpperArm,
    LeftLowerArm,
    RightUpperArm,
    RightLowerArm,
    LeftUpperLeg,
    LeftLowerLeg,
    RightUpperLeg,
    RightLowerLeg,
}

/// A pose value a [`Term`] can be driven by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Neck,
    Head,
    Hat,
    LeftLeg,
    RightLeg,
    BodyZOffset,
    /// The larger of the two leg angles; lifts the body mid-stride.
    LegLift,
}

impl Channel {
    pub fn sample(self, pose: &Pose) -> f32 {
        match self {
            Channel::Neck => pose.neck,
            Channel::Head => pose.head,
            Channel::Hat => pose.hat,
            Channel::LeftLeg => pose.left_leg,
            Channel::RightLeg => pose.right_leg,
            Channel::BodyZOffset => pose.body_z_offset,
            Channel::LegLift => pose.left_leg.max(pose.right_leg),
        }
    }
}

/// `base + gain × channel`, or just `base` when undriven.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Term {
    pub base: f32,
    pub gain: f32,
    pub channel: Option<Channel>,
}

impl Term {
    pub const fn fixed(base: f32) -> Self {
        Self {
            base,
            gain: 0.0,
            channel: None,
        }
    }

    pub const fn driven(base: f32, gain: f32, channel: Channel) -> Self {
        Self {
            base,
            gain,
            channel: Some(channel),
        }
    }

    pub fn eval(&self, pose: &Pose) -> f32 {
        match self.channel {
            Some(channel) => self.base + self.gain * channel.sample(pose),
            None => self.base,
        }
    }
}

/// One operation in a part's matrix construction, composed on the right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Translate([Term; 3]),
    Rotate { degrees: Term, axis: [f32; 3] },
    /// Capture the joint-origin frame children attach to.
    Joint,
    Scale([f32; 3]),
}

impl Step {
    pub const fn translate(x: f32, y: f32, z: f32) -> Self {
        Step::Translate([Term::fixed(x), Term::fixed(y), Term::fixed(z)])
    }

    pub const fn rotate(degrees: f32, x: f32, y: f32, z: f32) -> Self {
        Step::Rotate {
            degrees: Term::fixed(degrees),
            axis: [x, y, z],
        }
    }

    /// A rotation of `gain × channel` degrees.
    pub const fn rotate_by(gain: f32, channel: Channel, x: f32, y: f32, z: f32) -> Self {
        Step::Rotate {
            degrees: Term::driven(0.0, gain, channel),
            axis: [x, y, z],
        }
    }

    pub const fn scale(x: f32, y: f32, z: f32) -> Self {
        Step::Scale([x, y, z])
    }

    /// Applies this step to `matrix`. [`Step::Joint`] leaves it unchanged.
    pub fn apply(&self, matrix: &mut Matrix4, pose: &Pose) {
        match self {
            Step::Translate([x, y, z]) => {
                matrix.translate(x.eval(pose), y.eval(pose), z.eval(pose));
            }
            Step::Rotate { degrees, axis } => {
                matrix.rotate(degrees.eval(pose), axis[0], axis[1], axis[2]);
            }
            Step::Joint => {}
            Step::Scale([x, y, z]) => {
                matrix.scale(*x, *y, *z);
            }
        }
    }
}

/// A body part's place in the hierarchy and how to build its matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartDef {
    pub part: BodyPart,
    pub parent: Option<BodyPart>,
    pub shape: Shape,
    pub color: Color,
    pub steps: &'static [Step],
}

impl PartDef {
    pub fn has_joint(&self) -> bool {
        self.steps.iter().any(|s| matches!(s, Step::Joint))
    }
}

/// Reasons a part table cannot form a rig.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RigError {
    #[error("body part {0:?} is declared more than once")]
    DuplicatePart(BodyPart),
    #[error("{part:?} attaches to {parent:?}, which is not in the rig")]
    MissingParent { part: BodyPart, parent: BodyPart },
    #[error("{part:?} attaches to {parent:?}, which is declared after it")]
    ParentDeclaredLater { part: BodyPart, parent: BodyPart },
    #[error("{part:?} attaches to {parent:?}, which never captures a joint origin")]
    ParentHasNoJoint { part: BodyPart, parent: BodyPart },
    #[error("{0:?} captures its joint origin more than once")]
    MultipleJoints(BodyPart),
}

/// A validated, parent-before-child part table.
#[derive(Clone, Debug)]
pub struct Rig {
    parts: Vec<PartDef>,
    parents: Vec<Option<usize>>,
}

impl Rig {
    /// Validates `parts` and resolves each parent to its table index.
    pub fn new(parts: &[PartDef]) -> Result<Self, RigError> {
        let mut parents = Vec::with_capacity(parts.len());

        for (index, def) in parts.iter().enumerate() {
            if parts[..index].iter().any(|p| p.part == def.part) {
                return Err(RigError::DuplicatePart(def.part));
            }
            if def.steps.iter().filter(|s| matches!(s, Step::Joint)).count() > 1 {
                return Err(RigError::MultipleJoints(def.part));
            }

            let parent_index = match def.parent {
                None => None,
                Some(parent) => {
                    let Some(found) = parts.iter().position(|p| p.part == parent) else {
                        return Err(RigError::MissingParent {
                            part: def.part,
                            parent,
                        });
                    };
                    if found >= index {
                        return Err(RigError::ParentDeclaredLater {
                            part: def.part,
                            parent,
                        });
                    }
                    if !parts[found].has_joint() {
                        return Err(RigError::ParentHasNoJoint {
                            part: def.part,
                            parent,
                        });
                    }
                    Some(found)
                }
            };
            parents.push(parent_index);
        }

        Ok(Self {
            parts: parts.to_vec(),
            parents,
        })
    }

    /// The built-in blocky animal.
    pub fn blocky_animal() -> Self {
        let parents = BLOCKY_ANIMAL
            .iter()
            .map(|def| {
                def.parent
                    .and_then(|parent| BLOCKY_ANIMAL.iter().position(|p| p.part == parent))
            })
            .collect();
        Self {
            parts: BLOCKY_ANIMAL.to_vec(),
            parents,
        }
    }

    pub fn parts(&self) -> &[PartDef] {
        &self.parts
    }

    /// Table index of the part's parent, if it has one.
    pub fn parent_index(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    pub fn index_of(&self, part: BodyPart) -> Option<usize> {
        self.parts.iter().position(|p| p.part == part)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Default for Rig {
    fn default() -> Self {
        Self::blocky_animal()
    }
}

const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
const CLAY: Color = Color::rgba(0.7, 0.3, 0.2, 0.6);
const NAVY: Color = Color::rgba(0.2, 0.3, 0.5, 1.0);
const BLUE: Color = Color::rgba(0.2, 0.2, 0.9, 1.0);

// Offsets are tuned against the corner-origin unit cube.
const BODY: &[Step] = &[
    Step::Translate([
        Term::fixed(-0.25),
        Term::driven(-0.25, 0.003, Channel::LegLift),
        Term::driven(0.5, -0.01, Channel::BodyZOffset),
    ]),
    Step::rotate(-5.0, 1.0, 0.0, 0.0),
    Step::Joint,
    Step::scale(0.5, 0.75, 0.25),
];

const NECK: &[Step] = &[
    Step::translate(0.25, 0.7, 0.04),
    Step::rotate_by(-0.5, Channel::Neck, 0.0, 0.0, 1.0),
    Step::Joint,
    Step::scale(0.15, 0.15, 0.15),
    Step::translate(-0.5, 0.0, 0.001),
];

const HEAD: &[Step] = &[
    Step::translate(0.0, 0.1, -0.07),
    // Pivot about the back of the neck.
    Step::translate(0.0, 0.0, 0.15),
    Step::rotate_by(0.3, Channel::Head, 1.0, 0.0, 0.0),
    Step::translate(0.0, 0.0, -0.15),
    Step::Joint,
    Step::scale(0.3, 0.3, 0.3),
    Step::translate(-0.5, 0.0, -0.001),
];

const HAT: &[Step] = &[
    Step::translate(0.0, 0.3, 0.15),
    Step::rotate_by(1.0, Channel::Hat, 0.0, 0.0, 1.0),
    Step::scale(0.1, 0.11, 0.1),
];

const LEFT_UPPER_ARM: &[Step] = &[
    Step::translate(0.65, 0.275, 0.025),
    Step::Joint,
    Step::rotate(20.0, 0.0, 0.0, 1.0),
    Step::scale(0.15, 0.45, 0.15),
];

const LEFT_LOWER_ARM: &[Step] = &[
    Step::rotate(90.0, 0.0, 1.0, 0.0),
    Step::rotate(-45.0, 1.0, 1.0, 0.0),
    Step::scale(0.15, 0.45, 0.15),
];

const RIGHT_UPPER_ARM: &[Step] = &[
    Step::translate(-0.3, 0.35, 0.0),
    Step::Joint,
    Step::rotate(90.0, 0.0, 1.0, 0.0),
    Step::rotate(30.0, 1.0, 0.0, 1.0),
    Step::scale(0.15, 0.45, 0.15),
];

const RIGHT_LOWER_ARM: &[Step] = &[
    Step::translate(0.0, 0.05, -0.1),
    Step::rotate(90.0, 0.0, 1.0, 0.0),
    Step::rotate(45.0, 1.0, 0.0, 0.0),
    Step::scale(0.15, 0.45, 0.15),
];

const LEFT_UPPER_LEG: &[Step] = &[
    Step::translate(0.299, -0.3, 0.025),
    Step::Translate([
        Term::fixed(0.0),
        Term::fixed(0.0),
        Term::driven(0.0, -0.005, Channel::LeftLeg),
    ]),
    Step::Joint,
    Step::rotate_by(1.0, Channel::LeftLeg, 1.0, 0.0, 0.0),
    Step::scale(0.2, 0.35, 0.2),
];

const LEFT_LOWER_LEG: &[Step] = &[
    Step::Translate([
        Term::fixed(0.00001),
        Term::driven(-0.4115, 0.0025, Channel::LeftLeg),
        Term::driven(0.001, 0.004, Channel::LeftLeg),
    ]),
    Step::rotate_by(-0.5, Channel::LeftLeg, 1.0, 0.0, 0.0),
    Step::scale(0.1999, 0.3999, 0.1999),
];

const RIGHT_UPPER_LEG: &[Step] = &[
    Step::translate(0.001, -0.3, 0.025),
    Step::Translate([
        Term::fixed(0.0),
        Term::fixed(0.0),
        Term::driven(0.0, -0.005, Channel::RightLeg),
    ]),
    Step::Joint,
    Step::rotate_by(1.0, Channel::RightLeg, 1.0, 0.0, 0.0),
    Step::scale(0.2, 0.35, 0.2),
];

const RIGHT_LOWER_LEG: &[Step] = &[
    Step::Translate([
        Term::fixed(0.00001),
        Term::driven(-0.4115, 0.0025, Channel::RightLeg),
        Term::driven(0.001, 0.004, Channel::RightLeg),
    ]),
    Step::rotate_by(-0.5, Channel::RightLeg, 1.0, 0.0, 0.0),
    Step::scale(0.1999, 0.3999, 0.1999),
];

/// The figure, parents first, in draw order.
pub static BLOCKY_ANIMAL: [PartDef; 12] = [
    PartDef {
        part: BodyPart::Body,
        parent: None,
        shape: Shape::Cube,
        color: RED,
        steps: BODY,
    },
    PartDef {
        part: BodyPart::Neck,
        parent: Some(BodyPart::Body),
        shape: Shape::Cube,
        color: CLAY,
        steps: NECK,
    },
    PartDef {
        part: BodyPart::Head,
        parent: Some(BodyPart::Neck),
        shape: Shape::Cube,
        color: CLAY,
        steps: HEAD,
    },
    PartDef {
        part: BodyPart::Hat,
        parent: Some(BodyPart::Head),
        shape: Shape::Cylinder,
        color: NAVY,
        steps: HAT,
    },
    PartDef {
        part: BodyPart::LeftUpperArm,
        parent: Some(BodyPart::Body),
        shape: Shape::Cube,
        color: CLAY,
        steps: LEFT_UPPER_ARM,
    },
    PartDef {
        part: BodyPart::LeftLowerArm,
        parent: Some(BodyPart::LeftUpperArm),
        shape: Shape::Cube,
        color: CLAY,
        steps: LEFT_LOWER_ARM,
    },
    PartDef {
        part: BodyPart::RightUpperArm,
        parent: Some(BodyPart::Body),
        shape: Shape::Cube,
        color: CLAY,
        steps: RIGHT_UPPER_ARM,
    },
    PartDef {
        part: BodyPart::RightLowerArm,
        parent: Some(BodyPart::RightUpperArm),
        shape: Shape::Cube,
        color: CLAY,
        steps: RIGHT_LOWER_ARM,
    },
    PartDef {
        part: BodyPart::LeftUpperLeg,
        parent: Some(BodyPart::Body),
        shape: Shape::Cube,
        color: BLUE,
        steps: LEFT_UPPER_LEG,
    },
    PartDef {
        part: BodyPart::LeftLowerLeg,
        parent: Some(BodyPart::LeftUpperLeg),
        shape: Shape::Cube,
        color: CLAY,
        steps: LEFT_LOWER_LEG,
    },
    PartDef {
        part: BodyPart::RightUpperLeg,
        parent: Some(BodyPart::Body),
        shape: Shape::Cube,
        color: BLUE,
        steps: RIGHT_UPPER_LEG,
    },
    PartDef {
        part: BodyPart::RightLowerLeg,
        parent: Some(BodyPart::RightUpperLeg),
        shape: Shape::Cube,
        color: CLAY,
        steps: RIGHT_LOWER_LEG,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_table_is_valid() {
        let rig = Rig::new(&BLOCKY_ANIMAL).expect("built-in rig validates");
        assert_eq!(rig.len(), 12);
        assert_eq!(rig.parent_index(0), None);

        let builtin = Rig::blocky_animal();
        for i in 0..rig.len() {
            assert_eq!(rig.parent_index(i), builtin.parent_index(i));
        }
    }

    #[test]
    fn tree_shape_matches_the_figure() {
        let rig = Rig::blocky_animal();
        let parent_of = |part| {
            let index = rig.index_of(part).unwrap();
            rig.parent_index(index).map(|p| rig.parts()[p].part)
        };

        assert_eq!(parent_of(BodyPart::Body), None);
        assert_eq!(parent_of(BodyPart::Neck), Some(BodyPart::Body));
        assert_eq!(parent_of(BodyPart::Head), Some(BodyPart::Neck));
        assert_eq!(parent_of(BodyPart::Hat), Some(BodyPart::Head));
        assert_eq!(parent_of(BodyPart::LeftLowerArm), Some(BodyPart::LeftUpperArm));
        assert_eq!(parent_of(BodyPart::RightLowerArm), Some(BodyPart::RightUpperArm));
        assert_eq!(parent_of(BodyPart::LeftLowerLeg), Some(BodyPart::LeftUpperLeg));
        assert_eq!(parent_of(BodyPart::RightLowerLeg), Some(BodyPart::RightUpperLeg));
        for upper in [
            BodyPart::LeftUpperArm,
            BodyPart::RightUpperArm,
            BodyPart::LeftUpperLeg,
            BodyPart::RightUpperLeg,
        ] {
            assert_eq!(parent_of(upper), Some(BodyPart::Body));
        }
    }

    #[test]
    fn terms_follow_their_channel() {
        let pose = Pose {
            left_leg: 4.0,
            right_leg: 11.0,
            body_z_offset: 2.0,
            ..Pose::default()
        };
        assert_eq!(Term::fixed(1.5).eval(&pose), 1.5);
        assert_eq!(Term::driven(1.0, 0.5, Channel::LeftLeg).eval(&pose), 3.0);
        assert_eq!(Term::driven(0.0, 1.0, Channel::LegLift).eval(&pose), 11.0);
        let z = Term::driven(0.5, -0.01, Channel::BodyZOffset).eval(&pose);
        assert!((z - 0.48).abs() < 1e-6);
    }

    const LEAF: &[Step] = &[Step::scale(1.0, 1.0, 1.0)];
    const ROOT: &[Step] = &[Step::Joint, Step::scale(2.0, 2.0, 2.0)];
    const TWICE: &[Step] = &[Step::Joint, Step::Joint];

    fn def(part: BodyPart, parent: Option<BodyPart>, steps: &'static [Step]) -> PartDef {
        PartDef {
            part,
            parent,
            shape: Shape::Cube,
            color: Color::WHITE,
            steps,
        }
    }

    #[test]
    fn rejects_malformed_tables() {
        let duplicate = [
            def(BodyPart::Body, None, ROOT),
            def(BodyPart::Body, None, ROOT),
        ];
        assert_eq!(
            Rig::new(&duplicate).unwrap_err(),
            RigError::DuplicatePart(BodyPart::Body)
        );

        let missing = [def(BodyPart::Neck, Some(BodyPart::Body), LEAF)];
        assert_eq!(
            Rig::new(&missing).unwrap_err(),
            RigError::MissingParent {
                part: BodyPart::Neck,
                parent: BodyPart::Body
            }
        );

        let out_of_order = [
            def(BodyPart::Neck, Some(BodyPart::Body), LEAF),
            def(BodyPart::Body, None, ROOT),
        ];
        assert_eq!(
            Rig::new(&out_of_order).unwrap_err(),
            RigError::ParentDeclaredLater {
                part: BodyPart::Neck,
                parent: BodyPart::Body
            }
        );

        let no_joint = [
            def(BodyPart::Body, None, LEAF),
            def(BodyPart::Neck, Some(BodyPart::Body), LEAF),
        ];
        assert_eq!(
            Rig::new(&no_joint).unwrap_err(),
            RigError::ParentHasNoJoint {
                part: BodyPart::Neck,
                parent: BodyPart::Body
            }
        );

        let twice = [def(BodyPart::Body, None, TWICE)];
        assert_eq!(
            Rig::new(&twice).unwrap_err(),
            RigError::MultipleJoints(BodyPart::Body)
        );
    }
}
