//! # Blocky
//!
//! **An articulated blocky animal, posed by a hierarchical transform rig.**
//!
//! The figure is twelve cubes and a cylinder hat. Each part is placed by chaining
//! translate, rotate and scale operations onto a copy of its parent's joint frame,
//! so turning the neck carries the head and hat along with it. Joint angles come
//! from sliders, time-driven animations, or a walk cycle; a drag-driven camera
//! rotates the whole scene.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> anyhow::Result<()> {
//!     blocky::run(blocky::AppConfig::new().title("Blocky"))
//! }
//! ```
//!
//! ## Without a window
//!
//! Every stage short of the GPU is plain data, so a frame can be composed and
//! inspected directly:
//!
//! ```
//! use blocky::*;
//!
//! let rig = Rig::blocky_animal();
//! let mut controls = Controls::new();
//! controls.apply_input(InputEvent::SliderChanged { slider: Slider::Neck, value: 30.0 });
//!
//! let frame = compose(&rig, &controls.animation.pose(), controls.camera.global_rotation());
//! let mut recorder = DrawRecorder::new();
//! frame.render(&Solids::default(), &mut recorder);
//! assert_eq!(frame.parts.len(), 12);
//! ```

mod animation;
mod app;
mod camera;
mod color;
mod driver;
mod error;
mod geometry;
mod gpu;
mod input;
mod matrix;
mod raster;
mod rig;
mod scene;
mod solid_pass;

pub use animation::{AnimationState, Joint, JointChannel, Pose, WalkCycle};
pub use app::{AppConfig, NO_VSYNC_ENV, run};
pub use camera::CameraController;
pub use color::Color;
pub use driver::{Controls, DiagnosticsSink, FrameDriver, FrameStats, LogSink};
pub use error::BackendError;
pub use geometry::{FaceGroup, RawGeometry, Shape, Solid, Solids, Vertex};
pub use gpu::GpuContext;
pub use input::{InputEvent, InputTranslator, Modifiers, Slider};
pub use matrix::Matrix4;
pub use raster::{DrawCommand, DrawRecorder, Rasterizer};
pub use rig::{BLOCKY_ANIMAL, BodyPart, Channel, PartDef, Rig, RigError, Step, Term};
pub use scene::{PartInstance, SceneFrame, compose};
pub use solid_pass::SolidPass;

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec3};
