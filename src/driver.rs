//! The per-frame pipeline and the state it drives.
//!
//! [`Controls`] owns everything that persists between frames and is the single
//! entry point for input. [`FrameDriver`] runs one frame: advance the animation
//! clock, snapshot the pose, compose the scene and hand it to a rasterizer.

use std::fmt;
use std::time::{Duration, Instant};

use crate::animation::{AnimationState, Joint};
use crate::camera::CameraController;
use crate::error::BackendError;
use crate::geometry::Solids;
use crate::input::{InputEvent, Slider};
use crate::raster::Rasterizer;
use crate::rig::Rig;
use crate::scene::compose;

/// Animation and camera state, mutated only through [`Controls::apply_input`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Controls {
    pub animation: AnimationState,
    pub camera: CameraController,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::SliderChanged { slider, value } => match slider_joint(slider) {
                Some(joint) => self.animation.set_manual(joint, value),
                None if slider == Slider::CameraX => self.camera.set_angle_x(value),
                None => self.camera.set_angle_y(value),
            },
            InputEvent::DragMove { dx, dy } => self.camera.drag(dx, dy),
            InputEvent::Click { modifiers } => {
                if modifiers.shift {
                    let walking = self.animation.toggle_walk();
                    log::debug!("walk cycle {}", if walking { "on" } else { "off" });
                }
            }
            InputEvent::ToggleAnimation { joint, running } => {
                self.animation.set_running(joint, running)
            }
            InputEvent::Reset => {
                self.animation.reset();
                self.camera.reset();
            }
        }
    }

    /// Current value behind a slider.
    pub fn slider_value(&self, slider: Slider) -> f32 {
        match slider_joint(slider) {
            Some(joint) => self.animation.channel(joint).angle,
            None if slider == Slider::CameraX => self.camera.angle_x,
            None => self.camera.angle_y,
        }
    }
}

fn slider_joint(slider: Slider) -> Option<Joint> {
    match slider {
        Slider::Neck => Some(Joint::Neck),
        Slider::Head => Some(Joint::Head),
        Slider::Hat => Some(Joint::Hat),
        Slider::CameraX | Slider::CameraY => None,
    }
}

/// Time spent composing and submitting one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub duration: Duration,
}

impl FrameStats {
    /// Frames per second implied by this frame's duration, truncated to one decimal.
    /// Zero when the frame took no measurable time.
    pub fn fps(&self) -> f64 {
        let ms = self.duration.as_secs_f64() * 1000.0;
        if ms <= 0.0 {
            return 0.0;
        }
        (10_000.0 / ms).floor() / 10.0
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms: fps: {}", self.duration.as_millis(), self.fps())
    }
}

/// Receives per-frame statistics and fatal backend failures.
pub trait DiagnosticsSink {
    fn frame(&mut self, stats: &FrameStats);
    fn backend_failed(&mut self, error: &BackendError);
}

/// Sends diagnostics to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn frame(&mut self, stats: &FrameStats) {
        log::trace!("{stats}");
    }

    fn backend_failed(&mut self, error: &BackendError) {
        log::error!("rendering backend unavailable: {error}");
    }
}

/// Runs update, compose and render for each frame.
#[derive(Debug)]
pub struct FrameDriver {
    rig: Rig,
    solids: Solids,
    pub controls: Controls,
}

impl FrameDriver {
    pub fn new(rig: Rig, solids: Solids) -> Self {
        Self {
            rig,
            solids,
            controls: Controls::new(),
        }
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn solids(&self) -> &Solids {
        &self.solids
    }

    /// Draws one frame at `elapsed` seconds since start.
    pub fn frame(&mut self, elapsed: f32, backend: &mut impl Rasterizer) -> FrameStats {
        self.controls.animation.update(elapsed);
        let pose = self.controls.animation.pose();

        let start = Instant::now();
        let scene = compose(&self.rig, &pose, self.controls.camera.global_rotation());
        scene.render(&self.solids, backend);

        FrameStats {
            duration: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::raster::DrawRecorder;

    #[test]
    fn sliders_route_to_joints_and_camera() {
        let mut controls = Controls::new();
        controls.animation.set_running(Joint::Neck, true);

        controls.apply_input(InputEvent::SliderChanged {
            slider: Slider::Neck,
            value: 22.0,
        });
        controls.apply_input(InputEvent::SliderChanged {
            slider: Slider::CameraY,
            value: -40.0,
        });

        assert!(!controls.animation.is_running(Joint::Neck));
        assert_eq!(controls.slider_value(Slider::Neck), 22.0);
        assert_eq!(controls.slider_value(Slider::CameraY), -40.0);
        assert_eq!(controls.slider_value(Slider::CameraX), 30.0);
    }

    #[test]
    fn only_shift_click_toggles_walk() {
        let mut controls = Controls::new();
        controls.apply_input(InputEvent::Click {
            modifiers: Modifiers::NONE,
        });
        assert!(!controls.animation.walk().running);

        controls.apply_input(InputEvent::Click {
            modifiers: Modifiers::SHIFT,
        });
        assert!(controls.animation.walk().running);
    }

    #[test]
    fn reset_restores_camera_and_animation() {
        let mut controls = Controls::new();
        controls.apply_input(InputEvent::DragMove { dx: 3.0, dy: 3.0 });
        controls.apply_input(InputEvent::ToggleAnimation {
            joint: Joint::Hat,
            running: true,
        });
        controls.animation.update(1.0);

        controls.apply_input(InputEvent::Reset);
        assert_eq!(controls, Controls::new());
    }

    #[test]
    fn stats_format_floors_both_numbers() {
        let stats = FrameStats {
            duration: Duration::from_micros(16_700),
        };
        assert_eq!(stats.to_string(), "16 ms: fps: 59.8");

        let fast = FrameStats {
            duration: Duration::from_millis(4),
        };
        assert_eq!(fast.to_string(), "4 ms: fps: 250");
    }

    #[test]
    fn zero_duration_reports_zero_fps() {
        let stats = FrameStats::default();
        assert_eq!(stats.fps(), 0.0);
        assert_eq!(stats.to_string(), "0 ms: fps: 0");
    }

    #[test]
    fn frame_advances_animation_and_draws() {
        let mut driver = FrameDriver::new(Rig::blocky_animal(), Solids::default());
        driver.controls.animation.set_running(Joint::Neck, true);

        let mut recorder = DrawRecorder::new();
        driver.frame(1.0, &mut recorder);

        assert_eq!(recorder.frames, 1);
        assert!(!recorder.commands.is_empty());
        let neck = driver.controls.animation.channel(Joint::Neck).angle;
        assert!((neck - 45.0 * 1.0f32.sin()).abs() < 1e-4);
        assert_eq!(
            recorder.global_rotation,
            driver.controls.camera.global_rotation().as_mat4()
        );
    }
}
