use crate::matrix::Matrix4;

/// Camera angle around the vertical axis after a reset, in degrees.
pub const DEFAULT_ANGLE_X: f32 = 30.0;

/// Camera angle around the horizontal axis after a reset, in degrees.
pub const DEFAULT_ANGLE_Y: f32 = 0.0;

/// Degrees added per drag event along each axis.
pub const DEFAULT_DRAG_STEP: f32 = 1.0;

/// Free-look camera driven by drag events and sliders.
///
/// The two angles are composed into a single global rotation applied before every
/// part matrix. Dragging moves each angle by a fixed step per event regardless of
/// how far the pointer travelled.
///
/// # Example
/// ```
/// use blocky::CameraController;
///
/// let mut camera = CameraController::new();
/// camera.drag(12.0, -3.0);
/// assert_eq!(camera.angle_x, 31.0);
/// assert_eq!(camera.angle_y, -1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CameraController {
    /// Rotation about the vertical (Y) axis in degrees.
    pub angle_x: f32,
    /// Rotation about the horizontal (X) axis in degrees.
    pub angle_y: f32,
    /// Degrees per drag event.
    pub drag_step: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            angle_x: DEFAULT_ANGLE_X,
            angle_y: DEFAULT_ANGLE_Y,
            drag_step: DEFAULT_DRAG_STEP,
        }
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the drag step in degrees per event.
    pub fn drag_step(mut self, step: f32) -> Self {
        self.drag_step = step;
        self
    }

    /// Applies one drag event with screen-space deltas (y grows downward).
    ///
    /// Moving right increases `angle_x`; moving down increases `angle_y`.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.angle_x += step_toward(dx) * self.drag_step;
        self.angle_y += step_toward(dy) * self.drag_step;
    }

    pub fn set_angle_x(&mut self, degrees: f32) {
        self.angle_x = degrees;
    }

    pub fn set_angle_y(&mut self, degrees: f32) {
        self.angle_y = degrees;
    }

    /// Restores the default viewing angles.
    pub fn reset(&mut self) {
        self.angle_x = DEFAULT_ANGLE_X;
        self.angle_y = DEFAULT_ANGLE_Y;
    }

    /// Rotation about Y by `angle_x`, then about X by `angle_y`.
    pub fn global_rotation(&self) -> Matrix4 {
        let mut m = Matrix4::identity();
        m.rotate(self.angle_x, 0.0, 1.0, 0.0)
            .rotate(self.angle_y, 1.0, 0.0, 0.0);
        m
    }
}

fn step_toward(delta: f32) -> f32 {
    if delta > 0.0 {
        1.0
    } else if delta < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    #[test]
    fn drag_steps_ignore_distance() {
        let mut camera = CameraController::new();
        camera.drag(250.0, 0.0);
        camera.drag(0.5, 0.0);
        camera.drag(-3.0, 40.0);
        assert_eq!(camera.angle_x, DEFAULT_ANGLE_X + 1.0);
        assert_eq!(camera.angle_y, 1.0);
    }

    #[test]
    fn stationary_pointer_does_not_rotate() {
        let mut camera = CameraController::new();
        camera.drag(0.0, 0.0);
        assert_eq!(camera, CameraController::new());
    }

    #[test]
    fn global_rotation_applies_y_axis_then_x_axis() {
        let mut camera = CameraController::new();
        camera.set_angle_x(40.0);
        camera.set_angle_y(-25.0);

        let expected = Mat4::from_rotation_y(40f32.to_radians())
            * Mat4::from_rotation_x((-25f32).to_radians());
        let p = Vec3::new(0.2, 0.4, -0.6);
        let got = camera.global_rotation().transform_point(p);
        assert!((got - expected.transform_point3(p)).length() < 1e-5);
    }

    #[test]
    fn reset_restores_default_angles() {
        let mut camera = CameraController::new();
        camera.drag(1.0, 1.0);
        camera.set_angle_x(-170.0);
        camera.reset();
        assert_eq!(camera.angle_x, 30.0);
        assert_eq!(camera.angle_y, 0.0);
    }
}
