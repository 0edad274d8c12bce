use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::animation::Joint;
use crate::driver::Controls;

/// Degrees a keyboard slider nudge moves its value.
pub const SLIDER_NUDGE: f32 = 5.0;

/// A value the host exposes as a slider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slider {
    CameraX,
    CameraY,
    Neck,
    Head,
    Hat,
}

/// Modifier keys held during a click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };
}

/// A discrete, host-independent input event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A slider was moved to an absolute value.
    SliderChanged { slider: Slider, value: f32 },
    /// The pointer moved by a screen-space delta while the primary button was held.
    DragMove { dx: f32, dy: f32 },
    /// The primary button was pressed.
    Click { modifiers: Modifiers },
    /// A joint's animation was started or stopped.
    ToggleAnimation { joint: Joint, running: bool },
    /// Everything back to defaults.
    Reset,
}

/// Turns winit window events into [`InputEvent`]s.
///
/// Tracks the cursor, the primary button and the modifier keys. The last pointer
/// position is resynchronized whenever the primary button goes down, so a drag
/// always measures from where it started. Keyboard bindings stand in for the
/// sliders and buttons a windowed host lacks:
///
/// | Key            | Event                                 |
/// |----------------|---------------------------------------|
/// | `1` `2` `3`    | toggle neck / head / hat animation    |
/// | `Q` / `A`      | neck slider ± 5°                      |
/// | `W` / `S`      | head slider ± 5°                      |
/// | `E` / `D`      | hat slider ± 5°                       |
/// | arrows         | camera sliders ± 5°                   |
/// | `R`            | reset                                 |
#[derive(Debug, Default)]
pub struct InputTranslator {
    last_pointer: Vec2,
    pointer: Vec2,
    primary_down: bool,
    modifiers: Modifiers,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary_down(&self) -> bool {
        self.primary_down
    }

    /// Translates one window event. `controls` supplies current slider values for
    /// keyboard nudges and animation flags for toggles.
    pub fn translate(&mut self, event: &WindowEvent, controls: &Controls) -> Option<InputEvent> {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.set_modifiers(Modifiers {
                    shift: state.shift_key(),
                    ctrl: state.control_key(),
                    alt: state.alt_key(),
                });
                None
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => Some(self.primary_pressed()),
                ElementState::Released => {
                    self.primary_released();
                    None
                }
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32)
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return None;
                }
                let PhysicalKey::Code(key) = event.physical_key else {
                    return None;
                };
                if event.repeat && !is_nudge(key) {
                    return None;
                }
                key_event(key, controls)
            }
            _ => None,
        }
    }

    /// Presses the primary button at the current pointer position.
    pub fn primary_pressed(&mut self) -> InputEvent {
        self.primary_down = true;
        self.last_pointer = self.pointer;
        InputEvent::Click {
            modifiers: self.modifiers,
        }
    }

    pub fn primary_released(&mut self) {
        self.primary_down = false;
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Moves the pointer to a window position in physical pixels.
    pub fn cursor_moved(&mut self, x: f32, y: f32) -> Option<InputEvent> {
        self.pointer = Vec2::new(x, y);
        if !self.primary_down {
            return None;
        }
        let delta = self.pointer - self.last_pointer;
        self.last_pointer = self.pointer;
        (delta != Vec2::ZERO).then_some(InputEvent::DragMove {
            dx: delta.x,
            dy: delta.y,
        })
    }
}

fn is_nudge(key: KeyCode) -> bool {
    nudge_binding(key).is_some()
}

fn nudge_binding(key: KeyCode) -> Option<(Slider, f32)> {
    let binding = match key {
        KeyCode::KeyQ => (Slider::Neck, SLIDER_NUDGE),
        KeyCode::KeyA => (Slider::Neck, -SLIDER_NUDGE),
        KeyCode::KeyW => (Slider::Head, SLIDER_NUDGE),
        KeyCode::KeyS => (Slider::Head, -SLIDER_NUDGE),
        KeyCode::KeyE => (Slider::Hat, SLIDER_NUDGE),
        KeyCode::KeyD => (Slider::Hat, -SLIDER_NUDGE),
        KeyCode::ArrowRight => (Slider::CameraX, SLIDER_NUDGE),
        KeyCode::ArrowLeft => (Slider::CameraX, -SLIDER_NUDGE),
        KeyCode::ArrowUp => (Slider::CameraY, SLIDER_NUDGE),
        KeyCode::ArrowDown => (Slider::CameraY, -SLIDER_NUDGE),
        _ => return None,
    };
    Some(binding)
}

fn key_event(key: KeyCode, controls: &Controls) -> Option<InputEvent> {
    if let Some((slider, delta)) = nudge_binding(key) {
        return Some(InputEvent::SliderChanged {
            slider,
            value: controls.slider_value(slider) + delta,
        });
    }

    let toggle = |joint| InputEvent::ToggleAnimation {
        joint,
        running: !controls.animation.is_running(joint),
    };
    match key {
        KeyCode::Digit1 => Some(toggle(Joint::Neck)),
        KeyCode::Digit2 => Some(toggle(Joint::Head)),
        KeyCode::Digit3 => Some(toggle(Joint::Hat)),
        KeyCode::KeyR => Some(InputEvent::Reset),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_is_measured_from_press_position() {
        let mut input = InputTranslator::new();

        assert_eq!(input.cursor_moved(100.0, 100.0), None);
        assert_eq!(input.cursor_moved(300.0, 50.0), None);
        assert_eq!(
            input.primary_pressed(),
            InputEvent::Click {
                modifiers: Modifiers::NONE
            }
        );
        assert_eq!(
            input.cursor_moved(305.0, 48.0),
            Some(InputEvent::DragMove { dx: 5.0, dy: -2.0 })
        );
        assert_eq!(input.cursor_moved(305.0, 48.0), None);

        input.primary_released();
        assert!(!input.primary_down());
        assert_eq!(input.cursor_moved(0.0, 0.0), None);
    }

    #[test]
    fn click_carries_held_modifiers() {
        let mut input = InputTranslator::new();
        input.set_modifiers(Modifiers::SHIFT);
        assert_eq!(
            input.primary_pressed(),
            InputEvent::Click {
                modifiers: Modifiers::SHIFT
            }
        );
    }

    #[test]
    fn key_nudges_start_from_current_slider_value() {
        let mut controls = Controls::new();
        controls.apply_input(InputEvent::SliderChanged {
            slider: Slider::Head,
            value: 12.0,
        });

        assert_eq!(
            key_event(KeyCode::KeyW, &controls),
            Some(InputEvent::SliderChanged {
                slider: Slider::Head,
                value: 17.0
            })
        );
        assert_eq!(
            key_event(KeyCode::ArrowLeft, &controls),
            Some(InputEvent::SliderChanged {
                slider: Slider::CameraX,
                value: 25.0
            })
        );
    }

    #[test]
    fn digit_keys_flip_animation_flags() {
        let mut controls = Controls::new();
        let start = key_event(KeyCode::Digit2, &controls).unwrap();
        assert_eq!(
            start,
            InputEvent::ToggleAnimation {
                joint: Joint::Head,
                running: true
            }
        );

        controls.apply_input(start);
        assert_eq!(
            key_event(KeyCode::Digit2, &controls),
            Some(InputEvent::ToggleAnimation {
                joint: Joint::Head,
                running: false
            })
        );
        assert_eq!(key_event(KeyCode::KeyR, &controls), Some(InputEvent::Reset));
        assert_eq!(key_event(KeyCode::KeyZ, &controls), None);
    }
}
