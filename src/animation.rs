//! Joint angles, their running flags, and the closed-form animations that drive them.
//!
//! Every controlled angle is governed by exactly one source at a time. While its
//! running flag is set, [`AnimationState::update`] recomputes it from elapsed
//! seconds; otherwise it keeps whatever value was last assigned. Assigning a value
//! manually always clears the flag.
//!
//! | Channel | Animation                          |
//! |---------|------------------------------------|
//! | neck    | `45 · sin(t)`                      |
//! | head    | `45 · sin(3t)`                     |
//! | hat     | `20 · sin(2t)`                     |
//! | walk    | right leg `15 − 7.5 · (sin(2t)+1)`, left leg `7.5 · (sin(2t)+1)` |
//!
//! The walk cycle also advances a body drift accumulator every update: whichever leg
//! is below half the maximum swing contributes `0.01 ×` its angle. The accumulator
//! never decreases and is only cleared by [`AnimationState::reset`], so sustained
//! walking carries the figure steadily forward.

/// Largest leg swing in degrees during the walk cycle.
pub const WALK_MAX_SWING: f32 = 15.0;

/// Fraction of the pushing leg's angle added to the drift accumulator per update.
pub const WALK_DRIFT_RATE: f32 = 0.01;

/// A joint with its own slider and animation toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Joint {
    Neck,
    Head,
    Hat,
}

impl Joint {
    pub const ALL: [Joint; 3] = [Joint::Neck, Joint::Head, Joint::Hat];

    /// The animated angle at `seconds`.
    pub fn animated_angle(self, seconds: f32) -> f32 {
        match self {
            Joint::Neck => 45.0 * seconds.sin(),
            Joint::Head => 45.0 * (seconds * 3.0).sin(),
            Joint::Hat => 20.0 * (seconds * 2.0).sin(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Joint::Neck => "neck",
            Joint::Head => "head",
            Joint::Hat => "hat",
        }
    }
}

/// One angle and the flag selecting its source.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JointChannel {
    pub angle: f32,
    pub running: bool,
}

/// Leg angles and forward drift for the walk cycle, driven by a single flag.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WalkCycle {
    pub running: bool,
    pub left_leg: f32,
    pub right_leg: f32,
    pub body_z_offset: f32,
}

impl WalkCycle {
    /// Leg angles `(left, right)` at `seconds`.
    pub fn leg_angles(seconds: f32) -> (f32, f32) {
        let half = WALK_MAX_SWING / 2.0;
        let swing = half * ((seconds * 2.0).sin() + 1.0);
        (swing, WALK_MAX_SWING - swing)
    }

    fn advance(&mut self, seconds: f32) {
        let (left, right) = Self::leg_angles(seconds);
        self.left_leg = left;
        self.right_leg = right;

        let half = WALK_MAX_SWING / 2.0;
        if self.right_leg < half {
            self.body_z_offset += WALK_DRIFT_RATE * self.right_leg;
        } else if self.left_leg < half {
            self.body_z_offset += WALK_DRIFT_RATE * self.left_leg;
        }
    }
}

/// An immutable snapshot of every animated value, taken once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub neck: f32,
    pub head: f32,
    pub hat: f32,
    pub left_leg: f32,
    pub right_leg: f32,
    pub body_z_offset: f32,
}

/// The cross-frame animation state of the figure.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationState {
    neck: JointChannel,
    head: JointChannel,
    hat: JointChannel,
    walk: WalkCycle,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(&self, joint: Joint) -> &JointChannel {
        match joint {
            Joint::Neck => &self.neck,
            Joint::Head => &self.head,
            Joint::Hat => &self.hat,
        }
    }

    fn channel_mut(&mut self, joint: Joint) -> &mut JointChannel {
        match joint {
            Joint::Neck => &mut self.neck,
            Joint::Head => &mut self.head,
            Joint::Hat => &mut self.hat,
        }
    }

    pub fn walk(&self) -> &WalkCycle {
        &self.walk
    }

    /// Assigns a joint angle directly and stops its animation.
    pub fn set_manual(&mut self, joint: Joint, angle: f32) {
        let channel = self.channel_mut(joint);
        channel.angle = angle;
        channel.running = false;
    }

    /// Starts or stops a joint's animation. Stopping freezes the current angle.
    pub fn set_running(&mut self, joint: Joint, running: bool) {
        self.channel_mut(joint).running = running;
    }

    pub fn is_running(&self, joint: Joint) -> bool {
        self.channel(joint).running
    }

    pub fn set_walking(&mut self, running: bool) {
        self.walk.running = running;
    }

    /// Flips the walk cycle on or off and returns the new state.
    pub fn toggle_walk(&mut self) -> bool {
        self.walk.running = !self.walk.running;
        self.walk.running
    }

    /// Recomputes every running channel from elapsed wall-clock seconds.
    pub fn update(&mut self, seconds: f32) {
        for joint in Joint::ALL {
            let channel = self.channel_mut(joint);
            if channel.running {
                channel.angle = joint.animated_angle(seconds);
            }
        }
        if self.walk.running {
            self.walk.advance(seconds);
        }
    }

    /// Stops every animation and zeroes all angles and the drift accumulator.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn pose(&self) -> Pose {
        Pose {
            neck: self.neck.angle,
            head: self.head.angle,
            hat: self.hat.angle,
            left_leg: self.walk.left_leg,
            right_leg: self.walk.right_leg,
            body_z_offset: self.walk.body_z_offset,
        }
    }
}
