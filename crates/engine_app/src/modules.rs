//! Modules the demo composes on top of [`TransformModule`](engine_math::TransformModule).

use engine_ecs::{ComponentSchema, Module, StateKind};
use engine_math::Vec3;

/// Component name for linear velocity ([`Vec3`], units per second).
pub const VELOCITY: &str = "velocity";

/// Ballistic motion: a `velocity` component and world-wide forces.
pub struct Motion;

#[derive(Debug, Clone)]
pub struct MotionGlobals {
    /// Acceleration applied to every moving body.
    pub gravity: Vec3,
    /// Bodies falling below this height are removed.
    pub kill_plane: f32,
}

impl Default for MotionGlobals {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            kill_plane: -50.0,
        }
    }
}

impl Module for Motion {
    const NAME: &'static str = "motion";
    type State = MotionGlobals;
    const STATE: StateKind = StateKind::Globals;

    fn components(schema: &mut ComponentSchema) {
        schema.field::<Vec3>(VELOCITY);
    }
}

/// Frame timing, written by the tick loop before every tick.
pub struct Clock;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClockState {
    /// Seconds covered by the current tick.
    pub dt: f32,
    /// Seconds simulated so far, including the current tick.
    pub elapsed: f64,
}

impl Module for Clock {
    const NAME: &'static str = "clock";
    type State = ClockState;
    const STATE: StateKind = StateKind::Singleton;
}
