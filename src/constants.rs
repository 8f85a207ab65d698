//! Engine-wide constants
//!
//! Centralized tuning values so magic numbers never hide inside the
//! simulation loop.

/// Physics solver and sleeping defaults
pub mod physics {
    /// Canonical physics tick duration in seconds
    pub const DEFAULT_FIXED_STEP: f64 = 1.0 / 60.0;

    /// Velocity solver iterations per substep
    pub const VELOCITY_SOLVER_ITERATIONS: u32 = 10;

    /// Position solver iterations per substep
    pub const POSITION_SOLVER_ITERATIONS: u32 = 5;

    /// Linear velocity below which a body is considered idle (m/s)
    pub const SLEEP_LINEAR_VELOCITY: f32 = 0.5;

    /// Angular velocity below which a body is considered idle (rad/s)
    pub const SLEEP_ANGULAR_VELOCITY: f32 = 0.5;

    /// Seconds a body must stay idle before it is put to sleep
    pub const TIME_BEFORE_SLEEP: f32 = 1.0;

    /// Default downward gravity (m/s^2)
    pub const DEFAULT_GRAVITY_Y: f32 = -9.81;

    /// Default rigid body mass (kg)
    pub const DEFAULT_MASS: f32 = 1.0;
}
