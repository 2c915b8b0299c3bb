//! Fundamental geometric and simulation types.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::{AIM_PITCH_LIMIT, DT};

/// World-space position (meters). y = Up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec3);

/// World-space velocity (m/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub Vec3);

/// Session clock. `elapsed_secs` is undilated: bullet time never slows it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Real session time in seconds.
    pub elapsed_secs: f64,
}

/// Player camera orientation. Forward is -Z when both angles are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    /// Rotation about the vertical axis (radians).
    pub yaw: f32,
    /// Rotation about the camera's horizontal axis (radians), clamped to ±π/2.
    pub pitch: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Distance from the vertical axis through the origin.
    pub fn ring_radius(&self) -> f32 {
        (self.0.x * self.0.x + self.0.z * self.0.z).sqrt()
    }

    /// Height above the ground plane.
    pub fn height(&self) -> f32 {
        self.0.y
    }
}

impl Velocity {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Speed magnitude (m/s).
    pub fn speed(&self) -> f32 {
        self.0.length()
    }
}

impl Aim {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-AIM_PITCH_LIMIT, AIM_PITCH_LIMIT),
        }
    }

    /// Camera rotation, applied yaw first then pitch (YXZ order).
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Unit forward vector of the camera.
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Apply a pointer drag, scaled by the player's sensitivity.
    pub fn apply_delta(&mut self, dx: f32, dy: f32, scale: f32) {
        self.yaw -= dx * scale;
        self.pitch = (self.pitch - dy * scale).clamp(-AIM_PITCH_LIMIT, AIM_PITCH_LIMIT);
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        DT
    }

    /// Real session time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_secs * 1000.0
    }

    /// Advance the real clock by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs = self.tick as f64 * self.dt();
    }
}
