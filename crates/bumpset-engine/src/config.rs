//! Tuning constants and tick configuration.
//!
//! Every number the player behaviour depends on lives in [`PlayerTuning`].
//! Tunings load from JSON (missing fields fall back to the defaults) and are
//! validated before use.
//!
//! ```
//! use bumpset_engine::config::PlayerTuning;
//!
//! let tuning = PlayerTuning::from_json_str(r#"{ "walk_speed": 4.0 }"#).unwrap();
//! assert_eq!(tuning.walk_speed, 4.0);
//! assert_eq!(tuning.gravity, 0.2);
//! ```

use std::path::Path;

use bumpset_world::geometry::{Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

// ---------------------------------------------------------------------------
// PlayerTuning
// ---------------------------------------------------------------------------

/// Physics, input and scoring constants for the player character.
///
/// Distances are world units, times are ticks. Y grows downward, so the
/// floor is `bounds.bottom()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Added to vertical velocity every tick.
    pub gravity: f32,
    /// Legal area for the player's position.
    pub bounds: Rect,
    pub walk_speed: f32,
    /// A flick of `delta` pixels launches at `delta / flick_divisor`.
    pub flick_divisor: f32,
    /// How long a spike attempt searches for a ball before giving up.
    pub spike_grace_ticks: u32,
    /// Speed the ball leaves a spike with.
    pub spike_speed: f32,
    /// Player velocity after a connected spike.
    pub knockback: Vec2,

    // -- scoring thresholds --
    pub high_point_max_ball_speed_y: f32,
    pub finger_tips_margin: f32,
    pub low_point_min_ball_y: f32,
    pub hang_time_min_frames: u32,
    /// Ball vertical velocity below this counts as rising fast.
    pub upward_max_ball_velocity_y: f32,
    pub speedy_min_speed: f32,

    // -- receiving --
    /// Within this distance of the ball the player stops and bumps.
    pub receive_radius: f32,
    /// The ball must be at or below this height to be returned.
    pub receive_min_ball_y: f32,
    /// Horizontal offset from a serve destination / the partner.
    pub receive_offset_x: f32,
    pub arc_speed_min: f32,
    pub arc_speed_max: f32,

    // -- court --
    /// X of the net. Anything beyond is the opponent's side.
    pub net_x: f32,
    /// The player's x is clamped to at most this after every tick.
    pub net_offset: f32,
    /// Attachment on the net the ball is spiked toward.
    pub spike_point: String,

    // -- presentation --
    pub highlight_priority: i32,
    pub jump_zoom_factor: f32,
    pub jump_zoom_frames: u32,
    pub restore_zoom_frames: u32,

    /// Seed for the receive-arc RNG.
    pub rng_seed: u64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            gravity: 0.2,
            bounds: Rect::new(Vec2::new(-90.0, -80.0), Vec2::new(90.0, 0.0)),
            walk_speed: 3.0,
            flick_divisor: 60.0 * 6.4,
            spike_grace_ticks: 5,
            spike_speed: 10.0,
            knockback: Vec2::new(-1.0, 0.0),
            high_point_max_ball_speed_y: 1.0,
            finger_tips_margin: 2.0,
            low_point_min_ball_y: -15.0,
            hang_time_min_frames: 30,
            upward_max_ball_velocity_y: -3.0,
            speedy_min_speed: 7.5,
            receive_radius: 45.0,
            receive_min_ball_y: -16.0,
            receive_offset_x: 4.0,
            arc_speed_min: 2.0,
            arc_speed_max: 5.0,
            net_x: 0.0,
            net_offset: -12.0,
            spike_point: "SpikePoint".to_owned(),
            highlight_priority: 100,
            jump_zoom_factor: 1.1,
            jump_zoom_frames: 10,
            restore_zoom_frames: 5,
            rng_seed: 0x5EED_B0B5,
        }
    }
}

impl PlayerTuning {
    /// Parse and validate a tuning from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: PlayerTuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The floor height (bottom edge of `bounds`).
    pub fn floor(&self) -> f32 {
        self.bounds.bottom()
    }

    /// Check that the values describe a playable configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("gravity", self.gravity),
            ("walk_speed", self.walk_speed),
            ("flick_divisor", self.flick_divisor),
            ("spike_speed", self.spike_speed),
            ("receive_radius", self.receive_radius),
            ("arc_speed_min", self.arc_speed_min),
            ("arc_speed_max", self.arc_speed_max),
            ("net_offset", self.net_offset),
            ("jump_zoom_factor", self.jump_zoom_factor),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("must be finite, got {value}")));
            }
        }
        if self.bounds.left() >= self.bounds.right() || self.bounds.top() >= self.bounds.bottom()
        {
            return Err(invalid(
                "bounds",
                format!("empty rectangle {:?}", self.bounds),
            ));
        }
        if self.walk_speed <= 0.0 {
            return Err(invalid("walk_speed", "must be positive".to_owned()));
        }
        if self.flick_divisor <= 0.0 {
            return Err(invalid("flick_divisor", "must be positive".to_owned()));
        }
        if self.arc_speed_min <= 0.0 || self.arc_speed_min >= self.arc_speed_max {
            return Err(invalid(
                "arc_speed_min",
                format!(
                    "need 0 < arc_speed_min < arc_speed_max, got {}..{}",
                    self.arc_speed_min, self.arc_speed_max
                ),
            ));
        }
        if self.net_offset < self.bounds.left() {
            return Err(invalid(
                "net_offset",
                format!(
                    "{} is left of the court ({})",
                    self.net_offset,
                    self.bounds.left()
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

// ---------------------------------------------------------------------------
// TickConfig
// ---------------------------------------------------------------------------

/// Configuration for the fixed-timestep scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Seconds per tick. Must be positive and finite.
    pub fixed_dt: f64,
}

impl Default for TickConfig {
    /// 30 Hz.
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 30.0,
        }
    }
}

impl TickConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixed_dt > 0.0 && self.fixed_dt.is_finite() {
            Ok(())
        } else {
            Err(invalid(
                "fixed_dt",
                format!("must be positive and finite, got {}", self.fixed_dt),
            ))
        }
    }

    pub fn ticks_per_second(&self) -> f64 {
        1.0 / self.fixed_dt
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
