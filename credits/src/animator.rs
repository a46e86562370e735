//! Per-line procedural animation.
//!
//! Every visual property of a credit line is a closed-form function of two inputs: the line's
//! current world-space height `y` and the global elapsed time `t`. Nothing here keeps state.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Derived visual state of one line for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinePose {
    pub rotation_y: f32,
    pub position_x: f32,
    pub position_z: f32,
    pub glow_intensity: f32,
}

/// How the twist about the vertical axis follows the line's height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RotationModel {
    /// `(y / speed + peek_offset) * amount`
    Divided {
        speed: f32,
        peek_offset: f32,
        amount: f32,
    },
    /// `(y + peek_offset) * speed`
    Scaled { speed: f32, peek_offset: f32 },
}

impl RotationModel {
    pub fn rotation(self, y: f32) -> f32 {
        match self {
            RotationModel::Divided {
                speed,
                peek_offset,
                amount,
            } => (y / speed + peek_offset) * amount,
            RotationModel::Scaled { speed, peek_offset } => (y + peek_offset) * speed,
        }
    }
}

/// Where the narrow highlight is allowed to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharpBand {
    /// `(-π/R, π/R)`
    Centered,
    /// `(-π/R - offset, π/R - offset)`
    Shifted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimatorParams {
    pub rotation: RotationModel,
    pub wave_speed: f32,
    pub wave_amplitude: f32,
    /// Angular speed of the global side-to-side drift.
    pub drift_speed: f32,
    pub depth_frequency: f32,
    pub depth_phase: f32,
    pub depth_amplitude: f32,
    pub bloom_broad_radius: f32,
    pub bloom_sharp_radius: f32,
    pub bloom_sharp_peek_y_offset: f32,
    pub bloom_sharp_gain: f32,
    pub sharp_band: SharpBand,
}

impl Default for AnimatorParams {
    fn default() -> Self {
        Self::classic()
    }
}

impl AnimatorParams {
    /// Slow twist, highlight band centred on the origin.
    pub const fn classic() -> Self {
        Self {
            rotation: RotationModel::Divided {
                speed: 1.7,
                peek_offset: 0.5,
                amount: 0.5,
            },
            wave_speed: 0.7,
            wave_amplitude: 0.7,
            drift_speed: 0.2,
            depth_frequency: 0.8,
            depth_phase: 0.5,
            depth_amplitude: 0.9,
            bloom_broad_radius: 0.3,
            bloom_sharp_radius: 0.8,
            bloom_sharp_peek_y_offset: 1.0,
            bloom_sharp_gain: 20.0,
            sharp_band: SharpBand::Centered,
        }
    }

    /// Tighter twist peaking lower, with the highlight band shifted down by the peek offset.
    pub const fn shifted() -> Self {
        Self {
            rotation: RotationModel::Scaled {
                speed: 0.2,
                peek_offset: 2.0,
            },
            sharp_band: SharpBand::Shifted,
            ..Self::classic()
        }
    }

    /// Open interval of heights where the sharp highlight may be non-zero.
    pub fn sharp_band_bounds(&self) -> (f32, f32) {
        let half = PI / self.bloom_sharp_radius;
        match self.sharp_band {
            SharpBand::Centered => (-half, half),
            SharpBand::Shifted => (
                -half - self.bloom_sharp_peek_y_offset,
                half - self.bloom_sharp_peek_y_offset,
            ),
        }
    }

    pub fn broad_glow(&self, y: f32) -> f32 {
        (y * self.bloom_broad_radius).cos()
    }

    pub fn sharp_glow(&self, y: f32) -> f32 {
        let (lo, hi) = self.sharp_band_bounds();
        if lo < y && y < hi {
            let peak = (y * self.bloom_sharp_radius + self.bloom_sharp_peek_y_offset).cos();
            (peak * self.bloom_sharp_gain).max(0.0)
        } else {
            0.0
        }
    }

    pub fn glow(&self, y: f32) -> f32 {
        (self.broad_glow(y) + self.sharp_glow(y)).max(0.0)
    }
}

pub fn animate(params: &AnimatorParams, y: f32, t: f32) -> LinePose {
    let drift = (t * params.drift_speed).sin();
    let wave = -(y * params.wave_speed).sin() * params.wave_amplitude;
    LinePose {
        rotation_y: params.rotation.rotation(y),
        position_x: drift + wave,
        position_z: (y * params.depth_frequency + params.depth_phase).cos() * params.depth_amplitude,
        glow_intensity: params.glow(y),
    }
}
