//! Purpose: Spiral sketch configuration as carried by a shareable link.
//! Exports: `SketchParams`, `Range`, and the per-key range constants.
//! Role: Consumer of `QueryCodec`; maps query keys to clamped slider settings and back.
//! Invariants: Missing keys and values without an integer reading fall back to defaults.
//! Invariants: Size, count, pitch and speed are clamped; angle wraps into `0..360`.
//! Notes: Pitch is stored in hundredths and speed in thousandths of the slider value.
use serde::Serialize;

use crate::core::codec::QueryCodec;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Range {
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl Range {
    pub fn clamp(self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }
}

pub const SIZE: Range = Range {
    min: 1,
    max: 50,
    default: 10,
};

pub const COUNT: Range = Range {
    min: 100,
    max: 1000,
    default: 500,
};

pub const PITCH: Range = Range {
    min: 1,
    max: 200,
    default: 180,
};

pub const SPEED: Range = Range {
    min: -100,
    max: 100,
    default: 3,
};

pub const DEFAULT_ANGLE: i64 = 135;

pub const PITCH_SCALE: f64 = 100.0;
pub const SPEED_SCALE: f64 = 1000.0;

/// Query keys in the order the share link writes them.
pub const KEYS: [&str; 5] = ["s", "c", "p", "w", "a"];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct SketchParams {
    pub size: i64,
    pub count: i64,
    pub pitch: i64,
    pub speed: i64,
    pub angle: i64,
}

impl Default for SketchParams {
    fn default() -> Self {
        Self {
            size: SIZE.default,
            count: COUNT.default,
            pitch: PITCH.default,
            speed: SPEED.default,
            angle: DEFAULT_ANGLE,
        }
    }
}

impl SketchParams {
    pub fn from_codec(codec: &QueryCodec) -> Self {
        Self {
            size: read_clamped(codec, "s", SIZE),
            count: read_clamped(codec, "c", COUNT),
            pitch: read_clamped(codec, "p", PITCH),
            speed: read_clamped(codec, "w", SPEED),
            angle: read_integer(codec, "a")
                .map(wrap_angle)
                .unwrap_or(DEFAULT_ANGLE),
        }
        .normalized()
    }

    /// Clamps every field into its range, as the sliders would.
    pub fn normalized(self) -> Self {
        Self {
            size: SIZE.clamp(self.size),
            count: COUNT.clamp(self.count),
            pitch: PITCH.clamp(self.pitch),
            speed: SPEED.clamp(self.speed),
            angle: wrap_angle(self.angle),
        }
    }

    /// Radial step between seeds, in pixels.
    pub fn pitch_step(&self) -> f64 {
        self.pitch as f64 / PITCH_SCALE
    }

    /// Angle change per frame, in degrees.
    pub fn speed_step(&self) -> f64 {
        self.speed as f64 / SPEED_SCALE
    }

    pub fn to_codec(&self) -> QueryCodec {
        let values = [self.size, self.count, self.pitch, self.speed, self.angle];
        KEYS.into_iter().zip(values).collect()
    }

    /// `href` attribute value for the sketch's share link. Carries the current
    /// angle; older links always wrote `a=180`.
    pub fn share_href(&self) -> String {
        self.to_codec().to_html()
    }
}

fn read_clamped(codec: &QueryCodec, key: &str, range: Range) -> i64 {
    read_integer(codec, key).map_or(range.default, |value| range.clamp(value))
}

fn read_integer(codec: &QueryCodec, key: &str) -> Option<i64> {
    match codec.get_integer(key)? {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(key, error = %err, "using default for sketch parameter");
            None
        }
    }
}

fn wrap_angle(angle: i64) -> i64 {
    angle.rem_euclid(360)
}
