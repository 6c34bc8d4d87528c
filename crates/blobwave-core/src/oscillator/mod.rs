//! Control-point oscillators.
//!
//! Each oscillator owns a fixed-topology array of control points. A point
//! drifts from `current` toward `next`; when its progress reaches 1 the target
//! is committed and a fresh one is sampled from the oscillator's own RNG.
//! Points are independent of each other, which is what makes the outline
//! wobble instead of pulse.

pub mod line;
pub mod ring;

pub use line::*;
pub use ring::*;

use crate::constants::{MAX_SPEED, MIN_SPEED, POINT_SPEED_BASE, POINT_SPEED_SPREAD};
use crate::error::{require_non_negative, ConfigError};
use rand::rngs::StdRng;
use rand::Rng;

/// Linear blend between two values of the same kind.
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(self, other: Self, t: f32) -> Self {
        // Weighted form keeps lerp(a, b, 0) == a bit-for-bit.
        self * (1.0 - t) + other * t
    }
}

/// One animated node.
///
/// `progress` stays in \[0, 1). Rolling over commits `next` into `current`,
/// so the interpolated value is continuous across the rollover instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoint<V> {
    pub current: V,
    pub next: V,
    pub progress: f32,
    pub speed: f32,
}

impl<V: Lerp> ControlPoint<V> {
    pub fn value(&self) -> V {
        self.current.lerp(self.next, self.progress)
    }

    /// Move toward `next` by `step`. Returns true when the transition
    /// completed; the caller then samples a new `next` and `speed`.
    pub(crate) fn advance(&mut self, step: f32) -> bool {
        self.progress += step.max(0.0);
        if self.progress >= 1.0 {
            self.progress = 0.0;
            self.current = self.next;
            true
        } else {
            false
        }
    }
}

/// A radius or height limit: either fixed by configuration or derived from
/// the container each time it changes.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Bound {
    Fixed(f32),
    #[default]
    Auto,
}

impl Bound {
    pub fn is_auto(self) -> bool {
        matches!(self, Bound::Auto)
    }

    pub fn resolve(self, auto: f32) -> f32 {
        match self {
            Bound::Fixed(v) => v,
            Bound::Auto => auto,
        }
    }

    pub(crate) fn validate(self, name: &'static str) -> Result<(), ConfigError> {
        match self {
            Bound::Fixed(v) if !v.is_finite() || v < 0.0 => {
                Err(ConfigError::InvalidRadius { name, value: v })
            }
            _ => Ok(()),
        }
    }
}

/// Closed interval that new radii are sampled from.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RadiusRange {
    pub min: f32,
    pub max: f32,
}

impl RadiusRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Non-negative range with `max >= min`. Auto bounds derived from a tiny
    /// container can come out negative or crossed.
    pub fn sanitized(self) -> Self {
        let min = if self.min.is_finite() { self.min.max(0.0) } else { 0.0 };
        let max = if self.max.is_finite() { self.max.max(min) } else { min };
        Self { min, max }
    }

    pub(crate) fn sample(&self, rng: &mut StdRng) -> f32 {
        self.min + (self.max - self.min) * rng.gen_range(0.0..1.0f32)
    }
}

/// Min/max pair of tagged bounds for one oscillator dimension.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Bounds {
    pub min: Bound,
    pub max: Bound,
}

impl Bounds {
    pub fn fixed(min: f32, max: f32) -> Self {
        Self {
            min: Bound::Fixed(min),
            max: Bound::Fixed(max),
        }
    }

    pub fn any_auto(&self) -> bool {
        self.min.is_auto() || self.max.is_auto()
    }

    /// Concrete range with auto dimensions taken from `auto`.
    pub fn resolve(&self, auto: RadiusRange) -> RadiusRange {
        RadiusRange::new(self.min.resolve(auto.min), self.max.resolve(auto.max)).sanitized()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.min.validate("min_radius")?;
        self.max.validate("max_radius")?;
        if let (Bound::Fixed(min), Bound::Fixed(max)) = (self.min, self.max) {
            if min > max {
                return Err(ConfigError::InvertedRadius { min, max });
            }
        }
        Ok(())
    }
}

/// How fast points move.
///
/// Per frame a point advances by
/// `speed * min_speed + amplitude * speed * max_speed * speed_scale`,
/// where `speed` is re-sampled from `point_base + point_spread * r` on every
/// rollover.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedProfile {
    pub min_speed: f32,
    pub max_speed: f32,
    pub point_base: f32,
    pub point_spread: f32,
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self {
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            point_base: POINT_SPEED_BASE,
            point_spread: POINT_SPEED_SPREAD,
        }
    }
}

impl SpeedProfile {
    #[inline]
    pub fn step(&self, point_speed: f32, amplitude: f32, speed_scale: f32) -> f32 {
        point_speed * self.min_speed + amplitude * point_speed * self.max_speed * speed_scale
    }

    pub(crate) fn sample(&self, rng: &mut StdRng) -> f32 {
        self.point_base + self.point_spread * rng.gen_range(0.0..1.0f32)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("min_speed", self.min_speed)?;
        require_non_negative("max_speed", self.max_speed)?;
        require_non_negative("point_base", self.point_base)?;
        require_non_negative("point_spread", self.point_spread)
    }
}

/// Derive an independent child seed so siblings can be reseeded separately.
#[inline]
pub fn mix_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
