//! Visual states: a gradient identity whose focal point drifts slowly inside
//! the container, and the transform that places it each frame.
//!
//! These types avoid any platform paint API. A state only describes *which*
//! gradient to use and *where* it sits; the host builds the real shader from
//! the [`Gradient`] description and binds the transform to it.

use crate::constants::{
    ANCHOR_OFFSET, DURATION_JITTER, DURATION_MIN, FIXED_SCALE, REFERENCE_SIZE, STATE_SPEED_MAX,
    STATE_SPEED_MIN,
};
use crate::easing::Easing;
use crate::error::{require_non_negative, require_positive, ConfigError};
use glam::{Affine2, Vec2};
use rand::prelude::*;
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// Packed ARGB color, `0xAARRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const GRAY: Color = Color(0xff88_8888);
    pub const RED: Color = Color(0xffff_0000);

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Straight (non-premultiplied) RGBA in \[0, 1\].
    pub fn to_rgba(self) -> [f32; 4] {
        let c = |shift: u32| ((self.0 >> shift) & 0xff) as f32 / 255.0;
        [c(16), c(8), c(0), c(24)]
    }
}

/// Renderer-agnostic gradient description.
#[derive(Clone, Debug, PartialEq)]
pub enum Gradient {
    Radial {
        center: Vec2,
        radius: f32,
        colors: SmallVec<[Color; 4]>,
    },
    Linear {
        start: Vec2,
        end: Vec2,
        colors: SmallVec<[Color; 4]>,
        /// Empty means evenly spaced.
        stops: SmallVec<[f32; 4]>,
    },
}

impl Gradient {
    /// Two-color radial gradient filling a `2 * size` square.
    pub fn radial(size: f32, inner: Color, outer: Color) -> Self {
        Gradient::Radial {
            center: Vec2::splat(size),
            radius: size,
            colors: smallvec![inner, outer],
        }
    }

    /// Horizontal three-color gradient with stops at 0, 0.4 and 1.
    pub fn linear(length: f32, c1: Color, c2: Color, c3: Color) -> Self {
        Gradient::Linear {
            start: Vec2::ZERO,
            end: Vec2::new(length, 0.0),
            colors: smallvec![c1, c2, c3],
            stops: smallvec![0.0, 0.4, 1.0],
        }
    }
}

/// Produces a state's gradient on first use. Returning `None` leaves the
/// state inert for that frame; the factory is asked again next frame.
pub type GradientFactory = Box<dyn FnMut() -> Option<Gradient>>;

/// Custom focal target sampler, returning a point in normalized space.
pub type TargetSampler = Box<dyn FnMut(&mut StdRng) -> Vec2>;

/// Distribution new focal targets are drawn from.
pub enum TargetPolicy {
    /// Right edge, anywhere vertically. Suits radial blob gradients.
    Radial,
    /// Past the right end of a line and well below it.
    Line,
    Custom(TargetSampler),
}

impl TargetPolicy {
    pub fn sample(&mut self, rng: &mut StdRng) -> Vec2 {
        match self {
            TargetPolicy::Radial => Vec2::new(
                0.8 + 0.2 * rng.gen_range(0.0..1.0f32),
                rng.gen_range(0.0..1.0f32),
            ),
            TargetPolicy::Line => Vec2::new(
                1.1 + 0.2 * rng.gen_range(0.0..1.0f32),
                4.0 * rng.gen_range(0.0..1.0f32),
            ),
            TargetPolicy::Custom(f) => f(rng),
        }
    }
}

impl fmt::Debug for TargetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetPolicy::Radial => f.write_str("Radial"),
            TargetPolicy::Line => f.write_str("Line"),
            TargetPolicy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Tuning for one visual state.
///
/// - `fixed_scale`: gradient scale at a container as wide as the reference size
/// - `duration_min` / `duration_jitter`: each drift lasts
///   `duration_min + rand(0..duration_jitter)` time units
/// - `speed_min` / `speed_max`: time advances by
///   `dt * (0.5 + speed_min) + dt * speed_max * 2 * amplitude`
/// - `supports_waves`: whether oscillators are visible while this state is current
#[derive(Clone, Debug)]
pub struct StateConfig {
    pub fixed_scale: f32,
    pub duration_min: f32,
    pub duration_jitter: u32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub supports_waves: bool,
    pub easing: Easing,
    pub seed: u64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            fixed_scale: FIXED_SCALE,
            duration_min: DURATION_MIN,
            duration_jitter: DURATION_JITTER,
            speed_min: STATE_SPEED_MIN,
            speed_max: STATE_SPEED_MAX,
            supports_waves: true,
            easing: Easing::default(),
            seed: 0,
        }
    }
}

impl StateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("fixed_scale", self.fixed_scale)?;
        require_positive("duration_min", self.duration_min)?;
        if self.duration_jitter == 0 {
            return Err(ConfigError::ZeroDurationJitter);
        }
        require_non_negative("speed_min", self.speed_min)?;
        require_non_negative("speed_max", self.speed_max)
    }
}

/// A named visual identity that can be cross-faded into and out of.
pub struct VisualState {
    id: i32,
    config: StateConfig,
    factory: GradientFactory,
    targets: TargetPolicy,
    rng: StdRng,
    gradient: Option<Gradient>,
    warned_missing: bool,
    size: Vec2,
    start: Vec2,
    target: Option<Vec2>,
    duration: f32,
    elapsed: f32,
    eased: f32,
    scale: f32,
    offset: Vec2,
    matrix: Affine2,
}

impl fmt::Debug for VisualState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualState")
            .field("id", &self.id)
            .field("targets", &self.targets)
            .field("size", &self.size)
            .field("start", &self.start)
            .field("target", &self.target)
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .field("eased", &self.eased)
            .finish_non_exhaustive()
    }
}

impl VisualState {
    pub fn new(
        id: i32,
        config: StateConfig,
        factory: GradientFactory,
        targets: TargetPolicy,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(id, config, factory, targets))
    }

    fn build(id: i32, config: StateConfig, factory: GradientFactory, targets: TargetPolicy) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            id,
            config,
            factory,
            targets,
            rng,
            gradient: None,
            warned_missing: false,
            size: Vec2::ZERO,
            start: Vec2::ZERO,
            target: None,
            duration: 0.0,
            elapsed: 0.0,
            eased: 0.0,
            scale: 0.0,
            offset: Vec2::ZERO,
            matrix: Affine2::IDENTITY,
        }
    }

    /// Blob-surface state with the default drift and a fixed gradient.
    pub fn radial(id: i32, gradient: Gradient) -> Self {
        Self::build(
            id,
            StateConfig::default(),
            Box::new(move || Some(gradient.clone())),
            TargetPolicy::Radial,
        )
    }

    /// Line-surface state with the default drift and a fixed gradient.
    pub fn line(id: i32, gradient: Gradient) -> Self {
        Self::build(
            id,
            StateConfig::default(),
            Box::new(move || Some(gradient.clone())),
            TargetPolicy::Line,
        )
    }

    /// Advance the drift by `dt` time units. A no-op until the gradient
    /// factory yields something.
    pub fn update(&mut self, dt: f32, amplitude: f32) {
        if self.gradient.is_none() {
            self.gradient = (self.factory)();
            if self.gradient.is_none() {
                if !self.warned_missing {
                    log::warn!("[state {}] gradient factory produced nothing", self.id);
                    self.warned_missing = true;
                }
                return;
            }
        }

        if self.duration == 0.0 || self.elapsed >= self.duration {
            self.begin_cycle();
        }

        let c = &self.config;
        self.elapsed += dt * (0.5 + c.speed_min) + dt * (c.speed_max * 2.0) * amplitude;
        self.elapsed = self.elapsed.min(self.duration);
        self.eased = c.easing.apply(self.elapsed / self.duration);

        self.scale = self.size.x / REFERENCE_SIZE * c.fixed_scale;
        let target = self.target.unwrap_or(self.start);
        let focus = self.start.lerp(target, self.eased);
        self.offset = self.size * focus - Vec2::splat(ANCHOR_OFFSET);

        // Translate to the offset, then scale about the shifted anchor.
        let pivot = self.offset + Vec2::splat(ANCHOR_OFFSET);
        self.matrix = Affine2::from_translation(pivot)
            * Affine2::from_scale(Vec2::splat(self.scale))
            * Affine2::from_translation(-pivot)
            * Affine2::from_translation(self.offset);
    }

    fn begin_cycle(&mut self) {
        self.duration =
            self.rng.gen_range(0..self.config.duration_jitter) as f32 + self.config.duration_min;
        self.elapsed = 0.0;
        let previous = match self.target {
            Some(t) => t,
            None => self.targets.sample(&mut self.rng),
        };
        self.start = previous;
        self.target = Some(self.targets.sample(&mut self.rng));
        log::trace!(
            "[state {}] new drift {:.0}u ({:.2},{:.2}) -> {:?}",
            self.id,
            self.duration,
            self.start.x,
            self.start.y,
            self.target
        );
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    pub fn gradient(&self) -> Option<&Gradient> {
        self.gradient.as_ref()
    }

    pub fn supports_waves(&self) -> bool {
        self.config.supports_waves
    }

    pub fn set_supports_waves(&mut self, supports: bool) {
        self.config.supports_waves = supports;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size.max(Vec2::ZERO);
    }

    /// Size a line-surface state from its drawing rectangle. The gradient's
    /// horizontal reference is the band height and the vertical one the
    /// band width, which is what the line targets are calibrated against.
    pub fn set_line_rect(&mut self, left: f32, top: f32, right: f32, bottom: f32) {
        self.set_size(Vec2::new(bottom - top, right - left));
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn eased_progress(&self) -> f32 {
        self.eased
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Absolute top-left offset of the gradient in container coordinates.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Gradient-local to container transform for the current frame.
    pub fn matrix(&self) -> Affine2 {
        self.matrix
    }
}
