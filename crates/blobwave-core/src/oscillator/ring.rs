use super::{Bounds, ControlPoint, Lerp, RadiusRange, SpeedProfile};
use crate::constants::ANGLE_JITTER;
use crate::error::ConfigError;
use crate::path::Path;
use glam::{Mat2, Vec2};
use rand::prelude::*;

/// Radius plus angle of a ring node. Angles are degrees, clockwise from the
/// 12 o'clock direction in y-down surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Polar {
    pub radius: f32,
    pub angle: f32,
}

impl Lerp for Polar {
    #[inline]
    fn lerp(self, other: Self, t: f32) -> Self {
        Polar {
            radius: self.radius.lerp(other.radius, t),
            angle: self.angle.lerp(other.angle, t),
        }
    }
}

/// Amount the settled auto bounds are pulled inward for this ring, in
/// density-independent units. Lets stacked rings share one container without
/// tracing the same outline.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RadiusInset {
    pub min: f32,
    pub max: f32,
}

impl RadiusInset {
    pub fn apply(&self, range: RadiusRange, density: f32) -> RadiusRange {
        RadiusRange::new(range.min + self.min * density, range.max - self.max * density)
    }
}

/// Static configuration for a closed blob ring.
#[derive(Clone, Debug)]
pub struct RingConfig {
    pub points: usize,
    pub bounds: Bounds,
    pub inset: RadiusInset,
    pub speed: SpeedProfile,
    pub seed: u64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            points: 8,
            bounds: Bounds::default(),
            inset: RadiusInset::default(),
            speed: SpeedProfile::default(),
            seed: 0,
        }
    }
}

impl RingConfig {
    pub fn with_points(points: usize) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_ring_points(self.points)?;
        self.bounds.validate()?;
        self.speed.validate()
    }
}

fn check_ring_points(points: usize) -> Result<(), ConfigError> {
    // A single node has no chord to bend around.
    if points < 2 {
        return Err(ConfigError::PointCount {
            shape: "ring",
            min: 2,
            got: points,
        });
    }
    Ok(())
}

/// Closed-loop blob animator: `N` nodes around a center, each drifting in
/// radius and angle, joined by cubic segments into one smooth outline.
#[derive(Clone, Debug)]
pub struct RingOscillator {
    points: Vec<ControlPoint<Polar>>,
    handle: f32,
    bounds: Bounds,
    range: RadiusRange,
    speed: SpeedProfile,
    rng: StdRng,
}

impl RingOscillator {
    pub fn new(config: &RingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut osc = Self {
            points: Vec::new(),
            handle: 0.0,
            bounds: config.bounds,
            range: config.bounds.resolve(RadiusRange::default()),
            speed: config.speed,
            rng: StdRng::seed_from_u64(config.seed),
        };
        osc.init(config.points);
        Ok(osc)
    }

    fn init(&mut self, n: usize) {
        // Tangent length for a cubic approximating a circular arc of 2π/N.
        self.handle = ((4.0 / 3.0) * (std::f64::consts::PI / (2.0 * n as f64)).tan()) as f32;
        self.points = vec![
            ControlPoint {
                current: Polar::default(),
                next: Polar::default(),
                progress: 0.0,
                speed: 0.0,
            };
            n
        ];
        self.regenerate_all();
    }

    fn sample(&mut self, i: usize) -> (Polar, f32) {
        let slot = 360.0 / self.points.len() as f32;
        let radius = self.range.sample(&mut self.rng);
        let jitter = self.rng.gen_range(-1.0..1.0f32) * slot * ANGLE_JITTER;
        let speed = self.speed.sample(&mut self.rng);
        (
            Polar {
                radius,
                angle: slot * i as f32 + jitter,
            },
            speed,
        )
    }

    /// Resample every node's current and next value and restart its progress.
    pub fn regenerate_all(&mut self) {
        for i in 0..self.points.len() {
            let (current, _) = self.sample(i);
            let (next, speed) = self.sample(i);
            self.points[i] = ControlPoint {
                current,
                next,
                progress: 0.0,
                speed,
            };
        }
    }

    pub fn update(&mut self, amplitude: f32, speed_scale: f32) {
        for i in 0..self.points.len() {
            let step = self
                .speed
                .step(self.points[i].speed, amplitude, speed_scale);
            if self.points[i].advance(step) {
                let (next, speed) = self.sample(i);
                self.points[i].next = next;
                self.points[i].speed = speed;
            }
        }
    }

    /// Apply freshly derived container bounds. Auto dimensions are replaced
    /// and, if any changed, every node is resampled. Returns whether a
    /// resample happened.
    pub fn resize_bounds(&mut self, auto: RadiusRange) -> bool {
        if !self.bounds.any_auto() {
            return false;
        }
        self.range = self.bounds.resolve(auto);
        self.regenerate_all();
        true
    }

    /// Track auto bounds without resampling; only targets sampled later see
    /// the new range.
    pub fn follow_auto_bounds(&mut self, auto: RadiusRange) {
        if self.bounds.any_auto() {
            self.range = self.bounds.resolve(auto);
        }
    }

    /// Change the node count. All nodes are reinitialized.
    pub fn set_point_count(&mut self, points: usize) -> Result<(), ConfigError> {
        check_ring_points(points)?;
        if points != self.points.len() {
            self.init(points);
        }
        Ok(())
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn set_bounds(&mut self, bounds: Bounds) -> Result<(), ConfigError> {
        bounds.validate()?;
        self.bounds = bounds;
        self.range = bounds.resolve(self.range);
        Ok(())
    }

    pub fn set_speed(&mut self, speed: SpeedProfile) -> Result<(), ConfigError> {
        speed.validate()?;
        self.speed = speed;
        Ok(())
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[ControlPoint<Polar>] {
        &self.points
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn range(&self) -> RadiusRange {
        self.range
    }

    pub fn speed(&self) -> SpeedProfile {
        self.speed
    }

    pub fn path(&self, center: Vec2) -> Path {
        let mut path = Path::with_capacity(self.points.len() + 1);
        self.write_path(center, &mut path);
        path
    }

    /// Write the closed outline around `center` into `path`, replacing its
    /// contents. One cubic per adjacent node pair, wrapping last to first.
    pub fn write_path(&self, center: Vec2, path: &mut Path) {
        path.reset();
        let n = self.points.len();
        for i in 0..n {
            let a = self.points[i].value();
            let b = self.points[(i + 1) % n].value();

            let l = self.handle * (a.radius.min(b.radius) + (a.radius - b.radius).abs() / 2.0);
            let rot_a = Mat2::from_angle(a.angle.to_radians());
            let rot_b = Mat2::from_angle(b.angle.to_radians());

            let start = center + rot_a * Vec2::new(0.0, -a.radius);
            let start_handle = center + rot_a * Vec2::new(l, -a.radius);
            let end = center + rot_b * Vec2::new(0.0, -b.radius);
            let end_handle = center + rot_b * Vec2::new(-l, -b.radius);

            if i == 0 {
                path.move_to(start);
            }
            path.cubic_to(start_handle, end_handle, end);
        }
    }
}
