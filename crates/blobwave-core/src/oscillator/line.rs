use super::{Bounds, ControlPoint, RadiusRange, SpeedProfile};
use crate::error::{require_non_negative, ConfigError};
use crate::path::Path;
use glam::Vec2;
use rand::prelude::*;

/// Static configuration for an open line wave.
#[derive(Clone, Debug)]
pub struct LineConfig {
    /// Number of spans between nodes; the wave owns `intervals + 1` nodes.
    pub intervals: usize,
    /// Speed scale used when the caller does not supply one.
    pub line_speed_scale: f32,
    pub bounds: Bounds,
    pub speed: SpeedProfile,
    pub seed: u64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            intervals: 7,
            line_speed_scale: 0.7,
            bounds: Bounds::default(),
            speed: SpeedProfile::default(),
            seed: 0,
        }
    }
}

impl LineConfig {
    pub fn with_intervals(intervals: usize, line_speed_scale: f32) -> Self {
        Self {
            intervals,
            line_speed_scale,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_intervals(self.intervals)?;
        require_non_negative("line_speed_scale", self.line_speed_scale)?;
        self.bounds.validate()?;
        self.speed.validate()
    }
}

fn check_intervals(intervals: usize) -> Result<(), ConfigError> {
    if intervals < 1 {
        return Err(ConfigError::PointCount {
            shape: "line",
            min: 1,
            got: intervals,
        });
    }
    Ok(())
}

/// Where a line wave is drawn.
///
/// Node heights rise upward from `baseline`; the filled shape is closed along
/// `bottom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSpan {
    pub left: f32,
    pub right: f32,
    pub baseline: f32,
    pub bottom: f32,
}

/// Open-chain wave animator: `N + 1` nodes spread evenly over a horizontal
/// span, each drifting only in height.
#[derive(Clone, Debug)]
pub struct LineOscillator {
    points: Vec<ControlPoint<f32>>,
    line_speed_scale: f32,
    bounds: Bounds,
    range: RadiusRange,
    speed: SpeedProfile,
    rng: StdRng,
    pinned_y: f32,
    natural_blend: f32,
}

impl LineOscillator {
    pub fn new(config: &LineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut osc = Self {
            points: Vec::new(),
            line_speed_scale: config.line_speed_scale,
            bounds: config.bounds,
            range: config.bounds.resolve(RadiusRange::default()),
            speed: config.speed,
            rng: StdRng::seed_from_u64(config.seed),
            pinned_y: 0.0,
            natural_blend: 1.0,
        };
        osc.init(config.intervals);
        Ok(osc)
    }

    fn init(&mut self, intervals: usize) {
        self.points = vec![
            ControlPoint {
                current: 0.0,
                next: 0.0,
                progress: 0.0,
                speed: 0.0,
            };
            intervals + 1
        ];
        self.regenerate_all();
    }

    fn sample(&mut self) -> (f32, f32) {
        let height = self.range.sample(&mut self.rng);
        let speed = self.speed.sample(&mut self.rng);
        (height, speed)
    }

    /// Resample every node, including the rightmost anchor.
    pub fn regenerate_all(&mut self) {
        for i in 0..self.points.len() {
            let (current, _) = self.sample();
            let (next, speed) = self.sample();
            self.points[i] = ControlPoint {
                current,
                next,
                progress: 0.0,
                speed,
            };
        }
    }

    /// Advance every node. `None` uses this wave's own line speed scale.
    pub fn update(&mut self, amplitude: f32, speed_scale: Option<f32>) {
        let scale = speed_scale.unwrap_or(self.line_speed_scale);
        for i in 0..self.points.len() {
            let step = self.speed.step(self.points[i].speed, amplitude, scale);
            if self.points[i].advance(step) {
                let (next, speed) = self.sample();
                self.points[i].next = next;
                self.points[i].speed = speed;
            }
        }
    }

    /// Replace auto dimensions and resample. Returns whether a resample happened.
    pub fn resize_bounds(&mut self, auto: RadiusRange) -> bool {
        if !self.bounds.any_auto() {
            return false;
        }
        self.range = self.bounds.resolve(auto);
        self.regenerate_all();
        true
    }

    /// Track per-frame auto bounds; existing targets are kept.
    pub fn follow_auto_bounds(&mut self, auto: RadiusRange) {
        if self.bounds.any_auto() {
            self.range = self.bounds.resolve(auto);
        }
    }

    pub fn set_intervals(&mut self, intervals: usize) -> Result<(), ConfigError> {
        check_intervals(intervals)?;
        if intervals != self.intervals() {
            self.init(intervals);
        }
        Ok(())
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Flatten the wave toward a fixed `pinned_y`. A blend of 1 draws the
    /// natural heights, 0 draws a flat line at `pinned_y`.
    pub fn set_pinned(&mut self, pinned_y: f32, natural_blend: f32) {
        self.pinned_y = pinned_y;
        self.natural_blend = if natural_blend.is_nan() {
            1.0
        } else {
            natural_blend.clamp(0.0, 1.0)
        };
    }

    pub fn intervals(&self) -> usize {
        self.points.len() - 1
    }

    pub fn points(&self) -> &[ControlPoint<f32>] {
        &self.points
    }

    pub fn line_speed_scale(&self) -> f32 {
        self.line_speed_scale
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn range(&self) -> RadiusRange {
        self.range
    }

    fn node_x(&self, span: &LineSpan, i: usize) -> f32 {
        let n = self.intervals();
        if i == n {
            span.right
        } else {
            span.left + (span.right - span.left) * (i as f32 / n as f32)
        }
    }

    fn node_y(&self, span: &LineSpan, i: usize) -> f32 {
        let natural = span.baseline - self.points[i].value();
        self.pinned_y + (natural - self.pinned_y) * self.natural_blend
    }

    /// Interpolated node positions, left to right.
    pub fn node_positions(&self, span: &LineSpan) -> Vec<Vec2> {
        (0..self.points.len())
            .map(|i| Vec2::new(self.node_x(span, i), self.node_y(span, i)))
            .collect()
    }

    pub fn path(&self, span: &LineSpan) -> Path {
        let mut path = Path::with_capacity(self.points.len() + 4);
        self.write_path(span, &mut path);
        path
    }

    /// Write the filled wave shape into `path`: bottom edge right to left,
    /// a rise to the first node, one vertical-handle cubic per span, and a
    /// drop back to the bottom-right corner.
    pub fn write_path(&self, span: &LineSpan, path: &mut Path) {
        path.reset();
        path.move_to(Vec2::new(span.right, span.bottom));
        path.line_to(Vec2::new(span.left, span.bottom));

        let mut prev = Vec2::new(self.node_x(span, 0), self.node_y(span, 0));
        path.line_to(prev);
        for i in 1..self.points.len() {
            let cur = Vec2::new(self.node_x(span, i), self.node_y(span, i));
            let mid_x = prev.x + (cur.x - prev.x) / 2.0;
            path.cubic_to(Vec2::new(mid_x, prev.y), Vec2::new(mid_x, cur.y), cur);
            prev = cur;
        }
        path.line_to(Vec2::new(span.right, span.bottom));
    }
}
