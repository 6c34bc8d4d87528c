//! Easing curves mapping normalized time to normalized progress.

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 32;
const EPSILON: f64 = 1e-6;

/// Cubic Bezier timing curve anchored at (0,0) and (1,1), as used by CSS
/// `cubic-bezier(x1, y1, x2, y2)`.
///
/// The control x coordinates are clamped to \[0, 1\] so the curve stays a
/// function of time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    cx: f64,
    bx: f64,
    ax: f64,
    cy: f64,
    by: f64,
    ay: f64,
}

impl CubicBezier {
    /// Decelerating curve used for visual state drift.
    pub const EASE_OUT: (f32, f32, f32, f32) = (0.0, 0.0, 0.58, 1.0);

    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let x1 = f64::from(x1.clamp(0.0, 1.0));
        let x2 = f64::from(x2.clamp(0.0, 1.0));
        let (y1, y2) = (f64::from(y1), f64::from(y2));
        // Polynomial coefficients of the parametric curve, Horner form.
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;
        Self {
            cx,
            bx,
            ax,
            cy,
            by,
            ay,
        }
    }

    pub fn ease_out() -> Self {
        let (x1, y1, x2, y2) = Self::EASE_OUT;
        Self::new(x1, y1, x2, y2)
    }

    fn sample_x(&self, s: f64) -> f64 {
        ((self.ax * s + self.bx) * s + self.cx) * s
    }

    fn sample_y(&self, s: f64) -> f64 {
        ((self.ay * s + self.by) * s + self.cy) * s
    }

    fn sample_dx(&self, s: f64) -> f64 {
        (3.0 * self.ax * s + 2.0 * self.bx) * s + self.cx
    }

    /// Find the curve parameter whose x equals `x`.
    fn solve_x(&self, x: f64) -> f64 {
        let mut s = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = self.sample_x(s) - x;
            if err.abs() < EPSILON {
                return s;
            }
            let d = self.sample_dx(s);
            if d.abs() < EPSILON {
                break;
            }
            s -= err / d;
        }

        // Newton stalled on a flat stretch; fall back to bisection.
        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        for _ in 0..BISECTION_ITERATIONS {
            let v = self.sample_x(s);
            if (v - x).abs() < EPSILON {
                break;
            }
            if v < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        s
    }

    /// Curve y at curve x == `t`. Exact at both ends.
    pub fn ease(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        self.sample_y(self.solve_x(f64::from(t))) as f32
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::ease_out()
    }
}

/// Timing curve selection for fades and drifts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    Bezier(CubicBezier),
    /// Flings past the end and settles back, like a spring with no damping
    /// after the target. `tension` of 2.0 matches the usual UI default.
    Overshoot { tension: f32 },
}

impl Easing {
    pub fn overshoot() -> Self {
        Easing::Overshoot { tension: 2.0 }
    }

    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t.clamp(0.0, 1.0),
            Easing::Bezier(curve) => curve.ease(t),
            Easing::Overshoot { tension } => {
                let t = t.clamp(0.0, 1.0) - 1.0;
                t * t * ((tension + 1.0) * t + tension) + 1.0
            }
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Bezier(CubicBezier::ease_out())
    }
}
