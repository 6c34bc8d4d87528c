use crate::constants::{FRAME_DT, MAX_MEASURED_DT};
use crate::error::{require_positive, ConfigError};
use instant::Instant;

/// Source of the per-frame time step, in milliseconds-like time units.
///
/// `Fixed` reproduces the classic behavior where every redraw counts as one
/// 16-unit step, so animation speed follows the host's redraw rate.
/// `Measured` uses real elapsed time between calls, capped so a stalled host
/// does not make everything jump.
#[derive(Clone, Debug)]
pub enum FrameClock {
    Fixed { dt: f32 },
    Measured { last: Option<Instant>, max_dt: f32 },
}

impl Default for FrameClock {
    fn default() -> Self {
        FrameClock::Fixed { dt: FRAME_DT }
    }
}

impl FrameClock {
    pub fn measured() -> Self {
        FrameClock::Measured {
            last: None,
            max_dt: MAX_MEASURED_DT,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            FrameClock::Fixed { dt } => require_positive("frame_dt", *dt),
            FrameClock::Measured { max_dt, .. } => require_positive("max_dt", *max_dt),
        }
    }

    pub fn next_dt(&mut self) -> f32 {
        match self {
            FrameClock::Fixed { dt } => *dt,
            FrameClock::Measured { last, max_dt } => {
                let now = Instant::now();
                // First frame has nothing to measure against.
                let dt = match last.replace(now) {
                    Some(prev) => now.duration_since(prev).as_secs_f32() * 1000.0,
                    None => FRAME_DT,
                };
                dt.min(*max_dt)
            }
        }
    }
}
