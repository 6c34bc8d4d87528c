use crate::constants::{
    AMPLITUDE_STEP_BASE, AMPLITUDE_STEP_SPAN, AUTO_RETARGET_INTERVAL, AUTO_STEP_SPAN,
    AUTO_TARGET_MIN,
};
use rand::prelude::*;

/// What the host feeds the visualizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AmplitudeInput {
    /// Raw level, normalized against the configured maximum.
    Level(f32),
    /// Self-driven idle animation: a new random target every second.
    Auto,
}

impl From<f32> for AmplitudeInput {
    /// Negative or NaN levels select auto mode.
    fn from(value: f32) -> Self {
        if value >= 0.0 {
            AmplitudeInput::Level(value)
        } else {
            AmplitudeInput::Auto
        }
    }
}

/// Smooths the normalized amplitude toward its target at a fixed linear rate.
///
/// The rate is fixed when the target is set, so the value arrives after
/// `100 + 500 * speed` time units regardless of distance, and never passes
/// the target.
#[derive(Clone, Debug)]
pub struct AmplitudeDriver {
    value: f32,
    target: f32,
    rate: f32,
    speed: f32,
    max_input: f32,
    auto: bool,
    since_retarget: Option<f32>,
    rng: StdRng,
}

impl AmplitudeDriver {
    pub fn new(speed: f32, max_input: f32, seed: u64) -> Self {
        Self {
            value: 0.0,
            target: 0.0,
            rate: 0.0,
            speed,
            max_input,
            auto: false,
            since_retarget: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn set_input(&mut self, input: AmplitudeInput) {
        match input {
            AmplitudeInput::Level(level) => {
                self.auto = false;
                self.since_retarget = None;
                // NaN reads as silence; infinities saturate.
                let level = if level.is_nan() {
                    0.0
                } else {
                    level.clamp(0.0, self.max_input)
                };
                self.retarget(level / self.max_input, AMPLITUDE_STEP_SPAN);
            }
            AmplitudeInput::Auto => self.auto = true,
        }
    }

    fn retarget(&mut self, target: f32, span: f32) {
        if !self.value.is_finite() {
            self.value = 0.0;
        }
        self.target = target.clamp(0.0, 1.0);
        self.rate = (self.target - self.value) / (AMPLITUDE_STEP_BASE + span * self.speed);
    }

    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if self.auto {
            let due = match self.since_retarget {
                Some(t) => t + dt > AUTO_RETARGET_INTERVAL,
                None => true,
            };
            if due {
                self.since_retarget = Some(0.0);
                let target = AUTO_TARGET_MIN + (1.0 - AUTO_TARGET_MIN) * self.rng.gen_range(0.0..1.0f32);
                self.retarget(target, AUTO_STEP_SPAN);
            } else if let Some(t) = self.since_retarget.as_mut() {
                *t += dt;
            }
        }

        if self.value != self.target {
            self.value += self.rate * dt;
            let passed = if self.rate > 0.0 {
                self.value > self.target
            } else {
                self.value < self.target
            };
            if passed || self.rate == 0.0 {
                self.value = self.target;
            }
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Takes effect at the next target change.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn max_input(&self) -> f32 {
        self.max_input
    }
}
