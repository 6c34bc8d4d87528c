//! Surface-level configuration for the two directors.
//!
//! All lengths documented as "density units" are multiplied by `density`
//! (pixels per density-independent unit) before use; everything else is in
//! pixels.

use crate::clock::FrameClock;
use crate::constants::{
    AMPLITUDE_SPEED, DEFAULT_COLOR_1, DEFAULT_COLOR_2, LINE_WAVE_FLOOR, LINE_WAVE_LIFT,
    MAIN_WAVE_BASE, MAIN_WAVE_GAIN, MAX_ALPHA, MAX_AMPLITUDE, PRESSED_FADE_WINDOW,
    REMOVAL_FADE_WINDOW, REMOVE_SHADER_LENGTH, REMOVE_SIZE, SPEED_SCALE, STATE_FADE_WINDOW,
    WAVES_ENTER_WINDOW,
};
use crate::easing::Easing;
use crate::error::{require_non_negative, require_positive, ConfigError};
use crate::oscillator::{mix_seed, Bounds, LineConfig, RadiusInset, RadiusRange, RingConfig};
use crate::state::{Color, Gradient};
use std::fmt;
use std::rc::Rc;

/// Fade windows in time units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeWindows {
    pub state: f32,
    pub removal: f32,
    pub pressed: f32,
    pub waves_enter: f32,
}

impl Default for FadeWindows {
    fn default() -> Self {
        Self {
            state: STATE_FADE_WINDOW,
            removal: REMOVAL_FADE_WINDOW,
            pressed: PRESSED_FADE_WINDOW,
            waves_enter: WAVES_ENTER_WINDOW,
        }
    }
}

impl FadeWindows {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("state_fade_window", self.state)?;
        require_positive("removal_fade_window", self.removal)?;
        require_positive("pressed_fade_window", self.pressed)?;
        require_positive("waves_enter_window", self.waves_enter)
    }
}

/// "Preparing to remove" indicator pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovalConfig {
    /// `None` disables the removal pass.
    pub gradient: Option<Gradient>,
    pub color: Color,
    /// Degrees, clockwise, about the surface center.
    pub angle: f32,
    /// Slide distance in density units.
    pub size: f32,
    /// Waves fade out with the removal progress; otherwise they fade in on
    /// the removal pass.
    pub fade_waves: bool,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            gradient: Some(Gradient::linear(
                REMOVE_SHADER_LENGTH,
                Color::GRAY,
                Color::GRAY,
                Color::TRANSPARENT,
            )),
            color: Color::RED,
            angle: 0.0,
            size: REMOVE_SIZE,
            fade_waves: true,
        }
    }
}

/// Configuration of the blob surface.
///
/// - `amplitude_speed`: higher values make the amplitude follow input more slowly
/// - `speed_scale`: amplitude contribution to oscillator speed
/// - `initial_bounds` / `settled_bounds`: radius overrides; `Auto` dimensions
///   are derived from the container
/// - `circle_radius`: `None` derives it from the rings' bounds
#[derive(Clone, Debug)]
pub struct DirectorConfig {
    pub amplitude_speed: f32,
    pub max_amplitude: f32,
    pub speed_scale: f32,
    pub max_alpha: f32,
    pub density: f32,
    pub circle_enabled: bool,
    pub circle_radius: Option<f32>,
    pub initial_bounds: Bounds,
    pub settled_bounds: Bounds,
    pub pinned_progress: f32,
    pub shader_colors: [Color; 2],
    pub removal: RemovalConfig,
    pub fades: FadeWindows,
    pub waves_easing: Easing,
    pub rings: Vec<RingConfig>,
    pub clock: FrameClock,
    /// Seeds the amplitude driver and the default state. Ring seeds live in
    /// `rings`; use [`DirectorConfig::with_seed`] to derive both from one value.
    pub seed: u64,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        let seed = 0;
        Self {
            amplitude_speed: AMPLITUDE_SPEED,
            max_amplitude: MAX_AMPLITUDE,
            speed_scale: SPEED_SCALE,
            max_alpha: MAX_ALPHA,
            density: 1.0,
            circle_enabled: true,
            circle_radius: None,
            initial_bounds: Bounds::default(),
            settled_bounds: Bounds::default(),
            pinned_progress: 0.0,
            shader_colors: [Color(DEFAULT_COLOR_1), Color(DEFAULT_COLOR_2)],
            removal: RemovalConfig::default(),
            fades: FadeWindows::default(),
            waves_easing: Easing::overshoot(),
            rings: default_rings(seed),
            clock: FrameClock::default(),
            seed,
        }
    }
}

/// The two stacked rings of the classic look; the second one sits slightly
/// inside the first.
pub fn default_rings(seed: u64) -> Vec<RingConfig> {
    vec![
        RingConfig {
            points: 8,
            seed: mix_seed(seed, 1),
            ..RingConfig::default()
        },
        RingConfig {
            points: 9,
            inset: RadiusInset { min: 1.0, max: 2.0 },
            seed: mix_seed(seed, 2),
            ..RingConfig::default()
        },
    ]
}

impl DirectorConfig {
    /// Defaults with every RNG stream, rings included, derived from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rings: default_rings(seed),
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("amplitude_speed", self.amplitude_speed)?;
        require_positive("max_amplitude", self.max_amplitude)?;
        require_non_negative("speed_scale", self.speed_scale)?;
        require_non_negative("max_alpha", self.max_alpha)?;
        require_positive("density", self.density)?;
        require_non_negative("pinned_progress", self.pinned_progress)?;
        if let Some(r) = self.circle_radius {
            require_non_negative("circle_radius", r)?;
        }
        self.initial_bounds.validate()?;
        self.settled_bounds.validate()?;
        require_non_negative("removal_size", self.removal.size)?;
        self.fades.validate()?;
        self.clock.validate()?;
        for ring in &self.rings {
            ring.validate()?;
        }
        Ok(())
    }
}

/// Per-frame height bounds for a line wave, from the amplitude and the
/// height available to its band.
pub type HeightFn = Rc<dyn Fn(f32, f32) -> RadiusRange>;

#[derive(Clone)]
pub enum HeightPolicy {
    /// `0..max(available * amplitude, floor)`; `floor` in density units.
    Amplitude { floor: f32 },
    /// `0..(base + gain * amplitude)`, in density units.
    Pulse { base: f32, gain: f32 },
    Custom(HeightFn),
}

impl HeightPolicy {
    pub fn range(&self, amplitude: f32, available: f32, density: f32) -> RadiusRange {
        match self {
            HeightPolicy::Amplitude { floor } => {
                RadiusRange::new(0.0, (available * amplitude).max(floor * density))
            }
            HeightPolicy::Pulse { base, gain } => {
                RadiusRange::new(0.0, (base + gain * amplitude) * density)
            }
            HeightPolicy::Custom(f) => f(amplitude, available),
        }
    }
}

impl fmt::Debug for HeightPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightPolicy::Amplitude { floor } => {
                f.debug_struct("Amplitude").field("floor", floor).finish()
            }
            HeightPolicy::Pulse { base, gain } => f
                .debug_struct("Pulse")
                .field("base", base)
                .field("gain", gain)
                .finish(),
            HeightPolicy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One wave on the line surface.
#[derive(Clone, Debug)]
pub struct LineWaveConfig {
    pub line: LineConfig,
    pub height: HeightPolicy,
    /// Baseline lift at full amplitude, density units.
    pub lift: f32,
}

impl LineWaveConfig {
    pub fn background(intervals: usize, seed: u64) -> Self {
        Self {
            line: LineConfig {
                intervals,
                line_speed_scale: 0.7,
                seed,
                ..LineConfig::default()
            },
            height: HeightPolicy::Amplitude {
                floor: LINE_WAVE_FLOOR,
            },
            lift: LINE_WAVE_LIFT,
        }
    }

    pub fn main(seed: u64) -> Self {
        Self {
            line: LineConfig {
                intervals: 5,
                line_speed_scale: 0.3,
                seed,
                ..LineConfig::default()
            },
            height: HeightPolicy::Pulse {
                base: MAIN_WAVE_BASE,
                gain: MAIN_WAVE_GAIN,
            },
            lift: 0.0,
        }
    }
}

/// Configuration of the line surface.
#[derive(Clone, Debug)]
pub struct LineDirectorConfig {
    pub amplitude_speed: f32,
    pub max_amplitude: f32,
    pub max_alpha: f32,
    pub density: f32,
    pub main_wave_enabled: bool,
    /// Pixels; `None` uses 75% of the surface height.
    pub main_wave_height: Option<f32>,
    pub waves: Vec<LineWaveConfig>,
    pub main_wave: LineWaveConfig,
    pub shader_colors: [Color; 2],
    pub state_fade_window: f32,
    pub clock: FrameClock,
    /// Seeds the amplitude driver and the default state. Wave seeds live in
    /// their configs; see [`LineDirectorConfig::with_seed`].
    pub seed: u64,
}

impl Default for LineDirectorConfig {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl LineDirectorConfig {
    /// Defaults with every RNG stream, waves included, derived from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            amplitude_speed: AMPLITUDE_SPEED,
            max_amplitude: MAX_AMPLITUDE,
            max_alpha: MAX_ALPHA,
            density: 1.0,
            main_wave_enabled: true,
            main_wave_height: None,
            waves: vec![
                LineWaveConfig::background(7, mix_seed(seed, 1)),
                LineWaveConfig::background(8, mix_seed(seed, 2)),
            ],
            main_wave: LineWaveConfig::main(mix_seed(seed, 3)),
            shader_colors: [Color(DEFAULT_COLOR_1), Color(DEFAULT_COLOR_2)],
            state_fade_window: STATE_FADE_WINDOW,
            clock: FrameClock::default(),
            seed,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("amplitude_speed", self.amplitude_speed)?;
        require_positive("max_amplitude", self.max_amplitude)?;
        require_non_negative("max_alpha", self.max_alpha)?;
        require_positive("density", self.density)?;
        if let Some(h) = self.main_wave_height {
            require_non_negative("main_wave_height", h)?;
        }
        require_positive("state_fade_window", self.state_fade_window)?;
        self.clock.validate()?;
        for wave in self.waves.iter().chain(std::iter::once(&self.main_wave)) {
            wave.line.validate()?;
            require_non_negative("lift", wave.lift)?;
        }
        Ok(())
    }
}
