//! Line-wave surface driver.
//!
//! Background waves live in a band along the top of the surface; the
//! optional main wave fills the remaining bottom part. Both bands are filled
//! with the current visual state's gradient.

use crate::amplitude::{AmplitudeDriver, AmplitudeInput};
use crate::clock::FrameClock;
use crate::config::{HeightPolicy, LineDirectorConfig, LineWaveConfig};
use crate::constants::{DEFAULT_STATE_ID, MAIN_WAVE_FRACTION};
use crate::error::{require_non_negative, ConfigError, DirectorError};
use crate::frame::{LineFrame, LinePass, Paint, PassKind};
use crate::oscillator::{mix_seed, LineOscillator, LineSpan};
use crate::path::Path;
use crate::state::{Gradient, VisualState};
use crate::transition::{Crossfade, StateRegistry};
use glam::Vec2;
use smallvec::SmallVec;

const AMPLITUDE_STREAM: usize = 0x41;
const DEFAULT_STATE_STREAM: usize = 0x53;

struct LineWave {
    osc: LineOscillator,
    height: HeightPolicy,
    lift: f32,
}

impl LineWave {
    fn new(config: &LineWaveConfig) -> Result<Self, ConfigError> {
        require_non_negative("lift", config.lift)?;
        Ok(Self {
            osc: LineOscillator::new(&config.line)?,
            height: config.height.clone(),
            lift: config.lift,
        })
    }

    /// Refresh bounds for this frame, advance, and trace the wave inside the
    /// band `[left, right] x [.., band_bottom]`, filled down to `bottom`.
    fn step(
        &mut self,
        amplitude: f32,
        density: f32,
        span: (f32, f32),
        band_bottom: f32,
        band_height: f32,
        bottom: f32,
    ) -> Path {
        let lift = self.lift * density;
        let available = (band_height - lift).max(0.0);
        self.osc
            .follow_auto_bounds(self.height.range(amplitude, available, density));
        self.osc.update(amplitude, None);
        self.osc.path(&LineSpan {
            left: span.0,
            right: span.1,
            baseline: band_bottom - lift * amplitude,
            bottom,
        })
    }
}

pub struct LineDirector {
    config: LineDirectorConfig,
    waves: Vec<LineWave>,
    main_wave: LineWave,
    states: StateRegistry,
    crossfade: Crossfade,
    amplitude: AmplitudeDriver,
    clock: FrameClock,
    min: Vec2,
    max: Vec2,
    ready: bool,
}

impl LineDirector {
    pub fn new(config: LineDirectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut waves = Vec::with_capacity(config.waves.len());
        for wc in &config.waves {
            waves.push(LineWave::new(wc)?);
        }
        let main_wave = LineWave::new(&config.main_wave)?;
        let amplitude = AmplitudeDriver::new(
            config.amplitude_speed,
            config.max_amplitude,
            mix_seed(config.seed, AMPLITUDE_STREAM),
        );
        log::debug!("[line] created with {} background waves", waves.len());

        Ok(Self {
            waves,
            main_wave,
            states: StateRegistry::new(),
            crossfade: Crossfade::new(config.state_fade_window),
            amplitude,
            clock: config.clock.clone(),
            min: Vec2::ZERO,
            max: Vec2::ZERO,
            ready: false,
            config,
        })
    }

    pub fn add_wave(&mut self, config: LineWaveConfig) -> Result<usize, ConfigError> {
        self.waves.push(LineWave::new(&config)?);
        Ok(self.waves.len() - 1)
    }

    pub fn remove_wave(&mut self, index: usize) -> Option<LineOscillator> {
        if index >= self.waves.len() {
            return None;
        }
        Some(self.waves.remove(index).osc)
    }

    pub fn wave(&self, index: usize) -> Option<&LineOscillator> {
        self.waves.get(index).map(|w| &w.osc)
    }

    pub fn wave_mut(&mut self, index: usize) -> Option<&mut LineOscillator> {
        self.waves.get_mut(index).map(|w| &mut w.osc)
    }

    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    pub fn main_wave(&self) -> &LineOscillator {
        &self.main_wave.osc
    }

    pub fn set_main_wave(&mut self, config: LineWaveConfig) -> Result<(), ConfigError> {
        self.main_wave = LineWave::new(&config)?;
        Ok(())
    }

    pub fn set_main_wave_enabled(&mut self, enabled: bool) {
        self.config.main_wave_enabled = enabled;
    }

    /// `None` uses 75% of the surface height.
    pub fn set_main_wave_height(&mut self, height: Option<f32>) {
        self.config.main_wave_height = height.map(|h| h.max(0.0));
    }

    /// Flatten every wave, the main one included, toward `pinned_y`.
    pub fn set_pinned(&mut self, pinned_y: f32, natural_blend: f32) {
        for wave in self.waves.iter_mut().chain(std::iter::once(&mut self.main_wave)) {
            wave.osc.set_pinned(pinned_y, natural_blend);
        }
    }

    pub fn add_state(&mut self, state: VisualState) -> Option<VisualState> {
        let id = state.id();
        log::debug!("[line] state {id} registered");
        self.states.insert(id, state)
    }

    pub fn remove_state(&mut self, id: i32) -> Result<VisualState, DirectorError> {
        if self.crossfade.is_active(id) {
            return Err(DirectorError::StateInUse(id));
        }
        self.states.remove(id).ok_or(DirectorError::UnknownState(id))
    }

    pub fn state(&self, id: i32) -> Option<&VisualState> {
        self.states.get(id)
    }

    pub fn state_mut(&mut self, id: i32) -> Option<&mut VisualState> {
        self.states.get_mut(id)
    }

    pub fn set_state(&mut self, id: i32) -> Result<(), DirectorError> {
        if !self.states.contains(id) {
            return Err(DirectorError::UnknownState(id));
        }
        if self.crossfade.set(id) {
            log::debug!(
                "[line] state -> {id} (previous {:?})",
                self.crossfade.previous()
            );
        }
        Ok(())
    }

    pub fn set_amplitude(&mut self, input: AmplitudeInput) {
        self.amplitude.set_input(input);
    }

    pub fn set_amplitude_speed(&mut self, speed: f32) -> Result<(), ConfigError> {
        require_non_negative("amplitude_speed", speed)?;
        self.config.amplitude_speed = speed;
        self.amplitude.set_speed(speed);
        Ok(())
    }

    pub fn set_max_alpha(&mut self, alpha: f32) {
        self.config.max_alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.set_rect(0.0, 0.0, width, height);
    }

    /// Draw inside `left..right` x `top..bottom`. An empty rectangle leaves
    /// the surface not ready.
    pub fn set_rect(&mut self, left: f32, top: f32, right: f32, bottom: f32) {
        let (width, height) = (right - left, bottom - top);
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            log::warn!("[line] ignoring empty rect {left},{top} {right},{bottom}");
            self.ready = false;
            return;
        }
        self.min = Vec2::new(left, top);
        self.max = Vec2::new(right, bottom);
        self.ready = true;

        if self.crossfade.current().is_none() {
            self.install_default_state(width);
        }
    }

    fn install_default_state(&mut self, width: f32) {
        if !self.states.contains(DEFAULT_STATE_ID) {
            let [c1, c2] = self.config.shader_colors;
            let mut state =
                VisualState::line(DEFAULT_STATE_ID, Gradient::linear(width, c1, c2, c1));
            state.reseed(mix_seed(self.config.seed, DEFAULT_STATE_STREAM));
            self.states.insert(DEFAULT_STATE_ID, state);
        }
        if let Err(err) = self.set_state(DEFAULT_STATE_ID) {
            log::warn!("[line] default state unavailable: {err}");
        }
    }

    fn main_wave_height(&self) -> f32 {
        let height = self.max.y - self.min.y;
        self.config
            .main_wave_height
            .unwrap_or(height * MAIN_WAVE_FRACTION)
            .min(height)
    }

    pub fn update(&mut self) -> LineFrame {
        let dt = self.clock.next_dt();
        self.update_with_dt(dt)
    }

    pub fn update_with_dt(&mut self, dt: f32) -> LineFrame {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.amplitude.advance(dt);
        if let Some(released) = self.crossfade.advance(dt) {
            log::debug!("[line] state {released} faded out");
        }
        let amp = self.amplitude.value();

        let mut frame = LineFrame {
            dt,
            amplitude: amp,
            needs_redraw: true,
            ..LineFrame::default()
        };
        if !self.ready {
            return frame;
        }

        let density = self.config.density;
        let (min, max) = (self.min, self.max);
        let main_enabled = self.config.main_wave_enabled;
        let mut waves_height = max.y - min.y;
        if main_enabled {
            waves_height -= self.main_wave_height();
        }
        let band_bottom = min.y + waves_height;
        let span = (min.x, max.x);

        frame.waves = self
            .waves
            .iter_mut()
            .map(|w| w.step(amp, density, span, band_bottom, waves_height, band_bottom))
            .collect();
        if main_enabled {
            frame.main_wave = Some(self.main_wave.step(
                amp,
                density,
                span,
                band_bottom,
                waves_height,
                max.y,
            ));
        }

        for id in [self.crossfade.previous(), self.crossfade.current()]
            .into_iter()
            .flatten()
        {
            if let Some(state) = self.states.get_mut(id) {
                state.set_line_rect(min.x, min.y, max.x, max.y);
                state.update(dt, amp);
            }
        }
        frame.passes = self.passes();
        log::trace!(
            "[line] amp {:.3} band {:.1} passes {}",
            amp,
            waves_height,
            frame.passes.len()
        );
        frame
    }

    fn passes(&self) -> SmallVec<[LinePass; 2]> {
        let layers = [
            (
                PassKind::Previous,
                self.crossfade.previous(),
                self.crossfade.previous_alpha(),
            ),
            (
                PassKind::Current,
                self.crossfade.current(),
                self.crossfade.current_alpha(),
            ),
        ];
        layers
            .into_iter()
            .filter_map(|(kind, id, alpha)| {
                let state = self.states.get(id?)?;
                let paint = Paint::from_state(state)?;
                Some(LinePass {
                    kind,
                    paint,
                    wave_alpha: self.config.max_alpha * alpha,
                    main_wave_alpha: if kind == PassKind::Current { alpha } else { 1.0 },
                })
            })
            .collect()
    }

    pub fn config(&self) -> &LineDirectorConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude.value()
    }

    pub fn amplitude_target(&self) -> f32 {
        self.amplitude.target()
    }

    pub fn current_state(&self) -> Option<i32> {
        self.crossfade.current()
    }

    pub fn previous_state(&self) -> Option<i32> {
        self.crossfade.previous()
    }

    pub fn transition_progress(&self) -> f32 {
        self.crossfade.progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathCommand;
    use crate::state::Color;

    #[test]
    fn main_wave_fills_the_bottom_band() {
        let mut d = LineDirector::new(LineDirectorConfig::default()).unwrap();
        d.resize(300.0, 100.0);
        let frame = d.update_with_dt(16.0);
        let main = frame.main_wave.expect("main wave enabled by default");
        // Bottom edge of the fill sits on the surface bottom.
        assert_eq!(main.commands()[0], PathCommand::MoveTo(Vec2::new(300.0, 100.0)));
        // Background waves close along the top band's bottom (25% down).
        for w in &frame.waves {
            assert_eq!(w.commands()[0], PathCommand::MoveTo(Vec2::new(300.0, 25.0)));
        }
    }

    #[test]
    fn disabled_main_wave_gives_background_the_full_height() {
        let mut d = LineDirector::new(LineDirectorConfig {
            main_wave_enabled: false,
            ..LineDirectorConfig::default()
        })
        .unwrap();
        d.set_rect(10.0, 20.0, 110.0, 70.0);
        let frame = d.update_with_dt(16.0);
        assert!(frame.main_wave.is_none());
        assert_eq!(
            frame.waves[0].commands()[0],
            PathCommand::MoveTo(Vec2::new(110.0, 70.0))
        );
    }

    #[test]
    fn default_line_state_is_sized_from_the_rect() {
        let mut d = LineDirector::new(LineDirectorConfig::default()).unwrap();
        d.resize(300.0, 100.0);
        d.update_with_dt(16.0);
        let s = d.state(DEFAULT_STATE_ID).unwrap();
        assert_eq!(s.size(), Vec2::new(100.0, 300.0));
        assert!(s.target().unwrap().x >= 1.1);
    }

    #[test]
    fn previous_pass_draws_main_wave_opaque() {
        let mut d = LineDirector::new(LineDirectorConfig::default()).unwrap();
        d.resize(300.0, 100.0);
        d.add_state(VisualState::line(
            7,
            Gradient::linear(300.0, Color::RED, Color::GRAY, Color::RED),
        ));
        d.update_with_dt(16.0);
        d.set_state(7).unwrap();
        let frame = d.update_with_dt(16.0);
        let prev = frame.pass(PassKind::Previous).unwrap();
        let cur = frame.pass(PassKind::Current).unwrap();
        assert_eq!(prev.main_wave_alpha, 1.0);
        assert!((cur.main_wave_alpha - 16.0 / 250.0).abs() < 1e-6);
        assert!((prev.wave_alpha + cur.wave_alpha - d.config().max_alpha).abs() < 1e-6);
    }
}
