//! Blob surface driver.
//!
//! One [`Director`] owns the rings, the state registry and every fade of a
//! blob surface. The host calls [`Director::update`] once per redraw and
//! renders the returned [`BlobFrame`].

use crate::amplitude::{AmplitudeDriver, AmplitudeInput};
use crate::clock::FrameClock;
use crate::config::DirectorConfig;
use crate::constants::{
    AUTO_SPEED_SCALE, DEFAULT_GRADIENT_SIZE, DEFAULT_STATE_ID, INITIAL_RADIUS_INSET,
    MIN_CIRCLE_RADIUS, PRESSED_SCALE, SETTLED_MAX_DIVISOR, SETTLED_MIN_DIVISOR,
    SHADER_SIZE_PADDING, WAVES_ENTER_BASE, WAVE_SCALE_CAP, WAVE_SCALE_RANGE, WAVE_SCALE_STEP,
};
use crate::error::{require_non_negative, ConfigError, DirectorError};
use crate::frame::{BlobFrame, BlobPass, CircleDraw, Paint, PassKind, WaveShape};
use crate::oscillator::{mix_seed, RadiusInset, RadiusRange, RingConfig, RingOscillator};
use crate::state::{Gradient, VisualState};
use crate::transition::{Crossfade, Fade, StateRegistry};
use glam::{Affine2, Vec2};
use smallvec::SmallVec;

// Salts for the director's own RNG streams; rings take their seeds from
// their configs.
const AMPLITUDE_STREAM: usize = 0x41;
const DEFAULT_STATE_STREAM: usize = 0x53;

struct RingWave {
    osc: RingOscillator,
    inset: RadiusInset,
    /// Has been emitted at least once; resizes then use the settled bounds.
    drawn: bool,
}

pub struct Director {
    config: DirectorConfig,
    rings: Vec<RingWave>,
    states: StateRegistry,
    crossfade: Crossfade,
    amplitude: AmplitudeDriver,
    pressed: bool,
    pressed_fade: Fade,
    removing: bool,
    removal_fade: Fade,
    waves_enter: Fade,
    clock: FrameClock,
    size: Vec2,
    ready: bool,
}

impl Director {
    pub fn new(config: DirectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rings = Vec::with_capacity(config.rings.len());
        for rc in &config.rings {
            rings.push(RingWave {
                osc: RingOscillator::new(rc)?,
                inset: rc.inset,
                drawn: false,
            });
        }

        let amplitude = AmplitudeDriver::new(
            config.amplitude_speed,
            config.max_amplitude,
            mix_seed(config.seed, AMPLITUDE_STREAM),
        );
        let fades = config.fades;
        log::debug!("[director] created with {} rings", rings.len());

        Ok(Self {
            rings,
            states: StateRegistry::new(),
            crossfade: Crossfade::new(fades.state),
            amplitude,
            pressed: false,
            pressed_fade: Fade::new(fades.pressed),
            removing: false,
            removal_fade: Fade::new(fades.removal),
            waves_enter: Fade::new(fades.waves_enter),
            clock: config.clock.clone(),
            size: Vec2::ZERO,
            ready: false,
            config,
        })
    }

    // ---- oscillators ----

    /// Append a ring. Auto bounds are applied immediately when the surface
    /// already has a size. Returns the ring's index.
    pub fn add_oscillator(&mut self, config: RingConfig) -> Result<usize, ConfigError> {
        let mut osc = RingOscillator::new(&config)?;
        if self.ready {
            osc.resize_bounds(self.initial_range());
        }
        self.rings.push(RingWave {
            osc,
            inset: config.inset,
            drawn: false,
        });
        log::debug!("[director] ring {} added", self.rings.len() - 1);
        Ok(self.rings.len() - 1)
    }

    pub fn remove_oscillator(&mut self, index: usize) -> Option<RingOscillator> {
        if index >= self.rings.len() {
            return None;
        }
        Some(self.rings.remove(index).osc)
    }

    pub fn oscillator(&self, index: usize) -> Option<&RingOscillator> {
        self.rings.get(index).map(|r| &r.osc)
    }

    pub fn oscillator_mut(&mut self, index: usize) -> Option<&mut RingOscillator> {
        self.rings.get_mut(index).map(|r| &mut r.osc)
    }

    pub fn oscillators(&self) -> impl Iterator<Item = &RingOscillator> {
        self.rings.iter().map(|r| &r.osc)
    }

    pub fn oscillator_count(&self) -> usize {
        self.rings.len()
    }

    // ---- states ----

    /// Register `state` under its own id, returning any state it replaced.
    pub fn add_state(&mut self, state: VisualState) -> Option<VisualState> {
        let id = state.id();
        log::debug!("[director] state {id} registered");
        self.states.insert(id, state)
    }

    /// Unregister a state. States that are current or still fading out
    /// cannot be removed.
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

    pub fn state_ids(&self) -> Vec<i32> {
        self.states.keys()
    }

    /// Cross-fade to the state registered under `id`. Selecting the current
    /// state again changes nothing.
    pub fn set_state(&mut self, id: i32) -> Result<(), DirectorError> {
        if self.crossfade.current() == Some(id) {
            return Ok(());
        }
        let inherited = self
            .crossfade
            .current()
            .and_then(|k| self.states.get(k))
            .map(|s| s.size());
        let shader_size = self.shader_size();

        let state = self
            .states
            .get_mut(id)
            .ok_or(DirectorError::UnknownState(id))?;
        let mut size = state.size();
        if size.x == 0.0 {
            size.x = inherited.map_or(shader_size, |s| s.x);
        }
        if size.y == 0.0 {
            size.y = inherited.map_or(shader_size, |s| s.y);
        }
        state.set_size(size);
        let supports_waves = state.supports_waves();

        let first = self.crossfade.current().is_none();
        self.crossfade.set(id);
        if first {
            // No fade-in for the very first state.
            self.waves_enter.set(if supports_waves { 1.0 } else { 0.0 });
        }
        log::debug!(
            "[director] state -> {id} (previous {:?})",
            self.crossfade.previous()
        );
        Ok(())
    }

    // ---- inputs ----

    pub fn set_amplitude(&mut self, input: AmplitudeInput) {
        self.amplitude.set_input(input);
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    pub fn set_preparing_to_remove(&mut self, preparing: bool) {
        if self.removing != preparing {
            log::debug!("[director] preparing to remove: {preparing}");
        }
        self.removing = preparing;
    }

    /// Shrinks the waves; 1 hides them entirely. Non-finite input unpins.
    pub fn set_pinned_progress(&mut self, progress: f32) {
        self.config.pinned_progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn set_amplitude_speed(&mut self, speed: f32) -> Result<(), ConfigError> {
        require_non_negative("amplitude_speed", speed)?;
        self.config.amplitude_speed = speed;
        self.amplitude.set_speed(speed);
        Ok(())
    }

    pub fn set_speed_scale(&mut self, scale: f32) -> Result<(), ConfigError> {
        require_non_negative("speed_scale", scale)?;
        self.config.speed_scale = scale;
        Ok(())
    }

    pub fn set_max_alpha(&mut self, alpha: f32) {
        self.config.max_alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn set_circle_enabled(&mut self, enabled: bool) {
        self.config.circle_enabled = enabled;
    }

    /// `None` derives the radius from the rings.
    pub fn set_circle_radius(&mut self, radius: Option<f32>) {
        self.config.circle_radius = radius.map(|r| r.max(0.0));
    }

    pub fn set_removal_gradient(&mut self, gradient: Option<Gradient>) {
        self.config.removal.gradient = gradient;
    }

    /// Apply a new container size. Auto ring bounds are recomputed and the
    /// affected rings resampled. A non-positive size leaves the surface
    /// not ready: nothing is regenerated and frames carry no passes.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            log::warn!("[director] ignoring resize to {width}x{height}");
            self.ready = false;
            return;
        }
        self.size = Vec2::new(width, height);
        self.ready = true;

        let initial = self.initial_range();
        let settled = self.settled_range();
        for (i, ring) in self.rings.iter_mut().enumerate() {
            let auto = if ring.drawn { settled } else { initial };
            if ring.osc.resize_bounds(auto) {
                log::debug!(
                    "[director] ring {i} resampled in {:.1}..{:.1}",
                    ring.osc.range().min,
                    ring.osc.range().max
                );
            }
        }

        if self.crossfade.current().is_none() {
            self.install_default_state();
        }
    }

    fn install_default_state(&mut self) {
        if !self.states.contains(DEFAULT_STATE_ID) {
            let [c1, c2] = self.config.shader_colors;
            let mut state = VisualState::radial(
                DEFAULT_STATE_ID,
                Gradient::radial(DEFAULT_GRADIENT_SIZE, c1, c2),
            );
            state.reseed(mix_seed(self.config.seed, DEFAULT_STATE_STREAM));
            self.states.insert(DEFAULT_STATE_ID, state);
        }
        if let Err(err) = self.set_state(DEFAULT_STATE_ID) {
            log::warn!("[director] default state unavailable: {err}");
        }
    }

    fn density(&self) -> f32 {
        self.config.density
    }

    fn shader_size(&self) -> f32 {
        self.size.x + SHADER_SIZE_PADDING * self.density()
    }

    /// Bounds the rings settle into once drawn.
    fn settled_range(&self) -> RadiusRange {
        let half = self.size.min_element() / 2.0;
        let auto = RadiusRange::new(half / SETTLED_MIN_DIVISOR, half / SETTLED_MAX_DIVISOR);
        self.config.settled_bounds.resolve(auto)
    }

    /// Slightly smaller bounds used before the first draw.
    fn initial_range(&self) -> RadiusRange {
        let settled = self.settled_range();
        let inset = INITIAL_RADIUS_INSET * self.density();
        let auto = RadiusRange::new(settled.min - inset, settled.max - inset);
        self.config.initial_bounds.resolve(auto)
    }

    fn wave_scale(&self, index: usize) -> f32 {
        let amp = self.amplitude.value();
        let range = WAVE_SCALE_RANGE - index as f32 * WAVE_SCALE_STEP;
        (1.0 + range * amp + PRESSED_SCALE * self.pressed_fade.value())
            * (1.0 - self.config.pinned_progress)
    }

    fn circle_radius(&self) -> f32 {
        if let Some(r) = self.config.circle_radius {
            return r;
        }
        let mut rad = 0.0f32;
        for ring in &self.rings {
            let range = ring.osc.range();
            rad = if rad == 0.0 { range.min } else { rad.min(range.max) };
        }
        rad.max(MIN_CIRCLE_RADIUS * self.density())
    }

    fn center(&self) -> Vec2 {
        self.size / 2.0
    }

    fn removal_paint(&self) -> Option<Paint> {
        let gradient = self.config.removal.gradient.as_ref()?;
        let removal = &self.config.removal;
        let center = self.center();
        let slide = -removal.size * self.density() * (1.0 - self.removal_fade.value());
        let transform = Affine2::from_translation(center)
            * Affine2::from_angle(removal.angle.to_radians())
            * Affine2::from_translation(-center)
            * Affine2::from_translation(Vec2::new(slide, 0.0));
        Some(Paint {
            gradient: Some(gradient.clone()),
            transform,
            color: Some(removal.color),
        })
    }

    // ---- frame ----

    /// Advance one frame using the configured clock.
    pub fn update(&mut self) -> BlobFrame {
        let dt = self.clock.next_dt();
        self.update_with_dt(dt)
    }

    /// Advance by an explicit time step (time units, 16 per 60Hz frame).
    pub fn update_with_dt(&mut self, dt: f32) -> BlobFrame {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.pressed_fade.step(self.pressed, dt);
        self.amplitude.advance(dt);
        if let Some(released) = self.crossfade.advance(dt) {
            log::debug!("[director] state {released} faded out");
        }
        self.removal_fade.step(self.removing, dt);
        let show_waves = self.current_supports_waves();
        self.waves_enter.step(show_waves, dt);

        let amp = self.amplitude.value();
        let speed_scale = if self.amplitude.is_auto() {
            AUTO_SPEED_SCALE
        } else {
            self.config.speed_scale
        };
        if self.ready {
            let settled = self.settled_range();
            let density = self.density();
            for ring in &mut self.rings {
                ring.osc.follow_auto_bounds(ring.inset.apply(settled, density));
            }
        }
        for ring in &mut self.rings {
            ring.osc.update(amp, speed_scale);
        }
        for id in [self.crossfade.previous(), self.crossfade.current()]
            .into_iter()
            .flatten()
        {
            if let Some(state) = self.states.get_mut(id) {
                state.update(dt, amp);
            }
        }

        let mut frame = BlobFrame {
            dt,
            amplitude: amp,
            center: self.center(),
            needs_redraw: self.needs_redraw(),
            ..BlobFrame::default()
        };
        if !self.ready {
            return frame;
        }

        if self.waves_enter.value() != 0.0 {
            frame.waves = self.wave_shapes();
        }
        frame.passes = self.passes();
        log::trace!(
            "[director] amp {:.3} transition {:.2} passes {}",
            amp,
            self.crossfade.progress(),
            frame.passes.len()
        );
        frame
    }

    fn current_supports_waves(&self) -> bool {
        self.crossfade
            .current()
            .and_then(|id| self.states.get(id))
            .map_or(false, |s| s.supports_waves())
    }

    fn wave_shapes(&mut self) -> Vec<WaveShape> {
        let center = self.center();
        let eased = self.config.waves_easing.apply(self.waves_enter.value());
        let enter = WAVES_ENTER_BASE + (1.0 - WAVES_ENTER_BASE) * eased;
        let scales: Vec<f32> = (0..self.rings.len())
            .map(|i| self.wave_scale(i).min(WAVE_SCALE_CAP) * enter)
            .collect();

        self.rings
            .iter_mut()
            .zip(scales)
            .map(|(ring, scale)| {
                ring.drawn = true;
                WaveShape {
                    path: ring.osc.path(center),
                    scale,
                    transform: Affine2::from_translation(center)
                        * Affine2::from_scale(Vec2::splat(scale))
                        * Affine2::from_translation(-center),
                }
            })
            .collect()
    }

    fn passes(&self) -> SmallVec<[BlobPass; 3]> {
        let mut passes = SmallVec::new();
        let removal = self.removal_fade.value();
        let max_alpha = self.config.max_alpha;
        let waves_visible = self.waves_enter.value() != 0.0;
        let circle = |alpha: f32| {
            self.config.circle_enabled.then(|| CircleDraw {
                center: self.center(),
                radius: self.circle_radius(),
                scale: 1.0 + PRESSED_SCALE * self.pressed_fade.value(),
                alpha,
            })
        };
        let wave_alpha = |alpha: f32| {
            if waves_visible {
                max_alpha * alpha * (1.0 - removal)
            } else {
                0.0
            }
        };

        if removal < 1.0 {
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
            for (kind, id, alpha) in layers {
                let Some(state) = id.and_then(|id| self.states.get(id)) else {
                    continue;
                };
                // A state without a gradient yet draws nothing this frame.
                let Some(paint) = Paint::from_state(state) else {
                    continue;
                };
                let circle_alpha = if kind == PassKind::Current { alpha } else { 1.0 };
                passes.push(BlobPass {
                    kind,
                    paint,
                    wave_alpha: wave_alpha(alpha),
                    circle: circle(circle_alpha),
                });
            }
        }

        if removal > 0.0 {
            if let Some(paint) = self.removal_paint() {
                let alpha = if !waves_visible {
                    0.0
                } else if self.config.removal.fade_waves {
                    max_alpha * (1.0 - removal)
                } else {
                    max_alpha * removal
                };
                passes.push(BlobPass {
                    kind: PassKind::Removal,
                    paint,
                    wave_alpha: alpha,
                    circle: circle(removal),
                });
            }
        }
        passes
    }

    /// Something is still animating toward a resting value.
    pub fn needs_redraw(&self) -> bool {
        self.waves_enter.value() > 0.0
            || self.waves_enter.is_moving(self.current_supports_waves())
            || self.pressed_fade.is_moving(self.pressed)
            || self.removal_fade.is_moving(self.removing)
            || self.crossfade.previous().is_some()
            || self.amplitude.value() != self.amplitude.target()
    }

    // ---- observers ----

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude.value()
    }

    pub fn amplitude_target(&self) -> f32 {
        self.amplitude.target()
    }

    pub fn is_auto_amplitude(&self) -> bool {
        self.amplitude.is_auto()
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

    pub fn pressed_progress(&self) -> f32 {
        self.pressed_fade.value()
    }

    pub fn removal_progress(&self) -> f32 {
        self.removal_fade.value()
    }

    pub fn waves_enter_progress(&self) -> f32 {
        self.waves_enter.value()
    }
}
