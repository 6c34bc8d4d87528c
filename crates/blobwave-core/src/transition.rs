//! Cross-fades and the visual state registry.

use crate::state::VisualState;
use fnv::FnvHashMap;

/// Progress value that walks toward 1 while its trigger is on and back toward
/// 0 while it is off, covering the full range in `window` time units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    value: f32,
    window: f32,
}

impl Fade {
    pub fn new(window: f32) -> Self {
        Self { value: 0.0, window }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Jump without animating.
    pub fn set(&mut self, value: f32) {
        self.value = value.clamp(0.0, 1.0);
    }

    pub fn step(&mut self, on: bool, dt: f32) {
        let delta = dt / self.window;
        if on && self.value != 1.0 {
            self.value = (self.value + delta).min(1.0);
        } else if !on && self.value != 0.0 {
            self.value = (self.value - delta).max(0.0);
        }
    }

    /// Still moving toward the trigger's end.
    pub fn is_moving(&self, on: bool) -> bool {
        if on {
            self.value < 1.0
        } else {
            self.value > 0.0
        }
    }
}

/// Current/previous state slots and the blend between them.
///
/// Slots hold registry keys, not states, so the registry stays the single
/// owner. `previous` exists only while a fade is running.
#[derive(Clone, Debug, PartialEq)]
pub struct Crossfade {
    current: Option<i32>,
    previous: Option<i32>,
    progress: f32,
    window: f32,
}

impl Crossfade {
    pub fn new(window: f32) -> Self {
        Self {
            current: None,
            previous: None,
            progress: 1.0,
            window,
        }
    }

    /// Make `id` current. Returns false when it already is.
    pub fn set(&mut self, id: i32) -> bool {
        if self.current == Some(id) {
            return false;
        }
        self.previous = self.current;
        self.current = Some(id);
        self.progress = if self.previous.is_some() { 0.0 } else { 1.0 };
        true
    }

    /// Advance the running fade. Returns the key of the previous state once
    /// it has fully faded out and been released.
    pub fn advance(&mut self, dt: f32) -> Option<i32> {
        if self.previous.is_none() {
            return None;
        }
        self.progress += dt / self.window;
        if self.progress >= 1.0 {
            self.progress = 1.0;
            return self.previous.take();
        }
        None
    }

    pub fn current(&self) -> Option<i32> {
        self.current
    }

    pub fn previous(&self) -> Option<i32> {
        self.previous
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_active(&self, id: i32) -> bool {
        self.current == Some(id) || self.previous == Some(id)
    }

    pub fn previous_alpha(&self) -> f32 {
        1.0 - self.progress
    }

    pub fn current_alpha(&self) -> f32 {
        if self.previous.is_some() {
            self.progress
        } else {
            1.0
        }
    }
}

/// Integer-keyed owner of every visual state a surface can show.
#[derive(Debug, Default)]
pub struct StateRegistry {
    states: FnvHashMap<i32, VisualState>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `state` under `key`, returning whatever was there before.
    pub fn insert(&mut self, key: i32, state: VisualState) -> Option<VisualState> {
        self.states.insert(key, state)
    }

    pub fn remove(&mut self, key: i32) -> Option<VisualState> {
        self.states.remove(&key)
    }

    pub fn get(&self, key: i32) -> Option<&VisualState> {
        self.states.get(&key)
    }

    pub fn get_mut(&mut self, key: i32) -> Option<&mut VisualState> {
        self.states.get_mut(&key)
    }

    pub fn contains(&self, key: i32) -> bool {
        self.states.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Registered keys in ascending order.
    pub fn keys(&self) -> Vec<i32> {
        let mut keys: Vec<i32> = self.states.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}
