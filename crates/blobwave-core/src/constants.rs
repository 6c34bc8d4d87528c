// Shared animation tuning constants used by both the blob and line surfaces.
// Time values are in abstract frame-time units (one 60Hz frame == 16 units).

// Frame timing
pub const FRAME_DT: f32 = 16.0; // fixed step of a 60Hz redraw loop
pub const MAX_MEASURED_DT: f32 = 64.0; // cap for measured deltas after a stall

// Cross-fade windows
pub const STATE_FADE_WINDOW: f32 = 250.0; // previous -> current visual state
pub const REMOVAL_FADE_WINDOW: f32 = 350.0; // "preparing to remove" indicator
pub const PRESSED_FADE_WINDOW: f32 = 150.0; // press feedback
pub const WAVES_ENTER_WINDOW: f32 = 350.0; // wave visibility tied to supports_waves

// Amplitude input
pub const MAX_AMPLITUDE: f32 = 8_500.0; // raw input value mapped to amplitude 1.0
pub const AMPLITUDE_SPEED: f32 = 0.33;
pub const AMPLITUDE_STEP_BASE: f32 = 100.0; // denominator base for manual targets
pub const AMPLITUDE_STEP_SPAN: f32 = 500.0;
pub const AUTO_STEP_SPAN: f32 = 1_500.0; // slower drift while in auto mode
pub const AUTO_RETARGET_INTERVAL: f32 = 1_000.0;
pub const AUTO_TARGET_MIN: f32 = 0.5;
pub const AUTO_SPEED_SCALE: f32 = 0.1; // oscillator speed scale while in auto mode

// Oscillator motion
pub const MIN_SPEED: f32 = 0.8; // idle multiplier
pub const MAX_SPEED: f32 = 8.2; // amplitude-driven multiplier
pub const POINT_SPEED_BASE: f32 = 0.017;
pub const POINT_SPEED_SPREAD: f32 = 0.003;
pub const ANGLE_JITTER: f32 = 0.05; // fraction of a ring slot
pub const SPEED_SCALE: f32 = 0.8;

// Blob surface layout (density-independent units)
pub const SETTLED_MAX_DIVISOR: f32 = 1.25; // max radius = extent / 2 / 1.25
pub const SETTLED_MIN_DIVISOR: f32 = 1.5; // min radius = extent / 2 / 1.5
pub const INITIAL_RADIUS_INSET: f32 = 10.0; // initial bounds sit below the settled ones
pub const MIN_CIRCLE_RADIUS: f32 = 32.0;
pub const WAVE_SCALE_RANGE: f32 = 0.3;
pub const WAVE_SCALE_STEP: f32 = 0.04; // per-index reduction of the scale range
pub const WAVE_SCALE_CAP: f32 = 1.3;
pub const PRESSED_SCALE: f32 = 0.1;
pub const WAVES_ENTER_BASE: f32 = 0.65;
pub const SHADER_SIZE_PADDING: f32 = 20.0;
pub const REMOVE_SIZE: f32 = 250.0;
pub const REMOVE_SHADER_LENGTH: f32 = 350.0;
pub const MAX_ALPHA: f32 = 76.0 / 255.0;

// Line surface layout
pub const LINE_WAVE_LIFT: f32 = 6.0; // baseline lift at full amplitude
pub const LINE_WAVE_FLOOR: f32 = 3.0; // minimum height of background lines
pub const MAIN_WAVE_BASE: f32 = 2.0;
pub const MAIN_WAVE_GAIN: f32 = 2.0;
pub const MAIN_WAVE_FRACTION: f32 = 0.75; // default main wave band height

// Visual state drift
pub const REFERENCE_SIZE: f32 = 400.0; // gradient authoring size
pub const ANCHOR_OFFSET: f32 = REFERENCE_SIZE / 2.0;
pub const FIXED_SCALE: f32 = 1.5;
pub const DURATION_MIN: f32 = 500.0;
pub const DURATION_JITTER: u32 = 1_000;
pub const STATE_SPEED_MIN: f32 = 0.5;
pub const STATE_SPEED_MAX: f32 = 0.01;
pub const DEFAULT_STATE_ID: i32 = -1;
pub const DEFAULT_GRADIENT_SIZE: f32 = 200.0;

// Default palette (ARGB)
pub const DEFAULT_COLOR_1: u32 = 0xff2b_ceff;
pub const DEFAULT_COLOR_2: u32 = 0xff09_76e3;
