//! Headless host loop: drives a blob surface and a line surface the way a UI
//! redraw loop would, and logs what a renderer would receive.
//!
//! `BLOBWAVE_FRAMES` sets the number of frames (default 240),
//! `BLOBWAVE_SEED` the base seed. Use `RUST_LOG=debug` for state changes and
//! `RUST_LOG=trace` for per-frame numbers.

use anyhow::Context;
use blobwave_core::constants::MAX_AMPLITUDE;
use blobwave_core::{
    AmplitudeInput, BlobFrame, Color, Director, DirectorConfig, Gradient, LineDirector,
    LineDirectorConfig, LineFrame, PassKind, StateConfig, TargetPolicy, VisualState,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

const SURFACE: (f32, f32) = (400.0, 400.0);
const LINE_SURFACE: (f32, f32) = (1080.0, 160.0);
const TOGGLE_EVERY: usize = 90; // frames between state flips
const REPORT_EVERY: usize = 30;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v.parse().with_context(|| format!("parsing {key}={v:?}")),
        Err(_) => Ok(default),
    }
}

fn blob_states(seed: u64) -> anyhow::Result<[VisualState; 2]> {
    let calm = VisualState::radial(
        1,
        Gradient::radial(200.0, Color(0xff2b_ceff), Color(0xff09_76e3)),
    );
    // Second identity drifts around the lower left instead of the right edge.
    let lively = VisualState::new(
        2,
        StateConfig {
            seed,
            ..StateConfig::default()
        },
        Box::new(|| {
            Some(Gradient::radial(
                200.0,
                Color(0xff12_b522),
                Color(0xff00_d6c1),
            ))
        }),
        TargetPolicy::Custom(Box::new(|rng: &mut StdRng| {
            Vec2::new(
                0.2 + 0.1 * rng.gen_range(0.0..1.0f32),
                0.7 + 0.1 * rng.gen_range(0.0..1.0f32),
            )
        })),
    )
    .context("building state 2")?;
    Ok([calm, lively])
}

fn line_states() -> [VisualState; 2] {
    let solid = |id, c: u32| {
        VisualState::line(id, Gradient::linear(1000.0, Color(c), Color(c), Color(c)))
    };
    [solid(1, 0xff09_76e3), solid(2, 0xff00_d6c1)]
}

/// Speech-like envelope: syllable bursts under a slow phrase swell.
fn envelope(frame: usize) -> f32 {
    let t = frame as f32 / 60.0;
    let phrase = 0.5 + 0.5 * (t * 0.7).sin();
    let syllable = (t * 9.0).sin().abs();
    MAX_AMPLITUDE * phrase * syllable
}

fn report_blob(frame_no: usize, frame: &BlobFrame) {
    let current = frame.pass(PassKind::Current);
    log::info!(
        "blob #{frame_no}: amp {:.3}, {} waves, {} passes, current alpha {:.2}",
        frame.amplitude,
        frame.waves.len(),
        frame.passes.len(),
        current.map_or(0.0, |p| p.wave_alpha),
    );
    if let Some(wave) = frame.waves.first() {
        log::debug!("  ring 0 @ {:.3}: {}", wave.scale, wave.path.to_svg_data());
    }
    for pass in &frame.passes {
        let uniforms = pass.paint.uniforms(pass.wave_alpha);
        log::trace!(
            "  {:?} uniforms {} bytes: {:?}",
            pass.kind,
            bytemuck::bytes_of(&uniforms).len(),
            uniforms.matrix
        );
    }
}

fn report_line(frame_no: usize, frame: &LineFrame) {
    log::info!(
        "line #{frame_no}: amp {:.3}, {} waves, main {}",
        frame.amplitude,
        frame.waves.len(),
        frame.main_wave.is_some()
    );
    if let Some(main) = &frame.main_wave {
        log::debug!("  main: {}", main.to_svg_data());
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let frames: usize = env_or("BLOBWAVE_FRAMES", 240)?;
    let seed: u64 = env_or("BLOBWAVE_SEED", 7)?;

    let mut blob =
        Director::new(DirectorConfig::with_seed(seed)).context("blob director config")?;
    for state in blob_states(seed)? {
        blob.add_state(state);
    }

    let mut line =
        LineDirector::new(LineDirectorConfig::with_seed(seed)).context("line director config")?;
    for state in line_states() {
        line.add_state(state);
    }

    blob.resize(SURFACE.0, SURFACE.1);
    line.resize(LINE_SURFACE.0, LINE_SURFACE.1);
    line.set_state(1)?;

    for n in 0..frames {
        if n > 0 && n % TOGGLE_EVERY == 0 {
            let next = if blob.current_state() == Some(1) { 2 } else { 1 };
            blob.set_state(next)?;
            line.set_state(next)?;
            log::info!("switched to state {next}");
        }

        let level = envelope(n);
        blob.set_amplitude(AmplitudeInput::Level(level));
        // Keep the line alive even in silence.
        line.set_amplitude(AmplitudeInput::Level(level.max(MAX_AMPLITUDE / 50.0)));

        let blob_frame = blob.update();
        let line_frame = line.update();
        if n % REPORT_EVERY == 0 {
            report_blob(n, &blob_frame);
            report_line(n, &line_frame);
        }
        if !blob_frame.needs_redraw {
            log::info!("blob surface idle at frame {n}");
        }
    }

    log::info!(
        "done: blob amp {:.3} state {:?}, line amp {:.3} state {:?}",
        blob.amplitude(),
        blob.current_state(),
        line.amplitude(),
        line.current_state()
    );
    Ok(())
}
