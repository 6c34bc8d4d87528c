// Integration tests for the blob and line surface directors.

use blobwave_core::constants::{
    AUTO_SPEED_SCALE, DEFAULT_STATE_ID, FRAME_DT, MAX_AMPLITUDE, SPEED_SCALE,
};
use blobwave_core::{
    AmplitudeInput, BlobFrame, Color, Director, DirectorConfig, DirectorError, Gradient,
    LineDirector, LineDirectorConfig, PassKind, PathCommand, RemovalConfig, StateConfig,
    TargetPolicy, VisualState,
};
use glam::Vec2;

fn radial(id: i32) -> VisualState {
    VisualState::radial(id, Gradient::radial(200.0, Color(0xff12_b522), Color(0xff00_d6c1)))
}

fn quiet_state(id: i32) -> VisualState {
    let mut s = radial(id);
    s.set_supports_waves(false);
    s
}

fn director() -> Director {
    let mut d = Director::new(DirectorConfig::default()).unwrap();
    d.add_state(radial(1));
    d.add_state(radial(2));
    d.resize(400.0, 400.0);
    d
}

fn run(d: &mut Director, frames: usize) -> BlobFrame {
    let mut frame = d.update_with_dt(FRAME_DT);
    for _ in 1..frames {
        frame = d.update_with_dt(FRAME_DT);
    }
    frame
}

fn assert_frame_finite(frame: &BlobFrame) {
    assert!(frame.amplitude.is_finite());
    for wave in &frame.waves {
        assert!(wave.scale.is_finite());
        for cmd in wave.path.commands() {
            assert!(cmd.end_point().is_finite(), "non-finite command {cmd:?}");
        }
    }
    for pass in &frame.passes {
        assert!(pass.wave_alpha.is_finite());
        assert!(pass.paint.transform.is_finite());
    }
}

#[test]
fn set_state_twice_is_a_no_op() {
    let mut d = director();
    d.set_state(1).unwrap();
    run(&mut d, 5);
    let progress = d.transition_progress();
    assert!(progress > 0.0 && progress < 1.0);

    d.set_state(1).unwrap();
    assert_eq!(d.transition_progress(), progress);
    assert_eq!(d.previous_state(), Some(DEFAULT_STATE_ID));
    assert_eq!(d.current_state(), Some(1));
}

#[test]
fn cross_fade_completes_and_releases_the_previous_state() {
    let mut d = director();
    d.set_state(2).unwrap();
    let frame = d.update_with_dt(FRAME_DT);
    let prev = frame.pass(PassKind::Previous).expect("previous pass while fading");
    let cur = frame.pass(PassKind::Current).unwrap();
    assert!((cur.wave_alpha + prev.wave_alpha - d.config().max_alpha).abs() < 1e-5);

    run(&mut d, 15);
    assert_eq!(d.previous_state(), None);
    assert_eq!(d.transition_progress(), 1.0);
    let frame = d.update_with_dt(FRAME_DT);
    assert!(frame.pass(PassKind::Previous).is_none());
    assert_eq!(frame.pass(PassKind::Current).unwrap().wave_alpha, d.config().max_alpha);
}

#[test]
fn active_states_cannot_be_removed() {
    let mut d = director();
    d.set_state(1).unwrap();
    assert_eq!(d.remove_state(1).unwrap_err(), DirectorError::StateInUse(1));
    assert_eq!(
        d.remove_state(DEFAULT_STATE_ID).unwrap_err(),
        DirectorError::StateInUse(DEFAULT_STATE_ID)
    );
    assert_eq!(d.remove_state(42).unwrap_err(), DirectorError::UnknownState(42));

    run(&mut d, 16);
    let removed = d.remove_state(DEFAULT_STATE_ID).unwrap();
    assert_eq!(removed.id(), DEFAULT_STATE_ID);
    assert_eq!(d.state_ids(), vec![1, 2]);
}

#[test]
fn unknown_state_is_rejected_without_side_effects() {
    let mut d = director();
    assert_eq!(d.set_state(9), Err(DirectorError::UnknownState(9)));
    assert_eq!(d.current_state(), Some(DEFAULT_STATE_ID));
    assert_eq!(d.previous_state(), None);
}

#[test]
fn first_state_sets_wave_visibility_instantly() {
    let mut d = Director::new(DirectorConfig::default()).unwrap();
    d.add_state(quiet_state(3));
    d.set_state(3).unwrap();
    assert_eq!(d.waves_enter_progress(), 0.0);
    d.resize(400.0, 400.0);
    assert_eq!(d.current_state(), Some(3), "no default state over an explicit one");
    let frame = d.update_with_dt(FRAME_DT);
    assert!(frame.waves.is_empty());

    let mut d = Director::new(DirectorConfig::default()).unwrap();
    d.add_state(radial(4));
    d.set_state(4).unwrap();
    assert_eq!(d.waves_enter_progress(), 1.0);
}

#[test]
fn later_states_fade_waves_in_and_out() {
    let mut d = director();
    d.add_state(quiet_state(5));
    d.set_state(5).unwrap();
    let frame = d.update_with_dt(FRAME_DT);
    assert!(d.waves_enter_progress() < 1.0 && d.waves_enter_progress() > 0.0);
    assert_eq!(frame.waves.len(), 2);

    let frame = run(&mut d, 30);
    assert_eq!(d.waves_enter_progress(), 0.0);
    assert!(frame.waves.is_empty());
    assert!(!frame.needs_redraw, "nothing left to animate");
}

#[test]
fn state_without_size_inherits_from_the_current_one() {
    let mut d = director();
    let mut sized = radial(7);
    sized.set_size(Vec2::new(640.0, 0.0));
    d.add_state(sized);
    d.set_state(7).unwrap();
    assert_eq!(d.state(7).unwrap().size(), Vec2::new(640.0, 420.0));
}

#[test]
fn missing_gradient_skips_only_that_pass() {
    let mut d = director();
    d.add_state(
        VisualState::new(8, StateConfig::default(), Box::new(|| None), TargetPolicy::Radial)
            .unwrap(),
    );
    d.set_state(8).unwrap();
    for _ in 0..5 {
        let frame = d.update_with_dt(FRAME_DT);
        assert!(frame.pass(PassKind::Current).is_none());
        assert!(frame.pass(PassKind::Previous).is_some());
        assert_frame_finite(&frame);
    }
}

#[test]
fn zero_sized_container_is_not_ready_and_stays_finite() {
    let mut d = Director::new(DirectorConfig::default()).unwrap();
    d.resize(0.0, 0.0);
    assert!(!d.is_ready());
    assert_eq!(d.current_state(), None);
    d.set_amplitude(AmplitudeInput::Level(MAX_AMPLITUDE));
    for _ in 0..50 {
        let frame = d.update_with_dt(FRAME_DT);
        assert!(frame.passes.is_empty());
        assert_frame_finite(&frame);
    }
    for ring in d.oscillators() {
        assert!(ring.range().min >= 0.0 && ring.range().max >= ring.range().min);
    }

    // Tiny but positive: auto bounds clamp instead of going negative.
    d.resize(4.0, 4.0);
    assert!(d.is_ready());
    for ring in d.oscillators() {
        let r = ring.range();
        assert!(r.min >= 0.0 && r.max >= r.min, "{r:?}");
    }
    for _ in 0..50 {
        assert_frame_finite(&d.update_with_dt(FRAME_DT));
    }

    d.resize(f32::NAN, 10.0);
    assert!(!d.is_ready());
}

#[test]
fn removal_pass_slides_in_over_its_window() {
    let mut d = director();
    d.set_preparing_to_remove(true);
    let first = d.update_with_dt(FRAME_DT);
    let slide_start = first.pass(PassKind::Removal).unwrap().paint.transform.translation;
    let last = run(&mut d, 21);
    assert_eq!(d.removal_progress(), 1.0);
    let slide_end = last.pass(PassKind::Removal).unwrap().paint.transform.translation;
    assert!(slide_start.x < -200.0);
    assert!(slide_end.length() < 1e-3);

    d.set_preparing_to_remove(false);
    run(&mut d, 22);
    assert_eq!(d.removal_progress(), 0.0);
    assert!(d.update_with_dt(FRAME_DT).pass(PassKind::Removal).is_none());
}

#[test]
fn pressed_state_grows_the_circle() {
    let mut d = director();
    d.set_pressed(true);
    let frame = run(&mut d, 10);
    assert_eq!(d.pressed_progress(), 1.0);
    let circle = frame.pass(PassKind::Current).unwrap().circle.unwrap();
    assert!((circle.scale - 1.1).abs() < 1e-6);
}

#[test]
fn amplitude_swells_the_waves() {
    let mut d = director();
    let calm = run(&mut d, 5).waves[0].scale;
    d.set_amplitude(AmplitudeInput::Level(MAX_AMPLITUDE / 2.0));
    let loud = run(&mut d, 40);
    assert!(loud.waves[0].scale > calm);
    assert!(loud.waves[1].scale < loud.waves[0].scale, "inner ring swells less");
}

#[test]
fn pinned_waves_collapse() {
    let mut d = director();
    d.set_pinned_progress(1.0);
    let frame = run(&mut d, 2);
    for wave in &frame.waves {
        assert_eq!(wave.scale, 0.0);
    }
}

#[test]
fn directors_with_equal_seeds_render_identically() {
    let make = || {
        let mut d = Director::new(DirectorConfig::with_seed(21)).unwrap();
        d.resize(300.0, 300.0);
        d.set_amplitude(AmplitudeInput::Level(4_000.0));
        d
    };
    let (mut a, mut b) = (make(), make());
    for _ in 0..120 {
        assert_eq!(a.update_with_dt(FRAME_DT), b.update_with_dt(FRAME_DT));
    }
}

#[test]
fn added_rings_pick_up_auto_bounds() {
    let mut d = director();
    let index = d
        .add_oscillator(blobwave_core::RingConfig::with_points(5))
        .unwrap();
    assert_eq!(index, 2);
    assert!(d.oscillator(index).unwrap().range().max > 100.0);
    assert!(d.add_oscillator(blobwave_core::RingConfig::with_points(1)).is_err());
    assert_eq!(d.oscillator_count(), 3);
    assert!(d.remove_oscillator(index).is_some());
    assert!(d.remove_oscillator(index).is_none());
}

#[test]
fn line_director_waves_span_the_rect() {
    let mut d = LineDirector::new(LineDirectorConfig::default()).unwrap();
    d.set_rect(10.0, 0.0, 310.0, 120.0);
    d.set_amplitude(AmplitudeInput::Level(MAX_AMPLITUDE));
    for _ in 0..60 {
        let frame = d.update_with_dt(FRAME_DT);
        assert!(frame.needs_redraw);
        for path in frame.waves.iter().chain(frame.main_wave.as_ref()) {
            let cmds = path.commands();
            assert!(matches!(cmds[2], PathCommand::LineTo(p) if p.x == 10.0));
            assert_eq!(cmds[cmds.len() - 2].end_point().x, 310.0);
            for cmd in cmds {
                assert!(cmd.end_point().is_finite());
            }
        }
    }
    assert_eq!(d.amplitude(), 1.0);
    assert_eq!(d.current_state(), Some(DEFAULT_STATE_ID));
}

#[test]
fn line_director_cross_fades_states() {
    let mut d = LineDirector::new(LineDirectorConfig::default()).unwrap();
    d.add_state(VisualState::line(
        1,
        Gradient::linear(1000.0, Color::RED, Color::RED, Color::RED),
    ));
    d.resize(300.0, 100.0);
    d.set_state(1).unwrap();
    d.set_state(1).unwrap();
    assert_eq!(d.previous_state(), Some(DEFAULT_STATE_ID));
    assert_eq!(d.transition_progress(), 0.0);
    assert_eq!(d.set_state(3), Err(DirectorError::UnknownState(3)));
    for _ in 0..16 {
        d.update_with_dt(FRAME_DT);
    }
    assert_eq!(d.previous_state(), None);
    assert!(d.remove_state(DEFAULT_STATE_ID).is_ok());
}

#[test]
fn flat_pinned_line_waves() {
    let mut d = LineDirector::new(LineDirectorConfig {
        main_wave_enabled: false,
        ..LineDirectorConfig::default()
    })
    .unwrap();
    d.resize(200.0, 50.0);
    d.set_pinned(30.0, 0.0);
    let frame = d.update_with_dt(FRAME_DT);
    for cmd in &frame.waves[0].commands()[2..8] {
        assert_eq!(cmd.end_point().y, 30.0);
    }
}

#[test]
fn nan_amplitude_does_not_freeze_the_rings() {
    let mut d = director();
    d.set_amplitude(AmplitudeInput::Level(f32::NAN));
    let frame = run(&mut d, 1);
    assert_frame_finite(&frame);
    assert_eq!(d.amplitude(), 0.0);

    d.set_amplitude(AmplitudeInput::Level(MAX_AMPLITUDE / 2.0));
    run(&mut d, 100);
    assert_eq!(d.amplitude(), 0.5);
    let before = d.oscillator(0).unwrap().points().to_vec();
    run(&mut d, 1);
    assert_ne!(d.oscillator(0).unwrap().points(), &before[..], "ring 0 stopped moving");
}

#[test]
fn nan_pinned_progress_unpins() {
    let mut d = director();
    d.set_pinned_progress(f32::NAN);
    let frame = run(&mut d, 2);
    assert_frame_finite(&frame);
    assert_eq!(d.config().pinned_progress, 0.0);
    // Silent and unpressed: waves sit at their natural size.
    assert!((frame.waves[0].scale - 1.0).abs() < 1e-5, "scale {}", frame.waves[0].scale);
}

#[test]
fn removal_pass_can_fade_the_waves_in() {
    let mut d = Director::new(DirectorConfig {
        removal: RemovalConfig {
            fade_waves: false,
            ..RemovalConfig::default()
        },
        ..DirectorConfig::default()
    })
    .unwrap();
    d.resize(400.0, 400.0);
    d.set_preparing_to_remove(true);
    let max_alpha = d.config().max_alpha;

    let frame = run(&mut d, 5);
    let r = d.removal_progress();
    assert!(r > 0.0 && r < 1.0);
    let current = frame.pass(PassKind::Current).unwrap();
    let removal = frame.pass(PassKind::Removal).unwrap();
    assert!((current.wave_alpha - max_alpha * (1.0 - r)).abs() < 1e-6);
    assert!((removal.wave_alpha - max_alpha * r).abs() < 1e-6);

    let frame = run(&mut d, 30);
    assert!(frame.pass(PassKind::Current).is_none());
    assert_eq!(frame.pass(PassKind::Removal).unwrap().wave_alpha, max_alpha);
}

#[test]
fn auto_amplitude_slows_the_rings() {
    let mut d = director();
    d.set_amplitude(AmplitudeInput::Auto);
    run(&mut d, 3);
    assert!(d.is_auto_amplitude());

    for _ in 0..30 {
        let before = d.oscillator(0).unwrap().clone();
        let frame = d.update_with_dt(FRAME_DT);
        assert!(frame.amplitude > 0.0);

        let mut slow = before.clone();
        slow.update(frame.amplitude, AUTO_SPEED_SCALE);
        let mut fast = before;
        fast.update(frame.amplitude, SPEED_SCALE);

        let progress = |pts: &[blobwave_core::ControlPoint<blobwave_core::Polar>]| {
            pts.iter().map(|p| p.progress).collect::<Vec<_>>()
        };
        let actual = progress(d.oscillator(0).unwrap().points());
        assert_eq!(actual, progress(slow.points()));
        assert_ne!(actual, progress(fast.points()));
    }
}
