// Integration tests for ring and line oscillators: rollover invariants,
// emitted geometry, and the fixed-speed scenarios.

use blobwave_core::{
    Bound, Bounds, LineConfig, LineOscillator, LineSpan, PathCommand, RadiusRange, RingConfig,
    RingOscillator, SpeedProfile,
};
use glam::Vec2;

fn ring(points: usize, seed: u64) -> RingOscillator {
    RingOscillator::new(&RingConfig {
        points,
        bounds: Bounds::fixed(50.0, 100.0),
        seed,
        ..RingConfig::default()
    })
    .unwrap()
}

fn line(intervals: usize, seed: u64) -> LineOscillator {
    LineOscillator::new(&LineConfig {
        intervals,
        bounds: Bounds::fixed(0.0, 30.0),
        seed,
        ..LineConfig::default()
    })
    .unwrap()
}

#[test]
fn ring_progress_stays_in_unit_interval_and_rolls_over_continuously() {
    for seed in 0..8 {
        let mut osc = ring(8, seed);
        for frame in 0..600 {
            let amplitude = (frame % 100) as f32 / 100.0;
            let before = osc.points().to_vec();
            osc.update(amplitude, 0.8);
            for (i, (old, new)) in before.iter().zip(osc.points()).enumerate() {
                assert!(
                    (0.0..1.0).contains(&new.progress),
                    "seed {seed} frame {frame} point {i}: progress {}",
                    new.progress
                );
                if new.progress == 0.0 {
                    // Rolled over: the committed value is the old target.
                    assert_eq!(new.current, old.next, "seed {seed} point {i}");
                    assert_eq!(new.value(), old.next);
                }
            }
        }
    }
}

#[test]
fn line_progress_stays_in_unit_interval_and_rolls_over_continuously() {
    for seed in 0..8 {
        let mut osc = line(6, seed);
        for frame in 0..600 {
            let before = osc.points().to_vec();
            osc.update(1.0, Some(0.7));
            for (old, new) in before.iter().zip(osc.points()) {
                assert!((0.0..1.0).contains(&new.progress), "frame {frame}");
                if new.progress == 0.0 {
                    assert_eq!(new.current, old.next);
                }
            }
        }
    }
}

#[test]
fn ring_geometry_is_closed() {
    for n in 3..16 {
        let mut osc = ring(n, n as u64);
        for _ in 0..20 {
            osc.update(0.5, 0.8);
        }
        let path = osc.path(Vec2::new(200.0, 200.0));
        assert!(path.is_closed(1e-3), "ring with {n} points is open");
        assert_eq!(path.cubic_count(), n);
        assert!(matches!(path.commands()[0], PathCommand::MoveTo(_)));
    }
}

#[test]
fn ring_nodes_sit_between_their_bounds() {
    let osc = ring(8, 4);
    let center = Vec2::new(100.0, 100.0);
    let path = osc.path(center);
    for cmd in path.commands() {
        let d = cmd.end_point().distance(center);
        assert!((50.0 - 1e-3..100.0 + 1e-3).contains(&d), "node at distance {d}");
    }
}

#[test]
fn line_geometry_is_anchored_at_both_ends() {
    for n in 1..10 {
        let mut osc = line(n, n as u64);
        osc.update(0.3, None);
        let span = LineSpan {
            left: 20.0,
            right: 320.0,
            baseline: 60.0,
            bottom: 100.0,
        };
        let nodes = osc.node_positions(&span);
        assert_eq!(nodes.len(), n + 1);
        assert_eq!(nodes[0].x, 20.0);
        assert_eq!(nodes[n].x, 320.0);

        let path = osc.path(&span);
        let cmds = path.commands();
        assert_eq!(cmds[2], PathCommand::LineTo(nodes[0]), "rise to the first node");
        assert_eq!(cmds[cmds.len() - 2].end_point(), nodes[n]);
        assert_eq!(
            path.last_point(),
            Some(Vec2::new(320.0, 100.0)),
            "closes on the bottom-right corner"
        );
    }
}

#[test]
fn fixed_step_ring_scenario() {
    let mut osc = RingOscillator::new(&RingConfig {
        points: 8,
        bounds: Bounds::fixed(50.0, 100.0),
        speed: SpeedProfile {
            min_speed: 1.0,
            point_base: 0.5,
            point_spread: 0.0,
            ..SpeedProfile::default()
        },
        seed: 99,
        ..RingConfig::default()
    })
    .unwrap();

    osc.update(0.0, 0.8);
    assert_eq!(osc.point_count(), 8);
    for p in osc.points() {
        assert_eq!(p.progress, 0.5);
        let r = p.value().radius;
        assert!(r > 50.0 && r < 100.0, "radius {r}");
    }
}

#[test]
fn five_interval_line_scenario() {
    let osc = line(5, 3);
    let span = LineSpan {
        left: 0.0,
        right: 300.0,
        baseline: 80.0,
        bottom: 100.0,
    };
    let path = osc.path(&span);
    let cmds = path.commands();

    assert_eq!(cmds[0], PathCommand::MoveTo(Vec2::new(300.0, 100.0)));
    assert_eq!(cmds[1], PathCommand::LineTo(Vec2::new(0.0, 100.0)));
    assert!(matches!(cmds[2], PathCommand::LineTo(p) if p.x == 0.0));
    // One cubic between each pair of neighbouring nodes.
    assert_eq!(path.cubic_count(), osc.points().len() - 1);
    assert_eq!(path.line_count(), 3);
    assert_eq!(cmds.len(), 1 + 3 + 5);

    let mut prev_x = 0.0;
    for cmd in &cmds[3..8] {
        let PathCommand::CubicTo { c1, c2, to } = *cmd else {
            panic!("expected a cubic, got {cmd:?}");
        };
        let mid = prev_x + (to.x - prev_x) / 2.0;
        assert!((c1.x - mid).abs() < 1e-4 && (c2.x - mid).abs() < 1e-4);
        assert!((to.x - prev_x - 60.0).abs() < 1e-3);
        prev_x = to.x;
    }
    assert_eq!(cmds[8], PathCommand::LineTo(Vec2::new(300.0, 100.0)));
}

#[test]
fn auto_line_bounds_track_per_frame_heights() {
    let mut osc = LineOscillator::new(&LineConfig::default()).unwrap();
    assert!(osc.bounds().any_auto());
    osc.follow_auto_bounds(RadiusRange::new(0.0, 12.0));
    assert_eq!(osc.range(), RadiusRange::new(0.0, 12.0));
    osc.resize_bounds(RadiusRange::new(0.0, 12.0));
    for p in osc.points() {
        assert!(p.current < 12.0 && p.next < 12.0);
    }
}

#[test]
fn same_seed_same_motion() {
    let mut a = ring(9, 1234);
    let mut b = ring(9, 1234);
    for _ in 0..200 {
        a.update(0.7, 0.8);
        b.update(0.7, 0.8);
    }
    assert_eq!(a.points(), b.points());

    b.reseed(1);
    b.regenerate_all();
    assert_ne!(a.points(), b.points());
}

#[test]
fn partially_fixed_bounds_keep_the_fixed_side() {
    let mut osc = RingOscillator::new(&RingConfig {
        bounds: Bounds {
            min: Bound::Fixed(10.0),
            max: Bound::Auto,
        },
        ..RingConfig::default()
    })
    .unwrap();
    osc.resize_bounds(RadiusRange::new(70.0, 90.0));
    assert_eq!(osc.range(), RadiusRange::new(10.0, 90.0));
}
