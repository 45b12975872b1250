use std::sync::{Arc, Mutex};

use super::*;
use crate::animation::motion::{CellState, MotionParams, cell_state};
use crate::foundation::core::{Canvas, Point, Rgb8, Vec2};
use crate::particles::model::PairedParticle;

fn grid_field() -> ParticleField {
    // 4x4 cells of 4px on a 16x16 canvas, target = source.
    let particles = (0..16u32)
        .map(|i| {
            let (x, y) = (f64::from((i % 4) * 4), f64::from((i / 4) * 4));
            PairedParticle {
                source: Point::new(x, y),
                target: Point::new(x, y),
                color: Rgb8::new(i as u8 * 10, 0, 0),
                scan_key: x + y,
                jitter: Vec2::ZERO,
            }
        })
        .collect();
    ParticleField::new(Canvas::new(16, 16), 4, particles)
}

fn ready_controller(field: ParticleField) -> AnimationController {
    let mut c = AnimationController::new(MorphConfig::default()).unwrap();
    c.attach_surface(CpuSurface::new(Canvas::new(16, 16)).unwrap());
    c.begin_sampling().unwrap();
    c.begin_pairing().unwrap();
    c.install(field).unwrap();
    c
}

fn drive(c: &mut AnimationController, first: Option<TickToken>) -> (Vec<f64>, Option<RunSummary>) {
    let mut progress = Vec::new();
    let mut next = first;
    while let Some(tok) = next {
        match c.tick(tok) {
            TickOutcome::Continue { progress: p, next: n } => {
                progress.push(p);
                next = Some(n);
            }
            TickOutcome::Completed(s) => {
                progress.push(s.final_progress);
                return (progress, Some(s));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
    (progress, None)
}

#[test]
fn sweep_advances_by_scan_speed_and_completes_past_tail() {
    let mut c = ready_controller(grid_field());
    let first = c.start().unwrap();
    assert_eq!(c.phase(), Phase::Running);

    let (progress, summary) = drive(&mut c, first);
    // maxScan = 32, tail = 120: done on the first tick with progress > 152.
    assert_eq!(progress.len(), 20);
    for (k, p) in progress.iter().enumerate() {
        assert_eq!(*p, 8.0 * (k as f64 + 1.0));
    }
    let summary = summary.unwrap();
    assert_eq!(summary.ticks, 20);
    assert_eq!(summary.particles, 16);
    assert_eq!(summary.run, 1);
    assert_eq!(c.phase(), Phase::Done);
    assert!(c.next_tick().is_none());
}

#[test]
fn farthest_particle_settles_at_expected_tick() {
    let cfg = MorphConfig::default();
    let params = MotionParams::from(&cfg);
    let field = grid_field();
    let max_key = field
        .particles()
        .iter()
        .map(|p| p.scan_key)
        .fold(0.0, f64::max);
    assert_eq!(max_key, 24.0);

    let settle_tick = ((max_key + cfg.transition_window) / cfg.scan_speed).ceil();
    assert_eq!(settle_tick, 16.0);
    assert_eq!(
        cell_state(cfg.scan_speed * settle_tick, max_key, &params),
        CellState::Settled
    );
    assert!(matches!(
        cell_state(cfg.scan_speed * (settle_tick - 1.0), max_key, &params),
        CellState::Transitioning { .. }
    ));
}

#[test]
fn completion_callback_fires_once_per_run() {
    let seen = Arc::new(Mutex::new(Vec::<RunSummary>::new()));
    let mut c = ready_controller(grid_field());
    let sink = seen.clone();
    c.on_complete(move |s| sink.lock().unwrap().push(*s));

    let first = c.start().unwrap();
    let (_, a) = drive(&mut c, first);
    assert_eq!(seen.lock().unwrap().len(), 1);

    // Re-delivering an old token after completion is a no-op.
    assert_eq!(c.tick(first.unwrap()), TickOutcome::Stale);
    assert_eq!(seen.lock().unwrap().len(), 1);

    let again = c.replay().unwrap();
    assert_eq!(c.progress(), 0.0);
    let (_, b) = drive(&mut c, again);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].run, 2);
    assert_eq!(a.unwrap().ticks, b.unwrap().ticks);
}

#[test]
fn replay_reuses_the_same_field() {
    let mut c = ready_controller(grid_field());
    let first = c.start().unwrap();
    let before = Arc::clone(c.field().unwrap());
    drive(&mut c, first);
    c.replay().unwrap();
    assert!(Arc::ptr_eq(&before, c.field().unwrap()));
}

#[test]
fn reset_cancels_pending_tick_and_drops_field() {
    let mut c = ready_controller(grid_field());
    let first = c.start().unwrap().unwrap();
    let TickOutcome::Continue { next, .. } = c.tick(first) else {
        panic!("expected continue");
    };

    c.reset();
    assert_eq!(c.phase(), Phase::Idle);
    assert!(c.field().is_none());
    assert_eq!(c.tick(next), TickOutcome::Stale);
    assert!(c.start().is_err());

    let frame = c.surface().unwrap().snapshot();
    let bg = MorphConfig::default().background;
    assert!(frame.data.chunks_exact(4).all(|px| px == bg));
}

#[test]
fn stop_cancels_and_start_resumes() {
    let mut c = ready_controller(grid_field());
    let first = c.start().unwrap().unwrap();
    let TickOutcome::Continue { next, .. } = c.tick(first) else {
        panic!("expected continue");
    };
    c.stop();
    assert!(!c.is_running());
    assert_eq!(c.tick(next), TickOutcome::Stale);
    assert_eq!(c.progress(), 8.0);

    let resumed = c.start().unwrap();
    let (progress, summary) = drive(&mut c, resumed);
    assert_eq!(progress[0], 16.0);
    assert_eq!(summary.unwrap().ticks, 20);
}

#[test]
fn missing_surface_makes_ticks_no_ops() {
    let mut c = ready_controller(grid_field());
    let surface = c.detach_surface().unwrap();
    let tok = c.start().unwrap().unwrap();
    assert_eq!(c.tick(tok), TickOutcome::SurfaceUnavailable);
    assert_eq!(c.progress(), 0.0);

    c.attach_surface(surface);
    assert!(matches!(c.tick(tok), TickOutcome::Continue { .. }));
}

#[test]
fn empty_field_is_done_without_ticking() {
    let calls = Arc::new(Mutex::new(0));
    let mut c = ready_controller(ParticleField::new(Canvas::new(0, 0), 4, vec![]));
    let counter = calls.clone();
    c.on_complete(move |_| *counter.lock().unwrap() += 1);

    assert_eq!(c.start().unwrap(), None);
    assert_eq!(c.phase(), Phase::Done);
    assert_eq!(c.last_summary().unwrap().ticks, 0);
    assert_eq!(*calls.lock().unwrap(), 1);
}

#[test]
fn empty_run_leaves_the_surface_on_the_background() {
    let bg = MorphConfig::default().background;
    let all_background = |c: &AnimationController| {
        c.surface()
            .unwrap()
            .snapshot()
            .data
            .chunks_exact(4)
            .all(|px| px == bg)
    };
    let mut c = ready_controller(ParticleField::new(Canvas::new(16, 16), 4, vec![]));
    assert!(!all_background(&c));

    assert_eq!(c.start().unwrap(), None);
    assert!(all_background(&c));

    c.attach_surface(CpuSurface::new(Canvas::new(16, 16)).unwrap());
    assert_eq!(c.replay().unwrap(), None);
    assert!(all_background(&c));
}

#[test]
fn out_of_order_transitions_are_rejected() {
    let mut c = AnimationController::new(MorphConfig::default()).unwrap();
    assert!(c.begin_pairing().is_err());
    assert!(c.start().is_err());
    assert!(c.replay().is_err());
    c.begin_sampling().unwrap();
    assert!(c.begin_sampling().is_err());
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = MorphConfig {
        scan_speed: -1.0,
        ..MorphConfig::default()
    };
    assert!(AnimationController::new(cfg).is_err());
}
