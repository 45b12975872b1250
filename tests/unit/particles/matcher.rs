use std::collections::HashSet;

use super::*;
use crate::foundation::core::{Canvas, Point, Rgb8};

fn gray(x: u32, y: u32, v: u8) -> Particle {
    Particle::new(x, y, Rgb8::new(v, v, v))
}

/// 4x4 grid of 4px cells with distinct gray levels; `order` maps cell index -> gray value.
fn grid_raster(order: impl Fn(u32) -> u8) -> Raster {
    let mut r = Raster::filled(16, 16, [0, 0, 0, 255]);
    for cell in 0..16u32 {
        let (cx, cy) = ((cell % 4) * 4, (cell / 4) * 4);
        let v = order(cell);
        for y in cy..cy + 4 {
            for x in cx..cx + 4 {
                r.put_pixel(x, y, [v, v, v, 255]);
            }
        }
    }
    r
}

#[test]
fn pairs_by_luminance_rank() {
    let source = vec![gray(0, 0, 200), gray(4, 0, 10), gray(8, 0, 100)];
    let target = vec![gray(0, 4, 90), gray(4, 4, 250), gray(8, 4, 5)];
    let mut rng = Rng64::new(1);
    let paired = pair_particles(source, target, 0.0, &mut rng);

    let find = |sx: f64| paired.iter().find(|p| p.source.x == sx).unwrap();
    // darkest -> darkest, brightest -> brightest
    assert_eq!(find(4.0).target, Point::new(8.0, 4.0));
    assert_eq!(find(8.0).target, Point::new(0.0, 4.0));
    assert_eq!(find(0.0).target, Point::new(4.0, 4.0));
    assert_eq!(find(0.0).color, Rgb8::new(200, 200, 200));
}

#[test]
fn output_is_bijective_and_truncated_to_shorter_side() {
    let source: Vec<_> = (0..10).map(|i| gray(i * 4, 0, (i * 20) as u8)).collect();
    let target: Vec<_> = (0..6).map(|i| gray(i * 4, 8, (250 - i * 30) as u8)).collect();
    let mut rng = Rng64::new(9);
    let paired = pair_particles(source, target, 4.0, &mut rng);
    assert_eq!(paired.len(), 6);

    let srcs: HashSet<_> = paired.iter().map(|p| p.source.x as u32).collect();
    let dsts: HashSet<_> = paired.iter().map(|p| p.target.x as u32).collect();
    assert_eq!(srcs.len(), 6);
    assert_eq!(dsts.len(), 6);
    // The four brightest sources (values 120..=180) are the dropped ones.
    for i in 0..6u32 {
        assert!(srcs.contains(&(i * 4)));
    }
}

#[test]
fn truncation_drops_brightest_targets() {
    let source: Vec<_> = (0..3).map(|i| gray(i * 4, 0, (i * 50) as u8)).collect();
    let target: Vec<_> = (0..5).map(|i| gray(i * 4, 0, (240 - i * 40) as u8)).collect();
    let mut rng = Rng64::new(2);
    let paired = pair_particles(source, target, 0.0, &mut rng);
    let kept: HashSet<_> = paired.iter().map(|p| p.target.x as u32).collect();
    // Target values: x=0:240, 4:200, 8:160, 12:120, 16:80. Darkest three are x=16,12,8.
    assert_eq!(kept, HashSet::from([8, 12, 16]));
}

#[test]
fn result_is_sorted_by_target_diagonal() {
    let source: Vec<_> = (0..16).map(|i| gray((i % 4) * 4, (i / 4) * 4, (i * 13) as u8)).collect();
    let target: Vec<_> = (0..16)
        .map(|i| gray((i % 4) * 4, (i / 4) * 4, (255 - i * 13) as u8))
        .collect();
    let mut rng = Rng64::new(3);
    let paired = pair_particles(source, target, 8.0, &mut rng);
    for w in paired.windows(2) {
        assert!(w[0].scan_key <= w[1].scan_key);
    }
    for p in &paired {
        assert_eq!(p.scan_key, p.target.x + p.target.y);
        assert!(p.jitter.length() <= 8.0);
    }
}

#[test]
fn empty_side_yields_empty_output() {
    let mut rng = Rng64::new(4);
    assert!(pair_particles(vec![], vec![gray(0, 0, 1)], 1.0, &mut rng).is_empty());
    assert!(pair_particles(vec![gray(0, 0, 1)], vec![], 1.0, &mut rng).is_empty());
}

#[test]
fn four_by_four_scenario_pairs_darkest_cells() {
    // Source: cell 5 is darkest. Target: cell 14 is darkest.
    let source = grid_raster(|c| if c == 5 { 3 } else { 20 + (c as u8) * 10 });
    let target = grid_raster(|c| if c == 14 { 1 } else { 250 - (c as u8) * 10 });
    let cfg = MorphConfig::default();
    let field = build_field(&source, &target, &cfg).unwrap();

    assert_eq!(field.len(), 16);
    assert_eq!(field.canvas(), Canvas::new(16, 16));
    assert_eq!(field.max_scan(), 32.0);
    let darkest = field
        .particles()
        .iter()
        .find(|p| p.source == Point::new(4.0, 4.0))
        .unwrap();
    assert_eq!(darkest.target, Point::new(8.0, 12.0));
    assert_eq!(darkest.color, Rgb8::new(3, 3, 3));
}

#[test]
fn build_field_rejects_mismatched_rasters() {
    let a = Raster::filled(8, 8, [0, 0, 0, 255]);
    let b = Raster::filled(8, 4, [0, 0, 0, 255]);
    let err = build_field(&a, &b, &MorphConfig::default()).unwrap_err();
    assert!(matches!(err, PixmorphError::Computation(_)));
}

#[test]
fn build_field_is_reproducible_for_a_seed() {
    let a = grid_raster(|c| (c as u8) * 15);
    let b = grid_raster(|c| 240 - (c as u8) * 15);
    let cfg = MorphConfig::default();
    assert_eq!(
        build_field(&a, &b, &cfg).unwrap(),
        build_field(&a, &b, &cfg).unwrap()
    );
}
