use super::*;
use crate::foundation::core::Point;
use crate::render::frame::{CellKind, CellOp};

fn plan(ops: Vec<CellOp>) -> FramePlan {
    FramePlan {
        clear: [10, 20, 30, 255],
        ops,
    }
}

#[test]
fn rejects_empty_and_oversized_canvases() {
    assert!(matches!(
        CpuSurface::new(Canvas::new(0, 4)).unwrap_err(),
        PixmorphError::Render(_)
    ));
    assert!(CpuSurface::new(Canvas::new(70_000, 4)).is_err());
}

#[test]
fn execute_clears_then_fills_cells() {
    let mut s = CpuSurface::new(Canvas::new(16, 16)).unwrap();
    s.execute(&plan(vec![CellOp {
        origin: Point::new(4.0, 4.0),
        size: 4.0,
        rgba: [200, 100, 50, 255],
        kind: CellKind::Body,
    }]));
    let frame = s.snapshot();
    assert_eq!((frame.width, frame.height), (16, 16));
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(5, 5), Some([200, 100, 50, 255]));
    assert_eq!(frame.pixel(12, 12), Some([10, 20, 30, 255]));
}

#[test]
fn every_frame_is_a_full_repaint() {
    let mut s = CpuSurface::new(Canvas::new(8, 8)).unwrap();
    s.execute(&plan(vec![CellOp {
        origin: Point::new(0.0, 0.0),
        size: 4.0,
        rgba: [255, 255, 255, 255],
        kind: CellKind::Body,
    }]));
    s.execute(&plan(vec![]));
    let frame = s.snapshot();
    assert!(frame.data.chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
}

#[test]
fn offscreen_cells_are_ignored() {
    let mut s = CpuSurface::new(Canvas::new(8, 8)).unwrap();
    s.execute(&plan(vec![CellOp {
        origin: Point::new(-20.0, 40.0),
        size: 4.0,
        rgba: [255, 0, 0, 255],
        kind: CellKind::Body,
    }]));
    assert!(s.snapshot().data.chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
}

#[test]
fn clear_premultiplies() {
    let mut s = CpuSurface::new(Canvas::new(2, 2)).unwrap();
    s.clear([200, 100, 0, 128]);
    assert_eq!(s.snapshot().pixel(1, 1), Some([100, 50, 0, 128]));
}
