use super::*;

fn frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: vec![v; 16],
        premultiplied: true,
    }
}

fn cfg(run: u64) -> SinkConfig {
    SinkConfig {
        canvas: Canvas::new(2, 2),
        run,
    }
}

#[test]
fn in_memory_sink_collects_in_order_and_resets_on_begin() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(1)).unwrap();
    sink.push_frame(1, &frame(1)).unwrap();
    sink.push_frame(2, &frame(2)).unwrap();
    sink.end().unwrap();
    assert!(sink.is_ended());
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, 2);

    sink.begin(cfg(2)).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.is_ended());
    assert_eq!(sink.config().unwrap().run, 2);
}

#[test]
fn png_sequence_sink_writes_numbered_files() {
    let dir = std::path::PathBuf::from("target").join("png_sequence_sink_test");
    let _ = std::fs::remove_dir_all(&dir);

    let mut sink = PngSequenceSink::new(dir.clone(), "frame");
    sink.begin(cfg(3)).unwrap();
    sink.push_frame(1, &frame(255)).unwrap();
    sink.push_frame(2, &frame(255)).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.written(), 2);
    let first = sink.frame_path(1);
    assert!(first.ends_with("frame_r3_00001.png"));
    let decoded = image::open(&first).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2, 2));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
}
