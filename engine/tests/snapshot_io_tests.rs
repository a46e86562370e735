use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use engine::{
    FrameLogic, FrameTime, HeadlessRunner,
    graphics::Renderer2d,
    snapshot::{FrameSnapshot, read_snapshots, write_snapshots},
    surface::{RgbaFrame, SurfaceSize},
    ui::Rect,
};

fn unique_temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("engine_snapshot_io_{nanos}"))
}

/// A bar that grows one pixel per second of elapsed time.
struct GrowingBar;

impl FrameLogic for GrowingBar {
    type State = u32;
    type Input = ();

    fn initial_state(&mut self) -> Self::State {
        0
    }

    fn step(&mut self, state: &mut Self::State, _input: (), time: FrameTime) {
        *state = time.elapsed as u32;
    }
}

fn render_hashes(frames: usize) -> Vec<FrameSnapshot> {
    let size = SurfaceSize::new(32, 8);
    let mut runner = HeadlessRunner::new(GrowingBar);
    let mut rgba = RgbaFrame::new(size);
    let mut out = Vec::new();
    for _ in 0..frames {
        let frame = runner.step((), 1.0);
        {
            let mut gfx = rgba.renderer();
            gfx.clear([0, 0, 0, 255]);
            gfx.fill_rect(Rect::new(0, 0, *runner.state(), 8), [255, 255, 255, 255]);
        }
        out.push(FrameSnapshot::capture(frame, &rgba));
    }
    out
}

#[test]
fn headless_renders_hash_identically_across_runs() {
    let a = render_hashes(5);
    let b = render_hashes(5);
    assert_eq!(a, b);

    let distinct: std::collections::HashSet<_> = a.iter().map(|s| s.hash.as_str()).collect();
    assert_eq!(distinct.len(), 5, "each frame draws a wider bar");
    assert_eq!(a.last().map(|s| s.frame), Some(5));
}

#[test]
fn snapshots_round_trip_through_json_file() {
    let dir = unique_temp_dir();
    let path = dir.join("nested").join("hashes.json");
    let snapshots = render_hashes(3);

    write_snapshots(&path, &snapshots).expect("write snapshots");
    let loaded = read_snapshots(&path).expect("read snapshots");
    assert_eq!(loaded, snapshots);
    assert_eq!(loaded[0].width, 32);
    assert_eq!(loaded[0].hash.len(), 64);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn reading_a_missing_snapshot_file_fails() {
    let path = unique_temp_dir().join("missing.json");
    assert!(read_snapshots(&path).is_err());
}
