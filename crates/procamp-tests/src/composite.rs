//! Image-effect mode integration tests.
//!
//! The processor composites the adjusted source over an externally
//! rendered base frame, with aspect-ratio correction and blending.

use crate::init_tracing;
use procamp_core::{Color, FrameBuffer, ProcAmpParams};
use procamp_render::{FrameProcessor, PassProgramTable, SoftwareExecutor, StaticSource, TickOutcome};

fn processor() -> FrameProcessor<SoftwareExecutor> {
    FrameProcessor::new(SoftwareExecutor::new(), PassProgramTable::sequential())
}

#[test]
fn missing_source_passes_the_base_through() {
    init_tracing();
    let mut proc = processor();
    let base = FrameBuffer::test_pattern(16, 16);
    let mut dest = FrameBuffer::new(16, 16);

    let outcome = proc
        .tick_image_effect(&ProcAmpParams::default(), &StaticSource::new(None), &base, &mut dest)
        .unwrap();

    assert_eq!(outcome, TickOutcome::NoSource);
    assert_eq!(dest, base);
}

#[test]
fn opaque_video_replaces_the_base() {
    let mut proc = processor();
    let base = FrameBuffer::solid(16, 16, Color::RED);
    let video = FrameBuffer::solid(16, 16, Color::BLUE);
    let mut dest = FrameBuffer::new(16, 16);

    proc.tick_image_effect(&ProcAmpParams::default(), &video, &base, &mut dest)
        .unwrap();

    let [r, _, b, a] = dest.pixel(8, 8);
    assert_eq!(b, 1.0);
    assert_eq!(r, 0.0);
    assert_eq!(a, 1.0);
}

#[test]
fn half_opacity_mixes_video_and_base() {
    let mut proc = processor();
    let base = FrameBuffer::solid(8, 8, Color::BLACK);
    let video = FrameBuffer::solid(8, 8, Color::WHITE);
    let mut dest = FrameBuffer::new(8, 8);
    let params = ProcAmpParams {
        opacity: 0.5,
        ..Default::default()
    };

    proc.tick_image_effect(&params, &video, &base, &mut dest)
        .unwrap();

    // 1.0 * 0.5 + 0.0 * 0.5 over black.
    assert!((dest.pixel(4, 4)[0] - 0.5).abs() < 1e-5);
}

#[test]
fn keyed_green_screen_reveals_the_base() {
    let mut proc = processor();
    let base = FrameBuffer::solid(16, 16, Color::RED);
    let video = FrameBuffer::solid(16, 16, Color::GREEN);
    let mut dest = FrameBuffer::new(16, 16);
    let params = ProcAmpParams {
        keying: true,
        ..Default::default()
    };

    proc.tick_image_effect(&params, &video, &base, &mut dest)
        .unwrap();

    let [r, g, _, _] = dest.pixel(8, 8);
    assert!((r - 1.0).abs() < 1e-5, "base shows through keyed video");
    assert!(g < 1e-5, "keyed green contributes nothing");
}

#[test]
fn wide_base_letterboxes_square_video_horizontally() {
    let mut proc = processor();
    let base = FrameBuffer::solid(64, 32, Color::BLACK);
    let video = FrameBuffer::solid(32, 32, Color::WHITE);
    let mut dest = FrameBuffer::new(64, 32);
    // Opacity below one keeps the alpha blend so the base survives in
    // the letterboxed bands.
    let params = ProcAmpParams {
        opacity: 0.999,
        ..Default::default()
    };

    proc.tick_image_effect(&params, &video, &base, &mut dest)
        .unwrap();

    // Square video centered on a 2:1 base: the middle half is video,
    // the outer quarters stay base.
    assert!(dest.pixel(2, 16)[0] < 1e-5, "left band keeps the base");
    assert!(dest.pixel(61, 16)[0] < 1e-5, "right band keeps the base");
    assert!(dest.pixel(32, 16)[0] > 0.99, "center shows the video");
}

#[test]
fn nothing_stays_live_after_an_image_effect_tick() {
    let mut proc = processor();
    let base = FrameBuffer::test_pattern(16, 16);
    let video = FrameBuffer::test_pattern(16, 16);
    let mut dest = FrameBuffer::new(16, 16);

    proc.tick_image_effect(&ProcAmpParams::default(), &video, &base, &mut dest)
        .unwrap();

    assert_eq!(proc.pool().live_memory(), 0);
}
