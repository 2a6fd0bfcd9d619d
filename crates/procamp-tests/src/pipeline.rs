//! Standalone-mode integration tests.
//!
//! Full processor against the software executor: frames go in through a
//! source, ticks run real passes, and the capturing sink sees what a
//! host would.

use crate::init_tracing;
use glam::Vec3;
use procamp_color::color_balance;
use procamp_core::{Color, FrameBuffer, ProcAmpParams};
use procamp_render::{
    CapturingSink, FrameProcessor, PassProgramTable, SoftwareExecutor, TickOutcome,
};

fn processor() -> FrameProcessor<SoftwareExecutor> {
    FrameProcessor::new(SoftwareExecutor::new(), PassProgramTable::sequential())
}

fn assert_frames_close(a: &FrameBuffer, b: &FrameBuffer) {
    assert_eq!((a.width(), a.height()), (b.width(), b.height()));
    for (i, (x, y)) in a.data().iter().zip(b.data()).enumerate() {
        assert!((x - y).abs() < 1e-5, "channel {i}: {x} vs {y}");
    }
}

#[test]
fn neutral_defaults_leave_the_frame_untouched() {
    init_tracing();
    let mut proc = processor();
    let mut sink = CapturingSink::new();
    let frame = FrameBuffer::test_pattern(64, 64);

    let outcome = proc
        .tick(&ProcAmpParams::default(), &frame, &mut sink)
        .unwrap();

    assert_eq!(outcome, TickOutcome::Presented);
    let shown = sink.last_frame.as_ref().unwrap();
    assert_frames_close(shown, &frame);
}

#[test]
fn brightness_lifts_every_channel() {
    let mut proc = processor();
    let mut sink = CapturingSink::new();
    let frame = FrameBuffer::solid(16, 16, Color::new(0.25, 0.25, 0.25, 1.0));
    let params = ProcAmpParams {
        brightness: 1.0,
        ..Default::default()
    };

    proc.tick(&params, &frame, &mut sink).unwrap();

    // Packed brightness is 0.5: 0.25 + 0.5 = 0.75.
    let [r, g, b, _] = sink.last_frame.as_ref().unwrap().pixel(8, 8);
    assert!((r - 0.75).abs() < 1e-5);
    assert!((g - 0.75).abs() < 1e-5);
    assert!((b - 0.75).abs() < 1e-5);
}

#[test]
fn warm_temperature_tips_gray_toward_red() {
    let mut proc = processor();
    let mut sink = CapturingSink::new();
    let frame = FrameBuffer::solid(8, 8, Color::new(0.5, 0.5, 0.5, 1.0));
    let params = ProcAmpParams {
        temperature: 1.0,
        ..Default::default()
    };

    proc.tick(&params, &frame, &mut sink).unwrap();

    let [r, g, b, _] = sink.last_frame.as_ref().unwrap().pixel(4, 4);
    assert!(r > b, "warm balance must boost red over blue ({r} vs {b})");

    // With every other control neutral, the output is exactly the gray
    // scaled by the balance coefficients.
    let expected = Vec3::splat(0.5) * color_balance(1.0, 0.0).unwrap();
    assert!((Vec3::new(r, g, b) - expected).abs().max_element() < 1e-4);
}

#[test]
fn keying_clears_green_and_keeps_foreground() {
    init_tracing();
    let mut proc = processor();
    let mut sink = CapturingSink::new();

    // Left half green screen, right half red foreground.
    let mut frame = FrameBuffer::new(32, 32);
    for y in 0..32 {
        for x in 0..32 {
            let color = if x < 16 { Color::GREEN } else { Color::RED };
            frame.set_pixel(x, y, [color.r, color.g, color.b, color.a]);
        }
    }

    let params = ProcAmpParams {
        keying: true,
        ..Default::default()
    };
    proc.tick(&params, &frame, &mut sink).unwrap();

    let shown = sink.last_frame.as_ref().unwrap();
    assert_eq!(shown.pixel(4, 16)[3], 0.0, "green side keyed out");
    assert_eq!(shown.pixel(28, 16)[3], 1.0, "red side kept");
}

#[test]
fn steady_state_reuses_buffers_across_ticks() {
    let mut proc = processor();
    let mut sink = CapturingSink::new();
    let frame = FrameBuffer::test_pattern(32, 32);
    let params = ProcAmpParams {
        keying: true,
        ..Default::default()
    };

    for _ in 0..4 {
        let outcome = proc.tick(&params, &frame, &mut sink).unwrap();
        assert_eq!(outcome, TickOutcome::Presented);
    }

    // One retained output buffer live, everything else pooled.
    assert_eq!(proc.pool().live_memory(), 32 * 32 * 16);
    assert!(proc.pool().idle_count() <= 2);
    assert_eq!(sink.presented, 4);
}

#[test]
fn parameter_snapshot_survives_json_round_trip() {
    let params = ProcAmpParams {
        brightness: 0.3,
        keying: true,
        key_color: Color::rgb(0.1, 0.8, 0.2),
        opacity: 0.75,
        ..Default::default()
    };
    let json = serde_json::to_string(&params).unwrap();
    let back: ProcAmpParams = serde_json::from_str(&json).unwrap();
    assert_eq!(back, params);
}
