//! Source and sink collaborator contracts.
//!
//! The host supplies frames through [`FrameSource`] and consumes the
//! processed result through [`FrameSink`]; the processor picks exactly
//! one delivery method per tick from the configured output target.

use procamp_core::FrameBuffer;

/// Supplies the current source image, if one exists yet.
pub trait FrameSource {
    /// The frame to process this tick. `None` means "nothing to show
    /// yet" (e.g. a video that has not started) and is not an error.
    fn current_frame(&self) -> Option<&FrameBuffer>;
}

/// A frame that is always available.
impl FrameSource for FrameBuffer {
    fn current_frame(&self) -> Option<&FrameBuffer> {
        Some(self)
    }
}

/// Host-owned source slot that may or may not hold a frame.
#[derive(Debug, Default)]
pub struct StaticSource {
    pub frame: Option<FrameBuffer>,
}

impl StaticSource {
    pub fn new(frame: Option<FrameBuffer>) -> Self {
        Self { frame }
    }
}

impl FrameSource for StaticSource {
    fn current_frame(&self) -> Option<&FrameBuffer> {
        self.frame.as_ref()
    }
}

/// Consumes the processed frame.
pub trait FrameSink {
    /// Overlay on the screen.
    fn present(&mut self, frame: &FrameBuffer);

    /// Write into an externally owned texture.
    fn write(&mut self, frame: &FrameBuffer);

    /// Hand to a UI image element.
    fn set_image(&mut self, frame: &FrameBuffer);
}

/// Sink that records deliveries, for tests.
#[derive(Debug, Default)]
pub struct CapturingSink {
    pub presented: u32,
    pub written: u32,
    pub images_set: u32,
    pub last_frame: Option<FrameBuffer>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total deliveries across all three methods.
    pub fn deliveries(&self) -> u32 {
        self.presented + self.written + self.images_set
    }
}

impl FrameSink for CapturingSink {
    fn present(&mut self, frame: &FrameBuffer) {
        self.presented += 1;
        self.last_frame = Some(frame.clone());
    }

    fn write(&mut self, frame: &FrameBuffer) {
        self.written += 1;
        self.last_frame = Some(frame.clone());
    }

    fn set_image(&mut self, frame: &FrameBuffer) {
        self.images_set += 1;
        self.last_frame = Some(frame.clone());
    }
}
