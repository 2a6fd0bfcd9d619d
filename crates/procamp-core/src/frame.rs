//! Frame buffers for images in CPU memory.
//!
//! The pipeline works on a single packed RGBA 32-bit-float plane. That is
//! the format intermediate pass outputs live in, so there is no format
//! negotiation between passes.

use crate::color::Color;

/// A rectangular RGBA32F image buffer.
///
/// Channel layout is interleaved `[r, g, b, a]` per pixel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl FrameBuffer {
    /// Create a zero-filled (transparent black) buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width * height * 4) as usize],
        }
    }

    /// Create a buffer filled with a solid color.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let mut frame = Self::new(width, height);
        frame.fill(color);
        frame
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Aspect ratio as height / width.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.height as f32 / self.width as f32
    }

    /// Total memory usage of this frame in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }

    /// Raw channel data, interleaved RGBA.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Raw channel data, mutable.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Read one pixel. `x`/`y` must be in bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Write one pixel. `x`/`y` must be in bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [f32; 4]) {
        let i = ((y * self.width + x) * 4) as usize;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Fill the whole buffer with a solid color.
    pub fn fill(&mut self, color: Color) {
        for px in self.data.chunks_exact_mut(4) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
            px[3] = color.a;
        }
    }

    /// One row of interleaved RGBA values.
    #[inline]
    pub fn row(&self, y: u32) -> &[f32] {
        let start = (y * self.width * 4) as usize;
        &self.data[start..start + (self.width * 4) as usize]
    }

    /// Iterate rows mutably; used for parallel per-row kernels.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, f32> {
        self.data.chunks_exact_mut((self.width * 4) as usize)
    }

    /// Create a test pattern frame (eight vertical color bars).
    pub fn test_pattern(width: u32, height: u32) -> Self {
        const BARS: [Color; 8] = [
            Color::WHITE,
            Color::new(1.0, 1.0, 0.0, 1.0),
            Color::new(0.0, 1.0, 1.0, 1.0),
            Color::GREEN,
            Color::new(1.0, 0.0, 1.0, 1.0),
            Color::RED,
            Color::BLUE,
            Color::BLACK,
        ];
        let mut frame = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let bar = (x * 8 / width).min(7) as usize;
                let c = BARS[bar];
                frame.set_pixel(x, y, [c.r, c.g, c.b, c.a]);
            }
        }
        frame
    }
}
