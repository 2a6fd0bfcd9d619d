//! Pool of reusable intermediate frame buffers.
//!
//! Avoids reallocating working buffers every tick by keeping released
//! buffers in size-keyed free lists. Two budgets apply: `max_pooled`
//! bounds how much memory idle buffers may hold, and `max_live` bounds
//! the total memory of buffers currently checked out; exceeding the
//! latter is the recoverable allocation failure of a tick.

use procamp_core::{FrameBuffer, ProcAmpError, Result};
use std::collections::HashMap;

/// Default budget for idle pooled buffers (64 MB).
pub const DEFAULT_POOL_BUDGET: usize = 64 * 1024 * 1024;

/// Default budget for live (checked-out) buffers (512 MB).
pub const DEFAULT_LIVE_BUDGET: usize = 512 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BufferKey {
    width: u32,
    height: u32,
}

/// Size-keyed pool of frame buffers.
pub struct BufferPool {
    free: HashMap<BufferKey, Vec<FrameBuffer>>,
    pooled_memory: usize,
    max_pooled: usize,
    live_memory: usize,
    max_live: usize,
}

impl BufferPool {
    /// Pool with the default budgets.
    pub fn new() -> Self {
        Self::with_budgets(DEFAULT_POOL_BUDGET, DEFAULT_LIVE_BUDGET)
    }

    /// Pool with explicit idle and live memory budgets.
    pub fn with_budgets(max_pooled: usize, max_live: usize) -> Self {
        Self {
            free: HashMap::new(),
            pooled_memory: 0,
            max_pooled,
            live_memory: 0,
            max_live,
        }
    }

    /// Acquire a buffer of the given size, reusing a pooled one if
    /// available. Fails when the live budget would be exceeded.
    pub fn acquire(&mut self, width: u32, height: u32) -> Result<FrameBuffer> {
        let size = (width as usize) * (height as usize) * 16;
        if self.live_memory + size > self.max_live {
            return Err(ProcAmpError::OutOfMemory(format!(
                "{width}x{height} buffer would exceed live budget \
                 ({} of {} bytes in use)",
                self.live_memory, self.max_live
            )));
        }

        let key = BufferKey { width, height };
        let buffer = if let Some(buf) = self.free.get_mut(&key).and_then(Vec::pop) {
            self.pooled_memory -= buf.memory_size();
            buf
        } else {
            FrameBuffer::new(width, height)
        };

        self.live_memory += size;
        Ok(buffer)
    }

    /// Return a buffer. It goes back to the free list unless the idle
    /// budget is full, in which case it is dropped.
    pub fn release(&mut self, buffer: FrameBuffer) {
        let size = buffer.memory_size();
        self.live_memory = self.live_memory.saturating_sub(size);

        if self.pooled_memory + size > self.max_pooled {
            return; // buffer is dropped
        }

        let key = BufferKey {
            width: buffer.width(),
            height: buffer.height(),
        };
        self.pooled_memory += size;
        self.free.entry(key).or_default().push(buffer);
    }

    /// Memory held by idle pooled buffers.
    pub fn pooled_memory(&self) -> usize {
        self.pooled_memory
    }

    /// Memory held by checked-out buffers.
    pub fn live_memory(&self) -> usize {
        self.live_memory
    }

    /// Number of idle buffers in the pool.
    pub fn idle_count(&self) -> usize {
        self.free.values().map(Vec::len).sum()
    }

    /// Drop all idle buffers.
    pub fn clear(&mut self) {
        self.free.clear();
        self.pooled_memory = 0;
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}
