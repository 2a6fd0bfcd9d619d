//! Per-tick pass orchestration.
//!
//! One [`FrameProcessor::tick`] call per host frame. The processor owns
//! the buffer pool, the cached derived color values, and the single
//! frame retained for the sink between ticks; nothing else survives a
//! tick. Recoverable conditions (no source, allocation failure,
//! degenerate white point, bad trim) never fail the call — they are
//! logged and the tick is skipped or corrected.

use crate::blend::BlendState;
use crate::buffer_pool::BufferPool;
use crate::executor::PassExecutor;
use crate::pass::{color_adjust_kind, PassDescriptor, PassKind, PassProgramTable, PassUniforms};
use crate::sink::{FrameSink, FrameSource};
use glam::{Vec2, Vec3};
use procamp_color::{CachedColorBalance, CachedKeyChroma};
use procamp_core::{FrameBuffer, OutputTarget, ProcAmpError, ProcAmpParams, Result};
use tracing::{debug, warn};

/// Optional matte refinement passes. Off by default; turning them on
/// inserts the dilate/blur chain without restructuring the tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefinementSettings {
    pub dilate: bool,
    pub blur: bool,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was processed and delivered.
    Presented,
    /// No source image yet; nothing to show.
    NoSource,
    /// Recoverable failure (e.g. allocation); presentation skipped.
    Skipped,
}

/// Stateful per-frame orchestrator.
pub struct FrameProcessor<E> {
    executor: E,
    programs: PassProgramTable,
    pool: BufferPool,
    balance: CachedColorBalance,
    chroma: CachedKeyChroma,
    retained: Option<FrameBuffer>,
    refinement: RefinementSettings,
}

impl<E: PassExecutor> FrameProcessor<E> {
    pub fn new(executor: E, programs: PassProgramTable) -> Self {
        Self::with_pool(executor, programs, BufferPool::new())
    }

    pub fn with_pool(executor: E, programs: PassProgramTable, pool: BufferPool) -> Self {
        Self {
            executor,
            programs,
            pool,
            balance: CachedColorBalance::new(),
            chroma: CachedKeyChroma::new(),
            retained: None,
            refinement: RefinementSettings::default(),
        }
    }

    pub fn set_refinement(&mut self, refinement: RefinementSettings) {
        self.refinement = refinement;
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Standalone-mode tick: process the source and deliver it to the
    /// sink method selected by the output target.
    pub fn tick(
        &mut self,
        params: &ProcAmpParams,
        source: &dyn FrameSource,
        sink: &mut dyn FrameSink,
    ) -> Result<TickOutcome> {
        // The sink may have read the previous frame until now.
        self.release_retained();

        let Some(frame) = source.current_frame() else {
            debug!("no source frame, skipping tick");
            return Ok(TickOutcome::NoSource);
        };

        let uniforms = self.build_uniforms(params);
        let blend = BlendState::select(params.opacity, params.keying);

        let keyed = if params.keying {
            match self.key_chain(&uniforms, blend, frame)? {
                Some(buf) => Some(buf),
                None => return Ok(TickOutcome::Skipped),
            }
        } else {
            None
        };

        let mut working = match self.pool.acquire(frame.width(), frame.height()) {
            Ok(buf) => buf,
            Err(err) => {
                warn!(error = %err, "skipping tick, no working buffer");
                if let Some(buf) = keyed {
                    self.pool.release(buf);
                }
                return Ok(TickOutcome::Skipped);
            }
        };

        // Standalone mode folds geometry into the color-adjust pass.
        let desc = PassDescriptor::new(color_adjust_kind(params), &self.programs, uniforms);
        let adjust_src = keyed.as_ref().unwrap_or(frame);
        let run = self.executor.execute(&desc, blend, adjust_src, None, &mut working);
        if let Some(buf) = keyed {
            self.pool.release(buf);
        }
        if let Err(err) = run {
            self.pool.release(working);
            return Err(err);
        }

        match params.target {
            OutputTarget::Screen => sink.present(&working),
            OutputTarget::Texture => sink.write(&working),
            OutputTarget::UiImage => sink.set_image(&working),
        }

        // Held until the next tick; the sink may read it asynchronously
        // until the next present.
        self.retained = Some(working);
        Ok(TickOutcome::Presented)
    }

    /// Image-effect tick: composite the processed source over `base`
    /// into `dest`, with aspect-ratio correction. `dest` is externally
    /// owned, so nothing is retained across ticks in this mode.
    pub fn tick_image_effect(
        &mut self,
        params: &ProcAmpParams,
        source: &dyn FrameSource,
        base: &FrameBuffer,
        dest: &mut FrameBuffer,
    ) -> Result<TickOutcome> {
        self.release_retained();

        let Some(frame) = source.current_frame() else {
            // Source not ready: the rendered frame passes through.
            if base.data().len() != dest.data().len() {
                return Err(ProcAmpError::Pass(format!(
                    "image effect pass-through size mismatch ({}x{} vs {}x{})",
                    base.width(),
                    base.height(),
                    dest.width(),
                    dest.height()
                )));
            }
            dest.data_mut().copy_from_slice(base.data());
            return Ok(TickOutcome::NoSource);
        };

        let uniforms = self.build_uniforms(params);
        let blend = BlendState::select(params.opacity, params.keying);
        let conv = aspect_conversion(base, frame);

        let keyed = if params.keying {
            match self.key_chain(&uniforms, blend, frame)? {
                Some(buf) => Some(buf),
                None => return Ok(TickOutcome::Skipped),
            }
        } else {
            None
        };

        let mut working = match self.pool.acquire(frame.width(), frame.height()) {
            Ok(buf) => buf,
            Err(err) => {
                warn!(error = %err, "skipping image-effect tick, no working buffer");
                if let Some(buf) = keyed {
                    self.pool.release(buf);
                }
                return Ok(TickOutcome::Skipped);
            }
        };

        // The composite pass owns geometry in this mode.
        let adjust = PassDescriptor::new(
            color_adjust_kind(params),
            &self.programs,
            uniforms.with_identity_geometry(),
        );
        let adjust_src = keyed.as_ref().unwrap_or(frame);
        let run = self
            .executor
            .execute(&adjust, blend, adjust_src, None, &mut working);
        if let Some(buf) = keyed {
            self.pool.release(buf);
        }
        if let Err(err) = run {
            self.pool.release(working);
            return Err(err);
        }

        let composite = PassDescriptor::new(
            PassKind::Composite,
            &self.programs,
            uniforms.with_aspect(conv),
        );
        let run = self
            .executor
            .execute(&composite, blend, &working, Some(base), dest);
        self.pool.release(working);
        run?;

        Ok(TickOutcome::Presented)
    }

    /// Release everything held across ticks.
    pub fn release_retained(&mut self) {
        if let Some(buf) = self.retained.take() {
            self.pool.release(buf);
        }
    }

    /// Pack per-tick uniforms, recovering from degenerate inputs.
    fn build_uniforms(&mut self, params: &ProcAmpParams) -> PassUniforms {
        let balance = match self.balance.get(params.temperature, params.tint) {
            Ok(v) => v,
            Err(err) => {
                let fallback = self.balance.last_valid().unwrap_or(Vec3::ONE);
                warn!(error = %err, "degenerate white point, keeping previous coefficients");
                fallback
            }
        };

        let key = if params.keying {
            self.chroma.get(params.key_color)
        } else {
            Vec2::ZERO
        };

        let (_, clamped) = params.sanitized_trim();
        if clamped {
            warn!(trim = ?params.trim, "trim fractions leave no frame, clamping");
        }

        PassUniforms::from_params(params, balance, key)
    }

    /// Key-extract plus optional matte refinement. Returns `Ok(None)`
    /// when a buffer could not be acquired (tick skipped).
    fn key_chain(
        &mut self,
        uniforms: &PassUniforms,
        blend: BlendState,
        frame: &FrameBuffer,
    ) -> Result<Option<FrameBuffer>> {
        let (w, h) = (frame.width(), frame.height());
        let mut current = match self.pool.acquire(w, h) {
            Ok(buf) => buf,
            Err(err) => {
                warn!(error = %err, "skipping tick, no matte buffer");
                return Ok(None);
            }
        };

        let extract = PassDescriptor::new(PassKind::KeyExtract, &self.programs, *uniforms);
        if let Err(err) = self.executor.execute(&extract, blend, frame, None, &mut current) {
            self.pool.release(current);
            return Err(err);
        }

        let mut refine = Vec::new();
        if self.refinement.dilate {
            refine.push(PassKind::AlphaDilate);
        }
        if self.refinement.blur {
            refine.push(PassKind::AlphaBlurH);
            refine.push(PassKind::AlphaBlurV);
        }

        for kind in refine {
            let mut next = match self.pool.acquire(w, h) {
                Ok(buf) => buf,
                Err(err) => {
                    warn!(error = %err, "skipping tick, no refinement buffer");
                    self.pool.release(current);
                    return Ok(None);
                }
            };
            let desc = PassDescriptor::new(kind, &self.programs, *uniforms);
            let run = self.executor.execute(&desc, blend, &current, None, &mut next);
            self.pool.release(current);
            if let Err(err) = run {
                self.pool.release(next);
                return Err(err);
            }
            current = next;
        }

        Ok(Some(current))
    }
}

/// Aspect-ratio correction for compositing a texture over a screen
/// frame. The axis with the larger factor gets letterboxed.
fn aspect_conversion(screen: &FrameBuffer, texture: &FrameBuffer) -> Vec2 {
    let conv = screen.aspect() / texture.aspect();
    if conv > 1.0 {
        Vec2::new(1.0, conv)
    } else {
        Vec2::new(1.0 / conv, 1.0)
    }
}
