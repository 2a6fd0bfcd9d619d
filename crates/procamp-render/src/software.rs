//! CPU reference implementation of the logical passes.
//!
//! Pixel-exact counterpart of the GPU programs: the keyer works on YCgCo
//! chroma distance, color adjust applies the packed
//! (brightness, contrast, saturation) triple plus the white-balance
//! multiply, and composite does the UV mapping and fixed-function
//! blending. Rows are processed in parallel with rayon.

use crate::blend::{BlendFactor, BlendState};
use crate::executor::PassExecutor;
use crate::pass::{PassDescriptor, PassKind, PassUniforms};
use glam::{Vec2, Vec3};
use procamp_color::{rgb_to_ycgco, ycgco_to_rgb};
use procamp_core::{FrameBuffer, ProcAmpError, Result};
use rayon::prelude::*;

/// CPU pass executor.
#[derive(Debug, Default)]
pub struct SoftwareExecutor;

impl SoftwareExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl PassExecutor for SoftwareExecutor {
    fn execute(
        &mut self,
        pass: &PassDescriptor,
        blend: BlendState,
        src: &FrameBuffer,
        base: Option<&FrameBuffer>,
        dst: &mut FrameBuffer,
    ) -> Result<()> {
        match pass.kind {
            PassKind::KeyExtract => {
                check_dims(src, dst, pass.kind)?;
                key_extract(src, dst, &pass.uniforms);
            }
            PassKind::AlphaDilate => {
                check_dims(src, dst, pass.kind)?;
                alpha_dilate(src, dst);
            }
            PassKind::AlphaBlurH => {
                check_dims(src, dst, pass.kind)?;
                alpha_blur(src, dst, true);
            }
            PassKind::AlphaBlurV => {
                check_dims(src, dst, pass.kind)?;
                alpha_blur(src, dst, false);
            }
            PassKind::ColorAdjustNeutral => {
                check_dims(src, dst, pass.kind)?;
                color_adjust(src, dst, &pass.uniforms, false);
            }
            PassKind::ColorAdjustBalanced => {
                check_dims(src, dst, pass.kind)?;
                color_adjust(src, dst, &pass.uniforms, true);
            }
            PassKind::Composite => {
                if let Some(base) = base {
                    check_dims(base, dst, pass.kind)?;
                }
                composite(src, base, dst, &pass.uniforms, blend);
            }
        }
        Ok(())
    }
}

fn check_dims(reference: &FrameBuffer, dst: &FrameBuffer, kind: PassKind) -> Result<()> {
    if reference.width() != dst.width() || reference.height() != dst.height() {
        return Err(ProcAmpError::Pass(format!(
            "{}: buffer size mismatch ({}x{} vs {}x{})",
            kind.name(),
            reference.width(),
            reference.height(),
            dst.width(),
            dst.height()
        )));
    }
    Ok(())
}

fn smoothstep(lo: f32, hi: f32, x: f32) -> f32 {
    let t = ((x - lo) / (hi - lo).max(1e-6)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Map an output UV through aspect correction, scale/offset, and trim.
fn map_uv(uv: Vec2, u: &PassUniforms) -> Vec2 {
    let aspect = Vec2::new(u.aspect_conv.x, u.aspect_conv.y);
    let scale = Vec2::new(u.scale_offset.x, u.scale_offset.y);
    let offset = Vec2::new(u.scale_offset.z, u.scale_offset.w);

    let uv = (uv - 0.5) * aspect + 0.5;
    let uv = (uv - 0.5 - offset) / scale + 0.5;
    // Trim insets the drawn region; outside it the source is not sampled.
    Vec2::new(
        (uv.x - u.trim_params.x) * u.trim_params.z,
        (uv.y - u.trim_params.y) * u.trim_params.w,
    )
}

/// Nearest-neighbor sample; `None` outside the source.
fn sample(src: &FrameBuffer, uv: Vec2) -> Option<[f32; 4]> {
    if !(uv.x >= 0.0 && uv.x < 1.0 && uv.y >= 0.0 && uv.y < 1.0) {
        return None;
    }
    let x = ((uv.x * src.width() as f32) as u32).min(src.width() - 1);
    let y = ((uv.y * src.height() as f32) as u32).min(src.height() - 1);
    Some(src.pixel(x, y))
}

fn par_rows<F>(dst: &mut FrameBuffer, f: F)
where
    F: Fn(u32, &mut [f32]) + Sync,
{
    let row_len = (dst.width() * 4) as usize;
    dst.data_mut()
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y as u32, row));
}

fn key_extract(src: &FrameBuffer, dst: &mut FrameBuffer, u: &PassUniforms) {
    let key = Vec2::new(u.key_chroma.x, u.key_chroma.y);
    let key_dir = key.normalize_or_zero();
    let (lo, hi) = (u.key_chroma.z, u.key_chroma.w);
    let spill = u.spill_opacity.x;

    par_rows(dst, |y, row| {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let [r, g, b, a] = src.pixel(x as u32, y);
            let ycgco = rgb_to_ycgco(Vec3::new(r, g, b));
            let chroma = Vec2::new(ycgco.y, ycgco.z);

            // Matte: 0 inside the key range, ramping to 1 outside it.
            let matte = smoothstep(lo, hi, chroma.distance(key));

            // Spill suppression: pull the chroma component pointing at
            // the key color back toward neutral, strongest where the
            // matte is most transparent.
            let proj = chroma.dot(key_dir).max(0.0);
            let chroma = chroma - key_dir * (proj * spill * (1.0 - matte));

            let rgb = ycgco_to_rgb(Vec3::new(ycgco.x, chroma.x, chroma.y));
            px.copy_from_slice(&[rgb.x, rgb.y, rgb.z, a * matte]);
        }
    });
}

fn color_adjust(src: &FrameBuffer, dst: &mut FrameBuffer, u: &PassUniforms, balanced: bool) {
    let brightness = u.color_adjust.x;
    let con_mul = u.color_adjust.y;
    let sat_mul = u.color_adjust.z;
    let balance = Vec3::new(u.color_balance.x, u.color_balance.y, u.color_balance.z);
    let fade = u.fade_to_color;
    let opacity = u.spill_opacity.y;
    let identity_geometry = u.geometry_is_identity();
    let (w, h) = (dst.width() as f32, dst.height() as f32);

    par_rows(dst, |y, row| {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let rgba = if identity_geometry {
                Some(src.pixel(x as u32, y))
            } else {
                let uv = Vec2::new((x as f32 + 0.5) / w, (y as f32 + 0.5) / h);
                sample(src, map_uv(uv, u))
            };
            let Some([r, g, b, a]) = rgba else {
                px.copy_from_slice(&[0.0; 4]);
                continue;
            };

            let mut rgb = Vec3::new(r, g, b);
            if balanced {
                rgb *= balance;
            }
            let luma = rgb.dot(Vec3::new(0.25, 0.5, 0.25));
            rgb = Vec3::splat(luma) + (rgb - Vec3::splat(luma)) * sat_mul;
            rgb = (rgb - 0.5) * con_mul + 0.5 + brightness;
            rgb = rgb.lerp(Vec3::new(fade.x, fade.y, fade.z), fade.w);

            px.copy_from_slice(&[rgb.x, rgb.y, rgb.z, a * opacity]);
        }
    });
}

fn composite(
    src: &FrameBuffer,
    base: Option<&FrameBuffer>,
    dst: &mut FrameBuffer,
    u: &PassUniforms,
    blend: BlendState,
) {
    let (w, h) = (dst.width() as f32, dst.height() as f32);

    par_rows(dst, |y, row| {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let uv = Vec2::new((x as f32 + 0.5) / w, (y as f32 + 0.5) / h);
            let s = sample(src, map_uv(uv, u)).unwrap_or([0.0; 4]);
            let d = base.map_or([0.0; 4], |b| b.pixel(x as u32, y));

            let sf = factor(blend.src, s[3]);
            let df = factor(blend.dst, s[3]);
            px.copy_from_slice(&[
                s[0] * sf + d[0] * df,
                s[1] * sf + d[1] * df,
                s[2] * sf + d[2] * df,
                s[3] * sf + d[3] * df,
            ]);
        }
    });
}

fn factor(f: BlendFactor, src_alpha: f32) -> f32 {
    match f {
        BlendFactor::Zero => 0.0,
        BlendFactor::One => 1.0,
        BlendFactor::SrcAlpha => src_alpha,
        BlendFactor::OneMinusSrcAlpha => 1.0 - src_alpha,
    }
}

fn alpha_dilate(src: &FrameBuffer, dst: &mut FrameBuffer) {
    let (w, h) = (src.width() as i32, src.height() as i32);
    par_rows(dst, |y, row| {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let [r, g, b, _] = src.pixel(x as u32, y);
            let mut alpha = 0.0f32;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let nx = (x as i32 + dx).clamp(0, w - 1);
                    let ny = (y as i32 + dy).clamp(0, h - 1);
                    alpha = alpha.max(src.pixel(nx as u32, ny as u32)[3]);
                }
            }
            px.copy_from_slice(&[r, g, b, alpha]);
        }
    });
}

fn alpha_blur(src: &FrameBuffer, dst: &mut FrameBuffer, horizontal: bool) {
    const KERNEL: [f32; 3] = [0.25, 0.5, 0.25];
    let (w, h) = (src.width() as i32, src.height() as i32);
    par_rows(dst, |y, row| {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let [r, g, b, _] = src.pixel(x as u32, y);
            let mut alpha = 0.0f32;
            for (i, k) in KERNEL.iter().enumerate() {
                let o = i as i32 - 1;
                let (nx, ny) = if horizontal {
                    ((x as i32 + o).clamp(0, w - 1), y as i32)
                } else {
                    (x as i32, (y as i32 + o).clamp(0, h - 1))
                };
                alpha += k * src.pixel(nx as u32, ny as u32)[3];
            }
            px.copy_from_slice(&[r, g, b, alpha]);
        }
    });
}
