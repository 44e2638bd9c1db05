//! Horizontal resampling of scan rows to the target width.
//!
//! Only the width changes; each row is resampled independently in `f32`.
//! Quantization to `u8` happens once at the end: clip to `[0, 255]`, then
//! truncate, matching a float to `uint8` cast.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::IngestionError;

/// Bicubic convolution coefficient (Keys kernel with a = -0.75).
const CUBIC_A: f32 = -0.75;

/// Lanczos window radius; eight taps per output pixel.
const LANCZOS_A: isize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InterpolationMethod {
    Nearest,
    Bilinear,
    Bicubic,
    /// Pixel-area averaging; the default for downsampling.
    Area,
    Lanczos4,
}

impl InterpolationMethod {
    pub const ALL: [InterpolationMethod; 5] = [
        InterpolationMethod::Nearest,
        InterpolationMethod::Bilinear,
        InterpolationMethod::Bicubic,
        InterpolationMethod::Area,
        InterpolationMethod::Lanczos4,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterpolationMethod::Nearest => "NEAREST",
            InterpolationMethod::Bilinear => "BILINEAR",
            InterpolationMethod::Bicubic => "BICUBIC",
            InterpolationMethod::Area => "AREA",
            InterpolationMethod::Lanczos4 => "LANCZOS4",
        }
    }
}

impl FromStr for InterpolationMethod {
    type Err = IngestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| IngestionError::UnknownInterpolation {
                name: s.to_string(),
                available: Self::ALL.iter().map(|m| m.as_str()).collect(),
            })
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resample row-major `pixels` of `src_width` columns to `target_width`.
pub fn resize_rows(
    pixels: &[f64],
    src_width: usize,
    target_width: usize,
    method: InterpolationMethod,
) -> Vec<u8> {
    if src_width == 0 || target_width == 0 {
        return Vec::new();
    }
    let rows = pixels.len() / src_width;
    let mut out = vec![0u8; rows * target_width];

    out.par_chunks_mut(target_width)
        .zip(pixels.par_chunks(src_width))
        .for_each(|(dst, src)| {
            let src: Vec<f32> = src.iter().map(|&v| v as f32).collect();
            let resampled = resample_row(&src, target_width, method);
            for (d, v) in dst.iter_mut().zip(resampled) {
                *d = quantize(v);
            }
        });

    info!(
        rows,
        src_width,
        target_width,
        method = %method,
        "Resized scan rows"
    );
    out
}

#[inline]
fn quantize(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0) as u8
}

fn resample_row(src: &[f32], dst_width: usize, method: InterpolationMethod) -> Vec<f32> {
    if src.len() == dst_width {
        return src.to_vec();
    }
    match method {
        InterpolationMethod::Nearest => nearest(src, dst_width),
        InterpolationMethod::Bilinear => bilinear(src, dst_width),
        InterpolationMethod::Bicubic => bicubic(src, dst_width),
        InterpolationMethod::Lanczos4 => lanczos4(src, dst_width),
        // Area averaging only differs from bilinear when shrinking
        InterpolationMethod::Area if dst_width < src.len() => area(src, dst_width),
        InterpolationMethod::Area => bilinear(src, dst_width),
    }
}

fn nearest(src: &[f32], dst_width: usize) -> Vec<f32> {
    let scale = src.len() as f64 / dst_width as f64;
    (0..dst_width)
        .map(|dx| {
            let sx = ((dx as f64 * scale).floor() as usize).min(src.len() - 1);
            src[sx]
        })
        .collect()
}

/// Source coordinate of a destination pixel center.
#[inline]
fn source_center(dx: usize, scale: f64) -> f64 {
    (dx as f64 + 0.5) * scale - 0.5
}

fn bilinear(src: &[f32], dst_width: usize) -> Vec<f32> {
    let scale = src.len() as f64 / dst_width as f64;
    let last = src.len() - 1;
    (0..dst_width)
        .map(|dx| {
            let fx = source_center(dx, scale);
            let x0 = fx.floor();
            let t = (fx - x0) as f32;
            if x0 < 0.0 {
                return src[0];
            }
            let x0 = x0 as usize;
            if x0 >= last {
                return src[last];
            }
            src[x0] * (1.0 - t) + src[x0 + 1] * t
        })
        .collect()
}

fn cubic_weight(x: f32) -> f32 {
    let x = x.abs();
    if x <= 1.0 {
        ((CUBIC_A + 2.0) * x - (CUBIC_A + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        ((CUBIC_A * x - 5.0 * CUBIC_A) * x + 8.0 * CUBIC_A) * x - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

fn bicubic(src: &[f32], dst_width: usize) -> Vec<f32> {
    let scale = src.len() as f64 / dst_width as f64;
    let last = src.len() as isize - 1;
    (0..dst_width)
        .map(|dx| {
            let fx = source_center(dx, scale);
            let x0 = fx.floor();
            let t = (fx - x0) as f32;
            let x0 = x0 as isize;
            (-1..=2)
                .map(|k| {
                    let sx = (x0 + k).clamp(0, last) as usize;
                    src[sx] * cubic_weight(t - k as f32)
                })
                .sum()
        })
        .collect()
}

fn lanczos_weight(x: f32) -> f32 {
    let a = LANCZOS_A as f32;
    if x == 0.0 {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }
    let px = std::f32::consts::PI * x;
    a * px.sin() * (px / a).sin() / (px * px)
}

/// Windowed sinc over `2 * LANCZOS_A` taps, weights normalized to sum to one.
fn lanczos4(src: &[f32], dst_width: usize) -> Vec<f32> {
    let scale = src.len() as f64 / dst_width as f64;
    let last = src.len() as isize - 1;
    (0..dst_width)
        .map(|dx| {
            let fx = source_center(dx, scale);
            let x0 = fx.floor();
            let t = (fx - x0) as f32;
            let x0 = x0 as isize;
            let mut sum = 0.0f32;
            let mut norm = 0.0f32;
            for k in (1 - LANCZOS_A)..=LANCZOS_A {
                let w = lanczos_weight(t - k as f32);
                let sx = (x0 + k).clamp(0, last) as usize;
                sum += src[sx] * w;
                norm += w;
            }
            sum / norm
        })
        .collect()
}

/// Average of the source pixels covered by each destination pixel,
/// weighting partially covered pixels by their overlap.
fn area(src: &[f32], dst_width: usize) -> Vec<f32> {
    let scale = src.len() as f64 / dst_width as f64;
    (0..dst_width)
        .map(|dx| {
            let start = dx as f64 * scale;
            let end = ((dx + 1) as f64 * scale).min(src.len() as f64);
            let mut sum = 0.0f64;
            let mut x = start.floor() as usize;
            while (x as f64) < end && x < src.len() {
                let overlap = (end.min((x + 1) as f64) - start.max(x as f64)).max(0.0);
                sum += src[x] as f64 * overlap;
                x += 1;
            }
            (sum / (end - start)) as f32
        })
        .collect()
}
