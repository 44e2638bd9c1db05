//! Named colormaps and the registry that serves them.
//!
//! Every colormap is a fixed 256-entry lookup table from grayscale intensity
//! to RGB. Application never looks at the rest of the frame, so the same
//! intensity always produces the same color.
//!
//! The registry is assembled once through [`ColormapRegistryBuilder`] and is
//! read-only afterwards, so it can be shared behind an `Arc` without locking.

use std::collections::BTreeMap;

use depth_common::{DepthFrameError, DepthFrameResult};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::frame::{ColorFrame, Frame};
use crate::viridis::VIRIDIS_LUT;

/// Rows per rayon task when applying a lookup table.
const ROWS_PER_TASK: usize = 64;

const RESISTIVITY_STOPS: &[&str] = &[
    "#1a0a00", "#4d2600", "#8B4513", "#CD853F", "#DAA520", "#FFD700", "#FFEC8B", "#FFFACD",
    "#FFFFFF",
];

const GEOLOGICAL_STOPS: &[&str] = &[
    "#000033", "#003366", "#336633", "#669933", "#CC9933", "#CC6633", "#993333", "#FFFFFF",
];

const HIGH_CONTRAST_STOPS: &[&str] = &[
    "#000000", "#1a1a2e", "#16213e", "#0f3460", "#e94560", "#ff6b6b", "#ffd93d", "#FFFFFF",
];

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some([r, g, b])
}

/// A named intensity-to-color transform.
#[derive(Debug, Clone)]
pub struct Colormap {
    name: String,
    description: String,
    lut: [[u8; 3]; 256],
}

impl Colormap {
    /// Build a colormap from an explicit lookup table.
    pub fn from_lut(name: impl Into<String>, description: impl Into<String>, lut: [[u8; 3]; 256]) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            lut,
        }
    }

    /// Build a colormap by linear interpolation between evenly spaced hex stops.
    pub fn from_hex_stops(
        name: impl Into<String>,
        description: impl Into<String>,
        stops: &[&str],
    ) -> DepthFrameResult<Self> {
        let name = name.into();
        let colors = stops
            .iter()
            .map(|s| {
                hex_to_rgb(s).ok_or_else(|| {
                    DepthFrameError::InternalError(format!("Invalid color stop '{}' in colormap '{}'", s, name))
                })
            })
            .collect::<DepthFrameResult<Vec<_>>>()?;

        if colors.len() < 2 {
            return Err(DepthFrameError::InternalError(format!(
                "Colormap '{}' needs at least two color stops",
                name
            )));
        }

        Ok(Self::from_lut(name, description, build_lut(&colors)))
    }

    /// Bit-exact grayscale: every intensity maps to `(v, v, v)`.
    pub fn gray(description: impl Into<String>) -> Self {
        let mut lut = [[0u8; 3]; 256];
        for (v, entry) in lut.iter_mut().enumerate() {
            *entry = [v as u8; 3];
        }
        Self::from_lut("gray", description, lut)
    }

    /// The same ramp traversed from the top down.
    pub fn reversed(&self, name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut lut = self.lut;
        lut.reverse();
        Self::from_lut(name, description, lut)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn lut(&self) -> &[[u8; 3]; 256] {
        &self.lut
    }

    #[inline(always)]
    pub fn map(&self, intensity: u8) -> [u8; 3] {
        self.lut[intensity as usize]
    }

    /// True when the table is the grayscale identity.
    pub fn is_identity(&self) -> bool {
        self.lut
            .iter()
            .enumerate()
            .all(|(v, rgb)| rgb.iter().all(|&c| c as usize == v))
    }

    /// Apply the lookup table to every pixel of a frame.
    pub fn apply(&self, frame: &Frame) -> ColorFrame {
        let row_bytes = frame.width() * 3;
        let mut pixels = vec![0u8; frame.pixels().len() * 3];

        pixels
            .par_chunks_mut(row_bytes * ROWS_PER_TASK)
            .zip(frame.pixels().par_chunks(frame.width() * ROWS_PER_TASK))
            .for_each(|(out, src)| {
                for (rgb, &v) in out.chunks_exact_mut(3).zip(src) {
                    rgb.copy_from_slice(&self.lut[v as usize]);
                }
            });

        ColorFrame {
            width: frame.width(),
            height: frame.height(),
            pixels,
            colormap: self.name.clone(),
        }
    }
}

fn build_lut(colors: &[[u8; 3]]) -> [[u8; 3]; 256] {
    let segments = (colors.len() - 1) as f64;
    let mut lut = [[0u8; 3]; 256];

    for (i, entry) in lut.iter_mut().enumerate() {
        let pos = i as f64 / 255.0 * segments;
        let lo = (pos.floor() as usize).min(colors.len() - 2);
        let t = pos - lo as f64;
        let (a, b) = (colors[lo], colors[lo + 1]);
        for c in 0..3 {
            let value = a[c] as f64 + (b[c] as f64 - a[c] as f64) * t;
            entry[c] = value.round().clamp(0.0, 255.0) as u8;
        }
    }

    lut
}

/// Name and description of a registered colormap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColormapInfo {
    pub name: String,
    pub description: String,
}

/// Collects colormaps before the registry is frozen.
#[derive(Default)]
pub struct ColormapRegistryBuilder {
    colormaps: BTreeMap<String, Colormap>,
}

impl ColormapRegistryBuilder {
    pub fn register(mut self, colormap: Colormap) -> Self {
        debug!(name = %colormap.name, "Registered colormap");
        self.colormaps.insert(colormap.name.clone(), colormap);
        self
    }

    /// Register the six built-in colormaps.
    pub fn with_defaults(self) -> DepthFrameResult<Self> {
        let resistivity = Colormap::from_hex_stops(
            "resistivity",
            "Brown→Gold→White: standard for resistivity image logs",
            RESISTIVITY_STOPS,
        )?;
        let conductivity = resistivity.reversed(
            "conductivity",
            "White→Gold→Brown: inverted resistivity (conductivity convention)",
        );

        Ok(self
            .register(resistivity)
            .register(conductivity)
            .register(Colormap::from_hex_stops(
                "geological",
                "Blue→Green→Brown→White: formation boundary interpretation",
                GEOLOGICAL_STOPS,
            )?)
            .register(Colormap::from_hex_stops(
                "high_contrast",
                "Dark→Red→Yellow→White: fracture detection and thin-bed analysis",
                HIGH_CONTRAST_STOPS,
            )?)
            .register(Colormap::gray("Standard grayscale: raw data visualization"))
            .register(Colormap::from_lut(
                "viridis",
                "Perceptually uniform: general-purpose scientific visualization",
                VIRIDIS_LUT,
            )))
    }

    pub fn build(self) -> ColormapRegistry {
        ColormapRegistry {
            colormaps: self.colormaps,
        }
    }
}

/// Immutable name-to-colormap table.
#[derive(Debug, Clone)]
pub struct ColormapRegistry {
    colormaps: BTreeMap<String, Colormap>,
}

impl ColormapRegistry {
    pub fn builder() -> ColormapRegistryBuilder {
        ColormapRegistryBuilder::default()
    }

    /// Registry holding only the built-in colormaps.
    pub fn with_defaults() -> DepthFrameResult<Self> {
        Ok(Self::builder().with_defaults()?.build())
    }

    /// Look up a colormap. Hyphens are accepted in place of underscores.
    pub fn get(&self, name: &str) -> DepthFrameResult<&Colormap> {
        let key = name.trim().replace('-', "_");
        self.colormaps
            .get(&key)
            .ok_or_else(|| DepthFrameError::UnknownColormap {
                name: name.to_string(),
                available: self.list_names(),
            })
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Registered names in sorted order.
    pub fn list_names(&self) -> Vec<String> {
        self.colormaps.keys().cloned().collect()
    }

    pub fn list_colormaps(&self) -> Vec<ColormapInfo> {
        self.colormaps
            .values()
            .map(|c| ColormapInfo {
                name: c.name.clone(),
                description: c.description.clone(),
            })
            .collect()
    }

    pub fn apply(&self, frame: &Frame, name: &str) -> DepthFrameResult<ColorFrame> {
        Ok(self.get(name)?.apply(frame))
    }

    pub fn len(&self) -> usize {
        self.colormaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colormaps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF0000"), Some([255, 0, 0]));
        assert_eq!(hex_to_rgb("8B4513"), Some([0x8B, 0x45, 0x13]));
        assert_eq!(hex_to_rgb("#GGGGGG"), None);
        assert_eq!(hex_to_rgb("#FFF"), None);
    }

    #[test]
    fn test_lut_endpoints_match_stops() {
        let cmap = Colormap::from_hex_stops("t", "", &["#000000", "#FF8000"]).unwrap();
        assert_eq!(cmap.map(0), [0, 0, 0]);
        assert_eq!(cmap.map(255), [255, 128, 0]);
        assert_eq!(cmap.map(128), [128, 64, 0]);
    }

    #[test]
    fn test_single_stop_is_rejected() {
        assert!(Colormap::from_hex_stops("t", "", &["#000000"]).is_err());
    }

    #[test]
    fn test_reversed_mirrors_table() {
        let registry = ColormapRegistry::with_defaults().unwrap();
        let res = registry.get("resistivity").unwrap();
        let cond = registry.get("conductivity").unwrap();
        for v in 0..=255u8 {
            assert_eq!(cond.map(v), res.map(255 - v));
        }
    }

    #[test]
    fn test_only_gray_is_identity() {
        let registry = ColormapRegistry::with_defaults().unwrap();
        for info in registry.list_colormaps() {
            let cmap = registry.get(&info.name).unwrap();
            assert_eq!(cmap.is_identity(), info.name == "gray", "{}", info.name);
        }
    }

    #[test]
    fn test_builder_register_overrides_by_name() {
        let registry = ColormapRegistry::builder()
            .register(Colormap::gray("first"))
            .register(Colormap::gray("second"))
            .build();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("gray").unwrap().description(), "second");
    }
}
