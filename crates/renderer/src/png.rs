//! PNG encoding for grayscale and RGB frames.
//!
//! Supports three encoding modes:
//! - **Grayscale PNG (color type 0)**: one byte per pixel, used for
//!   frames rendered without a colormap or with the identity map.
//! - **Indexed PNG (color type 3)**: used when an RGB image has ≤256 unique
//!   colors, which is always true for colormap output.
//! - **RGB PNG (color type 2)**: fallback for images with >256 colors.
//!
//! Use `create_png_auto` for automatic mode selection on RGB data.

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::Write;

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

const COLOR_TYPE_GRAY: u8 = 0;
const COLOR_TYPE_RGB: u8 = 2;
const COLOR_TYPE_INDEXED: u8 = 3;

/// Create a PNG from RGB data, choosing indexed or truecolor encoding.
///
/// # Arguments
/// - `pixels`: RGB pixel data (3 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn create_png_auto(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    check_len(pixels, width, height, 3)?;
    let num_pixels = width * height;

    let palette_result = if num_pixels >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    };

    match palette_result {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png_rgb(pixels, width, height),
    }
}

/// Pack RGB bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_color(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16)
}

#[inline(always)]
fn unpack_color(packed: u32) -> [u8; 3] {
    [packed as u8, (packed >> 8) as u8, (packed >> 16) as u8]
}

/// Sequential palette extraction for small images.
fn extract_palette_sequential(pixels: &[u8]) -> Option<(Vec<[u8; 3]>, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 3]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 3);

    for chunk in pixels.chunks_exact(3) {
        let packed = pack_color(chunk[0], chunk[1], chunk[2]);

        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push([chunk[0], chunk[1], chunk[2]]);
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Parallel palette extraction for larger images.
///
/// Collects per-chunk color sets in parallel, merges them into one palette,
/// then maps pixels to palette indices in a second parallel pass.
fn extract_palette_parallel(pixels: &[u8]) -> Option<(Vec<[u8; 3]>, Vec<u8>)> {
    let num_pixels = pixels.len() / 3;
    let pixels_per_chunk = (num_pixels / rayon::current_num_threads()).max(256);
    let chunk_bytes = pixels_per_chunk * 3;

    let unique_colors: Vec<u32> = pixels
        .par_chunks(chunk_bytes)
        .flat_map(|chunk| {
            let mut seen = HashSet::with_capacity(MAX_PALETTE_SIZE);
            for pixel in chunk.chunks_exact(3) {
                seen.insert(pack_color(pixel[0], pixel[1], pixel[2]));
                // One chunk alone can rule out a palette
                if seen.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            seen.into_iter().collect::<Vec<u32>>()
        })
        .collect();

    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 3]> = Vec::with_capacity(MAX_PALETTE_SIZE);

    for packed in unique_colors {
        if lookup.contains_key(&packed) {
            continue;
        }
        if palette.len() == MAX_PALETTE_SIZE {
            return None;
        }
        lookup.insert(packed, palette.len() as u8);
        palette.push(unpack_color(packed));
    }

    let mut indices = vec![0u8; num_pixels];
    indices
        .par_chunks_mut(pixels_per_chunk)
        .zip(pixels.par_chunks(chunk_bytes))
        .for_each(|(idx_chunk, px_chunk)| {
            for (idx, px) in idx_chunk.iter_mut().zip(px_chunk.chunks_exact(3)) {
                *idx = *lookup.get(&pack_color(px[0], px[1], px[2])).unwrap_or(&0);
            }
        });

    Some((palette, indices))
}

/// Create an 8-bit grayscale PNG (color type 0).
pub fn create_png_gray(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    check_len(pixels, width, height, 1)?;
    let png = start_png(width, height, COLOR_TYPE_GRAY);

    finish_png(png, pixels, width, height, 1)
}

/// Create an indexed PNG (color type 3) from palette and indices.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[[u8; 3]],
    indices: &[u8],
) -> Result<Vec<u8>, String> {
    check_len(indices, width, height, 1)?;
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(format!("Palette must hold 1..=256 colors, got {}", palette.len()));
    }

    let mut png = start_png(width, height, COLOR_TYPE_INDEXED);

    let plte_data: Vec<u8> = palette.iter().flatten().copied().collect();
    write_chunk(&mut png, b"PLTE", &plte_data);

    finish_png(png, indices, width, height, 1)
}

/// Create a truecolor PNG (color type 2) from RGB data.
pub fn create_png_rgb(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    check_len(pixels, width, height, 3)?;
    let png = start_png(width, height, COLOR_TYPE_RGB);

    finish_png(png, pixels, width, height, 3)
}

fn check_len(data: &[u8], width: usize, height: usize, channels: usize) -> Result<(), String> {
    if width == 0 || height == 0 {
        return Err(format!("Invalid image dimensions {}x{}", width, height));
    }
    if width > u32::MAX as usize || height > u32::MAX as usize {
        return Err(format!("Image dimensions {}x{} exceed PNG limits", width, height));
    }
    let expected = width * height * channels;
    if data.len() != expected {
        return Err(format!("Pixel buffer holds {} bytes, expected {}", data.len(), expected));
    }
    Ok(())
}

/// Signature plus IHDR for an 8-bit image.
fn start_png(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(color_type);
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    png
}

/// Append the image data and the end marker.
fn finish_png(
    mut png: Vec<u8>,
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>, String> {
    let idat = deflate_idat(data, width, height, bytes_per_pixel)
        .map_err(|e| format!("IDAT compression failed: {}", e))?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix each scanline with filter byte 0 and zlib-compress.
fn deflate_idat(
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>, std::io::Error> {
    let stride = width * bytes_per_pixel;
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));

    for row in data.chunks_exact(stride).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_palette_simple() {
        let pixels = [
            255, 0, 0, // red
            0, 255, 0, // green
            0, 0, 255, // blue
            255, 0, 0, // red again
        ];

        let (palette, indices) = extract_palette_sequential(&pixels).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(indices.len(), 4);
        assert_eq!(indices[0], indices[3]);
    }

    #[test]
    fn test_extract_palette_parallel_matches_colors() {
        // 128x128 with a ramp of 64 colors, above PARALLEL_THRESHOLD
        let mut pixels = Vec::with_capacity(128 * 128 * 3);
        for y in 0..128usize {
            for x in 0..128usize {
                let v = (((x / 8) + (y / 8)) % 64) as u8;
                pixels.extend_from_slice(&[v * 4, 255 - v, v]);
            }
        }

        let (palette, indices) = extract_palette_parallel(&pixels).unwrap();
        assert!(palette.len() <= 64);
        assert_eq!(indices.len(), 128 * 128);
        for (i, px) in pixels.chunks_exact(3).enumerate() {
            assert_eq!(palette[indices[i] as usize], [px[0], px[1], px[2]]);
        }
    }

    #[test]
    fn test_extract_palette_too_many_colors() {
        let pixels: Vec<u8> = (0..300u32)
            .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 7])
            .collect();
        assert!(extract_palette_sequential(&pixels).is_none());
    }

    #[test]
    fn test_chunk_crc_covers_type_and_data() {
        let mut out = Vec::new();
        write_chunk(&mut out, b"IEND", &[]);
        // Well-known CRC of an empty IEND chunk
        assert_eq!(&out[8..12], &[0xAE, 0x42, 0x60, 0x82]);
    }

    #[test]
    fn test_gray_png_header() {
        let png = create_png_gray(&[0, 128, 255, 64], 2, 2).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(png[24], 8);
        assert_eq!(png[25], COLOR_TYPE_GRAY);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        assert!(create_png_gray(&[0; 3], 2, 2).is_err());
        assert!(create_png_rgb(&[0; 11], 2, 2).is_err());
    }
}
