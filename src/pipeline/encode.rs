//! Pixel encoding: decoded PDF image samples → PNG bytes.
//!
//! Streams stored with a general-purpose filter (Flate, LZW, RLE) or no
//! filter at all hold bare samples with no container format. Those are
//! unpacked here according to their bit depth and colour model and written
//! out as lossless PNG. JPEG, JPEG 2000 and JBIG2 streams never come through
//! this module; they are already a file format and are only unwrapped.

use image::{DynamicImage, GrayImage, RgbImage};
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

/// Colour model of an image's samples.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorModel {
    Gray,
    Rgb,
    Cmyk,
    /// Palette image; `lookup` holds `hival + 1` entries of `base` colour.
    Indexed {
        base: Box<ColorModel>,
        lookup: Vec<u8>,
    },
}

impl ColorModel {
    /// Samples per pixel in the stream.
    pub fn components(&self) -> usize {
        match self {
            ColorModel::Gray | ColorModel::Indexed { .. } => 1,
            ColorModel::Rgb => 3,
            ColorModel::Cmyk => 4,
        }
    }
}

/// How to interpret a decoded sample buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelLayout {
    pub width: u32,
    pub height: u32,
    pub bits_per_component: u8,
    pub color: ColorModel,
    /// `Decode [1 0]`: sample values are inverted (common for masks).
    pub invert: bool,
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("image has zero width or height")]
    Empty,

    #[error("unsupported bits per component: {0}")]
    BitDepth(u8),

    #[error("image dimensions {width}x{height} are too large")]
    TooLarge { width: u32, height: u32 },

    #[error("sample data too short: expected {expected} bytes, got {actual}")]
    ShortData { expected: usize, actual: usize },

    #[error("nested indexed colour space")]
    NestedIndexed,

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Unpack `data` according to `layout` and encode it as PNG.
pub fn encode_png(layout: &PixelLayout, data: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if layout.width == 0 || layout.height == 0 {
        return Err(EncodeError::Empty);
    }
    let bits = layout.bits_per_component;
    if !matches!(bits, 1 | 2 | 4 | 8 | 16) {
        return Err(EncodeError::BitDepth(bits));
    }

    let width = layout.width as usize;
    let height = layout.height as usize;
    let comps = layout.color.components();
    let too_large = || EncodeError::TooLarge {
        width: layout.width,
        height: layout.height,
    };
    let row_bytes = width
        .checked_mul(comps)
        .and_then(|n| n.checked_mul(bits as usize))
        .map(|n| n.div_ceil(8))
        .ok_or_else(too_large)?;
    let expected = row_bytes.checked_mul(height).ok_or_else(too_large)?;
    if data.len() < expected {
        return Err(EncodeError::ShortData {
            expected,
            actual: data.len(),
        });
    }

    let indexed = matches!(layout.color, ColorModel::Indexed { .. });
    let sample_count = width
        .checked_mul(comps)
        .and_then(|n| n.checked_mul(height))
        .ok_or_else(too_large)?;
    let mut samples = Vec::with_capacity(sample_count);
    for row in data.chunks_exact(row_bytes).take(height) {
        for i in 0..width * comps {
            let raw = read_sample(row, i, bits);
            let v = if indexed {
                raw.min(255) as u8
            } else {
                scale_to_u8(raw, bits)
            };
            samples.push(if layout.invert && !indexed { 255 - v } else { v });
        }
    }

    let img = match &layout.color {
        ColorModel::Gray => to_gray(layout, samples),
        ColorModel::Rgb => to_rgb(layout, samples),
        ColorModel::Cmyk => to_rgb(layout, cmyk_to_rgb(&samples)),
        ColorModel::Indexed { base, lookup } => expand_palette(layout, base, lookup, &samples)?,
    };

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!(
        "Encoded {}x{} {:?} image → {} bytes PNG",
        layout.width,
        layout.height,
        layout.color,
        buf.len()
    );
    Ok(buf)
}

/// Read the `index`-th sample of `bits` width from a packed row.
fn read_sample(row: &[u8], index: usize, bits: u8) -> u16 {
    match bits {
        8 => row[index] as u16,
        16 => u16::from_be_bytes([row[index * 2], row[index * 2 + 1]]),
        _ => {
            let bit_offset = index * bits as usize;
            let byte = row[bit_offset / 8];
            let shift = 8 - bits as usize - (bit_offset % 8);
            ((byte >> shift) & ((1u8 << bits) - 1)) as u16
        }
    }
}

fn scale_to_u8(v: u16, bits: u8) -> u8 {
    match bits {
        8 => v as u8,
        16 => (v >> 8) as u8,
        _ => {
            let max = (1u16 << bits) - 1;
            (v * 255 / max) as u8
        }
    }
}

fn cmyk_to_rgb(samples: &[u8]) -> Vec<u8> {
    samples
        .chunks_exact(4)
        .flat_map(|px| {
            let k = 255 - px[3] as u16;
            [
                ((255 - px[0] as u16) * k / 255) as u8,
                ((255 - px[1] as u16) * k / 255) as u8,
                ((255 - px[2] as u16) * k / 255) as u8,
            ]
        })
        .collect()
}

fn expand_palette(
    layout: &PixelLayout,
    base: &ColorModel,
    lookup: &[u8],
    indices: &[u8],
) -> Result<DynamicImage, EncodeError> {
    let n = base.components();
    let mut out = Vec::with_capacity(indices.len() * n);
    for &idx in indices {
        let start = idx as usize * n;
        match lookup.get(start..start + n) {
            Some(entry) => out.extend_from_slice(entry),
            None => out.extend(std::iter::repeat(0).take(n)),
        }
    }

    Ok(match base {
        ColorModel::Gray => to_gray(layout, out),
        ColorModel::Rgb => to_rgb(layout, out),
        ColorModel::Cmyk => to_rgb(layout, cmyk_to_rgb(&out)),
        ColorModel::Indexed { .. } => return Err(EncodeError::NestedIndexed),
    })
}

// Buffer lengths are exact by construction, so from_raw cannot fail.
fn to_gray(layout: &PixelLayout, samples: Vec<u8>) -> DynamicImage {
    GrayImage::from_raw(layout.width, layout.height, samples)
        .map(DynamicImage::ImageLuma8)
        .unwrap_or_else(|| DynamicImage::new_luma8(layout.width, layout.height))
}

fn to_rgb(layout: &PixelLayout, samples: Vec<u8>) -> DynamicImage {
    RgbImage::from_raw(layout.width, layout.height, samples)
        .map(DynamicImage::ImageRgb8)
        .unwrap_or_else(|| DynamicImage::new_rgb8(layout.width, layout.height))
}
