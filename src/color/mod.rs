//! YCbCr <-> RGB conversion and merged chroma upsampling.
//!
//! Planar rows hold one component each; interleaved rows follow a
//! [`PixelLayout`]. The matrix is the JFIF (full-range BT.601) one with 16
//! fractional bits. Filler slots in four-byte layouts, alpha or padding,
//! receive the sample type's maximum.

pub mod convert;
pub mod merged;
pub mod scalar;

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub(crate) mod avx2;

use crate::error::KernelError;

pub use convert::{rgb_to_ycc_row, ycc_to_rgb_row};
pub use merged::{h2v1_merged_row, h2v2_merged_rows};

/// Interleaved pixel layout of an RGB row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// R, G, B
    Rgb,
    /// B, G, R
    Bgr,
    /// R, G, B, padding
    Rgbx,
    /// B, G, R, padding
    Bgrx,
    /// padding, B, G, R
    Xbgr,
    /// padding, R, G, B
    Xrgb,
    /// R, G, B, alpha
    Rgba,
    /// B, G, R, alpha
    Bgra,
    /// alpha, B, G, R
    Abgr,
    /// alpha, R, G, B
    Argb,
}

impl PixelLayout {
    /// Samples per pixel.
    #[must_use]
    pub const fn pixel_size(self) -> usize {
        match self {
            Self::Rgb | Self::Bgr => 3,
            _ => 4,
        }
    }

    /// Positions of R, G and B inside one pixel.
    #[must_use]
    pub const fn rgb_offsets(self) -> [usize; 3] {
        match self {
            Self::Rgb | Self::Rgbx | Self::Rgba => [0, 1, 2],
            Self::Bgr | Self::Bgrx | Self::Bgra => [2, 1, 0],
            Self::Xbgr | Self::Abgr => [3, 2, 1],
            Self::Xrgb | Self::Argb => [1, 2, 3],
        }
    }

    /// Position of the alpha or padding slot, if any.
    #[must_use]
    pub const fn filler_offset(self) -> Option<usize> {
        match self {
            Self::Rgb | Self::Bgr => None,
            Self::Rgbx | Self::Bgrx | Self::Rgba | Self::Bgra => Some(3),
            Self::Xbgr | Self::Xrgb | Self::Abgr | Self::Argb => Some(0),
        }
    }

    /// Every layout, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Rgb,
        Self::Bgr,
        Self::Rgbx,
        Self::Bgrx,
        Self::Xbgr,
        Self::Xrgb,
        Self::Rgba,
        Self::Bgra,
        Self::Abgr,
        Self::Argb,
    ];
}

/// Number of chroma samples covering `width` luma samples at 2:1.
#[inline]
#[must_use]
pub const fn chroma_width(width: usize) -> usize {
    width.div_ceil(2)
}

pub(crate) fn check_input(len: usize, needed: usize) -> Result<(), KernelError> {
    if len < needed {
        return Err(KernelError::InputTooSmall {
            needed,
            actual: len,
        });
    }
    Ok(())
}

pub(crate) fn check_output(len: usize, needed: usize) -> Result<(), KernelError> {
    if len < needed {
        return Err(KernelError::OutputTooSmall {
            needed,
            actual: len,
        });
    }
    Ok(())
}

/// Elements in an interleaved row of `width` pixels.
pub(crate) fn interleaved_len(width: usize, layout: PixelLayout) -> Result<usize, KernelError> {
    width
        .checked_mul(layout.pixel_size())
        .ok_or(KernelError::InvalidWidth)
}

/// Elements a plane of `rows` rows needs when rows are `stride` apart.
pub(crate) fn plane_len(rows: usize, stride: usize, row_len: usize) -> Result<usize, KernelError> {
    if rows == 0 {
        return Ok(0);
    }
    if stride < row_len {
        return Err(KernelError::InvalidStride {
            stride,
            width: row_len,
        });
    }
    (rows - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(KernelError::InvalidWidth)
}
