//! Inverse DCT kernels for one 8x8 coefficient block.
//!
//! Every variant is a separable two-pass transform. Pass 1 dequantizes and
//! runs the 1-D butterfly down the columns into a call-local workspace;
//! pass 2 transposes the workspace through a constant index table, runs the
//! same butterfly along the rows, level-shifts and clamps.
//!
//! Output is written to `out[offset + row * stride + col]` for the output
//! geometry of the variant (8x8, 4x4, 2x2 or 1x1). Nothing outside that
//! region is touched.
//!
//! Any `i16` coefficient with any multiplier is accepted. Intermediates wrap
//! at 32 bits instead of trapping, so a hostile block yields garbage samples
//! inside the valid range, identical on every backend.

pub mod ifast;
pub mod islow;
pub mod reduced;
pub mod scalar;

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub(crate) mod avx2;

use crate::common::consts::{descale, DCTSIZE, DCTSIZE2};
use crate::common::sample::Sample;
use crate::error::KernelError;

pub use ifast::{idct_ifast, IfastTable};
pub use islow::idct_islow;
pub use reduced::{idct_1x1, idct_2x2, idct_4x4};

/// One block of quantized coefficients in natural (row-major) order.
pub type CoefBlock = [i16; DCTSIZE2];

/// Per-coefficient multipliers, paired by position with a [`CoefBlock`].
pub type QuantTable = [i32; DCTSIZE2];

/// Dequantized coefficients, one lane vector per coefficient row.
pub(crate) type Rows = [[i32; DCTSIZE]; DCTSIZE];

/// IDCT algorithm and output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdctMethod {
    /// Accurate integer IDCT, 8x8 output.
    Islow,
    /// Fast integer IDCT (AAN), 8x8 output. Expects an [`IfastTable`].
    Ifast,
    /// 4x4 output from a subset of the coefficients.
    Reduced4x4,
    /// 2x2 output from a subset of the coefficients.
    Reduced2x2,
    /// DC only, one output sample.
    Reduced1x1,
}

impl IdctMethod {
    /// Side length of the output block.
    #[must_use]
    pub const fn output_size(self) -> usize {
        match self {
            Self::Islow | Self::Ifast => 8,
            Self::Reduced4x4 => 4,
            Self::Reduced2x2 => 2,
            Self::Reduced1x1 => 1,
        }
    }
}

#[inline(always)]
pub(crate) fn dequantize(coef: &CoefBlock, quant: &QuantTable) -> Rows {
    core::array::from_fn(|r| {
        core::array::from_fn(|c| {
            let i = r * DCTSIZE + c;
            i32::from(coef[i]).wrapping_mul(quant[i])
        })
    })
}

/// Pass-1 output of a column whose AC terms are all zero.
///
/// This is exactly what the butterfly yields for a DC-only input scaled by
/// `2^scale_bits`, wrapped product included, so skipping the butterfly
/// never changes the result.
#[inline(always)]
pub(crate) const fn dc_only(dc: i32, scale_bits: u32, pass1_bits: u32) -> i32 {
    descale(dc << scale_bits, scale_bits - pass1_bits)
}

/// OR-reduction over the listed coefficient rows; true when all are zero.
#[inline(always)]
pub(crate) fn rows_are_zero(rows: &Rows, which: &[usize]) -> bool {
    let mut acc = [0i32; DCTSIZE];
    for &k in which {
        for (a, &v) in acc.iter_mut().zip(rows[k].iter()) {
            *a |= v;
        }
    }
    acc.iter().fold(0, |x, &y| x | y) == 0
}

/// Final descale of pass 2, then level shift and clamp to `0..=max`.
#[inline(always)]
pub(crate) fn level_shift<const N: usize>(
    v: [i32; N],
    shift: u32,
    center: i32,
    max: i32,
) -> [i32; N] {
    v.map(|x| descale(x, shift).wrapping_add(center).clamp(0, max))
}

/// Write pass-2 output held as one lane vector per output column.
#[inline(always)]
pub(crate) fn store_columns<S: Sample, const W: usize>(
    cols: &[[i32; W]; W],
    out: &mut [S],
    offset: usize,
    stride: usize,
) {
    for r in 0..W {
        let row = &mut out[offset + r * stride..][..W];
        for (c, o) in row.iter_mut().enumerate() {
            *o = S::from_clamped(cols[c][r]);
        }
    }
}

/// Check that a `size x size` block at `offset` with `stride` fits in `len`.
pub(crate) fn check_region(
    len: usize,
    offset: usize,
    stride: usize,
    size: usize,
) -> Result<(), KernelError> {
    if stride < size {
        return Err(KernelError::InvalidStride {
            stride,
            width: size,
        });
    }
    let needed = (size - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(offset))
        .and_then(|v| v.checked_add(size))
        .ok_or(KernelError::InvalidWidth)?;
    if needed > len {
        return Err(KernelError::OutputTooSmall {
            needed,
            actual: len,
        });
    }
    Ok(())
}
