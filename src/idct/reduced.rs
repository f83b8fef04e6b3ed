//! Reduced-size IDCTs for scaled-down decoding.
//!
//! The 4x4 and 2x2 variants read only the coefficients their smaller
//! butterflies need; they are separate transforms, not a decimated 8x8.

#[cfg(feature = "multiverse")]
use multiversed::multiversed;

use super::{
    dc_only, dequantize, level_shift, rows_are_zero, store_columns, CoefBlock, QuantTable, Rows,
};
use crate::common::butterfly::{reduced2_butterfly, reduced4_butterfly};
use crate::common::consts::{descale, CONST_BITS};
use crate::common::permute::{permute, TRANSPOSE_2X8, TRANSPOSE_4X8};
use crate::common::sample::Sample;

const AC_ROWS_4X4: [usize; 6] = [1, 2, 3, 5, 6, 7];
const AC_ROWS_2X2: [usize; 4] = [1, 3, 5, 7];

/// 4x4 output from coefficient rows and columns {0,1,2,3,5,6,7}.
///
/// Writes `out[offset + r * stride + c]` for `r, c` in `0..4`.
pub fn idct_4x4<S: Sample>(
    coef: &CoefBlock,
    quant: &QuantTable,
    out: &mut [S],
    offset: usize,
    stride: usize,
) {
    let cols = block_4x4(coef, quant, S::PASS1_BITS, S::CENTER, S::MAX);
    store_columns(&cols, out, offset, stride);
}

#[cfg_attr(feature = "multiverse", multiversed)]
fn block_4x4(coef: &CoefBlock, quant: &QuantTable, p: u32, center: i32, max: i32) -> [[i32; 4]; 4] {
    let d = dequantize(coef, quant);
    let ws: [[i32; 8]; 4] = if rows_are_zero(&d, &AC_ROWS_4X4) {
        [d[0].map(|v| dc_only(v, CONST_BITS + 1, p)); 4]
    } else {
        reduced4_butterfly(&d).map(|row| row.map(|v| descale(v, CONST_BITS - p + 1)))
    };

    let t = permute(flat4(&ws), &TRANSPOSE_4X8);
    let d2: [[i32; 4]; 8] = core::array::from_fn(|k| core::array::from_fn(|r| t[k * 4 + r]));
    let shift = CONST_BITS + p + 3 + 1;
    reduced4_butterfly(&d2).map(|col| level_shift(col, shift, center, max))
}

/// 2x2 output from coefficient rows and columns {0,1,3,5,7}.
///
/// Writes `out[offset + r * stride + c]` for `r, c` in `0..2`.
pub fn idct_2x2<S: Sample>(
    coef: &CoefBlock,
    quant: &QuantTable,
    out: &mut [S],
    offset: usize,
    stride: usize,
) {
    let cols = block_2x2(coef, quant, S::PASS1_BITS, S::CENTER, S::MAX);
    store_columns(&cols, out, offset, stride);
}

#[cfg_attr(feature = "multiverse", multiversed)]
fn block_2x2(coef: &CoefBlock, quant: &QuantTable, p: u32, center: i32, max: i32) -> [[i32; 2]; 2] {
    let d: Rows = dequantize(coef, quant);
    let ws: [[i32; 8]; 2] = if rows_are_zero(&d, &AC_ROWS_2X2) {
        [d[0].map(|v| dc_only(v, CONST_BITS + 2, p)); 2]
    } else {
        reduced2_butterfly(&d).map(|row| row.map(|v| descale(v, CONST_BITS - p + 2)))
    };

    let t = permute(flat2(&ws), &TRANSPOSE_2X8);
    let d2: [[i32; 2]; 8] = core::array::from_fn(|k| core::array::from_fn(|r| t[k * 2 + r]));
    let shift = CONST_BITS + p + 3 + 2;
    reduced2_butterfly(&d2).map(|col| level_shift(col, shift, center, max))
}

/// Single DC sample: `clamp(descale(dc * q, 3) + CENTER)`.
pub fn idct_1x1<S: Sample>(
    coef: &CoefBlock,
    quant: &QuantTable,
    out: &mut [S],
    offset: usize,
) {
    let dc = i32::from(coef[0]).wrapping_mul(quant[0]);
    out[offset] = S::clamp_from(descale(dc, 3).wrapping_add(S::CENTER));
}

fn flat4(ws: &[[i32; 8]; 4]) -> &[i32; 32] {
    match ws.as_flattened().try_into() {
        Ok(a) => a,
        Err(_) => unreachable!(),
    }
}

fn flat2(ws: &[[i32; 8]; 2]) -> &[i32; 16] {
    match ws.as_flattened().try_into() {
        Ok(a) => a,
        Err(_) => unreachable!(),
    }
}
