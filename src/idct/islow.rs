//! Accurate integer IDCT over lane vectors.

#[cfg(feature = "multiverse")]
use multiversed::multiversed;

use super::{
    dc_only, dequantize, level_shift, rows_are_zero, store_columns, CoefBlock, QuantTable, Rows,
};
use crate::common::butterfly::islow_butterfly;
use crate::common::consts::{descale, CONST_BITS};
use crate::common::permute::{permute, TRANSPOSE_8X8};
use crate::common::sample::Sample;

const AC_ROWS: [usize; 7] = [1, 2, 3, 4, 5, 6, 7];

/// Accurate 8x8 IDCT.
///
/// Writes `out[offset + r * stride + c]` for `r, c` in `0..8`.
pub fn idct_islow<S: Sample>(
    coef: &CoefBlock,
    quant: &QuantTable,
    out: &mut [S],
    offset: usize,
    stride: usize,
) {
    let cols = islow_block(coef, quant, S::PASS1_BITS, S::CENTER, S::MAX);
    store_columns(&cols, out, offset, stride);
}

#[cfg_attr(feature = "multiverse", multiversed)]
fn islow_block(
    coef: &CoefBlock,
    quant: &QuantTable,
    pass1_bits: u32,
    center: i32,
    max: i32,
) -> [[i32; 8]; 8] {
    let ws = pass1(coef, quant, pass1_bits);
    pass2(&ws, pass1_bits, center, max)
}

/// Column pass. Returns the workspace in row-major order.
#[inline(always)]
fn pass1(coef: &CoefBlock, quant: &QuantTable, pass1_bits: u32) -> Rows {
    let d = dequantize(coef, quant);
    if rows_are_zero(&d, &AC_ROWS) {
        let dc = d[0].map(|v| dc_only(v, CONST_BITS, pass1_bits));
        return [dc; 8];
    }
    islow_butterfly(&d).map(|row| row.map(|v| descale(v, CONST_BITS - pass1_bits)))
}

/// Row pass over the transposed workspace.
///
/// Returns level-shifted, clamped samples, one lane vector per output column.
#[inline(always)]
fn pass2(ws: &Rows, pass1_bits: u32, center: i32, max: i32) -> [[i32; 8]; 8] {
    let t = permute(as_flat(ws), &TRANSPOSE_8X8);
    let d: [[i32; 8]; 8] = core::array::from_fn(|k| core::array::from_fn(|r| t[k * 8 + r]));
    let shift = CONST_BITS + pass1_bits + 3;
    islow_butterfly(&d).map(|col| level_shift(col, shift, center, max))
}

#[inline(always)]
pub(crate) fn as_flat(ws: &Rows) -> &[i32; 64] {
    // a [[i32; 8]; 8] is laid out as 64 contiguous i32
    let flat: &[i32] = ws.as_flattened();
    match flat.try_into() {
        Ok(a) => a,
        Err(_) => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idct::scalar::idct_islow_scalar;

    #[test]
    fn flat_block_takes_dc_shortcut() {
        let mut coef = [0i16; 64];
        coef[..8].copy_from_slice(&[10, -3, 4, 0, 0, 1, 0, 2]);
        let q = [2i32; 64];
        let ws = pass1(&coef, &q, 2);
        for row in ws.iter() {
            assert_eq!(row, &[80, -24, 32, 0, 0, 8, 0, 16]);
        }
    }

    #[test]
    fn matches_reference_on_impulses() {
        let q: QuantTable = core::array::from_fn(|i| 1 + (i as i32 % 11));
        for pos in 0..64 {
            for amp in [-300i16, -17, 1, 45, 255] {
                let mut coef = [0i16; 64];
                coef[pos] = amp;
                let mut a = [0u8; 64];
                let mut b = [0u8; 64];
                idct_islow(&coef, &q, &mut a, 0, 8);
                idct_islow_scalar(&coef, &q, &mut b, 0, 8);
                assert_eq!(a, b, "pos {pos} amp {amp}");
            }
        }
    }

    #[test]
    fn large_legal_coefficients_wrap_like_the_reference() {
        // category-10 odd rows under the coarsest 8-bit quantizer
        let mut odd_rows = [0i16; 64];
        for k in [1, 3, 5, 7] {
            odd_rows[k * 8] = 1023;
        }
        let q = [255i32; 64];
        for coef in [odd_rows, [i16::MAX; 64], [i16::MIN; 64]] {
            let mut a = [0u8; 64];
            let mut b = [0u8; 64];
            idct_islow(&coef, &q, &mut a, 0, 8);
            idct_islow_scalar(&coef, &q, &mut b, 0, 8);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn respects_offset_and_stride() {
        let mut coef = [0i16; 64];
        coef[0] = 16;
        coef[1] = -9;
        let q = [4i32; 64];
        let mut plane = [7u8; 20 * 10];
        idct_islow(&coef, &q, &mut plane, 2 * 20 + 3, 20);
        let mut block = [0u8; 64];
        idct_islow_scalar(&coef, &q, &mut block, 0, 8);
        for (i, &v) in plane.iter().enumerate() {
            let (r, c) = (i / 20, i % 20);
            if (2..10).contains(&r) && (3..11).contains(&c) {
                assert_eq!(v, block[(r - 2) * 8 + c - 3]);
            } else {
                assert_eq!(v, 7, "touched ({r},{c})");
            }
        }
    }
}
