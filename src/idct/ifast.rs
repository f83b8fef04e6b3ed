//! Fast integer IDCT (Arai, Agui and Nakajima) over lane vectors.
//!
//! This is a different algorithm from [`super::idct_islow`], not a rougher
//! copy of it: the butterfly uses four Q15 remainders and the AAN output
//! scaling is folded into the multiplier table, so a plain quantization
//! table must go through [`IfastTable::from_quant`] first.

use core::marker::PhantomData;

#[cfg(feature = "multiverse")]
use multiversed::multiversed;

use super::islow::as_flat;
use super::{
    dequantize, level_shift, rows_are_zero, store_columns, CoefBlock, QuantTable, Rows,
};
use crate::common::butterfly::ifast_butterfly;
use crate::common::consts::{AAN_BITS, AAN_SCALES, DCTSIZE2};
use crate::common::permute::{permute, TRANSPOSE_8X8};
use crate::common::sample::Sample;

const AC_ROWS: [usize; 7] = [1, 2, 3, 4, 5, 6, 7];

/// Multiplier table for the fast IDCT at sample depth `S`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfastTable<S: Sample> {
    mult: QuantTable,
    _sample: PhantomData<S>,
}

impl<S: Sample> IfastTable<S> {
    /// Scale a natural-order quantization table by the AAN factors.
    ///
    /// `mult[i] = descale(q[i] * aan[i], 14 - PASS1_BITS)`, which leaves the
    /// first pass carrying `PASS1_BITS` fractional bits.
    #[must_use]
    pub fn from_quant(quant: &[u16; DCTSIZE2]) -> Self {
        let mult = core::array::from_fn(|i| {
            let prod = i64::from(quant[i]) * i64::from(AAN_SCALES[i]);
            let shift = AAN_BITS - S::PASS1_BITS;
            ((prod + (1 << (shift - 1))) >> shift) as i32
        });
        Self {
            mult,
            _sample: PhantomData,
        }
    }

    /// The scaled multipliers.
    #[must_use]
    pub fn multipliers(&self) -> &QuantTable {
        &self.mult
    }
}

/// Fast 8x8 IDCT. `quant` holds AAN-scaled multipliers.
///
/// Writes `out[offset + r * stride + c]` for `r, c` in `0..8`.
pub fn idct_ifast<S: Sample>(
    coef: &CoefBlock,
    quant: &QuantTable,
    out: &mut [S],
    offset: usize,
    stride: usize,
) {
    let cols = ifast_block(coef, quant, S::PASS1_BITS, S::CENTER, S::MAX);
    store_columns(&cols, out, offset, stride);
}

#[cfg_attr(feature = "multiverse", multiversed)]
fn ifast_block(
    coef: &CoefBlock,
    quant: &QuantTable,
    pass1_bits: u32,
    center: i32,
    max: i32,
) -> [[i32; 8]; 8] {
    let ws = pass1(coef, quant);
    pass2(&ws, pass1_bits, center, max)
}

#[inline(always)]
fn pass1(coef: &CoefBlock, quant: &QuantTable) -> Rows {
    let d = dequantize(coef, quant);
    // the butterfly passes a DC-only column through unchanged
    if rows_are_zero(&d, &AC_ROWS) {
        return [d[0]; 8];
    }
    ifast_butterfly(&d)
}

#[inline(always)]
fn pass2(ws: &Rows, pass1_bits: u32, center: i32, max: i32) -> [[i32; 8]; 8] {
    let t = permute(as_flat(ws), &TRANSPOSE_8X8);
    let d: [[i32; 8]; 8] = core::array::from_fn(|k| core::array::from_fn(|r| t[k * 8 + r]));
    ifast_butterfly(&d).map(|col| level_shift(col, pass1_bits + 3, center, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idct::scalar::idct_ifast_scalar;
    use crate::idct::islow::idct_islow;

    #[test]
    fn table_scales_dc_by_pass1_bits() {
        let t = IfastTable::<u8>::from_quant(&[16; 64]);
        assert_eq!(t.multipliers()[0], 64);
        // 16 * 1247 / 4096, rounded
        assert_eq!(t.multipliers()[63], 5);
        let t = IfastTable::<u16>::from_quant(&[16; 64]);
        assert_eq!(t.multipliers()[0], 32);
    }

    #[test]
    fn matches_reference_on_impulses() {
        let q: [u16; 64] = core::array::from_fn(|i| 1 + (i as u16 * 7 % 23));
        let table = IfastTable::<u8>::from_quant(&q);
        for pos in 0..64 {
            for amp in [-200i16, -5, 3, 77] {
                let mut coef = [0i16; 64];
                coef[pos] = amp;
                let mut a = [0u8; 64];
                let mut b = [0u8; 64];
                idct_ifast(&coef, table.multipliers(), &mut a, 0, 8);
                idct_ifast_scalar(&coef, table.multipliers(), &mut b, 0, 8);
                assert_eq!(a, b, "pos {pos} amp {amp}");
            }
        }
    }

    #[test]
    fn extreme_multipliers_wrap_like_the_reference() {
        let table = IfastTable::<u16>::from_quant(&[65535; 64]);
        let alternating: CoefBlock =
            core::array::from_fn(|i| if i % 2 == 0 { i16::MAX } else { i16::MIN });
        for coef in [alternating, [i16::MIN; 64]] {
            let mut a = [0u16; 64];
            let mut b = [0u16; 64];
            idct_ifast(&coef, table.multipliers(), &mut a, 0, 8);
            idct_ifast_scalar(&coef, table.multipliers(), &mut b, 0, 8);
            assert_eq!(a, b);
            assert!(a.iter().all(|&v| v <= 4095));
        }
    }

    #[test]
    fn stays_near_the_accurate_transform() {
        let q = [2u16; 64];
        let table = IfastTable::<u8>::from_quant(&q);
        let mut coef = [0i16; 64];
        coef[0] = 30;
        coef[1] = -20;
        coef[8] = 14;
        coef[10] = 9;
        coef[27] = -6;
        let mut fast = [0u8; 64];
        let mut slow = [0u8; 64];
        idct_ifast(&coef, table.multipliers(), &mut fast, 0, 8);
        idct_islow(&coef, &q.map(i32::from), &mut slow, 0, 8);
        for (f, s) in fast.iter().zip(slow.iter()) {
            assert!((i32::from(*f) - i32::from(*s)).abs() <= 2, "{f} vs {s}");
        }
    }
}
