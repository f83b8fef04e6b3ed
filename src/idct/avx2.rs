//! AVX2 accurate IDCT.
//!
//! One `__m256i` holds a full coefficient row (pass 1) or a full workspace
//! column (pass 2), so each pass is a single run of the butterfly.

#![allow(clippy::needless_range_loop)]

use archmage::{arcane, rite, X64V3Token};
use core::arch::x86_64::*;

use super::{store_columns, CoefBlock, QuantTable};
use crate::common::consts::{islow as isl, CONST_BITS};
use crate::common::permute::{permute, TRANSPOSE_8X8};
use crate::common::sample::Sample;
use crate::common::simd_avx2::{
    all_zero, descale, level_shift_clamp, load_i16x8, load_i32x8, mac_const, mul_const, shl,
    store_i32x8,
};

/// Accurate 8x8 IDCT on eight 32-bit lanes.
pub(crate) fn idct_islow<S: Sample>(
    token: X64V3Token,
    coef: &CoefBlock,
    quant: &QuantTable,
    out: &mut [S],
    offset: usize,
    stride: usize,
) {
    let cols = islow_entry(token, coef, quant, S::PASS1_BITS, S::CENTER, S::MAX);
    store_columns(&cols, out, offset, stride);
}

#[arcane]
fn islow_entry(
    token: X64V3Token,
    coef: &CoefBlock,
    quant: &QuantTable,
    pass1_bits: u32,
    center: i32,
    max: i32,
) -> [[i32; 8]; 8] {
    islow_avx2(token, coef, quant, pass1_bits, center, max)
}

#[rite]
fn islow_avx2(
    token: X64V3Token,
    coef: &CoefBlock,
    quant: &QuantTable,
    pass1_bits: u32,
    center: i32,
    max: i32,
) -> [[i32; 8]; 8] {
    // Pass 1: dequantize, one vector per coefficient row.
    let mut d = [_mm256_setzero_si256(); 8];
    for k in 0..8 {
        let c: [i16; 8] = core::array::from_fn(|i| coef[k * 8 + i]);
        let q: [i32; 8] = core::array::from_fn(|i| quant[k * 8 + i]);
        d[k] = _mm256_mullo_epi32(load_i16x8(token, &c), load_i32x8(token, &q));
    }

    let mut ws = [[0i32; 8]; 8];
    if all_zero(token, &d[1..]) {
        // what the butterfly yields for a DC-only column, wrapping included
        let dc = descale(token, shl(token, d[0], CONST_BITS), CONST_BITS - pass1_bits);
        for row in ws.iter_mut() {
            store_i32x8(token, row, dc);
        }
    } else {
        let o = butterfly(token, &d);
        for (row, v) in ws.iter_mut().zip(o.iter()) {
            store_i32x8(token, row, descale(token, *v, CONST_BITS - pass1_bits));
        }
    }

    // Pass 2: gather-transpose, then one vector per workspace column.
    let flat: [i32; 64] = core::array::from_fn(|i| ws[i / 8][i % 8]);
    let t = permute(&flat, &TRANSPOSE_8X8);
    let mut d2 = [_mm256_setzero_si256(); 8];
    for k in 0..8 {
        let lanes: [i32; 8] = core::array::from_fn(|r| t[k * 8 + r]);
        d2[k] = load_i32x8(token, &lanes);
    }

    let o = butterfly(token, &d2);
    let shift = CONST_BITS + pass1_bits + 3;
    let mut cols = [[0i32; 8]; 8];
    for (col, v) in cols.iter_mut().zip(o.iter()) {
        let s = descale(token, *v, shift);
        store_i32x8(token, col, level_shift_clamp(token, s, center, max));
    }
    cols
}

#[rite]
fn butterfly(token: X64V3Token, d: &[__m256i; 8]) -> [__m256i; 8] {
    // Even part
    let z1 = mul_const(token, _mm256_add_epi32(d[2], d[6]), isl::F_0_541);
    let tmp2 = mac_const(token, z1, d[6], -isl::F_1_847);
    let tmp3 = mac_const(token, z1, d[2], isl::F_0_765);

    let tmp0 = shl(token, _mm256_add_epi32(d[0], d[4]), CONST_BITS);
    let tmp1 = shl(token, _mm256_sub_epi32(d[0], d[4]), CONST_BITS);

    let tmp10 = _mm256_add_epi32(tmp0, tmp3);
    let tmp13 = _mm256_sub_epi32(tmp0, tmp3);
    let tmp11 = _mm256_add_epi32(tmp1, tmp2);
    let tmp12 = _mm256_sub_epi32(tmp1, tmp2);

    // Odd part
    let z3 = _mm256_add_epi32(d[7], d[3]);
    let z4 = _mm256_add_epi32(d[5], d[1]);
    let z5 = mul_const(token, _mm256_add_epi32(z3, z4), isl::F_1_175);
    let z3 = mac_const(token, z5, z3, -isl::F_1_961);
    let z4 = mac_const(token, z5, z4, -isl::F_0_390);

    let t0 = mac_const(token, z3, d[7], isl::F_0_298_MINUS_0_899);
    let t0 = mac_const(token, t0, d[1], -isl::F_0_899);
    let t1 = mac_const(token, z4, d[5], isl::F_2_053_MINUS_2_562);
    let t1 = mac_const(token, t1, d[3], -isl::F_2_562);
    let t2 = mac_const(token, z3, d[3], isl::F_3_072_MINUS_2_562);
    let t2 = mac_const(token, t2, d[5], -isl::F_2_562);
    let t3 = mac_const(token, z4, d[1], isl::F_1_501_MINUS_0_899);
    let t3 = mac_const(token, t3, d[7], -isl::F_0_899);

    [
        _mm256_add_epi32(tmp10, t3),
        _mm256_add_epi32(tmp11, t2),
        _mm256_add_epi32(tmp12, t1),
        _mm256_add_epi32(tmp13, t0),
        _mm256_sub_epi32(tmp13, t0),
        _mm256_sub_epi32(tmp12, t1),
        _mm256_sub_epi32(tmp11, t2),
        _mm256_sub_epi32(tmp10, t3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idct::scalar::idct_islow_scalar;
    use archmage::SimdToken;

    #[test]
    fn matches_reference_on_impulses() {
        let Some(token) = X64V3Token::summon() else {
            return;
        };
        let q: QuantTable = core::array::from_fn(|i| 1 + (i as i32 % 7));
        for pos in 0..64 {
            for amp in [-400i16, -2, 1, 130] {
                let mut coef = [0i16; 64];
                coef[pos] = amp;
                let mut a = [0u8; 64];
                let mut b = [0u8; 64];
                idct_islow(token, &coef, &q, &mut a, 0, 8);
                idct_islow_scalar(&coef, &q, &mut b, 0, 8);
                assert_eq!(a, b, "pos {pos} amp {amp}");

                let mut a = [0u16; 64];
                let mut b = [0u16; 64];
                idct_islow(token, &coef, &q, &mut a, 0, 8);
                idct_islow_scalar(&coef, &q, &mut b, 0, 8);
                assert_eq!(a, b, "12-bit pos {pos} amp {amp}");
            }
        }
    }

    #[test]
    fn wraps_like_the_reference_on_extreme_blocks() {
        let Some(token) = X64V3Token::summon() else {
            return;
        };
        let q: QuantTable = [255; 64];
        let mut dc_heavy = [0i16; 64];
        dc_heavy[0] = i16::MAX;
        let mut odd_rows = [0i16; 64];
        for k in [1, 3, 5, 7] {
            odd_rows[k * 8] = 1023;
        }
        let alternating: CoefBlock =
            core::array::from_fn(|i| if i % 3 == 0 { i16::MIN } else { i16::MAX });
        for coef in [dc_heavy, odd_rows, alternating, [i16::MIN; 64]] {
            let mut a = [0u8; 64];
            let mut b = [0u8; 64];
            idct_islow(token, &coef, &q, &mut a, 0, 8);
            idct_islow_scalar(&coef, &q, &mut b, 0, 8);
            assert_eq!(a, b);
        }
    }
}
