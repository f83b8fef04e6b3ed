//! Scalar reference IDCTs.
//!
//! Straight column-then-row loops, one 1-D transform at a time, with the
//! classic per-column and per-row zero shortcuts. These are the bit-exact
//! oracles for the lane and intrinsic kernels and back `Backend::Scalar`.
//!
//! Arithmetic wraps at 32 bits like the vector kernels, and each shortcut
//! produces the value the full 1-D transform would, so results agree with
//! them on any input.

#![allow(clippy::needless_range_loop)]

use super::{dc_only, CoefBlock, QuantTable};
use crate::common::butterfly::smul;
use crate::common::consts::{
    descale, ifast as fst, islow as isl, reduced2 as r2, reduced4 as r4, CONST_BITS, DCTSIZE,
};
use crate::common::sample::Sample;

#[inline(always)]
fn dq(coef: &CoefBlock, quant: &QuantTable, idx: usize) -> i32 {
    i32::from(coef[idx]).wrapping_mul(quant[idx])
}

#[inline(always)]
fn put<S: Sample>(out: &mut [S], offset: usize, stride: usize, r: usize, c: usize, v: i32) {
    out[offset + r * stride + c] = S::clamp_from(v.wrapping_add(S::CENTER));
}

/// Accurate 8x8 IDCT, reference form.
pub fn idct_islow_scalar<S: Sample>(
    coef: &CoefBlock,
    quant: &QuantTable,
    out: &mut [S],
    offset: usize,
    stride: usize,
) {
    let p = S::PASS1_BITS;
    let mut ws = [0i32; 64];

    for c in 0..DCTSIZE {
        let col = |k: usize| dq(coef, quant, k * DCTSIZE + c);
        if (1..8).all(|k| coef[k * DCTSIZE + c] == 0) {
            let dc = dc_only(col(0), CONST_BITS, p);
            for r in 0..DCTSIZE {
                ws[r * DCTSIZE + c] = dc;
            }
            continue;
        }
        let o = islow_1d([col(0), col(1), col(2), col(3), col(4), col(5), col(6), col(7)]);
        for r in 0..DCTSIZE {
            ws[r * DCTSIZE + c] = descale(o[r], CONST_BITS - p);
        }
    }

    for r in 0..DCTSIZE {
        let row: [i32; 8] = core::array::from_fn(|k| ws[r * DCTSIZE + k]);
        if row[1..].iter().all(|&v| v == 0) {
            let v = descale(row[0] << CONST_BITS, CONST_BITS + p + 3);
            for c in 0..DCTSIZE {
                put(out, offset, stride, r, c, v);
            }
            continue;
        }
        let o = islow_1d(row);
        for c in 0..DCTSIZE {
            put(out, offset, stride, r, c, descale(o[c], CONST_BITS + p + 3));
        }
    }
}

fn islow_1d(d: [i32; 8]) -> [i32; 8] {
    let z2 = d[2];
    let z3 = d[6];
    let z1 = z2.wrapping_add(z3).wrapping_mul(isl::F_0_541);
    let tmp2 = z1.wrapping_add(z3.wrapping_mul(-isl::F_1_847));
    let tmp3 = z1.wrapping_add(z2.wrapping_mul(isl::F_0_765));

    let tmp0 = d[0].wrapping_add(d[4]) << CONST_BITS;
    let tmp1 = d[0].wrapping_sub(d[4]) << CONST_BITS;

    let tmp10 = tmp0.wrapping_add(tmp3);
    let tmp13 = tmp0.wrapping_sub(tmp3);
    let tmp11 = tmp1.wrapping_add(tmp2);
    let tmp12 = tmp1.wrapping_sub(tmp2);

    let (t0, t1, t2, t3) = (d[7], d[5], d[3], d[1]);

    let z1 = t0.wrapping_add(t3);
    let z2 = t1.wrapping_add(t2);
    let z3 = t0.wrapping_add(t2);
    let z4 = t1.wrapping_add(t3);
    let z5 = z3.wrapping_add(z4).wrapping_mul(isl::F_1_175);

    let t0 = t0.wrapping_mul(isl::F_0_298);
    let t1 = t1.wrapping_mul(isl::F_2_053);
    let t2 = t2.wrapping_mul(isl::F_3_072);
    let t3 = t3.wrapping_mul(isl::F_1_501);
    let z1 = z1.wrapping_mul(-isl::F_0_899);
    let z2 = z2.wrapping_mul(-isl::F_2_562);
    let z3 = z3.wrapping_mul(-isl::F_1_961).wrapping_add(z5);
    let z4 = z4.wrapping_mul(-isl::F_0_390).wrapping_add(z5);

    let t0 = t0.wrapping_add(z1).wrapping_add(z3);
    let t1 = t1.wrapping_add(z2).wrapping_add(z4);
    let t2 = t2.wrapping_add(z2).wrapping_add(z3);
    let t3 = t3.wrapping_add(z1).wrapping_add(z4);

    [
        tmp10.wrapping_add(t3),
        tmp11.wrapping_add(t2),
        tmp12.wrapping_add(t1),
        tmp13.wrapping_add(t0),
        tmp13.wrapping_sub(t0),
        tmp12.wrapping_sub(t1),
        tmp11.wrapping_sub(t2),
        tmp10.wrapping_sub(t3),
    ]
}

/// Fast 8x8 IDCT, reference form. `quant` is an [`super::IfastTable`] table.
pub fn idct_ifast_scalar<S: Sample>(
    coef: &CoefBlock,
    quant: &QuantTable,
    out: &mut [S],
    offset: usize,
    stride: usize,
) {
    let p = S::PASS1_BITS;
    let mut ws = [0i32; 64];

    for c in 0..DCTSIZE {
        let col = |k: usize| dq(coef, quant, k * DCTSIZE + c);
        if (1..8).all(|k| coef[k * DCTSIZE + c] == 0) {
            let dc = col(0);
            for r in 0..DCTSIZE {
                ws[r * DCTSIZE + c] = dc;
            }
            continue;
        }
        let o = ifast_1d([col(0), col(1), col(2), col(3), col(4), col(5), col(6), col(7)]);
        for r in 0..DCTSIZE {
            ws[r * DCTSIZE + c] = o[r];
        }
    }

    for r in 0..DCTSIZE {
        let o = ifast_1d(core::array::from_fn(|k| ws[r * DCTSIZE + k]));
        for c in 0..DCTSIZE {
            put(out, offset, stride, r, c, descale(o[c], p + 3));
        }
    }
}

/// `x * (1 + frac)` with `frac` in Q15.
fn mul_q15(x: i32, frac: i32) -> i32 {
    x.wrapping_add(smul(x, frac))
}

/// `x * (2 + frac)` with `frac` in Q15.
fn mul2_q15(x: i32, frac: i32) -> i32 {
    (x << 1).wrapping_add(smul(x, frac))
}

fn ifast_1d(d: [i32; 8]) -> [i32; 8] {
    let tmp10 = d[0].wrapping_add(d[4]);
    let tmp11 = d[0].wrapping_sub(d[4]);
    let tmp13 = d[2].wrapping_add(d[6]);
    let tmp12 = mul_q15(d[2].wrapping_sub(d[6]), fst::F_0_414).wrapping_sub(tmp13);

    let tmp0 = tmp10.wrapping_add(tmp13);
    let tmp3 = tmp10.wrapping_sub(tmp13);
    let tmp1 = tmp11.wrapping_add(tmp12);
    let tmp2 = tmp11.wrapping_sub(tmp12);

    let z13 = d[5].wrapping_add(d[3]);
    let z10 = d[5].wrapping_sub(d[3]);
    let z11 = d[1].wrapping_add(d[7]);
    let z12 = d[1].wrapping_sub(d[7]);

    let tmp7 = z11.wrapping_add(z13);
    let tmp11 = mul_q15(z11.wrapping_sub(z13), fst::F_0_414);
    let z5 = mul_q15(z10.wrapping_add(z12), fst::F_0_847);
    let tmp10 = mul_q15(z12, fst::F_0_082).wrapping_sub(z5);
    // -2.613 * z10, the sign folded into the operand before rounding
    let tmp12 = mul2_q15(z10.wrapping_neg(), fst::F_0_613).wrapping_add(z5);

    let tmp6 = tmp12.wrapping_sub(tmp7);
    let tmp5 = tmp11.wrapping_sub(tmp6);
    let tmp4 = tmp10.wrapping_add(tmp5);

    [
        tmp0.wrapping_add(tmp7),
        tmp1.wrapping_add(tmp6),
        tmp2.wrapping_add(tmp5),
        tmp3.wrapping_sub(tmp4),
        tmp3.wrapping_add(tmp4),
        tmp2.wrapping_sub(tmp5),
        tmp1.wrapping_sub(tmp6),
        tmp0.wrapping_sub(tmp7),
    ]
}

/// Reduced 4x4 IDCT, reference form.
pub fn idct_4x4_scalar<S: Sample>(
    coef: &CoefBlock,
    quant: &QuantTable,
    out: &mut [S],
    offset: usize,
    stride: usize,
) {
    let p = S::PASS1_BITS;
    let mut ws = [0i32; 8 * 4];

    for c in 0..DCTSIZE {
        // column 4 is not needed by the second pass
        if c == 4 {
            continue;
        }
        let col = |k: usize| dq(coef, quant, k * DCTSIZE + c);
        if [1, 2, 3, 5, 6, 7].iter().all(|&k| coef[k * DCTSIZE + c] == 0) {
            let dc = dc_only(col(0), CONST_BITS + 1, p);
            for r in 0..4 {
                ws[r * DCTSIZE + c] = dc;
            }
            continue;
        }
        let o = reduced4_1d([col(0), col(1), col(2), col(3), 0, col(5), col(6), col(7)]);
        for r in 0..4 {
            ws[r * DCTSIZE + c] = descale(o[r], CONST_BITS - p + 1);
        }
    }

    for r in 0..4 {
        let row: [i32; 8] = core::array::from_fn(|k| ws[r * DCTSIZE + k]);
        let o = reduced4_1d(row);
        for c in 0..4 {
            put(out, offset, stride, r, c, descale(o[c], CONST_BITS + p + 3 + 1));
        }
    }
}

/// `sum(x[i] * k[i])`, wrapping.
fn dot4(x: [i32; 4], k: [i32; 4]) -> i32 {
    x.iter()
        .zip(k.iter())
        .fold(0i32, |acc, (&x, &k)| acc.wrapping_add(x.wrapping_mul(k)))
}

fn reduced4_1d(d: [i32; 8]) -> [i32; 4] {
    let tmp0 = d[0] << (CONST_BITS + 1);
    let tmp2 = d[2]
        .wrapping_mul(r4::F_1_847)
        .wrapping_sub(d[6].wrapping_mul(r4::F_0_765));
    let tmp10 = tmp0.wrapping_add(tmp2);
    let tmp12 = tmp0.wrapping_sub(tmp2);

    let z = [d[7], d[5], d[3], d[1]];
    let tmp0 = dot4(z, [-r4::F_0_211, r4::F_1_451, -r4::F_2_172, r4::F_1_061]);
    let tmp2 = dot4(z, [-r4::F_0_509, -r4::F_0_601, r4::F_0_899, r4::F_2_562]);

    [
        tmp10.wrapping_add(tmp2),
        tmp12.wrapping_add(tmp0),
        tmp12.wrapping_sub(tmp0),
        tmp10.wrapping_sub(tmp2),
    ]
}

/// Reduced 2x2 IDCT, reference form.
pub fn idct_2x2_scalar<S: Sample>(
    coef: &CoefBlock,
    quant: &QuantTable,
    out: &mut [S],
    offset: usize,
    stride: usize,
) {
    let p = S::PASS1_BITS;
    let mut ws = [0i32; 8 * 2];

    for c in 0..DCTSIZE {
        if c == 2 || c == 4 || c == 6 {
            continue;
        }
        let col = |k: usize| dq(coef, quant, k * DCTSIZE + c);
        if [1, 3, 5, 7].iter().all(|&k| coef[k * DCTSIZE + c] == 0) {
            let dc = dc_only(col(0), CONST_BITS + 2, p);
            ws[c] = dc;
            ws[DCTSIZE + c] = dc;
            continue;
        }
        let o = reduced2_1d(col(0), col(1), col(3), col(5), col(7));
        ws[c] = descale(o[0], CONST_BITS - p + 2);
        ws[DCTSIZE + c] = descale(o[1], CONST_BITS - p + 2);
    }

    for r in 0..2 {
        let w = |k: usize| ws[r * DCTSIZE + k];
        let o = reduced2_1d(w(0), w(1), w(3), w(5), w(7));
        for c in 0..2 {
            put(out, offset, stride, r, c, descale(o[c], CONST_BITS + p + 3 + 2));
        }
    }
}

fn reduced2_1d(d0: i32, d1: i32, d3: i32, d5: i32, d7: i32) -> [i32; 2] {
    let tmp10 = d0 << (CONST_BITS + 2);
    let tmp0 = dot4(
        [d7, d5, d3, d1],
        [-r2::F_0_720, r2::F_0_850, -r2::F_1_272, r2::F_3_624],
    );
    [tmp10.wrapping_add(tmp0), tmp10.wrapping_sub(tmp0)]
}
