//! One-dimensional IDCT butterflies over `N` parallel lanes.
//!
//! Each function takes eight lane vectors, `d[k]` holding coefficient `k` of
//! `N` independent 1-D transforms, and returns the outputs still carrying the
//! constant set's fractional scale. Both IDCT passes call the same function;
//! only the descale that follows differs. Pass 1 runs with one lane per
//! column, pass 2 with one lane per output row of the transposed workspace.
//!
//! Out-of-range coefficient blocks can overflow 32 bits, so every lane
//! operation wraps. The AVX2 kernels wrap the same way, which keeps all
//! backends bit-exact on any input.

use super::consts::{
    ifast as fst, islow as isl, reduced2 as r2, reduced4 as r4, CONST_BITS, IFAST_BITS,
};

/// `N` lanes of 32-bit intermediates.
pub type Lanes<const N: usize> = [i32; N];

#[inline(always)]
fn add<const N: usize>(a: Lanes<N>, b: Lanes<N>) -> Lanes<N> {
    core::array::from_fn(|i| a[i].wrapping_add(b[i]))
}

#[inline(always)]
fn sub<const N: usize>(a: Lanes<N>, b: Lanes<N>) -> Lanes<N> {
    core::array::from_fn(|i| a[i].wrapping_sub(b[i]))
}

#[inline(always)]
fn mul<const N: usize>(a: Lanes<N>, k: i32) -> Lanes<N> {
    core::array::from_fn(|i| a[i].wrapping_mul(k))
}

/// Multiply-accumulate `acc + a * k`.
#[inline(always)]
fn mac<const N: usize>(acc: Lanes<N>, a: Lanes<N>, k: i32) -> Lanes<N> {
    core::array::from_fn(|i| acc[i].wrapping_add(a[i].wrapping_mul(k)))
}

#[inline(always)]
fn shl<const N: usize>(a: Lanes<N>, n: u32) -> Lanes<N> {
    core::array::from_fn(|i| a[i] << n)
}

/// Q15 rounding multiply of the fractional remainder `k`.
#[inline(always)]
pub(crate) fn smul(x: i32, k: i32) -> i32 {
    ((i64::from(x) * i64::from(k) + (1 << (IFAST_BITS - 1))) >> IFAST_BITS) as i32
}

#[inline(always)]
fn smul_lanes<const N: usize>(a: Lanes<N>, k: i32) -> Lanes<N> {
    core::array::from_fn(|i| smul(a[i], k))
}

/// Accurate 8-point IDCT; outputs are scaled by `2^CONST_BITS`.
#[inline(always)]
pub fn islow_butterfly<const N: usize>(d: &[Lanes<N>; 8]) -> [Lanes<N>; 8] {
    // Even part: rows 0, 2, 4, 6.
    let z1 = mul(add(d[2], d[6]), isl::F_0_541);
    let tmp2 = mac(z1, d[6], -isl::F_1_847);
    let tmp3 = mac(z1, d[2], isl::F_0_765);

    let tmp0 = shl(add(d[0], d[4]), CONST_BITS);
    let tmp1 = shl(sub(d[0], d[4]), CONST_BITS);

    let tmp10 = add(tmp0, tmp3);
    let tmp13 = sub(tmp0, tmp3);
    let tmp11 = add(tmp1, tmp2);
    let tmp12 = sub(tmp1, tmp2);

    // Odd part: rows 7, 5, 3, 1, with the z1/z2 products folded into the
    // per-row constants.
    let z3 = add(d[7], d[3]);
    let z4 = add(d[5], d[1]);
    let z5 = mul(add(z3, z4), isl::F_1_175);
    let z3 = mac(z5, z3, -isl::F_1_961);
    let z4 = mac(z5, z4, -isl::F_0_390);

    let t0 = mac(mac(z3, d[7], isl::F_0_298_MINUS_0_899), d[1], -isl::F_0_899);
    let t1 = mac(mac(z4, d[5], isl::F_2_053_MINUS_2_562), d[3], -isl::F_2_562);
    let t2 = mac(mac(z3, d[3], isl::F_3_072_MINUS_2_562), d[5], -isl::F_2_562);
    let t3 = mac(mac(z4, d[1], isl::F_1_501_MINUS_0_899), d[7], -isl::F_0_899);

    [
        add(tmp10, t3),
        add(tmp11, t2),
        add(tmp12, t1),
        add(tmp13, t0),
        sub(tmp13, t0),
        sub(tmp12, t1),
        sub(tmp11, t2),
        sub(tmp10, t3),
    ]
}

/// Fast 8-point IDCT (AAN); outputs keep the multiplier table's scale.
#[inline(always)]
pub fn ifast_butterfly<const N: usize>(d: &[Lanes<N>; 8]) -> [Lanes<N>; 8] {
    // Even part
    let tmp10 = add(d[0], d[4]);
    let tmp11 = sub(d[0], d[4]);
    let tmp13 = add(d[2], d[6]);
    let diff = sub(d[2], d[6]);
    let tmp12 = sub(add(smul_lanes(diff, fst::F_0_414), diff), tmp13);

    let tmp0 = add(tmp10, tmp13);
    let tmp3 = sub(tmp10, tmp13);
    let tmp1 = add(tmp11, tmp12);
    let tmp2 = sub(tmp11, tmp12);

    // Odd part
    let z13 = add(d[3], d[5]);
    let neg_z10 = sub(d[3], d[5]);
    let z11 = add(d[1], d[7]);
    let z12 = sub(d[1], d[7]);

    let tmp7 = add(z11, z13);
    let diff = sub(z11, z13);
    let tmp11 = add(smul_lanes(diff, fst::F_0_414), diff);

    let s = sub(z12, neg_z10);
    let z5 = add(smul_lanes(s, fst::F_0_847), s);
    let tmp10 = sub(add(smul_lanes(z12, fst::F_0_082), z12), z5);
    let tmp12 = add(add(smul_lanes(neg_z10, fst::F_0_613), shl(neg_z10, 1)), z5);

    let tmp6 = sub(tmp12, tmp7);
    let tmp5 = sub(tmp11, tmp6);
    let tmp4 = add(tmp10, tmp5);

    [
        add(tmp0, tmp7),
        add(tmp1, tmp6),
        add(tmp2, tmp5),
        sub(tmp3, tmp4),
        add(tmp3, tmp4),
        sub(tmp2, tmp5),
        sub(tmp1, tmp6),
        sub(tmp0, tmp7),
    ]
}

/// 4-point output from coefficients {0,1,2,3,5,6,7}; scaled by `2^(CONST_BITS+1)`.
///
/// `d[4]` is never read.
#[inline(always)]
pub fn reduced4_butterfly<const N: usize>(d: &[Lanes<N>; 8]) -> [Lanes<N>; 4] {
    let tmp0 = shl(d[0], CONST_BITS + 1);
    let tmp2 = mac(mul(d[2], r4::F_1_847), d[6], -r4::F_0_765);

    let tmp10 = add(tmp0, tmp2);
    let tmp12 = sub(tmp0, tmp2);

    let odd0 = mac(
        mac(mac(mul(d[7], -r4::F_0_211), d[5], r4::F_1_451), d[3], -r4::F_2_172),
        d[1],
        r4::F_1_061,
    );
    let odd2 = mac(
        mac(mac(mul(d[7], -r4::F_0_509), d[5], -r4::F_0_601), d[3], r4::F_0_899),
        d[1],
        r4::F_2_562,
    );

    [
        add(tmp10, odd2),
        add(tmp12, odd0),
        sub(tmp12, odd0),
        sub(tmp10, odd2),
    ]
}

/// 2-point output from coefficients {0,1,3,5,7}; scaled by `2^(CONST_BITS+2)`.
#[inline(always)]
pub fn reduced2_butterfly<const N: usize>(d: &[Lanes<N>; 8]) -> [Lanes<N>; 2] {
    let tmp10 = shl(d[0], CONST_BITS + 2);
    let tmp0 = mac(
        mac(mac(mul(d[7], -r2::F_0_720), d[5], r2::F_0_850), d[3], -r2::F_1_272),
        d[1],
        r2::F_3_624,
    );
    [add(tmp10, tmp0), sub(tmp10, tmp0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(d: [i32; 8]) -> [Lanes<1>; 8] {
        d.map(|v| [v])
    }

    #[test]
    fn dc_only_is_flat() {
        let out = islow_butterfly(&single([100, 0, 0, 0, 0, 0, 0, 0]));
        assert!(out.iter().all(|o| o[0] == 100 << CONST_BITS));

        let out = ifast_butterfly(&single([100, 0, 0, 0, 0, 0, 0, 0]));
        assert!(out.iter().all(|o| o[0] == 100));

        let out = reduced4_butterfly(&single([7, 0, 0, 0, 0, 0, 0, 0]));
        assert!(out.iter().all(|o| o[0] == 7 << (CONST_BITS + 1)));

        let out = reduced2_butterfly(&single([-3, 0, 0, 0, 0, 0, 0, 0]));
        assert!(out.iter().all(|o| o[0] == -3 << (CONST_BITS + 2)));
    }

    #[test]
    fn lanes_are_independent() {
        let mut d = [[0i32; 3]; 8];
        for (k, row) in d.iter_mut().enumerate() {
            *row = [k as i32 * 3, -(k as i32), 17 - k as i32];
        }
        let wide = islow_butterfly(&d);
        for lane in 0..3 {
            let narrow = islow_butterfly(&single(core::array::from_fn(|k| d[k][lane])));
            for k in 0..8 {
                assert_eq!(wide[k][lane], narrow[k][0]);
            }
        }
    }

    /// Reference 8-point IDCT with the same `sqrt(8)` gain as the fixed-point
    /// butterflies.
    fn real_idct(d: [f64; 8]) -> [f64; 8] {
        core::array::from_fn(|n| {
            let mut acc = 0.0;
            for (k, &v) in d.iter().enumerate() {
                let c = if k == 0 { core::f64::consts::FRAC_1_SQRT_2 } else { 1.0 };
                acc += c * v * ((2 * n + 1) as f64 * k as f64 * core::f64::consts::PI / 16.0).cos();
            }
            acc * core::f64::consts::SQRT_2
        })
    }

    const INPUT: [i32; 8] = [640, -192, 144, 480, -112, 80, -320, 176];

    #[test]
    fn islow_tracks_the_real_transform() {
        let out = islow_butterfly(&single(INPUT));
        let expect = real_idct(INPUT.map(f64::from));
        for n in 0..8 {
            let got = f64::from(out[n][0]) / f64::from(1 << CONST_BITS);
            assert!((got - expect[n]).abs() < 0.5, "n={n} got {got} expect {}", expect[n]);
        }
    }

    #[test]
    fn ifast_tracks_the_real_transform_after_aan_scaling() {
        let scaled: [i32; 8] = core::array::from_fn(|k| {
            let s = if k == 0 {
                1.0
            } else {
                core::f64::consts::SQRT_2 * (k as f64 * core::f64::consts::PI / 16.0).cos()
            };
            (f64::from(INPUT[k]) * s).round() as i32
        });
        let out = ifast_butterfly(&single(scaled));
        let expect = real_idct(INPUT.map(f64::from));
        for n in 0..8 {
            let got = f64::from(out[n][0]);
            assert!((got - expect[n]).abs() < 8.0, "n={n} got {got} expect {}", expect[n]);
        }
    }

    #[test]
    fn smul_rounds_to_nearest() {
        assert_eq!(smul(1, 1 << 14), 1);
        assert_eq!(smul(3, 1 << 14), 2);
        assert_eq!(smul(-3, 1 << 14), -1);
        assert_eq!(smul(1000, fst::F_0_414), 414);
    }
}
