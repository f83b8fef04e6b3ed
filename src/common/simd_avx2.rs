//! AVX2 lane helpers shared by the IDCT and color kernels.
//!
//! All arithmetic is on eight 32-bit lanes, mirroring [`super::butterfly::Lanes`]
//! so the vector kernels stay bit-exact with the portable ones.

use archmage::{rite, X64V3Token};
use core::arch::x86_64::*;
use safe_unaligned_simd::x86_64 as simd_mem;

#[rite]
pub(crate) fn load_i32x8(_token: X64V3Token, src: &[i32; 8]) -> __m256i {
    simd_mem::_mm256_loadu_si256(src)
}

#[rite]
pub(crate) fn store_i32x8(_token: X64V3Token, dst: &mut [i32; 8], v: __m256i) {
    simd_mem::_mm256_storeu_si256(dst, v);
}

/// Sign-extend eight i16 into i32 lanes.
#[rite]
pub(crate) fn load_i16x8(_token: X64V3Token, src: &[i16; 8]) -> __m256i {
    _mm256_cvtepi16_epi32(simd_mem::_mm_loadu_si128(src))
}

#[rite]
pub(crate) fn mul_const(_token: X64V3Token, a: __m256i, k: i32) -> __m256i {
    _mm256_mullo_epi32(a, _mm256_set1_epi32(k))
}

/// `acc + a * k`
#[rite]
pub(crate) fn mac_const(_token: X64V3Token, acc: __m256i, a: __m256i, k: i32) -> __m256i {
    _mm256_add_epi32(acc, _mm256_mullo_epi32(a, _mm256_set1_epi32(k)))
}

#[rite]
pub(crate) fn shl(_token: X64V3Token, a: __m256i, n: u32) -> __m256i {
    _mm256_sll_epi32(a, _mm_cvtsi32_si128(n as i32))
}

/// Arithmetic shift right without rounding.
#[rite]
pub(crate) fn sra(_token: X64V3Token, a: __m256i, n: u32) -> __m256i {
    _mm256_sra_epi32(a, _mm_cvtsi32_si128(n as i32))
}

/// Rounding shift: `(a + 2^(n-1)) >> n`.
#[rite]
pub(crate) fn descale(token: X64V3Token, a: __m256i, n: u32) -> __m256i {
    let bias = _mm256_set1_epi32(1 << (n - 1));
    sra(token, _mm256_add_epi32(a, bias), n)
}

/// Add `center` and clamp to `0..=max`.
#[rite]
pub(crate) fn level_shift_clamp(_token: X64V3Token, a: __m256i, center: i32, max: i32) -> __m256i {
    let shifted = _mm256_add_epi32(a, _mm256_set1_epi32(center));
    _mm256_min_epi32(
        _mm256_max_epi32(shifted, _mm256_setzero_si256()),
        _mm256_set1_epi32(max),
    )
}

/// True when every lane of every vector is zero.
#[rite]
pub(crate) fn all_zero(_token: X64V3Token, v: &[__m256i]) -> bool {
    let mut acc = _mm256_setzero_si256();
    for &x in v {
        acc = _mm256_or_si256(acc, x);
    }
    _mm256_testz_si256(acc, acc) == 1
}
