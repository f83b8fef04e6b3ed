//! AVX2 color conversion.
//!
//! Pixels are gathered into blocks of eight 32-bit lanes exactly as the
//! portable kernel gathers them; only the matrix arithmetic runs in
//! registers. A partial final block is zero-padded and its extra lanes are
//! discarded on scatter.

#![allow(clippy::needless_range_loop)]

use archmage::{arcane, X64V3Token};
use core::arch::x86_64::*;

use super::convert::{gather_plane, gather_rgb, scatter_rgb, store_plane, Lane};
use super::PixelLayout;
use crate::common::consts::{color as k, ONE_HALF, SCALEBITS};
use crate::common::sample::Sample;
use crate::common::simd_avx2::{descale, load_i32x8, mac_const, mul_const, sra, store_i32x8};
use crate::common::vector::MAX_LANES;

const BLOCKS: usize = MAX_LANES / 8;

type Blocks = [[i32; 8]; BLOCKS];

fn to_blocks(lane: &Lane) -> Blocks {
    core::array::from_fn(|b| core::array::from_fn(|i| lane[b * 8 + i]))
}

fn from_blocks(blocks: &Blocks) -> Lane {
    core::array::from_fn(|i| blocks[i / 8][i % 8])
}

/// Forward conversion of `width` interleaved pixels.
pub(crate) fn rgb_to_ycc_row<S: Sample>(
    token: X64V3Token,
    rgb: &[S],
    layout: PixelLayout,
    y: &mut [S],
    cb: &mut [S],
    cr: &mut [S],
    width: usize,
) {
    let ps = layout.pixel_size();
    let mut start = 0;
    while start < width {
        let n = (width - start).min(MAX_LANES);
        let [r, g, b] = gather_rgb(&rgb[start * ps..], layout, n);
        let planes = forward_entry(
            token,
            [&to_blocks(&r), &to_blocks(&g), &to_blocks(&b)],
            n.div_ceil(8),
            S::CENTER,
        );
        let end = start + n;
        store_plane(&mut y[start..end], &from_blocks(&planes[0]));
        store_plane(&mut cb[start..end], &from_blocks(&planes[1]));
        store_plane(&mut cr[start..end], &from_blocks(&planes[2]));
        start = end;
    }
}

/// Inverse conversion of `width` pixels.
pub(crate) fn ycc_to_rgb_row<S: Sample>(
    token: X64V3Token,
    y: &[S],
    cb: &[S],
    cr: &[S],
    out: &mut [S],
    layout: PixelLayout,
    width: usize,
) {
    let ps = layout.pixel_size();
    let mut start = 0;
    while start < width {
        let n = (width - start).min(MAX_LANES);
        let end = start + n;
        let rgb = inverse_entry(
            token,
            [
                &to_blocks(&gather_plane(&y[start..end], n)),
                &to_blocks(&gather_plane(&cb[start..end], n)),
                &to_blocks(&gather_plane(&cr[start..end], n)),
            ],
            n.div_ceil(8),
            S::CENTER,
        );
        let lanes = [
            from_blocks(&rgb[0]),
            from_blocks(&rgb[1]),
            from_blocks(&rgb[2]),
        ];
        scatter_rgb(&mut out[start * ps..], layout, &lanes, n);
        start = end;
    }
}

#[arcane]
fn forward_entry(
    token: X64V3Token,
    rgb: [&Blocks; 3],
    blocks: usize,
    center: i32,
) -> [Blocks; 3] {
    let [r, g, b] = rgb;
    let bias = _mm256_set1_epi32((center << SCALEBITS) + ONE_HALF - 1);
    let mut out = [[[0i32; 8]; BLOCKS]; 3];
    for i in 0..blocks {
        let rv = load_i32x8(token, &r[i]);
        let gv = load_i32x8(token, &g[i]);
        let bv = load_i32x8(token, &b[i]);

        let y = mul_const(token, rv, k::F_0_29900);
        let y = mac_const(token, y, gv, k::F_0_58700);
        let y = mac_const(token, y, bv, k::F_0_11400);
        store_i32x8(token, &mut out[0][i], descale(token, y, SCALEBITS));

        let cb = mul_const(token, rv, -k::F_0_16874);
        let cb = mac_const(token, cb, gv, -k::F_0_33126);
        let cb = mac_const(token, cb, bv, k::F_0_50000);
        store_i32x8(token, &mut out[1][i], sra(token, _mm256_add_epi32(cb, bias), SCALEBITS));

        let cr = mul_const(token, rv, k::F_0_50000);
        let cr = mac_const(token, cr, gv, -k::F_0_41869);
        let cr = mac_const(token, cr, bv, -k::F_0_08131);
        store_i32x8(token, &mut out[2][i], sra(token, _mm256_add_epi32(cr, bias), SCALEBITS));
    }
    out
}

#[arcane]
fn inverse_entry(
    token: X64V3Token,
    ycc: [&Blocks; 3],
    blocks: usize,
    center: i32,
) -> [Blocks; 3] {
    let [y, cb, cr] = ycc;
    let c = _mm256_set1_epi32(center);
    let mut out = [[[0i32; 8]; BLOCKS]; 3];
    for i in 0..blocks {
        let yv = load_i32x8(token, &y[i]);
        let x = _mm256_sub_epi32(load_i32x8(token, &cr[i]), c);
        let z = _mm256_sub_epi32(load_i32x8(token, &cb[i]), c);

        let red = descale(token, mul_const(token, x, k::F_0_40200), SCALEBITS);
        let red = _mm256_add_epi32(x, red);
        let green = mul_const(token, z, -k::F_0_34414);
        let green = descale(token, mac_const(token, green, x, -k::F_0_71414), SCALEBITS);
        let blue = descale(token, mul_const(token, z, k::F_0_77200), SCALEBITS);
        let blue = _mm256_add_epi32(z, blue);

        store_i32x8(token, &mut out[0][i], _mm256_add_epi32(yv, red));
        store_i32x8(token, &mut out[1][i], _mm256_add_epi32(yv, green));
        store_i32x8(token, &mut out[2][i], _mm256_add_epi32(yv, blue));
    }
    out
}
