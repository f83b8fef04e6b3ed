//! Row color conversion over lane strips.
//!
//! Each strip gathers up to one register group of pixels into 32-bit lane
//! arrays, runs the matrix lane-wise and scatters the result. The inverse
//! path folds the integer part of 1.402 and 1.772 into a plain add so the
//! remaining multipliers stay below 2^16.

#[cfg(feature = "multiverse")]
use multiversed::multiversed;

use super::PixelLayout;
use crate::common::consts::{color as k, ONE_HALF, SCALEBITS};
use crate::common::sample::Sample;
use crate::common::vector::{ElementWidth, RegisterGroup, VectorCaps, MAX_LANES};

pub(crate) const WIDTH: ElementWidth = ElementWidth::E16;
pub(crate) const GROUP: RegisterGroup = RegisterGroup::M4;

pub(crate) type Lane = [i32; MAX_LANES];

#[inline(always)]
pub(crate) fn gather_plane<S: Sample>(src: &[S], n: usize) -> Lane {
    let mut lane = [0; MAX_LANES];
    for (l, s) in lane.iter_mut().zip(&src[..n]) {
        *l = s.to_i32();
    }
    lane
}

/// Deinterleave `n` pixels starting at `src[0]`.
#[inline(always)]
pub(crate) fn gather_rgb<S: Sample>(src: &[S], layout: PixelLayout, n: usize) -> [Lane; 3] {
    let ps = layout.pixel_size();
    let mut out = [[0; MAX_LANES]; 3];
    for (lane, &o) in out.iter_mut().zip(layout.rgb_offsets().iter()) {
        for (i, l) in lane[..n].iter_mut().enumerate() {
            *l = src[i * ps + o].to_i32();
        }
    }
    out
}

#[inline(always)]
pub(crate) fn store_plane<S: Sample>(dst: &mut [S], lane: &Lane) {
    for (d, &v) in dst.iter_mut().zip(lane.iter()) {
        *d = S::from_clamped(v);
    }
}

/// Clamp and interleave `n` pixels into `dst`, filling any alpha or pad slot.
#[inline(always)]
pub(crate) fn scatter_rgb<S: Sample>(
    dst: &mut [S],
    layout: PixelLayout,
    rgb: &[Lane; 3],
    n: usize,
) {
    let ps = layout.pixel_size();
    let filler = layout.filler_offset();
    for (i, px) in dst[..n * ps].chunks_exact_mut(ps).enumerate() {
        for (lane, &o) in rgb.iter().zip(layout.rgb_offsets().iter()) {
            px[o] = S::clamp_from(lane[i]);
        }
        if let Some(f) = filler {
            px[f] = S::from_clamped(S::MAX);
        }
    }
}

/// Red, green and blue offsets for `n` chroma pairs around `center`.
#[cfg_attr(feature = "multiverse", multiversed)]
pub(crate) fn chroma_terms(cb: &Lane, cr: &Lane, n: usize, center: i32) -> [Lane; 3] {
    let mut red = [0; MAX_LANES];
    let mut green = [0; MAX_LANES];
    let mut blue = [0; MAX_LANES];
    for i in 0..n {
        let x = cr[i] - center;
        let z = cb[i] - center;
        red[i] = x + k::CR_TO_RED.scale(x);
        green[i] = (-k::F_0_34414 * z - k::F_0_71414 * x + ONE_HALF) >> SCALEBITS;
        blue[i] = z + k::CB_TO_BLUE.scale(z);
    }
    [red, green, blue]
}

#[cfg_attr(feature = "multiverse", multiversed)]
fn forward_lanes(rgb: &[Lane; 3], n: usize, center: i32) -> [Lane; 3] {
    let [r, g, b] = rgb;
    let bias = (center << SCALEBITS) + ONE_HALF - 1;
    let mut y = [0; MAX_LANES];
    let mut cb = [0; MAX_LANES];
    let mut cr = [0; MAX_LANES];
    for i in 0..n {
        y[i] = (k::F_0_29900 * r[i] + k::F_0_58700 * g[i] + k::F_0_11400 * b[i] + ONE_HALF)
            >> SCALEBITS;
        cb[i] = (-k::F_0_16874 * r[i] - k::F_0_33126 * g[i] + k::F_0_50000 * b[i] + bias)
            >> SCALEBITS;
        cr[i] = (k::F_0_50000 * r[i] - k::F_0_41869 * g[i] - k::F_0_08131 * b[i] + bias)
            >> SCALEBITS;
    }
    [y, cb, cr]
}

/// Convert `width` interleaved pixels to three planar rows.
pub fn rgb_to_ycc_row<S: Sample>(
    caps: VectorCaps,
    rgb: &[S],
    layout: PixelLayout,
    y: &mut [S],
    cb: &mut [S],
    cr: &mut [S],
    width: usize,
) {
    let ps = layout.pixel_size();
    for strip in caps.strips(WIDTH, GROUP, width) {
        let n = strip.len();
        let lanes = gather_rgb(&rgb[strip.start * ps..], layout, n);
        let [yl, cbl, crl] = forward_lanes(&lanes, n, S::CENTER);
        store_plane(&mut y[strip.clone()], &yl);
        store_plane(&mut cb[strip.clone()], &cbl);
        store_plane(&mut cr[strip], &crl);
    }
}

/// Convert three planar rows of `width` samples to interleaved pixels.
pub fn ycc_to_rgb_row<S: Sample>(
    caps: VectorCaps,
    y: &[S],
    cb: &[S],
    cr: &[S],
    out: &mut [S],
    layout: PixelLayout,
    width: usize,
) {
    let ps = layout.pixel_size();
    for strip in caps.strips(WIDTH, GROUP, width) {
        let n = strip.len();
        let yl = gather_plane(&y[strip.clone()], n);
        let [red, green, blue] = chroma_terms(
            &gather_plane(&cb[strip.clone()], n),
            &gather_plane(&cr[strip.clone()], n),
            n,
            S::CENTER,
        );
        let mut rgb = [red, green, blue];
        for lane in rgb.iter_mut() {
            for (v, &luma) in lane[..n].iter_mut().zip(yl.iter()) {
                *v += luma;
            }
        }
        scatter_rgb(&mut out[strip.start * ps..], layout, &rgb, n);
    }
}

/// Forward conversion of `num_rows` rows.
///
/// Row `r` of the source starts at `r * src_stride`; row `r` of each output
/// plane starts at `r * plane_stride`. Strides count samples.
#[allow(clippy::too_many_arguments)]
pub fn rgb_to_ycc_rows<S: Sample>(
    caps: VectorCaps,
    src: &[S],
    src_stride: usize,
    layout: PixelLayout,
    planes: [&mut [S]; 3],
    plane_stride: usize,
    width: usize,
    num_rows: usize,
) {
    let [y, cb, cr] = planes;
    for row in 0..num_rows {
        let p = row * plane_stride;
        rgb_to_ycc_row(
            caps,
            &src[row * src_stride..],
            layout,
            &mut y[p..],
            &mut cb[p..],
            &mut cr[p..],
            width,
        );
    }
}

/// Inverse conversion of `num_rows` rows. Strides as in [`rgb_to_ycc_rows`].
#[allow(clippy::too_many_arguments)]
pub fn ycc_to_rgb_rows<S: Sample>(
    caps: VectorCaps,
    planes: [&[S]; 3],
    plane_stride: usize,
    out: &mut [S],
    out_stride: usize,
    layout: PixelLayout,
    width: usize,
    num_rows: usize,
) {
    let [y, cb, cr] = planes;
    for row in 0..num_rows {
        let p = row * plane_stride;
        ycc_to_rgb_row(
            caps,
            &y[p..],
            &cb[p..],
            &cr[p..],
            &mut out[row * out_stride..],
            layout,
            width,
        );
    }
}
