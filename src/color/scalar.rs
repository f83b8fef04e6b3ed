//! Per-pixel reference color conversion.
//!
//! Straight evaluation of the fixed-point matrix, one pixel at a time. The
//! lane and AVX2 kernels are tested against these functions.

use super::PixelLayout;
use crate::common::consts::{color as k, ONE_HALF, SCALEBITS};
use crate::common::sample::Sample;

/// Forward conversion of one pixel.
#[inline]
#[must_use]
pub fn rgb_to_ycc_pixel<S: Sample>(r: i32, g: i32, b: i32) -> [i32; 3] {
    let bias = (S::CENTER << SCALEBITS) + ONE_HALF - 1;
    let y = (k::F_0_29900 * r + k::F_0_58700 * g + k::F_0_11400 * b + ONE_HALF) >> SCALEBITS;
    let cb = (-k::F_0_16874 * r - k::F_0_33126 * g + k::F_0_50000 * b + bias) >> SCALEBITS;
    let cr = (k::F_0_50000 * r - k::F_0_41869 * g - k::F_0_08131 * b + bias) >> SCALEBITS;
    [y, cb, cr]
}

/// Red, green and blue offsets contributed by one chroma pair.
#[inline]
#[must_use]
pub fn chroma_offsets<S: Sample>(cb: i32, cr: i32) -> [i32; 3] {
    let x = cr - S::CENTER;
    let z = cb - S::CENTER;
    [
        (k::F_1_40200 * x + ONE_HALF) >> SCALEBITS,
        (-k::F_0_34414 * z - k::F_0_71414 * x + ONE_HALF) >> SCALEBITS,
        (k::F_1_77200 * z + ONE_HALF) >> SCALEBITS,
    ]
}

/// Inverse conversion of one pixel, clamped to the sample range.
#[inline]
#[must_use]
pub fn ycc_to_rgb_pixel<S: Sample>(y: i32, cb: i32, cr: i32) -> [S; 3] {
    chroma_offsets::<S>(cb, cr).map(|off| S::clamp_from(y + off))
}

#[inline]
fn put_pixel<S: Sample>(out: &mut [S], layout: PixelLayout, rgb: [S; 3]) {
    for (&o, v) in layout.rgb_offsets().iter().zip(rgb) {
        out[o] = v;
    }
    if let Some(f) = layout.filler_offset() {
        out[f] = S::from_clamped(S::MAX);
    }
}

/// Reference forward conversion of `width` interleaved pixels.
pub fn rgb_to_ycc_row_scalar<S: Sample>(
    rgb: &[S],
    layout: PixelLayout,
    y: &mut [S],
    cb: &mut [S],
    cr: &mut [S],
    width: usize,
) {
    let ps = layout.pixel_size();
    let [ro, go, bo] = layout.rgb_offsets();
    for i in 0..width {
        let px = &rgb[i * ps..][..ps];
        let [yv, cbv, crv] =
            rgb_to_ycc_pixel::<S>(px[ro].to_i32(), px[go].to_i32(), px[bo].to_i32());
        y[i] = S::from_clamped(yv);
        cb[i] = S::from_clamped(cbv);
        cr[i] = S::from_clamped(crv);
    }
}

/// Reference inverse conversion of `width` pixels.
pub fn ycc_to_rgb_row_scalar<S: Sample>(
    y: &[S],
    cb: &[S],
    cr: &[S],
    out: &mut [S],
    layout: PixelLayout,
    width: usize,
) {
    let ps = layout.pixel_size();
    for i in 0..width {
        let rgb = ycc_to_rgb_pixel::<S>(y[i].to_i32(), cb[i].to_i32(), cr[i].to_i32());
        put_pixel(&mut out[i * ps..][..ps], layout, rgb);
    }
}

/// Reference 2:1 horizontal upsample and conversion. Pixel `i` uses chroma `i / 2`.
pub fn h2v1_merged_row_scalar<S: Sample>(
    y: &[S],
    cb: &[S],
    cr: &[S],
    out: &mut [S],
    width: usize,
    layout: PixelLayout,
) {
    let ps = layout.pixel_size();
    for i in 0..width {
        let c = i / 2;
        let rgb = ycc_to_rgb_pixel::<S>(y[i].to_i32(), cb[c].to_i32(), cr[c].to_i32());
        put_pixel(&mut out[i * ps..][..ps], layout, rgb);
    }
}
