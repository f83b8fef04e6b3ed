//! Fused 2:1 chroma upsampling and YCbCr to RGB conversion.
//!
//! Chroma terms are computed once per chroma sample and applied to the two
//! horizontally adjacent luma samples (and to both luma rows for h2v2), so
//! the upsampled chroma planes are never materialized. Pixel `i` always uses
//! chroma sample `i / 2`; with an odd width the last chroma sample covers a
//! single pixel.

use super::convert::{chroma_terms, gather_plane, Lane, GROUP, WIDTH};
use super::{chroma_width, PixelLayout};
use crate::common::sample::Sample;
use crate::common::vector::VectorCaps;

/// Upsample one chroma row 2:1 horizontally and convert one luma row.
///
/// `cb` and `cr` hold `width.div_ceil(2)` samples.
pub fn h2v1_merged_row<S: Sample>(
    caps: VectorCaps,
    y: &[S],
    cb: &[S],
    cr: &[S],
    out: &mut [S],
    width: usize,
    layout: PixelLayout,
) {
    merged(caps, [y], cb, cr, [out], width, layout);
}

/// Upsample one chroma row 2:1 in both directions and convert two luma rows.
pub fn h2v2_merged_rows<S: Sample>(
    caps: VectorCaps,
    y: [&[S]; 2],
    cb: &[S],
    cr: &[S],
    out: [&mut [S]; 2],
    width: usize,
    layout: PixelLayout,
) {
    merged(caps, y, cb, cr, out, width, layout);
}

fn merged<S: Sample, const R: usize>(
    caps: VectorCaps,
    y: [&[S]; R],
    cb: &[S],
    cr: &[S],
    mut out: [&mut [S]; R],
    width: usize,
    layout: PixelLayout,
) {
    let ps = layout.pixel_size();
    for strip in caps.strips(WIDTH, GROUP, chroma_width(width)) {
        let n = strip.len();
        let terms = chroma_terms(
            &gather_plane(&cb[strip.clone()], n),
            &gather_plane(&cr[strip.clone()], n),
            n,
            S::CENTER,
        );
        let first = strip.start * 2;
        let count = (strip.end * 2).min(width) - first;
        for (luma, dst) in y.iter().zip(out.iter_mut()) {
            emit(&luma[first..first + count], &terms, &mut dst[first * ps..], layout);
        }
    }
}

/// Write `luma.len()` pixels, pixel `i` taking chroma term `i / 2`.
#[inline(always)]
fn emit<S: Sample>(luma: &[S], terms: &[Lane; 3], dst: &mut [S], layout: PixelLayout) {
    let ps = layout.pixel_size();
    let offsets = layout.rgb_offsets();
    let filler = layout.filler_offset();
    for (i, (px, &yv)) in dst.chunks_exact_mut(ps).zip(luma).enumerate() {
        let yv = yv.to_i32();
        for (term, &o) in terms.iter().zip(offsets.iter()) {
            px[o] = S::clamp_from(yv + term[i / 2]);
        }
        if let Some(f) = filler {
            px[f] = S::from_clamped(S::MAX);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::convert::ycc_to_rgb_row;
    use crate::color::scalar::h2v1_merged_row_scalar;
    use alloc::vec;
    use alloc::vec::Vec;

    fn replicate<S: Sample>(c: &[S], width: usize) -> Vec<S> {
        (0..width).map(|i| c[i / 2]).collect()
    }

    #[test]
    fn h2v1_equals_conversion_of_replicated_chroma() {
        for bytes in [16, 32] {
            let caps = VectorCaps::with_vector_bytes(bytes);
            for width in [1usize, 2, 3, 63, 64, 65, 130, 131] {
                let cw = chroma_width(width);
                let y: Vec<u8> = (0..width).map(|i| (i * 31 % 256) as u8).collect();
                let cb: Vec<u8> = (0..cw).map(|i| (i * 97 % 256) as u8).collect();
                let cr: Vec<u8> = (0..cw).map(|i| (255 - i * 13 % 256) as u8).collect();
                let layout = PixelLayout::Bgrx;
                let mut a = vec![0u8; width * 4];
                let mut b = vec![0u8; width * 4];
                h2v1_merged_row(caps, &y, &cb, &cr, &mut a, width, layout);
                ycc_to_rgb_row(
                    caps,
                    &y,
                    &replicate(&cb, width),
                    &replicate(&cr, width),
                    &mut b,
                    layout,
                    width,
                );
                assert_eq!(a, b, "width {width} bytes {bytes}");
            }
        }
    }

    #[test]
    fn h2v1_matches_scalar_reference_at_12_bit() {
        let caps = VectorCaps::with_vector_bytes(16);
        let width = 45;
        let y: Vec<u16> = (0..width).map(|i| (i * 91 % 4096) as u16).collect();
        let cb: Vec<u16> = (0..23).map(|i| (i * 377 % 4096) as u16).collect();
        let cr: Vec<u16> = (0..23).map(|i| (4095 - i * 171) as u16).collect();
        let mut a = vec![0u16; width * 3];
        let mut b = vec![0u16; width * 3];
        h2v1_merged_row(caps, &y, &cb, &cr, &mut a, width, PixelLayout::Rgb);
        h2v1_merged_row_scalar(&y, &cb, &cr, &mut b, width, PixelLayout::Rgb);
        assert_eq!(a, b);
    }

    #[test]
    fn h2v2_shares_chroma_between_rows() {
        let caps = VectorCaps::with_vector_bytes(16);
        let width = 7;
        let y0: Vec<u8> = (0..width as u8).map(|i| i * 20).collect();
        let y1: Vec<u8> = (0..width as u8).map(|i| 250 - i * 30).collect();
        let cb = [90u8, 140, 200, 30];
        let cr = [160u8, 100, 20, 240];
        let mut top = vec![0u8; width * 4 + 4];
        let mut bottom = vec![0u8; width * 4 + 4];
        h2v2_merged_rows(
            caps,
            [y0.as_slice(), y1.as_slice()],
            &cb,
            &cr,
            [top.as_mut_slice(), bottom.as_mut_slice()],
            width,
            PixelLayout::Abgr,
        );
        for (row, luma) in [(&top, &y0), (&bottom, &y1)] {
            let mut expect = vec![0u8; width * 4 + 4];
            h2v1_merged_row_scalar(luma, &cb, &cr, &mut expect, width, PixelLayout::Abgr);
            assert_eq!(row, &expect);
            assert_eq!(&row[width * 4..], &[0u8; 4]);
        }
    }
}
