//! Color conversion and merged upsampling across backends.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use zenjdsp::color::scalar::{
    h2v1_merged_row_scalar, rgb_to_ycc_row_scalar, ycc_to_rgb_row_scalar,
};
use zenjdsp::color::chroma_width;
use zenjdsp::{Backend, KernelConfig, Kernels, PixelLayout, Sample};

fn backends() -> Vec<Kernels> {
    [Backend::Scalar, Backend::Portable, Backend::Avx2]
        .into_iter()
        .filter(|b| b.is_available())
        .flat_map(|b| {
            [16usize, 64].into_iter().map(move |bytes| {
                KernelConfig::new()
                    .backend(b)
                    .max_vector_bytes(Some(bytes))
                    .build()
                    .unwrap()
            })
        })
        .collect()
}

fn random_row<S: Sample>(rng: &mut StdRng, len: usize) -> Vec<S> {
    (0..len).map(|_| S::from_clamped(rng.gen_range(0..=S::MAX))).collect()
}

/// Guard samples appended past every declared output.
const GUARD: usize = 5;

fn guard<S: Sample>() -> S {
    S::from_clamped(S::MAX / 3)
}

fn forward_parity<S: Sample>(
    kernels: &[Kernels],
    rng: &mut StdRng,
    width: usize,
    layout: PixelLayout,
) {
    let rgb = random_row::<S>(rng, width * layout.pixel_size());
    let fresh = || vec![guard::<S>(); width + GUARD];
    let (mut ey, mut ecb, mut ecr) = (fresh(), fresh(), fresh());
    rgb_to_ycc_row_scalar(&rgb, layout, &mut ey, &mut ecb, &mut ecr, width);
    for k in kernels {
        let (mut y, mut cb, mut cr) = (fresh(), fresh(), fresh());
        k.rgb_to_ycc_row(&rgb, layout, &mut y, &mut cb, &mut cr, width)
            .unwrap();
        assert_eq!((&y, &cb, &cr), (&ey, &ecb, &ecr), "{k:?} {layout:?} width {width}");
    }
}

fn inverse_parity<S: Sample>(
    kernels: &[Kernels],
    rng: &mut StdRng,
    width: usize,
    layout: PixelLayout,
) {
    let y = random_row::<S>(rng, width);
    let cb = random_row::<S>(rng, width);
    let cr = random_row::<S>(rng, width);
    let len = width * layout.pixel_size() + GUARD;
    let mut expect = vec![guard::<S>(); len];
    ycc_to_rgb_row_scalar(&y, &cb, &cr, &mut expect, layout, width);
    for k in kernels {
        let mut out = vec![guard::<S>(); len];
        k.ycc_to_rgb_row(&y, &cb, &cr, &mut out, layout, width).unwrap();
        assert_eq!(out, expect, "{k:?} {layout:?} width {width}");
    }
}

#[test]
fn forward_and_inverse_match_reference() {
    let kernels = backends();
    let mut rng = StdRng::seed_from_u64(0xC010);
    for width in [0usize, 1, 2, 7, 8, 9, 31, 32, 33, 64, 65, 129, 300] {
        for layout in PixelLayout::ALL {
            forward_parity::<u8>(&kernels, &mut rng, width, layout);
            forward_parity::<u16>(&kernels, &mut rng, width, layout);
            inverse_parity::<u8>(&kernels, &mut rng, width, layout);
            inverse_parity::<u16>(&kernels, &mut rng, width, layout);
        }
    }
}

#[test]
fn pure_red_round_trip() {
    for k in backends() {
        let (mut y, mut cb, mut cr) = ([0u8], [0u8], [0u8]);
        k.rgb_to_ycc_row(&[255, 0, 0], PixelLayout::Rgb, &mut y, &mut cb, &mut cr, 1)
            .unwrap();
        assert_eq!((y[0], cb[0], cr[0]), (76, 85, 255));
        let mut rgb = [0u8; 3];
        k.ycc_to_rgb_row(&y, &cb, &cr, &mut rgb, PixelLayout::Rgb, 1).unwrap();
        assert_eq!(rgb, [254, 0, 0]);
    }
}

#[test]
fn round_trip_error_is_at_most_one() {
    let mut rng = StdRng::seed_from_u64(42);
    for k in backends() {
        let width = 257;
        let rgb: Vec<u8> = random_row(&mut rng, width * 3);
        let (mut y, mut cb, mut cr) = (vec![0u8; width], vec![0u8; width], vec![0u8; width]);
        k.rgb_to_ycc_row(&rgb, PixelLayout::Rgb, &mut y, &mut cb, &mut cr, width)
            .unwrap();
        let mut back = vec![0u8; width * 3];
        k.ycc_to_rgb_row(&y, &cb, &cr, &mut back, PixelLayout::Rgb, width)
            .unwrap();
        for (a, b) in rgb.iter().zip(&back) {
            assert!((i32::from(*a) - i32::from(*b)).abs() <= 1, "{a} vs {b}");
        }
    }
}

#[test]
fn multi_row_calls_honor_strides() {
    let mut rng = StdRng::seed_from_u64(3);
    let (width, rows) = (13, 4);
    let layout = PixelLayout::Bgra;
    let (src_stride, plane_stride, out_stride) = (width * 4 + 3, width + 2, width * 4 + 1);
    let src: Vec<u16> = random_row(&mut rng, src_stride * rows);
    for k in backends() {
        let fresh = || vec![0u16; plane_stride * rows];
        let (mut y, mut cb, mut cr) = (fresh(), fresh(), fresh());
        let planes = [y.as_mut_slice(), cb.as_mut_slice(), cr.as_mut_slice()];
        k.rgb_to_ycc_rows(&src, src_stride, layout, planes, plane_stride, width, rows)
            .unwrap();

        let mut out = vec![0u16; out_stride * rows];
        let planes = [y.as_slice(), cb.as_slice(), cr.as_slice()];
        k.ycc_to_rgb_rows(planes, plane_stride, &mut out, out_stride, layout, width, rows)
            .unwrap();

        for r in 0..rows {
            let mut ey = vec![0u16; width];
            let mut ecb = vec![0u16; width];
            let mut ecr = vec![0u16; width];
            rgb_to_ycc_row_scalar(
                &src[r * src_stride..],
                layout,
                &mut ey,
                &mut ecb,
                &mut ecr,
                width,
            );
            assert_eq!(&y[r * plane_stride..][..width], &ey[..]);
            assert_eq!(&y[r * plane_stride + width..][..2], &[0u16; 2]);

            let mut expect = vec![0u16; width * 4];
            ycc_to_rgb_row_scalar(&ey, &ecb, &ecr, &mut expect, layout, width);
            assert_eq!(&out[r * out_stride..][..width * 4], &expect[..]);
            assert_eq!(out[r * out_stride + width * 4], 0);
        }
    }
}

#[test]
fn merged_equals_conversion_of_replicated_chroma() {
    let mut rng = StdRng::seed_from_u64(11);
    let kernels = backends();
    for width in [1usize, 2, 3, 5, 16, 17, 63, 127, 128, 129, 255] {
        for layout in [PixelLayout::Rgb, PixelLayout::Rgbx, PixelLayout::Argb] {
            let cw = chroma_width(width);
            let y0: Vec<u8> = random_row(&mut rng, width);
            let y1: Vec<u8> = random_row(&mut rng, width);
            let cb: Vec<u8> = random_row(&mut rng, cw);
            let cr: Vec<u8> = random_row(&mut rng, cw);
            let up = |c: &[u8]| -> Vec<u8> { (0..width).map(|i| c[i / 2]).collect() };
            let len = width * layout.pixel_size() + GUARD;

            let mut expect0 = vec![guard::<u8>(); len];
            let mut expect1 = vec![guard::<u8>(); len];
            ycc_to_rgb_row_scalar(&y0, &up(&cb), &up(&cr), &mut expect0, layout, width);
            ycc_to_rgb_row_scalar(&y1, &up(&cb), &up(&cr), &mut expect1, layout, width);

            let mut reference = vec![guard::<u8>(); len];
            h2v1_merged_row_scalar(&y0, &cb, &cr, &mut reference, width, layout);
            assert_eq!(reference, expect0);

            for k in &kernels {
                let mut out = vec![guard::<u8>(); len];
                k.h2v1_merged_row(&y0, &cb, &cr, &mut out, width, layout).unwrap();
                assert_eq!(out, expect0, "h2v1 {k:?} width {width} {layout:?}");

                let mut top = vec![guard::<u8>(); len];
                let mut bottom = vec![guard::<u8>(); len];
                k.h2v2_merged_rows(
                    [y0.as_slice(), y1.as_slice()],
                    &cb,
                    &cr,
                    [top.as_mut_slice(), bottom.as_mut_slice()],
                    width,
                    layout,
                )
                .unwrap();
                assert_eq!(top, expect0, "h2v2 top {k:?} width {width}");
                assert_eq!(bottom, expect1, "h2v2 bottom {k:?} width {width}");
            }
        }
    }
}

#[test]
fn merged_12_bit_fills_alpha_with_4095() {
    for k in backends() {
        let mut out = [0u16; 12];
        let y = [1000u16, 2000, 3000];
        k.h2v1_merged_row(&y, &[2048, 2048], &[2048, 2048], &mut out, 3, PixelLayout::Rgba)
            .unwrap();
        assert_eq!(out, [1000, 1000, 1000, 4095, 2000, 2000, 2000, 4095, 3000, 3000, 3000, 4095]);
    }
}

#[test]
fn samples_above_twelve_bits_convert_as_4095() {
    let wide = [u16::MAX, 40000, 4096, 1000, 65535, 5000];
    let capped = wide.map(|v| v.min(4095));
    for k in backends() {
        let mut a = ([0u16; 2], [0u16; 2], [0u16; 2]);
        let mut b = ([0u16; 2], [0u16; 2], [0u16; 2]);
        k.rgb_to_ycc_row(&wide, PixelLayout::Rgb, &mut a.0, &mut a.1, &mut a.2, 2)
            .unwrap();
        k.rgb_to_ycc_row(&capped, PixelLayout::Rgb, &mut b.0, &mut b.1, &mut b.2, 2)
            .unwrap();
        assert_eq!(a, b, "{k:?}");

        let mut out_a = [0u16; 6];
        let mut out_b = [0u16; 6];
        let layout = PixelLayout::Rgb;
        k.ycc_to_rgb_row(&wide[..2], &wide[2..4], &wide[4..], &mut out_a, layout, 2)
            .unwrap();
        k.ycc_to_rgb_row(&capped[..2], &capped[2..4], &capped[4..], &mut out_b, layout, 2)
            .unwrap();
        assert_eq!(out_a, out_b, "{k:?}");
        assert!(out_a.iter().all(|&v| v <= 4095));

        let mut merged = [0u16; 6];
        k.h2v1_merged_row(&wide[..2], &wide[2..3], &wide[4..5], &mut merged, 2, layout)
            .unwrap();
        assert!(merged.iter().all(|&v| v <= 4095));
    }
}
