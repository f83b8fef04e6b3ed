//! Checked kernel entry points bound to a resolved backend.
//!
//! [`Kernels`] is produced by [`KernelConfig::build`](crate::KernelConfig::build).
//! It validates buffer geometry once per call and then runs the selected
//! implementation without further checks. The SIMD token is summoned when
//! the backend is resolved, not per call.

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
use archmage::{SimdToken, X64V3Token};

use crate::color::{
    self, check_input, check_output, chroma_width, interleaved_len, plane_len,
    scalar as color_scalar, PixelLayout,
};
use crate::common::sample::Sample;
use crate::common::vector::VectorCaps;
use crate::config::Backend;
use crate::error::KernelError;
use crate::idct::{
    self, check_region, scalar as idct_scalar, CoefBlock, IdctMethod, IfastTable, QuantTable,
};

/// Kernel table for one backend. Cheap to copy and safe to share.
#[derive(Clone, Copy)]
pub struct Kernels {
    backend: Backend,
    caps: VectorCaps,
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    avx2: Option<X64V3Token>,
}

impl core::fmt::Debug for Kernels {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Kernels")
            .field("backend", &self.backend)
            .field("vector_bytes", &self.caps.vector_bytes())
            .finish()
    }
}

impl Kernels {
    /// `backend` must already be resolved and available.
    pub(crate) fn new(backend: Backend, caps: VectorCaps) -> Self {
        Self {
            backend,
            caps,
            #[cfg(all(feature = "simd", target_arch = "x86_64"))]
            avx2: match backend {
                Backend::Avx2 => X64V3Token::summon(),
                _ => None,
            },
        }
    }

    /// The resolved backend.
    #[must_use]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Vector geometry used by the portable lane kernels.
    #[must_use]
    pub fn caps(&self) -> VectorCaps {
        self.caps
    }

    fn is_scalar(&self) -> bool {
        self.backend == Backend::Scalar
    }

    /// Accurate 8x8 IDCT into `out[offset + r * stride + c]`.
    pub fn idct_islow<S: Sample>(
        &self,
        coef: &CoefBlock,
        quant: &QuantTable,
        out: &mut [S],
        offset: usize,
        stride: usize,
    ) -> Result<(), KernelError> {
        check_region(out.len(), offset, stride, 8)?;
        if self.is_scalar() {
            idct_scalar::idct_islow_scalar(coef, quant, out, offset, stride);
            return Ok(());
        }
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        if let Some(token) = self.avx2 {
            idct::avx2::idct_islow(token, coef, quant, out, offset, stride);
            return Ok(());
        }
        idct::idct_islow(coef, quant, out, offset, stride);
        Ok(())
    }

    /// Fast 8x8 IDCT with AAN-scaled multipliers.
    pub fn idct_ifast<S: Sample>(
        &self,
        coef: &CoefBlock,
        table: &IfastTable<S>,
        out: &mut [S],
        offset: usize,
        stride: usize,
    ) -> Result<(), KernelError> {
        check_region(out.len(), offset, stride, 8)?;
        self.ifast_unchecked(coef, table.multipliers(), out, offset, stride);
        Ok(())
    }

    fn ifast_unchecked<S: Sample>(
        &self,
        coef: &CoefBlock,
        mult: &QuantTable,
        out: &mut [S],
        offset: usize,
        stride: usize,
    ) {
        if self.is_scalar() {
            idct_scalar::idct_ifast_scalar(coef, mult, out, offset, stride);
        } else {
            idct::idct_ifast(coef, mult, out, offset, stride);
        }
    }

    /// 4x4 reduced IDCT.
    pub fn idct_4x4<S: Sample>(
        &self,
        coef: &CoefBlock,
        quant: &QuantTable,
        out: &mut [S],
        offset: usize,
        stride: usize,
    ) -> Result<(), KernelError> {
        check_region(out.len(), offset, stride, 4)?;
        if self.is_scalar() {
            idct_scalar::idct_4x4_scalar(coef, quant, out, offset, stride);
        } else {
            idct::idct_4x4(coef, quant, out, offset, stride);
        }
        Ok(())
    }

    /// 2x2 reduced IDCT.
    pub fn idct_2x2<S: Sample>(
        &self,
        coef: &CoefBlock,
        quant: &QuantTable,
        out: &mut [S],
        offset: usize,
        stride: usize,
    ) -> Result<(), KernelError> {
        check_region(out.len(), offset, stride, 2)?;
        if self.is_scalar() {
            idct_scalar::idct_2x2_scalar(coef, quant, out, offset, stride);
        } else {
            idct::idct_2x2(coef, quant, out, offset, stride);
        }
        Ok(())
    }

    /// DC-only 1x1 IDCT into `out[offset]`.
    pub fn idct_1x1<S: Sample>(
        &self,
        coef: &CoefBlock,
        quant: &QuantTable,
        out: &mut [S],
        offset: usize,
    ) -> Result<(), KernelError> {
        check_region(out.len(), offset, 1, 1)?;
        idct::idct_1x1(coef, quant, out, offset);
        Ok(())
    }

    /// Run the IDCT named by `method`.
    ///
    /// For [`IdctMethod::Ifast`] `quant` must hold AAN-scaled multipliers,
    /// as produced by [`IfastTable::multipliers`].
    pub fn idct<S: Sample>(
        &self,
        method: IdctMethod,
        coef: &CoefBlock,
        quant: &QuantTable,
        out: &mut [S],
        offset: usize,
        stride: usize,
    ) -> Result<(), KernelError> {
        match method {
            IdctMethod::Islow => self.idct_islow(coef, quant, out, offset, stride),
            IdctMethod::Ifast => {
                check_region(out.len(), offset, stride, 8)?;
                self.ifast_unchecked(coef, quant, out, offset, stride);
                Ok(())
            }
            IdctMethod::Reduced4x4 => self.idct_4x4(coef, quant, out, offset, stride),
            IdctMethod::Reduced2x2 => self.idct_2x2(coef, quant, out, offset, stride),
            IdctMethod::Reduced1x1 => self.idct_1x1(coef, quant, out, offset),
        }
    }

    /// Convert `width` interleaved pixels to planar Y, Cb and Cr.
    pub fn rgb_to_ycc_row<S: Sample>(
        &self,
        rgb: &[S],
        layout: PixelLayout,
        y: &mut [S],
        cb: &mut [S],
        cr: &mut [S],
        width: usize,
    ) -> Result<(), KernelError> {
        check_input(rgb.len(), interleaved_len(width, layout)?)?;
        for plane in [&*y, &*cb, &*cr] {
            check_output(plane.len(), width)?;
        }
        self.forward_row(rgb, layout, y, cb, cr, width);
        Ok(())
    }

    /// Forward conversion of `num_rows` rows.
    ///
    /// Source rows are `src_stride` samples apart, output plane rows
    /// `plane_stride` samples apart.
    #[allow(clippy::too_many_arguments)]
    pub fn rgb_to_ycc_rows<S: Sample>(
        &self,
        src: &[S],
        src_stride: usize,
        layout: PixelLayout,
        planes: [&mut [S]; 3],
        plane_stride: usize,
        width: usize,
        num_rows: usize,
    ) -> Result<(), KernelError> {
        let row_len = interleaved_len(width, layout)?;
        check_input(src.len(), plane_len(num_rows, src_stride, row_len)?)?;
        let needed = plane_len(num_rows, plane_stride, width)?;
        for plane in &planes {
            check_output(plane.len(), needed)?;
        }
        let [y, cb, cr] = planes;
        for row in 0..num_rows {
            let p = row * plane_stride;
            self.forward_row(
                &src[row * src_stride..],
                layout,
                &mut y[p..],
                &mut cb[p..],
                &mut cr[p..],
                width,
            );
        }
        Ok(())
    }

    /// Convert planar Y, Cb and Cr of `width` samples to interleaved pixels.
    pub fn ycc_to_rgb_row<S: Sample>(
        &self,
        y: &[S],
        cb: &[S],
        cr: &[S],
        out: &mut [S],
        layout: PixelLayout,
        width: usize,
    ) -> Result<(), KernelError> {
        for plane in [y, cb, cr] {
            check_input(plane.len(), width)?;
        }
        check_output(out.len(), interleaved_len(width, layout)?)?;
        self.inverse_row(y, cb, cr, out, layout, width);
        Ok(())
    }

    /// Inverse conversion of `num_rows` rows. Strides as in
    /// [`Kernels::rgb_to_ycc_rows`].
    #[allow(clippy::too_many_arguments)]
    pub fn ycc_to_rgb_rows<S: Sample>(
        &self,
        planes: [&[S]; 3],
        plane_stride: usize,
        out: &mut [S],
        out_stride: usize,
        layout: PixelLayout,
        width: usize,
        num_rows: usize,
    ) -> Result<(), KernelError> {
        let needed = plane_len(num_rows, plane_stride, width)?;
        for plane in planes {
            check_input(plane.len(), needed)?;
        }
        let row_len = interleaved_len(width, layout)?;
        check_output(out.len(), plane_len(num_rows, out_stride, row_len)?)?;
        let [y, cb, cr] = planes;
        for row in 0..num_rows {
            let p = row * plane_stride;
            self.inverse_row(
                &y[p..],
                &cb[p..],
                &cr[p..],
                &mut out[row * out_stride..],
                layout,
                width,
            );
        }
        Ok(())
    }

    /// Horizontal 2:1 chroma upsample fused with conversion.
    pub fn h2v1_merged_row<S: Sample>(
        &self,
        y: &[S],
        cb: &[S],
        cr: &[S],
        out: &mut [S],
        width: usize,
        layout: PixelLayout,
    ) -> Result<(), KernelError> {
        check_merged_inputs(y, cb, cr, width)?;
        check_output(out.len(), interleaved_len(width, layout)?)?;
        if self.is_scalar() {
            color_scalar::h2v1_merged_row_scalar(y, cb, cr, out, width, layout);
        } else {
            color::h2v1_merged_row(self.caps, y, cb, cr, out, width, layout);
        }
        Ok(())
    }

    /// 2:1 chroma upsample in both directions fused with conversion of two
    /// luma rows.
    pub fn h2v2_merged_rows<S: Sample>(
        &self,
        y: [&[S]; 2],
        cb: &[S],
        cr: &[S],
        out: [&mut [S]; 2],
        width: usize,
        layout: PixelLayout,
    ) -> Result<(), KernelError> {
        for row in y {
            check_merged_inputs(row, cb, cr, width)?;
        }
        let needed = interleaved_len(width, layout)?;
        for row in &out {
            check_output(row.len(), needed)?;
        }
        if self.is_scalar() {
            let [y0, y1] = y;
            let [out0, out1] = out;
            color_scalar::h2v1_merged_row_scalar(y0, cb, cr, out0, width, layout);
            color_scalar::h2v1_merged_row_scalar(y1, cb, cr, out1, width, layout);
        } else {
            color::h2v2_merged_rows(self.caps, y, cb, cr, out, width, layout);
        }
        Ok(())
    }

    fn forward_row<S: Sample>(
        &self,
        rgb: &[S],
        layout: PixelLayout,
        y: &mut [S],
        cb: &mut [S],
        cr: &mut [S],
        width: usize,
    ) {
        if self.is_scalar() {
            color_scalar::rgb_to_ycc_row_scalar(rgb, layout, y, cb, cr, width);
            return;
        }
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        if let Some(token) = self.avx2 {
            color::avx2::rgb_to_ycc_row(token, rgb, layout, y, cb, cr, width);
            return;
        }
        color::rgb_to_ycc_row(self.caps, rgb, layout, y, cb, cr, width);
    }

    fn inverse_row<S: Sample>(
        &self,
        y: &[S],
        cb: &[S],
        cr: &[S],
        out: &mut [S],
        layout: PixelLayout,
        width: usize,
    ) {
        if self.is_scalar() {
            color_scalar::ycc_to_rgb_row_scalar(y, cb, cr, out, layout, width);
            return;
        }
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        if let Some(token) = self.avx2 {
            color::avx2::ycc_to_rgb_row(token, y, cb, cr, out, layout, width);
            return;
        }
        color::ycc_to_rgb_row(self.caps, y, cb, cr, out, layout, width);
    }
}

fn check_merged_inputs<S: Sample>(
    y: &[S],
    cb: &[S],
    cr: &[S],
    width: usize,
) -> Result<(), KernelError> {
    check_input(y.len(), width)?;
    let cw = chroma_width(width);
    check_input(cb.len(), cw)?;
    check_input(cr.len(), cw)
}
