//! Sample domains and explicit byte-order packing.
//!
//! Kernels are generic over [`Sample`]: `u8` carries 8-bit samples and `u16`
//! carries 12-bit samples in host order. Converting a 12-bit row to or from
//! bytes always names its byte order through [`Endian`].

use crate::error::KernelError;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// An unsigned sample type with its level-shift and pass-1 precision.
pub trait Sample:
    sealed::Sealed + Copy + Default + PartialEq + core::fmt::Debug + Send + Sync + 'static
{
    /// Significant bits per sample.
    const BITS: u32;
    /// Largest representable sample.
    const MAX: i32;
    /// Level-shift bias between the signed transform domain and storage.
    const CENTER: i32;
    /// Extra fractional bits kept between IDCT passes.
    ///
    /// Two bits for 8-bit samples, one for 12-bit so the wider inputs stay
    /// inside 32-bit intermediates.
    const PASS1_BITS: u32;

    /// Narrow an already clamped value.
    fn from_clamped(v: i32) -> Self;

    /// Widen to the lane type, saturating at [`Self::MAX`].
    ///
    /// A `u16` can hold values above 4095; they are read as 4095 so the
    /// color matrix never leaves 32-bit range.
    fn to_i32(self) -> i32;

    /// Clamp `v` to `0..=MAX` and narrow.
    #[inline(always)]
    fn clamp_from(v: i32) -> Self {
        Self::from_clamped(v.clamp(0, Self::MAX))
    }
}

impl Sample for u8 {
    const BITS: u32 = 8;
    const MAX: i32 = 255;
    const CENTER: i32 = 128;
    const PASS1_BITS: u32 = 2;

    #[inline(always)]
    fn from_clamped(v: i32) -> Self {
        v as u8
    }

    #[inline(always)]
    fn to_i32(self) -> i32 {
        i32::from(self)
    }
}

impl Sample for u16 {
    const BITS: u32 = 12;
    const MAX: i32 = 4095;
    const CENTER: i32 = 2048;
    const PASS1_BITS: u32 = 1;

    #[inline(always)]
    fn from_clamped(v: i32) -> Self {
        v as u16
    }

    #[inline(always)]
    fn to_i32(self) -> i32 {
        i32::from(self.min(4095))
    }
}

/// Byte order of a serialized 12-bit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl Endian {
    /// Byte order of the host.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Self = Self::Little;
    /// Byte order of the host.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Self = Self::Big;
}

/// Serialize 12-bit samples into `dst` two bytes per sample.
pub fn pack_samples(src: &[u16], dst: &mut [u8], endian: Endian) -> Result<(), KernelError> {
    let needed = src.len() * 2;
    if dst.len() < needed {
        return Err(KernelError::OutputTooSmall {
            needed,
            actual: dst.len(),
        });
    }
    for (&s, out) in src.iter().zip(dst.chunks_exact_mut(2)) {
        let bytes = match endian {
            Endian::Little => s.to_le_bytes(),
            Endian::Big => s.to_be_bytes(),
        };
        out.copy_from_slice(&bytes);
    }
    Ok(())
}

/// Parse two-byte samples from `src` into `dst`.
///
/// Values above the 12-bit range are clamped to 4095.
pub fn unpack_samples(src: &[u8], dst: &mut [u16], endian: Endian) -> Result<(), KernelError> {
    let needed = dst.len() * 2;
    if src.len() < needed {
        return Err(KernelError::InputTooSmall {
            needed,
            actual: src.len(),
        });
    }
    for (d, b) in dst.iter_mut().zip(src.chunks_exact(2)) {
        let pair = [b[0], b[1]];
        let v = match endian {
            Endian::Little => u16::from_le_bytes(pair),
            Endian::Big => u16::from_be_bytes(pair),
        };
        *d = v.min(<u16 as Sample>::MAX as u16);
    }
    Ok(())
}
