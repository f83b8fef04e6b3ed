//! Runtime vector-width selection.
//!
//! Kernels never hard-code a lane count. They ask [`VectorCaps`] how many
//! elements of the active width fit in one register group, then walk their
//! input in [`Strips`] of at most that many elements. The final strip is
//! whatever remains, so a row of any length is covered exactly once.

use core::ops::Range;

/// Smallest register size a kernel is tuned for, in bytes.
pub const MIN_VECTOR_BYTES: usize = 16;

/// Largest register size a kernel is tuned for, in bytes.
///
/// Lane scratch arrays are sized from this, so raising it grows stack usage.
pub const MAX_VECTOR_BYTES: usize = 64;

/// Upper bound on lanes a single strip can carry (E8 at the widest register, group 1).
pub const MAX_LANES: usize = MAX_VECTOR_BYTES;

/// Width of one lane element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementWidth {
    /// 8-bit lanes.
    E8,
    /// 16-bit lanes.
    E16,
    /// 32-bit lanes.
    E32,
}

impl ElementWidth {
    /// Size of one element in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::E8 => 1,
            Self::E16 => 2,
            Self::E32 => 4,
        }
    }
}

/// Number of registers ganged together and addressed as one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterGroup {
    /// One register.
    M1,
    /// Two registers.
    M2,
    /// Four registers.
    M4,
    /// Eight registers.
    M8,
}

impl RegisterGroup {
    /// Register count in the group.
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::M1 => 1,
            Self::M2 => 2,
            Self::M4 => 4,
            Self::M8 => 8,
        }
    }
}

/// Vector register capability of the executing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VectorCaps {
    vector_bytes: usize,
}

impl Default for VectorCaps {
    fn default() -> Self {
        Self::detect()
    }
}

impl VectorCaps {
    /// Query the host for its widest usable register.
    ///
    /// Returns 32 bytes when an x86-64-v3 (AVX2) token can be summoned and
    /// the 16-byte baseline otherwise.
    #[must_use]
    pub fn detect() -> Self {
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        {
            use archmage::{SimdToken, X64V3Token};
            if X64V3Token::summon().is_some() {
                return Self { vector_bytes: 32 };
            }
        }
        Self {
            vector_bytes: MIN_VECTOR_BYTES,
        }
    }

    /// Caps for a register of `bytes` bytes.
    ///
    /// The value is rounded down to a power of two and clamped to
    /// `MIN_VECTOR_BYTES..=MAX_VECTOR_BYTES`.
    #[must_use]
    pub fn with_vector_bytes(bytes: usize) -> Self {
        let clamped = bytes.clamp(MIN_VECTOR_BYTES, MAX_VECTOR_BYTES);
        // round down to a power of two
        let pow2 = 1usize << (usize::BITS - 1 - clamped.leading_zeros());
        if pow2 != bytes {
            log::trace!("vector width {bytes} bytes adjusted to {pow2}");
        }
        Self { vector_bytes: pow2 }
    }

    /// Register size in bytes.
    #[must_use]
    pub const fn vector_bytes(self) -> usize {
        self.vector_bytes
    }

    /// Lanes of `width` that fit in one register group.
    ///
    /// Never exceeds [`MAX_LANES`].
    #[must_use]
    pub const fn max_lanes(self, width: ElementWidth, group: RegisterGroup) -> usize {
        let lanes = self.vector_bytes * group.count() / width.bytes();
        if lanes > MAX_LANES {
            MAX_LANES
        } else {
            lanes
        }
    }

    /// Lane count for the next iteration: `min(max_lanes, remaining)`.
    #[must_use]
    pub const fn set_vl(
        self,
        width: ElementWidth,
        group: RegisterGroup,
        remaining: usize,
    ) -> usize {
        let cap = self.max_lanes(width, group);
        if remaining < cap {
            remaining
        } else {
            cap
        }
    }

    /// Tiles covering `0..len` for the given lane geometry.
    #[must_use]
    pub fn strips(self, width: ElementWidth, group: RegisterGroup, len: usize) -> Strips {
        Strips {
            caps: self,
            width,
            group,
            pos: 0,
            len,
        }
    }
}

/// Iterator over consecutive element ranges, each at most one vector long.
#[derive(Debug, Clone)]
pub struct Strips {
    caps: VectorCaps,
    width: ElementWidth,
    group: RegisterGroup,
    pos: usize,
    len: usize,
}

impl Iterator for Strips {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        let remaining = self.len - self.pos;
        if remaining == 0 {
            return None;
        }
        let vl = self.caps.set_vl(self.width, self.group, remaining);
        let start = self.pos;
        self.pos += vl;
        Some(start..self.pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lanes = self.caps.max_lanes(self.width, self.group);
        let n = (self.len - self.pos).div_ceil(lanes);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Strips {}

impl core::iter::FusedIterator for Strips {}
