//! Infrastructure shared by the IDCT and color kernels.

/// 1-D butterfly networks over parallel lanes.
pub mod butterfly;
/// Fixed-point constant sets.
pub mod consts;
pub mod permute;
pub mod sample;
pub mod vector;

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub(crate) mod simd_avx2;
