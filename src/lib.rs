//! Fixed-point JPEG inverse DCT and YCbCr color kernels
//!
//! This crate provides the per-block and per-row numeric kernels of a
//! baseline JPEG codec: the accurate (`islow`) and fast (`ifast`) 8x8
//! inverse DCTs, reduced 4x4, 2x2 and 1x1 transforms for scaled decoding,
//! RGB <-> YCbCr conversion, and merged 2:1 chroma upsampling with
//! conversion. Results are bit-exact with the classic libjpeg integer
//! arithmetic on every backend.
//!
//! # Features
//!
//! - `std` (default): environment-driven configuration through
//!   [`KernelConfig::from_env`] and `std::error::Error` on the error types.
//! - `simd` (default): x86-64-v3 (AVX2) kernels through [`archmage`] tokens.
//! - `multiverse`: compile the portable lane kernels (ifast, reduced sizes,
//!   color matrix) for several x86-64 levels and select one at runtime.
//!
//! Every IDCT accepts the full `i16` coefficient range with any multiplier
//! table. Out-of-range intermediates wrap rather than panic, identically on
//! all backends.
//!
//! # no_std Support
//!
//! The kernels themselves need neither `std` nor `alloc` beyond what the
//! error types carry:
//! ```toml
//! [dependencies]
//! zenjdsp = { version = "...", default-features = false }
//! ```
//!
//! # Usage
//!
//! Resolve a backend once and reuse the returned [`Kernels`]:
//!
//! ```rust
//! use zenjdsp::{KernelConfig, PixelLayout};
//!
//! let kernels = KernelConfig::new().build()?;
//!
//! let mut coef = [0i16; 64];
//! coef[0] = 8;
//! let quant = [16i32; 64];
//! let mut block = [0u8; 64];
//! kernels.idct_islow(&coef, &quant, &mut block, 0, 8)?;
//! assert!(block.iter().all(|&v| v == 144));
//!
//! let mut rgb = [0u8; 3];
//! kernels.ycc_to_rgb_row(&[76], &[85], &[255], &mut rgb, PixelLayout::Rgb, 1)?;
//! assert_eq!(rgb, [254, 0, 0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! 12-bit data uses `u16` samples with the same calls. The unchecked kernel
//! functions in [`idct`] and [`color`] are also public for callers that
//! validate geometry themselves.
//!
//! # Safety
//!
//! This crate uses `#![forbid(unsafe_code)]`. With the `simd` feature the
//! vector kernels rely on [`archmage`] for safe intrinsics: the `#[arcane]`
//! proc macro generates the `target_feature` wrappers, and a kernel only
//! runs once a CPU token proves the features are present.
//!
//! [`archmage`]: https://docs.rs/archmage

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

pub mod color;
pub mod common;
pub mod config;
mod dispatch;
pub mod error;
pub mod idct;

pub use color::PixelLayout;
pub use common::sample::{pack_samples, unpack_samples, Endian, Sample};
pub use common::vector::{ElementWidth, RegisterGroup, VectorCaps};
pub use config::{Backend, KernelConfig};
pub use dispatch::Kernels;
pub use error::{ConfigError, KernelError};
pub use idct::{CoefBlock, IdctMethod, IfastTable, QuantTable};
