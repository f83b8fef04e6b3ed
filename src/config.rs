//! Backend selection and vector-width configuration.

use core::str::FromStr;

use crate::common::vector::{VectorCaps, MAX_VECTOR_BYTES, MIN_VECTOR_BYTES};
use crate::dispatch::Kernels;
use crate::error::ConfigError;

/// Which implementation family runs the kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Backend {
    /// Pick the fastest backend the host supports.
    #[default]
    Auto,
    /// Column-then-row scalar reference code.
    Scalar,
    /// Lane-parallel code sized by [`VectorCaps`], no explicit intrinsics.
    Portable,
    /// x86-64-v3 intrinsics.
    Avx2,
}

impl Backend {
    /// Lowercase name as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Scalar => "scalar",
            Self::Portable => "portable",
            Self::Avx2 => "avx2",
        }
    }

    /// Whether this backend can run on the current host.
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            Self::Auto | Self::Scalar | Self::Portable => true,
            Self::Avx2 => avx2_available(),
        }
    }
}

impl core::fmt::Display for Backend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [Self::Auto, Self::Scalar, Self::Portable, Self::Avx2]
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownBackend(s.into()))
    }
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
fn avx2_available() -> bool {
    use archmage::{SimdToken, X64V3Token};
    X64V3Token::summon().is_some()
}

#[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
fn avx2_available() -> bool {
    false
}

/// Environment variable naming the backend (`auto`, `scalar`, `portable`, `avx2`).
#[cfg(feature = "std")]
pub const BACKEND_ENV: &str = "ZENJDSP_BACKEND";

/// Environment variable overriding the vector register size in bytes.
#[cfg(feature = "std")]
pub const VECTOR_BYTES_ENV: &str = "ZENJDSP_MAX_VECTOR_BYTES";

/// Kernel configuration.
///
/// # Example
///
/// ```rust
/// use zenjdsp::{Backend, KernelConfig};
///
/// let kernels = KernelConfig::new()
///     .backend(Backend::Portable)
///     .max_vector_bytes(Some(16))
///     .build()?;
/// assert_eq!(kernels.backend(), Backend::Portable);
/// # Ok::<(), zenjdsp::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct KernelConfig {
    /// Requested backend.
    pub backend: Backend,
    /// Register size override for the portable backend; `None` detects it.
    pub max_vector_bytes: Option<usize>,
}

impl KernelConfig {
    /// Automatic backend, detected vector width.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from `ZENJDSP_BACKEND` and `ZENJDSP_MAX_VECTOR_BYTES`.
    ///
    /// Values that fail to parse are logged and ignored.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(BACKEND_ENV) {
            match raw.parse::<Backend>() {
                Ok(b) => config.backend = b,
                Err(e) => log::warn!("ignoring {BACKEND_ENV}: {e}"),
            }
        }
        if let Ok(raw) = std::env::var(VECTOR_BYTES_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) => config.max_vector_bytes = Some(n),
                Err(e) => log::warn!("ignoring {VECTOR_BYTES_ENV}={raw:?}: {e}"),
            }
        }
        config
    }

    /// Set the backend.
    #[must_use]
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Override the register size used to size portable strips.
    #[must_use]
    pub fn max_vector_bytes(mut self, bytes: Option<usize>) -> Self {
        self.max_vector_bytes = bytes;
        self
    }

    /// Resolve the backend and capture the host's SIMD token.
    pub fn build(&self) -> Result<Kernels, ConfigError> {
        let caps = match self.max_vector_bytes {
            Some(n) if !(MIN_VECTOR_BYTES..=MAX_VECTOR_BYTES).contains(&n) => {
                return Err(ConfigError::InvalidVectorBytes(n));
            }
            Some(n) => VectorCaps::with_vector_bytes(n),
            None => VectorCaps::detect(),
        };
        let backend = match self.backend {
            Backend::Auto if avx2_available() => Backend::Avx2,
            Backend::Auto => Backend::Portable,
            Backend::Avx2 if !avx2_available() => {
                return Err(ConfigError::BackendUnavailable(Backend::Avx2));
            }
            other => other,
        };
        log::debug!(
            "kernel backend {} (requested {}), {}-byte vectors",
            backend,
            self.backend,
            caps.vector_bytes()
        );
        Ok(Kernels::new(backend, caps))
    }
}
