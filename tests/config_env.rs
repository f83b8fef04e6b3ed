//! Environment overrides. Kept in its own test binary because it mutates
//! process-wide state.

#![cfg(feature = "std")]

use zenjdsp::config::{BACKEND_ENV, VECTOR_BYTES_ENV};
use zenjdsp::{Backend, KernelConfig};

#[test]
fn env_overrides_and_bad_values() {
    std::env::set_var(BACKEND_ENV, " Scalar ");
    std::env::set_var(VECTOR_BYTES_ENV, "32");
    let config = KernelConfig::from_env();
    assert_eq!(config.backend, Backend::Scalar);
    assert_eq!(config.max_vector_bytes, Some(32));
    let kernels = config.build().unwrap();
    assert_eq!(kernels.backend(), Backend::Scalar);
    assert_eq!(kernels.caps().vector_bytes(), 32);

    // unparsable values fall back to the defaults
    std::env::set_var(BACKEND_ENV, "riscv-v");
    std::env::set_var(VECTOR_BYTES_ENV, "wide");
    let config = KernelConfig::from_env();
    assert_eq!(config, KernelConfig::new());

    std::env::remove_var(BACKEND_ENV);
    std::env::remove_var(VECTOR_BYTES_ENV);
    assert_eq!(KernelConfig::from_env(), KernelConfig::new());
}
