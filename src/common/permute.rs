//! Index-table permutations.
//!
//! The IDCT transposes its workspace between passes by gathering through a
//! constant index table rather than with engine-specific shuffles.

/// Gather `src` through `table`: `out[i] = src[table[i]]`.
#[inline(always)]
#[must_use]
pub fn permute<T: Copy + Default, const N: usize>(src: &[T; N], table: &[u8; N]) -> [T; N] {
    let mut out = [T::default(); N];
    for (o, &idx) in out.iter_mut().zip(table.iter()) {
        *o = src[usize::from(idx)];
    }
    out
}

/// Gather table that transposes a row-major `rows x cols` matrix.
///
/// `N` must equal `rows * cols` and be at most 256.
#[must_use]
pub const fn transpose_indices<const N: usize>(rows: usize, cols: usize) -> [u8; N] {
    assert!(rows * cols == N && N <= 256);
    let mut table = [0u8; N];
    let mut c = 0;
    while c < cols {
        let mut r = 0;
        while r < rows {
            table[c * rows + r] = (r * cols + c) as u8;
            r += 1;
        }
        c += 1;
    }
    table
}

/// Transpose of the full 8x8 workspace.
pub const TRANSPOSE_8X8: [u8; 64] = transpose_indices::<64>(8, 8);

/// Transpose of the 4-row workspace produced by the reduced 4x4 first pass.
pub const TRANSPOSE_4X8: [u8; 32] = transpose_indices::<32>(4, 8);

/// Transpose of the 2-row workspace produced by the reduced 2x2 first pass.
pub const TRANSPOSE_2X8: [u8; 16] = transpose_indices::<16>(2, 8);
