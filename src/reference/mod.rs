// src/reference/mod.rs

//! Pure-Rust reference backend.
//!
//! [`kernels`] is the kernel provider: unblocked, portable implementations of
//! every routine in the table with LAPACK's argument checking and status
//! codes. [`ReferenceLapack`] is the backend adapter over it. It needs no
//! system library, so the dispatcher can always fall back to it.

mod auxiliary;
mod banded;
mod cholesky;
pub mod kernels;
mod lu;
mod qr;
mod scalar;
mod strided;
mod svd;
mod symmetric;
mod triangular;


/// Backend adapter over [`kernels`].
#[derive(Debug, Default, Copy, Clone)]
pub struct ReferenceLapack;

impl ReferenceLapack {
    pub const NAME: &'static str = "reference";

    pub fn new() -> Self {
        Self
    }
}

for_each_routine!(forward_routines [ReferenceLapack, ReferenceLapack::NAME => kernels]);

// --- Helpers shared by the kernels ---

/// Case-insensitive comparison of a character option, LAPACK's `LSAME`.
#[inline]
pub(crate) fn lsame(ca: u8, cb: u8) -> bool {
    ca.eq_ignore_ascii_case(&cb)
}

/// `MAX(1, x)` for leading-dimension and workspace checks.
#[inline]
pub(crate) fn max1(x: i32) -> i32 {
    x.max(1)
}

/// Column-major offset of element `(i, j)` (0-based).
#[inline]
pub(crate) fn at(i: usize, j: usize, ld: usize) -> usize {
    i + j * ld
}

/// Writes the optimal/minimal workspace size into `work[0]` when the caller
/// provided at least one element.
#[inline]
pub(crate) fn set_work_size<T: scalar::Real>(work: &mut [T], size: usize) {
    if let Some(w) = work.first_mut() {
        *w = T::from_usize(size);
    }
}
