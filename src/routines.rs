// src/routines.rs

//! The routine table.
//!
//! Every routine of the published surface is declared exactly once, in
//! `for_each_routine!`. The table is expanded through callback macros into
//! the [`Lapack`] trait, the [`Routine`] identity enum, and the forwarding
//! bodies of every backend adapter, so the trait, the identities and the
//! adapters cannot drift apart: a backend that misses a routine does not build.
//!
//! Signatures follow the column-major LAPACK convention. Character options are
//! ASCII bytes, dimensions are `i32`, matrices are a slice starting at the
//! matrix origin plus a leading dimension, and `info` carries the status code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Expands `$callback! { [extra tokens] <table> }`.
///
/// Each table row reads `Variant => fn name(arg: Type, ...) [-> Ret];`.
macro_rules! for_each_routine {
    ($callback:ident [$($extra:tt)*]) => {
        $callback! {
            [$($extra)*]

            /// Reports the version of the LAPACK implementation behind the backend.
            Ilaver => fn ilaver(vers_major: &mut i32, vers_minor: &mut i32, vers_patch: &mut i32);

            /// Single-precision machine parameters (`E`, `S`, `B`, `P`, `N`, `R`, `M`, `U`, `L`, `O`).
            Slamch => fn slamch(cmach: u8) -> f32;
            /// Double-precision machine parameters (`E`, `S`, `B`, `P`, `N`, `R`, `M`, `U`, `L`, `O`).
            Dlamch => fn dlamch(cmach: u8) -> f64;

            /// Max-abs, one, infinity or Frobenius norm of a general matrix.
            Slange => fn slange(norm: u8, m: i32, n: i32, a: &[f32], lda: i32, work: &mut [f32]) -> f32;
            Dlange => fn dlange(norm: u8, m: i32, n: i32, a: &[f64], lda: i32, work: &mut [f64]) -> f64;
            /// Norm of a symmetric matrix stored in one triangle.
            Slansy => fn slansy(norm: u8, uplo: u8, n: i32, a: &[f32], lda: i32, work: &mut [f32]) -> f32;
            Dlansy => fn dlansy(norm: u8, uplo: u8, n: i32, a: &[f64], lda: i32, work: &mut [f64]) -> f64;
            /// Copies all or one triangle of `a` into `b`.
            Slacpy => fn slacpy(uplo: u8, m: i32, n: i32, a: &[f32], lda: i32, b: &mut [f32], ldb: i32);
            Dlacpy => fn dlacpy(uplo: u8, m: i32, n: i32, a: &[f64], lda: i32, b: &mut [f64], ldb: i32);
            /// Applies the row interchanges `k1..=k2` recorded in `ipiv`.
            Slaswp => fn slaswp(n: i32, a: &mut [f32], lda: i32, k1: i32, k2: i32, ipiv: &[i32], incx: i32);
            Dlaswp => fn dlaswp(n: i32, a: &mut [f64], lda: i32, k1: i32, k2: i32, ipiv: &[i32], incx: i32);

            /// LU factorization with partial pivoting, `A = P * L * U`.
            Sgetrf => fn sgetrf(m: i32, n: i32, a: &mut [f32], lda: i32, ipiv: &mut [i32], info: &mut i32);
            Dgetrf => fn dgetrf(m: i32, n: i32, a: &mut [f64], lda: i32, ipiv: &mut [i32], info: &mut i32);
            /// Solves `A * X = B` or `A**T * X = B` from `getrf` factors.
            Sgetrs => fn sgetrs(trans: u8, n: i32, nrhs: i32, a: &[f32], lda: i32, ipiv: &[i32], b: &mut [f32], ldb: i32, info: &mut i32);
            Dgetrs => fn dgetrs(trans: u8, n: i32, nrhs: i32, a: &[f64], lda: i32, ipiv: &[i32], b: &mut [f64], ldb: i32, info: &mut i32);
            /// Factor-and-solve driver for general systems.
            Sgesv => fn sgesv(n: i32, nrhs: i32, a: &mut [f32], lda: i32, ipiv: &mut [i32], b: &mut [f32], ldb: i32, info: &mut i32);
            Dgesv => fn dgesv(n: i32, nrhs: i32, a: &mut [f64], lda: i32, ipiv: &mut [i32], b: &mut [f64], ldb: i32, info: &mut i32);
            /// Inverse of a general matrix from `getrf` factors.
            Sgetri => fn sgetri(n: i32, a: &mut [f32], lda: i32, ipiv: &[i32], work: &mut [f32], lwork: i32, info: &mut i32);
            Dgetri => fn dgetri(n: i32, a: &mut [f64], lda: i32, ipiv: &[i32], work: &mut [f64], lwork: i32, info: &mut i32);
            /// Reciprocal condition number of a general matrix from `getrf` factors.
            Sgecon => fn sgecon(norm: u8, n: i32, a: &[f32], lda: i32, anorm: f32, rcond: &mut f32, work: &mut [f32], iwork: &mut [i32], info: &mut i32);
            Dgecon => fn dgecon(norm: u8, n: i32, a: &[f64], lda: i32, anorm: f64, rcond: &mut f64, work: &mut [f64], iwork: &mut [i32], info: &mut i32);

            /// LU factorization of a band matrix.
            Sgbtrf => fn sgbtrf(m: i32, n: i32, kl: i32, ku: i32, ab: &mut [f32], ldab: i32, ipiv: &mut [i32], info: &mut i32);
            Dgbtrf => fn dgbtrf(m: i32, n: i32, kl: i32, ku: i32, ab: &mut [f64], ldab: i32, ipiv: &mut [i32], info: &mut i32);
            Sgbtrs => fn sgbtrs(trans: u8, n: i32, kl: i32, ku: i32, nrhs: i32, ab: &[f32], ldab: i32, ipiv: &[i32], b: &mut [f32], ldb: i32, info: &mut i32);
            Dgbtrs => fn dgbtrs(trans: u8, n: i32, kl: i32, ku: i32, nrhs: i32, ab: &[f64], ldab: i32, ipiv: &[i32], b: &mut [f64], ldb: i32, info: &mut i32);
            Sgbsv => fn sgbsv(n: i32, kl: i32, ku: i32, nrhs: i32, ab: &mut [f32], ldab: i32, ipiv: &mut [i32], b: &mut [f32], ldb: i32, info: &mut i32);
            Dgbsv => fn dgbsv(n: i32, kl: i32, ku: i32, nrhs: i32, ab: &mut [f64], ldab: i32, ipiv: &mut [i32], b: &mut [f64], ldb: i32, info: &mut i32);

            /// Solves a general tridiagonal system with partial pivoting.
            Sgtsv => fn sgtsv(n: i32, nrhs: i32, dl: &mut [f32], d: &mut [f32], du: &mut [f32], b: &mut [f32], ldb: i32, info: &mut i32);
            Dgtsv => fn dgtsv(n: i32, nrhs: i32, dl: &mut [f64], d: &mut [f64], du: &mut [f64], b: &mut [f64], ldb: i32, info: &mut i32);

            /// Cholesky factorization of a symmetric positive definite matrix.
            Spotrf => fn spotrf(uplo: u8, n: i32, a: &mut [f32], lda: i32, info: &mut i32);
            Dpotrf => fn dpotrf(uplo: u8, n: i32, a: &mut [f64], lda: i32, info: &mut i32);
            Spotrs => fn spotrs(uplo: u8, n: i32, nrhs: i32, a: &[f32], lda: i32, b: &mut [f32], ldb: i32, info: &mut i32);
            Dpotrs => fn dpotrs(uplo: u8, n: i32, nrhs: i32, a: &[f64], lda: i32, b: &mut [f64], ldb: i32, info: &mut i32);
            Sposv => fn sposv(uplo: u8, n: i32, nrhs: i32, a: &mut [f32], lda: i32, b: &mut [f32], ldb: i32, info: &mut i32);
            Dposv => fn dposv(uplo: u8, n: i32, nrhs: i32, a: &mut [f64], lda: i32, b: &mut [f64], ldb: i32, info: &mut i32);

            /// Cholesky factorization in packed storage.
            Spptrf => fn spptrf(uplo: u8, n: i32, ap: &mut [f32], info: &mut i32);
            Dpptrf => fn dpptrf(uplo: u8, n: i32, ap: &mut [f64], info: &mut i32);
            Spptrs => fn spptrs(uplo: u8, n: i32, nrhs: i32, ap: &[f32], b: &mut [f32], ldb: i32, info: &mut i32);
            Dpptrs => fn dpptrs(uplo: u8, n: i32, nrhs: i32, ap: &[f64], b: &mut [f64], ldb: i32, info: &mut i32);
            Sppsv => fn sppsv(uplo: u8, n: i32, nrhs: i32, ap: &mut [f32], b: &mut [f32], ldb: i32, info: &mut i32);
            Dppsv => fn dppsv(uplo: u8, n: i32, nrhs: i32, ap: &mut [f64], b: &mut [f64], ldb: i32, info: &mut i32);

            /// Solves a triangular system with multiple right-hand sides.
            Strtrs => fn strtrs(uplo: u8, trans: u8, diag: u8, n: i32, nrhs: i32, a: &[f32], lda: i32, b: &mut [f32], ldb: i32, info: &mut i32);
            Dtrtrs => fn dtrtrs(uplo: u8, trans: u8, diag: u8, n: i32, nrhs: i32, a: &[f64], lda: i32, b: &mut [f64], ldb: i32, info: &mut i32);

            /// Householder QR factorization.
            Sgeqrf => fn sgeqrf(m: i32, n: i32, a: &mut [f32], lda: i32, tau: &mut [f32], work: &mut [f32], lwork: i32, info: &mut i32);
            Dgeqrf => fn dgeqrf(m: i32, n: i32, a: &mut [f64], lda: i32, tau: &mut [f64], work: &mut [f64], lwork: i32, info: &mut i32);
            /// Forms the first `n` columns of `Q` from `geqrf` reflectors.
            Sorgqr => fn sorgqr(m: i32, n: i32, k: i32, a: &mut [f32], lda: i32, tau: &[f32], work: &mut [f32], lwork: i32, info: &mut i32);
            Dorgqr => fn dorgqr(m: i32, n: i32, k: i32, a: &mut [f64], lda: i32, tau: &[f64], work: &mut [f64], lwork: i32, info: &mut i32);
            /// Multiplies `c` by `Q` or `Q**T` from `geqrf` reflectors.
            Sormqr => fn sormqr(side: u8, trans: u8, m: i32, n: i32, k: i32, a: &[f32], lda: i32, tau: &[f32], c: &mut [f32], ldc: i32, work: &mut [f32], lwork: i32, info: &mut i32);
            Dormqr => fn dormqr(side: u8, trans: u8, m: i32, n: i32, k: i32, a: &[f64], lda: i32, tau: &[f64], c: &mut [f64], ldc: i32, work: &mut [f64], lwork: i32, info: &mut i32);

            /// Eigenvalues (ascending) and optionally eigenvectors of a symmetric matrix.
            Ssyev => fn ssyev(jobz: u8, uplo: u8, n: i32, a: &mut [f32], lda: i32, w: &mut [f32], work: &mut [f32], lwork: i32, info: &mut i32);
            Dsyev => fn dsyev(jobz: u8, uplo: u8, n: i32, a: &mut [f64], lda: i32, w: &mut [f64], work: &mut [f64], lwork: i32, info: &mut i32);

            /// Singular value decomposition of a general matrix.
            Sgesvd => fn sgesvd(jobu: u8, jobvt: u8, m: i32, n: i32, a: &mut [f32], lda: i32, s: &mut [f32], u: &mut [f32], ldu: i32, vt: &mut [f32], ldvt: i32, work: &mut [f32], lwork: i32, info: &mut i32);
            Dgesvd => fn dgesvd(jobu: u8, jobvt: u8, m: i32, n: i32, a: &mut [f64], lda: i32, s: &mut [f64], u: &mut [f64], ldu: i32, vt: &mut [f64], ldvt: i32, work: &mut [f64], lwork: i32, info: &mut i32);
        }
    };
}

/// Generates the [`Lapack`] trait from the routine table.
macro_rules! declare_lapack_trait {
    ([] $( $(#[$meta:meta])* $variant:ident => fn $name:ident( $($arg:ident : $ty:ty),* $(,)? ) $(-> $ret:ty)? ; )*) => {
        /// The published routine surface. One implementation per backend.
        ///
        /// Implementations are Backend Adapters: every method forwards its
        /// arguments unchanged to one kernel provider and returns what the
        /// provider returns. Status codes travel through `info` verbatim.
        pub trait Lapack: Send + Sync {
            /// Stable identifier of the backend, e.g. `"reference"` or `"native"`.
            fn name(&self) -> &'static str;

            /// Version triple reported by [`Lapack::ilaver`].
            fn version(&self) -> LapackVersion {
                let (mut major, mut minor, mut patch) = (0, 0, 0);
                self.ilaver(&mut major, &mut minor, &mut patch);
                LapackVersion { major, minor, patch }
            }

            $(
                $(#[$meta])*
                fn $name(&self, $($arg: $ty),*) $(-> $ret)?;
            )*
        }
    };
}

/// Generates the [`Routine`] identity enum from the routine table.
macro_rules! declare_routine_identities {
    ([] $( $(#[$meta:meta])* $variant:ident => fn $name:ident( $($arg:ident : $ty:ty),* $(,)? ) $(-> $ret:ty)? ; )*) => {
        /// Identity of one routine of the published surface.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Routine {
            $( $variant, )*
        }

        impl Routine {
            /// Every routine of the surface, in table order.
            pub const ALL: &'static [Routine] = &[ $( Routine::$variant, )* ];

            /// Lower-case LAPACK name, e.g. `"dgetrf"`.
            pub fn name(self) -> &'static str {
                match self {
                    $( Routine::$variant => stringify!($name), )*
                }
            }

            /// Argument names in signature order. Status codes refer to these
            /// by 1-based position.
            pub fn arguments(self) -> &'static [&'static str] {
                match self {
                    $( Routine::$variant => &[ $( stringify!($arg) ),* ], )*
                }
            }

            /// Looks a routine up by its LAPACK name, ignoring case.
            pub fn from_name(name: &str) -> Option<Routine> {
                let lowered = name.to_ascii_lowercase();
                match lowered.as_str() {
                    $( stringify!($name) => Some(Routine::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

/// Implements [`Lapack`] for `$target` by forwarding every routine to the
/// function of the same name in module `$provider`.
///
/// `[Target, "label" => module]` forwards to safe functions,
/// `[Target, "label" => unsafe module]` wraps each call in `unsafe`.
macro_rules! forward_routines {
    ([$target:ty, $label:expr => unsafe $provider:ident]
     $( $(#[$meta:meta])* $variant:ident => fn $name:ident( $($arg:ident : $ty:ty),* $(,)? ) $(-> $ret:ty)? ; )*) => {
        impl $crate::routines::Lapack for $target {
            fn name(&self) -> &'static str {
                $label
            }

            $(
                #[inline]
                fn $name(&self, $($arg: $ty),*) $(-> $ret)? {
                    // SAFETY: the kernel receives borrowed slices only; every
                    // access it makes is bounded by the slice lengths.
                    unsafe { $provider::$name($($arg),*) }
                }
            )*
        }
    };
    ([$target:ty, $label:expr => $provider:ident]
     $( $(#[$meta:meta])* $variant:ident => fn $name:ident( $($arg:ident : $ty:ty),* $(,)? ) $(-> $ret:ty)? ; )*) => {
        impl $crate::routines::Lapack for $target {
            fn name(&self) -> &'static str {
                $label
            }

            $(
                #[inline]
                fn $name(&self, $($arg: $ty),*) $(-> $ret)? {
                    $provider::$name($($arg),*)
                }
            )*
        }
    };
}

for_each_routine!(declare_lapack_trait []);
for_each_routine!(declare_routine_identities []);

/// Element width a routine operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precision {
    Single,
    Double,
    /// Routines without a floating-point operand, e.g. `ilaver`.
    Neutral,
}

impl Routine {
    pub fn precision(self) -> Precision {
        match self.name().as_bytes().first() {
            Some(b's') => Precision::Single,
            Some(b'd') => Precision::Double,
            _ => Precision::Neutral,
        }
    }

    /// Upper-case name as printed by LAPACK's error handler.
    pub fn display_name(self) -> String {
        self.name().to_ascii_uppercase()
    }

    /// Name of the argument at the 1-based `position`, if there is one.
    pub fn argument(self, position: usize) -> Option<&'static str> {
        position
            .checked_sub(1)
            .and_then(|idx| self.arguments().get(idx).copied())
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// LAPACK version triple as reported by `ilaver`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LapackVersion {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
}

impl LapackVersion {
    pub const fn new(major: i32, minor: i32, patch: i32) -> Self {
        Self { major, minor, patch }
    }

    /// Parses `"3.12.0"`, `"3.12"` or `"3"`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split('.');
        let major = parts.next()?.trim().parse().ok()?;
        let minor = match parts.next() {
            Some(p) => p.trim().parse().ok()?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(p) => p.trim().parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self { major, minor, patch })
    }
}

impl fmt::Display for LapackVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
