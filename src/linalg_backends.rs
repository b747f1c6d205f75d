// src/linalg_backends.rs

//! ndarray front end over the raw routine surface.
//!
//! [`LinAlgBackendProvider`] copies ndarray operands into column-major
//! buffers, runs workspace queries, calls the bound [`Lapack`] backend and
//! turns non-zero status codes into [`LapackError`]s. The raw surface never
//! translates status codes; this module is the only place that does.

use crate::dispatch::lapack;
use crate::error::{LapackError, ThreadSafeStdError};
use crate::routines::{Lapack, Routine};
use ndarray::{Array1, Array2, Axis, ShapeBuilder};
use num_traits::Float;
use std::fmt;
use std::marker::PhantomData;

// --- Trait Definitions ---

/// Output of a symmetric eigendecomposition.
#[derive(Debug)]
pub struct EighOutput<F: 'static> {
    /// Eigenvalues in ascending order.
    pub eigenvalues: Array1<F>,
    /// Eigenvectors as columns of the matrix.
    /// eigenvectors.column(i) corresponds to eigenvalues[i].
    pub eigenvectors: Array2<F>,
}

/// Symmetric eigendecomposition (`?syev`). Only the upper triangle of
/// `matrix` is read.
pub trait BackendEigh<F: 'static + Copy + Send + Sync> {
    fn eigh_upper(&self, matrix: &Array2<F>) -> Result<EighOutput<F>, ThreadSafeStdError>;
}

/// QR decomposition, returning the thin `m x min(m, n)` Q factor.
pub trait BackendQR<F: 'static + Copy + Send + Sync> {
    fn qr_q_factor(&self, matrix: &Array2<F>) -> Result<Array2<F>, ThreadSafeStdError>;
}

/// Output of a Singular Value Decomposition.
#[derive(Debug)]
pub struct SVDOutput<F: 'static> {
    /// `m x min(m, n)` left singular vectors, when requested.
    pub u: Option<Array2<F>>,
    /// Singular values in descending order.
    pub s: Array1<F>,
    /// `min(m, n) x n` right singular vectors (transposed), when requested.
    pub vt: Option<Array2<F>>,
}

/// Thin Singular Value Decomposition (`?gesvd`).
pub trait BackendSVD<F: 'static + Copy + Send + Sync> {
    fn svd_into(&self, matrix: Array2<F>, compute_u: bool, compute_v: bool) -> Result<SVDOutput<F>, ThreadSafeStdError>;
}

/// LU factorization with partial pivoting, `P * A = L * U`.
#[derive(Debug)]
pub struct LuOutput<F: 'static> {
    /// `L` below the diagonal (unit diagonal implied), `U` on and above it.
    pub factors: Array2<F>,
    /// Row `i` was interchanged with row `pivots[i]` (0-based).
    pub pivots: Vec<usize>,
}

impl<F: Float + 'static> LuOutput<F> {
    /// The unit lower-triangular `m x min(m, n)` factor.
    pub fn l(&self) -> Array2<F> {
        let (m, n) = self.factors.dim();
        let k = m.min(n);
        Array2::from_shape_fn((m, k), |(i, j)| match i.cmp(&j) {
            std::cmp::Ordering::Greater => self.factors[[i, j]],
            std::cmp::Ordering::Equal => F::one(),
            std::cmp::Ordering::Less => F::zero(),
        })
    }

    /// The upper-triangular `min(m, n) x n` factor.
    pub fn u(&self) -> Array2<F> {
        let (m, n) = self.factors.dim();
        let k = m.min(n);
        Array2::from_shape_fn((k, n), |(i, j)| if i <= j { self.factors[[i, j]] } else { F::zero() })
    }

    /// `perm` such that row `i` of `P * A` is row `perm[i]` of `A`.
    pub fn row_permutation(&self) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..self.factors.nrows()).collect();
        for (i, &p) in self.pivots.iter().enumerate() {
            perm.swap(i, p);
        }
        perm
    }

    /// `P * A`, for checking `L * U` against the input.
    pub fn permute_rows(&self, matrix: &Array2<F>) -> Array2<F> {
        matrix.select(Axis(0), &self.row_permutation())
    }
}

pub trait BackendLU<F: 'static + Copy + Send + Sync> {
    fn lu(&self, matrix: &Array2<F>) -> Result<LuOutput<F>, ThreadSafeStdError>;
}

/// Cholesky factor `L` with `A = L * L**T`; reads the lower triangle.
pub trait BackendCholesky<F: 'static + Copy + Send + Sync> {
    fn cholesky_lower(&self, matrix: &Array2<F>) -> Result<Array2<F>, ThreadSafeStdError>;
}

/// General linear systems.
pub trait BackendSolve<F: 'static + Copy + Send + Sync> {
    /// Solves `A * X = B`.
    fn solve(&self, a: &Array2<F>, b: &Array2<F>) -> Result<Array2<F>, ThreadSafeStdError>;

    /// Estimate of the reciprocal 1-norm condition number of `a`. Zero for an
    /// exactly singular matrix.
    fn rcond(&self, a: &Array2<F>) -> Result<F, ThreadSafeStdError>;
}

// --- Precision-specific routine selection ---

/// Element types with a routine family on the surface.
pub trait LapackScalar: Float + Send + Sync + fmt::Debug + 'static {
    const GETRF: Routine;
    const GESV: Routine;
    const GECON: Routine;
    const POTRF: Routine;
    const GEQRF: Routine;
    const ORGQR: Routine;
    const SYEV: Routine;
    const GESVD: Routine;

    fn lange(l: &dyn Lapack, norm: u8, m: i32, n: i32, a: &[Self], lda: i32, work: &mut [Self]) -> Self;
    fn getrf(l: &dyn Lapack, m: i32, n: i32, a: &mut [Self], lda: i32, ipiv: &mut [i32], info: &mut i32);
    #[allow(clippy::too_many_arguments)]
    fn gesv(l: &dyn Lapack, n: i32, nrhs: i32, a: &mut [Self], lda: i32, ipiv: &mut [i32], b: &mut [Self], ldb: i32, info: &mut i32);
    #[allow(clippy::too_many_arguments)]
    fn gecon(l: &dyn Lapack, norm: u8, n: i32, a: &[Self], lda: i32, anorm: Self, rcond: &mut Self, work: &mut [Self], iwork: &mut [i32], info: &mut i32);
    fn potrf(l: &dyn Lapack, uplo: u8, n: i32, a: &mut [Self], lda: i32, info: &mut i32);
    #[allow(clippy::too_many_arguments)]
    fn geqrf(l: &dyn Lapack, m: i32, n: i32, a: &mut [Self], lda: i32, tau: &mut [Self], work: &mut [Self], lwork: i32, info: &mut i32);
    #[allow(clippy::too_many_arguments)]
    fn orgqr(l: &dyn Lapack, m: i32, n: i32, k: i32, a: &mut [Self], lda: i32, tau: &[Self], work: &mut [Self], lwork: i32, info: &mut i32);
    #[allow(clippy::too_many_arguments)]
    fn syev(l: &dyn Lapack, jobz: u8, uplo: u8, n: i32, a: &mut [Self], lda: i32, w: &mut [Self], work: &mut [Self], lwork: i32, info: &mut i32);
    #[allow(clippy::too_many_arguments)]
    fn gesvd(l: &dyn Lapack, jobu: u8, jobvt: u8, m: i32, n: i32, a: &mut [Self], lda: i32, s: &mut [Self], u: &mut [Self], ldu: i32, vt: &mut [Self], ldvt: i32, work: &mut [Self], lwork: i32, info: &mut i32);
}

macro_rules! impl_lapack_scalar {
    ($ty:ty, $getrf_id:ident, $gesv_id:ident, $gecon_id:ident, $potrf_id:ident, $geqrf_id:ident, $orgqr_id:ident, $syev_id:ident, $gesvd_id:ident,
     $lange:ident, $getrf:ident, $gesv:ident, $gecon:ident, $potrf:ident, $geqrf:ident, $orgqr:ident, $syev:ident, $gesvd:ident) => {
        impl LapackScalar for $ty {
            const GETRF: Routine = Routine::$getrf_id;
            const GESV: Routine = Routine::$gesv_id;
            const GECON: Routine = Routine::$gecon_id;
            const POTRF: Routine = Routine::$potrf_id;
            const GEQRF: Routine = Routine::$geqrf_id;
            const ORGQR: Routine = Routine::$orgqr_id;
            const SYEV: Routine = Routine::$syev_id;
            const GESVD: Routine = Routine::$gesvd_id;

            fn lange(l: &dyn Lapack, norm: u8, m: i32, n: i32, a: &[Self], lda: i32, work: &mut [Self]) -> Self {
                l.$lange(norm, m, n, a, lda, work)
            }
            fn getrf(l: &dyn Lapack, m: i32, n: i32, a: &mut [Self], lda: i32, ipiv: &mut [i32], info: &mut i32) {
                l.$getrf(m, n, a, lda, ipiv, info)
            }
            fn gesv(l: &dyn Lapack, n: i32, nrhs: i32, a: &mut [Self], lda: i32, ipiv: &mut [i32], b: &mut [Self], ldb: i32, info: &mut i32) {
                l.$gesv(n, nrhs, a, lda, ipiv, b, ldb, info)
            }
            fn gecon(l: &dyn Lapack, norm: u8, n: i32, a: &[Self], lda: i32, anorm: Self, rcond: &mut Self, work: &mut [Self], iwork: &mut [i32], info: &mut i32) {
                l.$gecon(norm, n, a, lda, anorm, rcond, work, iwork, info)
            }
            fn potrf(l: &dyn Lapack, uplo: u8, n: i32, a: &mut [Self], lda: i32, info: &mut i32) {
                l.$potrf(uplo, n, a, lda, info)
            }
            fn geqrf(l: &dyn Lapack, m: i32, n: i32, a: &mut [Self], lda: i32, tau: &mut [Self], work: &mut [Self], lwork: i32, info: &mut i32) {
                l.$geqrf(m, n, a, lda, tau, work, lwork, info)
            }
            fn orgqr(l: &dyn Lapack, m: i32, n: i32, k: i32, a: &mut [Self], lda: i32, tau: &[Self], work: &mut [Self], lwork: i32, info: &mut i32) {
                l.$orgqr(m, n, k, a, lda, tau, work, lwork, info)
            }
            fn syev(l: &dyn Lapack, jobz: u8, uplo: u8, n: i32, a: &mut [Self], lda: i32, w: &mut [Self], work: &mut [Self], lwork: i32, info: &mut i32) {
                l.$syev(jobz, uplo, n, a, lda, w, work, lwork, info)
            }
            fn gesvd(l: &dyn Lapack, jobu: u8, jobvt: u8, m: i32, n: i32, a: &mut [Self], lda: i32, s: &mut [Self], u: &mut [Self], ldu: i32, vt: &mut [Self], ldvt: i32, work: &mut [Self], lwork: i32, info: &mut i32) {
                l.$gesvd(jobu, jobvt, m, n, a, lda, s, u, ldu, vt, ldvt, work, lwork, info)
            }
        }
    };
}

impl_lapack_scalar!(f32, Sgetrf, Sgesv, Sgecon, Spotrf, Sgeqrf, Sorgqr, Ssyev, Sgesvd,
    slange, sgetrf, sgesv, sgecon, spotrf, sgeqrf, sorgqr, ssyev, sgesvd);
impl_lapack_scalar!(f64, Dgetrf, Dgesv, Dgecon, Dpotrf, Dgeqrf, Dorgqr, Dsyev, Dgesvd,
    dlange, dgetrf, dgesv, dgecon, dpotrf, dgeqrf, dorgqr, dsyev, dgesvd);

// --- Provider ---

/// ndarray operations over one [`Lapack`] backend.
#[derive(Copy, Clone)]
pub struct LinAlgBackendProvider<'a, F: 'static + Copy + Send + Sync> {
    backend: &'a dyn Lapack,
    _phantom: PhantomData<F>,
}

impl<F: 'static + Copy + Send + Sync> LinAlgBackendProvider<'static, F> {
    /// Provider over the process-wide binding, see [`lapack()`].
    pub fn new() -> Self {
        Self::with_backend(lapack())
    }
}

impl<F: 'static + Copy + Send + Sync> Default for LinAlgBackendProvider<'static, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, F: 'static + Copy + Send + Sync> LinAlgBackendProvider<'a, F> {
    pub fn with_backend(backend: &'a dyn Lapack) -> Self {
        Self { backend, _phantom: PhantomData }
    }

    pub fn backend(&self) -> &'a dyn Lapack {
        self.backend
    }
}

impl<F: 'static + Copy + Send + Sync> fmt::Debug for LinAlgBackendProvider<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinAlgBackendProvider")
            .field("backend", &self.backend.name())
            .finish()
    }
}

// --- Buffer helpers ---

fn lapack_int(value: usize) -> Result<i32, LapackError> {
    i32::try_from(value).map_err(|_| LapackError::DimensionOverflow(value))
}

fn leading_dim(rows: usize) -> Result<i32, LapackError> {
    lapack_int(rows.max(1))
}

/// Copies `matrix` into a column-major buffer.
fn to_col_major<F: Copy>(matrix: &Array2<F>) -> Vec<F> {
    matrix.t().iter().copied().collect()
}

fn from_col_major<F>(rows: usize, cols: usize, data: Vec<F>) -> Result<Array2<F>, LapackError> {
    Ok(Array2::from_shape_vec((rows, cols).f(), data)?)
}

fn require_square<F>(matrix: &Array2<F>) -> Result<usize, LapackError> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(LapackError::NotSquare { rows, cols });
    }
    Ok(rows)
}

/// Reads the workspace size a query left in `work[0]`.
fn queried_size<F: LapackScalar>(work: &[F], minimum: usize) -> usize {
    work.first()
        .and_then(|w| w.to_usize())
        .unwrap_or(minimum)
        .max(minimum)
        .max(1)
}

// --- Implementations ---

impl<F: LapackScalar> BackendEigh<F> for LinAlgBackendProvider<'_, F> {
    fn eigh_upper(&self, matrix: &Array2<F>) -> Result<EighOutput<F>, ThreadSafeStdError> {
        let n = require_square(matrix)?;
        if n == 0 {
            return Ok(EighOutput { eigenvalues: Array1::zeros(0), eigenvectors: Array2::zeros((0, 0)) });
        }
        let (n_i, lda) = (lapack_int(n)?, leading_dim(n)?);
        let mut a = to_col_major(matrix);
        let mut w = vec![F::zero(); n];
        let mut info = 0;

        let mut query = [F::zero()];
        F::syev(self.backend, b'V', b'U', n_i, &mut a, lda, &mut w, &mut query, -1, &mut info);
        LapackError::check(F::SYEV, info)?;
        let lwork = queried_size(&query, 3 * n - 1);
        let mut work = vec![F::zero(); lwork];

        F::syev(self.backend, b'V', b'U', n_i, &mut a, lda, &mut w, &mut work, lapack_int(lwork)?, &mut info);
        LapackError::check(F::SYEV, info)?;

        Ok(EighOutput {
            eigenvalues: Array1::from_vec(w),
            eigenvectors: from_col_major(n, n, a)?,
        })
    }
}

impl<F: LapackScalar> BackendQR<F> for LinAlgBackendProvider<'_, F> {
    fn qr_q_factor(&self, matrix: &Array2<F>) -> Result<Array2<F>, ThreadSafeStdError> {
        let (m, n) = matrix.dim();
        let k = m.min(n);
        if k == 0 {
            return Ok(Array2::zeros((m, k).f()));
        }
        let (m_i, n_i, k_i, lda) = (lapack_int(m)?, lapack_int(n)?, lapack_int(k)?, leading_dim(m)?);
        let mut a = to_col_major(matrix);
        let mut tau = vec![F::zero(); k];
        let mut info = 0;

        let mut query = [F::zero()];
        F::geqrf(self.backend, m_i, n_i, &mut a, lda, &mut tau, &mut query, -1, &mut info);
        LapackError::check(F::GEQRF, info)?;
        let mut lwork = queried_size(&query, n);
        F::orgqr(self.backend, m_i, k_i, k_i, &mut a, lda, &tau, &mut query, -1, &mut info);
        LapackError::check(F::ORGQR, info)?;
        lwork = lwork.max(queried_size(&query, k));
        let mut work = vec![F::zero(); lwork];
        let lwork = lapack_int(lwork)?;

        F::geqrf(self.backend, m_i, n_i, &mut a, lda, &mut tau, &mut work, lwork, &mut info);
        LapackError::check(F::GEQRF, info)?;
        F::orgqr(self.backend, m_i, k_i, k_i, &mut a, lda, &tau, &mut work, lwork, &mut info);
        LapackError::check(F::ORGQR, info)?;

        a.truncate(m * k);
        Ok(from_col_major(m, k, a)?)
    }
}

impl<F: LapackScalar> BackendSVD<F> for LinAlgBackendProvider<'_, F> {
    fn svd_into(&self, matrix: Array2<F>, compute_u: bool, compute_v: bool) -> Result<SVDOutput<F>, ThreadSafeStdError> {
        let (m, n) = matrix.dim();
        let k = m.min(n);
        if k == 0 {
            return Ok(SVDOutput {
                u: compute_u.then(|| Array2::zeros((m, k).f())),
                s: Array1::zeros(0),
                vt: compute_v.then(|| Array2::zeros((k, n).f())),
            });
        }
        let (m_i, n_i, lda) = (lapack_int(m)?, lapack_int(n)?, leading_dim(m)?);
        let jobu = if compute_u { b'S' } else { b'N' };
        let jobvt = if compute_v { b'S' } else { b'N' };
        let (ldu, u_len) = if compute_u { (leading_dim(m)?, m * k) } else { (1, 1) };
        let (ldvt, vt_len) = if compute_v { (leading_dim(k)?, k * n) } else { (1, 1) };

        let mut a = to_col_major(&matrix);
        drop(matrix);
        let mut s = vec![F::zero(); k];
        let mut u = vec![F::zero(); u_len];
        let mut vt = vec![F::zero(); vt_len];
        let mut info = 0;

        let mut query = [F::zero()];
        F::gesvd(self.backend, jobu, jobvt, m_i, n_i, &mut a, lda, &mut s, &mut u, ldu, &mut vt, ldvt, &mut query, -1, &mut info);
        LapackError::check(F::GESVD, info)?;
        let lwork = queried_size(&query, (3 * k + m.max(n)).max(5 * k));
        let mut work = vec![F::zero(); lwork];

        F::gesvd(self.backend, jobu, jobvt, m_i, n_i, &mut a, lda, &mut s, &mut u, ldu, &mut vt, ldvt, &mut work, lapack_int(lwork)?, &mut info);
        LapackError::check(F::GESVD, info)?;

        Ok(SVDOutput {
            u: if compute_u { Some(from_col_major(m, k, u)?) } else { None },
            s: Array1::from_vec(s),
            vt: if compute_v { Some(from_col_major(k, n, vt)?) } else { None },
        })
    }
}

impl<F: LapackScalar> BackendLU<F> for LinAlgBackendProvider<'_, F> {
    fn lu(&self, matrix: &Array2<F>) -> Result<LuOutput<F>, ThreadSafeStdError> {
        let (m, n) = matrix.dim();
        let k = m.min(n);
        if k == 0 {
            return Ok(LuOutput { factors: matrix.clone(), pivots: Vec::new() });
        }
        let mut a = to_col_major(matrix);
        let mut ipiv = vec![0_i32; k];
        let mut info = 0;
        F::getrf(self.backend, lapack_int(m)?, lapack_int(n)?, &mut a, leading_dim(m)?, &mut ipiv, &mut info);
        LapackError::check(F::GETRF, info)?;

        Ok(LuOutput {
            factors: from_col_major(m, n, a)?,
            pivots: ipiv.iter().map(|&p| (p - 1) as usize).collect(),
        })
    }
}

impl<F: LapackScalar> BackendCholesky<F> for LinAlgBackendProvider<'_, F> {
    fn cholesky_lower(&self, matrix: &Array2<F>) -> Result<Array2<F>, ThreadSafeStdError> {
        let n = require_square(matrix)?;
        if n == 0 {
            return Ok(Array2::zeros((0, 0)));
        }
        let mut a = to_col_major(matrix);
        let mut info = 0;
        F::potrf(self.backend, b'L', lapack_int(n)?, &mut a, leading_dim(n)?, &mut info);
        LapackError::check(F::POTRF, info)?;

        let mut factor = from_col_major(n, n, a)?;
        for ((i, j), value) in factor.indexed_iter_mut() {
            if j > i {
                *value = F::zero();
            }
        }
        Ok(factor)
    }
}

impl<F: LapackScalar> BackendSolve<F> for LinAlgBackendProvider<'_, F> {
    fn solve(&self, a: &Array2<F>, b: &Array2<F>) -> Result<Array2<F>, ThreadSafeStdError> {
        let n = require_square(a)?;
        let nrhs = b.ncols();
        if b.nrows() != n {
            return Err(LapackError::DimensionMismatch { expected: n, found: b.nrows() }.into());
        }
        if n == 0 || nrhs == 0 {
            return Ok(Array2::zeros((n, nrhs).f()));
        }
        let lda = leading_dim(n)?;
        let mut lu = to_col_major(a);
        let mut x = to_col_major(b);
        let mut ipiv = vec![0_i32; n];
        let mut info = 0;
        F::gesv(self.backend, lapack_int(n)?, lapack_int(nrhs)?, &mut lu, lda, &mut ipiv, &mut x, lda, &mut info);
        LapackError::check(F::GESV, info)?;
        Ok(from_col_major(n, nrhs, x)?)
    }

    fn rcond(&self, a: &Array2<F>) -> Result<F, ThreadSafeStdError> {
        let n = require_square(a)?;
        if n == 0 {
            return Ok(F::infinity());
        }
        let (n_i, lda) = (lapack_int(n)?, leading_dim(n)?);
        let mut lu = to_col_major(a);
        let mut work = vec![F::zero(); 4 * n];
        let mut iwork = vec![0_i32; n];
        let anorm = F::lange(self.backend, b'1', n_i, n_i, &lu, lda, &mut work);

        let mut ipiv = vec![0_i32; n];
        let mut info = 0;
        F::getrf(self.backend, n_i, n_i, &mut lu, lda, &mut ipiv, &mut info);
        if info > 0 {
            // Exactly singular.
            return Ok(F::zero());
        }
        LapackError::check(F::GETRF, info)?;

        let mut rcond = F::zero();
        F::gecon(self.backend, b'1', n_i, &lu, lda, anorm, &mut rcond, &mut work, &mut iwork, &mut info);
        LapackError::check(F::GECON, info)?;
        Ok(rcond)
    }
}
