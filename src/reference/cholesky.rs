// src/reference/cholesky.rs

use super::scalar::Real;
use super::triangular::tri_solve;
use super::{at, lsame, max1};

/// Offset of `(i, j)` in packed storage; `i <= j` for upper, `i >= j` for lower.
#[inline]
fn packed(upper: bool, n: usize, i: usize, j: usize) -> usize {
    if upper {
        i + j * (j + 1) / 2
    } else {
        i + j * (2 * n - j - 1) / 2
    }
}

/// Unblocked Cholesky over any storage addressed by `idx`. Returns the
/// LAPACK status: 0, or the order of the leading minor that is not positive
/// definite.
fn factor_in_place<T: Real>(upper: bool, n: usize, data: &mut [T], idx: impl Fn(usize, usize) -> usize) -> i32 {
    // Upper computes U with A = U**T * U, addressing (k, j) for k <= j;
    // lower computes L with A = L * L**T, addressing (j, k) for j >= k.
    let tri = |i: usize, j: usize| if upper { idx(i, j) } else { idx(j, i) };
    for j in 0..n {
        let mut ajj = data[tri(j, j)];
        for k in 0..j {
            let v = data[tri(k, j)];
            ajj -= v * v;
        }
        if ajj <= T::zero() || ajj.is_nan() {
            data[tri(j, j)] = ajj;
            return (j + 1) as i32;
        }
        let ajj = ajj.sqrt();
        data[tri(j, j)] = ajj;
        for c in j + 1..n {
            let mut v = data[tri(j, c)];
            for k in 0..j {
                v -= data[tri(k, j)] * data[tri(k, c)];
            }
            data[tri(j, c)] = v / ajj;
        }
    }
    0
}

/// Solves `A * X = B` given the Cholesky factor read through `tri`.
fn chol_solve<T: Real>(upper: bool, n: usize, nrhs: usize, tri: impl Fn(usize, usize) -> T + Copy, b: &mut [T], ldb: usize) {
    if upper {
        tri_solve(true, true, false, n, nrhs, tri, b, ldb);
        tri_solve(true, false, false, n, nrhs, tri, b, ldb);
    } else {
        tri_solve(false, false, false, n, nrhs, tri, b, ldb);
        tri_solve(false, true, false, n, nrhs, tri, b, ldb);
    }
}

pub(crate) fn potrf<T: Real>(uplo: u8, n: i32, a: &mut [T], lda: i32, info: &mut i32) {
    *info = 0;
    let upper = lsame(uplo, b'U');
    if !upper && !lsame(uplo, b'L') {
        *info = -1;
    } else if n < 0 {
        *info = -2;
    } else if lda < max1(n) {
        *info = -4;
    }
    if *info != 0 || n == 0 {
        return;
    }
    let lda = lda as usize;
    *info = factor_in_place(upper, n as usize, a, |i, j| at(i, j, lda));
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn potrs<T: Real>(
    uplo: u8,
    n: i32,
    nrhs: i32,
    a: &[T],
    lda: i32,
    b: &mut [T],
    ldb: i32,
    info: &mut i32,
) {
    *info = 0;
    let upper = lsame(uplo, b'U');
    if !upper && !lsame(uplo, b'L') {
        *info = -1;
    } else if n < 0 {
        *info = -2;
    } else if nrhs < 0 {
        *info = -3;
    } else if lda < max1(n) {
        *info = -5;
    } else if ldb < max1(n) {
        *info = -7;
    }
    if *info != 0 || n == 0 || nrhs == 0 {
        return;
    }
    let lda = lda as usize;
    chol_solve(upper, n as usize, nrhs as usize, |i, j| a[at(i, j, lda)], b, ldb as usize);
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn posv<T: Real>(
    uplo: u8,
    n: i32,
    nrhs: i32,
    a: &mut [T],
    lda: i32,
    b: &mut [T],
    ldb: i32,
    info: &mut i32,
) {
    *info = 0;
    let upper = lsame(uplo, b'U');
    if !upper && !lsame(uplo, b'L') {
        *info = -1;
    } else if n < 0 {
        *info = -2;
    } else if nrhs < 0 {
        *info = -3;
    } else if lda < max1(n) {
        *info = -5;
    } else if ldb < max1(n) {
        *info = -7;
    }
    if *info != 0 {
        return;
    }
    potrf(uplo, n, a, lda, info);
    if *info == 0 && n > 0 && nrhs > 0 {
        let lda = lda as usize;
        let a = &*a;
        chol_solve(upper, n as usize, nrhs as usize, |i, j| a[at(i, j, lda)], b, ldb as usize);
    }
}

pub(crate) fn pptrf<T: Real>(uplo: u8, n: i32, ap: &mut [T], info: &mut i32) {
    *info = 0;
    let upper = lsame(uplo, b'U');
    if !upper && !lsame(uplo, b'L') {
        *info = -1;
    } else if n < 0 {
        *info = -2;
    }
    if *info != 0 || n == 0 {
        return;
    }
    let n = n as usize;
    *info = factor_in_place(upper, n, ap, |i, j| packed(upper, n, i, j));
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn pptrs<T: Real>(
    uplo: u8,
    n: i32,
    nrhs: i32,
    ap: &[T],
    b: &mut [T],
    ldb: i32,
    info: &mut i32,
) {
    *info = 0;
    let upper = lsame(uplo, b'U');
    if !upper && !lsame(uplo, b'L') {
        *info = -1;
    } else if n < 0 {
        *info = -2;
    } else if nrhs < 0 {
        *info = -3;
    } else if ldb < max1(n) {
        *info = -6;
    }
    if *info != 0 || n == 0 || nrhs == 0 {
        return;
    }
    let n = n as usize;
    chol_solve(upper, n, nrhs as usize, |i, j| ap[packed(upper, n, i, j)], b, ldb as usize);
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn ppsv<T: Real>(
    uplo: u8,
    n: i32,
    nrhs: i32,
    ap: &mut [T],
    b: &mut [T],
    ldb: i32,
    info: &mut i32,
) {
    *info = 0;
    let upper = lsame(uplo, b'U');
    if !upper && !lsame(uplo, b'L') {
        *info = -1;
    } else if n < 0 {
        *info = -2;
    } else if nrhs < 0 {
        *info = -3;
    } else if ldb < max1(n) {
        *info = -6;
    }
    if *info != 0 {
        return;
    }
    pptrf(uplo, n, ap, info);
    if *info == 0 && n > 0 && nrhs > 0 {
        let n = n as usize;
        let ap = &*ap;
        chol_solve(upper, n, nrhs as usize, |i, j| ap[packed(upper, n, i, j)], b, ldb as usize);
    }
}
