// src/reference/triangular.rs

use super::scalar::Real;
use super::{at, lsame, max1};

/// Solves `op(A) * X = B` for triangular `A`, overwriting the `n x nrhs`
/// block of `b`.
///
/// `tri(i, j)` returns element `(i, j)` of `A`; it is only asked for entries
/// of the referenced triangle (and the diagonal when `unit` is false), so the
/// same solver serves full and packed storage.
pub(crate) fn tri_solve<T: Real>(
    upper: bool,
    trans: bool,
    unit: bool,
    n: usize,
    nrhs: usize,
    tri: impl Fn(usize, usize) -> T,
    b: &mut [T],
    ldb: usize,
) {
    for k in 0..nrhs {
        let x = &mut b[k * ldb..k * ldb + n];
        match (upper, trans) {
            (true, false) => {
                for j in (0..n).rev() {
                    if x[j] != T::zero() {
                        if !unit {
                            x[j] /= tri(j, j);
                        }
                        let t = x[j];
                        for i in 0..j {
                            x[i] -= t * tri(i, j);
                        }
                    }
                }
            }
            (false, false) => {
                for j in 0..n {
                    if x[j] != T::zero() {
                        if !unit {
                            x[j] /= tri(j, j);
                        }
                        let t = x[j];
                        for i in j + 1..n {
                            x[i] -= t * tri(i, j);
                        }
                    }
                }
            }
            (true, true) => {
                for j in 0..n {
                    let mut t = x[j];
                    for i in 0..j {
                        t -= tri(i, j) * x[i];
                    }
                    if !unit {
                        t /= tri(j, j);
                    }
                    x[j] = t;
                }
            }
            (false, true) => {
                for j in (0..n).rev() {
                    let mut t = x[j];
                    for i in j + 1..n {
                        t -= tri(i, j) * x[i];
                    }
                    if !unit {
                        t /= tri(j, j);
                    }
                    x[j] = t;
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn trtrs<T: Real>(
    uplo: u8,
    trans: u8,
    diag: u8,
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
    let nounit = lsame(diag, b'N');
    if !upper && !lsame(uplo, b'L') {
        *info = -1;
    } else if !lsame(trans, b'N') && !lsame(trans, b'T') && !lsame(trans, b'C') {
        *info = -2;
    } else if !nounit && !lsame(diag, b'U') {
        *info = -3;
    } else if n < 0 {
        *info = -4;
    } else if nrhs < 0 {
        *info = -5;
    } else if lda < max1(n) {
        *info = -7;
    } else if ldb < max1(n) {
        *info = -9;
    }
    if *info != 0 || n == 0 {
        return;
    }

    let (n, nrhs, lda, ldb) = (n as usize, nrhs as usize, lda as usize, ldb as usize);
    if nounit {
        if let Some(i) = (0..n).find(|&i| a[at(i, i, lda)] == T::zero()) {
            *info = (i + 1) as i32;
            return;
        }
    }
    tri_solve(
        upper,
        !lsame(trans, b'N'),
        !nounit,
        n,
        nrhs,
        |i, j| a[at(i, j, lda)],
        b,
        ldb,
    );
}
