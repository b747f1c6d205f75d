// src/reference/lu.rs

use super::auxiliary::{lamch, laswp};
use super::scalar::Real;
use super::triangular::tri_solve;
use super::{at, lsame, max1, set_work_size};

/// Unblocked right-looking LU with partial pivoting.
pub(crate) fn getrf<T: Real>(m: i32, n: i32, a: &mut [T], lda: i32, ipiv: &mut [i32], info: &mut i32) {
    *info = 0;
    if m < 0 {
        *info = -1;
    } else if n < 0 {
        *info = -2;
    } else if lda < max1(m) {
        *info = -4;
    }
    if *info != 0 || m == 0 || n == 0 {
        return;
    }

    let (m, n, lda) = (m as usize, n as usize, lda as usize);
    let sfmin = lamch::<T>(b'S');
    for j in 0..m.min(n) {
        let mut p = j;
        let mut max = a[at(j, j, lda)].abs();
        for i in j + 1..m {
            let v = a[at(i, j, lda)].abs();
            if v > max {
                max = v;
                p = i;
            }
        }
        ipiv[j] = (p + 1) as i32;

        if a[at(p, j, lda)] != T::zero() {
            if p != j {
                for c in 0..n {
                    a.swap(at(j, c, lda), at(p, c, lda));
                }
            }
            let pivot = a[at(j, j, lda)];
            if pivot.abs() >= sfmin {
                let r = T::one() / pivot;
                for i in j + 1..m {
                    a[at(i, j, lda)] *= r;
                }
            } else {
                for i in j + 1..m {
                    a[at(i, j, lda)] /= pivot;
                }
            }
        } else if *info == 0 {
            *info = (j + 1) as i32;
        }

        for c in j + 1..n {
            let t = a[at(j, c, lda)];
            if t != T::zero() {
                for i in j + 1..m {
                    let l = a[at(i, j, lda)];
                    a[at(i, c, lda)] -= l * t;
                }
            }
        }
    }
}

/// Solves with the factors of [`getrf`] already in place.
#[allow(clippy::too_many_arguments)]
fn lu_solve<T: Real>(transpose: bool, n: usize, nrhs: usize, a: &[T], lda: usize, ipiv: &[i32], b: &mut [T], ldb: usize) {
    let lu = |i: usize, j: usize| a[at(i, j, lda)];
    let (ni, nrhs_i, ldb_i) = (n as i32, nrhs as i32, ldb as i32);
    if !transpose {
        laswp(nrhs_i, b, ldb_i, 1, ni, ipiv, 1);
        tri_solve(false, false, true, n, nrhs, lu, b, ldb);
        tri_solve(true, false, false, n, nrhs, lu, b, ldb);
    } else {
        tri_solve(true, true, false, n, nrhs, lu, b, ldb);
        tri_solve(false, true, true, n, nrhs, lu, b, ldb);
        laswp(nrhs_i, b, ldb_i, 1, ni, ipiv, -1);
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn getrs<T: Real>(
    trans: u8,
    n: i32,
    nrhs: i32,
    a: &[T],
    lda: i32,
    ipiv: &[i32],
    b: &mut [T],
    ldb: i32,
    info: &mut i32,
) {
    *info = 0;
    let notran = lsame(trans, b'N');
    if !notran && !lsame(trans, b'T') && !lsame(trans, b'C') {
        *info = -1;
    } else if n < 0 {
        *info = -2;
    } else if nrhs < 0 {
        *info = -3;
    } else if lda < max1(n) {
        *info = -5;
    } else if ldb < max1(n) {
        *info = -8;
    }
    if *info != 0 || n == 0 || nrhs == 0 {
        return;
    }
    lu_solve(!notran, n as usize, nrhs as usize, a, lda as usize, ipiv, b, ldb as usize);
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn gesv<T: Real>(
    n: i32,
    nrhs: i32,
    a: &mut [T],
    lda: i32,
    ipiv: &mut [i32],
    b: &mut [T],
    ldb: i32,
    info: &mut i32,
) {
    *info = 0;
    if n < 0 {
        *info = -1;
    } else if nrhs < 0 {
        *info = -2;
    } else if lda < max1(n) {
        *info = -4;
    } else if ldb < max1(n) {
        *info = -7;
    }
    if *info != 0 {
        return;
    }
    getrf(n, n, a, lda, ipiv, info);
    if *info == 0 && n > 0 && nrhs > 0 {
        lu_solve(false, n as usize, nrhs as usize, a, lda as usize, ipiv, b, ldb as usize);
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn getri<T: Real>(
    n: i32,
    a: &mut [T],
    lda: i32,
    ipiv: &[i32],
    work: &mut [T],
    lwork: i32,
    info: &mut i32,
) {
    *info = 0;
    let lwkopt = max1(n);
    set_work_size(work, lwkopt as usize);
    let lquery = lwork == -1;
    if n < 0 {
        *info = -1;
    } else if lda < max1(n) {
        *info = -3;
    } else if lwork < max1(n) && !lquery {
        *info = -6;
    }
    if *info != 0 || lquery || n == 0 {
        return;
    }

    let (n, lda) = (n as usize, lda as usize);
    if let Some(i) = (0..n).find(|&i| a[at(i, i, lda)] == T::zero()) {
        *info = (i + 1) as i32;
        return;
    }

    // inv(U) in place, column by column.
    for j in 0..n {
        let ajj_inv = T::one() / a[at(j, j, lda)];
        a[at(j, j, lda)] = ajj_inv;
        let ajj = -ajj_inv;
        // x := triu(A(0..j, 0..j)) * x with x = A(0..j, j).
        for jj in 0..j {
            let t = a[at(jj, j, lda)];
            if t != T::zero() {
                for i in 0..jj {
                    let u = a[at(i, jj, lda)];
                    a[at(i, j, lda)] += t * u;
                }
                let d = a[at(jj, jj, lda)];
                a[at(jj, j, lda)] *= d;
            }
        }
        for i in 0..j {
            a[at(i, j, lda)] *= ajj;
        }
    }

    // Solve inv(A) * L = inv(U) for inv(A).
    for j in (0..n).rev() {
        for i in j + 1..n {
            work[i] = a[at(i, j, lda)];
            a[at(i, j, lda)] = T::zero();
        }
        for k in j + 1..n {
            let w = work[k];
            if w != T::zero() {
                for r in 0..n {
                    let v = a[at(r, k, lda)];
                    a[at(r, j, lda)] -= v * w;
                }
            }
        }
    }

    for j in (0..n.saturating_sub(1)).rev() {
        let jp = (ipiv[j] - 1) as usize;
        if jp != j {
            for r in 0..n {
                a.swap(at(r, j, lda), at(r, jp, lda));
            }
        }
    }
    set_work_size(work, lwkopt as usize);
}

/// Reciprocal condition number in the one or infinity norm.
///
/// The norm of `inv(A)` is computed exactly from the LU factors rather than
/// estimated, so `rcond` is never larger than the true value.
#[allow(clippy::too_many_arguments)]
pub(crate) fn gecon<T: Real>(
    norm: u8,
    n: i32,
    a: &[T],
    lda: i32,
    anorm: T,
    rcond: &mut T,
    work: &mut [T],
    _iwork: &mut [i32],
    info: &mut i32,
) {
    *info = 0;
    let onenrm = norm == b'1' || lsame(norm, b'O');
    if !onenrm && !lsame(norm, b'I') {
        *info = -1;
    } else if n < 0 {
        *info = -2;
    } else if lda < max1(n) {
        *info = -4;
    } else if anorm < T::zero() || anorm.is_nan() {
        *info = -5;
    }
    if *info != 0 {
        return;
    }

    *rcond = T::zero();
    if n == 0 {
        *rcond = T::one();
        return;
    }
    if anorm == T::zero() {
        return;
    }

    let (n, lda) = (n as usize, lda as usize);
    let lu = |i: usize, j: usize| a[at(i, j, lda)];
    let x = &mut work[..n];
    let mut ainvnm = T::zero();
    // Row interchanges permute the columns of inv(A) only, which leaves both
    // the largest column sum and the largest row sum unchanged.
    for j in 0..n {
        x.iter_mut().for_each(|v| *v = T::zero());
        x[j] = T::one();
        if onenrm {
            tri_solve(false, false, true, n, 1, lu, x, n);
            tri_solve(true, false, false, n, 1, lu, x, n);
        } else {
            tri_solve(true, true, false, n, 1, lu, x, n);
            tri_solve(false, true, true, n, 1, lu, x, n);
        }
        let sum = x.iter().fold(T::zero(), |acc, v| acc + v.abs());
        if sum > ainvnm || sum.is_nan() {
            ainvnm = sum;
        }
    }

    if ainvnm != T::zero() && ainvnm.is_finite() {
        *rcond = (T::one() / ainvnm) / anorm;
    }
}
