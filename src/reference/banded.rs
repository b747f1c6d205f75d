// src/reference/banded.rs

//! Band and tridiagonal solvers.
//!
//! Band storage follows LAPACK: `A(i, j)` lives at `AB(kl + ku + 1 + i - j, j)`
//! (1-based), with the top `kl` rows reserved for fill-in produced by row
//! interchanges. The loops below are written in 1-based indices through
//! [`band`] to keep the index arithmetic recognisable.

use super::scalar::Real;
use super::{lsame, max1};

/// Flat offset of 1-based `(row, col)` in a column-major array.
#[inline]
fn band(row: usize, col: usize, ld: usize) -> usize {
    (row - 1) + (col - 1) * ld
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn gbtrf<T: Real>(
    m: i32,
    n: i32,
    kl: i32,
    ku: i32,
    ab: &mut [T],
    ldab: i32,
    ipiv: &mut [i32],
    info: &mut i32,
) {
    *info = 0;
    if m < 0 {
        *info = -1;
    } else if n < 0 {
        *info = -2;
    } else if kl < 0 {
        *info = -3;
    } else if ku < 0 {
        *info = -4;
    } else if ldab < 2 * kl + ku + 1 {
        *info = -6;
    }
    if *info != 0 || m == 0 || n == 0 {
        return;
    }

    let (m, n, kl, ku, ld) = (m as usize, n as usize, kl as usize, ku as usize, ldab as usize);
    let kv = ku + kl;

    // Zero the fill-in rows of the first kv columns.
    for j in ku + 2..=kv.min(n) {
        for i in kv - j + 2..=kl {
            ab[band(i, j, ld)] = T::zero();
        }
    }

    let mut ju = 1;
    for j in 1..=m.min(n) {
        if j + kv <= n {
            for i in 1..=kl {
                ab[band(i, j + kv, ld)] = T::zero();
            }
        }

        let km = kl.min(m - j);
        let mut jp = 1;
        let mut max = ab[band(kv + 1, j, ld)].abs();
        for r in 2..=km + 1 {
            let v = ab[band(kv + r, j, ld)].abs();
            if v > max {
                max = v;
                jp = r;
            }
        }
        ipiv[j - 1] = (jp + j - 1) as i32;

        if ab[band(kv + jp, j, ld)] != T::zero() {
            ju = ju.max((j + ku + jp - 1).min(n));

            // Rows j and j+jp-1 share the diagonal walk of stride ldab-1.
            if jp != 1 {
                for t in 0..=ju - j {
                    ab.swap(band(kv + jp - t, j + t, ld), band(kv + 1 - t, j + t, ld));
                }
            }
            if km > 0 {
                let r = T::one() / ab[band(kv + 1, j, ld)];
                for i in 0..km {
                    ab[band(kv + 2 + i, j, ld)] *= r;
                }
                for c in 0..ju - j {
                    let y = ab[band(kv - c, j + 1 + c, ld)];
                    if y != T::zero() {
                        for i in 0..km {
                            let x = ab[band(kv + 2 + i, j, ld)];
                            ab[band(kv + 1 + i - c, j + 1 + c, ld)] -= x * y;
                        }
                    }
                }
            }
        } else if *info == 0 {
            *info = j as i32;
        }
    }
}

/// Solves `U * x = b` or `U**T * x = b` for the upper band factor with `k`
/// superdiagonals.
fn tbsv_upper<T: Real>(transpose: bool, n: usize, k: usize, ab: &[T], ld: usize, x: &mut [T]) {
    if !transpose {
        for j in (1..=n).rev() {
            if x[j - 1] != T::zero() {
                x[j - 1] /= ab[band(k + 1, j, ld)];
                let t = x[j - 1];
                for i in j.saturating_sub(k).max(1)..j {
                    x[i - 1] -= t * ab[band(k + 1 + i - j, j, ld)];
                }
            }
        }
    } else {
        for j in 1..=n {
            let mut t = x[j - 1];
            for i in j.saturating_sub(k).max(1)..j {
                t -= ab[band(k + 1 + i - j, j, ld)] * x[i - 1];
            }
            x[j - 1] = t / ab[band(k + 1, j, ld)];
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn gb_solve<T: Real>(
    transpose: bool,
    n: usize,
    kl: usize,
    ku: usize,
    nrhs: usize,
    ab: &[T],
    ld: usize,
    ipiv: &[i32],
    b: &mut [T],
    ldb: usize,
) {
    let kd = ku + kl + 1;
    if !transpose {
        if kl > 0 {
            for j in 1..n {
                let lm = kl.min(n - j);
                let l = ipiv[j - 1] as usize;
                for c in 1..=nrhs {
                    if l != j {
                        b.swap(band(l, c, ldb), band(j, c, ldb));
                    }
                    let bj = b[band(j, c, ldb)];
                    for i in 1..=lm {
                        b[band(j + i, c, ldb)] -= ab[band(kd + i, j, ld)] * bj;
                    }
                }
            }
        }
        for c in 1..=nrhs {
            let col = &mut b[(c - 1) * ldb..(c - 1) * ldb + n];
            tbsv_upper(false, n, kl + ku, ab, ld, col);
        }
    } else {
        for c in 1..=nrhs {
            let col = &mut b[(c - 1) * ldb..(c - 1) * ldb + n];
            tbsv_upper(true, n, kl + ku, ab, ld, col);
        }
        if kl > 0 {
            for j in (1..n).rev() {
                let lm = kl.min(n - j);
                let l = ipiv[j - 1] as usize;
                for c in 1..=nrhs {
                    let mut acc = b[band(j, c, ldb)];
                    for i in 1..=lm {
                        acc -= b[band(j + i, c, ldb)] * ab[band(kd + i, j, ld)];
                    }
                    b[band(j, c, ldb)] = acc;
                    if l != j {
                        b.swap(band(l, c, ldb), band(j, c, ldb));
                    }
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn gbtrs<T: Real>(
    trans: u8,
    n: i32,
    kl: i32,
    ku: i32,
    nrhs: i32,
    ab: &[T],
    ldab: i32,
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
    } else if kl < 0 {
        *info = -3;
    } else if ku < 0 {
        *info = -4;
    } else if nrhs < 0 {
        *info = -5;
    } else if ldab < 2 * kl + ku + 1 {
        *info = -7;
    } else if ldb < max1(n) {
        *info = -10;
    }
    if *info != 0 || n == 0 || nrhs == 0 {
        return;
    }
    gb_solve(
        !notran,
        n as usize,
        kl as usize,
        ku as usize,
        nrhs as usize,
        ab,
        ldab as usize,
        ipiv,
        b,
        ldb as usize,
    );
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn gbsv<T: Real>(
    n: i32,
    kl: i32,
    ku: i32,
    nrhs: i32,
    ab: &mut [T],
    ldab: i32,
    ipiv: &mut [i32],
    b: &mut [T],
    ldb: i32,
    info: &mut i32,
) {
    *info = 0;
    if n < 0 {
        *info = -1;
    } else if kl < 0 {
        *info = -2;
    } else if ku < 0 {
        *info = -3;
    } else if nrhs < 0 {
        *info = -4;
    } else if ldab < 2 * kl + ku + 1 {
        *info = -6;
    } else if ldb < max1(n) {
        *info = -9;
    }
    if *info != 0 {
        return;
    }
    gbtrf(n, n, kl, ku, ab, ldab, ipiv, info);
    if *info == 0 && n > 0 && nrhs > 0 {
        gb_solve(
            false,
            n as usize,
            kl as usize,
            ku as usize,
            nrhs as usize,
            ab,
            ldab as usize,
            ipiv,
            b,
            ldb as usize,
        );
    }
}

/// Gaussian elimination with partial pivoting on a tridiagonal system.
/// On exit `dl` holds the second superdiagonal of `U`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn gtsv<T: Real>(
    n: i32,
    nrhs: i32,
    dl: &mut [T],
    d: &mut [T],
    du: &mut [T],
    b: &mut [T],
    ldb: i32,
    info: &mut i32,
) {
    *info = 0;
    if n < 0 {
        *info = -1;
    } else if nrhs < 0 {
        *info = -2;
    } else if ldb < max1(n) {
        *info = -7;
    }
    if *info != 0 || n == 0 {
        return;
    }

    let (n, nrhs, ldb) = (n as usize, nrhs as usize, ldb as usize);
    let bx = |i: usize, j: usize| i + j * ldb;

    for i in 0..n - 1 {
        let last = i == n - 2;
        if d[i].abs() >= dl[i].abs() {
            if d[i] == T::zero() {
                *info = (i + 1) as i32;
                return;
            }
            let fact = dl[i] / d[i];
            d[i + 1] -= fact * du[i];
            for j in 0..nrhs {
                let bi = b[bx(i, j)];
                b[bx(i + 1, j)] -= fact * bi;
            }
            if !last {
                dl[i] = T::zero();
            }
        } else {
            let fact = d[i] / dl[i];
            d[i] = dl[i];
            let temp = d[i + 1];
            d[i + 1] = du[i] - fact * temp;
            if !last {
                dl[i] = du[i + 1];
                du[i + 1] = -fact * dl[i];
            }
            du[i] = temp;
            for j in 0..nrhs {
                let temp = b[bx(i, j)];
                b[bx(i, j)] = b[bx(i + 1, j)];
                b[bx(i + 1, j)] = temp - fact * b[bx(i + 1, j)];
            }
        }
    }
    if d[n - 1] == T::zero() {
        *info = n as i32;
        return;
    }

    for j in 0..nrhs {
        b[bx(n - 1, j)] /= d[n - 1];
        if n > 1 {
            b[bx(n - 2, j)] = (b[bx(n - 2, j)] - du[n - 2] * b[bx(n - 1, j)]) / d[n - 2];
        }
        for i in (0..n.saturating_sub(2)).rev() {
            b[bx(i, j)] = (b[bx(i, j)] - du[i] * b[bx(i + 1, j)] - dl[i] * b[bx(i + 2, j)]) / d[i];
        }
    }
}
