// src/reference/symmetric.rs

//! Symmetric eigensolver: Householder tridiagonalisation followed by the
//! implicit QL iteration, both accumulating into the `n x n` block of `a`.

use super::scalar::Real;
use super::{at, lsame, max1, set_work_size};

/// QL sweeps allowed per eigenvalue before giving up.
const MAX_QL_ITERATIONS: usize = 30;

/// Reduces the symmetric matrix held in full in `v` to tridiagonal form.
/// On exit `d` is the diagonal, `e[1..n]` the subdiagonal, and `v` the
/// accumulated orthogonal transformation.
fn tridiagonalize<T: Real>(n: usize, v: &mut [T], ldv: usize, d: &mut [T], e: &mut [T]) {
    let ix = move |i: usize, j: usize| at(i, j, ldv);

    for j in 0..n {
        d[j] = v[ix(n - 1, j)];
    }

    for i in (1..n).rev() {
        let mut scale = T::zero();
        let mut h = T::zero();
        for k in 0..i {
            scale += d[k].abs();
        }
        if scale == T::zero() {
            e[i] = d[i - 1];
            for j in 0..i {
                d[j] = v[ix(i - 1, j)];
                v[ix(i, j)] = T::zero();
                v[ix(j, i)] = T::zero();
            }
        } else {
            for k in 0..i {
                d[k] /= scale;
                h += d[k] * d[k];
            }
            let mut f = d[i - 1];
            let mut g = h.sqrt();
            if f > T::zero() {
                g = -g;
            }
            e[i] = scale * g;
            h -= f * g;
            d[i - 1] = f - g;
            for ej in e.iter_mut().take(i) {
                *ej = T::zero();
            }

            for j in 0..i {
                f = d[j];
                v[ix(j, i)] = f;
                g = e[j] + v[ix(j, j)] * f;
                for k in j + 1..i {
                    g += v[ix(k, j)] * d[k];
                    e[k] += v[ix(k, j)] * f;
                }
                e[j] = g;
            }
            f = T::zero();
            for j in 0..i {
                e[j] /= h;
                f += e[j] * d[j];
            }
            let hh = f / (h + h);
            for j in 0..i {
                e[j] -= hh * d[j];
            }
            for j in 0..i {
                f = d[j];
                g = e[j];
                for k in j..i {
                    v[ix(k, j)] -= f * e[k] + g * d[k];
                }
                d[j] = v[ix(i - 1, j)];
                v[ix(i, j)] = T::zero();
            }
        }
        d[i] = h;
    }

    for i in 0..n - 1 {
        v[ix(n - 1, i)] = v[ix(i, i)];
        v[ix(i, i)] = T::one();
        let h = d[i + 1];
        if h != T::zero() {
            for k in 0..=i {
                d[k] = v[ix(k, i + 1)] / h;
            }
            for j in 0..=i {
                let mut g = T::zero();
                for k in 0..=i {
                    g += v[ix(k, i + 1)] * v[ix(k, j)];
                }
                for k in 0..=i {
                    v[ix(k, j)] -= g * d[k];
                }
            }
        }
        for k in 0..=i {
            v[ix(k, i + 1)] = T::zero();
        }
    }
    for j in 0..n {
        d[j] = v[ix(n - 1, j)];
        v[ix(n - 1, j)] = T::zero();
    }
    v[ix(n - 1, n - 1)] = T::one();
    e[0] = T::zero();
}

/// Implicit QL on the tridiagonal `(d, e)`, rotating the columns of `v`
/// when `vectors` is set. Eigenvalues come back ascending. Returns the
/// number of off-diagonal entries that failed to converge.
fn ql_implicit<T: Real>(n: usize, d: &mut [T], e: &mut [T], v: &mut [T], ldv: usize, vectors: bool) -> usize {
    let ix = move |i: usize, j: usize| at(i, j, ldv);

    for i in 1..n {
        e[i - 1] = e[i];
    }
    e[n - 1] = T::zero();

    let eps = T::epsilon();
    let mut f = T::zero();
    let mut tst1 = T::zero();
    for l in 0..n {
        tst1 = tst1.max(d[l].abs() + e[l].abs());
        let mut m = l;
        while m < n - 1 && e[m].abs() > eps * tst1 {
            m += 1;
        }

        if m > l {
            let mut iter = 0;
            loop {
                iter += 1;
                if iter > MAX_QL_ITERATIONS {
                    return e[..n - 1].iter().filter(|x| **x != T::zero()).count();
                }

                let mut g = d[l];
                let mut p = (d[l + 1] - g) / (T::two() * e[l]);
                let mut r = p.hypot(T::one());
                if p < T::zero() {
                    r = -r;
                }
                d[l] = e[l] / (p + r);
                d[l + 1] = e[l] * (p + r);
                let dl1 = d[l + 1];
                let mut h = g - d[l];
                for di in d.iter_mut().take(n).skip(l + 2) {
                    *di -= h;
                }
                f += h;

                p = d[m];
                let mut c = T::one();
                let mut c2 = c;
                let mut c3 = c;
                let el1 = e[l + 1];
                let mut s = T::zero();
                let mut s2 = T::zero();
                for i in (l..m).rev() {
                    c3 = c2;
                    c2 = c;
                    s2 = s;
                    g = c * e[i];
                    h = c * p;
                    r = p.hypot(e[i]);
                    e[i + 1] = s * r;
                    s = e[i] / r;
                    c = p / r;
                    p = c * d[i] - s * g;
                    d[i + 1] = h + s * (c * g + s * d[i]);
                    if vectors {
                        for k in 0..n {
                            let hk = v[ix(k, i + 1)];
                            v[ix(k, i + 1)] = s * v[ix(k, i)] + c * hk;
                            v[ix(k, i)] = c * v[ix(k, i)] - s * hk;
                        }
                    }
                }
                p = -s * s2 * c3 * el1 * e[l] / dl1;
                e[l] = s * p;
                d[l] = c * p;

                if e[l].abs() <= eps * tst1 {
                    break;
                }
            }
        }
        d[l] += f;
        e[l] = T::zero();
    }

    // Selection sort, ascending, carrying the vectors along.
    for i in 0..n - 1 {
        let mut k = i;
        for j in i + 1..n {
            if d[j] < d[k] {
                k = j;
            }
        }
        if k != i {
            d.swap(i, k);
            if vectors {
                for r in 0..n {
                    v.swap(ix(r, i), ix(r, k));
                }
            }
        }
    }
    0
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn syev<T: Real>(
    jobz: u8,
    uplo: u8,
    n: i32,
    a: &mut [T],
    lda: i32,
    w: &mut [T],
    work: &mut [T],
    lwork: i32,
    info: &mut i32,
) {
    *info = 0;
    let wantz = lsame(jobz, b'V');
    let lower = lsame(uplo, b'L');
    let lquery = lwork == -1;
    let lwmin = max1(3 * n - 1);
    if !wantz && !lsame(jobz, b'N') {
        *info = -1;
    } else if !lower && !lsame(uplo, b'U') {
        *info = -2;
    } else if n < 0 {
        *info = -3;
    } else if lda < max1(n) {
        *info = -5;
    }
    if *info == 0 {
        set_work_size(work, lwmin as usize);
        if lwork < lwmin && !lquery {
            *info = -8;
        }
    }
    if *info != 0 || lquery || n == 0 {
        return;
    }

    let (n, lda) = (n as usize, lda as usize);
    if n == 1 {
        w[0] = a[0];
        set_work_size(work, 2);
        if wantz {
            a[0] = T::one();
        }
        return;
    }

    // Mirror the referenced triangle so the reduction sees the full matrix.
    for j in 0..n {
        for i in 0..j {
            if lower {
                a[at(i, j, lda)] = a[at(j, i, lda)];
            } else {
                a[at(j, i, lda)] = a[at(i, j, lda)];
            }
        }
    }

    let e = &mut work[..n];
    tridiagonalize(n, a, lda, w, e);
    let unconverged = ql_implicit(n, w, e, a, lda, wantz);
    if unconverged > 0 {
        *info = unconverged as i32;
    }
    set_work_size(work, lwmin as usize);
}
