// src/reference/svd.rs

//! Singular value decomposition by one-sided (Hestenes) Jacobi.
//!
//! The rotations orthogonalise the columns of `X`, which is `A` or `A**T`
//! viewed in place in `a`. Afterwards the normalised columns of `X` are one
//! set of singular vectors and the accumulated rotation `Q` is the other.
//! `Q` is accumulated directly in `u` or `vt`, so no workspace beyond the
//! column norms is needed.

use super::auxiliary::lamch;
use super::scalar::Real;
use super::strided::StridedMut;
use super::{at, lsame, max1, set_work_size};

const MAX_SWEEPS: usize = 60;

/// Whether columns `j` and `k` still need a rotation. A column whose squared
/// norm is below `negligible` counts as converged against every other: once
/// `X` has more columns than rows the surplus columns only shrink towards
/// zero, and the relative test never accepts them.
fn coupled<T: Real>(x: &StridedMut<'_, T>, j: usize, k: usize, tol: T, negligible: T) -> bool {
    let alpha = x.col_dot(j, j);
    let beta = x.col_dot(k, k);
    if alpha <= negligible || beta <= negligible {
        return false;
    }
    let gamma = x.col_dot(j, k);
    gamma != T::zero() && gamma.abs() > tol * (alpha * beta).sqrt()
}

/// Rotates column pairs of `x` until all are orthogonal to working
/// precision, applying the same rotations to `q`. Returns the number of
/// columns still coupled to another when the sweep limit is hit.
fn jacobi_sweeps<T: Real>(x: &mut StridedMut<'_, T>, mut q: Option<&mut StridedMut<'_, T>>) -> usize {
    let cols = x.cols();
    let tol = T::epsilon() * T::from_usize(x.rows().max(1));
    // Rotations preserve the Frobenius norm, so the floor is fixed up front.
    let frobenius2 = (0..cols).fold(T::zero(), |acc, j| acc + x.col_dot(j, j));
    let floor = T::epsilon() * T::from_usize(x.rows() + cols);
    let negligible = floor * floor * frobenius2;
    if let Some(q) = q.as_deref_mut() {
        q.set_identity();
    }

    for _ in 0..MAX_SWEEPS {
        let mut rotated = false;
        for j in 0..cols.saturating_sub(1) {
            for k in j + 1..cols {
                if !coupled(x, j, k, tol, negligible) {
                    continue;
                }
                rotated = true;
                let alpha = x.col_dot(j, j);
                let beta = x.col_dot(k, k);
                let gamma = x.col_dot(j, k);
                let zeta = (beta - alpha) / (T::two() * gamma);
                let sign = if zeta >= T::zero() { T::one() } else { -T::one() };
                let t = sign / (zeta.abs() + T::one().hypot(zeta));
                let c = T::one() / T::one().hypot(t);
                let s = c * t;
                x.rotate_cols(j, k, c, s);
                if let Some(q) = q.as_deref_mut() {
                    q.rotate_cols(j, k, c, s);
                }
            }
        }
        if !rotated {
            return 0;
        }
    }

    (0..cols)
        .filter(|&j| (0..cols).any(|k| k != j && coupled(x, j, k, tol, negligible)))
        .count()
}

/// Swaps the leading `rows x cols` blocks of two column-major buffers.
fn swap_blocks<T: Real>(rows: usize, cols: usize, a: &mut [T], lda: usize, b: &mut [T], ldb: usize) {
    for j in 0..cols {
        for i in 0..rows {
            std::mem::swap(&mut a[at(i, j, lda)], &mut b[at(i, j, ldb)]);
        }
    }
}

fn copy_block<T: Real>(rows: usize, cols: usize, src: &[T], lds: usize, dst: &mut [T], ldd: usize) {
    for j in 0..cols {
        for i in 0..rows {
            dst[at(i, j, ldd)] = src[at(i, j, lds)];
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn gesvd<T: Real>(
    jobu: u8,
    jobvt: u8,
    m: i32,
    n: i32,
    a: &mut [T],
    lda: i32,
    s: &mut [T],
    u: &mut [T],
    ldu: i32,
    vt: &mut [T],
    ldvt: i32,
    work: &mut [T],
    lwork: i32,
    info: &mut i32,
) {
    *info = 0;
    let minmn = m.min(n);
    let (wntua, wntus, wntuo, wntun) = (lsame(jobu, b'A'), lsame(jobu, b'S'), lsame(jobu, b'O'), lsame(jobu, b'N'));
    let (wntva, wntvs, wntvo, wntvn) = (lsame(jobvt, b'A'), lsame(jobvt, b'S'), lsame(jobvt, b'O'), lsame(jobvt, b'N'));
    let wntuas = wntua || wntus;
    let wntvas = wntva || wntvs;
    let lquery = lwork == -1;

    if !(wntua || wntus || wntuo || wntun) {
        *info = -1;
    } else if !(wntva || wntvs || wntvo || wntvn) || (wntvo && wntuo) {
        *info = -2;
    } else if m < 0 {
        *info = -3;
    } else if n < 0 {
        *info = -4;
    } else if lda < max1(m) {
        *info = -6;
    } else if ldu < 1 || (wntuas && ldu < m) {
        *info = -9;
    } else if ldvt < 1 || (wntva && ldvt < n) || (wntvs && ldvt < minmn) {
        *info = -11;
    }

    let minwrk = if minmn > 0 {
        (3 * minmn + m.max(n)).max(5 * minmn)
    } else {
        1
    };
    if *info == 0 {
        set_work_size(work, minwrk as usize);
        if lwork < minwrk && !lquery {
            *info = -13;
        }
    }
    if *info != 0 || lquery || m == 0 || n == 0 {
        return;
    }

    let (m, n, lda, ldu, ldvt) = (m as usize, n as usize, lda as usize, ldu as usize, ldvt as usize);
    let p = minmn as usize;

    // X = A leaves the left vectors in the columns of `a`, X = A**T leaves
    // the right vectors in its rows. Overwrite requests pick the side that
    // already matches; otherwise the thinner orientation wins.
    let transposed = if wntvo && wntun {
        true
    } else if wntuo && wntvn {
        false
    } else {
        m < n
    };

    let unconverged = {
        let mut x = if transposed {
            StridedMut::transposed(&mut *a, n, m, lda)
        } else {
            StridedMut::col_major(&mut *a, m, n, lda)
        };
        // Q is n x n holding V when X = A, and m x m holding U when X = A**T.
        let mut q = if !transposed && !wntvn {
            if wntvas {
                Some(StridedMut::transposed(&mut *vt, n, n, ldvt))
            } else {
                Some(StridedMut::transposed(&mut *u, n, n, ldu))
            }
        } else if transposed && !wntun {
            if wntuas {
                Some(StridedMut::col_major(&mut *u, m, m, ldu))
            } else {
                Some(StridedMut::col_major(&mut *vt, m, m, ldvt))
            }
        } else {
            None
        };

        let unconverged = jacobi_sweeps(&mut x, q.as_mut());

        let cols = x.cols();
        let norms = &mut work[..cols];
        for (j, norm) in norms.iter_mut().enumerate() {
            *norm = x.col_norm(j);
        }
        for i in 0..cols {
            let mut k = i;
            for j in i + 1..cols {
                if norms[j] > norms[k] {
                    k = j;
                }
            }
            if k != i {
                norms.swap(i, k);
                x.swap_cols(i, k);
                if let Some(q) = q.as_mut() {
                    q.swap_cols(i, k);
                }
            }
        }
        s[..p].copy_from_slice(&norms[..p]);

        let sfmin = lamch::<T>(b'S');
        for j in 0..p {
            if norms[j] > sfmin {
                x.scale_col(j, T::one() / norms[j]);
            } else {
                x.fill_orthonormal_col(j);
            }
        }
        unconverged
    };

    if !transposed {
        // Columns 0..p of `a` hold U; V**T sits in `vt`, or in `u` for jobvt = 'O'.
        if wntvo {
            swap_blocks(m, n, a, lda, u, ldu);
        } else if wntuas {
            copy_block(m, p, a, lda, u, ldu);
        }
        if wntua {
            let mut full = StridedMut::col_major(&mut *u, m, m, ldu);
            for j in p..m {
                full.fill_orthonormal_col(j);
            }
        }
    } else {
        // Rows 0..p of `a` hold V**T; U sits in `u`, or in `vt` for jobu = 'O'.
        if wntuo {
            swap_blocks(m, n, a, lda, vt, ldvt);
        } else if wntvas {
            copy_block(p, n, a, lda, vt, ldvt);
        }
        if wntva {
            let mut full = StridedMut::transposed(&mut *vt, n, n, ldvt);
            for j in p..n {
                full.fill_orthonormal_col(j);
            }
        }
    }

    if unconverged > 0 {
        *info = unconverged.min(p.saturating_sub(1)).max(1) as i32;
    }
    set_work_size(work, minwrk as usize);
}
