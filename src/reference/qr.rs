// src/reference/qr.rs

//! Householder QR. Reflector `H(i) = I - tau * v * v**T` keeps `v(0) = 1`
//! implicit; the rest of `v` sits below the diagonal of column `i`.

use super::auxiliary::lamch;
use super::scalar::Real;
use super::{at, lsame, max1, set_work_size};

fn nrm2<T: Real>(x: &[T]) -> T {
    let (mut scale, mut ssq) = (T::zero(), T::one());
    for &v in x {
        super::auxiliary::lassq_update(&mut scale, &mut ssq, v);
    }
    scale * ssq.sqrt()
}

/// Generates an elementary reflector mapping `(alpha, x)` to `(beta, 0)`.
/// Overwrites `alpha` with `beta`, `x` with `v(1..)`, and returns `tau`.
pub(crate) fn larfg<T: Real>(alpha: &mut T, x: &mut [T]) -> T {
    if x.is_empty() {
        return T::zero();
    }
    let mut xnorm = nrm2(x);
    if xnorm == T::zero() {
        return T::zero();
    }

    let mut beta = -(*alpha).hypot(xnorm).sign_of(*alpha);
    let safmin = lamch::<T>(b'S') / lamch::<T>(b'E');
    let mut knt = 0;
    if beta.abs() < safmin {
        // xnorm and beta may be inaccurate; rescale and recompute.
        let rsafmn = T::one() / safmin;
        loop {
            knt += 1;
            x.iter_mut().for_each(|v| *v *= rsafmn);
            beta *= rsafmn;
            *alpha *= rsafmn;
            if beta.abs() >= safmin || knt >= 20 {
                break;
            }
        }
        xnorm = nrm2(x);
        beta = -(*alpha).hypot(xnorm).sign_of(*alpha);
    }
    let tau = (beta - *alpha) / beta;
    let scal = T::one() / (*alpha - beta);
    x.iter_mut().for_each(|v| *v *= scal);
    for _ in 0..knt {
        beta *= safmin;
    }
    *alpha = beta;
    tau
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn geqrf<T: Real>(
    m: i32,
    n: i32,
    a: &mut [T],
    lda: i32,
    tau: &mut [T],
    work: &mut [T],
    lwork: i32,
    info: &mut i32,
) {
    *info = 0;
    let k = m.min(n);
    let lwkopt = if k <= 0 { 1 } else { n };
    set_work_size(work, lwkopt as usize);
    let lquery = lwork == -1;
    if m < 0 {
        *info = -1;
    } else if n < 0 {
        *info = -2;
    } else if lda < max1(m) {
        *info = -4;
    } else if !lquery && (lwork <= 0 || (m > 0 && lwork < max1(n))) {
        *info = -7;
    }
    if *info != 0 || lquery {
        return;
    }
    if k == 0 {
        set_work_size(work, 1);
        return;
    }

    let (m, n, lda) = (m as usize, n as usize, lda as usize);
    for i in 0..k as usize {
        let start = at(i, i, lda);
        let (head, tail) = a[start..start + (m - i)].split_at_mut(1);
        tau[i] = larfg(&mut head[0], tail);

        // Apply H(i) to A(i..m, i+1..n) from the left.
        let t = tau[i];
        if t != T::zero() {
            for c in i + 1..n {
                let mut dot = a[at(i, c, lda)];
                for r in i + 1..m {
                    dot += a[at(r, i, lda)] * a[at(r, c, lda)];
                }
                let f = t * dot;
                a[at(i, c, lda)] -= f;
                for r in i + 1..m {
                    let v = a[at(r, i, lda)];
                    a[at(r, c, lda)] -= f * v;
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn orgqr<T: Real>(
    m: i32,
    n: i32,
    k: i32,
    a: &mut [T],
    lda: i32,
    tau: &[T],
    work: &mut [T],
    lwork: i32,
    info: &mut i32,
) {
    *info = 0;
    set_work_size(work, max1(n) as usize);
    let lquery = lwork == -1;
    if m < 0 {
        *info = -1;
    } else if n < 0 || n > m {
        *info = -2;
    } else if k < 0 || k > n {
        *info = -3;
    } else if lda < max1(m) {
        *info = -5;
    } else if lwork < max1(n) && !lquery {
        *info = -8;
    }
    if *info != 0 || lquery || n <= 0 {
        return;
    }

    let (m, n, k, lda) = (m as usize, n as usize, k as usize, lda as usize);
    for j in k..n {
        for r in 0..m {
            a[at(r, j, lda)] = T::zero();
        }
        a[at(j, j, lda)] = T::one();
    }

    for i in (0..k).rev() {
        let t = tau[i];
        // Apply H(i) to A(i..m, i+1..n) from the left, v(0) = 1.
        if i + 1 < n && t != T::zero() {
            for c in i + 1..n {
                let mut dot = a[at(i, c, lda)];
                for r in i + 1..m {
                    dot += a[at(r, i, lda)] * a[at(r, c, lda)];
                }
                let f = t * dot;
                a[at(i, c, lda)] -= f;
                for r in i + 1..m {
                    let v = a[at(r, i, lda)];
                    a[at(r, c, lda)] -= f * v;
                }
            }
        }
        for r in i + 1..m {
            a[at(r, i, lda)] *= -t;
        }
        a[at(i, i, lda)] = T::one() - t;
        for r in 0..i {
            a[at(r, i, lda)] = T::zero();
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn ormqr<T: Real>(
    side: u8,
    trans: u8,
    m: i32,
    n: i32,
    k: i32,
    a: &[T],
    lda: i32,
    tau: &[T],
    c: &mut [T],
    ldc: i32,
    work: &mut [T],
    lwork: i32,
    info: &mut i32,
) {
    *info = 0;
    let left = lsame(side, b'L');
    let notran = lsame(trans, b'N');
    let (nq, nw) = if left { (m, n) } else { (n, m) };
    set_work_size(work, max1(nw) as usize);
    let lquery = lwork == -1;
    if !left && !lsame(side, b'R') {
        *info = -1;
    } else if !notran && !lsame(trans, b'T') {
        *info = -2;
    } else if m < 0 {
        *info = -3;
    } else if n < 0 {
        *info = -4;
    } else if k < 0 || k > nq {
        *info = -5;
    } else if lda < max1(nq) {
        *info = -7;
    } else if ldc < max1(m) {
        *info = -10;
    } else if lwork < max1(nw) && !lquery {
        *info = -12;
    }
    if *info != 0 || lquery || m == 0 || n == 0 || k == 0 {
        return;
    }

    let (m, n, k, nq, lda, ldc) = (m as usize, n as usize, k as usize, nq as usize, lda as usize, ldc as usize);
    // v(r) of reflector i, for r in 0..nq-i.
    let v = |i: usize, r: usize| if r == 0 { T::one() } else { a[at(i + r, i, lda)] };
    let forward = (left && !notran) || (!left && notran);

    for step in 0..k {
        let i = if forward { step } else { k - 1 - step };
        let t = tau[i];
        if t == T::zero() {
            continue;
        }
        let len = nq - i;
        if left {
            // C(i..m, :) -= tau * v * (v**T * C(i..m, :))
            for col in 0..n {
                let mut dot = T::zero();
                for r in 0..len {
                    dot += v(i, r) * c[at(i + r, col, ldc)];
                }
                let f = t * dot;
                for r in 0..len {
                    c[at(i + r, col, ldc)] -= f * v(i, r);
                }
            }
        } else {
            // C(:, i..n) -= tau * (C(:, i..n) * v) * v**T
            for row in 0..m {
                let mut dot = T::zero();
                for s in 0..len {
                    dot += c[at(row, i + s, ldc)] * v(i, s);
                }
                let f = t * dot;
                for s in 0..len {
                    c[at(row, i + s, ldc)] -= f * v(i, s);
                }
            }
        }
    }
}
