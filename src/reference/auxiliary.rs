// src/reference/auxiliary.rs

use super::scalar::Real;
use super::{at, lsame};

/// Version triple the reference kernels conform to.
pub(crate) const REFERENCE_VERSION: (i32, i32, i32) = (3, 12, 0);

pub(crate) fn ilaver(vers_major: &mut i32, vers_minor: &mut i32, vers_patch: &mut i32) {
    let (major, minor, patch) = REFERENCE_VERSION;
    *vers_major = major;
    *vers_minor = minor;
    *vers_patch = patch;
}

/// Machine parameters for round-to-nearest binary arithmetic.
pub(crate) fn lamch<T: Real>(cmach: u8) -> T {
    let eps = T::epsilon() * T::from_f64(0.5);
    match cmach.to_ascii_uppercase() {
        b'E' => eps,
        // 1/huge is below the smallest normal for both widths, so sfmin is tiny.
        b'S' | b'U' => T::min_positive_value(),
        b'B' => T::two(),
        b'P' => eps * T::two(),
        b'N' => T::from_f64(T::DIGITS as f64),
        b'R' => T::one(),
        b'M' => T::from_f64(T::MIN_EXPONENT as f64),
        b'L' => T::from_f64(T::MAX_EXPONENT as f64),
        b'O' => T::max_value(),
        _ => T::zero(),
    }
}

/// Adds `x` to the scaled sum of squares `scale**2 * sumsq`.
#[inline]
pub(crate) fn lassq_update<T: Real>(scale: &mut T, sumsq: &mut T, x: T) {
    let absx = x.abs();
    if absx != T::zero() || absx.is_nan() {
        if *scale < absx || absx.is_nan() {
            *sumsq = T::one() + *sumsq * (*scale / absx) * (*scale / absx);
            *scale = absx;
        } else {
            *sumsq += (absx / *scale) * (absx / *scale);
        }
    }
}

/// NaN-propagating maximum used by the norm kernels.
#[inline]
fn nan_max<T: Real>(current: T, candidate: T) -> T {
    if current < candidate || candidate.is_nan() {
        candidate
    } else {
        current
    }
}

pub(crate) fn lange<T: Real>(norm: u8, m: i32, n: i32, a: &[T], lda: i32, _work: &mut [T]) -> T {
    if m.min(n) <= 0 {
        return T::zero();
    }
    let (m, n, lda) = (m as usize, n as usize, lda as usize);
    let mut value = T::zero();

    if lsame(norm, b'M') {
        for j in 0..n {
            for i in 0..m {
                value = nan_max(value, a[at(i, j, lda)].abs());
            }
        }
    } else if lsame(norm, b'O') || norm == b'1' {
        for j in 0..n {
            let mut sum = T::zero();
            for i in 0..m {
                sum += a[at(i, j, lda)].abs();
            }
            value = nan_max(value, sum);
        }
    } else if lsame(norm, b'I') {
        for i in 0..m {
            let mut sum = T::zero();
            for j in 0..n {
                sum += a[at(i, j, lda)].abs();
            }
            value = nan_max(value, sum);
        }
    } else if lsame(norm, b'F') || lsame(norm, b'E') {
        let (mut scale, mut sumsq) = (T::zero(), T::one());
        for j in 0..n {
            for i in 0..m {
                lassq_update(&mut scale, &mut sumsq, a[at(i, j, lda)]);
            }
        }
        value = scale * sumsq.sqrt();
    }
    value
}

pub(crate) fn lansy<T: Real>(norm: u8, uplo: u8, n: i32, a: &[T], lda: i32, _work: &mut [T]) -> T {
    if n <= 0 {
        return T::zero();
    }
    let (n, lda) = (n as usize, lda as usize);
    let upper = lsame(uplo, b'U');
    // Element (i, j) of the full symmetric matrix read from the stored triangle.
    let sym = |i: usize, j: usize| -> T {
        let stored = if upper { i <= j } else { i >= j };
        if stored {
            a[at(i, j, lda)]
        } else {
            a[at(j, i, lda)]
        }
    };

    let mut value = T::zero();
    if lsame(norm, b'M') {
        for j in 0..n {
            for i in 0..n {
                value = nan_max(value, sym(i, j).abs());
            }
        }
    } else if lsame(norm, b'O') || lsame(norm, b'I') || norm == b'1' {
        // Symmetric, so the one and infinity norms coincide.
        for j in 0..n {
            let mut sum = T::zero();
            for i in 0..n {
                sum += sym(i, j).abs();
            }
            value = nan_max(value, sum);
        }
    } else if lsame(norm, b'F') || lsame(norm, b'E') {
        let (mut scale, mut sumsq) = (T::zero(), T::one());
        for j in 0..n {
            for i in 0..n {
                lassq_update(&mut scale, &mut sumsq, sym(i, j));
            }
        }
        value = scale * sumsq.sqrt();
    }
    value
}

pub(crate) fn lacpy<T: Real>(uplo: u8, m: i32, n: i32, a: &[T], lda: i32, b: &mut [T], ldb: i32) {
    if m <= 0 || n <= 0 {
        return;
    }
    let (m, n, lda, ldb) = (m as usize, n as usize, lda as usize, ldb as usize);
    for j in 0..n {
        let rows = if lsame(uplo, b'U') {
            0..(j + 1).min(m)
        } else if lsame(uplo, b'L') {
            j.min(m)..m
        } else {
            0..m
        };
        for i in rows {
            b[at(i, j, ldb)] = a[at(i, j, lda)];
        }
    }
}

/// Row interchanges `k1..=k2` (1-based) read from `ipiv` with stride `incx`.
/// A negative `incx` applies them in reverse order.
pub(crate) fn laswp<T: Real>(n: i32, a: &mut [T], lda: i32, k1: i32, k2: i32, ipiv: &[i32], incx: i32) {
    let (mut ix, first, last, step) = if incx > 0 {
        (k1, k1, k2, 1)
    } else if incx < 0 {
        (k1 + (k1 - k2) * incx, k2, k1, -1)
    } else {
        return;
    };
    if n <= 0 {
        return;
    }
    let (n, lda) = (n as usize, lda as usize);

    let mut i = first;
    while (step > 0 && i <= last) || (step < 0 && i >= last) {
        let ip = ipiv[(ix - 1) as usize];
        if ip != i {
            let (r1, r2) = ((i - 1) as usize, (ip - 1) as usize);
            for col in 0..n {
                a.swap(at(r1, col, lda), at(r2, col, lda));
            }
        }
        ix += incx;
        i += step;
    }
}
