// src/reference/kernels.rs

//! Kernel provider of the reference backend.
//!
//! One function per routine of the table, with the table's exact signature.
//! Each is a monomorphic entry point over the precision-generic kernel, so
//! the `s*` and `d*` variants share one implementation.

use super::{auxiliary, banded, cholesky, lu, qr, svd, symmetric, triangular};

pub fn ilaver(vers_major: &mut i32, vers_minor: &mut i32, vers_patch: &mut i32) {
    auxiliary::ilaver(vers_major, vers_minor, vers_patch)
}

// --- Auxiliary ---

pub fn slamch(cmach: u8) -> f32 {
    auxiliary::lamch(cmach)
}

pub fn dlamch(cmach: u8) -> f64 {
    auxiliary::lamch(cmach)
}

pub fn slange(norm: u8, m: i32, n: i32, a: &[f32], lda: i32, work: &mut [f32]) -> f32 {
    auxiliary::lange(norm, m, n, a, lda, work)
}

pub fn dlange(norm: u8, m: i32, n: i32, a: &[f64], lda: i32, work: &mut [f64]) -> f64 {
    auxiliary::lange(norm, m, n, a, lda, work)
}

pub fn slansy(norm: u8, uplo: u8, n: i32, a: &[f32], lda: i32, work: &mut [f32]) -> f32 {
    auxiliary::lansy(norm, uplo, n, a, lda, work)
}

pub fn dlansy(norm: u8, uplo: u8, n: i32, a: &[f64], lda: i32, work: &mut [f64]) -> f64 {
    auxiliary::lansy(norm, uplo, n, a, lda, work)
}

pub fn slacpy(uplo: u8, m: i32, n: i32, a: &[f32], lda: i32, b: &mut [f32], ldb: i32) {
    auxiliary::lacpy(uplo, m, n, a, lda, b, ldb)
}

pub fn dlacpy(uplo: u8, m: i32, n: i32, a: &[f64], lda: i32, b: &mut [f64], ldb: i32) {
    auxiliary::lacpy(uplo, m, n, a, lda, b, ldb)
}

pub fn slaswp(n: i32, a: &mut [f32], lda: i32, k1: i32, k2: i32, ipiv: &[i32], incx: i32) {
    auxiliary::laswp(n, a, lda, k1, k2, ipiv, incx)
}

pub fn dlaswp(n: i32, a: &mut [f64], lda: i32, k1: i32, k2: i32, ipiv: &[i32], incx: i32) {
    auxiliary::laswp(n, a, lda, k1, k2, ipiv, incx)
}

// --- General LU ---

pub fn sgetrf(m: i32, n: i32, a: &mut [f32], lda: i32, ipiv: &mut [i32], info: &mut i32) {
    lu::getrf(m, n, a, lda, ipiv, info)
}

pub fn dgetrf(m: i32, n: i32, a: &mut [f64], lda: i32, ipiv: &mut [i32], info: &mut i32) {
    lu::getrf(m, n, a, lda, ipiv, info)
}

#[allow(clippy::too_many_arguments)]
pub fn sgetrs(
    trans: u8,
    n: i32,
    nrhs: i32,
    a: &[f32],
    lda: i32,
    ipiv: &[i32],
    b: &mut [f32],
    ldb: i32,
    info: &mut i32,
) {
    lu::getrs(trans, n, nrhs, a, lda, ipiv, b, ldb, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dgetrs(
    trans: u8,
    n: i32,
    nrhs: i32,
    a: &[f64],
    lda: i32,
    ipiv: &[i32],
    b: &mut [f64],
    ldb: i32,
    info: &mut i32,
) {
    lu::getrs(trans, n, nrhs, a, lda, ipiv, b, ldb, info)
}

#[allow(clippy::too_many_arguments)]
pub fn sgesv(
    n: i32,
    nrhs: i32,
    a: &mut [f32],
    lda: i32,
    ipiv: &mut [i32],
    b: &mut [f32],
    ldb: i32,
    info: &mut i32,
) {
    lu::gesv(n, nrhs, a, lda, ipiv, b, ldb, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dgesv(
    n: i32,
    nrhs: i32,
    a: &mut [f64],
    lda: i32,
    ipiv: &mut [i32],
    b: &mut [f64],
    ldb: i32,
    info: &mut i32,
) {
    lu::gesv(n, nrhs, a, lda, ipiv, b, ldb, info)
}

pub fn sgetri(
    n: i32,
    a: &mut [f32],
    lda: i32,
    ipiv: &[i32],
    work: &mut [f32],
    lwork: i32,
    info: &mut i32,
) {
    lu::getri(n, a, lda, ipiv, work, lwork, info)
}

pub fn dgetri(
    n: i32,
    a: &mut [f64],
    lda: i32,
    ipiv: &[i32],
    work: &mut [f64],
    lwork: i32,
    info: &mut i32,
) {
    lu::getri(n, a, lda, ipiv, work, lwork, info)
}

#[allow(clippy::too_many_arguments)]
pub fn sgecon(
    norm: u8,
    n: i32,
    a: &[f32],
    lda: i32,
    anorm: f32,
    rcond: &mut f32,
    work: &mut [f32],
    iwork: &mut [i32],
    info: &mut i32,
) {
    lu::gecon(norm, n, a, lda, anorm, rcond, work, iwork, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dgecon(
    norm: u8,
    n: i32,
    a: &[f64],
    lda: i32,
    anorm: f64,
    rcond: &mut f64,
    work: &mut [f64],
    iwork: &mut [i32],
    info: &mut i32,
) {
    lu::gecon(norm, n, a, lda, anorm, rcond, work, iwork, info)
}

// --- Band and tridiagonal ---

#[allow(clippy::too_many_arguments)]
pub fn sgbtrf(
    m: i32,
    n: i32,
    kl: i32,
    ku: i32,
    ab: &mut [f32],
    ldab: i32,
    ipiv: &mut [i32],
    info: &mut i32,
) {
    banded::gbtrf(m, n, kl, ku, ab, ldab, ipiv, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dgbtrf(
    m: i32,
    n: i32,
    kl: i32,
    ku: i32,
    ab: &mut [f64],
    ldab: i32,
    ipiv: &mut [i32],
    info: &mut i32,
) {
    banded::gbtrf(m, n, kl, ku, ab, ldab, ipiv, info)
}

#[allow(clippy::too_many_arguments)]
pub fn sgbtrs(
    trans: u8,
    n: i32,
    kl: i32,
    ku: i32,
    nrhs: i32,
    ab: &[f32],
    ldab: i32,
    ipiv: &[i32],
    b: &mut [f32],
    ldb: i32,
    info: &mut i32,
) {
    banded::gbtrs(trans, n, kl, ku, nrhs, ab, ldab, ipiv, b, ldb, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dgbtrs(
    trans: u8,
    n: i32,
    kl: i32,
    ku: i32,
    nrhs: i32,
    ab: &[f64],
    ldab: i32,
    ipiv: &[i32],
    b: &mut [f64],
    ldb: i32,
    info: &mut i32,
) {
    banded::gbtrs(trans, n, kl, ku, nrhs, ab, ldab, ipiv, b, ldb, info)
}

#[allow(clippy::too_many_arguments)]
pub fn sgbsv(
    n: i32,
    kl: i32,
    ku: i32,
    nrhs: i32,
    ab: &mut [f32],
    ldab: i32,
    ipiv: &mut [i32],
    b: &mut [f32],
    ldb: i32,
    info: &mut i32,
) {
    banded::gbsv(n, kl, ku, nrhs, ab, ldab, ipiv, b, ldb, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dgbsv(
    n: i32,
    kl: i32,
    ku: i32,
    nrhs: i32,
    ab: &mut [f64],
    ldab: i32,
    ipiv: &mut [i32],
    b: &mut [f64],
    ldb: i32,
    info: &mut i32,
) {
    banded::gbsv(n, kl, ku, nrhs, ab, ldab, ipiv, b, ldb, info)
}

#[allow(clippy::too_many_arguments)]
pub fn sgtsv(
    n: i32,
    nrhs: i32,
    dl: &mut [f32],
    d: &mut [f32],
    du: &mut [f32],
    b: &mut [f32],
    ldb: i32,
    info: &mut i32,
) {
    banded::gtsv(n, nrhs, dl, d, du, b, ldb, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dgtsv(
    n: i32,
    nrhs: i32,
    dl: &mut [f64],
    d: &mut [f64],
    du: &mut [f64],
    b: &mut [f64],
    ldb: i32,
    info: &mut i32,
) {
    banded::gtsv(n, nrhs, dl, d, du, b, ldb, info)
}

// --- Cholesky ---

pub fn spotrf(uplo: u8, n: i32, a: &mut [f32], lda: i32, info: &mut i32) {
    cholesky::potrf(uplo, n, a, lda, info)
}

pub fn dpotrf(uplo: u8, n: i32, a: &mut [f64], lda: i32, info: &mut i32) {
    cholesky::potrf(uplo, n, a, lda, info)
}

#[allow(clippy::too_many_arguments)]
pub fn spotrs(
    uplo: u8,
    n: i32,
    nrhs: i32,
    a: &[f32],
    lda: i32,
    b: &mut [f32],
    ldb: i32,
    info: &mut i32,
) {
    cholesky::potrs(uplo, n, nrhs, a, lda, b, ldb, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dpotrs(
    uplo: u8,
    n: i32,
    nrhs: i32,
    a: &[f64],
    lda: i32,
    b: &mut [f64],
    ldb: i32,
    info: &mut i32,
) {
    cholesky::potrs(uplo, n, nrhs, a, lda, b, ldb, info)
}

#[allow(clippy::too_many_arguments)]
pub fn sposv(
    uplo: u8,
    n: i32,
    nrhs: i32,
    a: &mut [f32],
    lda: i32,
    b: &mut [f32],
    ldb: i32,
    info: &mut i32,
) {
    cholesky::posv(uplo, n, nrhs, a, lda, b, ldb, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dposv(
    uplo: u8,
    n: i32,
    nrhs: i32,
    a: &mut [f64],
    lda: i32,
    b: &mut [f64],
    ldb: i32,
    info: &mut i32,
) {
    cholesky::posv(uplo, n, nrhs, a, lda, b, ldb, info)
}

pub fn spptrf(uplo: u8, n: i32, ap: &mut [f32], info: &mut i32) {
    cholesky::pptrf(uplo, n, ap, info)
}

pub fn dpptrf(uplo: u8, n: i32, ap: &mut [f64], info: &mut i32) {
    cholesky::pptrf(uplo, n, ap, info)
}

pub fn spptrs(uplo: u8, n: i32, nrhs: i32, ap: &[f32], b: &mut [f32], ldb: i32, info: &mut i32) {
    cholesky::pptrs(uplo, n, nrhs, ap, b, ldb, info)
}

pub fn dpptrs(uplo: u8, n: i32, nrhs: i32, ap: &[f64], b: &mut [f64], ldb: i32, info: &mut i32) {
    cholesky::pptrs(uplo, n, nrhs, ap, b, ldb, info)
}

pub fn sppsv(uplo: u8, n: i32, nrhs: i32, ap: &mut [f32], b: &mut [f32], ldb: i32, info: &mut i32) {
    cholesky::ppsv(uplo, n, nrhs, ap, b, ldb, info)
}

pub fn dppsv(uplo: u8, n: i32, nrhs: i32, ap: &mut [f64], b: &mut [f64], ldb: i32, info: &mut i32) {
    cholesky::ppsv(uplo, n, nrhs, ap, b, ldb, info)
}

// --- Triangular ---

#[allow(clippy::too_many_arguments)]
pub fn strtrs(
    uplo: u8,
    trans: u8,
    diag: u8,
    n: i32,
    nrhs: i32,
    a: &[f32],
    lda: i32,
    b: &mut [f32],
    ldb: i32,
    info: &mut i32,
) {
    triangular::trtrs(uplo, trans, diag, n, nrhs, a, lda, b, ldb, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dtrtrs(
    uplo: u8,
    trans: u8,
    diag: u8,
    n: i32,
    nrhs: i32,
    a: &[f64],
    lda: i32,
    b: &mut [f64],
    ldb: i32,
    info: &mut i32,
) {
    triangular::trtrs(uplo, trans, diag, n, nrhs, a, lda, b, ldb, info)
}

// --- Orthogonal factorizations ---

#[allow(clippy::too_many_arguments)]
pub fn sgeqrf(
    m: i32,
    n: i32,
    a: &mut [f32],
    lda: i32,
    tau: &mut [f32],
    work: &mut [f32],
    lwork: i32,
    info: &mut i32,
) {
    qr::geqrf(m, n, a, lda, tau, work, lwork, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dgeqrf(
    m: i32,
    n: i32,
    a: &mut [f64],
    lda: i32,
    tau: &mut [f64],
    work: &mut [f64],
    lwork: i32,
    info: &mut i32,
) {
    qr::geqrf(m, n, a, lda, tau, work, lwork, info)
}

#[allow(clippy::too_many_arguments)]
pub fn sorgqr(
    m: i32,
    n: i32,
    k: i32,
    a: &mut [f32],
    lda: i32,
    tau: &[f32],
    work: &mut [f32],
    lwork: i32,
    info: &mut i32,
) {
    qr::orgqr(m, n, k, a, lda, tau, work, lwork, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dorgqr(
    m: i32,
    n: i32,
    k: i32,
    a: &mut [f64],
    lda: i32,
    tau: &[f64],
    work: &mut [f64],
    lwork: i32,
    info: &mut i32,
) {
    qr::orgqr(m, n, k, a, lda, tau, work, lwork, info)
}

#[allow(clippy::too_many_arguments)]
pub fn sormqr(
    side: u8,
    trans: u8,
    m: i32,
    n: i32,
    k: i32,
    a: &[f32],
    lda: i32,
    tau: &[f32],
    c: &mut [f32],
    ldc: i32,
    work: &mut [f32],
    lwork: i32,
    info: &mut i32,
) {
    qr::ormqr(side, trans, m, n, k, a, lda, tau, c, ldc, work, lwork, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dormqr(
    side: u8,
    trans: u8,
    m: i32,
    n: i32,
    k: i32,
    a: &[f64],
    lda: i32,
    tau: &[f64],
    c: &mut [f64],
    ldc: i32,
    work: &mut [f64],
    lwork: i32,
    info: &mut i32,
) {
    qr::ormqr(side, trans, m, n, k, a, lda, tau, c, ldc, work, lwork, info)
}

// --- Eigenvalues and singular values ---

#[allow(clippy::too_many_arguments)]
pub fn ssyev(
    jobz: u8,
    uplo: u8,
    n: i32,
    a: &mut [f32],
    lda: i32,
    w: &mut [f32],
    work: &mut [f32],
    lwork: i32,
    info: &mut i32,
) {
    symmetric::syev(jobz, uplo, n, a, lda, w, work, lwork, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dsyev(
    jobz: u8,
    uplo: u8,
    n: i32,
    a: &mut [f64],
    lda: i32,
    w: &mut [f64],
    work: &mut [f64],
    lwork: i32,
    info: &mut i32,
) {
    symmetric::syev(jobz, uplo, n, a, lda, w, work, lwork, info)
}

#[allow(clippy::too_many_arguments)]
pub fn sgesvd(
    jobu: u8,
    jobvt: u8,
    m: i32,
    n: i32,
    a: &mut [f32],
    lda: i32,
    s: &mut [f32],
    u: &mut [f32],
    ldu: i32,
    vt: &mut [f32],
    ldvt: i32,
    work: &mut [f32],
    lwork: i32,
    info: &mut i32,
) {
    svd::gesvd(jobu, jobvt, m, n, a, lda, s, u, ldu, vt, ldvt, work, lwork, info)
}

#[allow(clippy::too_many_arguments)]
pub fn dgesvd(
    jobu: u8,
    jobvt: u8,
    m: i32,
    n: i32,
    a: &mut [f64],
    lda: i32,
    s: &mut [f64],
    u: &mut [f64],
    ldu: i32,
    vt: &mut [f64],
    ldvt: i32,
    work: &mut [f64],
    lwork: i32,
    info: &mut i32,
) {
    svd::gesvd(jobu, jobvt, m, n, a, lda, s, u, ldu, vt, ldvt, work, lwork, info)
}
