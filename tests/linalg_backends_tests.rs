// tests/linalg_backends_tests.rs

use approx::assert_abs_diff_eq;
use float_cmp::assert_approx_eq;
use lapack_dispatch::linalg_backends::{
    BackendCholesky, BackendEigh, BackendLU, BackendQR, BackendSVD, BackendSolve, LinAlgBackendProvider,
};
use lapack_dispatch::{DispatchConfig, Dispatcher, LapackError, Routine};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_matrix(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-1.0..1.0))
}

fn assert_close(actual: &Array2<f64>, expected: &Array2<f64>, tol: f64, context: &str) {
    assert_eq!(actual.dim(), expected.dim(), "shape mismatch for {}", context);
    for ((idx, a), e) in actual.indexed_iter().zip(expected.iter()) {
        assert!((a - e).abs() <= tol, "{}: mismatch at {:?}: {} vs {}", context, idx, a, e);
    }
}

#[test]
fn eigh_diagonalizes_random_symmetric_matrices() {
    let provider = LinAlgBackendProvider::<f64>::new();
    for (n, seed) in [(1, 1), (4, 2), (9, 3)] {
        let x = random_matrix(n, n, seed);
        let sym = &x + &x.t();
        let out = provider.eigh_upper(&sym).unwrap();
        assert!(out.eigenvalues.to_vec().windows(2).all(|p| p[0] <= p[1]));

        let v = &out.eigenvectors;
        assert_close(&v.t().dot(v), &Array2::eye(n), 1e-10, "V^T V");
        let rebuilt = v.dot(&Array2::from_diag(&out.eigenvalues)).dot(&v.t());
        assert_close(&rebuilt, &sym, 1e-10, "V diag(w) V^T");
    }
}

#[test]
fn svd_matches_across_shapes() {
    let provider = LinAlgBackendProvider::<f64>::new();
    for (m, n, seed) in [(6, 3, 4), (3, 6, 5), (5, 5, 6)] {
        let a = random_matrix(m, n, seed);
        let out = provider.svd_into(a.clone(), true, true).unwrap();
        let k = m.min(n);
        let u = out.u.unwrap();
        let vt = out.vt.unwrap();
        assert_eq!(u.dim(), (m, k));
        assert_eq!(vt.dim(), (k, n));
        assert!(out.s.iter().all(|&s| s >= 0.0));
        assert!(out.s.to_vec().windows(2).all(|p| p[0] >= p[1]));
        let rebuilt = u.dot(&Array2::from_diag(&out.s)).dot(&vt);
        assert_close(&rebuilt, &a, 1e-10, "U S V^T");
    }
}

#[test]
fn svd_values_agree_with_eigh_of_gram_matrix() {
    let provider = LinAlgBackendProvider::<f64>::new();
    let a = random_matrix(7, 4, 7);
    let s = provider.svd_into(a.clone(), false, false).unwrap().s;
    let gram = a.t().dot(&a);
    let w = provider.eigh_upper(&gram).unwrap().eigenvalues;
    for i in 0..4 {
        assert_abs_diff_eq!(s[i] * s[i], w[3 - i], epsilon = 1e-10);
    }
}

#[test]
fn qr_spans_the_input() {
    let provider = LinAlgBackendProvider::<f64>::new();
    let a = random_matrix(8, 3, 8);
    let q = provider.qr_q_factor(&a).unwrap();
    assert_eq!(q.dim(), (8, 3));
    assert_close(&q.t().dot(&q), &Array2::eye(3), 1e-12, "Q^T Q");
    assert_close(&q.dot(&q.t().dot(&a)), &a, 1e-12, "Q Q^T A");

    let wide = random_matrix(3, 5, 9);
    let q = provider.qr_q_factor(&wide).unwrap();
    assert_eq!(q.dim(), (3, 3));
    assert_close(&q.t().dot(&q), &Array2::eye(3), 1e-12, "square Q");
}

#[test]
fn lu_cholesky_and_solve_agree() {
    let provider = LinAlgBackendProvider::<f64>::new();
    let x = random_matrix(5, 5, 10);
    let spd = x.t().dot(&x) + Array2::<f64>::eye(5) * 5.0;
    let b = random_matrix(5, 2, 11);

    let lu = provider.lu(&spd).unwrap();
    assert_close(&lu.l().dot(&lu.u()), &lu.permute_rows(&spd), 1e-12, "L U");

    let l = provider.cholesky_lower(&spd).unwrap();
    assert_close(&l.dot(&l.t()), &spd, 1e-12, "L L^T");

    let solved = provider.solve(&spd, &b).unwrap();
    assert_close(&spd.dot(&solved), &b, 1e-10, "A X");

    let rcond = provider.rcond(&spd).unwrap();
    assert!(rcond > 0.0 && rcond <= 1.0);
    assert_approx_eq!(f64, provider.rcond(&Array2::eye(4)).unwrap(), 1.0, epsilon = 1e-15);
}

#[test]
fn single_precision_provider() {
    let provider = LinAlgBackendProvider::<f32>::new();
    let a = Array2::from_shape_vec((2, 2), vec![2.0_f32, 1.0, 1.0, 2.0]).unwrap();
    let out = provider.eigh_upper(&a).unwrap();
    assert_approx_eq!(f32, out.eigenvalues[0], 1.0, epsilon = 1e-5);
    assert_approx_eq!(f32, out.eigenvalues[1], 3.0, epsilon = 1e-5);

    let x = provider.solve(&a, &Array2::from_shape_vec((2, 1), vec![3.0_f32, 3.0]).unwrap()).unwrap();
    assert_approx_eq!(f32, x[[0, 0]], 1.0, epsilon = 1e-5);
    assert_approx_eq!(f32, x[[1, 0]], 1.0, epsilon = 1e-5);

    let svd = provider.svd_into(a, false, true).unwrap();
    assert!(svd.u.is_none());
    assert_eq!(svd.vt.unwrap().dim(), (2, 2));
    assert_approx_eq!(f32, svd.s[0], 3.0, epsilon = 1e-5);
}

#[test]
fn status_codes_become_typed_errors() {
    let provider = LinAlgBackendProvider::<f64>::new();
    let singular = Array2::from_shape_vec((3, 3), vec![1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 0.0, 1.0]).unwrap();
    let err = provider.solve(&singular, &Array2::ones((3, 1))).unwrap_err();
    match err.downcast_ref::<LapackError>() {
        Some(LapackError::Singular { routine, .. }) => assert_eq!(*routine, Routine::Dgesv),
        other => panic!("expected a singular-matrix error, got {:?}", other),
    }
    assert!(err.to_string().starts_with("dgesv: U("));

    let indefinite = Array2::from_diag(&Array1::from(vec![1.0, -1.0]));
    let err = provider.cholesky_lower(&indefinite).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LapackError>(),
        Some(LapackError::NotPositiveDefinite { routine: Routine::Dpotrf, order: 2 })
    ));
}

#[test]
fn provider_over_a_custom_dispatcher() {
    let dispatcher = Dispatcher::with_fallback(DispatchConfig::default(), Vec::new());
    let backend = dispatcher.bind().unwrap();
    let provider = LinAlgBackendProvider::<f64>::with_backend(backend);
    assert_eq!(provider.backend().name(), "reference");
    let l = provider.cholesky_lower(&Array2::eye(3)).unwrap();
    assert_close(&l, &Array2::eye(3), 0.0, "identity factor");
}
