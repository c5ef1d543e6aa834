use approx::assert_relative_eq;
use dense_factor::{LinalgError, Matrix, NoPivotLu, SquareMatrix, Vector};

const TOL: f64 = 1e-12;

fn assert_mat_near(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64) {
    assert_eq!((a.nrows(), a.ncols()), (b.nrows(), b.ncols()), "shape mismatch");
    for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
        assert_relative_eq!(*x, *y, epsilon = tol, max_relative = tol);
    }
}

fn a3() -> SquareMatrix<f64> {
    SquareMatrix::from_rows(3, &[7.0, 3.0, 4.0, 1.0, 2.0, 3.0, 6.0, 5.0, 4.0])
}

/// Random matrix made diagonally dominant so no pivoting is needed.
fn dominant(n: usize, seed: u64) -> SquareMatrix<f64> {
    let r = SquareMatrix::random(n, -1.0, 1.0, seed);
    SquareMatrix::from_fn(n, |i, j| {
        if i == j {
            r[(i, j)] + n as f64
        } else {
            r[(i, j)]
        }
    })
}

#[test]
fn lu_reconstructs_a() {
    let a = a3();
    let lu = NoPivotLu::new_from(&a);
    let l = lu.get_l().unwrap();
    let u = lu.get_u().unwrap();
    assert_mat_near(&(&l * &u), &a, TOL);
}

#[test]
fn factors_overlay_packed_buffer() {
    // L + U - LU - I vanishes
    let lu = NoPivotLu::new_from(&a3());
    let l = lu.get_l().unwrap().into_matrix();
    let u = lu.get_u().unwrap().into_matrix();
    let packed = lu.get_lu().unwrap().clone().into_matrix();
    let residual = l + u - packed - Matrix::eye(3);
    assert!(residual.as_slice().iter().all(|&x| x.abs() < 1e-14));
}

#[test]
fn solve_vector_and_matrix() {
    let lu = NoPivotLu::from(a3());
    let b = Vector::from_slice(&[134.0, 68.0, 149.0]);
    let x = lu.solve_vector(&b).unwrap();
    for (got, want) in x.as_slice().iter().zip([7.0, 11.0, 13.0]) {
        assert_relative_eq!(*got, want, max_relative = 1e-13);
    }

    // Two right-hand sides at once
    let bm = Matrix::from_rows(3, 2, &[134.0, 7.0, 68.0, 1.0, 149.0, 6.0]);
    let xm = lu.solve(&bm).unwrap();
    assert_relative_eq!(xm[(2, 0)], 13.0, max_relative = 1e-13);
    assert_relative_eq!(xm[(0, 1)], 1.0, max_relative = 1e-13);
    assert!(xm[(1, 1)].abs() < TOL);
    assert!(xm[(2, 1)].abs() < TOL);
}

#[test]
fn in_place_and_copying_agree() {
    let a = dominant(8, 3);
    let lu = NoPivotLu::new_from(&a);
    let b = Matrix::random(8, 3, -5.0, 5.0, 4);

    let copied = lu.solve(&b).unwrap();
    let owned = lu.solve_owned(b.clone()).unwrap();
    let mut in_place = b.clone();
    lu.solve_in_place(&mut in_place).unwrap();

    assert_eq!(copied, owned);
    assert_eq!(copied, in_place);
    assert_mat_near(&(&a * &copied), &b, 1e-10);
}

#[test]
fn inverse_via_identity() {
    let a = a3();
    let lu = NoPivotLu::new_from(&a);
    let inv = lu.inverse().unwrap();
    assert_eq!(inv, SquareMatrix::try_from(lu.solve(&Matrix::eye(3)).unwrap()).unwrap());
    assert_mat_near(&(&a * &inv), &Matrix::eye(3), 1e-12);
}

#[test]
fn random_dominant_system() {
    for seed in 0..5 {
        let a = dominant(12, seed);
        let lu = a.no_pivot_lu();
        let x_true = Vector::from_vec((0..12).map(|i| i as f64 - 5.5).collect());
        let b = &a * &x_true;
        let x = lu.solve_vector(&b).unwrap();
        for i in 0..12 {
            assert_relative_eq!(x[i], x_true[i], epsilon = 1e-11);
        }
        assert_relative_eq!(lu.det().unwrap(), a.det().unwrap(), max_relative = 1e-10);
    }
}

#[test]
fn into_factors() {
    let lu = NoPivotLu::new_from(&a3());
    let l = lu.get_l().unwrap();
    let u = lu.get_u().unwrap();
    let packed = lu.get_lu().unwrap().clone();

    assert_eq!(lu.clone().into_l().unwrap(), l);
    assert_eq!(lu.clone().into_u().unwrap(), u);
    assert_eq!(lu.into_lu().unwrap(), packed);
}

#[test]
fn recompute_replaces_factors() {
    let mut lu = NoPivotLu::new();
    assert!(!lu.has_lu());
    assert_eq!(lu.get_lu().unwrap_err(), LinalgError::NotFactored);
    assert_eq!(lu.clone().into_u().unwrap_err(), LinalgError::NotFactored);

    lu.compute_copy(&a3());
    let first = lu.get_lu().unwrap().clone();
    lu.compute(dominant(3, 9));
    assert!(lu.is_factored());
    assert_ne!(lu.get_lu().unwrap(), &first);
}

#[test]
fn f32_elements() {
    let a = SquareMatrix::from_rows(2, &[4.0_f32, 1.0, 2.0, 3.0]);
    let x = NoPivotLu::new_from(&a)
        .solve_vector(&Vector::from_slice(&[6.0, 8.0]))
        .unwrap();
    assert_relative_eq!(x[0], 1.0, epsilon = 1e-6);
    assert_relative_eq!(x[1], 2.0, epsilon = 1e-6);
}
