use dense_factor::{
    LinalgError, Matrix, PermutationKind, PermutationMatrix, RowVector, SquareMatrix, Vector,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// `nrows x ncols` matrix whose entry `(r, c)` is `10 (r + 1) + (c + 1)`.
fn labelled(nrows: usize, ncols: usize) -> Matrix<f64> {
    Matrix::from_fn(nrows, ncols, |r, c| (10 * (r + 1) + c + 1) as f64)
}

fn rows_of(m: &Matrix<f64>) -> Vec<Vec<f64>> {
    (0..m.nrows())
        .map(|r| (0..m.ncols()).map(|c| m[(r, c)]).collect())
        .collect()
}

fn any_p(p: &[usize]) -> PermutationMatrix {
    PermutationMatrix::from_permutation(p, PermutationKind::Unspecified).unwrap()
}

// ── Row permutation ──────────────────────────────────────────────────

#[test]
fn row_permutation_6x6() {
    let a = labelled(6, 6);
    let p = PermutationMatrix::from_permutation(&[4, 2, 0, 5, 3, 1], PermutationKind::Row)
        .unwrap();

    let pa = &p * &a;
    let rows = rows_of(&a);
    let expected: Vec<Vec<f64>> = [4, 2, 0, 5, 3, 1].iter().map(|&i| rows[i].clone()).collect();
    assert_eq!(rows_of(&pa), expected);

    // Applying the transpose undoes it
    assert_eq!(&p.transposed() * &pa, a);
}

#[test]
fn left_multiply_matrix() {
    let p = any_p(&[1, 3, 2, 0]);
    let pa = &p * &labelled(4, 3);
    let first_col: Vec<f64> = (0..4).map(|r| pa[(r, 0)]).collect();
    assert_eq!(first_col, vec![21.0, 41.0, 31.0, 11.0]);
    assert_eq!(pa[(1, 2)], 43.0);
}

#[test]
fn right_multiply_matrix() {
    let p = any_p(&[1, 3, 2, 0]);
    let ap = &labelled(3, 4) * &p;
    let first_row: Vec<f64> = (0..4).map(|c| ap[(0, c)]).collect();
    assert_eq!(first_row, vec![12.0, 14.0, 13.0, 11.0]);
    assert_eq!(ap[(2, 1)], 34.0);
}

#[test]
fn transposed_left_and_right() {
    let p = any_p(&[1, 3, 2, 0]);
    let pt = p.transposed();

    let pta = &pt * &labelled(4, 3);
    let first_col: Vec<f64> = (0..4).map(|r| pta[(r, 0)]).collect();
    assert_eq!(first_col, vec![41.0, 11.0, 31.0, 21.0]);

    let apt = &labelled(3, 4) * &pt;
    let first_row: Vec<f64> = (0..4).map(|c| apt[(0, c)]).collect();
    assert_eq!(first_row, vec![14.0, 11.0, 13.0, 12.0]);
}

#[test]
fn vectors_and_square_matrices() {
    let p = any_p(&[1, 3, 2, 0]);

    let v = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!((&p * &v).as_slice(), &[2.0, 4.0, 3.0, 1.0]);

    let rv = RowVector::from_slice(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!((&rv * &p).as_slice(), &[2.0, 4.0, 3.0, 1.0]);

    let s = SquareMatrix::try_from(labelled(4, 4)).unwrap();
    let ps = &p * &s;
    let sp = &s * &p;
    for i in 0..4 {
        assert_eq!(ps[(0, i)], 21.0 + i as f64);
        assert_eq!(sp[(i, 0)], 10.0 * (i + 1) as f64 + 2.0);
    }
}

#[test]
fn by_value_matches_by_reference() {
    let p = any_p(&[1, 3, 2, 0]);
    let a = labelled(4, 4);
    assert_eq!(&p * a.clone(), &p * &a);
    assert_eq!(a.clone() * &p, &a * &p);

    let v = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(&p * v.clone(), &p * &v);
    let rv = RowVector::from_slice(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(rv.clone() * &p, &rv * &p);
}

#[test]
fn explicit_matrix_agrees_with_swaps() {
    let p = PermutationMatrix::from_permutation(&[4, 2, 0, 5, 3, 1], PermutationKind::Row)
        .unwrap();
    let a = labelled(6, 6);
    let dense = p.to_matrix::<f64>(PermutationKind::Row);
    assert_eq!(&dense * &a, &p * &a);

    let dense_t = p.transposed().to_matrix::<f64>(PermutationKind::Row);
    assert_eq!(dense_t, dense.transpose());
}

// ── Round trips ──────────────────────────────────────────────────────

#[test]
fn long_permutation_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let mut perm: Vec<usize> = (0..1024).collect();
    perm.shuffle(&mut rng);

    let p = PermutationMatrix::from_permutation(&perm, PermutationKind::Row).unwrap();
    assert_eq!(p.len(), 1024);
    assert_eq!(p.to_permutation(), perm);

    let mut expected_inverse = vec![0; 1024];
    for (i, &pi) in perm.iter().enumerate() {
        expected_inverse[pi] = i;
    }
    assert_eq!(p.transposed().to_permutation(), expected_inverse);

    // Transposing twice is a no-op
    let mut q = p.clone();
    q.transpose_in_place();
    q.transpose_in_place();
    assert_eq!(q.to_permutation(), perm);
}

#[test]
fn random_permutations_are_valid() {
    for seed in 0..8 {
        let p = PermutationMatrix::random(64, PermutationKind::Column, seed);
        let mut mapping = p.to_permutation();
        mapping.sort_unstable();
        assert_eq!(mapping, (0..64).collect::<Vec<_>>());
    }
}

#[test]
fn rejects_non_bijections() {
    for bad in [&[0usize, 0, 1][..], &[0, 3, 1], &[2, 1]] {
        assert_eq!(
            PermutationMatrix::from_permutation(bad, PermutationKind::Row).unwrap_err(),
            LinalgError::InvalidPermutation
        );
    }
}

#[test]
fn identity_leaves_matrix_alone() {
    let a = labelled(5, 5);
    let p = PermutationMatrix::identity(5);
    assert_eq!(&p * &a, a);
    assert_eq!(&a * &p, a);
}

#[test]
#[should_panic(expected = "column permutation applied to rows")]
fn column_kind_refuses_rows() {
    let p = PermutationMatrix::new(3, PermutationKind::Column);
    let _ = &p * &labelled(3, 3);
}
