use alloc::vec;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::traits::Scalar;

use super::Matrix;

// ── Element-wise addition / subtraction ─────────────────────────────

macro_rules! impl_elementwise {
    ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $sym:tt) => {
        impl<T: Scalar> $OpAssign<&Matrix<T>> for Matrix<T> {
            fn $op_assign(&mut self, rhs: &Matrix<T>) {
                assert_eq!(
                    (self.nrows, self.ncols),
                    (rhs.nrows, rhs.ncols),
                    "dimension mismatch: {}x{} {} {}x{}",
                    self.nrows, self.ncols, stringify!($sym), rhs.nrows, rhs.ncols,
                );
                for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
                    *a = *a $sym b;
                }
            }
        }

        impl<T: Scalar> $OpAssign for Matrix<T> {
            fn $op_assign(&mut self, rhs: Self) {
                self.$op_assign(&rhs);
            }
        }

        impl<T: Scalar> $Op<&Matrix<T>> for Matrix<T> {
            type Output = Matrix<T>;

            fn $op(mut self, rhs: &Matrix<T>) -> Matrix<T> {
                self.$op_assign(rhs);
                self
            }
        }

        impl<T: Scalar> $Op for Matrix<T> {
            type Output = Matrix<T>;

            fn $op(self, rhs: Matrix<T>) -> Matrix<T> {
                self.$op(&rhs)
            }
        }

        impl<T: Scalar> $Op<&Matrix<T>> for &Matrix<T> {
            type Output = Matrix<T>;

            fn $op(self, rhs: &Matrix<T>) -> Matrix<T> {
                self.clone().$op(rhs)
            }
        }

        impl<T: Scalar> $Op<Matrix<T>> for &Matrix<T> {
            type Output = Matrix<T>;

            fn $op(self, rhs: Matrix<T>) -> Matrix<T> {
                self.clone().$op(&rhs)
            }
        }
    };
}

impl_elementwise!(Add, add, AddAssign, add_assign, +);
impl_elementwise!(Sub, sub, SubAssign, sub_assign, -);

// ── Negation ────────────────────────────────────────────────────────

impl<T: Scalar> Neg for Matrix<T> {
    type Output = Self;

    fn neg(mut self) -> Self {
        for x in self.data.iter_mut() {
            *x = T::zero() - *x;
        }
        self
    }
}

impl<T: Scalar> Neg for &Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        -self.clone()
    }
}

// ── Matrix multiplication: (M×N) * (N×P) → (M×P) ──────────────────

impl<T: Scalar> Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            self.ncols, rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let m = self.nrows;
        let n = self.ncols;
        let p = rhs.ncols;
        let mut data = vec![T::zero(); m * p];
        // Column-major: out[:, j] += a[:, k] * b[k, j]
        for j in 0..p {
            let out_col = &mut data[j * m..(j + 1) * m];
            for k in 0..n {
                let b_kj = rhs.data[j * n + k];
                let a_col = &self.data[k * m..(k + 1) * m];
                for (o, &a) in out_col.iter_mut().zip(a_col) {
                    *o = *o + a * b_kj;
                }
            }
        }
        Matrix {
            data,
            nrows: m,
            ncols: p,
        }
    }
}

impl<T: Scalar> Mul for Matrix<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl<T: Scalar> Mul<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self * rhs
    }
}

impl<T: Scalar> Mul<Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: Matrix<T>) -> Matrix<T> {
        self * &rhs
    }
}

// ── Scalar multiplication / division ────────────────────────────────

impl<T: Scalar> MulAssign<T> for Matrix<T> {
    fn mul_assign(&mut self, rhs: T) {
        for x in self.data.iter_mut() {
            *x = *x * rhs;
        }
    }
}

impl<T: Scalar> Mul<T> for Matrix<T> {
    type Output = Self;

    fn mul(mut self, rhs: T) -> Self {
        self *= rhs;
        self
    }
}

impl<T: Scalar> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Matrix<T> {
        self.clone() * rhs
    }
}

impl<T: Scalar> DivAssign<T> for Matrix<T> {
    fn div_assign(&mut self, rhs: T) {
        for x in self.data.iter_mut() {
            *x = *x / rhs;
        }
    }
}

impl<T: Scalar> Div<T> for Matrix<T> {
    type Output = Self;

    fn div(mut self, rhs: T) -> Self {
        self /= rhs;
        self
    }
}

impl<T: Scalar> Div<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn div(self, rhs: T) -> Matrix<T> {
        self.clone() / rhs
    }
}

macro_rules! impl_scalar_lhs_mul {
    ($($t:ty),*) => {
        $(
            impl Mul<Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn mul(self, rhs: Matrix<$t>) -> Matrix<$t> {
                    rhs * self
                }
            }

            impl Mul<&Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn mul(self, rhs: &Matrix<$t>) -> Matrix<$t> {
                    rhs * self
                }
            }
        )*
    };
}

impl_scalar_lhs_mul!(f32, f64);
