use alloc::vec::Vec;
use core::fmt;

use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

use super::Matrix;

// ── Map / transpose ─────────────────────────────────────────────────

impl<T: Copy> Matrix<T> {
    /// Apply a function to every element, producing a new matrix.
    ///
    /// ```
    /// use dense_factor::Matrix;
    /// let m = Matrix::from_slice(2, 2, &[1.0_f64, 4.0, 9.0, 16.0]);
    /// let r = m.map(|x: f64| x.sqrt());
    /// assert_eq!(r[(0, 0)], 1.0);
    /// assert_eq!(r[(1, 1)], 4.0);
    /// ```
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> Matrix<U> {
        Matrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Transpose: `(M×N) → (N×M)`.
    ///
    /// ```
    /// use dense_factor::Matrix;
    /// let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let t = m.transpose();
    /// assert_eq!(t.nrows(), 3);
    /// assert_eq!(t[(2, 1)], 6.0);
    /// ```
    pub fn transpose(&self) -> Self {
        Matrix::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)])
    }

    /// Swap two rows in place.
    #[inline]
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        MatrixMut::swap_rows(self, a, b);
    }

    /// Swap two columns in place.
    #[inline]
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        MatrixMut::swap_cols(self, a, b);
    }
}

// ── Norms ───────────────────────────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// Frobenius norm: `sqrt(sum |a_ij|^2)`.
    ///
    /// ```
    /// use dense_factor::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[3.0_f64, 0.0, 0.0, 4.0]);
    /// assert!((m.norm_fro() - 5.0).abs() < 1e-12);
    /// ```
    pub fn norm_fro(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| acc + x * x)
            .sqrt()
    }

    /// Largest element-wise absolute difference to `rhs`.
    pub fn max_abs_diff(&self, rhs: &Self) -> T {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "dimension mismatch",
        );
        self.data
            .iter()
            .zip(rhs.data.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc.max((a - b).abs()))
    }
}

// ── Random fill ─────────────────────────────────────────────────────

#[cfg(feature = "random")]
impl<T> Matrix<T>
where
    T: crate::traits::Scalar + PartialOrd + rand::distr::uniform::SampleUniform,
{
    /// Create a matrix with entries drawn uniformly from `[min, max)`.
    ///
    /// The generator is a `ChaCha8Rng` seeded with `seed`, so the result is
    /// reproducible across platforms.
    ///
    /// ```
    /// use dense_factor::Matrix;
    /// let a = Matrix::<f64>::random(4, 3, -1.0, 1.0, 42);
    /// let b = Matrix::<f64>::random(4, 3, -1.0, 1.0, 42);
    /// assert_eq!(a, b);
    /// assert!(a.as_slice().iter().all(|&x| (-1.0..1.0).contains(&x)));
    /// ```
    pub fn random(nrows: usize, ncols: usize, min: T, max: T, seed: u64) -> Self {
        let mut m = Self::zeros(nrows, ncols);
        m.fill_random(min, max, seed);
        m
    }

    /// Overwrite every element with a uniform sample from `[min, max)`.
    pub fn fill_random(&mut self, min: T, max: T, seed: u64) {
        use rand::{Rng, SeedableRng};
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        for x in self.data.iter_mut() {
            *x = rng.random_range(min..max);
        }
    }
}

// ── Display ─────────────────────────────────────────────────────────

/// Rows are framed by `│` bars.
///
/// Without a width, each column is as wide as its widest entry. A width
/// (`{:12}`) forces every entry to that fixed field width, and a precision
/// (`{:.3}`) is passed through to the elements.
impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.nrows;
        let n = self.ncols;
        let prec = f.precision();

        let widths: Vec<usize> = match f.width() {
            Some(w) => alloc::vec![w; n],
            None => (0..n)
                .map(|j| {
                    (0..m)
                        .map(|i| WriteCounting::count(|wc| write_elem(wc, &self[(i, j)], prec, 0)))
                        .max()
                        .unwrap_or(0)
                })
                .collect(),
        };

        for i in 0..m {
            write!(f, "│")?;
            for j in 0..n {
                if j > 0 {
                    write!(f, "  ")?;
                }
                write_elem(f, &self[(i, j)], prec, widths[j])?;
            }
            write!(f, "│")?;
            if i + 1 < m {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn write_elem<W: fmt::Write, T: fmt::Display>(
    w: &mut W,
    x: &T,
    prec: Option<usize>,
    width: usize,
) -> fmt::Result {
    match prec {
        Some(p) => write!(w, "{:>width$.p$}", x, width = width, p = p),
        None => write!(w, "{:>width$}", x, width = width),
    }
}

/// Write `m` as a block of fixed-width, fixed-precision rows, one row per
/// line, each line terminated by a newline.
///
/// Shared by the `Display` impls of the factorizations.
pub(crate) fn write_fixed<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    m: &impl MatrixRef<T>,
    width: usize,
    precision: usize,
) -> fmt::Result {
    for i in 0..m.nrows() {
        for j in 0..m.ncols() {
            write_elem(f, m.get(i, j), Some(precision), width)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

struct WriteCounting {
    count: usize,
}

impl WriteCounting {
    fn count(f: impl FnOnce(&mut Self) -> fmt::Result) -> usize {
        let mut wc = WriteCounting { count: 0 };
        let _ = f(&mut wc);
        wc.count
    }
}

impl fmt::Write for WriteCounting {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.count += s.chars().count();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn transpose_rectangular() {
        let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let t = m.transpose();
        assert_eq!(t, Matrix::from_rows(3, 2, &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]));
    }

    #[test]
    fn max_abs_diff() {
        let a = Matrix::from_rows(1, 3, &[1.0, 2.0, 3.0]);
        let b = Matrix::from_rows(1, 3, &[1.5, 2.0, 1.0]);
        assert_eq!(a.max_abs_diff(&b), 2.0);
    }

    #[test]
    fn display_measured() {
        let m = Matrix::from_rows(2, 2, &[1.0, 22.5, -3.0, 4.0]);
        assert_eq!(format!("{}", m), "│ 1  22.5│\n│-3     4│");
    }

    #[test]
    fn display_fixed_width_and_precision() {
        let m = Matrix::from_rows(1, 2, &[1.0, -0.5]);
        assert_eq!(format!("{:7.2}", m), "│   1.00    -0.50│");
    }

    #[test]
    fn write_fixed_block() {
        struct Block<'a>(&'a Matrix<f64>);
        impl fmt::Display for Block<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_fixed(f, self.0, 6, 1)
            }
        }
        let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(format!("{}", Block(&m)), "   1.0   2.0\n   3.0   4.0\n");
    }
}
