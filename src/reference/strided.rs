// src/reference/strided.rs

use super::scalar::Real;

/// Mutable 2-D view over a flat buffer with arbitrary row and column strides.
///
/// A column-major matrix with leading dimension `ld` is `(1, ld)`; its
/// transpose is the same buffer viewed with strides `(ld, 1)`.
pub(crate) struct StridedMut<'a, T> {
    data: &'a mut [T],
    rows: usize,
    cols: usize,
    row_stride: usize,
    col_stride: usize,
}

impl<'a, T: Real> StridedMut<'a, T> {
    pub(crate) fn col_major(data: &'a mut [T], rows: usize, cols: usize, ld: usize) -> Self {
        Self { data, rows, cols, row_stride: 1, col_stride: ld }
    }

    /// Views the `rows x cols` transpose of a column-major buffer with leading
    /// dimension `ld`, i.e. element `(i, j)` of the view is element `(j, i)`
    /// of the buffer.
    pub(crate) fn transposed(data: &'a mut [T], rows: usize, cols: usize, ld: usize) -> Self {
        Self { data, rows, cols, row_stride: ld, col_stride: 1 }
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.rows && j < self.cols);
        i * self.row_stride + j * self.col_stride
    }

    #[inline]
    pub(crate) fn get(&self, i: usize, j: usize) -> T {
        self.data[self.offset(i, j)]
    }

    #[inline]
    pub(crate) fn set(&mut self, i: usize, j: usize, value: T) {
        let off = self.offset(i, j);
        self.data[off] = value;
    }

    pub(crate) fn set_identity(&mut self) {
        for j in 0..self.cols {
            for i in 0..self.rows {
                self.set(i, j, if i == j { T::one() } else { T::zero() });
            }
        }
    }

    pub(crate) fn col_dot(&self, j: usize, k: usize) -> T {
        let mut acc = T::zero();
        for i in 0..self.rows {
            acc += self.get(i, j) * self.get(i, k);
        }
        acc
    }

    pub(crate) fn col_norm(&self, j: usize) -> T {
        // Scaled accumulation keeps tiny and huge columns representable.
        let mut scale = T::zero();
        let mut ssq = T::one();
        for i in 0..self.rows {
            let v = self.get(i, j).abs();
            if v != T::zero() {
                if scale < v {
                    ssq = T::one() + ssq * (scale / v) * (scale / v);
                    scale = v;
                } else {
                    ssq += (v / scale) * (v / scale);
                }
            }
        }
        scale * ssq.sqrt()
    }

    /// Replaces columns `j` and `k` by `c*x_j - s*x_k` and `s*x_j + c*x_k`.
    pub(crate) fn rotate_cols(&mut self, j: usize, k: usize, c: T, s: T) {
        for i in 0..self.rows {
            let xj = self.get(i, j);
            let xk = self.get(i, k);
            self.set(i, j, c * xj - s * xk);
            self.set(i, k, s * xj + c * xk);
        }
    }

    pub(crate) fn swap_cols(&mut self, j: usize, k: usize) {
        if j == k {
            return;
        }
        for i in 0..self.rows {
            let a = self.offset(i, j);
            let b = self.offset(i, k);
            self.data.swap(a, b);
        }
    }

    pub(crate) fn scale_col(&mut self, j: usize, factor: T) {
        for i in 0..self.rows {
            let v = self.get(i, j);
            self.set(i, j, v * factor);
        }
    }

    /// `x_j -= (x_j . x_k) * x_k` for a unit column `k`.
    pub(crate) fn project_out(&mut self, j: usize, k: usize) {
        let coeff = self.col_dot(j, k);
        if coeff == T::zero() {
            return;
        }
        for i in 0..self.rows {
            let v = self.get(i, j) - coeff * self.get(i, k);
            self.set(i, j, v);
        }
    }

    /// Overwrites column `j` with a unit vector orthogonal to columns
    /// `0..j`, which must already be orthonormal. Returns `false` when
    /// `j >= rows`, where no such vector exists.
    pub(crate) fn fill_orthonormal_col(&mut self, j: usize) -> bool {
        let half = T::from_f64(0.5);
        for candidate in 0..self.rows {
            for i in 0..self.rows {
                self.set(i, j, if i == candidate { T::one() } else { T::zero() });
            }
            // Two Gram-Schmidt passes restore orthogonality lost to rounding.
            for _ in 0..2 {
                for k in 0..j {
                    self.project_out(j, k);
                }
            }
            let norm = self.col_norm(j);
            if norm > half {
                self.scale_col(j, T::one() / norm);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transposed_view_swaps_indices() {
        // 2x3 column-major: [[1, 3, 5], [2, 4, 6]]
        let mut buf = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0];
        let view = StridedMut::transposed(&mut buf, 3, 2, 2);
        assert_eq!(view.get(0, 1), 2.0);
        assert_eq!(view.get(2, 0), 5.0);
        assert_eq!(view.get(2, 1), 6.0);
    }

    #[test]
    fn fill_orthonormal_col_completes_a_basis() {
        let mut buf = vec![0.0_f64; 9];
        let mut view = StridedMut::col_major(&mut buf, 3, 3, 3);
        let inv_sqrt2 = 1.0 / 2.0_f64.sqrt();
        view.set(0, 0, inv_sqrt2);
        view.set(1, 0, inv_sqrt2);
        assert!(view.fill_orthonormal_col(1));
        assert!(view.fill_orthonormal_col(2));
        for j in 0..3 {
            for k in 0..3 {
                let expected = if j == k { 1.0 } else { 0.0 };
                assert!((view.col_dot(j, k) - expected).abs() < 1e-14);
            }
        }
    }
}
