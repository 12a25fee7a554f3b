//! LU factorization `P * A = L * U` with partial pivoting, solve and inverse.

use super::kernels::{pivot_search, swap_rows, trsm, Strides};
use lapack64_core::Transpose;

/// Factors the `m x n` matrix `a` in place: `L` (unit lower, diagonal not
/// stored) below the diagonal, `U` on and above it. Row `k` was interchanged
/// with row `ipiv[k]`.
///
/// A zero pivot does not stop the factorization; the column is left unscaled
/// and `false` is returned once every column is done.
pub(crate) fn getrf(m: usize, n: usize, a: &mut [f64], s: Strides, ipiv: &mut [usize]) -> bool {
    let mut nonsingular = true;

    for k in 0..m.min(n) {
        let (max_idx, max_val) = pivot_search(a, s, k, k..m);
        ipiv[k] = max_idx;

        if max_val == 0.0 {
            if nonsingular {
                log::trace!("getrf: U({k}, {k}) is exactly zero");
            }
            nonsingular = false;
        } else {
            swap_rows(a, s, k, max_idx, n);
            let inv_pivot = 1.0 / a[s.at(k, k)];
            for i in (k + 1)..m {
                a[s.at(i, k)] *= inv_pivot;
            }
        }

        trailing_update(a, s, k, m, n);
    }

    nonsingular
}

/// `A[i, j] -= A[i, k] * A[k, j]` for `i > k`, `j > k`.
#[inline]
fn trailing_update(a: &mut [f64], s: Strides, k: usize, m: usize, n: usize) {
    for i in (k + 1)..m {
        let lik = a[s.at(i, k)];
        if lik == 0.0 {
            continue;
        }
        for j in (k + 1)..n {
            a[s.at(i, j)] -= lik * a[s.at(k, j)];
        }
    }
}

/// Solves `op(A) * X = B` from the factors left by [`getrf`].
pub(crate) fn getrs(
    trans: Transpose,
    n: usize,
    nrhs: usize,
    a: &[f64],
    sa: Strides,
    ipiv: &[usize],
    b: &mut [f64],
    sb: Strides,
) {
    if trans.is_trans() {
        // A^T = U^T L^T P: solve U^T, then L^T, then undo the interchanges.
        trsm(false, false, n, nrhs, a, sa.t(), b, sb);
        trsm(true, true, n, nrhs, a, sa.t(), b, sb);
        for k in (0..n).rev() {
            swap_rows(b, sb, k, ipiv[k], nrhs);
        }
    } else {
        for k in 0..n {
            swap_rows(b, sb, k, ipiv[k], nrhs);
        }
        trsm(false, true, n, nrhs, a, sa, b, sb);
        trsm(true, false, n, nrhs, a, sa, b, sb);
    }
}

/// Overwrites the factors left by [`getrf`] with `inv(A)`, using
/// `inv(A) * L = inv(U)` followed by the column interchanges. `work` holds at
/// least `n` elements.
pub(crate) fn getri(n: usize, a: &mut [f64], s: Strides, ipiv: &[usize], work: &mut [f64]) -> bool {
    if (0..n).any(|i| a[s.at(i, i)] == 0.0) {
        return false;
    }

    invert_upper(n, a, s);

    // Solve inv(A) * L = inv(U) one column at a time, right to left.
    for j in (0..n).rev() {
        for i in (j + 1)..n {
            work[i] = a[s.at(i, j)];
            a[s.at(i, j)] = 0.0;
        }
        for i in (j + 1)..n {
            let w = work[i];
            if w == 0.0 {
                continue;
            }
            for r in 0..n {
                a[s.at(r, j)] -= a[s.at(r, i)] * w;
            }
        }
    }

    for j in (0..n.saturating_sub(1)).rev() {
        let jp = ipiv[j];
        if jp != j {
            for r in 0..n {
                a.swap(s.at(r, j), s.at(r, jp));
            }
        }
    }
    true
}

/// Inverts the non-singular upper triangle of `a` in place.
fn invert_upper(n: usize, a: &mut [f64], s: Strides) {
    for j in 0..n {
        let ajj = 1.0 / a[s.at(j, j)];
        a[s.at(j, j)] = ajj;
        // x := T * x for x = a[0..j, j], T the already inverted leading block.
        for jj in 0..j {
            let temp = a[s.at(jj, j)];
            if temp != 0.0 {
                for i in 0..jj {
                    a[s.at(i, j)] += temp * a[s.at(i, jj)];
                }
                a[s.at(jj, j)] = temp * a[s.at(jj, jj)];
            }
        }
        for i in 0..j {
            a[s.at(i, j)] *= -ajj;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapack64_core::Layout;

    fn matmul(n: usize, a: &[f64], b: &[f64]) -> Vec<f64> {
        let mut c = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    c[i * n + j] += a[i * n + k] * b[k * n + j];
                }
            }
        }
        c
    }

    #[test]
    fn test_getrf_3x3() {
        // A = [[1, 2, 3], [4, 5, 6], [7, 8, 10]]
        let mut a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0];
        let mut ipiv = vec![0usize; 3];
        assert!(getrf(3, 3, &mut a, Strides::new(Layout::RowMajor, 3), &mut ipiv));
        assert_eq!(ipiv[0], 2);
        assert_eq!(a[0], 7.0);
    }

    #[test]
    fn test_getrf_and_solve() {
        // A = [[3, 1], [1, 2]], A x = [9, 8] -> x = [2, 3]
        for layout in [Layout::RowMajor, Layout::ColMajor] {
            let s = Strides::new(layout, 2);
            let mut a = vec![3.0, 1.0, 1.0, 2.0];
            let mut ipiv = vec![0usize; 2];
            assert!(getrf(2, 2, &mut a, s, &mut ipiv));
            let mut b = vec![9.0, 8.0];
            getrs(Transpose::NoTrans, 2, 1, &a, s, &ipiv, &mut b, Strides { rs: 1, cs: 2 });
            assert!((b[0] - 2.0).abs() < 1e-12, "x[0] = {}", b[0]);
            assert!((b[1] - 3.0).abs() < 1e-12, "x[1] = {}", b[1]);
        }
    }

    #[test]
    fn test_getrs_transposed() {
        // A = [[1, 2], [3, 4]], A^T x = [7, 10] -> x = [1, 2]
        let s = Strides::new(Layout::RowMajor, 2);
        let mut a = vec![1.0, 2.0, 3.0, 4.0];
        let mut ipiv = vec![0usize; 2];
        assert!(getrf(2, 2, &mut a, s, &mut ipiv));
        let mut b = vec![7.0, 10.0];
        getrs(Transpose::Trans, 2, 1, &a, s, &ipiv, &mut b, Strides { rs: 1, cs: 2 });
        assert!((b[0] - 1.0).abs() < 1e-12 && (b[1] - 2.0).abs() < 1e-12, "{b:?}");
    }

    #[test]
    fn test_getrf_singular_completes() {
        // Second column is twice the first; every step is exact in binary.
        let mut a = vec![2.0, 4.0, 1.0, 1.0, 2.0, 3.0, 4.0, 8.0, 5.0];
        let mut ipiv = vec![0usize; 3];
        assert!(!getrf(3, 3, &mut a, Strides::new(Layout::RowMajor, 3), &mut ipiv));
        // Every pivot was still recorded and the last column eliminated.
        assert_eq!(ipiv[0], 2);
        assert!(ipiv.iter().all(|&p| p < 3));
        assert_eq!(a[4], 0.0);
    }

    #[test]
    fn test_getri_inverse() {
        let orig = vec![4.0, 7.0, 2.0, 3.0, 6.0, 1.0, 2.0, 5.0, 3.0];
        for layout in [Layout::RowMajor, Layout::ColMajor] {
            let s = Strides::new(layout, 3);
            // Lay out `orig` (row-major values) in `layout`.
            let mut a = vec![0.0; 9];
            for i in 0..3 {
                for j in 0..3 {
                    a[s.at(i, j)] = orig[i * 3 + j];
                }
            }
            let mut ipiv = vec![0usize; 3];
            assert!(getrf(3, 3, &mut a, s, &mut ipiv));
            let mut work = vec![0.0; 3];
            assert!(getri(3, &mut a, s, &ipiv, &mut work));
            let mut inv = vec![0.0; 9];
            for i in 0..3 {
                for j in 0..3 {
                    inv[i * 3 + j] = a[s.at(i, j)];
                }
            }
            let id = matmul(3, &orig, &inv);
            for i in 0..3 {
                for j in 0..3 {
                    let want = if i == j { 1.0 } else { 0.0 };
                    assert!((id[i * 3 + j] - want).abs() < 1e-12, "{layout:?} ({i}, {j}) = {}", id[i * 3 + j]);
                }
            }
        }
    }

    #[test]
    fn test_getri_singular_leaves_a() {
        let mut a = vec![1.0, 2.0, 0.0, 0.0];
        let before = a.clone();
        let mut work = vec![0.0; 2];
        assert!(!getri(2, &mut a, Strides::new(Layout::RowMajor, 2), &[0, 1], &mut work));
        assert_eq!(a, before);
    }
}
