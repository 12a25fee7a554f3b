//! Matrix norms and partial copies.

use super::kernels::Strides;
use lapack64_core::Norm;

/// Norm of the `m x n` matrix `a`. NaN entries propagate. `work` holds the
/// column sums (one norm) or row sums (infinity norm).
pub(crate) fn lange(norm: Norm, m: usize, n: usize, a: &[f64], s: Strides, work: &mut [f64]) -> f64 {
    if m == 0 || n == 0 {
        return 0.0;
    }
    match norm {
        Norm::MaxAbs => {
            let mut value = 0.0f64;
            for j in 0..n {
                for i in 0..m {
                    let v = a[s.at(i, j)].abs();
                    if v > value || v.is_nan() {
                        value = v;
                    }
                }
            }
            value
        }
        Norm::One => {
            for j in 0..n {
                work[j] = (0..m).map(|i| a[s.at(i, j)].abs()).sum();
            }
            max_propagating(&work[..n])
        }
        Norm::Infinity => {
            work[..m].fill(0.0);
            for j in 0..n {
                for i in 0..m {
                    work[i] += a[s.at(i, j)].abs();
                }
            }
            max_propagating(&work[..m])
        }
        Norm::Frobenius => {
            let mut scale = 0.0f64;
            let mut ssq = 1.0f64;
            for j in 0..n {
                for i in 0..m {
                    let v = a[s.at(i, j)];
                    if v != 0.0 {
                        let abs = v.abs();
                        if scale < abs {
                            ssq = 1.0 + ssq * (scale / abs) * (scale / abs);
                            scale = abs;
                        } else {
                            ssq += (abs / scale) * (abs / scale);
                        }
                    }
                }
            }
            scale * ssq.sqrt()
        }
    }
}

fn max_propagating(values: &[f64]) -> f64 {
    let mut value = 0.0f64;
    for &v in values {
        if v > value || v.is_nan() {
            value = v;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapack64_core::Layout;

    #[test]
    fn test_lange_all_norms() {
        // [[1, -2], [-3, 4], [5, 0]]
        let a = [1.0, -2.0, -3.0, 4.0, 5.0, 0.0];
        let s = Strides::new(Layout::RowMajor, 2);
        let mut work = [0.0; 3];
        assert_eq!(lange(Norm::MaxAbs, 3, 2, &a, s, &mut work), 5.0);
        assert_eq!(lange(Norm::One, 3, 2, &a, s, &mut work), 9.0);
        assert_eq!(lange(Norm::Infinity, 3, 2, &a, s, &mut work), 7.0);
        let f = lange(Norm::Frobenius, 3, 2, &a, s, &mut work);
        assert!((f - 55.0f64.sqrt()).abs() < 1e-14);
    }

    #[test]
    fn test_lange_transposed_view() {
        let a = [1.0, -2.0, -3.0, 4.0, 5.0, 0.0];
        let s = Strides::new(Layout::RowMajor, 2);
        let mut work = [0.0; 3];
        // One norm of A is the infinity norm of A^T.
        assert_eq!(lange(Norm::Infinity, 2, 3, &a, s.t(), &mut work), 9.0);
    }

    #[test]
    fn test_lange_nan_and_empty() {
        let a = [1.0, f64::NAN, 2.0, 3.0];
        let s = Strides::new(Layout::ColMajor, 2);
        let mut work = [0.0; 2];
        assert!(lange(Norm::MaxAbs, 2, 2, &a, s, &mut work).is_nan());
        assert!(lange(Norm::One, 2, 2, &a, s, &mut work).is_nan());
        assert_eq!(lange(Norm::Frobenius, 0, 2, &[], s, &mut work), 0.0);
    }
}
