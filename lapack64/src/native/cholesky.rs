//! Cholesky factorization `A = L * L^T` (or `U^T * U`) and solve.

use super::kernels::{trsm, Strides};
use lapack64_core::Uplo;

/// Factors the `uplo` half of `a` in place. The other half is neither read nor
/// written. Returns `false` at the first non-positive leading minor, leaving
/// the columns (rows) before it factored.
pub(crate) fn potrf(uplo: Uplo, n: usize, a: &mut [f64], s: Strides) -> bool {
    // Upper is the lower-triangle algorithm run on the transposed view.
    let s = match uplo {
        Uplo::Upper => s.t(),
        _ => s,
    };
    potrf_lower(n, a, s)
}

#[inline]
fn potrf_lower(n: usize, a: &mut [f64], s: Strides) -> bool {
    for j in 0..n {
        let mut sum = a[s.at(j, j)];
        for k in 0..j {
            let ljk = a[s.at(j, k)];
            sum -= ljk * ljk;
        }

        if sum <= 0.0 || sum.is_nan() {
            a[s.at(j, j)] = sum;
            log::trace!("potrf: leading minor {} is not positive definite", j + 1);
            return false;
        }
        let ljj = sum.sqrt();
        a[s.at(j, j)] = ljj;

        for i in (j + 1)..n {
            let mut t = a[s.at(i, j)];
            for k in 0..j {
                t -= a[s.at(i, k)] * a[s.at(j, k)];
            }
            a[s.at(i, j)] = t / ljj;
        }
    }
    true
}

/// Solves `A * X = B` from the factor left by [`potrf`].
pub(crate) fn potrs(uplo: Uplo, n: usize, nrhs: usize, a: &[f64], sa: Strides, b: &mut [f64], sb: Strides) {
    match uplo {
        Uplo::Upper => {
            // U^T * Y = B, then U * X = Y
            trsm(false, false, n, nrhs, a, sa.t(), b, sb);
            trsm(true, false, n, nrhs, a, sa, b, sb);
        }
        _ => {
            // L * Y = B, then L^T * X = Y
            trsm(false, false, n, nrhs, a, sa, b, sb);
            trsm(true, false, n, nrhs, a, sa.t(), b, sb);
        }
    }
}
