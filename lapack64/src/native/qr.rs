//! Householder QR: factorization, column pivoting, forming Q and least
//! squares.
//!
//! Reflector `k` is stored LAPACK style: `v(k) = 1` is implicit, `v(k+1..m)`
//! sits below the diagonal of column `k`, its scalar in `tau[k]`.

use super::kernels::{larf_left, larfg, nrm2, trsm, Strides};
use lapack64_core::Transpose;

/// Element `i` of reflector `k`, read from column `k` of `a` starting at row
/// `k`.
#[inline(always)]
fn reflector(s: Strides, k: usize) -> impl Fn(&[f64], usize) -> f64 {
    move |a: &[f64], i: usize| if i == 0 { 1.0 } else { a[s.at(k + i, k)] }
}

/// Builds reflector `k` from column `k` of `a` and returns its scalar.
#[inline]
fn reflect_column(m: usize, a: &mut [f64], s: Strides, k: usize) -> f64 {
    let alpha = a[s.at(k, k)];
    let tail = if k + 1 < m { s.at(k + 1, k) } else { s.at(k, k) };
    let (beta, tau) = larfg(m - k, alpha, &mut a[tail..], s.rs);
    a[s.at(k, k)] = beta;
    tau
}

/// `A = Q * R`. `work` holds at least `n` elements.
pub(crate) fn geqrf(m: usize, n: usize, a: &mut [f64], s: Strides, tau: &mut [f64], work: &mut [f64]) {
    for k in 0..m.min(n) {
        tau[k] = reflect_column(m, a, s, k);
        if k + 1 < n {
            // Apply H(k) to A[k.., k+1..] from the left.
            let off = s.at(k, k + 1);
            larf_left(reflector(s, k), tau[k], m - k, n - k - 1, a, off, s, work);
        }
    }
}

/// `A * P = Q * R` with column pivoting on the largest remaining partial
/// column norm. Norms are downdated each step and recomputed once
/// cancellation makes the downdate unreliable. `work` holds at least `3n`
/// elements.
pub(crate) fn geqp3(
    m: usize,
    n: usize,
    a: &mut [f64],
    s: Strides,
    jpvt: &mut [usize],
    tau: &mut [f64],
    work: &mut [f64],
) {
    let (vn1, rest) = work.split_at_mut(n);
    let (vn2, w) = rest.split_at_mut(n);

    for j in 0..n {
        jpvt[j] = j;
        vn1[j] = if m == 0 { 0.0 } else { nrm2(&a[s.at(0, j)..], m, s.rs) };
        vn2[j] = vn1[j];
    }

    let tol3z = f64::EPSILON.sqrt();
    for i in 0..m.min(n) {
        let mut pvt = i;
        for j in (i + 1)..n {
            if vn1[j] > vn1[pvt] {
                pvt = j;
            }
        }
        if pvt != i {
            for r in 0..m {
                a.swap(s.at(r, pvt), s.at(r, i));
            }
            jpvt.swap(pvt, i);
            vn1[pvt] = vn1[i];
            vn2[pvt] = vn2[i];
        }

        tau[i] = reflect_column(m, a, s, i);
        if i + 1 < n {
            let off = s.at(i, i + 1);
            larf_left(reflector(s, i), tau[i], m - i, n - i - 1, a, off, s, w);
        }

        for j in (i + 1)..n {
            if vn1[j] == 0.0 {
                continue;
            }
            let ratio = a[s.at(i, j)].abs() / vn1[j];
            let temp = (1.0 - ratio * ratio).max(0.0);
            let scaled = vn1[j] / vn2[j];
            if temp * scaled * scaled <= tol3z {
                if i + 1 < m {
                    vn1[j] = nrm2(&a[s.at(i + 1, j)..], m - i - 1, s.rs);
                    vn2[j] = vn1[j];
                } else {
                    vn1[j] = 0.0;
                    vn2[j] = 0.0;
                }
            } else {
                vn1[j] *= temp.sqrt();
            }
        }
    }
}

/// Overwrites `a` (`m x n`, `m >= n >= k`) with the first `n` columns of
/// `H(0) * H(1) * ... * H(k-1)`. `work` holds at least `n` elements.
pub(crate) fn orgqr(m: usize, n: usize, k: usize, a: &mut [f64], s: Strides, tau: &[f64], work: &mut [f64]) {
    // Columns k..n start as columns of the identity.
    for j in k..n {
        for l in 0..m {
            a[s.at(l, j)] = 0.0;
        }
        a[s.at(j, j)] = 1.0;
    }

    for i in (0..k).rev() {
        if i + 1 < n {
            let off = s.at(i, i + 1);
            larf_left(reflector(s, i), tau[i], m - i, n - i - 1, a, off, s, work);
        }
        for l in (i + 1)..m {
            a[s.at(l, i)] *= -tau[i];
        }
        a[s.at(i, i)] = 1.0 - tau[i];
        for l in 0..i {
            a[s.at(l, i)] = 0.0;
        }
    }
}

/// Least squares (`op(A)` tall) or minimum norm (`op(A)` wide) solution of
/// `op(A) * X = B` for `A` of full rank. `b` holds `max(m, n)` rows. `work`
/// holds at least `min(m, n) + max(min(m, n), nrhs)` elements.
///
/// A wide `A` is handled as the QR factorization of the tall `A^T` with the
/// transpose flag flipped: `A = R^T * Q^T` is its LQ factorization.
pub(crate) fn gels(
    trans: Transpose,
    m: usize,
    n: usize,
    nrhs: usize,
    a: &mut [f64],
    sa: Strides,
    b: &mut [f64],
    sb: Strides,
    work: &mut [f64],
) -> bool {
    let rows_b = m.max(n);
    if m.min(n).min(nrhs) == 0 {
        for i in 0..rows_b {
            for j in 0..nrhs {
                b[sb.at(i, j)] = 0.0;
            }
        }
        return true;
    }

    let (rows, cols, s, solve_tall) = if m >= n {
        (m, n, sa, !trans.is_trans())
    } else {
        (n, m, sa.t(), trans.is_trans())
    };

    let (tau, w) = work.split_at_mut(cols);
    geqrf(rows, cols, a, s, tau, w);
    if (0..cols).any(|i| a[s.at(i, i)] == 0.0) {
        log::trace!("gels: triangular factor is singular, matrix is rank deficient");
        return false;
    }

    if solve_tall {
        // Least squares: B := Q^T B, then R X = B[..cols].
        for k in 0..cols {
            let v = |_: &[f64], i: usize| if i == 0 { 1.0 } else { a[s.at(k + i, k)] };
            larf_left(v, tau[k], rows - k, nrhs, b, sb.at(k, 0), sb, w);
        }
        trsm(true, false, cols, nrhs, a, s, b, sb);
    } else {
        // Minimum norm: R^T Y = B[..cols], B[cols..rows] = 0, X = Q B.
        trsm(false, false, cols, nrhs, a, s.t(), b, sb);
        for i in cols..rows {
            for j in 0..nrhs {
                b[sb.at(i, j)] = 0.0;
            }
        }
        for k in (0..cols).rev() {
            let v = |_: &[f64], i: usize| if i == 0 { 1.0 } else { a[s.at(k + i, k)] };
            larf_left(v, tau[k], rows - k, nrhs, b, sb.at(k, 0), sb, w);
        }
    }
    true
}
