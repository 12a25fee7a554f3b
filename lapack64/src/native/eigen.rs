//! Symmetric eigenvalue problem by cyclic Jacobi rotations.

use super::kernels::Strides;
use lapack64_core::Uplo;

/// Default sweep limit; quadratic convergence finishes well-conditioned
/// inputs in under ten.
pub(crate) const MAX_SWEEPS: usize = 50;

#[cfg(test)]
pub(crate) fn syev(vectors: bool, uplo: Uplo, n: usize, a: &mut [f64], s: Strides, w: &mut [f64], work: &mut [f64]) -> usize {
    syev_with_limit(vectors, uplo, n, a, s, w, work, MAX_SWEEPS)
}

/// Eigenvalues of the symmetric matrix in the `uplo` half of `a`, ascending in
/// `w`, after at most `max_sweeps` Jacobi sweeps. With `vectors` all of `a` is
/// overwritten by the eigenvectors, column `i` belonging to `w[i]`; otherwise
/// `a` is not written.
///
/// Returns how many eigenvalues converged. On a shortfall `w` still holds the
/// current diagonal approximations. `work[..n]` receives each row's remaining
/// squared off-diagonal mass, relative to the largest entry of the input.
pub(crate) fn syev_with_limit(
    vectors: bool,
    uplo: Uplo,
    n: usize,
    a: &mut [f64],
    s: Strides,
    w: &mut [f64],
    work: &mut [f64],
    max_sweeps: usize,
) -> usize {
    if n == 0 {
        return 0;
    }

    // Dense copy of the full matrix, read from the stored half only.
    let mut h = vec![0.0f64; n * n];
    for i in 0..n {
        for j in 0..n {
            let (r, c) = if uplo.contains(i, j) { (i, j) } else { (j, i) };
            h[i * n + j] = a[s.at(r, c)];
        }
    }

    if vectors {
        for i in 0..n {
            for j in 0..n {
                a[s.at(i, j)] = if i == j { 1.0 } else { 0.0 };
            }
        }
    }

    let amax = h.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if amax == 0.0 {
        w[..n].fill(0.0);
        work[..n].fill(0.0);
        return n;
    }
    // Rotations are invariant under scaling. Working at unit magnitude keeps
    // the squared sums below clear of overflow and underflow.
    let scale = if amax.is_finite() { amax } else { 1.0 };
    if scale != 1.0 {
        h.iter_mut().for_each(|v| *v /= scale);
    }

    let norm2: f64 = h.iter().map(|v| v * v).sum();
    let tol = f64::EPSILON * f64::EPSILON * norm2;

    let mut sweeps = 0;
    while sweeps < max_sweeps && off_diagonal(&h, n) > tol {
        sweeps += 1;
        for p in 0..n - 1 {
            for q in (p + 1)..n {
                let apq = h[p * n + q];
                if apq == 0.0 {
                    continue;
                }
                let theta = (h[q * n + q] - h[p * n + p]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + theta.hypot(1.0));
                let c = 1.0 / t.hypot(1.0);
                let sn = t * c;

                for k in 0..n {
                    let (hkp, hkq) = (h[k * n + p], h[k * n + q]);
                    h[k * n + p] = c * hkp - sn * hkq;
                    h[k * n + q] = sn * hkp + c * hkq;
                }
                for k in 0..n {
                    let (hpk, hqk) = (h[p * n + k], h[q * n + k]);
                    h[p * n + k] = c * hpk - sn * hqk;
                    h[q * n + k] = sn * hpk + c * hqk;
                }
                h[p * n + q] = 0.0;
                h[q * n + p] = 0.0;

                if vectors {
                    for k in 0..n {
                        let (akp, akq) = (a[s.at(k, p)], a[s.at(k, q)]);
                        a[s.at(k, p)] = c * akp - sn * akq;
                        a[s.at(k, q)] = sn * akp + c * akq;
                    }
                }
            }
        }
    }
    log::trace!("syev: {sweeps} Jacobi sweeps for n = {n}");

    let done = off_diagonal(&h, n) <= tol;
    let row_tol = tol / n as f64;
    for i in 0..n {
        w[i] = h[i * n + i] * scale;
        work[i] = (0..n).filter(|&j| j != i).map(|j| h[i * n + j] * h[i * n + j]).sum();
    }

    // Selection sort keeps the eigenvector swaps to at most n - 1.
    for i in 0..n {
        let mut min = i;
        for j in (i + 1)..n {
            if w[j] < w[min] {
                min = j;
            }
        }
        if min != i {
            w.swap(i, min);
            work.swap(i, min);
            if vectors {
                for k in 0..n {
                    a.swap(s.at(k, i), s.at(k, min));
                }
            }
        }
    }

    if done {
        return n;
    }
    let converged = work[..n].iter().filter(|&&mass| mass <= row_tol).count();
    log::warn!("syev: {} of {n} eigenvalues failed to converge", n - converged);
    converged
}

fn off_diagonal(h: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum += h[i * n + j] * h[i * n + j];
            }
        }
    }
    sum
}
