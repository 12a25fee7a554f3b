//! Scalar building blocks shared by the native routines.
//!
//! Every kernel addresses its matrix through [`Strides`]: element `(i, j)`
//! lives at `i * rs + j * cs`. Row-major and column-major storage differ only
//! in the stride pair, and a transposed view is the same pair swapped, so one
//! loop nest serves both layouts and both `Transpose` variants.

use lapack64_core::Layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Strides {
    pub rs: usize,
    pub cs: usize,
}

impl Strides {
    #[inline(always)]
    pub fn new(layout: Layout, ld: usize) -> Self {
        let (rs, cs) = layout.strides(ld);
        Strides { rs, cs }
    }

    #[inline(always)]
    pub fn at(self, i: usize, j: usize) -> usize {
        i * self.rs + j * self.cs
    }

    /// Same storage read as the transpose.
    #[inline(always)]
    pub fn t(self) -> Self {
        Strides {
            rs: self.cs,
            cs: self.rs,
        }
    }
}

/// Index and absolute value of the first largest `|a(i, col)|`, `i` in `rows`.
#[inline]
pub(crate) fn pivot_search(a: &[f64], s: Strides, col: usize, rows: std::ops::Range<usize>) -> (usize, f64) {
    let mut max_idx = rows.start;
    let mut max_val = 0.0f64;
    for i in rows {
        let v = a[s.at(i, col)].abs();
        if v > max_val {
            max_val = v;
            max_idx = i;
        }
    }
    (max_idx, max_val)
}

/// Swaps rows `r1` and `r2` across columns `0..n`.
#[inline]
pub(crate) fn swap_rows(a: &mut [f64], s: Strides, r1: usize, r2: usize, n: usize) {
    if r1 == r2 {
        return;
    }
    for j in 0..n {
        a.swap(s.at(r1, j), s.at(r2, j));
    }
}

/// Euclidean norm of `n` elements `inc` apart, scaled to avoid overflow.
pub(crate) fn nrm2(x: &[f64], n: usize, inc: usize) -> f64 {
    let mut scale = 0.0f64;
    let mut ssq = 1.0f64;
    for k in 0..n {
        let v = x[k * inc];
        if v != 0.0 {
            let a = v.abs();
            if scale < a {
                ssq = 1.0 + ssq * (scale / a) * (scale / a);
                scale = a;
            } else {
                ssq += (a / scale) * (a / scale);
            }
        }
    }
    scale * ssq.sqrt()
}

/// Generates an elementary reflector `H` with `H * [alpha; x] = [beta; 0]`.
///
/// `x` (`n - 1` elements, `inc` apart) is overwritten with the reflector tail;
/// the leading element of `v` is an implicit one. `tau == 0` means `H = I`.
/// Returns `(beta, tau)`.
pub(crate) fn larfg(n: usize, mut alpha: f64, x: &mut [f64], inc: usize) -> (f64, f64) {
    if n <= 1 {
        return (alpha, 0.0);
    }
    let mut xnorm = nrm2(x, n - 1, inc);
    if xnorm == 0.0 {
        return (alpha, 0.0);
    }

    let signed = |alpha: f64, xnorm: f64| {
        let r = alpha.hypot(xnorm);
        if alpha >= 0.0 {
            -r
        } else {
            r
        }
    };
    let mut beta = signed(alpha, xnorm);

    // Rescale tiny inputs so 1 / (alpha - beta) stays representable.
    let safmin = f64::MIN_POSITIVE / f64::EPSILON;
    let mut knt = 0;
    if beta.abs() < safmin {
        let rsafmn = 1.0 / safmin;
        loop {
            knt += 1;
            scal(x, n - 1, inc, rsafmn);
            beta *= rsafmn;
            alpha *= rsafmn;
            if beta.abs() >= safmin || knt >= 20 {
                break;
            }
        }
        xnorm = nrm2(x, n - 1, inc);
        beta = signed(alpha, xnorm);
    }

    let tau = (beta - alpha) / beta;
    scal(x, n - 1, inc, 1.0 / (alpha - beta));
    for _ in 0..knt {
        beta *= safmin;
    }
    (beta, tau)
}

#[inline]
pub(crate) fn scal(x: &mut [f64], n: usize, inc: usize, alpha: f64) {
    for k in 0..n {
        x[k * inc] *= alpha;
    }
}

/// Applies `H = I - tau * v * v^T` from the left to the `m x n` block of `c`
/// whose `(0, 0)` element sits at `off`.
///
/// `v(c, i)` yields element `i` of `v`. It receives `c` so the reflector may
/// live in the same buffer, outside the block being updated. `work` holds at
/// least `n` elements.
pub(crate) fn larf_left<V>(v: V, tau: f64, m: usize, n: usize, c: &mut [f64], off: usize, s: Strides, work: &mut [f64])
where
    V: Fn(&[f64], usize) -> f64,
{
    if tau == 0.0 || m == 0 || n == 0 {
        return;
    }
    // w = C^T v
    for j in 0..n {
        let mut sum = 0.0;
        for i in 0..m {
            sum += c[off + s.at(i, j)] * v(c, i);
        }
        work[j] = sum;
    }
    // C -= tau v w^T
    for i in 0..m {
        let vi = tau * v(c, i);
        if vi == 0.0 {
            continue;
        }
        for j in 0..n {
            c[off + s.at(i, j)] -= vi * work[j];
        }
    }
}

/// Applies `H = I - tau * v * v^T` from the right to the `m x n` block of `c`
/// at `off`. `work` holds at least `m` elements.
pub(crate) fn larf_right<V>(v: V, tau: f64, m: usize, n: usize, c: &mut [f64], off: usize, s: Strides, work: &mut [f64])
where
    V: Fn(&[f64], usize) -> f64,
{
    if tau == 0.0 || m == 0 || n == 0 {
        return;
    }
    // w = C v
    for i in 0..m {
        let mut sum = 0.0;
        for j in 0..n {
            sum += c[off + s.at(i, j)] * v(c, j);
        }
        work[i] = sum;
    }
    // C -= tau w v^T
    for j in 0..n {
        let vj = tau * v(c, j);
        if vj == 0.0 {
            continue;
        }
        for i in 0..m {
            c[off + s.at(i, j)] -= work[i] * vj;
        }
    }
}

/// Solves `T * X = B` in place for an `n x n` triangular `T` and `n x nrhs`
/// `B`. Passing `sa.t()` with the opposite `upper` solves with `T^T`.
pub(crate) fn trsm(
    upper: bool,
    unit: bool,
    n: usize,
    nrhs: usize,
    a: &[f64],
    sa: Strides,
    b: &mut [f64],
    sb: Strides,
) {
    for col in 0..nrhs {
        if upper {
            for i in (0..n).rev() {
                let mut s = b[sb.at(i, col)];
                for k in (i + 1)..n {
                    s -= a[sa.at(i, k)] * b[sb.at(k, col)];
                }
                if !unit {
                    s /= a[sa.at(i, i)];
                }
                b[sb.at(i, col)] = s;
            }
        } else {
            for i in 0..n {
                let mut s = b[sb.at(i, col)];
                for k in 0..i {
                    s -= a[sa.at(i, k)] * b[sb.at(k, col)];
                }
                if !unit {
                    s /= a[sa.at(i, i)];
                }
                b[sb.at(i, col)] = s;
            }
        }
    }
}
