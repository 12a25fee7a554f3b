//! The backend capability contract.
//!
//! A [`Backend`] implements the routine catalog on raw primitives: a layout,
//! option enums, extents, leading dimensions and slices. Arguments reaching a
//! backend have already passed every contract check in
//! [`Lapack64`](crate::Lapack64), and workspace slices are exactly the
//! declared length, never shorter than the routine's minimum. Indices
//! (`ipiv`, `jpvt`) are 0-based.
//!
//! `Err` is reserved for failures the backend detects itself, such as an
//! external library reporting an illegal argument. Singular or non-definite
//! input is reported through the success value.

use std::fmt;
use std::str::FromStr;

use lapack64_core::{Diag, EigenJob, Error, Layout, Norm, Result, Side, Transpose, Uplo};

/// Outcome of an eigenvalue computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convergence {
    /// Eigenvalues that converged.
    pub converged: usize,
    /// Order of the matrix.
    pub total: usize,
}

impl Convergence {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.converged == self.total
    }
}

/// Elementary reflector `H = I - tau * v * v^T` with `H * [alpha; x] = [beta; 0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflector {
    pub beta: f64,
    pub tau: f64,
}

/// Routine catalog. One method per LAPACK routine, named after it.
pub trait Backend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Cholesky factorization of the `uplo` half of `a`. Returns `false` if
    /// `a` is not positive definite.
    fn dpotrf(&self, layout: Layout, uplo: Uplo, n: usize, a: &mut [f64], lda: usize) -> Result<bool>;

    /// Solves `A * X = B` with `A` factored by [`Backend::dpotrf`].
    fn dpotrs(
        &self,
        layout: Layout,
        uplo: Uplo,
        n: usize,
        nrhs: usize,
        a: &[f64],
        lda: usize,
        b: &mut [f64],
        ldb: usize,
    ) -> Result<()>;

    /// LU factorization with partial pivoting. Row `i` was interchanged with
    /// row `ipiv[i]`. Returns `false` if `U` has an exact zero on its diagonal;
    /// the factorization is completed regardless.
    fn dgetrf(&self, layout: Layout, m: usize, n: usize, a: &mut [f64], lda: usize, ipiv: &mut [usize])
        -> Result<bool>;

    /// Solves `op(A) * X = B` with `A` factored by [`Backend::dgetrf`].
    fn dgetrs(
        &self,
        layout: Layout,
        trans: Transpose,
        n: usize,
        nrhs: usize,
        a: &[f64],
        lda: usize,
        ipiv: &[usize],
        b: &mut [f64],
        ldb: usize,
    ) -> Result<()>;

    /// Inverse from LU factors. Returns `false`, leaving `a` untouched, if `U`
    /// is singular.
    fn dgetri(&self, layout: Layout, n: usize, a: &mut [f64], lda: usize, ipiv: &[usize], work: &mut [f64])
        -> Result<bool>;

    /// Solves `op(A) * X = B` for triangular `A`. Returns `false`, leaving `b`
    /// untouched, if a non-unit diagonal holds an exact zero.
    fn dtrtrs(
        &self,
        layout: Layout,
        uplo: Uplo,
        trans: Transpose,
        diag: Diag,
        n: usize,
        nrhs: usize,
        a: &[f64],
        lda: usize,
        b: &mut [f64],
        ldb: usize,
    ) -> Result<bool>;

    /// Householder QR. `R` lands in the upper trapezoid of `a`, the reflector
    /// tails below it, their scalars in `tau[..min(m, n)]`.
    fn dgeqrf(
        &self,
        layout: Layout,
        m: usize,
        n: usize,
        a: &mut [f64],
        lda: usize,
        tau: &mut [f64],
        work: &mut [f64],
    ) -> Result<()>;

    /// Householder QR with column pivoting: `A * P = Q * R` where column `j` of
    /// `A * P` is column `jpvt[j]` of `A`.
    fn dgeqp3(
        &self,
        layout: Layout,
        m: usize,
        n: usize,
        a: &mut [f64],
        lda: usize,
        jpvt: &mut [usize],
        tau: &mut [f64],
        work: &mut [f64],
    ) -> Result<()>;

    /// Overwrites the `m x n` matrix `a` with the first `n` columns of the
    /// product of the first `k` reflectors left by [`Backend::dgeqrf`].
    fn dorgqr(
        &self,
        layout: Layout,
        m: usize,
        n: usize,
        k: usize,
        a: &mut [f64],
        lda: usize,
        tau: &[f64],
        work: &mut [f64],
    ) -> Result<()>;

    /// Least squares or minimum norm solution of `op(A) * X = B` for a full
    /// rank `A`. `b` has `max(m, n)` rows. Returns `false` if `A` is rank
    /// deficient, in which case `b` is unspecified.
    fn dgels(
        &self,
        layout: Layout,
        trans: Transpose,
        m: usize,
        n: usize,
        nrhs: usize,
        a: &mut [f64],
        lda: usize,
        b: &mut [f64],
        ldb: usize,
        work: &mut [f64],
    ) -> Result<bool>;

    /// Eigenvalues, ascending in `w`, of the symmetric matrix stored in the
    /// `uplo` half of `a`. With [`EigenJob::Vectors`] the orthonormal
    /// eigenvectors overwrite all of `a`, column `i` belonging to `w[i]`.
    fn dsyev(
        &self,
        layout: Layout,
        jobz: EigenJob,
        uplo: Uplo,
        n: usize,
        a: &mut [f64],
        lda: usize,
        w: &mut [f64],
        work: &mut [f64],
    ) -> Result<Convergence>;

    /// Norm of a general matrix.
    fn dlange(&self, layout: Layout, norm: Norm, m: usize, n: usize, a: &[f64], lda: usize, work: &mut [f64])
        -> Result<f64>;

    /// Builds the reflector annihilating the `n - 1` elements of `x`. On
    /// return `x` holds the reflector tail `v[1..]`.
    fn dlarfg(&self, n: usize, alpha: f64, x: &mut [f64], incx: usize) -> Result<Reflector>;

    /// Applies `H = I - tau * v * v^T` to `c` from `side`. `v` has `m`
    /// elements for [`Side::Left`], `n` for [`Side::Right`].
    fn dlarf(
        &self,
        layout: Layout,
        side: Side,
        m: usize,
        n: usize,
        v: &[f64],
        incv: usize,
        tau: f64,
        c: &mut [f64],
        ldc: usize,
        work: &mut [f64],
    ) -> Result<()>;

    /// Copies the `uplo` part of `a` into `b`.
    fn dlacpy(
        &self,
        layout: Layout,
        uplo: Uplo,
        m: usize,
        n: usize,
        a: &[f64],
        lda: usize,
        b: &mut [f64],
        ldb: usize,
    ) -> Result<()>;
}

/// Backends this build knows how to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    /// Pure Rust implementation, always available.
    #[default]
    Native,
    /// A system LAPACK through the Fortran ABI. Requires the `lapack` feature.
    Lapack,
}

impl BackendKind {
    /// Whether this build can construct the backend.
    pub fn is_available(self) -> bool {
        match self {
            BackendKind::Native => true,
            BackendKind::Lapack => cfg!(feature = "lapack"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Native => "native",
            BackendKind::Lapack => "lapack",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(BackendKind::Native),
            "lapack" => Ok(BackendKind::Lapack),
            _ => Err(Error::option("backend", s)),
        }
    }
}
