//! Pure Rust backend.
//!
//! Unblocked, scalar implementations of the routine catalog. Both layouts are
//! handled natively through `Strides`, so no argument is ever re-laid out.
//! The algorithms follow the reference LAPACK unblocked routines (`dgetf2`,
//! `dpotf2`, `dgeqr2`, `dlaqp2`, `dorg2r`, ...) except `dsyev`, which uses
//! cyclic Jacobi rotations over a dense `n x n` copy.

mod auxiliary;
mod cholesky;
mod eigen;
mod kernels;
mod lu;
mod qr;

use crate::backend::{Backend, Convergence, Reflector};
use kernels::Strides;
use lapack64_core::convert::copy_region;
use lapack64_core::{Diag, EigenJob, Layout, Norm, Result, Side, Transpose, Uplo};

/// The always-available pure Rust backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeBackend {
    max_sweeps: usize,
}

impl NativeBackend {
    /// A backend whose `dsyev` gives up after `max_sweeps` Jacobi sweeps and
    /// reports the eigenvalues that converged by then.
    pub fn with_max_sweeps(max_sweeps: usize) -> Self {
        NativeBackend { max_sweeps }
    }

    pub fn max_sweeps(&self) -> usize {
        self.max_sweeps
    }
}

impl Default for NativeBackend {
    fn default() -> Self {
        NativeBackend::with_max_sweeps(eigen::MAX_SWEEPS)
    }
}

impl Backend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn dpotrf(&self, layout: Layout, uplo: Uplo, n: usize, a: &mut [f64], lda: usize) -> Result<bool> {
        Ok(cholesky::potrf(uplo, n, a, Strides::new(layout, lda)))
    }

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
    ) -> Result<()> {
        cholesky::potrs(uplo, n, nrhs, a, Strides::new(layout, lda), b, Strides::new(layout, ldb));
        Ok(())
    }

    fn dgetrf(&self, layout: Layout, m: usize, n: usize, a: &mut [f64], lda: usize, ipiv: &mut [usize]) -> Result<bool> {
        Ok(lu::getrf(m, n, a, Strides::new(layout, lda), ipiv))
    }

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
    ) -> Result<()> {
        lu::getrs(trans, n, nrhs, a, Strides::new(layout, lda), ipiv, b, Strides::new(layout, ldb));
        Ok(())
    }

    fn dgetri(&self, layout: Layout, n: usize, a: &mut [f64], lda: usize, ipiv: &[usize], work: &mut [f64]) -> Result<bool> {
        Ok(lu::getri(n, a, Strides::new(layout, lda), ipiv, work))
    }

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
    ) -> Result<bool> {
        let sa = Strides::new(layout, lda);
        let unit = diag == Diag::Unit;
        if !unit && (0..n).any(|i| a[sa.at(i, i)] == 0.0) {
            return Ok(false);
        }
        let upper = uplo == Uplo::Upper;
        let sb = Strides::new(layout, ldb);
        if trans.is_trans() {
            kernels::trsm(!upper, unit, n, nrhs, a, sa.t(), b, sb);
        } else {
            kernels::trsm(upper, unit, n, nrhs, a, sa, b, sb);
        }
        Ok(true)
    }

    fn dgeqrf(
        &self,
        layout: Layout,
        m: usize,
        n: usize,
        a: &mut [f64],
        lda: usize,
        tau: &mut [f64],
        work: &mut [f64],
    ) -> Result<()> {
        qr::geqrf(m, n, a, Strides::new(layout, lda), tau, work);
        Ok(())
    }

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
    ) -> Result<()> {
        qr::geqp3(m, n, a, Strides::new(layout, lda), jpvt, tau, work);
        Ok(())
    }

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
    ) -> Result<()> {
        qr::orgqr(m, n, k, a, Strides::new(layout, lda), tau, work);
        Ok(())
    }

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
    ) -> Result<bool> {
        let (sa, sb) = (Strides::new(layout, lda), Strides::new(layout, ldb));
        Ok(qr::gels(trans, m, n, nrhs, a, sa, b, sb, work))
    }

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
    ) -> Result<Convergence> {
        let vectors = jobz == EigenJob::Vectors;
        let s = Strides::new(layout, lda);
        let converged = eigen::syev_with_limit(vectors, uplo, n, a, s, w, work, self.max_sweeps);
        Ok(Convergence { converged, total: n })
    }

    fn dlange(&self, layout: Layout, norm: Norm, m: usize, n: usize, a: &[f64], lda: usize, work: &mut [f64]) -> Result<f64> {
        Ok(auxiliary::lange(norm, m, n, a, Strides::new(layout, lda), work))
    }

    fn dlarfg(&self, n: usize, alpha: f64, x: &mut [f64], incx: usize) -> Result<Reflector> {
        let (beta, tau) = kernels::larfg(n, alpha, x, incx);
        Ok(Reflector { beta, tau })
    }

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
    ) -> Result<()> {
        let sc = Strides::new(layout, ldc);
        let elem = |_: &[f64], i: usize| v[i * incv];
        match side {
            Side::Left => kernels::larf_left(elem, tau, m, n, c, 0, sc, work),
            Side::Right => kernels::larf_right(elem, tau, m, n, c, 0, sc, work),
        }
        Ok(())
    }

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
    ) -> Result<()> {
        copy_region(b, layout, ldb, a, layout, lda, m, n, uplo);
        Ok(())
    }
}
