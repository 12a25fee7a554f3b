//! Adapter to a Fortran LAPACK through the `lapack` crate.
//!
//! The Fortran routines only know column-major storage, 1-based indices,
//! single-character options and 32-bit integers. [`ExternLapack`] bridges the
//! gap:
//!
//! - row-major arguments are re-laid into column-major scratch copies with
//!   [`copy_region`] and the written cells copied back afterwards. Only the
//!   cells a routine reads (or writes) move, so unstored halves stay
//!   untouched. `dlange` and `dlacpy` need no copy: they run on the transposed
//!   view instead.
//! - options go through [`FortranChar`], extents through [`fortran::int`].
//! - `ipiv` is shifted to 1-based on the way in; `ipiv` and `jpvt` come back
//!   0-based.
//! - a negative `info` becomes [`Error::Backend`]; a positive one is the
//!   routine's ordinary failure value.
//!
//! A provider library must be linked, either through one of the `openblas`,
//! `netlib` or `intel-mkl` features or by the final binary.

use lapack64_core::convert::copy_region;
use lapack64_core::fortran::{self, FortranChar};
use lapack64_core::{Diag, EigenJob, Error, Layout, Norm, Result, Side, Transpose, Uplo};

use crate::backend::{Backend, Convergence, Reflector};

/// Backend calling the system LAPACK.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternLapack;

fn check_info(routine: &'static str, info: i32) -> Result<usize> {
    if info < 0 {
        return Err(Error::Backend {
            routine,
            reason: format!("argument {} had an illegal value", -info),
        });
    }
    Ok(info as usize)
}

/// Runs `f` on a column-major rendition of the `m x n` matrix `a`.
///
/// Column-major input is passed through. Row-major input is copied (cells in
/// `read` only) into a packed column-major scratch matrix and, once `f`
/// succeeds, the cells in `write` are copied back.
fn col_major_mut<R>(
    routine: &'static str,
    layout: Layout,
    a: &mut [f64],
    lda: usize,
    m: usize,
    n: usize,
    read: Uplo,
    write: Uplo,
    f: impl FnOnce(&mut [f64], i32) -> Result<R>,
) -> Result<R> {
    if layout == Layout::ColMajor {
        return f(a, fortran::int("lda", lda)?);
    }
    log::warn!("{routine}: re-laying a {m}x{n} row-major argument as column-major");
    let ld = m.max(1);
    let mut scratch = vec![0.0; ld * n];
    copy_region(&mut scratch, Layout::ColMajor, ld, a, Layout::RowMajor, lda, m, n, read);
    let out = f(&mut scratch, fortran::int("lda", ld)?)?;
    copy_region(a, Layout::RowMajor, lda, &scratch, Layout::ColMajor, ld, m, n, write);
    Ok(out)
}

/// Read-only counterpart of [`col_major_mut`].
fn col_major<R>(
    routine: &'static str,
    layout: Layout,
    a: &[f64],
    lda: usize,
    m: usize,
    n: usize,
    read: Uplo,
    f: impl FnOnce(&[f64], i32) -> Result<R>,
) -> Result<R> {
    if layout == Layout::ColMajor {
        return f(a, fortran::int("lda", lda)?);
    }
    log::warn!("{routine}: re-laying a {m}x{n} row-major argument as column-major");
    let ld = m.max(1);
    let mut scratch = vec![0.0; ld * n];
    copy_region(&mut scratch, Layout::ColMajor, ld, a, Layout::RowMajor, lda, m, n, read);
    f(&scratch, fortran::int("lda", ld)?)
}

impl Backend for ExternLapack {
    fn name(&self) -> &'static str {
        "lapack"
    }

    fn dpotrf(&self, layout: Layout, uplo: Uplo, n: usize, a: &mut [f64], lda: usize) -> Result<bool> {
        let n32 = fortran::int("n", n)?;
        col_major_mut("dpotrf", layout, a, lda, n, n, uplo, uplo, |a, lda| {
            let mut info = 0;
            unsafe { lapack::dpotrf(uplo.to_fortran(), n32, a, lda, &mut info) };
            Ok(check_info("dpotrf", info)? == 0)
        })
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
        let (n32, nrhs32) = (fortran::int("n", n)?, fortran::int("nrhs", nrhs)?);
        col_major("dpotrs", layout, a, lda, n, n, uplo, |a, lda| {
            col_major_mut("dpotrs", layout, b, ldb, n, nrhs, Uplo::All, Uplo::All, |b, ldb| {
                let mut info = 0;
                unsafe { lapack::dpotrs(uplo.to_fortran(), n32, nrhs32, a, lda, b, ldb, &mut info) };
                check_info("dpotrs", info).map(drop)
            })
        })
    }

    fn dgetrf(&self, layout: Layout, m: usize, n: usize, a: &mut [f64], lda: usize, ipiv: &mut [usize]) -> Result<bool> {
        let (m32, n32) = (fortran::int("m", m)?, fortran::int("n", n)?);
        let mn = m.min(n);
        let mut piv = vec![0i32; mn];
        let info = col_major_mut("dgetrf", layout, a, lda, m, n, Uplo::All, Uplo::All, |a, lda| {
            let mut info = 0;
            unsafe { lapack::dgetrf(m32, n32, a, lda, &mut piv, &mut info) };
            check_info("dgetrf", info)
        })?;
        fortran::indices_to_zero_based("ipiv", &piv, m, &mut ipiv[..mn])?;
        Ok(info == 0)
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
        let (n32, nrhs32) = (fortran::int("n", n)?, fortran::int("nrhs", nrhs)?);
        let mut piv = vec![0i32; n];
        fortran::indices_to_one_based("ipiv", &ipiv[..n], &mut piv)?;
        col_major("dgetrs", layout, a, lda, n, n, Uplo::All, |a, lda| {
            col_major_mut("dgetrs", layout, b, ldb, n, nrhs, Uplo::All, Uplo::All, |b, ldb| {
                let mut info = 0;
                unsafe { lapack::dgetrs(trans.to_fortran(), n32, nrhs32, a, lda, &piv, b, ldb, &mut info) };
                check_info("dgetrs", info).map(drop)
            })
        })
    }

    fn dgetri(&self, layout: Layout, n: usize, a: &mut [f64], lda: usize, ipiv: &[usize], work: &mut [f64]) -> Result<bool> {
        let n32 = fortran::int("n", n)?;
        let lwork = fortran::int("lwork", work.len())?;
        let mut piv = vec![0i32; n];
        fortran::indices_to_one_based("ipiv", &ipiv[..n], &mut piv)?;
        col_major_mut("dgetri", layout, a, lda, n, n, Uplo::All, Uplo::All, |a, lda| {
            let mut info = 0;
            unsafe { lapack::dgetri(n32, a, lda, &piv, work, lwork, &mut info) };
            Ok(check_info("dgetri", info)? == 0)
        })
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
        let (n32, nrhs32) = (fortran::int("n", n)?, fortran::int("nrhs", nrhs)?);
        col_major("dtrtrs", layout, a, lda, n, n, uplo, |a, lda| {
            col_major_mut("dtrtrs", layout, b, ldb, n, nrhs, Uplo::All, Uplo::All, |b, ldb| {
                let mut info = 0;
                unsafe {
                    lapack::dtrtrs(
                        uplo.to_fortran(),
                        trans.to_fortran(),
                        diag.to_fortran(),
                        n32,
                        nrhs32,
                        a,
                        lda,
                        b,
                        ldb,
                        &mut info,
                    )
                };
                Ok(check_info("dtrtrs", info)? == 0)
            })
        })
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
        let (m32, n32) = (fortran::int("m", m)?, fortran::int("n", n)?);
        let lwork = fortran::int("lwork", work.len())?;
        col_major_mut("dgeqrf", layout, a, lda, m, n, Uplo::All, Uplo::All, |a, lda| {
            let mut info = 0;
            unsafe { lapack::dgeqrf(m32, n32, a, lda, tau, work, lwork, &mut info) };
            check_info("dgeqrf", info).map(drop)
        })
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
        let (m32, n32) = (fortran::int("m", m)?, fortran::int("n", n)?);
        let lwork = fortran::int("lwork", work.len())?;
        // Zero marks every column as free to move.
        let mut piv = vec![0i32; n];
        col_major_mut("dgeqp3", layout, a, lda, m, n, Uplo::All, Uplo::All, |a, lda| {
            let mut info = 0;
            unsafe { lapack::dgeqp3(m32, n32, a, lda, &mut piv, tau, work, lwork, &mut info) };
            check_info("dgeqp3", info).map(drop)
        })?;
        fortran::indices_to_zero_based("jpvt", &piv, n, &mut jpvt[..n])
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
        let (m32, n32, k32) = (fortran::int("m", m)?, fortran::int("n", n)?, fortran::int("k", k)?);
        let lwork = fortran::int("lwork", work.len())?;
        col_major_mut("dorgqr", layout, a, lda, m, n, Uplo::All, Uplo::All, |a, lda| {
            let mut info = 0;
            unsafe { lapack::dorgqr(m32, n32, k32, a, lda, tau, work, lwork, &mut info) };
            check_info("dorgqr", info).map(drop)
        })
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
        let (m32, n32, nrhs32) = (fortran::int("m", m)?, fortran::int("n", n)?, fortran::int("nrhs", nrhs)?);
        let lwork = fortran::int("lwork", work.len())?;
        let rows = m.max(n);
        col_major_mut("dgels", layout, a, lda, m, n, Uplo::All, Uplo::All, |a, lda| {
            col_major_mut("dgels", layout, b, ldb, rows, nrhs, Uplo::All, Uplo::All, |b, ldb| {
                let mut info = 0;
                unsafe {
                    lapack::dgels(
                        trans.to_fortran(),
                        m32,
                        n32,
                        nrhs32,
                        a,
                        lda,
                        b,
                        ldb,
                        work,
                        lwork,
                        &mut info,
                    )
                };
                Ok(check_info("dgels", info)? == 0)
            })
        })
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
        let n32 = fortran::int("n", n)?;
        let lwork = fortran::int("lwork", work.len())?;
        let write = match jobz {
            EigenJob::Vectors => Uplo::All,
            EigenJob::ValuesOnly => uplo,
        };
        let info = col_major_mut("dsyev", layout, a, lda, n, n, uplo, write, |a, lda| {
            let mut info = 0;
            unsafe { lapack::dsyev(jobz.to_fortran(), uplo.to_fortran(), n32, a, lda, w, work, lwork, &mut info) };
            check_info("dsyev", info)
        })?;
        Ok(Convergence {
            converged: n.saturating_sub(info),
            total: n,
        })
    }

    fn dlange(&self, layout: Layout, norm: Norm, m: usize, n: usize, a: &[f64], lda: usize, work: &mut [f64]) -> Result<f64> {
        // A row-major m x n matrix is its column-major n x m transpose.
        let (norm, rows, cols) = match layout {
            Layout::ColMajor => (norm, m, n),
            Layout::RowMajor => (norm.transposed(), n, m),
        };
        let (rows32, cols32) = (fortran::int("m", rows)?, fortran::int("n", cols)?);
        let lda = fortran::int("lda", lda)?;
        Ok(unsafe { lapack::dlange(norm.to_fortran(), rows32, cols32, a, lda, work) })
    }

    fn dlarfg(&self, n: usize, alpha: f64, x: &mut [f64], incx: usize) -> Result<Reflector> {
        let n32 = fortran::int("n", n)?;
        let incx = fortran::int("incx", incx)?;
        let (mut beta, mut tau) = (alpha, 0.0);
        unsafe { lapack::dlarfg(n32, &mut beta, x, incx, &mut tau) };
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
        let (m32, n32) = (fortran::int("m", m)?, fortran::int("n", n)?);
        let incv = fortran::int("incv", incv)?;
        col_major_mut("dlarf", layout, c, ldc, m, n, Uplo::All, Uplo::All, |c, ldc| {
            unsafe { lapack::dlarf(side.to_fortran(), m32, n32, v, incv, tau, c, ldc, work) };
            Ok(())
        })
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
        // The upper part of a row-major matrix is the lower part of its
        // column-major transpose.
        let (uplo, rows, cols) = match layout {
            Layout::ColMajor => (uplo, m, n),
            Layout::RowMajor => (uplo.transposed(), n, m),
        };
        let (rows32, cols32) = (fortran::int("m", rows)?, fortran::int("n", cols)?);
        let (lda, ldb) = (fortran::int("lda", lda)?, fortran::int("ldb", ldb)?);
        unsafe { lapack::dlacpy(uplo.to_fortran(), rows32, cols32, a, lda, b, ldb) };
        Ok(())
    }
}
