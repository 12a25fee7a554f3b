//! The dispatch context.
//!
//! [`Lapack64`] owns the active backend and exposes every routine over matrix
//! descriptors. Each method runs the same battery before dispatch:
//!
//! 1. a workspace-size query ([`Lwork::Query`]) is answered immediately, before
//!    any other check and without touching matrix or vector arguments,
//! 2. option membership,
//! 3. dimension agreement between arguments and layout agreement,
//! 4. length of auxiliary arrays (`ipiv`, `jpvt`, `tau`, `w`),
//! 5. range of caller-supplied pivots,
//! 6. workspace length.
//!
//! Descriptor constructors have already checked stride and storage length, so
//! a rejected call never reaches the backend and leaves every argument
//! untouched.

use std::env;
use std::fmt;

use crate::backend::{Backend, BackendKind, Convergence, Reflector};
use crate::native::NativeBackend;
use lapack64_core::contract;
use lapack64_core::workspace::minimum;
use lapack64_core::{
    Diag, EigenJob, Error, General, Layout, Lwork, Norm, Result, Side, Symmetric, Transpose, Triangular, Uplo,
    Vector,
};

/// Environment variable read by [`Lapack64::from_env`].
pub const BACKEND_ENV: &str = "LAPACK64_BACKEND";

/// Answers a workspace query. Returns `true` if `lwork` was a query.
fn answer_query(routine: &'static str, lwork: Lwork, work: &mut [f64], minimum: usize) -> Result<bool> {
    if !lwork.is_query() {
        return Ok(false);
    }
    lwork.query(work, minimum)?;
    log::trace!("{routine}: workspace query answered with {minimum}");
    Ok(true)
}

/// Calling context bound to one backend.
///
/// The context holds no mutable state, so one value can be shared freely
/// between threads. Calls that write the same storage are serialized by the
/// borrow checker.
pub struct Lapack64 {
    backend: Box<dyn Backend>,
}

impl Default for Lapack64 {
    fn default() -> Self {
        Lapack64::new(NativeBackend::default())
    }
}

impl fmt::Debug for Lapack64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lapack64")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl Lapack64 {
    pub fn new<B: Backend + 'static>(backend: B) -> Self {
        log::debug!("lapack64: using the {} backend", backend.name());
        Lapack64 {
            backend: Box::new(backend),
        }
    }

    /// Context for a backend this build knows how to construct.
    pub fn with_kind(kind: BackendKind) -> Result<Self> {
        match kind {
            BackendKind::Native => Ok(Lapack64::new(NativeBackend::default())),
            #[cfg(feature = "lapack")]
            BackendKind::Lapack => Ok(Lapack64::new(crate::external::ExternLapack)),
            #[cfg(not(feature = "lapack"))]
            BackendKind::Lapack => Err(Error::InvalidOption {
                arg: "backend",
                value: "lapack (built without the `lapack` feature)".to_string(),
            }),
        }
    }

    /// Context for the backend named by `LAPACK64_BACKEND`, native if unset.
    pub fn from_env() -> Result<Self> {
        Lapack64::from_var(env::var(BACKEND_ENV))
    }

    /// A value that is set but not valid Unicode is an invalid option, never
    /// the default.
    fn from_var(var: std::result::Result<String, env::VarError>) -> Result<Self> {
        match var {
            Ok(name) => Lapack64::with_kind(name.parse()?),
            Err(env::VarError::NotPresent) => Ok(Lapack64::default()),
            Err(env::VarError::NotUnicode(value)) => Err(Error::option("backend", value)),
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    #[inline]
    fn dispatch(&self, routine: &'static str, layout: Layout, rows: usize, cols: usize) {
        log::trace!(
            "{routine}: {rows}x{cols} {layout:?} -> {} backend",
            self.backend.name()
        );
    }

    // -----------------------------------------------------------------------
    // Cholesky
    // -----------------------------------------------------------------------

    /// Cholesky factorization of `a` in place. Only the stored half is read
    /// and overwritten with the factor. Returns `false` if `a` is not positive
    /// definite.
    pub fn potrf<S>(&self, a: &mut Symmetric<S>) -> Result<bool>
    where
        S: AsRef<[f64]> + AsMut<[f64]>,
    {
        let (n, lda, layout, uplo) = (a.n(), a.stride(), a.layout(), a.uplo());
        if n == 0 {
            return Ok(true);
        }
        self.dispatch("dpotrf", layout, n, n);
        self.backend.dpotrf(layout, uplo, n, a.data_mut(), lda)
    }

    /// [`Lapack64::potrf`] returning the factor as a triangular view of the
    /// same storage with the same half and a non-unit diagonal.
    pub fn cholesky<S>(&self, mut a: Symmetric<S>) -> Result<(Triangular<S>, bool)>
    where
        S: AsRef<[f64]> + AsMut<[f64]>,
    {
        let ok = self.potrf(&mut a)?;
        Ok((a.into_triangular(Diag::NonUnit), ok))
    }

    /// Solves `A * X = B` given the Cholesky factor `t` of `A`. `X` overwrites
    /// `b`.
    pub fn potrs<A, B>(&self, t: &Triangular<A>, b: &mut General<B>) -> Result<()>
    where
        A: AsRef<[f64]>,
        B: AsRef<[f64]> + AsMut<[f64]>,
    {
        contract::check_half("t.uplo", t.uplo())?;
        if t.diag() != Diag::NonUnit {
            return Err(Error::option("t.diag", t.diag()));
        }
        let n = t.n();
        contract::check_dim("b", "row count", n, b.rows())?;
        contract::check_layout("b", t.layout(), b.layout())?;

        let (nrhs, ldb) = (b.cols(), b.stride());
        if n == 0 || nrhs == 0 {
            return Ok(());
        }
        self.dispatch("dpotrs", t.layout(), n, nrhs);
        self.backend
            .dpotrs(t.layout(), t.uplo(), n, nrhs, t.data(), t.stride(), b.data_mut(), ldb)
    }

    // -----------------------------------------------------------------------
    // LU
    // -----------------------------------------------------------------------

    /// LU factorization with partial pivoting. `ipiv[..min(m, n)]` receives
    /// 0-based row interchanges. Returns `false` if `U` is exactly singular.
    pub fn getrf<S>(&self, a: &mut General<S>, ipiv: &mut [usize]) -> Result<bool>
    where
        S: AsRef<[f64]> + AsMut<[f64]>,
    {
        let (m, n, lda, layout) = (a.rows(), a.cols(), a.stride(), a.layout());
        contract::check_len("ipiv", m.min(n), ipiv.len())?;
        if m == 0 || n == 0 {
            return Ok(true);
        }
        self.dispatch("dgetrf", layout, m, n);
        self.backend.dgetrf(layout, m, n, a.data_mut(), lda, ipiv)
    }

    /// Solves `op(A) * X = B` from the factors left by [`Lapack64::getrf`].
    pub fn getrs<A, B>(&self, trans: Transpose, a: &General<A>, ipiv: &[usize], b: &mut General<B>) -> Result<()>
    where
        A: AsRef<[f64]>,
        B: AsRef<[f64]> + AsMut<[f64]>,
    {
        let n = a.rows();
        contract::check_dim("a", "column count", n, a.cols())?;
        contract::check_dim("b", "row count", n, b.rows())?;
        contract::check_layout("b", a.layout(), b.layout())?;
        contract::check_len("ipiv", n, ipiv.len())?;
        contract::check_pivots("ipiv", &ipiv[..n], n)?;

        let (nrhs, ldb) = (b.cols(), b.stride());
        if n == 0 || nrhs == 0 {
            return Ok(());
        }
        self.dispatch("dgetrs", a.layout(), n, nrhs);
        self.backend
            .dgetrs(a.layout(), trans, n, nrhs, a.data(), a.stride(), ipiv, b.data_mut(), ldb)
    }

    /// Replaces the factors left by [`Lapack64::getrf`] with `inv(A)`.
    /// Returns `false`, leaving `a` untouched, if `A` is singular.
    pub fn getri<S>(&self, a: &mut General<S>, ipiv: &[usize], work: &mut [f64], lwork: Lwork) -> Result<bool>
    where
        S: AsRef<[f64]> + AsMut<[f64]>,
    {
        let n = a.rows();
        if answer_query("dgetri", lwork, work, minimum::getri(n))? {
            return Ok(true);
        }
        contract::check_dim("a", "column count", n, a.cols())?;
        contract::check_len("ipiv", n, ipiv.len())?;
        contract::check_pivots("ipiv", &ipiv[..n], n)?;
        let work = lwork.reserve(work, minimum::getri(n))?;

        if n == 0 {
            return Ok(true);
        }
        let (lda, layout) = (a.stride(), a.layout());
        self.dispatch("dgetri", layout, n, n);
        self.backend.dgetri(layout, n, a.data_mut(), lda, ipiv, work)
    }

    // -----------------------------------------------------------------------
    // Triangular
    // -----------------------------------------------------------------------

    /// Solves `op(A) * X = B` for triangular `A`. Returns `false`, leaving `b`
    /// untouched, if a non-unit diagonal holds an exact zero.
    pub fn trtrs<A, B>(&self, trans: Transpose, a: &Triangular<A>, b: &mut General<B>) -> Result<bool>
    where
        A: AsRef<[f64]>,
        B: AsRef<[f64]> + AsMut<[f64]>,
    {
        contract::check_half("a.uplo", a.uplo())?;
        let n = a.n();
        contract::check_dim("b", "row count", n, b.rows())?;
        contract::check_layout("b", a.layout(), b.layout())?;

        let (nrhs, ldb) = (b.cols(), b.stride());
        if n == 0 {
            return Ok(true);
        }
        self.dispatch("dtrtrs", a.layout(), n, nrhs);
        self.backend.dtrtrs(
            a.layout(),
            a.uplo(),
            trans,
            a.diag(),
            n,
            nrhs,
            a.data(),
            a.stride(),
            b.data_mut(),
            ldb,
        )
    }

    // -----------------------------------------------------------------------
    // QR
    // -----------------------------------------------------------------------

    /// Householder QR of `a`. `R` overwrites the upper trapezoid, the
    /// reflectors the part below it, their scalars `tau[..min(m, n)]`.
    pub fn geqrf<S>(&self, a: &mut General<S>, tau: &mut [f64], work: &mut [f64], lwork: Lwork) -> Result<()>
    where
        S: AsRef<[f64]> + AsMut<[f64]>,
    {
        let (m, n) = (a.rows(), a.cols());
        if answer_query("dgeqrf", lwork, work, minimum::geqrf(m, n))? {
            return Ok(());
        }
        contract::check_len("tau", m.min(n), tau.len())?;
        let work = lwork.reserve(work, minimum::geqrf(m, n))?;

        if m == 0 || n == 0 {
            return Ok(());
        }
        let (lda, layout) = (a.stride(), a.layout());
        self.dispatch("dgeqrf", layout, m, n);
        self.backend.dgeqrf(layout, m, n, a.data_mut(), lda, tau, work)
    }

    /// Householder QR with column pivoting. On return column `j` of `A * P`
    /// is column `jpvt[j]` (0-based) of the input.
    pub fn geqp3<S>(
        &self,
        a: &mut General<S>,
        jpvt: &mut [usize],
        tau: &mut [f64],
        work: &mut [f64],
        lwork: Lwork,
    ) -> Result<()>
    where
        S: AsRef<[f64]> + AsMut<[f64]>,
    {
        let (m, n) = (a.rows(), a.cols());
        if answer_query("dgeqp3", lwork, work, minimum::geqp3(m, n))? {
            return Ok(());
        }
        contract::check_len("jpvt", n, jpvt.len())?;
        contract::check_len("tau", m.min(n), tau.len())?;
        let work = lwork.reserve(work, minimum::geqp3(m, n))?;

        if n == 0 {
            return Ok(());
        }
        let (lda, layout) = (a.stride(), a.layout());
        self.dispatch("dgeqp3", layout, m, n);
        self.backend.dgeqp3(layout, m, n, a.data_mut(), lda, jpvt, tau, work)
    }

    /// Forms the first `n` columns of `Q` from the first `k` reflectors left
    /// in `a` by [`Lapack64::geqrf`]. Requires `m >= n >= k`.
    pub fn orgqr<S>(&self, a: &mut General<S>, k: usize, tau: &[f64], work: &mut [f64], lwork: Lwork) -> Result<()>
    where
        S: AsRef<[f64]> + AsMut<[f64]>,
    {
        let (m, n) = (a.rows(), a.cols());
        if answer_query("dorgqr", lwork, work, minimum::orgqr(m, n))? {
            return Ok(());
        }
        if n > m {
            return Err(Error::dimension("a", format!("{m}x{n} has more columns than rows")));
        }
        if k > n {
            return Err(Error::dimension("k", format!("{k} reflectors exceed {n} columns")));
        }
        contract::check_len("tau", k, tau.len())?;
        let work = lwork.reserve(work, minimum::orgqr(m, n))?;

        if n == 0 {
            return Ok(());
        }
        let (lda, layout) = (a.stride(), a.layout());
        self.dispatch("dorgqr", layout, m, n);
        self.backend.dorgqr(layout, m, n, k, a.data_mut(), lda, tau, work)
    }

    /// Least squares (overdetermined) or minimum norm (underdetermined)
    /// solution of `op(A) * X = B` for a full rank `A`. `b` has `max(m, n)`
    /// rows; `X` overwrites its leading rows. `A` is overwritten by its QR or
    /// LQ factorization. Returns `false` if `A` is rank deficient.
    pub fn gels<A, B>(
        &self,
        trans: Transpose,
        a: &mut General<A>,
        b: &mut General<B>,
        work: &mut [f64],
        lwork: Lwork,
    ) -> Result<bool>
    where
        A: AsRef<[f64]> + AsMut<[f64]>,
        B: AsRef<[f64]> + AsMut<[f64]>,
    {
        let (m, n, nrhs) = (a.rows(), a.cols(), b.cols());
        if answer_query("dgels", lwork, work, minimum::gels(m, n, nrhs))? {
            return Ok(true);
        }
        contract::check_real_trans("trans", trans)?;
        contract::check_dim("b", "row count", m.max(n), b.rows())?;
        contract::check_layout("b", a.layout(), b.layout())?;
        let work = lwork.reserve(work, minimum::gels(m, n, nrhs))?;

        let (lda, ldb, layout) = (a.stride(), b.stride(), a.layout());
        self.dispatch("dgels", layout, m, n);
        self.backend
            .dgels(layout, trans, m, n, nrhs, a.data_mut(), lda, b.data_mut(), ldb, work)
    }

    // -----------------------------------------------------------------------
    // Symmetric eigenproblem
    // -----------------------------------------------------------------------

    /// Eigenvalues of `a`, ascending in `w[..n]`. With
    /// [`EigenJob::Vectors`] the eigenvectors overwrite the whole of `a`'s
    /// storage (both halves); see [`Lapack64::eigen`] for the typed view.
    pub fn syev<S>(
        &self,
        jobz: EigenJob,
        a: &mut Symmetric<S>,
        w: &mut [f64],
        work: &mut [f64],
        lwork: Lwork,
    ) -> Result<Convergence>
    where
        S: AsRef<[f64]> + AsMut<[f64]>,
    {
        let n = a.n();
        let complete = Convergence {
            converged: n,
            total: n,
        };
        if answer_query("dsyev", lwork, work, minimum::syev(n))? {
            return Ok(complete);
        }
        contract::check_len("w", n, w.len())?;
        let work = lwork.reserve(work, minimum::syev(n))?;

        if n == 0 {
            return Ok(complete);
        }
        let (lda, layout, uplo) = (a.stride(), a.layout(), a.uplo());
        self.dispatch("dsyev", layout, n, n);
        let result = self.backend.dsyev(layout, jobz, uplo, n, a.data_mut(), lda, w, work)?;
        if !result.is_complete() {
            log::debug!("dsyev: {} of {} eigenvalues converged", result.converged, result.total);
        }
        Ok(result)
    }

    /// [`Lapack64::syev`] with eigenvectors, returning them as a general view
    /// of the same storage: column `i` belongs to `w[i]`.
    pub fn eigen<S>(
        &self,
        mut a: Symmetric<S>,
        w: &mut [f64],
        work: &mut [f64],
        lwork: Lwork,
    ) -> Result<(General<S>, Convergence)>
    where
        S: AsRef<[f64]> + AsMut<[f64]>,
    {
        let result = self.syev(EigenJob::Vectors, &mut a, w, work, lwork)?;
        Ok((a.into_general(), result))
    }

    // -----------------------------------------------------------------------
    // Auxiliaries
    // -----------------------------------------------------------------------

    /// Norm of a general matrix. A workspace query returns `0.0`.
    pub fn lange<A>(&self, norm: Norm, a: &General<A>, work: &mut [f64], lwork: Lwork) -> Result<f64>
    where
        A: AsRef<[f64]>,
    {
        let (m, n) = (a.rows(), a.cols());
        if answer_query("dlange", lwork, work, minimum::lange(norm, m, n))? {
            return Ok(0.0);
        }
        let work = lwork.reserve(work, minimum::lange(norm, m, n))?;

        if m == 0 || n == 0 {
            return Ok(0.0);
        }
        self.dispatch("dlange", a.layout(), m, n);
        self.backend.dlange(a.layout(), norm, m, n, a.data(), a.stride(), work)
    }

    /// Builds the reflector `H` with `H * [alpha; x] = [beta; 0]`. `x` is
    /// overwritten by the reflector tail `v[1..]`.
    pub fn larfg<S>(&self, alpha: f64, x: &mut Vector<S>) -> Result<Reflector>
    where
        S: AsRef<[f64]> + AsMut<[f64]>,
    {
        let (n, inc) = (x.n() + 1, x.inc());
        self.dispatch("dlarfg", Layout::ColMajor, n, 1);
        self.backend.dlarfg(n, alpha, x.data_mut(), inc)
    }

    /// Applies `H = I - tau * v * v^T` to `c` from `side`. `v` has one element
    /// per row of `c` for [`Side::Left`], per column for [`Side::Right`].
    pub fn larf<V, C>(
        &self,
        side: Side,
        v: &Vector<V>,
        tau: f64,
        c: &mut General<C>,
        work: &mut [f64],
        lwork: Lwork,
    ) -> Result<()>
    where
        V: AsRef<[f64]>,
        C: AsRef<[f64]> + AsMut<[f64]>,
    {
        let (m, n) = (c.rows(), c.cols());
        if answer_query("dlarf", lwork, work, minimum::larf(side, m, n))? {
            return Ok(());
        }
        let len = match side {
            Side::Left => m,
            Side::Right => n,
        };
        contract::check_dim("v", "length", len, v.n())?;
        let work = lwork.reserve(work, minimum::larf(side, m, n))?;

        if m == 0 || n == 0 {
            return Ok(());
        }
        let (ldc, layout) = (c.stride(), c.layout());
        self.dispatch("dlarf", layout, m, n);
        self.backend
            .dlarf(layout, side, m, n, v.data(), v.inc(), tau, c.data_mut(), ldc, work)
    }

    /// Copies the `uplo` part of `a` (`Uplo::All`: every cell) into `b`.
    /// Cells of `b` outside that part are not written.
    pub fn lacpy<A, B>(&self, uplo: Uplo, a: &General<A>, b: &mut General<B>) -> Result<()>
    where
        A: AsRef<[f64]>,
        B: AsRef<[f64]> + AsMut<[f64]>,
    {
        let (m, n) = (a.rows(), a.cols());
        contract::check_dim("b", "row count", m, b.rows())?;
        contract::check_dim("b", "column count", n, b.cols())?;
        contract::check_layout("b", a.layout(), b.layout())?;

        if m == 0 || n == 0 {
            return Ok(());
        }
        let ldb = b.stride();
        self.dispatch("dlacpy", a.layout(), m, n);
        self.backend
            .dlacpy(a.layout(), uplo, m, n, a.data(), a.stride(), b.data_mut(), ldb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapack64_core::ErrorKind;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn bits(v: &[f64]) -> Vec<u64> {
        v.iter().map(|x| x.to_bits()).collect()
    }

    #[test]
    fn test_default_is_native() {
        let lp = Lapack64::default();
        assert_eq!(lp.backend().name(), "native");
        assert_eq!(Lapack64::with_kind(BackendKind::Native).unwrap().backend().name(), "native");
        assert!(format!("{lp:?}").contains("native"));
    }

    #[cfg(not(feature = "lapack"))]
    #[test]
    fn test_unavailable_backend_rejected() {
        let err = Lapack64::with_kind(BackendKind::Lapack).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
    }

    #[test]
    fn test_backend_from_env_value() {
        use std::ffi::OsString;

        let lp = Lapack64::from_var(Err(env::VarError::NotPresent)).unwrap();
        assert_eq!(lp.backend().name(), "native");
        let lp = Lapack64::from_var(Ok("native".to_string())).unwrap();
        assert_eq!(lp.backend().name(), "native");

        let err = Lapack64::from_var(Ok("bogus".to_string())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
        let err = Lapack64::from_var(Err(env::VarError::NotUnicode(OsString::from("native")))).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidOption {
                arg: "backend",
                value: "\"native\"".to_string(),
            }
        );
        assert_eq!(BACKEND_ENV, "LAPACK64_BACKEND");
    }

    #[test]
    fn test_workspace_query_is_idempotent_and_pure() {
        init_logger();
        let lp = Lapack64::default();
        let layout = Layout::RowMajor;
        let seed: Vec<f64> = (0..20).map(|v| v as f64 * 0.5 - 3.0).collect();

        let mut a = General::new(layout, 5, 4, 4, seed.clone()).unwrap();
        let mut sym = Symmetric::new(layout, 4, 4, Uplo::Upper, seed[..16].to_vec()).unwrap();
        let mut b = General::new(layout, 5, 2, 2, vec![7.0; 10]).unwrap();
        let mut tau = vec![f64::NAN; 4];
        let mut jpvt = vec![9usize; 4];
        let v = Vector::contiguous(vec![1.0; 5]);

        let before_a = bits(a.data());
        let before_sym = bits(sym.data());
        let before_b = bits(b.data());

        for _ in 0..2 {
            let mut work = [0.0];
            assert!(lp.getri(&mut General::packed(layout, 4, 4, seed[..16].to_vec()).unwrap(), &[], &mut work, Lwork::Query).unwrap());
            assert_eq!(work[0], 4.0);

            lp.geqrf(&mut a, &mut [], &mut work, Lwork::Query).unwrap();
            assert_eq!(work[0], 4.0);

            lp.geqp3(&mut a, &mut jpvt, &mut tau, &mut work, Lwork::Query).unwrap();
            assert_eq!(work[0], 13.0);

            lp.orgqr(&mut a, 9, &[], &mut work, Lwork::Query).unwrap();
            assert_eq!(work[0], 4.0);

            assert!(lp.gels(Transpose::ConjTrans, &mut a, &mut b, &mut work, Lwork::Query).unwrap());
            assert_eq!(work[0], 8.0);

            let r = lp.syev(EigenJob::Vectors, &mut sym, &mut [], &mut work, Lwork::Query).unwrap();
            assert!(r.is_complete());
            assert_eq!(work[0], 11.0);

            assert_eq!(lp.lange(Norm::Infinity, &a, &mut work, Lwork::Query).unwrap(), 0.0);
            assert_eq!(work[0], 5.0);

            lp.larf(Side::Right, &v, 2.0, &mut a, &mut work, Lwork::Query).unwrap();
            assert_eq!(work[0], 5.0);
        }

        assert_eq!(bits(a.data()), before_a);
        assert_eq!(bits(sym.data()), before_sym);
        assert_eq!(bits(b.data()), before_b);
        assert!(tau.iter().all(|t| t.is_nan()));
        assert_eq!(jpvt, vec![9; 4]);
    }

    #[test]
    fn test_query_needs_a_slot() {
        let lp = Lapack64::default();
        let mut a = General::packed(Layout::ColMajor, 2, 2, vec![1.0; 4]).unwrap();
        let err = lp.geqrf(&mut a, &mut [0.0; 2], &mut [], Lwork::Query).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientWorkspace);
    }

    #[test]
    fn test_rejections_leave_storage_untouched() {
        init_logger();
        let lp = Lapack64::default();
        let data = vec![4.0, 1.0, 2.0, 1.0, 3.0, 0.5, 2.0, 0.5, 5.0];

        // Workspace below the minimum.
        let mut a = General::packed(Layout::RowMajor, 3, 3, data.clone()).unwrap();
        let mut tau = vec![0.0; 3];
        let mut work = vec![0.0; 2];
        let err = lp.geqrf(&mut a, &mut tau, &mut work, Lwork::Len(2)).unwrap_err();
        assert_eq!(err, Error::InsufficientWorkspace { required: 3, actual: 2 });
        assert_eq!(a.data(), &data[..]);
        assert_eq!(tau, vec![0.0; 3]);

        // Declared length exceeds the slice.
        let err = lp.geqrf(&mut a, &mut tau, &mut work, Lwork::Len(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStorage);

        // Auxiliary array too short.
        let err = lp.geqrf(&mut a, &mut tau[..2], &mut vec![0.0; 3], Lwork::Len(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStorage);
        assert_eq!(a.data(), &data[..]);

        // Pivot out of range.
        let mut b = General::packed(Layout::RowMajor, 3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let err = lp.getrs(Transpose::NoTrans, &a, &[0, 3, 2], &mut b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
        assert_eq!(b.data(), &[1.0, 2.0, 3.0]);

        // Layout disagreement.
        let mut bc = General::packed(Layout::ColMajor, 3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let err = lp.getrs(Transpose::NoTrans, &a, &[0, 1, 2], &mut bc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LayoutMismatch);

        // Dimension disagreement.
        let mut short = General::packed(Layout::RowMajor, 2, 1, vec![1.0, 2.0]).unwrap();
        let err = lp.getrs(Transpose::NoTrans, &a, &[0, 1, 2], &mut short).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDimension);
        assert_eq!(short.data(), &[1.0, 2.0]);

        // Option outside the accepted set.
        let mut bb = General::packed(Layout::RowMajor, 3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let err = lp
            .gels(Transpose::ConjTrans, &mut a, &mut bb, &mut vec![0.0; 8], Lwork::Len(8))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
        assert_eq!(a.data(), &data[..]);
        assert_eq!(bb.data(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_option_checked_before_dimensions() {
        let lp = Lapack64::default();
        let mut a = General::packed(Layout::RowMajor, 3, 2, vec![1.0; 6]).unwrap();
        // Wrong row count for b and a rejected trans: the option wins.
        let mut b = General::packed(Layout::RowMajor, 2, 1, vec![1.0; 2]).unwrap();
        let err = lp
            .gels(Transpose::ConjTrans, &mut a, &mut b, &mut vec![0.0; 8], Lwork::Len(8))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
    }

    #[test]
    fn test_cholesky_solve() {
        init_logger();
        let lp = Lapack64::default();
        for layout in [Layout::RowMajor, Layout::ColMajor] {
            // [[4, 2], [2, 3]] x = [6, 5] has x = [1, 1].
            let a = Symmetric::new(layout, 2, 3, Uplo::Lower, vec![4.0, 2.0, 0.0, 2.0, 3.0, 0.0]).unwrap();
            let (l, ok) = lp.cholesky(a).unwrap();
            assert!(ok);
            assert_eq!(l.uplo(), Uplo::Lower);
            assert_eq!(l.diag(), Diag::NonUnit);
            assert!((l.at(0, 0) - 2.0).abs() < 1e-15);

            let mut b = General::packed(layout, 2, 1, vec![6.0, 5.0]).unwrap();
            lp.potrs(&l, &mut b).unwrap();
            assert!((b.at(0, 0) - 1.0).abs() < 1e-14 && (b.at(1, 0) - 1.0).abs() < 1e-14);
        }
    }

    #[test]
    fn test_potrf_reports_indefinite() {
        let lp = Lapack64::default();
        let mut a = Symmetric::new(Layout::RowMajor, 2, 2, Uplo::Upper, vec![1.0, 2.0, 0.0, 1.0]).unwrap();
        assert!(!lp.potrf(&mut a).unwrap());
    }

    #[test]
    fn test_potrs_rejects_unit_factor() {
        let lp = Lapack64::default();
        let t = Triangular::new(Layout::RowMajor, 2, 2, Uplo::Upper, Diag::Unit, vec![1.0; 4]).unwrap();
        let mut b = General::packed(Layout::RowMajor, 2, 1, vec![1.0; 2]).unwrap();
        assert_eq!(lp.potrs(&t, &mut b).unwrap_err().kind(), ErrorKind::InvalidOption);
    }

    #[test]
    fn test_lu_inverse() {
        let lp = Lapack64::default();
        let orig = [4.0, 3.0, 1.0, 6.0, 3.0, 2.0, 1.0, 5.0, 7.0];
        for layout in [Layout::RowMajor, Layout::ColMajor] {
            let mut a = General::packed(layout, 3, 3, orig.to_vec()).unwrap();
            let mut ipiv = [0usize; 3];
            assert!(lp.getrf(&mut a, &mut ipiv).unwrap());

            let mut size = [0.0];
            lp.getri(&mut a, &ipiv, &mut size, Lwork::Query).unwrap();
            let mut work = vec![0.0; size[0] as usize];
            let lwork = Lwork::all(&work);
            assert!(lp.getri(&mut a, &ipiv, &mut work, lwork).unwrap());

            // Same storage convention on both sides, so orig * inv is I either way.
            let src = General::packed(layout, 3, 3, &orig[..]).unwrap();
            for i in 0..3 {
                for j in 0..3 {
                    let v: f64 = (0..3).map(|k| src.at(i, k) * a.at(k, j)).sum();
                    let expect = if i == j { 1.0 } else { 0.0 };
                    assert!((v - expect).abs() < 1e-13, "{layout:?} ({i}, {j}) = {v}");
                }
            }
        }
    }

    #[test]
    fn test_getrf_then_getrs_transposed() {
        let lp = Lapack64::default();
        // A^T x = b with A = [[2, 1], [4, 3]]: A^T = [[2, 4], [1, 3]], x = [1, 1] gives b = [6, 4].
        let mut a = General::packed(Layout::ColMajor, 2, 2, vec![2.0, 4.0, 1.0, 3.0]).unwrap();
        let mut ipiv = [0; 2];
        assert!(lp.getrf(&mut a, &mut ipiv).unwrap());
        let mut b = General::packed(Layout::ColMajor, 2, 1, vec![6.0, 4.0]).unwrap();
        lp.getrs(Transpose::Trans, &a, &ipiv, &mut b).unwrap();
        assert!((b.at(0, 0) - 1.0).abs() < 1e-14 && (b.at(1, 0) - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_trtrs_singular_leaves_b() {
        let lp = Lapack64::default();
        let t = Triangular::new(Layout::RowMajor, 2, 2, Uplo::Upper, Diag::NonUnit, vec![1.0, 2.0, 0.0, 0.0]).unwrap();
        let mut b = General::packed(Layout::RowMajor, 2, 1, vec![3.0, 4.0]).unwrap();
        assert!(!lp.trtrs(Transpose::NoTrans, &t, &mut b).unwrap());
        assert_eq!(b.data(), &[3.0, 4.0]);

        let t = Triangular::new(Layout::RowMajor, 2, 2, Uplo::Upper, Diag::NonUnit, vec![1.0, 2.0, 0.0, 4.0]).unwrap();
        assert!(lp.trtrs(Transpose::NoTrans, &t, &mut b).unwrap());
        // x1 = 1, x0 = 3 - 2
        assert_eq!(b.data(), &[1.0, 1.0]);
    }

    #[test]
    fn test_qr_then_orgqr_is_orthonormal() {
        let lp = Lapack64::default();
        let (m, n) = (4, 3);
        let data = vec![1.0, 2.0, 0.5, -1.0, 0.0, 3.0, 2.0, 1.0, 1.0, 0.5, -2.0, 4.0];
        let mut a = General::packed(Layout::RowMajor, m, n, data).unwrap();
        let mut tau = vec![0.0; n];
        let mut work = vec![0.0; n];
        let lwork = Lwork::all(&work);
        lp.geqrf(&mut a, &mut tau, &mut work, lwork).unwrap();
        lp.orgqr(&mut a, n, &tau, &mut work, lwork).unwrap();
        for p in 0..n {
            for q in 0..n {
                let dot: f64 = (0..m).map(|i| a.at(i, p) * a.at(i, q)).sum();
                let expect = if p == q { 1.0 } else { 0.0 };
                assert!((dot - expect).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_orgqr_shape_checks() {
        let lp = Lapack64::default();
        let mut work = vec![0.0; 4];
        let mut wide = General::packed(Layout::RowMajor, 2, 3, vec![0.0; 6]).unwrap();
        let err = lp.orgqr(&mut wide, 1, &[0.0], &mut work, Lwork::Len(4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDimension);

        let mut tall = General::packed(Layout::RowMajor, 3, 2, vec![0.0; 6]).unwrap();
        let err = lp.orgqr(&mut tall, 3, &[0.0; 3], &mut work, Lwork::Len(4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDimension);
    }

    #[test]
    fn test_gels_overdetermined_exact() {
        let lp = Lapack64::default();
        for layout in [Layout::RowMajor, Layout::ColMajor] {
            // [[1, 0], [0, 1], [1, 1]] x = [1, 1, 2] is consistent with x = [1, 1].
            let mut a = General::new(layout, 3, 2, 3, vec![0.0; 9]).unwrap();
            for (i, row) in [[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]].iter().enumerate() {
                a.set(i, 0, row[0]);
                a.set(i, 1, row[1]);
            }
            let mut b = General::packed(layout, 3, 1, vec![1.0, 1.0, 2.0]).unwrap();
            let mut size = [0.0];
            lp.gels(Transpose::NoTrans, &mut a, &mut b, &mut size, Lwork::Query).unwrap();
            let mut work = vec![0.0; size[0] as usize];
            let lwork = Lwork::all(&work);
            assert!(lp.gels(Transpose::NoTrans, &mut a, &mut b, &mut work, lwork).unwrap());
            assert!((b.at(0, 0) - 1.0).abs() < 1e-14, "{layout:?}");
            assert!((b.at(1, 0) - 1.0).abs() < 1e-14, "{layout:?}");
        }
    }

    #[test]
    fn test_eigen_returns_general_view() {
        let lp = Lapack64::default();
        let a = Symmetric::new(Layout::ColMajor, 2, 2, Uplo::Upper, vec![2.0, f64::NAN, 1.0, 2.0]).unwrap();
        let mut w = [0.0; 2];
        let mut work = vec![0.0; minimum::syev(2)];
        let lwork = Lwork::all(&work);
        let (z, r) = lp.eigen(a, &mut w, &mut work, lwork).unwrap();
        assert!(r.is_complete());
        assert!((w[0] - 1.0).abs() < 1e-14 && (w[1] - 3.0).abs() < 1e-14);
        assert_eq!((z.rows(), z.cols()), (2, 2));
        // Eigenvector of 3 is (1, 1) / sqrt(2) up to sign.
        assert!((z.at(0, 1) - z.at(1, 1)).abs() < 1e-14);
        assert!(z.data().iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_syev_sweep_limit_is_reported() {
        init_logger();
        let lp = Lapack64::new(NativeBackend::with_max_sweeps(0));
        let n = 4;
        let mut data = vec![0.5; n * n];
        for (i, d) in [4.0, 1.0, 3.0, 2.0].into_iter().enumerate() {
            data[i * n + i] = d;
        }
        let mut a = Symmetric::new(Layout::RowMajor, n, n, Uplo::Lower, data).unwrap();
        let mut w = [0.0; 4];
        let mut work = vec![0.0; minimum::syev(n)];
        let lwork = Lwork::all(&work);
        let r = lp.syev(EigenJob::Vectors, &mut a, &mut w, &mut work, lwork).unwrap();
        assert!(!r.is_complete());
        assert_eq!(r.total, n);
        assert!(r.converged < n);
        assert_eq!(w, [1.0, 2.0, 3.0, 4.0]);
        // Eigenvector columns move with their eigenvalues.
        assert_eq!(a.data()[3], 1.0);
        assert_eq!(a.data()[n], 1.0);

        // The default limit converges the same matrix.
        assert_eq!(NativeBackend::default().max_sweeps(), 50);
        let mut data = vec![0.5; n * n];
        for (i, d) in [4.0, 1.0, 3.0, 2.0].into_iter().enumerate() {
            data[i * n + i] = d;
        }
        let mut a = Symmetric::new(Layout::RowMajor, n, n, Uplo::Lower, data).unwrap();
        let r = Lapack64::default().syev(EigenJob::ValuesOnly, &mut a, &mut w, &mut work, lwork).unwrap();
        assert!(r.is_complete());
    }

    #[test]
    fn test_lange_through_context() {
        let lp = Lapack64::default();
        let a = General::packed(Layout::RowMajor, 2, 3, vec![1.0, -2.0, 3.0, -4.0, 5.0, -6.0]).unwrap();
        let mut work = vec![0.0; 3];
        assert_eq!(lp.lange(Norm::One, &a, &mut work, Lwork::Len(3)).unwrap(), 9.0);
        assert_eq!(lp.lange(Norm::Infinity, &a, &mut work, Lwork::Len(2)).unwrap(), 15.0);
        let err = lp.lange(Norm::One, &a, &mut work, Lwork::Len(2)).unwrap_err();
        assert_eq!(err, Error::InsufficientWorkspace { required: 3, actual: 2 });
    }

    #[test]
    fn test_larfg_then_larf() {
        let lp = Lapack64::default();
        let mut x = Vector::contiguous(vec![4.0]);
        let h = lp.larfg(3.0, &mut x).unwrap();
        assert!((h.beta + 5.0).abs() < 1e-14);
        assert!((h.tau - 1.6).abs() < 1e-14);
        assert!((x.at(0) - 0.5).abs() < 1e-14);

        let v = Vector::contiguous(vec![1.0, x.at(0)]);
        let mut c = General::packed(Layout::RowMajor, 2, 1, vec![3.0, 4.0]).unwrap();
        let mut work = [0.0];
        lp.larf(Side::Left, &v, h.tau, &mut c, &mut work, Lwork::Len(1)).unwrap();
        assert!((c.at(0, 0) + 5.0).abs() < 1e-14);
        assert!(c.at(1, 0).abs() < 1e-14);

        let mut wrong = General::packed(Layout::RowMajor, 3, 1, vec![0.0; 3]).unwrap();
        let err = lp.larf(Side::Left, &v, h.tau, &mut wrong, &mut work, Lwork::Len(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDimension);
    }

    #[test]
    fn test_lacpy_half() {
        let lp = Lapack64::default();
        let a = General::packed(Layout::RowMajor, 2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut b = General::packed(Layout::RowMajor, 2, 2, vec![0.0; 4]).unwrap();
        lp.lacpy(Uplo::Upper, &a, &mut b).unwrap();
        assert_eq!(b.data(), &[1.0, 2.0, 0.0, 4.0]);

        let mut other = General::packed(Layout::ColMajor, 2, 2, vec![0.0; 4]).unwrap();
        assert_eq!(lp.lacpy(Uplo::All, &a, &mut other).unwrap_err().kind(), ErrorKind::LayoutMismatch);
    }
}
