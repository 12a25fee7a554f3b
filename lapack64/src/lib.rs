// LAPACK routines have many parameters matching the reference signatures.
// Numeric kernels use index loops for clarity.
#![allow(clippy::too_many_arguments, clippy::needless_range_loop)]

//! # lapack64
//!
//! A dispatchable calling layer for dense double-precision LAPACK routines.
//!
//! Callers describe their matrices with the strided descriptors of
//! [`lapack64_core`] (`General`, `Symmetric`, `Triangular`) in either layout.
//! A [`Lapack64`] context checks every call contract up front and forwards
//! the work to a [`Backend`]:
//!
//! - **native**: self-contained pure Rust kernels, always available
//! - **lapack**: the system LAPACK through its Fortran ABI (feature `lapack`,
//!   plus `openblas`, `netlib` or `intel-mkl` to pick a provider)
//!
//! ```
//! use lapack64::{General, Layout, Lapack64, Lwork};
//!
//! let lp = Lapack64::default();
//! let mut a = General::packed(Layout::RowMajor, 3, 2, vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
//! let mut tau = [0.0; 2];
//!
//! // Ask for the workspace size first, then run.
//! let mut size = [0.0];
//! lp.geqrf(&mut a, &mut tau, &mut size, Lwork::Query).unwrap();
//! let mut work = vec![0.0; size[0] as usize];
//! let lwork = Lwork::all(&work);
//! lp.geqrf(&mut a, &mut tau, &mut work, lwork).unwrap();
//! ```

#[cfg(any(feature = "openblas", feature = "netlib", feature = "intel-mkl"))]
extern crate lapack_src as _;

pub mod aliasing;
pub mod backend;
mod context;
#[cfg(feature = "lapack")]
pub mod external;
pub mod native;

pub use backend::{Backend, BackendKind, Convergence, Reflector};
pub use context::{Lapack64, BACKEND_ENV};
#[cfg(feature = "lapack")]
pub use external::ExternLapack;
pub use native::NativeBackend;

pub use lapack64_core::workspace::minimum;
pub use lapack64_core::{
    Diag, EigenJob, Error, ErrorKind, General, Layout, Lwork, Norm, Result, Side, Symmetric, Transpose, Triangular,
    Uplo, Vector,
};
