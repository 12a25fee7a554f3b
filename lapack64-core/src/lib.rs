//! # lapack64 Core
//!
//! Shared types for the lapack64 calling layer.
//!
//! This crate provides:
//! - **Layout types**: Row-major / column-major layout and the CBLAS-style
//!   option enumerations (`Transpose`, `Uplo`, `Diag`, `Side`, ...).
//! - **Descriptors**: `General`, `Symmetric` and `Triangular` strided matrix
//!   views over caller-owned storage, plus strided `Vector`s.
//! - **Conversion engine**: layout- and stride-changing copies that only touch
//!   the cells a descriptor declares valid.
//! - **Call contracts**: the argument checks and the workspace-size query
//!   protocol every routine runs before doing any work.
//! - **Fortran conventions**: option characters and 0-based/1-based index
//!   translation for talking to a Fortran LAPACK.

pub mod contract;
pub mod convert;
pub mod error;
pub mod fortran;
pub mod layout;
pub mod matrix;
pub mod workspace;

pub use error::{Error, ErrorKind, Result};
pub use fortran::FortranChar;
pub use layout::{Diag, EigenJob, Layout, Norm, Side, Transpose, Uplo};
pub use matrix::{General, Symmetric, Triangular, Vector};
pub use workspace::Lwork;
