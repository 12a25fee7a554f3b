//! Pre-flight argument checks shared by every routine.
//!
//! Each check inspects only dimensions, strides and slice lengths; none of
//! them dereferences matrix storage, so a rejected call leaves every argument
//! untouched.

use crate::error::{Error, Result};
use crate::layout::{Layout, Transpose, Uplo};

/// Number of elements a `rows x cols` view with leading dimension `stride`
/// spans. Zero for an empty matrix.
#[inline]
pub fn required_len(layout: Layout, rows: usize, cols: usize, stride: usize) -> usize {
    if rows == 0 || cols == 0 {
        return 0;
    }
    match layout {
        Layout::RowMajor => (rows - 1) * stride + cols,
        Layout::ColMajor => (cols - 1) * stride + rows,
    }
}

/// Smallest legal leading dimension, `max(1, minor dimension)`.
#[inline]
pub fn min_stride(layout: Layout, rows: usize, cols: usize) -> usize {
    layout.leading_dim(rows, cols).max(1)
}

/// Converts a signed extent coming from a C/Fortran-style caller.
pub fn extent(arg: &'static str, raw: i64) -> Result<usize> {
    usize::try_from(raw).map_err(|_| Error::dimension(arg, format!("negative extent {raw}")))
}

/// Checks stride sufficiency and storage length of a matrix argument.
pub fn check_matrix(
    arg: &'static str,
    layout: Layout,
    rows: usize,
    cols: usize,
    stride: usize,
    len: usize,
) -> Result<()> {
    let min = min_stride(layout, rows, cols);
    if stride < min {
        return Err(Error::dimension(
            arg,
            format!("stride {stride} is less than the minimum {min} for a {rows}x{cols} {layout:?} matrix"),
        ));
    }
    let required = required_len(layout, rows, cols, stride);
    if len < required {
        return Err(Error::InsufficientStorage {
            arg,
            required,
            actual: len,
        });
    }
    Ok(())
}

/// Checks increment and storage length of a strided vector argument.
pub fn check_vector(arg: &'static str, n: usize, inc: usize, len: usize) -> Result<()> {
    if inc == 0 {
        return Err(Error::dimension(arg, "increment must be positive"));
    }
    let required = if n == 0 { 0 } else { 1 + (n - 1) * inc };
    if len < required {
        return Err(Error::InsufficientStorage {
            arg,
            required,
            actual: len,
        });
    }
    Ok(())
}

/// Checks that an auxiliary array (`ipiv`, `tau`, `w`, ...) holds at least
/// `required` elements.
#[inline]
pub fn check_len(arg: &'static str, required: usize, actual: usize) -> Result<()> {
    if actual < required {
        return Err(Error::InsufficientStorage {
            arg,
            required,
            actual,
        });
    }
    Ok(())
}

/// Checks that two extents which must agree do agree.
#[inline]
pub fn check_dim(arg: &'static str, what: &str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(Error::dimension(
            arg,
            format!("{what} is {got}, expected {expected}"),
        ));
    }
    Ok(())
}

/// Checks that a descriptor uses the layout of the call's first matrix.
#[inline]
pub fn check_layout(arg: &'static str, expected: Layout, got: Layout) -> Result<()> {
    if expected != got {
        return Err(Error::LayoutMismatch { arg, expected, got });
    }
    Ok(())
}

/// Symmetric storage names exactly one half.
#[inline]
pub fn check_half(arg: &'static str, uplo: Uplo) -> Result<()> {
    match uplo {
        Uplo::Upper | Uplo::Lower => Ok(()),
        Uplo::All => Err(Error::option(arg, uplo)),
    }
}

/// For routines that accept only `NoTrans` and `Trans`.
#[inline]
pub fn check_real_trans(arg: &'static str, trans: Transpose) -> Result<()> {
    match trans {
        Transpose::NoTrans | Transpose::Trans => Ok(()),
        Transpose::ConjTrans => Err(Error::option(arg, trans)),
    }
}

/// Checks that every 0-based pivot lies in `[0, n)`.
pub fn check_pivots(arg: &'static str, pivots: &[usize], n: usize) -> Result<()> {
    match pivots.iter().find(|&&p| p >= n) {
        Some(&p) => Err(Error::IndexOutOfRange {
            arg,
            index: p as i64,
            lo: 0,
            hi: n as i64,
        }),
        None => Ok(()),
    }
}
