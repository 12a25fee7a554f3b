//! Strided matrix and vector descriptors.
//!
//! A descriptor is a view: it records extents, stride, layout and (for
//! symmetric and triangular matrices) which half is meaningful, over storage
//! `S` the caller owns. `S` is usually `&[f64]` or `&mut [f64]`; conversions
//! that allocate return descriptors over `Vec<f64>`.
//!
//! Constructors run the contract checks, so a descriptor that exists is
//! well-formed: its stride covers the minor dimension and its storage covers
//! the declared extent.
//!
//! Reinterpreting storage (a general matrix that a factorization turns into a
//! triangular one) is done by value: `into_*` methods move the storage handle
//! into a new descriptor without touching the data.

use crate::contract;
use crate::error::Result;
use crate::layout::{Diag, Layout, Uplo};

/// General `rows x cols` matrix. Every cell is meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct General<S> {
    rows: usize,
    cols: usize,
    stride: usize,
    layout: Layout,
    data: S,
}

/// Symmetric `n x n` matrix; only the `uplo` half (diagonal included) is
/// stored. The other half is undefined and never read.
#[derive(Debug, Clone, PartialEq)]
pub struct Symmetric<S> {
    n: usize,
    stride: usize,
    layout: Layout,
    uplo: Uplo,
    data: S,
}

/// Triangular `n x n` matrix. With `Uplo::All` every cell is populated; with
/// `Diag::Unit` the diagonal is logically one and is never read.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangular<S> {
    n: usize,
    stride: usize,
    layout: Layout,
    uplo: Uplo,
    diag: Diag,
    data: S,
}

/// Strided vector of `n` elements, `inc` apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<S> {
    n: usize,
    inc: usize,
    data: S,
}

// ---------------------------------------------------------------------------
// General
// ---------------------------------------------------------------------------

impl<S: AsRef<[f64]>> General<S> {
    pub fn new(layout: Layout, rows: usize, cols: usize, stride: usize, data: S) -> Result<Self> {
        contract::check_matrix("matrix", layout, rows, cols, stride, data.as_ref().len())?;
        Ok(General {
            rows,
            cols,
            stride,
            layout,
            data,
        })
    }

    /// Caller guarantees the contract checks already hold.
    pub(crate) fn from_parts(layout: Layout, rows: usize, cols: usize, stride: usize, data: S) -> Self {
        General {
            rows,
            cols,
            stride,
            layout,
            data,
        }
    }

    /// Densely packed view: stride is the minimal legal value.
    pub fn packed(layout: Layout, rows: usize, cols: usize, data: S) -> Result<Self> {
        let stride = contract::min_stride(layout, rows, cols);
        Self::new(layout, rows, cols, stride, data)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub fn data(&self) -> &[f64] {
        self.data.as_ref()
    }

    /// Element `(i, j)`.
    ///
    /// # Panics
    /// If `(i, j)` is outside the matrix.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of bounds");
        self.data.as_ref()[self.layout.index(i, j, self.stride)]
    }

    pub fn view(&self) -> General<&[f64]> {
        General {
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
            layout: self.layout,
            data: self.data.as_ref(),
        }
    }

    pub fn into_inner(self) -> S {
        self.data
    }

    /// Reinterprets a square general matrix as symmetric over the same storage.
    pub fn into_symmetric(self, uplo: Uplo) -> Result<Symmetric<S>> {
        contract::check_half("uplo", uplo)?;
        contract::check_dim("matrix", "column count", self.rows, self.cols)?;
        Ok(Symmetric {
            n: self.rows,
            stride: self.stride,
            layout: self.layout,
            uplo,
            data: self.data,
        })
    }

    /// Reinterprets a square general matrix as triangular over the same storage.
    pub fn into_triangular(self, uplo: Uplo, diag: Diag) -> Result<Triangular<S>> {
        contract::check_dim("matrix", "column count", self.rows, self.cols)?;
        Ok(Triangular {
            n: self.rows,
            stride: self.stride,
            layout: self.layout,
            uplo,
            diag,
            data: self.data,
        })
    }
}

impl<S: AsRef<[f64]> + AsMut<[f64]>> General<S> {
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        self.data.as_mut()
    }

    /// Sets element `(i, j)`.
    ///
    /// # Panics
    /// If `(i, j)` is outside the matrix.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of bounds");
        let idx = self.layout.index(i, j, self.stride);
        self.data.as_mut()[idx] = v;
    }

    pub fn view_mut(&mut self) -> General<&mut [f64]> {
        General {
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
            layout: self.layout,
            data: self.data.as_mut(),
        }
    }
}

// ---------------------------------------------------------------------------
// Symmetric
// ---------------------------------------------------------------------------

impl<S: AsRef<[f64]>> Symmetric<S> {
    pub fn new(layout: Layout, n: usize, stride: usize, uplo: Uplo, data: S) -> Result<Self> {
        contract::check_half("uplo", uplo)?;
        contract::check_matrix("matrix", layout, n, n, stride, data.as_ref().len())?;
        Ok(Symmetric {
            n,
            stride,
            layout,
            uplo,
            data,
        })
    }

    pub(crate) fn from_parts(layout: Layout, n: usize, stride: usize, uplo: Uplo, data: S) -> Self {
        Symmetric {
            n,
            stride,
            layout,
            uplo,
            data,
        }
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub fn uplo(&self) -> Uplo {
        self.uplo
    }

    #[inline]
    pub fn data(&self) -> &[f64] {
        self.data.as_ref()
    }

    /// Logical element `(i, j)`, read from the stored half.
    ///
    /// # Panics
    /// If `(i, j)` is outside the matrix.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of bounds");
        let (i, j) = if self.uplo.contains(i, j) { (i, j) } else { (j, i) };
        self.data.as_ref()[self.layout.index(i, j, self.stride)]
    }

    pub fn view(&self) -> Symmetric<&[f64]> {
        Symmetric {
            n: self.n,
            stride: self.stride,
            layout: self.layout,
            uplo: self.uplo,
            data: self.data.as_ref(),
        }
    }

    pub fn into_inner(self) -> S {
        self.data
    }

    /// Same storage, same half, read as a triangular factor.
    pub fn into_triangular(self, diag: Diag) -> Triangular<S> {
        Triangular {
            n: self.n,
            stride: self.stride,
            layout: self.layout,
            uplo: self.uplo,
            diag,
            data: self.data,
        }
    }

    /// Same storage read as a full general matrix.
    pub fn into_general(self) -> General<S> {
        General {
            rows: self.n,
            cols: self.n,
            stride: self.stride,
            layout: self.layout,
            data: self.data,
        }
    }
}

impl<S: AsRef<[f64]> + AsMut<[f64]>> Symmetric<S> {
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        self.data.as_mut()
    }

    /// Sets logical element `(i, j)` (and so `(j, i)`) in the stored half.
    ///
    /// # Panics
    /// If `(i, j)` is outside the matrix.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of bounds");
        let (i, j) = if self.uplo.contains(i, j) { (i, j) } else { (j, i) };
        let idx = self.layout.index(i, j, self.stride);
        self.data.as_mut()[idx] = v;
    }

    pub fn view_mut(&mut self) -> Symmetric<&mut [f64]> {
        Symmetric {
            n: self.n,
            stride: self.stride,
            layout: self.layout,
            uplo: self.uplo,
            data: self.data.as_mut(),
        }
    }
}

// ---------------------------------------------------------------------------
// Triangular
// ---------------------------------------------------------------------------

impl<S: AsRef<[f64]>> Triangular<S> {
    pub fn new(
        layout: Layout,
        n: usize,
        stride: usize,
        uplo: Uplo,
        diag: Diag,
        data: S,
    ) -> Result<Self> {
        contract::check_matrix("matrix", layout, n, n, stride, data.as_ref().len())?;
        Ok(Triangular {
            n,
            stride,
            layout,
            uplo,
            diag,
            data,
        })
    }

    pub(crate) fn from_parts(
        layout: Layout,
        n: usize,
        stride: usize,
        uplo: Uplo,
        diag: Diag,
        data: S,
    ) -> Self {
        Triangular {
            n,
            stride,
            layout,
            uplo,
            diag,
            data,
        }
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub fn uplo(&self) -> Uplo {
        self.uplo
    }

    #[inline]
    pub fn diag(&self) -> Diag {
        self.diag
    }

    #[inline]
    pub fn data(&self) -> &[f64] {
        self.data.as_ref()
    }

    /// Logical element `(i, j)`: zero outside the stored half, one on a unit
    /// diagonal. Neither case reads storage.
    ///
    /// # Panics
    /// If `(i, j)` is outside the matrix.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of bounds");
        if i == j && self.diag == Diag::Unit {
            return 1.0;
        }
        if !self.uplo.contains(i, j) {
            return 0.0;
        }
        self.data.as_ref()[self.layout.index(i, j, self.stride)]
    }

    pub fn view(&self) -> Triangular<&[f64]> {
        Triangular {
            n: self.n,
            stride: self.stride,
            layout: self.layout,
            uplo: self.uplo,
            diag: self.diag,
            data: self.data.as_ref(),
        }
    }

    pub fn into_inner(self) -> S {
        self.data
    }

    pub fn into_general(self) -> General<S> {
        General {
            rows: self.n,
            cols: self.n,
            stride: self.stride,
            layout: self.layout,
            data: self.data,
        }
    }
}

impl<S: AsRef<[f64]> + AsMut<[f64]>> Triangular<S> {
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        self.data.as_mut()
    }

    pub fn view_mut(&mut self) -> Triangular<&mut [f64]> {
        Triangular {
            n: self.n,
            stride: self.stride,
            layout: self.layout,
            uplo: self.uplo,
            diag: self.diag,
            data: self.data.as_mut(),
        }
    }
}

// ---------------------------------------------------------------------------
// Vector
// ---------------------------------------------------------------------------

impl<S: AsRef<[f64]>> Vector<S> {
    pub fn new(n: usize, inc: usize, data: S) -> Result<Self> {
        contract::check_vector("vector", n, inc, data.as_ref().len())?;
        Ok(Vector { n, inc, data })
    }

    /// Contiguous vector over all of `data`.
    pub fn contiguous(data: S) -> Self {
        let n = data.as_ref().len();
        Vector { n, inc: 1, data }
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn inc(&self) -> usize {
        self.inc
    }

    #[inline]
    pub fn data(&self) -> &[f64] {
        self.data.as_ref()
    }

    /// Element `i`.
    ///
    /// # Panics
    /// If `i >= n`.
    #[inline]
    pub fn at(&self, i: usize) -> f64 {
        assert!(i < self.n, "index {i} out of bounds");
        self.data.as_ref()[i * self.inc]
    }

    pub fn into_inner(self) -> S {
        self.data
    }
}

impl<S: AsRef<[f64]> + AsMut<[f64]>> Vector<S> {
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        self.data.as_mut()
    }

    /// Sets element `i`.
    ///
    /// # Panics
    /// If `i >= n`.
    #[inline]
    pub fn set(&mut self, i: usize, v: f64) {
        assert!(i < self.n, "index {i} out of bounds");
        self.data.as_mut()[i * self.inc] = v;
    }
}
