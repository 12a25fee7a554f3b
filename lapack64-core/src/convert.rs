//! Row-major / column-major conversion and stride-changing copies.
//!
//! Only cells a descriptor declares valid are read or written: the stored half
//! of a symmetric or triangular matrix (diagonal always included, exactly
//! once), or every cell of a general or `Uplo::All` matrix. Cells outside that
//! region in the destination keep whatever they held. Values are moved bit for
//! bit.
//!
//! A triangular unit diagonal is still copied: `Diag` describes how the data
//! is read, not which storage cells belong to the matrix.

use crate::contract;
use crate::error::{Error, Result};
use crate::layout::{Layout, Uplo};
use crate::matrix::{General, Symmetric, Triangular};

/// Copies the `region` cells of a `rows x cols` matrix between two strided
/// buffers of arbitrary layout.
///
/// `Uplo::Upper` selects `j >= i`, `Uplo::Lower` selects `j <= i`, `Uplo::All`
/// selects every cell. Callers guarantee both buffers cover the extent.
pub fn copy_region(
    dst: &mut [f64],
    dst_layout: Layout,
    dst_stride: usize,
    src: &[f64],
    src_layout: Layout,
    src_stride: usize,
    rows: usize,
    cols: usize,
    region: Uplo,
) {
    for i in 0..rows {
        let (lo, hi) = match region {
            Uplo::Upper => (i, cols),
            Uplo::Lower => (0, cols.min(i + 1)),
            Uplo::All => (0, cols),
        };
        for j in lo..hi {
            dst[dst_layout.index(i, j, dst_stride)] = src[src_layout.index(i, j, src_stride)];
        }
    }
}

fn packed_storage(layout: Layout, rows: usize, cols: usize) -> (usize, Vec<f64>) {
    let stride = contract::min_stride(layout, rows, cols);
    let len = contract::required_len(layout, rows, cols, stride);
    (stride, vec![0.0; len])
}

impl<S: AsRef<[f64]>> General<S> {
    /// Copy of this matrix in the opposite layout, densely packed.
    pub fn convert(&self) -> General<Vec<f64>> {
        self.to_layout(self.layout().transposed())
    }

    /// Copy of this matrix in `layout`, densely packed.
    pub fn to_layout(&self, layout: Layout) -> General<Vec<f64>> {
        let (stride, mut data) = packed_storage(layout, self.rows(), self.cols());
        copy_region(
            &mut data,
            layout,
            stride,
            self.data(),
            self.layout(),
            self.stride(),
            self.rows(),
            self.cols(),
            Uplo::All,
        );
        log::trace!(
            "converted {}x{} general matrix {:?} -> {:?}",
            self.rows(),
            self.cols(),
            self.layout(),
            layout
        );
        General::from_parts(layout, self.rows(), self.cols(), stride, data)
    }
}

impl<S: AsRef<[f64]> + AsMut<[f64]>> General<S> {
    /// Copies `src` into this matrix. Shapes must match; strides and layouts
    /// may differ.
    pub fn copy_from<T: AsRef<[f64]>>(&mut self, src: &General<T>) -> Result<()> {
        contract::check_dim("src", "row count", self.rows(), src.rows())?;
        contract::check_dim("src", "column count", self.cols(), src.cols())?;
        let (layout, rows, cols, stride) = (self.layout(), self.rows(), self.cols(), self.stride());
        contract::check_matrix("dst", layout, rows, cols, stride, self.data().len())?;
        copy_region(
            self.data_mut(),
            layout,
            stride,
            src.data(),
            src.layout(),
            src.stride(),
            rows,
            cols,
            Uplo::All,
        );
        Ok(())
    }
}

impl<S: AsRef<[f64]>> Symmetric<S> {
    /// Copy of the stored half in the opposite layout, densely packed. The
    /// other half of the result is zero.
    pub fn convert(&self) -> Symmetric<Vec<f64>> {
        self.to_layout(self.layout().transposed())
    }

    pub fn to_layout(&self, layout: Layout) -> Symmetric<Vec<f64>> {
        let n = self.n();
        let (stride, mut data) = packed_storage(layout, n, n);
        copy_region(
            &mut data,
            layout,
            stride,
            self.data(),
            self.layout(),
            self.stride(),
            n,
            n,
            self.uplo(),
        );
        Symmetric::from_parts(layout, n, stride, self.uplo(), data)
    }
}

impl<S: AsRef<[f64]> + AsMut<[f64]>> Symmetric<S> {
    /// Copies the stored half of `src`. Order and half must match.
    pub fn copy_from<T: AsRef<[f64]>>(&mut self, src: &Symmetric<T>) -> Result<()> {
        contract::check_dim("src", "order", self.n(), src.n())?;
        if self.uplo() != src.uplo() {
            return Err(Error::option("src.uplo", src.uplo()));
        }
        let (layout, n, stride, uplo) = (self.layout(), self.n(), self.stride(), self.uplo());
        contract::check_matrix("dst", layout, n, n, stride, self.data().len())?;
        copy_region(
            self.data_mut(),
            layout,
            stride,
            src.data(),
            src.layout(),
            src.stride(),
            n,
            n,
            uplo,
        );
        Ok(())
    }
}

impl<S: AsRef<[f64]>> Triangular<S> {
    /// Copy of the stored half (every cell for `Uplo::All`) in the opposite
    /// layout, densely packed.
    pub fn convert(&self) -> Triangular<Vec<f64>> {
        self.to_layout(self.layout().transposed())
    }

    pub fn to_layout(&self, layout: Layout) -> Triangular<Vec<f64>> {
        let n = self.n();
        let (stride, mut data) = packed_storage(layout, n, n);
        copy_region(
            &mut data,
            layout,
            stride,
            self.data(),
            self.layout(),
            self.stride(),
            n,
            n,
            self.uplo(),
        );
        Triangular::from_parts(layout, n, stride, self.uplo(), self.diag(), data)
    }
}

impl<S: AsRef<[f64]> + AsMut<[f64]>> Triangular<S> {
    /// Copies the stored half of `src`. Order, half and diagonal kind must
    /// match; the stored diagonal moves even when it is implicit.
    pub fn copy_from<T: AsRef<[f64]>>(&mut self, src: &Triangular<T>) -> Result<()> {
        contract::check_dim("src", "order", self.n(), src.n())?;
        if self.diag() != src.diag() {
            return Err(Error::option("src.diag", src.diag()));
        }
        if self.uplo() != src.uplo() {
            return Err(Error::option("src.uplo", src.uplo()));
        }
        let (layout, n, stride, uplo) = (self.layout(), self.n(), self.stride(), self.uplo());
        contract::check_matrix("dst", layout, n, n, stride, self.data().len())?;
        copy_region(
            self.data_mut(),
            layout,
            stride,
            src.data(),
            src.layout(),
            src.stride(),
            n,
            n,
            uplo,
        );
        Ok(())
    }
}
