//! CBLAS-style layout and option enumerations.
//!
//! Both row-major and column-major layouts are accepted by every descriptor
//! and every routine. Discriminants follow the CBLAS convention where one
//! exists so the values stay recognisable in logs and debuggers.

/// Memory layout for matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Layout {
    /// Row-major (C-style): elements in a row are contiguous.
    #[default]
    RowMajor = 101,
    /// Column-major (Fortran-style): elements in a column are contiguous.
    ColMajor = 102,
}

/// Transpose operation for matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Transpose {
    /// No transpose.
    #[default]
    NoTrans = 111,
    /// Transpose.
    Trans = 112,
    /// Conjugate transpose. Identical to `Trans` for real matrices, but some
    /// routines only accept `NoTrans` and `Trans`.
    ConjTrans = 113,
}

impl Layout {
    /// Leading dimension stride for an M x N matrix.
    #[inline(always)]
    pub fn leading_dim(self, rows: usize, cols: usize) -> usize {
        match self {
            Layout::RowMajor => cols,
            Layout::ColMajor => rows,
        }
    }

    /// Linear index into a flat array for element (i, j) of an M x N matrix.
    #[inline(always)]
    pub fn index(self, i: usize, j: usize, ld: usize) -> usize {
        match self {
            Layout::RowMajor => i * ld + j,
            Layout::ColMajor => j * ld + i,
        }
    }

    /// `(row_stride, col_stride)` of a matrix with leading dimension `ld`.
    #[inline(always)]
    pub fn strides(self, ld: usize) -> (usize, usize) {
        match self {
            Layout::RowMajor => (ld, 1),
            Layout::ColMajor => (1, ld),
        }
    }

    /// The other layout.
    #[inline(always)]
    pub fn transposed(self) -> Layout {
        match self {
            Layout::RowMajor => Layout::ColMajor,
            Layout::ColMajor => Layout::RowMajor,
        }
    }
}

impl Transpose {
    /// Whether the operation swaps rows and columns.
    #[inline]
    pub fn is_trans(self) -> bool {
        matches!(self, Transpose::Trans | Transpose::ConjTrans)
    }
}

/// Triangle specifier.
///
/// `All` designates a triangular view whose other half is physically
/// populated as well (reflector blocks, full copies); symmetric views reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Uplo {
    #[default]
    Upper = 121,
    Lower = 122,
    All = 123,
}

impl Uplo {
    /// The triangle holding the same cells after a transpose.
    #[inline]
    pub fn transposed(self) -> Uplo {
        match self {
            Uplo::Upper => Uplo::Lower,
            Uplo::Lower => Uplo::Upper,
            Uplo::All => Uplo::All,
        }
    }

    /// Whether cell `(i, j)` belongs to this triangle (diagonal included).
    #[inline(always)]
    pub fn contains(self, i: usize, j: usize) -> bool {
        match self {
            Uplo::Upper => i <= j,
            Uplo::Lower => i >= j,
            Uplo::All => true,
        }
    }
}

/// Side specifier (left/right multiplication).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Side {
    #[default]
    Left = 141,
    Right = 142,
}

/// Diagonal specifier (unit/non-unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Diag {
    #[default]
    NonUnit = 131,
    Unit = 132,
}

/// Whether a symmetric eigensolver also computes eigenvectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EigenJob {
    #[default]
    ValuesOnly,
    Vectors,
}

/// Matrix norm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Norm {
    /// Largest absolute value of any element.
    #[default]
    MaxAbs,
    /// Maximum column sum of absolute values.
    One,
    /// Maximum row sum of absolute values.
    Infinity,
    /// Square root of the sum of squares.
    Frobenius,
}

impl Norm {
    /// The norm of the transposed matrix that equals this norm.
    #[inline]
    pub fn transposed(self) -> Norm {
        match self {
            Norm::One => Norm::Infinity,
            Norm::Infinity => Norm::One,
            other => other,
        }
    }
}
