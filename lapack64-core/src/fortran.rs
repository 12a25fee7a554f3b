//! Translation between the typed API and the Fortran LAPACK calling
//! convention: option enums travel as single ASCII characters and every
//! index is 1-based.

use crate::error::{Error, Result};
use crate::layout::{Diag, EigenJob, Norm, Side, Transpose, Uplo};

/// Option types with a one-character Fortran spelling.
pub trait FortranChar: Sized + Copy + std::fmt::Debug {
    /// The character passed to LAPACK.
    fn to_fortran(self) -> u8;

    /// Parses a LAPACK character. Lower-case letters are accepted.
    fn from_fortran(arg: &'static str, c: u8) -> Result<Self>;
}

fn unknown(arg: &'static str, c: u8) -> Error {
    Error::InvalidOption {
        arg,
        value: format!("{:?}", c as char),
    }
}

impl FortranChar for Transpose {
    fn to_fortran(self) -> u8 {
        match self {
            Transpose::NoTrans => b'N',
            Transpose::Trans => b'T',
            Transpose::ConjTrans => b'C',
        }
    }

    fn from_fortran(arg: &'static str, c: u8) -> Result<Self> {
        match c.to_ascii_uppercase() {
            b'N' => Ok(Transpose::NoTrans),
            b'T' => Ok(Transpose::Trans),
            b'C' => Ok(Transpose::ConjTrans),
            _ => Err(unknown(arg, c)),
        }
    }
}

impl FortranChar for Uplo {
    fn to_fortran(self) -> u8 {
        match self {
            Uplo::Upper => b'U',
            Uplo::Lower => b'L',
            Uplo::All => b'A',
        }
    }

    fn from_fortran(arg: &'static str, c: u8) -> Result<Self> {
        match c.to_ascii_uppercase() {
            b'U' => Ok(Uplo::Upper),
            b'L' => Ok(Uplo::Lower),
            b'A' => Ok(Uplo::All),
            _ => Err(unknown(arg, c)),
        }
    }
}

impl FortranChar for Diag {
    fn to_fortran(self) -> u8 {
        match self {
            Diag::Unit => b'U',
            Diag::NonUnit => b'N',
        }
    }

    fn from_fortran(arg: &'static str, c: u8) -> Result<Self> {
        match c.to_ascii_uppercase() {
            b'U' => Ok(Diag::Unit),
            b'N' => Ok(Diag::NonUnit),
            _ => Err(unknown(arg, c)),
        }
    }
}

impl FortranChar for Side {
    fn to_fortran(self) -> u8 {
        match self {
            Side::Left => b'L',
            Side::Right => b'R',
        }
    }

    fn from_fortran(arg: &'static str, c: u8) -> Result<Self> {
        match c.to_ascii_uppercase() {
            b'L' => Ok(Side::Left),
            b'R' => Ok(Side::Right),
            _ => Err(unknown(arg, c)),
        }
    }
}

impl FortranChar for EigenJob {
    fn to_fortran(self) -> u8 {
        match self {
            EigenJob::ValuesOnly => b'N',
            EigenJob::Vectors => b'V',
        }
    }

    fn from_fortran(arg: &'static str, c: u8) -> Result<Self> {
        match c.to_ascii_uppercase() {
            b'N' => Ok(EigenJob::ValuesOnly),
            b'V' => Ok(EigenJob::Vectors),
            _ => Err(unknown(arg, c)),
        }
    }
}

impl FortranChar for Norm {
    fn to_fortran(self) -> u8 {
        match self {
            Norm::MaxAbs => b'M',
            Norm::One => b'O',
            Norm::Infinity => b'I',
            Norm::Frobenius => b'F',
        }
    }

    /// `'1'` is LAPACK's alternative spelling of the one norm, `'E'` of the
    /// Frobenius norm.
    fn from_fortran(arg: &'static str, c: u8) -> Result<Self> {
        match c.to_ascii_uppercase() {
            b'M' => Ok(Norm::MaxAbs),
            b'O' | b'1' => Ok(Norm::One),
            b'I' => Ok(Norm::Infinity),
            b'F' | b'E' => Ok(Norm::Frobenius),
            _ => Err(unknown(arg, c)),
        }
    }
}

/// Converts an extent or leading dimension to the Fortran integer type.
pub fn int(arg: &'static str, v: usize) -> Result<i32> {
    i32::try_from(v).map_err(|_| Error::dimension(arg, format!("{v} does not fit a 32-bit LAPACK integer")))
}

/// 0-based index to 1-based Fortran index.
pub fn to_one_based(arg: &'static str, index: usize) -> Result<i32> {
    index
        .checked_add(1)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or(Error::IndexOutOfRange {
            arg,
            index: index as i64,
            lo: 0,
            hi: i32::MAX as i64,
        })
}

/// 1-based Fortran index to 0-based index. The result must lie in `[0, dim)`.
pub fn to_zero_based(arg: &'static str, index: i32, dim: usize) -> Result<usize> {
    let out_of_range = || Error::IndexOutOfRange {
        arg,
        index: index as i64,
        lo: 1,
        hi: dim as i64 + 1,
    };
    if index < 1 {
        return Err(out_of_range());
    }
    let zero = index as usize - 1;
    if zero >= dim {
        return Err(out_of_range());
    }
    Ok(zero)
}

/// Converts every 0-based index in `src` into `dst`.
pub fn indices_to_one_based(arg: &'static str, src: &[usize], dst: &mut [i32]) -> Result<()> {
    crate::contract::check_len(arg, src.len(), dst.len())?;
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = to_one_based(arg, s)?;
    }
    Ok(())
}

/// Converts every 1-based index in `src` into `dst`, each bounded by `dim`.
pub fn indices_to_zero_based(arg: &'static str, src: &[i32], dim: usize, dst: &mut [usize]) -> Result<()> {
    crate::contract::check_len(arg, src.len(), dst.len())?;
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = to_zero_based(arg, s, dim)?;
    }
    Ok(())
}
