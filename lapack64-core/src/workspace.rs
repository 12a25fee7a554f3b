//! Workspace sizing and the workspace-size query protocol.
//!
//! Every routine that needs scratch memory takes `(work, lwork)`. With
//! [`Lwork::Query`] the routine does no numerical work and validates no
//! matrix argument: it stores its minimum workspace length in `work[0]` and
//! returns its success value. Callers size their buffer from that first call.
//!
//! ```
//! use lapack64_core::workspace::{minimum, Lwork};
//!
//! let mut size = [0.0];
//! Lwork::Query.query(&mut size, minimum::geqrf(6, 4)).unwrap();
//! let mut work = vec![0.0; size[0] as usize];
//! let lwork = Lwork::Len(work.len());
//! assert!(lwork.reserve(&mut work, minimum::geqrf(6, 4)).is_ok());
//! ```

use crate::error::{Error, Result};

/// Declared usable workspace length, or a request for the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lwork {
    /// Only report the minimum workspace length in `work[0]`.
    Query,
    /// Use the first `n` elements of `work`.
    Len(usize),
}

impl Lwork {
    /// Raw value of the query sentinel in the LAPACK convention.
    pub const QUERY_SENTINEL: i64 = -1;

    /// Interprets a raw LAPACK-style `lwork`: `-1` requests a query, any other
    /// negative value is rejected.
    pub fn from_raw(raw: i64) -> Result<Lwork> {
        if raw == Self::QUERY_SENTINEL {
            return Ok(Lwork::Query);
        }
        crate::contract::extent("lwork", raw).map(Lwork::Len)
    }

    /// Declares the whole of `work` usable.
    #[inline]
    pub fn all(work: &[f64]) -> Lwork {
        Lwork::Len(work.len())
    }

    #[inline]
    pub fn is_query(self) -> bool {
        matches!(self, Lwork::Query)
    }

    /// Performs the query: stores `minimum` in `work[0]`.
    ///
    /// Touches nothing but `work[0]`, so repeated queries are idempotent.
    pub fn query(self, work: &mut [f64], minimum: usize) -> Result<()> {
        debug_assert!(self.is_query());
        match work.first_mut() {
            Some(slot) => {
                *slot = minimum as f64;
                Ok(())
            }
            None => Err(Error::InsufficientWorkspace {
                required: 1,
                actual: 0,
            }),
        }
    }

    /// Checks a real call's workspace and returns the usable prefix.
    ///
    /// Fails if the declared length is below `minimum`, or if `work` is
    /// shorter than declared.
    pub fn reserve(self, work: &mut [f64], minimum: usize) -> Result<&mut [f64]> {
        let declared = match self {
            Lwork::Len(n) => n,
            Lwork::Query => {
                return Err(Error::InsufficientWorkspace {
                    required: minimum,
                    actual: 0,
                })
            }
        };
        if declared < minimum {
            return Err(Error::InsufficientWorkspace {
                required: minimum,
                actual: declared,
            });
        }
        if work.len() < declared {
            return Err(Error::InsufficientStorage {
                arg: "work",
                required: declared,
                actual: work.len(),
            });
        }
        Ok(&mut work[..declared])
    }
}

/// Minimum workspace length of each routine that takes workspace.
pub mod minimum {
    use crate::layout::{Norm, Side};

    pub fn getri(n: usize) -> usize {
        n.max(1)
    }

    pub fn geqrf(_m: usize, n: usize) -> usize {
        n.max(1)
    }

    pub fn orgqr(_m: usize, n: usize) -> usize {
        n.max(1)
    }

    pub fn geqp3(_m: usize, n: usize) -> usize {
        3 * n + 1
    }

    /// `mn` reflector scalars followed by scratch for applying them to
    /// either `A` or `B`.
    pub fn gels(m: usize, n: usize, nrhs: usize) -> usize {
        let mn = m.min(n);
        (mn + mn.max(nrhs)).max(1)
    }

    pub fn syev(n: usize) -> usize {
        (3 * n).saturating_sub(1).max(1)
    }

    /// Column sums for the one norm, row sums for the infinity norm.
    pub fn lange(norm: Norm, m: usize, n: usize) -> usize {
        match norm {
            Norm::One => n.max(1),
            Norm::Infinity => m.max(1),
            Norm::MaxAbs | Norm::Frobenius => 1,
        }
    }

    /// One element per column of `C` when applying from the left, per row
    /// when applying from the right.
    pub fn larf(side: Side, m: usize, n: usize) -> usize {
        match side {
            Side::Left => n.max(1),
            Side::Right => m.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::layout::{Norm, Side};

    #[test]
    fn test_from_raw() {
        assert_eq!(Lwork::from_raw(-1).unwrap(), Lwork::Query);
        assert_eq!(Lwork::from_raw(7).unwrap(), Lwork::Len(7));
        assert_eq!(
            Lwork::from_raw(-2).unwrap_err().kind(),
            ErrorKind::InvalidDimension
        );
    }

    #[test]
    fn test_query_is_idempotent() {
        let mut work = [f64::NAN, 42.0];
        for _ in 0..3 {
            Lwork::Query.query(&mut work, minimum::syev(5)).unwrap();
            assert_eq!(work, [14.0, 42.0]);
        }
    }

    #[test]
    fn test_query_needs_one_slot() {
        let err = Lwork::Query.query(&mut [], 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientWorkspace);
    }

    #[test]
    fn test_reserve() {
        let mut work = vec![0.0; 10];
        assert_eq!(Lwork::Len(8).reserve(&mut work, 4).unwrap().len(), 8);

        let err = Lwork::Len(3).reserve(&mut work, 4).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientWorkspace {
                required: 4,
                actual: 3
            }
        );

        let err = Lwork::Len(11).reserve(&mut work, 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStorage);
    }

    #[test]
    fn test_minimums() {
        assert_eq!(minimum::gels(5, 3, 2), 6);
        assert_eq!(minimum::gels(3, 5, 4), 7);
        assert_eq!(minimum::gels(0, 0, 0), 1);
        assert_eq!(minimum::syev(0), 1);
        assert_eq!(minimum::syev(1), 2);
        assert_eq!(minimum::geqp3(4, 3), 10);
        assert_eq!(minimum::lange(Norm::One, 2, 7), 7);
        assert_eq!(minimum::lange(Norm::Infinity, 2, 7), 2);
        assert_eq!(minimum::larf(Side::Right, 2, 7), 2);
    }
}
