//! Which outputs overwrite which inputs.
//!
//! Every routine writes its results into caller storage. The table below
//! names, per routine, the argument whose storage receives the output and how
//! that storage must be read afterwards. The typed reinterpretations exist as
//! by-value conversions on the descriptors (`Symmetric::into_triangular`,
//! `Symmetric::into_general`, ...) and as [`Lapack64::cholesky`] and
//! [`Lapack64::eigen`].
//!
//! [`Lapack64::cholesky`]: crate::Lapack64::cholesky
//! [`Lapack64::eigen`]: crate::Lapack64::eigen

/// One row of [`ALIASING`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aliasing {
    /// Routines sharing the row, without the `d` prefix.
    pub operations: &'static [&'static str],
    /// What is produced.
    pub output: &'static str,
    /// The argument whose storage receives it.
    pub aliases: &'static str,
    /// How that storage reads afterwards.
    pub reinterpretation: &'static str,
}

pub const ALIASING: &[Aliasing] = &[
    Aliasing {
        operations: &["potrf"],
        output: "Cholesky factor",
        aliases: "a",
        reinterpretation: "Symmetric -> Triangular, same uplo, non-unit diagonal",
    },
    Aliasing {
        operations: &["getrf"],
        output: "LU factors",
        aliases: "a",
        reinterpretation: "General -> unit lower L below the diagonal, U on and above it",
    },
    Aliasing {
        operations: &["getri"],
        output: "inverse",
        aliases: "a",
        reinterpretation: "General -> General",
    },
    Aliasing {
        operations: &["geqrf"],
        output: "R and reflectors",
        aliases: "a",
        reinterpretation: "General -> upper trapezoidal R, reflector tails below the diagonal",
    },
    Aliasing {
        operations: &["geqp3"],
        output: "R and reflectors",
        aliases: "a",
        reinterpretation: "as geqrf, for the columns of A permuted by jpvt",
    },
    Aliasing {
        operations: &["orgqr"],
        output: "Q",
        aliases: "a",
        reinterpretation: "reflectors -> General with orthonormal columns",
    },
    Aliasing {
        operations: &["gels"],
        output: "solution X",
        aliases: "b",
        reinterpretation: "General -> leading rows of the same General",
    },
    Aliasing {
        operations: &["syev"],
        output: "eigenvectors",
        aliases: "a",
        reinterpretation: "Symmetric -> General, only with EigenJob::Vectors",
    },
    Aliasing {
        operations: &["potrs", "getrs", "trtrs"],
        output: "solution X",
        aliases: "b",
        reinterpretation: "General -> General",
    },
    Aliasing {
        operations: &["larfg"],
        output: "reflector tail v",
        aliases: "x",
        reinterpretation: "Vector -> reflector tail",
    },
    Aliasing {
        operations: &["larf"],
        output: "H C or C H",
        aliases: "c",
        reinterpretation: "General -> General",
    },
];

/// Looks up a routine by name, with or without the `d` prefix.
pub fn lookup(operation: &str) -> Option<&'static Aliasing> {
    let name = operation.to_ascii_lowercase();
    let name = name.strip_prefix('d').unwrap_or(&name);
    ALIASING.iter().find(|row| row.operations.contains(&name))
}
