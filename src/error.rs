use thiserror::Error;

/// Top-level error type for the curve library.
#[derive(Debug, Error)]
pub enum GeocurveError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Computation(#[from] ComputationError),
}

/// Errors raised by invalid or degenerate geometric input.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("invalid parameter interval [{t_min}, {t_max}]")]
    InvalidInterval { t_min: f64, t_max: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("radius signs disagree: {radius0} and {radius1}")]
    MismatchedRadii { radius0: f64, radius1: f64 },

    #[error("arc length {length} exceeds the validated clothoid maximum {max}")]
    ArcLengthOverflow { length: f64, max: f64 },
}

/// Errors raised when a well-formed request has no stable numerical answer.
#[derive(Debug, Error)]
pub enum ComputationError {
    #[error("zero-length vector")]
    ZeroVector,

    #[error("root is not bracketed by [{lo}, {hi}]: f(lo) = {f_lo}, f(hi) = {f_hi}")]
    RootNotBracketed {
        lo: f64,
        hi: f64,
        f_lo: f64,
        f_hi: f64,
    },

    #[error("root solver did not converge within {iterations} iterations")]
    RootNotConverged { iterations: u64 },

    #[error("root solver failed: {0}")]
    Solver(String),

    #[error("integration over [{a}, {b}] did not converge within {evaluations} evaluations")]
    IntegrationDidNotConverge { a: f64, b: f64, evaluations: usize },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Convenience type alias for results using [`GeocurveError`].
pub type Result<T> = std::result::Result<T, GeocurveError>;
