use thiserror::Error;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum PolynomialError {
    #[error("division is undefined: the divisor's leading coefficient is zero")]
    DivisionUndefined,

    #[error("expected exponent vectors of length {expected}, but got length {found}")]
    ExponentLengthMismatch { expected: usize, found: usize },

    #[error("the variable count of a polynomial without terms cannot be inferred")]
    EmptyPolynomial,

    #[error("expected {expected} coefficients, but got {found}")]
    CoefficientCountMismatch { expected: usize, found: usize },

    #[error("exponent exceeds {max}", max = u8::MAX)]
    ExponentOverflow,

    #[error("expected a point with {expected} coordinates, but got {found}")]
    PointLengthMismatch { expected: usize, found: usize },
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum OptimizerError {
    #[error("initial guess has {x0} coordinates, but {bounds} bounds were given")]
    DimensionMismatch { x0: usize, bounds: usize },

    #[error("cannot minimize over a zero-dimensional domain")]
    EmptyDomain,

    #[error("bounds of coordinate {index} are empty or not finite")]
    InvalidBounds { index: usize },

    #[error("objective is not finite at the initial guess")]
    NonFiniteObjective,

    #[error("minimizer backend rejected the problem: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("subset sizes {min}..={max} describe an empty range or include 0")]
    InvalidSubsetSizes { min: usize, max: usize },

    #[error("coefficient bounds [{lower}, {upper}] are empty or not finite")]
    InvalidCoefficientBounds { lower: f64, upper: f64 },

    #[error("flatness check needs at least one sample")]
    NoFlatnessSamples,

    #[error("threshold `{name}` must be finite and non-negative, but is {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SearchError {
    #[error("invalid target polynomial")]
    InvalidTarget(#[from] PolynomialError),

    #[error("invalid search configuration")]
    InvalidConfig(#[from] ConfigError),

    #[error("target polynomial is zero; every candidate would divide it")]
    ZeroTarget,
}
