pub use crate::config::SearchConfig;
pub use crate::error::OptimizerError;
pub use crate::error::PolynomialError;
pub use crate::error::SearchError;
pub use crate::math::monomial::Monomial;
pub use crate::math::monomial_order::MonomialOrder;
pub use crate::math::polynomial::Polynomial;
pub use crate::optimize::Bounds;
pub use crate::optimize::Cobyla;
pub use crate::optimize::DefaultMinimizer;
pub use crate::optimize::Minimizer;
pub use crate::search::CandidateOutcome;
pub use crate::search::Divisor;
pub use crate::search::DivisorSearch;
pub use crate::search::MonomialUniverse;
pub use crate::search::SearchOutcome;
pub use crate::search::reference_target;
