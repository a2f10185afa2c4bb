//! Search for exact divisors of a target polynomial among candidate monomial
//! supports.
//!
//! The [`MonomialUniverse`] bounds the monomials a divisor may consist of, the
//! [`DivisorOptimizer`] decides for a single candidate whether some coefficient
//! assignment divides the target, and the [`DivisorSearch`] drives both over all
//! candidates.

pub mod candidates;
pub mod divisor_optimizer;
pub mod driver;
pub mod target;

pub use candidates::Candidate;
pub use candidates::MonomialUniverse;
pub use divisor_optimizer::CandidateOutcome;
pub use divisor_optimizer::Divisor;
pub use divisor_optimizer::DivisorOptimizer;
pub use divisor_optimizer::RejectionReason;
pub use driver::CancellationToken;
pub use driver::DivisorSearch;
pub use driver::SearchOutcome;
pub use driver::SearchReport;
pub use driver::SubsetSizeReport;
pub use target::reference_target;
