//! Box-constrained local minimization of black-box objectives.
//!
//! The divisor search only talks to the [`Minimizer`] trait. Two backends
//! implement it: [`Cobyla`], pure Rust and always available, and, with the
//! `nlopt` feature, [`Lbfgs`] on top of the NLopt library. [`DefaultMinimizer`]
//! picks the gradient-based one whenever it is compiled in.

mod cobyla;
#[cfg(feature = "nlopt")]
mod lbfgs;
mod minimizer;

pub use cobyla::Cobyla;
#[cfg(feature = "nlopt")]
pub use lbfgs::Lbfgs;
pub use minimizer::Bounds;
pub use minimizer::Minimizer;
pub use minimizer::Minimum;
pub use minimizer::Termination;

#[cfg(feature = "nlopt")]
pub type DefaultMinimizer = Lbfgs;

#[cfg(not(feature = "nlopt"))]
pub type DefaultMinimizer = Cobyla;
