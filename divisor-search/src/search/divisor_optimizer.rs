use rand::Rng;
use serde::Serialize;
use tracing::debug;
use tracing::instrument;
use tracing::trace;

use super::candidates::Candidate;
use crate::config::SearchConfig;
use crate::error::OptimizerError;
use crate::math::polynomial::Polynomial;
use crate::optimize::Bounds;
use crate::optimize::Minimizer;

/// A candidate with coefficients for which it divides the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Divisor {
    pub polynomial: Polynomial,

    /// The objective value the divisor was accepted at.
    pub remainder_norm: f64,

    pub subset_size: usize,
    pub candidate_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Accepted(Divisor),
    Rejected(RejectionReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// The objective barely changes across random coefficient vectors.
    Flat,

    OptimizerFailure(OptimizerError),

    /// The minimizer gave up before converging, above the acceptance threshold.
    NotConverged,

    /// The minimizer converged, but not to a zero remainder.
    AboveThreshold,
}

impl CandidateOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Decides, for single candidates, whether some coefficient assignment within
/// the configured bounds makes them divide the target.
#[derive(Clone, Copy)]
pub struct DivisorOptimizer<'a> {
    target: &'a Polynomial,
    minimizer: &'a dyn Minimizer,
    config: &'a SearchConfig,
}

impl<'a> DivisorOptimizer<'a> {
    pub fn new(target: &'a Polynomial, minimizer: &'a dyn Minimizer, config: &'a SearchConfig) -> Self {
        Self {
            target,
            minimizer,
            config,
        }
    }

    /// The remainder norm of dividing the target by `candidate` with its
    /// coefficients replaced by `coefficients`, position by position.
    ///
    /// Undefined divisions, mismatched coefficient counts, and non-finite norms
    /// all map to the penalty `f64::MAX`.
    pub fn objective(&self, candidate: &Polynomial, coefficients: &[f64]) -> f64 {
        let mut divisor = candidate.clone();
        if divisor.set_coefficients(coefficients).is_err() {
            return f64::MAX;
        }

        let Ok((_, remainder)) = self.target.divide_with_order(&divisor, self.config.monomial_order)
        else {
            return f64::MAX;
        };

        let norm = remainder_norm(&remainder);
        if norm.is_finite() { norm } else { f64::MAX }
    }

    /// Whether the objective of `candidate` is numerically constant over
    /// uniformly sampled coefficient vectors.
    pub fn is_flat<R: Rng>(&self, candidate: &Polynomial, rng: &mut R) -> bool {
        let bounds = vec![self.config.coefficient_bounds; candidate.num_terms()];
        let samples = (0..self.config.flatness_samples)
            .map(|_| self.objective(candidate, &uniform_vector(rng, &bounds)))
            .collect::<Vec<_>>();

        population_variance(&samples) < self.config.flatness_variance_threshold
    }

    /// Run the flatness check and, if the candidate survives it, one bounded
    /// minimization of the objective.
    #[instrument(level = "debug", skip_all, fields(size = candidate.subset_size, index = candidate.index))]
    pub fn optimize<R: Rng>(&self, candidate: &Candidate, rng: &mut R) -> CandidateOutcome {
        let polynomial = &candidate.polynomial;
        if self.is_flat(polynomial, rng) {
            trace!(%polynomial, "objective is flat");
            return CandidateOutcome::Rejected(RejectionReason::Flat);
        }

        let num_coefficients = polynomial.num_terms();
        let bounds = vec![self.config.coefficient_bounds; num_coefficients];
        let x0 = vec![self.config.initial_guess_scale * rng.random::<f64>(); num_coefficients];
        let objective = |x: &[f64]| self.objective(polynomial, x);

        let minimum = match self.minimizer.minimize(&objective, &x0, &bounds) {
            Ok(minimum) => minimum,
            Err(err) => {
                debug!(%polynomial, %err, "minimizer failed");
                return CandidateOutcome::Rejected(RejectionReason::OptimizerFailure(err));
            }
        };

        if minimum.fun > self.config.acceptance_threshold {
            debug!(
                %polynomial,
                fun = minimum.fun,
                termination = ?minimum.termination,
                "candidate rejected"
            );
            let reason = match minimum.success {
                true => RejectionReason::AboveThreshold,
                false => RejectionReason::NotConverged,
            };
            return CandidateOutcome::Rejected(reason);
        }

        let mut divisor = polynomial.clone();
        if divisor.set_coefficients(&minimum.x).is_err() {
            let err = OptimizerError::DimensionMismatch {
                x0: minimum.x.len(),
                bounds: num_coefficients,
            };
            return CandidateOutcome::Rejected(RejectionReason::OptimizerFailure(err));
        }

        debug!(%divisor, fun = minimum.fun, "found divisor");
        CandidateOutcome::Accepted(Divisor {
            polynomial: divisor,
            remainder_norm: minimum.fun,
            subset_size: candidate.subset_size,
            candidate_index: candidate.index,
        })
    }
}

/// The Euclidean norm of the vector of *squared* remainder coefficients,
/// `sqrt(Σ c^4)`. The acceptance threshold is calibrated against this measure.
pub fn remainder_norm(remainder: &Polynomial) -> f64 {
    remainder
        .terms()
        .iter()
        .map(|term| term.coefficient.powi(4))
        .sum::<f64>()
        .sqrt()
}

/// Population variance by Welford's online algorithm. Unlike the two-pass
/// formula, it does not overflow for samples that all equal `f64::MAX`.
///
/// The variance of no samples is 0.
pub fn population_variance(samples: &[f64]) -> f64 {
    let mut mean = 0.0;
    let mut sum_of_squared_deviations = 0.0;
    for (i, &sample) in samples.iter().enumerate() {
        let delta = sample - mean;
        mean += delta / (i + 1) as f64;
        sum_of_squared_deviations += delta * (sample - mean);
    }

    match samples.len() {
        0 => 0.0,
        n => sum_of_squared_deviations / n as f64,
    }
}

/// One sample from the uniform distribution on each closed interval.
pub fn uniform_vector<R: Rng>(rng: &mut R, bounds: &[Bounds]) -> Vec<f64> {
    bounds
        .iter()
        .map(|b| rng.random_range(b.lower..=b.upper))
        .collect()
}
