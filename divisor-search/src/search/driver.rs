use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

use itertools::Itertools;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;
use tracing::instrument;

use super::candidates::Candidate;
use super::candidates::MonomialUniverse;
use super::divisor_optimizer::CandidateOutcome;
use super::divisor_optimizer::Divisor;
use super::divisor_optimizer::DivisorOptimizer;
use super::divisor_optimizer::RejectionReason;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::math::polynomial::Polynomial;
use crate::optimize::Minimizer;
use crate::optimize::DefaultMinimizer;

/// Number of candidates handed to the thread pool at once. Cancellation and
/// progress are observed between batches.
const BATCH_SIZE: usize = 256;

/// Requests a running search to stop. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counts for the candidates of one subset size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubsetSizeReport {
    pub subset_size: usize,
    pub candidates: usize,
    pub accepted: usize,
}

/// Summary of one search run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchReport {
    /// The seed all per-candidate random sources were derived from.
    pub seed: u64,

    pub candidates: usize,
    pub accepted: usize,
    pub flat: usize,
    pub optimizer_failures: usize,
    pub not_converged: usize,
    pub above_threshold: usize,

    pub subset_sizes: Vec<SubsetSizeReport>,
    pub elapsed: Duration,

    /// Whether the run was stopped by its [`CancellationToken`].
    pub cancelled: bool,
}

impl SearchReport {
    fn record(&mut self, outcome: &CandidateOutcome) {
        self.candidates += 1;
        let counter = match outcome {
            CandidateOutcome::Accepted(_) => &mut self.accepted,
            CandidateOutcome::Rejected(RejectionReason::Flat) => &mut self.flat,
            CandidateOutcome::Rejected(RejectionReason::OptimizerFailure(_)) => {
                &mut self.optimizer_failures
            }
            CandidateOutcome::Rejected(RejectionReason::NotConverged) => &mut self.not_converged,
            CandidateOutcome::Rejected(RejectionReason::AboveThreshold) => &mut self.above_threshold,
        };
        *counter += 1;
    }
}

/// The divisors found by a search run, in discovery order, and its report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub divisors: Vec<Divisor>,
    pub report: SearchReport,
}

/// Searches all candidate supports of a target polynomial for exact divisors.
///
/// Subset sizes are processed in increasing order, and the candidates of one
/// size in lexicographic order. Every candidate draws its random numbers from a
/// generator seeded by the run's seed and the candidate's position, so a fixed
/// seed gives the same divisors in the same order, whether the candidates are
/// evaluated sequentially or in parallel.
pub struct DivisorSearch {
    target: Polynomial,
    config: SearchConfig,
    minimizer: Box<dyn Minimizer>,
    cancellation: CancellationToken,
}

impl DivisorSearch {
    /// Fails if `config` is invalid or if `target` is the zero polynomial.
    pub fn new(target: Polynomial, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        if target.is_zero() {
            return Err(SearchError::ZeroTarget);
        }

        Ok(Self {
            target,
            config,
            minimizer: Box::new(DefaultMinimizer::default()),
            cancellation: CancellationToken::default(),
        })
    }

    #[must_use]
    pub fn with_minimizer(mut self, minimizer: impl Minimizer + 'static) -> Self {
        self.minimizer = Box::new(minimizer);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// A handle that stops this search when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn target(&self) -> &Polynomial {
        &self.target
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search the universe bounded by the target's per-variable degrees.
    pub fn run(&self) -> SearchOutcome {
        let universe = MonomialUniverse::for_target(&self.target);
        self.run_on_universe(&universe)
    }

    /// Search the candidates drawn from `universe`.
    #[instrument(skip_all, fields(universe = universe.len()))]
    pub fn run_on_universe(&self, universe: &MonomialUniverse) -> SearchOutcome {
        let start = Instant::now();
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        info!(seed, polynomial = %self.target, parallel = self.config.parallel, "starting divisor search");

        let optimizer = DivisorOptimizer::new(&self.target, self.minimizer.as_ref(), &self.config);
        let mut report = SearchReport {
            seed,
            ..Default::default()
        };
        let mut divisors = vec![];

        for subset_size in self.config.subset_sizes.clone() {
            if self.cancellation.is_cancelled() {
                report.cancelled = true;
                break;
            }

            info!(
                subset_size,
                candidates = universe.candidate_count(subset_size),
                "processing subsets of size {subset_size}"
            );
            let mut size_report = SubsetSizeReport {
                subset_size,
                ..Default::default()
            };

            for batch in &universe.candidates(subset_size).chunks(BATCH_SIZE) {
                let batch = batch.collect_vec();
                let evaluate = |candidate: &Candidate| self.evaluate(&optimizer, candidate, seed);
                let outcomes: Vec<_> = match self.config.parallel {
                    true => batch.par_iter().map(evaluate).collect(),
                    false => batch.iter().map(evaluate).collect(),
                };

                for outcome in outcomes {
                    let Some(outcome) = outcome else {
                        report.cancelled = true;
                        continue;
                    };
                    report.record(&outcome);
                    size_report.candidates += 1;
                    if let CandidateOutcome::Accepted(divisor) = outcome {
                        info!(divisor = %divisor.polynomial, "found divisor");
                        size_report.accepted += 1;
                        divisors.push(divisor);
                    }
                }

                if report.cancelled {
                    break;
                }
            }

            report.subset_sizes.push(size_report);
            if report.cancelled {
                break;
            }
        }

        report.elapsed = start.elapsed();
        info!(
            divisors = divisors.len(),
            candidates = report.candidates,
            elapsed = ?report.elapsed,
            cancelled = report.cancelled,
            "divisor search finished"
        );

        SearchOutcome { divisors, report }
    }

    /// `None` if the search was cancelled before `candidate` was started.
    fn evaluate(
        &self,
        optimizer: &DivisorOptimizer,
        candidate: &Candidate,
        seed: u64,
    ) -> Option<CandidateOutcome> {
        if self.cancellation.is_cancelled() {
            return None;
        }

        let mut rng = candidate_rng(seed, candidate);
        Some(optimizer.optimize(candidate, &mut rng))
    }
}

/// The random source of one candidate, derived from the run's seed and the
/// candidate's position among all candidates.
fn candidate_rng(seed: u64, candidate: &Candidate) -> StdRng {
    let size = (candidate.subset_size as u64).wrapping_mul(0xD1B5_4A32_D192_ED03);
    let index = (candidate.index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(seed ^ size ^ index)
}
