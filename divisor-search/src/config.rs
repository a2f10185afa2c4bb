//! Configuration of a divisor search. The default configuration reproduces the
//! reference search: coefficients in `[1e-6, 10]`, subsets of one and two
//! monomials, 100 flatness samples, and an acceptance threshold of `1e-10`.
//!
//! Some configuration options can also be set via environment variables, see
//! [`SearchConfig::with_env_overrides`]. The environment variables take
//! precedence over the options set programmatically.

use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use crate::error::ConfigError;
use crate::math::monomial_order::MonomialOrder;
use crate::optimize::Bounds;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchConfig {
    /// The box every candidate coefficient is searched in.
    pub coefficient_bounds: Bounds,

    /// The numbers of monomials per candidate, processed in increasing order.
    pub subset_sizes: RangeInclusive<usize>,

    /// How many random coefficient vectors the flatness check evaluates.
    pub flatness_samples: usize,

    /// Candidates whose sampled objective has a population variance below this
    /// are abandoned without minimization.
    pub flatness_variance_threshold: f64,

    /// A minimized remainder norm at or below this makes the candidate a divisor.
    pub acceptance_threshold: f64,

    /// Every coordinate of the initial guess is this times one uniform sample
    /// from `[0, 1)`.
    pub initial_guess_scale: f64,

    pub monomial_order: MonomialOrder,

    /// The seed all per-candidate random sources are derived from. If `None`, a
    /// fresh seed is drawn when the search starts.
    pub seed: Option<u64>,

    /// Evaluate the candidates of one subset size on rayon's thread pool.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            coefficient_bounds: Bounds::new(1e-6, 10.0),
            subset_sizes: 1..=2,
            flatness_samples: 100,
            flatness_variance_threshold: 1e-5,
            acceptance_threshold: 1e-10,
            initial_guess_scale: 0.1,
            monomial_order: MonomialOrder::default(),
            seed: None,
            parallel: true,
        }
    }
}

impl SearchConfig {
    pub const SEED_ENV_VAR: &'static str = "DIVISOR_SEARCH_SEED";
    pub const MIN_SUBSET_SIZE_ENV_VAR: &'static str = "DIVISOR_SEARCH_MIN_SUBSET_SIZE";
    pub const MAX_SUBSET_SIZE_ENV_VAR: &'static str = "DIVISOR_SEARCH_MAX_SUBSET_SIZE";
    pub const PARALLEL_ENV_VAR: &'static str = "DIVISOR_SEARCH_PARALLEL";

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_subset_sizes(mut self, subset_sizes: RangeInclusive<usize>) -> Self {
        self.subset_sizes = subset_sizes;
        self
    }

    #[must_use]
    pub fn with_coefficient_bounds(mut self, coefficient_bounds: Bounds) -> Self {
        self.coefficient_bounds = coefficient_bounds;
        self
    }

    #[must_use]
    pub fn with_monomial_order(mut self, monomial_order: MonomialOrder) -> Self {
        self.monomial_order = monomial_order;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Overwrite options with the values of the environment variables
    /// `DIVISOR_SEARCH_SEED`, `DIVISOR_SEARCH_MIN_SUBSET_SIZE`,
    /// `DIVISOR_SEARCH_MAX_SUBSET_SIZE`, and `DIVISOR_SEARCH_PARALLEL`, where set.
    ///
    /// Values that cannot be parsed are ignored with a warning.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Like [`with_env_overrides`](Self::with_env_overrides), but reads the
    /// variables through `lookup`.
    #[must_use]
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(seed) = parse_override(&lookup, Self::SEED_ENV_VAR) {
            self.seed = Some(seed);
        }

        let min_size = parse_override(&lookup, Self::MIN_SUBSET_SIZE_ENV_VAR)
            .unwrap_or(*self.subset_sizes.start());
        let max_size = parse_override(&lookup, Self::MAX_SUBSET_SIZE_ENV_VAR)
            .unwrap_or(*self.subset_sizes.end());
        self.subset_sizes = min_size..=max_size;

        if let Some(Flag(parallel)) = parse_override(&lookup, Self::PARALLEL_ENV_VAR) {
            self.parallel = parallel;
        }

        self
    }

    /// Check that the configuration describes a search that can run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (&min, &max) = (self.subset_sizes.start(), self.subset_sizes.end());
        if min == 0 || min > max {
            return Err(ConfigError::InvalidSubsetSizes { min, max });
        }

        let Bounds { lower, upper } = self.coefficient_bounds;
        if !self.coefficient_bounds.is_valid() {
            return Err(ConfigError::InvalidCoefficientBounds { lower, upper });
        }

        if self.flatness_samples == 0 {
            return Err(ConfigError::NoFlatnessSamples);
        }

        let thresholds = [
            ("flatness_variance_threshold", self.flatness_variance_threshold),
            ("acceptance_threshold", self.acceptance_threshold),
            ("initial_guess_scale", self.initial_guess_scale),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        Ok(())
    }
}

/// A boolean that also accepts `1`/`0`, `yes`/`no`, and `on`/`off`.
struct Flag(bool);

impl FromStr for Flag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Self(true)),
            "0" | "false" | "no" | "off" => Ok(Self(false)),
            _ => Err(()),
        }
    }
}

fn parse_override<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(key, %value, "ignoring unparsable configuration override");
            None
        }
    }
}
