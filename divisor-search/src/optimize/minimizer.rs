use std::cell::Cell;

use serde::Serialize;

use crate::error::OptimizerError;

/// Closed interval `[lower, upper]` for one coordinate.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Finite and non-empty.
    pub fn is_valid(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite() && self.lower <= self.upper
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }
}

/// Why a minimization run stopped.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub enum Termination {
    /// One of the backend's tolerances on the objective or the step was met.
    Converged,

    MaxEvaluationsReached,

    /// The backend gave up without meeting a tolerance, for example because
    /// rounding errors prevented further progress.
    Stalled,
}

impl Termination {
    pub fn is_success(self) -> bool {
        self == Self::Converged
    }
}

/// Result of a minimization run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Minimum {
    /// The best point found. Always within bounds.
    pub x: Vec<f64>,

    /// The objective at `x`.
    pub fun: f64,

    pub success: bool,
    pub termination: Termination,

    /// Number of objective evaluations, including those spent on gradients.
    pub evaluations: usize,
}

/// A box-constrained local minimizer.
///
/// Implementations must return a point within `bounds`. Errors are reserved for
/// malformed inputs and for objectives that cannot be evaluated at the initial
/// guess; running out of budget is reported through [`Minimum::success`].
pub trait Minimizer: Send + Sync {
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        x0: &[f64],
        bounds: &[Bounds],
    ) -> Result<Minimum, OptimizerError>;
}

/// The objective as the backends see it: evaluations are counted, and
/// non-finite values become `f64::MAX`.
pub(super) struct CountedObjective<'a> {
    objective: &'a dyn Fn(&[f64]) -> f64,
    evaluations: Cell<usize>,
}

impl<'a> CountedObjective<'a> {
    pub(super) fn new(objective: &'a dyn Fn(&[f64]) -> f64) -> Self {
        Self {
            objective,
            evaluations: Cell::new(0),
        }
    }

    pub(super) fn evaluate(&self, x: &[f64]) -> f64 {
        self.evaluations.set(self.evaluations.get() + 1);
        let fun = (self.objective)(x);
        if fun.is_finite() { fun } else { f64::MAX }
    }

    pub(super) fn evaluations(&self) -> usize {
        self.evaluations.get()
    }
}

/// Check the shape of a minimization problem, then project `x0` onto the box
/// and evaluate the objective there.
pub(super) fn start(
    objective: &CountedObjective,
    x0: &[f64],
    bounds: &[Bounds],
) -> Result<(Vec<f64>, f64), OptimizerError> {
    if x0.len() != bounds.len() {
        return Err(OptimizerError::DimensionMismatch {
            x0: x0.len(),
            bounds: bounds.len(),
        });
    }
    if x0.is_empty() {
        return Err(OptimizerError::EmptyDomain);
    }
    if let Some(index) = bounds.iter().position(|b| !b.is_valid()) {
        return Err(OptimizerError::InvalidBounds { index });
    }

    let x = project(x0, bounds);
    let fun = (objective.objective)(&x);
    objective.evaluations.set(objective.evaluations.get() + 1);
    if !fun.is_finite() {
        return Err(OptimizerError::NonFiniteObjective);
    }

    Ok((x, fun))
}

/// The point a backend ended at, projected onto the box, unless the start was
/// better.
pub(super) fn conclude(
    objective: &CountedObjective,
    (start, start_fun): (Vec<f64>, f64),
    (end, end_fun): (Vec<f64>, f64),
    bounds: &[Bounds],
    termination: Termination,
) -> Minimum {
    let projected = project(&end, bounds);
    let end_fun = match projected == end {
        true => end_fun,
        false => objective.evaluate(&projected),
    };
    let (x, fun) = match end_fun <= start_fun {
        true => (projected, end_fun),
        false => (start, start_fun),
    };

    Minimum {
        x,
        fun,
        success: termination.is_success(),
        termination,
        evaluations: objective.evaluations(),
    }
}

fn project(x: &[f64], bounds: &[Bounds]) -> Vec<f64> {
    x.iter().zip(bounds).map(|(&xi, b)| b.clamp(xi)).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bounds_validity_test() {
        assert!(Bounds::new(1e-6, 10.0).is_valid());
        assert!(Bounds::new(3.0, 3.0).is_valid());
        assert!(!Bounds::new(3.0, 2.0).is_valid());
        assert!(!Bounds::new(0.0, f64::INFINITY).is_valid());
        assert!(!Bounds::new(f64::NAN, 1.0).is_valid());
    }

    #[test]
    fn clamping_stays_within_bounds() {
        let bounds = Bounds::new(1e-6, 10.0);
        assert_eq!(1e-6, bounds.clamp(-4.0));
        assert_eq!(10.0, bounds.clamp(11.0));
        assert_eq!(2.5, bounds.clamp(2.5));
        assert!(bounds.contains(10.0));
        assert!(!bounds.contains(0.0));
    }

    #[test]
    fn only_convergence_counts_as_success() {
        assert!(Termination::Converged.is_success());
        assert!(!Termination::MaxEvaluationsReached.is_success());
        assert!(!Termination::Stalled.is_success());
    }

    #[test]
    fn counted_objective_maps_non_finite_values_to_penalty() {
        let objective = |x: &[f64]| 1.0 / x[0];
        let counted = CountedObjective::new(&objective);
        assert_eq!(f64::MAX, counted.evaluate(&[0.0]));
        assert_eq!(0.5, counted.evaluate(&[2.0]));
        assert_eq!(2, counted.evaluations());
    }

    #[test]
    fn start_projects_initial_guess() {
        let objective = |x: &[f64]| x[0];
        let counted = CountedObjective::new(&objective);
        let bounds = [Bounds::new(1.0, 2.0)];
        assert_eq!(Ok((vec![1.0], 1.0)), start(&counted, &[-5.0], &bounds));
    }

    #[test]
    fn conclusion_never_worse_than_start() {
        let objective = |x: &[f64]| x[0] * x[0];
        let counted = CountedObjective::new(&objective);
        let bounds = [Bounds::new(-1.0, 1.0)];

        let minimum = conclude(
            &counted,
            (vec![0.0], 0.0),
            (vec![0.5], 0.25),
            &bounds,
            Termination::Stalled,
        );
        assert_eq!(vec![0.0], minimum.x);
        assert!(!minimum.success);

        let outside = conclude(
            &counted,
            (vec![1.0], 1.0),
            (vec![-3.0], 9.0),
            &bounds,
            Termination::Converged,
        );
        assert_eq!(vec![-1.0], outside.x);
        assert_eq!(1.0, outside.fun);
        assert!(outside.success);
    }
}
