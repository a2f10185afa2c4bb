use cobyla::Func;
use cobyla::RhoBeg;
use cobyla::StopTols;
use serde::Serialize;
use tracing::trace;

use super::minimizer;
use super::minimizer::Bounds;
use super::minimizer::CountedObjective;
use super::minimizer::Minimizer;
use super::minimizer::Minimum;
use super::minimizer::Termination;
use crate::error::OptimizerError;

/// Derivative-free minimization by linear approximations of the objective
/// over a shrinking trust region, backed by the [`cobyla`] crate.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Cobyla {
    /// Initial trust region radius.
    pub initial_step: f64,

    /// Stop once one step changes the objective by at most this, relatively.
    pub function_tolerance: f64,

    /// Stop once one step moves every coordinate by at most this, relatively.
    pub step_tolerance: f64,

    pub max_evaluations: usize,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            initial_step: 0.5,
            function_tolerance: 2.220446049250313e-9,
            step_tolerance: 1e-10,
            max_evaluations: 15_000,
        }
    }
}

impl Minimizer for Cobyla {
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        x0: &[f64],
        bounds: &[Bounds],
    ) -> Result<Minimum, OptimizerError> {
        let objective = CountedObjective::new(objective);
        let start = minimizer::start(&objective, x0, bounds)?;

        let function = |x: &[f64], _: &mut ()| objective.evaluate(x);
        let constraints: Vec<&dyn Func<()>> = vec![];
        let box_bounds = bounds.iter().map(|b| (b.lower, b.upper)).collect::<Vec<_>>();
        let stop_tolerances = StopTols {
            ftol_rel: self.function_tolerance,
            xtol_rel: self.step_tolerance,
            xtol_abs: vec![0.0; x0.len()],
            ..StopTols::default()
        };

        let result = cobyla::minimize(
            function,
            &start.0,
            &box_bounds,
            &constraints,
            (),
            self.max_evaluations,
            RhoBeg::All(self.initial_step),
            Some(stop_tolerances),
        );

        let budget_exhausted = objective.evaluations() >= self.max_evaluations;
        let (end, termination) = match result {
            Ok((status, x, fun)) => {
                trace!(?status, fun, "cobyla finished");
                let termination = match budget_exhausted {
                    true => Termination::MaxEvaluationsReached,
                    false => Termination::Converged,
                };
                ((x, fun), termination)
            }
            Err((status, x, fun)) => {
                trace!(?status, fun, "cobyla stopped early");
                let termination = match budget_exhausted {
                    true => Termination::MaxEvaluationsReached,
                    false => Termination::Stalled,
                };
                ((x, fun), termination)
            }
        };

        Ok(minimizer::conclude(&objective, start, end, bounds, termination))
    }
}
