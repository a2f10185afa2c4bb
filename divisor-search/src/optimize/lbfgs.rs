use std::cell::Cell;

use nlopt::Algorithm;
use nlopt::Nlopt;
use nlopt::Target;
use serde::Serialize;
use tracing::trace;

use super::minimizer;
use super::minimizer::Bounds;
use super::minimizer::CountedObjective;
use super::minimizer::Minimizer;
use super::minimizer::Minimum;
use super::minimizer::Termination;
use crate::error::OptimizerError;

/// Limited-memory BFGS on a box, backed by NLopt's `LD_LBFGS`.
///
/// Gradients are forward differences, backward at the upper bound, so the
/// objective is only ever evaluated within the box.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Lbfgs {
    /// Stop once one step changes the objective by at most this, relatively.
    pub function_tolerance: f64,

    /// Budget of objective evaluations, not counting those spent on gradients.
    pub max_evaluations: u32,
    pub finite_difference_step: f64,
}

impl Default for Lbfgs {
    fn default() -> Self {
        Self {
            function_tolerance: 2.220446049250313e-9,
            max_evaluations: 15_000,
            finite_difference_step: 1e-8,
        }
    }
}

impl Lbfgs {
    fn gradient(&self, objective: &CountedObjective, x: &[f64], fun: f64, bounds: &[Bounds], out: &mut [f64]) {
        let mut point = x.to_vec();
        for (i, bound) in bounds.iter().enumerate() {
            let h = self.finite_difference_step;
            let step = if x[i] + h <= bound.upper { h } else { -h };
            point[i] = x[i] + step;
            let derivative = (objective.evaluate(&point) - fun) / step;
            point[i] = x[i];
            out[i] = if derivative.is_finite() { derivative } else { 0.0 };
        }
    }
}

impl Minimizer for Lbfgs {
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        x0: &[f64],
        bounds: &[Bounds],
    ) -> Result<Minimum, OptimizerError> {
        let objective = CountedObjective::new(objective);
        let start = minimizer::start(&objective, x0, bounds)?;

        let calls = Cell::new(0);
        let function = |x: &[f64], gradient: Option<&mut [f64]>, _: &mut ()| {
            calls.set(calls.get() + 1);
            let fun = objective.evaluate(x);
            if let Some(gradient) = gradient {
                self.gradient(&objective, x, fun, bounds, gradient);
            }
            fun
        };
        let mut optimizer = Nlopt::new(Algorithm::Lbfgs, x0.len(), function, Target::Minimize, ());

        let lower = bounds.iter().map(|b| b.lower).collect::<Vec<_>>();
        let upper = bounds.iter().map(|b| b.upper).collect::<Vec<_>>();
        let backend_error = |state| OptimizerError::Backend(format!("{state:?}"));
        optimizer.set_lower_bounds(&lower).map_err(backend_error)?;
        optimizer.set_upper_bounds(&upper).map_err(backend_error)?;
        optimizer.set_maxeval(self.max_evaluations).map_err(backend_error)?;
        optimizer.set_ftol_rel(self.function_tolerance).map_err(backend_error)?;

        let mut x = start.0.clone();
        let result = optimizer.optimize(&mut x);

        let budget_exhausted = calls.get() >= self.max_evaluations;
        let (fun, termination) = match result {
            Ok((state, fun)) => {
                trace!(?state, fun, "l-bfgs finished");
                let termination = match budget_exhausted {
                    true => Termination::MaxEvaluationsReached,
                    false => Termination::Converged,
                };
                (fun, termination)
            }
            Err((state, fun)) => {
                trace!(?state, fun, "l-bfgs stopped early");
                let termination = match budget_exhausted {
                    true => Termination::MaxEvaluationsReached,
                    false => Termination::Stalled,
                };
                (fun, termination)
            }
        };

        Ok(minimizer::conclude(&objective, start, (x, fun), bounds, termination))
    }
}
