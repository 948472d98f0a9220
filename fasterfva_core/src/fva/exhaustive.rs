//! The standard FVA algorithm, two LPs for every flux variable
use log::{info, warn};

use crate::fva::error::{FvaError, RangeFailure};
use crate::fva::problem::FvaProblem;
use crate::fva::session::LpSession;
use crate::fva::solution::FvaSolution;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::solvers::Solver;

/// Solve the FVA problem by maximizing and then minimizing every variable in index order
///
/// Always solves `1 + 2n` LPs. A range LP which fails leaves its bound as `NaN` and is recorded
/// in [`FvaSolution::failures`], the remaining LPs are still solved.
pub fn solve_exhaustive_with<S: Solver>(
    problem: &FvaProblem,
    solver: S,
) -> Result<FvaSolution<'_>, FvaError> {
    let mut session = LpSession::open(problem, solver)?;
    let num_variables = problem.variable_count();

    let mut lower_bound = vec![f64::NAN; num_variables];
    let mut upper_bound = vec![f64::NAN; num_variables];
    let mut failures = Vec::new();

    for index in 0..num_variables {
        for direction in [ObjectiveSense::Maximize, ObjectiveSense::Minimize] {
            let bound = match direction {
                ObjectiveSense::Maximize => &mut upper_bound[index],
                ObjectiveSense::Minimize => &mut lower_bound[index],
            };
            match session.range_of(index, direction) {
                Ok(range) => *bound = range.value,
                Err(err @ FvaError::InfeasibleProblem { .. }) => return Err(err),
                Err(error) => {
                    warn!(
                        "Unable to {:?} {}: {}",
                        direction,
                        problem.variable_ids()[index],
                        error
                    );
                    failures.push(RangeFailure {
                        index,
                        direction,
                        error,
                    });
                }
            }
        }
    }

    info!(
        "Exhaustive FVA of {} variables finished with {} LPs",
        num_variables,
        session.lp_count()
    );
    Ok(FvaSolution::new(
        problem,
        lower_bound,
        upper_bound,
        session.objective_value(),
        session.lp_count(),
        failures,
    ))
}
