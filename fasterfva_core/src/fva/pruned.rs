//! FVA which skips LPs whose answer was already seen in another LP's solution
//!
//! After maximizing (or minimizing) one variable, the optimal vertex usually has many other
//! variables sitting exactly at one of their bounds. Such a solution satisfies every constraint
//! of the session, near optimality included, so it proves that bound is reachable. Since a
//! variable can never pass its own bound, that bound is the answer for the matching direction
//! and the LP for it can be skipped.
use log::{debug, info, warn};

use crate::configuration::CONFIGURATION;
use crate::fva::error::{FvaError, RangeFailure};
use crate::fva::problem::FvaProblem;
use crate::fva::session::LpSession;
use crate::fva::solution::FvaSolution;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::solvers::Solver;

/// What is known about one bound of one variable
#[derive(Debug, Clone, Copy, PartialEq)]
enum BoundState {
    /// Still needs its own LP
    Pending,
    /// Computed by its own LP
    Solved(f64),
    /// Seen at the declared bound in another variable's solution
    Witnessed,
    /// Its LP failed
    Failed,
}

/// Work list for one direction
///
/// Indices are popped from a stack in ascending order. Pruned indices stay on the stack and are
/// skipped when popped, so pruning is O(1).
struct WorkList {
    stack: Vec<usize>,
    states: Vec<BoundState>,
}

impl WorkList {
    fn new(num_variables: usize) -> Self {
        WorkList {
            stack: (0..num_variables).rev().collect(),
            states: vec![BoundState::Pending; num_variables],
        }
    }

    /// Next index still pending, if any
    fn next(&mut self) -> Option<usize> {
        while let Some(index) = self.stack.pop() {
            if self.states[index] == BoundState::Pending {
                return Some(index);
            }
        }
        None
    }

    fn record(&mut self, index: usize, state: BoundState) {
        self.states[index] = state;
    }

    /// Mark every pending variable whose value is within `tolerance` of its declared bound
    fn witness(&mut self, values: &[f64], declared: &[f64], tolerance: f64) -> usize {
        let mut pruned = 0;
        for ((state, value), bound) in self.states.iter_mut().zip(values).zip(declared) {
            if *state == BoundState::Pending && (value - bound).abs() <= tolerance {
                *state = BoundState::Witnessed;
                pruned += 1;
            }
        }
        pruned
    }

    fn witnessed(&self) -> usize {
        self.states
            .iter()
            .filter(|state| **state == BoundState::Witnessed)
            .count()
    }

    /// Final bounds, witnessed entries take the declared bound and failed entries are NaN
    fn finish(self, declared: &[f64]) -> Vec<f64> {
        self.states
            .iter()
            .zip(declared)
            .map(|(state, bound)| match state {
                BoundState::Solved(value) => *value,
                BoundState::Witnessed => *bound,
                BoundState::Failed | BoundState::Pending => f64::NAN,
            })
            .collect()
    }
}

/// Solve the FVA problem, skipping LPs whose bound was witnessed in an earlier solution
///
/// Upper bounds are computed first, then lower bounds. Every solution found along the way
/// prunes pending work in both directions. The bounds are the same as those of
/// [`solve_exhaustive_with`](crate::fva::exhaustive::solve_exhaustive_with), only the number
/// of LPs differs, and it is never more than `1 + 2n`.
///
/// A variable is considered at its bound when it is within
/// [`Configuration::tolerance`](crate::configuration::Configuration) of it. Failed range LPs
/// are handled as in the exhaustive algorithm: the bound is `NaN` and the failure is recorded.
pub fn solve_pruned_with<S: Solver>(
    problem: &FvaProblem,
    solver: S,
) -> Result<FvaSolution<'_>, FvaError> {
    let tolerance = CONFIGURATION.read().unwrap().tolerance;
    let mut session = LpSession::open(problem, solver)?;
    let num_variables = problem.variable_count();

    let mut upper = WorkList::new(num_variables);
    let mut lower = WorkList::new(num_variables);
    let mut failures = Vec::new();

    for direction in [ObjectiveSense::Maximize, ObjectiveSense::Minimize] {
        loop {
            let work = match direction {
                ObjectiveSense::Maximize => &mut upper,
                ObjectiveSense::Minimize => &mut lower,
            };
            let Some(index) = work.next() else {
                break;
            };
            match session.range_of(index, direction) {
                Ok(range) => {
                    work.record(index, BoundState::Solved(range.value));
                    let pruned = lower.witness(&range.values, problem.lower(), tolerance)
                        + upper.witness(&range.values, problem.upper(), tolerance);
                    if pruned > 0 {
                        debug!(
                            "Solution for {} pruned {} LPs",
                            problem.variable_ids()[index],
                            pruned
                        );
                    }
                }
                Err(err @ FvaError::InfeasibleProblem { .. }) => return Err(err),
                Err(error) => {
                    warn!(
                        "Unable to {:?} {}: {}",
                        direction,
                        problem.variable_ids()[index],
                        error
                    );
                    work.record(index, BoundState::Failed);
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
        "Pruned FVA of {} variables finished with {} LPs ({} upper and {} lower bounds witnessed)",
        num_variables,
        session.lp_count(),
        upper.witnessed(),
        lower.witnessed()
    );
    Ok(FvaSolution::new(
        problem,
        lower.finish(problem.lower()),
        upper.finish(problem.upper()),
        session.objective_value(),
        session.lp_count(),
        failures,
    ))
}
