//! Interfaces to the LP solvers used to optimize a [`Problem`]
use crate::configuration::{Solver as SolverChoice, CONFIGURATION};
use crate::optimize::problem::Problem;
use crate::optimize::ProblemSolution;
use thiserror::Error;

pub mod clarabel;
#[cfg(feature = "minilp")]
pub mod microlp;

/// An LP backend
///
/// A solver reads the whole [`Problem`] on every call to [`Solver::solve`], so changing the
/// objective of the problem and solving again is all that is needed to re-optimize.
pub trait Solver {
    /// Short name of the backend, used in log messages
    fn name(&self) -> &'static str;

    /// Solve the problem
    ///
    /// Infeasible, unbounded, or otherwise unsolved problems are reported through the
    /// status of the returned [`ProblemSolution`]; `Err` is reserved for problems the
    /// backend can't even attempt.
    fn solve(&mut self, problem: &Problem) -> Result<ProblemSolution, SolverError>;
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&mut self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        (**self).solve(problem)
    }
}

/// Create the solver selected in the global configuration
pub fn default_solver() -> Box<dyn Solver> {
    let (choice, time_limit) = {
        let config = CONFIGURATION.read().unwrap();
        (config.solver, config.time_limit)
    };
    match choice {
        SolverChoice::Clarabel => Box::new(clarabel::ClarabelSolver::new(time_limit)),
        SolverChoice::Microlp => {
            cfg_if::cfg_if! {
                if #[cfg(feature = "minilp")] {
                    Box::new(microlp::MicrolpSolver::new())
                } else {
                    log::warn!("microlp requested but the minilp feature is disabled, using clarabel");
                    Box::new(clarabel::ClarabelSolver::new(time_limit))
                }
            }
        }
    }
}

/// Errors raised by a solver backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The backend could not be configured
    #[error("Invalid solver settings: {0}")]
    InvalidSettings(String),
    /// The backend failed in a way not described by an optimization status
    #[error("Solver backend failed: {0}")]
    Backend(String),
}
