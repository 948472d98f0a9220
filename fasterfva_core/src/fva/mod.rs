//! Flux Variability Analysis
//!
//! For every flux variable of an [`FvaProblem`], find the smallest and largest value it can take
//! while the objective stays within a fraction `mu` of its optimum. Two algorithms are provided:
//!
//! - [`solve_exhaustive`]: maximize and minimize every variable, `1 + 2n` LPs
//! - [`solve_pruned`]: skip LPs whose answer was already witnessed in an earlier solution, same
//!   bounds with fewer LPs
//!
//! # Examples
//! ```rust
//! use fasterfva_core::fva::{solve_exhaustive, solve_pruned, problem::FvaProblem};
//! use nalgebra::DMatrix;
//!
//! // v0 and v1 are balanced, v2 is free within its bounds
//! let s = DMatrix::from_row_slice(1, 3, &[1., -1., 0.]);
//! let problem = FvaProblem::from_dense(
//!     &s,
//!     vec![0., 0., 0.],
//!     vec![10., 10., 10.],
//!     vec![1., 0., 0.],
//!     0.5,
//! ).unwrap();
//!
//! let pruned = solve_pruned(&problem).unwrap();
//! let exhaustive = solve_exhaustive(&problem).unwrap();
//! assert!((pruned.objective_value() - 10.).abs() < 1e-6);
//! assert!((pruned.lower_bound()[0] - 5.).abs() < 1e-6);
//! assert!(pruned.lp_count() <= exhaustive.lp_count());
//! ```

pub mod error;
pub mod exhaustive;
pub mod problem;
pub mod pruned;
pub mod session;
pub mod solution;

pub use error::{FvaError, RangeFailure, ValidationError};
pub use exhaustive::solve_exhaustive_with;
pub use problem::FvaProblem;
pub use pruned::solve_pruned_with;
pub use solution::FvaSolution;

use crate::optimize::solvers::default_solver;

/// Solve the FVA problem with the standard algorithm, using the configured solver
pub fn solve_exhaustive(problem: &FvaProblem) -> Result<FvaSolution<'_>, FvaError> {
    solve_exhaustive_with(problem, default_solver())
}

/// Solve the FVA problem with the pruning algorithm, using the configured solver
pub fn solve_pruned(problem: &FvaProblem) -> Result<FvaSolution<'_>, FvaError> {
    solve_pruned_with(problem, default_solver())
}
