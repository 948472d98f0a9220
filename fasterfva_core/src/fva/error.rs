//! Errors raised while building or solving an FVA problem
use thiserror::Error;

use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::ProblemError;
use crate::optimize::solvers::SolverError;
use crate::optimize::OptimizationStatus;

/// Problems with the data an [`FvaProblem`](crate::fva::problem::FvaProblem) is built from
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Lower bounds have length {lower} but upper bounds have length {upper}")]
    BoundLengthMismatch { lower: usize, upper: usize },
    #[error("Cost vector has length {cost} but there are {variables} variables")]
    CostLengthMismatch { cost: usize, variables: usize },
    #[error("Stoichiometric matrix has {columns} columns but there are {variables} variables")]
    MatrixColumnMismatch { columns: usize, variables: usize },
    #[error("Got {ids} variable ids for {variables} variables")]
    VariableIdCountMismatch { ids: usize, variables: usize },
    #[error("Variable id {0} is used more than once")]
    DuplicateVariableId(String),
    #[error("mu must be within [0, 1], got {0}")]
    InvalidMu(f64),
    #[error("Variable {index} has lower bound {lower} greater than upper bound {upper}")]
    InvalidBounds { index: usize, lower: f64, upper: f64 },
    #[error("Cost coefficient of variable {index} is not finite")]
    NonFiniteCost { index: usize },
    #[error("Stoichiometric matrix entry ({row}, {column}) is not finite")]
    NonFiniteCoefficient { row: usize, column: usize },
}

/// Errors raised while solving an FVA problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FvaError {
    #[error("Invalid FVA problem: {0}")]
    Validation(#[from] ValidationError),
    /// The initial LP, or the LP restricted to near optimal solutions, has no optimum
    #[error("The FVA problem has no optimal solution (solver status {status:?})")]
    InfeasibleProblem { status: OptimizationStatus },
    #[error("The LP solver stopped with status {status:?}")]
    SolverFailure { status: OptimizationStatus },
    #[error("The LP solver reached its time limit")]
    SolverTimeout,
    #[error("LP backend error: {0}")]
    Backend(#[from] SolverError),
    #[error("Unable to build the LP: {0}")]
    LpConstruction(#[from] ProblemError),
}

/// A range LP which did not produce a bound
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFailure {
    /// Index of the variable whose range was being computed
    pub index: usize,
    /// Maximize for the upper bound, Minimize for the lower bound
    pub direction: ObjectiveSense,
    pub error: FvaError,
}
