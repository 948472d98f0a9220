//! The LP shared by every range computation of a single FVA run
use log::{debug, info};

use crate::fva::error::FvaError;
use crate::fva::problem::FvaProblem;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::Solver;
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Id of the constraint keeping the objective near its optimum
pub const NEAR_OPTIMALITY_CONSTRAINT: &str = "near_optimality";

/// An open LP for one FVA run
///
/// The session owns the LP built from an [`FvaProblem`] and the solver used for it. Opening the
/// session performs the initial solve and adds the near optimality constraint
/// `c'v >= mu * Z`, after which only the objective changes between solves. The session is
/// dropped (releasing the solver) when the run finishes, on success or on error.
pub struct LpSession<'p, S: Solver> {
    problem: &'p FvaProblem,
    lp: Problem,
    solver: S,
    objective_value: f64,
    lp_count: usize,
    /// Whether the initial solution satisfies the near optimality constraint, so the LP is known
    /// to be feasible
    feasibility_witnessed: bool,
}

/// Result of optimizing a single variable
#[derive(Debug, Clone)]
pub struct RangeSolve {
    /// Optimal value of the variable
    pub value: f64,
    /// Values of every variable at the optimum
    pub values: Vec<f64>,
}

impl<'p, S: Solver> LpSession<'p, S> {
    /// Build the LP, maximize the original objective, and restrict the LP to near optimal solutions
    ///
    /// # Errors
    /// - [`FvaError::InfeasibleProblem`] if the LP is infeasible or unbounded
    /// - [`FvaError::SolverTimeout`] or [`FvaError::SolverFailure`] if the solver gives up
    pub fn open(problem: &'p FvaProblem, mut solver: S) -> Result<Self, FvaError> {
        let mut lp = build_lp(problem)?;
        let solution = solver.solve(&lp)?;
        let objective_value = match solution {
            ProblemSolution {
                objective_value: Some(z),
                variable_values: Some(_),
                status: OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal,
            } => z,
            ProblemSolution {
                status: status @ (OptimizationStatus::Infeasible | OptimizationStatus::Unbounded),
                ..
            } => return Err(FvaError::InfeasibleProblem { status }),
            other => return Err(status_error(other.status)),
        };

        let (indices, coefficients): (Vec<usize>, Vec<f64>) = problem
            .cost()
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != 0.)
            .map(|(i, c)| (i, *c))
            .unzip();
        // With an all zero objective every feasible flux is optimal
        let feasibility_witnessed =
            indices.is_empty() || problem.mu() * objective_value <= objective_value;
        if !indices.is_empty() {
            lp.add_new_inequality_constraint(
                NEAR_OPTIMALITY_CONSTRAINT,
                &indices,
                &coefficients,
                problem.mu() * objective_value,
                f64::INFINITY,
            )?;
        }
        info!(
            "Initial LP solved with {}: Z = {}, requiring objective >= {}",
            solver.name(),
            objective_value,
            problem.mu() * objective_value
        );

        Ok(LpSession {
            problem,
            lp,
            solver,
            objective_value,
            lp_count: 1,
            feasibility_witnessed,
        })
    }

    /// Optimize variable `index` in `direction`, keeping every constraint of the session
    ///
    /// # Errors
    /// - [`FvaError::InfeasibleProblem`] if the near optimal region turned out to be empty
    /// - [`FvaError::SolverFailure`], [`FvaError::SolverTimeout`] or [`FvaError::Backend`]
    ///   if this LP could not be solved, including an infeasible status while the initial
    ///   solution is known to satisfy every constraint
    pub fn range_of(
        &mut self,
        index: usize,
        direction: ObjectiveSense,
    ) -> Result<RangeSolve, FvaError> {
        self.lp.set_linear_objective(&[(index, 1.)], direction)?;
        self.lp_count += 1;
        let solution = self.solver.solve(&self.lp)?;
        match solution {
            ProblemSolution {
                objective_value: Some(value),
                variable_values: Some(values),
                status: OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal,
            } => {
                debug!(
                    "{:?} {} = {}",
                    direction,
                    self.problem.variable_ids()[index],
                    value
                );
                Ok(RangeSolve { value, values })
            }
            // Only empty when the initial optimum violates the cutoff (Z < 0 with mu < 1)
            ProblemSolution {
                status: OptimizationStatus::Infeasible,
                ..
            } if !self.feasibility_witnessed => Err(FvaError::InfeasibleProblem {
                status: OptimizationStatus::Infeasible,
            }),
            other => Err(status_error(other.status)),
        }
    }

    /// The FVA problem this session was opened for
    pub fn problem(&self) -> &'p FvaProblem {
        self.problem
    }

    /// Optimal value of the original objective, Z
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Number of LPs solved (or attempted) so far, including the initial solve
    pub fn lp_count(&self) -> usize {
        self.lp_count
    }

    /// The LP as currently built, including the near optimality constraint
    pub fn lp(&self) -> &Problem {
        &self.lp
    }
}

fn status_error(status: OptimizationStatus) -> FvaError {
    match status {
        OptimizationStatus::TimeLimitReached => FvaError::SolverTimeout,
        status => FvaError::SolverFailure { status },
    }
}

/// Build the LP `max c'v s.t. S v = 0, lower <= v <= upper`
fn build_lp(problem: &FvaProblem) -> Result<Problem, FvaError> {
    let mut lp = Problem::new_maximization();
    for ((id, lower), upper) in problem
        .variable_ids()
        .iter()
        .zip(problem.lower())
        .zip(problem.upper())
    {
        lp.add_new_variable(id, *lower, *upper)?;
    }
    for (row_index, row) in problem.stoichiometry().row_iter().enumerate() {
        if row.nnz() == 0 {
            continue;
        }
        lp.add_new_equality_constraint(
            &format!("mass_balance_{}", row_index),
            row.col_indices(),
            row.values(),
            0.,
        )?;
    }
    let objective: Vec<(usize, f64)> = problem
        .cost()
        .iter()
        .enumerate()
        .filter(|(_, c)| **c != 0.)
        .map(|(i, c)| (i, *c))
        .collect();
    lp.set_linear_objective(&objective, ObjectiveSense::Maximize)?;
    debug!(
        "Built LP with {} variables and {} mass balance constraints",
        lp.num_variables(),
        lp.num_constraints()
    );
    Ok(lp)
}
