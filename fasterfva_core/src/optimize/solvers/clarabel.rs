//! Implements a solver interface for Clarabel
//!
//! Clarabel solves conic programs of the form
//! `min 1/2 x'Px + q'x  s.t.  Ax + s = b, s in K`.
//! A linear program is expressed with `P = 0`, a zero cone holding the equality rows, and a
//! nonnegative cone holding every `a'x <= b` row (variable bounds included).
use ::clarabel::algebra::CscMatrix;
use ::clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use nalgebra_sparse::{CooMatrix, CscMatrix as SparseCscMatrix};

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Interior point backend
///
/// Optimal solutions lie in the relative interior of the optimal face rather than on a
/// vertex, so variables are only reported at a bound when every optimal solution has them
/// there.
#[derive(Clone, Debug, Default)]
pub struct ClarabelSolver {
    /// Time limit in seconds for a single solve
    time_limit: Option<f64>,
}

impl ClarabelSolver {
    pub fn new(time_limit: Option<f64>) -> Self {
        ClarabelSolver { time_limit }
    }
}

/// A row `a'x (= or <=) b` of the conic constraint matrix
struct Row {
    entries: Vec<(usize, f64)>,
    rhs: f64,
}

impl Row {
    fn new(entries: Vec<(usize, f64)>, rhs: f64) -> Self {
        Row { entries, rhs }
    }

    fn negated(&self) -> Self {
        Row {
            entries: self.entries.iter().map(|(i, c)| (*i, -c)).collect(),
            rhs: -self.rhs,
        }
    }
}

/// Split the problem into equality rows and `<=` rows
fn collect_rows(problem: &Problem) -> (Vec<Row>, Vec<Row>) {
    let mut equalities = Vec::new();
    let mut inequalities = Vec::new();

    for constraint in problem.constraints() {
        let entries: Vec<(usize, f64)> = constraint
            .get_terms()
            .iter()
            .map(|term| (term.index, term.coefficient))
            .collect();
        match constraint {
            Constraint::Equality { equals, .. } => equalities.push(Row::new(entries, *equals)),
            Constraint::Inequality {
                lower_bound,
                upper_bound,
                ..
            } => {
                if lower_bound == upper_bound {
                    equalities.push(Row::new(entries, *lower_bound));
                    continue;
                }
                let row = Row::new(entries, *upper_bound);
                if lower_bound.is_finite() {
                    inequalities.push(Row::new(row.entries.clone(), *lower_bound).negated());
                }
                if upper_bound.is_finite() {
                    inequalities.push(row);
                }
            }
        }
    }

    for var in problem.variables() {
        let index = var.index();
        if var.is_fixed() {
            equalities.push(Row::new(vec![(index, 1.)], var.lower_bound));
            continue;
        }
        if var.upper_bound.is_finite() {
            inequalities.push(Row::new(vec![(index, 1.)], var.upper_bound));
        }
        if var.lower_bound.is_finite() {
            inequalities.push(Row::new(vec![(index, -1.)], -var.lower_bound));
        }
    }

    (equalities, inequalities)
}

fn map_status(status: &SolverStatus) -> OptimizationStatus {
    match status {
        SolverStatus::Solved => OptimizationStatus::Optimal,
        SolverStatus::AlmostSolved => OptimizationStatus::AlmostOptimal,
        SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
            OptimizationStatus::Infeasible
        }
        SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
            OptimizationStatus::Unbounded
        }
        SolverStatus::MaxTime => OptimizationStatus::TimeLimitReached,
        SolverStatus::MaxIterations | SolverStatus::InsufficientProgress => {
            OptimizationStatus::SolverHalted
        }
        SolverStatus::Unsolved => OptimizationStatus::Unoptimized,
        #[allow(unreachable_patterns)]
        _ => OptimizationStatus::NumericalError,
    }
}

impl Solver for ClarabelSolver {
    fn name(&self) -> &'static str {
        "clarabel"
    }

    fn solve(&mut self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        let num_variables = problem.num_variables();
        let (equalities, inequalities) = collect_rows(problem);
        let num_rows = equalities.len() + inequalities.len();

        let mut coo = CooMatrix::new(num_rows, num_variables);
        let mut b = Vec::with_capacity(num_rows);
        for (row_index, row) in equalities.iter().chain(inequalities.iter()).enumerate() {
            for (col_index, coefficient) in &row.entries {
                coo.push(row_index, *col_index, *coefficient);
            }
            b.push(row.rhs);
        }
        // Duplicate entries are summed during the conversion
        let csc = SparseCscMatrix::from(&coo);
        let a = CscMatrix::new(
            num_rows,
            num_variables,
            csc.col_offsets().to_vec(),
            csc.row_indices().to_vec(),
            csc.values().to_vec(),
        );
        let p = CscMatrix::<f64>::zeros((num_variables, num_variables));

        // Clarabel always minimizes
        let mut q = problem.objective().dense_coefficients(num_variables);
        if problem.objective().sense() == ObjectiveSense::Maximize {
            q.iter_mut().for_each(|c| *c = -*c);
        }

        let mut cones = Vec::with_capacity(2);
        if !equalities.is_empty() {
            cones.push(SupportedConeT::ZeroConeT(equalities.len()));
        }
        if !inequalities.is_empty() {
            cones.push(SupportedConeT::NonnegativeConeT(inequalities.len()));
        }

        let settings = DefaultSettingsBuilder::default()
            .verbose(false)
            .time_limit(self.time_limit.unwrap_or(f64::INFINITY))
            .build()
            .map_err(|err| SolverError::InvalidSettings(err.to_string()))?;

        let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings);
        solver.solve();

        let status = map_status(&solver.solution.status);
        match status {
            OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal => {
                let values = solver.solution.x.clone();
                let objective_value = problem.objective().evaluate(&values);
                Ok(ProblemSolution {
                    status,
                    objective_value: Some(objective_value),
                    variable_values: Some(values),
                })
            }
            _ => Ok(ProblemSolution::failed(status)),
        }
    }
}
