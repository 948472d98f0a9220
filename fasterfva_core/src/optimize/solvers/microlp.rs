//! Implements a solver interface for microlp, a pure rust simplex solver
use ::microlp::{ComparisonOp, LinearExpr, OptimizationDirection};

use crate::optimize::constraint::{Constraint, ConstraintTerm};
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Simplex backend
///
/// Being a simplex method, optimal solutions are always vertices of the feasible region, so
/// non-basic variables are reported exactly at one of their bounds.
#[derive(Clone, Debug, Default)]
pub struct MicrolpSolver {}

impl MicrolpSolver {
    pub fn new() -> Self {
        MicrolpSolver {}
    }
}

fn linear_expr(vars: &[::microlp::Variable], terms: &[ConstraintTerm]) -> LinearExpr {
    let mut expr = LinearExpr::empty();
    for term in terms {
        expr.add(vars[term.index], term.coefficient);
    }
    expr
}

impl Solver for MicrolpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&mut self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        let num_variables = problem.num_variables();
        if num_variables == 0 {
            return Ok(ProblemSolution {
                status: OptimizationStatus::Optimal,
                objective_value: Some(0.),
                variable_values: Some(Vec::new()),
            });
        }

        let direction = match problem.objective().sense() {
            ObjectiveSense::Maximize => OptimizationDirection::Maximize,
            ObjectiveSense::Minimize => OptimizationDirection::Minimize,
        };
        let mut lp = ::microlp::Problem::new(direction);

        let coefficients = problem.objective().dense_coefficients(num_variables);
        let vars: Vec<::microlp::Variable> = problem
            .variables()
            .zip(&coefficients)
            .map(|(var, coef)| lp.add_var(*coef, (var.lower_bound, var.upper_bound)))
            .collect();

        for constraint in problem.constraints() {
            let terms = constraint.get_terms();
            match constraint {
                Constraint::Equality { equals, .. } => {
                    lp.add_constraint(linear_expr(&vars, terms), ComparisonOp::Eq, *equals);
                }
                Constraint::Inequality {
                    lower_bound,
                    upper_bound,
                    ..
                } => {
                    if lower_bound == upper_bound {
                        lp.add_constraint(linear_expr(&vars, terms), ComparisonOp::Eq, *lower_bound);
                        continue;
                    }
                    if lower_bound.is_finite() {
                        lp.add_constraint(linear_expr(&vars, terms), ComparisonOp::Ge, *lower_bound);
                    }
                    if upper_bound.is_finite() {
                        lp.add_constraint(linear_expr(&vars, terms), ComparisonOp::Le, *upper_bound);
                    }
                }
            }
        }

        match lp.solve() {
            Ok(solution) => {
                let values: Vec<f64> = vars.iter().map(|var| solution[*var]).collect();
                Ok(ProblemSolution {
                    status: OptimizationStatus::Optimal,
                    objective_value: Some(solution.objective()),
                    variable_values: Some(values),
                })
            }
            Err(::microlp::Error::Infeasible) => {
                Ok(ProblemSolution::failed(OptimizationStatus::Infeasible))
            }
            Err(::microlp::Error::Unbounded) => {
                Ok(ProblemSolution::failed(OptimizationStatus::Unbounded))
            }
            #[allow(unreachable_patterns)]
            Err(err) => Err(SolverError::Backend(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_small_lp() {
        // max x + 2y, x + y <= 4, 0 <= x <= 3, 0 <= y <= 3
        let mut problem = Problem::new_maximization();
        problem.add_new_variable("x", 0., 3.).unwrap();
        problem.add_new_variable("y", 0., 3.).unwrap();
        problem
            .add_new_inequality_constraint_by_id("cap", &["x", "y"], &[1., 1.], f64::NEG_INFINITY, 4.)
            .unwrap();
        problem.add_new_linear_objective_term_by_id("x", 1.).unwrap();
        problem.add_new_linear_objective_term_by_id("y", 2.).unwrap();

        let solution = MicrolpSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 7.).abs() < 1e-9);
        let values = solution.variable_values.unwrap();
        assert!((values[0] - 1.).abs() < 1e-9);
        assert!((values[1] - 3.).abs() < 1e-9);
    }

    #[test]
    fn infeasible_lp() {
        let mut problem = Problem::new_minimization();
        problem.add_new_variable("x", 0., 1.).unwrap();
        problem
            .add_new_equality_constraint_by_id("impossible", &["x"], &[1.], 5.)
            .unwrap();
        let solution = MicrolpSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Infeasible);
        assert!(!solution.is_optimal());
    }

    #[test]
    fn unbounded_lp() {
        let mut problem = Problem::new_maximization();
        problem.add_new_variable("x", 0., f64::INFINITY).unwrap();
        problem.add_new_linear_objective_term_by_id("x", 1.).unwrap();
        let solution = MicrolpSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Unbounded);
    }
}
