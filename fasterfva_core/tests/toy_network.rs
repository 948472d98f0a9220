#![cfg(feature = "minilp")]
extern crate fasterfva_core;

use fasterfva_core::fva::{
    solve_exhaustive, solve_exhaustive_with, solve_pruned, solve_pruned_with, FvaError,
    FvaProblem, FvaSolution, ValidationError,
};
use fasterfva_core::optimize::OptimizationStatus;
use fasterfva_core::optimize::solvers::clarabel::ClarabelSolver;
use nalgebra::DMatrix;

/// v0 and v1 are balanced by a single metabolite, v2 is unconstrained apart from its bounds
fn toy_problem(mu: f64) -> FvaProblem {
    let s = DMatrix::from_row_slice(1, 3, &[1., -1., 0.]);
    FvaProblem::from_dense(&s, vec![0.; 3], vec![10.; 3], vec![1., 0., 0.], mu).unwrap()
}

fn assert_bounds(solution: &FvaSolution, lower: &[f64], upper: &[f64], tol: f64) {
    for (i, (computed, expected)) in solution.lower_bound().iter().zip(lower).enumerate() {
        assert!(
            (computed - expected).abs() < tol,
            "lower bound of v{} is {}, expected {}",
            i,
            computed,
            expected
        );
    }
    for (i, (computed, expected)) in solution.upper_bound().iter().zip(upper).enumerate() {
        assert!(
            (computed - expected).abs() < tol,
            "upper bound of v{} is {}, expected {}",
            i,
            computed,
            expected
        );
    }
}

#[test]
fn toy_example_exhaustive() {
    let problem = toy_problem(0.5);
    let solution = solve_exhaustive(&problem).unwrap();
    assert!((solution.objective_value() - 10.).abs() < 1e-6);
    assert_bounds(&solution, &[5., 5., 0.], &[10., 10., 10.], 1e-6);
    assert_eq!(solution.lp_count(), 7);
    assert_eq!(solution.lps_saved(), 0);
    assert!(!solution.is_partial());
    assert!(std::ptr::eq(solution.source_problem(), &problem));
}

#[test]
fn toy_example_pruned() {
    let problem = toy_problem(0.5);
    let solution = solve_pruned(&problem).unwrap();
    assert!((solution.objective_value() - 10.).abs() < 1e-6);
    assert_bounds(&solution, &[5., 5., 0.], &[10., 10., 10.], 1e-6);
    assert!(solution.lp_count() >= 1);
    assert!(solution.lp_count() <= 7);
    assert_eq!(solution.lps_saved(), 7 - solution.lp_count());
}

#[test]
fn toy_example_clarabel() {
    let problem = toy_problem(0.5);
    let exhaustive = solve_exhaustive_with(&problem, ClarabelSolver::default()).unwrap();
    let pruned = solve_pruned_with(&problem, ClarabelSolver::default()).unwrap();
    for solution in [&exhaustive, &pruned] {
        assert!((solution.objective_value() - 10.).abs() < 1e-5);
        assert_bounds(solution, &[5., 5., 0.], &[10., 10., 10.], 1e-5);
    }
    assert!(pruned.lp_count() <= exhaustive.lp_count());
}

#[test]
fn mu_zero_is_widest() {
    let problem = toy_problem(0.);
    let exhaustive = solve_exhaustive(&problem).unwrap();
    let pruned = solve_pruned(&problem).unwrap();
    assert_bounds(&exhaustive, &[0., 0., 0.], &[10., 10., 10.], 1e-6);
    assert_bounds(&pruned, &[0., 0., 0.], &[10., 10., 10.], 1e-6);
}

#[test]
fn mu_one_is_tightest() {
    let problem = toy_problem(1.);
    let exhaustive = solve_exhaustive(&problem).unwrap();
    let pruned = solve_pruned(&problem).unwrap();
    assert_bounds(&exhaustive, &[10., 10., 0.], &[10., 10., 10.], 1e-6);
    assert_bounds(&pruned, &[10., 10., 0.], &[10., 10., 10.], 1e-6);
}

#[test]
fn fixed_variable() {
    // v2 is pinned at 3
    let s = DMatrix::from_row_slice(1, 3, &[1., -1., 0.]);
    let problem = FvaProblem::from_dense(
        &s,
        vec![0., 0., 3.],
        vec![10., 10., 3.],
        vec![1., 0., 0.],
        0.5,
    )
    .unwrap();
    for solution in [
        solve_exhaustive(&problem).unwrap(),
        solve_pruned(&problem).unwrap(),
    ] {
        assert!((solution.lower_bound()[2] - 3.).abs() < 1e-9);
        assert!((solution.upper_bound()[2] - 3.).abs() < 1e-9);
    }
}

#[test]
fn reversible_fluxes() {
    // v0 -> m, m -> v1, with v1 reversible; maximize v0
    let s = DMatrix::from_row_slice(1, 3, &[1., -1., -1.]);
    let problem = FvaProblem::from_dense(
        &s,
        vec![-5., -5., -2.],
        vec![5., 5., 2.],
        vec![1., 0., 0.],
        0.8,
    )
    .unwrap();
    // Z = 7 (v1 = 5, v2 = 2); v0 >= 5.6 forces v1 >= 3.6 and v2 >= 0.6
    let expected_lower = [5.6, 3.6, 0.6];
    let expected_upper = [7., 5., 2.];
    for solution in [
        solve_exhaustive(&problem).unwrap(),
        solve_pruned(&problem).unwrap(),
    ] {
        assert!((solution.objective_value() - 7.).abs() < 1e-6);
        assert_bounds(&solution, &expected_lower, &expected_upper, 1e-6);
    }
}

#[test]
fn validation_rejection() {
    let s = DMatrix::from_row_slice(1, 3, &[1., -1., 0.]);
    let res = FvaProblem::from_dense(&s, vec![0.; 3], vec![10.; 3], vec![1., 0.], 0.5);
    assert!(matches!(
        res,
        Err(ValidationError::CostLengthMismatch { .. })
    ));
    let res = FvaProblem::from_dense(&s, vec![0.; 3], vec![10.; 3], vec![1., 0., 0.], 1.5);
    assert_eq!(res.unwrap_err(), ValidationError::InvalidMu(1.5));
}

#[test]
fn negative_optimum_with_relaxed_mu_is_infeasible() {
    // Z = -1 and mu = 0.5 asks for an objective of at least -0.5
    let s = DMatrix::from_row_slice(1, 2, &[1., -1.]);
    let problem =
        FvaProblem::from_dense(&s, vec![1., 1.], vec![5., 5.], vec![-1., 0.], 0.5).unwrap();
    let expected = FvaError::InfeasibleProblem {
        status: OptimizationStatus::Infeasible,
    };
    assert_eq!(solve_exhaustive(&problem).unwrap_err(), expected);
    assert_eq!(solve_pruned(&problem).unwrap_err(), expected);
}
