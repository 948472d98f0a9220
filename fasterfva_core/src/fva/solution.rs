//! Provides the result of a Flux Variability Analysis
use std::fmt::{Display, Formatter};

use crate::fva::error::RangeFailure;
use crate::fva::problem::FvaProblem;

/// The solution to an [`FvaProblem`]
///
/// Contains the range of every flux, the optimal objective value, the number of LPs needed to
/// compute it, and a reference to the problem it was computed from.
#[derive(Debug, Clone)]
pub struct FvaSolution<'p> {
    lower_bound: Vec<f64>,
    upper_bound: Vec<f64>,
    objective_value: f64,
    lp_count: usize,
    failures: Vec<RangeFailure>,
    problem: &'p FvaProblem,
}

impl<'p> FvaSolution<'p> {
    pub(crate) fn new(
        problem: &'p FvaProblem,
        lower_bound: Vec<f64>,
        upper_bound: Vec<f64>,
        objective_value: f64,
        lp_count: usize,
        failures: Vec<RangeFailure>,
    ) -> Self {
        FvaSolution {
            lower_bound,
            upper_bound,
            objective_value,
            lp_count,
            failures,
            problem,
        }
    }

    /// Minimum of each flux over the near optimal solutions
    ///
    /// Entries whose LP failed are `NaN`, see [`FvaSolution::failures`].
    pub fn lower_bound(&self) -> &[f64] {
        &self.lower_bound
    }

    /// Maximum of each flux over the near optimal solutions
    ///
    /// Entries whose LP failed are `NaN`, see [`FvaSolution::failures`].
    pub fn upper_bound(&self) -> &[f64] {
        &self.upper_bound
    }

    /// Optimal value of the original objective, Z
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Number of LPs solved, including the initial solve
    pub fn lp_count(&self) -> usize {
        self.lp_count
    }

    pub fn source_problem(&self) -> &'p FvaProblem {
        self.problem
    }

    /// Range LPs which did not produce a bound
    pub fn failures(&self) -> &[RangeFailure] {
        &self.failures
    }

    /// Whether some bounds could not be computed
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Number of LPs saved relative to solving two LPs per variable
    pub fn lps_saved(&self) -> usize {
        (1 + 2 * self.problem.variable_count()).saturating_sub(self.lp_count)
    }

    /// Iterate over `(variable id, lower bound, upper bound)`
    pub fn ranges(&self) -> impl Iterator<Item = (&str, f64, f64)> + '_ {
        self.problem
            .variable_ids()
            .iter()
            .zip(&self.lower_bound)
            .zip(&self.upper_bound)
            .map(|((id, lower), upper)| (id.as_str(), *lower, *upper))
    }
}

impl Display for FvaSolution<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let width = self
            .problem
            .variable_ids()
            .iter()
            .map(|id| id.len())
            .max()
            .unwrap_or(0)
            .max(8);
        writeln!(
            f,
            "Objective value: {} ({} LPs solved)",
            self.objective_value, self.lp_count
        )?;
        writeln!(f, "{:<width$} {:>14} {:>14}", "variable", "minimum", "maximum")?;
        for (id, lower, upper) in self.ranges() {
            writeln!(f, "{:<width$} {:>14.6} {:>14.6}", id, lower, upper)?;
        }
        if self.is_partial() {
            writeln!(f, "{} range LPs failed", self.failures.len())?;
        }
        Ok(())
    }
}
