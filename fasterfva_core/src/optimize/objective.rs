//! Provides struct for representing an optimization problem's objective

use crate::optimize::variable::Variable;

/// Represents the linear objective of an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Terms included in the objective (See [`ObjectiveTerm`])
    pub(crate) terms: Vec<ObjectiveTerm>,
    /// Sense of the objective (maximize, or minimize), see [`ObjectiveSense`]
    pub(crate) sense: ObjectiveSense,
}

impl Objective {
    /// Create a new empty objective, with a given sense
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            terms: Vec::new(),
            sense,
        }
    }

    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn terms(&self) -> &[ObjectiveTerm] {
        &self.terms
    }

    /// Add a new term to the objective
    pub fn add_term(&mut self, term: ObjectiveTerm) {
        self.terms.push(term);
    }

    /// Add a new linear term to the objective
    pub fn add_linear_term(&mut self, variable: &Variable, coefficient: f64) {
        self.terms.push(ObjectiveTerm::new(variable, coefficient));
    }

    /// Expand the objective into a dense coefficient vector of length `num_variables`
    ///
    /// Repeated terms for the same variable are summed.
    pub fn dense_coefficients(&self, num_variables: usize) -> Vec<f64> {
        let mut coefficients = vec![0f64; num_variables];
        for term in &self.terms {
            coefficients[term.index] += term.coefficient;
        }
        coefficients
    }

    /// Value of the objective at `values`
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|term| term.coefficient * values[term.index])
            .sum()
    }
}

/// Represents the sense of the objective, whether it should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectiveSense {
    /// The objective should be minimized
    Minimize,
    /// The objective should be maximized
    Maximize,
}

/// A linear term in the objective
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveTerm {
    /// Position of the variable within the problem
    pub index: usize,
    /// Coefficient for the term
    pub coefficient: f64,
}

impl ObjectiveTerm {
    /// Create a new linear objective term
    pub fn new(variable: &Variable, coefficient: f64) -> Self {
        ObjectiveTerm {
            index: variable.index,
            coefficient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::variable::VariableBuilder;

    #[test]
    fn dense_and_evaluate() {
        let x = VariableBuilder::default().id("x").index(0).build().unwrap();
        let y = VariableBuilder::default().id("y").index(2).build().unwrap();
        let mut objective = Objective::new(ObjectiveSense::Maximize);
        objective.add_linear_term(&x, 2.);
        objective.add_linear_term(&y, 0.5);
        objective.add_term(ObjectiveTerm::new(&x, 1.));
        assert_eq!(objective.terms().len(), 3);
        // Repeated terms for x are summed
        assert_eq!(objective.dense_coefficients(3), vec![3., 0., 0.5]);
        assert!((objective.evaluate(&[1., 5., 4.]) - 5.).abs() < 1e-12);
        assert_eq!(objective.sense(), ObjectiveSense::Maximize);
    }
}
