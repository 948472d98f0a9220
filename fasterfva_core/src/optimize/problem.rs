//! Provides struct representing a linear optimization problem
use crate::optimize::constraint::Constraint;
use crate::optimize::objective::{Objective, ObjectiveSense, ObjectiveTerm};
use crate::optimize::variable::{Variable, VariableBuilder};
use indexmap::IndexMap;
use thiserror::Error;

/// A linear program over continuous variables
///
/// Variables and constraints are kept in insertion order, and a variable's index is its
/// position in that order. Solvers (see [`crate::optimize::solvers::Solver`]) read the problem
/// and report values in the same order.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Objective to optimize
    objective: Objective,
    /// Variables of the optimization problem
    variables: IndexMap<String, Variable>,
    /// Constraints of the optimization problem
    constraints: IndexMap<String, Constraint>,
}

impl Problem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self {
            objective: Objective::new(objective_sense),
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }
    // endregion Creation Functions

    // region Accessors
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Iterate over the variables in index order
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// Iterate over the constraints in insertion order
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.values()
    }

    pub fn variable(&self, index: usize) -> Option<&Variable> {
        self.variables.get_index(index).map(|(_, var)| var)
    }

    pub fn constraint(&self, id: &str) -> Option<&Constraint> {
        self.constraints.get(id)
    }
    // endregion Accessors

    // region Update Objective
    /// Replace the whole objective with the linear terms given as `(variable index, coefficient)`
    pub fn set_linear_objective(
        &mut self,
        terms: &[(usize, f64)],
        sense: ObjectiveSense,
    ) -> Result<(), ProblemError> {
        let mut objective = Objective::new(sense);
        for (index, coefficient) in terms {
            let variable = self
                .variable(*index)
                .ok_or(ProblemError::NonExistentVariablesInObjective)?;
            objective.add_linear_term(variable, *coefficient);
        }
        self.objective = objective;
        Ok(())
    }

    /// Add a new linear term to the objective
    pub fn add_objective_term(&mut self, objective_term: ObjectiveTerm) -> Result<(), ProblemError> {
        if objective_term.index >= self.num_variables() {
            return Err(ProblemError::NonExistentVariablesInObjective);
        }
        self.objective.add_term(objective_term);
        Ok(())
    }

    /// Add a new linear term to the objective using the variable id
    pub fn add_new_linear_objective_term_by_id(
        &mut self,
        variable_id: &str,
        coefficient: f64,
    ) -> Result<(), ProblemError> {
        let term = match self.variables.get(variable_id) {
            Some(variable) => ObjectiveTerm::new(variable, coefficient),
            None => return Err(ProblemError::NonExistentVariablesInObjective),
        };
        self.add_objective_term(term)
    }

    // endregion Update Objective

    // region Adding Variables
    /// Add a variable to the optimization problem
    pub fn add_variable(&mut self, mut variable: Variable) -> Result<(), ProblemError> {
        // Validate that the variable can in fact be added to the problem
        self.validate_variable(&variable)?;
        // The index of the variable reflects the current variable count
        variable.index = self.num_variables();
        self.variables.insert(variable.id.clone(), variable);
        Ok(())
    }

    /// Create a new continuous variable and add it to the optimization problem
    pub fn add_new_variable(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let new_var = VariableBuilder::default()
            .id(id)
            .lower_bound(lower_bound)
            .upper_bound(upper_bound)
            .build()
            .map_err(|err| ProblemError::UnableToBuildVariable(err.to_string()))?;
        self.add_variable(new_var)
    }
    // endregion Adding Variables

    // region Adding Constraints
    /// Add a constraint to the problem
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ProblemError> {
        self.validate_constraint(&constraint)?;
        self.constraints
            .insert(constraint.get_id().to_string(), constraint);
        Ok(())
    }

    /// Create a new equality constraint using variable indices, and add it to the model
    pub fn add_new_equality_constraint(
        &mut self,
        id: &str,
        indices: &[usize],
        coefficients: &[f64],
        equals: f64,
    ) -> Result<(), ProblemError> {
        let variables = self.lookup_indices(indices)?;
        let new_cons = Constraint::new_equality(id, &variables, coefficients, equals);
        self.add_constraint(new_cons)
    }

    /// Create a new equality constraint using variable ids rather than indices, and add it to the model
    pub fn add_new_equality_constraint_by_id(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        equals: f64,
    ) -> Result<(), ProblemError> {
        let indices = self.lookup_ids(variables)?;
        self.add_new_equality_constraint(id, &indices, coefficients, equals)
    }

    /// Create a new inequality constraint using variable indices, and add it to the model
    pub fn add_new_inequality_constraint(
        &mut self,
        id: &str,
        indices: &[usize],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let variables = self.lookup_indices(indices)?;
        let new_cons =
            Constraint::new_inequality(id, &variables, coefficients, lower_bound, upper_bound);
        self.add_constraint(new_cons)
    }

    /// Create a new inequality constraint using variable ids rather than indices, and add it to the model
    pub fn add_new_inequality_constraint_by_id(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let indices = self.lookup_ids(variables)?;
        self.add_new_inequality_constraint(id, &indices, coefficients, lower_bound, upper_bound)
    }

    fn lookup_indices(&self, indices: &[usize]) -> Result<Vec<&Variable>, ProblemError> {
        indices
            .iter()
            .map(|index| {
                self.variable(*index)
                    .ok_or(ProblemError::NonExistentVariablesInConstraint)
            })
            .collect()
    }

    fn lookup_ids(&self, ids: &[&str]) -> Result<Vec<usize>, ProblemError> {
        ids.iter()
            .map(|id| {
                self.variables
                    .get_index_of(*id)
                    .ok_or(ProblemError::NonExistentVariablesInConstraint)
            })
            .collect()
    }
    // endregion Adding Constraints

    // region Validation Functions
    /// Check that a variable to be added is valid to add to this problem
    fn validate_variable(&self, variable: &Variable) -> Result<(), ProblemError> {
        // Check if there is already a variable with this id
        if self.variables.contains_key(&variable.id) {
            return Err(ProblemError::VariableIdAlreadyExists);
        };
        // NaN bounds fail this check as well
        if !(variable.lower_bound <= variable.upper_bound) {
            return Err(ProblemError::InvalidVariableBounds);
        }
        Ok(())
    }

    /// Check that a constraint to be added is valid to add to this Problem
    fn validate_constraint(&self, constraint: &Constraint) -> Result<(), ProblemError> {
        if self.constraints.contains_key(constraint.get_id()) {
            return Err(ProblemError::ConstraintAlreadyExists);
        }
        let (lower_bound, upper_bound) = constraint.get_bounds();
        if !(lower_bound <= upper_bound) {
            return Err(ProblemError::InvalidConstraintBounds);
        }
        // Check that the variables in this constraint are in the model
        for term in constraint.get_terms() {
            match self.variables.get_index_of(&term.variable_id) {
                Some(index) if index == term.index => {}
                _ => return Err(ProblemError::NonExistentVariablesInConstraint),
            }
        }
        Ok(())
    }
    // endregion Validation Functions
}

/// Errors associated with the Problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add a variable with the same id as an existing variable")]
    VariableIdAlreadyExists,
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to add a variable with lower_bound>upper_bound")]
    InvalidVariableBounds,
    /// Error when a variable could not be built
    #[error("Unable to build variable: {0}")]
    UnableToBuildVariable(String),
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add a constraint with the same id as an existing constraint")]
    ConstraintAlreadyExists,
    /// Error when trying to add a constraint with invalid bounds
    #[error("Tried to add an inequality constraint with lower_bound > upper_bound")]
    InvalidConstraintBounds,
    /// Error when trying to add a constraint that contains variables not in the model
    #[error("Tried to add a constraint with variables not in the model")]
    NonExistentVariablesInConstraint,
    /// Error when trying to add an objective term which includes variables not in the model
    #[error("Tried adding an objective term with variables not in the model")]
    NonExistentVariablesInObjective,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_problem() {
        let max_problem = Problem::new_maximization();
        assert_eq!(max_problem.objective.sense(), ObjectiveSense::Maximize);

        let min_problem = Problem::new_minimization();
        assert_eq!(min_problem.objective.sense(), ObjectiveSense::Minimize);
    }

    #[test]
    fn add_variables() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.add_new_variable("x", 64., 100.).unwrap();
        problem.add_new_variable("y", -1., 1.).unwrap();

        let var = problem.variable(1).unwrap();
        assert_eq!(var.id, "y");
        assert_eq!(var.index(), 1);
        assert!((var.lower_bound + 1.).abs() < 1e-25);
        assert!((var.upper_bound - 1.).abs() < 1e-25);
        assert_eq!(problem.variable(0).unwrap().id, "x");
        assert_eq!(problem.num_variables(), 2);
    }

    #[test]
    fn add_bad_variable() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);

        let res = problem.add_new_variable("x", 100., 64.);
        assert!(matches!(res, Err(ProblemError::InvalidVariableBounds)));

        let res = problem.add_new_variable("x", f64::NAN, 64.);
        assert!(matches!(res, Err(ProblemError::InvalidVariableBounds)));

        problem.add_new_variable("x", 0., 64.).unwrap();
        let res = problem.add_new_variable("x", 0., 64.);
        assert!(matches!(res, Err(ProblemError::VariableIdAlreadyExists)));
    }

    #[test]
    fn add_constraint() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.add_new_variable("x", 64., 100.).unwrap();
        problem.add_new_variable("y", 64., 100.).unwrap();

        problem
            .add_new_equality_constraint_by_id("balance", &["x", "y"], &[2., 3.], 200.)
            .unwrap();
        match problem.constraint("balance").unwrap() {
            Constraint::Equality { equals, .. } => assert!((equals - 200.).abs() < 1e-25),
            Constraint::Inequality { .. } => panic!("Incorrect constraint type added"),
        }

        problem
            .add_new_inequality_constraint("range", &[1], &[1.], 70., f64::INFINITY)
            .unwrap();
        match problem.constraint("range").unwrap() {
            Constraint::Inequality {
                lower_bound,
                upper_bound,
                terms,
                ..
            } => {
                assert!((lower_bound - 70.).abs() < 1e-25);
                assert!(upper_bound.is_infinite());
                assert_eq!(terms[0].variable_id, "y");
            }
            Constraint::Equality { .. } => panic!("Incorrect constraint type added"),
        }
        assert_eq!(problem.num_constraints(), 2);
    }

    #[test]
    fn add_bad_constraint() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.add_new_variable("x", 64., 100.).unwrap();
        problem.add_new_variable("y", 64., 100.).unwrap();

        let res = problem.add_new_inequality_constraint_by_id(
            "bad_constraint",
            &["x", "y"],
            &[2., 3.],
            200.,
            100.,
        );
        assert!(matches!(res, Err(ProblemError::InvalidConstraintBounds)));

        let res = problem.add_new_equality_constraint("missing", &[0, 5], &[1., 1.], 0.);
        assert!(matches!(
            res,
            Err(ProblemError::NonExistentVariablesInConstraint)
        ));

        problem
            .add_new_equality_constraint("twice", &[0], &[1.], 70.)
            .unwrap();
        let res = problem.add_new_equality_constraint("twice", &[1], &[1.], 70.);
        assert!(matches!(res, Err(ProblemError::ConstraintAlreadyExists)));
    }

    #[test]
    fn replace_objective() {
        let mut problem = Problem::new_maximization();
        problem.add_new_variable("x", 0., 1.).unwrap();
        problem.add_new_variable("y", 0., 1.).unwrap();
        problem.add_new_linear_objective_term_by_id("x", 2.).unwrap();

        problem
            .set_linear_objective(&[(1, 1.)], ObjectiveSense::Minimize)
            .unwrap();
        assert_eq!(problem.objective().sense(), ObjectiveSense::Minimize);
        assert_eq!(problem.objective().dense_coefficients(2), vec![0., 1.]);

        let res = problem.set_linear_objective(&[(4, 1.)], ObjectiveSense::Minimize);
        assert!(matches!(
            res,
            Err(ProblemError::NonExistentVariablesInObjective)
        ));

        problem.set_linear_objective(&[], ObjectiveSense::Maximize).unwrap();
        assert!(problem.objective().terms().is_empty());
    }
}
