//! Provides the struct describing a Flux Variability Analysis instance
use std::collections::HashSet;

use nalgebra::DMatrix;
use nalgebra_sparse::CsrMatrix;

use crate::fva::error::ValidationError;

/// An FVA problem
///
/// Describes the linear program
///
/// ```text
/// max  c'v
/// s.t. S v = 0
///      lower <= v <= upper
/// ```
///
/// together with `mu`, the fraction of the optimal objective value which must be retained while
/// the range of each flux is explored.
///
/// Problems are only created through the validating constructors, and are never modified
/// afterwards, so a problem can be shared freely between solves.
#[derive(Debug, Clone)]
pub struct FvaProblem {
    /// Stoichiometric matrix (metabolites x reactions)
    stoichiometry: CsrMatrix<f64>,
    /// Lower flux bounds
    lower: Vec<f64>,
    /// Upper flux bounds
    upper: Vec<f64>,
    /// Objective coefficients
    cost: Vec<f64>,
    /// Fraction of the optimum to retain
    mu: f64,
    /// Identifiers of the flux variables
    variable_ids: Vec<String>,
}

impl FvaProblem {
    /// Create a new FVA problem, with variables named `v0`, `v1`, ...
    ///
    /// # Parameters
    /// - `stoichiometry`: Sparse matrix with one column per flux variable
    /// - `lower`: Lower bound of each flux variable
    /// - `upper`: Upper bound of each flux variable
    /// - `cost`: Objective coefficient of each flux variable
    /// - `mu`: Fraction of the optimal objective value to retain, within [0, 1]
    ///
    /// # Errors
    /// A [`ValidationError`] if the dimensions disagree, `mu` is out of range, a lower bound
    /// exceeds its upper bound, or a coefficient is not finite.
    pub fn new(
        stoichiometry: CsrMatrix<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        cost: Vec<f64>,
        mu: f64,
    ) -> Result<Self, ValidationError> {
        let variable_ids = (0..cost.len()).map(|i| format!("v{}", i)).collect();
        Self::with_variable_ids(stoichiometry, lower, upper, cost, mu, variable_ids)
    }

    /// Create a new FVA problem with explicit variable ids
    pub fn with_variable_ids(
        stoichiometry: CsrMatrix<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        cost: Vec<f64>,
        mu: f64,
        variable_ids: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let problem = FvaProblem {
            stoichiometry,
            lower,
            upper,
            cost,
            mu,
            variable_ids,
        };
        problem.validate()?;
        Ok(problem)
    }

    /// Create a new FVA problem from a dense stoichiometric matrix
    ///
    /// # Examples
    /// ```rust
    /// use fasterfva_core::fva::problem::FvaProblem;
    /// use nalgebra::DMatrix;
    /// let s = DMatrix::from_row_slice(1, 3, &[1., -1., 0.]);
    /// let problem = FvaProblem::from_dense(
    ///     &s,
    ///     vec![0.; 3],
    ///     vec![10.; 3],
    ///     vec![1., 0., 0.],
    ///     0.5,
    /// ).unwrap();
    /// assert_eq!(problem.variable_count(), 3);
    /// assert_eq!(problem.stoichiometry().nnz(), 2);
    /// ```
    pub fn from_dense(
        stoichiometry: &DMatrix<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        cost: Vec<f64>,
        mu: f64,
    ) -> Result<Self, ValidationError> {
        Self::new(CsrMatrix::from(stoichiometry), lower, upper, cost, mu)
    }

    // region Accessors
    /// Number of flux variables
    pub fn variable_count(&self) -> usize {
        self.cost.len()
    }

    /// Number of mass balance constraints (rows of the stoichiometric matrix)
    pub fn constraint_count(&self) -> usize {
        self.stoichiometry.nrows()
    }

    pub fn stoichiometry(&self) -> &CsrMatrix<f64> {
        &self.stoichiometry
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn cost(&self) -> &[f64] {
        &self.cost
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn variable_ids(&self) -> &[String] {
        &self.variable_ids
    }
    // endregion Accessors

    // region Validation Functions
    fn validate(&self) -> Result<(), ValidationError> {
        self.validate_dims()?;
        self.validate_param()?;
        self.validate_values()?;
        self.validate_ids()
    }

    /// Check the dimensions of the bounds, cost and stoichiometric matrix agree
    fn validate_dims(&self) -> Result<(), ValidationError> {
        let variables = self.cost.len();
        if self.lower.len() != self.upper.len() {
            return Err(ValidationError::BoundLengthMismatch {
                lower: self.lower.len(),
                upper: self.upper.len(),
            });
        }
        if self.lower.len() != variables {
            return Err(ValidationError::CostLengthMismatch {
                cost: variables,
                variables: self.lower.len(),
            });
        }
        if self.stoichiometry.ncols() != variables {
            return Err(ValidationError::MatrixColumnMismatch {
                columns: self.stoichiometry.ncols(),
                variables,
            });
        }
        if self.variable_ids.len() != variables {
            return Err(ValidationError::VariableIdCountMismatch {
                ids: self.variable_ids.len(),
                variables,
            });
        }
        Ok(())
    }

    fn validate_param(&self) -> Result<(), ValidationError> {
        // NaN fails the range check as well
        if !(0. ..=1.).contains(&self.mu) {
            return Err(ValidationError::InvalidMu(self.mu));
        }
        Ok(())
    }

    fn validate_values(&self) -> Result<(), ValidationError> {
        for (index, (lower, upper)) in self.lower.iter().zip(&self.upper).enumerate() {
            if !(lower <= upper) {
                return Err(ValidationError::InvalidBounds {
                    index,
                    lower: *lower,
                    upper: *upper,
                });
            }
        }
        if let Some(index) = self.cost.iter().position(|c| !c.is_finite()) {
            return Err(ValidationError::NonFiniteCost { index });
        }
        if let Some((row, column, _)) = self
            .stoichiometry
            .triplet_iter()
            .find(|(_, _, value)| !value.is_finite())
        {
            return Err(ValidationError::NonFiniteCoefficient { row, column });
        }
        Ok(())
    }

    fn validate_ids(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(self.variable_ids.len());
        for id in &self.variable_ids {
            if !seen.insert(id.as_str()) {
                return Err(ValidationError::DuplicateVariableId(id.clone()));
            }
        }
        Ok(())
    }
    // endregion Validation Functions
}
