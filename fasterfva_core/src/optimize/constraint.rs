//! Provides struct for representing a constraint in an optimization problem
use std::fmt::{Display, Formatter};

use crate::optimize::variable::Variable;

/// Represents a linear constraint in an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Represents an equality constraint, where `terms` = `equals`
    Equality {
        /// Used to identify the constraint
        id: String,
        /// Linear terms which are added together, see [`ConstraintTerm`] for more
        terms: Vec<ConstraintTerm>,
        /// The right hand side of the equality constraint
        equals: f64,
    },
    /// Represents an inequality constraint, where `lower_bound` <= `terms` <= `upper_bound`
    ///
    /// One sided constraints use an infinite bound on the open side
    Inequality {
        /// Used to identify the constraint
        id: String,
        /// Linear terms which are added together, see [`ConstraintTerm`] for more
        terms: Vec<ConstraintTerm>,
        /// The lowest value the sum of the terms can take
        lower_bound: f64,
        /// The highest value the sum of the terms can take
        upper_bound: f64,
    },
}

impl Constraint {
    /// Create a new equality constraint
    ///
    /// # Parameters
    /// - `id`: Identifier of the constraint
    /// - `variables`: A slice of variables
    /// - `coefficients`: A slice of coefficients for the variables
    /// - `equals`: The right hand side of the equality
    ///
    /// # Examples
    /// ```rust
    /// use fasterfva_core::optimize::constraint::Constraint;
    /// use fasterfva_core::optimize::variable::VariableBuilder;
    /// let x = VariableBuilder::default()
    ///     .id("x")
    ///     .lower_bound(0.0)
    ///     .upper_bound(20.)
    ///     .build()
    ///     .unwrap();
    /// let y = VariableBuilder::default()
    ///     .id("y")
    ///     .lower_bound(3.0)
    ///     .upper_bound(7.0)
    ///     .build()
    ///     .unwrap();
    /// // Create a constraint representing 3*x + 2*y = 6
    /// let new_constraint = Constraint::new_equality("balance", &[&x, &y], &[3.0, 2.0], 6.);
    /// assert_eq!(format!("{}", new_constraint), "3*x + 2*y = 6");
    /// ```
    pub fn new_equality(
        id: &str,
        variables: &[&Variable],
        coefficients: &[f64],
        equals: f64,
    ) -> Self {
        Constraint::Equality {
            id: id.to_string(),
            terms: Constraint::zip_into_terms(variables, coefficients),
            equals,
        }
    }

    /// Create a new inequality constraint
    ///
    /// # Parameters
    /// - `id`: Identifier of the constraint
    /// - `variables`: A slice of variables
    /// - `coefficients`: A slice of coefficients for the variables
    /// - `lower_bound`: The lowest value the constraint can take
    /// - `upper_bound`: The highest value the constraint can take
    pub fn new_inequality(
        id: &str,
        variables: &[&Variable],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Self {
        Constraint::Inequality {
            id: id.to_string(),
            terms: Constraint::zip_into_terms(variables, coefficients),
            lower_bound,
            upper_bound,
        }
    }

    pub fn get_id(&self) -> &str {
        match self {
            Constraint::Equality { id, .. } | Constraint::Inequality { id, .. } => id,
        }
    }

    pub fn get_terms(&self) -> &[ConstraintTerm] {
        match self {
            Constraint::Equality { terms, .. } | Constraint::Inequality { terms, .. } => terms,
        }
    }

    /// Lowest and highest value the sum of the terms may take
    pub fn get_bounds(&self) -> (f64, f64) {
        match self {
            Constraint::Equality { equals, .. } => (*equals, *equals),
            Constraint::Inequality {
                lower_bound,
                upper_bound,
                ..
            } => (*lower_bound, *upper_bound),
        }
    }

    /// Take a slice of variable references, and a slice of coefficients and zip
    /// them together into a vec of ConstraintTerms
    fn zip_into_terms(variables: &[&Variable], coefficients: &[f64]) -> Vec<ConstraintTerm> {
        variables
            .iter()
            .zip(coefficients)
            .map(|(var, coef)| ConstraintTerm {
                variable_id: var.id.clone(),
                index: var.index,
                coefficient: *coef,
            })
            .collect()
    }

    /// Create a string representation of the terms in the Constraint
    fn constraint_to_string(&self) -> String {
        match self {
            Constraint::Equality { terms, equals, .. } => {
                format!("{} = {}", Self::terms_to_string(terms), equals)
            }
            Constraint::Inequality {
                terms,
                lower_bound,
                upper_bound,
                ..
            } => {
                format!(
                    "{} <= {} <= {}",
                    lower_bound,
                    Self::terms_to_string(terms),
                    upper_bound
                )
            }
        }
    }

    /// Convert a slice of terms into a String representation
    fn terms_to_string(terms: &[ConstraintTerm]) -> String {
        if terms.is_empty() {
            return "0".to_string();
        }
        terms
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.constraint_to_string())
    }
}

/// Represents a single term in a constraint, specifically
/// represents the multiplication of the variable by the `coefficient`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintTerm {
    /// Id of the variable
    pub variable_id: String,
    /// Position of the variable within the problem
    pub index: usize,
    /// The coefficient for the variable
    pub coefficient: f64,
}

impl Display for ConstraintTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*{}", self.coefficient, self.variable_id)
    }
}
