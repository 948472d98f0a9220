//! Module providing representation of optimization problem variables
use std::fmt::{Display, Formatter};

use derive_builder::Builder;

/// A continuous variable of a linear program
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Variable {
    /// Used to identify the variable (must be unique within a [`Problem`](crate::optimize::problem::Problem))
    #[builder(setter(into))]
    pub id: String,
    /// Lowest value the variable can take
    #[builder(default = "f64::NEG_INFINITY")]
    pub lower_bound: f64,
    /// Highest value the variable can take
    #[builder(default = "f64::INFINITY")]
    pub upper_bound: f64,
    /// Position of the variable within the problem, set when the variable is added
    #[builder(default = "0")]
    pub(crate) index: usize,
}

impl Variable {
    /// Position of the variable within its problem
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the variable can only take a single value
    pub fn is_fixed(&self) -> bool {
        self.lower_bound == self.upper_bound
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <= {} <= {}", self.lower_bound, self.id, self.upper_bound)
    }
}
