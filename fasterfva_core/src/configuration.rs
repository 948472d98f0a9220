//! Process wide defaults used when building and solving FVA problems
use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

pub struct Configuration {
    /// Lower flux bound used when a model file does not provide one
    pub lower_bound: f64,
    /// Upper flux bound used when a model file does not provide one
    pub upper_bound: f64,
    /// Absolute tolerance used when deciding if a variable sits at one of its bounds
    pub tolerance: f64,
    /// LP backend used by [`crate::fva::solve_exhaustive`] and [`crate::fva::solve_pruned`]
    pub solver: Solver,
    /// Time limit (in seconds) for a single LP solve, None for no limit
    ///
    /// Only honoured by backends which support limiting the solve time
    pub time_limit: Option<f64>,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-07,
            solver: Solver::default(),
            time_limit: None,
        }
    }
}

/// Enum used to specify the default solver to use
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Solver {
    /// Use the Clarabel interior point solver
    Clarabel,
    /// Use the microlp simplex solver, requires the minilp feature to be enabled
    Microlp,
}

impl Default for Solver {
    fn default() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "minilp")] {
                Solver::Microlp
            } else {
                Solver::Clarabel
            }
        }
    }
}
