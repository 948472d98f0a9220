//! Module providing JSON input for FVA problems
//!
//! Reads models in the COBRA JSON format: a list of metabolites and a list of reactions, where
//! each reaction maps metabolite ids to stoichiometric coefficients. Metabolites become rows of
//! the stoichiometric matrix and reactions become flux variables, both in file order.
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, info};
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use serde::Deserialize;
use thiserror::Error;

use crate::configuration::CONFIGURATION;
use crate::fva::error::ValidationError;
use crate::fva::problem::FvaProblem;

// region JSON Model
/// Represents a JSON serialized model, fields not needed for FVA are ignored
#[derive(Deserialize)]
struct JsonModel {
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    id: Option<String>,
}

#[derive(Deserialize)]
struct JsonMetabolite {
    id: String,
}

#[derive(Deserialize)]
struct JsonReaction {
    id: String,
    metabolites: IndexMap<String, f64>,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
    objective_coefficient: Option<f64>,
}
// endregion JSON Model

// region Conversions
/// Read a COBRA JSON model file into an FVA problem
///
/// # Parameters
/// - `path`: Location of the JSON model
/// - `mu`: Fraction of the optimal objective to retain
///
/// Reactions without bounds get the default bounds from the global configuration, and
/// reactions without an objective coefficient get 0.
pub fn read_json<P: AsRef<Path>>(path: P, mu: f64) -> Result<FvaProblem, JsonError> {
    let model_str = match fs::read_to_string(path.as_ref()) {
        Ok(data) => data,
        Err(err) => return Err(JsonError::UnableToRead(format!("{:?}", err))),
    };
    let problem = problem_from_json_str(&model_str, mu)?;
    info!(
        "Read model {} with {} reactions and {} metabolites",
        path.as_ref().display(),
        problem.variable_count(),
        problem.constraint_count()
    );
    Ok(problem)
}

/// Parse a COBRA JSON model held in a string into an FVA problem
pub fn problem_from_json_str(model_str: &str, mu: f64) -> Result<FvaProblem, JsonError> {
    let json_model = match serde_json::from_str::<JsonModel>(model_str) {
        Ok(model) => model,
        Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
    };
    problem_from_json(json_model, mu)
}

fn problem_from_json(json_model: JsonModel, mu: f64) -> Result<FvaProblem, JsonError> {
    let (default_lower, default_upper) = {
        let config = CONFIGURATION.read().unwrap();
        (config.lower_bound, config.upper_bound)
    };

    let mut metabolites: IndexMap<String, usize> = IndexMap::new();
    for met in &json_model.metabolites {
        let row = metabolites.len();
        if metabolites.insert(met.id.clone(), row).is_some() {
            return Err(JsonError::DuplicateMetabolite(met.id.clone()));
        }
    }

    let num_reactions = json_model.reactions.len();
    let mut stoichiometry = CooMatrix::new(metabolites.len(), num_reactions);
    let mut lower = Vec::with_capacity(num_reactions);
    let mut upper = Vec::with_capacity(num_reactions);
    let mut cost = Vec::with_capacity(num_reactions);
    let mut ids = Vec::with_capacity(num_reactions);

    for (column, rxn) in json_model.reactions.into_iter().enumerate() {
        for (met_id, coefficient) in &rxn.metabolites {
            let row = match metabolites.get(met_id) {
                Some(row) => *row,
                None => {
                    return Err(JsonError::UnknownMetabolite {
                        reaction: rxn.id,
                        metabolite: met_id.clone(),
                    })
                }
            };
            stoichiometry.push(row, column, *coefficient);
        }
        lower.push(rxn.lower_bound.unwrap_or(default_lower));
        upper.push(rxn.upper_bound.unwrap_or(default_upper));
        cost.push(rxn.objective_coefficient.unwrap_or_default());
        ids.push(rxn.id);
    }
    debug!(
        "Model {} has {} nonzero stoichiometric coefficients",
        json_model.id.as_deref().unwrap_or("<unnamed>"),
        stoichiometry.nnz()
    );

    Ok(FvaProblem::with_variable_ids(
        CsrMatrix::from(&stoichiometry),
        lower,
        upper,
        cost,
        mu,
        ids,
    )?)
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Metabolite {0} is defined more than once")]
    DuplicateMetabolite(String),
    #[error("Reaction {reaction} uses metabolite {metabolite} which is not in the model")]
    UnknownMetabolite { reaction: String, metabolite: String },
    #[error("Model does not describe a valid FVA problem")]
    InvalidProblem(#[from] ValidationError),
}
// endregion Conversions

#[cfg(test)]
mod json_tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn json_reaction() {
        let data = r#"{
"id":"PFK",
"name":"Phosphofructokinase",
"metabolites":{
"adp_c":1.0,
"atp_c":-1.0,
"f6p_c":-1.0,
"fdp_c":1.0,
"h_c":1.0
},
"lower_bound":0.0,
"upper_bound":1000.0,
"gene_reaction_rule":"b3916 or b1723",
"subsystem":"Glycolysis/Gluconeogenesis"
}"#;
        let rxn: JsonReaction = serde_json::from_str(data).unwrap();
        assert_eq!(rxn.id, "PFK");
        assert_eq!(rxn.metabolites.len(), 5);
        assert!((rxn.metabolites["atp_c"] + 1.).abs() < 1e-25);
        assert!((rxn.upper_bound.unwrap() - 1000.).abs() < 1e-25);
        assert!(rxn.objective_coefficient.is_none());
    }

    #[test]
    fn json_metabolite() {
        let data = r#"{
"id":"glc__D_e",
"name":"D-Glucose",
"compartment":"e",
"charge":0,
"formula":"C6H12O6"
}"#;
        let met: JsonMetabolite = serde_json::from_str(data).unwrap();
        assert_eq!(met.id, "glc__D_e");
    }

    #[test]
    fn problem_from_string() {
        let data = r#"{
"id":"toy",
"metabolites":[{"id":"a"},{"id":"b"}],
"reactions":[
{"id":"EX_a","metabolites":{"a":1.0},"lower_bound":0.0,"upper_bound":10.0},
{"id":"A_to_B","metabolites":{"a":-1.0,"b":1.0},"lower_bound":-5.0,"upper_bound":5.0},
{"id":"EX_b","metabolites":{"b":-1.0},"objective_coefficient":1.0}
]
}"#;
        let problem = problem_from_json_str(data, 0.9).unwrap();
        assert_eq!(problem.variable_count(), 3);
        assert_eq!(problem.constraint_count(), 2);
        assert_eq!(problem.variable_ids(), &["EX_a", "A_to_B", "EX_b"]);
        assert_eq!(problem.cost(), &[0., 0., 1.]);
        // Missing bounds fall back to the configured defaults
        assert!((problem.lower()[2] + 1000.).abs() < 1e-25);
        assert!((problem.upper()[2] - 1000.).abs() < 1e-25);
        assert_eq!(problem.stoichiometry().nnz(), 4);
    }

    #[test]
    fn unknown_metabolite() {
        let data = r#"{
"metabolites":[{"id":"a"}],
"reactions":[{"id":"R1","metabolites":{"a":1.0,"z":-1.0}}]
}"#;
        match problem_from_json_str(data, 0.9) {
            Err(JsonError::UnknownMetabolite {
                reaction,
                metabolite,
            }) => {
                assert_eq!(reaction, "R1");
                assert_eq!(metabolite, "z");
            }
            _ => panic!("Unknown metabolite not caught"),
        }
    }

    #[test]
    fn invalid_mu() {
        let data = r#"{"metabolites":[],"reactions":[{"id":"R1","metabolites":{}}]}"#;
        assert!(matches!(
            problem_from_json_str(data, 2.),
            Err(JsonError::InvalidProblem(ValidationError::InvalidMu(_)))
        ));
    }

    #[test]
    fn unparsable() {
        assert!(matches!(
            problem_from_json_str("{not json", 0.5),
            Err(JsonError::UnableToParse(_))
        ));
    }

    #[test]
    fn read_json() {
        let data_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("test_models")
            .join("branched_network.json");
        let problem = super::read_json(data_path, 0.9).unwrap();
        assert_eq!(problem.variable_ids()[0], "EX_glc");
        assert_eq!(problem.variable_count(), 10);
        assert_eq!(problem.constraint_count(), 5);
        assert!((problem.mu() - 0.9).abs() < 1e-25);

        let missing = super::read_json("does/not/exist.json", 0.9);
        assert!(matches!(missing, Err(JsonError::UnableToRead(_))));
    }
}
