//! Module for reading FVA problems from model files
pub mod json;

pub use json::{problem_from_json_str, read_json, JsonError};
