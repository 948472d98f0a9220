//! Core rust implementation of FasterFVA, Flux Variability Analysis which needs fewer LP solves.

pub mod configuration;
pub mod fva;
pub mod io;
pub mod optimize;
