//! WebAssembly bindings for `attractor_core`.
//!
//! A browser front end builds one [`WasmExperiment`] per selected system and
//! drives it once per animation frame.

mod experiment;

pub use experiment::WasmExperiment;
