pub mod coordinate;
pub mod error;
pub mod experiment;
pub mod integrator;
pub mod model;
pub mod models;
pub mod parameter;
pub mod registry;
pub mod settings;
pub mod solvers;
pub mod transformer;
/// The `attractor_core` crate holds the engine behind the attractor explorer.
///
/// Key components:
/// - **Models**: `DynamicalModel` vector fields with named, bounded parameters and coordinate
///   metadata.
/// - **Integrators**: `RungeKutta4` (with unrolled fast paths for small dimensions) and `Euler`.
/// - **Transformers**: maps from model state to a 3D display space, e.g. `ProjectionTransformer`.
/// - **Experiments**: a model plus its named integrators and transformers, built by an
///   `ExperimentRegistry`.
pub mod traits;
pub mod vector;

pub use error::{DynamicsError, DynamicsResult};
pub use experiment::Experiment;
pub use registry::ExperimentRegistry;
pub use settings::RuntimeSettings;
pub use vector::Vector;
