//! Named experiment factories.
//!
//! The registry is an ordinary value built once by the driver and passed
//! around; nothing here is global. Each entry is a closure producing a fully
//! wired [`Experiment`], so a driver can list the names in a menu and build the
//! chosen system on demand.

use crate::experiment::Experiment;
use crate::integrator::share_integrator;
use crate::model::{share_model, SharedModel};
use crate::models::{Bouali, Hyperchaos, Lorenz, Owl, Rossler};
use crate::settings::RuntimeSettings;
use crate::solvers::{Euler, RungeKutta4};
use crate::transformer::{share_transformer, LeadingAxesTransformer, ProjectionTransformer};
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::collections::BTreeMap;

pub type ExperimentFactory = Box<dyn Fn() -> Result<Experiment>>;

#[derive(Default)]
pub struct ExperimentRegistry {
    factories: BTreeMap<String, ExperimentFactory>,
}

impl ExperimentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every system shipped with this crate.
    pub fn with_builtin_systems() -> Self {
        let mut registry = Self::new();
        registry.register("Lorenz", || {
            let model = share_model(Lorenz::with_defaults()?);
            wire_experiment("Lorenz", model, 0.01, None)
        });
        registry.register("Rossler", || {
            let model = share_model(Rossler::with_defaults()?);
            wire_experiment("Rossler", model, 0.1, None)
        });
        registry.register("Hyperchaos", || {
            let model = share_model(Hyperchaos::with_defaults()?);
            wire_experiment("Hyperchaos", model, 0.01, Some([0, 2, 3]))
        });
        registry.register("Owl", || {
            let model = share_model(Owl::with_defaults()?);
            wire_experiment("Owl", model, 0.01, None)
        });
        registry.register("Bouali", || {
            let model = share_model(Bouali::with_defaults()?);
            wire_experiment("Bouali", model, 0.01, None)
        });
        registry
    }

    /// Adds or replaces the factory for `name`.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Result<Experiment> + 'static,
    {
        if self
            .factories
            .insert(name.to_string(), Box::new(factory))
            .is_some()
        {
            debug!("factory '{name}' replaced");
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Builds the system registered as `name` and applies `settings` to it.
    pub fn create(&self, name: &str, settings: &RuntimeSettings) -> Result<Experiment> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| anyhow!("Unknown system '{name}'."))?;
        let mut experiment =
            factory().with_context(|| format!("Failed to build system '{name}'"))?;

        experiment.set_validation(settings.validation);
        experiment.set_staleness(settings.staleness);
        info!("system '{name}' ready");
        Ok(experiment)
    }

    /// Like [`ExperimentRegistry::create`], but logs a failure and builds
    /// `settings.default_system` instead.
    pub fn create_or_fallback(
        &self,
        name: &str,
        settings: &RuntimeSettings,
    ) -> Result<Experiment> {
        match self.create(name, settings) {
            Ok(experiment) => Ok(experiment),
            Err(err) => {
                warn!("{err:#}; falling back to '{}'", settings.default_system);
                self.create(&settings.default_system, settings)
                    .context("Fallback system is unavailable")
            }
        }
    }
}

/// Registers rk4 and euler integrators plus projection and leading
/// transformers, with rk4 and projection active.
fn wire_experiment(
    name: &str,
    model: SharedModel,
    step_size: f64,
    axes: Option<[i32; 3]>,
) -> Result<Experiment> {
    let mut experiment = Experiment::new(name, model.clone());

    experiment.add_integrator(share_integrator(RungeKutta4::new(&model, step_size)?))?;
    experiment.add_integrator(share_integrator(Euler::new(&model, step_size)?))?;

    let projection = match axes {
        Some([x, y, z]) => ProjectionTransformer::with_axes(&model, x, y, z)?,
        None => ProjectionTransformer::new(&model)?,
    };
    experiment.add_transformer(share_transformer(projection))?;
    experiment.add_transformer(share_transformer(LeadingAxesTransformer::new(&model)))?;

    experiment.set_integrator("rk4")?;
    experiment.set_transformer("projection")?;
    Ok(experiment)
}
