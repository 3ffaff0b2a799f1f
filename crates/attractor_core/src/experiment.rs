//! A model together with the integrators and transformers bound to it.
//!
//! The experiment owns one registry per component kind. Registries are keyed
//! by the component's own name and hold shared handles, so dropping an
//! experiment releases the model and every registered component exactly once,
//! whichever of them happens to be active.

use crate::error::{ComponentKind, DynamicsError, DynamicsResult};
use crate::integrator::{Integrator, SharedIntegrator};
use crate::model::SharedModel;
use crate::parameter::ValidationMode;
use crate::settings::StalenessPolicy;
use crate::transformer::{SharedTransformer, Transformer};
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;

/// What a registry needs to know about its entries.
trait Component {
    fn component_name(&self) -> &str;
    fn bound_model(&self) -> &SharedModel;
    fn component_version(&self) -> u32;
    fn set_validation(&mut self, mode: ValidationMode);
}

impl Component for dyn Integrator {
    fn component_name(&self) -> &str {
        self.name()
    }

    fn bound_model(&self) -> &SharedModel {
        self.model()
    }

    fn component_version(&self) -> u32 {
        self.version()
    }

    fn set_validation(&mut self, mode: ValidationMode) {
        self.parameters_mut().set_validation(mode);
    }
}

impl Component for dyn Transformer {
    fn component_name(&self) -> &str {
        self.name()
    }

    fn bound_model(&self) -> &SharedModel {
        self.model()
    }

    fn component_version(&self) -> u32 {
        self.version()
    }

    fn set_validation(&mut self, mode: ValidationMode) {
        self.parameters_mut().set_validation(mode);
    }
}

/// Outcome of a registry insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The same handle was already registered under its name.
    Unchanged,
    Added,
    /// A different handle held the name and was released.
    Replaced,
}

struct Registry<C: ?Sized + Component> {
    kind: ComponentKind,
    entries: Vec<(String, Rc<RefCell<C>>)>,
    active: Option<String>,
}

impl<C: ?Sized + Component> Registry<C> {
    fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            active: None,
        }
    }

    /// Registers `component` and applies `mode` to it once it is accepted.
    fn insert(
        &mut self,
        model: &SharedModel,
        component: Rc<RefCell<C>>,
        mode: ValidationMode,
    ) -> DynamicsResult<Insertion> {
        let (name, bound) = {
            let c = component.borrow();
            (c.component_name().to_string(), Rc::ptr_eq(c.bound_model(), model))
        };
        if !bound {
            return Err(DynamicsError::WrongModel {
                kind: self.kind,
                name,
            });
        }

        if let Some((existing, _)) = self
            .entries
            .iter()
            .find(|(_, c)| Rc::ptr_eq(c, &component))
        {
            if *existing == name {
                component.borrow_mut().set_validation(mode);
                return Ok(Insertion::Unchanged);
            }
            return Err(DynamicsError::Exists {
                kind: self.kind,
                existing: existing.clone(),
                requested: name,
            });
        }

        component.borrow_mut().set_validation(mode);
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => {
                entry.1 = component;
                info!("{} '{}' replaced", self.kind, name);
                Ok(Insertion::Replaced)
            }
            None => {
                debug!("{} '{}' registered", self.kind, name);
                self.entries.push((name, component));
                Ok(Insertion::Added)
            }
        }
    }

    fn get(&self, name: &str) -> Option<&Rc<RefCell<C>>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    /// Returns whether the active entry changed.
    fn select(&mut self, name: &str) -> DynamicsResult<bool> {
        if self.get(name).is_none() {
            return Err(DynamicsError::Unknown {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        if self.active.as_deref() == Some(name) {
            return Ok(false);
        }
        self.active = Some(name.to_string());
        Ok(true)
    }

    fn active(&self) -> DynamicsResult<&Rc<RefCell<C>>> {
        self.active
            .as_deref()
            .and_then(|name| self.get(name))
            .ok_or(DynamicsError::NoActive(self.kind))
    }

    fn active_version(&self) -> Option<u32> {
        self.active().ok().map(|c| c.borrow().component_version())
    }

    fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    fn set_validation(&self, mode: ValidationMode) {
        for (_, c) in &self.entries {
            c.borrow_mut().set_validation(mode);
        }
    }
}

/// Snapshot of everything that influences what a driver renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChangeStamp {
    model: u32,
    selection: u64,
    integrator: Option<u32>,
    transformer: Option<u32>,
}

pub struct Experiment {
    name: String,
    model: SharedModel,
    integrators: Registry<dyn Integrator>,
    transformers: Registry<dyn Transformer>,
    staleness: StalenessPolicy,
    /// Applied to the model and to every component, including later additions.
    validation: ValidationMode,
    /// Bumped whenever the active integrator or transformer changes identity.
    selection: u64,
    marked: Option<ChangeStamp>,
}

impl Experiment {
    pub fn new(name: impl Into<String>, model: SharedModel) -> Self {
        let name = name.into();
        info!("experiment '{}' created for model '{}'", name, model.borrow().name());
        Self {
            name,
            model,
            integrators: Registry::new(ComponentKind::Integrator),
            transformers: Registry::new(ComponentKind::Transformer),
            staleness: StalenessPolicy::default(),
            validation: ValidationMode::default(),
            selection: 0,
            marked: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &SharedModel {
        &self.model
    }

    /// Registers `integrator` under its own name.
    ///
    /// Re-adding a registered handle is a no-op, registering it again under a
    /// different name is an error, and a different handle with a taken name
    /// replaces the previous occupant.
    pub fn add_integrator(&mut self, integrator: SharedIntegrator) -> DynamicsResult<Insertion> {
        let outcome = self
            .integrators
            .insert(&self.model, integrator, self.validation)?;
        self.note_insertion(outcome);
        Ok(outcome)
    }

    /// Registers `transformer` under its own name, with the same rules as
    /// [`Experiment::add_integrator`].
    pub fn add_transformer(&mut self, transformer: SharedTransformer) -> DynamicsResult<Insertion> {
        let outcome = self
            .transformers
            .insert(&self.model, transformer, self.validation)?;
        self.note_insertion(outcome);
        Ok(outcome)
    }

    fn note_insertion(&mut self, outcome: Insertion) {
        if outcome == Insertion::Replaced {
            self.selection += 1;
        }
    }

    pub fn set_integrator(&mut self, name: &str) -> DynamicsResult<()> {
        if self.integrators.select(name)? {
            debug!("{}: active integrator is now '{}'", self.name, name);
            self.selection += 1;
        }
        Ok(())
    }

    pub fn set_transformer(&mut self, name: &str) -> DynamicsResult<()> {
        if self.transformers.select(name)? {
            debug!("{}: active transformer is now '{}'", self.name, name);
            self.selection += 1;
        }
        Ok(())
    }

    pub fn integrator(&self) -> DynamicsResult<&SharedIntegrator> {
        self.integrators.active()
    }

    pub fn transformer(&self) -> DynamicsResult<&SharedTransformer> {
        self.transformers.active()
    }

    pub fn integrator_by_name(&self, name: &str) -> Option<&SharedIntegrator> {
        self.integrators.get(name)
    }

    pub fn transformer_by_name(&self, name: &str) -> Option<&SharedTransformer> {
        self.transformers.get(name)
    }

    pub fn integrator_names(&self) -> Vec<&str> {
        self.integrators.names()
    }

    pub fn transformer_names(&self) -> Vec<&str> {
        self.transformers.names()
    }

    pub fn staleness(&self) -> StalenessPolicy {
        self.staleness
    }

    pub fn set_staleness(&mut self, policy: StalenessPolicy) {
        self.staleness = policy;
    }

    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    /// Applies `mode` to the model, to every registered component and to any
    /// component added later.
    pub fn set_validation(&mut self, mode: ValidationMode) {
        self.validation = mode;
        self.model.borrow_mut().parameters_mut().set_validation(mode);
        self.integrators.set_validation(mode);
        self.transformers.set_validation(mode);
    }

    fn stamp(&self) -> ChangeStamp {
        ChangeStamp {
            model: self.model.borrow().version(),
            selection: self.selection,
            integrator: self.integrators.active_version(),
            transformer: self.transformers.active_version(),
        }
    }

    /// Whether anything a driver derives from this experiment may have changed
    /// since the last [`Experiment::mark_current`].
    pub fn is_outdated(&self) -> bool {
        match self.staleness {
            StalenessPolicy::Always => true,
            StalenessPolicy::Tracked => self.marked != Some(self.stamp()),
        }
    }

    pub fn mark_current(&mut self) {
        self.marked = Some(self.stamp());
    }
}
