//! Stepping strategies bound to one model.
//!
//! Integrator parameters (step size and friends) live in a [`ParameterSet`]
//! rather than in typed fields so generic code can inspect and edit any
//! integrator without knowing its concrete type.

use crate::model::SharedModel;
use crate::parameter::ParameterSet;
use crate::vector::Vector;
use std::cell::RefCell;
use std::rc::Rc;

pub trait Integrator {
    /// Registry key used by an experiment.
    fn name(&self) -> &str;

    fn set_name(&mut self, name: &str);

    /// The model this integrator was constructed against.
    fn model(&self) -> &SharedModel;

    fn parameters(&self) -> &ParameterSet;

    fn parameters_mut(&mut self) -> &mut ParameterSet;

    /// Advances `v` by one step and writes the new state into `out`.
    ///
    /// `out` must hold at least the model's dimension and must not be `v`.
    fn step(&mut self, v: &Vector, out: &mut Vector);

    /// Allocating form of [`Integrator::step`].
    fn advance(&mut self, v: &Vector) -> Vector {
        let dimension = self.model().borrow().dimension();
        let mut out = Vector::zeros(dimension);
        self.step(v, &mut out);
        out
    }

    fn version(&self) -> u32 {
        self.parameters().version()
    }
}

pub type SharedIntegrator = Rc<RefCell<dyn Integrator>>;

pub fn share_integrator<I: Integrator + 'static>(integrator: I) -> SharedIntegrator {
    Rc::new(RefCell::new(integrator))
}
