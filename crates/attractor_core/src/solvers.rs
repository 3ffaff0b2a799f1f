use crate::error::{DynamicsError, DynamicsResult};
use crate::integrator::Integrator;
use crate::model::SharedModel;
use crate::parameter::{Parameter, ParameterSet, RealParameter};
use crate::vector::Vector;
use log::debug;

/// Name of the step-size parameter every built-in integrator registers.
pub const STEP_SIZE: &str = "stepSize";

/// Range that keeps explicit schemes stable for typical chaotic-system
/// magnitudes.
pub const MIN_STEP_SIZE: f64 = 0.0001;
pub const MAX_STEP_SIZE: f64 = 0.2;
pub const DEFAULT_STEP_SIZE: f64 = 0.01;

fn step_size_parameter(initial: f64) -> DynamicsResult<RealParameter> {
    Parameter::new(
        STEP_SIZE,
        initial,
        MIN_STEP_SIZE,
        MAX_STEP_SIZE,
        DEFAULT_STEP_SIZE,
        MIN_STEP_SIZE,
    )
}

fn bound_dimension(model: &SharedModel) -> DynamicsResult<usize> {
    let model = model.borrow();
    match model.dimension() {
        0 => Err(DynamicsError::ZeroDimension(model.name().to_string())),
        d => Ok(d),
    }
}

// Both RK4 code paths go through these helpers so they agree bit for bit.

#[inline(always)]
fn half_step(x: f64, k: f64, h: f64) -> f64 {
    x + k * (h * 0.5)
}

#[inline(always)]
fn full_step(x: f64, k: f64, h: f64) -> f64 {
    x + k * h
}

#[inline(always)]
fn weighted_delta(k1: f64, k2: f64, k3: f64, k4: f64, h: f64) -> f64 {
    (h / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
}

#[inline(always)]
fn load<const N: usize>(v: &Vector) -> [f64; N] {
    let mut out = [0.0; N];
    out.copy_from_slice(&v.as_slice()[..N]);
    out
}

type StepFn = fn(&mut RungeKutta4, &Vector, &mut Vector);

/// Classic Runge-Kutta 4th Order Solver
///
/// Stage buffers are allocated once for the bound model's dimension. The step
/// routine is picked once at construction: dimensions 1 through 5 get an
/// unrolled fixed-size path, anything larger uses the generic loop.
pub struct RungeKutta4 {
    name: String,
    model: SharedModel,
    parameters: ParameterSet,
    step_index: usize,
    k1: Vector,
    k2: Vector,
    k3: Vector,
    k4: Vector,
    tmp: Vector,
    step_fn: StepFn,
}

impl RungeKutta4 {
    pub fn new(model: &SharedModel, step_size: f64) -> DynamicsResult<Self> {
        let dim = bound_dimension(model)?;

        let mut parameters = ParameterSet::new();
        parameters.add_real_parameter(step_size_parameter(step_size)?);
        let step_index = parameters
            .real_index(STEP_SIZE)
            .ok_or_else(|| DynamicsError::UnknownParameter(STEP_SIZE.to_string()))?;

        let step_fn: StepFn = match dim {
            1 => Self::step_fixed::<1>,
            2 => Self::step_fixed::<2>,
            3 => Self::step_fixed::<3>,
            4 => Self::step_fixed::<4>,
            5 => Self::step_fixed::<5>,
            _ => Self::step_generic,
        };

        debug!(
            "rk4 bound to '{}' ({}D, h = {})",
            model.borrow().name(),
            dim,
            step_size
        );

        Ok(Self {
            name: "rk4".to_string(),
            model: model.clone(),
            parameters,
            step_index,
            k1: Vector::zeros(dim),
            k2: Vector::zeros(dim),
            k3: Vector::zeros(dim),
            k4: Vector::zeros(dim),
            tmp: Vector::zeros(dim),
            step_fn,
        })
    }

    pub fn step_size(&self) -> f64 {
        self.parameters.real_values()[self.step_index]
    }

    /// Writes only the step delta `h/6 (k1 + 2k2 + 2k3 + k4)` into `out`.
    pub fn increment(&mut self, v: &Vector, out: &mut Vector) {
        self.step(v, out);
        let h = self.step_size();
        for i in 0..self.k1.dimension() {
            out[i] = weighted_delta(self.k1[i], self.k2[i], self.k3[i], self.k4[i], h);
        }
    }

    /// Dimension-agnostic step. Always produces the same result as the
    /// specialized path selected at construction.
    pub fn step_generic(&mut self, v: &Vector, out: &mut Vector) {
        let h = self.step_size();
        let dim = self.tmp.dimension();
        let model = self.model.borrow();

        // k1 = f(y)
        model.evaluate(v, &mut self.k1);

        // k2 = f(y + h*k1/2)
        for i in 0..dim {
            self.tmp[i] = half_step(v[i], self.k1[i], h);
        }
        model.evaluate(&self.tmp, &mut self.k2);

        // k3 = f(y + h*k2/2)
        for i in 0..dim {
            self.tmp[i] = half_step(v[i], self.k2[i], h);
        }
        model.evaluate(&self.tmp, &mut self.k3);

        // k4 = f(y + h*k3)
        for i in 0..dim {
            self.tmp[i] = full_step(v[i], self.k3[i], h);
        }
        model.evaluate(&self.tmp, &mut self.k4);

        // y_next = y + h/6 * (k1 + 2k2 + 2k3 + k4)
        for i in 0..dim {
            out[i] = v[i] + weighted_delta(self.k1[i], self.k2[i], self.k3[i], self.k4[i], h);
        }
    }

    fn step_fixed<const N: usize>(&mut self, v: &Vector, out: &mut Vector) {
        let h = self.step_size();
        let x: [f64; N] = load(v);
        let model = self.model.borrow();

        model.evaluate(v, &mut self.k1);
        let k1: [f64; N] = load(&self.k1);
        {
            let tmp = &mut self.tmp.as_mut_slice()[..N];
            for i in 0..N {
                tmp[i] = half_step(x[i], k1[i], h);
            }
        }

        model.evaluate(&self.tmp, &mut self.k2);
        let k2: [f64; N] = load(&self.k2);
        {
            let tmp = &mut self.tmp.as_mut_slice()[..N];
            for i in 0..N {
                tmp[i] = half_step(x[i], k2[i], h);
            }
        }

        model.evaluate(&self.tmp, &mut self.k3);
        let k3: [f64; N] = load(&self.k3);
        {
            let tmp = &mut self.tmp.as_mut_slice()[..N];
            for i in 0..N {
                tmp[i] = full_step(x[i], k3[i], h);
            }
        }

        model.evaluate(&self.tmp, &mut self.k4);
        let k4: [f64; N] = load(&self.k4);

        let out = &mut out.as_mut_slice()[..N];
        for i in 0..N {
            out[i] = x[i] + weighted_delta(k1[i], k2[i], k3[i], k4[i], h);
        }
    }
}

impl Integrator for RungeKutta4 {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn model(&self) -> &SharedModel {
        &self.model
    }

    fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.parameters
    }

    #[inline]
    fn step(&mut self, v: &Vector, out: &mut Vector) {
        let step_fn = self.step_fn;
        step_fn(self, v, out);
    }
}

/// Explicit forward Euler. Cheap and first-order; mostly useful to compare
/// against RK4 when the step size is pushed to its limits.
pub struct Euler {
    name: String,
    model: SharedModel,
    parameters: ParameterSet,
    slope: Vector,
}

impl Euler {
    pub fn new(model: &SharedModel, step_size: f64) -> DynamicsResult<Self> {
        let dim = bound_dimension(model)?;
        let mut parameters = ParameterSet::new();
        parameters.add_real_parameter(step_size_parameter(step_size)?);

        Ok(Self {
            name: "euler".to_string(),
            model: model.clone(),
            parameters,
            slope: Vector::zeros(dim),
        })
    }

    pub fn step_size(&self) -> f64 {
        self.parameters.real_values()[0]
    }
}

impl Integrator for Euler {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn model(&self) -> &SharedModel {
        &self.model
    }

    fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.parameters
    }

    fn step(&mut self, v: &Vector, out: &mut Vector) {
        let h = self.step_size();
        self.model.borrow().evaluate(v, &mut self.slope);
        for i in 0..self.slope.dimension() {
            out[i] = full_step(v[i], self.slope[i], h);
        }
    }
}
