use crate::coordinate::Coordinate;
use crate::error::DynamicsResult;
use crate::model::{DynamicalModel, ModelCore};
use crate::parameter::Parameter;
use crate::vector::Vector;

/// Rössler's four-dimensional hyperchaotic system.
#[derive(Debug, Clone)]
pub struct Hyperchaos {
    core: ModelCore,
}

impl Hyperchaos {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> DynamicsResult<Self> {
        let core = ModelCore::new("Hyperchaos")
            .with_coordinate(Coordinate::new("x", -20.0, -130.0, 30.0))
            .with_coordinate(Coordinate::new("y", 0.0, -80.0, 10.0))
            .with_coordinate(Coordinate::new("z", 0.0, 0.0, 30.0))
            .with_coordinate(Coordinate::new("w", 15.0, 0.0, 70.0))
            .with_coordinate(Coordinate::time("t"))
            .with_real_parameter(Parameter::new("a", a, 0.0, 2.0, 0.25, 0.01)?)
            .with_real_parameter(Parameter::new("b", b, -2.0, 2.0, -0.5, 0.01)?)
            .with_real_parameter(Parameter::new("c", c, 0.0, 5.0, 2.2, 0.01)?)
            .with_real_parameter(Parameter::new("d", d, -0.5, 0.5, 0.05, 0.01)?)
            .with_center_point(vec![-50.0, -35.0, 40.0, 35.0, 0.0]);
        Ok(Self { core })
    }

    pub fn with_defaults() -> DynamicsResult<Self> {
        Self::new(0.25, -0.5, 2.2, 0.05)
    }
}

impl DynamicalModel for Hyperchaos {
    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.core
    }

    fn evaluate(&self, p: &Vector, out: &mut Vector) {
        let k = self.core.parameters().real_values();
        out[0] = -p[1] - p[2];
        out[1] = p[0] + k[0] * p[1] + p[3];
        out[2] = k[2] + p[0] * p[2];
        out[3] = k[1] * p[2] + k[3] * p[3];
        out[4] = 1.0;
    }
}
