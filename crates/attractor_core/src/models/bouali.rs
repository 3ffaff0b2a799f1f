use crate::coordinate::Coordinate;
use crate::error::DynamicsResult;
use crate::model::{DynamicalModel, ModelCore};
use crate::parameter::Parameter;
use crate::vector::Vector;

/// Bouali's three-dimensional attractor (arXiv:1204.0045).
#[derive(Debug, Clone)]
pub struct Bouali {
    core: ModelCore,
}

impl Bouali {
    pub fn new(alpha: f64, s: f64) -> DynamicsResult<Self> {
        let core = ModelCore::new("Bouali")
            .with_coordinate(Coordinate::new("x", -3.0, -5.0, 5.0))
            .with_coordinate(Coordinate::new("y", 0.6, 0.0, 20.0))
            .with_coordinate(Coordinate::new("z", 1.2, -5.0, 5.0))
            .with_coordinate(Coordinate::time("t"))
            .with_real_parameter(Parameter::new("alpha", alpha, 0.0, 10.0, 0.3, 0.01)?)
            .with_real_parameter(Parameter::new("s", s, 0.0, 8.0, 1.0, 0.01)?)
            .with_center_point(vec![-1.0, 0.0, -5.0, 0.0]);
        Ok(Self { core })
    }

    pub fn with_defaults() -> DynamicsResult<Self> {
        Self::new(0.3, 1.0)
    }
}

impl DynamicalModel for Bouali {
    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.core
    }

    fn evaluate(&self, p: &Vector, out: &mut Vector) {
        let k = self.core.parameters().real_values();
        out[0] = p[0] * (4.0 - p[1]) + k[0] * p[2];
        out[1] = -p[1] * (1.0 - p[0] * p[0]);
        out[2] = -p[0] * (1.5 - k[1] * p[2]) - 0.05 * p[2];
        out[3] = 1.0;
    }
}
