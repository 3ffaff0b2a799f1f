use crate::coordinate::Coordinate;
use crate::error::DynamicsResult;
use crate::model::{DynamicalModel, ModelCore};
use crate::parameter::Parameter;
use crate::vector::Vector;

/// Three-dimensional Rössler system.
#[derive(Debug, Clone)]
pub struct Rossler {
    core: ModelCore,
}

impl Rossler {
    pub fn new(a: f64, b: f64, c: f64) -> DynamicsResult<Self> {
        let core = ModelCore::new("Rossler")
            .with_coordinate(Coordinate::new("x", 5.0, -20.0, 20.0))
            .with_coordinate(Coordinate::new("y", 5.0, -15.0, 10.0))
            .with_coordinate(Coordinate::new("z", 5.0, 0.0, 20.0))
            .with_coordinate(Coordinate::time("t"))
            .with_real_parameter(Parameter::new("a", a, -0.5, 0.5, 0.2, 0.01)?)
            .with_real_parameter(Parameter::new("b", b, -0.5, 0.5, 0.2, 0.01)?)
            .with_real_parameter(Parameter::new("c", c, 0.0, 10.0, 5.7, 0.01)?)
            .with_center_point(vec![0.0, 0.0, 10.0, 0.0]);
        Ok(Self { core })
    }

    pub fn with_defaults() -> DynamicsResult<Self> {
        Self::new(0.2, 0.2, 5.7)
    }
}

impl DynamicalModel for Rossler {
    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.core
    }

    fn evaluate(&self, p: &Vector, out: &mut Vector) {
        let k = self.core.parameters().real_values();
        out[0] = -p[1] - p[2];
        out[1] = p[0] + k[0] * p[1];
        out[2] = k[1] + p[2] * (p[0] - k[2]);
        out[3] = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::Rossler;
    use crate::model::DynamicalModel;
    use crate::vector::Vector;

    #[test]
    fn field_vanishes_at_inner_fixed_point() {
        let model = Rossler::with_defaults().expect("rossler");
        let (a, b, c): (f64, f64, f64) = (0.2, 0.2, 5.7);
        let disc = (c * c - 4.0 * a * b).sqrt();
        let x = (c - disc) / 2.0;
        let p = Vector::from(vec![x, -x / a, x / a, 0.0]);
        let out = model.evaluated(&p);
        for i in 0..3 {
            assert!(out[i].abs() < 1e-12, "component {i} = {}", out[i]);
        }
    }
}
