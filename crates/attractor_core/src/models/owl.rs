use crate::coordinate::Coordinate;
use crate::error::DynamicsResult;
use crate::model::{DynamicalModel, ModelCore};
use crate::parameter::Parameter;
use crate::vector::Vector;

#[derive(Debug, Clone)]
pub struct Owl {
    core: ModelCore,
}

impl Owl {
    pub fn new(a: f64, b: f64, c: f64) -> DynamicsResult<Self> {
        let core = ModelCore::new("Owl")
            .with_coordinate(Coordinate::new("x", 0.5, -15.0, 15.0))
            .with_coordinate(Coordinate::new("y", 0.5, -15.0, 15.0))
            .with_coordinate(Coordinate::new("z", 0.5, 0.0, 20.0))
            .with_coordinate(Coordinate::time("t"))
            .with_real_parameter(Parameter::new("a", a, -20.0, 20.0, 10.0, 0.01)?)
            .with_real_parameter(Parameter::new("b", b, -20.0, 20.0, 10.0, 0.01)?)
            .with_real_parameter(Parameter::new("c", c, -20.0, 20.0, 13.0, 0.01)?)
            .with_center_point(vec![0.0, 0.0, 0.0, 0.0]);
        Ok(Self { core })
    }

    pub fn with_defaults() -> DynamicsResult<Self> {
        Self::new(10.0, 10.0, 13.0)
    }
}

impl DynamicalModel for Owl {
    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.core
    }

    fn evaluate(&self, p: &Vector, out: &mut Vector) {
        let k = self.core.parameters().real_values();
        out[0] = -k[0] * (p[0] + p[1]);
        out[1] = -p[1] - k[1] * p[0] * p[2];
        out[2] = 10.0 * p[0] * p[1] + k[2];
        out[3] = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::Owl;
    use crate::model::DynamicalModel;

    #[test]
    fn field_at_default_point() {
        let model = Owl::with_defaults().expect("owl");
        let out = model.evaluated(&model.default_point());
        assert_eq!(out.as_slice(), &[-10.0, -3.0, 15.5, 1.0]);
    }
}
