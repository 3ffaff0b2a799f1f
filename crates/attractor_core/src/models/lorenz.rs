use crate::coordinate::Coordinate;
use crate::error::DynamicsResult;
use crate::model::{DynamicalModel, ModelCore};
use crate::parameter::Parameter;
use crate::vector::Vector;

/// x' = σ(y - x), y' = ρx - y - xz, z' = xy - βz
#[derive(Debug, Clone)]
pub struct Lorenz {
    core: ModelCore,
}

impl Lorenz {
    pub fn new(sigma: f64, rho: f64, beta: f64) -> DynamicsResult<Self> {
        let core = ModelCore::new("Lorenz")
            .with_coordinate(Coordinate::new("x", 1.0, -30.0, 30.0))
            .with_coordinate(Coordinate::new("y", 1.0, -30.0, 30.0))
            .with_coordinate(Coordinate::new("z", 1.0, 0.0, 50.0))
            .with_coordinate(Coordinate::time("t"))
            .with_real_parameter(Parameter::new("sigma", sigma, 0.0, 20.0, 10.0, 0.1)?)
            .with_real_parameter(Parameter::new("rho", rho, 0.0, 100.0, 28.0, 0.1)?)
            .with_real_parameter(Parameter::new("beta", beta, 0.0, 10.0, 8.0 / 3.0, 0.1)?)
            .with_center_point(vec![0.0, 0.0, 25.0, 0.0]);
        Ok(Self { core })
    }

    pub fn with_defaults() -> DynamicsResult<Self> {
        Self::new(10.0, 28.0, 8.0 / 3.0)
    }
}

impl DynamicalModel for Lorenz {
    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.core
    }

    fn evaluate(&self, p: &Vector, out: &mut Vector) {
        let k = self.core.parameters().real_values();
        out[0] = k[0] * (p[1] - p[0]);
        out[1] = k[1] * p[0] - p[1] - p[0] * p[2];
        out[2] = p[0] * p[1] - k[2] * p[2];
        out[3] = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::Lorenz;
    use crate::model::DynamicalModel;
    use crate::vector::Vector;

    #[test]
    fn field_vanishes_at_nontrivial_fixed_points() {
        let model = Lorenz::with_defaults().expect("lorenz");
        let beta: f64 = 8.0 / 3.0;
        let r = (beta * 27.0).sqrt();
        for sign in [1.0, -1.0] {
            let p = Vector::from(vec![sign * r, sign * r, 27.0, 0.0]);
            let out = model.evaluated(&p);
            for i in 0..3 {
                assert!(out[i].abs() < 1e-12, "component {i} = {}", out[i]);
            }
            assert_eq!(out[3], 1.0);
        }
    }

    #[test]
    fn field_at_default_point() {
        let model = Lorenz::with_defaults().expect("lorenz");
        let out = model.evaluated(&model.default_point());
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 26.0);
        assert!((out[2] - (1.0 - 8.0 / 3.0)).abs() < 1e-15);
    }

    #[test]
    fn rejects_out_of_range_constants() {
        assert!(Lorenz::new(25.0, 28.0, 8.0 / 3.0).is_err());
    }
}
