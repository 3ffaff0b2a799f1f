//! The vector-field abstraction.
//!
//! A model is a named, parameterized n-dimensional differential equation. Its
//! dimension is the number of registered coordinates and never changes after
//! construction; parameter values may change at any time, and every change
//! bumps the model version.

use crate::coordinate::{Coordinate, CoordinateSet};
use crate::parameter::{ParameterSet, RealParameter};
use crate::vector::Vector;
use std::cell::RefCell;
use std::rc::Rc;

/// Radius used when no selected axis has a usable finite range.
pub const FALLBACK_RADIUS: f64 = 30.0;

const DEGENERATE_RADIUS: f64 = 1e-4;

/// Half of the largest finite coordinate span over `axes`.
///
/// Falls back to [`FALLBACK_RADIUS`] when every span is infinite (a time axis)
/// or the result is essentially zero. Axes without a coordinate are skipped.
pub fn display_radius(coords: &[Coordinate], axes: impl IntoIterator<Item = usize>) -> f64 {
    let mut diameter = 0.0_f64;
    for axis in axes {
        if let Some(coord) = coords.get(axis) {
            let span = coord.span();
            if span.is_finite() && span > diameter {
                diameter = span;
            }
        }
    }

    let radius = diameter / 2.0;
    if radius < DEGENERATE_RADIUS {
        FALLBACK_RADIUS
    } else {
        radius
    }
}

/// State shared by every concrete model: name, parameters, axes and the
/// preferred viewing center.
#[derive(Debug, Clone)]
pub struct ModelCore {
    name: String,
    parameters: ParameterSet,
    coordinates: CoordinateSet,
    center_point: Option<Vector>,
}

impl ModelCore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: ParameterSet::new(),
            coordinates: CoordinateSet::new(),
            center_point: None,
        }
    }

    pub fn with_coordinate(mut self, coord: Coordinate) -> Self {
        self.coordinates.add(coord);
        self
    }

    pub fn with_real_parameter(mut self, param: RealParameter) -> Self {
        self.parameters.add_real_parameter(param);
        self
    }

    pub fn with_center_point(mut self, center: Vec<f64>) -> Self {
        self.center_point = Some(Vector::from(center));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.parameters
    }

    pub fn coordinates(&self) -> &CoordinateSet {
        &self.coordinates
    }
}

pub trait DynamicalModel {
    fn core(&self) -> &ModelCore;

    fn core_mut(&mut self) -> &mut ModelCore;

    /// Writes the vector field at `x` into `out`.
    ///
    /// Both buffers must hold at least `dimension()` components and must be
    /// distinct.
    fn evaluate(&self, x: &Vector, out: &mut Vector);

    /// Allocating form of [`DynamicalModel::evaluate`].
    fn evaluated(&self, x: &Vector) -> Vector {
        let mut out = Vector::zeros(self.dimension());
        self.evaluate(x, &mut out);
        out
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn dimension(&self) -> usize {
        self.core().coordinates().len()
    }

    fn version(&self) -> u32 {
        self.core().parameters().version()
    }

    fn parameters(&self) -> &ParameterSet {
        self.core().parameters()
    }

    fn parameters_mut(&mut self) -> &mut ParameterSet {
        self.core_mut().parameters_mut()
    }

    fn coordinates(&self) -> &[Coordinate] {
        self.core().coordinates().coords()
    }

    /// A fresh vector built from each coordinate's default value.
    fn default_point(&self) -> Vector {
        self.coordinates().iter().map(|c| c.default_value).collect()
    }

    /// The declared viewing center, or the default point if none was declared.
    fn center_point(&self) -> Vector {
        match &self.core().center_point {
            Some(center) => center.clone(),
            None => self.default_point(),
        }
    }

    /// View radius over the first three axes.
    fn radius(&self) -> f64 {
        display_radius(self.coordinates(), 0..3)
    }
}

/// Handle through which integrators and transformers are bound to a model.
/// Binding identity is allocation identity (`Rc::ptr_eq`).
pub type SharedModel = Rc<RefCell<dyn DynamicalModel>>;

pub fn share_model<M: DynamicalModel + 'static>(model: M) -> SharedModel {
    Rc::new(RefCell::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Parameter;

    struct Decay {
        core: ModelCore,
    }

    impl Decay {
        fn new() -> Self {
            Self {
                core: ModelCore::new("Decay")
                    .with_coordinate(Coordinate::new("x", 2.0, -4.0, 4.0))
                    .with_coordinate(Coordinate::time("t"))
                    .with_real_parameter(Parameter::new("k", 1.0, 0.0, 5.0, 1.0, 0.1).unwrap()),
            }
        }
    }

    impl DynamicalModel for Decay {
        fn core(&self) -> &ModelCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ModelCore {
            &mut self.core
        }

        fn evaluate(&self, x: &Vector, out: &mut Vector) {
            let k = self.core.parameters().real_values()[0];
            out[0] = -k * x[0];
            out[1] = 1.0;
        }
    }

    #[test]
    fn dimension_and_default_point_follow_coordinates() {
        let model = Decay::new();
        assert_eq!(model.dimension(), 2);
        assert_eq!(model.default_point().as_slice(), &[2.0, 0.0]);
    }

    #[test]
    fn center_point_falls_back_to_default_point() {
        let model = Decay::new();
        assert_eq!(model.center_point(), model.default_point());
    }

    #[test]
    fn evaluated_allocates_full_dimension() {
        let model = Decay::new();
        let out = model.evaluated(&Vector::from(vec![3.0, 0.0]));
        assert_eq!(out.as_slice(), &[-3.0, 1.0]);
    }

    #[test]
    fn parameter_writes_bump_model_version() {
        let mut model = Decay::new();
        let before = model.version();
        model.parameters_mut().set_real_value("k", 2.0).unwrap();
        assert_eq!(model.version(), before + 1);
        assert_eq!(model.evaluated(&Vector::from(vec![1.0, 0.0]))[0], -2.0);
    }

    #[test]
    fn radius_uses_largest_finite_span() {
        let coords = vec![
            Coordinate::new("x", 0.0, -30.0, 30.0),
            Coordinate::new("y", 0.0, -10.0, 10.0),
            Coordinate::time("t"),
        ];
        assert!((display_radius(&coords, 0..3) - 30.0).abs() < 1e-12);
        assert!((display_radius(&coords, [1]) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn radius_falls_back_for_infinite_or_degenerate_ranges() {
        let coords = vec![Coordinate::time("t"), Coordinate::new("p", 1.0, 1.0, 1.0)];
        assert_eq!(display_radius(&coords, [0]), FALLBACK_RADIUS);
        assert_eq!(display_radius(&coords, [1]), FALLBACK_RADIUS);
        assert_eq!(display_radius(&coords, [7]), FALLBACK_RADIUS);
    }

    #[test]
    fn model_radius_scans_first_three_axes() {
        let model = Decay::new();
        assert!((model.radius() - 4.0).abs() < 1e-12);
    }
}
