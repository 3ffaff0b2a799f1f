//! Mapping between a model's native state space and the 3D display space.
//!
//! Every transformer is described by which model axis feeds each of the three
//! display axes. The provided trait methods derive the forward and inverse maps
//! and the view helpers from that selection, so an implementation usually only
//! overrides [`Transformer::display_axes`].

use crate::error::DynamicsResult;
use crate::model::{display_radius, SharedModel};
use crate::parameter::{IntParameter, Parameter, ParameterSet};
use crate::vector::Vector;
use nalgebra::Vector3;
use std::cell::RefCell;
use std::rc::Rc;

pub const X_DISPLAY: &str = "xDisplay";
pub const Y_DISPLAY: &str = "yDisplay";
pub const Z_DISPLAY: &str = "zDisplay";

pub trait Transformer {
    fn name(&self) -> &str;

    fn set_name(&mut self, name: &str);

    fn model(&self) -> &SharedModel;

    fn parameters(&self) -> &ParameterSet;

    fn parameters_mut(&mut self) -> &mut ParameterSet;

    fn version(&self) -> u32 {
        self.parameters().version()
    }

    /// Model axis shown on each display axis; `None` displays a constant 0.
    ///
    /// The default shows the first three model axes.
    fn display_axes(&self) -> [Option<usize>; 3] {
        let dimension = self.model().borrow().dimension();
        [0, 1, 2].map(|axis| (axis < dimension).then_some(axis))
    }

    fn transform(&self, v: &Vector, out: &mut Vector3<f64>) {
        for (slot, axis) in self.display_axes().into_iter().enumerate() {
            out[slot] = axis.and_then(|i| v.get(i)).unwrap_or(0.0);
        }
    }

    /// Writes every model axis of `out`: displayed axes come from `p`, all
    /// others from their coordinate default.
    fn inv_transform(&self, p: &Vector3<f64>, out: &mut Vector) {
        let model = self.model().borrow();
        for (i, coord) in model.coordinates().iter().enumerate() {
            out[i] = coord.default_value;
        }
        for (slot, axis) in self.display_axes().into_iter().enumerate() {
            if let Some(i) = axis.filter(|&i| i < out.dimension()) {
                out[i] = p[slot];
            }
        }
    }

    fn to_display(&self, v: &Vector) -> Vector3<f64> {
        let mut out = Vector3::zeros();
        self.transform(v, &mut out);
        out
    }

    fn from_display(&self, p: &Vector3<f64>) -> Vector {
        let dimension = self.model().borrow().dimension();
        let mut out = Vector::zeros(dimension);
        self.inv_transform(p, &mut out);
        out
    }

    /// View radius over the displayed axes only.
    fn radius(&self) -> f64 {
        let axes = self.display_axes();
        display_radius(self.model().borrow().coordinates(), axes.into_iter().flatten())
    }

    fn default_point(&self) -> Vector3<f64> {
        let point = self.model().borrow().default_point();
        self.to_display(&point)
    }

    fn center_point(&self) -> Vector3<f64> {
        let point = self.model().borrow().center_point();
        self.to_display(&point)
    }

    /// Label for the int parameter at `index`, for UI widgets.
    fn parameter_display(&self, _index: usize) -> String {
        String::new()
    }

    fn parameter_display_by_name(&self, name: &str) -> String {
        match self.parameters().int_index(name) {
            Some(index) => self.parameter_display(index),
            None => String::new(),
        }
    }
}

pub type SharedTransformer = Rc<RefCell<dyn Transformer>>;

pub fn share_transformer<T: Transformer + 'static>(transformer: T) -> SharedTransformer {
    Rc::new(RefCell::new(transformer))
}

/// Shows the first three model axes, padding with zeros for smaller models.
pub struct LeadingAxesTransformer {
    name: String,
    model: SharedModel,
    parameters: ParameterSet,
}

impl LeadingAxesTransformer {
    pub fn new(model: &SharedModel) -> Self {
        Self {
            name: "leading".to_string(),
            model: model.clone(),
            parameters: ParameterSet::new(),
        }
    }
}

impl Transformer for LeadingAxesTransformer {
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
}

/// Projects onto three user-selected model axes.
///
/// The selection is held in the int parameters `xDisplay`, `yDisplay` and
/// `zDisplay`, each in `[-1, dimension - 1]`; `-1` pins that display axis to 0.
pub struct ProjectionTransformer {
    name: String,
    model: SharedModel,
    parameters: ParameterSet,
    dimension: usize,
}

impl ProjectionTransformer {
    pub fn new(model: &SharedModel) -> DynamicsResult<Self> {
        let [x, y, z] = Self::default_axes(model.borrow().dimension());
        Self::with_axes(model, x, y, z)
    }

    pub fn with_axes(model: &SharedModel, x: i32, y: i32, z: i32) -> DynamicsResult<Self> {
        let dimension = model.borrow().dimension();
        let max = dimension as i32 - 1;
        let defaults = Self::default_axes(dimension);

        let mut parameters = ParameterSet::new();
        for ((name, value), default) in [(X_DISPLAY, x), (Y_DISPLAY, y), (Z_DISPLAY, z)]
            .into_iter()
            .zip(defaults)
        {
            let param: IntParameter = Parameter::new(name, value, -1, max, default, 1)?;
            parameters.add_int_parameter(param);
        }

        Ok(Self {
            name: "projection".to_string(),
            model: model.clone(),
            parameters,
            dimension,
        })
    }

    fn default_axes(dimension: usize) -> [i32; 3] {
        let y = if dimension > 1 { 1 } else { -1 };
        let z = if dimension > 2 { 2 } else { -1 };
        [0, y, z]
    }

    fn axis(&self, index: i32) -> Option<usize> {
        usize::try_from(index).ok().filter(|&i| i < self.dimension)
    }
}

impl Transformer for ProjectionTransformer {
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
    fn display_axes(&self) -> [Option<usize>; 3] {
        let values = self.parameters.int_values();
        [
            self.axis(values[0]),
            self.axis(values[1]),
            self.axis(values[2]),
        ]
    }

    fn parameter_display(&self, index: usize) -> String {
        let Some(&axis) = self.parameters.int_values().get(index) else {
            return String::new();
        };
        if axis == -1 {
            return "0".to_string();
        }
        self.axis(axis)
            .and_then(|i| self.model.borrow().coordinates().get(i).map(|c| c.name.clone()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Coordinate;
    use crate::model::{share_model, DynamicalModel, ModelCore};
    use crate::models::{Bouali, Lorenz};
    use crate::parameter::ValidationMode;

    struct Plane {
        core: ModelCore,
    }

    impl Plane {
        fn new() -> Self {
            Self {
                core: ModelCore::new("Plane")
                    .with_coordinate(Coordinate::new("u", 1.5, -2.0, 2.0))
                    .with_coordinate(Coordinate::new("v", -0.5, -6.0, 6.0)),
            }
        }
    }

    impl DynamicalModel for Plane {
        fn core(&self) -> &ModelCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ModelCore {
            &mut self.core
        }

        fn evaluate(&self, x: &Vector, out: &mut Vector) {
            out[0] = x[1];
            out[1] = -x[0];
        }
    }

    fn lorenz() -> SharedModel {
        share_model(Lorenz::with_defaults().expect("lorenz"))
    }

    #[test]
    fn projection_defaults_depend_on_dimension() {
        let plane = share_model(Plane::new());
        let projection = ProjectionTransformer::new(&plane).expect("projection");
        assert_eq!(projection.parameters().int_values(), &[0, 1, -1]);
        assert_eq!(projection.display_axes(), [Some(0), Some(1), None]);

        let projection = ProjectionTransformer::new(&lorenz()).expect("projection");
        assert_eq!(projection.parameters().int_values(), &[0, 1, 2]);
        assert_eq!(projection.parameters().int_params()[2].max_value, 3);
    }

    #[test]
    fn projection_rejects_axes_outside_model() {
        let model = lorenz();
        assert!(ProjectionTransformer::with_axes(&model, 0, 1, 4).is_err());
        assert!(ProjectionTransformer::with_axes(&model, -2, 1, 2).is_err());
    }

    #[test]
    fn inverse_recovers_displayed_axes_and_defaults_the_rest() {
        let model = lorenz();
        let projection = ProjectionTransformer::new(&model).expect("projection");
        let v = Vector::from(vec![3.0, -4.0, 12.5, 7.0]);

        let back = projection.from_display(&projection.to_display(&v));

        assert_eq!(&back.as_slice()[..3], &v.as_slice()[..3]);
        assert_eq!(back[3], model.borrow().coordinates()[3].default_value);
    }

    #[test]
    fn unmapped_display_axes_read_zero() {
        let model = lorenz();
        let projection = ProjectionTransformer::with_axes(&model, 3, -1, 0).expect("projection");
        let v = Vector::from(vec![3.0, -4.0, 12.5, 7.0]);

        assert_eq!(projection.to_display(&v), Vector3::new(7.0, 0.0, 3.0));

        let back = projection.from_display(&Vector3::new(9.0, 5.0, -1.0));
        assert_eq!(back.as_slice(), &[-1.0, 1.0, 1.0, 9.0]);
    }

    #[test]
    fn out_of_range_index_written_unchecked_projects_to_zero() {
        let model = lorenz();
        let mut projection = ProjectionTransformer::new(&model).expect("projection");
        projection.parameters_mut().set_int_value(Y_DISPLAY, 9).unwrap();
        let v = Vector::from(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(projection.to_display(&v), Vector3::new(1.0, 0.0, 3.0));
    }

    #[test]
    fn checked_mode_guards_axis_selection() {
        let model = lorenz();
        let mut projection = ProjectionTransformer::new(&model).expect("projection");
        projection
            .parameters_mut()
            .set_validation(ValidationMode::Checked);
        assert!(projection.parameters_mut().set_int_value(X_DISPLAY, 4).is_err());
        assert!(projection.parameters_mut().set_int_value(X_DISPLAY, 3).is_ok());
    }

    #[test]
    fn view_helpers_follow_axis_selection() {
        let model = share_model(Bouali::with_defaults().expect("bouali"));
        let mut projection = ProjectionTransformer::new(&model).expect("projection");
        assert!((projection.radius() - 10.0).abs() < 1e-12);
        assert_eq!(projection.center_point(), Vector3::new(-1.0, 0.0, -5.0));
        assert_eq!(projection.default_point(), Vector3::new(-3.0, 0.6, 1.2));

        projection.parameters_mut().set_int_value(Y_DISPLAY, -1).unwrap();
        assert!((projection.radius() - 5.0).abs() < 1e-12);
        assert_eq!(projection.center_point(), Vector3::new(-1.0, 0.0, -5.0));
        assert_eq!(projection.default_point(), Vector3::new(-3.0, 0.0, 1.2));

        projection.parameters_mut().set_int_value(X_DISPLAY, 3).unwrap();
        projection.parameters_mut().set_int_value(Z_DISPLAY, -1).unwrap();
        assert_eq!(projection.radius(), crate::model::FALLBACK_RADIUS);
    }

    #[test]
    fn parameter_display_names_bound_coordinates() {
        let model = lorenz();
        let mut projection = ProjectionTransformer::new(&model).expect("projection");
        projection.parameters_mut().set_int_value(Y_DISPLAY, -1).unwrap();
        projection.parameters_mut().set_int_value(Z_DISPLAY, 3).unwrap();

        assert_eq!(projection.parameter_display(0), "x");
        assert_eq!(projection.parameter_display(1), "0");
        assert_eq!(projection.parameter_display_by_name(Z_DISPLAY), "t");
        assert_eq!(projection.parameter_display_by_name("wDisplay"), "");
        assert_eq!(projection.parameter_display(5), "");
    }

    #[test]
    fn leading_axes_pad_small_models() {
        let plane = share_model(Plane::new());
        let leading = LeadingAxesTransformer::new(&plane);
        let v = Vector::from(vec![0.25, -3.0]);

        assert_eq!(leading.to_display(&v), Vector3::new(0.25, -3.0, 0.0));
        assert_eq!(leading.from_display(&Vector3::new(1.0, 2.0, 3.0)).as_slice(), &[1.0, 2.0]);
        assert!((leading.radius() - 6.0).abs() < 1e-12);
        assert_eq!(leading.parameter_display_by_name(X_DISPLAY), "");
    }

    #[test]
    fn leading_axes_fill_hidden_axes_from_defaults() {
        let model = lorenz();
        let leading = LeadingAxesTransformer::new(&model);
        let back = leading.from_display(&Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(back.as_slice(), &[4.0, 5.0, 6.0, 0.0]);
    }
}
