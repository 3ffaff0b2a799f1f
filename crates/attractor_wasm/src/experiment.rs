//! Browser-facing wrapper around one experiment.
//!
//! Logic lives in plain `anyhow` methods so it can be exercised natively; the
//! `#[wasm_bindgen]` surface only converts arguments and errors.

use anyhow::{anyhow, bail, ensure, Result};
use attractor_core::coordinate::Coordinate;
use attractor_core::integrator::Integrator;
use attractor_core::parameter::ParameterSnapshot;
use attractor_core::solvers::STEP_SIZE;
use attractor_core::transformer::{Transformer, X_DISPLAY, Y_DISPLAY, Z_DISPLAY};
use attractor_core::{Experiment, ExperimentRegistry, RuntimeSettings, Vector};
use nalgebra::Vector3;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmExperiment {
    experiment: Experiment,
    next: Vector,
    display: Vector3<f64>,
}

/// Everything a parameter panel needs to draw its widgets.
#[derive(Debug, Serialize)]
pub(crate) struct ParametersPayload {
    model: ParameterSnapshot,
    integrator: ParameterSnapshot,
    transformer: ParameterSnapshot,
    coordinates: Vec<Coordinate>,
    axis_labels: [String; 3],
}

fn to_js(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}

fn display_parameter(axis: &str) -> Result<&'static str> {
    match axis {
        "x" => Ok(X_DISPLAY),
        "y" => Ok(Y_DISPLAY),
        "z" => Ok(Z_DISPLAY),
        _ => bail!("Unknown display axis '{axis}'; expected x, y or z."),
    }
}

impl WasmExperiment {
    pub(crate) fn build(system_name: &str, settings: &RuntimeSettings) -> Result<Self> {
        let registry = ExperimentRegistry::with_builtin_systems();
        let experiment = registry.create_or_fallback(system_name, settings)?;
        let dimension = experiment.model().borrow().dimension();
        Ok(Self {
            experiment,
            next: Vector::zeros(dimension),
            display: Vector3::zeros(),
        })
    }

    pub(crate) fn system_names() -> Vec<String> {
        ExperimentRegistry::with_builtin_systems()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn model_dimension(&self) -> usize {
        self.experiment.model().borrow().dimension()
    }

    fn state_from(&self, state: &[f64]) -> Result<Vector> {
        let dimension = self.model_dimension();
        ensure!(
            state.len() == dimension,
            "State has {} components but the model has {}.",
            state.len(),
            dimension
        );
        Ok(Vector::from(state))
    }

    pub(crate) fn try_step(&mut self, state: &[f64]) -> Result<Vec<f64>> {
        let state = self.state_from(state)?;
        let integrator = self.experiment.integrator()?;
        integrator.borrow_mut().step(&state, &mut self.next);
        Ok(self.next.as_slice().to_vec())
    }

    pub(crate) fn try_transform(&mut self, state: &[f64]) -> Result<Vec<f64>> {
        let state = self.state_from(state)?;
        let transformer = self.experiment.transformer()?;
        transformer.borrow().transform(&state, &mut self.display);
        Ok(self.display.iter().copied().collect())
    }

    pub(crate) fn try_inv_transform(&mut self, point: &[f64]) -> Result<Vec<f64>> {
        ensure!(
            point.len() == 3,
            "Display points have 3 components, got {}.",
            point.len()
        );
        let point = Vector3::from_column_slice(point);
        let transformer = self.experiment.transformer()?;
        transformer.borrow().inv_transform(&point, &mut self.next);
        Ok(self.next.as_slice().to_vec())
    }

    pub(crate) fn try_set_model_param(&mut self, name: &str, value: f64) -> Result<u32> {
        let version = self
            .experiment
            .model()
            .borrow_mut()
            .parameters_mut()
            .set_real_value(name, value)?;
        Ok(version)
    }

    pub(crate) fn try_set_step_size(&mut self, value: f64) -> Result<u32> {
        let integrator = self.experiment.integrator()?;
        let version = integrator
            .borrow_mut()
            .parameters_mut()
            .set_real_value(STEP_SIZE, value)?;
        Ok(version)
    }

    pub(crate) fn try_set_display_axis(&mut self, axis: &str, index: i32) -> Result<u32> {
        let name = display_parameter(axis)?;
        let transformer = self.experiment.transformer()?;
        let version = transformer
            .borrow_mut()
            .parameters_mut()
            .set_int_value(name, index)
            .map_err(|e| anyhow!("Active transformer cannot set {axis} axis: {e}"))?;
        Ok(version)
    }

    fn display_point(&self, center: bool) -> Result<Vec<f64>> {
        let transformer = self.experiment.transformer()?.borrow();
        let point = if center {
            transformer.center_point()
        } else {
            transformer.default_point()
        };
        Ok(point.iter().copied().collect())
    }

    pub(crate) fn parameter_payload(&self) -> Result<ParametersPayload> {
        let integrator = self.experiment.integrator()?.borrow();
        let transformer = self.experiment.transformer()?.borrow();
        let model = self.experiment.model().borrow();
        let axis_labels = [X_DISPLAY, Y_DISPLAY, Z_DISPLAY].map(|name| {
            match transformer.parameter_display_by_name(name) {
                label if label.is_empty() => name.to_string(),
                label => label,
            }
        });
        Ok(ParametersPayload {
            model: model.parameters().snapshot(),
            integrator: integrator.parameters().snapshot(),
            transformer: transformer.parameters().snapshot(),
            coordinates: model.coordinates().to_vec(),
            axis_labels,
        })
    }
}

#[wasm_bindgen]
impl WasmExperiment {
    #[wasm_bindgen(constructor)]
    pub fn new(system_name: &str) -> Result<WasmExperiment, JsValue> {
        console_error_panic_hook::set_once();
        Self::build(system_name, &RuntimeSettings::default()).map_err(to_js)
    }

    /// Builds a system with settings given as a plain JS object, e.g.
    /// `{ validation: "Checked", staleness: "Always" }`.
    pub fn with_settings(system_name: &str, settings: JsValue) -> Result<WasmExperiment, JsValue> {
        console_error_panic_hook::set_once();
        let settings: RuntimeSettings = from_value(settings)
            .map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))?;
        Self::build(system_name, &settings).map_err(to_js)
    }

    pub fn available_systems() -> js_sys::Array {
        Self::system_names()
            .into_iter()
            .map(|name| JsValue::from_str(&name))
            .collect()
    }

    pub fn name(&self) -> String {
        self.experiment.name().to_string()
    }

    pub fn dimension(&self) -> usize {
        self.model_dimension()
    }

    pub fn integrator_names(&self) -> Vec<String> {
        self.experiment
            .integrator_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn transformer_names(&self) -> Vec<String> {
        self.experiment
            .transformer_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn step(&mut self, state: &[f64]) -> Result<Vec<f64>, JsValue> {
        self.try_step(state).map_err(to_js)
    }

    pub fn transform(&mut self, state: &[f64]) -> Result<Vec<f64>, JsValue> {
        self.try_transform(state).map_err(to_js)
    }

    pub fn inv_transform(&mut self, point: &[f64]) -> Result<Vec<f64>, JsValue> {
        self.try_inv_transform(point).map_err(to_js)
    }

    pub fn set_model_param(&mut self, name: &str, value: f64) -> Result<u32, JsValue> {
        self.try_set_model_param(name, value).map_err(to_js)
    }

    pub fn set_step_size(&mut self, value: f64) -> Result<u32, JsValue> {
        self.try_set_step_size(value).map_err(to_js)
    }

    pub fn set_display_axis(&mut self, axis: &str, index: i32) -> Result<u32, JsValue> {
        self.try_set_display_axis(axis, index).map_err(to_js)
    }

    pub fn set_integrator(&mut self, name: &str) -> Result<(), JsValue> {
        self.experiment
            .set_integrator(name)
            .map_err(|e| to_js(e.into()))
    }

    pub fn set_transformer(&mut self, name: &str) -> Result<(), JsValue> {
        self.experiment
            .set_transformer(name)
            .map_err(|e| to_js(e.into()))
    }

    pub fn is_outdated(&self) -> bool {
        self.experiment.is_outdated()
    }

    pub fn mark_current(&mut self) {
        self.experiment.mark_current();
    }

    pub fn default_point(&self) -> Result<Vec<f64>, JsValue> {
        self.display_point(false).map_err(to_js)
    }

    pub fn center_point(&self) -> Result<Vec<f64>, JsValue> {
        self.display_point(true).map_err(to_js)
    }

    pub fn radius(&self) -> Result<f64, JsValue> {
        let transformer = self.experiment.transformer().map_err(|e| to_js(e.into()))?;
        let radius = transformer.borrow().radius();
        Ok(radius)
    }

    pub fn parameters(&self) -> Result<JsValue, JsValue> {
        let payload = self.parameter_payload().map_err(to_js)?;
        to_value(&payload).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}
