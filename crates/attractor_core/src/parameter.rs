//! Named, bounded, typed parameters.
//!
//! A [`ParameterSet`] owns three independent registries (bool, int, real).
//! Each registry keeps its parameters in insertion order next to a flat
//! `values` mirror which evaluation code reads by index, so the hot path never
//! touches the name map. Every successful write bumps the set's version.

use crate::error::{DynamicsError, DynamicsResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

/// Value types a parameter can hold.
pub trait ParameterValue: Copy + PartialOrd + Debug + Default {}

impl ParameterValue for bool {}
impl ParameterValue for i32 {}
impl ParameterValue for f64 {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter<T> {
    pub name: String,
    pub value: T,
    pub min_value: T,
    pub max_value: T,
    pub default_value: T,
    /// Suggested increment for bounded UI controls.
    pub increment: T,
}

pub type BoolParameter = Parameter<bool>;
pub type IntParameter = Parameter<i32>;
pub type RealParameter = Parameter<f64>;

impl<T: ParameterValue> Parameter<T> {
    /// Builds a parameter, rejecting a `value` or `default_value` outside
    /// `[min_value, max_value]`.
    pub fn new(
        name: impl Into<String>,
        value: T,
        min_value: T,
        max_value: T,
        default_value: T,
        increment: T,
    ) -> DynamicsResult<Self> {
        let param = Self {
            name: name.into(),
            value,
            min_value,
            max_value,
            default_value,
            increment,
        };
        param.validate(value)?;
        param.validate(default_value)?;
        Ok(param)
    }

    pub fn contains(&self, v: T) -> bool {
        // Written so that NaN is rejected.
        v >= self.min_value && v <= self.max_value
    }

    pub fn validate(&self, v: T) -> DynamicsResult<()> {
        if !self.contains(v) {
            return Err(DynamicsError::OutOfRange {
                name: self.name.clone(),
                value: format!("{v:?}"),
                min: format!("{:?}", self.min_value),
                max: format!("{:?}", self.max_value),
            });
        }
        Ok(())
    }
}

/// Whether `set_*_value` re-checks the declared range.
///
/// `Unchecked` is the production mode: bounded UI controls are trusted to stay
/// in range and writes cost a map lookup and two stores. `Checked` is meant for
/// tests and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationMode {
    #[default]
    Unchecked,
    Checked,
}

/// Insertion-ordered registry for one parameter kind.
#[derive(Debug, Clone, Default)]
pub struct ParameterList<T> {
    params: Vec<Parameter<T>>,
    values: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: ParameterValue> ParameterList<T> {
    /// Appends `param`, or replaces the entry with the same name in place.
    pub fn add(&mut self, param: Parameter<T>) {
        match self.index.get(&param.name) {
            Some(&i) => {
                self.values[i] = param.value;
                self.params[i] = param;
            }
            None => {
                self.index.insert(param.name.clone(), self.params.len());
                self.values.push(param.value);
                self.params.push(param);
            }
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn value(&self, name: &str) -> Option<T> {
        self.index_of(name).map(|i| self.values[i])
    }

    pub fn params(&self) -> &[Parameter<T>] {
        &self.params
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn set(&mut self, name: &str, value: T, mode: ValidationMode) -> DynamicsResult<()> {
        let i = self
            .index_of(name)
            .ok_or_else(|| DynamicsError::UnknownParameter(name.to_string()))?;
        if mode == ValidationMode::Checked {
            self.params[i].validate(value)?;
        }
        self.params[i].value = value;
        self.values[i] = value;
        Ok(())
    }
}

/// Serializable view of a [`ParameterSet`] for UI layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    pub bools: Vec<BoolParameter>,
    pub ints: Vec<IntParameter>,
    pub reals: Vec<RealParameter>,
    pub version: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    bools: ParameterList<bool>,
    ints: ParameterList<i32>,
    reals: ParameterList<f64>,
    version: u32,
    validation: ValidationMode,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Marks a change that owners want observers to notice.
    pub fn update_version(&mut self) -> u32 {
        self.version = self.version.wrapping_add(1);
        self.version
    }

    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    pub fn set_validation(&mut self, mode: ValidationMode) {
        self.validation = mode;
    }

    // --- registration ---

    pub fn add_bool_parameter(&mut self, param: BoolParameter) {
        self.bools.add(param);
    }

    pub fn add_int_parameter(&mut self, param: IntParameter) {
        self.ints.add(param);
    }

    pub fn add_real_parameter(&mut self, param: RealParameter) {
        self.reals.add(param);
    }

    // --- reads ---

    pub fn bool_value(&self, name: &str) -> DynamicsResult<bool> {
        self.bools
            .value(name)
            .ok_or_else(|| DynamicsError::UnknownParameter(name.to_string()))
    }

    pub fn int_value(&self, name: &str) -> DynamicsResult<i32> {
        self.ints
            .value(name)
            .ok_or_else(|| DynamicsError::UnknownParameter(name.to_string()))
    }

    pub fn real_value(&self, name: &str) -> DynamicsResult<f64> {
        self.reals
            .value(name)
            .ok_or_else(|| DynamicsError::UnknownParameter(name.to_string()))
    }

    pub fn bool_index(&self, name: &str) -> Option<usize> {
        self.bools.index_of(name)
    }

    pub fn int_index(&self, name: &str) -> Option<usize> {
        self.ints.index_of(name)
    }

    pub fn real_index(&self, name: &str) -> Option<usize> {
        self.reals.index_of(name)
    }

    pub fn bool_params(&self) -> &[BoolParameter] {
        self.bools.params()
    }

    pub fn int_params(&self) -> &[IntParameter] {
        self.ints.params()
    }

    pub fn real_params(&self) -> &[RealParameter] {
        self.reals.params()
    }

    pub fn bool_values(&self) -> &[bool] {
        self.bools.values()
    }

    pub fn int_values(&self) -> &[i32] {
        self.ints.values()
    }

    pub fn real_values(&self) -> &[f64] {
        self.reals.values()
    }

    // --- writes ---

    /// Sets a bool parameter and returns the new version.
    pub fn set_bool_value(&mut self, name: &str, value: bool) -> DynamicsResult<u32> {
        self.bools.set(name, value, self.validation)?;
        Ok(self.update_version())
    }

    /// Sets an int parameter and returns the new version.
    pub fn set_int_value(&mut self, name: &str, value: i32) -> DynamicsResult<u32> {
        self.ints.set(name, value, self.validation)?;
        Ok(self.update_version())
    }

    /// Sets a real parameter and returns the new version.
    pub fn set_real_value(&mut self, name: &str, value: f64) -> DynamicsResult<u32> {
        self.reals.set(name, value, self.validation)?;
        Ok(self.update_version())
    }

    pub fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            bools: self.bools.params().to_vec(),
            ints: self.ints.params().to_vec(),
            reals: self.reals.params().to_vec(),
            version: self.version,
        }
    }

    pub fn log_parameters(&self, owner: &str) {
        for p in self.bools.params() {
            debug!("{owner}: {} = {}", p.name, p.value);
        }
        for p in self.ints.params() {
            debug!("{owner}: {} = {}", p.name, p.value);
        }
        for p in self.reals.params() {
            debug!("{owner}: {} = {}", p.name, p.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_err_contains<T: std::fmt::Debug>(result: DynamicsResult<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    fn sample_set() -> ParameterSet {
        let mut set = ParameterSet::new();
        set.add_bool_parameter(Parameter::new("trace", false, false, true, false, true).unwrap());
        set.add_int_parameter(Parameter::new("axis", 1, -1, 3, 0, 1).unwrap());
        set.add_real_parameter(Parameter::new("sigma", 10.0, 0.0, 20.0, 10.0, 0.1).unwrap());
        set.add_real_parameter(Parameter::new("rho", 28.0, 0.0, 100.0, 28.0, 0.1).unwrap());
        set
    }

    #[test]
    fn constructor_rejects_out_of_range_value_and_default() {
        assert_err_contains(
            Parameter::new("sigma", 25.0, 0.0, 20.0, 10.0, 0.1),
            "outside its range",
        );
        assert_err_contains(
            Parameter::new("sigma", 10.0, 0.0, 20.0, -1.0, 0.1),
            "'sigma'",
        );
        assert!(Parameter::new("nan", f64::NAN, 0.0, 1.0, 0.0, 0.1).is_err());
        assert!(Parameter::new("edge", 20.0, 0.0, 20.0, 0.0, 0.1).is_ok());
    }

    #[test]
    fn set_then_get_round_trips_and_bumps_version_once() {
        let mut set = sample_set();

        let v0 = set.version();
        assert_eq!(set.set_real_value("rho", 14.5).unwrap(), v0 + 1);
        assert_eq!(set.real_value("rho").unwrap(), 14.5);
        assert_eq!(set.version(), v0 + 1);

        set.set_int_value("axis", 3).unwrap();
        assert_eq!(set.int_value("axis").unwrap(), 3);
        assert_eq!(set.version(), v0 + 2);

        set.set_bool_value("trace", true).unwrap();
        assert!(set.bool_value("trace").unwrap());
        assert_eq!(set.version(), v0 + 3);
    }

    #[test]
    fn values_mirror_tracks_canonical_entries() {
        let mut set = sample_set();
        set.set_real_value("sigma", 3.0).unwrap();
        assert_eq!(set.real_values(), &[3.0, 28.0]);
        assert_eq!(set.real_params()[0].value, 3.0);
    }

    #[test]
    fn re_adding_a_name_replaces_in_place() {
        let mut set = sample_set();
        set.add_real_parameter(Parameter::new("sigma", 5.0, 0.0, 50.0, 5.0, 0.5).unwrap());

        assert_eq!(set.real_params().len(), 2);
        assert_eq!(set.real_index("sigma"), Some(0));
        assert_eq!(set.real_values()[0], 5.0);
        assert_eq!(set.real_params()[0].max_value, 50.0);
    }

    #[test]
    fn index_lookup_returns_none_for_unknown_names() {
        let set = sample_set();
        assert_eq!(set.int_index("axis"), Some(0));
        assert_eq!(set.int_index("missing"), None);
        assert_eq!(set.bool_index("missing"), None);
        assert_eq!(set.real_index("rho"), Some(1));
    }

    #[test]
    fn unknown_names_fail_without_bumping_version() {
        let mut set = sample_set();
        let before = set.version();
        assert_err_contains(set.set_real_value("gamma", 1.0), "Unknown parameter 'gamma'");
        assert_err_contains(set.real_value("gamma"), "gamma");
        assert_eq!(set.version(), before);
    }

    #[test]
    fn unchecked_mode_trusts_the_caller() {
        let mut set = sample_set();
        set.set_real_value("sigma", -4.0).unwrap();
        assert_eq!(set.real_value("sigma").unwrap(), -4.0);
    }

    #[test]
    fn checked_mode_rejects_out_of_range_writes() {
        let mut set = sample_set();
        set.set_validation(ValidationMode::Checked);
        let before = set.version();

        assert_err_contains(set.set_real_value("sigma", -4.0), "outside its range");
        assert_eq!(set.real_value("sigma").unwrap(), 10.0);
        assert_eq!(set.version(), before);

        set.set_int_value("axis", -1).unwrap();
        assert_eq!(set.version(), before + 1);
    }

    #[test]
    fn snapshot_reflects_current_values() {
        let mut set = sample_set();
        set.set_real_value("rho", 20.0).unwrap();
        let snapshot = set.snapshot();
        assert_eq!(snapshot.reals[1].value, 20.0);
        assert_eq!(snapshot.ints.len(), 1);
        assert_eq!(snapshot.version, set.version());
    }
}
