//! Descriptive metadata for the axes of a model's state space.
//!
//! Nothing here is enforced during integration: defaults fill axes a display
//! transform does not cover, and ranges only guide the initial view.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub name: String,
    pub default_value: f64,
    pub min_value: f64,
    pub max_value: f64,
}

impl Coordinate {
    pub fn new(
        name: impl Into<String>,
        default_value: f64,
        min_value: f64,
        max_value: f64,
    ) -> Self {
        Self {
            name: name.into(),
            default_value,
            min_value,
            max_value,
        }
    }

    /// An unbounded-above axis starting at zero, used for integrated time.
    pub fn time(name: impl Into<String>) -> Self {
        Self::new(name, 0.0, 0.0, f64::INFINITY)
    }

    pub fn span(&self) -> f64 {
        self.max_value - self.min_value
    }
}

#[derive(Debug, Clone, Default)]
pub struct CoordinateSet {
    coords: Vec<Coordinate>,
    index: HashMap<String, usize>,
}

impl CoordinateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `coord`, or replaces the axis with the same name in place.
    pub fn add(&mut self, coord: Coordinate) {
        match self.index.get(&coord.name) {
            Some(&i) => self.coords[i] = coord,
            None => {
                self.index.insert(coord.name.clone(), self.coords.len());
                self.coords.push(coord);
            }
        }
    }

    pub fn coords(&self) -> &[Coordinate] {
        &self.coords
    }

    pub fn get(&self, index: usize) -> Option<&Coordinate> {
        self.coords.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}
