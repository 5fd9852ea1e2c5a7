use serde::Serialize;

use crate::model::{Dataset, Parameter};
use crate::value::Value;

/// One exchange payload: ordered parameters and ordered datasets.
///
/// Ids are not required to be unique; lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XapiRoot {
    parameters: Vec<Parameter>,
    datasets: Vec<Dataset>,
}

impl XapiRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dataset(&mut self, dataset: Dataset) {
        self.datasets.push(dataset);
    }

    pub fn get_dataset(&self, id: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|dataset| dataset.id == id)
    }

    pub fn get_dataset_mut(&mut self, id: &str) -> Option<&mut Dataset> {
        self.datasets.iter_mut().find(|dataset| dataset.id == id)
    }

    pub fn add_parameter(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    pub fn get_parameter(&self, id: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|param| param.id == id)
    }

    /// Replaces the whole parameter list.
    pub fn set_parameters(&mut self, parameters: Vec<Parameter>) {
        self.parameters = parameters;
    }

    /// Updates the value of the first parameter with `id`, or appends an
    /// untyped parameter when there is none.
    pub fn set_parameter(&mut self, id: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.parameters.iter_mut().find(|param| param.id == id) {
            Some(param) => param.value = Some(value),
            None => self.parameters.push(Parameter::new(id, value)),
        }
    }

    pub fn iter_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn iter_datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    pub fn iter_datasets_mut(&mut self) -> impl Iterator<Item = &mut Dataset> {
        self.datasets.iter_mut()
    }

    pub fn parameter_size(&self) -> usize {
        self.parameters.len()
    }

    pub fn dataset_size(&self) -> usize {
        self.datasets.len()
    }
}
