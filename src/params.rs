use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::neuron::LifParameters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub neuron_count: usize,
    pub timestep_count: usize,
    /// Current increment between neighbouring neurons.
    pub current_step: f32,
    pub lif: LifParameters,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            neuron_count: 10,
            timestep_count: 100,
            current_step: 0.2,
            lif: LifParameters::default(),
        }
    }
}

impl SimulationParams {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::ParseParams)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path).map_err(Error::ReadParams)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.neuron_count == 0 {
            return Err(Error::invalid("neuron_count", "must be greater than 0"));
        }
        if self.timestep_count == 0 {
            return Err(Error::invalid("timestep_count", "must be greater than 0"));
        }
        if !self.current_step.is_finite() {
            return Err(Error::invalid("current_step", "must be finite"));
        }
        if !((self.neuron_count - 1) as f32 * self.current_step).is_finite() {
            return Err(Error::invalid(
                "current_step",
                "current of the last neuron overflows",
            ));
        }
        self.lif.validate()
    }
}
