use thiserror::Error;

use crate::neuron::StepError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Neuron update failed at timestep {timestep}: {source}")]
    StepFailure {
        timestep: usize,
        #[source]
        source: StepError,
    },
    #[error("Malformed spike matrix: {0}")]
    MalformedMatrix(String),
    #[error("Failed to read parameters: {0}")]
    ReadParams(std::io::Error),
    #[error("Failed to parse parameters: {0}")]
    ParseParams(serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
