//! Drive a population of spiking neurons with a constant current stimulus and
//! turn the resulting spikes into per-neuron spike trains for an event plot.

pub mod error;
pub mod experiment;
pub mod neuron;
pub mod params;
pub mod raster;
pub mod simulate;
pub mod spikes;
pub mod stimulus;

pub use error::Error;
pub use experiment::{Experiment, run};
pub use neuron::{FnModel, Leaky, LifCell, LifParameters, LifState, NeuronModel, StepError};
pub use params::SimulationParams;
pub use simulate::{simulate, simulate_recorded};
pub use spikes::{SpikeMatrix, SpikeTimes, to_spike_times};
pub use stimulus::CurrentGrid;

const DEFAULT_DECAY: f32 = 0.8f32;
const DEFAULT_THRESHOLD: f32 = 1f32;
