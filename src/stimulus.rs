use ndarray::{Array2, ArrayView1, Axis};

use crate::Error;

/// Input currents of shape `[time steps x neurons]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentGrid(Array2<f32>);

impl CurrentGrid {
    /// Constant current stimulus where neuron `n` receives `n * step` at every
    /// time step.
    ///
    /// Returns a grid of shape `[timestep_count x neuron_count]`.
    pub fn generate(neuron_count: usize, timestep_count: usize, step: f32) -> Result<Self, Error> {
        if neuron_count == 0 {
            return Err(Error::invalid("neuron_count", "must be greater than 0"));
        }
        if timestep_count == 0 {
            return Err(Error::invalid("timestep_count", "must be greater than 0"));
        }
        if !step.is_finite() {
            return Err(Error::invalid("step", format!("must be finite, got {step}")));
        }
        let top_current = (neuron_count - 1) as f32 * step;
        if !top_current.is_finite() {
            return Err(Error::invalid(
                "step",
                format!("current of neuron {} overflows", neuron_count - 1),
            ));
        }

        let grid = Array2::from_shape_fn((timestep_count, neuron_count), |(_, n)| n as f32 * step);
        log::debug!("generated {timestep_count}x{neuron_count} current grid, top current {top_current}");
        Ok(Self(grid))
    }

    /// Wraps an arbitrary stimulus, e.g. a perturbed copy of a generated grid.
    pub fn from_array(currents: Array2<f32>) -> Result<Self, Error> {
        let (timesteps, neurons) = currents.dim();
        if timesteps == 0 {
            return Err(Error::invalid("currents", "has no time steps"));
        }
        if neurons == 0 {
            return Err(Error::invalid("currents", "has no neurons"));
        }
        Ok(Self(currents))
    }

    pub fn timestep_count(&self) -> usize {
        self.0.nrows()
    }

    pub fn neuron_count(&self) -> usize {
        self.0.ncols()
    }

    pub fn current(&self, timestep: usize, neuron: usize) -> Option<f32> {
        self.0.get((timestep, neuron)).copied()
    }

    /// The input vector for a single time step.
    pub fn row(&self, timestep: usize) -> ArrayView1<'_, f32> {
        self.0.row(timestep)
    }

    /// Input vectors in time step order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = ArrayView1<'_, f32>> {
        self.0.axis_iter(Axis(0))
    }

    pub fn as_array(&self) -> &Array2<f32> {
        &self.0
    }

    pub fn into_array(self) -> Array2<f32> {
        self.0
    }
}
