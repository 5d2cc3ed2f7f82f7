use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Spikes of shape `[time steps x neurons]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeMatrix(Array2<bool>);

impl SpikeMatrix {
    pub(crate) fn from_array(spikes: Array2<bool>) -> Self {
        Self(spikes)
    }

    /// Builds a matrix from row-oriented frames, one per time step.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self, Error> {
        let Some(first) = rows.first() else {
            return Err(Error::MalformedMatrix("no time steps".into()));
        };
        let width = first.as_ref().len();
        if width == 0 {
            return Err(Error::MalformedMatrix("no neurons".into()));
        }
        let mut flat = Vec::with_capacity(rows.len() * width);
        for (timestep, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(Error::MalformedMatrix(format!(
                    "time step {timestep} has {} neurons, expected {width}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }
        Array2::from_shape_vec((rows.len(), width), flat)
            .map(Self)
            .map_err(|e| Error::MalformedMatrix(e.to_string()))
    }

    /// Inverse of [`SpikeMatrix::spike_times`].
    pub fn from_spike_times(times: &SpikeTimes, timestep_count: usize) -> Result<Self, Error> {
        if timestep_count == 0 || times.neuron_count() == 0 {
            return Err(Error::MalformedMatrix("empty shape".into()));
        }
        let mut spikes = Array2::from_elem((timestep_count, times.neuron_count()), false);
        for (neuron, train) in times.iter().enumerate() {
            for &t in train {
                let cell = spikes.get_mut((t, neuron)).ok_or_else(|| {
                    Error::MalformedMatrix(format!(
                        "neuron {neuron} spikes at {t}, beyond {timestep_count} time steps"
                    ))
                })?;
                *cell = true;
            }
        }
        Ok(Self(spikes))
    }

    pub fn timestep_count(&self) -> usize {
        self.0.nrows()
    }

    pub fn neuron_count(&self) -> usize {
        self.0.ncols()
    }

    pub fn spiked(&self, timestep: usize, neuron: usize) -> Option<bool> {
        self.0.get((timestep, neuron)).copied()
    }

    /// The spike frame of a single time step.
    pub fn row(&self, timestep: usize) -> ArrayView1<'_, bool> {
        self.0.row(timestep)
    }

    pub fn as_array(&self) -> &Array2<bool> {
        &self.0
    }

    pub fn total_spikes(&self) -> usize {
        self.0.iter().filter(|&&z| z).count()
    }

    /// Transposes the matrix into ascending spike times per neuron.
    pub fn spike_times(&self) -> SpikeTimes {
        let trains: Vec<Vec<usize>> = self
            .0
            .axis_iter(Axis(1))
            .map(|neuron| {
                neuron
                    .iter()
                    .enumerate()
                    .filter_map(|(t, &z)| z.then_some(t))
                    .collect()
            })
            .collect();
        SpikeTimes(trains)
    }
}

/// Row-oriented equivalent of [`SpikeMatrix::spike_times`].
pub fn to_spike_times<R: AsRef<[bool]>>(rows: &[R]) -> Result<SpikeTimes, Error> {
    SpikeMatrix::from_rows(rows).map(|m| m.spike_times())
}

/// For every neuron, the time steps at which it spiked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpikeTimes(Vec<Vec<usize>>);

impl SpikeTimes {
    pub fn neuron_count(&self) -> usize {
        self.0.len()
    }

    pub fn neuron(&self, neuron: usize) -> Option<&[usize]> {
        self.0.get(neuron).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &[usize]> + ExactSizeIterator {
        self.0.iter().map(Vec::as_slice)
    }

    pub fn spike_counts(&self) -> Vec<usize> {
        self.0.iter().map(Vec::len).collect()
    }

    /// Spikes per time step for each neuron, `None` for a zero duration.
    pub fn firing_rates(&self, timestep_count: usize) -> Option<Vec<f32>> {
        if timestep_count == 0 {
            return None;
        }
        let rates = self
            .0
            .iter()
            .map(|train| train.len() as f32 / timestep_count as f32)
            .collect();
        Some(rates)
    }

    pub fn into_inner(self) -> Vec<Vec<usize>> {
        self.0
    }
}
