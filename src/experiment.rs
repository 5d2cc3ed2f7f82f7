use crate::Error;
use crate::neuron::LifCell;
use crate::params::SimulationParams;
use crate::raster;
use crate::simulate::simulate;
use crate::spikes::{SpikeMatrix, SpikeTimes};
use crate::stimulus::CurrentGrid;

/// Everything produced by one run of the pipeline.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub grid: CurrentGrid,
    pub spikes: SpikeMatrix,
    pub spike_times: SpikeTimes,
}

impl Experiment {
    pub fn raster(&self) -> String {
        raster::render(&self.spike_times, self.spikes.timestep_count())
    }
}

/// Generates the stimulus described by `params`, drives a [`LifCell`]
/// population with it and regroups the spikes per neuron.
pub fn run(params: &SimulationParams) -> Result<Experiment, Error> {
    params.validate()?;
    let grid = CurrentGrid::generate(
        params.neuron_count,
        params.timestep_count,
        params.current_step,
    )?;
    let spikes = simulate(&grid, &LifCell::new(params.lif))?;
    let spike_times = spikes.spike_times();
    log::info!(
        "{} neurons fired {} spikes over {} time steps",
        spike_times.spike_counts().iter().filter(|&&c| c > 0).count(),
        spikes.total_spikes(),
        spikes.timestep_count()
    );
    Ok(Experiment {
        grid,
        spikes,
        spike_times,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run() {
        let experiment = run(&SimulationParams::default()).unwrap();
        assert_eq!(experiment.spike_times.neuron_count(), 10);
        let plot = experiment.raster();
        assert_eq!(plot.lines().count(), 10);
        assert!(plot.lines().all(|line| line.len() == 2 + 100));
        assert!(plot.lines().last().unwrap().ends_with(&".".repeat(100)));
    }

    #[test]
    fn rejects_invalid_params() {
        let params = SimulationParams {
            timestep_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            run(&params),
            Err(Error::InvalidParameter {
                name: "timestep_count",
                ..
            })
        ));
    }

    #[test]
    fn overflowing_stimulus_fails_before_simulation() {
        let params = SimulationParams {
            neuron_count: 3,
            timestep_count: 2,
            current_step: f32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            run(&params),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
