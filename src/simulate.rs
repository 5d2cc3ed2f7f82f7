use ndarray::Array2;

use crate::Error;
use crate::neuron::{NeuronModel, StepError};
use crate::spikes::SpikeMatrix;
use crate::stimulus::CurrentGrid;

/// Steps `model` through every time step of `grid` in order and collects
/// which neurons spiked.
///
/// The state returned for time step `t` is passed to time step `t + 1`. If the
/// model fails the whole run fails and no spikes are returned.
pub fn simulate<M: NeuronModel>(grid: &CurrentGrid, model: &M) -> Result<SpikeMatrix, Error> {
    run(grid, model, |_| {})
}

/// Like [`simulate`], but also returns the state after every time step.
pub fn simulate_recorded<M: NeuronModel>(
    grid: &CurrentGrid,
    model: &M,
) -> Result<(SpikeMatrix, Vec<M::State>), Error> {
    let mut states = Vec::with_capacity(grid.timestep_count());
    let spikes = run(grid, model, |state| states.push(state.clone()))?;
    Ok((spikes, states))
}

fn run<M: NeuronModel>(
    grid: &CurrentGrid,
    model: &M,
    mut record: impl FnMut(&M::State),
) -> Result<SpikeMatrix, Error> {
    let (timesteps, neurons) = (grid.timestep_count(), grid.neuron_count());
    log::debug!("simulating {neurons} neurons for {timesteps} time steps");

    let mut spikes = Array2::from_elem((timesteps, neurons), false);
    let mut state: Option<M::State> = None;
    for (t, input) in grid.rows().enumerate() {
        let (spiked, next) = model
            .step(input, state.as_ref())
            .and_then(|(spiked, next)| {
                if spiked.len() == neurons {
                    Ok((spiked, next))
                } else {
                    Err(StepError::WidthMismatch {
                        expected: neurons,
                        actual: spiked.len(),
                    })
                }
            })
            .map_err(|source| {
                log::warn!("neuron update failed at time step {t}: {source}");
                Error::StepFailure {
                    timestep: t,
                    source,
                }
            })?;
        log::trace!("t={t}: {} spikes", spiked.iter().filter(|&&z| z).count());

        spikes.row_mut(t).assign(&spiked);
        record(&next);
        state = Some(next);
    }

    let spikes = SpikeMatrix::from_array(spikes);
    log::debug!("simulation finished with {} spikes", spikes.total_spikes());
    Ok(spikes)
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, ArrayView1, array};

    use super::*;
    use crate::neuron::{FnModel, Leaky, LifCell};

    /// Spikes every neuron whose accumulated input exceeds 1, returning the
    /// running sum as state.
    struct Accumulator;

    impl NeuronModel for Accumulator {
        type State = Array1<f32>;

        fn step(
            &self,
            input: ArrayView1<f32>,
            sum: Option<&Array1<f32>>,
        ) -> Result<(Array1<bool>, Array1<f32>), StepError> {
            let sum = match sum {
                Some(sum) => sum + &input,
                None => input.to_owned(),
            };
            Ok((sum.mapv(|s| s > 1f32), sum))
        }
    }

    #[test]
    fn shape_matches_grid() {
        let grid = CurrentGrid::generate(10, 100, 0.2).unwrap();
        let spikes = simulate(&grid, &LifCell::default()).unwrap();
        assert_eq!(spikes.timestep_count(), 100);
        assert_eq!(spikes.neuron_count(), 10);
    }

    #[test]
    fn state_is_threaded_in_order() {
        let grid = CurrentGrid::from_array(array![[0.5f32], [0.25], [0.5], [0f32]]).unwrap();
        let (spikes, states) = simulate_recorded(&grid, &Accumulator).unwrap();
        assert_eq!(
            states.iter().map(|s| s[0]).collect::<Vec<_>>(),
            vec![0.5, 0.75, 1.25, 1.25]
        );
        assert_eq!(spikes.spike_times().neuron(0), Some(&[2, 3][..]));
    }

    #[test]
    fn first_step_gets_no_state() {
        let model = FnModel::new(|input: ArrayView1<f32>, state: Option<&usize>| {
            let steps = match state {
                None => 0,
                Some(s) => s + 1,
            };
            Ok((input.mapv(|_| steps == 0), steps))
        });
        let grid = CurrentGrid::generate(3, 1, 1f32).unwrap();
        let (spikes, states) = simulate_recorded(&grid, &model).unwrap();
        assert_eq!(spikes.timestep_count(), 1);
        assert_eq!(spikes.total_spikes(), 3);
        assert_eq!(states, vec![0]);
    }

    #[test]
    fn failure_reports_time_step() {
        let mut currents = Array2::from_elem((20, 4), 0.5f32);
        currents[(7, 2)] = f32::NAN;
        let grid = CurrentGrid::from_array(currents).unwrap();
        match simulate(&grid, &LifCell::default()) {
            Err(Error::StepFailure { timestep, source }) => {
                assert_eq!(timestep, 7);
                assert_eq!(source, StepError::NonFiniteInput { neuron: 2 });
            }
            other => panic!("expected step failure, got {other:?}"),
        }
    }

    #[test]
    fn failure_on_first_step() {
        let model = FnModel::new(|_: ArrayView1<f32>, _: Option<&()>| {
            Err::<(Array1<bool>, ()), _>(StepError::Custom("boom".into()))
        });
        let grid = CurrentGrid::generate(2, 5, 1f32).unwrap();
        assert!(matches!(
            simulate(&grid, &model),
            Err(Error::StepFailure { timestep: 0, .. })
        ));
    }

    #[test]
    fn wrong_spike_width_is_a_failure() {
        let model = FnModel::new(|_: ArrayView1<f32>, _: Option<&()>| Ok((array![true], ())));
        let grid = CurrentGrid::generate(3, 2, 1f32).unwrap();
        match simulate(&grid, &model) {
            Err(Error::StepFailure { timestep, source }) => {
                assert_eq!(timestep, 0);
                assert_eq!(
                    source,
                    StepError::WidthMismatch {
                        expected: 3,
                        actual: 1
                    }
                );
            }
            other => panic!("expected step failure, got {other:?}"),
        }
    }

    #[test]
    fn leaky_population() {
        let grid = CurrentGrid::generate(3, 30, 0.5).unwrap();
        let times = simulate(&grid, &Leaky::default()).unwrap().spike_times();
        assert!(times.neuron(0).unwrap().is_empty());
        assert!(!times.neuron(1).unwrap().is_empty());
        assert!(times.neuron(2).unwrap().len() > times.neuron(1).unwrap().len());
    }

    #[test]
    fn single_neuron() {
        let grid = CurrentGrid::generate(1, 50, 3f32).unwrap();
        let spikes = simulate(&grid, &LifCell::default()).unwrap();
        assert_eq!(spikes.neuron_count(), 1);
        assert_eq!(spikes.total_spikes(), 0);
    }
}
