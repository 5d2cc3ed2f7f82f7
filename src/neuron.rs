use std::marker::PhantomData;

use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_DECAY, DEFAULT_THRESHOLD, Error};

/// A population update rule.
///
/// `step` receives one time step of input currents and the state returned by
/// the previous call, or `None` on the first time step in which case the model
/// starts from its reset state. It returns which neurons spiked together with
/// the next state.
pub trait NeuronModel {
    type State: Clone;

    fn step(
        &self,
        input: ArrayView1<f32>,
        state: Option<&Self::State>,
    ) -> Result<(Array1<bool>, Self::State), StepError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepError {
    #[error("Expected {expected} neurons, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },
    #[error("Non-finite input current for neuron {neuron}")]
    NonFiniteInput { neuron: usize },
    #[error("{0}")]
    Custom(String),
}

fn check_input(input: &ArrayView1<f32>, expected: Option<usize>) -> Result<(), StepError> {
    if let Some(expected) = expected {
        if input.len() != expected {
            return Err(StepError::WidthMismatch {
                expected,
                actual: input.len(),
            });
        }
    }
    match input.iter().position(|c| !c.is_finite()) {
        Some(neuron) => Err(StepError::NonFiniteInput { neuron }),
        None => Ok(()),
    }
}

/// Parameters of the current-based leaky integrate-and-fire cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifParameters {
    /// Inverse synaptic time constant (1/s).
    pub tau_syn_inv: f32,
    /// Inverse membrane time constant (1/s).
    pub tau_mem_inv: f32,
    pub v_leak: f32,
    pub v_th: f32,
    pub v_reset: f32,
    /// Integration time step (s).
    pub dt: f32,
}

impl Default for LifParameters {
    fn default() -> Self {
        Self {
            tau_syn_inv: 200f32,
            tau_mem_inv: 100f32,
            v_leak: 0f32,
            v_th: 1f32,
            v_reset: 0f32,
            dt: 1e-3_f32,
        }
    }
}

impl LifParameters {
    pub fn validate(&self) -> Result<(), Error> {
        let fields = [
            ("tau_syn_inv", self.tau_syn_inv),
            ("tau_mem_inv", self.tau_mem_inv),
            ("v_leak", self.v_leak),
            ("v_th", self.v_th),
            ("v_reset", self.v_reset),
            ("dt", self.dt),
        ];
        if let Some((name, value)) = fields.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::invalid(name, format!("must be finite, got {value}")));
        }
        if self.dt <= 0f32 {
            return Err(Error::invalid("dt", "must be strictly positive"));
        }
        if self.tau_syn_inv <= 0f32 {
            return Err(Error::invalid("tau_syn_inv", "must be strictly positive"));
        }
        if self.tau_mem_inv <= 0f32 {
            return Err(Error::invalid("tau_mem_inv", "must be strictly positive"));
        }
        if self.v_reset >= self.v_th {
            return Err(Error::invalid("v_reset", "must be less than v_th"));
        }
        Ok(())
    }
}

/// Membrane potential `v` and synaptic current `i` of every neuron.
#[derive(Debug, Clone, PartialEq)]
pub struct LifState {
    pub v: Array1<f32>,
    pub i: Array1<f32>,
}

impl LifState {
    fn reset(p: &LifParameters, size: usize) -> Self {
        Self {
            v: Array1::from_elem(size, p.v_leak),
            i: Array1::zeros(size),
        }
    }
}

/// Leaky integrate-and-fire population with a current-based synapse.
///
/// The input of a time step is added to the synaptic current after the
/// membrane update, so it first influences the membrane on the next step.
#[derive(Debug, Clone, Default)]
pub struct LifCell {
    pub p: LifParameters,
}

impl LifCell {
    pub fn new(p: LifParameters) -> Self {
        Self { p }
    }
}

impl NeuronModel for LifCell {
    type State = LifState;

    fn step(
        &self,
        input: ArrayView1<f32>,
        state: Option<&LifState>,
    ) -> Result<(Array1<bool>, LifState), StepError> {
        check_input(&input, state.map(|s| s.v.len()))?;
        let reset;
        let state = match state {
            Some(state) => state,
            None => {
                reset = LifState::reset(&self.p, input.len());
                &reset
            }
        };
        let p = &self.p;

        // Integrate.
        let dv = p.dt * p.tau_mem_inv;
        let v_decayed = Zip::from(&state.v)
            .and(&state.i)
            .map_collect(|&v, &i| v + dv * ((p.v_leak - v) + i));
        let di = p.dt * p.tau_syn_inv;
        let i_decayed = state.i.mapv(|i| i - di * i);

        // Fire and reset.
        let spiked = v_decayed.mapv(|v| v > p.v_th);
        let v = Zip::from(&v_decayed)
            .and(&spiked)
            .map_collect(|&v, &z| if z { p.v_reset } else { v });
        let i = i_decayed + &input;

        Ok((spiked, LifState { v, i }))
    }
}

/// First-order leaky neuron without a synaptic current.
///
/// Spikes are read from the membrane potential left by the previous step and
/// the threshold is subtracted from neurons that spiked.
#[derive(Debug, Clone)]
pub struct Leaky {
    pub decay: f32,
    pub threshold: f32,
}

impl Default for Leaky {
    fn default() -> Self {
        Self {
            decay: DEFAULT_DECAY,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl NeuronModel for Leaky {
    /// Membrane potentials.
    type State = Array1<f32>;

    fn step(
        &self,
        input: ArrayView1<f32>,
        state: Option<&Array1<f32>>,
    ) -> Result<(Array1<bool>, Array1<f32>), StepError> {
        check_input(&input, state.map(|s| s.len()))?;
        let membrane_potential = match state {
            Some(m) => m.clone(),
            None => Array1::zeros(input.len()),
        };

        let spiked = membrane_potential.mapv(|m| m > self.threshold);
        let reset = spiked.mapv(|z| z as u8 as f32 * self.threshold);
        let membrane_potential = self.decay * (membrane_potential - reset) + &input;

        Ok((spiked, membrane_potential))
    }
}

/// Wraps a closure as a [`NeuronModel`].
pub struct FnModel<F, S> {
    f: F,
    _state: PhantomData<fn() -> S>,
}

impl<F, S> FnModel<F, S>
where
    F: Fn(ArrayView1<f32>, Option<&S>) -> Result<(Array1<bool>, S), StepError>,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _state: PhantomData,
        }
    }
}

impl<F, S> NeuronModel for FnModel<F, S>
where
    F: Fn(ArrayView1<f32>, Option<&S>) -> Result<(Array1<bool>, S), StepError>,
    S: Clone,
{
    type State = S;

    fn step(
        &self,
        input: ArrayView1<f32>,
        state: Option<&S>,
    ) -> Result<(Array1<bool>, S), StepError> {
        (self.f)(input, state)
    }
}
