use std::fmt::Write;

use crate::spikes::SpikeTimes;

const SPIKE: char = '|';
const SILENT: char = '.';

/// Renders an event plot of `times` as text.
///
/// One track per neuron with neuron 0 on the bottom line and time running
/// left to right, e.g.
/// ```text
/// 2 ..|..|
/// 1 .....|
/// 0 ......
/// ```
/// Spikes at or beyond `timestep_count` are not drawn.
pub fn render(times: &SpikeTimes, timestep_count: usize) -> String {
    let label_width = times.neuron_count().saturating_sub(1).to_string().len();
    let mut out = String::new();
    for (neuron, train) in times.iter().enumerate().rev() {
        let mut track = vec![SILENT; timestep_count];
        for &t in train.iter().filter(|&&t| t < timestep_count) {
            track[t] = SPIKE;
        }
        let track: String = track.into_iter().collect();
        // Writing to a `String` can't fail.
        let _ = writeln!(out, "{neuron:>label_width$} {track}");
    }
    out
}
