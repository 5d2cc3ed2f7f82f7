use lifraster::SimulationParams;

const USAGE: &str = "usage: lif_raster [PARAMS.json] [--json]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut params_path = None;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ if params_path.is_none() => params_path = Some(arg),
            _ => return Err(USAGE.into()),
        }
    }

    let params = match params_path {
        Some(path) => SimulationParams::from_json_file(path)?,
        None => SimulationParams::default(),
    };
    let experiment = lifraster::run(&params)?;

    if json {
        println!("{}", serde_json::to_string(&experiment.spike_times)?);
    } else {
        print!("{}", experiment.raster());
        for (neuron, count) in experiment.spike_times.spike_counts().iter().enumerate() {
            println!("{neuron}: {count}");
        }
    }
    Ok(())
}
