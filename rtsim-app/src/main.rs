mod app;
mod session;

use app::App;
use rtsim_trial::SimulationConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };

    let app = App::new(config)?;
    app.run()?;

    Ok(())
}
