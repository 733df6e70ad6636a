use anyhow::Result;
use clap::Parser;

use pattern_probe::app::PatternProbeApp;
use pattern_probe::config::{Args, RunConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("pattern_probe=info"))
        .init();

    let config = RunConfig::from(Args::parse());
    log::debug!("{config:?}");

    let app = PatternProbeApp::new(config);
    let stdout = std::io::stdout();
    app.run(&mut stdout.lock())?;
    Ok(())
}
