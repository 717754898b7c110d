mod api;
mod app;
mod config;
mod logging;
mod model;
mod runtime;
mod ui;

use anyhow::Result;
use std::sync::mpsc;

use api::spawn_api_worker;
use app::App;
use config::parse_args;
use logging::init as init_logging;
use model::Units;
use runtime::{init_terminal, restore_terminal, run_app};
use tracing::{debug, info, warn};

fn main() -> Result<()> {
    let config = parse_args()?;
    let _log_guard = init_logging(&config);
    info!("flightlog-tui starting");
    debug!("config path: {}", config.config_path.display());

    let units = Units::from_setting(&config.metric_units);
    let (event_tx, event_rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_api_worker(
        config.base_url.clone(),
        units,
        config.timeout(),
        config.insecure,
        event_tx,
        cmd_rx,
    );

    let mut terminal = init_terminal()?;
    let res = run_app(&mut terminal, App::new(units, cmd_tx), event_rx);
    restore_terminal(&mut terminal)?;

    if let Err(err) = res {
        warn!("runtime error: {err}");
        eprintln!("{err}");
    }

    info!("flightlog-tui exited");
    Ok(())
}
