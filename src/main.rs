mod config;
mod error;
mod input;
mod stopwatch;
mod ticker;
mod ui;

use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::stopwatch::{Command, Event, Session};

const APP_NAME: &str = "Stopwatch";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::default();
    env_logger::Builder::new()
        .filter_level(config.log_level)
        .init();
    log::info!("{} starting, tick quantum {:?}", APP_NAME, config.tick_quantum);

    let (events_tx, events_rx) = mpsc::channel(config.event_queue_depth);
    let session = Session::new(&config, events_tx.clone());

    let renderer = tokio::spawn(ui::run_renderer(
        tokio::io::stdout(),
        session.subscribe(),
        session.subscribe_theme(),
    ));

    // Input ends the session on `q`, at end of input, or on a read error.
    let input = tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = input::read_commands(stdin, events_tx.clone()).await {
            log::error!("input failed: {}", e);
        }
        events_tx.send(Event::Command(Command::Quit)).await.ok();
    });

    session.run(events_rx).await;

    if let Err(e) = input.await {
        log::error!("input task failed: {}", e);
    }
    match renderer.await {
        Ok(result) => result?,
        Err(e) => log::error!("renderer task failed: {}", e),
    }

    log::info!("{} exiting", APP_NAME);
    Ok(())
}
