mod command;
mod render;

use std::io::BufRead;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use owl_core::Config;
use owl_ui::{AppServices, ForecastModel, SearchModel};

use command::{Command, HELP};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let config = Config::load()?;
    owl_core::init_with_level(&config.logging.level)?;
    config.check()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("owl-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    let services = AppServices::new(&config, runtime.handle().clone())?;
    let units = services.provider().units();

    let mut search = SearchModel::new(services.clone());
    let mut forecast = ForecastModel::new(services.clone());
    forecast.subscribe(move |model| {
        let status = render::forecast_status(model, units);
        if !status.is_empty() {
            println!("{}", status);
        }
    });

    tracing::info!("Owl started (config: {})", config.config_dir.display());
    println!("Owl - current conditions from OpenWeather");
    println!("{}", HELP);

    match forecast.restore_last_search() {
        Some(location) => search.restore(&location),
        None => println!("Search for a place to get started."),
    }

    let lines = spawn_stdin_reader();
    loop {
        match lines.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                if !handle_line(&line, &mut search, &mut forecast) {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        if search.poll_channel() && search.is_expanded() {
            println!("{}", render::suggestions(&search));
        }
        forecast.poll_channel();
    }

    if let Err(e) = forecast.persist_last_search() {
        tracing::warn!("Failed to save last search: {}", e);
    }
    search.end_session();
    services.shutdown();
    runtime.shutdown_timeout(Duration::from_secs(1));

    Ok(())
}

/// Returns false when the user asked to quit.
fn handle_line(line: &str, search: &mut SearchModel, forecast: &mut ForecastModel) -> bool {
    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            return true;
        }
    };

    match command {
        Command::Edit(text) => search.set_text(text),
        Command::Submit(text) => {
            if forecast.submit_query(&text) {
                search.collapse();
            }
        }
        Command::Pick(n) => match search.suggestion(n - 1).cloned() {
            Some(location) => {
                search.restore(&location);
                forecast.select(location);
            }
            None => println!("No suggestion {}", n),
        },
        Command::Here {
            latitude,
            longitude,
        } => forecast.use_coordinates(latitude, longitude),
        Command::NoLocation(reason) => forecast.location_failed(reason),
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}

/// Stdin is read on its own thread so the UI loop keeps polling.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
