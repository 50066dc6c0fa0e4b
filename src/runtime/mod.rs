//! Desktop host: wires settings, logging, the terminal display, the keyboard
//! and the audio output around the state machine.

use std::env;

use tracing::info;

use crate::app::MonotonicClock;

mod event_loop;
mod keyboard;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    logging::init(&settings.logging);

    let root = startup::library_root(env::args().nth(1), &settings)?;
    info!(root = %root.display(), "starting");

    let mut terminal = startup::open_terminal()?;
    let clock = MonotonicClock::new();
    let mut session = startup::boot(root, settings, &clock);

    let run_result = event_loop::run(&mut terminal, &mut session, &clock);

    session.shutdown();
    startup::close_terminal(&mut terminal)?;
    info!("stopped");

    run_result
}
