use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};

use crate::app::{Clock, Peripherals, volume_from_level};
use crate::audio::Transport;
use crate::runtime::keyboard::{self, KeyAction, Panel};
use crate::runtime::startup::{Session, Tui};
use crate::ui::{self, Status};

/// Main-loop period.
const TICK: Duration = Duration::from_millis(20);

/// Poll keys, tick the machine and draw until the user quits.
pub fn run(
    terminal: &mut Tui,
    session: &mut Session,
    clock: &dyn Clock,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut panel = Panel::new(&session.controls, session.app.autoplay());

    loop {
        let deadline = Instant::now() + TICK;
        while let Some(left) = deadline.checked_duration_since(Instant::now()) {
            if !event::poll(left)? {
                break;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match keyboard::map_key(key) {
                Some(KeyAction::Quit) => return Ok(()),
                Some(action) => panel.apply(action),
                None => {}
            }
        }

        let now = clock.now_ms();
        let inputs = panel.take_inputs(now);
        {
            let Session {
                app,
                storage,
                lcd,
                player,
                no_output,
                ..
            } = &mut *session;
            let transport: &mut dyn Transport = match player.as_mut() {
                Some(player) => player,
                None => no_output,
            };
            let mut io = Peripherals {
                storage: &*storage,
                transport,
                display: lcd,
            };
            app.tick(now, inputs, &mut io);
        }

        let info = session.player.as_ref().and_then(|p| p.info());
        let status = Status {
            state: session.app.state(),
            autoplay: session.app.autoplay(),
            volume: info
                .as_ref()
                .map_or_else(|| volume_from_level(panel.knob()), |i| i.volume),
            albums: session.app.catalog().len(),
            output: info.and_then(|i| {
                let name = i.path?.file_name()?.to_string_lossy().into_owned();
                Some((name, i.paused))
            }),
        };
        terminal.draw(|f| ui::draw(f, &session.lcd, &status))?;
    }
}
