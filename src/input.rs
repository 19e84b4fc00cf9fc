use crate::view::Direction;
use chrono::{DateTime, Timelike, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    StepTime(Direction),
    ResetToLive,
    SelectNext,
    SelectPrevious,
    ClearSelection,
    ToggleHelp,
    Quit,
}

/// Single source of truth for key handling; the help overlay text mirrors it.
pub(crate) static KEY_BINDINGS: &[(KeyCode, Command)] = &[
    (KeyCode::Char('h'), Command::StepTime(Direction::Back)),
    (KeyCode::Left, Command::StepTime(Direction::Back)),
    (KeyCode::Char('l'), Command::StepTime(Direction::Forward)),
    (KeyCode::Right, Command::StepTime(Direction::Forward)),
    (KeyCode::Char('n'), Command::ResetToLive),
    (KeyCode::Char('j'), Command::SelectNext),
    (KeyCode::Down, Command::SelectNext),
    (KeyCode::Char('k'), Command::SelectPrevious),
    (KeyCode::Up, Command::SelectPrevious),
    (KeyCode::Char('c'), Command::ClearSelection),
    (KeyCode::Esc, Command::ClearSelection),
    (KeyCode::Char('?'), Command::ToggleHelp),
    (KeyCode::Char('q'), Command::Quit),
];

pub(crate) fn lookup(key: KeyCode) -> Option<Command> {
    KEY_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, cmd)| *cmd)
}

/// Why the main loop woke up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Wake {
    Key(KeyCode),
    Resize,
    Timer,
}

pub(crate) trait EventSource {
    /// Blocks until a key press, a resize or the timeout. `None` waits for
    /// input indefinitely.
    fn next_wake(&mut self, timeout: Option<Duration>) -> anyhow::Result<Wake>;
}

/// Reads from the real terminal.
pub(crate) struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_wake(&mut self, timeout: Option<Duration>) -> anyhow::Result<Wake> {
        loop {
            if let Some(t) = timeout {
                if !event::poll(t)? {
                    return Ok(Wake::Timer);
                }
            }
            match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Press => return Ok(Wake::Key(k.code)),
                Event::Resize(..) => return Ok(Wake::Resize),
                _ => {}
            }
        }
    }
}

/// Time left until the wall clock reaches the next whole minute.
pub(crate) fn until_next_minute(now: DateTime<Utc>) -> Duration {
    let elapsed = Duration::from_secs(u64::from(now.second()))
        + Duration::from_nanos(u64::from(now.nanosecond() % 1_000_000_000));
    Duration::from_secs(60).saturating_sub(elapsed).max(Duration::from_millis(1))
}
