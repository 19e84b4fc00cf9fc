use crate::ephemeris::{Ephemeris, SkyProvider};
use crate::input::{lookup, until_next_minute, Command, CrosstermEvents, EventSource, Wake};
use crate::location::Observer;
use crate::render::{build_frame, help_overlay, DrawOp};
use crate::term::Terminal;
use crate::view::{DisplayConfig, ViewState};
use anyhow::Context;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;
use std::ops::ControlFlow;

/// Where finished frames go.
pub(crate) trait Screen {
    fn size(&self) -> (u16, u16);
    /// Picks up a new terminal size; true when it changed.
    fn refresh_size(&mut self) -> anyhow::Result<bool>;
    fn show(&mut self, ops: &[DrawOp], display: DisplayConfig) -> anyhow::Result<()>;
}

impl Screen for Terminal {
    fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn refresh_size(&mut self) -> anyhow::Result<bool> {
        self.resize_if_needed()
    }

    fn show(&mut self, ops: &[DrawOp], display: DisplayConfig) -> anyhow::Result<()> {
        self.frame.clear();
        self.frame.apply(ops, display);
        self.present()
    }
}

pub(crate) struct App<P, E, S> {
    pub(crate) state: ViewState,
    provider: P,
    events: E,
    pub(crate) screen: S,
    help_visible: bool,
}

impl<P: SkyProvider, E: EventSource, S: Screen> App<P, E, S> {
    pub(crate) fn new(state: ViewState, provider: P, events: E, screen: S) -> Self {
        Self {
            state,
            provider,
            events,
            screen,
            help_visible: false,
        }
    }

    /// Draws, waits, applies, until the user quits.
    pub(crate) fn run_loop<Tz: TimeZone>(
        &mut self,
        clock: impl Fn() -> DateTime<Utc>,
        tz: &Tz,
    ) -> anyhow::Result<()>
    where
        Tz::Offset: Display,
    {
        loop {
            if self.screen.refresh_size()? {
                let (cols, rows) = self.screen.size();
                tracing::debug!(cols, rows, "terminal resized");
            }
            let now = clock();
            self.draw(now, tz)?;

            let timeout = (!self.help_visible).then(|| until_next_minute(now));
            match self.events.next_wake(timeout)? {
                Wake::Timer | Wake::Resize => {}
                Wake::Key(_) if self.help_visible => self.help_visible = false,
                Wake::Key(key) => {
                    let Some(command) = lookup(key) else {
                        continue;
                    };
                    tracing::debug!(?command, "applying");
                    if self.apply(command, clock(), tz).is_break() {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn draw<Tz: TimeZone>(&mut self, now: DateTime<Utc>, tz: &Tz) -> anyhow::Result<()>
    where
        Tz::Offset: Display,
    {
        let (cols, rows) = self.screen.size();
        let mut ops = build_frame(&self.state, &self.provider, now, cols, rows, tz)
            .context("building frame")?;
        if self.help_visible {
            if let Some(overlay) = help_overlay(cols, rows, self.state.display.unicode) {
                ops.extend(overlay);
            }
        }
        self.screen.show(&ops, self.state.display)
    }

    fn apply<Tz: TimeZone>(&mut self, command: Command, now: DateTime<Utc>, tz: &Tz) -> ControlFlow<()> {
        match command {
            Command::StepTime(direction) => self.state.step_time(direction, now, tz),
            Command::ResetToLive => self.state.reset_to_live(),
            Command::SelectNext => self.state.select_next(),
            Command::SelectPrevious => self.state.select_previous(),
            Command::ClearSelection => self.state.clear_selection(),
            Command::ToggleHelp => self.help_visible = !self.help_visible,
            Command::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }
}

pub(crate) fn run(observer: Observer, display: DisplayConfig) -> anyhow::Result<()> {
    let state = ViewState::new(observer, display);
    tracing::info!(
        latitude = observer.latitude(),
        longitude = observer.longitude(),
        altitude = observer.altitude(),
        unicode = state.display.unicode,
        color = state.display.color,
        range = ?state.range,
        "starting"
    );

    let term = Terminal::begin().context("entering the alternate screen")?;
    let mut app = App::new(state, Ephemeris, CrosstermEvents, term);
    let result = app.run_loop(Utc::now, &Local);
    let restored = app.screen.end().context("restoring the terminal");
    result.and(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::ephemeris::{Horizontal, MoonPhase};
    use crate::render::Style;
    use crate::view::ObservationMoment;
    use chrono::TimeZone;
    use crossterm::event::KeyCode;
    use std::cell::Cell;
    use std::time::Duration;

    struct StillSky;

    impl SkyProvider for StillSky {
        fn horizontal(&self, _: Body, _: &Observer, _: DateTime<Utc>) -> Horizontal {
            Horizontal { azimuth: 1.0, elevation: 0.3 }
        }
        fn transit_near(&self, _: Body, _: &Observer, _: DateTime<Utc>) -> Option<DateTime<Utc>> {
            None
        }
        fn rise_before(&self, _: Body, _: &Observer, _: DateTime<Utc>) -> Option<DateTime<Utc>> {
            None
        }
        fn set_after(&self, _: Body, _: &Observer, _: DateTime<Utc>) -> Option<DateTime<Utc>> {
            None
        }
        fn moon_phase(&self, _: DateTime<Utc>) -> MoonPhase {
            MoonPhase { phase: 0.5, illumination: 1.0 }
        }
    }

    /// Replays wakes and remembers the timeout each wait was given. Quits
    /// once the script runs out.
    struct Scripted {
        wakes: Vec<Wake>,
        timeouts: Vec<Option<Duration>>,
    }

    impl Scripted {
        fn keys(keys: &[KeyCode]) -> Self {
            Self {
                wakes: keys.iter().map(|k| Wake::Key(*k)).collect(),
                timeouts: Vec::new(),
            }
        }
    }

    impl EventSource for Scripted {
        fn next_wake(&mut self, timeout: Option<Duration>) -> anyhow::Result<Wake> {
            self.timeouts.push(timeout);
            if self.wakes.is_empty() {
                return Ok(Wake::Key(KeyCode::Char('q')));
            }
            Ok(self.wakes.remove(0))
        }
    }

    struct Recorder {
        size: (u16, u16),
        pending_size: Option<(u16, u16)>,
        frames: Vec<Vec<DrawOp>>,
    }

    impl Recorder {
        fn new(cols: u16, rows: u16) -> Self {
            Self { size: (cols, rows), pending_size: None, frames: Vec::new() }
        }
    }

    impl Screen for Recorder {
        fn size(&self) -> (u16, u16) {
            self.size
        }
        fn refresh_size(&mut self) -> anyhow::Result<bool> {
            Ok(match self.pending_size.take() {
                Some(s) => {
                    self.size = s;
                    true
                }
                None => false,
            })
        }
        fn show(&mut self, ops: &[DrawOp], _: DisplayConfig) -> anyhow::Result<()> {
            self.frames.push(ops.to_vec());
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 2, 7, 0, 20, 30).unwrap()
    }

    fn app(events: Scripted, screen: Recorder) -> App<StillSky, Scripted, Recorder> {
        let observer = Observer::new(-15.75, -69.42, 3812.0).unwrap();
        let state = ViewState::new(observer, DisplayConfig { unicode: true, color: true });
        App::new(state, StillSky, events, screen)
    }

    fn has_help(frame: &[DrawOp]) -> bool {
        frame.iter().any(|op| matches!(op, DrawOp::Text { text, .. } if text.contains("orrery: keys")))
    }

    #[test]
    fn quit_draws_once_and_stops() {
        let mut a = app(Scripted::keys(&[]), Recorder::new(80, 24));
        a.run_loop(now, &Utc).unwrap();
        assert_eq!(a.screen.frames.len(), 1);
        assert_eq!(a.events.timeouts, vec![Some(Duration::from_secs(30))]);
    }

    #[test]
    fn keys_drive_the_view_state() {
        let keys = [KeyCode::Char('l'), KeyCode::Right, KeyCode::Char('h'), KeyCode::Down, KeyCode::Down];
        let mut a = app(Scripted::keys(&keys), Recorder::new(80, 24));
        a.run_loop(now, &Utc).unwrap();
        assert_eq!(
            a.state.moment,
            ObservationMoment::Frozen(Utc.with_ymd_and_hms(2020, 2, 7, 1, 0, 0).unwrap())
        );
        assert_eq!(a.state.selected_body(), Some(Body::Mercury));
        assert_eq!(a.screen.frames.len(), keys.len() + 1);
    }

    #[test]
    fn stepping_uses_the_display_zone() {
        let india = chrono::FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let mut a = app(Scripted::keys(&[KeyCode::Char('l')]), Recorder::new(80, 24));
        a.run_loop(now, &india).unwrap();
        // 05:50:30 IST snaps to 05:00, then forward to 06:00 IST
        assert_eq!(
            a.state.moment,
            ObservationMoment::Frozen(Utc.with_ymd_and_hms(2020, 2, 7, 0, 30, 0).unwrap())
        );
    }

    #[test]
    fn reset_and_clear() {
        let keys = [KeyCode::Left, KeyCode::Char('j'), KeyCode::Char('n'), KeyCode::Esc];
        let mut a = app(Scripted::keys(&keys), Recorder::new(80, 24));
        a.run_loop(now, &Utc).unwrap();
        assert_eq!(a.state.moment, ObservationMoment::Live);
        assert_eq!(a.state.selection, None);
    }

    #[test]
    fn help_swallows_the_next_key_and_suspends_the_timer() {
        // '?' opens help; 'q' only dismisses it; the scripted 'q' then quits
        let mut a = app(Scripted::keys(&[KeyCode::Char('?'), KeyCode::Char('q')]), Recorder::new(80, 24));
        a.run_loop(now, &Utc).unwrap();
        let frames = &a.screen.frames;
        assert_eq!(frames.len(), 3);
        assert!(!has_help(&frames[0]));
        assert!(has_help(&frames[1]));
        assert!(!has_help(&frames[2]));
        assert_eq!(a.events.timeouts[1], None);
        assert!(a.events.timeouts[2].is_some());
    }

    #[test]
    fn help_is_not_drawn_on_a_small_terminal() {
        let mut a = app(Scripted::keys(&[KeyCode::Char('?')]), Recorder::new(59, 24));
        a.run_loop(now, &Utc).unwrap();
        assert!(a.screen.frames.iter().all(|f| !has_help(f)));
    }

    #[test]
    fn resize_redraws_at_the_new_size() {
        let events = Scripted { wakes: vec![Wake::Resize], timeouts: Vec::new() };
        let mut a = app(events, Recorder::new(80, 24));
        a.screen.pending_size = Some((81, 26));
        a.run_loop(now, &Utc).unwrap();
        let status_rows: Vec<i32> = a
            .screen
            .frames
            .iter()
            .filter_map(|f| {
                f.iter().find_map(|op| match op {
                    DrawOp::Text { row, style: Style::Status, .. } => Some(*row),
                    _ => None,
                })
            })
            .collect();
        assert_eq!(status_rows, vec![25, 25]);
    }

    #[test]
    fn timer_redraws_with_a_fresh_clock() {
        let ticks = Cell::new(0i64);
        let clock = || {
            ticks.set(ticks.get() + 1);
            now() + chrono::TimeDelta::minutes(ticks.get())
        };
        let events = Scripted { wakes: vec![Wake::Timer, Wake::Timer], timeouts: Vec::new() };
        let mut a = app(events, Recorder::new(80, 24));
        a.run_loop(clock, &Utc).unwrap();
        assert_eq!(a.screen.frames.len(), 3);
        assert_ne!(a.screen.frames[0], a.screen.frames[2]);
    }

    #[test]
    fn unbound_keys_only_redraw() {
        let mut a = app(Scripted::keys(&[KeyCode::Char('x'), KeyCode::Enter]), Recorder::new(80, 24));
        a.run_loop(now, &Utc).unwrap();
        assert_eq!(a.state.moment, ObservationMoment::Live);
        assert_eq!(a.screen.frames.len(), 3);
    }
}
