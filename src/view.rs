use crate::body::Body;
use crate::location::Observer;
use crate::projection::VisibleRange;
use chrono::{DateTime, TimeDelta, TimeZone, Timelike, Utc};

/// Which instant the sky is drawn for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ObservationMoment {
    /// Follows the wall clock; resolved again on every frame.
    Live,
    /// Stays put until the user returns to live time.
    Frozen(DateTime<Utc>),
}

impl ObservationMoment {
    pub(crate) fn resolve(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            ObservationMoment::Live => now,
            ObservationMoment::Frozen(t) => t,
        }
    }

    pub(crate) fn is_frozen(self) -> bool {
        matches!(self, ObservationMoment::Frozen(_))
    }
}

/// `None` when the local hour start does not exist in `tz` (a DST gap).
fn top_of_local_hour<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Option<DateTime<Utc>> {
    let local = now.with_timezone(tz).naive_local();
    let start = local.date().and_hms_opt(local.hour(), 0, 0)?;
    tz.from_local_datetime(&start)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Back,
    Forward,
}

impl Direction {
    fn hours(self) -> i64 {
        match self {
            Direction::Back => -1,
            Direction::Forward => 1,
        }
    }
}

/// Decided once at startup and handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DisplayConfig {
    pub(crate) unicode: bool,
    pub(crate) color: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct ViewState {
    pub(crate) observer: Observer,
    pub(crate) moment: ObservationMoment,
    pub(crate) range: VisibleRange,
    /// Index into `Body::ALL`.
    pub(crate) selection: Option<usize>,
    pub(crate) display: DisplayConfig,
}

impl ViewState {
    pub(crate) fn new(observer: Observer, display: DisplayConfig) -> Self {
        Self {
            range: VisibleRange::default_for(observer.is_southern()),
            observer,
            moment: ObservationMoment::Live,
            selection: None,
            display,
        }
    }

    /// Moves one hour. Leaving live time first snaps `now` to the top of the
    /// hour as seen in `tz`, so the first step lands on a local hour boundary.
    pub(crate) fn step_time<Tz: TimeZone>(&mut self, direction: Direction, now: DateTime<Utc>, tz: &Tz) {
        let base = match self.moment {
            ObservationMoment::Live => top_of_local_hour(now, tz).unwrap_or(now),
            ObservationMoment::Frozen(t) => t,
        };
        let next = base
            .checked_add_signed(TimeDelta::hours(direction.hours()))
            .unwrap_or(base);
        self.moment = ObservationMoment::Frozen(next);
    }

    pub(crate) fn reset_to_live(&mut self) {
        self.moment = ObservationMoment::Live;
    }

    pub(crate) fn select_next(&mut self) {
        self.selection = Some(match self.selection {
            None => 0,
            Some(i) => (i + 1) % Body::ALL.len(),
        });
    }

    pub(crate) fn select_previous(&mut self) {
        let n = Body::ALL.len();
        self.selection = Some(match self.selection {
            None => n - 1,
            Some(i) => (i + n - 1) % n,
        });
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub(crate) fn selected_body(&self) -> Option<Body> {
        self.selection.map(|i| Body::ALL[i % Body::ALL.len()])
    }
}
