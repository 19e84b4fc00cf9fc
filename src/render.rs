//! Turns a view state and the current sky into a list of draw operations.
//!
//! Nothing here touches the terminal. Coordinates may fall outside the
//! viewport; the sink drops what it cannot show.

use crate::body::Body;
use crate::ephemeris::{MoonPhase, SkyProvider};
use crate::error::OrreryError;
use crate::location::Observer;
use crate::projection::{azimuth_to_column, elevation_to_row, project, ScreenPos};
use crate::view::ViewState;
use chrono::{DateTime, TimeZone, Utc};
use std::f64::consts::PI;
use std::fmt::Display;

pub(crate) const HELP_MIN_COLS: u16 = 60;
pub(crate) const HELP_MIN_ROWS: u16 = 13;

const ELEVATION_TICKS: [i32; 5] = [-60, -30, 0, 30, 60];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Style {
    Axis,
    Label,
    Body(Body),
    /// Selected body, drawn inverted.
    Highlight(Body),
    Panel,
    Status,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawOp {
    HorizontalLine { row: i32, ch: char, style: Style },
    VerticalLine { col: i32, ch: char, style: Style },
    Glyph { row: i32, col: i32, ch: char, style: Style },
    Text { row: i32, col: i32, text: String, style: Style },
}

/// Part of the terminal the sky is projected onto. The last row is kept for
/// the status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) rows: u16,
    pub(crate) cols: u16,
}

impl Viewport {
    pub(crate) fn for_terminal(cols: u16, rows: u16) -> Self {
        Self {
            rows: rows.saturating_sub(2),
            cols: cols.saturating_sub(1),
        }
    }
}

struct Glyphs {
    horizontal: char,
    vertical: char,
    cross: char,
    degree: &'static str,
    frozen: char,
}

impl Glyphs {
    fn new(unicode: bool) -> Self {
        if unicode {
            Self { horizontal: '─', vertical: '│', cross: '┼', degree: "°", frozen: '❄' }
        } else {
            Self { horizontal: '-', vertical: '|', cross: '+', degree: "", frozen: '*' }
        }
    }
}

/// Rise, transit and set of one diurnal arc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DiurnalEvents {
    pub(crate) rise: Option<DateTime<Utc>>,
    pub(crate) transit: Option<DateTime<Utc>>,
    pub(crate) set: Option<DateTime<Utc>>,
}

impl DiurnalEvents {
    /// Anchors on the transit nearest to `at` and takes the rise before it
    /// and the set after it, so all three describe the same arc.
    pub(crate) fn around(
        provider: &impl SkyProvider,
        body: Body,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> Self {
        let transit = provider.transit_near(body, observer, at);
        let (rise, set) = match transit {
            Some(t) => (provider.rise_before(body, observer, t), provider.set_after(body, observer, t)),
            None => (None, None),
        };
        Self { rise, transit, set }
    }
}

/// Name of the phase for a position in the synodic cycle (0 new, 0.5 full).
pub(crate) fn phase_name(phase: f64) -> &'static str {
    match phase {
        p if p < 0.02 => "new",
        p if p < 0.24 => "waxing crescent",
        p if p < 0.26 => "first quarter",
        p if p < 0.49 => "waxing gibbous",
        p if p < 0.51 => "full",
        p if p < 0.74 => "waning gibbous",
        p if p < 0.76 => "last quarter",
        p if p < 0.99 => "waning crescent",
        _ => "new",
    }
}

fn describe_moon(phase: MoonPhase) -> String {
    format!(
        "Moon: {} ({:.0}%)",
        phase_name(phase.phase),
        (phase.illumination * 100.0).clamp(0.0, 100.0)
    )
}

fn format_event<Tz: TimeZone>(event: Option<DateTime<Utc>>, reference: &DateTime<Tz>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    match event {
        None => "never".to_string(),
        Some(t) => {
            let local = t.with_timezone(tz);
            if local.date_naive() == reference.date_naive() {
                local.format("%H:%M").to_string()
            } else {
                local.format("%m-%d %H:%M").to_string()
            }
        }
    }
}

fn axis_ops(state: &ViewState, vp: Viewport, glyphs: &Glyphs) -> Result<Vec<DrawOp>, OrreryError> {
    let range = &state.range;
    let mut ops = Vec::new();

    let horizon = elevation_to_row(0.0, range, vp.rows, vp.cols)?;
    ops.push(DrawOp::HorizontalLine { row: horizon, ch: glyphs.horizontal, style: Style::Axis });

    let first = (range.min_azimuth.to_degrees() / 45.0 - 1e-9).ceil() as i64;
    let last = (range.max_azimuth.to_degrees() / 45.0 + 1e-9).floor() as i64;
    for k in first..=last {
        let deg = k * 45;
        let azimuth = (deg as f64).to_radians().clamp(range.min_azimuth, range.max_azimuth);
        let col = azimuth_to_column(azimuth, range, vp.rows, vp.cols)?;
        let ch = match deg.rem_euclid(360) {
            90 => 'E',
            270 => 'W',
            _ => glyphs.cross,
        };
        ops.push(DrawOp::Glyph { row: horizon, col, ch, style: Style::Label });
    }

    for (azimuth, label) in [(0.0, 'N'), (PI, 'S')] {
        let a = range.unwrap_azimuth(azimuth);
        let on_edge = (a - range.min_azimuth).abs() < 1e-9 || (a - range.max_azimuth).abs() < 1e-9;
        if on_edge || !range.contains_azimuth(a) {
            continue;
        }
        let col = azimuth_to_column(a, range, vp.rows, vp.cols)?;
        ops.push(DrawOp::VerticalLine { col, ch: glyphs.vertical, style: Style::Axis });
        for el in ELEVATION_TICKS {
            let row = elevation_to_row(f64::from(el).to_radians(), range, vp.rows, vp.cols)?;
            ops.push(DrawOp::Text {
                row,
                col: col + 1,
                text: format!("{el}{}", glyphs.degree),
                style: Style::Label,
            });
        }
        ops.push(DrawOp::Glyph { row: horizon, col, ch: label, style: Style::Label });
    }
    Ok(ops)
}

fn info_panel<Tz: TimeZone>(
    state: &ViewState,
    provider: &impl SkyProvider,
    body: Body,
    at: DateTime<Utc>,
    tz: &Tz,
    glyphs: &Glyphs,
) -> Vec<DrawOp>
where
    Tz::Offset: Display,
{
    let h = provider.horizontal(body, &state.observer, at);
    let azimuth = state.range.unwrap_azimuth(h.azimuth).to_degrees().round() as i64;
    let elevation = h.elevation.to_degrees().round() as i64;
    let events = DiurnalEvents::around(provider, body, &state.observer, at);
    let reference = at.with_timezone(tz);

    let lines = [
        format!("{} {}", body.glyph(state.display.unicode), body.name()),
        format!("Azimuth:   {azimuth:+}{}", glyphs.degree),
        format!("Elevation: {elevation:+}{}", glyphs.degree),
        format!("Rise:      {}", format_event(events.rise, &reference, tz)),
        format!("Transit:   {}", format_event(events.transit, &reference, tz)),
        format!("Set:       {}", format_event(events.set, &reference, tz)),
    ];
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| DrawOp::Text {
            row: i as i32,
            col: 0,
            text: format!(" {line:<w$}", w = width - 1),
            style: Style::Panel,
        })
        .collect()
}

fn status_line<Tz: TimeZone>(
    state: &ViewState,
    provider: &impl SkyProvider,
    at: DateTime<Utc>,
    tz: &Tz,
    glyphs: &Glyphs,
    row: i32,
) -> DrawOp
where
    Tz::Offset: Display,
{
    let mut parts = vec![state.observer.describe(state.display.unicode)];
    if state.moment.is_frozen() {
        parts.push(glyphs.frozen.to_string());
    }
    parts.push(describe_moon(provider.moon_phase(at)));
    parts.push(at.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string());
    DrawOp::Text { row, col: 0, text: parts.join("  "), style: Style::Status }
}

/// One full frame for a `cols` x `rows` terminal at wall-clock time `now`.
pub(crate) fn build_frame<Tz: TimeZone>(
    state: &ViewState,
    provider: &impl SkyProvider,
    now: DateTime<Utc>,
    cols: u16,
    rows: u16,
    tz: &Tz,
) -> Result<Vec<DrawOp>, OrreryError>
where
    Tz::Offset: Display,
{
    let at = state.moment.resolve(now);
    let vp = Viewport::for_terminal(cols, rows);
    let glyphs = Glyphs::new(state.display.unicode);

    let mut ops = axis_ops(state, vp, &glyphs)?;

    let mut selected_pos: Option<ScreenPos> = None;
    let selected = state.selected_body();
    for body in Body::DRAW_ORDER {
        let h = provider.horizontal(body, &state.observer, at);
        let pos = project(h.azimuth, h.elevation, &state.range, vp.rows, vp.cols)?;
        ops.push(DrawOp::Glyph {
            row: pos.row,
            col: pos.col,
            ch: body.glyph(state.display.unicode),
            style: Style::Body(body),
        });
        if selected == Some(body) {
            selected_pos = Some(pos);
        }
    }

    if let (Some(body), Some(pos)) = (selected, selected_pos) {
        ops.push(DrawOp::Glyph {
            row: pos.row,
            col: pos.col,
            ch: body.glyph(state.display.unicode),
            style: Style::Highlight(body),
        });
        ops.extend(info_panel(state, provider, body, at, tz, &glyphs));
    }

    ops.push(status_line(state, provider, at, tz, &glyphs, i32::from(rows) - 1));
    tracing::trace!(ops = ops.len(), %at, "frame built");
    Ok(ops)
}

const HELP_LINES: [&str; 9] = [
    "h / Left    step back one hour",
    "l / Right   step forward one hour",
    "n           return to live time",
    "j / Down    select next body",
    "k / Up      select previous body",
    "c / Esc     clear selection",
    "?           show this help",
    "q           quit",
    "Press any key to continue",
];

/// Centred help box, or `None` when the terminal is too small to hold it.
pub(crate) fn help_overlay(cols: u16, rows: u16, unicode: bool) -> Option<Vec<DrawOp>> {
    if cols < HELP_MIN_COLS || rows < HELP_MIN_ROWS {
        return None;
    }
    let w = usize::from(HELP_MIN_COLS);
    let x0 = i32::from((cols - HELP_MIN_COLS) / 2);
    let y0 = i32::from((rows - HELP_MIN_ROWS) / 2);
    let (h, v, tl, tr, bl, br) = if unicode {
        ('─', '│', '┌', '┐', '└', '┘')
    } else {
        ('-', '|', '+', '+', '+', '+')
    };
    let inner = w - 2;
    let bar: String = std::iter::repeat(h).take(inner).collect();
    let boxed = |text: &str| format!("{v} {text:<width$}{v}", width = inner - 1);

    let mut lines = vec![format!("{tl}{bar}{tr}"), boxed("orrery: keys"), boxed("")];
    lines.extend(HELP_LINES.iter().map(|l| boxed(l)));
    lines.push(format!("{bl}{bar}{br}"));

    Some(
        lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| DrawOp::Text { row: y0 + i as i32, col: x0, text, style: Style::Panel })
            .collect(),
    )
}
