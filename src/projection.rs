use crate::error::OrreryError;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// The patch of sky mapped onto the screen, in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct VisibleRange {
    pub(crate) min_azimuth: f64,
    pub(crate) max_azimuth: f64,
    pub(crate) min_elevation: f64,
    pub(crate) max_elevation: f64,
}

impl VisibleRange {
    #[cfg(test)]
    pub(crate) fn new(
        min_azimuth: f64,
        max_azimuth: f64,
        min_elevation: f64,
        max_elevation: f64,
    ) -> Result<Self, OrreryError> {
        let range = Self {
            min_azimuth,
            max_azimuth,
            min_elevation,
            max_elevation,
        };
        range.check()?;
        Ok(range)
    }

    /// Whole sky, centred due south for the northern hemisphere (and the
    /// equator) and due north for the southern one.
    pub(crate) fn default_for(southern: bool) -> Self {
        let (min_azimuth, max_azimuth) = if southern { (-PI, PI) } else { (0.0, TAU) };
        Self {
            min_azimuth,
            max_azimuth,
            min_elevation: -FRAC_PI_2,
            max_elevation: FRAC_PI_2,
        }
    }

    fn check(&self) -> Result<(), OrreryError> {
        let finite = [self.min_azimuth, self.max_azimuth, self.min_elevation, self.max_elevation]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(OrreryError::configuration("visible range has a non-finite bound"));
        }
        if self.max_azimuth <= self.min_azimuth {
            return Err(OrreryError::configuration(format!(
                "azimuth span [{}, {}] is empty",
                self.min_azimuth, self.max_azimuth
            )));
        }
        if self.max_elevation <= self.min_elevation {
            return Err(OrreryError::configuration(format!(
                "elevation span [{}, {}] is empty",
                self.min_elevation, self.max_elevation
            )));
        }
        Ok(())
    }

    /// Wraps `azimuth` by whole turns so that it is not left of the window,
    /// then pulls anything past the right edge back by a turn. A body just
    /// past the seam lands just off the left side instead of across the
    /// screen.
    pub(crate) fn unwrap_azimuth(&self, azimuth: f64) -> f64 {
        let mut a = azimuth;
        if a < self.min_azimuth {
            a += ((self.min_azimuth - a) / TAU).ceil() * TAU;
        }
        if a > self.max_azimuth {
            a -= ((a - self.max_azimuth) / TAU).ceil() * TAU;
        }
        a
    }

    pub(crate) fn contains_azimuth(&self, azimuth: f64) -> bool {
        (self.min_azimuth..=self.max_azimuth).contains(&azimuth)
    }
}

/// Screen position, row 0 at the top. May lie outside the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScreenPos {
    pub(crate) row: i32,
    pub(crate) col: i32,
}

/// Maps a horizontal position onto a `rows` x `cols` character grid.
/// The maximum elevation maps to row 0, the minimum to row `rows`.
pub(crate) fn project(
    azimuth: f64,
    elevation: f64,
    range: &VisibleRange,
    rows: u16,
    cols: u16,
) -> Result<ScreenPos, OrreryError> {
    range.check()?;
    let rows = f64::from(rows);
    let cols = f64::from(cols);
    let azimuth = range.unwrap_azimuth(azimuth);

    let row = rows - rows * (elevation - range.min_elevation) / (range.max_elevation - range.min_elevation);
    let col = cols * (azimuth - range.min_azimuth) / (range.max_azimuth - range.min_azimuth);
    // f64::round rounds half away from zero.
    Ok(ScreenPos {
        row: row.round() as i32,
        col: col.round() as i32,
    })
}

pub(crate) fn azimuth_to_column(azimuth: f64, range: &VisibleRange, rows: u16, cols: u16) -> Result<i32, OrreryError> {
    project(azimuth, 0.0, range, rows, cols).map(|p| p.col)
}

pub(crate) fn elevation_to_row(elevation: f64, range: &VisibleRange, rows: u16, cols: u16) -> Result<i32, OrreryError> {
    project(0.0, elevation, range, rows, cols).map(|p| p.row)
}
