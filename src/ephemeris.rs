//! Low-precision positions for the Sun, Moon and planets.
//!
//! Osculating elements referred to 2000 Jan 0.0 UT with a linear drift per
//! day, good to a few arc-minutes for the planets and a fraction of a degree
//! for the Moon over a few centuries around the epoch. Plenty for a character
//! cell map.

use crate::body::Body;
use crate::location::Observer;
use chrono::{DateTime, Utc};
use std::f64::consts::{PI, TAU};

/// Unix day number of 2000 Jan 0.0 UT (1999-12-31T00:00Z).
const EPOCH_UNIX_DAYS: f64 = 10_956.0;
const MS_PER_DAY: f64 = 86_400_000.0;

const SEARCH_STEP_DAYS: f64 = 10.0 / 1440.0;
const CROSSING_WINDOW_DAYS: f64 = 26.0 / 24.0;
const TRANSIT_WINDOW_DAYS: f64 = 25.0 / 24.0;
const BISECT_TOLERANCE_DAYS: f64 = 0.5 / 86_400.0;

// WGS84
const A_EQUATOR: f64 = 6_378_137.0;
const B_POLAR: f64 = 6_356_752.314_245;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Horizontal {
    /// Radians from north through east, in [0, 2π).
    pub(crate) azimuth: f64,
    /// Radians above the horizon.
    pub(crate) elevation: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MoonPhase {
    /// Fraction of the synodic cycle: 0 new, 0.5 full.
    pub(crate) phase: f64,
    /// Lit fraction of the disc.
    pub(crate) illumination: f64,
}

/// Everything the renderer needs to know about the sky.
pub(crate) trait SkyProvider {
    fn horizontal(&self, body: Body, observer: &Observer, at: DateTime<Utc>) -> Horizontal;

    /// Upper culmination closest to `at`.
    fn transit_near(&self, body: Body, observer: &Observer, at: DateTime<Utc>) -> Option<DateTime<Utc>>;

    /// Latest rise at or before `at`, if the body rises within a day of it.
    fn rise_before(&self, body: Body, observer: &Observer, at: DateTime<Utc>) -> Option<DateTime<Utc>>;

    /// First set at or after `at`, if the body sets within a day of it.
    fn set_after(&self, body: Body, observer: &Observer, at: DateTime<Utc>) -> Option<DateTime<Utc>>;

    fn moon_phase(&self, at: DateTime<Utc>) -> MoonPhase;
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Ephemeris;

fn day_number(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / MS_PER_DAY - EPOCH_UNIX_DAYS
}

fn from_day_number(d: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(((d + EPOCH_UNIX_DAYS) * MS_PER_DAY).round() as i64)
}

fn rev(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

fn sind(deg: f64) -> f64 {
    deg.to_radians().sin()
}

fn cosd(deg: f64) -> f64 {
    deg.to_radians().cos()
}

/// Wraps to (-π, π].
fn wrap_pi(a: f64) -> f64 {
    let r = a.rem_euclid(TAU);
    if r > PI {
        r - TAU
    } else {
        r
    }
}

// -------------------- Orbital elements --------------------

/// Each element is `(value at epoch, change per day)`. Angles in degrees,
/// `a` in AU (Earth radii for the Moon).
#[derive(Clone, Copy)]
struct OrbitalElements {
    big_omega: (f64, f64),
    i: (f64, f64),
    omega: (f64, f64),
    a: (f64, f64),
    e: (f64, f64),
    m: (f64, f64),
}

#[derive(Clone, Copy)]
struct Elements {
    big_omega: f64,
    i: f64,
    omega: f64,
    a: f64,
    e: f64,
    m: f64,
}

impl OrbitalElements {
    fn at(&self, d: f64) -> Elements {
        let lin = |(c, r): (f64, f64)| c + r * d;
        Elements {
            big_omega: rev(lin(self.big_omega)),
            i: lin(self.i),
            omega: rev(lin(self.omega)),
            a: lin(self.a),
            e: lin(self.e),
            m: rev(lin(self.m)),
        }
    }
}

const SUN: OrbitalElements = OrbitalElements {
    big_omega: (0.0, 0.0),
    i: (0.0, 0.0),
    omega: (282.9404, 4.70935e-5),
    a: (1.0, 0.0),
    e: (0.016709, -1.151e-9),
    m: (356.0470, 0.985_600_258_5),
};

const MOON: OrbitalElements = OrbitalElements {
    big_omega: (125.1228, -0.052_953_808_3),
    i: (5.1454, 0.0),
    omega: (318.0634, 0.164_357_322_3),
    a: (60.2666, 0.0),
    e: (0.054900, 0.0),
    m: (115.3654, 13.064_992_950_9),
};

const MERCURY: OrbitalElements = OrbitalElements {
    big_omega: (48.3313, 3.24587e-5),
    i: (7.0047, 5.00e-8),
    omega: (29.1241, 1.01444e-5),
    a: (0.387098, 0.0),
    e: (0.205635, 5.59e-10),
    m: (168.6562, 4.092_334_436_8),
};

const VENUS: OrbitalElements = OrbitalElements {
    big_omega: (76.6799, 2.46590e-5),
    i: (3.3946, 2.75e-8),
    omega: (54.8910, 1.38374e-5),
    a: (0.723330, 0.0),
    e: (0.006773, -1.302e-9),
    m: (48.0052, 1.602_130_224_4),
};

const MARS: OrbitalElements = OrbitalElements {
    big_omega: (49.5574, 2.11081e-5),
    i: (1.8497, -1.78e-8),
    omega: (286.5016, 2.92961e-5),
    a: (1.523688, 0.0),
    e: (0.093405, 2.516e-9),
    m: (18.6021, 0.524_020_776_6),
};

const JUPITER: OrbitalElements = OrbitalElements {
    big_omega: (100.4542, 2.76854e-5),
    i: (1.3030, -1.557e-7),
    omega: (273.8777, 1.64505e-5),
    a: (5.20256, 0.0),
    e: (0.048498, 4.469e-9),
    m: (19.8950, 0.083_085_300_1),
};

const SATURN: OrbitalElements = OrbitalElements {
    big_omega: (113.6634, 2.38980e-5),
    i: (2.4886, -1.081e-7),
    omega: (339.3939, 2.97661e-5),
    a: (9.55475, 0.0),
    e: (0.055546, -9.499e-9),
    m: (316.9670, 0.033_444_228_2),
};

const URANUS: OrbitalElements = OrbitalElements {
    big_omega: (74.0005, 1.3978e-5),
    i: (0.7733, 1.9e-8),
    omega: (96.6612, 3.0565e-5),
    a: (19.18171, -1.55e-8),
    e: (0.047318, 7.45e-9),
    m: (142.5905, 0.011_725_806),
};

const NEPTUNE: OrbitalElements = OrbitalElements {
    big_omega: (131.7806, 3.0173e-5),
    i: (1.7700, -2.55e-7),
    omega: (272.8461, -6.027e-6),
    a: (30.05826, 3.313e-8),
    e: (0.008606, 2.15e-9),
    m: (260.2471, 0.005_995_147),
};

fn elements(body: Body) -> OrbitalElements {
    match body {
        Body::Sun => SUN,
        Body::Moon => MOON,
        Body::Mercury => MERCURY,
        Body::Venus => VENUS,
        Body::Mars => MARS,
        Body::Jupiter => JUPITER,
        Body::Saturn => SATURN,
        Body::Uranus => URANUS,
        Body::Neptune => NEPTUNE,
    }
}

/// Eccentric anomaly (radians) for mean anomaly `m` (radians).
fn solve_kepler(m: f64, e: f64) -> f64 {
    let mut e_anom = m + e * m.sin() * (1.0 + e * m.cos());
    for _ in 0..30 {
        let f = e_anom - e * e_anom.sin() - m;
        let fp = 1.0 - e * e_anom.cos();
        let step = f / fp;
        e_anom -= step;
        if step.abs() < 1e-12 {
            break;
        }
    }
    e_anom
}

/// Ecliptic longitude/latitude in degrees and distance, in the frame the
/// elements are referred to (heliocentric for planets, geocentric otherwise).
#[derive(Clone, Copy, Debug)]
struct Spherical {
    lon: f64,
    lat: f64,
    r: f64,
}

impl Spherical {
    fn to_rect(self) -> (f64, f64, f64) {
        (
            self.r * cosd(self.lon) * cosd(self.lat),
            self.r * sind(self.lon) * cosd(self.lat),
            self.r * sind(self.lat),
        )
    }
}

fn orbit_position(el: &Elements) -> Spherical {
    let e_anom = solve_kepler(el.m.to_radians(), el.e);
    let xv = el.a * (e_anom.cos() - el.e);
    let yv = el.a * ((1.0 - el.e * el.e).sqrt() * e_anom.sin());
    let v = yv.atan2(xv).to_degrees();
    let r = xv.hypot(yv);

    let (sn, cn) = el.big_omega.to_radians().sin_cos();
    let (svw, cvw) = (v + el.omega).to_radians().sin_cos();
    let ci = cosd(el.i);
    let x = r * (cn * cvw - sn * svw * ci);
    let y = r * (sn * cvw + cn * svw * ci);
    let z = r * (svw * sind(el.i));

    Spherical {
        lon: rev(y.atan2(x).to_degrees()),
        lat: z.atan2(x.hypot(y)).to_degrees(),
        r,
    }
}

struct SunState {
    lon: f64,
    r: f64,
    /// Mean longitude, drives sidereal time.
    mean_lon: f64,
    m: f64,
}

fn sun_state(d: f64) -> SunState {
    let el = SUN.at(d);
    let pos = orbit_position(&el);
    SunState {
        lon: pos.lon,
        r: pos.r,
        mean_lon: rev(el.m + el.omega),
        m: el.m,
    }
}

fn moon_geocentric(d: f64, sun: &SunState) -> Spherical {
    let el = MOON.at(d);
    let mut pos = orbit_position(&el);

    let mm = el.m;
    let ms = sun.m;
    let lm = rev(el.big_omega + el.omega + el.m);
    let dd = rev(lm - sun.mean_lon);
    let f = rev(lm - el.big_omega);

    pos.lon += -1.274 * sind(mm - 2.0 * dd)
        + 0.658 * sind(2.0 * dd)
        - 0.186 * sind(ms)
        - 0.059 * sind(2.0 * mm - 2.0 * dd)
        - 0.057 * sind(mm - 2.0 * dd + ms)
        + 0.053 * sind(mm + 2.0 * dd)
        + 0.046 * sind(2.0 * dd - ms)
        + 0.041 * sind(mm - ms)
        - 0.035 * sind(dd)
        - 0.031 * sind(mm + ms)
        - 0.015 * sind(2.0 * f - 2.0 * dd)
        + 0.011 * sind(mm - 4.0 * dd);
    pos.lat += -0.173 * sind(f - 2.0 * dd)
        - 0.055 * sind(mm - f - 2.0 * dd)
        - 0.046 * sind(mm + f - 2.0 * dd)
        + 0.033 * sind(f + 2.0 * dd)
        + 0.017 * sind(2.0 * mm + f);
    pos.r += -0.58 * cosd(mm - 2.0 * dd) - 0.46 * cosd(2.0 * dd);
    pos.lon = rev(pos.lon);
    pos
}

fn planet_heliocentric(body: Body, d: f64) -> Spherical {
    let mut pos = orbit_position(&elements(body).at(d));
    let mj = JUPITER.at(d).m;
    let ms = SATURN.at(d).m;
    let mu = URANUS.at(d).m;

    match body {
        Body::Jupiter => {
            pos.lon += -0.332 * sind(2.0 * mj - 5.0 * ms - 67.6)
                - 0.056 * sind(2.0 * mj - 2.0 * ms + 21.0)
                + 0.042 * sind(3.0 * mj - 5.0 * ms + 21.0)
                - 0.036 * sind(mj - 2.0 * ms)
                + 0.022 * cosd(mj - ms)
                + 0.023 * sind(2.0 * mj - 3.0 * ms + 52.0)
                - 0.016 * sind(mj - 5.0 * ms - 69.0);
        }
        Body::Saturn => {
            pos.lon += 0.812 * sind(2.0 * mj - 5.0 * ms - 67.6)
                - 0.229 * cosd(2.0 * mj - 4.0 * ms - 2.0)
                + 0.119 * sind(mj - 2.0 * ms - 3.0)
                + 0.046 * sind(2.0 * mj - 6.0 * ms - 69.0)
                + 0.014 * sind(mj - 3.0 * ms + 32.0);
            pos.lat += -0.020 * cosd(2.0 * mj - 4.0 * ms - 2.0) + 0.018 * sind(2.0 * mj - 6.0 * ms - 49.0);
        }
        Body::Uranus => {
            pos.lon += 0.040 * sind(ms - 2.0 * mu + 6.0)
                + 0.035 * sind(ms - 3.0 * mu + 33.0)
                - 0.015 * sind(mj - mu + 20.0);
        }
        _ => {}
    }
    pos
}

/// Geocentric ecliptic rectangular coordinates, plus the Moon's distance in
/// Earth radii when `body` is the Moon.
fn geocentric(body: Body, d: f64, sun: &SunState) -> ((f64, f64, f64), Option<f64>) {
    match body {
        Body::Sun => (Spherical { lon: sun.lon, lat: 0.0, r: sun.r }.to_rect(), None),
        Body::Moon => {
            let m = moon_geocentric(d, sun);
            (m.to_rect(), Some(m.r))
        }
        _ => {
            let (xh, yh, zh) = planet_heliocentric(body, d).to_rect();
            let (xs, ys, _) = Spherical { lon: sun.lon, lat: 0.0, r: sun.r }.to_rect();
            ((xh + xs, yh + ys, zh), None)
        }
    }
}

/// Right ascension and declination in radians.
fn equatorial(ecliptic: (f64, f64, f64), d: f64) -> (f64, f64) {
    let (xg, yg, zg) = ecliptic;
    let (se, ce) = (23.4393 - 3.563e-7 * d).to_radians().sin_cos();
    let xe = xg;
    let ye = yg * ce - zg * se;
    let ze = yg * se + zg * ce;
    (ye.atan2(xe), ze.atan2(xe.hypot(ye)))
}

/// Local sidereal time in radians.
fn local_sidereal_time(d: f64, mean_sun_lon: f64, longitude: f64) -> f64 {
    let ut_deg = (d - d.floor()) * 360.0;
    rev(mean_sun_lon + 180.0 + ut_deg + longitude).to_radians()
}

fn earth_radius_wgs84(lat_deg: f64) -> f64 {
    let (sin, cos) = lat_deg.to_radians().sin_cos();
    let a2 = A_EQUATOR * A_EQUATOR;
    let b2 = B_POLAR * B_POLAR;
    let numerator = a2 * a2 * cos * cos + b2 * b2 * sin * sin;
    let denominator = (A_EQUATOR * cos).powi(2) + (B_POLAR * sin).powi(2);
    (numerator / denominator).sqrt()
}

/// How far the visible horizon sits below the geometric one, in degrees.
/// Negative below sea level.
fn horizon_dip_deg(lat_deg: f64, h: f64) -> f64 {
    if h.abs() < 1e-5 {
        return 0.0;
    }
    let r = earth_radius_wgs84(lat_deg);
    let dip = (r / (r + h.abs())).clamp(-1.0, 1.0).acos().to_degrees();
    if h > 0.0 {
        dip
    } else {
        -dip
    }
}

/// Elevation (degrees) of the body's upper limb at the moment of rise/set.
fn rise_set_altitude(body: Body, observer: &Observer) -> f64 {
    let standard = match body {
        Body::Sun | Body::Moon => -0.833,
        _ => -0.567,
    };
    standard - horizon_dip_deg(observer.latitude(), observer.altitude())
}

struct Apparent {
    horizontal: Horizontal,
    /// Local hour angle in (-π, π].
    hour_angle: f64,
}

impl Ephemeris {
    fn apparent(&self, body: Body, observer: &Observer, d: f64) -> Apparent {
        let sun = sun_state(d);
        let (rect, moon_r) = geocentric(body, d, &sun);
        let (ra, dec) = equatorial(rect, d);

        let lst = local_sidereal_time(d, sun.mean_lon, observer.longitude());
        let ha = wrap_pi(lst - ra);

        let lat = observer.latitude().to_radians();
        let (sh, ch) = ha.sin_cos();
        let (sd, cd) = dec.sin_cos();
        let (sl, cl) = lat.sin_cos();
        let x = ch * cd;
        let y = sh * cd;
        let z = sd;
        let xhor = x * sl - z * cl;
        let yhor = y;
        let zhor = x * cl + z * sl;

        let azimuth = (yhor.atan2(xhor) + PI).rem_euclid(TAU);
        let mut elevation = zhor.clamp(-1.0, 1.0).asin();
        if let Some(r) = moon_r {
            elevation -= (1.0 / r).asin() * elevation.cos();
        }

        Apparent {
            horizontal: Horizontal { azimuth, elevation },
            hour_angle: ha,
        }
    }

    fn elevation_deg(&self, body: Body, observer: &Observer, d: f64) -> f64 {
        self.apparent(body, observer, d).horizontal.elevation.to_degrees()
    }

    /// Root of `f` in `[lo, hi]` where `f(lo)` and `f(hi)` differ in sign.
    fn bisect(lo: f64, hi: f64, f: impl Fn(f64) -> bool) -> f64 {
        let (mut lo, mut hi) = (lo, hi);
        let lo_side = f(lo);
        while hi - lo > BISECT_TOLERANCE_DAYS {
            let mid = 0.5 * (lo + hi);
            if f(mid) == lo_side {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }

    /// Scans from `start` in `direction` for an interval `[t0, t1]` (t0 < t1)
    /// where `crosses(t0, t1)` holds, and refines it with `above`.
    fn scan(
        start: f64,
        direction: f64,
        window: f64,
        crosses: impl Fn(f64, f64) -> bool,
        above: impl Fn(f64) -> bool,
    ) -> Option<f64> {
        let steps = (window / SEARCH_STEP_DAYS).ceil() as usize;
        for k in 0..steps {
            let a = start + direction * k as f64 * SEARCH_STEP_DAYS;
            let b = a + direction * SEARCH_STEP_DAYS;
            let (t0, t1) = if a < b { (a, b) } else { (b, a) };
            if crosses(t0, t1) {
                return Some(Self::bisect(t0, t1, &above));
            }
        }
        None
    }

    fn transit_between(&self, body: Body, observer: &Observer, start: f64, direction: f64) -> Option<f64> {
        let ha = |t: f64| self.apparent(body, observer, t).hour_angle;
        // Upper culmination: hour angle climbs through zero. The ±π wrap at
        // lower culmination goes from positive to negative.
        let crosses = |t0: f64, t1: f64| ha(t0) < 0.0 && ha(t1) >= 0.0;
        Self::scan(start, direction, TRANSIT_WINDOW_DAYS, crosses, |t| ha(t) >= 0.0)
    }
}

impl SkyProvider for Ephemeris {
    fn horizontal(&self, body: Body, observer: &Observer, at: DateTime<Utc>) -> Horizontal {
        self.apparent(body, observer, day_number(at)).horizontal
    }

    fn transit_near(&self, body: Body, observer: &Observer, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let d = day_number(at);
        let after = self.transit_between(body, observer, d, 1.0);
        let before = self.transit_between(body, observer, d, -1.0);
        let nearest = match (before, after) {
            (Some(b), Some(a)) => Some(if d - b <= a - d { b } else { a }),
            (b, a) => b.or(a),
        };
        nearest.and_then(from_day_number)
    }

    fn rise_before(&self, body: Body, observer: &Observer, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let h0 = rise_set_altitude(body, observer);
        let above = |t: f64| self.elevation_deg(body, observer, t) >= h0;
        let crosses = |t0: f64, t1: f64| !above(t0) && above(t1);
        Self::scan(day_number(at), -1.0, CROSSING_WINDOW_DAYS, crosses, &above).and_then(from_day_number)
    }

    fn set_after(&self, body: Body, observer: &Observer, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let h0 = rise_set_altitude(body, observer);
        let above = |t: f64| self.elevation_deg(body, observer, t) >= h0;
        let crosses = |t0: f64, t1: f64| above(t0) && !above(t1);
        Self::scan(day_number(at), 1.0, CROSSING_WINDOW_DAYS, crosses, &above).and_then(from_day_number)
    }

    fn moon_phase(&self, at: DateTime<Utc>) -> MoonPhase {
        let d = day_number(at);
        let sun = sun_state(d);
        let moon = moon_geocentric(d, &sun);
        let delta = rev(moon.lon - sun.lon);
        let elongation = (cosd(delta) * cosd(moon.lat)).clamp(-1.0, 1.0).acos();
        MoonPhase {
            phase: delta / 360.0,
            illumination: (1.0 - elongation.cos()) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn la_paz() -> Observer {
        Observer::new(-15.75, -69.42, 3812.0).unwrap()
    }

    fn scenario_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 2, 7, 0, 0, 0).unwrap()
    }

    #[test]
    fn day_number_epoch() {
        let t = Utc.with_ymd_and_hms(1999, 12, 31, 0, 0, 0).unwrap();
        assert!(day_number(t).abs() < 1e-9);
        let back = from_day_number(day_number(scenario_time())).unwrap();
        assert_eq!(back, scenario_time());
    }

    #[test]
    fn kepler_solution_satisfies_equation() {
        for &(m, e) in &[(0.3, 0.0167), (2.9, 0.2056), (5.5, 0.0934)] {
            let ea = solve_kepler(m, e);
            assert!((ea - e * ea.sin() - m).abs() < 1e-10);
        }
    }

    #[test]
    fn sun_has_set_in_la_paz() {
        let h = Ephemeris.horizontal(Body::Sun, &la_paz(), scenario_time());
        let el = h.elevation.to_degrees();
        let az = h.azimuth.to_degrees();
        assert!((-25.0..-3.0).contains(&el), "elevation {el}");
        assert!((180.0..360.0).contains(&az), "azimuth {az}");
    }

    #[test]
    fn gibbous_moon_up_in_the_east() {
        let h = Ephemeris.horizontal(Body::Moon, &la_paz(), scenario_time());
        let el = h.elevation.to_degrees();
        let az = h.azimuth.to_degrees();
        assert!((15.0..50.0).contains(&el), "elevation {el}");
        assert!((0.0..180.0).contains(&az), "azimuth {az}");

        let phase = Ephemeris.moon_phase(scenario_time());
        assert!((0.38..0.47).contains(&phase.phase), "phase {}", phase.phase);
        assert!((0.85..0.99).contains(&phase.illumination), "illumination {}", phase.illumination);
    }

    #[test]
    fn azimuths_are_normalized() {
        for body in Body::ALL {
            let h = Ephemeris.horizontal(body, &la_paz(), scenario_time());
            assert!((0.0..TAU).contains(&h.azimuth), "{body:?}");
            assert!(h.elevation.abs() <= PI / 2.0, "{body:?}");
        }
    }

    #[test]
    fn sun_events_bracket_the_afternoon() {
        let obs = la_paz();
        let at = scenario_time();
        let transit = Ephemeris.transit_near(Body::Sun, &obs, at).unwrap();
        let lo = Utc.with_ymd_and_hms(2020, 2, 6, 16, 30, 0).unwrap();
        let hi = Utc.with_ymd_and_hms(2020, 2, 6, 17, 15, 0).unwrap();
        assert!(transit > lo && transit < hi, "transit {transit}");

        let rise = Ephemeris.rise_before(Body::Sun, &obs, transit).unwrap();
        let set = Ephemeris.set_after(Body::Sun, &obs, transit).unwrap();
        assert!(rise < transit && transit < set);
        assert!(set < at, "set {set}");
        let rise_lo = Utc.with_ymd_and_hms(2020, 2, 6, 9, 30, 0).unwrap();
        let rise_hi = Utc.with_ymd_and_hms(2020, 2, 6, 11, 30, 0).unwrap();
        assert!(rise > rise_lo && rise < rise_hi, "rise {rise}");
    }

    #[test]
    fn polar_night_has_no_sunrise() {
        let obs = Observer::new(89.9, 0.0, 0.0).unwrap();
        let at = Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(Ephemeris.rise_before(Body::Sun, &obs, at), None);
        assert_eq!(Ephemeris.set_after(Body::Sun, &obs, at), None);
    }

    #[test]
    fn polar_day_has_no_sunset_but_transits() {
        let obs = Observer::new(-89.9, 0.0, 0.0).unwrap();
        let at = Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(Ephemeris.set_after(Body::Sun, &obs, at), None);
        assert_eq!(Ephemeris.rise_before(Body::Sun, &obs, at), None);
        assert!(Ephemeris.transit_near(Body::Sun, &obs, at).is_some());
    }

    #[test]
    fn dip_grows_with_altitude() {
        assert_eq!(horizon_dip_deg(0.0, 0.0), 0.0);
        let dip = horizon_dip_deg(-15.75, 3812.0);
        assert!(dip > 1.5 && dip < 2.5, "dip {dip}");
        assert!(horizon_dip_deg(31.0, -400.0) < 0.0);
    }
}
