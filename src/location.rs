use crate::error::OrreryError;

const FOOT_M: f64 = 0.3048;
const YARD_M: f64 = 0.9144;
const INCH_M: f64 = 0.0254;

const ALTITUDE_UNITS: [(&str, f64); 4] = [("ft", FOOT_M), ("yd", YARD_M), ("in", INCH_M), ("m", 1.0)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Self::North),
            'S' => Some(Self::South),
            'E' => Some(Self::East),
            'W' => Some(Self::West),
            _ => None,
        }
    }

    fn sign(self) -> f64 {
        match self {
            Self::North | Self::East => 1.0,
            Self::South | Self::West => -1.0,
        }
    }

    fn is_latitude(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// One parsed angle argument, in signed decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Coordinate {
    pub(crate) degrees: f64,
    pub(crate) hemisphere: Option<Hemisphere>,
}

/// Parses decimal degrees, `DD:MM:SS`, `DD MM SS` or `DD°MM'SS"`, with an
/// optional trailing hemisphere letter standing in for the sign.
pub(crate) fn parse_coordinate(input: &str) -> Result<Coordinate, OrreryError> {
    let s = input.trim();
    let bad = || OrreryError::argument(format!("cannot parse angle {input:?}"));

    let mut body = s;
    let mut hemisphere = None;
    if let Some(last) = s.chars().last() {
        if let Some(h) = Hemisphere::from_char(last) {
            hemisphere = Some(h);
            body = s[..s.len() - last.len_utf8()].trim_end();
        }
    }

    let (negative, body) = match body.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, body.strip_prefix('+').unwrap_or(body)),
    };
    if negative && hemisphere.is_some() {
        return Err(OrreryError::argument(format!(
            "angle {input:?} has both a sign and a hemisphere letter"
        )));
    }

    let cleaned: String = body
        .chars()
        .map(|c| match c {
            '°' | 'º' | '\'' | '"' | '′' | '″' | ':' => ' ',
            c => c,
        })
        .collect();
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(bad());
    }

    let mut dms = [0.0_f64; 3];
    for (slot, part) in dms.iter_mut().zip(&parts) {
        let v: f64 = part.parse().map_err(|_| bad())?;
        if !v.is_finite() || v < 0.0 {
            return Err(bad());
        }
        *slot = v;
    }
    if dms[1] >= 60.0 || dms[2] >= 60.0 {
        return Err(OrreryError::argument(format!(
            "minutes and seconds must be below 60 in {input:?}"
        )));
    }

    let magnitude = dms[0] + dms[1] / 60.0 + dms[2] / 3600.0;
    let sign = match hemisphere {
        Some(h) => h.sign(),
        None if negative => -1.0,
        None => 1.0,
    };
    Ok(Coordinate { degrees: sign * magnitude, hemisphere })
}

fn parse_number(s: &str, input: &str) -> Result<f64, OrreryError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| OrreryError::argument(format!("cannot parse altitude {input:?}")))
}

/// Altitude in meters from a bare number, a number with a unit suffix, or a
/// feet-and-inches form such as `5'11"`.
pub(crate) fn parse_altitude(input: &str) -> Result<f64, OrreryError> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return Err(OrreryError::argument("empty altitude"));
    }

    if s.contains('\'') || s.contains('"') {
        let (negative, rest) = match s.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, s.as_str()),
        };
        let (feet, tail) = match rest.split_once('\'') {
            Some((f, t)) => (parse_number(f, input)?, t.trim()),
            None => (0.0, rest),
        };
        let inches = if tail.is_empty() {
            0.0
        } else {
            let n = tail
                .strip_suffix('"')
                .ok_or_else(|| OrreryError::argument(format!("cannot parse altitude {input:?}")))?;
            parse_number(n, input)?
        };
        let meters = feet * FOOT_M + inches * INCH_M;
        return Ok(if negative { -meters } else { meters });
    }

    for (suffix, factor) in ALTITUDE_UNITS {
        if let Some(n) = s.strip_suffix(suffix) {
            return Ok(parse_number(n, input)? * factor);
        }
    }
    parse_number(&s, input)
}

/// Renders `15°45'00"S`, or `15d45'00"S` without Unicode.
pub(crate) fn format_dms(value: f64, positive: char, negative: char, unicode: bool) -> String {
    let letter = if value < 0.0 { negative } else { positive };
    let total = (value.abs() * 3600.0).round() as u64;
    let (d, m, s) = (total / 3600, (total / 60) % 60, total % 60);
    let mark = if unicode { '°' } else { 'd' };
    format!("{d}{mark}{m:02}'{s:02}\"{letter}")
}

/// Where the sky is seen from. Angles in degrees, altitude in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Observer {
    latitude: f64,
    longitude: f64,
    altitude: f64,
}

impl Observer {
    pub(crate) fn new(latitude: f64, longitude: f64, altitude: f64) -> Result<Self, OrreryError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(OrreryError::argument(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !altitude.is_finite() {
            return Err(OrreryError::argument("non-finite longitude or altitude"));
        }
        let mut longitude = longitude.rem_euclid(360.0);
        if longitude > 180.0 {
            longitude -= 360.0;
        }
        Ok(Self { latitude, longitude, altitude })
    }

    /// Builds an observer from the raw command line strings, swapping the two
    /// angles when their hemisphere letters say they came in lon/lat order.
    pub(crate) fn from_args(first: &str, second: &str, altitude: Option<&str>) -> Result<Self, OrreryError> {
        let a = parse_coordinate(first)?;
        let b = parse_coordinate(second)?;

        let swap = matches!(a.hemisphere, Some(h) if !h.is_latitude())
            || matches!(b.hemisphere, Some(h) if h.is_latitude());
        let (lat, lon) = if swap { (b, a) } else { (a, b) };

        if matches!(lat.hemisphere, Some(h) if !h.is_latitude())
            || matches!(lon.hemisphere, Some(h) if h.is_latitude())
        {
            return Err(OrreryError::argument(format!(
                "{first:?} and {second:?} name the same axis"
            )));
        }

        let altitude = match altitude {
            Some(s) => parse_altitude(s)?,
            None => 0.0,
        };
        Self::new(lat.degrees, lon.degrees, altitude)
    }

    pub(crate) fn latitude(&self) -> f64 {
        self.latitude
    }

    pub(crate) fn longitude(&self) -> f64 {
        self.longitude
    }

    pub(crate) fn altitude(&self) -> f64 {
        self.altitude
    }

    pub(crate) fn is_southern(&self) -> bool {
        self.latitude < 0.0
    }

    pub(crate) fn describe(&self, unicode: bool) -> String {
        format!(
            "{} {} {:.0}m",
            format_dms(self.latitude, 'N', 'S', unicode),
            format_dms(self.longitude, 'E', 'W', unicode),
            self.altitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn decimal_degrees() {
        let c = parse_coordinate("-15.75").unwrap();
        assert!(close(c.degrees, -15.75));
        assert_eq!(c.hemisphere, None);
    }

    #[test]
    fn sexagesimal_forms_agree() {
        for s in ["15:45:00", "15 45 0", "15°45'00\"", "15°45′", "15:45"] {
            let c = parse_coordinate(s).unwrap();
            assert!(close(c.degrees, 15.75), "{s}");
        }
    }

    #[test]
    fn hemisphere_letter_sets_sign() {
        let c = parse_coordinate("69°25'12\"w").unwrap();
        assert!(close(c.degrees, -69.42));
        assert_eq!(c.hemisphere, Some(Hemisphere::West));
        assert!(close(parse_coordinate("15.75 S").unwrap().degrees, -15.75));
    }

    #[test]
    fn rejects_malformed_angles() {
        for s in ["", "abc", "1:2:3:4", "10:61", "-15S", "1:-2", "nan"] {
            assert!(parse_coordinate(s).is_err(), "{s}");
        }
    }

    #[test]
    fn swaps_lon_lat_order() {
        let o = Observer::from_args("69.42W", "15.75S", None).unwrap();
        assert!(close(o.latitude(), -15.75));
        assert!(close(o.longitude(), -69.42));
    }

    #[test]
    fn rejects_two_latitudes() {
        assert!(Observer::from_args("10N", "20S", None).is_err());
    }

    #[test]
    fn latitude_out_of_range() {
        assert!(Observer::from_args("91", "0", None).is_err());
    }

    #[test]
    fn longitude_normalized() {
        let o = Observer::new(0.0, 200.0, 0.0).unwrap();
        assert!(close(o.longitude(), -160.0));
        let o = Observer::new(0.0, -180.0, 0.0).unwrap();
        assert!(close(o.longitude(), 180.0));
    }

    #[test]
    fn altitude_units() {
        assert!(close(parse_altitude("3812").unwrap(), 3812.0));
        assert!(close(parse_altitude("3812m").unwrap(), 3812.0));
        assert!(close(parse_altitude("100 ft").unwrap(), 30.48));
        assert!(close(parse_altitude("2yd").unwrap(), 1.8288));
        assert!(close(parse_altitude("10IN").unwrap(), 0.254));
        assert!(close(parse_altitude("5'11\"").unwrap(), 5.0 * 0.3048 + 11.0 * 0.0254));
        assert!(close(parse_altitude("6'").unwrap(), 6.0 * 0.3048));
        assert!(close(parse_altitude("30\"").unwrap(), 30.0 * 0.0254));
        assert!(close(parse_altitude("-10ft").unwrap(), -3.048));
    }

    #[test]
    fn altitude_garbage() {
        for s in ["", "tall", "5'x", "12km"] {
            assert!(parse_altitude(s).is_err(), "{s}");
        }
    }

    #[test]
    fn dms_formatting() {
        assert_eq!(format_dms(-15.75, 'N', 'S', true), "15°45'00\"S");
        assert_eq!(format_dms(-69.42, 'E', 'W', false), "69d25'12\"W");
        // 59.9999" carries into the next minute
        assert_eq!(format_dms(10.0 + 59.0 / 60.0 + 59.9999 / 3600.0, 'N', 'S', true), "11°00'00\"N");
    }

    #[test]
    fn describe_observer() {
        let o = Observer::new(-15.75, -69.42, 3812.0).unwrap();
        assert_eq!(o.describe(true), "15°45'00\"S 69°25'12\"W 3812m");
    }
}
