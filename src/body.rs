use crossterm::style::Color;

/// The nine bodies drawn on the sky map. Declaration order is the selection
/// order used by `j`/`k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Body {
    Sun,
    Mercury,
    Venus,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Body {
    pub(crate) const ALL: [Body; 9] = [
        Body::Sun,
        Body::Mercury,
        Body::Venus,
        Body::Moon,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    /// Farthest first, so nearer bodies overwrite farther ones on collision.
    pub(crate) const DRAW_ORDER: [Body; 9] = [
        Body::Neptune,
        Body::Uranus,
        Body::Saturn,
        Body::Jupiter,
        Body::Mars,
        Body::Sun,
        Body::Venus,
        Body::Mercury,
        Body::Moon,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Moon => "Moon",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
        }
    }

    pub(crate) fn glyph(self, unicode: bool) -> char {
        if unicode {
            match self {
                Body::Sun => '☉',
                Body::Mercury => '☿',
                Body::Venus => '♀',
                Body::Moon => '☾',
                Body::Mars => '♂',
                Body::Jupiter => '♃',
                Body::Saturn => '♄',
                Body::Uranus => '⛢',
                Body::Neptune => '♆',
            }
        } else {
            match self {
                Body::Sun => 'S',
                Body::Mercury => 'm',
                Body::Venus => 'V',
                Body::Moon => 'M',
                Body::Mars => 'r',
                Body::Jupiter => 'J',
                Body::Saturn => 's',
                Body::Uranus => 'U',
                Body::Neptune => 'n',
            }
        }
    }

    pub(crate) fn color(self) -> Color {
        match self {
            Body::Sun => Color::Rgb { r: 255, g: 220, b: 140 },
            Body::Mercury => Color::Grey,
            Body::Venus => Color::Yellow,
            Body::Moon => Color::White,
            Body::Mars => Color::Red,
            Body::Jupiter => Color::Rgb { r: 255, g: 200, b: 160 },
            Body::Saturn => Color::Rgb { r: 230, g: 200, b: 150 },
            Body::Uranus => Color::Rgb { r: 160, g: 220, b: 220 },
            Body::Neptune => Color::Blue,
        }
    }
}
