// File: crates/strata-core/src/color.rs
// Summary: Color values, default palette, and the ordinal color scale.

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fallback when a lookup key was never assigned.
pub const DEFAULT_COLOR: Color = Color::rgb(0x87, 0xce, 0xeb); // skyblue

/// Default categorical palette.
pub const DEFAULT_PALETTE: [Color; 10] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
];

/// Ordinal mapping from series color keys to palette colors.
///
/// Assignment is first-seen order over the palette (cycling when the
/// palette is exhausted). Because it is a pure function of the ordered key
/// list, rebuilding over unchanged series identities reproduces the same
/// colors, so live updates do not flicker.
#[derive(Clone, Debug, Default)]
pub struct ColorScale {
    assignments: Vec<(String, Color)>,
}

impl ColorScale {
    pub fn assign<'a, I>(keys: I, palette: &[Color]) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let palette = if palette.is_empty() { &DEFAULT_PALETTE[..] } else { palette };
        let mut assignments: Vec<(String, Color)> = Vec::new();
        for key in keys {
            if assignments.iter().any(|(k, _)| k == key) {
                continue;
            }
            let color = palette[assignments.len() % palette.len()];
            assignments.push((key.to_string(), color));
        }
        Self { assignments }
    }

    pub fn color(&self, key: &str) -> Color {
        self.assignments
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, c)| *c)
            .unwrap_or(DEFAULT_COLOR)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
