//! Render theme palettes and the fixed theme registry.
//!
//! Themes are immutable and looked up by name. A theme flagged `dynamic`
//! draws an animated background and needs the session's animation loop.

use super::RgbColor;

/// Extra shape drawn inside every key body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDecoration {
    /// Plain key body
    Plain,
    /// White disc with a black outline centred in the key; label text is black
    Disc,
}

/// Named palette used by the render engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Registry name (e.g., "dark")
    pub name: &'static str,
    /// Fill for ordinary keys
    pub normal: RgbColor,
    /// Fill for transparent (`TRANS`) keys
    pub special: RgbColor,
    /// Fill for keys whose label is held
    pub pressed: RgbColor,
    /// Key outline
    pub stroke: RgbColor,
    /// Canvas background for static themes
    pub background: RgbColor,
    /// Label text
    pub text: RgbColor,
    /// Background is generated per frame from the animation phase
    pub dynamic: bool,
    /// Extra shape drawn inside keys
    pub decoration: KeyDecoration,
}

/// Name accepted in configuration to follow the OS dark/light preference.
pub const AUTO_THEME: &str = "auto";

const fn palette(
    name: &'static str,
    colors: [u32; 6],
    dynamic: bool,
    decoration: KeyDecoration,
) -> Theme {
    Theme {
        name,
        normal: RgbColor::from_u32(colors[0]),
        special: RgbColor::from_u32(colors[1]),
        pressed: RgbColor::from_u32(colors[2]),
        stroke: RgbColor::from_u32(colors[3]),
        background: RgbColor::from_u32(colors[4]),
        text: RgbColor::from_u32(colors[5]),
        dynamic,
        decoration,
    }
}

/// Every registered theme, in selector order.
#[rustfmt::skip]
pub static THEMES: [Theme; 7] = [
    //                      normal    special   pressed   stroke    background text
    palette("light",       [0xf3f4f6, 0xe5e7eb, 0xfef3c7, 0x9ca3af, 0xffffff, 0x1f2937], false, KeyDecoration::Plain),
    palette("dark",        [0x374151, 0x1f2937, 0x92400e, 0x6b7280, 0x111827, 0xffffff], false, KeyDecoration::Plain),
    palette("blue",        [0xdbeafe, 0xbfdbfe, 0xffb347, 0x60a5fa, 0xeff6ff, 0x1e40af], false, KeyDecoration::Plain),
    palette("green",       [0xd1fae5, 0xa7f3d0, 0xffe066, 0x34d399, 0xecfdf5, 0x065f46], false, KeyDecoration::Plain),
    palette("console",     [0x003300, 0x001a00, 0x00ff00, 0x00ff00, 0x000000, 0x00ff00], false, KeyDecoration::Plain),
    palette("myakumyaku",  [0xff0000, 0x0066cc, 0x000000, 0xffffff, 0x0066cc, 0x000000], false, KeyDecoration::Disc),
    palette("psychedelic", [0x2d1b4e, 0x1b103a, 0xff00ff, 0xffffff, 0x000000, 0xffffff], true, KeyDecoration::Plain),
];

impl Theme {
    /// Looks up a registered theme by name (case-insensitive).
    #[must_use]
    pub fn by_name(name: &str) -> Option<&'static Self> {
        THEMES
            .iter()
            .find(|theme| theme.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Resolves a configured theme name, following the OS preference for `"auto"`.
    #[must_use]
    pub fn resolve(name: &str) -> Option<&'static Self> {
        if name.trim().eq_ignore_ascii_case(AUTO_THEME) {
            Some(Self::detect())
        } else {
            Self::by_name(name)
        }
    }

    /// Detects the OS theme and returns the matching light or dark palette.
    ///
    /// This uses the `dark-light` crate; unspecified modes and detection
    /// errors fall back to the dark palette.
    #[must_use]
    pub fn detect() -> &'static Self {
        match dark_light::detect() {
            Ok(dark_light::Mode::Light) => Self::light(),
            Ok(dark_light::Mode::Dark | dark_light::Mode::Unspecified) | Err(_) => Self::dark(),
        }
    }

    /// The built-in light palette.
    #[must_use]
    pub fn light() -> &'static Self {
        &THEMES[0]
    }

    /// The built-in dark palette.
    #[must_use]
    pub fn dark() -> &'static Self {
        &THEMES[1]
    }

    /// Names of all registered themes.
    pub fn names() -> impl Iterator<Item = &'static str> {
        THEMES.iter().map(|theme| theme.name)
    }
}
