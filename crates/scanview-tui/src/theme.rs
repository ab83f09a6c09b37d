//! Colour themes for the scanview TUI.
//!
//! Both themes are TOML files embedded via [`include_str!`] so the binary
//! works without any files on disk. The active one follows the persisted
//! [`ThemePreference`].

use config::{Config, File, FileFormat};
use ratatui::style::{Color, Modifier, Style};
use scanview_core::prefs::ThemePreference;
use serde::Deserialize;

const DARK_THEME_SRC: &str = include_str!("themes/dark.toml");
const LIGHT_THEME_SRC: &str = include_str!("themes/light.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types: mirror the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underlined: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underlined {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    unfocused: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    header: RawStyle,
    cursor: RawStyle,
    seen: RawStyle,
    link: RawStyle,
    chip: RawStyle,
    checkbox: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    info: RawStyle,
    ok: RawStyle,
    error: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawFilter {
    label: RawStyle,
    value: RawStyle,
    #[serde(default)]
    pending: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    borders: RawBorders,
    table: RawTable,
    status: RawStatus,
    filter: RawFilter,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Pre-resolved ratatui styles, so nothing is parsed at render time.
#[derive(Debug, Clone)]
pub struct Theme {
    pub preference: ThemePreference,

    pub border_focused: Style,
    pub border_unfocused: Style,

    pub header: Style,
    /// Highlight for the row under the cursor.
    pub cursor: Style,
    /// Dimmed styling for rows already marked seen.
    pub seen: Style,
    pub link: Style,
    pub chip: Style,
    pub checkbox: Style,

    pub status_info: Style,
    pub status_ok: Style,
    pub status_error: Style,

    pub filter_label: Style,
    pub filter_value: Style,
    /// Filter edits not yet applied.
    pub filter_pending: Style,
}

impl Theme {
    /// Embedded theme for `pref`. Falls back to an unstyled theme if the
    /// embedded TOML ever fails to parse.
    pub fn for_preference(pref: ThemePreference) -> Self {
        let src = match pref {
            ThemePreference::Dark => DARK_THEME_SRC,
            ThemePreference::Light => LIGHT_THEME_SRC,
        };
        match Self::from_toml_str(src, pref) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::error!(error = %e, theme = pref.as_str(), "embedded theme is invalid");
                Self::plain(pref)
            }
        }
    }

    /// Parse a theme from a TOML string. Unknown keys are ignored.
    pub fn from_toml_str(src: &str, preference: ThemePreference) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            preference,
            border_focused: raw.borders.focused.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            header: raw.table.header.into_style(),
            cursor: raw.table.cursor.into_style(),
            seen: raw.table.seen.into_style(),
            link: raw.table.link.into_style(),
            chip: raw.table.chip.into_style(),
            checkbox: raw.table.checkbox.into_style(),
            status_info: raw.status.info.into_style(),
            status_ok: raw.status.ok.into_style(),
            status_error: raw.status.error.into_style(),
            filter_label: raw.filter.label.into_style(),
            filter_value: raw.filter.value.into_style(),
            filter_pending: raw.filter.pending.into_style(),
        })
    }

    fn plain(preference: ThemePreference) -> Self {
        let d = Style::default();
        Self {
            preference,
            border_focused: d.add_modifier(Modifier::BOLD),
            border_unfocused: d,
            header: d.add_modifier(Modifier::BOLD),
            cursor: d.add_modifier(Modifier::REVERSED),
            seen: d.add_modifier(Modifier::DIM),
            link: d.add_modifier(Modifier::UNDERLINED),
            chip: d,
            checkbox: d,
            status_info: d,
            status_ok: d,
            status_error: d.add_modifier(Modifier::BOLD),
            filter_label: d,
            filter_value: d.add_modifier(Modifier::BOLD),
            filter_pending: d.add_modifier(Modifier::ITALIC),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a colour name into a ratatui [`Color`].
///
/// Accepts named terminal colours (case-insensitive), `#rrggbb` and
/// `indexed:N`.
fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGray),
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s["indexed:".len()..].parse().ok()?;
            Some(Color::Indexed(n))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
