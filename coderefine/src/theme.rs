//! Color theme system for coderefine.
//!
//! Two built-in themes:
//!
//! - `dark` uses ANSI 16 colors so it works on any terminal, including
//!   256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha` is the Catppuccin Mocha palette in RGB; requires truecolor.

use coderefine_core::score::ScoreColor;
use coderefine_core::types::Severity;
use ratatui::style::Color;
use tracing::warn;

/// All color values used across coderefine's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Body text
    pub text: Color,
    /// Labels, placeholders and gutters.
    pub muted: Color,

    // Diff stats
    pub diff_added: Color,
    pub diff_removed: Color,

    // Grade palette, one entry per `ScoreColor`
    pub grade_green: Color,
    pub grade_blue: Color,
    pub grade_amber: Color,
    pub grade_red: Color,

    // Issue severity badges
    pub badge_critical: Color,
    pub badge_warning: Color,
    pub badge_info: Color,

    // Output tabs and filter bar
    pub selected: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,
    pub status_error: Color,
    pub status_notice: Color,

    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            text: Color::Reset,
            muted: Color::DarkGray,

            diff_added: Color::Green,
            diff_removed: Color::Red,

            grade_green: Color::Green,
            grade_blue: Color::Blue,
            grade_amber: Color::Yellow,
            grade_red: Color::Red,

            badge_critical: Color::Red,
            badge_warning: Color::Yellow,
            badge_info: Color::Blue,

            selected: Color::Cyan,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            status_error: Color::LightRed,
            status_notice: Color::LightGreen,

            background: Color::Reset,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let blue = Color::Rgb(137, 180, 250);     // #89b4fa
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let base = Color::Rgb(30, 30, 46);        // #1e1e2e
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4
        let peach = Color::Rgb(250, 179, 135);    // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            text,
            muted: overlay1,

            diff_added: green,
            diff_removed: red,

            grade_green: green,
            grade_blue: blue,
            grade_amber: peach,
            grade_red: red,

            badge_critical: red,
            badge_warning: yellow,
            badge_info: blue,

            selected: lavender,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            status_error: red,
            status_notice: green,

            background: base,
        }
    }

    /// Resolves a theme name to a built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup.
    ///
    /// # Arguments
    ///
    /// * `name`: theme name from config, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }

    pub fn grade(&self, color: ScoreColor) -> Color {
        match color {
            ScoreColor::Green => self.grade_green,
            ScoreColor::Blue => self.grade_blue,
            ScoreColor::Amber => self.grade_amber,
            ScoreColor::Red => self.grade_red,
        }
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Critical => self.badge_critical,
            Severity::Warning => self.badge_warning,
            Severity::Info => self.badge_info,
            Severity::Unknown => self.muted,
        }
    }
}
