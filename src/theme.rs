use std::sync::OnceLock;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Mocha,
    TokyoNightStorm,
    Terminal,
}

impl Theme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mocha" => Some(Theme::Mocha),
            "tokyo-night-storm" | "tokyo-night" | "tokyonight" => Some(Theme::TokyoNightStorm),
            "terminal" => Some(Theme::Terminal),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub fg: Color,
    pub muted: Color,
    pub accent_primary: Color,
    pub accent_secondary: Color,
    pub border_inactive: Color,
    pub selection_bg: Color,
    pub btn_bg: Color,
    pub btn_fg: Color,
    pub diff_add_fg: Color,
    pub diff_del_fg: Color,
    pub diff_hunk_fg: Color,
    pub status_modified: Color,
    pub warn_fg: Color,
}

pub fn palette_for(theme: Theme) -> Palette {
    match theme {
        Theme::Mocha => Palette {
            fg: Color::Rgb(248, 248, 255),
            muted: Color::Rgb(147, 153, 178),
            accent_primary: Color::Rgb(203, 166, 247),
            accent_secondary: Color::Rgb(250, 179, 135),
            border_inactive: Color::Rgb(120, 124, 150),
            selection_bg: Color::Rgb(78, 82, 110),
            btn_bg: Color::Rgb(243, 139, 168),
            btn_fg: Color::Rgb(24, 24, 37),
            diff_add_fg: Color::Rgb(148, 226, 213),
            diff_del_fg: Color::Rgb(243, 139, 168),
            diff_hunk_fg: Color::Rgb(137, 180, 250),
            status_modified: Color::Rgb(249, 226, 175),
            warn_fg: Color::Rgb(249, 226, 175),
        },
        Theme::TokyoNightStorm => Palette {
            fg: Color::Rgb(192, 202, 245),
            muted: Color::Rgb(86, 95, 137),
            accent_primary: Color::Rgb(122, 162, 247),
            accent_secondary: Color::Rgb(255, 158, 100),
            border_inactive: Color::Rgb(65, 72, 104),
            selection_bg: Color::Rgb(46, 60, 100),
            btn_bg: Color::Rgb(247, 118, 142),
            btn_fg: Color::Rgb(26, 27, 38),
            diff_add_fg: Color::Rgb(158, 206, 106),
            diff_del_fg: Color::Rgb(247, 118, 142),
            diff_hunk_fg: Color::Rgb(125, 207, 255),
            status_modified: Color::Rgb(224, 175, 104),
            warn_fg: Color::Rgb(224, 175, 104),
        },
        Theme::Terminal => Palette {
            fg: Color::Reset,
            muted: Color::DarkGray,
            accent_primary: Color::Magenta,
            accent_secondary: Color::Yellow,
            border_inactive: Color::DarkGray,
            selection_bg: Color::DarkGray,
            btn_bg: Color::Red,
            btn_fg: Color::Black,
            diff_add_fg: Color::Green,
            diff_del_fg: Color::Red,
            diff_hunk_fg: Color::Cyan,
            status_modified: Color::Yellow,
            warn_fg: Color::Yellow,
        },
    }
}

static PALETTE: OnceLock<Palette> = OnceLock::new();

/// Install the palette for this process. Later calls are ignored.
pub fn init(theme: Theme) {
    let _ = PALETTE.set(palette_for(theme));
}

pub fn palette() -> &'static Palette {
    PALETTE.get_or_init(|| palette_for(Theme::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_serde() {
        let t: Theme = serde_json::from_str("\"tokyo-night-storm\"").unwrap();
        assert_eq!(t, Theme::TokyoNightStorm);
        assert_eq!(serde_json::to_string(&Theme::Terminal).unwrap(), "\"terminal\"");
    }

    #[test]
    fn from_name_accepts_aliases() {
        assert_eq!(Theme::from_name(" Tokyo-Night "), Some(Theme::TokyoNightStorm));
        assert_eq!(Theme::from_name("mocha"), Some(Theme::Mocha));
        assert_eq!(Theme::from_name("solarized"), None);
    }
}
