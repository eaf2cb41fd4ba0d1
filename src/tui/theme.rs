use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Display mode. Affects colors only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub card: Color,
    pub accent: Color,
    pub accent_strong: Color,
    pub sidebar: Color,
    pub sidebar_text: Color,
    pub topbar: Color,
    pub muted: Color,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "🌞 Light",
            Theme::Dark => "🌙 Dark",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: Color::Rgb(0xD8, 0xC3, 0xA5),
                text: Color::Rgb(0x0D, 0x47, 0xA1),
                card: Color::Rgb(0xFF, 0xFF, 0xFF),
                accent: Color::Rgb(0x42, 0xA5, 0xF5),
                accent_strong: Color::Rgb(0x15, 0x65, 0xC0),
                sidebar: Color::Rgb(0x8B, 0x6D, 0x5C),
                sidebar_text: Color::Rgb(0x00, 0x00, 0x00),
                topbar: Color::Rgb(0xD9, 0x8C, 0x6D),
                muted: Color::Rgb(0x5D, 0x4C, 0x3F),
            },
            Theme::Dark => Palette {
                background: Color::Rgb(0x2C, 0x2C, 0x2C),
                text: Color::Rgb(0xFF, 0xFF, 0xFF),
                card: Color::Rgb(0x32, 0x32, 0x32),
                accent: Color::Rgb(0x55, 0x55, 0x55),
                accent_strong: Color::Rgb(0x88, 0x88, 0x88),
                sidebar: Color::Rgb(0x1B, 0x1B, 0x1B),
                sidebar_text: Color::Rgb(0xFF, 0xFF, 0xFF),
                topbar: Color::Rgb(0x1B, 0x1B, 0x1B),
                muted: Color::Rgb(0xAA, 0xAA, 0xAA),
            },
        }
    }
}
