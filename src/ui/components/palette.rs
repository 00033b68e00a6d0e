//! Fixed color palette for the wizard screens.

use ratatui::style::Color;

pub const ACCENT_PRIMARY: Color = Color::Rgb(130, 170, 255);
pub const ACCENT_SUCCESS: Color = Color::Rgb(120, 200, 140);
pub const ACCENT_ERROR: Color = Color::Rgb(235, 110, 110);
pub const ACCENT_WARNING: Color = Color::Rgb(230, 190, 100);

pub const TEXT_PRIMARY: Color = Color::Rgb(225, 228, 235);
pub const TEXT_SECONDARY: Color = Color::Rgb(180, 185, 195);
pub const TEXT_MUTED: Color = Color::Rgb(130, 136, 148);
pub const TEXT_FAINT: Color = Color::Rgb(90, 95, 105);

pub const BORDER_DEFAULT: Color = Color::Rgb(70, 75, 85);
pub const BORDER_FOCUSED: Color = ACCENT_PRIMARY;

pub const FOOTER_BG: Color = Color::Rgb(28, 30, 36);
pub const KEY_BG: Color = Color::Rgb(50, 54, 62);
