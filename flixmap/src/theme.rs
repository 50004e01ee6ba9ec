//! Palette shared by the pages. Netflix red on near-black.

use ratatui::style::Color;

pub const PRIMARY: Color = Color::Rgb(0xE5, 0x09, 0x14);
pub const PRIMARY_LIGHT: Color = Color::Rgb(0xFF, 0x44, 0x44);
pub const PRIMARY_DARK: Color = Color::Rgb(0xC4, 0x08, 0x12);
pub const BACKGROUND: Color = Color::Rgb(0x0F, 0x0F, 0x0F);
pub const SURFACE: Color = Color::Rgb(0x1F, 0x1F, 0x1F);
pub const TEXT: Color = Color::Rgb(0xF0, 0xF0, 0xF0);
pub const TEXT_SECONDARY: Color = Color::Rgb(0x99, 0x99, 0x99);
pub const TEXT_MUTED: Color = Color::Rgb(0x66, 0x66, 0x66);
pub const SKELETON: Color = Color::Rgb(0x2A, 0x2A, 0x2A);

pub const ERROR: Color = PRIMARY;
pub const WARNING: Color = Color::Rgb(0xFF, 0x98, 0x00);
pub const INFO: Color = Color::Rgb(0x21, 0x96, 0xF3);
pub const SUCCESS: Color = Color::Rgb(0x4C, 0xAF, 0x50);

/// Star color for ratings.
pub const RATING: Color = Color::Rgb(0xFF, 0xC1, 0x07);
