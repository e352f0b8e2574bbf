//! Palette and style lookup for the tree control.
//!
//! The control never hardcodes colors: every styled element asks a
//! [`StyleSource`] for the [`Style`] of its [`StyleRole`]. [`Theme`] is the
//! stock source; any `Fn(StyleRole) -> Style` works too.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid color '{0}': expected #RRGGBB or #RRGGBBAA")]
pub struct ColorError(String);

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn parse_hex(text: &str) -> Result<Self, ColorError> {
        let err = || ColorError(text.to_string());
        let hex = text.strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse_hex(&value)
    }
}

/// Every element the render adapter styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleRole {
    /// Key or index label.
    Name,
    /// Summary shown next to a container.
    Collapsed,
    Value,
    /// A leaf value while the pointer is over its row.
    ValueHover,
    /// Add / rename / remove glyphs at rest.
    Action,
    ActionAddHover,
    ActionRemoveHover,
    SaveButton,
    CancelButton,
    Input,
    /// Background of a hovered container row.
    RowHover,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub color: Color,
    pub background: Color,
    pub border: Option<Color>,
    pub strong: bool,
}

impl Style {
    pub fn text(color: Color) -> Self {
        Self {
            color,
            background: Color::TRANSPARENT,
            border: None,
            strong: false,
        }
    }
}

pub trait StyleSource {
    fn style(&self, role: StyleRole) -> Style;
}

impl<F: Fn(StyleRole) -> Style> StyleSource for F {
    fn style(&self, role: StyleRole) -> Style {
        self(role)
    }
}

/// Named palette the roles are mapped from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Theme {
    /// Accent: key labels, input borders, primary button.
    pub secondary: Color,
    pub dark: Color,
    /// Leaf values.
    pub darkest: Color,
    /// Resting action glyphs.
    pub mediumdark: Color,
    pub border: Color,
    /// Remove hover and error text.
    pub negative: Color,
    /// Add/rename hover.
    pub ancillary: Color,
    pub lightest: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            secondary: Color::rgb(0x1E, 0xA7, 0xFD),
            dark: Color::rgb(0x66, 0x66, 0x66),
            darkest: Color::rgb(0x33, 0x33, 0x33),
            mediumdark: Color::rgb(0x99, 0x99, 0x99),
            border: Color::rgba(0x00, 0x00, 0x00, 0x1A),
            negative: Color::rgb(0xFF, 0x44, 0x00),
            ancillary: Color::rgb(0x22, 0xA6, 0x99),
            lightest: Color::rgb(0xFF, 0xFF, 0xFF),
        }
    }

    pub fn dark() -> Self {
        Self {
            secondary: Color::rgb(0x1E, 0xA7, 0xFD),
            dark: Color::rgb(0xB0, 0xB0, 0xB0),
            darkest: Color::rgb(0xE6, 0xE6, 0xE6),
            mediumdark: Color::rgb(0x80, 0x80, 0x80),
            border: Color::rgba(0xFF, 0xFF, 0xFF, 0x26),
            negative: Color::rgb(0xFF, 0x44, 0x00),
            ancillary: Color::rgb(0x22, 0xA6, 0x99),
            lightest: Color::rgb(0xFF, 0xFF, 0xFF),
        }
    }

    pub fn from_json5(text: &str) -> anyhow::Result<Self> {
        Ok(json5::from_str::<Theme>(text)?)
    }
}

impl StyleSource for Theme {
    fn style(&self, role: StyleRole) -> Style {
        match role {
            StyleRole::Name => Style::text(self.secondary),
            StyleRole::Collapsed => Style::text(self.dark),
            StyleRole::Value => Style::text(self.darkest),
            StyleRole::ValueHover => Style {
                border: Some(self.border),
                ..Style::text(self.darkest)
            },
            StyleRole::Action => Style::text(self.mediumdark),
            StyleRole::ActionAddHover => Style::text(self.ancillary),
            StyleRole::ActionRemoveHover => Style::text(self.negative),
            StyleRole::SaveButton => Style {
                color: self.lightest,
                background: self.secondary,
                border: None,
                strong: true,
            },
            StyleRole::CancelButton => Style::text(self.dark),
            StyleRole::Input => Style {
                border: Some(self.secondary),
                ..Style::text(self.darkest)
            },
            StyleRole::RowHover => Style {
                background: self.secondary.with_alpha(0x1A),
                ..Style::text(self.darkest)
            },
            StyleRole::Error => Style::text(self.negative),
        }
    }
}
