//! Colour parsing, style normalization and WCAG contrast ratios.

use crate::host::ComputedStyle;
use serde::{Deserialize, Serialize};

/// Default font size in CSS pixels.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Default (normal) font weight.
pub const DEFAULT_FONT_WEIGHT: u16 = 400;

/// An sRGB colour with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `0.0..=1.0`.
    pub a: f64,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Creates an opaque colour.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parses a CSS colour value.
    ///
    /// Supports `rgb()`/`rgba()` (comma or space separated), `#rgb`,
    /// `#rgba`, `#rrggbb`, `#rrggbbaa`, `transparent` and the basic named
    /// colours. Returns `None` for anything else.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        if let Some(hex) = value.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        if let Some(args) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
        {
            return Self::parse_function(args.strip_suffix(')')?);
        }
        Self::named(&value)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let nibble = |i: usize| u8::from_str_radix(hex.get(i..=i)?, 16).ok();
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 | 4 => {
                let alpha = if hex.len() == 4 {
                    f64::from(nibble(3)? * 17) / 255.0
                } else {
                    1.0
                };
                Some(Self {
                    r: nibble(0)? * 17,
                    g: nibble(1)? * 17,
                    b: nibble(2)? * 17,
                    a: alpha,
                })
            }
            6 | 8 => {
                let alpha = if hex.len() == 8 {
                    f64::from(byte(6)?) / 255.0
                } else {
                    1.0
                };
                Some(Self {
                    r: byte(0)?,
                    g: byte(2)?,
                    b: byte(4)?,
                    a: alpha,
                })
            }
            _ => None,
        }
    }

    fn parse_function(args: &str) -> Option<Self> {
        let parts: Vec<&str> = args
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() < 3 || parts.len() > 4 {
            return None;
        }
        let channel = |p: &str| -> Option<u8> {
            let v = if let Some(pct) = p.strip_suffix('%') {
                pct.parse::<f64>().ok()? * 2.55
            } else {
                p.parse::<f64>().ok()?
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let byte = v.round().clamp(0.0, 255.0) as u8;
            Some(byte)
        };
        let alpha = match parts.get(3) {
            Some(p) => {
                if let Some(pct) = p.strip_suffix('%') {
                    pct.parse::<f64>().ok()? / 100.0
                } else {
                    p.parse::<f64>().ok()?
                }
            }
            None => 1.0,
        };
        Some(Self {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
            a: alpha.clamp(0.0, 1.0),
        })
    }

    fn named(name: &str) -> Option<Self> {
        let rgb = match name {
            "transparent" => {
                return Some(Self {
                    r: 0,
                    g: 0,
                    b: 0,
                    a: 0.0,
                })
            }
            "black" => (0, 0, 0),
            "white" => (255, 255, 255),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "lime" => (0, 255, 0),
            "blue" => (0, 0, 255),
            "navy" => (0, 0, 128),
            "yellow" => (255, 255, 0),
            "orange" => (255, 165, 0),
            "purple" => (128, 0, 128),
            "gray" | "grey" => (128, 128, 128),
            "silver" => (192, 192, 192),
            "maroon" => (128, 0, 0),
            "olive" => (128, 128, 0),
            "teal" => (0, 128, 128),
            "aqua" | "cyan" => (0, 255, 255),
            "fuchsia" | "magenta" => (255, 0, 255),
            _ => return None,
        };
        Some(Self::rgb(rgb.0, rgb.1, rgb.2))
    }

    /// Returns `true` when the colour is fully transparent.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Composites this colour over `backdrop` (source-over).
    #[must_use]
    pub fn over(&self, backdrop: &Rgba) -> Rgba {
        if self.a >= 1.0 {
            return *self;
        }
        let a = self.a + backdrop.a * (1.0 - self.a);
        if a <= 0.0 {
            return Rgba { a: 0.0, ..*self };
        }
        let blend = |top: u8, bottom: u8| -> u8 {
            let v = (f64::from(top) * self.a + f64::from(bottom) * backdrop.a * (1.0 - self.a)) / a;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let byte = v.round().clamp(0.0, 255.0) as u8;
            byte
        };
        Rgba {
            r: blend(self.r, backdrop.r),
            g: blend(self.g, backdrop.g),
            b: blend(self.b, backdrop.b),
            a,
        }
    }

    /// Formats the colour as `#rrggbb`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// WCAG relative luminance.
    #[must_use]
    pub fn luminance(&self) -> f64 {
        fn linear(channel: u8) -> f64 {
            let c = f64::from(channel) / 255.0;
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }
}

/// WCAG contrast ratio between two colours, rounded to one decimal.
///
/// Rounding happens after the division; intermediate values are unrounded.
#[must_use]
pub fn contrast_ratio(a: &Rgba, b: &Rgba) -> f64 {
    let (l1, l2) = (a.luminance(), b.luminance());
    let ratio = (l1.max(l2) + 0.05) / (l1.min(l2) + 0.05);
    (ratio * 10.0).round() / 10.0
}

/// Parses a font weight. `None` means "inherit from the parent".
#[must_use]
pub fn parse_font_weight(value: &str) -> Option<u16> {
    match value.trim().to_ascii_lowercase().as_str() {
        "inherit" | "" => None,
        "bold" | "bolder" => Some(700),
        "lighter" => Some(100),
        "normal" => Some(DEFAULT_FONT_WEIGHT),
        other => Some(other.parse::<u16>().unwrap_or(DEFAULT_FONT_WEIGHT)),
    }
}

/// Parses a font size in CSS pixels. `None` means "inherit from the parent".
///
/// Relative units resolve against `parent_size`; unparsable values fall back
/// to [`DEFAULT_FONT_SIZE`].
#[must_use]
pub fn parse_font_size(value: &str, parent_size: f64) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    if value.is_empty() || value == "inherit" {
        return None;
    }
    let number = |s: &str| s.trim().parse::<f64>().ok().filter(|n| n.is_finite());
    let size = if let Some(n) = value.strip_suffix("px") {
        number(n)
    } else if let Some(n) = value.strip_suffix("pt") {
        number(n).map(|pt| pt * 4.0 / 3.0)
    } else if let Some(n) = value.strip_suffix("rem") {
        number(n).map(|em| em * DEFAULT_FONT_SIZE)
    } else if let Some(n) = value.strip_suffix("em") {
        number(n).map(|em| em * parent_size)
    } else if let Some(n) = value.strip_suffix('%') {
        number(n).map(|pct| pct * parent_size / 100.0)
    } else {
        number(&value)
    };
    Some(size.filter(|s| *s > 0.0).unwrap_or(DEFAULT_FONT_SIZE))
}

/// Returns `true` when text of the given size and weight counts as large.
#[must_use]
pub fn is_large_font(font_size: f64, font_weight: u16) -> bool {
    font_size > 1.2 * DEFAULT_FONT_SIZE || (font_size > DEFAULT_FONT_SIZE && font_weight >= 300)
}

/// Normalized style of one element with its contrast ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStyle {
    /// Foreground colour.
    pub color: Rgba,
    /// Foreground colour as `#rrggbb`.
    pub color_hex: String,
    /// Effective background colour.
    pub background: Rgba,
    /// Effective background colour as `#rrggbb`.
    pub background_hex: String,
    /// Effective background image, if any.
    pub background_image: Option<String>,
    /// Effective opacity (product of the ancestor chain).
    pub opacity: f64,
    /// Font family.
    pub font_family: String,
    /// Font size in CSS pixels.
    pub font_size: f64,
    /// Numeric font weight.
    pub font_weight: u16,
    /// Large-font flag.
    pub is_large_font: bool,
    /// Contrast ratio between colour and background.
    pub contrast_ratio: f64,
}

impl ResolvedStyle {
    /// Style of the virtual parent of a document root: black on white, 16px.
    #[must_use]
    pub fn root() -> Self {
        Self::from_parts(
            Rgba::BLACK,
            Rgba::WHITE,
            None,
            1.0,
            String::new(),
            DEFAULT_FONT_SIZE,
            DEFAULT_FONT_WEIGHT,
        )
    }

    fn from_parts(
        color: Rgba,
        background: Rgba,
        background_image: Option<String>,
        opacity: f64,
        font_family: String,
        font_size: f64,
        font_weight: u16,
    ) -> Self {
        Self {
            color_hex: color.to_hex(),
            background_hex: background.to_hex(),
            contrast_ratio: contrast_ratio(&color.over(&background), &background),
            is_large_font: is_large_font(font_size, font_weight),
            color,
            background,
            background_image,
            opacity,
            font_family,
            font_size,
            font_weight,
        }
    }

    /// Resolves an element's style against its parent's resolved style.
    ///
    /// With no computed style the element inherits everything from its parent.
    #[must_use]
    pub fn resolve(style: Option<&ComputedStyle>, parent: &ResolvedStyle) -> Self {
        let Some(style) = style else {
            return parent.clone();
        };

        let color = match style.color.trim() {
            "" | "inherit" | "currentcolor" => parent.color,
            raw => Rgba::parse(raw).unwrap_or(Rgba::BLACK),
        };

        let background = match style.background_color.trim() {
            "" | "inherit" => parent.background,
            raw => match Rgba::parse(raw) {
                Some(c) if !c.is_transparent() => c.over(&parent.background),
                _ => parent.background,
            },
        };

        let background_image = match style.background_image.trim() {
            "" | "none" | "inherit" => parent.background_image.clone(),
            raw => Some(raw.to_string()),
        };

        let opacity = style
            .opacity
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|o| o.is_finite())
            .map_or(1.0, |o| o.clamp(0.0, 1.0))
            * parent.opacity;

        let font_family = match style.font_family.trim() {
            "" | "inherit" => parent.font_family.clone(),
            raw => raw.to_string(),
        };

        let font_size = parse_font_size(&style.font_size, parent.font_size).unwrap_or(parent.font_size);
        let font_weight = parse_font_weight(&style.font_weight).unwrap_or(parent.font_weight);

        Self::from_parts(
            color,
            background,
            background_image,
            opacity,
            font_family,
            font_size,
            font_weight,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_on_white_is_21() {
        let ratio = contrast_ratio(
            &Rgba::parse("rgb(0,0,0)").unwrap(),
            &Rgba::parse("rgb(255,255,255)").unwrap(),
        );
        assert!((ratio - 21.0).abs() < f64::EPSILON);
    }

    #[test]
    fn contrast_is_symmetric() {
        let samples = ["#777", "#0055aa", "rgb(200, 30, 10)", "white", "#123456"];
        for a in samples {
            for b in samples {
                let (ca, cb) = (Rgba::parse(a).unwrap(), Rgba::parse(b).unwrap());
                assert!((contrast_ratio(&ca, &cb) - contrast_ratio(&cb, &ca)).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn grey_on_white_rounds_after_division() {
        // #777777 on white is 4.478..., which must round to 4.5.
        let ratio = contrast_ratio(&Rgba::parse("#777777").unwrap(), &Rgba::WHITE);
        assert!((ratio - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_colour_syntaxes() {
        assert_eq!(Rgba::parse("#fff"), Some(Rgba::WHITE));
        assert_eq!(Rgba::parse("#FF0000").map(|c| c.to_hex()), Some("#ff0000".into()));
        assert_eq!(Rgba::parse("rgb(0 128 0)"), Some(Rgba::rgb(0, 128, 0)));
        assert!(Rgba::parse("rgba(10, 20, 30, 0)").unwrap().is_transparent());
        assert!(Rgba::parse("transparent").unwrap().is_transparent());
        assert_eq!(Rgba::parse("not-a-colour"), None);
        assert_eq!(Rgba::parse("#12"), None);
    }

    #[test]
    fn font_weight_keywords() {
        assert_eq!(parse_font_weight("bold"), Some(700));
        assert_eq!(parse_font_weight("bolder"), Some(700));
        assert_eq!(parse_font_weight("normal"), Some(400));
        assert_eq!(parse_font_weight("600"), Some(600));
        assert_eq!(parse_font_weight("garbage"), Some(400));
        assert_eq!(parse_font_weight("inherit"), None);
    }

    #[test]
    fn font_size_units_and_defaults() {
        assert_eq!(parse_font_size("20px", 16.0), Some(20.0));
        assert_eq!(parse_font_size("12pt", 16.0), Some(16.0));
        assert_eq!(parse_font_size("2em", 10.0), Some(20.0));
        assert_eq!(parse_font_size("150%", 16.0), Some(24.0));
        assert_eq!(parse_font_size("NaNpx", 16.0), Some(DEFAULT_FONT_SIZE));
        assert_eq!(parse_font_size("inherit", 16.0), None);
    }

    #[test]
    fn large_font_thresholds() {
        assert!(is_large_font(19.3, 400));
        assert!(!is_large_font(19.2, 200));
        assert!(is_large_font(17.0, 300));
        assert!(!is_large_font(16.0, 700));
    }

    #[test]
    fn transparent_background_defers_to_parent() {
        let parent = ResolvedStyle::resolve(
            Some(&ComputedStyle::default().background_color("rgb(0, 0, 128)")),
            &ResolvedStyle::root(),
        );
        let child = ResolvedStyle::resolve(
            Some(
                &ComputedStyle::default()
                    .color("#ffffff")
                    .background_color("rgba(0, 0, 0, 0)"),
            ),
            &parent,
        );
        assert_eq!(child.background_hex, "#000080");
        assert_eq!(child.color_hex, "#ffffff");
        assert!(child.contrast_ratio > 15.0);
    }

    #[test]
    fn translucent_colours_blend_over_their_backdrop() {
        let half_black = Rgba::parse("rgba(0, 0, 0, 0.5)").unwrap();
        assert_eq!(half_black.over(&Rgba::WHITE), Rgba::rgb(128, 128, 128));
        assert_eq!(Rgba::BLACK.over(&Rgba::WHITE), Rgba::BLACK);

        let child = ResolvedStyle::resolve(
            Some(
                &ComputedStyle::default()
                    .color("rgba(0, 0, 0, 0.5)")
                    .background_color("rgba(0, 0, 0, 0.5)"),
            ),
            &ResolvedStyle::root(),
        );
        assert_eq!(child.background_hex, "#808080");
        assert!((child.background.a - 1.0).abs() < f64::EPSILON);
        // Text at half alpha over mid grey lands on #404040.
        assert!((child.contrast_ratio - contrast_ratio(&Rgba::rgb(64, 64, 64), &child.background)).abs() < f64::EPSILON);
        assert!(child.contrast_ratio < 3.0);
    }

    #[test]
    fn unparsable_colour_becomes_black() {
        let parent = ResolvedStyle::resolve(
            Some(&ComputedStyle::default().color("white").background_color("black")),
            &ResolvedStyle::root(),
        );
        let child =
            ResolvedStyle::resolve(Some(&ComputedStyle::default().color("bogus")), &parent);
        assert_eq!(child.color_hex, "#000000");
    }

    #[test]
    fn background_image_inherits_until_reset() {
        let parent = ResolvedStyle::resolve(
            Some(&ComputedStyle::default().background_image("url(hero.png)")),
            &ResolvedStyle::root(),
        );
        let child = ResolvedStyle::resolve(Some(&ComputedStyle::default()), &parent);
        assert_eq!(child.background_image.as_deref(), Some("url(hero.png)"));
    }

    #[test]
    fn missing_style_inherits_parent() {
        let root = ResolvedStyle::root();
        assert_eq!(ResolvedStyle::resolve(None, &root), root);
    }
}
