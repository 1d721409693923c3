//! Page color themes
//!
//! Computes colors only; applying them to the page lives in the platform
//! layer.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Random theme channel range
const RANDOM_CHANNEL_MIN: u8 = 20;
const RANDOM_CHANNEL_MAX: u8 = 220;
/// Brightness above which text switches to black
const BRIGHTNESS_THRESHOLD: f64 = 128.0;
/// Panel opacity over a random background
const RANDOM_PANEL_ALPHA: f32 = 0.12;

/// Theme selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    Random,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::Random => "random",
        }
    }

    /// Parse a theme card name; anything unknown falls back to random
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "light" => ThemeMode::Light,
            "dark" => ThemeMode::Dark,
            _ => ThemeMode::Random,
        }
    }
}

/// sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::hex(0x000000);
    pub const WHITE: Rgb = Rgb::hex(0xffffff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Perceived brightness on a 0-255 scale (ITU-R 601 weights)
    pub fn brightness(&self) -> f64 {
        (self.r as f64 * 299.0 + self.g as f64 * 587.0 + self.b as f64 * 114.0) / 1000.0
    }

    /// Black or white, whichever reads better on this color
    pub fn contrasting_text(&self) -> Rgb {
        if self.brightness() > BRIGHTNESS_THRESHOLD {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    }

    /// CSS `rgba()` with the given opacity
    pub fn with_alpha(&self, alpha: f32) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, alpha)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Styling for the translucent panels on top of the background
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelStyle {
    pub background: Rgb,
    /// Opacity of `background` (1.0 = solid)
    pub alpha: f32,
    pub foreground: Rgb,
}

impl PanelStyle {
    pub fn background_css(&self) -> String {
        if self.alpha >= 1.0 {
            self.background.to_string()
        } else {
            self.background.with_alpha(self.alpha)
        }
    }
}

/// Computed page colors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub mode: ThemeMode,
    pub background: Rgb,
    pub foreground: Rgb,
    pub panel: PanelStyle,
}

impl Theme {
    pub const LIGHT: Theme = Theme {
        mode: ThemeMode::Light,
        background: Rgb::hex(0xf9fafb),
        foreground: Rgb::hex(0x1f2937),
        panel: PanelStyle {
            background: Rgb::hex(0xffffff),
            alpha: 1.0,
            foreground: Rgb::hex(0x1f2937),
        },
    };

    pub const DARK: Theme = Theme {
        mode: ThemeMode::Dark,
        background: Rgb::hex(0x0f172a),
        foreground: Rgb::hex(0xf8fafc),
        panel: PanelStyle {
            background: Rgb::hex(0x111827),
            alpha: 1.0,
            foreground: Rgb::hex(0xf8fafc),
        },
    };

    /// Random background with contrasting text and tinted panels
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let background = Rgb::new(
            rng.random_range(RANDOM_CHANNEL_MIN..RANDOM_CHANNEL_MAX),
            rng.random_range(RANDOM_CHANNEL_MIN..RANDOM_CHANNEL_MAX),
            rng.random_range(RANDOM_CHANNEL_MIN..RANDOM_CHANNEL_MAX),
        );
        let foreground = background.contrasting_text();
        Theme {
            mode: ThemeMode::Random,
            background,
            foreground,
            panel: PanelStyle {
                background,
                alpha: RANDOM_PANEL_ALPHA,
                foreground,
            },
        }
    }
}

/// Colors for a theme mode; `rng` is only drawn from in random mode
pub fn compute_theme<R: Rng + ?Sized>(mode: ThemeMode, rng: &mut R) -> Theme {
    match mode {
        ThemeMode::Light => Theme::LIGHT,
        ThemeMode::Dark => Theme::DARK,
        ThemeMode::Random => Theme::random(rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_fixed_themes() {
        let mut rng = Pcg64::seed_from_u64(1);
        let light = compute_theme(ThemeMode::Light, &mut rng);
        assert_eq!(light.background.to_string(), "#f9fafb");
        assert_eq!(light.foreground.to_string(), "#1f2937");
        assert_eq!(light.panel.background_css(), "#ffffff");

        let dark = compute_theme(ThemeMode::Dark, &mut rng);
        assert_eq!(dark.background.to_string(), "#0f172a");
        assert_eq!(dark.panel.background.to_string(), "#111827");
        assert_eq!(dark.panel.foreground, dark.foreground);
    }

    #[test]
    fn test_random_channels_in_range() {
        let mut rng = Pcg64::seed_from_u64(42);
        for _ in 0..500 {
            let theme = compute_theme(ThemeMode::Random, &mut rng);
            for c in [theme.background.r, theme.background.g, theme.background.b] {
                assert!((20..220).contains(&c));
            }
            assert_eq!(theme.foreground, theme.background.contrasting_text());
            assert_eq!(theme.panel.background, theme.background);
        }
    }

    #[test]
    fn test_random_is_deterministic_per_seed() {
        let a = compute_theme(ThemeMode::Random, &mut Pcg64::seed_from_u64(7));
        let b = compute_theme(ThemeMode::Random, &mut Pcg64::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_contrast_choice() {
        assert_eq!(Rgb::new(200, 200, 200).contrasting_text(), Rgb::BLACK);
        assert_eq!(Rgb::new(30, 30, 30).contrasting_text(), Rgb::WHITE);
        // Exactly 128 is not "bright"
        assert_eq!(Rgb::new(128, 128, 128).contrasting_text(), Rgb::WHITE);
    }

    #[test]
    fn test_panel_tint_css() {
        let panel = PanelStyle {
            background: Rgb::new(10, 20, 30),
            alpha: 0.12,
            foreground: Rgb::WHITE,
        };
        assert_eq!(panel.background_css(), "rgba(10,20,30,0.12)");
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(ThemeMode::parse("Dark"), ThemeMode::Dark);
        assert_eq!(ThemeMode::parse("light"), ThemeMode::Light);
        assert_eq!(ThemeMode::parse("sunset"), ThemeMode::Random);
    }
}
