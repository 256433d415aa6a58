//! Theme state: a current theme plus its seven-token palette, owned by the
//! server and mutated only through `toggle`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

/// Fixed-shape palette consumed by every themed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeColors {
    pub bg: &'static str,
    pub text: &'static str,
    pub accent: &'static str,
    pub secondary: &'static str,
    pub border: &'static str,
    pub card: &'static str,
    pub muted: &'static str,
}

// Tokyo Night, dark and day variants.
const DARK: ThemeColors = ThemeColors {
    bg: "#1a1b26",
    text: "#c0caf5",
    accent: "#7aa2f7",
    secondary: "#bb9af7",
    border: "#414868",
    card: "#24283b",
    muted: "#565f89",
};

const LIGHT: ThemeColors = ThemeColors {
    bg: "#e1e2e7",
    text: "#343b58",
    accent: "#2e7de9",
    secondary: "#9854f1",
    border: "#a8aecb",
    card: "#d5d6db",
    muted: "#848cb5",
};

#[derive(Debug, Clone, Serialize)]
pub struct ThemeState {
    pub theme: Theme,
    pub colors: ThemeColors,
}

impl ThemeState {
    pub fn new() -> Self {
        Self {
            theme: Theme::Dark,
            colors: DARK,
        }
    }

    /// Swap theme and palette together; they must never disagree.
    pub fn toggle(&mut self) {
        *self = match self.theme {
            Theme::Dark => Self {
                theme: Theme::Light,
                colors: LIGHT,
            },
            Theme::Light => Self {
                theme: Theme::Dark,
                colors: DARK,
            },
        };
    }

    /// The palette as CSS custom properties, substituted into the layout's
    /// `{{ theme_css }}` placeholder.
    pub fn css_variables(&self) -> String {
        let c = &self.colors;
        format!(
            ":root {{ --bg: {}; --text: {}; --accent: {}; --secondary: {}; --border: {}; --card: {}; --muted: {}; }}",
            c.bg, c.text, c.accent, c.secondary, c.border, c.card, c.muted
        )
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_dark() {
        let state = ThemeState::new();
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.colors.bg, "#1a1b26");
    }

    #[test]
    fn toggle_swaps_theme_and_palette_together() {
        let mut state = ThemeState::new();
        state.toggle();
        assert_eq!(state.theme, Theme::Light);
        assert_eq!(state.colors, LIGHT);
        state.toggle();
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.colors, DARK);
    }

    #[test]
    fn css_variables_cover_all_seven_tokens() {
        let css = ThemeState::new().css_variables();
        for token in ["--bg", "--text", "--accent", "--secondary", "--border", "--card", "--muted"] {
            assert!(css.contains(token), "missing {token}");
        }
    }
}
