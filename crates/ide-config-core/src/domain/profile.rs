//! Built-in configuration profiles.
//!
//! A profile is a complete, named bundle of settings: a theme, the style it
//! belongs to, the boolean flags that show or hide named UI regions
//! (`styleOptions`) and the layout/panel options of the application
//! (`appOptions`).
//!
//! Five profiles ship with the crate, one per [`Style`].  They are `const`
//! values, fully independent of each other: `minimal` does not inherit
//! anything from `default`, every field is spelled out.
//!
//! # Shape
//!
//! The nested-mapping form of a profile (see [`Profile::to_value`]) is:
//!
//! ```json
//! {
//!   "theme": "system",
//!   "style": "default",
//!   "styleOptions": { "showLogo": true, "showNavbar": true, ... },
//!   "appOptions": { "ioLayout": "row", "assistantLayout": "side", ... }
//! }
//! ```
//!
//! Its leaf key-paths (`theme`, `styleOptions.showLogo`, ...) are exactly the
//! paths that may be overridden from the query string or persisted storage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Error returned when a string does not name a known enum variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseNameError {
    /// Which kind of name was being parsed (e.g. `"theme"`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Generates `as_str`, `ALL`, `Display` and `FromStr` for a fieldless enum
/// whose variants map one-to-one onto kebab-case names.
macro_rules! named_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Returns the canonical name used in key-path values.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseNameError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(ParseNameError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Colour theme of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    /// Follow the operating system preference.
    System,
    /// The opposite of the operating system preference.
    ReverseSystem,
    Light,
    Dark,
}

named_enum!(Theme, "theme", {
    System => "system",
    ReverseSystem => "reverse-system",
    Light => "light",
    Dark => "dark",
});

/// Presentation style; also the name of the profile that defines it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    Default,
    Minimal,
    Standalone,
    Electron,
    Puter,
}

named_enum!(Style, "style", {
    Default => "default",
    Minimal => "minimal",
    Standalone => "standalone",
    Electron => "electron",
    Puter => "puter",
});

/// Arrangement of the editor and the input/output panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IoLayout {
    /// Editor and I/O side by side.
    Row,
    /// I/O below the editor.
    Column,
    /// Editor and I/O share one tabbed area.
    Tabbed,
}

named_enum!(IoLayout, "io layout", {
    Row => "row",
    Column => "column",
    Tabbed => "tabbed",
});

/// Placement of the assistant panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssistantLayout {
    Side,
    Bottom,
    Hidden,
}

named_enum!(AssistantLayout, "assistant layout", {
    Side => "side",
    Bottom => "bottom",
    Hidden => "hidden",
});

/// Visibility flags for named UI regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOptions {
    pub show_logo: bool,
    pub show_navbar: bool,
    pub show_footer: bool,
    pub show_file_tabs: bool,
    pub show_status_bar: bool,
}

/// Layout mode and panel visibility of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppOptions {
    pub io_layout: IoLayout,
    pub assistant_layout: AssistantLayout,
    pub show_file_explorer: bool,
    pub show_assistant: bool,
    pub show_console: bool,
    pub show_toolbar: bool,
}

/// A complete, named bundle of settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub theme: Theme,
    pub style: Style,
    pub style_options: StyleOptions,
    pub app_options: AppOptions,
}

/// The baseline every Resolved Configuration starts from.
pub const DEFAULT_PROFILE: Profile = Profile {
    theme: Theme::System,
    style: Style::Default,
    style_options: StyleOptions {
        show_logo: true,
        show_navbar: true,
        show_footer: true,
        show_file_tabs: true,
        show_status_bar: true,
    },
    app_options: AppOptions {
        io_layout: IoLayout::Row,
        assistant_layout: AssistantLayout::Side,
        show_file_explorer: true,
        show_assistant: true,
        show_console: true,
        show_toolbar: true,
    },
};

/// Editor-only chrome for embedding in other pages.
pub const MINIMAL_PROFILE: Profile = Profile {
    theme: Theme::System,
    style: Style::Minimal,
    style_options: StyleOptions {
        show_logo: false,
        show_navbar: false,
        show_footer: false,
        show_file_tabs: true,
        show_status_bar: false,
    },
    app_options: AppOptions {
        io_layout: IoLayout::Tabbed,
        assistant_layout: AssistantLayout::Hidden,
        show_file_explorer: false,
        show_assistant: false,
        show_console: true,
        show_toolbar: false,
    },
};

/// Full-page deployment without the hosting site's footer.
pub const STANDALONE_PROFILE: Profile = Profile {
    theme: Theme::Dark,
    style: Style::Standalone,
    style_options: StyleOptions {
        show_logo: true,
        show_navbar: true,
        show_footer: false,
        show_file_tabs: true,
        show_status_bar: true,
    },
    app_options: AppOptions {
        io_layout: IoLayout::Row,
        assistant_layout: AssistantLayout::Side,
        show_file_explorer: true,
        show_assistant: true,
        show_console: true,
        show_toolbar: true,
    },
};

/// Desktop shell; the native window provides the title bar.
pub const ELECTRON_PROFILE: Profile = Profile {
    theme: Theme::System,
    style: Style::Electron,
    style_options: StyleOptions {
        show_logo: false,
        show_navbar: false,
        show_footer: false,
        show_file_tabs: true,
        show_status_bar: true,
    },
    app_options: AppOptions {
        io_layout: IoLayout::Column,
        assistant_layout: AssistantLayout::Bottom,
        show_file_explorer: true,
        show_assistant: true,
        show_console: true,
        show_toolbar: true,
    },
};

/// Windowed app inside the Puter desktop.
pub const PUTER_PROFILE: Profile = Profile {
    theme: Theme::Light,
    style: Style::Puter,
    style_options: StyleOptions {
        show_logo: false,
        show_navbar: true,
        show_footer: false,
        show_file_tabs: true,
        show_status_bar: false,
    },
    app_options: AppOptions {
        io_layout: IoLayout::Tabbed,
        assistant_layout: AssistantLayout::Hidden,
        show_file_explorer: false,
        show_assistant: false,
        show_console: true,
        show_toolbar: true,
    },
};

impl Profile {
    /// Returns the built-in profile named by `style`.
    pub fn builtin(style: Style) -> &'static Profile {
        match style {
            Style::Default => &DEFAULT_PROFILE,
            Style::Minimal => &MINIMAL_PROFILE,
            Style::Standalone => &STANDALONE_PROFILE,
            Style::Electron => &ELECTRON_PROFILE,
            Style::Puter => &PUTER_PROFILE,
        }
    }

    /// Returns the nested-mapping form of this profile.
    ///
    /// Key order is fixed (`theme`, `style`, `styleOptions`, `appOptions`,
    /// then field declaration order) so flattening is deterministic.
    pub fn to_value(&self) -> Value {
        json!({
            "theme": self.theme.as_str(),
            "style": self.style.as_str(),
            "styleOptions": self.style_options.to_value(),
            "appOptions": self.app_options.to_value(),
        })
    }
}

impl StyleOptions {
    /// Returns the `styleOptions` section as a JSON object.
    pub fn to_value(&self) -> Value {
        json!({
            "showLogo": self.show_logo,
            "showNavbar": self.show_navbar,
            "showFooter": self.show_footer,
            "showFileTabs": self.show_file_tabs,
            "showStatusBar": self.show_status_bar,
        })
    }
}

impl AppOptions {
    /// Returns the `appOptions` section as a JSON object.
    pub fn to_value(&self) -> Value {
        json!({
            "ioLayout": self.io_layout.as_str(),
            "assistantLayout": self.assistant_layout.as_str(),
            "showFileExplorer": self.show_file_explorer,
            "showAssistant": self.show_assistant,
            "showConsole": self.show_console,
            "showToolbar": self.show_toolbar,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profile_name_matches_its_style() {
        for &style in Style::ALL {
            assert_eq!(Profile::builtin(style).style, style);
        }
    }

    #[test]
    fn test_theme_names_round_trip_through_from_str() {
        for &theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>(), Ok(theme));
        }
        assert_eq!(Theme::ReverseSystem.as_str(), "reverse-system");
    }

    #[test]
    fn test_unknown_style_name_is_rejected() {
        // Act
        let err = "retro".parse::<Style>().unwrap_err();

        // Assert
        assert_eq!(err.kind, "style");
        assert_eq!(err.value, "retro");
        assert_eq!(err.to_string(), "unknown style: \"retro\"");
    }

    #[test]
    fn test_to_value_uses_camel_case_section_names() {
        let value = DEFAULT_PROFILE.to_value();

        assert_eq!(value["theme"], "system");
        assert_eq!(value["style"], "default");
        assert_eq!(value["styleOptions"]["showLogo"], true);
        assert_eq!(value["appOptions"]["ioLayout"], "row");
    }

    #[test]
    fn test_to_value_matches_serde_serialization() {
        // The hand-built shape and the derived serde form must agree.
        for &style in Style::ALL {
            let profile = Profile::builtin(style);
            let derived = serde_json::to_value(profile).expect("serialize");
            assert_eq!(profile.to_value(), derived, "mismatch for {style}");
        }
    }

    #[test]
    fn test_minimal_profile_hides_assistant_and_tabs_io() {
        assert_ne!(MINIMAL_PROFILE.app_options, DEFAULT_PROFILE.app_options);
        assert_eq!(MINIMAL_PROFILE.app_options.io_layout, IoLayout::Tabbed);
        assert_eq!(
            MINIMAL_PROFILE.app_options.assistant_layout,
            AssistantLayout::Hidden
        );
        assert!(!MINIMAL_PROFILE.app_options.show_assistant);
    }
}
