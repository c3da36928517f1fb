//! Typed configuration model addressed by dotted key-paths.
//!
//! [`Configuration`] is the in-memory form of the Resolved Configuration.  It
//! keeps the four profile sections as typed fields and routes every
//! key-path through [`ConfigPath`], the explicit table of known paths.  Paths
//! outside the profile shape are kept in a free-form `extra` mapping so that
//! programmatic writes to them are still accepted.
//!
//! # Write contract
//!
//! [`Configuration::assign`] performs, in order:
//!
//! 1. the Legal Values check (a miss discards the write);
//! 2. the equality check (writing the current value is a no-op);
//! 3. the store itself, which also discards values the typed field cannot
//!    hold (e.g. a string for a boolean flag).
//!
//! When the stored path is `style` the outcome is
//! [`WriteOutcome::StyleChanged`]; the caller is responsible for the cascade
//! (see [`Configuration::apply_style_sections`]).

use std::str::FromStr;

use serde_json::{json, Map, Value};
use tracing::debug;

use super::keypath::{lookup, lookup_in, map_key_paths, KeyPathWrite};
use super::legal::is_legal;
use super::profile::{AppOptions, Profile, Style, StyleOptions, Theme, DEFAULT_PROFILE};

/// Flags of the `styleOptions` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleFlag {
    ShowLogo,
    ShowNavbar,
    ShowFooter,
    ShowFileTabs,
    ShowStatusBar,
}

/// Options of the `appOptions` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppOption {
    IoLayout,
    AssistantLayout,
    ShowFileExplorer,
    ShowAssistant,
    ShowConsole,
    ShowToolbar,
}

/// Every leaf key-path of the profile shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigPath {
    Theme,
    Style,
    StyleOption(StyleFlag),
    AppOption(AppOption),
}

impl ConfigPath {
    /// All known paths, in profile order.
    pub const ALL: [ConfigPath; 13] = [
        ConfigPath::Theme,
        ConfigPath::Style,
        ConfigPath::StyleOption(StyleFlag::ShowLogo),
        ConfigPath::StyleOption(StyleFlag::ShowNavbar),
        ConfigPath::StyleOption(StyleFlag::ShowFooter),
        ConfigPath::StyleOption(StyleFlag::ShowFileTabs),
        ConfigPath::StyleOption(StyleFlag::ShowStatusBar),
        ConfigPath::AppOption(AppOption::IoLayout),
        ConfigPath::AppOption(AppOption::AssistantLayout),
        ConfigPath::AppOption(AppOption::ShowFileExplorer),
        ConfigPath::AppOption(AppOption::ShowAssistant),
        ConfigPath::AppOption(AppOption::ShowConsole),
        ConfigPath::AppOption(AppOption::ShowToolbar),
    ];

    /// Returns the dotted key-path string.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigPath::Theme => "theme",
            ConfigPath::Style => "style",
            ConfigPath::StyleOption(flag) => match flag {
                StyleFlag::ShowLogo => "styleOptions.showLogo",
                StyleFlag::ShowNavbar => "styleOptions.showNavbar",
                StyleFlag::ShowFooter => "styleOptions.showFooter",
                StyleFlag::ShowFileTabs => "styleOptions.showFileTabs",
                StyleFlag::ShowStatusBar => "styleOptions.showStatusBar",
            },
            ConfigPath::AppOption(option) => match option {
                AppOption::IoLayout => "appOptions.ioLayout",
                AppOption::AssistantLayout => "appOptions.assistantLayout",
                AppOption::ShowFileExplorer => "appOptions.showFileExplorer",
                AppOption::ShowAssistant => "appOptions.showAssistant",
                AppOption::ShowConsole => "appOptions.showConsole",
                AppOption::ShowToolbar => "appOptions.showToolbar",
            },
        }
    }

    /// Looks up a known path by its dotted string.
    pub fn parse(key_path: &str) -> Option<ConfigPath> {
        Self::ALL.into_iter().find(|path| path.as_str() == key_path)
    }
}

/// Result of a single [`Configuration::assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value failed validation; the previous value is retained.
    Rejected,
    /// The value equals the current one; nothing changed.
    Unchanged,
    /// The value was stored.
    Stored,
    /// `style` was stored; the caller must cascade to this style's profile.
    StyleChanged(Style),
}

/// Section names holding typed leaves.
const SECTIONS: [&str; 2] = ["styleOptions", "appOptions"];

/// The Resolved Configuration.
///
/// The four top-level sections are typed fields and therefore always
/// present.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    theme: Theme,
    style: Style,
    style_options: StyleOptions,
    app_options: AppOptions,
    extra: Map<String, Value>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::from_profile(&DEFAULT_PROFILE)
    }
}

impl Configuration {
    /// Creates a configuration holding a copy of `profile`.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            theme: profile.theme,
            style: profile.style,
            style_options: profile.style_options,
            app_options: profile.app_options,
            extra: Map::new(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn style_options(&self) -> &StyleOptions {
        &self.style_options
    }

    pub fn app_options(&self) -> &AppOptions {
        &self.app_options
    }

    /// Returns the value at `key_path`, or `None` if nothing is stored there.
    ///
    /// Whole sections (`styleOptions`, `appOptions`) resolve to objects.
    pub fn get(&self, key_path: &str) -> Option<Value> {
        if let Some(path) = ConfigPath::parse(key_path) {
            return Some(self.leaf(path));
        }
        lookup(&self.to_value(), key_path).cloned()
    }

    /// Returns the whole configuration as a nested mapping, including paths
    /// written outside the profile shape.
    pub fn to_value(&self) -> Value {
        let mut value = json!({
            "theme": self.theme.as_str(),
            "style": self.style.as_str(),
            "styleOptions": self.style_options.to_value(),
            "appOptions": self.app_options.to_value(),
        });
        for key_path in map_key_paths(&self.extra, "") {
            if let Some(extra) = lookup_in(&self.extra, &key_path) {
                value.write_path(&key_path, extra.clone());
            }
        }
        value
    }

    /// Validates and stores `value` at `key_path`.
    ///
    /// Never fails; see the module documentation for the write contract.
    pub fn assign(&mut self, key_path: &str, value: Value) -> WriteOutcome {
        if !is_legal(key_path, &value) {
            debug!(key_path, %value, "discarding write outside legal values");
            return WriteOutcome::Rejected;
        }
        if self.get(key_path).as_ref() == Some(&value) {
            return WriteOutcome::Unchanged;
        }

        if let Some(path) = ConfigPath::parse(key_path) {
            if !self.store(path, &value) {
                debug!(key_path, %value, "discarding write of mismatched type");
                return WriteOutcome::Rejected;
            }
            return match path {
                ConfigPath::Style => WriteOutcome::StyleChanged(self.style),
                _ => WriteOutcome::Stored,
            };
        }

        if SECTIONS.contains(&key_path) {
            return self.assign_section(key_path, value);
        }
        if shadows_typed_leaf(key_path) {
            debug!(key_path, "discarding write below a typed leaf");
            return WriteOutcome::Rejected;
        }

        self.extra.write_path(key_path, value);
        WriteOutcome::Stored
    }

    /// Replaces `styleOptions` and `appOptions` with those of `style`'s
    /// profile.  Extra keys written inside either section are dropped.
    pub fn apply_style_sections(&mut self, style: Style) {
        let profile = Profile::builtin(style);
        self.style_options = profile.style_options;
        self.app_options = profile.app_options;
        for section in SECTIONS {
            self.extra.remove(section);
        }
    }

    /// Assigns each entry of an object written to a whole section.
    fn assign_section(&mut self, section: &str, value: Value) -> WriteOutcome {
        let Value::Object(entries) = value else {
            debug!(section, "discarding non-object section write");
            return WriteOutcome::Rejected;
        };

        let mut outcome = WriteOutcome::Unchanged;
        for (key, entry) in entries {
            match self.assign(&format!("{section}.{key}"), entry) {
                WriteOutcome::Stored | WriteOutcome::StyleChanged(_) => {
                    outcome = WriteOutcome::Stored;
                }
                WriteOutcome::Rejected if outcome == WriteOutcome::Unchanged => {
                    outcome = WriteOutcome::Rejected;
                }
                _ => {}
            }
        }
        outcome
    }

    fn leaf(&self, path: ConfigPath) -> Value {
        match path {
            ConfigPath::Theme => json!(self.theme.as_str()),
            ConfigPath::Style => json!(self.style.as_str()),
            ConfigPath::StyleOption(flag) => json!(*style_flag(&self.style_options, flag)),
            ConfigPath::AppOption(AppOption::IoLayout) => {
                json!(self.app_options.io_layout.as_str())
            }
            ConfigPath::AppOption(AppOption::AssistantLayout) => {
                json!(self.app_options.assistant_layout.as_str())
            }
            ConfigPath::AppOption(option) => {
                json!(app_flag(&self.app_options, option).copied().unwrap_or_default())
            }
        }
    }

    /// Stores `value` into the typed field behind `path`.  Returns `false`
    /// when the value cannot be represented by the field.
    fn store(&mut self, path: ConfigPath, value: &Value) -> bool {
        match path {
            ConfigPath::Theme => set_named(&mut self.theme, value),
            ConfigPath::Style => set_named(&mut self.style, value),
            ConfigPath::StyleOption(flag) => {
                set_bool(style_flag_mut(&mut self.style_options, flag), value)
            }
            ConfigPath::AppOption(AppOption::IoLayout) => {
                set_named(&mut self.app_options.io_layout, value)
            }
            ConfigPath::AppOption(AppOption::AssistantLayout) => {
                set_named(&mut self.app_options.assistant_layout, value)
            }
            ConfigPath::AppOption(option) => match app_flag_mut(&mut self.app_options, option) {
                Some(slot) => set_bool(slot, value),
                None => false,
            },
        }
    }
}

/// Paths such as `theme.x` would hide a typed leaf behind an object.
fn shadows_typed_leaf(key_path: &str) -> bool {
    ConfigPath::ALL.iter().any(|path| {
        key_path
            .strip_prefix(path.as_str())
            .map(|rest| rest.starts_with('.'))
            .unwrap_or(false)
    })
}

fn set_named<T: FromStr>(slot: &mut T, value: &Value) -> bool {
    match value.as_str().map(str::parse::<T>) {
        Some(Ok(parsed)) => {
            *slot = parsed;
            true
        }
        _ => false,
    }
}

fn set_bool(slot: &mut bool, value: &Value) -> bool {
    match value.as_bool() {
        Some(flag) => {
            *slot = flag;
            true
        }
        None => false,
    }
}

fn style_flag(options: &StyleOptions, flag: StyleFlag) -> &bool {
    match flag {
        StyleFlag::ShowLogo => &options.show_logo,
        StyleFlag::ShowNavbar => &options.show_navbar,
        StyleFlag::ShowFooter => &options.show_footer,
        StyleFlag::ShowFileTabs => &options.show_file_tabs,
        StyleFlag::ShowStatusBar => &options.show_status_bar,
    }
}

fn style_flag_mut(options: &mut StyleOptions, flag: StyleFlag) -> &mut bool {
    match flag {
        StyleFlag::ShowLogo => &mut options.show_logo,
        StyleFlag::ShowNavbar => &mut options.show_navbar,
        StyleFlag::ShowFooter => &mut options.show_footer,
        StyleFlag::ShowFileTabs => &mut options.show_file_tabs,
        StyleFlag::ShowStatusBar => &mut options.show_status_bar,
    }
}

/// Boolean app options; `None` for the enum-valued layouts.
fn app_flag(options: &AppOptions, option: AppOption) -> Option<&bool> {
    match option {
        AppOption::ShowFileExplorer => Some(&options.show_file_explorer),
        AppOption::ShowAssistant => Some(&options.show_assistant),
        AppOption::ShowConsole => Some(&options.show_console),
        AppOption::ShowToolbar => Some(&options.show_toolbar),
        AppOption::IoLayout | AppOption::AssistantLayout => None,
    }
}

fn app_flag_mut(options: &mut AppOptions, option: AppOption) -> Option<&mut bool> {
    match option {
        AppOption::ShowFileExplorer => Some(&mut options.show_file_explorer),
        AppOption::ShowAssistant => Some(&mut options.show_assistant),
        AppOption::ShowConsole => Some(&mut options.show_console),
        AppOption::ShowToolbar => Some(&mut options.show_toolbar),
        AppOption::IoLayout | AppOption::AssistantLayout => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
