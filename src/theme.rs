//! Light/dark color schemes and the persisted theme preference.

use crate::config::paths::xdg_root;
use crate::error::ApiError;
use crate::search::RequestStatus;
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
}

impl ThemeName {
    pub fn toggled(self) -> Self {
        match self {
            ThemeName::Light => ThemeName::Dark,
            ThemeName::Dark => ThemeName::Light,
        }
    }

    /// Label of the toggle action for the current theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemeName::Light => "Switch to Dark Mode",
            ThemeName::Dark => "Switch to Light Mode",
        }
    }
}

/// Styles for every element the renderer draws.
#[derive(Debug, Clone)]
pub struct Theme {
    pub base: Style,
    pub border: Style,
    pub search_info: Style,
    pub search_warning: Style,
    pub header: Style,
    pub meta: Style,
    pub property_key: Style,
    pub property_value: Style,
    pub property_high: Style,
    pub selection: Style,
    pub danger: Style,
    pub status: Style,
}

impl Theme {
    pub fn for_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Light => Self::light(),
            ThemeName::Dark => Self::dark(),
        }
    }

    /// Search box accent: info after a hit, warning otherwise.
    pub fn search_accent(&self, status: RequestStatus) -> Style {
        match status {
            RequestStatus::Success => self.search_info,
            RequestStatus::Warning => self.search_warning,
        }
    }

    fn light() -> Self {
        Self {
            base: Style::default().fg(Color::Black).bg(Color::White),
            border: Style::default().fg(Color::DarkGray),
            search_info: Style::default().fg(Color::Blue),
            search_warning: Style::default().fg(Color::Yellow),
            header: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            meta: Style::default().fg(Color::DarkGray),
            property_key: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            property_value: Style::default().fg(Color::Black),
            property_high: Style::default().fg(Color::Green),
            selection: Style::default().bg(Color::Gray),
            danger: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            status: Style::default().fg(Color::DarkGray),
        }
    }

    fn dark() -> Self {
        Self {
            base: Style::default().fg(Color::White).bg(Color::Black),
            border: Style::default().fg(Color::Gray),
            search_info: Style::default().fg(Color::Cyan),
            search_warning: Style::default().fg(Color::LightYellow),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            meta: Style::default().fg(Color::Gray),
            property_key: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            property_value: Style::default().fg(Color::White),
            property_high: Style::default().fg(Color::LightGreen),
            selection: Style::default().bg(Color::DarkGray),
            danger: Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            status: Style::default().fg(Color::Gray),
        }
    }
}

/// Client-local preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: ThemeName,
}

/// Reads and writes [`Preferences`] as TOML at a fixed path.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{state dir}/preferences.toml`
    pub fn default_location() -> Result<Self, ApiError> {
        Ok(Self::new(xdg_root::state_dir()?.join("preferences.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files yield defaults.
    pub fn load(&self) -> Preferences {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Preferences::default(),
        };
        toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Ignoring malformed preferences file");
            Preferences::default()
        })
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string(preferences)
            .map_err(|e| ApiError::Preferences(format!("Failed to serialize preferences: {}", e)))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
