use crate::view::DisplayConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum GlyphMode {
    #[default]
    Auto,
    Unicode,
    Ascii,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) glyphs: GlyphMode,
    pub(crate) enable_color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            glyphs: GlyphMode::Auto,
            enable_color: true,
        }
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("org", "orrery", "orrery")
        .context("could not resolve project directories")?;
    Ok(Paths {
        settings_path: proj.config_dir().join("settings.json"),
        log_path: proj.data_local_dir().join("orrery.log"),
    })
}

/// Missing or unreadable settings fall back to defaults.
pub(crate) fn load_settings(path: &Path) -> Settings {
    let text = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no settings file, using defaults");
            return Settings::default();
        }
    };
    parse_settings(&text).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "malformed settings, using defaults");
        Settings::default()
    })
}

fn parse_settings(text: &str) -> Result<Settings, serde_json::Error> {
    serde_json::from_str(text)
}

/// True when the first non-empty of `LC_ALL`, `LC_CTYPE`, `LANG` names a
/// UTF-8 codeset.
pub(crate) fn locale_is_utf8(var: impl Fn(&str) -> Option<String>) -> bool {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|name| var(name))
        .find(|v| !v.is_empty())
        .map(|v| {
            let v = v.to_ascii_lowercase();
            v.contains("utf-8") || v.contains("utf8")
        })
        .unwrap_or(false)
}

/// Command line beats the settings file, which beats the locale.
pub(crate) fn resolve_display(cli: Option<GlyphMode>, settings: &Settings, utf8_locale: bool) -> DisplayConfig {
    let mode = match cli {
        Some(m) if m != GlyphMode::Auto => m,
        _ => settings.glyphs,
    };
    let unicode = match mode {
        GlyphMode::Unicode => true,
        GlyphMode::Ascii => false,
        GlyphMode::Auto => utf8_locale,
    };
    DisplayConfig {
        unicode,
        color: settings.enable_color,
    }
}
