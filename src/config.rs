use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) enable_color: bool,
    pub(crate) enable_braille: bool,
    pub(crate) show_password: bool,
    pub(crate) log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 60,
            enable_color: true,
            enable_braille: true,
            show_password: false,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub(crate) fn clamped_fps(&self) -> u32 {
        self.fps_cap.clamp(10, 240)
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "arcpass", "Arcpass")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create data directory {}", dir.display()))?;
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("arcpass.log"),
    })
}

/// Where the loaded settings came from; reported once logging is up.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SettingsSource {
    File,
    Missing,
    Corrupt(String),
}

/// Missing or unreadable settings fall back to defaults.
pub(crate) fn load_settings(path: &Path) -> (Settings, SettingsSource) {
    let Ok(s) = fs::read_to_string(path) else {
        return (Settings::default(), SettingsSource::Missing);
    };
    match serde_json::from_str::<Settings>(&s) {
        Ok(v) => (v, SettingsSource::File),
        Err(e) => (Settings::default(), SettingsSource::Corrupt(e.to_string())),
    }
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename-over-existing fails on Windows
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}
