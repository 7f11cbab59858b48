use crate::config::SensorConfig;
use crate::errors::{ConfigError, Result};
use crate::script;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

pub const INI_FILENAME: &str = "sensor_config.ini";
pub const SCRIPT_FILENAME: &str = "sensor_config.js";
const BACKUP_SUFFIX: &str = ".bu";

/// The device's file area: the INI settings, the generated prefill script
/// and the static pages served next to them.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn ini_path(&self) -> PathBuf { self.dir.join(INI_FILENAME) }

    pub fn script_path(&self) -> PathBuf { self.dir.join(SCRIPT_FILENAME) }

    pub fn load(&self) -> Result<SensorConfig> {
        let path = self.ini_path();
        let text = fs::read_to_string(&path).map_err(|e| not_found(e, &path))?;
        SensorConfig::from_ini_str(&text)
    }

    /// Like `load`, but an absent INI file yields the default settings.
    pub fn load_or_default(&self) -> Result<SensorConfig> {
        match self.load() {
            Err(ConfigError::NotFound(path)) => {
                warn!(%path, "no settings file, using defaults");
                Ok(SensorConfig::default())
            }
            other => other,
        }
    }

    pub fn save(&self, cfg: &SensorConfig) -> Result<()> {
        replace_with_backup(&self.ini_path(), &cfg.to_ini())
    }

    pub fn write_script(&self, cfg: &SensorConfig) -> Result<()> {
        replace_with_backup(&self.script_path(), &script::render(cfg))
    }

    /// Read a file below the store directory. `rel` is a request path such
    /// as `/index.html`; it may not climb out of the directory.
    pub fn read(&self, rel: &str) -> Result<Vec<u8>> {
        let rel = Path::new(rel.trim_start_matches('/'));
        let mut components = rel.components().peekable();
        if components.peek().is_none() || components.any(|c| !matches!(c, Component::Normal(_))) {
            return Err(ConfigError::NotFound(rel.display().to_string()));
        }
        let path = self.dir.join(rel);
        if path.is_dir() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        fs::read(&path).map_err(|e| not_found(e, &path))
    }
}

fn not_found(e: std::io::Error, path: &Path) -> ConfigError {
    if e.kind() == ErrorKind::NotFound {
        ConfigError::NotFound(path.display().to_string())
    } else {
        ConfigError::Io(e)
    }
}

// Move the current file aside, write the new one, drop the backup.
fn replace_with_backup(path: &Path, contents: &str) -> Result<()> {
    let mut backup = path.as_os_str().to_owned();
    backup.push(BACKUP_SUFFIX);
    let backup = PathBuf::from(backup);

    let had_original = match fs::rename(path, &backup) {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => return Err(e.into()),
    };
    fs::write(path, contents)?;
    info!(path = %path.display(), bytes = contents.len(), "written");

    if had_original {
        if let Err(e) = fs::remove_file(&backup) {
            warn!(path = %backup.display(), error = %e, "could not remove backup");
        }
    }
    Ok(())
}
