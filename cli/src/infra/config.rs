//! `ConfigStore` over `~/.esx/config.yaml`.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::FileConfig;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "ESX_CONFIG";

/// Reads and writes the ESX connection settings as YAML.
pub struct YamlConfigStore;

fn parse(path: &Path, text: &str) -> Result<FileConfig> {
    if text.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(text).with_context(|| format!("invalid YAML in {}", path.display()))
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<FileConfig> {
        let path = self.path()?;
        match std::fs::read_to_string(&path) {
            Ok(text) => parse(&path, &text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn save(&self, config: &FileConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        let yaml = serde_yaml::to_string(config).context("encoding ESX settings as YAML")?;
        std::fs::write(&path, yaml).with_context(|| format!("writing {}", path.display()))?;

        // Holds the ESX password.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("restricting {} to its owner", path.display()))?;
        }
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        dirs::home_dir()
            .map(|home| home.join(".esx").join("config.yaml"))
            .context("no home directory to keep ~/.esx/config.yaml in")
    }
}
