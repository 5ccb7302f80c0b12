use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SettingsError};
use crate::template::CheckpointScheme;

/// Contents of `config.json`. Keys this crate does not know about are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub run_name: String,
    pub checkpoint_scheme: CheckpointScheme,
    /// Save a checkpoint every `save_every` epochs. Zero disables checkpoints.
    pub save_every: u32,
    /// Mirror results to the drive directory as well.
    pub use_drive: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            run_name: "default".to_string(),
            checkpoint_scheme: CheckpointScheme::Local,
            save_every: 1,
            use_drive: false,
            extra: serde_json::Map::new(),
        }
    }
}

enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            Ok(Format::Yaml)
        }
        _ => Err(SettingsError::UnsupportedConfigFormat(path.to_path_buf())),
    }
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = format_of(path)?;
        let content = fs::read_to_string(path)?;
        let config = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Yaml => serde_yaml::from_str(&content)?,
        };
        log::debug!("Loaded run config from {:?}", path);
        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        format_of(path)?;
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Yaml => serde_yaml::to_string(self)?,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        log::debug!("Saved run config to {:?}", path);
        Ok(())
    }

    /// Whether a checkpoint is due after the 1-based `epoch`.
    pub fn should_checkpoint(&self, epoch: u32) -> bool {
        self.save_every > 0 && epoch > 0 && epoch % self.save_every == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("pulse-config-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn partial_json_fills_defaults_and_keeps_unknown_keys() {
        let dir = scratch("partial");
        let path = dir.join("config.json");
        fs::write(
            &path,
            r#"{ "run_name": "pulses_v3", "save_every": 5, "hidden_units": 64 }"#,
        )
        .unwrap();

        let config = RunConfig::load(&path).unwrap();
        assert_eq!(config.run_name, "pulses_v3");
        assert_eq!(config.save_every, 5);
        assert_eq!(config.checkpoint_scheme, CheckpointScheme::Local);
        assert!(!config.use_drive);
        assert_eq!(config.extra["hidden_units"], serde_json::json!(64));

        config.save(&path).unwrap();
        let reloaded = RunConfig::load(&path).unwrap();
        assert_eq!(reloaded, config);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn yaml_is_supported() {
        let dir = scratch("yaml");
        let path = dir.join("config.yaml");
        fs::write(&path, "run_name: colab\ncheckpoint_scheme: drive\nuse_drive: true\n").unwrap();

        let config = RunConfig::load(&path).unwrap();
        assert_eq!(config.run_name, "colab");
        assert_eq!(config.checkpoint_scheme, CheckpointScheme::Drive);
        assert!(config.use_drive);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_file_gives_default() {
        let dir = scratch("missing");
        let config = RunConfig::load_or_default(dir.join("config.json")).unwrap();
        assert_eq!(config, RunConfig::default());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(matches!(
            RunConfig::load("settings.toml"),
            Err(SettingsError::UnsupportedConfigFormat(_))
        ));
    }

    #[test]
    fn missing_file_with_unknown_extension_is_rejected() {
        let dir = scratch("missing-toml");
        assert!(matches!(
            RunConfig::load_or_default(dir.join("config.toml")),
            Err(SettingsError::UnsupportedConfigFormat(_))
        ));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn checkpoint_cadence() {
        let mut config = RunConfig {
            save_every: 3,
            ..RunConfig::default()
        };
        let due: Vec<u32> = (1..=9).filter(|&e| config.should_checkpoint(e)).collect();
        assert_eq!(due, vec![3, 6, 9]);

        config.save_every = 0;
        assert!(!config.should_checkpoint(3));
    }
}
