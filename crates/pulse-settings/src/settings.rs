use std::path::PathBuf;

use crate::constants::{self, resolve_dir, DRIVE_DIR};
use crate::paths::{DrivePaths, RunPaths};

pub const WORKING_DIR_VAR: &str = "PULSE_WORKING_DIR";
pub const DRIVE_DIR_VAR: &str = "PULSE_DRIVE_DIR";

/// Root directories for a process, with optional overrides from the
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub working_dir: PathBuf,
    pub drive_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let working_dir = match set(WORKING_DIR_VAR) {
            Some(dir) => {
                log::info!("{} overrides working directory: {}", WORKING_DIR_VAR, dir);
                resolve_dir(&PathBuf::from(dir))
            }
            None => constants::working_dir(),
        };
        let drive_dir = match set(DRIVE_DIR_VAR) {
            Some(dir) => {
                log::info!("{} overrides drive directory: {}", DRIVE_DIR_VAR, dir);
                PathBuf::from(dir)
            }
            None => PathBuf::from(DRIVE_DIR),
        };

        Self {
            working_dir,
            drive_dir,
        }
    }

    pub fn run_paths(&self) -> RunPaths {
        RunPaths::new(&self.working_dir)
    }

    pub fn drive_paths(&self) -> DrivePaths {
        DrivePaths::new(&self.drive_dir)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            working_dir: constants::working_dir(),
            drive_dir: PathBuf::from(DRIVE_DIR),
        }
    }
}
