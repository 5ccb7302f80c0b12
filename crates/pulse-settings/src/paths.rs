use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    self, CHECKPOINT_SUBFOLDER, CONFIG_FILENAME, DRIVE_DIR, LOG_FILE, LOG_FILENAME,
    SAVED_RUNS_DIRNAME,
};
use crate::error::Result;
use crate::template::{CheckpointScheme, CheckpointTemplate};

/// Local layout of saved runs under a working directory:
///
/// ```text
/// <working_dir>/
///   config.json
///   saved_RNN_runs/
///     <run>/
///       model_history_log.csv
///       checkpoints/
///         cp-0001.ckpt
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    working_dir: PathBuf,
    checkpoint_template: CheckpointTemplate,
}

impl RunPaths {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            checkpoint_template: CheckpointScheme::Local.template(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.working_dir.join(CONFIG_FILENAME)
    }

    pub fn saved_runs_dir(&self) -> PathBuf {
        self.working_dir.join(SAVED_RUNS_DIRNAME)
    }

    pub fn run_dir(&self, run: &str) -> PathBuf {
        self.saved_runs_dir().join(run)
    }

    pub fn checkpoint_dir(&self, run: &str) -> PathBuf {
        self.run_dir(run).join(CHECKPOINT_SUBFOLDER)
    }

    pub fn history_log(&self, run: &str) -> PathBuf {
        self.run_dir(run).join(LOG_FILENAME)
    }

    pub fn checkpoint_template(&self) -> &CheckpointTemplate {
        &self.checkpoint_template
    }

    pub fn checkpoint_path(&self, run: &str, epoch: u32) -> PathBuf {
        self.checkpoint_dir(run)
            .join(self.checkpoint_template.format(epoch))
    }

    /// Creates the run directory and its checkpoint folder. Safe to call
    /// repeatedly.
    pub fn ensure_run_dirs(&self, run: &str) -> Result<PathBuf> {
        let dir = self.checkpoint_dir(run);
        fs::create_dir_all(&dir)?;
        log::debug!("Ensured run directories at {:?}", dir);
        Ok(self.run_dir(run))
    }
}

impl Default for RunPaths {
    fn default() -> Self {
        Self::new(constants::working_dir())
    }
}

/// Layout of results on mounted cloud storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrivePaths {
    root: PathBuf,
    checkpoint_template: CheckpointTemplate,
}

impl DrivePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            checkpoint_template: CheckpointScheme::Drive.template(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn history_log(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }

    pub fn checkpoint_template(&self) -> &CheckpointTemplate {
        &self.checkpoint_template
    }

    pub fn checkpoint_path(&self, epoch: u32) -> PathBuf {
        self.root.join(self.checkpoint_template.format(epoch))
    }

    /// Directory the drive checkpoints land in (`training_2/` under the root).
    pub fn checkpoint_dir(&self) -> PathBuf {
        let sample = self.checkpoint_path(0);
        match sample.parent() {
            Some(parent) => parent.to_path_buf(),
            None => self.root.clone(),
        }
    }
}

impl Default for DrivePaths {
    fn default() -> Self {
        Self::new(DRIVE_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_layout() {
        let paths = RunPaths::new("/work");
        assert_eq!(paths.config_file(), PathBuf::from("/work/config.json"));
        assert_eq!(paths.saved_runs_dir(), PathBuf::from("/work/saved_RNN_runs"));
        assert_eq!(
            paths.history_log("lstm"),
            PathBuf::from("/work/saved_RNN_runs/lstm/model_history_log.csv")
        );
        assert_eq!(
            paths.checkpoint_path("lstm", 2),
            PathBuf::from("/work/saved_RNN_runs/lstm/checkpoints/cp-0002.ckpt")
        );
    }

    #[test]
    fn default_run_paths_use_working_dir() {
        let paths = RunPaths::default();
        assert_eq!(paths.working_dir(), constants::working_dir());
        assert_eq!(paths.config_file(), constants::config_file());
        assert_eq!(paths.saved_runs_dir(), constants::saved_runs_dir());
    }

    #[test]
    fn drive_layout() {
        let drive = DrivePaths::default();
        assert_eq!(
            drive.history_log(),
            PathBuf::from("/content/drive/My Drive/Colab_files/happiness/model_history_log.csv")
        );
        assert_eq!(
            drive.checkpoint_path(2),
            PathBuf::from("/content/drive/My Drive/Colab_files/happiness/training_2/cp-02.ckpt")
        );
        assert_eq!(
            drive.checkpoint_dir(),
            PathBuf::from("/content/drive/My Drive/Colab_files/happiness/training_2")
        );
    }

    #[test]
    fn ensure_run_dirs_is_idempotent() {
        let root = std::env::temp_dir().join(format!("pulse-paths-{}", std::process::id()));
        let paths = RunPaths::new(&root);

        let run_dir = paths.ensure_run_dirs("gru").unwrap();
        assert_eq!(run_dir, root.join("saved_RNN_runs/gru"));
        assert!(paths.checkpoint_dir("gru").is_dir());
        paths.ensure_run_dirs("gru").unwrap();

        fs::remove_dir_all(&root).unwrap();
    }
}
