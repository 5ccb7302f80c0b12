//! File-system layout for RNN training runs on dumped pulse data: where
//! results are stored, how the run history is named, and how checkpoints are
//! named and found.

pub mod checkpoints;
pub mod config;
pub mod constants;
pub mod error;
pub mod history;
pub mod paths;
pub mod settings;
pub mod template;

pub use checkpoints::{Checkpoint, CheckpointStore};
pub use config::RunConfig;
pub use constants::{
    config_file, saved_runs_dir, working_dir, CHECKPOINT_FILE, CHECKPOINT_SUBFOLDER,
    CONFIG_FILENAME, DRIVE_DIR, LOCAL_CHECKPOINT_FILENAME, LOG_FILE, LOG_FILENAME,
    SAVED_RUNS_DIRNAME,
};
pub use error::{Result, SettingsError};
pub use history::{HistoryLog, HistoryRecord};
pub use paths::{DrivePaths, RunPaths};
pub use settings::Settings;
pub use template::{CheckpointScheme, CheckpointTemplate};
