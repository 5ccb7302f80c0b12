//! Fixed locations and file names shared by the training script.
//!
//! The working directory is resolved once, on first use, to the directory
//! holding this crate. Everything else is a plain string constant.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Where results are persisted when running on a hosted notebook with mounted
/// cloud storage.
pub const DRIVE_DIR: &str = "/content/drive/My Drive/Colab_files/happiness/";

/// Tabular run-history file.
pub const LOG_FILE: &str = "model_history_log.csv";

/// Checkpoint name under `DRIVE_DIR`, two-digit epoch.
pub const CHECKPOINT_FILE: &str = "training_2/cp-{epoch:02}.ckpt";

/// Checkpoint name inside a run's checkpoint folder, four-digit epoch.
pub const LOCAL_CHECKPOINT_FILENAME: &str = "cp-{epoch:04}.ckpt";

pub const LOG_FILENAME: &str = LOG_FILE;

pub const CHECKPOINT_SUBFOLDER: &str = "checkpoints";

pub const CONFIG_FILENAME: &str = "config.json";

pub const SAVED_RUNS_DIRNAME: &str = "saved_RNN_runs";

static WORKING_DIR: LazyLock<PathBuf> =
    LazyLock::new(|| resolve_dir(Path::new(env!("CARGO_MANIFEST_DIR"))));

/// Canonical form of `dir`, or `dir` itself when it cannot be resolved.
pub(crate) fn resolve_dir(dir: &Path) -> PathBuf {
    dir.canonicalize().unwrap_or_else(|err| {
        log::warn!("Could not resolve {:?} ({}), using it unresolved", dir, err);
        dir.to_path_buf()
    })
}

pub fn working_dir() -> PathBuf {
    WORKING_DIR.clone()
}

pub fn config_file() -> PathBuf {
    WORKING_DIR.join(CONFIG_FILENAME)
}

pub fn saved_runs_dir() -> PathBuf {
    WORKING_DIR.join(SAVED_RUNS_DIRNAME)
}
