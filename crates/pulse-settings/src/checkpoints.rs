use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::template::CheckpointTemplate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub epoch: u32,
    pub path: PathBuf,
}

/// Checkpoints named by a template inside one directory.
pub struct CheckpointStore {
    dir: PathBuf,
    template: CheckpointTemplate,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>, template: CheckpointTemplate) -> Self {
        Self {
            dir: dir.into(),
            template,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, epoch: u32) -> PathBuf {
        self.dir.join(self.template.format(epoch))
    }

    /// All checkpoints present on disk, oldest epoch first.
    pub fn list(&self) -> Result<Vec<Checkpoint>> {
        // Templates may place files in a subdirectory of `dir`.
        let scan_dir = match self.path_for(0).parent() {
            Some(parent) => parent.to_path_buf(),
            None => self.dir.clone(),
        };

        let entries = match fs::read_dir(&scan_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Checkpoint directory {:?} does not exist yet", scan_dir);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(epoch) = self.template.parse_epoch(name) {
                found.push(Checkpoint {
                    epoch,
                    path: entry.path(),
                });
            }
        }
        found.sort_by_key(|c| c.epoch);
        Ok(found)
    }

    pub fn latest(&self) -> Result<Option<Checkpoint>> {
        Ok(self.list()?.pop())
    }
}
