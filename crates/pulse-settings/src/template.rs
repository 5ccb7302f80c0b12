use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{CHECKPOINT_FILE, LOCAL_CHECKPOINT_FILENAME};
use crate::error::{Result, SettingsError};

const FIELD: &str = "epoch";

/// A checkpoint file name with one zero-padded epoch field, e.g.
/// `training_2/cp-{epoch:02}.ckpt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointTemplate {
    prefix: String,
    width: usize,
    suffix: String,
}

impl CheckpointTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = |reason: &str| SettingsError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let open = template.find('{').ok_or_else(|| invalid("no {epoch} field"))?;
        let close = template[open..]
            .find('}')
            .map(|i| open + i)
            .ok_or_else(|| invalid("unterminated field"))?;
        let prefix = &template[..open];
        let suffix = &template[close + 1..];
        if suffix.contains(['{', '}']) || prefix.contains('}') {
            return Err(invalid("more than one field"));
        }
        if suffix.contains('/') {
            return Err(invalid("only the part before {epoch} may name directories"));
        }

        let field = &template[open + 1..close];
        let (name, spec) = match field.split_once(':') {
            Some((name, spec)) => (name, Some(spec)),
            None => (field, None),
        };
        if name != FIELD {
            return Err(invalid(&format!("unknown field '{}'", name)));
        }

        let width = match spec {
            None => 0,
            Some(spec) => {
                // `{epoch:02d}` is read the same as `{epoch:02}`.
                let spec = spec.strip_suffix('d').unwrap_or(spec);
                let digits = spec
                    .strip_prefix('0')
                    .ok_or_else(|| invalid("width must be zero-padded, e.g. :02"))?;
                match digits.parse::<usize>() {
                    Ok(w) if (1..=9).contains(&w) && digits.len() == 1 => w,
                    _ => return Err(invalid("width must be a single digit 1-9")),
                }
            }
        };

        Ok(Self {
            prefix: prefix.to_string(),
            width,
            suffix: suffix.to_string(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn format(&self, epoch: u32) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            epoch,
            self.suffix,
            width = self.width
        )
    }

    /// Last path component of [`format`](Self::format).
    pub fn file_name(&self, epoch: u32) -> String {
        let formatted = self.format(epoch);
        match formatted.rsplit_once('/') {
            Some((_, name)) => name.to_string(),
            None => formatted,
        }
    }

    /// Recovers the epoch from a name this template produced. Accepts either
    /// the full formatted name or just its file name.
    pub fn parse_epoch(&self, name: &str) -> Option<u32> {
        let file_prefix = match self.prefix.rsplit_once('/') {
            Some((_, p)) => p,
            None => self.prefix.as_str(),
        };
        let rest = name
            .strip_prefix(self.prefix.as_str())
            .or_else(|| {
                let base = Path::new(name).file_name()?.to_str()?;
                base.strip_prefix(file_prefix)
            })?;
        let digits = rest.strip_suffix(self.suffix.as_str())?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Narrower than the padding, or padded when it did not need to be.
        if digits.len() < self.width {
            return None;
        }
        if digits.len() > self.width.max(1) && digits.starts_with('0') {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for CheckpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 {
            write!(f, "{}{{{}}}{}", self.prefix, FIELD, self.suffix)
        } else {
            write!(
                f,
                "{}{{{}:0{}}}{}",
                self.prefix, FIELD, self.width, self.suffix
            )
        }
    }
}

impl FromStr for CheckpointTemplate {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// The two checkpoint naming schemes in use. They are independent of each
/// other and differ in location and padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointScheme {
    /// `CHECKPOINT_FILE`, relative to the drive directory.
    Drive,
    /// `LOCAL_CHECKPOINT_FILENAME`, inside a run's checkpoint folder.
    #[default]
    Local,
}

impl CheckpointScheme {
    pub fn pattern(self) -> &'static str {
        match self {
            CheckpointScheme::Drive => CHECKPOINT_FILE,
            CheckpointScheme::Local => LOCAL_CHECKPOINT_FILENAME,
        }
    }

    pub fn template(self) -> CheckpointTemplate {
        // Both patterns are constants covered by tests below.
        Self::parse_builtin(self.pattern())
    }

    fn parse_builtin(pattern: &'static str) -> CheckpointTemplate {
        match CheckpointTemplate::parse(pattern) {
            Ok(t) => t,
            Err(e) => unreachable!("built-in checkpoint pattern is invalid: {}", e),
        }
    }
}

impl fmt::Display for CheckpointScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckpointScheme::Drive => write!(f, "drive"),
            CheckpointScheme::Local => write!(f, "local"),
        }
    }
}

impl FromStr for CheckpointScheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drive" => Ok(CheckpointScheme::Drive),
            "local" => Ok(CheckpointScheme::Local),
            other => Err(format!("unknown checkpoint scheme '{}'", other)),
        }
    }
}
