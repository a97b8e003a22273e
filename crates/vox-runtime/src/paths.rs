//! Filesystem layout used by the runtime.
//!
//! All derived locations hang off one base directory (default
//! `~/.vox`). The intent-file contract lives here: the definition for
//! `(skill, intent)` must exist at
//! `<skills_dir>/<skill_snake>/vocab/<lang>/<intent>.intent` before
//! out-of-process registration succeeds.

use crate::config::VoxConfig;
use std::path::{Path, PathBuf};
use vox_types::to_snake;

/// Resolves directories and files used by the runtime.
#[derive(Debug, Clone)]
pub struct Paths {
    base: PathBuf,
    lang: String,
}

impl Paths {
    /// Derive paths from configuration; the base directory falls back
    /// to `~/.vox`, or the current directory when no home is known.
    pub fn new(config: &VoxConfig) -> Self {
        let base = config
            .paths
            .base_dir
            .clone()
            .or_else(|| home_dir().map(|home| home.join(".vox")))
            .unwrap_or_else(|| PathBuf::from(".vox"));
        Self {
            base,
            lang: config.lang.clone(),
        }
    }

    /// Base data directory.
    #[must_use]
    pub fn user_dir(&self) -> &Path {
        &self.base
    }

    /// Checkout directory of the trained-model worker.
    #[must_use]
    pub fn worker_dir(&self) -> PathBuf {
        self.base.join("worker")
    }

    /// The locally compiled worker executable.
    #[must_use]
    pub fn worker_exe(&self) -> PathBuf {
        self.worker_dir().join("build").join("src").join("vox-worker")
    }

    /// Root of all installed skills.
    #[must_use]
    pub fn skills_dir(&self) -> PathBuf {
        self.base.join("skills")
    }

    /// Directory of one skill, snake-cased.
    #[must_use]
    pub fn skill_dir(&self, skill: &str) -> PathBuf {
        self.skills_dir().join(to_snake(skill))
    }

    /// Locale-specific vocabulary directory of one skill.
    #[must_use]
    pub fn vocab_dir(&self, skill: &str) -> PathBuf {
        self.skill_dir(skill).join("vocab").join(&self.lang)
    }

    /// Intent definition directory; same location as the vocabulary.
    #[must_use]
    pub fn intent_dir(&self, skill: &str) -> PathBuf {
        self.vocab_dir(skill)
    }

    /// Dialog template directory; same location as the vocabulary.
    #[must_use]
    pub fn dialog_dir(&self, skill: &str) -> PathBuf {
        self.vocab_dir(skill)
    }

    /// Per-skill configuration file.
    #[must_use]
    pub fn skill_conf(&self, skill: &str) -> PathBuf {
        self.skill_dir(skill).join("skill.conf")
    }
}

/// Home directory from the environment (`HOME`, or `USERPROFILE` on
/// Windows hosts).
pub(crate) fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
