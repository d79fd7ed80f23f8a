//! The general configuration settings for folio.
//!
//! [General] is deserialized from the `[general]` table of `folio.toml`, [InternalGeneral] is the
//! checked form used by the rest of folio.

use crate::core::recent::MAX_RECENT_FILES;
use crate::utils::{clamp_recent_files, expand_home_path};
use crate::utils::logging::parse_level;

use log::LevelFilter;
use serde::Deserialize;

use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug)]
#[serde(default)]
pub(crate) struct General {
    max_recent_files: usize,
    data_dir: Option<String>,
    log_level: String,
}

impl Default for General {
    fn default() -> Self {
        General {
            max_recent_files: MAX_RECENT_FILES,
            data_dir: None,
            log_level: "info".into(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct InternalGeneral {
    max_recent_files: usize,
    data_dir: Option<PathBuf>,
    log_level: LevelFilter,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        Self {
            max_recent_files: clamp_recent_files(g.max_recent_files),
            data_dir: g
                .data_dir
                .filter(|d| !d.trim().is_empty())
                .map(|d| expand_home_path(&d)),
            log_level: parse_level(&g.log_level),
        }
    }
}

impl InternalGeneral {
    #[inline]
    pub(crate) fn max_recent_files(&self) -> usize {
        self.max_recent_files
    }

    #[inline]
    pub(crate) fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    #[inline]
    pub(crate) fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}
