//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process
//! startup and then passed into core services. The intent is to avoid reading
//! process-wide environment variables during request handling, which can lead
//! to inconsistent behaviour in multi-threaded runtimes and test harnesses.

use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    db_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `db_path` is the location of the embedded document store file. The
    /// file does not have to exist yet; it is created on first use.
    pub fn new(db_path: PathBuf) -> CoreResult<Self> {
        if db_path.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput("db_path cannot be empty".into()));
        }

        Ok(Self { db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
