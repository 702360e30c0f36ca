// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use log::debug;

use crate::{
    error::{self, Result},
    metadata,
};

use super::{IsPersistent, Key, Store};

/// Keeps each key in its own text file under a directory.
pub(crate) struct File {
    dir: PathBuf,
}

impl File {
    pub(crate) fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_owned(),
        }
    }

    pub(crate) fn in_data_dir() -> Result<Self, error::Storage> {
        metadata::PROJECT_DIRS
            .as_ref()
            .map(|dirs| Self::new(dirs.data_dir()))
            .ok_or(error::Storage::NoProjectDirs)
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: Key) -> PathBuf {
        self.dir.join(key.as_str())
    }
}

impl IsPersistent for File {
    fn is_persistent(&self) -> bool {
        true
    }
}

#[async_trait]
impl Store for File {
    async fn get(&mut self, key: Key) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&mut self, key: Key, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        debug!("Wrote {} to {}", key, self.dir.display());
        Ok(())
    }

    async fn remove(&mut self, key: Key) -> Result<()> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
