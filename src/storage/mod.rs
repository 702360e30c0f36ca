// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

mod file;
mod memory;

use std::{
    fmt::{Display, Formatter},
    sync::Arc,
};

use async_trait::async_trait;
use futures_util::lock::Mutex;

use crate::error::Result;

pub(crate) use file::File;
pub(crate) use memory::Memory;

/// The named slots the lab keeps in its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Key {
    Session,
    UserCodes,
    GuestAccess,
    Theme,
}

impl Key {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Session => "labSession",
            Self::UserCodes => "labUserCodes",
            Self::GuestAccess => "labGuestAccess",
            Self::Theme => "theme",
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) trait IsPersistent {
    fn is_persistent(&self) -> bool;
}

impl<T: IsPersistent + ?Sized> IsPersistent for Box<T> {
    fn is_persistent(&self) -> bool {
        (**self).is_persistent()
    }
}

/// Text values under named keys. Removing a key that holds nothing succeeds.
#[async_trait]
pub(crate) trait Store: Send + Sync + IsPersistent {
    async fn get(&mut self, key: Key) -> Result<Option<String>>;
    async fn set(&mut self, key: Key, value: &str) -> Result<()>;
    async fn remove(&mut self, key: Key) -> Result<()>;
}

#[async_trait]
impl<T: Store + ?Sized> Store for Box<T> {
    async fn get(&mut self, key: Key) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&mut self, key: Key, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&mut self, key: Key) -> Result<()> {
        (**self).remove(key).await
    }
}

pub(crate) type Shared = Arc<Mutex<Box<dyn Store>>>;

pub(crate) fn shared(store: Box<dyn Store>) -> Shared {
    Arc::new(Mutex::new(store))
}
