// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;

use super::{IsPersistent, Key, Store};

/// A store that lives only as long as the process. Clones share their data.
#[derive(Clone, Default)]
pub(crate) struct Memory {
    data: Arc<RwLock<HashMap<Key, String>>>,
}

impl Memory {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl IsPersistent for Memory {
    fn is_persistent(&self) -> bool {
        false
    }
}

#[async_trait]
impl Store for Memory {
    async fn get(&mut self, key: Key) -> Result<Option<String>> {
        let guard = self.data.read().await;
        Ok(guard.get(&key).cloned())
    }

    async fn set(&mut self, key: Key, value: &str) -> Result<()> {
        let mut guard = self.data.write().await;
        _ = guard.insert(key, value.to_owned());
        Ok(())
    }

    async fn remove(&mut self, key: Key) -> Result<()> {
        let mut guard = self.data.write().await;
        _ = guard.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() -> Result<()> {
        let mut store = Memory::new();
        assert_eq!(store.get(Key::Theme).await?, None);

        store.set(Key::Theme, "dark").await?;
        assert_eq!(store.get(Key::Theme).await?.as_deref(), Some("dark"));

        store.remove(Key::Theme).await?;
        store.remove(Key::Theme).await?;
        assert_eq!(store.get(Key::Theme).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn clones_share_data() -> Result<()> {
        let mut store = Memory::new();
        let mut other = store.clone();
        store.set(Key::GuestAccess, "true").await?;
        assert_eq!(other.get(Key::GuestAccess).await?.as_deref(), Some("true"));
        Ok(())
    }
}
