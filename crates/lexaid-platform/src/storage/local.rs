//! window.localStorage backend.
//! Persistent across page reloads; synchronous and effectively atomic
//! within one tab. Two tabs of the same profile race with
//! last-writer-wins semantics — there is no cross-tab coordination.

use async_trait::async_trait;
use lexaid_core::ports::StoragePort;
use lexaid_types::{ClientError, Result};

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Grab window.localStorage, failing when the browser denies access
    /// (private mode, sandboxed frames).
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| ClientError::Storage("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| ClientError::Storage("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .storage
            .get_item(key)
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))?;
        Ok(value.map(|s| s.into_bytes()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(value)
            .map_err(|e| ClientError::Storage(format!("value is not UTF-8: {}", e)))?;
        self.storage
            .set_item(key, text)
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let length = self
            .storage
            .length()
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))?;

        let mut keys = Vec::new();
        for i in 0..length {
            if let Ok(Some(key)) = self.storage.key(i) {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }
        Ok(keys)
    }

    fn backend_name(&self) -> &str {
        "localstorage"
    }
}
