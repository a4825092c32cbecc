use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};

use super::KeyValueStore;

/// Key-value store mirrored into a single JSON object on disk. The whole file is
/// rewritten on every `set`.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let entries = load_entries(&path).await;
        log::info!(
            "Opened store with {} keys. [path = {}]",
            entries.len(),
            path.display()
        );

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }
}

async fn load_entries(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(error) => {
                log::error!(
                    "Failed to parse store file, starting empty. [path = {}, error = {error}]",
                    path.display()
                );
                BTreeMap::new()
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
        Err(error) => {
            log::error!(
                "Failed to read store file, starting empty. [path = {}, error = {error}]",
                path.display()
            );
            BTreeMap::new()
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    /// Memory only changes once the file has been replaced.
    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        let mut entries = self.entries.write().await;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);

        let payload = serde_json::to_vec_pretty(&updated)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload).await?;
        fs::rename(&staging, &self.path).await?;

        *entries = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{read_or_default, write_value};

    fn unique_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "sehatpeduli_{}_{}_{}",
            name,
            std::process::id(),
            nanos
        ));
        path.push("profile.json");
        path
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let path = unique_path("reopen");

        let store = JsonFileStore::open(&path).await.unwrap();
        write_value(&store, "waterTarget", &1800u32).await.unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let target: u32 = read_or_default(&reopened, "waterTarget").await;

        assert_eq!(target, 1800);
        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn failed_write_leaves_value_unchanged() {
        let path = unique_path("failed_write");
        let store = JsonFileStore::open(&path).await.unwrap();
        store.set("waterTarget", "1800".to_string()).await.unwrap();

        fs::remove_dir_all(path.parent().unwrap()).await.unwrap();

        assert!(store.set("waterTarget", "2500".to_string()).await.is_err());
        assert!(store.set("moodEntries", "[]".to_string()).await.is_err());
        assert_eq!(store.get("waterTarget").await.unwrap().as_deref(), Some("1800"));
        assert_eq!(store.get("moodEntries").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_opens_empty() {
        let path = unique_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, b"{ not json").await.unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();

        assert_eq!(store.get("medicineReminders").await.unwrap(), None);
        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
    }
}
