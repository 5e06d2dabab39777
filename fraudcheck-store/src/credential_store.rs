//! File-backed credential cache.
//!
//! Credentials survive process restarts in a single JSON file. Every
//! operation is a read-modify-write under one async mutex, so concurrent
//! couriers in the same process never lose each other's updates.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fraudcheck_fetch::{CacheError, CredentialCache, ProviderCredential};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::persistence::{load_json_or_default, save_json};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    credential: ProviderCredential,
    expires_at: DateTime<Utc>,
}

type Entries = BTreeMap<String, StoredCredential>;

/// [`CredentialCache`] persisted to a JSON file.
#[derive(Debug)]
pub struct FileCredentialCache {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialCache {
    /// Creates a cache stored at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Entries {
        load_json_or_default(&self.path).await
    }

    async fn save(&self, entries: &Entries) -> Result<(), CacheError> {
        save_json(&self.path, entries).await?;
        Ok(())
    }
}

fn prune(entries: &mut Entries, now: DateTime<Utc>) -> bool {
    let before = entries.len();
    entries.retain(|_, stored| stored.expires_at > now);
    entries.len() != before
}

#[async_trait]
impl CredentialCache for FileCredentialCache {
    async fn get(&self, key: &str) -> Result<Option<ProviderCredential>, CacheError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await;
        let now = Utc::now();

        match entries.get(key) {
            Some(stored) if stored.expires_at > now => Ok(Some(stored.credential.clone())),
            Some(_) => {
                prune(&mut entries, now);
                self.save(&entries).await?;
                debug!(key, "Evicted expired credential from file");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &str,
        credential: ProviderCredential,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await;
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| CacheError::Unavailable(format!("TTL out of range: {e}")))?;

        prune(&mut entries, now);
        entries.insert(
            key.to_string(),
            StoredCredential {
                credential,
                expires_at: now + ttl,
            },
        );
        self.save(&entries).await?;
        debug!(key, path = %self.path.display(), "Stored credential in file");
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<(), CacheError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
            debug!(key, "Forgot credential in file");
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fraudcheck_fetch::CookieJar;
    use tempfile::TempDir;

    use super::*;

    const TTL: Duration = Duration::from_secs(50 * 60);

    #[tokio::test]
    async fn test_survives_new_instance() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.json");

        let cache = FileCredentialCache::new(&path);
        cache
            .put("pathao_access_token", ProviderCredential::bearer("tok", None), TTL)
            .await
            .unwrap();

        let reopened = FileCredentialCache::new(&path);
        let got = reopened.get("pathao_access_token").await.unwrap().unwrap();
        assert_eq!(got.as_bearer(), Some("tok"));
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileCredentialCache::new(temp_dir.path().join("absent.json"));
        assert!(cache.get("anything").await.unwrap().is_none());
        cache.forget("anything").await.unwrap();
        assert!(!cache.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_treated_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let cache = FileCredentialCache::new(&path);
        assert!(cache.get("k").await.unwrap().is_none());
        cache
            .put("k", ProviderCredential::bearer("t", None), TTL)
            .await
            .unwrap();
        assert!(cache.get("k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_expired_entry_evicted() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileCredentialCache::new(temp_dir.path().join("credentials.json"));
        cache
            .put("k", ProviderCredential::bearer("t", None), Duration::ZERO)
            .await
            .unwrap();
        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_roundtrip_and_forget() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileCredentialCache::new(temp_dir.path().join("credentials.json"));
        let jar: CookieJar = [("steadfast_session", "s1"), ("XSRF-TOKEN", "x")]
            .into_iter()
            .collect();
        cache
            .put("steadfast_auth_data", ProviderCredential::session(jar.clone(), "csrf"), TTL)
            .await
            .unwrap();

        let got = cache.get("steadfast_auth_data").await.unwrap().unwrap();
        assert_eq!(got, ProviderCredential::session(jar, "csrf"));

        cache.forget("steadfast_auth_data").await.unwrap();
        assert!(cache.get("steadfast_auth_data").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_puts_are_not_lost() {
        let temp_dir = TempDir::new().unwrap();
        let cache = Arc::new(FileCredentialCache::new(temp_dir.path().join("credentials.json")));

        let mut handles = Vec::new();
        for key in ["steadfast_auth_data", "pathao_access_token", "redx_access_token"] {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                cache
                    .put(key, ProviderCredential::bearer(key, None), TTL)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for key in ["steadfast_auth_data", "pathao_access_token", "redx_access_token"] {
            let got = cache.get(key).await.unwrap().unwrap();
            assert_eq!(got.as_bearer(), Some(key));
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.json");
        let cache = FileCredentialCache::new(&path);
        cache
            .put("k", ProviderCredential::bearer("t", None), TTL)
            .await
            .unwrap();

        let mode = tokio::fs::metadata(&path).await.unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
