//! JSON-file data source
//!
//! The whole store lives in one [`StoreSnapshot`] document. Every operation
//! reloads it, so edits made by another process between calls are seen
//! (last write wins). Writes go to a sibling temp file and are renamed into
//! place.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::EscalationSource;
use crate::age::{Clock, SystemClock};
use crate::error::{TrackerError, TrackerResult};
use crate::state::schema::SNAPSHOT_VERSION;
use crate::state::{
    CallerProfile, EscalationFields, EscalationId, EscalationRecord, Role, StoreSnapshot,
};

/// Data source persisted to a JSON file
pub struct JsonFileSource {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    lock: Mutex<()>,
}

impl JsonFileSource {
    /// Open a store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
            lock: Mutex::new(()),
        }
    }

    /// Get the store path
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> TrackerResult<StoreSnapshot> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file missing, starting empty");
                return Ok(StoreSnapshot::new());
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: StoreSnapshot = serde_json::from_slice(&bytes)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(TrackerError::unavailable(format!(
                "store {} has format version {}, newer than supported {}",
                self.path.display(),
                snapshot.version,
                SNAPSHOT_VERSION
            )));
        }
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> TrackerResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Load, mutate and save under the store lock
    async fn modify<T>(
        &self,
        f: impl FnOnce(&mut StoreSnapshot) -> TrackerResult<T> + Send,
    ) -> TrackerResult<T> {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.load().await?;
        let out = f(&mut snapshot)?;
        self.save(&snapshot).await?;
        Ok(out)
    }

    async fn read(&self) -> TrackerResult<StoreSnapshot> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Assign a role to a subject (administrative, not part of the source contract)
    pub async fn assign_role(&self, subject: &str, role: Role) -> TrackerResult<()> {
        self.modify(|store| {
            store.put_role(subject, role);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl EscalationSource for JsonFileSource {
    async fn list(&self) -> TrackerResult<Vec<EscalationRecord>> {
        Ok(self.read().await?.list())
    }

    async fn get(&self, id: EscalationId) -> TrackerResult<Option<EscalationRecord>> {
        Ok(self.read().await?.get(id).cloned())
    }

    async fn create(&self, fields: EscalationFields) -> TrackerResult<EscalationId> {
        let now = self.clock.now();
        let id = self
            .modify(|store| Ok(store.insert(fields, now).id))
            .await?;
        info!(id = %id, path = %self.path.display(), "Escalation created");
        Ok(id)
    }

    async fn update(&self, id: EscalationId, fields: EscalationFields) -> TrackerResult<()> {
        self.modify(|store| {
            if store.update(id, fields) {
                Ok(())
            } else {
                Err(TrackerError::RecordNotFound { id })
            }
        })
        .await?;
        info!(id = %id, "Escalation updated");
        Ok(())
    }

    async fn delete(&self, id: EscalationId) -> TrackerResult<()> {
        self.modify(|store| {
            if store.remove(id) {
                Ok(())
            } else {
                Err(TrackerError::RecordNotFound { id })
            }
        })
        .await?;
        info!(id = %id, "Escalation deleted");
        Ok(())
    }

    async fn caller_profile(&self, subject: &str) -> TrackerResult<Option<CallerProfile>> {
        Ok(self.read().await?.profile(subject).cloned())
    }

    async fn save_caller_profile(
        &self,
        subject: &str,
        profile: CallerProfile,
    ) -> TrackerResult<()> {
        self.modify(|store| {
            store.put_profile(subject, profile);
            Ok(())
        })
        .await
    }

    async fn caller_role(&self, subject: &str) -> TrackerResult<Role> {
        Ok(self.read().await?.role(subject))
    }
}
