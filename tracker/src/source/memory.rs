//! In-process data source

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::EscalationSource;
use crate::age::{Clock, SystemClock};
use crate::error::{TrackerError, TrackerResult};
use crate::state::{
    CallerProfile, EscalationFields, EscalationId, EscalationRecord, Role, StoreSnapshot,
};

/// Data source holding everything in memory.
///
/// Can be switched offline to exercise the unavailable path.
pub struct MemorySource {
    store: RwLock<StoreSnapshot>,
    clock: Arc<dyn Clock>,
    offline: AtomicBool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::from_snapshot(StoreSnapshot::new(), clock)
    }

    pub fn from_snapshot(snapshot: StoreSnapshot, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: RwLock::new(snapshot),
            clock,
            offline: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with `SourceUnavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn assign_role(&self, subject: &str, role: Role) {
        self.store.write().await.put_role(subject, role);
    }

    fn check_online(&self) -> TrackerResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(TrackerError::unavailable("memory source is offline"));
        }
        Ok(())
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EscalationSource for MemorySource {
    async fn list(&self) -> TrackerResult<Vec<EscalationRecord>> {
        self.check_online()?;
        Ok(self.store.read().await.list())
    }

    async fn get(&self, id: EscalationId) -> TrackerResult<Option<EscalationRecord>> {
        self.check_online()?;
        Ok(self.store.read().await.get(id).cloned())
    }

    async fn create(&self, fields: EscalationFields) -> TrackerResult<EscalationId> {
        self.check_online()?;
        let now = self.clock.now();
        let mut store = self.store.write().await;
        let record = store.insert(fields, now);
        debug!(id = %record.id, number = %record.escalation_number, "Created escalation");
        Ok(record.id)
    }

    async fn update(&self, id: EscalationId, fields: EscalationFields) -> TrackerResult<()> {
        self.check_online()?;
        if self.store.write().await.update(id, fields) {
            Ok(())
        } else {
            Err(TrackerError::RecordNotFound { id })
        }
    }

    async fn delete(&self, id: EscalationId) -> TrackerResult<()> {
        self.check_online()?;
        if self.store.write().await.remove(id) {
            Ok(())
        } else {
            Err(TrackerError::RecordNotFound { id })
        }
    }

    async fn caller_profile(&self, subject: &str) -> TrackerResult<Option<CallerProfile>> {
        self.check_online()?;
        Ok(self.store.read().await.profile(subject).cloned())
    }

    async fn save_caller_profile(
        &self,
        subject: &str,
        profile: CallerProfile,
    ) -> TrackerResult<()> {
        self.check_online()?;
        self.store.write().await.put_profile(subject, profile);
        Ok(())
    }

    async fn caller_role(&self, subject: &str) -> TrackerResult<Role> {
        self.check_online()?;
        Ok(self.store.read().await.role(subject))
    }
}
