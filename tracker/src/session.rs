//! Authenticated tracker session
//!
//! Ties an identity to a data source and the query facade. Every operation
//! checks authentication first; an unauthenticated session never touches the
//! source. Successful mutations re-fetch the full collection so the derived
//! view is never computed over stale data.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::age::{Clock, SystemClock};
use crate::error::{TrackerError, TrackerResult};
use crate::form::{EscalationForm, FormTarget};
use crate::query::{EscalationQuery, EscalationView};
use crate::sort::SortKey;
use crate::source::SharedSource;
use crate::state::{CallerProfile, EscalationId, EscalationRecord, Role};

/// Caller identity supplied by the authentication layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub authenticated: bool,
}

impl Identity {
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            authenticated: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            subject: String::new(),
            authenticated: false,
        }
    }
}

/// Outcome of the bootstrap step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// Profile present, session usable
    Ready,
    /// First visit: the caller must save a profile
    NeedsProfile,
}

/// Collection load state for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loaded,
    /// Blocking failure; the collection is empty until the next refresh
    Failed { code: &'static str, message: String },
}

/// A caller's working session
pub struct Session {
    source: SharedSource,
    identity: Identity,
    clock: Arc<dyn Clock>,
    profile: Option<CallerProfile>,
    role: Role,
    query: EscalationQuery,
    load_state: LoadState,
}

impl Session {
    pub fn new(source: SharedSource, identity: Identity) -> Self {
        Self {
            source,
            identity,
            clock: Arc::new(SystemClock),
            profile: None,
            role: Role::default(),
            query: EscalationQuery::new(),
            load_state: LoadState::Idle,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.query.set_sort(sort);
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn profile(&self) -> Option<&CallerProfile> {
        self.profile.as_ref()
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn query(&self) -> &EscalationQuery {
        &self.query
    }

    /// Criteria and sort changes go through here
    pub fn query_mut(&mut self) -> &mut EscalationQuery {
        &mut self.query
    }

    /// Derived view at the session clock's current instant
    pub fn view(&mut self) -> &EscalationView {
        let now = self.clock.now();
        self.query.view(now)
    }

    fn require_auth(&self) -> TrackerResult<()> {
        if self.identity.authenticated {
            Ok(())
        } else {
            Err(TrackerError::Unauthenticated)
        }
    }

    fn require_write(&self, action: &'static str) -> TrackerResult<()> {
        self.require_auth()?;
        if self.role.can_write() {
            Ok(())
        } else {
            Err(TrackerError::PermissionDenied {
                action,
                role: self.role.to_string(),
            })
        }
    }

    /// Fetch caller profile and role concurrently
    pub async fn bootstrap(&mut self) -> TrackerResult<Bootstrap> {
        self.require_auth()?;
        let subject = self.identity.subject.as_str();

        let (profile, role) = tokio::try_join!(
            self.source.caller_profile(subject),
            self.source.caller_role(subject)
        )?;

        info!(subject = %subject, role = %role, has_profile = profile.is_some(), "Session bootstrapped");
        self.role = role;
        self.profile = profile;

        Ok(match self.profile {
            Some(_) => Bootstrap::Ready,
            None => Bootstrap::NeedsProfile,
        })
    }

    /// Save the first-visit profile
    pub async fn complete_profile(&mut self, profile: CallerProfile) -> TrackerResult<()> {
        self.require_auth()?;
        if profile.display_name.trim().is_empty() {
            return Err(TrackerError::validation("display_name", "is required"));
        }
        if profile.email.trim().is_empty() {
            return Err(TrackerError::validation("email", "is required"));
        }

        self.source
            .save_caller_profile(&self.identity.subject, profile.clone())
            .await?;
        self.profile = Some(profile);
        Ok(())
    }

    /// Re-fetch the full collection.
    ///
    /// On failure the collection is cleared so no partial data is shown.
    pub async fn refresh(&mut self) -> TrackerResult<()> {
        self.require_auth()?;
        match self.source.list().await {
            Ok(records) => {
                debug!(count = records.len(), "Collection refreshed");
                self.query.set_records(records);
                self.load_state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Collection fetch failed");
                self.query.clear_records();
                self.load_state = LoadState::Failed {
                    code: e.code(),
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Fetch one record by id
    pub async fn open(&self, id: EscalationId) -> TrackerResult<EscalationRecord> {
        self.require_auth()?;
        self.source
            .get(id)
            .await?
            .ok_or(TrackerError::RecordNotFound { id })
    }

    /// Blank draft pre-filled from the caller profile
    pub fn new_draft(&self) -> EscalationForm {
        EscalationForm::new_draft(self.profile.as_ref())
    }

    /// Create or update depending on the form target
    pub async fn submit(&mut self, form: &EscalationForm) -> TrackerResult<EscalationId> {
        match form.target {
            FormTarget::Draft(_) => self.create(form).await,
            FormTarget::Existing(id) => self.update(id, form).await.map(|_| id),
        }
    }

    pub async fn create(&mut self, form: &EscalationForm) -> TrackerResult<EscalationId> {
        self.require_write("create escalations")?;
        let fields = form.validate()?;

        let id = self.source.create(fields).await?;
        info!(id = %id, "Escalation created");
        self.refresh_after_mutation().await;
        Ok(id)
    }

    pub async fn update(&mut self, id: EscalationId, form: &EscalationForm) -> TrackerResult<()> {
        self.require_write("edit escalations")?;
        let fields = form.validate()?;

        self.source.update(id, fields).await?;
        info!(id = %id, "Escalation updated");
        self.refresh_after_mutation().await;
        Ok(())
    }

    pub async fn delete(&mut self, id: EscalationId) -> TrackerResult<()> {
        self.require_write("delete escalations")?;

        self.source.delete(id).await?;
        info!(id = %id, "Escalation deleted");
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// The mutation already succeeded; a failed re-fetch is reported through
    /// `load_state` rather than as the mutation's result.
    async fn refresh_after_mutation(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Re-fetch after mutation failed");
        }
    }
}
