//! # User manager: create/edit/delete orchestration
//!
//! [`UserManager`] ties the pieces of the users view together: the
//! [`ListState`] shown on screen, the [`UserForm`] bound to the create/edit
//! form, the optional [`EditSession`], a [`RemoteStore`] and a [`Prompt`].
//!
//! ## Modes
//!
//! With no session the form creates users; [`begin_edit`](UserManager::begin_edit)
//! opens a session and the same form then updates the selected row. Only one
//! session may be active; a second `begin_edit` is rejected with
//! [`UsersError::EditInProgress`] until the first is submitted or cancelled.
//!
//! ## Split flows
//!
//! Every remote flow exists in two shapes:
//!
//! | Async (owns `&mut self` across the call) | Split (no borrow held while awaiting) |
//! |------------------------------------------|----------------------------------------|
//! | [`submit`](UserManager::submit) | [`begin_submit`](UserManager::begin_submit) → [`SubmitRequest::dispatch`] → [`finish_submit`](UserManager::finish_submit) |
//! | [`delete`](UserManager::delete) | [`begin_delete`](UserManager::begin_delete) → `Prompt::confirm` → [`DeleteRequest::dispatch`] → [`finish_delete`](UserManager::finish_delete) |
//! | [`load_and_hydrate`](UserManager::load_and_hydrate) | `RemoteStore::list_users` → [`apply_load`](UserManager::apply_load) → [`SlotJob::run`] → [`apply`](UserManager::apply) |
//!
//! The split shape is what the UI uses: it keeps the manager inside a reactive
//! signal and must not hold a borrow while a request is in flight. Requests
//! remember their row by [`RowKey`], so the list may change underneath them.
//!
//! ## Failures
//!
//! Validation errors ([`UsersError::PasswordMismatch`], [`UsersError::NotPersisted`])
//! are raised before any remote call and alerted. A failed delete is alerted and
//! leaves the list untouched. A failed create/update is logged only; whether the
//! draft survives is decided by the configured [`DraftPolicy`].
//!
//! ## Pending submits
//!
//! Only one submit may be in flight. Under [`DraftPolicy::ClearAlways`] the
//! form and session are cleared as soon as the request is built, so the form is
//! free for the next user while the first is being saved. Under
//! [`DraftPolicy::KeepOnFailure`] they are held until the result is known, and
//! `begin_edit` is refused in the meantime.

use futures::StreamExt;

use crate::config::{DraftPolicy, UsersConfig};
use crate::error::{StoreError, UsersError};
use crate::form::{EditSession, UserForm};
use crate::list_state::{ListState, RowKey, Toggle};
use crate::models::{Experience, ExperienceRef, User};
use crate::prompt::Prompt;
use crate::remote::RemoteStore;
use crate::resolver::{self, SlotJob, SlotOutcome};

/// A validated submit, ready to be sent to the store.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitRequest {
    Create { user: User },
    Update { key: RowKey, user: User },
}

impl SubmitRequest {
    pub async fn dispatch<S: RemoteStore>(&self, store: &S) -> Result<User, StoreError> {
        match self {
            Self::Create { user } => store.create_user(user).await,
            Self::Update { user, .. } => store.update_user(user).await,
        }
    }
}

/// A delete that passed the local checks and awaits confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteRequest {
    pub key: RowKey,
    pub id: String,
    pub name: String,
}

impl DeleteRequest {
    /// Question shown before the delete is sent.
    pub fn confirmation(&self) -> String {
        format!("Are you sure you want to delete {}?", self.name)
    }

    pub async fn dispatch<S: RemoteStore>(&self, store: &S) -> Result<(), StoreError> {
        store.delete_user(&self.id).await
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

pub struct UserManager<S, P> {
    store: S,
    prompt: P,
    policy: DraftPolicy,
    list: ListState,
    form: UserForm,
    session: Option<EditSession>,
    pending: bool,
}

impl<S: RemoteStore, P: Prompt> UserManager<S, P> {
    pub fn new(store: S, prompt: P) -> Self {
        Self {
            store,
            prompt,
            policy: DraftPolicy::default(),
            list: ListState::new(),
            form: UserForm::default(),
            session: None,
            pending: false,
        }
    }

    pub fn from_config(store: S, prompt: P, config: &UsersConfig) -> Self {
        Self::new(store, prompt).with_policy(config.form.draft_policy)
    }

    /// Builder method to set the draft policy.
    pub fn with_policy(mut self, policy: DraftPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn policy(&self) -> DraftPolicy {
        self.policy
    }

    pub fn list(&self) -> &ListState {
        &self.list
    }

    pub fn form(&self) -> &UserForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UserForm {
        &mut self.form
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    /// Whether a submit was begun and not yet finished.
    pub fn is_submitting(&self) -> bool {
        self.pending
    }

    fn out_of_range(&self, index: usize) -> UsersError {
        UsersError::IndexOutOfRange {
            index,
            len: self.list.len(),
        }
    }

    // Load and hydration

    /// Fetch every user and replace the list. Returns the hydration jobs.
    pub async fn load(&mut self) -> Result<Vec<SlotJob>, UsersError> {
        let users = self.store.list_users().await.map_err(|e| {
            tracing::error!("Failed to load users: {}", e);
            UsersError::Remote(e)
        })?;
        Ok(self.apply_load(users))
    }

    /// Replace the list with freshly fetched users. Any edit session refers to
    /// the old list, so it is dropped along with the draft.
    pub fn apply_load(&mut self, users: Vec<User>) -> Vec<SlotJob> {
        if self.session.take().is_some() {
            self.form.reset();
        }
        let jobs = self.list.load(users);
        tracing::info!(
            "Loaded {} users, {} experience references to resolve",
            self.list.len(),
            jobs.len()
        );
        jobs
    }

    pub fn apply(&mut self, outcome: SlotOutcome) -> bool {
        self.list.apply(outcome)
    }

    /// Load, then resolve every experience reference, applying each outcome as
    /// soon as its fetch completes.
    pub async fn load_and_hydrate(&mut self) -> Result<(), UsersError> {
        let jobs = self.load().await?;
        self.hydrate(jobs).await;
        Ok(())
    }

    /// Run `jobs` concurrently and apply each outcome in completion order.
    pub async fn hydrate(&mut self, jobs: Vec<SlotJob>) {
        let mut outcomes = std::pin::pin!(resolver::hydrate(&self.store, jobs));
        while let Some(outcome) = outcomes.next().await {
            if !self.list.apply(outcome) {
                tracing::debug!("Dropped experience for a row that no longer exists");
            }
        }
    }

    // Submit

    /// Validate the form and build the remote request.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, UsersError> {
        if self.pending {
            tracing::debug!("Ignored submit while another is in flight");
            return Err(UsersError::SubmitInProgress);
        }
        self.form.submitted = true;

        if !self.form.passwords_match() {
            self.prompt
                .alert("Passwords do not match. Please try again.");
            return Err(UsersError::PasswordMismatch);
        }

        let request = match &self.session {
            Some(session) => {
                if self.list.index_of(session.key).is_none() {
                    return Err(self.out_of_range(session.index));
                }
                SubmitRequest::Update {
                    key: session.key,
                    user: session.merge(&self.form.draft),
                }
            }
            None => SubmitRequest::Create {
                user: User {
                    id: None,
                    ..self.form.draft.clone()
                },
            },
        };

        self.pending = true;
        if self.policy == DraftPolicy::ClearAlways {
            self.session = None;
            self.form.reset();
        }
        Ok(request)
    }

    /// Commit a dispatched submit. Returns hydration jobs for references the
    /// committed user still carries unresolved.
    pub fn finish_submit(
        &mut self,
        request: SubmitRequest,
        result: Result<User, StoreError>,
    ) -> Result<Vec<SlotJob>, UsersError> {
        self.pending = false;
        let failed = result.is_err();

        let outcome = match (request, result) {
            (SubmitRequest::Create { .. }, Ok(created)) => {
                tracing::info!("Created user {:?}", created.id);
                let key = self.list.append(created.clone());
                Ok(resolver::jobs_for(key, &created))
            }
            (SubmitRequest::Update { key, mut user }, Ok(_)) => match self.list.index_of(key) {
                Some(index) => {
                    tracing::info!("Updated user {:?} at row {}", user.id, index);
                    // the form never edits references; keep whatever hydration
                    // has resolved since the edit began
                    if let Some(row) = self.list.get(index) {
                        user.experiences = row.user.experiences.clone();
                    }
                    let jobs = resolver::jobs_for(key, &user);
                    self.list.replace_at(index, user)?;
                    Ok(jobs)
                }
                None => {
                    tracing::warn!("Updated user {:?} is no longer listed", user.id);
                    Ok(Vec::new())
                }
            },
            (SubmitRequest::Create { .. }, Err(e)) => {
                tracing::error!("Failed to create user: {}", e);
                Err(UsersError::Remote(e))
            }
            (SubmitRequest::Update { user, .. }, Err(e)) => {
                tracing::error!("Failed to update user {:?}: {}", user.id, e);
                Err(UsersError::Remote(e))
            }
        };

        // under ClearAlways begin_submit already cleared them, and the form
        // may hold a new draft by now
        if !failed && self.policy == DraftPolicy::KeepOnFailure {
            self.session = None;
            self.form.reset();
        }

        outcome
    }

    /// Validate, send to the store, commit.
    pub async fn submit(&mut self) -> Result<Vec<SlotJob>, UsersError> {
        let request = self.begin_submit()?;
        let result = request.dispatch(&self.store).await;
        self.finish_submit(request, result)
    }

    // Edit session

    /// Load row `index` into the form and expand it.
    pub fn begin_edit(&mut self, index: usize) -> Result<(), UsersError> {
        if let Some(session) = &self.session {
            return Err(UsersError::EditInProgress {
                index: session.index,
            });
        }
        if self.pending && self.policy == DraftPolicy::KeepOnFailure {
            return Err(UsersError::SubmitInProgress);
        }
        let row = self.list.get(index).ok_or_else(|| self.out_of_range(index))?;

        let session = EditSession {
            index,
            key: row.key,
            original: row.user.clone(),
        };
        self.form = UserForm {
            draft: row.user.clone(),
            ..UserForm::default()
        };
        self.session = Some(session);
        self.list.set_expanded(index, true)?;
        tracing::debug!("Editing row {}", index);
        Ok(())
    }

    /// Drop the session and the draft; the list is left as it was.
    pub fn cancel_edit(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!("Cancelled edit of row {}", session.index);
        }
        self.form.reset();
    }

    // Delete

    /// Check that row `index` can be deleted remotely.
    pub fn begin_delete(&self, index: usize) -> Result<DeleteRequest, UsersError> {
        let row = self.list.get(index).ok_or_else(|| self.out_of_range(index))?;
        let Some(id) = row.user.id.clone() else {
            tracing::error!("Row {} has no identifier and cannot be deleted", index);
            self.prompt
                .alert("This user cannot be deleted because it is not stored yet.");
            return Err(UsersError::NotPersisted);
        };
        Ok(DeleteRequest {
            key: row.key,
            id,
            name: row.user.name.clone(),
        })
    }

    /// Commit a dispatched delete. On failure the list is left unchanged.
    pub fn finish_delete(
        &mut self,
        request: DeleteRequest,
        result: Result<(), StoreError>,
    ) -> Result<(), UsersError> {
        if let Err(e) = result {
            tracing::error!("Failed to delete user {}: {}", request.id, e);
            self.prompt
                .alert("Could not delete the user. Please try again.");
            return Err(UsersError::Remote(e));
        }

        tracing::info!("Deleted user {}", request.id);
        if let Some(index) = self.list.index_of(request.key) {
            self.list.remove_at(index)?;
        }

        let edited = self.session.as_ref().map(|s| s.key);
        if edited == Some(request.key) {
            self.session = None;
            self.form.reset();
        } else if let Some(session) = &mut self.session {
            if let Some(index) = self.list.index_of(session.key) {
                session.index = index;
            }
        }
        Ok(())
    }

    /// Check, confirm, send to the store, commit.
    pub async fn delete(&mut self, index: usize) -> Result<DeleteOutcome, UsersError> {
        let request = self.begin_delete(index)?;
        if !self.prompt.confirm(&request.confirmation()).await {
            tracing::debug!("Delete of user {} declined", request.id);
            return Ok(DeleteOutcome::Declined);
        }
        let result = request.dispatch(&self.store).await;
        self.finish_delete(request, result)?;
        Ok(DeleteOutcome::Deleted)
    }

    // Flags

    pub fn toggle(&mut self, kind: Toggle, index: usize) -> Result<bool, UsersError> {
        self.list.toggle(kind, index)
    }

    // Experiences

    /// Associate an experience with the user at `index` and append the raw
    /// reference. Returns the job that resolves it, or `None` when the user
    /// already referenced that experience.
    pub async fn attach_experience(
        &mut self,
        index: usize,
        experience_id: &str,
    ) -> Result<Option<SlotJob>, UsersError> {
        let row = self.list.get(index).ok_or_else(|| self.out_of_range(index))?;
        let key = row.key;
        let user_id = row.user.id.clone().ok_or(UsersError::NotPersisted)?;

        self.store
            .add_experience_to_user(&user_id, experience_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to attach experience {} to {}: {}", experience_id, user_id, e);
                UsersError::Remote(e)
            })?;

        let len = self.list.len();
        let row = self
            .list
            .get_mut(index)
            .ok_or(UsersError::IndexOutOfRange { index, len })?;
        // the store keeps a reference once
        if row.user.experiences.iter().any(|e| e.id() == Some(experience_id)) {
            tracing::debug!("Experience {} already attached to {}", experience_id, user_id);
            return Ok(None);
        }
        row.user
            .experiences
            .push(ExperienceRef::Unresolved(experience_id.to_string()));
        Ok(Some(SlotJob {
            key,
            slot: row.user.experiences.len() - 1,
            id: experience_id.to_string(),
        }))
    }

    /// Experiences owned by, or shared with, the user at `index`.
    pub async fn experiences_of(&self, index: usize) -> Result<Vec<Experience>, UsersError> {
        let row = self.list.get(index).ok_or_else(|| self.out_of_range(index))?;
        let user_id = row.user.id.as_deref().ok_or(UsersError::NotPersisted)?;
        Ok(self.store.list_experiences_for(user_id).await?)
    }
}
