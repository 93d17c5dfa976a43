//! Generic editable-entity panel.
//!
//! Every create/rename/delete surface in the client behaves the same way:
//! one request in flight at a time, destructive actions behind a
//! confirmation, failures logged and surfaced as inline text with the prior
//! state left alone. [`EntityPanel`] implements that once; each resource
//! only supplies an [`EditableEntity`] describing its fields and calls.
//!
//! A panel never touches view state itself. Callers inspect the returned
//! [`Outcome`] and, on `Done`, reconcile (full reload or local patch).

pub mod assignees;
pub mod entities;

use std::future::Future;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::api::ApiClient;
use crate::errors::ClientError;

pub use assignees::{AssigneeDiff, apply_assignee_selection};
pub use entities::{BoardEntity, CardEntity, CommentEntity, ListEntity, MemberEntity, Rename};

/// Pre-flight verdict on user input, checked before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Proceed,
    /// Nothing worth sending (blank or unchanged input).
    Skip,
    /// Input is unusable; the message is shown inline.
    Invalid(String),
}

/// Result of a panel action.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Done(T),
    Skipped,
    /// The user declined the confirmation prompt.
    Declined,
    /// Another request from this panel is still in flight.
    Busy,
    Invalid(String),
    Failed(String),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            _ => None,
        }
    }

    pub fn map_done<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Done(value) => Outcome::Done(f(value)),
            Self::Skipped => Outcome::Skipped,
            Self::Declined => Outcome::Declined,
            Self::Busy => Outcome::Busy,
            Self::Invalid(msg) => Outcome::Invalid(msg),
            Self::Failed(msg) => Outcome::Failed(msg),
        }
    }

    /// Inline error text, if the action produced any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Invalid(msg) | Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Yes/no gate in front of destructive actions.
/// Real implementation: [`DialoguerConfirm`]. Non-interactive: [`AssumeYes`].
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

pub struct DialoguerConfirm;

impl Confirm for DialoguerConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// What a panel needs to know about one kind of entity.
#[async_trait]
pub trait EditableEntity: Send + Sync {
    type Id: Copy + Send + Sync + std::fmt::Display;
    /// Fields collected by the create form.
    type Draft: Send + Sync;
    /// Fields collected by the edit form.
    type Changes: Send + Sync;
    type Saved: Send;

    /// Lowercase noun used in logs and prompts ("card", "list").
    fn kind(&self) -> &'static str;

    fn check_create(&self, _draft: &Self::Draft) -> Check {
        Check::Proceed
    }

    fn check_save(&self, _changes: &Self::Changes) -> Check {
        Check::Proceed
    }

    fn delete_prompt(&self, id: Self::Id) -> String {
        format!("Delete this {} ({})?", self.kind(), id)
    }

    async fn create(
        &self,
        client: &ApiClient,
        draft: &Self::Draft,
    ) -> Result<Self::Saved, ClientError>;

    async fn save(
        &self,
        client: &ApiClient,
        id: Self::Id,
        changes: &Self::Changes,
    ) -> Result<Self::Saved, ClientError>;

    async fn delete(&self, client: &ApiClient, id: Self::Id) -> Result<(), ClientError>;
}

/// Single-flight panel over one [`EditableEntity`].
pub struct EntityPanel<E: EditableEntity> {
    entity: E,
    client: ApiClient,
    confirm: Arc<dyn Confirm>,
    in_flight: AtomicBool,
    last_error: Mutex<Option<String>>,
}

/// Clears the in-flight flag when the request finishes, however it finishes.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<E: EditableEntity> EntityPanel<E> {
    pub fn new(entity: E, client: ApiClient, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            entity,
            client,
            confirm,
            in_flight: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    /// True while a request is outstanding; the trigger should be disabled.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Inline error text from the last action, cleared by the next one.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }

    pub async fn create(&self, draft: &E::Draft) -> Outcome<E::Saved> {
        if let Some(early) = self.precheck(self.entity.check_create(draft)) {
            return early;
        }
        self.run("create", self.entity.create(&self.client, draft)).await
    }

    pub async fn save(&self, id: E::Id, changes: &E::Changes) -> Outcome<E::Saved> {
        if let Some(early) = self.precheck(self.entity.check_save(changes)) {
            return early;
        }
        self.run("update", self.entity.save(&self.client, id, changes)).await
    }

    pub async fn delete(&self, id: E::Id) -> Outcome<()> {
        if self.is_busy() {
            return Outcome::Busy;
        }
        if !self.confirm.confirm(&self.entity.delete_prompt(id)) {
            tracing::debug!(kind = self.entity.kind(), %id, "delete declined");
            return Outcome::Declined;
        }
        self.run("delete", self.entity.delete(&self.client, id)).await
    }

    /// Ask the user before an action that is not a plain delete.
    pub fn confirm(&self, prompt: &str) -> bool {
        self.confirm.confirm(prompt)
    }

    /// Run any request under this panel's single-flight guard and error policy.
    pub async fn run<T, F>(&self, action: &'static str, request: F) -> Outcome<T>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Outcome::Busy;
        }
        let _guard = FlightGuard(&self.in_flight);
        self.set_error(None);

        match request.await {
            Ok(value) => Outcome::Done(value),
            Err(e) => {
                tracing::warn!(
                    kind = self.entity.kind(),
                    action,
                    status = ?e.status(),
                    error = %e,
                    "mutation failed"
                );
                let message = e.message().to_string();
                self.set_error(Some(message.clone()));
                Outcome::Failed(message)
            }
        }
    }

    /// Refuse an action without sending it, showing `message` inline.
    pub fn reject<T>(&self, message: impl Into<String>) -> Outcome<T> {
        let message = message.into();
        self.set_error(Some(message.clone()));
        Outcome::Invalid(message)
    }

    fn precheck<T>(&self, check: Check) -> Option<Outcome<T>> {
        match check {
            Check::Proceed => None,
            Check::Skip => Some(Outcome::Skipped),
            Check::Invalid(message) => Some(self.reject(message)),
        }
    }

    fn set_error(&self, message: Option<String>) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = message;
        }
    }
}
