//! Card detail: fields, assignees and the comment thread.
//!
//! Every successful mutation here reloads the card, since assignee and
//! comment rows carry backend-assigned ids and timestamps.

use std::sync::Arc;

use trellis_common::{CardPatch, CardWithDetails, CommentWithUser, NewComment, User};

use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::panel::{
    AssigneeDiff, CardEntity, CommentEntity, Confirm, EntityPanel, Outcome, apply_assignee_selection,
};
use crate::routes::{Loaded, Route};

/// Edits collected from the card form. Empty strings clear the field.
#[derive(Debug, Clone, Default)]
pub struct CardForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

impl CardForm {
    pub fn into_patch(self) -> CardPatch {
        fn clearable(value: Option<String>) -> Option<Option<String>> {
            value.map(|v| {
                let v = v.trim().to_string();
                (!v.is_empty()).then_some(v)
            })
        }
        CardPatch {
            title: self.title.map(|t| t.trim().to_string()),
            description: clearable(self.description),
            due_date: clearable(self.due_date),
        }
    }
}

pub struct CardScreen {
    client: ApiClient,
    viewer: User,
    detail: CardWithDetails,
    card_panel: EntityPanel<CardEntity>,
    comment_panel: EntityPanel<CommentEntity>,
}

impl CardScreen {
    /// Load a card for `viewer`; failure redirects to the dashboard.
    pub async fn open(
        client: ApiClient,
        viewer: User,
        card_id: i64,
        confirm: Arc<dyn Confirm>,
    ) -> Loaded<Self> {
        match client.cards().get(card_id).await {
            Ok(detail) => Loaded::Ready(Self {
                card_panel: EntityPanel::new(CardEntity, client.clone(), Arc::clone(&confirm)),
                comment_panel: EntityPanel::new(CommentEntity, client.clone(), confirm),
                client,
                viewer,
                detail,
            }),
            Err(e) => {
                tracing::warn!(card_id, error = %e, "failed to load card");
                Loaded::Redirect(Route::Dashboard)
            }
        }
    }

    pub fn detail(&self) -> &CardWithDetails {
        &self.detail
    }

    pub fn card_id(&self) -> i64 {
        self.detail.card.id
    }

    pub fn viewer(&self) -> &User {
        &self.viewer
    }

    /// Only a comment's author may edit or delete it.
    pub fn can_modify(&self, comment: &CommentWithUser) -> bool {
        comment.comment.user_id == self.viewer.id
    }

    pub fn comment(&self, comment_id: i64) -> Option<&CommentWithUser> {
        self.detail.comments.iter().find(|c| c.comment.id == comment_id)
    }

    pub async fn reload(&mut self) -> Result<(), ClientError> {
        match self.client.cards().get(self.card_id()).await {
            Ok(detail) => {
                self.detail = detail;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(card_id = self.card_id(), error = %e, "card reload failed");
                Err(e)
            }
        }
    }

    async fn reload_after<T>(&mut self, outcome: Outcome<T>) -> Outcome<T> {
        if outcome.is_done() {
            let _ = self.reload().await;
        }
        outcome
    }

    pub async fn save(&mut self, form: CardForm) -> Outcome<()> {
        let outcome = self
            .card_panel
            .save(self.card_id(), &form.into_patch())
            .await
            .map_done(|_| ());
        self.reload_after(outcome).await
    }

    /// Delete the card. On success the caller should navigate away.
    pub async fn delete(&mut self) -> Outcome<Route> {
        self.card_panel
            .delete(self.card_id())
            .await
            .map_done(|()| Route::Dashboard)
    }

    pub async fn add_comment(&mut self, content: &str) -> Outcome<()> {
        let draft = NewComment {
            card_id: self.card_id(),
            content: content.to_string(),
        };
        let outcome = self.comment_panel.create(&draft).await.map_done(|_| ());
        self.reload_after(outcome).await
    }

    pub async fn edit_comment(&mut self, comment_id: i64, content: &str) -> Outcome<()> {
        if let Some(refused) = self.refuse_foreign_comment(comment_id) {
            return refused;
        }
        let outcome = self
            .comment_panel
            .save(comment_id, &content.to_string())
            .await
            .map_done(|_| ());
        self.reload_after(outcome).await
    }

    pub async fn delete_comment(&mut self, comment_id: i64) -> Outcome<()> {
        if let Some(refused) = self.refuse_foreign_comment(comment_id) {
            return refused;
        }
        let outcome = self.comment_panel.delete(comment_id).await;
        self.reload_after(outcome).await
    }

    /// Replace the assignee set with `selected` user ids.
    pub async fn assign(&mut self, selected: &[i64]) -> Outcome<()> {
        let diff = AssigneeDiff::between(&self.detail.assignees, selected);
        if diff.is_empty() {
            return Outcome::Skipped;
        }
        let outcome = self
            .card_panel
            .run("assign", apply_assignee_selection(&self.client, self.card_id(), &diff))
            .await;
        // Partial progress is possible, so reload even after a failure.
        let _ = self.reload().await;
        outcome
    }

    fn refuse_foreign_comment(&self, comment_id: i64) -> Option<Outcome<()>> {
        match self.comment(comment_id) {
            None => Some(Outcome::Invalid(format!(
                "Comment {} is not on this card",
                comment_id
            ))),
            Some(comment) if !self.can_modify(comment) => {
                tracing::debug!(comment_id, "not the author; edit/delete skipped");
                Some(Outcome::Skipped)
            }
            Some(_) => None,
        }
    }
}
