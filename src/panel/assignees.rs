//! Assignee selection editor.
//!
//! The user picks a set of board members; the editor works out which
//! assignee rows to drop and which users to add, then applies removals
//! before additions, one request at a time.

use std::collections::BTreeSet;

use trellis_common::AssigneeWithUser;

use crate::api::ApiClient;
use crate::errors::ClientError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssigneeDiff {
    /// Assignee row ids to delete.
    pub remove: Vec<i64>,
    /// User ids to assign.
    pub add: Vec<i64>,
}

impl AssigneeDiff {
    pub fn between(current: &[AssigneeWithUser], selected: &[i64]) -> Self {
        let selected: BTreeSet<i64> = selected.iter().copied().collect();
        let assigned: BTreeSet<i64> = current.iter().map(|a| a.assignee.user_id).collect();

        let remove = current
            .iter()
            .filter(|a| !selected.contains(&a.assignee.user_id))
            .map(|a| a.assignee.id)
            .collect();
        let add = selected.difference(&assigned).copied().collect();

        Self { remove, add }
    }

    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }
}

/// Apply `diff` to `card_id`. Stops at the first failed request; whatever
/// already succeeded stays applied on the backend.
pub async fn apply_assignee_selection(
    client: &ApiClient,
    card_id: i64,
    diff: &AssigneeDiff,
) -> Result<(), ClientError> {
    for assignee_id in &diff.remove {
        client.assignees().remove(*assignee_id).await?;
        tracing::debug!(card_id, assignee_id, "unassigned");
    }
    for user_id in &diff.add {
        client.assignees().assign(card_id, *user_id).await?;
        tracing::debug!(card_id, user_id, "assigned");
    }
    Ok(())
}
