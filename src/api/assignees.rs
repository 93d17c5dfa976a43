use trellis_common::{AssignRequest, CardAssignee, MessageResponse};

use super::ApiClient;
use crate::errors::ClientError;

pub struct AssigneesApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl AssigneesApi<'_> {
    pub async fn assign(&self, card_id: i64, user_id: i64) -> Result<CardAssignee, ClientError> {
        self.client
            .post(&format!("/cards/{}/assignees", card_id), &AssignRequest { user_id })
            .await
    }

    pub async fn remove(&self, assignee_id: i64) -> Result<MessageResponse, ClientError> {
        self.client.delete(&format!("/assignees/{}", assignee_id)).await
    }
}
