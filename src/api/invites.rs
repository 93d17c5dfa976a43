use trellis_common::{Invite, MessageResponse, NewInvite};

use super::ApiClient;
use crate::errors::ClientError;

pub struct InvitesApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl InvitesApi<'_> {
    pub async fn create(&self, invite: &NewInvite) -> Result<Invite, ClientError> {
        self.client.post("/invites", invite).await
    }

    /// Accept a single-use invite token. Validity and expiry are checked server-side.
    /// The token is sent as one escaped path segment.
    pub async fn accept(&self, token: &str) -> Result<MessageResponse, ClientError> {
        if matches!(token, "" | "." | "..") {
            return Err(ClientError::request_failed("Invalid invite token", None));
        }
        let url = self.client.segment_url(&["invites", token, "accept"])?;
        self.client.post_empty_at(url).await
    }

    pub async fn for_board(&self, board_id: i64) -> Result<Vec<Invite>, ClientError> {
        self.client.get(&format!("/boards/{}/invites", board_id)).await
    }
}
