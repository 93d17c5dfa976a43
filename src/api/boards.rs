use trellis_common::{Board, BoardUpdate, BoardWithMembers, MessageResponse, NewBoard};

use super::ApiClient;
use crate::errors::ClientError;

pub struct BoardsApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl BoardsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Board>, ClientError> {
        self.client.get("/boards").await
    }

    /// A single board together with its members.
    pub async fn get(&self, id: i64) -> Result<BoardWithMembers, ClientError> {
        self.client.get(&format!("/boards/{}", id)).await
    }

    pub async fn create(&self, board: &NewBoard) -> Result<Board, ClientError> {
        self.client.post("/boards", board).await
    }

    pub async fn update(&self, id: i64, changes: &BoardUpdate) -> Result<Board, ClientError> {
        self.client.put(&format!("/boards/{}", id), changes).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse, ClientError> {
        self.client.delete(&format!("/boards/{}", id)).await
    }
}
