use trellis_common::{List, ListUpdate, ListWithCards, MessageResponse, NewList};

use super::ApiClient;
use crate::errors::ClientError;

pub struct ListsApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl ListsApi<'_> {
    /// Lists of a board, each pre-populated with its cards, in backend order.
    pub async fn for_board(&self, board_id: i64) -> Result<Vec<ListWithCards>, ClientError> {
        self.client.get(&format!("/boards/{}/lists", board_id)).await
    }

    pub async fn create(&self, list: &NewList) -> Result<List, ClientError> {
        self.client.post("/lists", list).await
    }

    pub async fn update(&self, id: i64, changes: &ListUpdate) -> Result<List, ClientError> {
        self.client.put(&format!("/lists/{}", id), changes).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse, ClientError> {
        self.client.delete(&format!("/lists/{}", id)).await
    }
}
