use trellis_common::{Card, CardMove, CardPatch, CardWithDetails, MessageResponse, NewCard};

use super::ApiClient;
use crate::errors::ClientError;

pub struct CardsApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl CardsApi<'_> {
    pub async fn get(&self, id: i64) -> Result<CardWithDetails, ClientError> {
        self.client.get(&format!("/cards/{}", id)).await
    }

    pub async fn create(&self, card: &NewCard) -> Result<Card, ClientError> {
        self.client.post("/cards", card).await
    }

    pub async fn update(&self, id: i64, patch: &CardPatch) -> Result<Card, ClientError> {
        self.client.put(&format!("/cards/{}", id), patch).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse, ClientError> {
        self.client.delete(&format!("/cards/{}", id)).await
    }

    /// Ask the backend to move a card; sibling positions are its business.
    pub async fn move_to(&self, id: i64, target: CardMove) -> Result<Card, ClientError> {
        self.client.put(&format!("/cards/{}/move", id), &target).await
    }
}
