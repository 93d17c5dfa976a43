use trellis_common::{Comment, CommentUpdate, MessageResponse, NewComment};

use super::ApiClient;
use crate::errors::ClientError;

pub struct CommentsApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl CommentsApi<'_> {
    pub async fn create(&self, comment: &NewComment) -> Result<Comment, ClientError> {
        self.client.post("/comments", comment).await
    }

    pub async fn update(&self, id: i64, content: &str) -> Result<Comment, ClientError> {
        let body = CommentUpdate {
            content: content.to_string(),
        };
        self.client.put(&format!("/comments/{}", id), &body).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse, ClientError> {
        self.client.delete(&format!("/comments/{}", id)).await
    }
}
