use std::sync::Arc;

use trellis_common::{Board, NewBoard};

use crate::api::ApiClient;
use crate::panel::{BoardEntity, Confirm, EntityPanel, Outcome};

/// The signed-in user's boards.
pub struct Dashboard {
    client: ApiClient,
    boards: Vec<Board>,
    panel: EntityPanel<BoardEntity>,
}

impl Dashboard {
    pub fn new(client: ApiClient, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            panel: EntityPanel::new(BoardEntity, client.clone(), confirm),
            client,
            boards: Vec::new(),
        }
    }

    /// Fetch boards. A failed load leaves the list empty.
    pub async fn load(&mut self) {
        match self.client.boards().list().await {
            Ok(boards) => self.boards = boards,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load boards");
                self.boards.clear();
            }
        }
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Inline error from the last create/delete.
    pub fn error(&self) -> Option<String> {
        self.panel.last_error()
    }

    /// Create a board and append it locally.
    pub async fn create(&mut self, board: NewBoard) -> Outcome<Board> {
        let outcome = self.panel.create(&board).await;
        if let Outcome::Done(created) = &outcome {
            self.boards.push(created.clone());
        }
        outcome
    }

    /// Delete a board after confirmation; it leaves the list only once the
    /// backend has accepted the delete.
    pub async fn delete(&mut self, board_id: i64) -> Outcome<()> {
        let outcome = self.panel.delete(board_id).await;
        if outcome.is_done() {
            self.boards.retain(|b| b.id != board_id);
        }
        outcome
    }
}
