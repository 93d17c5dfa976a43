use std::sync::Arc;

use trellis_common::{Board, BoardUpdate, Card, CardMove, CardPatch, List, NewCard, NewList};

use super::tree::{BoardTree, Reconcile};
use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::panel::{BoardEntity, CardEntity, Confirm, EntityPanel, ListEntity, Outcome, Rename};
use crate::routes::{Loaded, Route};

/// Fetch the board (with members) and its lists (with cards) concurrently.
/// Both must succeed.
pub async fn load_tree(client: &ApiClient, board_id: i64) -> Result<BoardTree, ClientError> {
    let boards = client.boards();
    let lists = client.lists();
    let (board, lists) = tokio::try_join!(boards.get(board_id), lists.for_board(board_id))?;
    Ok(BoardTree::new(board, lists))
}

/// An open board: the aggregate tree plus the panels that mutate it.
pub struct BoardScreen {
    client: ApiClient,
    tree: BoardTree,
    board_panel: EntityPanel<BoardEntity>,
    list_panel: EntityPanel<ListEntity>,
    card_panel: EntityPanel<CardEntity>,
}

impl BoardScreen {
    /// Load the board; any failure redirects to the dashboard.
    pub async fn open(client: ApiClient, board_id: i64, confirm: Arc<dyn Confirm>) -> Loaded<Self> {
        match load_tree(&client, board_id).await {
            Ok(tree) => Loaded::Ready(Self::with_tree(client, tree, confirm)),
            Err(e) => {
                tracing::warn!(board_id, error = %e, "failed to load board");
                Loaded::Redirect(Route::Dashboard)
            }
        }
    }

    pub fn with_tree(client: ApiClient, tree: BoardTree, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            board_panel: EntityPanel::new(BoardEntity, client.clone(), Arc::clone(&confirm)),
            list_panel: EntityPanel::new(ListEntity, client.clone(), Arc::clone(&confirm)),
            card_panel: EntityPanel::new(CardEntity, client.clone(), confirm),
            client,
            tree,
        }
    }

    pub fn tree(&self) -> &BoardTree {
        &self.tree
    }

    pub fn board_id(&self) -> i64 {
        self.tree.board_id()
    }

    pub fn reconcile(&mut self, reconcile: Reconcile) {
        self.tree.apply(reconcile);
    }

    /// Replace the whole tree with a fresh load. On failure the current tree
    /// stays as it is.
    pub async fn reload(&mut self) -> Result<(), ClientError> {
        match load_tree(&self.client, self.board_id()).await {
            Ok(tree) => {
                self.reconcile(Reconcile::ReplaceAll(tree));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(board_id = self.board_id(), error = %e, "board reload failed");
                Err(e)
            }
        }
    }

    async fn reload_after<T>(&mut self, outcome: Outcome<T>) -> Outcome<T> {
        if outcome.is_done() {
            // The mutation already landed; a failed refresh only leaves the view stale.
            let _ = self.reload().await;
        }
        outcome
    }

    pub async fn update_board(&mut self, changes: BoardUpdate) -> Outcome<Board> {
        let outcome = self.board_panel.save(self.board_id(), &changes).await;
        self.reload_after(outcome).await
    }

    /// Delete the open board. On success the caller should navigate to
    /// [`Route::Dashboard`].
    pub async fn delete_board(&mut self) -> Outcome<Route> {
        self.board_panel
            .delete(self.board_id())
            .await
            .map_done(|()| Route::Dashboard)
    }

    pub async fn add_list(&mut self, title: &str) -> Outcome<List> {
        let draft = NewList {
            board_id: self.board_id(),
            title: title.to_string(),
            position: self.tree.next_list_position(),
        };
        let outcome = self.list_panel.create(&draft).await;
        self.reload_after(outcome).await
    }

    pub async fn rename_list(&mut self, list_id: i64, title: &str) -> Outcome<List> {
        let Some(current) = self.tree.list(list_id).map(|l| l.list.title.clone()) else {
            return Outcome::Invalid(format!("List {} is not on this board", list_id));
        };
        let rename = Rename {
            current,
            title: title.to_string(),
        };
        let outcome = self.list_panel.save(list_id, &rename).await;
        self.reload_after(outcome).await
    }

    pub async fn delete_list(&mut self, list_id: i64) -> Outcome<()> {
        let outcome = self.list_panel.delete(list_id).await;
        self.reload_after(outcome).await
    }

    pub async fn add_card(
        &mut self,
        list_id: i64,
        title: &str,
        description: Option<String>,
    ) -> Outcome<Card> {
        let Some(position) = self.tree.next_card_position(list_id) else {
            return Outcome::Invalid(format!("List {} is not on this board", list_id));
        };
        let draft = NewCard {
            list_id,
            title: title.to_string(),
            position,
            description: description.filter(|d| !d.trim().is_empty()),
        };
        let outcome = self.card_panel.create(&draft).await;
        self.reload_after(outcome).await
    }

    /// Save card fields, then patch them into the tree without a reload.
    pub async fn edit_card(&mut self, card_id: i64, fields: CardPatch) -> Outcome<Card> {
        let outcome = self.card_panel.save(card_id, &fields).await;
        if outcome.is_done() {
            self.reconcile(Reconcile::PatchOne { card_id, fields });
        }
        outcome
    }

    /// Move a card to `list_id`. Without an explicit position the card goes
    /// to the bottom of the target list.
    pub async fn move_card(
        &mut self,
        card_id: i64,
        list_id: i64,
        position: Option<i32>,
    ) -> Outcome<Card> {
        let Some(list) = self.tree.list(list_id) else {
            return Outcome::Invalid(format!("List {} is not on this board", list_id));
        };
        let position = position
            .unwrap_or_else(|| list.cards.iter().filter(|c| c.id != card_id).count() as i32);
        let target = CardMove { list_id, position };
        let outcome = self
            .card_panel
            .run("move", self.client.cards().move_to(card_id, target))
            .await;
        self.reload_after(outcome).await
    }

    pub async fn delete_card(&mut self, card_id: i64) -> Outcome<()> {
        let outcome = self.card_panel.delete(card_id).await;
        self.reload_after(outcome).await
    }
}
