//! In-memory aggregate of an open board.
//!
//! The tree is a cache. Every full reload replaces it wholesale with the
//! backend's view, and the only local edit it supports is a shallow card
//! patch for fields that cannot affect ordering or list membership.

use trellis_common::{BoardWithMembers, Card, CardPatch, ListWithCards};

/// How to bring the tree in line with the backend after a mutation.
#[derive(Debug, Clone)]
pub enum Reconcile {
    /// Authoritative: swap in a freshly loaded tree.
    ReplaceAll(BoardTree),
    /// Optimistic: merge fields into one card, with no network call.
    /// Only valid after the backend accepted the same fields.
    PatchOne { card_id: i64, fields: CardPatch },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardTree {
    pub board: BoardWithMembers,
    /// In backend order. Never re-sorted here.
    pub lists: Vec<ListWithCards>,
}

impl BoardTree {
    pub fn new(board: BoardWithMembers, lists: Vec<ListWithCards>) -> Self {
        Self { board, lists }
    }

    pub fn board_id(&self) -> i64 {
        self.board.board.id
    }

    pub fn list(&self, list_id: i64) -> Option<&ListWithCards> {
        self.lists.iter().find(|l| l.list.id == list_id)
    }

    pub fn card(&self, card_id: i64) -> Option<&Card> {
        self.lists
            .iter()
            .flat_map(|l| l.cards.iter())
            .find(|c| c.id == card_id)
    }

    /// The list that currently holds `card_id`.
    pub fn list_of(&self, card_id: i64) -> Option<&ListWithCards> {
        self.lists
            .iter()
            .find(|l| l.cards.iter().any(|c| c.id == card_id))
    }

    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|l| l.cards.len()).sum()
    }

    /// Position for a list appended at the right edge.
    pub fn next_list_position(&self) -> i32 {
        self.lists.len() as i32
    }

    /// Position for a card appended at the bottom of `list_id`.
    pub fn next_card_position(&self, list_id: i64) -> Option<i32> {
        self.list(list_id).map(|l| l.cards.len() as i32)
    }

    /// Shallow-merge `fields` into the card with `card_id`.
    ///
    /// Returns false when no such card is loaded, in which case nothing changes.
    pub fn patch(&mut self, card_id: i64, fields: &CardPatch) -> bool {
        let card = self
            .lists
            .iter_mut()
            .flat_map(|l| l.cards.iter_mut())
            .find(|c| c.id == card_id);
        match card {
            Some(card) => {
                fields.apply_to(card);
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, reconcile: Reconcile) {
        match reconcile {
            Reconcile::ReplaceAll(tree) => *self = tree,
            Reconcile::PatchOne { card_id, fields } => {
                if !self.patch(card_id, &fields) {
                    tracing::debug!(card_id, "patched card is not in the loaded tree");
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use trellis_common::{Board, BoardWithMembers, Card, List, ListWithCards};

    use super::BoardTree;

    pub fn card(id: i64, list_id: i64, title: &str, position: i32) -> Card {
        Card {
            id,
            list_id,
            title: title.to_string(),
            description: None,
            position,
            due_date: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    pub fn list(id: i64, title: &str, position: i32, cards: Vec<Card>) -> ListWithCards {
        ListWithCards {
            list: List {
                id,
                board_id: 1,
                title: title.to_string(),
                position,
                created_at: String::new(),
                updated_at: String::new(),
            },
            cards,
        }
    }

    pub fn board(title: &str) -> BoardWithMembers {
        BoardWithMembers {
            board: Board {
                id: 1,
                title: title.to_string(),
                description: None,
                background_color: "#0079bf".to_string(),
                owner_id: 1,
                created_at: String::new(),
                updated_at: String::new(),
            },
            members: Vec::new(),
        }
    }

    /// Two lists, three cards: Todo[a, b], Done[c].
    pub fn tree() -> BoardTree {
        BoardTree::new(
            board("Roadmap"),
            vec![
                list(10, "Todo", 0, vec![card(1, 10, "a", 0), card(2, 10, "b", 1)]),
                list(20, "Done", 1, vec![card(3, 20, "c", 0)]),
            ],
        )
    }
}
