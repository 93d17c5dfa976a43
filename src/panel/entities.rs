//! [`EditableEntity`] implementations, one per mutable resource.

use async_trait::async_trait;
use chrono::NaiveDate;
use trellis_common::{
    Board, BoardMember, BoardUpdate, Card, CardPatch, Comment, List, ListUpdate, MemberInvite,
    MemberRole, NewBoard, NewCard, NewComment, NewList,
};

use super::{Check, EditableEntity};
use crate::api::ApiClient;
use crate::errors::ClientError;

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn is_calendar_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

pub struct BoardEntity;

#[async_trait]
impl EditableEntity for BoardEntity {
    type Id = i64;
    type Draft = NewBoard;
    type Changes = BoardUpdate;
    type Saved = Board;

    fn kind(&self) -> &'static str {
        "board"
    }

    fn check_create(&self, draft: &NewBoard) -> Check {
        if blank(&draft.title) {
            Check::Invalid("Board title is required".into())
        } else {
            Check::Proceed
        }
    }

    fn check_save(&self, changes: &BoardUpdate) -> Check {
        match &changes.title {
            Some(title) if blank(title) => Check::Invalid("Board title is required".into()),
            _ if changes.title.is_none()
                && changes.description.is_none()
                && changes.background_color.is_none() =>
            {
                Check::Skip
            }
            _ => Check::Proceed,
        }
    }

    fn delete_prompt(&self, _id: i64) -> String {
        "Delete this board? All of its lists and cards will be removed.".into()
    }

    async fn create(&self, client: &ApiClient, draft: &NewBoard) -> Result<Board, ClientError> {
        client.boards().create(draft).await
    }

    async fn save(
        &self,
        client: &ApiClient,
        id: i64,
        changes: &BoardUpdate,
    ) -> Result<Board, ClientError> {
        client.boards().update(id, changes).await
    }

    async fn delete(&self, client: &ApiClient, id: i64) -> Result<(), ClientError> {
        client.boards().delete(id).await.map(|_| ())
    }
}

/// A rename request; skipped when the new title is blank or unchanged.
#[derive(Debug, Clone)]
pub struct Rename {
    pub current: String,
    pub title: String,
}

pub struct ListEntity;

#[async_trait]
impl EditableEntity for ListEntity {
    type Id = i64;
    type Draft = NewList;
    type Changes = Rename;
    type Saved = List;

    fn kind(&self) -> &'static str {
        "list"
    }

    fn check_create(&self, draft: &NewList) -> Check {
        if blank(&draft.title) {
            Check::Skip
        } else {
            Check::Proceed
        }
    }

    fn check_save(&self, rename: &Rename) -> Check {
        let title = rename.title.trim();
        if title.is_empty() || title == rename.current {
            Check::Skip
        } else {
            Check::Proceed
        }
    }

    fn delete_prompt(&self, _id: i64) -> String {
        "Delete this list and all its cards?".into()
    }

    async fn create(&self, client: &ApiClient, draft: &NewList) -> Result<List, ClientError> {
        let draft = NewList {
            title: draft.title.trim().to_string(),
            ..draft.clone()
        };
        client.lists().create(&draft).await
    }

    async fn save(&self, client: &ApiClient, id: i64, rename: &Rename) -> Result<List, ClientError> {
        let changes = ListUpdate {
            title: Some(rename.title.trim().to_string()),
            position: None,
        };
        client.lists().update(id, &changes).await
    }

    async fn delete(&self, client: &ApiClient, id: i64) -> Result<(), ClientError> {
        client.lists().delete(id).await.map(|_| ())
    }
}

pub struct CardEntity;

#[async_trait]
impl EditableEntity for CardEntity {
    type Id = i64;
    type Draft = NewCard;
    type Changes = CardPatch;
    type Saved = Card;

    fn kind(&self) -> &'static str {
        "card"
    }

    fn check_create(&self, draft: &NewCard) -> Check {
        if blank(&draft.title) {
            Check::Skip
        } else {
            Check::Proceed
        }
    }

    fn check_save(&self, patch: &CardPatch) -> Check {
        match &patch.title {
            Some(title) if blank(title) => Check::Invalid("Card title cannot be empty".into()),
            _ if patch.is_empty() => Check::Skip,
            _ if matches!(&patch.due_date, Some(Some(due)) if !is_calendar_date(due)) => {
                Check::Invalid("Due date must be YYYY-MM-DD".into())
            }
            _ => Check::Proceed,
        }
    }

    fn delete_prompt(&self, _id: i64) -> String {
        "Delete this card?".into()
    }

    async fn create(&self, client: &ApiClient, draft: &NewCard) -> Result<Card, ClientError> {
        let draft = NewCard {
            title: draft.title.trim().to_string(),
            ..draft.clone()
        };
        client.cards().create(&draft).await
    }

    async fn save(&self, client: &ApiClient, id: i64, patch: &CardPatch) -> Result<Card, ClientError> {
        client.cards().update(id, patch).await
    }

    async fn delete(&self, client: &ApiClient, id: i64) -> Result<(), ClientError> {
        client.cards().delete(id).await.map(|_| ())
    }
}

pub struct CommentEntity;

#[async_trait]
impl EditableEntity for CommentEntity {
    type Id = i64;
    type Draft = NewComment;
    type Changes = String;
    type Saved = Comment;

    fn kind(&self) -> &'static str {
        "comment"
    }

    fn check_create(&self, draft: &NewComment) -> Check {
        if blank(&draft.content) {
            Check::Skip
        } else {
            Check::Proceed
        }
    }

    fn check_save(&self, content: &String) -> Check {
        if blank(content) {
            Check::Skip
        } else {
            Check::Proceed
        }
    }

    fn delete_prompt(&self, _id: i64) -> String {
        "Delete this comment?".into()
    }

    async fn create(&self, client: &ApiClient, draft: &NewComment) -> Result<Comment, ClientError> {
        let draft = NewComment {
            card_id: draft.card_id,
            content: draft.content.trim().to_string(),
        };
        client.comments().create(&draft).await
    }

    async fn save(&self, client: &ApiClient, id: i64, content: &String) -> Result<Comment, ClientError> {
        client.comments().update(id, content.trim()).await
    }

    async fn delete(&self, client: &ApiClient, id: i64) -> Result<(), ClientError> {
        client.comments().delete(id).await.map(|_| ())
    }
}

/// Membership rows of one board. Creating a member means inviting by email.
pub struct MemberEntity {
    pub board_id: i64,
}

#[async_trait]
impl EditableEntity for MemberEntity {
    type Id = i64;
    type Draft = MemberInvite;
    type Changes = MemberRole;
    type Saved = BoardMember;

    fn kind(&self) -> &'static str {
        "member"
    }

    fn check_create(&self, draft: &MemberInvite) -> Check {
        if blank(&draft.email) {
            Check::Invalid("Email is required".into())
        } else {
            Check::Proceed
        }
    }

    fn delete_prompt(&self, _id: i64) -> String {
        "Remove this member from the board?".into()
    }

    async fn create(
        &self,
        client: &ApiClient,
        draft: &MemberInvite,
    ) -> Result<BoardMember, ClientError> {
        let draft = MemberInvite {
            email: draft.email.trim().to_string(),
            role: draft.role,
        };
        client.members().invite(self.board_id, &draft).await
    }

    async fn save(
        &self,
        client: &ApiClient,
        id: i64,
        role: &MemberRole,
    ) -> Result<BoardMember, ClientError> {
        client.members().update_role(id, *role).await
    }

    async fn delete(&self, client: &ApiClient, id: i64) -> Result<(), ClientError> {
        client.members().remove(id).await.map(|_| ())
    }
}
