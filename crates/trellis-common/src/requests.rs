//! Request bodies sent to the board API.
//!
//! Update bodies leave unset fields out of the JSON entirely so the backend
//! only touches what was supplied. A doubly-wrapped `Option` distinguishes
//! "leave alone" (`None`) from "clear" (`Some(None)`, sent as `null`).

use serde::Serialize;

use crate::models::{Card, MemberRole};

pub const DEFAULT_BOARD_COLOR: &str = "#0079bf";

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBoard {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub background_color: String,
}

impl NewBoard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            background_color: DEFAULT_BOARD_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BoardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewList {
    pub board_id: i64,
    pub title: String,
    pub position: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCard {
    pub list_id: i64,
    pub title: String,
    pub position: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Card fields that can change without affecting ordering or the parent list.
///
/// Used both as the `PUT /cards/{id}` body and as the local patch applied to
/// the board tree after that call succeeds. Position and list moves go
/// through [`CardMove`] instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<String>>,
}

impl CardPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due_date.is_none()
    }

    /// Shallow-merge the supplied fields into `card`.
    pub fn apply_to(&self, card: &mut Card) {
        if let Some(title) = &self.title {
            card.title = title.clone();
        }
        if let Some(description) = &self.description {
            card.description = description.clone();
        }
        if let Some(due_date) = &self.due_date {
            card.due_date = due_date.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardMove {
    pub list_id: i64,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub card_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentUpdate {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberInvite {
    pub email: String,
    pub role: MemberRole,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoleUpdate {
    pub role: MemberRole,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AssignRequest {
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewInvite {
    pub board_id: i64,
    pub email: String,
}
