use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl User {
    /// Name shown next to avatars: the full name when set, the username otherwise.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }

    /// Two-letter avatar fallback built from the full name or the username.
    pub fn initials(&self) -> String {
        if let Some(name) = self.full_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name
                .split_whitespace()
                .filter_map(|part| part.chars().next())
                .collect::<String>()
                .to_uppercase();
        }
        self.username.chars().take(2).collect::<String>().to_uppercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Board {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub background_color: String,
    pub owner_id: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Owners and admins may invite, re-role and remove other members.
    pub fn can_manage_members(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(format!("Invalid member role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardMember {
    pub id: i64,
    pub board_id: i64,
    pub user_id: i64,
    pub role: MemberRole,
    #[serde(default)]
    pub joined_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberWithUser {
    #[serde(flatten)]
    pub member: BoardMember,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct List {
    pub id: i64,
    pub board_id: i64,
    pub title: String,
    pub position: i32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub id: i64,
    pub list_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub position: i32,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Card {
    /// Calendar day of the due date. The backend sends either `YYYY-MM-DD`
    /// or a full ISO timestamp; only the date part matters here.
    pub fn due_day(&self) -> Option<NaiveDate> {
        let raw = self.due_date.as_deref()?;
        let day = raw.split('T').next().unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_day().is_some_and(|due| due < today)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardAssignee {
    pub id: i64,
    pub card_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub assigned_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssigneeWithUser {
    #[serde(flatten)]
    pub assignee: CardAssignee,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub card_id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentWithUser {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: User,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Expired,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InviteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "expired" => Ok(Self::Expired),
            _ => Err(format!("Invalid invite status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invite {
    pub id: i64,
    pub board_id: i64,
    pub email: String,
    pub token: String,
    #[serde(default)]
    pub invited_by: Option<i64>,
    pub status: InviteStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub expires_at: String,
}

// API view types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardWithMembers {
    #[serde(flatten)]
    pub board: Board,
    #[serde(default)]
    pub members: Vec<MemberWithUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListWithCards {
    #[serde(flatten)]
    pub list: List,
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardWithDetails {
    #[serde(flatten)]
    pub card: Card,
    #[serde(default)]
    pub assignees: Vec<AssigneeWithUser>,
    #[serde(default)]
    pub comments: Vec<CommentWithUser>,
}

/// Body returned by signup and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(default)]
    pub token: Option<String>,
}

/// Acknowledgement body returned by deletes and logout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
