//! Board membership and email invites.

use std::sync::Arc;

use trellis_common::{BoardMember, Invite, MemberInvite, MemberRole, MemberWithUser, NewInvite, User};

use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::panel::{Confirm, EntityPanel, MemberEntity, Outcome};

pub struct MembersScreen {
    client: ApiClient,
    board_id: i64,
    viewer: User,
    members: Vec<MemberWithUser>,
    panel: EntityPanel<MemberEntity>,
}

impl MembersScreen {
    pub fn new(client: ApiClient, board_id: i64, viewer: User, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            panel: EntityPanel::new(MemberEntity { board_id }, client.clone(), confirm),
            client,
            board_id,
            viewer,
            members: Vec::new(),
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        match self.client.members().for_board(self.board_id).await {
            Ok(members) => {
                self.members = members;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(board_id = self.board_id, error = %e, "failed to load members");
                Err(e)
            }
        }
    }

    pub fn members(&self) -> &[MemberWithUser] {
        &self.members
    }

    pub fn error(&self) -> Option<String> {
        self.panel.last_error()
    }

    /// The viewer's own role on this board, if they are a member.
    pub fn viewer_role(&self) -> Option<MemberRole> {
        self.members
            .iter()
            .find(|m| m.member.user_id == self.viewer.id)
            .map(|m| m.member.role)
    }

    pub fn can_manage(&self) -> bool {
        self.viewer_role().is_some_and(|r| r.can_manage_members())
    }

    /// Whether the viewer may re-role or remove `member`. Never oneself.
    pub fn can_manage_member(&self, member: &MemberWithUser) -> bool {
        self.can_manage() && member.member.user_id != self.viewer.id
    }

    pub async fn invite(&mut self, email: &str, role: MemberRole) -> Outcome<BoardMember> {
        if !self.can_manage() {
            return self.panel.reject("Only admins can invite members");
        }
        if role == MemberRole::Owner {
            return self.panel.reject("Members can be invited as member or admin");
        }
        let draft = MemberInvite {
            email: email.to_string(),
            role,
        };
        let outcome = self.panel.create(&draft).await;
        self.reload_after(outcome).await
    }

    pub async fn change_role(&mut self, member_id: i64, role: MemberRole) -> Outcome<BoardMember> {
        if let Some(refused) = self.refuse(member_id) {
            return refused;
        }
        let outcome = self.panel.save(member_id, &role).await;
        self.reload_after(outcome).await
    }

    pub async fn remove(&mut self, member_id: i64) -> Outcome<()> {
        if let Some(refused) = self.refuse(member_id) {
            return refused;
        }
        let outcome = self.panel.delete(member_id).await;
        self.reload_after(outcome).await
    }

    async fn reload_after<T>(&mut self, outcome: Outcome<T>) -> Outcome<T> {
        if outcome.is_done() {
            let _ = self.load().await;
        }
        outcome
    }

    fn refuse<T>(&self, member_id: i64) -> Option<Outcome<T>> {
        let Some(member) = self.members.iter().find(|m| m.member.id == member_id) else {
            return Some(
                self.panel
                    .reject(format!("Member {} is not on this board", member_id)),
            );
        };
        if member.member.user_id == self.viewer.id {
            return Some(self.panel.reject("You cannot change your own membership"));
        }
        if !self.can_manage_member(member) {
            return Some(self.panel.reject("Only admins can manage members"));
        }
        None
    }
}

/// Email invites for one board. Invites are never edited or deleted from
/// the client, so this does not go through an [`EntityPanel`].
pub struct InvitesScreen {
    client: ApiClient,
    board_id: i64,
    invites: Vec<Invite>,
    error: Option<String>,
}

impl InvitesScreen {
    pub fn new(client: ApiClient, board_id: i64) -> Self {
        Self {
            client,
            board_id,
            invites: Vec::new(),
            error: None,
        }
    }

    pub fn invites(&self) -> &[Invite] {
        &self.invites
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.invites = self.client.invites().for_board(self.board_id).await?;
        Ok(())
    }

    pub async fn create(&mut self, email: &str) -> Outcome<Invite> {
        let email = email.trim();
        if email.is_empty() {
            self.error = Some("Email is required".into());
            return Outcome::Invalid("Email is required".into());
        }
        let request = NewInvite {
            board_id: self.board_id,
            email: email.to_string(),
        };
        match self.client.invites().create(&request).await {
            Ok(invite) => {
                self.error = None;
                self.invites.push(invite.clone());
                Outcome::Done(invite)
            }
            Err(e) => {
                tracing::warn!(board_id = self.board_id, error = %e, "invite failed");
                self.error = Some(e.message().to_string());
                Outcome::Failed(e.message().to_string())
            }
        }
    }
}

/// Accept an invite by its token on behalf of the signed-in user.
pub async fn accept_invite(client: &ApiClient, token: &str) -> Result<String, ClientError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ClientError::request_failed("Invite token is required", None));
    }
    let response = client.invites().accept(token).await?;
    tracing::info!("invite accepted");
    Ok(response.message)
}
