use trellis_common::{BoardMember, MemberInvite, MemberRole, MemberWithUser, MessageResponse, RoleUpdate};

use super::ApiClient;
use crate::errors::ClientError;

pub struct MembersApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl MembersApi<'_> {
    pub async fn for_board(&self, board_id: i64) -> Result<Vec<MemberWithUser>, ClientError> {
        self.client.get(&format!("/boards/{}/members", board_id)).await
    }

    pub async fn invite(
        &self,
        board_id: i64,
        invite: &MemberInvite,
    ) -> Result<BoardMember, ClientError> {
        self.client
            .post(&format!("/boards/{}/members", board_id), invite)
            .await
    }

    pub async fn update_role(&self, member_id: i64, role: MemberRole) -> Result<BoardMember, ClientError> {
        self.client
            .put(&format!("/members/{}", member_id), &RoleUpdate { role })
            .await
    }

    pub async fn remove(&self, member_id: i64) -> Result<MessageResponse, ClientError> {
        self.client.delete(&format!("/members/{}", member_id)).await
    }
}
