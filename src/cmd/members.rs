//! Membership and invite commands: `trellis member ...`, `trellis invite ...`.

use anyhow::{Result, bail};
use console::style;
use trellis::screens::{InvitesScreen, MembersScreen, accept_invite};
use trellis::ui::render::{render_invites, render_members};
use trellis::ui::with_spinner;

use super::super::{InviteCommands, MemberCommands};
use super::{Context, report};

pub async fn cmd_member(ctx: &Context, command: MemberCommands) -> Result<()> {
    let (session, user) = ctx.require_user().await?;
    let board_id = match &command {
        MemberCommands::List { board }
        | MemberCommands::Invite { board, .. }
        | MemberCommands::Role { board, .. }
        | MemberCommands::Remove { board, .. } => *board,
    };
    let viewer_id = user.id;
    let mut screen = MembersScreen::new(session.client().clone(), board_id, user, ctx.confirm());
    with_spinner("Loading members...", screen.load()).await?;

    let changed = match command {
        MemberCommands::List { .. } => false,
        MemberCommands::Invite { email, role, .. } => {
            report(screen.invite(&email, role).await, "Member added")?.is_some()
        }
        MemberCommands::Role { member, role, .. } => {
            report(screen.change_role(member, role).await, "Role updated")?.is_some()
        }
        MemberCommands::Remove { member, .. } => {
            report(screen.remove(member).await, "Member removed")?.is_some()
        }
    };

    println!("{}", render_members(screen.members(), viewer_id));
    if changed && !screen.can_manage() {
        println!("{}", style("You no longer manage this board.").dim());
    }
    Ok(())
}

pub async fn cmd_invite(ctx: &Context, command: InviteCommands) -> Result<()> {
    let (session, _user) = ctx.require_user().await?;
    let client = session.client().clone();

    match command {
        InviteCommands::Create { board, email } => {
            let mut screen = InvitesScreen::new(client, board);
            if let Some(invite) = report(screen.create(&email).await, "Invite sent")? {
                println!("Token: {}", invite.token);
            }
        }
        InviteCommands::Accept { token } => match accept_invite(&client, &token).await {
            Ok(message) if !message.is_empty() => println!("{}", message),
            Ok(_) => println!("Invite accepted."),
            Err(e) => bail!(e),
        },
        InviteCommands::List { board } => {
            let mut screen = InvitesScreen::new(client, board);
            with_spinner("Loading invites...", screen.load()).await?;
            println!("{}", render_invites(screen.invites()));
        }
    }
    Ok(())
}
