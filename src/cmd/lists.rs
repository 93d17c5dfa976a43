//! List commands: `trellis list add|rename|delete`.

use anyhow::Result;
use trellis::board::BoardScreen;
use trellis::ui::render::{render_board, terminal_width};

use super::super::ListCommands;
use super::{Context, ready, report, today};

pub async fn cmd_list(ctx: &Context, command: ListCommands) -> Result<()> {
    let (session, _user) = ctx.require_user().await?;
    let board_id = match &command {
        ListCommands::Add { board, .. }
        | ListCommands::Rename { board, .. }
        | ListCommands::Delete { board, .. } => *board,
    };
    let mut screen = ready(
        BoardScreen::open(session.client().clone(), board_id, ctx.confirm()).await,
        "board",
    )?;

    let changed = match command {
        ListCommands::Add { title, .. } => {
            report(screen.add_list(&title).await, "List added")?.is_some()
        }
        ListCommands::Rename { list, title, .. } => {
            report(screen.rename_list(list, &title).await, "List renamed")?.is_some()
        }
        ListCommands::Delete { list, .. } => {
            report(screen.delete_list(list).await, "List deleted")?.is_some()
        }
    };

    if changed {
        println!("{}", render_board(screen.tree(), today(), terminal_width()));
    }
    Ok(())
}
