//! Dashboard and board commands: `trellis boards`, `trellis board ...`.

use anyhow::Result;
use trellis::board::BoardScreen;
use trellis::screens::Dashboard;
use trellis::ui::render::{render_board, render_dashboard, terminal_width};
use trellis::ui::with_spinner;
use trellis_common::{BoardUpdate, DEFAULT_BOARD_COLOR, NewBoard};

use super::super::BoardCommands;
use super::{Context, ready, report, today};

pub async fn cmd_boards(ctx: &Context) -> Result<()> {
    let (session, _user) = ctx.require_user().await?;
    let mut dashboard = Dashboard::new(session.client().clone(), ctx.confirm());
    with_spinner("Loading boards...", dashboard.load()).await;
    println!("{}", render_dashboard(dashboard.boards()));
    Ok(())
}

pub async fn cmd_board(ctx: &Context, command: BoardCommands) -> Result<()> {
    let (session, _user) = ctx.require_user().await?;
    let client = session.client().clone();

    match command {
        BoardCommands::Show { id } => {
            let screen = ready(
                with_spinner("Loading board...", BoardScreen::open(client, id, ctx.confirm())).await,
                "board",
            )?;
            println!("{}", render_board(screen.tree(), today(), terminal_width()));
        }
        BoardCommands::Create {
            title,
            description,
            color,
        } => {
            let mut dashboard = Dashboard::new(client, ctx.confirm());
            let board = NewBoard {
                title,
                description: description.filter(|d| !d.trim().is_empty()),
                background_color: color.unwrap_or_else(|| DEFAULT_BOARD_COLOR.to_string()),
            };
            if let Some(board) = report(dashboard.create(board).await, "Board created")? {
                println!("#{} {}", board.id, board.title);
            }
        }
        BoardCommands::Update {
            id,
            title,
            description,
            clear_description,
            color,
        } => {
            let mut screen = ready(BoardScreen::open(client, id, ctx.confirm()).await, "board")?;
            let changes = BoardUpdate {
                title,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
                background_color: color,
            };
            if report(screen.update_board(changes).await, "Board updated")?.is_some() {
                println!("{}", render_board(screen.tree(), today(), terminal_width()));
            }
        }
        BoardCommands::Delete { id } => {
            let mut dashboard = Dashboard::new(client, ctx.confirm());
            report(dashboard.delete(id).await, "Board deleted")?;
        }
    }
    Ok(())
}
