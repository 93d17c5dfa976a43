//! Card and comment commands: `trellis card ...`, `trellis comment ...`.
//!
//! Card edits and deletes work either from the card detail view or, with
//! `--board`, from the board view, which patches the loaded board instead
//! of fetching the card again.

use anyhow::Result;
use trellis::api::ApiClient;
use trellis::board::BoardScreen;
use trellis::screens::{CardForm, CardScreen};
use trellis::ui::render::{render_board, render_card, terminal_width};
use trellis::ui::with_spinner;
use trellis_common::User;

use super::super::{CardCommands, CommentCommands};
use super::{Context, ready, report, today};

async fn open_card(ctx: &Context, client: ApiClient, user: User, id: i64) -> Result<CardScreen> {
    ready(
        with_spinner("Loading card...", CardScreen::open(client, user, id, ctx.confirm())).await,
        "card",
    )
}

async fn open_board(ctx: &Context, client: ApiClient, id: i64) -> Result<BoardScreen> {
    ready(
        with_spinner("Loading board...", BoardScreen::open(client, id, ctx.confirm())).await,
        "board",
    )
}

fn print_card(screen: &CardScreen) {
    println!(
        "{}",
        render_card(
            screen.detail(),
            Some(screen.viewer().id),
            today(),
            terminal_width()
        )
    );
}

fn print_board(screen: &BoardScreen) {
    println!("{}", render_board(screen.tree(), today(), terminal_width()));
}

pub async fn cmd_card(ctx: &Context, command: CardCommands) -> Result<()> {
    let (session, user) = ctx.require_user().await?;
    let client = session.client().clone();

    match command {
        CardCommands::Show { id } => {
            let screen = open_card(ctx, client, user, id).await?;
            print_card(&screen);
        }
        CardCommands::Add {
            board,
            list,
            title,
            description,
        } => {
            let mut screen = open_board(ctx, client, board).await?;
            if let Some(card) =
                report(screen.add_card(list, &title, description).await, "Card added")?
            {
                println!("#{} {}", card.id, card.title);
                print_board(&screen);
            }
        }
        CardCommands::Edit {
            id,
            board,
            title,
            description,
            due,
        } => {
            let form = CardForm {
                title,
                description,
                due_date: due,
            };
            match board {
                Some(board) => {
                    let mut screen = open_board(ctx, client, board).await?;
                    let outcome = screen.edit_card(id, form.into_patch()).await;
                    if report(outcome, "Card updated")?.is_some() {
                        print_board(&screen);
                    }
                }
                None => {
                    let mut screen = open_card(ctx, client, user, id).await?;
                    if report(screen.save(form).await, "Card updated")?.is_some() {
                        print_card(&screen);
                    }
                }
            }
        }
        CardCommands::Move {
            id,
            board,
            to_list,
            position,
        } => {
            let mut screen = open_board(ctx, client, board).await?;
            if report(screen.move_card(id, to_list, position).await, "Card moved")?.is_some() {
                print_board(&screen);
            }
        }
        CardCommands::Delete { id, board } => match board {
            Some(board) => {
                let mut screen = open_board(ctx, client, board).await?;
                if report(screen.delete_card(id).await, "Card deleted")?.is_some() {
                    print_board(&screen);
                }
            }
            None => {
                let mut screen = open_card(ctx, client, user, id).await?;
                report(screen.delete().await, "Card deleted")?;
            }
        },
        CardCommands::Assign { id, users } => {
            let mut screen = open_card(ctx, client, user, id).await?;
            // The card is reloaded even after a partial failure; show it first.
            let outcome = screen.assign(&users).await;
            print_card(&screen);
            report(outcome, "Assignees updated")?;
        }
    }
    Ok(())
}

pub async fn cmd_comment(ctx: &Context, command: CommentCommands) -> Result<()> {
    let (session, user) = ctx.require_user().await?;
    let client = session.client().clone();

    let card_id = match &command {
        CommentCommands::Add { card, .. }
        | CommentCommands::Edit { card, .. }
        | CommentCommands::Delete { card, .. } => *card,
    };
    let mut screen = open_card(ctx, client, user, card_id).await?;

    let changed = match command {
        CommentCommands::Add { content, .. } => {
            report(screen.add_comment(&content).await, "Comment added")?.is_some()
        }
        CommentCommands::Edit {
            comment, content, ..
        } => {
            if screen.comment(comment).is_some_and(|c| !screen.can_modify(c)) {
                println!("Only the author can edit this comment.");
            }
            report(screen.edit_comment(comment, &content).await, "Comment updated")?.is_some()
        }
        CommentCommands::Delete { comment, .. } => {
            if screen.comment(comment).is_some_and(|c| !screen.can_modify(c)) {
                println!("Only the author can delete this comment.");
            }
            report(screen.delete_comment(comment).await, "Comment deleted")?.is_some()
        }
    };

    if changed {
        print_card(&screen);
    }
    Ok(())
}
