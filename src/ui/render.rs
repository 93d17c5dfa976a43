//! Plain-text views of boards, cards and memberships.
//!
//! Renderers return strings and never reorder what they are given: lists and
//! cards appear exactly in the order the backend sent them.

use chrono::NaiveDate;
use console::style;
use terminal_size::{Width, terminal_size};
use trellis_common::{Board, Card, CardWithDetails, Invite, MemberWithUser, User};

use crate::board::BoardTree;
use crate::ui::icons::{BOARD, CARD, CLOCK, COMMENT, LIST, MAIL, PERSON, WARN};

const DEFAULT_WIDTH: usize = 80;

/// Usable width of stdout, clamped to something readable.
pub fn terminal_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(DEFAULT_WIDTH)
        .clamp(40, 120)
}

fn wrap(text: &str, width: usize, indent: &str) -> Vec<String> {
    let options = textwrap::Options::new(width.max(20))
        .initial_indent(indent)
        .subsequent_indent(indent);
    textwrap::wrap(text, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Date part of a backend timestamp (`2024-05-01T00:00:00` → `2024-05-01`).
pub fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// "due 2024-05-01", styled red with a warning when the date has passed.
pub fn due_label(card: &Card, today: NaiveDate) -> Option<String> {
    let raw = card.due_date.as_deref()?;
    let day = date_part(raw);
    if card.is_overdue(today) {
        Some(format!("{}{}", WARN, style(format!("overdue {}", day)).red()))
    } else {
        Some(format!("{}{}", CLOCK, style(format!("due {}", day)).yellow()))
    }
}

fn user_label(user: &User) -> String {
    format!("{} ({})", user.display_name(), style(&user.email).dim())
}

pub fn render_user(user: &User) -> String {
    format!(
        "{}{} [{}]\n  {}",
        PERSON,
        style(user.display_name()).bold(),
        user.initials(),
        user.email
    )
}

pub fn render_dashboard(boards: &[Board]) -> String {
    if boards.is_empty() {
        return "No boards yet. Create one with `trellis board create <title>`.".to_string();
    }
    let mut lines = vec![style("Your boards").bold().underlined().to_string()];
    for board in boards {
        let mut line = format!(
            "  {}{} {}",
            BOARD,
            style(format!("#{}", board.id)).dim(),
            style(&board.title).bold()
        );
        if let Some(description) = board.description.as_deref().filter(|d| !d.is_empty()) {
            line.push_str(&format!(" {}", style(format!("- {}", description)).dim()));
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub fn render_board(tree: &BoardTree, today: NaiveDate, width: usize) -> String {
    let board = &tree.board.board;
    let mut lines = vec![format!(
        "{}{} {}",
        BOARD,
        style(&board.title).bold().underlined(),
        style(format!("#{}", board.id)).dim()
    )];
    if let Some(description) = board.description.as_deref().filter(|d| !d.is_empty()) {
        lines.extend(wrap(description, width, "  "));
    }
    let members: Vec<&str> = tree.board.members.iter().map(|m| m.user.display_name()).collect();
    if !members.is_empty() {
        lines.push(format!("  {}{}", PERSON, style(members.join(", ")).dim()));
    }

    if tree.lists.is_empty() {
        lines.push(String::new());
        lines.push("  No lists yet.".to_string());
    }
    for list in &tree.lists {
        lines.push(String::new());
        lines.push(format!(
            "{}{} {} {}",
            LIST,
            style(&list.list.title).cyan().bold(),
            style(format!("#{}", list.list.id)).dim(),
            style(format!("({})", list.cards.len())).dim()
        ));
        for card in &list.cards {
            let mut line = format!(
                "  {}{} {}",
                CARD,
                style(format!("#{}", card.id)).dim(),
                card.title
            );
            if let Some(due) = due_label(card, today) {
                line.push_str(&format!("  {}", due));
            }
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// Card detail. Comments authored by `viewer_id` are marked as editable.
pub fn render_card(
    detail: &CardWithDetails,
    viewer_id: Option<i64>,
    today: NaiveDate,
    width: usize,
) -> String {
    let card = &detail.card;
    let mut lines = vec![format!(
        "{}{} {}",
        CARD,
        style(&card.title).bold().underlined(),
        style(format!("#{} in list #{}", card.id, card.list_id)).dim()
    )];
    if let Some(due) = due_label(card, today) {
        lines.push(format!("  {}", due));
    }

    lines.push(String::new());
    match card.description.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(description) => lines.extend(wrap(description, width, "  ")),
        None => lines.push(format!("  {}", style("No description").dim())),
    }

    lines.push(String::new());
    lines.push(style("Assignees").bold().to_string());
    if detail.assignees.is_empty() {
        lines.push(format!("  {}", style("Nobody assigned").dim()));
    }
    for assignee in &detail.assignees {
        lines.push(format!(
            "  {}{} {}",
            PERSON,
            user_label(&assignee.user),
            style(format!("#{}", assignee.user.id)).dim()
        ));
    }

    lines.push(String::new());
    lines.push(style(format!("Comments ({})", detail.comments.len())).bold().to_string());
    for entry in &detail.comments {
        let mine = viewer_id == Some(entry.comment.user_id);
        lines.push(format!(
            "  {}{} {} {}{}",
            COMMENT,
            style(entry.user.display_name()).bold(),
            style(date_part(&entry.comment.created_at)).dim(),
            style(format!("#{}", entry.comment.id)).dim(),
            if mine { " (you)" } else { "" }
        ));
        lines.extend(wrap(&entry.comment.content, width, "      "));
    }
    lines.join("\n")
}

pub fn render_members(members: &[MemberWithUser], viewer_id: i64) -> String {
    let mut lines = vec![style("Members").bold().to_string()];
    for entry in members {
        let you = if entry.member.user_id == viewer_id { " (you)" } else { "" };
        lines.push(format!(
            "  {}{} {} {}{}",
            PERSON,
            user_label(&entry.user),
            style(entry.member.role).cyan(),
            style(format!("#{}", entry.member.id)).dim(),
            you
        ));
    }
    lines.join("\n")
}

pub fn render_invites(invites: &[Invite]) -> String {
    if invites.is_empty() {
        return "No invites.".to_string();
    }
    let mut lines = vec![style("Invites").bold().to_string()];
    for invite in invites {
        lines.push(format!(
            "  {}{} {} {}",
            MAIL,
            invite.email,
            style(invite.status).cyan(),
            style(format!("expires {}", date_part(&invite.expires_at))).dim()
        ));
    }
    lines.join("\n")
}
