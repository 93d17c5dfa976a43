//! Shared UI icons and emojis.
//!
//! Each icon has a plain-text fallback for terminals without emoji support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");

// Board hierarchy
pub static BOARD: Emoji<'_, '_> = Emoji("📋 ", "");
pub static LIST: Emoji<'_, '_> = Emoji("📂 ", "#");
pub static CARD: Emoji<'_, '_> = Emoji("🗒️  ", "-");

// Card details
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "due");
pub static PERSON: Emoji<'_, '_> = Emoji("👤 ", "@");
pub static COMMENT: Emoji<'_, '_> = Emoji("💬 ", ">");
pub static MAIL: Emoji<'_, '_> = Emoji("✉️  ", "*");
