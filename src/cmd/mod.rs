//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled                               |
//! |------------|------------------------------------------------|
//! | `auth`     | `Signup`, `Login`, `Logout`, `Whoami`          |
//! | `boards`   | `Boards`, `Board`                              |
//! | `lists`    | `List`                                         |
//! | `cards`    | `Card`, `Comment`                              |
//! | `members`  | `Member`, `Invite`                             |
//! | `config`   | `Config`                                       |
//! | `serve`    | `Serve`                                        |

pub mod auth;
pub mod boards;
pub mod cards;
pub mod config;
pub mod lists;
pub mod members;
pub mod serve;

use std::sync::Arc;

use anyhow::{Result, bail};
use console::style;
use trellis::api::ApiClient;
use trellis::config::Config;
use trellis::credentials::CookieFile;
use trellis::panel::{AssumeYes, Confirm, DialoguerConfirm, Outcome};
use trellis::routes::{Access, Loaded, Route};
use trellis::session::Session;
use trellis::ui::icons::CHECK;
use trellis::ui::with_spinner;
use trellis_common::User;

pub use auth::{cmd_login, cmd_logout, cmd_signup, cmd_whoami};
pub use boards::{cmd_board, cmd_boards};
pub use cards::{cmd_card, cmd_comment};
pub use config::cmd_config;
pub use lists::cmd_list;
pub use members::{cmd_invite, cmd_member};
pub use serve::cmd_serve;

/// Everything a command needs, built once in `main`.
pub struct Context {
    pub config: Config,
    pub cookies: CookieFile,
    pub confirm: Arc<dyn Confirm>,
}

impl Context {
    pub fn new(config: Config, assume_yes: bool) -> Self {
        let confirm: Arc<dyn Confirm> = if assume_yes {
            Arc::new(AssumeYes)
        } else {
            Arc::new(DialoguerConfirm)
        };
        Self {
            cookies: CookieFile::new(&config.session_file),
            config,
            confirm,
        }
    }

    /// Resource client seeded with the saved session cookie.
    pub fn client(&self) -> Result<ApiClient> {
        self.cookies.client(&self.config.api_url)
    }

    /// A started session (identity probe done).
    pub async fn session(&self) -> Result<Session> {
        let mut session = Session::new(self.client()?);
        with_spinner("Checking session...", session.start()).await?;
        Ok(session)
    }

    /// Start a session and insist on a signed-in user.
    pub async fn require_user(&self) -> Result<(Session, User)> {
        let session = self.session().await?;
        match session.access() {
            Access::Granted(user) => Ok((session, user)),
            Access::Redirect(Route::Login) | Access::Loading => {
                bail!("Not signed in. Run `trellis login` first.")
            }
            Access::Redirect(route) => bail!("Not allowed here; go to {}", route),
        }
    }

    pub fn confirm(&self) -> Arc<dyn Confirm> {
        Arc::clone(&self.confirm)
    }
}

/// Unwrap a screen load, turning a redirect into an error.
pub fn ready<T>(loaded: Loaded<T>, what: &str) -> Result<T> {
    match loaded {
        Loaded::Ready(screen) => Ok(screen),
        Loaded::Redirect(route) => {
            bail!("Could not load {}; returning to {}", what, route)
        }
    }
}

/// Print the result of a panel action. Failures become command errors.
pub fn report<T>(outcome: Outcome<T>, done: &str) -> Result<Option<T>> {
    match outcome {
        Outcome::Done(value) => {
            println!("{}{}", CHECK, style(done).green());
            Ok(Some(value))
        }
        Outcome::Skipped => {
            println!("Nothing to change.");
            Ok(None)
        }
        Outcome::Declined => {
            println!("Cancelled.");
            Ok(None)
        }
        Outcome::Busy => bail!("Another request is still in progress"),
        Outcome::Invalid(message) | Outcome::Failed(message) => bail!(message),
    }
}

pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
