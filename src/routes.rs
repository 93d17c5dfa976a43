//! Navigation targets and access gating.
//!
//! Screens never render a broken partial view: when a primary load fails or
//! the session is anonymous they hand back a [`Route`] to go to instead.

use trellis_common::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Board(i64),
    Card(i64),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Board(id) => format!("/boards/{}", id),
            Self::Card(id) => format!("/cards/{}", id),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// What a consumer that needs a signed-in user should do right now.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// The identity probe has not resolved yet; block and show a spinner.
    Loading,
    Granted(User),
    Redirect(Route),
}

/// Result of opening a primary view.
#[derive(Debug)]
pub enum Loaded<T> {
    Ready(T),
    Redirect(Route),
}

impl<T> Loaded<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Redirect(_) => None,
        }
    }

    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::Ready(_) => None,
            Self::Redirect(route) => Some(*route),
        }
    }
}
