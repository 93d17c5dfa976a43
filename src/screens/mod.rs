//! View models for the screens outside the board view.

pub mod card;
pub mod dashboard;
pub mod members;

pub use card::{CardForm, CardScreen};
pub use dashboard::Dashboard;
pub use members::{InvitesScreen, MembersScreen, accept_invite};
