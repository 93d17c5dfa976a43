//! Session store: who is signed in.
//!
//! A [`Session`] is constructed once at startup and handed to every consumer;
//! there is no global. Its lifecycle runs `Uninitialized → Ready → TornDown`,
//! and the authentication state it tracks moves only along these edges:
//!
//! ```text
//!   Unknown ──probe ok──────────> Authenticated
//!   Unknown ──probe failed──────> Anonymous
//!   Unknown | Anonymous ──login/signup──> Authenticated
//!   any ──logout──> Anonymous
//! ```
//!
//! Consumers observe changes through [`Session::subscribe`].

use tokio::sync::watch;
use trellis_common::{Credentials, SignupRequest, User};

use crate::api::ApiClient;
use crate::errors::SessionError;
use crate::routes::{Access, Route};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unknown,
    Authenticated(User),
    Anonymous,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
    TornDown,
}

pub struct Session {
    client: ApiClient,
    state: watch::Sender<SessionState>,
    lifecycle: Lifecycle,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        let (state, _rx) = watch::channel(SessionState::Unknown);
        Self {
            client,
            state,
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Run the one-time "who am I" probe and mark the session ready.
    pub async fn start(&mut self) -> Result<SessionState, SessionError> {
        match self.lifecycle {
            Lifecycle::TornDown => return Err(SessionError::TornDown),
            Lifecycle::Ready => return Err(SessionError::AlreadyStarted),
            Lifecycle::Uninitialized => {}
        }

        // A login or signup made before start already settled the state.
        if let SessionState::Authenticated(user) = self.state() {
            tracing::debug!(user_id = user.id, "already signed in; identity probe skipped");
            self.lifecycle = Lifecycle::Ready;
            return Ok(self.state());
        }

        let next = match self.client.auth().me().await {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "identity probe succeeded");
                SessionState::Authenticated(user)
            }
            Err(e) => {
                tracing::debug!(error = %e, "identity probe failed; treating as anonymous");
                SessionState::Anonymous
            }
        };
        self.lifecycle = Lifecycle::Ready;
        self.state.send_replace(next);
        Ok(self.state())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, SessionError> {
        self.ensure_can_authenticate()?;
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.client.auth().login(&credentials).await?;
        tracing::info!(user_id = response.user.id, "logged in");
        self.state
            .send_replace(SessionState::Authenticated(response.user.clone()));
        Ok(response.user)
    }

    pub async fn signup(&mut self, request: &SignupRequest) -> Result<User, SessionError> {
        self.ensure_can_authenticate()?;
        let response = self.client.auth().signup(request).await?;
        tracing::info!(user_id = response.user.id, "signed up");
        self.state
            .send_replace(SessionState::Authenticated(response.user.clone()));
        Ok(response.user)
    }

    /// Ends the backend session. On failure the state is left as it was.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        if self.lifecycle == Lifecycle::TornDown {
            return Err(SessionError::TornDown);
        }
        self.client.auth().logout().await?;
        tracing::info!("logged out");
        self.state.send_replace(SessionState::Anonymous);
        Ok(())
    }

    /// Gate for consumers that need a signed-in user.
    pub fn access(&self) -> Access {
        match &*self.state.borrow() {
            SessionState::Unknown => Access::Loading,
            SessionState::Authenticated(user) => Access::Granted(user.clone()),
            SessionState::Anonymous => Access::Redirect(Route::Login),
        }
    }

    /// Stop accepting transitions. Subscribers keep the last state.
    pub fn shutdown(&mut self) {
        self.lifecycle = Lifecycle::TornDown;
    }

    fn ensure_can_authenticate(&self) -> Result<(), SessionError> {
        if self.lifecycle == Lifecycle::TornDown {
            return Err(SessionError::TornDown);
        }
        if matches!(*self.state.borrow(), SessionState::Authenticated(_)) {
            return Err(SessionError::AlreadyAuthenticated);
        }
        Ok(())
    }
}
