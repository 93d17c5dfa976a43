use trellis_common::{AuthResponse, Credentials, MessageResponse, SignupRequest, User};

use super::ApiClient;
use crate::errors::ClientError;

/// `/auth/*` endpoints.
pub struct AuthApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl AuthApi<'_> {
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ClientError> {
        self.client.post("/auth/signup", request).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        self.client.post("/auth/login", credentials).await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ClientError> {
        self.client.post_empty("/auth/logout").await
    }

    /// The "who am I" probe used to seed the session store.
    pub async fn me(&self) -> Result<User, ClientError> {
        self.client.get("/auth/me").await
    }
}
