//! Login boundary. The provider is an external SDK; [`Session`] keeps the
//! locally held token consistent with what the provider reports.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("session token is invalid")]
    InvalidSession,
    #[error("session token has expired")]
    Expired,
    #[error("login was cancelled")]
    Cancelled,
    #[error("login provider error: {0}")]
    Sdk(String),
}

impl AuthError {
    /// The token can no longer be used and a fresh login is required.
    pub fn requires_login(&self) -> bool { matches!(self, AuthError::InvalidSession | AuthError::Expired) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl Token {
    pub fn new(access_token: impl Into<String>) -> Self { Self { access_token: access_token.into(), refresh_token: None } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub nickname: String,
    /// Absent when the user has not consented to sharing it.
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMethod {
    /// Hand off to the provider's installed app.
    App,
    /// Account credentials through the provider's web flow.
    Account,
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn validate(&self, token: &Token) -> Result<(), AuthError>;
    async fn current_user(&self, token: &Token) -> Result<User, AuthError>;
    async fn login(&self, method: LoginMethod) -> Result<Token, AuthError>;
    async fn logout(&self, token: &Token) -> Result<(), AuthError>;
    async fn unlink(&self, token: &Token) -> Result<(), AuthError>;
}

pub struct Session<P> {
    provider: P,
    token: Option<Token>,
}

impl<P: SessionProvider> Session<P> {
    pub fn new(provider: P) -> Self { Self { provider, token: None } }

    pub fn with_token(provider: P, token: Token) -> Self { Self { provider, token: Some(token) } }

    pub fn token(&self) -> Option<&Token> { self.token.as_ref() }
    pub fn provider(&self) -> &P { &self.provider }

    /// True when a token is held and the provider accepts it. A rejected token
    /// is dropped; other provider errors are passed through.
    pub async fn has_valid_session(&mut self) -> Result<bool, AuthError> {
        let Some(token) = &self.token else { return Ok(false) };
        match self.provider.validate(token).await {
            Ok(()) => Ok(true),
            Err(e) if e.requires_login() => {
                debug!(error = %e, "dropping rejected session token");
                self.token = None;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn fetch_current_user(&mut self) -> Result<User, AuthError> {
        let token = self.token.as_ref().ok_or(AuthError::InvalidSession)?;
        match self.provider.current_user(token).await {
            Ok(user) => Ok(user),
            Err(e) => {
                if e.requires_login() {
                    self.token = None;
                }
                Err(e)
            }
        }
    }

    pub async fn login(&mut self, method: LoginMethod) -> Result<User, AuthError> {
        let token = self.provider.login(method).await?;
        info!(?method, "login succeeded");
        self.token = Some(token);
        self.fetch_current_user().await
    }

    /// Clears the local token whatever the provider answers.
    pub async fn logout(&mut self) -> Result<(), AuthError> {
        let Some(token) = self.token.take() else { return Ok(()) };
        let result = self.provider.logout(&token).await;
        if let Err(e) = &result {
            warn!(error = %e, "remote logout failed; local session cleared anyway");
        }
        result
    }

    /// Revokes the app link; the local token is cleared whatever the provider answers.
    pub async fn unlink(&mut self) -> Result<(), AuthError> {
        let Some(token) = self.token.take() else { return Ok(()) };
        let result = self.provider.unlink(&token).await;
        if let Err(e) = &result {
            warn!(error = %e, "remote unlink failed; local session cleared anyway");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeProvider {
        validate: Result<(), AuthError>,
        user: Result<User, AuthError>,
        remote: Result<(), AuthError>,
    }

    impl Default for FakeProvider {
        fn default() -> Self {
            Self { validate: Ok(()), user: Ok(User { id: 7, nickname: "jae".into(), email: None }), remote: Ok(()) }
        }
    }

    #[async_trait]
    impl SessionProvider for FakeProvider {
        async fn validate(&self, _token: &Token) -> Result<(), AuthError> { self.validate.clone() }
        async fn current_user(&self, _token: &Token) -> Result<User, AuthError> { self.user.clone() }
        async fn login(&self, method: LoginMethod) -> Result<Token, AuthError> {
            match method {
                LoginMethod::App => Ok(Token::new("app-token")),
                LoginMethod::Account => Err(AuthError::Cancelled),
            }
        }
        async fn logout(&self, _token: &Token) -> Result<(), AuthError> { self.remote.clone() }
        async fn unlink(&self, _token: &Token) -> Result<(), AuthError> { self.remote.clone() }
    }

    #[tokio::test]
    async fn no_token_means_no_session() {
        let mut s = Session::new(FakeProvider::default());
        assert_eq!(s.has_valid_session().await, Ok(false));
        assert_eq!(s.fetch_current_user().await, Err(AuthError::InvalidSession));
    }

    #[tokio::test]
    async fn expired_token_is_dropped() {
        let provider = FakeProvider { validate: Err(AuthError::Expired), ..Default::default() };
        let mut s = Session::with_token(provider, Token::new("t"));
        assert_eq!(s.has_valid_session().await, Ok(false));
        assert!(s.token().is_none());
    }

    #[tokio::test]
    async fn provider_failure_keeps_the_token() {
        let provider = FakeProvider { validate: Err(AuthError::Sdk("offline".into())), ..Default::default() };
        let mut s = Session::with_token(provider, Token::new("t"));
        assert!(s.has_valid_session().await.is_err());
        assert!(s.token().is_some());
    }

    #[tokio::test]
    async fn login_stores_token_and_loads_user() {
        let mut s = Session::new(FakeProvider::default());
        let user = s.login(LoginMethod::App).await.unwrap();
        assert_eq!(user.nickname, "jae");
        assert_eq!(s.token().map(|t| t.access_token.as_str()), Some("app-token"));
        assert_eq!(s.has_valid_session().await, Ok(true));
    }

    #[tokio::test]
    async fn cancelled_login_leaves_no_token() {
        let mut s = Session::new(FakeProvider::default());
        assert_eq!(s.login(LoginMethod::Account).await, Err(AuthError::Cancelled));
        assert!(s.token().is_none());
    }

    #[tokio::test]
    async fn logout_clears_local_state_even_when_remote_fails() {
        let provider = FakeProvider { remote: Err(AuthError::Sdk("500".into())), ..Default::default() };
        let mut s = Session::with_token(provider, Token::new("t"));
        assert_eq!(s.logout().await, Err(AuthError::Sdk("500".into())));
        assert!(s.token().is_none());
    }

    #[tokio::test]
    async fn unlink_clears_local_state() {
        let mut s = Session::with_token(FakeProvider::default(), Token::new("t"));
        assert_eq!(s.unlink().await, Ok(()));
        assert!(s.token().is_none());
        assert_eq!(s.unlink().await, Ok(()));
    }
}
