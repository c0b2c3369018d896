use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use auth::Claims;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenKind;
use auth::UserRole;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AuthError;
use crate::account::models::IssuedTokens;
use crate::account::models::LoginCommand;
use crate::account::models::SignupCommand;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::ports::AuthServicePort;
use crate::account::ports::TokenStore;
use crate::account::ports::UserRepository;

/// Upper bound on any single registry or identity-store call; elapse is
/// treated as the store being unavailable.
const STORE_TIMEOUT: StdDuration = StdDuration::from_secs(2);

/// Domain service coordinating identity lookup, password verification,
/// token minting, and registry writes.
///
/// Holds no mutable state of its own; every side effect is a single
/// atomic call on a collaborator, so concurrent requests need no locking
/// here. Two concurrent logins for one user resolve as last-writer-wins
/// in the registry.
pub struct AuthService<UR, TS>
where
    UR: UserRepository,
    TS: TokenStore,
{
    repository: Arc<UR>,
    token_store: Arc<TS>,
    codec: Arc<TokenCodec>,
    password_hasher: PasswordHasher,
}

impl<UR, TS> AuthService<UR, TS>
where
    UR: UserRepository,
    TS: TokenStore,
{
    /// Create the service with injected collaborators.
    ///
    /// # Arguments
    /// * `repository` - Identity store implementation
    /// * `token_store` - Token registry implementation
    /// * `codec` - Token codec holding the process-wide signing key
    pub fn new(repository: Arc<UR>, token_store: Arc<TS>, codec: Arc<TokenCodec>) -> Self {
        Self {
            repository,
            token_store,
            codec,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Bound an identity-store call; a wedged connection must not hold a
    /// signup or login open indefinitely.
    async fn with_deadline<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, AuthError>> + Send,
    ) -> Result<T, AuthError> {
        match tokio::time::timeout(STORE_TIMEOUT, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(operation, "Identity store call timed out");
                Err(AuthError::StorageUnavailable(format!(
                    "identity store {} timed out",
                    operation
                )))
            }
        }
    }

    /// Register a freshly minted token, bounding the registry call.
    ///
    /// Any failure here aborts the login: a token the registry does not
    /// know about could never be revoked.
    async fn register(&self, user_id: &UserId, kind: TokenKind, token: &str) -> Result<(), AuthError> {
        let ttl = self.codec.ttl(kind);

        match tokio::time::timeout(STORE_TIMEOUT, self.token_store.put(user_id, kind, token, ttl))
            .await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!(user_id = %user_id, kind = kind.as_str(), error = %e, "Registry write failed");
                Err(AuthError::Issuance(format!("registry write failed for {} token", kind.as_str())))
            }
            Err(_) => {
                tracing::error!(user_id = %user_id, kind = kind.as_str(), "Registry write timed out");
                Err(AuthError::Issuance(format!("registry write timed out for {} token", kind.as_str())))
            }
        }
    }
}

#[async_trait]
impl<UR, TS> AuthServicePort for AuthService<UR, TS>
where
    UR: UserRepository,
    TS: TokenStore,
{
    async fn signup(&self, command: SignupCommand) -> Result<User, AuthError> {
        tracing::info!(username = %command.username, "Signup attempt");

        if self
            .with_deadline(
                "exists_by_username",
                self.repository.exists_by_username(&command.username),
            )
            .await?
        {
            tracing::info!(username = %command.username, "Signup rejected: username taken");
            return Err(AuthError::DuplicateUsername(command.username.to_string()));
        }

        let password_hash = self.password_hasher.hash(command.password.as_str())?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            nickname: command.nickname,
            password_hash,
            role: UserRole::User,
            created_at: Utc::now(),
        };

        // The store's uniqueness constraint is the arbiter under
        // concurrent signups; a conflict here still comes back as
        // DuplicateUsername.
        let created = self.with_deadline("insert", self.repository.insert(user)).await?;

        tracing::info!(username = %created.username, user_id = %created.id, "Signup succeeded");
        Ok(created)
    }

    async fn login(&self, command: LoginCommand) -> Result<(User, IssuedTokens), AuthError> {
        tracing::info!(username = %command.username, "Login attempt");

        let user = self
            .with_deadline(
                "find_by_username",
                self.repository.find_by_username(&command.username),
            )
            .await?
            .ok_or_else(|| {
                tracing::info!(username = %command.username, "Login failed: unknown username");
                AuthError::UnknownUser(command.username.to_string())
            })?;

        if !self
            .password_hasher
            .verify(&command.password, &user.password_hash)?
        {
            tracing::info!(username = %command.username, "Login failed: wrong password");
            return Err(AuthError::WrongPassword(command.username.to_string()));
        }

        let now = Utc::now();
        let user_id = user.id.to_string();

        let access_token = self
            .codec
            .mint(
                TokenKind::Access,
                &user_id,
                user.username.as_str(),
                user.nickname.as_str(),
                user.role,
                now,
            )
            .map_err(|e| AuthError::Issuance(e.to_string()))?;
        let refresh_token = self
            .codec
            .mint(
                TokenKind::Refresh,
                &user_id,
                user.username.as_str(),
                user.nickname.as_str(),
                user.role,
                now,
            )
            .map_err(|e| AuthError::Issuance(e.to_string()))?;

        // All-or-nothing: if either slot cannot be registered, the client
        // gets no token at all.
        self.register(&user.id, TokenKind::Access, &access_token).await?;
        self.register(&user.id, TokenKind::Refresh, &refresh_token).await?;

        tracing::info!(username = %user.username, user_id = %user.id, "Login succeeded");

        let tokens = IssuedTokens {
            access_token,
            refresh_token,
            access_ttl: self.codec.ttl(TokenKind::Access),
            refresh_ttl: self.codec.ttl(TokenKind::Refresh),
        };
        Ok((user, tokens))
    }

    async fn authorize(
        &self,
        presented: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<Claims, AuthError> {
        let bare = TokenCodec::strip_scheme(presented)?;
        let claims = self.codec.verify(bare, now)?;
        let user_id = UserId::from_string(&claims.sub)?;

        let registered = tokio::time::timeout(
            STORE_TIMEOUT,
            self.token_store.get(&user_id, kind),
        )
        .await
        .map_err(|_| AuthError::StorageUnavailable("registry read timed out".to_string()))??;

        // Integrity alone is not authorization: the registry must still
        // hold exactly this token value.
        match registered {
            Some(current) if current == presented => Ok(claims),
            _ => {
                tracing::info!(user_id = %user_id, kind = kind.as_str(), "Rejected token absent from registry");
                Err(AuthError::RevokedToken)
            }
        }
    }
}
