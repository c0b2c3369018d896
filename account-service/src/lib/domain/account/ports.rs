use async_trait::async_trait;
use auth::Claims;
use auth::TokenKind;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::account::errors::AuthError;
use crate::account::errors::TokenStoreError;
use crate::account::models::IssuedTokens;
use crate::account::models::LoginCommand;
use crate::account::models::SignupCommand;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::models::Username;

/// Port for account domain service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `DatabaseError` - Identity store operation failed
    async fn signup(&self, command: SignupCommand) -> Result<User, AuthError>;

    /// Authenticate a user and issue a registered access/refresh token
    /// pair. Either both tokens land in the registry or the login fails;
    /// no unregistered token is ever handed out.
    ///
    /// # Errors
    /// * `UnknownUser` - No identity with this username
    /// * `WrongPassword` - Password does not match the stored hash
    /// * `Issuance` - Registry write failed; login aborted
    /// * `DatabaseError` - Identity store operation failed
    async fn login(&self, command: LoginCommand) -> Result<(User, IssuedTokens), AuthError>;

    /// Check that a presented raw token (scheme prefix included) is both
    /// intact and still the registered token for its subject.
    ///
    /// # Errors
    /// * `Token` - Missing scheme, malformed, or expired
    /// * `RevokedToken` - Signature is fine but the registry holds a
    ///   different value (or none) for this user
    /// * `StorageUnavailable` - Registry could not be consulted
    async fn authorize(
        &self,
        presented: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<Claims, AuthError>;
}

/// Persistence operations for the identity store.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Check whether a username is already taken.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn exists_by_username(&self, username: &Username) -> Result<bool, AuthError>;

    /// Retrieve a user by username.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError>;

    /// Persist a new user. The store enforces username uniqueness
    /// atomically; a conflict surfaces as `DuplicateUsername` even if a
    /// prior existence check passed.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `DatabaseError` - Store operation failed
    async fn insert(&self, user: User) -> Result<User, AuthError>;
}

/// Server-side registry of currently valid token values.
///
/// One slot per (user, kind); `put` overwrites, so the previous token for
/// that slot stops being authorized the moment the call completes even
/// though its signature stays valid.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Upsert the registered token for (user, kind) with the given TTL.
    ///
    /// # Errors
    /// * `Unavailable` - Backing store unreachable
    async fn put(
        &self,
        user_id: &UserId,
        kind: TokenKind,
        token: &str,
        ttl: Duration,
    ) -> Result<(), TokenStoreError>;

    /// Fetch the registered token for (user, kind). `None` means revoked,
    /// never issued, or lapsed past its TTL.
    ///
    /// # Errors
    /// * `Unavailable` - Backing store unreachable
    async fn get(&self, user_id: &UserId, kind: TokenKind)
        -> Result<Option<String>, TokenStoreError>;
}
