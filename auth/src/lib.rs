//! Authentication utilities library
//!
//! Provides the cryptographic building blocks for the onboarding service:
//! - Password hashing (Argon2id)
//! - Signed token minting and verification with independent access/refresh
//!   lifetimes
//!
//! The service crate owns the orchestration (uniqueness checks, registry
//! writes); this crate only answers "does this password match" and "is this
//! token intact and unexpired". Verification never consults server-side
//! state, so a verified token is not necessarily still authorized.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenCodec, TokenKind, UserRole};
//! use chrono::{Duration, Utc};
//!
//! // "0123456789abcdef0123456789abcdef" in base64
//! let secret = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";
//! let codec = TokenCodec::from_base64_secret(
//!     secret,
//!     Duration::minutes(60),
//!     Duration::hours(24),
//! )
//! .unwrap();
//!
//! let now = Utc::now();
//! let token = codec
//!     .mint(TokenKind::Access, "user-id", "user123", "nick", UserRole::User, now)
//!     .unwrap();
//! assert!(token.starts_with("Bearer "));
//!
//! let bare = TokenCodec::strip_scheme(&token).unwrap();
//! let claims = codec.verify(bare, now).unwrap();
//! assert_eq!(claims.username, "user123");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::TokenKind;
pub use token::UserRole;
pub use token::SCHEME_PREFIX;
