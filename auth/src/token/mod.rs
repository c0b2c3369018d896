pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::Claims;
pub use claims::UserRole;
pub use codec::TokenCodec;
pub use codec::TokenKind;
pub use codec::SCHEME_PREFIX;
pub use errors::TokenError;
