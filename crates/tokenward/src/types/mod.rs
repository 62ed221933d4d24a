//! Domain types for the token lifecycle.

pub mod blacklist;
pub mod principal;
pub mod refresh_token;
pub mod token_pair;

pub use blacklist::BlacklistEntry;
pub use principal::Principal;
pub use refresh_token::RefreshToken;
pub use token_pair::{AccessTokenClaims, TokenPair};
