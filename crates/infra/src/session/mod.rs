//! Session state: the persisted bearer token and its decoded claims

pub mod claims;
pub mod token_store;

pub use claims::TokenClaims;
pub use token_store::TokenStore;
